use std::time::Duration;

use bytes::Bytes;
use optimizer_logging::optimizer_debug;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};

use crate::{CompressError, CompressedImage, FailureKind, JobId};

#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Base URL of the compression service. Injected configuration, never a
    /// constant inside the client.
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// One compression request: the selected file plus the quality parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressRequest {
    pub file_name: String,
    pub mime: String,
    pub bytes: Bytes,
    pub quality: u8,
}

/// The single-shot compression transport. No retry, no backoff; a failure
/// settles the job immediately.
#[async_trait::async_trait]
pub trait Compressor: Send + Sync {
    async fn compress(
        &self,
        job_id: JobId,
        request: CompressRequest,
    ) -> Result<CompressedImage, CompressError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestCompressor {
    settings: ClientSettings,
}

impl ReqwestCompressor {
    pub fn new(settings: ClientSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, CompressError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| CompressError::new(FailureKind::Network, err.to_string()))
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/compress/jpeg",
            self.settings.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait::async_trait]
impl Compressor for ReqwestCompressor {
    async fn compress(
        &self,
        job_id: JobId,
        request: CompressRequest,
    ) -> Result<CompressedImage, CompressError> {
        let client = self.build_client()?;

        let image = Part::bytes(request.bytes.to_vec())
            .file_name(request.file_name)
            .mime_str(&request.mime)
            .map_err(|err| CompressError::new(FailureKind::Network, err.to_string()))?;
        let form = Form::new()
            .part("image", image)
            .text("quality", request.quality.to_string());

        optimizer_debug!("job {}: POST {}", job_id, self.endpoint());
        let response = client
            .post(self.endpoint())
            .multipart(form)
            .send()
            .await
            .map_err(|err| CompressError::new(FailureKind::Network, err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            let message = server_message(&body)
                .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));
            return Err(CompressError::new(
                FailureKind::Server {
                    status: status.as_u16(),
                },
                message,
            ));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        let bytes = response
            .bytes()
            .await
            .map_err(|err| CompressError::new(FailureKind::Network, err.to_string()))?;

        if bytes.is_empty() {
            return Err(CompressError::new(
                FailureKind::MalformedResponse,
                "empty response body",
            ));
        }
        if let Some(ct) = content_type.as_deref() {
            if !is_image_content_type(ct) {
                return Err(CompressError::new(
                    FailureKind::MalformedResponse,
                    format!("unexpected content type {ct}"),
                ));
            }
        }

        Ok(CompressedImage {
            bytes,
            content_type: content_type.unwrap_or_else(|| "image/jpeg".to_string()),
        })
    }
}

/// Extracts the `error` field of a JSON error body, when there is one.
fn server_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()?
        .get("error")?
        .as_str()
        .map(ToOwned::to_owned)
}

fn is_image_content_type(value: &str) -> bool {
    let essence = value.split(';').next().unwrap_or(value).trim();
    essence.to_ascii_lowercase().strip_prefix("image/").is_some_and(|subtype| !subtype.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{is_image_content_type, server_message};

    #[test]
    fn server_message_reads_the_error_field() {
        assert_eq!(
            server_message(br#"{"error":"decode failed"}"#),
            Some("decode failed".to_string())
        );
    }

    #[test]
    fn server_message_is_none_for_unparseable_bodies() {
        assert_eq!(server_message(b"<html>oops</html>"), None);
        assert_eq!(server_message(br#"{"detail":"nope"}"#), None);
        assert_eq!(server_message(b""), None);
    }

    #[test]
    fn image_content_types_are_recognized() {
        assert!(is_image_content_type("image/jpeg"));
        assert!(is_image_content_type("IMAGE/PNG"));
        assert!(is_image_content_type("image/jpeg; charset=binary"));
        assert!(!is_image_content_type("text/html"));
        assert!(!is_image_content_type("image/"));
    }
}
