use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, bail, Context, Result};
use bytes::Bytes;
use optimizer_core::{update, AppState, DropSignal, Msg, Phase, RawFile};
use optimizer_engine::ClientSettings;
use optimizer_logging::{optimizer_debug, optimizer_info, optimizer_warn};

use crate::effects::EffectRunner;

const SERVICE_URL_ENV: &str = "IMAGE_OPTIMIZER_URL";
const SETTLE_TIMEOUT: Duration = Duration::from_secs(60);

const USAGE: &str = "usage: optimizer_app <image> [--quality N] [--output PATH]";

pub struct Options {
    pub image: PathBuf,
    pub quality: Option<i64>,
    pub output: Option<PathBuf>,
}

impl Options {
    pub fn parse<I: Iterator<Item = String>>(mut args: I) -> Result<Self> {
        let _argv0 = args.next();
        let mut image = None;
        let mut quality = None;
        let mut output = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--quality" => {
                    let value = args.next().ok_or_else(|| anyhow!("--quality needs a value"))?;
                    quality = Some(
                        value
                            .parse::<i64>()
                            .with_context(|| format!("invalid quality '{value}'"))?,
                    );
                }
                "--output" => {
                    let value = args.next().ok_or_else(|| anyhow!("--output needs a value"))?;
                    output = Some(PathBuf::from(value));
                }
                _ if image.is_none() => image = Some(PathBuf::from(&arg)),
                other => bail!("unexpected argument '{other}'\n{USAGE}"),
            }
        }

        let image = image.ok_or_else(|| anyhow!(USAGE))?;
        Ok(Self {
            image,
            quality,
            output,
        })
    }
}

/// Service endpoint configuration, injected via the environment.
fn client_settings() -> ClientSettings {
    let mut settings = ClientSettings::default();
    match std::env::var(SERVICE_URL_ENV) {
        Ok(url) if !url.is_empty() => settings.base_url = url,
        _ => {}
    }
    settings
}

pub fn run(options: Options) -> Result<()> {
    let (msg_tx, msg_rx) = mpsc::channel();
    let runner = EffectRunner::new(client_settings(), msg_tx);

    let mut session = Session {
        state: AppState::new(),
        runner,
        msg_rx,
    };
    let outcome = session.drive(options);
    // Full teardown on every exit path so no handle outlives the session.
    session.dispatch(Msg::ResetClicked);
    outcome
}

struct Session {
    state: AppState,
    runner: EffectRunner,
    msg_rx: mpsc::Receiver<Msg>,
}

impl Session {
    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        if state.consume_dirty() {
            optimizer_debug!("phase now {:?}", state.phase());
        }
        self.runner.run(effects);
        self.state = state;
    }

    fn drive(&mut self, options: Options) -> Result<()> {
        let bytes = fs::read(&options.image)
            .with_context(|| format!("could not read {}", options.image.display()))?;
        let name = options
            .image
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        let signal = DropSignal {
            accepted: vec![RawFile {
                name,
                mime: mime_for_path(&options.image).to_string(),
                bytes: Bytes::from(bytes),
            }],
            ..DropSignal::default()
        };

        self.dispatch(signal.into_msg());
        let view = self.state.view();
        if let Some(notice) = view.notice {
            if view.file.is_none() {
                bail!(notice.message);
            }
            optimizer_warn!("{}", notice.message);
        }
        if let Some(file) = view.file {
            println!("Selected {} ({} bytes)", file.name, file.size_bytes);
        }
        // The printed summary is this host's preview; release the handle.
        self.dispatch(Msg::PreviewRendered);

        if let Some(quality) = options.quality {
            self.dispatch(Msg::QualityChanged(quality));
        }
        self.dispatch(Msg::SubmitClicked);
        if !self.state.view().busy {
            let message = self
                .state
                .view()
                .notice
                .map(|notice| notice.message)
                .unwrap_or_else(|| "submission rejected".to_string());
            bail!(message);
        }
        optimizer_info!(
            "compressing at quality {}",
            self.state.view().quality
        );

        let deadline = Instant::now() + SETTLE_TIMEOUT;
        while self.state.view().busy {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                bail!("timed out waiting for the compression service");
            }
            match self.msg_rx.recv_timeout(remaining) {
                Ok(msg) => self.dispatch(msg),
                Err(mpsc::RecvTimeoutError::Timeout) => continue,
                Err(mpsc::RecvTimeoutError::Disconnected) => {
                    bail!("transport loop ended before the job settled");
                }
            }
        }

        let view = self.state.view();
        match view.phase {
            Phase::Succeeded => {
                let result = view
                    .result
                    .ok_or_else(|| anyhow!("succeeded without a result"))?;
                let bytes = self
                    .state
                    .ledger()
                    .resolve(result.handle)
                    .cloned()
                    .ok_or_else(|| anyhow!("result handle was not live"))?;
                let output = options
                    .output
                    .unwrap_or_else(|| PathBuf::from(&result.suggested_filename));
                fs::write(&output, &bytes)
                    .with_context(|| format!("could not write {}", output.display()))?;
                println!("Wrote {} ({} bytes)", output.display(), bytes.len());
                Ok(())
            }
            Phase::Failed => {
                let message = view
                    .notice
                    .map(|notice| notice.message)
                    .unwrap_or_else(|| "compression failed".to_string());
                Err(anyhow!(message))
            }
            other => Err(anyhow!("workflow settled in unexpected phase {other:?}")),
        }
    }
}

fn mime_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|extension| extension.to_str())
        .map(|extension| extension.to_ascii_lowercase());
    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::{mime_for_path, Options};
    use std::path::Path;

    fn parse(args: &[&str]) -> anyhow::Result<Options> {
        Options::parse(
            std::iter::once("optimizer_app".to_string())
                .chain(args.iter().map(ToString::to_string)),
        )
    }

    #[test]
    fn parses_image_quality_and_output() {
        let options = parse(&["photo.png", "--quality", "80", "--output", "out.jpg"]).unwrap();
        assert_eq!(options.image, Path::new("photo.png"));
        assert_eq!(options.quality, Some(80));
        assert_eq!(options.output.as_deref(), Some(Path::new("out.jpg")));
    }

    #[test]
    fn image_argument_is_required() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["--quality", "80"]).is_err());
    }

    #[test]
    fn rejects_unknown_flags_and_bad_quality() {
        assert!(parse(&["a.png", "--verbose"]).is_err());
        assert!(parse(&["a.png", "--quality", "high"]).is_err());
    }

    #[test]
    fn mime_follows_the_extension() {
        assert_eq!(mime_for_path(Path::new("a.JPG")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("a.jpeg")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("a.png")), "image/png");
        assert_eq!(mime_for_path(Path::new("a.gif")), "application/octet-stream");
    }
}
