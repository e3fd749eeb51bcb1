use bytes::Bytes;

use crate::JobId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Issue the single outstanding compression request to the service.
    SubmitCompression {
        job_id: JobId,
        file_name: String,
        mime: String,
        bytes: Bytes,
        quality: u8,
    },
}
