use std::fmt;

use bytes::Bytes;

use crate::ledger::{HandleId, ResourceLedger};
use crate::Msg;

/// MIME types the intake accepts. Everything else is delegated to the remote
/// service, which rejects what it cannot decode.
pub const ALLOWED_MIME_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/jpg"];

/// One candidate file as yielded by the upstream selection/gesture source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFile {
    pub name: String,
    pub mime: String,
    pub bytes: Bytes,
}

/// Snapshot of the drag-and-drop capability surface.
///
/// Supplied by an external gesture adapter; the workflow core only consumes
/// `accepted`, the hint booleans are passed through for presentation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropSignal {
    pub accepted: Vec<RawFile>,
    pub focused: bool,
    pub drag_accepting: bool,
    pub drag_rejecting: bool,
}

impl DropSignal {
    /// Converts the gesture into the message the workflow consumes.
    pub fn into_msg(self) -> Msg {
        Msg::FilesDropped(self.accepted)
    }
}

/// The single accepted input file, with its ledger-managed preview handle.
///
/// `preview` is `None` once the handle has been released after the first
/// successful render of the thumbnail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub size_bytes: u64,
    pub mime: String,
    pub bytes: Bytes,
    pub preview: Option<HandleId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeError {
    NoFileProvided,
    /// More than one file was dropped; only the first is kept. Non-fatal.
    TooManyFiles,
    UnsupportedType {
        mime: String,
    },
}

impl fmt::Display for IntakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntakeError::NoFileProvided => write!(f, "No file provided."),
            IntakeError::TooManyFiles => write!(f, "Only the first file was kept."),
            IntakeError::UnsupportedType { mime } => {
                write!(f, "Unsupported file type: {mime}")
            }
        }
    }
}

/// A validated intake: the accepted file plus an optional non-fatal warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Intake {
    pub file: UploadedFile,
    pub warning: Option<IntakeError>,
}

/// Validates a candidate sequence and registers a preview handle for the
/// accepted file.
///
/// Exactly one file is expected. An empty sequence is an error; a longer one
/// keeps the first file and reports [`IntakeError::TooManyFiles`] as a
/// warning. On success exactly one ledger `acquire` has happened.
pub fn accept(
    mut candidates: Vec<RawFile>,
    ledger: &mut ResourceLedger,
) -> Result<Intake, IntakeError> {
    if candidates.is_empty() {
        return Err(IntakeError::NoFileProvided);
    }
    let warning = (candidates.len() > 1).then_some(IntakeError::TooManyFiles);
    let raw = candidates.swap_remove(0);

    if !ALLOWED_MIME_TYPES
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(&raw.mime))
    {
        return Err(IntakeError::UnsupportedType { mime: raw.mime });
    }

    let preview = ledger.acquire(raw.bytes.clone());
    Ok(Intake {
        file: UploadedFile {
            name: raw.name,
            size_bytes: raw.bytes.len() as u64,
            mime: raw.mime,
            bytes: raw.bytes,
            preview: Some(preview),
        },
        warning,
    })
}
