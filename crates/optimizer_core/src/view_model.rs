use crate::{HandleId, Notice, Phase};

/// What the presentation layer reads after each update.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WorkflowView {
    pub phase: Phase,
    pub file: Option<FileView>,
    pub quality: u8,
    pub result: Option<ResultView>,
    pub notice: Option<Notice>,
    /// True while the single compression request is in flight.
    pub busy: bool,
}

/// Metadata of the selected file. `preview` is gone once the thumbnail has
/// rendered and its handle was released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileView {
    pub name: String,
    pub size_bytes: u64,
    pub mime: String,
    pub preview: Option<HandleId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub handle: HandleId,
    pub suggested_filename: String,
    pub size_bytes: u64,
}
