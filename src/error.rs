use thiserror::Error;

/// Failure taxonomy for a single extraction request.
///
/// Only `UnsupportedFileType` and `ConversionFailure` surface to the caller.
/// `ReaderFailure` and `RecognizerFailure` are absorbed where they occur:
/// the affected page or strategy is logged and treated as "no date here",
/// and extraction continues with whatever pages/strategies remain.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported file type: {0:?}")]
    UnsupportedFileType(String),

    #[error("doc to docx conversion failed")]
    ConversionFailure(#[source] anyhow::Error),

    #[error("document could not be read")]
    ReaderFailure(#[source] anyhow::Error),

    #[error("text recognition failed")]
    RecognizerFailure(#[source] anyhow::Error),
}
