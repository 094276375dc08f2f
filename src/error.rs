use std::path::PathBuf;

/// Failure taxonomy for the repair pipeline.
///
/// "Nothing to repair" is deliberately not represented here: a buffer with no
/// detectable corruption comes back unchanged as a clean result, not an error.
#[derive(Debug, thiserror::Error)]
pub enum RepairError {
    /// The round trip could not be completed under the stated encoding.
    #[error(
        "buffer cannot be round-tripped as {encoding}: {detail}. Try a different hypothesis or REPAIR_MODE=table."
    )]
    Encoding {
        encoding: &'static str,
        detail: String,
    },

    /// More than one intermediate-encoding hypothesis produced a valid repair.
    #[error(
        "ambiguous corruption: hypotheses [{}] all validate. Re-run with a single hypothesis or REPAIR_MODE=table.",
        .candidates.join(", ")
    )]
    Ambiguous { candidates: Vec<String> },

    /// The file's bytes do not decode as UTF-8, so there is no text buffer to repair.
    #[error("{path} is not valid UTF-8 text")]
    InvalidUtf8 { path: PathBuf },

    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
