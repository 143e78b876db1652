use crate::aligner::AlignmentError;
use std::path::PathBuf;

/// Every failure is fatal for the current run; nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum SeqrepError {
    #[error("{path:?} is not a directory")]
    NotADirectory { path: PathBuf },

    #[error("Invalid option: {0}")]
    Config(String),

    #[error(
        "{dir:?} already contains a reports directory. \
         Please remove the directory to run this again"
    )]
    ReportsExist { dir: PathBuf },

    #[error(
        "Error occurred with {path:?}: {reason}. \
         Make sure there are only sequencing files in the directory"
    )]
    MalformedInput { path: PathBuf, reason: String },

    #[error("Pairing sheet {path:?} is missing the column '{column}'")]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("Pairing sheet {path:?}, row {row}: {reason}")]
    BadRow {
        path: PathBuf,
        row: usize,
        reason: String,
    },

    #[error("Could not align {read}: {source}")]
    Alignment {
        read: String,
        #[source]
        source: AlignmentError,
    },

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Pairing sheet {path:?}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Could not serialize report for {read}: {source}")]
    Json {
        read: String,
        #[source]
        source: serde_json::Error,
    },
}

impl SeqrepError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SeqrepError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = SeqrepError> = std::result::Result<T, E>;
