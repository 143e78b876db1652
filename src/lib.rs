pub mod aligner;
pub mod error;
pub mod orientation;
pub mod overhang;
pub mod report;
pub mod seqrep;
pub mod sequence;
pub mod sheet;
pub mod wrap;

pub use aligner::{
    AlignerConfig, AlignmentError, AlignmentResult, LocalAligner, SmithWatermanAligner,
};
pub use error::{Result, SeqrepError};
pub use overhang::{extend, ExtendedAlignment};
pub use report::{ReportDocument, ReportFormat};
pub use seqrep::{run_seqrep, Args, ReportOptions, RunOutcome};
pub use sequence::{load_sequence, Sequence};
pub use sheet::ReadRecord;
pub use wrap::{wrap, PositionRange, ReportLine};
