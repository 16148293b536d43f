pub mod comparison;
pub mod document;
pub mod folder;
pub mod loaders;
pub mod record;
pub mod run_result;
pub mod upload;

pub use comparison::{ComparisonRow, ComparisonSummary, MatchStatus, StatusTone};
pub use document::{DocumentResult, OcrSummary, Segment};
pub use folder::{Folder, FolderListing, UploadReceipt};
pub use loaders::load_pdf_batch;
pub use record::CreditorRecord;
pub use run_result::{ExtractionResult, RunResult};
pub use upload::{UploadFile, GROUND_TRUTH_FILENAME};
