pub mod notice;
pub mod run_flow;
pub mod run_ticket;
pub mod upload_flow;

pub use notice::Notice;
pub use run_flow::{RunCompletion, RunCoordinator, RunState};
pub use run_ticket::RunTicket;
pub use upload_flow::{UploadBatch, UploadCoordinator, UploadState};
