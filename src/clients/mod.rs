pub mod pipeline_client;

pub use pipeline_client::{PipelineApi, PipelineClient};
