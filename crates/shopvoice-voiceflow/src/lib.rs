pub mod batch;
pub mod client;
pub mod error;
pub mod types;

pub use batch::{upload_in_batches, BatchUploadSummary, FailedUpload, INTER_BATCH_DELAY, URL_BATCH_SIZE};
pub use client::KnowledgeBaseClient;
pub use error::VoiceflowError;
pub use types::{product_table_schema, TableSchema};
