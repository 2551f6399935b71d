//! Synchronization runs: Shopify catalog and storefront pages into the
//! Voiceflow knowledge base.

pub mod error;
pub mod pipeline;
pub mod session;

pub use error::SyncError;
pub use pipeline::{ClientSettings, SyncPipeline, PRODUCT_TABLE_NAME};
pub use session::{ConfiguredSession, SessionResolver, SyncContext, VoiceflowSettings};
