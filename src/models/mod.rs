pub mod extraction;
pub mod item;
pub mod payload;
pub mod status;

pub use extraction::{ExtractionResult, SiteId};
pub use item::{validate_rows, IsbnItem, ProcessingResult};
pub use payload::parse_batch_payload;
pub use status::{ProcessingStatus, StatusRecord};
