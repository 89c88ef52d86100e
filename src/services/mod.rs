pub mod price_parser;
pub mod queue_consumer;
pub mod sheet_reconciler;
pub mod status_tracker;

pub use queue_consumer::{ConsumeStats, MessageSource, QueueConsumer, QueueMessage};
pub use sheet_reconciler::{InMemorySheet, SheetReconciler, SheetWriter};
pub use status_tracker::{InMemoryStatusStore, StatusStore};
