pub mod item_processor;

pub use item_processor::ItemProcessor;
