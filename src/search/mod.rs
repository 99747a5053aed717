pub mod engine;
pub mod format;
pub mod rank;

pub use engine::SearchEngine;
pub use format::SearchResult;
