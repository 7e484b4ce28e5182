pub mod extract;
pub mod search;

pub use extract::ContentExtractor;
pub use search::StaticSearchBackend;
