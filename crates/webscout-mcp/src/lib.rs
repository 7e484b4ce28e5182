pub mod dispatch;
pub mod tool;

pub use dispatch::Dispatcher;
pub use tool::{Category, SearchTool};

pub use webscout_core as core;
