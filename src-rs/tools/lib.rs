pub mod registry;
pub mod types;
pub mod weekend;

pub use registry::ToolRegistry;
pub use types::{ToolEntry, ToolHandler, ToolResult, ToolSchema};
pub use weekend::register_weekend_tools;
