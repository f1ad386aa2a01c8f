pub mod store;
pub mod types;

pub use store::{RunStore, INTERRUPTED};
pub use types::{RunRecord, RunStatus, RunUpdate};
