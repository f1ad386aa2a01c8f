pub mod handlers;
pub mod server;

pub use handlers::{AppState, CreateRunRequest, FeedbackRequest, RunView, WorkflowFactory};
pub use server::{router, ReviewServer};
