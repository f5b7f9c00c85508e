//! CLI command handlers.

mod backend;
mod fetch;

pub use backend::{run_bucket, run_doc};
pub use fetch::run_fetch;
