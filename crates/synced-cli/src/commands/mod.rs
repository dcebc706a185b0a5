//! Command implementations for synced-cli

pub mod diff;
pub mod locations;
pub mod plan;
pub mod status;
pub mod sync;

pub use diff::run_diff;
pub use locations::run_locations;
pub use plan::run_plan;
pub use status::run_status;
pub use sync::{run_pull, run_push};
