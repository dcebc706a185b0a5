//! Filesystem primitives for opencode-synced
//!
//! Provides forward-slash path normalization, atomic writes, recursive copies,
//! content digests and format-aware config loading.

pub mod checksum;
pub mod config;
pub mod error;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use error::{Error, Result};
pub use path::NormalizedPath;
