//! Shared test utilities for the opencode-synced workspace.
//!
//! This crate provides standardised fixtures so crate test suites do not each
//! rebuild a fake home directory and sync repository. It is a dev-dependency
//! only, never published.
//!
//! # Modules
//!
//! - [`git`]: git repository fixtures built with `git2`
//! - [`home`]: [`TestHome`] with a sandboxed home directory and sync repository

pub mod git;
pub mod home;

pub use home::TestHome;
