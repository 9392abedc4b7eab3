//! # packrat-core
//!
//! Core types, traits, and abstractions for the packrat note store.
//!
//! This crate provides the foundational data structures and trait definitions
//! that other packrat crates depend on.

pub mod activity;
pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use activity::ActivityKind;
pub use error::{Error, Result};
pub use models::*;
pub use traits::*;
