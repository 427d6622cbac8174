//! Shared test utilities for runlog integration harnesses.
//!
//! Import everything you need via `mod common; use common::*;` at the top of
//! each harness file. Every store helper works inside its own temporary
//! directory, so harnesses can run in parallel.

pub mod assertions;
pub mod builders;

pub use assertions::*;
pub use builders::*;
pub use fixtures::*;
