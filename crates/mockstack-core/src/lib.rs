//! Core building blocks shared by MockStack service emulators.
//!
//! This crate holds the pieces that are not specific to any one emulated
//! service: the core error type, tracing subscriber setup, and the
//! name-token pagination helper used by every name-sorted listing.

mod error;
pub mod pagination;
pub mod telemetry;

pub use error::{MockStackError, MockStackResult};
pub use pagination::{Page, find_start_index, paginate};
