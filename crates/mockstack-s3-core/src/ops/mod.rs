//! S3 operations.
//!
//! This module contains the implementations of all engine operations,
//! organized into submodules by category. Each submodule adds methods to
//! [`crate::provider::MockStackS3`].

pub mod bucket;
pub mod list;
pub mod multipart;
pub mod object;
