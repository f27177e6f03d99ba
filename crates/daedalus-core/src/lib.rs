//! # Daedalus Core
//!
//! Core types for the Daedalus diagram service.
//!
//! This crate provides the foundational types shared by every other
//! Daedalus crate:
//!
//! - [`ProjectId`] - UUID v7 project identifier
//! - [`ProjectState`] - Tagged lifecycle state of an uploaded project
//! - [`ProjectRecord`] - Durable record of one uploaded project
//! - [`ProjectStore`] - Thread-safe in-memory registry of project records
//! - [`DaedalusError`] - Standard error taxonomy with HTTP mapping

#![doc(html_root_url = "https://docs.rs/daedalus-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod project;
mod store;

pub use error::{DaedalusError, DaedalusResult, ErrorEnvelope};
pub use project::{FailureCause, HandleId, ProjectId, ProjectRecord, ProjectState};
pub use store::ProjectStore;
