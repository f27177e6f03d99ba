//! # Daedalus Engine
//!
//! Orchestration for the Daedalus diagram service: the ingestion
//! pipeline that takes a project from uploaded archive bytes to a
//! parsed representation, and the artifact retriever that serves
//! diagram artifacts with a typed failure taxonomy.
//!
//! The engine owns no state of its own — it composes the shared
//! [`ProjectStore`](daedalus_core::ProjectStore) and
//! [`ParsingService`](daedalus_parser::ParsingService), both internally
//! synchronized, and performs single atomic state transitions per step.
//! No lock is held across a blocking call into another component.

#![doc(html_root_url = "https://docs.rs/daedalus-engine/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod pipeline;
mod retrieve;

pub use pipeline::IngestionPipeline;
pub use retrieve::ArtifactRetriever;
