//! # Daedalus
//!
//! **Project ingestion and UML diagram service for the Themis Platform**
//!
//! Daedalus accepts uploaded source archives, extracts them safely,
//! scans the sources into a class model, and serves UML artifacts:
//!
//! - 📦 **Safe Ingestion** – ZIP extraction with path-traversal containment and resource caps
//! - 🔁 **Explicit Lifecycle** – `UPLOADED → EXTRACTED → PARSED → ARTIFACTS_READY`, with `FAILED` and `DELETED`
//! - 📐 **Diagram Artifacts** – PlantUML class-diagram text and a rendered SVG per project
//! - ⚡ **Async Serving** – Hyper/Tokio HTTP boundary with graceful shutdown
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use daedalus::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::builder()
//!         .http_addr("0.0.0.0:8080")
//!         .build();
//!
//!     Server::new(config).run().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! Each upload runs the ingestion pipeline to completion before the
//! response is produced:
//!
//! ```text
//! POST /api/projects → extract → scan → PlantUML model
//!                                            ↓
//! GET /api/uml/{plant-uml-code,svg}/{id} ←───┘
//! ```

#![doc(html_root_url = "https://docs.rs/daedalus/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Crate version, as reported by `--version`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Re-export core types
pub use daedalus_core as core;

// Re-export archive extraction
pub use daedalus_archive as archive;

// Re-export the source scanner and diagram renderers
pub use daedalus_parser as parser;

// Re-export the ingestion engine
pub use daedalus_engine as engine;

// Re-export server types
pub use daedalus_server as server;

// Re-export telemetry initialization
pub use daedalus_telemetry as telemetry;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust,ignore
/// use daedalus::prelude::*;
/// ```
pub mod prelude {
    pub use daedalus_core::{
        DaedalusError, DaedalusResult, ErrorEnvelope, ProjectId, ProjectRecord, ProjectState,
        ProjectStore,
    };

    // Re-export the extraction caps
    pub use daedalus_archive::ExtractLimits;

    // Re-export the parsing service
    pub use daedalus_parser::ParsingService;

    // Re-export the engine entry points
    pub use daedalus_engine::{ArtifactRetriever, IngestionPipeline};

    // Re-export the server surface
    pub use daedalus_server::{AppState, Server, ServerConfig, ServerError};

    // Re-export telemetry initialization
    pub use daedalus_telemetry::{init_logging, LogConfig};
}
