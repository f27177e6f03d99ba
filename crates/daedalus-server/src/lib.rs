//! # Daedalus Server
//!
//! HTTP boundary for the Daedalus diagram service.
//!
//! This crate provides the server infrastructure:
//!
//! - HTTP/1.1 serving via Hyper with graceful shutdown
//! - Routing with `{param}` path templates
//! - The upload and artifact-retrieval endpoints with hypermedia links
//! - Error-envelope rendering of the service failure taxonomy
//!
//! ## Endpoints
//!
//! | Method | Path | Purpose |
//! |---|---|---|
//! | `POST` | `/api/projects` | Ingest an uploaded ZIP archive |
//! | `GET` | `/api/projects/{projectId}` | Project resource with links |
//! | `GET` | `/api/uml/plant-uml-code/{projectId}` | PlantUML text artifact |
//! | `GET` | `/api/uml/svg/{projectId}` | Rendered SVG artifact |
//! | `DELETE` | `/api/projects/{projectId}/parsed` | Discard the parsed representation |
//! | `GET` | `/health` | Liveness |

#![doc(html_root_url = "https://docs.rs/daedalus-server/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod links;
mod router;
mod routes;
mod server;
mod shutdown;

pub use config::{ServerConfig, ServerConfigBuilder};
pub use links::{Link, ResourceLinks};
pub use router::{Operation, RouteMatch, Router};
pub use routes::AppState;
pub use server::{Server, ServerError};
pub use shutdown::{ConnectionTracker, ShutdownSignal};
