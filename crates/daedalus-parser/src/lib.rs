//! # Daedalus Parser
//!
//! Java source scanning and diagram artifact generation.
//!
//! [`ParsingService`] consumes an extracted directory tree, scans its
//! `.java` files for type declarations and inheritance clauses, and
//! keeps the resulting [`ParsedProject`] under an opaque handle. From a
//! held handle it generates the two diagram artifacts:
//!
//! - [`ParsingService::uml_text`] — a PlantUML class-diagram description
//!   bracketed by `@startuml` / `@enduml`
//! - [`ParsingService::uml_svg`] — an SVG rendering of the same
//!   description, with the textual form embedded in the image
//!
//! Handles can be discarded independently of the project store that
//! references them; consumers re-resolve a handle at the moment of use.

#![doc(html_root_url = "https://docs.rs/daedalus-parser/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod model;
mod plantuml;
mod scanner;
mod service;
mod svg;

pub use model::{ParsedProject, Relation, RelationKind, TypeDecl, TypeKind};
pub use scanner::scan_tree;
pub use service::{ParseError, ParsingService};
