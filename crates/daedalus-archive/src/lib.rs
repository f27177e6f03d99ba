//! # Daedalus Archive
//!
//! Zip-slip-safe archive extraction for the Daedalus ingestion pipeline.
//!
//! This crate validates and extracts a single untrusted ZIP archive into
//! a destination directory, rejecting any entry whose resolved path
//! would escape that directory. Entry names are attacker-controlled, so
//! containment is checked against canonical (real) paths rather than
//! lexical prefixes alone — a lexical pre-check rejects the obvious
//! `..`/absolute names fast, and a canonicalized parent check defeats
//! symlink and normalization tricks.
//!
//! Extraction is a pure function of its inputs: no process-wide state,
//! all file handles scope-owned so every exit path releases them.
//!
//! # Example
//!
//! ```rust,no_run
//! use daedalus_archive::{extract, ExtractLimits};
//! use std::fs::File;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), daedalus_archive::ExtractError> {
//! let archive = File::open("project.zip")?;
//! let dest = extract(archive, Path::new("/tmp/project"), &ExtractLimits::default())?;
//! println!("extracted to {}", dest.display());
//! # Ok(())
//! # }
//! ```

#![doc(html_root_url = "https://docs.rs/daedalus-archive/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod extract;
mod limits;

pub use extract::{extract, extract_path, ExtractError};
pub use limits::ExtractLimits;
