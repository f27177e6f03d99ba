//! Declaration scanner for extracted Java trees.
//!
//! A lightweight regex scan, not a full Java parse: it recognizes
//! top-level and nested `class`/`interface`/`enum`/`record` declarations
//! together with their `extends`/`implements` clauses, which is exactly
//! what the class diagram needs. Generic parameters and qualified names
//! are reduced to simple names.

use crate::model::{ParsedProject, Relation, RelationKind, TypeDecl, TypeKind};
use daedalus_core::ProjectId;
use regex::Regex;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::OnceLock;
use walkdir::WalkDir;

/// Matches a type declaration header up to its opening brace.
fn declaration_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let pattern = concat!(
            r"(?m)^[ \t]*(?:(?:public|protected|private|abstract|final|static|strictfp|sealed)\s+)*",
            r"(class|interface|enum|record)\s+(\w+)(?:\s*<[^>{]*>)?",
            r"(?:\s+extends\s+([\w.,\s<>]+?))?(?:\s+implements\s+([\w.,\s<>]+?))?\s*[{(]",
        );
        Regex::new(pattern).expect("declaration regex is valid")
    })
}

/// Scans the extracted tree rooted at `root` into a [`ParsedProject`].
///
/// Reads every `.java` file under `root` (any depth). Files that are
/// not valid UTF-8 are skipped with a warning rather than failing the
/// scan. Returns the number of source files seen alongside the model so
/// the caller can distinguish "no sources" from "sources without types".
///
/// # Errors
///
/// Returns an I/O error when the tree cannot be walked or a source file
/// cannot be read.
pub fn scan_tree(project_id: ProjectId, root: &Path) -> io::Result<ParsedProject> {
    let mut types: Vec<TypeDecl> = Vec::new();
    let mut relations: Vec<Relation> = Vec::new();
    let mut source_files = 0;

    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry.map_err(io::Error::other)?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension().map_or(true, |ext| ext != "java") {
            continue;
        }

        source_files += 1;
        let bytes = fs::read(entry.path())?;
        let Ok(source) = String::from_utf8(bytes) else {
            tracing::warn!(file = %entry.path().display(), "skipping non-UTF-8 source file");
            continue;
        };

        scan_source(&source, &mut types, &mut relations);
    }

    types.sort_by(|a, b| a.name.cmp(&b.name));
    types.dedup();
    relations.sort_by(|a, b| (&a.from, &a.to).cmp(&(&b.from, &b.to)));
    relations.dedup();

    Ok(ParsedProject {
        project_id,
        types,
        relations,
        source_files,
    })
}

/// Scans one source file's text for declarations.
fn scan_source(source: &str, types: &mut Vec<TypeDecl>, relations: &mut Vec<Relation>) {
    for captures in declaration_regex().captures_iter(source) {
        let kind = match &captures[1] {
            "interface" => TypeKind::Interface,
            "enum" => TypeKind::Enum,
            _ => TypeKind::Class,
        };
        let name = captures[2].to_string();

        if let Some(extends) = captures.get(3) {
            for parent in split_type_list(extends.as_str()) {
                relations.push(Relation {
                    from: name.clone(),
                    to: parent,
                    // An interface extending an interface is still an
                    // inheritance edge.
                    kind: RelationKind::Extends,
                });
            }
        }
        if let Some(implements) = captures.get(4) {
            for iface in split_type_list(implements.as_str()) {
                relations.push(Relation {
                    from: name.clone(),
                    to: iface,
                    kind: RelationKind::Implements,
                });
            }
        }

        types.push(TypeDecl { name, kind });
    }
}

/// Splits `A, B<T>, com.acme.C` into simple names `[A, B, C]`.
fn split_type_list(list: &str) -> Vec<String> {
    let mut depth = 0usize;
    let mut names = Vec::new();
    let mut current = String::new();

    for ch in list.chars() {
        match ch {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                push_simple_name(&mut names, &current);
                current.clear();
            }
            _ if depth == 0 => current.push(ch),
            _ => {}
        }
    }
    push_simple_name(&mut names, &current);
    names
}

fn push_simple_name(names: &mut Vec<String>, raw: &str) {
    let simple = raw
        .trim()
        .rsplit('.')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string();
    if !simple.is_empty() {
        names.push(simple);
    }
}
