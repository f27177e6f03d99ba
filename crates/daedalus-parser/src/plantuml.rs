//! PlantUML text generation.
//!
//! Renders a [`ParsedProject`] as a deterministic PlantUML class
//! diagram: one declaration line per type (sorted by name), then one
//! edge line per inheritance relation. The output always begins with
//! `@startuml` and ends with `@enduml`.

use crate::model::ParsedProject;

/// The opening marker of the textual diagram format.
pub const START_MARKER: &str = "@startuml";

/// The closing marker of the textual diagram format.
pub const END_MARKER: &str = "@enduml";

/// Renders the PlantUML description of `parsed`.
#[must_use]
pub fn render(parsed: &ParsedProject) -> String {
    let mut out = String::from(START_MARKER);
    out.push('\n');

    for decl in &parsed.types {
        out.push_str(decl.kind.keyword());
        out.push(' ');
        out.push_str(&decl.name);
        out.push('\n');
    }

    if !parsed.relations.is_empty() {
        out.push('\n');
        for relation in &parsed.relations {
            out.push_str(&relation.from);
            out.push(' ');
            out.push_str(relation.kind.arrow());
            out.push(' ');
            out.push_str(&relation.to);
            out.push('\n');
        }
    }

    out.push_str(END_MARKER);
    out
}
