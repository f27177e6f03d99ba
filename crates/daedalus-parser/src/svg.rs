//! SVG rendering of the class diagram.
//!
//! A deliberately small renderer: each type becomes a labeled box laid
//! out in a grid, each inheritance edge a line between box centers. The
//! renderer operates on the same textual description served to clients,
//! and embeds that description verbatim in a `<desc>` element — so the
//! image bytes, read as text, still carry the `@startuml`/`@enduml`
//! markers.

use crate::model::ParsedProject;
use crate::plantuml;
use std::collections::HashMap;
use std::fmt::Write;

/// Content type of the rendered image.
pub const CONTENT_TYPE: &str = "image/svg+xml";

const BOX_WIDTH: u32 = 180;
const BOX_HEIGHT: u32 = 48;
const GAP: u32 = 40;
const COLUMNS: u32 = 4;

/// Renders `parsed` as an SVG document.
#[must_use]
pub fn render(parsed: &ParsedProject) -> String {
    let count = parsed.types.len() as u32;
    let columns = COLUMNS.min(count.max(1));
    let rows = count.div_ceil(columns).max(1);
    let width = columns * (BOX_WIDTH + GAP) + GAP;
    let height = rows * (BOX_HEIGHT + GAP) + GAP;

    // Box center per type name, for edge endpoints.
    let mut centers: HashMap<&str, (u32, u32)> = HashMap::new();

    let mut body = String::new();
    for (i, decl) in parsed.types.iter().enumerate() {
        let col = i as u32 % columns;
        let row = i as u32 / columns;
        let x = GAP + col * (BOX_WIDTH + GAP);
        let y = GAP + row * (BOX_HEIGHT + GAP);
        centers.insert(&decl.name, (x + BOX_WIDTH / 2, y + BOX_HEIGHT / 2));

        let _ = write!(
            body,
            r##"<g><rect x="{x}" y="{y}" width="{BOX_WIDTH}" height="{BOX_HEIGHT}" fill="#fdfdfd" stroke="#333"/><text x="{tx}" y="{ty}" text-anchor="middle" font-family="monospace" font-size="12">{label}</text></g>"##,
            tx = x + BOX_WIDTH / 2,
            ty = y + BOX_HEIGHT / 2 + 4,
            label = escape_xml(&format!("{} {}", decl.kind.keyword(), decl.name)),
        );
        body.push('\n');
    }

    for relation in &parsed.relations {
        let (Some(&(x1, y1)), Some(&(x2, y2))) = (
            centers.get(relation.from.as_str()),
            centers.get(relation.to.as_str()),
        ) else {
            // Edges to types outside the scanned project have no box.
            continue;
        };
        let _ = write!(
            body,
            r##"<line x1="{x1}" y1="{y1}" x2="{x2}" y2="{y2}" stroke="#666" stroke-dasharray="4"/>"##,
        );
        body.push('\n');
    }

    let uml = plantuml::render(parsed);
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">\n<desc>{desc}</desc>\n{body}</svg>\n",
        desc = escape_xml(&uml),
    )
}

/// Escapes text for embedding in XML content.
fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Relation, RelationKind, TypeDecl, TypeKind};
    use daedalus_core::ProjectId;

    fn sample() -> ParsedProject {
        ParsedProject {
            project_id: ProjectId::new(),
            types: vec![
                TypeDecl {
                    name: "Base".into(),
                    kind: TypeKind::Class,
                },
                TypeDecl {
                    name: "Child".into(),
                    kind: TypeKind::Class,
                },
            ],
            relations: vec![Relation {
                from: "Child".into(),
                to: "Base".into(),
                kind: RelationKind::Extends,
            }],
            source_files: 2,
        }
    }

    #[test]
    fn svg_embeds_uml_markers() {
        let svg = render(&sample());
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("@startuml"));
        assert!(svg.contains("@enduml"));
    }

    #[test]
    fn svg_draws_a_box_per_type_and_edge_lines() {
        let svg = render(&sample());
        assert_eq!(svg.matches("<rect").count(), 2);
        assert_eq!(svg.matches("<line").count(), 1);
    }

    #[test]
    fn rendering_is_deterministic() {
        let parsed = sample();
        assert_eq!(render(&parsed), render(&parsed));
    }

    #[test]
    fn edges_to_undeclared_types_are_skipped() {
        let mut parsed = sample();
        parsed.relations.push(Relation {
            from: "Child".into(),
            to: "Serializable".into(),
            kind: RelationKind::Implements,
        });
        let svg = render(&parsed);
        assert_eq!(svg.matches("<line").count(), 1);
    }
}
