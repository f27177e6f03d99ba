//! Hypermedia link building.
//!
//! Every resource response carries a `_links` object cross-referencing
//! the project resource and both of its artifacts, so a client can
//! navigate from any one of them to the others.

use daedalus_core::ProjectId;
use serde::{Deserialize, Serialize};

/// A single hypermedia link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// The target URI.
    pub href: String,
}

impl Link {
    /// Creates a link to `href`.
    #[must_use]
    pub fn new(href: impl Into<String>) -> Self {
        Self { href: href.into() }
    }
}

/// The `_links` object attached to project and artifact resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLinks {
    /// The resource itself.
    #[serde(rename = "self")]
    pub self_link: Link,

    /// The owning project resource.
    #[serde(rename = "projectInfo")]
    pub project_info: Link,

    /// The PlantUML text artifact.
    #[serde(rename = "umlText")]
    pub uml_text: Link,

    /// The rendered SVG artifact.
    #[serde(rename = "umlSvg")]
    pub uml_svg: Link,
}

/// URI of the project resource.
#[must_use]
pub fn project_uri(id: ProjectId) -> String {
    format!("/api/projects/{id}")
}

/// URI of the PlantUML text artifact.
#[must_use]
pub fn uml_text_uri(id: ProjectId) -> String {
    format!("/api/uml/plant-uml-code/{id}")
}

/// URI of the SVG artifact.
#[must_use]
pub fn uml_svg_uri(id: ProjectId) -> String {
    format!("/api/uml/svg/{id}")
}

impl ResourceLinks {
    /// Links for the project resource itself.
    #[must_use]
    pub fn for_project(id: ProjectId) -> Self {
        Self::with_self(id, project_uri(id))
    }

    /// Links for the text artifact resource.
    #[must_use]
    pub fn for_uml_text(id: ProjectId) -> Self {
        Self::with_self(id, uml_text_uri(id))
    }

    /// Links for the SVG artifact resource.
    #[must_use]
    pub fn for_uml_svg(id: ProjectId) -> Self {
        Self::with_self(id, uml_svg_uri(id))
    }

    fn with_self(id: ProjectId, self_href: String) -> Self {
        Self {
            self_link: Link::new(self_href),
            project_info: Link::new(project_uri(id)),
            uml_text: Link::new(uml_text_uri(id)),
            uml_svg: Link::new(uml_svg_uri(id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn links_cross_reference_both_artifacts_and_the_project() {
        let id = ProjectId::new();
        let links = ResourceLinks::for_uml_text(id);

        assert_eq!(links.self_link.href, format!("/api/uml/plant-uml-code/{id}"));
        assert_eq!(links.uml_svg.href, format!("/api/uml/svg/{id}"));
        assert_eq!(links.project_info.href, format!("/api/projects/{id}"));
    }

    #[test]
    fn project_links_are_self_referential() {
        let id = ProjectId::new();
        let links = ResourceLinks::for_project(id);
        assert_eq!(links.self_link, links.project_info);
    }

    #[test]
    fn links_serialize_with_hal_style_names() {
        let id = ProjectId::new();
        let json = serde_json::to_value(ResourceLinks::for_project(id)).unwrap();
        assert!(json.get("self").is_some());
        assert!(json.get("umlText").is_some());
        assert!(json.get("umlSvg").is_some());
        assert!(json.get("projectInfo").is_some());
    }
}
