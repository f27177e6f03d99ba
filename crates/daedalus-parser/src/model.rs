//! Parsed-project model.

use daedalus_core::ProjectId;

/// Kind of a scanned Java type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// `class` (records are modeled as classes).
    Class,
    /// `interface`.
    Interface,
    /// `enum`.
    Enum,
}

impl TypeKind {
    /// The PlantUML keyword for this kind.
    #[must_use]
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Enum => "enum",
        }
    }
}

/// One scanned type declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    /// Simple type name.
    pub name: String,
    /// Declaration kind.
    pub kind: TypeKind,
}

/// Kind of inheritance edge between two types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    /// `extends` — rendered `--|>`.
    Extends,
    /// `implements` — rendered `..|>`.
    Implements,
}

impl RelationKind {
    /// The PlantUML arrow for this edge.
    #[must_use]
    pub const fn arrow(&self) -> &'static str {
        match self {
            Self::Extends => "--|>",
            Self::Implements => "..|>",
        }
    }
}

/// One inheritance edge, `from` pointing at `to`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    /// The subtype.
    pub from: String,
    /// The supertype or implemented interface.
    pub to: String,
    /// Edge kind.
    pub kind: RelationKind,
}

/// The opaque parsed representation of one project's sources.
///
/// Owned by the [`ParsingService`](crate::ParsingService) handle
/// registry; the project store holds only a non-owning handle reference.
#[derive(Debug, Clone)]
pub struct ParsedProject {
    /// The project this representation was parsed from.
    pub project_id: ProjectId,
    /// Scanned declarations, sorted by name.
    pub types: Vec<TypeDecl>,
    /// Inheritance edges, sorted by (from, to).
    pub relations: Vec<Relation>,
    /// Number of `.java` files scanned.
    pub source_files: usize,
}
