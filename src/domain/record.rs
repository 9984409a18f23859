// Metric record structures for Metricraft.
// One record accumulates every metric value computed for a single named type.

use serde::{Deserialize, Serialize};

/// Kind of type declaration a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeKind {
    Struct,
    Enum,
    Trait,
}

impl TypeKind {
    /// Display name used in reports.
    pub fn name(&self) -> &'static str {
        match self {
            TypeKind::Struct => "struct",
            TypeKind::Enum => "enum",
            TypeKind::Trait => "trait",
        }
    }
}

impl std::fmt::Display for TypeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Result accumulator for one type under measurement.
///
/// Metric implementations write their findings into these fields; the
/// engine creates one record per declared type and hands it to every
/// metric in the suite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeRecord {
    pub crate_name: String,
    pub file_path: String,
    pub type_name: String,
    pub kind: TypeKind,
    /// Line of the declaration in `file_path`.
    pub line: usize,

    /// Number of methods (inherent and trait-impl fns; trait items for traits).
    pub nom: u32,
    /// Number of fields (struct fields; enum variants; 0 for traits).
    pub nof: u32,
    /// Weighted methods: summed cyclomatic complexity of all methods.
    pub wmc: u32,
    /// Coupling between types: distinct foreign types referenced.
    pub cbo: u32,
    /// Response set: methods plus distinct outgoing call names.
    pub rfc: u32,
    /// Lack of cohesion of methods (LCOM1).
    pub lcom: u32,
    /// Depth of the trait hierarchy the type sits under.
    pub dit: u32,
    /// Number of children: impls of a trait across the codebase.
    pub noc: u32,
    /// Source lines spanned by the declaration and its impl blocks.
    pub loc: u32,

    /// Names behind the `cbo` count, sorted. Feeds the coupling-graph export.
    pub couplings: Vec<String>,
}

impl TypeRecord {
    pub fn new(
        crate_name: &str,
        file_path: &str,
        type_name: &str,
        kind: TypeKind,
        line: usize,
    ) -> Self {
        Self {
            crate_name: crate_name.to_string(),
            file_path: file_path.to_string(),
            type_name: type_name.to_string(),
            kind,
            line,
            nom: 0,
            nof: 0,
            wmc: 0,
            cbo: 0,
            rfc: 0,
            lcom: 0,
            dit: 0,
            noc: 0,
            loc: 0,
            couplings: Vec::new(),
        }
    }

    /// Key used in reports and stores: `crate::Type`.
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.crate_name, self.type_name)
    }
}
