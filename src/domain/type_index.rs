// Crate-wide type index.
// Built in parallel over all units before the metric pass; backs the
// hierarchy metric and tells the engine where a type's impls live.

use crate::domain::record::TypeKind;
use crate::domain::unit::{impl_target, CompilationUnit};
use dashmap::DashMap;
use std::collections::HashSet;
use syn::{Item, TypeParamBound};

/// Thread-safe index of trait relationships across the whole input set.
pub struct TypeIndex {
    /// trait name -> supertrait names
    supertraits: DashMap<String, Vec<String>>,

    /// trait name -> number of impl blocks targeting it
    implementors: DashMap<String, u32>,

    /// type name -> traits it implements
    implemented: DashMap<String, Vec<String>>,

    /// type name -> indices of units containing impl blocks for it
    impl_sites: DashMap<String, Vec<usize>>,
}

impl Default for TypeIndex {
    fn default() -> Self {
        Self {
            supertraits: DashMap::new(),
            implementors: DashMap::new(),
            implemented: DashMap::new(),
            impl_sites: DashMap::new(),
        }
    }
}

impl TypeIndex {
    /// Build the index from all units in parallel.
    pub fn build(units: &[CompilationUnit]) -> Self {
        use rayon::prelude::*;

        let index = TypeIndex::default();
        units.par_iter().enumerate().for_each(|(unit_idx, unit)| {
            index.index_items(&unit.ast.items, unit_idx);
        });
        index
    }

    /// Depth of a trait in the supertrait hierarchy. A trait with no known
    /// supertraits has depth 1; cycles are cut by the visited set.
    pub fn trait_depth(&self, trait_name: &str) -> u32 {
        let mut visited = HashSet::new();
        self.depth_rec(trait_name, &mut visited)
    }

    /// Hierarchy depth for a record's type: traits use their supertrait
    /// chain, other types the deepest trait they implement (0 if none).
    pub fn depth_of(&self, type_name: &str, kind: TypeKind) -> u32 {
        match kind {
            TypeKind::Trait => self.trait_depth(type_name),
            TypeKind::Struct | TypeKind::Enum => self
                .traits_of(type_name)
                .iter()
                .map(|t| self.trait_depth(t))
                .max()
                .unwrap_or(0),
        }
    }

    /// Number of impl blocks targeting a trait across all units.
    pub fn children_of(&self, trait_name: &str) -> u32 {
        self.implementors
            .get(trait_name)
            .map(|count| *count)
            .unwrap_or(0)
    }

    /// Traits a type implements. Returns clones to avoid holding locks.
    pub fn traits_of(&self, type_name: &str) -> Vec<String> {
        self.implemented
            .get(type_name)
            .map(|traits| traits.clone())
            .unwrap_or_default()
    }

    /// Unit indices holding impl blocks for a type, sorted and deduplicated.
    pub fn impl_sites_of(&self, type_name: &str) -> Vec<usize> {
        let mut sites = self
            .impl_sites
            .get(type_name)
            .map(|sites| sites.clone())
            .unwrap_or_default();
        sites.sort_unstable();
        sites.dedup();
        sites
    }

    fn depth_rec(&self, trait_name: &str, visited: &mut HashSet<String>) -> u32 {
        if !visited.insert(trait_name.to_string()) {
            return 0;
        }
        let supers = self
            .supertraits
            .get(trait_name)
            .map(|s| s.clone())
            .unwrap_or_default();
        1 + supers
            .iter()
            .map(|s| self.depth_rec(s, visited))
            .max()
            .unwrap_or(0)
    }

    /// Index all items in a list (recursive for nested modules).
    fn index_items(&self, items: &[Item], unit_idx: usize) {
        for item in items {
            match item {
                Item::Trait(tr) => {
                    let supers: Vec<String> = tr
                        .supertraits
                        .iter()
                        .filter_map(|bound| match bound {
                            TypeParamBound::Trait(tb) => tb
                                .path
                                .segments
                                .last()
                                .map(|segment| segment.ident.to_string()),
                            _ => None,
                        })
                        .collect();
                    self.supertraits.insert(tr.ident.to_string(), supers);
                }
                Item::Impl(imp) => {
                    if let Some(type_name) = impl_target(imp) {
                        self.impl_sites
                            .entry(type_name.clone())
                            .or_default()
                            .push(unit_idx);

                        if let Some((_, trait_path, _)) = &imp.trait_ {
                            if let Some(segment) = trait_path.segments.last() {
                                let trait_name = segment.ident.to_string();
                                *self.implementors.entry(trait_name.clone()).or_insert(0) += 1;
                                self.implemented
                                    .entry(type_name)
                                    .or_default()
                                    .push(trait_name);
                            }
                        }
                    }
                }
                Item::Mod(module) => {
                    if let Some((_, content)) = &module.content {
                        self.index_items(content, unit_idx);
                    }
                }
                _ => {}
            }
        }
    }
}
