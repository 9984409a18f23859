// Parsed compilation units.
// A unit wraps one source file's syn AST together with its origin, and
// knows how to enumerate the type declarations and impl blocks inside it.

use crate::domain::record::TypeKind;
use rayon::prelude::*;
use syn::{Attribute, Item, ItemEnum, ItemImpl, ItemStruct, ItemTrait, Type};

/// One parsed source file.
pub struct CompilationUnit {
    pub crate_name: String,
    pub file_path: String,
    pub ast: syn::File,
}

/// A type declaration found inside a unit.
#[derive(Debug, Clone)]
pub struct TypeDecl {
    pub name: String,
    pub kind: TypeKind,
    pub line: usize,
}

/// The declaration of a named type, by kind.
pub enum TypeDeclRef<'a> {
    Struct(&'a ItemStruct),
    Enum(&'a ItemEnum),
    Trait(&'a ItemTrait),
}

/// Everything in one unit that belongs to a named type: the declaration
/// (when this unit declares it) and the impl blocks targeting it.
pub struct TypeItems<'a> {
    pub decl: Option<TypeDeclRef<'a>>,
    pub impls: Vec<&'a ItemImpl>,
}

/// Uniform view over a method, whether it comes from an impl block or a
/// trait declaration (where the body may be a default or absent).
pub struct MethodView<'a> {
    pub sig: &'a syn::Signature,
    pub block: Option<&'a syn::Block>,
}

impl CompilationUnit {
    /// Parse source text into a unit. Returns None on syntax errors; the
    /// caller decides how to report the skip.
    pub fn parse(crate_name: &str, file_path: &str, source: &str) -> Option<Self> {
        match syn::parse_file(source) {
            Ok(ast) => Some(Self {
                crate_name: crate_name.to_string(),
                file_path: file_path.to_string(),
                ast,
            }),
            Err(e) => {
                eprintln!("[metricraft] WARN: failed to parse {}: {}", file_path, e);
                None
            }
        }
    }

    /// All struct/enum/trait declarations in this unit, recursing into
    /// inline modules. Declarations inside `#[cfg(test)]` modules are
    /// skipped unless `include_tests` is set.
    pub fn type_decls(&self, include_tests: bool) -> Vec<TypeDecl> {
        let mut decls = Vec::new();
        collect_decls(&self.ast.items, include_tests, &mut decls);
        decls
    }

    /// Collect the declaration and impl blocks for a named type.
    pub fn items_for(&self, type_name: &str) -> TypeItems<'_> {
        let mut items = TypeItems {
            decl: None,
            impls: Vec::new(),
        };
        collect_items_for(&self.ast.items, type_name, &mut items);
        items
    }
}

impl<'a> TypeItems<'a> {
    /// Methods of the type visible in this unit: fns from every impl
    /// block, plus the trait's own items when the type is a trait.
    pub fn methods(&self) -> Vec<MethodView<'a>> {
        let mut methods = Vec::new();
        for imp in &self.impls {
            for item in &imp.items {
                if let syn::ImplItem::Fn(method) = item {
                    methods.push(MethodView {
                        sig: &method.sig,
                        block: Some(&method.block),
                    });
                }
            }
        }
        if let Some(TypeDeclRef::Trait(tr)) = &self.decl {
            for item in &tr.items {
                if let syn::TraitItem::Fn(method) = item {
                    methods.push(MethodView {
                        sig: &method.sig,
                        block: method.default.as_ref(),
                    });
                }
            }
        }
        methods
    }
}

/// Parse many `(crate_name, file_path, source)` triples in parallel.
/// Files that fail to parse are warned about and dropped.
pub fn parse_units(sources: &[(String, String, String)]) -> Vec<CompilationUnit> {
    sources
        .par_iter()
        .filter_map(|(crate_name, file_path, source)| {
            CompilationUnit::parse(crate_name, file_path, source)
        })
        .collect()
}

/// The type an impl block targets, by last path segment.
pub fn impl_target(imp: &ItemImpl) -> Option<String> {
    if let Type::Path(tp) = &*imp.self_ty {
        tp.path
            .segments
            .last()
            .map(|segment| segment.ident.to_string())
    } else {
        None
    }
}

fn is_cfg_test(attrs: &[Attribute]) -> bool {
    attrs.iter().any(|attr| {
        attr.path().is_ident("cfg")
            && matches!(&attr.meta, syn::Meta::List(list) if list.tokens.to_string().contains("test"))
    })
}

fn collect_decls(items: &[Item], include_tests: bool, out: &mut Vec<TypeDecl>) {
    for item in items {
        match item {
            Item::Struct(s) => out.push(TypeDecl {
                name: s.ident.to_string(),
                kind: TypeKind::Struct,
                line: s.ident.span().start().line,
            }),
            Item::Enum(e) => out.push(TypeDecl {
                name: e.ident.to_string(),
                kind: TypeKind::Enum,
                line: e.ident.span().start().line,
            }),
            Item::Trait(t) => out.push(TypeDecl {
                name: t.ident.to_string(),
                kind: TypeKind::Trait,
                line: t.ident.span().start().line,
            }),
            Item::Mod(module) => {
                if !include_tests && is_cfg_test(&module.attrs) {
                    continue;
                }
                if let Some((_, content)) = &module.content {
                    collect_decls(content, include_tests, out);
                }
            }
            _ => {}
        }
    }
}

fn collect_items_for<'a>(items: &'a [Item], type_name: &str, out: &mut TypeItems<'a>) {
    for item in items {
        match item {
            Item::Struct(s) if s.ident == type_name => {
                out.decl = Some(TypeDeclRef::Struct(s));
            }
            Item::Enum(e) if e.ident == type_name => {
                out.decl = Some(TypeDeclRef::Enum(e));
            }
            Item::Trait(t) if t.ident == type_name => {
                out.decl = Some(TypeDeclRef::Trait(t));
            }
            Item::Impl(imp) => {
                if impl_target(imp).as_deref() == Some(type_name) {
                    out.impls.push(imp);
                }
            }
            Item::Mod(module) => {
                if let Some((_, content)) = &module.content {
                    collect_items_for(content, type_name, out);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(source: &str) -> CompilationUnit {
        CompilationUnit::parse("app", "src/lib.rs", source).unwrap()
    }

    #[test]
    fn test_type_decls_found() {
        let unit = unit(
            r#"
            pub struct Widget { size: u32 }
            enum Mode { On, Off }
            trait Render { fn render(&self); }
            "#,
        );
        let decls = unit.type_decls(false);
        let names: Vec<&str> = decls.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Widget", "Mode", "Render"]);
        assert_eq!(decls[0].kind, TypeKind::Struct);
        assert_eq!(decls[2].kind, TypeKind::Trait);
    }

    #[test]
    fn test_nested_module_decls() {
        let unit = unit(
            r#"
            mod inner {
                pub struct Hidden;
            }
            "#,
        );
        let decls = unit.type_decls(false);
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].name, "Hidden");
    }

    #[test]
    fn test_cfg_test_modules_skipped() {
        let unit = unit(
            r#"
            pub struct Real;
            #[cfg(test)]
            mod tests {
                struct Fixture;
            }
            "#,
        );
        assert_eq!(unit.type_decls(false).len(), 1);
        assert_eq!(unit.type_decls(true).len(), 2);
    }

    #[test]
    fn test_items_for_collects_impls() {
        let unit = unit(
            r#"
            pub struct Widget { size: u32 }
            impl Widget {
                pub fn grow(&mut self) { self.size += 1; }
            }
            impl Default for Widget {
                fn default() -> Self { Widget { size: 0 } }
            }
            "#,
        );
        let items = unit.items_for("Widget");
        assert!(items.decl.is_some());
        assert_eq!(items.impls.len(), 2);
        assert_eq!(items.methods().len(), 2);
    }

    #[test]
    fn test_trait_methods_include_defaults() {
        let unit = unit(
            r#"
            trait Render {
                fn render(&self);
                fn clear(&self) {}
            }
            "#,
        );
        let items = unit.items_for("Render");
        let methods = items.methods();
        assert_eq!(methods.len(), 2);
        assert!(methods[0].block.is_none());
        assert!(methods[1].block.is_some());
    }

    #[test]
    fn test_parse_failure_is_dropped() {
        let sources = vec![
            (
                "app".to_string(),
                "good.rs".to_string(),
                "pub struct Ok;".to_string(),
            ),
            (
                "app".to_string(),
                "bad.rs".to_string(),
                "struct {{{".to_string(),
            ),
        ];
        let units = parse_units(&sources);
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].file_path, "good.rs");
    }
}
