//! Recipe resolution (spec §4.2, C2): inclusion merge (Pass A), then namespace merge,
//! name-uniqueness checking, per-node compilation and enum value assignment (Pass B).

use crate::error::CompileError;
use crate::file::FileResolver;
use crate::ir::{NodeContent, NodeTree, Path as RecPath, TypeInstantiation};
use crate::parser;
use std::collections::HashSet;
use std::path::{Path as FsPath, PathBuf};

pub struct Resolver<'a> {
    pub tree: &'a mut NodeTree,
    pub errors: Vec<CompileError>,
    file_resolver: &'a FileResolver,
    loaded: HashSet<PathBuf>,
}

impl<'a> Resolver<'a> {
    pub fn new(tree: &'a mut NodeTree, file_resolver: &'a FileResolver) -> Resolver<'a> {
        Resolver {
            tree,
            errors: Vec::new(),
            file_resolver,
            loaded: HashSet::new(),
        }
    }

    fn error(&mut self, e: CompileError) {
        self.errors.push(e);
    }

    /// Pass A: recursively merge `includes` into `root`, dropping member children of included
    /// files and reparenting their types/namespaces (spec §4.2 Pass A).
    pub fn merge_includes(
        &mut self,
        root: u32,
        includes: &[crate::ir::FileIndication],
        current_dir: &FsPath,
    ) {
        for indication in includes {
            let (path, text) = match self.file_resolver.read(indication, current_dir) {
                Ok(v) => v,
                Err(reason) => {
                    self.error(CompileError::Include {
                        path: indication.path.clone(),
                        reason,
                    });
                    continue;
                }
            };
            let canonical = path.canonicalize().unwrap_or(path.clone());
            if self.loaded.contains(&canonical) {
                continue;
            }
            self.loaded.insert(canonical);
            let parsed = match parser::parse_recipe_source(self.tree, &text) {
                Ok(p) => p,
                Err(e) => {
                    self.error(CompileError::Include {
                        path: indication.path.clone(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };
            let sub_dir = path.parent().unwrap_or(FsPath::new(".")).to_path_buf();
            self.merge_includes(parsed.root, &parsed.includes, &sub_dir);
            // Reparent type/namespace children of the included root into `root`; member
            // children are dropped (spec §4.2 Pass A).
            let children: Vec<u32> = self.tree.children(parsed.root).clone();
            for child in children {
                let keep = matches!(
                    self.tree.get(child).content,
                    NodeContent::RecNamespace
                        | NodeContent::RecStruct { .. }
                        | NodeContent::RecVariant
                        | NodeContent::RecEnum
                        | NodeContent::RecTypedef { .. }
                );
                if keep {
                    self.tree.reparent(child, root);
                }
            }
        }
    }

    /// Pass B: namespace merge, name-uniqueness, per-node compile.
    pub fn compile_tree(&mut self, root: u32) {
        self.merge_namespaces(root);
        self.check_name_uniqueness(root);
        self.compile_node(root, false);
    }

    fn merge_namespaces(&mut self, scope: u32) {
        let mut children = self.tree.children(scope).clone();
        let mut i = 0;
        while i < children.len() {
            let nid = children[i];
            let is_ns = matches!(self.tree.get(nid).content, NodeContent::RecNamespace);
            if !is_ns {
                i += 1;
                continue;
            }
            let name = self.tree.get(nid).name.clone();
            // Find subsequent namespace siblings with the same name and fold them in.
            let mut j = i + 1;
            while j < children.len() {
                let other = children[j];
                let same = matches!(self.tree.get(other).content, NodeContent::RecNamespace)
                    && self.tree.get(other).name == name;
                if same {
                    let grandchildren: Vec<u32> = self.tree.children(other).clone();
                    for gc in grandchildren {
                        self.tree.reparent(gc, nid);
                    }
                    self.tree.detach(other);
                    children.remove(j);
                } else {
                    j += 1;
                }
            }
            self.merge_namespaces(nid);
            i += 1;
        }
    }

    fn check_name_uniqueness(&mut self, scope: u32) {
        let children = self.tree.children(scope).clone();
        let mut seen: HashSet<String> = HashSet::new();
        for &c in &children {
            if let Some(name) = self.tree.get(c).name.clone() {
                if !seen.insert(name.clone()) {
                    self.error(CompileError::DuplicateName { name, scope });
                }
            }
            if matches!(
                self.tree.get(c).content,
                NodeContent::RecNamespace | NodeContent::RecStruct { .. } | NodeContent::RecVariant
            ) {
                self.check_name_uniqueness(c);
            }
        }
    }

    fn compile_node(&mut self, nid: u32, in_variant: bool) {
        let content = self.tree.get(nid).content.clone();
        match content {
            NodeContent::RecNamespace => {
                for c in self.tree.children(nid).clone() {
                    self.compile_node(c, false);
                }
            }
            NodeContent::RecStruct { mut heritance } => {
                for inst in heritance.iter_mut() {
                    self.resolve_type_instantiation(inst, nid);
                    if let Some(target) = inst.type_ref {
                        let ok = matches!(
                            self.tree.get(target).content,
                            NodeContent::RecStruct { .. } | NodeContent::RecTypedef { .. }
                        );
                        if !ok {
                            self.error(CompileError::Heritage { node: nid });
                        }
                    }
                }
                if let NodeContent::RecStruct { heritance: h } = &mut self.tree.get_mut(nid).content {
                    *h = heritance;
                }
                for c in self.tree.children(nid).clone() {
                    self.compile_node(c, false);
                }
            }
            NodeContent::RecVariant => {
                for c in self.tree.children(nid).clone() {
                    self.compile_node(c, true);
                }
            }
            NodeContent::RecArray { mut element, dims } => {
                self.resolve_type_instantiation(&mut element, nid);
                self.tree.get_mut(nid).content = NodeContent::RecArray { element, dims };
            }
            NodeContent::RecTypedef { mut target } => {
                self.resolve_type_instantiation(&mut target, nid);
                self.tree.get_mut(nid).content = NodeContent::RecTypedef { target };
            }
            NodeContent::RecEnum => {
                self.assign_enum_values(nid);
            }
            NodeContent::RecMember {
                mut ty,
                default,
                mut qualifiers,
            } => {
                self.resolve_type_instantiation(&mut ty, nid);
                if let Some(target) = ty.type_ref {
                    if qualifiers.unsigned {
                        let is_int_native = matches!(
                            self.tree.get(target).content,
                            NodeContent::RecNative(k) if k.is_integer()
                        );
                        if !is_int_native {
                            self.error(CompileError::UnsignedOnNonInteger { node: nid });
                        }
                    }
                }
                if in_variant {
                    if qualifiers.optional || default.is_some() {
                        self.error(CompileError::VariantMemberOptionalOrDefault { node: nid });
                    }
                } else if qualifiers.optional && default.is_some() {
                    self.error(CompileError::OptionalWithDefault { node: nid });
                }
                qualifiers.unsigned = ty.unsigned;
                self.tree.get_mut(nid).content = NodeContent::RecMember {
                    ty,
                    default,
                    qualifiers,
                };
            }
            NodeContent::RecTemplateSlot { .. }
            | NodeContent::RecNative(_)
            | NodeContent::RecEnumValue { .. }
            | NodeContent::RecInclude(_) => {}
            NodeContent::DatAssignment
            | NodeContent::DatString(_)
            | NodeContent::DatFloating(_)
            | NodeContent::DatInt(_)
            | NodeContent::DatIdentifier(_)
            | NodeContent::DatBool(_)
            | NodeContent::DatGroup
            | NodeContent::DatVariant
            | NodeContent::DatMapAssignment => {}
        }
    }

    /// Assign integer values to an enum's members (spec §4.2 "Enum assignment").
    fn assign_enum_values(&mut self, enum_nid: u32) {
        let children = self.tree.children(enum_nid).clone();
        let fixed_index = children.iter().position(|&c| {
            matches!(self.tree.get(c).content, NodeContent::RecEnumValue { fixed: Some(_), .. })
        });

        let set_value = |tree: &mut NodeTree, nid: u32, v: i32| {
            if let NodeContent::RecEnumValue { value, .. } = &mut tree.get_mut(nid).content {
                *value = v;
            }
        };
        let get_fixed = |tree: &NodeTree, nid: u32| -> Option<i32> {
            match tree.get(nid).content {
                NodeContent::RecEnumValue { fixed, .. } => fixed,
                _ => None,
            }
        };

        match fixed_index {
            None => {
                for (k, &c) in children.iter().enumerate() {
                    set_value(self.tree, c, k as i32);
                }
            }
            Some(i) => {
                let f = get_fixed(self.tree, children[i]).unwrap();
                #[allow(clippy::needless_range_loop)]
                for k in 0..i {
                    match f.checked_sub((i - k) as i32) {
                        Some(v) => set_value(self.tree, children[k], v),
                        None => self.error(CompileError::EnumOverflow { node: children[k] }),
                    }
                }
                set_value(self.tree, children[i], f);
                let mut prev = f;
                for &c in &children[(i + 1)..] {
                    match get_fixed(self.tree, c) {
                        Some(g) => {
                            if prev.checked_add(1).map(|min| g >= min).unwrap_or(false) {
                                set_value(self.tree, c, g);
                                prev = g;
                            } else {
                                self.error(CompileError::EnumNotMonotonic { node: c });
                            }
                        }
                        None => match prev.checked_add(1) {
                            Some(v) => {
                                set_value(self.tree, c, v);
                                prev = v;
                            }
                            None => self.error(CompileError::EnumOverflow { node: c }),
                        },
                    }
                }
            }
        }
    }

    /// Resolve a type instantiation from `scope` (spec §4.2 point 4).
    fn resolve_type_instantiation(&mut self, inst: &mut TypeInstantiation, scope: u32) {
        if let Some(nid) = inst.type_ref {
            // Synthesized inline node (array). Attach it to its enclosing scope the first
            // time it is encountered, then recurse into its own compilation.
            if self.tree.get_item(nid).parent().is_none() {
                self.tree.child(scope, nid);
                self.compile_node(nid, false);
            }
            return;
        }

        let resolved = self.resolve_path(scope, &inst.path);
        let target = match resolved {
            Some(nid) => nid,
            None => {
                self.error(CompileError::Resolution {
                    path: inst.path.print(),
                    context: scope,
                });
                return;
            }
        };
        if !self.tree.get(target).content.is_type() {
            self.error(CompileError::NotAType {
                path: inst.path.print(),
                context: scope,
            });
            return;
        }
        inst.type_ref = Some(target);

        for param in inst.parameters.iter_mut() {
            self.resolve_type_instantiation(param, scope);
        }

        if let Some(arity) = self.tree.get(target).content.template_arity() {
            if !arity.accepts(inst.parameters.len()) {
                self.error(CompileError::Template {
                    node: scope,
                    expected: describe_arity(arity),
                    got: inst.parameters.len(),
                });
            }
        } else if matches!(
            self.tree.get(target).content,
            NodeContent::RecStruct { .. } | NodeContent::RecVariant | NodeContent::RecTypedef { .. }
        ) {
            let slots = self.count_template_slots(target);
            if slots != inst.parameters.len() {
                self.error(CompileError::Template {
                    node: scope,
                    expected: slots.to_string(),
                    got: inst.parameters.len(),
                });
            }
        }
    }

    fn count_template_slots(&self, nid: u32) -> usize {
        self.tree
            .children(nid)
            .iter()
            .filter(|&&c| matches!(self.tree.get(c).content, NodeContent::RecTemplateSlot { .. }))
            .count()
    }

    fn lookup_segment_chain(&self, start_scope: u32, segments: &[String]) -> Option<u32> {
        let mut current = start_scope;
        for (i, seg) in segments.iter().enumerate() {
            let is_final = i == segments.len() - 1;
            let found = self.tree.children(current).iter().find(|&&c| {
                let node = self.tree.get(c);
                node.name.as_deref() == Some(seg.as_str()) && (!is_final || node.content.is_type())
            });
            match found {
                Some(&c) => current = c,
                None => return None,
            }
        }
        Some(current)
    }

    fn find_root(&self, nid: u32) -> u32 {
        let mut cur = nid;
        while let Some(p) = *self.tree.get_item(cur).parent() {
            cur = p;
        }
        cur
    }

    fn resolve_path(&self, scope: u32, path: &RecPath) -> Option<u32> {
        if path.absolute {
            let root = self.find_root(scope);
            return self.lookup_segment_chain(root, &path.segments);
        }
        let mut current = Some(scope);
        while let Some(s) = current {
            if let Some(found) = self.lookup_segment_chain(s, &path.segments) {
                return Some(found);
            }
            current = *self.tree.get_item(s).parent();
        }
        None
    }
}

fn describe_arity(arity: crate::ir::TemplateArity) -> String {
    match arity {
        crate::ir::TemplateArity::Exactly(n) => n.to_string(),
        crate::ir::TemplateArity::AtLeast(n) => format!(">= {}", n),
        crate::ir::TemplateArity::OneOrTwo => "1 or 2".to_string(),
    }
}

/// Populate a root structure node's children with the native types (spec §4.7 step 4), then
/// run the full Pass A/Pass B resolution.
pub fn resolve_recipe(
    tree: &mut NodeTree,
    file_resolver: &FileResolver,
    parsed: parser::ParsedRecipe,
    current_dir: &FsPath,
) -> (u32, Vec<CompileError>) {
    crate::ir::populate_natives(tree, parsed.root);
    let mut resolver = Resolver::new(tree, file_resolver);
    resolver.merge_includes(parsed.root, &parsed.includes, current_dir);
    resolver.compile_tree(parsed.root);
    let errors = resolver.errors;
    (parsed.root, errors)
}

/// Resolve a single already-parsed type instantiation against a resolved recipe root
/// (spec §4.7 step 5 — the data file's recipe indication may carry an explicit type).
pub fn resolve_standalone_type_inst(
    tree: &mut NodeTree,
    file_resolver: &FileResolver,
    root: u32,
    inst: &mut TypeInstantiation,
) -> Vec<CompileError> {
    let mut resolver = Resolver::new(tree, file_resolver);
    resolver.resolve_type_instantiation(inst, root);
    resolver.errors
}
