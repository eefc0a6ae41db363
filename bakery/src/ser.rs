//! `Recipe` trait and serde bridge (§A ambient stack): lets a Rust type declare its own recipe
//! programmatically, instead of through a `.rec` file, so it can be deserialized directly with
//! serde + bincode once compiled.
//!
//! A built-in recipe never needs path resolution: every type instantiation it produces already
//! carries its resolved `type_ref`, so `Emitter`/`Decompiler` can run on it directly without a
//! `resolve::resolve_recipe` pass.

use crate::decompile::Decompiler;
use crate::emit::Emitter;
use crate::ir::{ArrayDim, NativeKind, Node, NodeContent, NodeTree, Path as RecPath, Qualifiers, TypeInstantiation};
use crate::parser;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::Path;

/// Maps a Rust type onto a recipe type instantiation (spec §3), building the backing nodes as
/// needed. Unlike the text front end, a `Recipe` impl resolves itself as it builds: `type_ref`
/// is always `Some` in the instantiation it returns.
pub trait Recipe {
    fn recipe(tree: &mut NodeTree) -> TypeInstantiation;
}

fn anonymous_inst(type_ref: u32) -> TypeInstantiation {
    let mut inst = TypeInstantiation::new(RecPath {
        absolute: false,
        segments: Vec::new(),
    });
    inst.type_ref = Some(type_ref);
    inst
}

fn native_inst(tree: &mut NodeTree, kind: NativeKind, unsigned: bool) -> TypeInstantiation {
    let nid = tree.create(Node::new_anonymous(NodeContent::RecNative(kind)));
    let mut inst = anonymous_inst(nid);
    inst.unsigned = unsigned;
    inst
}

fn generic_inst(tree: &mut NodeTree, kind: NativeKind, parameters: Vec<TypeInstantiation>) -> TypeInstantiation {
    let nid = tree.create(Node::new_anonymous(NodeContent::RecNative(kind)));
    let mut inst = anonymous_inst(nid);
    inst.parameters = parameters;
    inst
}

impl Recipe for bool {
    fn recipe(tree: &mut NodeTree) -> TypeInstantiation {
        native_inst(tree, NativeKind::Bool, false)
    }
}
impl Recipe for i8 {
    fn recipe(tree: &mut NodeTree) -> TypeInstantiation {
        native_inst(tree, NativeKind::Char, false)
    }
}
impl Recipe for u8 {
    fn recipe(tree: &mut NodeTree) -> TypeInstantiation {
        native_inst(tree, NativeKind::Char, true)
    }
}
impl Recipe for i16 {
    fn recipe(tree: &mut NodeTree) -> TypeInstantiation {
        native_inst(tree, NativeKind::Short, false)
    }
}
impl Recipe for u16 {
    fn recipe(tree: &mut NodeTree) -> TypeInstantiation {
        native_inst(tree, NativeKind::Short, true)
    }
}
impl Recipe for i32 {
    fn recipe(tree: &mut NodeTree) -> TypeInstantiation {
        native_inst(tree, NativeKind::Int, false)
    }
}
impl Recipe for u32 {
    fn recipe(tree: &mut NodeTree) -> TypeInstantiation {
        native_inst(tree, NativeKind::Int, true)
    }
}
impl Recipe for f32 {
    fn recipe(tree: &mut NodeTree) -> TypeInstantiation {
        native_inst(tree, NativeKind::Float, false)
    }
}
impl Recipe for f64 {
    fn recipe(tree: &mut NodeTree) -> TypeInstantiation {
        native_inst(tree, NativeKind::Double, false)
    }
}
impl Recipe for String {
    fn recipe(tree: &mut NodeTree) -> TypeInstantiation {
        native_inst(tree, NativeKind::String, false)
    }
}

impl<T: Recipe> Recipe for Vec<T> {
    fn recipe(tree: &mut NodeTree) -> TypeInstantiation {
        let element = T::recipe(tree);
        let nid = tree.create(Node::new_anonymous(NodeContent::RecArray {
            element,
            dims: vec![ArrayDim::Dynamic],
        }));
        anonymous_inst(nid)
    }
}

impl<K: Recipe, V: Recipe> Recipe for HashMap<K, V> {
    fn recipe(tree: &mut NodeTree) -> TypeInstantiation {
        let key = K::recipe(tree);
        let value = V::recipe(tree);
        generic_inst(tree, NativeKind::Map, vec![key, value])
    }
}

impl<A: Recipe, B: Recipe> Recipe for (A, B) {
    fn recipe(tree: &mut NodeTree) -> TypeInstantiation {
        let a = A::recipe(tree);
        let b = B::recipe(tree);
        generic_inst(tree, NativeKind::Tuple, vec![a, b])
    }
}

impl<A: Recipe, B: Recipe, C: Recipe> Recipe for (A, B, C) {
    fn recipe(tree: &mut NodeTree) -> TypeInstantiation {
        let a = A::recipe(tree);
        let b = B::recipe(tree);
        let c = C::recipe(tree);
        generic_inst(tree, NativeKind::Tuple, vec![a, b, c])
    }
}

/// Wraps an already-built node id (a struct produced via `NodeTree::create_struct`, typically)
/// as a type instantiation. Used by the derive macro for named-field enum variants.
pub fn node_type_inst(type_ref: u32) -> TypeInstantiation {
    anonymous_inst(type_ref)
}

/// Builds a `tuple<...>` instantiation from already-recipe'd field types. Used by the derive
/// macro for tuple-shaped enum variants with more than one field.
pub fn tuple_type_inst(tree: &mut NodeTree, fields: Vec<TypeInstantiation>) -> TypeInstantiation {
    generic_inst(tree, NativeKind::Tuple, fields)
}

/// Builder methods used by `bakery-derive`'s generated code (spec §3, built rather than parsed).
impl NodeTree {
    pub fn create_struct(&mut self, parent: Option<u32>, name: &str) -> u32 {
        self.create_with_parent(
            parent,
            Node::new_builtin(name, NodeContent::RecStruct { heritance: Vec::new() }),
        )
    }

    pub fn create_struct_member(&mut self, parent: u32, name: &str, ty: TypeInstantiation) -> u32 {
        let qualifiers = Qualifiers {
            unsigned: ty.unsigned,
            optional: false,
        };
        let nid = self.create(Node {
            name: Some(name.to_string()),
            content: NodeContent::RecMember { ty, default: None, qualifiers },
        });
        self.child(parent, nid);
        nid
    }

    pub fn create_variant(&mut self, parent: Option<u32>, name: &str) -> u32 {
        self.create_with_parent(parent, Node::new_builtin(name, NodeContent::RecVariant))
    }

    pub fn create_variant_member(&mut self, parent: u32, name: &str, ty: TypeInstantiation) -> u32 {
        let qualifiers = Qualifiers { unsigned: ty.unsigned, optional: false };
        let nid = self.create(Node {
            name: Some(name.to_string()),
            content: NodeContent::RecMember { ty, default: None, qualifiers },
        });
        self.child(parent, nid);
        nid
    }

    pub fn create_enum(&mut self, parent: Option<u32>, name: &str) -> u32 {
        self.create_with_parent(parent, Node::new_builtin(name, NodeContent::RecEnum))
    }

    pub fn create_enum_member(&mut self, parent: u32, name: &str, value: i32) -> u32 {
        self.create_with_parent(
            Some(parent),
            Node {
                name: Some(name.to_string()),
                content: NodeContent::RecEnumValue { value, fixed: Some(value) },
            },
        )
    }
}

#[derive(Debug)]
pub enum LoadError {
    CompilationErrors,
    InvalidRecExtension,
    InvalidDatExtension,
    FileAccess,
}

fn is_stale(dat_path: &Path, bin_path: &Path) -> bool {
    crate::driver::is_compilation_required(None, dat_path, bin_path).unwrap_or(true)
}

/// Build the binary image of `dat` in memory against a programmatically-declared recipe,
/// writing it to `out`.
pub fn write_from_string<T: Recipe>(out: &mut Vec<u8>, dat: &str) -> Result<(), LoadError> {
    let mut tree = NodeTree::new();
    let root_inst = T::recipe(&mut tree);
    let data_root = parser::parse_dat_value_string(&mut tree, dat).map_err(|_| LoadError::CompilationErrors)?;
    let mut emitter = Emitter::new(&tree);
    emitter.write_root(&root_inst, data_root, out);
    if emitter.errors.is_empty() {
        Ok(())
    } else {
        Err(LoadError::CompilationErrors)
    }
}

/// Load data from a string, with recipe built using the [`Recipe`] trait.
///
/// ```
/// use bakery::load_from_string;
/// use bakery_derive::Recipe;
/// use serde::Deserialize;
///
/// #[derive(Recipe, Deserialize, Debug, PartialEq)]
/// struct GameConfig {
///     width: u32,
///     height: u32,
///     fullscreen: bool,
/// }
///
/// let config: GameConfig = load_from_string("{width = 1024, height = 768, fullscreen = true}");
/// assert_eq!(config, GameConfig { width: 1024, height: 768, fullscreen: true });
/// ```
pub fn load_from_string<T>(dat: &str) -> T
where
    T: Recipe + DeserializeOwned,
{
    let mut bin = Vec::new();
    write_from_string::<T>(&mut bin, dat).expect("recipe/data mismatch");
    bincode::deserialize_from(&bin[..]).unwrap()
}

/// Load an object from a `.dat` file, with recipe built using the [`Recipe`] trait. The binary
/// cache (`.bin`, sibling of the data file) is rebuilt when stale (spec §1).
pub fn load_from_file<T>(path: &str) -> Result<T, LoadError>
where
    T: Recipe + DeserializeOwned,
{
    let dat_path = Path::new(path);
    if dat_path.extension() != Some(OsStr::new("dat")) {
        return Err(LoadError::InvalidDatExtension);
    }
    let bin_path = dat_path.with_extension("bin");
    if is_stale(dat_path, &bin_path) {
        let dat = std::fs::read_to_string(dat_path).map_err(|_| LoadError::FileAccess)?;
        let mut bin = Vec::new();
        write_from_string::<T>(&mut bin, &dat)?;
        std::fs::write(&bin_path, &bin).map_err(|_| LoadError::FileAccess)?;
    }
    let bytes = std::fs::read(&bin_path).map_err(|_| LoadError::FileAccess)?;
    Ok(bincode::deserialize_from(&bytes[..]).unwrap())
}

/// Load an object from a data file, given a recipe defined in a `.rec` file (spec §4.7's driver,
/// exposed as a typed convenience on top of [`crate::driver::compile`]).
pub fn load_from_file_with_recipe<T>(rec_path: &str, dat_path: &str, dest: &mut T) -> Result<(), LoadError>
where
    T: DeserializeOwned,
{
    let rec_path = Path::new(rec_path);
    if rec_path.extension() != Some(OsStr::new("rec")) {
        return Err(LoadError::InvalidRecExtension);
    }
    let dat_path = Path::new(dat_path);
    if dat_path.extension() != Some(OsStr::new("dat")) {
        return Err(LoadError::InvalidDatExtension);
    }
    let bin_path = dat_path.with_extension("bin");
    if crate::driver::is_compilation_required(Some(rec_path), dat_path, &bin_path).unwrap_or(true) {
        let log = crate::driver::compile(dat_path, &bin_path, &[]);
        if !log.ok() {
            return Err(LoadError::CompilationErrors);
        }
    }
    let bytes = std::fs::read(&bin_path).map_err(|_| LoadError::FileAccess)?;
    *dest = bincode::deserialize_from(&bytes[..]).unwrap();
    Ok(())
}

/// Write the binary representation of string data to be compiled, with the recipe given as a
/// string (spec §4.7, a convenience over the driver for callers that already hold both texts).
pub fn write_from_string_with_recipe(out: &mut dyn std::io::Write, rec: &str, dat: &str) -> Result<(), LoadError> {
    let mut tree = NodeTree::new();
    let parsed_recipe = parser::parse_recipe_source(&mut tree, rec).map_err(|_| LoadError::CompilationErrors)?;
    let file_resolver = crate::file::FileResolver::new(Vec::new());
    let (root, errors) = crate::resolve::resolve_recipe(&mut tree, &file_resolver, parsed_recipe, Path::new("."));
    if !errors.is_empty() {
        return Err(LoadError::CompilationErrors);
    }
    let parsed_data = parser::parse_data_source(&mut tree, &format!("recipe \"<built-in>\"; {}", dat))
        .map_err(|_| LoadError::CompilationErrors)?;
    let mut root_inst = anonymous_inst(root);
    root_inst.path = RecPath { absolute: true, segments: Vec::new() };
    let mut emitter = Emitter::new(&tree);
    let mut bytes = Vec::new();
    emitter.write_root(&root_inst, parsed_data.root, &mut bytes);
    if !emitter.errors.is_empty() {
        return Err(LoadError::CompilationErrors);
    }
    out.write_all(&bytes).map_err(|_| LoadError::FileAccess)?;
    Ok(())
}

/// Decompile a binary blob built from a `Recipe`-derived type back to canonical text, mostly
/// useful for tests and tooling around the derive macro.
pub fn decompile_to_string<T: Recipe>(bytes: &[u8]) -> String {
    let mut tree = NodeTree::new();
    let root_inst = T::recipe(&mut tree);
    let mut decompiler = Decompiler::new(&tree);
    decompiler.decompile_root(&root_inst, bytes)
}
