//! Recipe IR and Data IR node definitions shared by the parser, resolver, emitter and
//! decompiler (spec §3).
//!
//! Both trees live in the same arena (`crate::tree::Tree`), so a "pointer" from a type
//! instantiation to its resolved node, or from a template slot back to its binding, is just
//! a `u32` id. This sidesteps the owning/non-owning pointer split of the original
//! implementation: a synthesized array type (built inline by the parser for `int[3]`) is a
//! node like any other, it just starts out unparented until resolution attaches it to its
//! enclosing scope.

pub type NodeTree = crate::tree::Tree<Node>;

/// Native built-in classes (spec §3, §4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeKind {
    Bool,
    Char,
    Short,
    Int,
    Float,
    Double,
    String,
    Pair,
    Tuple,
    List,
    Map,
}

impl NativeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NativeKind::Bool => "bool",
            NativeKind::Char => "char",
            NativeKind::Short => "short",
            NativeKind::Int => "int",
            NativeKind::Float => "float",
            NativeKind::Double => "double",
            NativeKind::String => "string",
            NativeKind::Pair => "pair",
            NativeKind::Tuple => "tuple",
            NativeKind::List => "list",
            NativeKind::Map => "map",
        }
    }

    /// Bit width of the fixed-size integer/float natives (spec §4.5 table). Returns None for
    /// natives whose binary size is not a fixed number of bits (string/pair/tuple/list/map).
    pub fn bit_size(&self) -> Option<u32> {
        match self {
            NativeKind::Bool | NativeKind::Char => Some(8),
            NativeKind::Short => Some(16),
            NativeKind::Int | NativeKind::Float => Some(32),
            NativeKind::Double => Some(64),
            _ => None,
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, NativeKind::Char | NativeKind::Short | NativeKind::Int)
    }
}

/// A lexical path, e.g. `foo::bar` or `::foo::bar` (spec §4.1).
#[derive(Debug, Clone)]
pub struct Path {
    pub absolute: bool,
    pub segments: Vec<String>,
}

impl Path {
    pub fn single(name: &str) -> Path {
        Path {
            absolute: false,
            segments: vec![name.to_string()],
        }
    }

    pub fn print(&self) -> String {
        let body = self.segments.join("::");
        if self.absolute {
            format!("::{}", body)
        } else {
            body
        }
    }
}

/// Qualifiers a recipe node may carry (spec §3).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Qualifiers {
    pub unsigned: bool,
    pub optional: bool,
}

/// A reference to a recipe type at a use site (spec GLOSSARY, §3).
///
/// `type_ref` starts unresolved (`None`) and is filled in by the resolver with the id of the
/// resolved node. It is the only field resolution is allowed to mutate.
#[derive(Debug, Clone)]
pub struct TypeInstantiation {
    pub path: Path,
    pub unsigned: bool,
    pub parameters: Vec<TypeInstantiation>,
    pub type_ref: Option<u32>,
}

impl TypeInstantiation {
    pub fn new(path: Path) -> TypeInstantiation {
        TypeInstantiation {
            path,
            unsigned: false,
            parameters: Vec::new(),
            type_ref: None,
        }
    }

    pub fn resolved(&self) -> u32 {
        self.type_ref
            .unwrap_or_else(|| panic!("type instantiation {} not resolved", self.path.print()))
    }
}

/// One array dimension (spec §3): a positive fixed size, or dynamic (`0` in source).
#[derive(Debug, Clone, Copy)]
pub enum ArrayDim {
    Fixed(u64),
    Dynamic,
}

/// A `{slot-node, type-instantiation}` binding pushed on the TTI stack (spec §3, §4.3).
#[derive(Debug, Clone)]
pub struct TtiBinding {
    pub slot_node: u32,
    pub instantiation: TypeInstantiation,
}

/// The template-type-instantiation stack: scoped bindings from a generic slot to its concrete
/// instantiation at the current point of the walk (spec §3 "Templates", design notes §9).
#[derive(Debug, Default)]
pub struct TtiStack {
    frames: Vec<TtiBinding>,
}

impl TtiStack {
    pub fn new() -> TtiStack {
        TtiStack { frames: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn push_all(&mut self, bindings: Vec<TtiBinding>) {
        self.frames.extend(bindings);
    }

    /// Truncate back to `len`. Called on every exit path of the recursive walkers so push/pop
    /// pairing is total even across early returns on error (spec §5, §8 law 6).
    pub fn truncate(&mut self, len: usize) {
        self.frames.truncate(len);
    }

    /// Resolve a template slot by searching from the top of the stack (spec §3).
    pub fn lookup(&self, slot_node: u32) -> Option<&TypeInstantiation> {
        self.frames
            .iter()
            .rev()
            .find(|b| b.slot_node == slot_node)
            .map(|b| &b.instantiation)
    }
}

/// `{path, absolute?}` pair controlling how an include or recipe indication is located
/// (spec §6.1, GLOSSARY).
#[derive(Debug, Clone)]
pub struct FileIndication {
    pub path: String,
    pub absolute: bool,
}

/// A floating literal kept as its three decimal parts plus sign (spec §3 "Data IR").
#[derive(Debug, Clone)]
pub struct FloatingLiteral {
    pub negative: bool,
    pub integer_part: String,
    pub decimal_part: String,
    pub exponent: String,
}

/// Kind-specific payload of a recipe or data node (spec §3).
#[derive(Debug, Clone)]
pub enum NodeContent {
    // --- Recipe IR ---
    RecNamespace,
    RecStruct {
        heritance: Vec<TypeInstantiation>,
    },
    RecVariant,
    RecArray {
        element: TypeInstantiation,
        dims: Vec<ArrayDim>,
    },
    RecTypedef {
        target: TypeInstantiation,
    },
    RecEnum,
    RecEnumValue {
        value: i32,
        fixed: Option<i32>,
    },
    RecMember {
        ty: TypeInstantiation,
        default: Option<u32>,
        qualifiers: Qualifiers,
    },
    RecNative(NativeKind),
    /// Declaration of a template parameter slot (child of a generic struct/variant/typedef),
    /// and simultaneously the node that a `TemplateType` use site in the body resolves to
    /// (spec §3 "TemplateType").
    RecTemplateSlot {
        index: u32,
    },
    /// Include directive kept in the parsed-but-not-yet-merged recipe tree (Pass A, §4.2).
    RecInclude(FileIndication),

    // --- Data IR ---
    DatAssignment,
    DatString(String),
    DatFloating(FloatingLiteral),
    DatInt(String),
    DatIdentifier(String),
    DatBool(bool),
    DatGroup,
    DatVariant,
    DatMapAssignment,
}

impl NodeContent {
    pub fn is_type(&self) -> bool {
        matches!(
            self,
            NodeContent::RecStruct { .. }
                | NodeContent::RecVariant
                | NodeContent::RecArray { .. }
                | NodeContent::RecTypedef { .. }
                | NodeContent::RecEnum
                | NodeContent::RecNative(_)
                | NodeContent::RecTemplateSlot { .. }
        )
    }

    /// Number of template slots a generic recipe kind expects/accepts (spec §4.3).
    pub fn template_arity(&self) -> Option<TemplateArity> {
        match self {
            NodeContent::RecNative(NativeKind::Pair) => Some(TemplateArity::OneOrTwo),
            NodeContent::RecNative(NativeKind::Tuple) => Some(TemplateArity::AtLeast(1)),
            NodeContent::RecNative(NativeKind::List) => Some(TemplateArity::Exactly(1)),
            NodeContent::RecNative(NativeKind::Map) => Some(TemplateArity::Exactly(2)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum TemplateArity {
    Exactly(usize),
    AtLeast(usize),
    OneOrTwo,
}

impl TemplateArity {
    pub fn accepts(&self, n: usize) -> bool {
        match self {
            TemplateArity::Exactly(k) => n == *k,
            TemplateArity::AtLeast(k) => n >= *k,
            TemplateArity::OneOrTwo => n == 1 || n == 2,
        }
    }
}

/// A node in the shared recipe/data arena (spec §3).
#[derive(Debug, Clone)]
pub struct Node {
    pub name: Option<String>,
    pub content: NodeContent,
}

impl Node {
    pub fn new_builtin(name: &str, content: NodeContent) -> Node {
        Node {
            name: Some(name.to_string()),
            content,
        }
    }

    pub fn new_anonymous(content: NodeContent) -> Node {
        Node {
            name: None,
            content,
        }
    }

    pub fn name_or_anonymous(&self) -> String {
        self.name.clone().unwrap_or_else(|| "?".to_string())
    }
}

/// Populate a root structure node with the primitive native children so that `bool`, `int`,
/// etc. resolve (spec §4.7 step 4).
pub fn populate_natives(tree: &mut NodeTree, root: u32) {
    let natives = [
        NativeKind::Bool,
        NativeKind::Char,
        NativeKind::Short,
        NativeKind::Int,
        NativeKind::Float,
        NativeKind::Double,
        NativeKind::String,
    ];
    for native in natives {
        tree.create_with_parent(
            Some(root),
            Node::new_builtin(native.name(), NodeContent::RecNative(native)),
        );
    }
    for generic in [NativeKind::Pair, NativeKind::Tuple, NativeKind::List, NativeKind::Map] {
        tree.create_with_parent(
            Some(root),
            Node::new_builtin(generic.name(), NodeContent::RecNative(generic)),
        );
    }
}

/// Lexical path of a node, used in diagnostics (spec §7).
pub fn node_path(tree: &NodeTree, id: u32) -> String {
    let node = tree.get_item(id);
    match node.parent() {
        Some(parent_id) => match tree.get_item(*parent_id).parent() {
            Some(_) => node_path(tree, *parent_id) + "::" + &node.value.name_or_anonymous(),
            None => node.value.name_or_anonymous(),
        },
        None => node.value.name_or_anonymous(),
    }
}
