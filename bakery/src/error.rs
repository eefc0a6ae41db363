//! Error kinds (spec §7). None of these are used as Rust panics in the control-flow sense;
//! the walkers accumulate them into a `Log` (spec §6.4) and keep going with siblings where
//! possible.

use crate::ir::NodeTree;
use crate::parser::ParseError;
use std::fmt;

#[derive(Debug)]
pub enum CompileError {
    Parse(ParseError),
    Include { path: String, reason: String },
    Resolution { path: String, context: u32 },
    NotAType { path: String, context: u32 },
    DuplicateName { name: String, scope: u32 },
    Heritage { node: u32 },
    Template { node: u32, expected: String, got: usize },
    UnsignedOnNonInteger { node: u32 },
    OptionalWithDefault { node: u32 },
    VariantMemberOptionalOrDefault { node: u32 },
    EnumNotMonotonic { node: u32 },
    EnumOverflow { node: u32 },
    IntegerOutOfRange { node: u32 },
    FloatOutOfRange { node: u32 },
    UnsignedNegative { node: u32 },
    ShapeMismatch { node: u32, expected: &'static str },
    MissingMember { member: u32 },
    DuplicateAssignment { node: u32 },
    ArrayLengthMismatch { node: u32, expected: u64, got: usize },
    UndefinedEnumValue { node: u32 },
    Io(String),
    Eof,
}

impl CompileError {
    pub fn describe(&self, tree: &NodeTree) -> String {
        match self {
            CompileError::Parse(e) => format!("{}", e),
            CompileError::Include { path, reason } => format!("cannot include \"{}\": {}", path, reason),
            CompileError::Resolution { path, context } => format!(
                "unresolved typename \"{}\" for {}",
                path,
                crate::ir::node_path(tree, *context)
            ),
            CompileError::NotAType { path, context } => format!(
                "\"{}\" referenced from {} does not name a type",
                path,
                crate::ir::node_path(tree, *context)
            ),
            CompileError::DuplicateName { name, scope } => format!(
                "duplicate name \"{}\" in {}",
                name,
                crate::ir::node_path(tree, *scope)
            ),
            CompileError::Heritage { node } => format!(
                "heritance target of {} is neither a structure nor a typedef",
                crate::ir::node_path(tree, *node)
            ),
            CompileError::Template { node, expected, got } => format!(
                "{} expects {} type argument(s), got {}",
                crate::ir::node_path(tree, *node),
                expected,
                got
            ),
            CompileError::UnsignedOnNonInteger { node } => format!(
                "\"unsigned\" qualifies a non-integer native at {}",
                crate::ir::node_path(tree, *node)
            ),
            CompileError::OptionalWithDefault { node } => format!(
                "member {} cannot be both optional and have a default value",
                crate::ir::node_path(tree, *node)
            ),
            CompileError::VariantMemberOptionalOrDefault { node } => format!(
                "variant member {} cannot be optional or have a default value",
                crate::ir::node_path(tree, *node)
            ),
            CompileError::EnumNotMonotonic { node } => format!(
                "enumeration value {} does not exceed its predecessor",
                crate::ir::node_path(tree, *node)
            ),
            CompileError::EnumOverflow { node } => format!(
                "enumeration value {} overflows a signed 32-bit integer",
                crate::ir::node_path(tree, *node)
            ),
            CompileError::IntegerOutOfRange { node } => {
                format!("integer value out of bounds at {}", crate::ir::node_path(tree, *node))
            }
            CompileError::FloatOutOfRange { node } => {
                format!("floating value out of bounds at {}", crate::ir::node_path(tree, *node))
            }
            CompileError::UnsignedNegative { node } => format!(
                "negative value assigned to unsigned member at {}",
                crate::ir::node_path(tree, *node)
            ),
            CompileError::ShapeMismatch { node, expected } => format!(
                "expected {} at {}",
                expected,
                crate::ir::node_path(tree, *node)
            ),
            CompileError::MissingMember { member } => {
                format!("{} is undefined", crate::ir::node_path(tree, *member))
            }
            CompileError::DuplicateAssignment { node } => {
                format!("{} already defined", crate::ir::node_path(tree, *node))
            }
            CompileError::ArrayLengthMismatch { node, expected, got } => format!(
                "array {} expects {} element(s), got {}",
                crate::ir::node_path(tree, *node),
                expected,
                got
            ),
            CompileError::UndefinedEnumValue { node } => format!(
                "invalid enumeration value name at {}",
                crate::ir::node_path(tree, *node)
            ),
            CompileError::Io(e) => format!("I/O error: {}", e),
            CompileError::Eof => "input exhausted before end of a declared length".to_string(),
        }
    }
}

impl From<ParseError> for CompileError {
    fn from(e: ParseError) -> Self {
        CompileError::Parse(e)
    }
}

impl From<std::io::Error> for CompileError {
    fn from(e: std::io::Error) -> Self {
        CompileError::Io(e.to_string())
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
