//! Lexical/grammar front end (spec §4.1, C1).
//!
//! Parses a source text into either a Recipe IR subtree or a Data IR subtree, sharing the
//! arena with the rest of the compiler. Produces a `ParseError{line, excerpt}` on failure
//! rather than panicking, per spec §7.

use crate::ir::{
    ArrayDim, FileIndication, FloatingLiteral, Node, NodeContent, NodeTree, Path, Qualifiers,
    TypeInstantiation,
};
use pest::iterators::Pair;
use pest::Parser;

#[derive(pest_derive::Parser)]
#[grammar = "grammar.pest"]
struct BakeryParser;

#[derive(Debug, Clone)]
pub struct ParseError {
    pub line: usize,
    pub excerpt: String,
}

impl ParseError {
    fn from_pest(e: pest::error::Error<Rule>) -> ParseError {
        let (line, _col) = match e.line_col {
            pest::error::LineColLocation::Pos((l, c)) => (l, c),
            pest::error::LineColLocation::Span((l, c), _) => (l, c),
        };
        ParseError {
            line,
            excerpt: e.line().to_string(),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "parse error at line {}: {}", self.line, self.excerpt)
    }
}

fn parse_rule(rule: Rule, text: &str) -> Result<Pair<'_, Rule>, ParseError> {
    let mut pairs = BakeryParser::parse(rule, text).map_err(ParseError::from_pest)?;
    Ok(pairs.next().unwrap())
}

/// Result of parsing a recipe source: the include directives in order, and the root node
/// (an anonymous structure holding the file's top-level namespaces/types/members).
pub struct ParsedRecipe {
    pub includes: Vec<FileIndication>,
    pub root: u32,
}

/// Result of parsing a data source (spec §4.1 "data").
pub struct ParsedData {
    pub recipe_file: FileIndication,
    pub recipe_type: Option<TypeInstantiation>,
    pub root: u32,
}

pub fn parse_recipe_source(tree: &mut NodeTree, text: &str) -> Result<ParsedRecipe, ParseError> {
    let pair = parse_rule(Rule::recipe_source, text)?;
    let mut includes = Vec::new();
    let root = tree.create(Node::new_anonymous(NodeContent::RecStruct {
        heritance: Vec::new(),
    }));
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::include_def => includes.push(parse_file_indication(inner.into_inner().next().unwrap())),
            Rule::composite_content => parse_composite_content(tree, inner, root),
            Rule::EOI => {}
            _ => unreachable!(),
        }
    }
    Ok(ParsedRecipe { includes, root })
}

pub fn parse_data_source(tree: &mut NodeTree, text: &str) -> Result<ParsedData, ParseError> {
    let pair = parse_rule(Rule::data_source, text)?;
    let root = tree.create(Node::new_anonymous(NodeContent::DatGroup));
    let mut recipe_file = None;
    let mut recipe_type = None;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::recipe_indication => {
                let mut it = inner.into_inner();
                recipe_file = Some(parse_file_indication(it.next().unwrap()));
                if let Some(ty) = it.next() {
                    recipe_type = Some(parse_type_inst(tree, ty));
                }
            }
            Rule::assignment => {
                let child = parse_assignment(tree, inner);
                tree.child(root, child);
            }
            Rule::map_assignment => {
                let child = parse_map_assignment(tree, inner);
                tree.child(root, child);
            }
            Rule::EOI => {}
            _ => unreachable!(),
        }
    }
    Ok(ParsedData {
        recipe_file: recipe_file.expect("grammar guarantees a recipe indication"),
        recipe_type,
        root,
    })
}

/// Parse a single type instantiation from a string (used for the in-memory "recipe root is a
/// single type" driver path, spec §4.7 step 5).
pub fn parse_type_inst_string(tree: &mut NodeTree, text: &str) -> Result<TypeInstantiation, ParseError> {
    let pair = parse_rule(Rule::type_inst_source, text)?;
    let inner = pair.into_inner().next().unwrap();
    Ok(parse_type_inst(tree, inner))
}

/// Parse a single data value from a string.
pub fn parse_dat_value_string(tree: &mut NodeTree, text: &str) -> Result<u32, ParseError> {
    let pair = parse_rule(Rule::dat_value_source, text)?;
    let inner = pair.into_inner().next().unwrap();
    Ok(parse_dat_value(tree, inner))
}

fn parse_file_indication(pair: Pair<Rule>) -> FileIndication {
    let text = pair.as_str();
    if let Some(stripped) = text.strip_prefix('<') {
        FileIndication {
            path: stripped.trim_end_matches('>').to_string(),
            absolute: true,
        }
    } else {
        FileIndication {
            path: unescape_string(&text[1..text.len() - 1]),
            absolute: false,
        }
    }
}

fn unescape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('"') => out.push('"'),
                Some('\\') => out.push('\\'),
                Some(other) => out.push(other),
                None => {}
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn parse_path(pair: Pair<Rule>) -> Path {
    let absolute = pair.as_str().starts_with("::");
    let segments = pair
        .into_inner()
        .filter(|p| p.as_rule() == Rule::identifier)
        .map(|p| p.as_str().to_string())
        .collect();
    Path { absolute, segments }
}

/// Parse a `type_inst` pair into a `TypeInstantiation`, synthesizing an `Array` recipe node
/// (and pre-resolving the instantiation to it) for any trailing `[...]` suffixes.
fn parse_type_inst(tree: &mut NodeTree, pair: Pair<Rule>) -> TypeInstantiation {
    let mut inner = pair.into_inner();
    let mut unsigned = false;
    let mut next = inner.next().unwrap();
    if next.as_rule() == Rule::unsigned_kw {
        unsigned = true;
        next = inner.next().unwrap();
    }
    let path = parse_path(next);
    let mut inst = TypeInstantiation::new(path);
    inst.unsigned = unsigned;

    let mut array_suffixes = Vec::new();
    for p in inner {
        match p.as_rule() {
            Rule::template_args => {
                for arg in p.into_inner() {
                    inst.parameters.push(parse_type_inst(tree, arg));
                }
            }
            Rule::array_suffix => array_suffixes.push(p),
            _ => unreachable!(),
        }
    }

    if array_suffixes.is_empty() {
        return inst;
    }

    let dims: Vec<ArrayDim> = array_suffixes
        .into_iter()
        .map(|p| match p.into_inner().next() {
            Some(size) => match size.as_str().parse().unwrap() {
                0 => ArrayDim::Dynamic,
                n => ArrayDim::Fixed(n),
            },
            None => ArrayDim::Dynamic,
        })
        .collect();
    let array_nid = tree.create(Node::new_anonymous(NodeContent::RecArray {
        element: inst,
        dims,
    }));
    let mut array_inst = TypeInstantiation::new(Path {
        absolute: false,
        segments: Vec::new(),
    });
    array_inst.type_ref = Some(array_nid);
    array_inst
}

fn parse_template_params_decl(tree: &mut NodeTree, pair: Pair<Rule>, parent: u32) {
    for (index, p) in pair.into_inner().enumerate() {
        tree.create_with_parent(
            Some(parent),
            Node::new_builtin(p.as_str(), NodeContent::RecTemplateSlot { index: index as u32 }),
        );
    }
}

fn parse_composite_content(tree: &mut NodeTree, pair: Pair<Rule>, parent: u32) {
    for item in pair.into_inner() {
        let child = match item.as_rule() {
            Rule::struct_def => parse_struct_def(tree, item),
            Rule::variant_def => parse_variant_def(tree, item),
            Rule::namespace_def => parse_namespace_def(tree, item),
            Rule::enum_def => parse_enum_def(tree, item),
            Rule::typedef_def => parse_typedef_def(tree, item),
            Rule::member_def => parse_member_def(tree, item),
            _ => unreachable!(),
        };
        tree.child(parent, child);
    }
}

fn parse_struct_def(tree: &mut NodeTree, pair: Pair<Rule>) -> u32 {
    let mut inner = pair.into_inner();
    let name = inner.next().unwrap().as_str().to_string();
    let nid = tree.create(Node {
        name: Some(name),
        content: NodeContent::RecStruct {
            heritance: Vec::new(),
        },
    });
    let mut next = inner.next();
    if matches!(next.as_ref().map(|p| p.as_rule()), Some(Rule::template_params_decl)) {
        parse_template_params_decl(tree, next.unwrap(), nid);
        next = inner.next();
    }
    let mut heritance = Vec::new();
    if matches!(next.as_ref().map(|p| p.as_rule()), Some(Rule::heritance)) {
        for t in next.unwrap().into_inner() {
            heritance.push(parse_type_inst(tree, t));
        }
        next = inner.next();
    }
    if let NodeContent::RecStruct { heritance: h } = &mut tree.get_mut(nid).content {
        *h = heritance;
    }
    if let Some(content) = next {
        parse_composite_content(tree, content, nid);
    }
    nid
}

fn parse_variant_def(tree: &mut NodeTree, pair: Pair<Rule>) -> u32 {
    let mut inner = pair.into_inner();
    let name = inner.next().unwrap().as_str().to_string();
    let nid = tree.create(Node {
        name: Some(name),
        content: NodeContent::RecVariant,
    });
    let mut next = inner.next();
    if matches!(next.as_ref().map(|p| p.as_rule()), Some(Rule::template_params_decl)) {
        parse_template_params_decl(tree, next.unwrap(), nid);
        next = inner.next();
    }
    if let Some(content) = next {
        parse_composite_content(tree, content, nid);
    }
    nid
}

fn parse_namespace_def(tree: &mut NodeTree, pair: Pair<Rule>) -> u32 {
    let mut inner = pair.into_inner();
    let name = inner.next().unwrap().as_str().to_string();
    let nid = tree.create(Node {
        name: Some(name),
        content: NodeContent::RecNamespace,
    });
    let content = inner.next().unwrap();
    parse_composite_content(tree, content, nid);
    nid
}

fn parse_enum_def(tree: &mut NodeTree, pair: Pair<Rule>) -> u32 {
    let mut inner = pair.into_inner();
    let name = inner.next().unwrap().as_str().to_string();
    let nid = tree.create(Node {
        name: Some(name),
        content: NodeContent::RecEnum,
    });
    for value_pair in inner {
        let mut vi = value_pair.into_inner();
        let vname = vi.next().unwrap().as_str().to_string();
        let fixed = vi.next().map(|p| p.as_str().parse::<i32>().unwrap());
        tree.create_with_parent(
            Some(nid),
            Node {
                name: Some(vname),
                content: NodeContent::RecEnumValue { value: 0, fixed },
            },
        );
    }
    nid
}

fn parse_typedef_def(tree: &mut NodeTree, pair: Pair<Rule>) -> u32 {
    let mut inner = pair.into_inner();
    let ty_pair = inner.next().unwrap();
    let target = parse_type_inst(tree, ty_pair);
    let name = inner.next().unwrap().as_str().to_string();
    let nid = tree.create(Node {
        name: Some(name),
        content: NodeContent::RecTypedef { target },
    });
    if let Some(params) = inner.next() {
        parse_template_params_decl(tree, params, nid);
    }
    nid
}

fn parse_member_def(tree: &mut NodeTree, pair: Pair<Rule>) -> u32 {
    let mut inner = pair.into_inner();
    let mut qualifiers = Qualifiers::default();
    let mut next = inner.next().unwrap();
    if next.as_rule() == Rule::optional_kw {
        qualifiers.optional = true;
        next = inner.next().unwrap();
    }
    let ty = parse_type_inst(tree, next);
    qualifiers.unsigned = ty.unsigned;
    let name = inner.next().unwrap().as_str().to_string();
    let default = inner.next().map(|p| parse_dat_value(tree, p));
    tree.create(Node {
        name: Some(name),
        content: NodeContent::RecMember {
            ty,
            default,
            qualifiers,
        },
    })
}

fn parse_assignment(tree: &mut NodeTree, pair: Pair<Rule>) -> u32 {
    let mut inner = pair.into_inner();
    let name = inner.next().unwrap().as_str().to_string();
    let value = parse_dat_value(tree, inner.next().unwrap());
    let nid = tree.create(Node {
        name: Some(name),
        content: NodeContent::DatAssignment,
    });
    tree.child(nid, value);
    nid
}

fn parse_map_assignment(tree: &mut NodeTree, pair: Pair<Rule>) -> u32 {
    let mut inner = pair.into_inner();
    let key = parse_dat_value(tree, inner.next().unwrap());
    let value = parse_dat_value(tree, inner.next().unwrap());
    let nid = tree.create(Node::new_anonymous(NodeContent::DatMapAssignment));
    tree.child(nid, key);
    tree.child(nid, value);
    nid
}

fn parse_variant_value(tree: &mut NodeTree, pair: Pair<Rule>) -> u32 {
    let mut inner = pair.into_inner();
    let name = inner.next().unwrap().as_str().to_string();
    let value = parse_dat_value(tree, inner.next().unwrap());
    let nid = tree.create(Node {
        name: Some(name),
        content: NodeContent::DatVariant,
    });
    tree.child(nid, value);
    nid
}

fn parse_group(tree: &mut NodeTree, pair: Pair<Rule>) -> u32 {
    let nid = tree.create(Node::new_anonymous(NodeContent::DatGroup));
    for item in pair.into_inner() {
        let inner = item.into_inner().next().unwrap();
        let child = match inner.as_rule() {
            Rule::assignment => parse_assignment(tree, inner),
            Rule::map_assignment => parse_map_assignment(tree, inner),
            _ => parse_dat_value(tree, inner),
        };
        tree.child(nid, child);
    }
    nid
}

fn parse_floating(repr: &str) -> FloatingLiteral {
    let negative = repr.starts_with('-');
    let body = repr.trim_start_matches('-');
    let (mantissa, exponent) = match body.split_once('e') {
        Some((m, e)) => (m, e.to_string()),
        None => (body, String::new()),
    };
    let (integer_part, decimal_part) = match mantissa.split_once('.') {
        Some((i, d)) => (i.to_string(), d.to_string()),
        None => (mantissa.to_string(), String::new()),
    };
    FloatingLiteral {
        negative,
        integer_part,
        decimal_part,
        exponent,
    }
}

fn parse_dat_value(tree: &mut NodeTree, pair: Pair<Rule>) -> u32 {
    match pair.as_rule() {
        Rule::bool_lit => tree.create(Node::new_anonymous(NodeContent::DatBool(pair.as_str() == "true"))),
        Rule::float => tree.create(Node::new_anonymous(NodeContent::DatFloating(parse_floating(pair.as_str())))),
        Rule::int => tree.create(Node::new_anonymous(NodeContent::DatInt(pair.as_str().to_string()))),
        Rule::quoted_string => {
            let text = pair.as_str();
            tree.create(Node::new_anonymous(NodeContent::DatString(unescape_string(
                &text[1..text.len() - 1],
            ))))
        }
        Rule::variant_value => parse_variant_value(tree, pair),
        Rule::group => parse_group(tree, pair),
        Rule::identifier => tree.create(Node {
            name: Some(pair.as_str().to_string()),
            content: NodeContent::DatIdentifier(pair.as_str().to_string()),
        }),
        other => unreachable!("unexpected dat_value rule {:?}", other),
    }
}
