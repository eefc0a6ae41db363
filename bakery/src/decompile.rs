//! Binary decompiler (spec §4.4, C4): mirrors the emitter, reading the binary stream guided by
//! the resolved recipe and producing canonical indented text.
//!
//! Default-value elision (spec §4.4, §9 "I/O staging") is implemented by asking the emitter to
//! write the member's default value into an in-memory buffer and comparing it against the next
//! bytes of the input; on a match those bytes are consumed and the member line is omitted.

use crate::emit::Emitter;
use crate::error::CompileError;
use crate::ir::{ArrayDim, NativeKind, NodeContent, NodeTree, TtiBinding, TtiStack, TypeInstantiation};
use crate::numeric;
use std::convert::TryInto;

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Option<&'a [u8]> {
        if self.remaining() < n {
            return None;
        }
        let s = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Some(s)
    }
}

pub struct Decompiler<'a> {
    tree: &'a NodeTree,
    tti: TtiStack,
    pub errors: Vec<CompileError>,
}

fn indent_str(level: usize) -> String {
    "  ".repeat(level)
}

fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

impl<'a> Decompiler<'a> {
    pub fn new(tree: &'a NodeTree) -> Decompiler<'a> {
        Decompiler {
            tree,
            tti: TtiStack::new(),
            errors: Vec::new(),
        }
    }

    fn error(&mut self, e: CompileError) {
        self.errors.push(e);
    }

    /// Read `n` bytes, logging `CompileError::Eof` on underflow (spec §4.4, §7 `EofError`).
    fn take<'r>(&mut self, reader: &mut Reader<'r>, n: usize) -> Option<&'r [u8]> {
        match reader.take(n) {
            Some(b) => Some(b),
            None => {
                self.error(CompileError::Eof);
                None
            }
        }
    }

    fn template_slots(&self, composite: u32) -> Vec<u32> {
        self.tree
            .children(composite)
            .iter()
            .copied()
            .filter(|&c| matches!(self.tree.get(c).content, NodeContent::RecTemplateSlot { .. }))
            .collect()
    }

    fn push_tti(&mut self, composite: u32, inst: &TypeInstantiation) -> usize {
        let len = self.tti.len();
        let slots = self.template_slots(composite);
        let bindings = slots
            .into_iter()
            .zip(inst.parameters.iter())
            .map(|(slot_node, p)| TtiBinding {
                slot_node,
                instantiation: p.clone(),
            })
            .collect();
        self.tti.push_all(bindings);
        len
    }

    /// Decompile the whole data file body at level 0: the recipe root's members are listed
    /// bare, without an enclosing `{ }` (spec §8 scenario S3).
    pub fn decompile_root(&mut self, inst: &TypeInstantiation, data: &[u8]) -> String {
        let mut reader = Reader { data, pos: 0 };
        let mut out = String::new();
        let target = self.follow_to_struct(inst);
        match target {
            Some((struct_id, struct_inst)) => {
                self.read_struct_body(struct_id, &struct_inst, &mut reader, 0, &mut out);
            }
            None => {
                if let Some(text) = self.read_value(inst, &mut reader, 0) {
                    out.push_str(&text);
                    out.push_str(";\n");
                }
            }
        }
        out
    }

    fn follow_to_struct(&mut self, inst: &TypeInstantiation) -> Option<(u32, TypeInstantiation)> {
        let mut current = inst.clone();
        loop {
            let target = current.resolved();
            match self.tree.get(target).content.clone() {
                NodeContent::RecStruct { .. } => return Some((target, current)),
                NodeContent::RecTypedef { target: aliased } => current = aliased,
                _ => return None,
            }
        }
    }

    fn read_struct_body(&mut self, target: u32, inst: &TypeInstantiation, reader: &mut Reader, indent: usize, out: &mut String) -> bool {
        let heritance = match self.tree.get(target).content.clone() {
            NodeContent::RecStruct { heritance } => heritance,
            _ => return false,
        };
        let tti_len = self.push_tti(target, inst);
        let mut ok = true;

        for h in &heritance {
            let h_target = h.resolved();
            if !self.read_struct_body(h_target, h, reader, indent, out) {
                ok = false;
            }
        }

        for member_nid in self.tree.children(target).to_vec() {
            let (ty, default, qualifiers) = match self.tree.get(member_nid).content.clone() {
                NodeContent::RecMember { ty, default, qualifiers } => (ty, default, qualifiers),
                _ => continue,
            };
            let name = self.tree.get(member_nid).name.clone().unwrap();

            if qualifiers.optional {
                match reader.take(1) {
                    Some(b) => {
                        if b[0] == 0 {
                            continue;
                        }
                    }
                    None => {
                        self.error(CompileError::Eof);
                        ok = false;
                        break;
                    }
                }
            }

            if let Some(default_node) = default {
                let mut staged = Vec::new();
                let mut em = Emitter::new(self.tree);
                em.write_root(&ty, default_node, &mut staged);
                if em.errors.is_empty()
                    && reader.remaining() >= staged.len()
                    && &reader.data[reader.pos..reader.pos + staged.len()] == staged.as_slice()
                {
                    reader.pos += staged.len();
                    continue;
                }
            }

            match self.read_value(&ty, reader, indent) {
                Some(text) => {
                    out.push_str(&indent_str(indent));
                    out.push_str(&name);
                    out.push_str(" = ");
                    out.push_str(&text);
                    out.push_str(";\n");
                }
                None => ok = false,
            }
        }

        self.tti.truncate(tti_len);
        ok
    }

    fn read_value(&mut self, inst: &TypeInstantiation, reader: &mut Reader, indent: usize) -> Option<String> {
        let target = inst.resolved();
        let content = self.tree.get(target).content.clone();
        match content {
            NodeContent::RecStruct { .. } => {
                let mut body = String::new();
                let ok = self.read_struct_body(target, inst, reader, indent + 1, &mut body);
                if !ok && body.is_empty() {
                    return None;
                }
                Some(format!("{{\n{}{}}}", body, indent_str(indent)))
            }
            NodeContent::RecVariant => self.read_variant(target, inst, reader, indent),
            NodeContent::RecArray { element, dims } => self.read_array(&element, &dims, 0, reader, indent),
            NodeContent::RecTypedef { target: aliased } => {
                let len = self.push_tti(target, inst);
                let text = self.read_value(&aliased, reader, indent);
                self.tti.truncate(len);
                text
            }
            NodeContent::RecEnum => self.read_enum(target, reader),
            NodeContent::RecTemplateSlot { .. } => match self.tti.lookup(target).cloned() {
                Some(bound) => self.read_value(&bound, reader, indent),
                None => {
                    self.error(CompileError::Resolution {
                        path: "<template parameter>".to_string(),
                        context: target,
                    });
                    None
                }
            },
            NodeContent::RecNative(kind) => self.read_native(kind, inst, reader, indent),
            _ => {
                self.error(CompileError::ShapeMismatch {
                    node: target,
                    expected: "type",
                });
                None
            }
        }
    }

    fn read_variant(&mut self, target: u32, inst: &TypeInstantiation, reader: &mut Reader, indent: usize) -> Option<String> {
        let bytes = self.take(reader, 4)?;
        let idx = u32::from_ne_bytes(bytes.try_into().unwrap()) as usize;
        let members = self.tree.children(target).to_vec();
        let member_nid = *members.get(idx)?;
        let (ty, name) = match self.tree.get(member_nid).content.clone() {
            NodeContent::RecMember { ty, .. } => (ty, self.tree.get(member_nid).name.clone().unwrap()),
            _ => return None,
        };
        let tti_len = self.push_tti(target, inst);
        let value = self.read_value(&ty, reader, indent);
        self.tti.truncate(tti_len);
        value.map(|v| format!("{}: {}", name, v))
    }

    fn read_array(&mut self, element: &TypeInstantiation, dims: &[ArrayDim], level: usize, reader: &mut Reader, indent: usize) -> Option<String> {
        let count = match dims[level] {
            ArrayDim::Dynamic => {
                let bytes = self.take(reader, std::mem::size_of::<usize>())?;
                usize::from_ne_bytes(bytes.try_into().unwrap())
            }
            ArrayDim::Fixed(n) => n as usize,
        };
        let mut elems = Vec::with_capacity(count);
        for _ in 0..count {
            let text = if level + 1 < dims.len() {
                self.read_array(element, dims, level + 1, reader, indent + 1)
            } else {
                self.read_value(element, reader, indent + 1)
            };
            elems.push(text?);
        }
        Some(self.format_group(&elems, indent))
    }

    fn read_enum(&mut self, target: u32, reader: &mut Reader) -> Option<String> {
        let bytes = self.take(reader, 4)?;
        let value = i32::from_ne_bytes(bytes.try_into().unwrap());
        let name = self.tree.children(target).iter().find_map(|&c| match self.tree.get(c).content {
            NodeContent::RecEnumValue { value: v, .. } if v == value => self.tree.get(c).name.clone(),
            _ => None,
        });
        Some(name.unwrap_or_else(|| value.to_string()))
    }

    fn read_native(&mut self, kind: NativeKind, inst: &TypeInstantiation, reader: &mut Reader, indent: usize) -> Option<String> {
        match kind {
            NativeKind::Bool => {
                let b = self.take(reader, 1)?;
                Some(if b[0] != 0 { "true".to_string() } else { "false".to_string() })
            }
            NativeKind::Char | NativeKind::Short | NativeKind::Int => {
                let width = (kind.bit_size().unwrap() / 8) as usize;
                let bytes = self.take(reader, width)?;
                Some(numeric::bytes_to_int(bytes, !inst.unsigned).to_string())
            }
            NativeKind::Float => Some(numeric::bytes_to_decimal_string(self.take(reader, 4)?)),
            NativeKind::Double => Some(numeric::bytes_to_decimal_string(self.take(reader, 8)?)),
            NativeKind::String => {
                let len_bytes = self.take(reader, std::mem::size_of::<usize>())?;
                let len = usize::from_ne_bytes(len_bytes.try_into().unwrap());
                let bytes = self.take(reader, len)?;
                let s = String::from_utf8_lossy(bytes);
                Some(format!("\"{}\"", escape_string(&s)))
            }
            NativeKind::Pair => {
                let count = if inst.parameters.len() == 1 { 2 } else { inst.parameters.len() };
                let mut elems = Vec::with_capacity(count);
                for i in 0..count {
                    let elem = if inst.parameters.len() == 1 { &inst.parameters[0] } else { &inst.parameters[i] };
                    elems.push(self.read_value(elem, reader, indent + 1)?);
                }
                Some(self.format_group(&elems, indent))
            }
            NativeKind::Tuple => {
                let mut elems = Vec::with_capacity(inst.parameters.len());
                for p in &inst.parameters {
                    elems.push(self.read_value(p, reader, indent + 1)?);
                }
                Some(self.format_group(&elems, indent))
            }
            NativeKind::List => {
                let len_bytes = self.take(reader, std::mem::size_of::<usize>())?;
                let count = usize::from_ne_bytes(len_bytes.try_into().unwrap());
                let mut elems = Vec::with_capacity(count);
                for _ in 0..count {
                    elems.push(self.read_value(&inst.parameters[0], reader, indent + 1)?);
                }
                Some(self.format_group(&elems, indent))
            }
            NativeKind::Map => {
                let len_bytes = self.take(reader, std::mem::size_of::<usize>())?;
                let count = usize::from_ne_bytes(len_bytes.try_into().unwrap());
                let mut elems = Vec::with_capacity(count);
                for _ in 0..count {
                    let key = self.read_value(&inst.parameters[0], reader, indent + 1)?;
                    let value = self.read_value(&inst.parameters[1], reader, indent + 1)?;
                    elems.push(format!("{} = {}", key, value));
                }
                Some(self.format_group(&elems, indent))
            }
        }
    }

    fn format_group(&self, elems: &[String], indent: usize) -> String {
        if elems.is_empty() {
            return "{}".to_string();
        }
        let mut s = String::from("{\n");
        for e in elems {
            s.push_str(&indent_str(indent + 1));
            s.push_str(e);
            s.push_str(",\n");
        }
        s.push_str(&indent_str(indent));
        s.push('}');
        s
    }
}
