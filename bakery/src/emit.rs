//! Binary emitter (spec §4.3, C3): walks a Data IR subtree guided by the resolved Recipe IR,
//! writing the binary stream described in §6.2.
//!
//! Writes go to a plain `Vec<u8>` rather than a trait object: the decompiler's default-value
//! staging buffer (§4.4, §9 "I/O staging") is exactly such a buffer, so the emitter and the
//! staging path share this same entry point.

use crate::error::CompileError;
use crate::ir::{ArrayDim, NativeKind, NodeContent, NodeTree, TtiBinding, TtiStack, TypeInstantiation};
use crate::numeric;
use std::collections::HashMap;

pub struct Emitter<'a> {
    tree: &'a NodeTree,
    tti: TtiStack,
    pub errors: Vec<CompileError>,
}

impl<'a> Emitter<'a> {
    pub fn new(tree: &'a NodeTree) -> Emitter<'a> {
        Emitter {
            tree,
            tti: TtiStack::new(),
            errors: Vec::new(),
        }
    }

    fn error(&mut self, e: CompileError) {
        self.errors.push(e);
    }

    pub fn write_root(&mut self, inst: &TypeInstantiation, data_node: u32, out: &mut Vec<u8>) -> bool {
        self.write_node(inst, data_node, out)
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

    /// `write_node(type_inst, data_node)` (spec §4.3): dispatch on the resolved recipe kind.
    fn write_node(&mut self, inst: &TypeInstantiation, data_node: u32, out: &mut Vec<u8>) -> bool {
        let target = inst.resolved();
        let content = self.tree.get(target).content.clone();
        match content {
            NodeContent::RecStruct { heritance } => self.write_struct(target, &heritance, inst, data_node, out),
            NodeContent::RecVariant => self.write_variant(target, inst, data_node, out),
            NodeContent::RecArray { element, dims } => self.write_array(&element, &dims, 0, data_node, out),
            NodeContent::RecTypedef { target: aliased } => {
                let len = self.push_tti(target, inst);
                let ok = self.write_node(&aliased, data_node, out);
                self.tti.truncate(len);
                ok
            }
            NodeContent::RecEnum => self.write_enum(target, data_node, out),
            NodeContent::RecTemplateSlot { .. } => match self.tti.lookup(target).cloned() {
                Some(bound) => self.write_node(&bound, data_node, out),
                None => {
                    self.error(CompileError::Resolution {
                        path: "<template parameter>".to_string(),
                        context: target,
                    });
                    false
                }
            },
            NodeContent::RecNative(kind) => self.write_native(kind, inst, data_node, out),
            _ => {
                self.error(CompileError::ShapeMismatch {
                    node: data_node,
                    expected: "type",
                });
                false
            }
        }
    }

    fn collect_assignments(&mut self, data_node: u32) -> Option<HashMap<String, u32>> {
        if !matches!(self.tree.get(data_node).content, NodeContent::DatGroup) {
            self.error(CompileError::ShapeMismatch {
                node: data_node,
                expected: "group",
            });
            return None;
        }
        let mut map = HashMap::new();
        for &c in self.tree.children(data_node) {
            if let NodeContent::DatAssignment = self.tree.get(c).content {
                let name = self.tree.get(c).name.clone().unwrap();
                let value = self.tree.unique_child(c);
                if map.insert(name, value).is_some() {
                    self.error(CompileError::DuplicateAssignment { node: c });
                }
            }
        }
        Some(map)
    }

    fn write_struct(
        &mut self,
        target: u32,
        heritance: &[TypeInstantiation],
        inst: &TypeInstantiation,
        data_node: u32,
        out: &mut Vec<u8>,
    ) -> bool {
        let tti_len = self.push_tti(target, inst);
        let mut ok = true;

        for h in heritance {
            if !self.write_node(h, data_node, out) {
                ok = false;
            }
        }

        let assignments = match self.collect_assignments(data_node) {
            Some(a) => a,
            None => {
                self.tti.truncate(tti_len);
                return false;
            }
        };

        for member_nid in self.tree.children(target).to_vec() {
            let (ty, default, qualifiers) = match self.tree.get(member_nid).content.clone() {
                NodeContent::RecMember { ty, default, qualifiers } => (ty, default, qualifiers),
                _ => continue,
            };
            let name = self.tree.get(member_nid).name.clone().unwrap();
            let assigned = assignments.get(&name).copied();

            if qualifiers.optional {
                out.push(assigned.is_some() as u8);
                if assigned.is_none() {
                    continue;
                }
            }

            let value_node = match assigned.or(default) {
                Some(v) => v,
                None => {
                    self.error(CompileError::MissingMember { member: member_nid });
                    ok = false;
                    continue;
                }
            };
            if !self.write_node(&ty, value_node, out) {
                ok = false;
            }
        }

        self.tti.truncate(tti_len);
        ok
    }

    fn write_variant(&mut self, target: u32, inst: &TypeInstantiation, data_node: u32, out: &mut Vec<u8>) -> bool {
        let name = match self.tree.get(data_node).content {
            NodeContent::DatVariant => self.tree.get(data_node).name.clone().unwrap(),
            _ => {
                self.error(CompileError::ShapeMismatch {
                    node: data_node,
                    expected: "variant value",
                });
                return false;
            }
        };
        let value_node = self.tree.unique_child(data_node);
        let members = self.tree.children(target).to_vec();
        let found = members
            .iter()
            .position(|&m| self.tree.get(m).name.as_deref() == Some(name.as_str()));
        let idx = match found {
            Some(i) => i,
            None => {
                self.error(CompileError::MissingMember { member: data_node });
                return false;
            }
        };
        let member_nid = members[idx];
        let (ty, default, qualifiers) = match self.tree.get(member_nid).content.clone() {
            NodeContent::RecMember { ty, default, qualifiers } => (ty, default, qualifiers),
            _ => unreachable!(),
        };
        if qualifiers.optional || default.is_some() {
            self.error(CompileError::VariantMemberOptionalOrDefault { node: member_nid });
            return false;
        }
        let tti_len = self.push_tti(target, inst);
        out.extend_from_slice(&(idx as u32).to_ne_bytes());
        let ok = self.write_node(&ty, value_node, out);
        self.tti.truncate(tti_len);
        ok
    }

    fn write_array(
        &mut self,
        element: &TypeInstantiation,
        dims: &[ArrayDim],
        level: usize,
        data_node: u32,
        out: &mut Vec<u8>,
    ) -> bool {
        if !matches!(self.tree.get(data_node).content, NodeContent::DatGroup) {
            self.error(CompileError::ShapeMismatch {
                node: data_node,
                expected: "array group",
            });
            return false;
        }
        let children = self.tree.children(data_node).to_vec();
        match dims[level] {
            ArrayDim::Dynamic => out.extend_from_slice(&children.len().to_ne_bytes()),
            ArrayDim::Fixed(n) => {
                if children.len() as u64 != n {
                    self.error(CompileError::ArrayLengthMismatch {
                        node: data_node,
                        expected: n,
                        got: children.len(),
                    });
                    return false;
                }
            }
        }
        let mut ok = true;
        for c in children {
            let sub_ok = if level + 1 < dims.len() {
                self.write_array(element, dims, level + 1, c, out)
            } else {
                self.write_node(element, c, out)
            };
            if !sub_ok {
                ok = false;
            }
        }
        ok
    }

    fn write_enum(&mut self, target: u32, data_node: u32, out: &mut Vec<u8>) -> bool {
        let name = match self.tree.get(data_node).content {
            NodeContent::DatIdentifier(ref s) => s.clone(),
            _ => {
                self.error(CompileError::ShapeMismatch {
                    node: data_node,
                    expected: "enum identifier",
                });
                return false;
            }
        };
        let found = self.tree.children(target).iter().find_map(|&c| {
            if self.tree.get(c).name.as_deref() == Some(name.as_str()) {
                match self.tree.get(c).content {
                    NodeContent::RecEnumValue { value, .. } => Some(value),
                    _ => None,
                }
            } else {
                None
            }
        });
        match found {
            Some(value) => {
                out.extend_from_slice(&value.to_ne_bytes());
                true
            }
            None => {
                self.error(CompileError::UndefinedEnumValue { node: data_node });
                false
            }
        }
    }

    fn write_native(&mut self, kind: NativeKind, inst: &TypeInstantiation, data_node: u32, out: &mut Vec<u8>) -> bool {
        match kind {
            NativeKind::Bool => match self.tree.get(data_node).content {
                NodeContent::DatBool(b) => {
                    out.push(b as u8);
                    true
                }
                _ => self.shape_error(data_node, "bool"),
            },
            NativeKind::Char | NativeKind::Short | NativeKind::Int => {
                self.write_integer(kind, inst.unsigned, data_node, out)
            }
            NativeKind::Float => self.write_floating(32, data_node, out),
            NativeKind::Double => self.write_floating(64, data_node, out),
            NativeKind::String => match self.tree.get(data_node).content.clone() {
                NodeContent::DatString(s) => {
                    out.extend_from_slice(&s.len().to_ne_bytes());
                    out.extend_from_slice(s.as_bytes());
                    true
                }
                _ => self.shape_error(data_node, "string"),
            },
            NativeKind::Pair => self.write_fixed_tuple(inst, data_node, out, 2),
            NativeKind::Tuple => self.write_fixed_tuple(inst, data_node, out, inst.parameters.len()),
            NativeKind::List => {
                let children = match self.group_children(data_node) {
                    Some(c) => c,
                    None => return false,
                };
                out.extend_from_slice(&children.len().to_ne_bytes());
                let elem = &inst.parameters[0];
                let mut ok = true;
                for c in children {
                    if !self.write_node(elem, c, out) {
                        ok = false;
                    }
                }
                ok
            }
            NativeKind::Map => {
                let children = match self.group_children(data_node) {
                    Some(c) => c,
                    None => return false,
                };
                out.extend_from_slice(&children.len().to_ne_bytes());
                let key_ty = &inst.parameters[0];
                let value_ty = &inst.parameters[1];
                let mut ok = true;
                for c in children {
                    if !matches!(self.tree.get(c).content, NodeContent::DatMapAssignment) {
                        self.error(CompileError::ShapeMismatch {
                            node: c,
                            expected: "map entry",
                        });
                        ok = false;
                        continue;
                    }
                    let pair = self.tree.children(c).to_vec();
                    if pair.len() != 2 {
                        self.error(CompileError::ShapeMismatch {
                            node: c,
                            expected: "key/value pair",
                        });
                        ok = false;
                        continue;
                    }
                    if !self.write_node(key_ty, pair[0], out) {
                        ok = false;
                    }
                    if !self.write_node(value_ty, pair[1], out) {
                        ok = false;
                    }
                }
                ok
            }
        }
    }

    /// `pair<A>` (1 parameter) binds both slots to the same instantiation (spec §4.3).
    fn write_fixed_tuple(&mut self, inst: &TypeInstantiation, data_node: u32, out: &mut Vec<u8>, count: usize) -> bool {
        let children = match self.group_children(data_node) {
            Some(c) => c,
            None => return false,
        };
        if children.len() != count {
            self.error(CompileError::ArrayLengthMismatch {
                node: data_node,
                expected: count as u64,
                got: children.len(),
            });
            return false;
        }
        let mut ok = true;
        for (i, c) in children.into_iter().enumerate() {
            let elem = if inst.parameters.len() == 1 {
                &inst.parameters[0]
            } else {
                &inst.parameters[i]
            };
            if !self.write_node(elem, c, out) {
                ok = false;
            }
        }
        ok
    }

    fn group_children(&mut self, data_node: u32) -> Option<Vec<u32>> {
        if !matches!(self.tree.get(data_node).content, NodeContent::DatGroup) {
            self.error(CompileError::ShapeMismatch {
                node: data_node,
                expected: "group",
            });
            return None;
        }
        Some(self.tree.children(data_node).to_vec())
    }

    fn write_integer(&mut self, kind: NativeKind, unsigned: bool, data_node: u32, out: &mut Vec<u8>) -> bool {
        let bit_size = kind.bit_size().unwrap();
        let repr = match self.tree.get(data_node).content {
            NodeContent::DatInt(ref s) => s.clone(),
            _ => return self.shape_error(data_node, "integer"),
        };
        let value = match numeric::parse_int(&repr) {
            Ok(v) => v,
            Err(_) => {
                self.error(CompileError::IntegerOutOfRange { node: data_node });
                return false;
            }
        };
        if unsigned && value.sign() == num_bigint::Sign::Minus {
            self.error(CompileError::UnsignedNegative { node: data_node });
            return false;
        }
        match numeric::int_to_bytes(&value, bit_size, !unsigned) {
            Ok(bytes) => {
                out.extend_from_slice(&bytes);
                true
            }
            Err(_) => {
                self.error(CompileError::IntegerOutOfRange { node: data_node });
                false
            }
        }
    }

    fn write_floating(&mut self, bit_size: u32, data_node: u32, out: &mut Vec<u8>) -> bool {
        let bytes = match self.tree.get(data_node).content.clone() {
            NodeContent::DatFloating(lit) => numeric::float_to_bytes(&lit, bit_size),
            NodeContent::DatInt(repr) => numeric::int_repr_to_float_bytes(&repr, bit_size),
            _ => return self.shape_error(data_node, "floating value"),
        };
        match bytes {
            Ok(b) => {
                out.extend_from_slice(&b);
                true
            }
            Err(_) => {
                self.error(CompileError::FloatOutOfRange { node: data_node });
                false
            }
        }
    }

    fn shape_error(&mut self, node: u32, expected: &'static str) -> bool {
        self.error(CompileError::ShapeMismatch { node, expected });
        false
    }
}
