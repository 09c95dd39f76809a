//! Catalog enumeration
//!
//! Instructions are enumerated as the product of their axes, in a fixed
//! order. The position of an instruction in that order is its code:
//!
//! 1. control instructions
//! 2. one leaf per payload kind
//! 3. struct heads: escape × depth × embedding × policy × (kinds, none)
//! 4. only-heads: escape × depth × embedding × policy × (none, collapsible kinds)
//! 5. struct fields: escape × policy × (kinds, none)
//! 6. struct ends: escape × policy × (kinds, none)
//!
//! followed by one indent twin for each of the above, in the same order.

use std::iter;

use rustc_hash::FxHashMap;

use crate::axis::{Embedding, EmptyPolicy, Escape, PtrDepth};
use crate::error::{CatalogError, Result};
use crate::instruction::{Control, FieldShape, HeadShape, Instruction, Op, Shape};
use crate::kind::{KIND_COUNT, ONLY_KIND_COUNT, PayloadKind};

const HEAD_AXES: usize =
    Escape::ALL.len() * PtrDepth::ALL.len() * Embedding::ALL.len() * EmptyPolicy::ALL.len();

const FIELD_AXES: usize = Escape::ALL.len() * EmptyPolicy::ALL.len();

/// Control instructions
pub const CONTROL_COUNT: usize = Control::ALL.len();
/// Leaf instructions, one per kind
pub const LEAF_COUNT: usize = KIND_COUNT;
/// Struct heads
pub const HEAD_COUNT: usize = HEAD_AXES * (KIND_COUNT + 1);
/// Only-heads
pub const ONLY_HEAD_COUNT: usize = HEAD_AXES * (ONLY_KIND_COUNT + 1);
/// Struct fields
pub const FIELD_COUNT: usize = FIELD_AXES * (KIND_COUNT + 1);
/// Struct ends
pub const END_COUNT: usize = FIELD_AXES * (KIND_COUNT + 1);

/// Size of the compact half, and the offset of every indent twin
pub const BASE_LEN: usize =
    CONTROL_COUNT + LEAF_COUNT + HEAD_COUNT + ONLY_HEAD_COUNT + FIELD_COUNT + END_COUNT;

/// Size of the whole catalog
pub const TOTAL_LEN: usize = BASE_LEN * 2;

const _: () = assert!(TOTAL_LEN <= u16::MAX as usize + 1, "codes must fit in u16");

/// Enumerated instructions with their lookup indices
pub(crate) struct CatalogIndex {
    pub instructions: Vec<Instruction>,
    pub by_name: FxHashMap<Box<str>, Op>,
    pub by_shape: FxHashMap<(Shape, bool), Op>,
}

/// Enumerates the catalog, rejecting any name or shape collision
pub(crate) struct CatalogBuilder {
    index: CatalogIndex,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        let mut by_name = FxHashMap::default();
        by_name.reserve(TOTAL_LEN);
        let mut by_shape = FxHashMap::default();
        by_shape.reserve(TOTAL_LEN);
        Self {
            index: CatalogIndex {
                instructions: Vec::with_capacity(TOTAL_LEN),
                by_name,
                by_shape,
            },
        }
    }

    pub fn build(mut self) -> Result<CatalogIndex> {
        self.push_controls()?;
        self.push_leaves()?;
        self.push_heads(false)?;
        self.push_heads(true)?;
        self.push_fields(Shape::Field)?;
        self.push_fields(Shape::End)?;

        let base_len = self.index.instructions.len();
        if base_len != BASE_LEN {
            return Err(CatalogError::SizeMismatch {
                expected: BASE_LEN,
                actual: base_len,
            });
        }

        self.push_indent_twins()?;
        Ok(self.index)
    }

    fn push(&mut self, shape: Shape, indent: bool) -> Result<Op> {
        let index = self.index.instructions.len();
        if index >= TOTAL_LEN {
            return Err(CatalogError::SizeMismatch {
                expected: TOTAL_LEN,
                actual: index + 1,
            });
        }

        let code = Op::from_index(index);
        let instruction = Instruction::new(code, shape, indent);

        if let Some(first) = self.index.by_name.insert(instruction.name.clone(), code) {
            return Err(CatalogError::DuplicateName {
                name: instruction.name.into_string(),
                first: first.code(),
                second: code.code(),
            });
        }
        if self.index.by_shape.insert((shape, indent), code).is_some() {
            return Err(CatalogError::DuplicateShape {
                name: instruction.name.into_string(),
            });
        }

        self.index.instructions.push(instruction);
        Ok(code)
    }

    fn push_controls(&mut self) -> Result<()> {
        for control in Control::ALL {
            self.push(Shape::Control(control), false)?;
        }
        Ok(())
    }

    fn push_leaves(&mut self) -> Result<()> {
        for kind in PayloadKind::ALL {
            self.push(Shape::Leaf(kind), false)?;
        }
        Ok(())
    }

    fn push_heads(&mut self, only: bool) -> Result<()> {
        for escape in Escape::ALL {
            for depth in PtrDepth::ALL {
                for embedding in Embedding::ALL {
                    for policy in EmptyPolicy::ALL {
                        for kind in head_kinds(only) {
                            self.push(
                                Shape::Head(HeadShape {
                                    escape,
                                    depth,
                                    embedding,
                                    policy,
                                    kind,
                                    only,
                                }),
                                false,
                            )?;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn push_fields(&mut self, role: fn(FieldShape) -> Shape) -> Result<()> {
        for escape in Escape::ALL {
            for policy in EmptyPolicy::ALL {
                for kind in all_kinds() {
                    self.push(role(FieldShape { escape, policy, kind }), false)?;
                }
            }
        }
        Ok(())
    }

    fn push_indent_twins(&mut self) -> Result<()> {
        for index in 0..BASE_LEN {
            let shape = self.index.instructions[index].shape;
            self.push(shape, true)?;
        }
        Ok(())
    }
}

/// Every kind followed by the empty payload
fn all_kinds() -> impl Iterator<Item = Option<PayloadKind>> {
    PayloadKind::ALL.into_iter().map(Some).chain(iter::once(None))
}

/// Payloads a head is enumerated over. Only-heads put the empty payload first.
fn head_kinds(only: bool) -> Box<dyn Iterator<Item = Option<PayloadKind>>> {
    if only {
        Box::new(iter::once(None).chain(PayloadKind::only_kinds().map(Some)))
    } else {
        Box::new(all_kinds())
    }
}
