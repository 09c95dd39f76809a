//! The instruction catalog
//!
//! Built once, then only read. [`catalog`] hands out the process-wide copy;
//! [`Catalog::build`] is available to callers that want to handle integrity
//! errors themselves.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use rustc_hash::FxHashMap;
use tracing::{debug, error};

use crate::axis::Role;
use crate::builder::{BASE_LEN, CatalogBuilder};
use crate::error::Result;
use crate::instruction::{Category, Instruction, Op, Shape};
use crate::transition::{Transition, TransitionTable, derive_table};
use crate::verify::verify;

static CATALOG: OnceLock<Catalog> = OnceLock::new();

/// The process-wide catalog.
///
/// # Panics
///
/// Panics on first access if the catalog fails its integrity checks. Every
/// consumer would otherwise read corrupt specialization data.
pub fn catalog() -> &'static Catalog {
    CATALOG.get_or_init(|| match Catalog::build() {
        Ok(catalog) => catalog,
        Err(err) => {
            error!(%err, "instruction catalog failed integrity checks");
            panic!("instruction catalog integrity violation: {err}");
        }
    })
}

/// Ordered instructions, lookup indices and transition tables
#[derive(Debug)]
pub struct Catalog {
    instructions: Vec<Instruction>,
    by_name: FxHashMap<Box<str>, Op>,
    by_shape: FxHashMap<(Shape, bool), Op>,
    transitions: TransitionTable,
}

impl Catalog {
    /// Enumerate the catalog, derive its transition tables and verify them
    pub fn build() -> Result<Self> {
        let index = CatalogBuilder::new().build()?;
        let transitions = derive_table(&index)?;

        let catalog = Self {
            instructions: index.instructions,
            by_name: index.by_name,
            by_shape: index.by_shape,
            transitions,
        };
        verify(&catalog)?;

        debug!(
            instructions = catalog.len(),
            base = catalog.base_len(),
            "built instruction catalog"
        );
        Ok(catalog)
    }

    /// All instructions, in code order
    #[inline]
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Compact instructions only
    #[inline]
    pub fn base_instructions(&self) -> &[Instruction] {
        &self.instructions[..BASE_LEN]
    }

    /// Total number of instructions
    #[inline]
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Whether the catalog has no instructions
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Number of compact instructions, also the indent offset
    #[inline]
    pub fn base_len(&self) -> usize {
        BASE_LEN
    }

    /// Descriptor for an op
    #[inline]
    pub fn instruction(&self, op: Op) -> &Instruction {
        &self.instructions[op.index()]
    }

    /// Descriptor for a raw code
    pub fn get(&self, code: u16) -> Option<&Instruction> {
        self.instructions.get(code as usize)
    }

    /// Op for a name
    pub fn lookup(&self, name: &str) -> Option<Op> {
        self.by_name.get(name).copied()
    }

    /// Op for a shape, compact or indent
    pub fn resolve(&self, shape: &Shape, indent: bool) -> Option<Op> {
        self.by_shape.get(&(*shape, indent)).copied()
    }

    /// Apply a transition. Indent ops go through their compact twin.
    #[inline]
    pub fn apply(&self, transition: Transition, op: Op) -> Op {
        let target = self.transitions[op.to_non_indent().index()][transition.column()];
        if op.is_indent() { target.to_indent() } else { target }
    }

    /// Whether a transition changes an op
    #[inline]
    pub fn applies(&self, transition: Transition, op: Op) -> bool {
        self.apply(transition, op) != op
    }

    /// Instruction counts per category and per struct role, compact half only
    pub fn stats(&self) -> CatalogStats {
        let mut by_category = BTreeMap::new();
        let mut by_role = BTreeMap::new();
        for instruction in self.base_instructions() {
            *by_category.entry(instruction.category).or_insert(0) += 1;
            if let Some(role) = instruction.shape.role() {
                *by_role.entry(role).or_insert(0) += 1;
            }
        }
        CatalogStats {
            total: self.len(),
            base: self.base_len(),
            by_category,
            by_role,
        }
    }
}

/// Summary counts
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CatalogStats {
    /// All instructions
    pub total: usize,
    /// Compact instructions
    pub base: usize,
    /// Compact instructions per category
    pub by_category: BTreeMap<Category, usize>,
    /// Compact struct instructions per role
    pub by_role: BTreeMap<Role, usize>,
}

impl Op {
    /// Op for a name in the process-wide catalog
    pub fn named(name: &str) -> Option<Self> {
        catalog().lookup(name)
    }

    /// Descriptor
    #[inline]
    pub fn instruction(self) -> &'static Instruction {
        catalog().instruction(self)
    }

    /// Instruction name
    #[inline]
    pub fn name(self) -> &'static str {
        &self.instruction().name
    }

    /// Handler category
    #[inline]
    pub fn category(self) -> Category {
        self.instruction().category
    }

    /// Axis decomposition
    #[inline]
    pub fn shape(self) -> Shape {
        self.instruction().shape
    }

    /// Apply a transition
    #[inline]
    pub fn transition(self, transition: Transition) -> Self {
        catalog().apply(transition, self)
    }

    /// Escaped variant
    pub fn escaped(self) -> Self {
        self.transition(Transition::Escape)
    }

    /// Head reached through a pointer
    pub fn head_to_ptr_head(self) -> Self {
        self.transition(Transition::HeadToPtrHead)
    }

    /// Head reached through a nilable pointer
    pub fn head_to_nptr_head(self) -> Self {
        self.transition(Transition::HeadToNPtrHead)
    }

    /// Head of an anonymous embedded struct
    pub fn head_to_anonymous_head(self) -> Self {
        self.transition(Transition::HeadToAnonymousHead)
    }

    /// Head with an omit-empty first field
    pub fn head_to_omit_empty_head(self) -> Self {
        self.transition(Transition::HeadToOmitEmptyHead)
    }

    /// Head with a quoted first field
    pub fn head_to_string_tag_head(self) -> Self {
        self.transition(Transition::HeadToStringTagHead)
    }

    /// Head of a single-field struct
    pub fn head_to_only_head(self) -> Self {
        self.transition(Transition::HeadToOnlyHead)
    }

    /// Pointer head back to a value head
    pub fn ptr_head_to_head(self) -> Self {
        self.transition(Transition::PtrHeadToHead)
    }

    /// Field folded into the struct end
    pub fn field_to_end(self) -> Self {
        self.transition(Transition::FieldToEnd)
    }

    /// Field omitted when empty
    pub fn field_to_omit_empty_field(self) -> Self {
        self.transition(Transition::FieldToOmitEmptyField)
    }

    /// Quoted field
    pub fn field_to_string_tag_field(self) -> Self {
        self.transition(Transition::FieldToStringTagField)
    }
}

#[cfg(test)]
impl Catalog {
    pub(crate) fn transitions_mut(&mut self) -> &mut TransitionTable {
        &mut self.transitions
    }

    pub(crate) fn shape_index_mut(&mut self) -> &mut FxHashMap<(Shape, bool), Op> {
        &mut self.by_shape
    }
}

impl Transition {
    /// Apply this transition through the process-wide catalog
    #[inline]
    pub fn apply(self, op: Op) -> Op {
        catalog().apply(self, op)
    }

    /// Whether this transition changes `op`
    #[inline]
    pub fn applies(self, op: Op) -> bool {
        catalog().applies(self, op)
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{END_COUNT, FIELD_COUNT, HEAD_COUNT, ONLY_HEAD_COUNT, TOTAL_LEN};

    #[test]
    fn test_global_catalog_is_shared() {
        let a = catalog() as *const Catalog;
        let b = catalog() as *const Catalog;
        assert_eq!(a, b);
        assert_eq!(catalog().len(), TOTAL_LEN);
    }

    #[test]
    fn test_lookup_and_display() {
        let op = Op::named("StructFieldHeadInt").unwrap();
        assert_eq!(op.to_string(), "StructFieldHeadInt");
        assert_eq!(op.to_indent().to_string(), "StructFieldHeadIntIndent");
        assert_eq!(Op::named("StructFieldHeadIntIndent"), Some(op.to_indent()));
        assert_eq!(Op::named("NoSuchOp"), None);
    }

    #[test]
    fn test_resolve_by_shape() {
        let catalog = catalog();
        let op = Op::named("MapHeadLoad").unwrap();
        assert_eq!(catalog.resolve(&op.shape(), false), Some(op));
        assert_eq!(catalog.resolve(&op.shape(), true), Some(op.to_indent()));
        assert_eq!(op.category(), Category::MapHead);
    }

    #[test]
    fn test_indent_transition_goes_through_compact_twin() {
        let op = Op::named("StructFieldHeadStringIndent").unwrap();
        assert_eq!(op.escaped().name(), "StructEscapedFieldHeadEscapedStringIndent");
        assert!(catalog().applies(Transition::Escape, op));
        assert!(!catalog().applies(Transition::FieldToEnd, op));
    }

    #[test]
    fn test_transition_methods_match_op_methods() {
        let op = Op::named("StructFieldOmitEmptyFloat32").unwrap();
        assert_eq!(Transition::FieldToEnd.apply(op), op.field_to_end());
        assert_eq!(op.field_to_end().name(), "StructEndOmitEmptyFloat32");
        assert!(Transition::FieldToStringTagField.applies(op));
        assert!(!Transition::HeadToOnlyHead.applies(op));
    }

    #[test]
    fn test_stats() {
        let stats = catalog().stats();
        assert_eq!(stats.total, TOTAL_LEN);
        assert_eq!(stats.by_role[&Role::Head], HEAD_COUNT);
        assert_eq!(stats.by_role[&Role::HeadOnly], ONLY_HEAD_COUNT);
        assert_eq!(stats.by_role[&Role::Field], FIELD_COUNT);
        assert_eq!(stats.by_role[&Role::End], END_COUNT);
        assert_eq!(
            stats.by_category[&Category::StructField],
            HEAD_COUNT + ONLY_HEAD_COUNT + FIELD_COUNT
        );
        assert_eq!(stats.by_category[&Category::StructEnd], END_COUNT + 1);
        assert!(!stats.by_category.contains_key(&Category::StructFieldRecursive));
    }
}
