//! Transition algebra
//!
//! A transition rewrites one axis of an instruction's [`Shape`] and resolves
//! the result back to a code. Every transition is total: when its axis does
//! not apply, it is the identity.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::axis::{Embedding, EmptyPolicy, Escape, PtrDepth};
use crate::builder::{BASE_LEN, CatalogIndex};
use crate::error::{CatalogError, Result};
use crate::instruction::{FieldShape, HeadShape, Op, Shape};
use crate::kind::PayloadKind;

/// Number of transitions
pub const TRANSITION_COUNT: usize = Transition::ALL.len();

/// One row per compact instruction, one column per transition
pub(crate) type TransitionTable = Vec<[Op; TRANSITION_COUNT]>;

/// Specializing rewrite the encoder compiler applies to an emitted instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Transition {
    /// Escape the key, and any raw string payload
    Escape = 0,
    /// Head reached through a pointer
    HeadToPtrHead = 1,
    /// Head reached through a nilable pointer
    HeadToNPtrHead = 2,
    /// Head of an anonymous embedded struct
    HeadToAnonymousHead = 3,
    /// Head whose first field is omitted when empty
    HeadToOmitEmptyHead = 4,
    /// Head whose first field is quoted
    HeadToStringTagHead = 5,
    /// Head of a struct with a single field
    HeadToOnlyHead = 6,
    /// Pointer head back to a value head
    PtrHeadToHead = 7,
    /// Last field of a struct
    FieldToEnd = 8,
    /// Field omitted when empty
    FieldToOmitEmptyField = 9,
    /// Field quoted
    FieldToStringTagField = 10,
}

impl Transition {
    /// Every transition, in table column order
    pub const ALL: [Transition; 11] = [
        Self::Escape,
        Self::HeadToPtrHead,
        Self::HeadToNPtrHead,
        Self::HeadToAnonymousHead,
        Self::HeadToOmitEmptyHead,
        Self::HeadToStringTagHead,
        Self::HeadToOnlyHead,
        Self::PtrHeadToHead,
        Self::FieldToEnd,
        Self::FieldToOmitEmptyField,
        Self::FieldToStringTagField,
    ];

    /// Column in the transition table
    #[inline]
    pub const fn column(self) -> usize {
        self as usize
    }

    /// Transition name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Escape => "escape",
            Self::HeadToPtrHead => "head_to_ptr_head",
            Self::HeadToNPtrHead => "head_to_nptr_head",
            Self::HeadToAnonymousHead => "head_to_anonymous_head",
            Self::HeadToOmitEmptyHead => "head_to_omit_empty_head",
            Self::HeadToStringTagHead => "head_to_string_tag_head",
            Self::HeadToOnlyHead => "head_to_only_head",
            Self::PtrHeadToHead => "ptr_head_to_head",
            Self::FieldToEnd => "field_to_end",
            Self::FieldToOmitEmptyField => "field_to_omit_empty_field",
            Self::FieldToStringTagField => "field_to_string_tag_field",
        }
    }

    /// Look a transition up by name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    /// Rewrite the axis this transition targets.
    ///
    /// Returns `shape` unchanged when the transition does not apply.
    pub fn rewrite(self, shape: Shape) -> Shape {
        match (self, shape) {
            (Self::Escape, Shape::Leaf(kind)) => Shape::Leaf(kind.escaped()),
            (Self::Escape, Shape::Head(head)) => Shape::Head(HeadShape {
                escape: Escape::Escaped,
                kind: head.kind.map(PayloadKind::escaped),
                ..head
            }),
            (Self::Escape, Shape::Field(field)) => Shape::Field(escape_field(field)),
            (Self::Escape, Shape::End(field)) => Shape::End(escape_field(field)),

            (Self::HeadToPtrHead, Shape::Head(head)) if head.depth == PtrDepth::Value => {
                Shape::Head(HeadShape {
                    depth: PtrDepth::Ptr,
                    ..head
                })
            }
            (Self::HeadToNPtrHead, Shape::Head(head)) if head.depth == PtrDepth::Value => {
                Shape::Head(HeadShape {
                    depth: PtrDepth::NilablePtr,
                    ..head
                })
            }
            (Self::PtrHeadToHead, Shape::Head(head)) if head.depth != PtrDepth::Value => {
                Shape::Head(HeadShape {
                    depth: PtrDepth::Value,
                    ..head
                })
            }
            (Self::HeadToAnonymousHead, Shape::Head(head)) => Shape::Head(HeadShape {
                embedding: Embedding::Anonymous,
                ..head
            }),
            (Self::HeadToOmitEmptyHead, Shape::Head(head))
                if head.policy == EmptyPolicy::Normal =>
            {
                Shape::Head(HeadShape {
                    policy: EmptyPolicy::OmitEmpty,
                    ..head
                })
            }
            (Self::HeadToStringTagHead, Shape::Head(head))
                if head.policy == EmptyPolicy::Normal =>
            {
                Shape::Head(HeadShape {
                    policy: EmptyPolicy::StringTag,
                    ..head
                })
            }
            (Self::HeadToOnlyHead, Shape::Head(head))
                if head.kind.is_some_and(PayloadKind::collapses_to_only) =>
            {
                Shape::Head(HeadShape { only: true, ..head })
            }

            (Self::FieldToEnd, Shape::Field(field))
                if field.kind.is_some_and(PayloadKind::folds_into_end) =>
            {
                Shape::End(field)
            }
            (Self::FieldToOmitEmptyField, Shape::Field(field)) => Shape::Field(FieldShape {
                policy: EmptyPolicy::OmitEmpty,
                ..field
            }),
            (Self::FieldToStringTagField, Shape::Field(field)) => Shape::Field(FieldShape {
                policy: EmptyPolicy::StringTag,
                ..field
            }),

            (_, shape) => shape,
        }
    }
}

fn escape_field(field: FieldShape) -> FieldShape {
    FieldShape {
        escape: Escape::Escaped,
        kind: field.kind.map(PayloadKind::escaped),
        ..field
    }
}

/// Derive the transition table for the compact half of the catalog.
///
/// Indent instructions have no rows of their own; their transitions are
/// resolved through the compact twin.
pub(crate) fn derive_table(index: &CatalogIndex) -> Result<TransitionTable> {
    let mut table = Vec::with_capacity(BASE_LEN);

    for instruction in &index.instructions[..BASE_LEN] {
        let mut row = [instruction.code; TRANSITION_COUNT];
        for transition in Transition::ALL {
            let target = transition.rewrite(instruction.shape);
            if target == instruction.shape {
                continue;
            }
            let Some(&code) = index.by_shape.get(&(target, false)) else {
                return Err(CatalogError::UnresolvedTransition {
                    name: instruction.name.to_string(),
                    transition: transition.name(),
                });
            };
            row[transition.column()] = code;
        }
        table.push(row);
    }

    trace!(rows = table.len(), "derived transition table");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(kind: PayloadKind) -> FieldShape {
        FieldShape {
            escape: Escape::Raw,
            policy: EmptyPolicy::Normal,
            kind: Some(kind),
        }
    }

    fn head(depth: PtrDepth, kind: Option<PayloadKind>) -> HeadShape {
        HeadShape {
            escape: Escape::Raw,
            depth,
            embedding: Embedding::Plain,
            policy: EmptyPolicy::Normal,
            kind,
            only: false,
        }
    }

    #[test]
    fn test_column_order() {
        for (i, transition) in Transition::ALL.iter().enumerate() {
            assert_eq!(transition.column(), i);
            assert_eq!(Transition::from_name(transition.name()), Some(*transition));
        }
        assert_eq!(Transition::from_name("nope"), None);
    }

    #[test]
    fn test_escape_rewrites_key_and_string_payload() {
        let shape = Shape::Field(field(PayloadKind::StringPtr));
        let Shape::Field(escaped) = Transition::Escape.rewrite(shape) else {
            panic!("escape changed the role");
        };
        assert_eq!(escaped.escape, Escape::Escaped);
        assert_eq!(escaped.kind, Some(PayloadKind::EscapedStringPtr));

        let leaf = Shape::Leaf(PayloadKind::Int);
        assert_eq!(Transition::Escape.rewrite(leaf), leaf);
    }

    #[test]
    fn test_pointer_depth_rewrites() {
        let value = Shape::Head(head(PtrDepth::Value, Some(PayloadKind::Int)));
        let nptr = Transition::HeadToNPtrHead.rewrite(value);
        assert_eq!(nptr, Shape::Head(head(PtrDepth::NilablePtr, Some(PayloadKind::Int))));
        // Only value heads are promoted.
        assert_eq!(Transition::HeadToPtrHead.rewrite(nptr), nptr);
        assert_eq!(Transition::PtrHeadToHead.rewrite(nptr), value);
        assert_eq!(Transition::PtrHeadToHead.rewrite(value), value);
    }

    #[test]
    fn test_only_head_exclusions() {
        for kind in [PayloadKind::Map, PayloadKind::MarshalJson, PayloadKind::Uint8String] {
            let shape = Shape::Head(head(PtrDepth::Value, Some(kind)));
            assert_eq!(Transition::HeadToOnlyHead.rewrite(shape), shape, "{kind:?}");
        }
        let none = Shape::Head(head(PtrDepth::Value, None));
        assert_eq!(Transition::HeadToOnlyHead.rewrite(none), none);
    }

    #[test]
    fn test_field_to_end() {
        let quoted = Shape::Field(field(PayloadKind::IntString));
        assert_eq!(
            Transition::FieldToEnd.rewrite(quoted),
            Shape::End(field(PayloadKind::IntString))
        );
        let slice = Shape::Field(field(PayloadKind::Slice));
        assert_eq!(Transition::FieldToEnd.rewrite(slice), slice);
    }

    #[test]
    fn test_field_policy_overrides_any_policy() {
        let tagged = Transition::FieldToStringTagField.rewrite(Shape::Field(field(PayloadKind::Bool)));
        let Shape::Field(omit) = Transition::FieldToOmitEmptyField.rewrite(tagged) else {
            panic!("policy change altered the role");
        };
        assert_eq!(omit.policy, EmptyPolicy::OmitEmpty);
    }

    #[test]
    fn test_derive_table_covers_base() {
        let index = crate::builder::CatalogBuilder::new().build().unwrap();
        let table = derive_table(&index).unwrap();
        assert_eq!(table.len(), BASE_LEN);
        assert!(table.iter().flatten().all(|op| !op.is_indent()));
    }
}
