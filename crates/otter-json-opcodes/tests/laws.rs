//! Algebraic laws of the instruction catalog

use otter_json_opcodes::{
    BASE_LEN, Category, Escape, HeadShape, Op, PtrDepth, Role, Shape, TOTAL_LEN, Transition, catalog,
};
use proptest::prelude::*;

fn any_op() -> impl Strategy<Value = Op> {
    (0..TOTAL_LEN as u16).prop_map(|code| Op::from_code(code).unwrap())
}

fn any_base_op() -> impl Strategy<Value = Op> {
    (0..BASE_LEN as u16).prop_map(|code| Op::from_code(code).unwrap())
}

fn any_transition() -> impl Strategy<Value = Transition> {
    prop::sample::select(Transition::ALL.to_vec())
}

fn all_ops() -> impl Iterator<Item = Op> {
    (0..TOTAL_LEN as u16).map(|code| Op::from_code(code).unwrap())
}

#[test]
fn test_codes_are_a_bijection() {
    let catalog = catalog();
    assert_eq!(catalog.len(), TOTAL_LEN);
    for op in all_ops() {
        let instruction = catalog.get(op.code()).unwrap();
        assert_eq!(instruction.code, op);
        assert_eq!(catalog.lookup(&instruction.name), Some(op));
    }
    assert!(catalog.get(TOTAL_LEN as u16).is_none());
}

#[test]
fn test_every_transition_is_closed_and_indent_transparent() {
    let catalog = catalog();
    for op in all_ops().take(BASE_LEN) {
        for transition in Transition::ALL {
            let target = catalog.apply(transition, op);
            assert!(catalog.get(target.code()).is_some(), "{op} {transition:?}");
            assert_eq!(
                catalog.resolve(&transition.rewrite(op.shape()), false),
                Some(target),
                "{op} {transition:?}"
            );
            assert!(!target.is_indent(), "{op} {transition:?}");
            assert_eq!(
                catalog.apply(transition, op.to_indent()),
                target.to_indent(),
                "{op} {transition:?}"
            );
        }
    }
}

#[test]
fn test_escape_is_idempotent_everywhere() {
    for op in all_ops() {
        assert_eq!(op.escaped().escaped(), op.escaped(), "{op}");
    }
}

#[test]
fn test_field_to_end_only_touches_fields() {
    for op in all_ops() {
        let is_foldable_field = matches!(
            op.shape(),
            Shape::Field(field) if field.kind.is_some_and(|k| k.folds_into_end())
        );
        if op.category() != Category::StructField || !is_foldable_field {
            assert_eq!(op.field_to_end(), op, "{op}");
        } else {
            assert_eq!(op.field_to_end().category(), Category::StructEnd, "{op}");
        }
    }
}

proptest! {
    #[test]
    fn prop_indent_offset(op in any_base_op()) {
        let twin = op.to_indent();
        prop_assert_eq!(twin.index(), op.index() + BASE_LEN);
        prop_assert_eq!(twin.to_non_indent(), op);
        prop_assert_eq!(twin.category(), op.category());
        prop_assert_eq!(twin.shape(), op.shape());
        prop_assert_eq!(twin.name(), format!("{}Indent", op.name()));
    }

    #[test]
    fn prop_transitions_preserve_indent(op in any_op(), transition in any_transition()) {
        prop_assert_eq!(op.transition(transition).is_indent(), op.is_indent());
    }

    #[test]
    fn prop_applies_matches_identity(op in any_op(), transition in any_transition()) {
        let changed = op.transition(transition) != op;
        prop_assert_eq!(catalog().applies(transition, op), changed);
    }

    #[test]
    fn prop_ptr_round_trip(op in any_op()) {
        let Shape::Head(head) = op.shape() else { return Ok(()); };
        if head.depth == PtrDepth::Value {
            prop_assert_eq!(op.head_to_ptr_head().ptr_head_to_head(), op);
            prop_assert_eq!(op.head_to_nptr_head().ptr_head_to_head(), op);
        } else {
            prop_assert_eq!(op.head_to_ptr_head(), op);
            let expected = Shape::Head(HeadShape { depth: PtrDepth::Value, ..head });
            prop_assert_eq!(op.ptr_head_to_head().shape(), expected);
        }
    }

    #[test]
    fn prop_policy_promotions_are_idempotent(op in any_op()) {
        let omit = op.head_to_omit_empty_head();
        prop_assert_eq!(omit.head_to_omit_empty_head(), omit);
        let tag = op.field_to_string_tag_field();
        prop_assert_eq!(tag.field_to_string_tag_field(), tag);
        let anonymous = op.head_to_anonymous_head();
        prop_assert_eq!(anonymous.head_to_anonymous_head(), anonymous);
    }

    #[test]
    fn prop_escape_only_raises_escape_axis(op in any_op()) {
        match (op.shape(), op.escaped().shape()) {
            (Shape::Head(before), Shape::Head(after)) => {
                prop_assert_eq!(after.escape, Escape::Escaped);
                prop_assert_eq!((before.depth, before.embedding, before.policy, before.only),
                    (after.depth, after.embedding, after.policy, after.only));
            }
            (Shape::Field(before), Shape::Field(after)) | (Shape::End(before), Shape::End(after)) => {
                prop_assert_eq!(after.escape, Escape::Escaped);
                prop_assert_eq!(before.policy, after.policy);
            }
            (before, after) => {
                prop_assert_eq!(before.role(), after.role());
                prop_assert_eq!(before.category(), after.category());
            }
        }
    }

    #[test]
    fn prop_only_head_is_a_head_only(op in any_op()) {
        let only = op.head_to_only_head();
        if only != op {
            prop_assert_eq!(op.shape().role(), Some(Role::Head));
            prop_assert_eq!(only.shape().role(), Some(Role::HeadOnly));
            prop_assert_eq!(
                only.to_non_indent().name(),
                format!("{}Only", op.to_non_indent().name())
            );
        }
    }
}
