//! Instruction descriptors and codes

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::axis::{Embedding, EmptyPolicy, Escape, PtrDepth, Role};
use crate::builder::{BASE_LEN, TOTAL_LEN};
use crate::error::CatalogError;
use crate::kind::{PayloadKind, kind_fragment};

/// Suffix appended to the name of every indent twin
pub const INDENT_SUFFIX: &str = "Indent";

/// Instruction code: the position of an instruction in the catalog.
///
/// Codes below [`BASE_LEN`] are compact instructions; the indent twin of
/// code `c` is `c + BASE_LEN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u16")]
#[repr(transparent)]
pub struct Op(u16);

impl TryFrom<u16> for Op {
    type Error = CatalogError;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or(CatalogError::InvalidCode { code })
    }
}

impl Op {
    /// Op for a code, if the code is inside the catalog
    #[inline]
    pub const fn from_code(code: u16) -> Option<Self> {
        if (code as usize) < TOTAL_LEN {
            Some(Self(code))
        } else {
            None
        }
    }

    #[inline]
    pub(crate) const fn from_index(index: usize) -> Self {
        debug_assert!(index < TOTAL_LEN);
        Self(index as u16)
    }

    /// Integer code
    #[inline]
    pub const fn code(self) -> u16 {
        self.0
    }

    /// Code as a table index
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Whether this is an indent twin
    #[inline]
    pub const fn is_indent(self) -> bool {
        self.index() >= BASE_LEN
    }

    /// Indent twin; identity on indent instructions
    #[inline]
    pub const fn to_indent(self) -> Self {
        if self.is_indent() {
            self
        } else {
            Self(self.0 + BASE_LEN as u16)
        }
    }

    /// Compact counterpart; identity on compact instructions
    #[inline]
    pub const fn to_non_indent(self) -> Self {
        if self.is_indent() {
            Self(self.0 - BASE_LEN as u16)
        } else {
            self
        }
    }
}

/// Handler family an interpreter dispatches on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// Generic single-step instruction
    Op,
    /// Array begin
    ArrayHead,
    /// Array element separator
    ArrayElem,
    /// Slice begin
    SliceHead,
    /// Slice element separator
    SliceElem,
    /// Map begin
    MapHead,
    /// Map key
    MapKey,
    /// Map value
    MapValue,
    /// Map end, sorts keys when requested
    MapEnd,
    /// Recursive struct field
    StructFieldRecursive,
    /// Struct head or field
    StructField,
    /// Struct end
    StructEnd,
}

impl Category {
    /// Every category, in declaration order
    pub const ALL: [Category; 12] = [
        Self::Op,
        Self::ArrayHead,
        Self::ArrayElem,
        Self::SliceHead,
        Self::SliceElem,
        Self::MapHead,
        Self::MapKey,
        Self::MapValue,
        Self::MapEnd,
        Self::StructFieldRecursive,
        Self::StructField,
        Self::StructEnd,
    ];

    /// Category name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Op => "Op",
            Self::ArrayHead => "ArrayHead",
            Self::ArrayElem => "ArrayElem",
            Self::SliceHead => "SliceHead",
            Self::SliceElem => "SliceElem",
            Self::MapHead => "MapHead",
            Self::MapKey => "MapKey",
            Self::MapValue => "MapValue",
            Self::MapEnd => "MapEnd",
            Self::StructFieldRecursive => "StructFieldRecursive",
            Self::StructField => "StructField",
            Self::StructEnd => "StructEnd",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Instructions with no axis variation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Control {
    /// End of the program
    End,
    /// Dynamic interface value begin
    Interface,
    /// Dynamic interface value end
    InterfaceEnd,
    /// Pointer dereference
    Ptr,
    /// Nilable pointer dereference
    NPtr,
    /// Slice begin
    SliceHead,
    /// Outermost slice begin
    RootSliceHead,
    /// Slice element
    SliceElem,
    /// Outermost slice element
    RootSliceElem,
    /// Slice end
    SliceEnd,
    /// Array begin
    ArrayHead,
    /// Array element
    ArrayElem,
    /// Array end
    ArrayEnd,
    /// Map begin
    MapHead,
    /// Map begin, keys sorted on end
    MapHeadLoad,
    /// Map key
    MapKey,
    /// Map value
    MapValue,
    /// Map end
    MapEnd,
    /// End of a recursive struct field
    StructFieldRecursiveEnd,
    /// End of an anonymous embedded struct
    StructAnonymousEnd,
}

impl Control {
    /// Enumeration order
    pub const ALL: [Control; 20] = [
        Self::End,
        Self::Interface,
        Self::InterfaceEnd,
        Self::Ptr,
        Self::NPtr,
        Self::SliceHead,
        Self::RootSliceHead,
        Self::SliceElem,
        Self::RootSliceElem,
        Self::SliceEnd,
        Self::ArrayHead,
        Self::ArrayElem,
        Self::ArrayEnd,
        Self::MapHead,
        Self::MapHeadLoad,
        Self::MapKey,
        Self::MapValue,
        Self::MapEnd,
        Self::StructFieldRecursiveEnd,
        Self::StructAnonymousEnd,
    ];

    /// Instruction name
    pub const fn name(self) -> &'static str {
        match self {
            Self::End => "End",
            Self::Interface => "Interface",
            Self::InterfaceEnd => "InterfaceEnd",
            Self::Ptr => "Ptr",
            Self::NPtr => "NPtr",
            Self::SliceHead => "SliceHead",
            Self::RootSliceHead => "RootSliceHead",
            Self::SliceElem => "SliceElem",
            Self::RootSliceElem => "RootSliceElem",
            Self::SliceEnd => "SliceEnd",
            Self::ArrayHead => "ArrayHead",
            Self::ArrayElem => "ArrayElem",
            Self::ArrayEnd => "ArrayEnd",
            Self::MapHead => "MapHead",
            Self::MapHeadLoad => "MapHeadLoad",
            Self::MapKey => "MapKey",
            Self::MapValue => "MapValue",
            Self::MapEnd => "MapEnd",
            Self::StructFieldRecursiveEnd => "StructFieldRecursiveEnd",
            Self::StructAnonymousEnd => "StructAnonymousEnd",
        }
    }

    /// Handler category
    pub const fn category(self) -> Category {
        match self {
            Self::SliceHead | Self::RootSliceHead => Category::SliceHead,
            Self::SliceElem | Self::RootSliceElem => Category::SliceElem,
            Self::ArrayHead => Category::ArrayHead,
            Self::ArrayElem => Category::ArrayElem,
            Self::MapHead | Self::MapHeadLoad => Category::MapHead,
            Self::MapKey => Category::MapKey,
            Self::MapValue => Category::MapValue,
            Self::StructAnonymousEnd => Category::StructEnd,
            Self::End
            | Self::Interface
            | Self::InterfaceEnd
            | Self::Ptr
            | Self::NPtr
            | Self::SliceEnd
            | Self::ArrayEnd
            | Self::MapEnd
            | Self::StructFieldRecursiveEnd => Category::Op,
        }
    }
}

/// Axis values of a struct head or only-head instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct HeadShape {
    /// Key escaping
    pub escape: Escape,
    /// How the struct is reached
    pub depth: PtrDepth,
    /// Anonymous embedding
    pub embedding: Embedding,
    /// Tag policy of the first field
    pub policy: EmptyPolicy,
    /// Payload of the first field; `None` when the head emits no value itself
    pub kind: Option<PayloadKind>,
    /// Sole-field specialization: head and end collapsed into one
    pub only: bool,
}

/// Axis values of a struct field or struct end instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FieldShape {
    /// Key escaping
    pub escape: Escape,
    /// Tag policy
    pub policy: EmptyPolicy,
    /// Payload; `None` when the field emits no value itself
    pub kind: Option<PayloadKind>,
}

/// Structured decomposition of an instruction into its axis values.
///
/// Transitions rewrite shapes; names are derived from shapes, never parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Shape {
    /// Fixed control instruction
    Control(Control),
    /// Scalar or composite value outside a struct
    Leaf(PayloadKind),
    /// First (or only) field of a struct
    Head(HeadShape),
    /// Any following field
    Field(FieldShape),
    /// Last field, closing the struct
    End(FieldShape),
}

impl Shape {
    /// Instruction name for this shape, without the indent suffix
    pub fn name(&self) -> String {
        match self {
            Self::Control(control) => control.name().to_owned(),
            Self::Leaf(kind) => kind.name().to_owned(),
            Self::Head(head) => format!(
                "Struct{}Field{}{}Head{}{}{}",
                head.escape.fragment(),
                head.depth.fragment(),
                head.embedding.fragment(),
                head.policy.fragment(),
                kind_fragment(head.kind),
                if head.only { "Only" } else { "" },
            ),
            Self::Field(field) => format!(
                "Struct{}Field{}{}",
                field.escape.fragment(),
                field.policy.fragment(),
                kind_fragment(field.kind),
            ),
            Self::End(field) => format!(
                "Struct{}End{}{}",
                field.escape.fragment(),
                field.policy.fragment(),
                kind_fragment(field.kind),
            ),
        }
    }

    /// Handler category
    pub const fn category(&self) -> Category {
        match self {
            Self::Control(control) => control.category(),
            Self::Leaf(_) => Category::Op,
            Self::Head(_) | Self::Field(_) => Category::StructField,
            Self::End(_) => Category::StructEnd,
        }
    }

    /// Struct role, for struct instructions
    pub const fn role(&self) -> Option<Role> {
        match self {
            Self::Head(head) if head.only => Some(Role::HeadOnly),
            Self::Head(_) => Some(Role::Head),
            Self::Field(_) => Some(Role::Field),
            Self::End(_) => Some(Role::End),
            Self::Control(_) | Self::Leaf(_) => None,
        }
    }

    /// Payload kind, if any
    pub const fn kind(&self) -> Option<PayloadKind> {
        match self {
            Self::Leaf(kind) => Some(*kind),
            Self::Head(head) => head.kind,
            Self::Field(field) | Self::End(field) => field.kind,
            Self::Control(_) => None,
        }
    }
}

/// One catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Instruction {
    /// Position in the catalog
    pub code: Op,
    /// Unique name
    pub name: Box<str>,
    /// Handler category
    pub category: Category,
    /// Whether this is an indent twin
    pub indent: bool,
    /// Axis decomposition, shared with the compact twin
    pub shape: Shape,
}

impl Instruction {
    pub(crate) fn new(code: Op, shape: Shape, indent: bool) -> Self {
        let mut name = shape.name();
        if indent {
            name.push_str(INDENT_SUFFIX);
        }
        Self {
            code,
            name: name.into_boxed_str(),
            category: shape.category(),
            indent,
            shape,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn head(kind: Option<PayloadKind>) -> HeadShape {
        HeadShape {
            escape: Escape::Raw,
            depth: PtrDepth::Value,
            embedding: Embedding::Plain,
            policy: EmptyPolicy::Normal,
            kind,
            only: false,
        }
    }

    #[test]
    fn test_head_names() {
        assert_eq!(Shape::Head(head(Some(PayloadKind::Int))).name(), "StructFieldHeadInt");
        assert_eq!(Shape::Head(head(None)).name(), "StructFieldHead");

        let shape = Shape::Head(HeadShape {
            escape: Escape::Escaped,
            depth: PtrDepth::NilablePtr,
            embedding: Embedding::Anonymous,
            policy: EmptyPolicy::OmitEmpty,
            kind: Some(PayloadKind::EscapedStringPtr),
            only: true,
        });
        assert_eq!(
            shape.name(),
            "StructEscapedFieldNPtrAnonymousHeadOmitEmptyEscapedStringPtrOnly"
        );
        assert_eq!(shape.role(), Some(Role::HeadOnly));
    }

    #[test]
    fn test_field_and_end_names() {
        let field = FieldShape {
            escape: Escape::Raw,
            policy: EmptyPolicy::StringTag,
            kind: Some(PayloadKind::Bool),
        };
        assert_eq!(Shape::Field(field).name(), "StructFieldStringTagBool");
        assert_eq!(Shape::End(field).name(), "StructEndStringTagBool");
        assert_eq!(Shape::End(field).category(), Category::StructEnd);
        assert_eq!(Shape::Field(field).category(), Category::StructField);
    }

    #[test]
    fn test_control_categories() {
        assert_eq!(Control::RootSliceElem.category(), Category::SliceElem);
        assert_eq!(Control::MapHeadLoad.category(), Category::MapHead);
        assert_eq!(Control::StructAnonymousEnd.category(), Category::StructEnd);
        assert_eq!(Control::MapEnd.category(), Category::Op);
    }

    #[test]
    fn test_op_indent_offset() {
        let op = Op::from_code(7).unwrap();
        assert!(!op.is_indent());
        assert_eq!(op.to_indent().index(), 7 + BASE_LEN);
        assert_eq!(op.to_indent().to_non_indent(), op);
        assert_eq!(op.to_indent().to_indent(), op.to_indent());
        assert_eq!(op.to_non_indent(), op);
        assert_eq!(Op::from_code(TOTAL_LEN as u16), None);
    }

    #[test]
    fn test_op_deserialize_rejects_out_of_range_codes() {
        let op: Op = serde_json::from_str("7").unwrap();
        assert_eq!(op.code(), 7);
        assert_eq!(serde_json::to_string(&op).unwrap(), "7");

        let last = (TOTAL_LEN - 1).to_string();
        assert!(serde_json::from_str::<Op>(&last).is_ok());
        assert!(serde_json::from_str::<Op>(&TOTAL_LEN.to_string()).is_err());

        let err = serde_json::from_str::<Op>("60000").unwrap_err();
        assert!(err.to_string().contains("Code 60000 is outside the catalog"));
    }

    #[test]
    fn test_indent_instruction_name() {
        let instr = Instruction::new(Op::from_index(BASE_LEN), Shape::Control(Control::End), true);
        assert_eq!(instr.name.as_ref(), "EndIndent");
        assert_eq!(instr.category, Category::Op);
    }
}
