//! Axis values that struct instructions vary over

use serde::{Deserialize, Serialize};

/// Whether the field key (and any string payload) is written escaped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Escape {
    /// Written as-is
    Raw,
    /// HTML-safe escaping
    Escaped,
}

impl Escape {
    /// Enumeration order
    pub const ALL: [Escape; 2] = [Self::Raw, Self::Escaped];

    /// Name fragment
    #[inline]
    pub const fn fragment(self) -> &'static str {
        match self {
            Self::Raw => "",
            Self::Escaped => "Escaped",
        }
    }
}

/// How the struct value is reached from the head instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PtrDepth {
    /// Struct is stored inline
    Value,
    /// Struct is behind a pointer
    Ptr,
    /// Struct is behind a pointer that may be nil
    NilablePtr,
}

impl PtrDepth {
    /// Enumeration order
    pub const ALL: [PtrDepth; 3] = [Self::Value, Self::Ptr, Self::NilablePtr];

    /// Name fragment
    #[inline]
    pub const fn fragment(self) -> &'static str {
        match self {
            Self::Value => "",
            Self::Ptr => "Ptr",
            Self::NilablePtr => "NPtr",
        }
    }
}

/// Whether the struct is embedded anonymously in its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Embedding {
    /// Regular named field or top-level struct
    Plain,
    /// Anonymous embedded struct, fields are flattened into the parent
    Anonymous,
}

impl Embedding {
    /// Enumeration order
    pub const ALL: [Embedding; 2] = [Self::Plain, Self::Anonymous];

    /// Name fragment
    #[inline]
    pub const fn fragment(self) -> &'static str {
        match self {
            Self::Plain => "",
            Self::Anonymous => "Anonymous",
        }
    }
}

/// Field tag policy: skip empty values, or quote the value as a string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EmptyPolicy {
    /// Always written
    Normal,
    /// Skipped when the value is empty
    OmitEmpty,
    /// Written quoted
    StringTag,
}

impl EmptyPolicy {
    /// Enumeration order
    pub const ALL: [EmptyPolicy; 3] = [Self::Normal, Self::OmitEmpty, Self::StringTag];

    /// Name fragment
    #[inline]
    pub const fn fragment(self) -> &'static str {
        match self {
            Self::Normal => "",
            Self::OmitEmpty => "OmitEmpty",
            Self::StringTag => "StringTag",
        }
    }
}

/// Position of a struct instruction within its struct
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    /// First field, opens the struct
    Head,
    /// Sole field, opens and closes the struct
    HeadOnly,
    /// Any following field
    Field,
    /// Last field, closes the struct
    End,
}

impl Role {
    /// Display name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Head => "head",
            Self::HeadOnly => "head-only",
            Self::Field => "field",
            Self::End => "end",
        }
    }
}
