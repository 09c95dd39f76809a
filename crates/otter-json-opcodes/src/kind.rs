//! Payload kinds carried by leaf and struct instructions

use serde::{Deserialize, Serialize};

/// Number of concrete payload kinds
pub const KIND_COUNT: usize = PayloadKind::ALL.len();

/// Number of payload kinds that permit the only-field collapse
pub const ONLY_KIND_COUNT: usize = count_only_kinds();

/// Concrete value kind an instruction emits.
///
/// Declaration order is the enumeration order used by the catalog builder,
/// so the discriminant doubles as the kind's position in [`PayloadKind::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum PayloadKind {
    // ==================== Scalars ====================
    /// `int`
    Int = 0x00,
    /// `int8`
    Int8 = 0x01,
    /// `int16`
    Int16 = 0x02,
    /// `int32`
    Int32 = 0x03,
    /// `int64`
    Int64 = 0x04,
    /// `uint`
    Uint = 0x05,
    /// `uint8`
    Uint8 = 0x06,
    /// `uint16`
    Uint16 = 0x07,
    /// `uint32`
    Uint32 = 0x08,
    /// `uint64`
    Uint64 = 0x09,
    /// `float32`
    Float32 = 0x0A,
    /// `float64`
    Float64 = 0x0B,
    /// `bool`
    Bool = 0x0C,
    /// String written without escaping
    String = 0x0D,
    /// String written with HTML-safe escaping
    EscapedString = 0x0E,
    /// Byte sequence, written as base64
    Bytes = 0x0F,

    // ==================== Composites ====================
    /// Nested array
    Array = 0x10,
    /// Nested map
    Map = 0x11,
    /// Nested map loaded lazily through a pointer
    MapLoad = 0x12,
    /// Nested slice
    Slice = 0x13,
    /// Nested struct
    Struct = 0x14,
    /// Value with a custom JSON marshal hook
    MarshalJson = 0x15,
    /// Value with a custom text marshal hook
    MarshalText = 0x16,
    /// Self-referential struct placeholder
    Recursive = 0x17,

    // ==================== Integers as strings ====================
    /// `int` quoted as a string
    IntString = 0x18,
    /// `int8` quoted as a string
    Int8String = 0x19,
    /// `int16` quoted as a string
    Int16String = 0x1A,
    /// `int32` quoted as a string
    Int32String = 0x1B,
    /// `int64` quoted as a string
    Int64String = 0x1C,
    /// `uint` quoted as a string
    UintString = 0x1D,
    /// `uint8` quoted as a string
    Uint8String = 0x1E,
    /// `uint16` quoted as a string
    Uint16String = 0x1F,
    /// `uint32` quoted as a string
    Uint32String = 0x20,
    /// `uint64` quoted as a string
    Uint64String = 0x21,

    // ==================== Pointers ====================
    /// `*int`
    IntPtr = 0x22,
    /// `*int8`
    Int8Ptr = 0x23,
    /// `*int16`
    Int16Ptr = 0x24,
    /// `*int32`
    Int32Ptr = 0x25,
    /// `*int64`
    Int64Ptr = 0x26,
    /// `*uint`
    UintPtr = 0x27,
    /// `*uint8`
    Uint8Ptr = 0x28,
    /// `*uint16`
    Uint16Ptr = 0x29,
    /// `*uint32`
    Uint32Ptr = 0x2A,
    /// `*uint64`
    Uint64Ptr = 0x2B,
    /// `*float32`
    Float32Ptr = 0x2C,
    /// `*float64`
    Float64Ptr = 0x2D,
    /// `*bool`
    BoolPtr = 0x2E,
    /// `*string`
    StringPtr = 0x2F,
    /// `*string` with escaping
    EscapedStringPtr = 0x30,
    /// `*[]byte`
    BytesPtr = 0x31,

    // ==================== Nilable pointers ====================
    /// Nilable `*int`
    IntNPtr = 0x32,
    /// Nilable `*int8`
    Int8NPtr = 0x33,
    /// Nilable `*int16`
    Int16NPtr = 0x34,
    /// Nilable `*int32`
    Int32NPtr = 0x35,
    /// Nilable `*int64`
    Int64NPtr = 0x36,
    /// Nilable `*uint`
    UintNPtr = 0x37,
    /// Nilable `*uint8`
    Uint8NPtr = 0x38,
    /// Nilable `*uint16`
    Uint16NPtr = 0x39,
    /// Nilable `*uint32`
    Uint32NPtr = 0x3A,
    /// Nilable `*uint64`
    Uint64NPtr = 0x3B,
    /// Nilable `*float32`
    Float32NPtr = 0x3C,
    /// Nilable `*float64`
    Float64NPtr = 0x3D,
    /// Nilable `*bool`
    BoolNPtr = 0x3E,
    /// Nilable `*string`
    StringNPtr = 0x3F,
    /// Nilable `*string` with escaping
    EscapedStringNPtr = 0x40,
    /// Nilable `*[]byte`
    BytesNPtr = 0x41,
}

impl PayloadKind {
    /// Every kind, in enumeration order
    pub const ALL: [PayloadKind; 66] = [
        Self::Int,
        Self::Int8,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::Uint,
        Self::Uint8,
        Self::Uint16,
        Self::Uint32,
        Self::Uint64,
        Self::Float32,
        Self::Float64,
        Self::Bool,
        Self::String,
        Self::EscapedString,
        Self::Bytes,
        Self::Array,
        Self::Map,
        Self::MapLoad,
        Self::Slice,
        Self::Struct,
        Self::MarshalJson,
        Self::MarshalText,
        Self::Recursive,
        Self::IntString,
        Self::Int8String,
        Self::Int16String,
        Self::Int32String,
        Self::Int64String,
        Self::UintString,
        Self::Uint8String,
        Self::Uint16String,
        Self::Uint32String,
        Self::Uint64String,
        Self::IntPtr,
        Self::Int8Ptr,
        Self::Int16Ptr,
        Self::Int32Ptr,
        Self::Int64Ptr,
        Self::UintPtr,
        Self::Uint8Ptr,
        Self::Uint16Ptr,
        Self::Uint32Ptr,
        Self::Uint64Ptr,
        Self::Float32Ptr,
        Self::Float64Ptr,
        Self::BoolPtr,
        Self::StringPtr,
        Self::EscapedStringPtr,
        Self::BytesPtr,
        Self::IntNPtr,
        Self::Int8NPtr,
        Self::Int16NPtr,
        Self::Int32NPtr,
        Self::Int64NPtr,
        Self::UintNPtr,
        Self::Uint8NPtr,
        Self::Uint16NPtr,
        Self::Uint32NPtr,
        Self::Uint64NPtr,
        Self::Float32NPtr,
        Self::Float64NPtr,
        Self::BoolNPtr,
        Self::StringNPtr,
        Self::EscapedStringNPtr,
        Self::BytesNPtr,
    ];

    /// Convert from raw byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        Self::ALL.get(byte as usize).copied()
    }

    /// Convert to raw byte
    #[inline]
    pub const fn to_byte(self) -> u8 {
        self as u8
    }

    /// Name fragment used inside instruction names
    pub const fn name(self) -> &'static str {
        match self {
            Self::Int => "Int",
            Self::Int8 => "Int8",
            Self::Int16 => "Int16",
            Self::Int32 => "Int32",
            Self::Int64 => "Int64",
            Self::Uint => "Uint",
            Self::Uint8 => "Uint8",
            Self::Uint16 => "Uint16",
            Self::Uint32 => "Uint32",
            Self::Uint64 => "Uint64",
            Self::Float32 => "Float32",
            Self::Float64 => "Float64",
            Self::Bool => "Bool",
            Self::String => "String",
            Self::EscapedString => "EscapedString",
            Self::Bytes => "Bytes",
            Self::Array => "Array",
            Self::Map => "Map",
            Self::MapLoad => "MapLoad",
            Self::Slice => "Slice",
            Self::Struct => "Struct",
            Self::MarshalJson => "MarshalJSON",
            Self::MarshalText => "MarshalText",
            Self::Recursive => "Recursive",
            Self::IntString => "IntString",
            Self::Int8String => "Int8String",
            Self::Int16String => "Int16String",
            Self::Int32String => "Int32String",
            Self::Int64String => "Int64String",
            Self::UintString => "UintString",
            Self::Uint8String => "Uint8String",
            Self::Uint16String => "Uint16String",
            Self::Uint32String => "Uint32String",
            Self::Uint64String => "Uint64String",
            Self::IntPtr => "IntPtr",
            Self::Int8Ptr => "Int8Ptr",
            Self::Int16Ptr => "Int16Ptr",
            Self::Int32Ptr => "Int32Ptr",
            Self::Int64Ptr => "Int64Ptr",
            Self::UintPtr => "UintPtr",
            Self::Uint8Ptr => "Uint8Ptr",
            Self::Uint16Ptr => "Uint16Ptr",
            Self::Uint32Ptr => "Uint32Ptr",
            Self::Uint64Ptr => "Uint64Ptr",
            Self::Float32Ptr => "Float32Ptr",
            Self::Float64Ptr => "Float64Ptr",
            Self::BoolPtr => "BoolPtr",
            Self::StringPtr => "StringPtr",
            Self::EscapedStringPtr => "EscapedStringPtr",
            Self::BytesPtr => "BytesPtr",
            Self::IntNPtr => "IntNPtr",
            Self::Int8NPtr => "Int8NPtr",
            Self::Int16NPtr => "Int16NPtr",
            Self::Int32NPtr => "Int32NPtr",
            Self::Int64NPtr => "Int64NPtr",
            Self::UintNPtr => "UintNPtr",
            Self::Uint8NPtr => "Uint8NPtr",
            Self::Uint16NPtr => "Uint16NPtr",
            Self::Uint32NPtr => "Uint32NPtr",
            Self::Uint64NPtr => "Uint64NPtr",
            Self::Float32NPtr => "Float32NPtr",
            Self::Float64NPtr => "Float64NPtr",
            Self::BoolNPtr => "BoolNPtr",
            Self::StringNPtr => "StringNPtr",
            Self::EscapedStringNPtr => "EscapedStringNPtr",
            Self::BytesNPtr => "BytesNPtr",
        }
    }

    /// Unescaped string kinds: `string`, `*string` and nilable `*string`
    #[inline]
    pub const fn is_raw_string(self) -> bool {
        matches!(self, Self::String | Self::StringPtr | Self::StringNPtr)
    }

    /// The kind written with escaping. Identity for anything but raw strings.
    #[inline]
    pub const fn escaped(self) -> Self {
        match self {
            Self::String => Self::EscapedString,
            Self::StringPtr => Self::EscapedStringPtr,
            Self::StringNPtr => Self::EscapedStringNPtr,
            other => other,
        }
    }

    /// Containers that need several instructions to emit
    #[inline]
    pub const fn is_multi_step(self) -> bool {
        matches!(
            self,
            Self::Array | Self::Map | Self::MapLoad | Self::Slice | Self::Struct | Self::Recursive
        )
    }

    /// User-defined marshal hooks
    #[inline]
    pub const fn is_marshal_hook(self) -> bool {
        matches!(self, Self::MarshalJson | Self::MarshalText)
    }

    /// Integers that are quoted on output
    #[inline]
    pub const fn is_string_number(self) -> bool {
        matches!(
            self,
            Self::IntString
                | Self::Int8String
                | Self::Int16String
                | Self::Int32String
                | Self::Int64String
                | Self::UintString
                | Self::Uint8String
                | Self::Uint16String
                | Self::Uint32String
                | Self::Uint64String
        )
    }

    /// Whether a struct head carrying this kind may collapse with its end
    /// into a single only-field instruction.
    #[inline]
    pub const fn collapses_to_only(self) -> bool {
        !(self.is_multi_step() || self.is_marshal_hook() || self.is_string_number())
    }

    /// Whether a struct field carrying this kind may be folded into the
    /// struct end. Quoted integers and marshal hooks still fold.
    #[inline]
    pub const fn folds_into_end(self) -> bool {
        !self.is_multi_step()
    }

    /// Kinds that permit the only-field collapse, in enumeration order
    pub fn only_kinds() -> impl Iterator<Item = PayloadKind> {
        Self::ALL.into_iter().filter(|kind| kind.collapses_to_only())
    }
}

const fn count_only_kinds() -> usize {
    let mut count = 0;
    let mut i = 0;
    while i < PayloadKind::ALL.len() {
        if PayloadKind::ALL[i].collapses_to_only() {
            count += 1;
        }
        i += 1;
    }
    count
}

/// Name fragment for an optional payload; `None` renders as nothing
#[inline]
pub fn kind_fragment(kind: Option<PayloadKind>) -> &'static str {
    kind.map_or("", PayloadKind::name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discriminants_match_order() {
        for (i, kind) in PayloadKind::ALL.iter().enumerate() {
            assert_eq!(kind.to_byte() as usize, i, "{kind:?}");
            assert_eq!(PayloadKind::from_byte(i as u8), Some(*kind));
        }
        assert_eq!(PayloadKind::from_byte(KIND_COUNT as u8), None);
    }

    #[test]
    fn test_counts() {
        assert_eq!(KIND_COUNT, 66);
        assert_eq!(ONLY_KIND_COUNT, 48);
        assert_eq!(PayloadKind::only_kinds().count(), ONLY_KIND_COUNT);
    }

    #[test]
    fn test_escaped_is_idempotent() {
        for kind in PayloadKind::ALL {
            assert_eq!(kind.escaped().escaped(), kind.escaped());
            assert_eq!(kind.escaped() != kind, kind.is_raw_string());
        }
        assert_eq!(PayloadKind::StringNPtr.escaped(), PayloadKind::EscapedStringNPtr);
    }

    #[test]
    fn test_collapse_and_fold_asymmetry() {
        assert!(!PayloadKind::Map.collapses_to_only());
        assert!(!PayloadKind::Map.folds_into_end());
        assert!(!PayloadKind::IntString.collapses_to_only());
        assert!(PayloadKind::IntString.folds_into_end());
        assert!(!PayloadKind::MarshalText.collapses_to_only());
        assert!(PayloadKind::MarshalText.folds_into_end());
        assert!(PayloadKind::BytesNPtr.collapses_to_only());
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<_> = PayloadKind::ALL.iter().map(|k| k.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), KIND_COUNT);
        assert_eq!(kind_fragment(None), "");
        assert_eq!(kind_fragment(Some(PayloadKind::MarshalJson)), "MarshalJSON");
    }
}
