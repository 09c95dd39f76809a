//! Catalog integrity errors

use thiserror::Error;

/// Integrity violations detected while building or verifying the catalog.
///
/// None of these can happen at run time; each one means the axis tables
/// themselves are inconsistent.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Two instructions render to the same name
    #[error("Duplicate instruction name {name} (codes {first} and {second})")]
    DuplicateName {
        /// Colliding name
        name: String,
        /// Code of the first instruction with this name
        first: u16,
        /// Code of the second instruction with this name
        second: u16,
    },

    /// Two instructions decompose into the same axis values
    #[error("Duplicate instruction shape for {name}")]
    DuplicateShape {
        /// Name of the second instruction
        name: String,
    },

    /// The builder produced a different number of instructions than the axes imply
    #[error("Catalog size mismatch: expected {expected} instructions, built {actual}")]
    SizeMismatch {
        /// Size implied by the axes
        expected: usize,
        /// Size actually built
        actual: usize,
    },

    /// A code beyond the end of the catalog
    #[error("Code {code} is outside the catalog")]
    InvalidCode {
        /// Offending code
        code: u16,
    },

    /// A code does not resolve back to the instruction that owns it
    #[error("Code {code} does not resolve to {name}")]
    CodeMismatch {
        /// Offending code
        code: u16,
        /// Instruction expected at that code
        name: String,
    },

    /// A transition rewrote an instruction into axis values outside the catalog
    #[error("Transition {transition} of {name} has no target in the catalog")]
    UnresolvedTransition {
        /// Source instruction
        name: String,
        /// Transition name
        transition: &'static str,
    },

    /// A table entry disagrees with the shape rewrite it was derived from
    #[error("Transition {transition} of {name} yields {actual}, expected {expected}")]
    TransitionMismatch {
        /// Source instruction
        name: String,
        /// Transition name
        transition: &'static str,
        /// Target the rewrite implies
        expected: String,
        /// Target in the table
        actual: String,
    },

    /// An indent twin is not at the fixed offset from its compact instruction
    #[error("Indent twin of {name} is not at offset {offset}")]
    IndentOffset {
        /// Compact instruction
        name: String,
        /// Expected offset
        offset: usize,
    },

    /// A transition does not commute with the indent pairing
    #[error("Transition {transition} is not indent transparent at {name}")]
    IndentTransparency {
        /// Compact instruction
        name: String,
        /// Transition name
        transition: &'static str,
    },

    /// Applying a transition twice differs from applying it once
    #[error("Transition {transition} is not idempotent at {name}")]
    NotIdempotent {
        /// Source instruction
        name: String,
        /// Transition name
        transition: &'static str,
    },

    /// Listing serialization failed
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;
