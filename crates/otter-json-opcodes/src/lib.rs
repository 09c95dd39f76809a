//! # Otter JSON Opcodes
//!
//! Instruction catalog and transition tables for the Otter JSON encoder.
//!
//! ## Design Principles
//!
//! - **Enumerated**: instructions are the product of a few orthogonal axes;
//!   the enumeration order is the instruction code
//! - **Closed**: every transition maps the catalog into itself, identity when
//!   its axis does not apply
//! - **Indent transparent**: indent twins sit at a fixed offset and every
//!   transition commutes with the pairing
//! - **Immutable**: built once behind a `OnceLock`, read without locking

#![warn(clippy::all)]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod axis;
mod builder;
pub mod catalog;
pub mod error;
pub mod instruction;
pub mod kind;
pub mod listing;
pub mod transition;
pub mod verify;

pub use axis::{Embedding, EmptyPolicy, Escape, PtrDepth, Role};
pub use builder::{
    BASE_LEN, CONTROL_COUNT, END_COUNT, FIELD_COUNT, HEAD_COUNT, LEAF_COUNT, ONLY_HEAD_COUNT,
    TOTAL_LEN,
};
pub use catalog::{Catalog, CatalogStats, catalog};
pub use error::CatalogError;
pub use instruction::{Category, Control, FieldShape, HeadShape, INDENT_SUFFIX, Instruction, Op, Shape};
pub use kind::{KIND_COUNT, ONLY_KIND_COUNT, PayloadKind};
pub use listing::{Listing, ListingEntry};
pub use transition::{TRANSITION_COUNT, Transition};
