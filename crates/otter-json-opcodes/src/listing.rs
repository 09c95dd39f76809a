//! Persisted form of the catalog
//!
//! A listing carries enough for an external renderer to emit constant
//! declarations and dispatch tables without re-deriving the algebra.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::Result;
use crate::instruction::Category;
use crate::transition::Transition;

/// One instruction in a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingEntry {
    /// Instruction code
    pub code: u16,
    /// Instruction name
    pub name: String,
    /// Handler category
    pub category: Category,
    /// Whether this is an indent twin
    pub indent: bool,
    /// Target name of every transition, identity included
    pub transitions: BTreeMap<Transition, String>,
}

/// Instructions in code order with their transition results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    /// Offset between a compact instruction and its indent twin
    pub indent_offset: usize,
    /// Entries in code order
    pub entries: Vec<ListingEntry>,
}

impl Listing {
    /// Listing of the compact half, or of the whole catalog
    pub fn new(catalog: &Catalog, include_indent: bool) -> Self {
        let instructions = if include_indent {
            catalog.instructions()
        } else {
            catalog.base_instructions()
        };

        let entries = instructions
            .iter()
            .map(|instruction| ListingEntry {
                code: instruction.code.code(),
                name: instruction.name.to_string(),
                category: instruction.category,
                indent: instruction.indent,
                transitions: Transition::ALL
                    .into_iter()
                    .map(|t| {
                        let target = catalog.apply(t, instruction.code);
                        (t, catalog.instruction(target).name.to_string())
                    })
                    .collect(),
            })
            .collect();

        Self {
            indent_offset: catalog.base_len(),
            entries,
        }
    }

    /// JSON rendering
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    /// Parse a JSON listing
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// One line per instruction: code, name, category, then every transition
/// that is not the identity.
impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# indent offset {}", self.indent_offset)?;
        for entry in &self.entries {
            write!(f, "{:>5} {:<64} {:<12}", entry.code, entry.name, entry.category)?;
            for (transition, target) in &entry.transitions {
                if *target != entry.name {
                    write!(f, " {}={}", transition.name(), target)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{BASE_LEN, TOTAL_LEN};
    use crate::catalog::catalog;

    #[test]
    fn test_listing_sizes() {
        assert_eq!(Listing::new(catalog(), false).entries.len(), BASE_LEN);
        let full = Listing::new(catalog(), true);
        assert_eq!(full.entries.len(), TOTAL_LEN);
        assert_eq!(full.indent_offset, BASE_LEN);
        assert!(full.entries[BASE_LEN].indent);
    }

    #[test]
    fn test_entry_transitions() {
        let listing = Listing::new(catalog(), false);
        let entry = listing
            .entries
            .iter()
            .find(|e| e.name == "StructFieldBool")
            .unwrap();
        assert_eq!(entry.transitions.len(), Transition::ALL.len());
        assert_eq!(entry.transitions[&Transition::FieldToEnd], "StructEndBool");
        assert_eq!(entry.transitions[&Transition::HeadToPtrHead], "StructFieldBool");
    }

    #[test]
    fn test_json_shape() {
        let listing = Listing::new(catalog(), false);
        let json = listing.to_json(false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["indent_offset"], BASE_LEN);
        assert_eq!(value["entries"][0]["name"], "End");
        assert_eq!(value["entries"][0]["category"], "Op");
        assert_eq!(value["entries"][0]["transitions"]["escape"], "End");
        assert_eq!(Listing::from_json(&json).unwrap(), listing);
    }

    #[test]
    fn test_text_lists_only_changes() {
        let text = Listing::new(catalog(), false).to_string();
        let line = text
            .lines()
            .find(|l| l.split_whitespace().nth(1) == Some("String"))
            .unwrap();
        assert!(line.ends_with(" escape=EscapedString"));
        assert!(text.starts_with("# indent offset 5066\n"));
    }
}
