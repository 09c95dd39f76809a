//! Integrity checks run before a catalog is handed out

use crate::builder::{BASE_LEN, TOTAL_LEN};
use crate::catalog::Catalog;
use crate::error::{CatalogError, Result};
use crate::instruction::{INDENT_SUFFIX, Op};
use crate::transition::Transition;

/// Check every law the encoder compiler relies on.
///
/// - codes and names resolve back to the instruction that owns them
/// - indent twins sit at a fixed offset and mirror their compact twin
/// - every table entry is the code of the rewritten shape (closure)
/// - transitions commute with the indent pairing
/// - escaping twice is escaping once
pub fn verify(catalog: &Catalog) -> Result<()> {
    check_codes(catalog)?;
    check_indent_pairs(catalog)?;
    check_transitions(catalog)?;
    Ok(())
}

fn check_codes(catalog: &Catalog) -> Result<()> {
    if catalog.len() != TOTAL_LEN {
        return Err(CatalogError::SizeMismatch {
            expected: TOTAL_LEN,
            actual: catalog.len(),
        });
    }

    for (index, instruction) in catalog.instructions().iter().enumerate() {
        let by_code = instruction.code.index() == index;
        let by_name = catalog.lookup(&instruction.name) == Some(instruction.code);
        let by_shape = catalog.resolve(&instruction.shape, instruction.indent) == Some(instruction.code);
        if !(by_code && by_name && by_shape) {
            return Err(CatalogError::CodeMismatch {
                code: index as u16,
                name: instruction.name.to_string(),
            });
        }
    }
    Ok(())
}

fn check_indent_pairs(catalog: &Catalog) -> Result<()> {
    for base in catalog.base_instructions() {
        let twin = catalog.instruction(base.code.to_indent());
        let mirrored = !base.indent
            && twin.indent
            && twin.code.index() == base.code.index() + BASE_LEN
            && twin.shape == base.shape
            && twin.category == base.category
            && twin.name.strip_suffix(INDENT_SUFFIX) == Some(&*base.name)
            && twin.code.to_non_indent() == base.code;
        if !mirrored {
            return Err(CatalogError::IndentOffset {
                name: base.name.to_string(),
                offset: BASE_LEN,
            });
        }
    }
    Ok(())
}

fn check_transitions(catalog: &Catalog) -> Result<()> {
    for base in catalog.base_instructions() {
        let op = base.code;
        for transition in Transition::ALL {
            let target = catalog.apply(transition, op);
            let expected_shape = transition.rewrite(base.shape);

            match catalog.resolve(&expected_shape, false) {
                Some(expected) if expected == target && !target.is_indent() => {}
                Some(expected) => {
                    return Err(CatalogError::TransitionMismatch {
                        name: base.name.to_string(),
                        transition: transition.name(),
                        expected: name_of(catalog, expected),
                        actual: name_of(catalog, target),
                    });
                }
                None => {
                    return Err(CatalogError::UnresolvedTransition {
                        name: base.name.to_string(),
                        transition: transition.name(),
                    });
                }
            }

            // Resolved independently through the indent index, not the offset.
            let indent_target = catalog.apply(transition, op.to_indent());
            if catalog.resolve(&expected_shape, true) != Some(indent_target)
                || indent_target != target.to_indent()
            {
                return Err(CatalogError::IndentTransparency {
                    name: base.name.to_string(),
                    transition: transition.name(),
                });
            }
        }

        let once = catalog.apply(Transition::Escape, op);
        if catalog.apply(Transition::Escape, once) != once {
            return Err(CatalogError::NotIdempotent {
                name: base.name.to_string(),
                transition: Transition::Escape.name(),
            });
        }
    }
    Ok(())
}

fn name_of(catalog: &Catalog, op: Op) -> String {
    catalog.instruction(op).name.to_string()
}
