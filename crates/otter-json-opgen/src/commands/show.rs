//! Show command - describe one instruction.

use anyhow::Result;
use clap::Args;
use otter_json_opcodes::{Catalog, Op, Shape, Transition, catalog};
use std::fmt::Write;

#[derive(Args)]
pub struct ShowCommand {
    /// Instruction name, e.g. StructFieldHeadInt
    pub name: String,

    /// Also list transitions that leave the instruction unchanged
    #[arg(long)]
    pub all: bool,
}

impl ShowCommand {
    pub fn run(&self) -> Result<()> {
        let catalog = catalog();
        let op = catalog
            .lookup(&self.name)
            .ok_or_else(|| anyhow::anyhow!("Unknown instruction: {}", self.name))?;

        print!("{}", describe(catalog, op, self.all)?);
        Ok(())
    }
}

/// Multi-line description of an instruction and its transitions
pub fn describe(catalog: &Catalog, op: Op, all: bool) -> Result<String, std::fmt::Error> {
    let instruction = catalog.instruction(op);
    let mut out = String::new();

    writeln!(out, "{}", instruction.name)?;
    writeln!(out, "  code:      {}", op.code())?;
    writeln!(out, "  category:  {}", instruction.category)?;
    writeln!(out, "  indent:    {}", instruction.indent)?;
    if op.is_indent() {
        writeln!(out, "  compact:   {}", catalog.instruction(op.to_non_indent()).name)?;
    } else {
        writeln!(out, "  indented:  {}", catalog.instruction(op.to_indent()).name)?;
    }

    match instruction.shape {
        Shape::Control(_) => {
            writeln!(out, "  shape:     control")?;
        }
        Shape::Leaf(kind) => {
            writeln!(out, "  shape:     leaf {kind:?}")?;
        }
        Shape::Head(head) => {
            let role = if head.only { "head-only" } else { "head" };
            writeln!(
                out,
                "  shape:     {role} escape={:?} depth={:?} embedding={:?} policy={:?} kind={:?}",
                head.escape, head.depth, head.embedding, head.policy, head.kind
            )?;
        }
        Shape::Field(field) | Shape::End(field) => {
            let role = if matches!(instruction.shape, Shape::End(_)) { "end" } else { "field" };
            writeln!(
                out,
                "  shape:     {role} escape={:?} policy={:?} kind={:?}",
                field.escape, field.policy, field.kind
            )?;
        }
    }

    writeln!(out, "  transitions:")?;
    for transition in Transition::ALL {
        let target = catalog.apply(transition, op);
        if target != op || all {
            writeln!(
                out,
                "    {:<27} {}",
                transition.name(),
                catalog.instruction(target).name
            )?;
        }
    }

    Ok(out)
}
