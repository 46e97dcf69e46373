use anyhow::{Context, Result};
use csv::{Terminator, WriterBuilder};
use std::io::Write;

use crate::consolidation::{group_by_category, ConsolidatedEntry};

const CSV_HEADERS: [&str; 4] = ["name", "quantity", "category", "notes"];

/// Writes the consolidated list as CSV with a `name,quantity,category,notes` header.
pub fn write_csv<W: Write>(entries: &[ConsolidatedEntry], writer: W) -> Result<()> {
    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);
    wtr.write_record(CSV_HEADERS)
        .context("Failed to write CSV header")?;
    for entry in entries {
        wtr.write_record([
            entry.name.as_str(),
            entry.quantity.as_str(),
            entry.category.as_str(),
            entry.notes.as_str(),
        ])
        .with_context(|| format!("Failed to write CSV row for '{}'", entry.name))?;
    }
    wtr.flush().context("Failed to flush CSV output")?;
    Ok(())
}

/// Plain-text shopping list grouped by category.
pub fn render_text(entries: &[ConsolidatedEntry]) -> String {
    let mut out = String::new();
    for (index, (category, members)) in group_by_category(entries).into_iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        out.push_str(&format!("{}:\n", category));
        for entry in members {
            out.push_str(&format!("- {} {} ({})\n", entry.quantity, entry.name, entry.notes));
        }
    }
    out
}
