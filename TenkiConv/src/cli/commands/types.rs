//! CLI interface for the record type survey

use std::path::Path;

use anyhow::Context;

use crate::converter::survey_record_types;

pub fn execute(dir: &Path, section_ext: &str) -> anyhow::Result<()> {
    let counts = survey_record_types(dir, section_ext)
        .with_context(|| format!("Failed to survey {}", dir.display()))?;

    if counts.is_empty() {
        println!("No .{section_ext} files found in: {}", dir.display());
        return Ok(());
    }

    println!("Record types in {}:", dir.display());
    println!();
    println!("  {:<6} {:<8} {:>8}", "Tag", "Name", "Count");
    for (kind, count) in &counts {
        println!("  0x{:02X}   {:<8} {:>8}", kind.as_u32(), kind.name(), count);
    }
    println!();
    println!("Total: {} records", counts.values().sum::<usize>());

    Ok(())
}
