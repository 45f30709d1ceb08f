//! CLI interface for script conversion

use std::path::PathBuf;
use std::time::Instant;

use crate::cli::progress::{
    GEAR, LOOKING_GLASS, print_done, print_failure, print_skipped, print_step, print_success,
    simple_bar,
};
use crate::converter::{ConvertOptions, batch_convert, collect_inputs};
use crate::formats::TableFormat;

pub fn execute(
    paths: &[PathBuf],
    format: TableFormat,
    backup: bool,
    dry_run: bool,
    section_ext: &str,
    quiet: bool,
) -> anyhow::Result<()> {
    let options = ConvertOptions::new()
        .with_table_format(format)
        .with_section_extension(section_ext)
        .with_backup(backup)
        .with_dry_run(dry_run);

    let start = Instant::now();
    let files = collect_inputs(paths);
    if files.is_empty() {
        println!("No scripts found");
        return Ok(());
    }

    print_step(1, 2, &LOOKING_GLASS, &format!("Found {} files", files.len()));
    print_step(
        2,
        2,
        &GEAR,
        if dry_run {
            "Converting (dry run)..."
        } else {
            "Converting..."
        },
    );

    let pb = if quiet {
        None
    } else {
        Some(simple_bar(files.len() as u64, "Converting"))
    };

    let result = batch_convert(&files, &options, &|progress| {
        if let Some(pb) = &pb {
            pb.set_position(progress.current as u64);
            if let Some(ref name) = progress.current_file {
                pb.set_message(name.clone());
            }
        }
    });

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    for msg in &result.results {
        if msg.starts_with("Failed") {
            print_failure(msg);
        } else if msg.starts_with("Skipped") {
            print_skipped(msg);
        } else {
            print_success(msg);
        }
    }

    println!();
    println!("Conversion complete:");
    println!("  Success: {}", result.success_count);
    println!("  Failed: {}", result.fail_count);
    println!("  Skipped: {}", result.skipped_count);
    print_done(start.elapsed());

    if !result.is_success() {
        anyhow::bail!("{} of {} files failed", result.fail_count, files.len());
    }
    Ok(())
}
