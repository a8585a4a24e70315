//! Example: Validate a BIDS dataset with bidscheck.
//!
//! Usage:
//!   cargo run --example validate_dataset -- <dataset_dir>
//!
//! Example:
//!   cargo run --example validate_dataset -- ~/data/ds000001

use std::env;
use std::path::Path;

use bidscheck::{BidsCheck, IssueGroup};

fn print_groups(title: &str, groups: &[IssueGroup]) {
    println!("## {} ({} codes)", title, groups.len());
    println!();
    for group in groups {
        println!("  [{}] {} ({} files)", group.code, group.key, group.files.len());
        println!("      {}", group.reason);
        for file in group.files.iter().take(5) {
            match &file.evidence {
                Some(evidence) => println!("      - {}: {}", file.path(), evidence),
                None => println!("      - {}", file.path()),
            }
        }
        if group.files.len() > 5 {
            println!("      ... and {} more", group.files.len() - 5);
        }
    }
    println!();
}

fn main() -> bidscheck::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example validate_dataset -- <dataset_dir>");
        std::process::exit(1);
    }

    let root = Path::new(&args[1]);
    if !root.is_dir() {
        eprintln!("Error: Not a directory: {}", root.display());
        std::process::exit(1);
    }

    let separator = "=".repeat(80);
    println!("{}", separator);
    println!("bidscheck: {}", root.display());
    println!("{}", separator);
    println!();

    let report = BidsCheck::new().validate(root)?;

    print_groups("Errors", &report.errors);
    print_groups("Warnings", &report.warnings);

    let summary = &report.summary;
    println!("## Summary");
    println!("  Files: {} ({} bytes)", summary.total_files, summary.size);
    println!("  Subjects: {}", summary.subjects.join(", "));
    println!("  Sessions: {}", summary.sessions.join(", "));
    println!("  Tasks: {}", summary.tasks.join(", "));
    println!("  Modalities: {}", summary.modalities.join(", "));

    Ok(())
}
