//! Validate command - check a dataset and print the report.

use std::path::PathBuf;

use colored::{ColoredString, Colorize};
use bidscheck::{BidsCheck, BidsCheckConfig, IssueGroup, Severity, Summary, ValidatorOptions};

/// Files listed per issue group unless verbose.
const FILES_PER_GROUP: usize = 10;

pub fn run(
    dir: PathBuf,
    ignore_warnings: bool,
    ignore_nifti_headers: bool,
    threads: Option<usize>,
    json_output: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = ValidatorOptions::default()
        .with_ignore_warnings(ignore_warnings)
        .with_ignore_nifti_headers(ignore_nifti_headers);
    let mut config = BidsCheckConfig::default().with_options(options);
    if let Some(threads) = threads {
        config = config.with_threads(threads);
    }

    if !json_output {
        eprintln!("{} {}", "Validating".cyan().bold(), dir.display());
    }

    let report = BidsCheck::with_config(config).validate(&dir)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for group in report.errors.iter().chain(report.warnings.iter()) {
            print_group(group, verbose);
        }
        print_summary(&report.summary);

        if report.errors.is_empty() && report.warnings.is_empty() {
            println!("{}", "This dataset appears to be BIDS compatible.".green().bold());
        } else {
            println!(
                "{} {} and {}",
                "Found".bold(),
                format!("{} errors", report.error_count()).red().bold(),
                format!("{} warnings", report.warning_count()).yellow().bold()
            );
        }
    }

    if !report.is_valid() {
        return Err(format!("{} has {} errors", dir.display(), report.error_count()).into());
    }

    Ok(())
}

fn severity_label(severity: Severity) -> ColoredString {
    match severity {
        Severity::Error => severity.label().red().bold(),
        Severity::Warning => severity.label().yellow().bold(),
    }
}

fn print_group(group: &IssueGroup, verbose: bool) {
    println!(
        "{} [Code {}] {}",
        severity_label(group.severity),
        group.code,
        group.key.white().bold()
    );
    println!("  {}", group.reason.dimmed());

    let shown = if verbose {
        group.files.len()
    } else {
        FILES_PER_GROUP.min(group.files.len())
    };
    for file in &group.files[..shown] {
        let path = if file.path().is_empty() { "(dataset)" } else { file.path() };
        let location = match file.line {
            Some(line) => format!("{}:{}", path, line),
            None => path.to_string(),
        };
        println!("    {}", location.cyan());
        if let Some(reason) = &file.reason {
            println!("      {}", reason);
        }
        if let Some(evidence) = &file.evidence {
            println!("      Evidence: {}", evidence);
        }
    }
    if shown < group.files.len() {
        println!(
            "    ... and {} more (use --verbose to list all)",
            group.files.len() - shown
        );
    }
    println!();
}

fn print_summary(summary: &Summary) {
    let list = |values: &[String]| {
        if values.is_empty() {
            "-".to_string()
        } else {
            values.join(", ")
        }
    };

    println!("{}", "Summary:".yellow().bold());
    println!("  Files:      {} ({})", summary.total_files, format_size(summary.size));
    println!("  Subjects:   {}", list(&summary.subjects));
    println!("  Sessions:   {}", list(&summary.sessions));
    println!("  Tasks:      {}", list(&summary.tasks));
    println!("  Modalities: {}", list(&summary.modalities));
    println!();
}

fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}
