//! Classify command - show how the naming grammar sees each path.

use colored::Colorize;
use bidscheck::grammar::{classify, path_values};

pub fn run(paths: Vec<String>, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut invalid = 0;

    for raw in &paths {
        let path = if raw.starts_with('/') {
            raw.clone()
        } else {
            format!("/{}", raw)
        };
        let category = classify(&path);

        let label = if category.is_valid() {
            category.label().green()
        } else {
            invalid += 1;
            category.label().red()
        };
        println!("{:<20} {}", label, path);

        if verbose {
            let values = path_values(&path);
            let show = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());
            println!(
                "{:<20} subject={} session={} task={} modality={}",
                "",
                show(&values.subject),
                show(&values.session),
                show(&values.task),
                show(&values.modality)
            );
        }
    }

    if invalid > 0 {
        return Err(format!("{} of {} paths are not valid BIDS names", invalid, paths.len()).into());
    }

    Ok(())
}
