use std::path::Path;

use cb_core::validate_casebook;
use colored::Colorize;

pub fn run(dir: &Path, config: Option<&Path>) -> Result<(), String> {
    let book = super::load_casebook(dir)?;
    let config = super::load_config(config)?;

    let issues = validate_casebook(&book, &config.alphabet);
    for issue in &issues {
        let line = issue.to_string();
        if issue.is_error {
            eprintln!("  {}", line.red());
        } else {
            eprintln!("  {}", line.yellow());
        }
    }

    let errors = issues.iter().filter(|i| i.is_error).count();
    let warnings = issues.len() - errors;
    if errors > 0 {
        return Err(format!(
            "validation failed with {errors} error{}",
            if errors == 1 { "" } else { "s" }
        ));
    }

    let title = book.case().title.as_deref().unwrap_or("untitled case");
    println!("  All checks passed for '{title}'.");
    let letters: usize = book
        .locations()
        .flat_map(|(_, l)| l.granted_letters())
        .collect::<std::collections::BTreeSet<_>>()
        .len();
    println!(
        "  {} locations, {letters} letters, {warnings} warning{}",
        book.len(),
        if warnings == 1 { "" } else { "s" }
    );

    Ok(())
}
