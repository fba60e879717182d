use std::path::Path;

use cb_engine::Session;
use comfy_table::{ContentArrangement, Table};

pub fn run(dir: &Path, config: Option<&Path>, district: Option<&str>) -> Result<(), String> {
    let book = super::load_casebook(dir)?;
    let session = Session::configured(book, config).map_err(|e| e.to_string())?;

    let groups: Vec<_> = session
        .directory()
        .into_iter()
        .filter(|g| district.is_none_or(|d| g.district.eq_ignore_ascii_case(d)))
        .collect();

    if groups.is_empty() {
        println!("  No locations found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Address", "District", "Letters", "Actions", "Sequences"]);

    let mut count = 0;
    for group in &groups {
        for entry in &group.entries {
            let Some(location) = session.casebook().location(entry.address.as_str()) else {
                continue;
            };
            let letters: Vec<String> = location
                .granted_letters()
                .iter()
                .map(|l| l.to_string())
                .collect();
            let letters = if letters.is_empty() {
                "-".to_string()
            } else {
                letters.join(" ")
            };
            let actions = location.all_actions().len().to_string();
            let sequences = location.sequences.len().to_string();
            table.add_row(vec![
                entry.address.as_str(),
                group.district.as_str(),
                letters.as_str(),
                actions.as_str(),
                sequences.as_str(),
            ]);
            count += 1;
        }
    }

    println!("{table}");
    println!();
    println!(
        "  {count} location{} in {} district{}",
        if count == 1 { "" } else { "s" },
        groups.len(),
        if groups.len() == 1 { "" } else { "s" }
    );

    Ok(())
}
