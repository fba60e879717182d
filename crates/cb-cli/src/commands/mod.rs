pub mod check;
pub mod list;
pub mod play;
pub mod show;

use std::path::Path;

use cb_core::{Address, Casebook};
use cb_engine::EngineConfig;
use strsim::jaro_winkler;

/// Minimum similarity score for suggesting an address (0.0-1.0).
const FUZZY_THRESHOLD: f64 = 0.8;

/// Load the case data from a directory.
fn load_casebook(dir: &Path) -> Result<Casebook, String> {
    let book = Casebook::load_dir(dir).map_err(|e| e.to_string())?;
    log::debug!("loaded {} locations from {}", book.len(), dir.display());
    Ok(book)
}

/// Load the engine configuration, or the defaults when no file is given.
fn load_config(path: Option<&Path>) -> Result<EngineConfig, String> {
    match path {
        Some(path) => EngineConfig::load(path).map_err(|e| e.to_string()),
        None => Ok(EngineConfig::default()),
    }
}

/// Match user input against the known addresses.
///
/// Matching ignores case and extra whitespace. When nothing matches, the
/// error suggests the closest address.
fn resolve_address(book: &Casebook, input: &str) -> Result<Address, String> {
    let wanted = input.split_whitespace().collect::<Vec<_>>().join(" ");
    if let Some(address) = book
        .addresses()
        .find(|a| a.as_str().eq_ignore_ascii_case(&wanted))
    {
        return Ok(address.clone());
    }

    let wanted_lower = wanted.to_lowercase();
    let mut scored: Vec<(&Address, f64)> = book
        .addresses()
        .map(|a| (a, jaro_winkler(&wanted_lower, &a.as_str().to_lowercase())))
        .filter(|(_, score)| *score >= FUZZY_THRESHOLD)
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    match scored.first() {
        Some((closest, _)) => Err(format!(
            "unknown address \"{wanted}\" (did you mean \"{closest}\"?)"
        )),
        None => Err(format!("unknown address \"{wanted}\"")),
    }
}
