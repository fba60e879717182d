use std::path::Path;

use cb_engine::Session;

use crate::render;

pub fn run(dir: &Path, config: Option<&Path>, address: &str, json: bool) -> Result<(), String> {
    let book = super::load_casebook(dir)?;
    let address = super::resolve_address(&book, address)?;

    let mut session = Session::configured(book, config).map_err(|e| e.to_string())?;
    let result = session.visit(address.as_str()).map_err(|e| e.to_string())?;

    if json {
        let text = serde_json::to_string_pretty(&result).map_err(|e| e.to_string())?;
        println!("{text}");
    } else {
        render::print_result(&result);
    }

    Ok(())
}
