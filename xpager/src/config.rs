//! JSON loading of page iteration options

use xpager_core::PageOptions;

use crate::error::Result;

/// Parse and validate [`PageOptions`] from a JSON document
///
/// Missing fields take their defaults, so `{}` is a valid document.
pub fn options_from_json(json: &str) -> Result<PageOptions> {
    let options: PageOptions = serde_json::from_str(json)?;
    options.validate()?;
    Ok(options)
}

/// Serialize [`PageOptions`] to a JSON document
pub fn options_to_json(options: &PageOptions) -> Result<String> {
    Ok(serde_json::to_string_pretty(options)?)
}
