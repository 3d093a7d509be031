//! Built-in language modes

pub mod c;
pub mod gml;

use log::error;

use super::language::LanguageMode;

pub use gml::DEMO_TEXT;

/// Get all built-in language modes
///
/// The built-in declarations are static and known to be valid; a failure
/// here is logged and the mode skipped rather than taking the caller down.
pub fn all_modes() -> Vec<LanguageMode> {
    [gml::gml_mode(), c::c_mode()]
        .into_iter()
        .filter_map(|mode| match mode {
            Ok(mode) => Some(mode),
            Err(err) => {
                error!("built-in language mode failed to build: {}", err);
                None
            }
        })
        .collect()
}
