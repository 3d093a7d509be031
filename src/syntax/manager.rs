//! Language mode registry
//!
//! The [`ModeRegistry`] holds the available language modes and picks one
//! for a file by its extension. Each mode is built once and its rule set
//! shared by every document using it.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::{debug, warn};

use super::builtin;
use super::language::LanguageMode;
use crate::error::{Error, Result};

/// Available language modes
pub struct ModeRegistry {
    /// Loaded modes, keyed by lowercase name
    modes: HashMap<String, LanguageMode>,
    /// Extension to mode key mapping
    extension_map: HashMap<String, String>,
}

impl ModeRegistry {
    /// Create a registry with the built-in modes
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for mode in builtin::all_modes() {
            registry.add_mode(mode);
        }
        registry
    }

    /// Create a registry without any modes
    pub fn empty() -> Self {
        Self {
            modes: HashMap::new(),
            extension_map: HashMap::new(),
        }
    }

    /// Add a mode, replacing any mode with the same name
    pub fn add_mode(&mut self, mode: LanguageMode) {
        let key = mode.name().to_lowercase();
        for ext in mode.extensions() {
            self.extension_map.insert(ext.to_lowercase(), key.clone());
        }
        debug!("registered language mode {}", mode.name());
        self.modes.insert(key, mode);
    }

    /// Load every `*.toml` language file in `dir`
    ///
    /// A file that fails to load is skipped with a warning so one broken
    /// definition does not hide the others. Returns the number loaded.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize> {
        let mut loaded = 0;
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("toml") {
                continue;
            }
            match LanguageMode::load(&path) {
                Ok(mode) => {
                    self.add_mode(mode);
                    loaded += 1;
                }
                Err(err) => warn!("skipping language file {}: {}", path.display(), err),
            }
        }
        Ok(loaded)
    }

    /// Detect the mode for a file from its extension
    pub fn detect(&self, filename: &Path) -> Option<&LanguageMode> {
        let ext = filename.extension()?.to_str()?.to_lowercase();
        self.extension_map
            .get(&ext)
            .and_then(|key| self.modes.get(key))
    }

    /// Get a mode by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&LanguageMode> {
        self.modes.get(&name.to_lowercase())
    }

    /// Get a mode by name or fail with [`Error::UnknownMode`]
    pub fn require(&self, name: &str) -> Result<&LanguageMode> {
        self.get(name)
            .ok_or_else(|| Error::UnknownMode(name.to_string()))
    }

    /// List available mode names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.modes.values().map(|mode| mode.name()).collect();
        names.sort();
        names
    }
}

impl Default for ModeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
