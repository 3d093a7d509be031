//! Configuration file support
//!
//! Loads settings from ~/.linemark.conf (or %USERPROFILE%\.linemark.conf on Windows)
//!
//! Format: simple key=value pairs, one per line
//! Lines starting with # are comments
//!
//! Example:
//! ```text
//! # linemark configuration
//! profile = Code::Blocks
//! line-numbers = true
//! tab-width = 4
//! languages-dir = /home/me/.config/linemark/languages
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use log::debug;

/// Configuration settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Style profile to select when the mode provides it
    pub profile: Option<String>,
    /// Whether to show line numbers
    pub show_line_numbers: bool,
    /// Tab width for display
    pub tab_width: usize,
    /// Directory of extra TOML language definitions
    pub languages_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profile: None,
            show_line_numbers: false,
            tab_width: 8,
            languages_dir: None,
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(windows)]
        {
            std::env::var("USERPROFILE")
                .ok()
                .map(|home| PathBuf::from(home).join(".linemark.conf"))
        }

        #[cfg(not(windows))]
        {
            std::env::var("HOME")
                .ok()
                .map(|home| PathBuf::from(home).join(".linemark.conf"))
        }
    }

    /// Load configuration from file, falling back to defaults
    pub fn load() -> Self {
        let mut config = Config::default();

        if let Some(path) = Self::config_path() {
            if let Ok(contents) = fs::read_to_string(&path) {
                debug!("loading configuration from {}", path.display());
                config.apply(&Self::parse(&contents));
            }
        }

        config
    }

    /// Parse config file contents into key-value pairs
    fn parse(contents: &str) -> HashMap<String, String> {
        let mut settings = HashMap::new();

        for line in contents.lines() {
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim().to_lowercase();
                let value = value.trim().to_string();
                settings.insert(key, value);
            }
        }

        settings
    }

    /// Apply settings from parsed config
    fn apply(&mut self, settings: &HashMap<String, String>) {
        if let Some(value) = settings.get("profile") {
            self.profile = (!value.is_empty()).then(|| value.clone());
        }

        if let Some(value) = settings.get("line-numbers") {
            self.show_line_numbers = parse_bool(value);
        }

        if let Some(value) = settings.get("tab-width") {
            if let Ok(n) = value.parse::<usize>() {
                self.tab_width = n.clamp(1, 16);
            }
        }

        if let Some(value) = settings.get("languages-dir") {
            self.languages_dir = (!value.is_empty()).then(|| PathBuf::from(value));
        }
    }
}

/// Parse a boolean value from string
fn parse_bool(s: &str) -> bool {
    let s = s.to_lowercase();
    matches!(s.as_str(), "true" | "yes" | "on" | "1")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let contents = r#"
# Comment
profile = Code::Blocks
line-numbers = true
tab-width = 4
languages-dir = /tmp/langs
        "#;

        let settings = Config::parse(contents);
        assert_eq!(settings.get("profile"), Some(&"Code::Blocks".to_string()));
        assert_eq!(settings.get("line-numbers"), Some(&"true".to_string()));
        assert_eq!(settings.get("tab-width"), Some(&"4".to_string()));
        assert_eq!(settings.get("languages-dir"), Some(&"/tmp/langs".to_string()));
    }

    #[test]
    fn test_apply_settings() {
        let mut config = Config::default();
        let mut settings = HashMap::new();
        settings.insert("profile".to_string(), "Advanced".to_string());
        settings.insert("line-numbers".to_string(), "yes".to_string());
        settings.insert("tab-width".to_string(), "2".to_string());
        settings.insert("languages-dir".to_string(), "langs".to_string());

        config.apply(&settings);

        assert_eq!(config.profile.as_deref(), Some("Advanced"));
        assert!(config.show_line_numbers);
        assert_eq!(config.tab_width, 2);
        assert_eq!(config.languages_dir, Some(PathBuf::from("langs")));
    }

    #[test]
    fn test_tab_width_is_clamped() {
        let mut config = Config::default();
        let mut settings = HashMap::new();
        settings.insert("tab-width".to_string(), "0".to_string());
        config.apply(&settings);
        assert_eq!(config.tab_width, 1);

        settings.insert("tab-width".to_string(), "99".to_string());
        config.apply(&settings);
        assert_eq!(config.tab_width, 16);

        settings.insert("tab-width".to_string(), "wide".to_string());
        config.apply(&settings);
        assert_eq!(config.tab_width, 16);
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("true"));
        assert!(parse_bool("True"));
        assert!(parse_bool("on"));
        assert!(parse_bool("1"));

        assert!(!parse_bool("false"));
        assert!(!parse_bool("off"));
        assert!(!parse_bool("anything"));
    }
}
