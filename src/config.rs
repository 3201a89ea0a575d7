//! Shell configuration.
//!
//! Centralizes the constants used throughout the crate and the
//! [`ShellConfig`] loaded from TOML.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::core::error::ShellError;

// =============================================================================
// Defaults
// =============================================================================

/// Prompt shown when the state does not provide one.
pub const DEFAULT_PROMPT: &str = "> ";

/// Message printed once before the first prompt.
pub const WELCOME_MESSAGE: &str = "Welcome. Type 'help' for help.";

/// Maximum number of entries kept in the in-memory line history.
pub const DEFAULT_HISTORY_SIZE: usize = 100;

/// First line printed by the built-in `help` command.
pub const HELP_HEADER: &str = "Available commands:";

// =============================================================================
// Line Editor Options
// =============================================================================

/// Key bindings of the line editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditMode {
    #[default]
    Emacs,
    Vi,
}

/// How multiple completion candidates are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionType {
    /// List all candidates after the longest common prefix.
    #[default]
    List,
    /// Cycle through candidates on repeated Tab.
    Circular,
}

// =============================================================================
// Shell Configuration
// =============================================================================

/// Runtime options of a shell session.
///
/// Every field has a default, so an empty document is a valid configuration:
///
/// ```toml
/// prompt = "$ "
/// welcome = ""          # no welcome message
/// history_size = 500
/// edit_mode = "vi"
/// completion_type = "circular"
/// strict_completion = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShellConfig {
    pub prompt: String,
    /// Empty disables the welcome message.
    pub welcome: String,
    pub history_size: usize,
    pub auto_add_history: bool,
    pub edit_mode: EditMode,
    pub completion_type: CompletionType,
    /// Require every earlier argument to match its completer.
    pub strict_completion: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            welcome: WELCOME_MESSAGE.to_string(),
            history_size: DEFAULT_HISTORY_SIZE,
            auto_add_history: true,
            edit_mode: EditMode::default(),
            completion_type: CompletionType::default(),
            strict_completion: false,
        }
    }
}

impl ShellConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ShellError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ShellError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ShellError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// The welcome message, or `None` when disabled.
    pub fn welcome_message(&self) -> Option<&str> {
        (!self.welcome.is_empty()).then_some(self.welcome.as_str())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = ShellConfig::from_toml_str("").unwrap();
        assert_eq!(config, ShellConfig::default());
        assert_eq!(config.prompt, "> ");
        assert_eq!(config.welcome_message(), Some(WELCOME_MESSAGE));
        assert_eq!(config.history_size, 100);
        assert!(config.auto_add_history);
        assert!(!config.strict_completion);
    }

    #[test]
    fn test_partial_document() {
        let config = ShellConfig::from_toml_str(
            r#"
            prompt = "$ "
            edit_mode = "vi"
            completion_type = "circular"
            "#,
        )
        .unwrap();
        assert_eq!(config.prompt, "$ ");
        assert_eq!(config.edit_mode, EditMode::Vi);
        assert_eq!(config.completion_type, CompletionType::Circular);
        assert_eq!(config.history_size, DEFAULT_HISTORY_SIZE);
    }

    #[test]
    fn test_empty_welcome_disables_it() {
        let config = ShellConfig::from_toml_str("welcome = \"\"").unwrap();
        assert_eq!(config.welcome_message(), None);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = ShellConfig::from_toml_str("colour = true").unwrap_err();
        assert!(matches!(err, ShellError::ConfigParse(_)));
    }

    #[test]
    fn test_bad_enum_value_rejected() {
        assert!(ShellConfig::from_toml_str("edit_mode = \"nano\"").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shell.toml");
        fs::write(&path, "history_size = 7\nstrict_completion = true\n").unwrap();

        let config = ShellConfig::load(&path).unwrap();
        assert_eq!(config.history_size, 7);
        assert!(config.strict_completion);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        match ShellConfig::load(&path) {
            Err(ShellError::ConfigRead { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected ConfigRead, got {other:?}"),
        }
    }
}
