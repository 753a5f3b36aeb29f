//! Configuration loading from TOML files and environment variables.
//!
//! Config is loaded in this order of precedence (highest wins):
//! 1. Environment variables (`RETINT_TWEAKS_FILE`)
//! 2. TOML file specified via --config CLI flag
//! 3. ./retint.toml in the current directory
//! 4. $XDG_CONFIG_HOME/retint/retint.toml (or ~/.config/retint/retint.toml)
//! 5. Built-in defaults

use crate::error::ConfigError;
use crate::picker::AdjustSteps;
use serde::Deserialize;
use std::path::PathBuf;

const DEFAULT_TWEAKS_FILE_NAME: &str = "tweaks.json";

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

/// Top-level runtime configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Backing JSON file for persisted tweaks.
    pub tweaks_file: PathBuf,
    /// Step sizes for the relative adjustment intents.
    pub steps: AdjustSteps,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tweaks_file: default_tweaks_file_path(),
            steps: AdjustSteps::default(),
        }
    }
}

/// On-disk shape of `retint.toml`; every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    tweaks_file: Option<String>,
    steps: StepsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct StepsConfig {
    hue: f32,
    lightness: f32,
    saturation: f32,
}

impl Default for StepsConfig {
    fn default() -> Self {
        let steps = AdjustSteps::default();
        Self {
            hue: steps.hue,
            lightness: steps.lightness,
            saturation: steps.saturation,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load configuration from disk and environment.
///
/// `path_override` is an explicit config file path (from --config flag).
pub fn load_config(path_override: Option<&str>) -> Result<Config, ConfigError> {
    let config_text = if let Some(p) = path_override {
        // Explicit path: fail if it doesn't exist.
        std::fs::read_to_string(p)?
    } else if let Ok(text) = std::fs::read_to_string("retint.toml") {
        text
    } else if let Some(dir) = config_root_dir() {
        let global = dir.join("retint").join("retint.toml");
        std::fs::read_to_string(global).unwrap_or_default()
    } else {
        String::new()
    };

    let parsed: FileConfig = toml::from_str(&config_text)?;
    let mut config = resolve_config(parsed)?;

    // Environment variable override for the tweak file location.
    if let Ok(path) = std::env::var("RETINT_TWEAKS_FILE") {
        let trimmed = path.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::Invalid(
                "RETINT_TWEAKS_FILE is set but empty".to_string(),
            ));
        }
        config.tweaks_file = PathBuf::from(trimmed);
    }

    Ok(config)
}

fn resolve_config(parsed: FileConfig) -> Result<Config, ConfigError> {
    let steps = AdjustSteps {
        hue: parsed.steps.hue,
        lightness: parsed.steps.lightness,
        saturation: parsed.steps.saturation,
    };
    validate_steps(&steps)?;

    let tweaks_file = match normalized_option(&parsed.tweaks_file) {
        Some(path) => PathBuf::from(path),
        None => default_tweaks_file_path(),
    };

    Ok(Config { tweaks_file, steps })
}

fn validate_steps(steps: &AdjustSteps) -> Result<(), ConfigError> {
    if !(steps.hue > 0.0 && steps.hue < 360.0) {
        return Err(ConfigError::Invalid(format!(
            "steps.hue must be in (0, 360), got {}",
            steps.hue
        )));
    }
    if !(steps.lightness > 0.0 && steps.lightness <= 1.0) {
        return Err(ConfigError::Invalid(format!(
            "steps.lightness must be in (0, 1], got {}",
            steps.lightness
        )));
    }
    if !(steps.saturation > 0.0 && steps.saturation <= 1.0) {
        return Err(ConfigError::Invalid(format!(
            "steps.saturation must be in (0, 1], got {}",
            steps.saturation
        )));
    }
    Ok(())
}

/// Default per-user tweak file path (`~/.config/retint/tweaks.json`).
///
/// Falls back to the current directory when no config root resolves.
pub fn default_tweaks_file_path() -> PathBuf {
    config_root_dir()
        .map(|dir| dir.join("retint").join(DEFAULT_TWEAKS_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_TWEAKS_FILE_NAME))
}

fn normalized_option(value: &Option<String>) -> Option<String> {
    value.as_deref().and_then(|v| {
        let trimmed = v.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

pub fn config_root_dir() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("XDG_CONFIG_HOME") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    dirs::home_dir()
        .map(|home| home.join(".config"))
        .or_else(dirs::config_dir)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::TestTempDir;

    fn parse_for_test(toml_text: &str) -> Result<Config, ConfigError> {
        let parsed: FileConfig = toml::from_str(toml_text)?;
        resolve_config(parsed)
    }

    // Ensures the precedence chain: env var beats the config file, and the
    // config file beats the built-in default path.
    #[test]
    fn env_var_beats_config_file_beats_defaults() {
        let dir = TestTempDir::new("config-precedence");
        let file = dir.write_text("retint.toml", "tweaks_file = \"/from/file.json\"");
        let file_arg = file.to_str().unwrap();

        let c = load_config(Some(file_arg)).unwrap();
        assert_eq!(c.tweaks_file, PathBuf::from("/from/file.json"));

        std::env::set_var("RETINT_TWEAKS_FILE", "/from/env.json");
        let c = load_config(Some(file_arg));
        std::env::remove_var("RETINT_TWEAKS_FILE");
        assert_eq!(c.unwrap().tweaks_file, PathBuf::from("/from/env.json"));
    }

    #[test]
    fn explicit_config_path_must_exist() {
        let dir = TestTempDir::new("config-missing");
        let missing = dir.child("nope.toml");
        assert!(matches!(
            load_config(Some(missing.to_str().unwrap())),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn defaults_are_sensible() {
        let c = Config::default();
        assert!(c.tweaks_file.ends_with("tweaks.json"));
        assert_eq!(c.steps, AdjustSteps::default());
    }

    #[test]
    fn parse_empty_string_yields_defaults() {
        let c = parse_for_test("").unwrap();
        assert_eq!(c, Config::default());
    }

    #[test]
    fn parse_partial_toml() {
        let toml = r#"
            tweaks_file = "/tmp/retint/tweaks.json"

            [steps]
            hue = 15.0
        "#;
        let c = parse_for_test(toml).unwrap();
        assert_eq!(c.tweaks_file, PathBuf::from("/tmp/retint/tweaks.json"));
        assert_eq!(c.steps.hue, 15.0);
        // Unset steps keep their defaults.
        assert_eq!(c.steps.lightness, AdjustSteps::default().lightness);
    }

    #[test]
    fn blank_tweaks_file_falls_back_to_default() {
        let c = parse_for_test("tweaks_file = \"  \"").unwrap();
        assert_eq!(c.tweaks_file, default_tweaks_file_path());
    }

    #[test]
    fn out_of_range_steps_are_rejected() {
        for toml in [
            "[steps]\nhue = 0.0",
            "[steps]\nhue = 360.0",
            "[steps]\nlightness = -0.1",
            "[steps]\nlightness = 1.5",
            "[steps]\nsaturation = 0.0",
        ] {
            let err = parse_for_test(toml).unwrap_err();
            assert!(
                err.to_string().starts_with("invalid config:"),
                "{toml} gave: {err}"
            );
        }
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(matches!(
            parse_for_test("steps = [unclosed"),
            Err(ConfigError::Toml(_))
        ));
    }
}
