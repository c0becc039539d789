//! Environment variable handling and .env file management

use crate::error::{AppError, Result};
use crate::logging::LogFormat;
use crate::models::config::parse_chart_list;
use crate::types::ImageFormat;
use std::path::Path;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load .env file if it exists
    pub fn load_env_file(debug: bool) -> Result<()> {
        Self::load_env_file_from(Path::new(".env"), debug)
    }

    /// Load a specific env file if it exists; variables already set in the process win
    pub fn load_env_file_from(path: &Path, debug: bool) -> Result<()> {
        if path.exists() {
            dotenv::from_path(path)
                .map_err(|e| AppError::config(format!("Failed to load {}: {}", path.display(), e)))?;

            if debug {
                eprintln!("Loaded configuration from {}", path.display());
            }
        } else if debug {
            eprintln!("No {} file found, using defaults and CLI arguments", path.display());
        }

        Ok(())
    }

    /// Create example .env file content
    pub fn create_example_env_content() -> String {
        r#"# Stream Telemetry Plotter Configuration
#
# Values specified here are used as defaults and can be overridden
# by command-line arguments.

# Telemetry logs (CSV: frame_id, frame_size_bytes, timestamp_us, metric)
# STP_ENCODER_LOG=logs/encoder.csv
# STP_DECODER_LOG=logs/decoder.csv
# STP_RTT_LOG=logs/rtt.csv

# Directory the charts are written to
# STP_OUTPUT_DIR=plots

# Video frame rate (1-240); one chart point per this many frames
# STP_FPS=24

# Leading throughput windows to discard
# STP_WARMUP_WINDOWS=2

# Charts to render (comma-separated: encoding, decoding, throughput, rtt)
# STP_CHARTS=throughput,decoding

# Image format (png or svg) and size in pixels
# STP_FORMAT=png
# STP_CHART_WIDTH=640
# STP_CHART_HEIGHT=480

# Legend label of the throughput series
# STP_LABEL=Baseline

# Diagnostic log format (console, json, compact)
# STP_LOG_FORMAT=console

# Enable colored output (true/false)
# ENABLE_COLOR=true

# Example configurations:
#
# Comparing a 60 fps capture without warm-up trimming:
# STP_FPS=60
# STP_WARMUP_WINDOWS=0
#
# Vector output for reports:
# STP_FORMAT=svg
# STP_CHART_WIDTH=1024
# STP_CHART_HEIGHT=600
"#
        .to_string()
    }

    /// Save example .env file to disk
    pub fn save_example_env_file(path: &Path) -> Result<()> {
        let content = Self::create_example_env_content();
        std::fs::write(path, content)
            .map_err(|e| AppError::config(format!("Failed to write example .env file: {}", e)))?;

        Ok(())
    }

    /// Validate environment variable format before parsing
    pub fn validate_env_var(key: &str, value: &str) -> Result<()> {
        match key {
            "STP_ENCODER_LOG" | "STP_DECODER_LOG" | "STP_RTT_LOG" | "STP_OUTPUT_DIR" => {
                if value.trim().is_empty() {
                    return Err(AppError::config(format!("{} cannot be empty", key)));
                }
            }
            "STP_FPS" => {
                let fps: u32 = value.trim().parse()
                    .map_err(|e| AppError::config(format!("Invalid STP_FPS value '{}': {}", value, e)))?;
                if fps == 0 || fps > 240 {
                    return Err(AppError::config(format!("STP_FPS must be between 1 and 240, got: {}", fps)));
                }
            }
            "STP_WARMUP_WINDOWS" => {
                value.trim().parse::<usize>()
                    .map_err(|e| AppError::config(format!("Invalid STP_WARMUP_WINDOWS value '{}': {}", value, e)))?;
            }
            "STP_CHARTS" => {
                parse_chart_list(value)?;
            }
            "STP_FORMAT" => {
                value.parse::<ImageFormat>()?;
            }
            "STP_CHART_WIDTH" | "STP_CHART_HEIGHT" => {
                let px: u32 = value.trim().parse()
                    .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", key, value, e)))?;
                if !(100..=8192).contains(&px) {
                    return Err(AppError::config(format!("{} must be between 100 and 8192, got: {}", key, px)));
                }
            }
            "STP_LABEL" => {
                if value.trim().is_empty() {
                    return Err(AppError::config("STP_LABEL cannot be empty"));
                }
            }
            "STP_LOG_FORMAT" => {
                value.trim().parse::<LogFormat>()?;
            }
            "ENABLE_COLOR" => {
                value.trim().parse::<bool>()
                    .map_err(|e| AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", value, e)))?;
            }
            _ => {
                // Unknown environment variable, ignore
            }
        }

        Ok(())
    }

    /// Get list of all supported environment variables with descriptions
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("STP_ENCODER_LOG", "Encoder telemetry log (CSV)", "logs/encoder.csv"),
            ("STP_DECODER_LOG", "Decoder telemetry log (CSV)", "logs/decoder.csv"),
            ("STP_RTT_LOG", "Round-trip time telemetry log (CSV)", "logs/rtt.csv"),
            ("STP_OUTPUT_DIR", "Directory the charts are written to", "plots"),
            ("STP_FPS", "Video frame rate (1-240)", "24"),
            ("STP_WARMUP_WINDOWS", "Leading throughput windows to discard", "2"),
            ("STP_CHARTS", "Comma-separated list of charts", "throughput,decoding"),
            ("STP_FORMAT", "Image format (png, svg)", "png"),
            ("STP_CHART_WIDTH", "Image width in pixels (100-8192)", "640"),
            ("STP_CHART_HEIGHT", "Image height in pixels (100-8192)", "480"),
            ("STP_LABEL", "Legend label of the throughput series", "Baseline"),
            ("STP_LOG_FORMAT", "Diagnostic log format (console, json, compact)", "console"),
            ("ENABLE_COLOR", "Enable colored output", "true"),
        ]
    }

    /// Display environment variable help
    pub fn display_env_help() -> String {
        let mut help = String::new();
        help.push_str("Supported Environment Variables:\n\n");

        for (var, description, example) in Self::get_supported_env_vars() {
            help.push_str(&format!("  {:<20} {}\n", var, description));
            help.push_str(&format!("  {:<20} Example: {}\n\n", "", example));
        }

        help.push_str("Configuration Priority (highest to lowest):\n");
        help.push_str("  1. Command-line arguments\n");
        help.push_str("  2. Environment variables\n");
        help.push_str("  3. .env file values\n");
        help.push_str("  4. Default values\n");

        help
    }

    /// Validate all currently set environment variables
    pub fn validate_current_env() -> Result<Vec<String>> {
        Ok(Self::validate_vars(|key| std::env::var(key).ok()))
    }

    /// Validate supported variables from any key lookup, collecting one warning per bad value
    pub fn validate_vars<F>(lookup: F) -> Vec<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::get_supported_env_vars()
            .into_iter()
            .filter_map(|(var_name, _, _)| {
                let value = lookup(var_name)?;
                Self::validate_env_var(var_name, &value)
                    .err()
                    .map(|e| format!("Warning: {}", e))
            })
            .collect()
    }

    /// Check if .env file exists and validate its contents
    pub fn check_env_file() -> Result<Option<Vec<String>>> {
        Self::check_env_file_at(Path::new(".env"))
    }

    /// Validate the `KEY=value` lines of an env file without loading it
    pub fn check_env_file_at(path: &Path) -> Result<Option<Vec<String>>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::config(format!("Failed to read {}: {}", path.display(), e)))?;

        let mut warnings = Vec::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                let value = value.trim().trim_matches('"');

                if let Err(e) = Self::validate_env_var(key, value) {
                    warnings.push(format!("Line '{}': {}", line, e));
                }
            }
        }

        Ok(Some(warnings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_env_manager_create_example_content() {
        let content = EnvManager::create_example_env_content();

        for (var, _, _) in EnvManager::get_supported_env_vars() {
            assert!(content.contains(&format!("{}=", var)), "missing {}", var);
        }
    }

    #[test]
    fn test_env_manager_save_example_file() {
        let temp_file = NamedTempFile::new().unwrap();
        EnvManager::save_example_env_file(temp_file.path()).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(content.contains("Stream Telemetry Plotter Configuration"));
    }

    #[test]
    fn test_env_manager_validate_env_var() {
        // Valid cases
        assert!(EnvManager::validate_env_var("STP_DECODER_LOG", "dec.csv").is_ok());
        assert!(EnvManager::validate_env_var("STP_FPS", "60").is_ok());
        assert!(EnvManager::validate_env_var("STP_WARMUP_WINDOWS", "0").is_ok());
        assert!(EnvManager::validate_env_var("STP_CHARTS", "throughput, rtt").is_ok());
        assert!(EnvManager::validate_env_var("STP_FORMAT", "SVG").is_ok());
        assert!(EnvManager::validate_env_var("STP_CHART_WIDTH", "1024").is_ok());
        assert!(EnvManager::validate_env_var("STP_LOG_FORMAT", "json").is_ok());
        assert!(EnvManager::validate_env_var("ENABLE_COLOR", "false").is_ok());
        assert!(EnvManager::validate_env_var("UNRELATED", "anything").is_ok());

        // Invalid cases
        assert!(EnvManager::validate_env_var("STP_RTT_LOG", "  ").is_err());
        assert!(EnvManager::validate_env_var("STP_FPS", "0").is_err());
        assert!(EnvManager::validate_env_var("STP_FPS", "241").is_err());
        assert!(EnvManager::validate_env_var("STP_WARMUP_WINDOWS", "-1").is_err());
        assert!(EnvManager::validate_env_var("STP_CHARTS", "throughput,jitter").is_err());
        assert!(EnvManager::validate_env_var("STP_FORMAT", "gif").is_err());
        assert!(EnvManager::validate_env_var("STP_CHART_HEIGHT", "50").is_err());
        assert!(EnvManager::validate_env_var("STP_LABEL", "").is_err());
        assert!(EnvManager::validate_env_var("STP_LOG_FORMAT", "xml").is_err());
        assert!(EnvManager::validate_env_var("ENABLE_COLOR", "maybe").is_err());
    }

    #[test]
    fn test_get_supported_env_vars() {
        let vars = EnvManager::get_supported_env_vars();

        assert_eq!(vars.len(), 13);
        assert!(vars.iter().any(|(name, _, _)| *name == "STP_FPS"));
        assert!(vars.iter().any(|(name, _, _)| *name == "STP_OUTPUT_DIR"));
        assert!(vars.iter().all(|(_, _, example)| !example.is_empty()));
    }

    #[test]
    fn test_examples_pass_validation() {
        for (var, _, example) in EnvManager::get_supported_env_vars() {
            assert!(EnvManager::validate_env_var(var, example).is_ok(), "{}={}", var, example);
        }
    }

    #[test]
    fn test_display_env_help() {
        let help = EnvManager::display_env_help();

        assert!(help.contains("Supported Environment Variables:"));
        assert!(help.contains("STP_ENCODER_LOG"));
        assert!(help.contains("Configuration Priority"));
        assert!(help.contains("Command-line arguments"));
    }

    #[test]
    fn test_validate_vars_collects_warnings() {
        let vars = HashMap::from([("STP_FPS", "0"), ("STP_FORMAT", "png"), ("ENABLE_COLOR", "yes")]);
        let warnings = EnvManager::validate_vars(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("STP_FPS"));
        assert!(warnings[1].contains("ENABLE_COLOR"));
    }

    #[test]
    fn test_validate_vars_empty() {
        assert!(EnvManager::validate_vars(|_| None).is_empty());
    }

    #[test]
    fn test_check_env_file_missing() {
        let dir = TempDir::new().unwrap();
        assert!(EnvManager::check_env_file_at(&dir.path().join(".env")).unwrap().is_none());
    }

    #[test]
    fn test_check_env_file_reports_bad_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(
            &path,
            "# comment\nSTP_FPS=30\nSTP_FORMAT=\"bmp\"\n\nSTP_CHART_WIDTH=10\n",
        )
        .unwrap();

        let warnings = EnvManager::check_env_file_at(&path).unwrap().unwrap();
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].starts_with("Line 'STP_FORMAT=\"bmp\"'"));
        assert!(warnings[1].contains("STP_CHART_WIDTH"));
    }
}
