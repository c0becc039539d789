//! Configuration validation utilities and rules

use crate::{
    error::{AppError, Result},
    models::Config,
    types::{ChartKind, LogKind},
};

/// Frame rates that video pipelines commonly run at
const COMMON_FRAME_RATES: [u32; 7] = [24, 25, 30, 50, 60, 120, 144];

/// Configuration validator with advanced validation rules
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate configuration with comprehensive checks
    pub fn validate_comprehensive(config: &Config) -> Result<Vec<ValidationWarning>> {
        let mut warnings = Vec::new();

        // Basic validation (already done in Config::validate)
        config.validate()?;

        warnings.extend(Self::validate_log_sources(config)?);
        warnings.extend(Self::validate_output(config)?);
        warnings.extend(Self::validate_window_settings(config));
        warnings.extend(Self::validate_chart_settings(config));

        Ok(warnings)
    }

    /// Check the telemetry log paths and which default charts they leave out
    fn validate_log_sources(config: &Config) -> Result<Vec<ValidationWarning>> {
        let mut warnings = Vec::new();
        let kinds = [LogKind::Encoder, LogKind::Decoder, LogKind::Rtt];

        for kind in kinds {
            let Some(path) = config.log_path(kind) else {
                continue;
            };

            if !path.exists() {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Warning,
                    format!("{} log '{}' does not exist", kind, path.display()),
                ));
            } else if path.is_dir() {
                return Err(AppError::config(format!(
                    "{} log '{}' is a directory",
                    kind,
                    path.display()
                )));
            }
        }

        for (i, a) in kinds.iter().enumerate() {
            for b in &kinds[i + 1..] {
                if let (Some(pa), Some(pb)) = (config.log_path(*a), config.log_path(*b)) {
                    if pa == pb {
                        warnings.push(ValidationWarning::new(
                            ValidationLevel::Warning,
                            format!("{} and {} logs are the same file '{}'", a, b, pa.display()),
                        ));
                    }
                }
            }
        }

        if config.charts.is_empty() {
            let missing: Vec<String> = ChartKind::ALL
                .iter()
                .filter(|kind| config.log_path(kind.source()).is_none())
                .map(|kind| kind.to_string())
                .collect();

            if !missing.is_empty() {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Info,
                    format!("No source log for: {}; those charts are skipped", missing.join(", ")),
                ));
            }
        }

        Ok(warnings)
    }

    /// Check the output directory and summary file
    fn validate_output(config: &Config) -> Result<Vec<ValidationWarning>> {
        let mut warnings = Vec::new();
        let dir = &config.output_dir;

        if dir.exists() && !dir.is_dir() {
            return Err(AppError::config(format!(
                "Output path '{}' exists and is not a directory",
                dir.display()
            )));
        }

        if !dir.exists() {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("Output directory '{}' will be created", dir.display()),
            ));
        }

        if let Some(ref path) = config.summary_path {
            let is_json = path
                .extension()
                .map(|ext| ext.eq_ignore_ascii_case("json"))
                .unwrap_or(false);
            if !is_json {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Info,
                    format!("Summary '{}' is written as JSON", path.display()),
                ));
            }
        }

        Ok(warnings)
    }

    /// Check frame rate and warm-up trimming
    fn validate_window_settings(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if !COMMON_FRAME_RATES.contains(&config.fps) {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("Unusual frame rate of {} fps; each chart point spans {} frames", config.fps, config.fps),
            ));
        }

        let throughput_selected = config.selected_charts().contains(&ChartKind::Throughput);
        if throughput_selected {
            if config.warmup_windows == 0 {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Info,
                    "Warm-up trimming disabled; the first throughput seconds may be unrepresentative".to_string(),
                ));
            } else if config.warmup_windows >= 10 {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Warning,
                    format!(
                        "Discarding {} warm-up windows drops the first {} frames of throughput",
                        config.warmup_windows,
                        (config.warmup_windows as u64).saturating_mul(config.fps as u64)
                    ),
                ));
            }
        }

        warnings
    }

    /// Check image dimensions
    fn validate_chart_settings(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if config.chart_width > 4096 || config.chart_height > 4096 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!(
                    "Large chart size {}x{} will produce big image files",
                    config.chart_width, config.chart_height
                ),
            ));
        }

        let aspect = config.chart_width as f64 / config.chart_height as f64;
        if !(0.5..=4.0).contains(&aspect) {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("Aspect ratio {:.2} may squeeze the axis labels", aspect),
            ));
        }

        warnings
    }
}

/// Validation warning levels
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationLevel {
    Info,
    Warning,
    Error,
}

impl ValidationLevel {
    /// Get display string for level
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }

    /// Get color for terminal display
    pub fn color(&self) -> colored::Color {
        match self {
            Self::Info => colored::Color::Blue,
            Self::Warning => colored::Color::Yellow,
            Self::Error => colored::Color::Red,
        }
    }
}

/// Configuration validation warning
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub level: ValidationLevel,
    pub message: String,
}

impl ValidationWarning {
    /// Create a new validation warning
    pub fn new(level: ValidationLevel, message: String) -> Self {
        Self { level, message }
    }

    /// Format warning for display
    pub fn format(&self, use_color: bool) -> String {
        if use_color {
            use colored::Colorize;
            format!("[{}] {}", self.level.as_str().color(self.level.color()).bold(), self.message)
        } else {
            format!("[{}] {}", self.level.as_str(), self.message)
        }
    }
}

/// Convenience function for comprehensive configuration validation
pub fn validate_config(config: &Config) -> Result<Vec<ValidationWarning>> {
    ConfigValidator::validate_comprehensive(config)
}
