//! Configuration parsing from CLI arguments and environment variables

use crate::{
    cli::Cli,
    config::env::EnvManager,
    error::Result,
    models::{config::parse_chart_list, Config},
};

/// Configuration parser that combines CLI arguments with environment variables
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    /// Create a new configuration parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Parse and build the complete configuration
    pub fn parse(&self) -> Result<Config> {
        // Load from environment file if it exists
        self.load_env_file()?;

        self.parse_with(|key| std::env::var(key).ok())
    }

    /// Build the configuration from defaults, an environment lookup and the CLI, then validate
    pub fn parse_with<F>(&self, lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        config.merge_from_lookup(lookup)?;

        self.apply_cli_overrides(&mut config)?;

        config.validate()?;

        Ok(config)
    }

    /// Load .env file if it exists
    fn load_env_file(&self) -> Result<()> {
        EnvManager::load_env_file(self.cli.debug)
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(&self, config: &mut Config) -> Result<()> {
        let cli = &self.cli;

        if let Some(ref path) = cli.encoder {
            config.encoder_log = Some(path.clone());
        }
        if let Some(ref path) = cli.decoder {
            config.decoder_log = Some(path.clone());
        }
        if let Some(ref path) = cli.rtt {
            config.rtt_log = Some(path.clone());
        }
        if let Some(ref dir) = cli.output {
            config.output_dir = dir.clone();
        }

        if let Some(fps) = cli.fps {
            config.fps = fps;
        }
        if let Some(warmup) = cli.warmup {
            config.warmup_windows = warmup;
        }

        if let Some(ref charts) = cli.charts {
            config.charts = parse_chart_list(charts)?;
        }
        if let Some(ref format) = cli.format {
            config.image_format = format.parse()?;
        }
        if let Some(width) = cli.width {
            config.chart_width = width;
        }
        if let Some(height) = cli.height {
            config.chart_height = height;
        }
        if let Some(ref label) = cli.label {
            config.series_label = label.clone();
        }
        if let Some(ref path) = cli.summary {
            config.summary_path = Some(path.clone());
        }
        if let Some(ref format) = cli.log_format {
            config.log_format = format.parse()?;
        }

        // --no-color wins over ENABLE_COLOR; --color forces it on
        if cli.no_color {
            config.enable_color = false;
        } else if cli.color {
            config.enable_color = true;
        }

        // Set verbose and debug flags (these are CLI-only)
        config.verbose = cli.verbose;
        config.debug = cli.debug;

        if config.debug {
            eprintln!("Applied CLI overrides to configuration");
            eprintln!("{}", display_config_summary(config));
        }

        Ok(())
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    let parser = ConfigParser::new(cli);
    parser.parse()
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &Config) -> String {
    let mut summary = Vec::new();

    let show = |path: &Option<std::path::PathBuf>| {
        path.as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "-".to_string())
    };

    summary.push(format!("Encoder Log: {}", show(&config.encoder_log)));
    summary.push(format!("Decoder Log: {}", show(&config.decoder_log)));
    summary.push(format!("RTT Log: {}", show(&config.rtt_log)));
    summary.push(format!("Output Dir: {}", config.output_dir.display()));
    summary.push(format!("FPS: {}", config.fps));
    summary.push(format!("Warm-up Windows: {}", config.warmup_windows));
    summary.push(format!(
        "Charts: {}",
        config
            .selected_charts()
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    ));
    summary.push(format!(
        "Image: {}x{} {}",
        config.chart_width,
        config.chart_height,
        config.image_format.extension()
    ));
    summary.push(format!("Color Output: {}", config.enable_color));
    summary.push(format!("Verbose: {}", config.verbose));
    summary.push(format!("Debug: {}", config.debug));

    summary.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogFormat;
    use crate::types::{ChartKind, ImageFormat};
    use clap::Parser;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn parse(args: &[&str], env: &[(&str, &str)]) -> Result<Config> {
        let env: HashMap<String, String> = env
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let cli = Cli::parse_from(std::iter::once("stp").chain(args.iter().copied()));
        ConfigParser::new(cli).parse_with(|key| env.get(key).cloned())
    }

    #[test]
    fn test_cli_only() {
        let config = parse(&["-d", "dec.csv", "--fps", "30"], &[]).unwrap();

        assert_eq!(config.decoder_log, Some(PathBuf::from("dec.csv")));
        assert_eq!(config.fps, 30);
        assert_eq!(config.warmup_windows, 2);
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert!(!config.verbose);
    }

    #[test]
    fn test_env_fills_in_missing_values() {
        let config = parse(
            &[],
            &[("STP_RTT_LOG", "rtt.csv"), ("STP_OUTPUT_DIR", "plots"), ("STP_FPS", "60")],
        )
        .unwrap();

        assert_eq!(config.rtt_log, Some(PathBuf::from("rtt.csv")));
        assert_eq!(config.output_dir, PathBuf::from("plots"));
        assert_eq!(config.fps, 60);
    }

    #[test]
    fn test_cli_overrides_env() {
        let config = parse(
            &["-r", "cli.csv", "--fps", "25", "--format", "svg", "--log-format", "compact"],
            &[("STP_RTT_LOG", "env.csv"), ("STP_FPS", "60"), ("STP_FORMAT", "png")],
        )
        .unwrap();

        assert_eq!(config.rtt_log, Some(PathBuf::from("cli.csv")));
        assert_eq!(config.fps, 25);
        assert_eq!(config.image_format, ImageFormat::Svg);
        assert_eq!(config.log_format, LogFormat::Compact);
    }

    #[test]
    fn test_chart_selection_from_cli() {
        let config = parse(&["-e", "e.csv", "-d", "d.csv", "--charts", "decoding, throughput"], &[]).unwrap();
        assert_eq!(config.charts, vec![ChartKind::DecodingLatency, ChartKind::Throughput]);
    }

    #[test]
    fn test_unknown_chart_rejected() {
        let err = parse(&["-d", "d.csv", "--charts", "jitter"], &[]).unwrap_err();
        assert!(err.to_string().contains("jitter"));
    }

    #[test]
    fn test_color_precedence() {
        let env = [("ENABLE_COLOR", "false"), ("STP_DECODER_LOG", "d.csv")];
        assert!(!parse(&[], &env).unwrap().enable_color);
        assert!(parse(&["--color"], &env).unwrap().enable_color);
        assert!(!parse(&["--no-color"], &[("STP_DECODER_LOG", "d.csv")]).unwrap().enable_color);
    }

    #[test]
    fn test_invalid_fps_fails_validation() {
        let err = parse(&["-d", "d.csv", "--fps", "0"], &[]).unwrap_err();
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("FPS"));
    }

    #[test]
    fn test_no_logs_fails() {
        let err = parse(&[], &[]).unwrap_err();
        assert!(err.to_string().contains("No telemetry log"));
    }

    #[test]
    fn test_verbose_and_debug_are_cli_only() {
        let config = parse(&["-d", "d.csv", "--verbose"], &[("VERBOSE", "true")]).unwrap();
        assert!(config.verbose);
        assert!(!config.debug);
    }

    #[test]
    fn test_display_config_summary() {
        let config = parse(&["-e", "enc.csv", "-o", "out", "--warmup", "0"], &[]).unwrap();
        let summary = display_config_summary(&config);

        assert!(summary.contains("Encoder Log: enc.csv"));
        assert!(summary.contains("Decoder Log: -"));
        assert!(summary.contains("Output Dir: out"));
        assert!(summary.contains("Warm-up Windows: 0"));
        assert!(summary.contains("Charts: encoding"));
        assert!(summary.contains("Image: 640x480 png"));
    }
}
