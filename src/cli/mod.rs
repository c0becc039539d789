//! Command-line interface module with topic help system

pub mod help;

pub use help::{HelpSystem, HELP_TOPICS};

use clap::Parser;
use std::path::PathBuf;

/// Stream Telemetry Plotter - per-second charts from video streaming telemetry logs
#[derive(Parser, Debug, Clone)]
#[command(name = "stp")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Encoder log (frame_id, frame_size_bytes, generation timestamp us, encode time ms)
    #[arg(short, long, value_name = "PATH")]
    pub encoder: Option<PathBuf>,

    /// Decoder log (frame_id, frame_size_bytes, decodable timestamp us, decode time ms)
    #[arg(short, long, value_name = "PATH")]
    pub decoder: Option<PathBuf>,

    /// Round-trip time log (frame_id, frame_size_bytes, ack timestamp us, rtt ms)
    #[arg(short, long, value_name = "PATH")]
    pub rtt: Option<PathBuf>,

    /// Directory the charts are written to
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Video frame rate; one point is drawn per this many frames
    #[arg(long, value_name = "N")]
    pub fps: Option<u32>,

    /// Leading throughput windows to discard
    #[arg(long, value_name = "N")]
    pub warmup: Option<usize>,

    /// Charts to render (comma-separated: encoding, decoding, throughput, rtt)
    #[arg(long, value_name = "LIST")]
    pub charts: Option<String>,

    /// Image format (png or svg)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Image width in pixels
    #[arg(long, value_name = "PX")]
    pub width: Option<u32>,

    /// Image height in pixels
    #[arg(long, value_name = "PX")]
    pub height: Option<u32>,

    /// Legend label of the throughput series
    #[arg(long, value_name = "TEXT")]
    pub label: Option<String>,

    /// Write the run report as JSON to this file
    #[arg(long, value_name = "PATH")]
    pub summary: Option<PathBuf>,

    /// Diagnostic log format (console, json, compact)
    #[arg(long, value_name = "FORMAT")]
    pub log_format: Option<String>,

    /// Force colored output
    #[arg(long)]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// Show help for specific topic (logs, charts, config, env, examples, output)
    #[arg(long, value_name = "TOPIC")]
    pub help_topic: Option<String>,
}

impl Cli {
    /// Validate CLI arguments for conflicts
    pub fn validate(&self) -> Result<(), String> {
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }

        Ok(())
    }

    /// Check if help should be displayed for a specific topic
    pub fn should_show_topic_help(&self) -> bool {
        self.help_topic.is_some()
    }

    /// Get the help topic if specified
    pub fn get_help_topic(&self) -> Option<&str> {
        self.help_topic.as_deref()
    }

    /// Whether any telemetry log was given on the command line
    pub fn has_log_arguments(&self) -> bool {
        self.encoder.is_some() || self.decoder.is_some() || self.rtt.is_some()
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        if self.color {
            true
        } else if self.no_color {
            false
        } else {
            supports_color()
        }
    }

    /// Display help for the specified topic or main help
    pub fn display_help(&self) -> String {
        let help_system = HelpSystem::new();
        let use_colors = self.use_colors();

        if let Some(topic) = &self.help_topic {
            help_system.display_topic_help(topic, use_colors)
                .unwrap_or_else(|| {
                    format!("Unknown help topic: '{}'\n\nAvailable topics: {}\n\n{}",
                        topic, HELP_TOPICS.join(", "), help_system.display_main_help(use_colors))
                })
        } else {
            help_system.display_main_help(use_colors)
        }
    }

    /// Get a summary of the given arguments for display
    pub fn get_config_summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("Command Line:\n");
        for (name, path) in [("Encoder log", &self.encoder), ("Decoder log", &self.decoder), ("RTT log", &self.rtt)] {
            if let Some(path) = path {
                summary.push_str(&format!("  {}: {}\n", name, path.display()));
            }
        }
        if let Some(ref output) = self.output {
            summary.push_str(&format!("  Output: {}\n", output.display()));
        }
        if let Some(fps) = self.fps {
            summary.push_str(&format!("  FPS: {}\n", fps));
        }
        if let Some(ref charts) = self.charts {
            summary.push_str(&format!("  Charts: {}\n", charts));
        }
        summary.push_str(&format!("  Colored output: {}\n", self.use_colors()));
        summary.push_str(&format!("  Verbose mode: {}\n", self.verbose));
        summary.push_str(&format!("  Debug mode: {}\n", self.debug));

        summary
    }
}

/// Check if the terminal supports color output
pub fn supports_color() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    #[cfg(target_os = "windows")]
    {
        if std::env::var("ANSICON").is_ok() || std::env::var("ConEmuANSI").is_ok() {
            return true;
        }
    }

    // Default to true on Unix-like systems, false on Windows
    #[cfg(unix)]
    {
        true
    }
    #[cfg(not(unix))]
    {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_parsing_basic() {
        let cli = Cli::parse_from(["stp", "-e", "enc.csv", "-d", "dec.csv"]);
        assert_eq!(cli.encoder, Some(PathBuf::from("enc.csv")));
        assert_eq!(cli.decoder, Some(PathBuf::from("dec.csv")));
        assert!(cli.rtt.is_none());
        assert!(cli.fps.is_none());
        assert!(!cli.verbose);
        assert!(cli.has_log_arguments());
    }

    #[test]
    fn test_cli_parsing_all_options() {
        let cli = Cli::parse_from([
            "stp",
            "--encoder", "e.csv",
            "--decoder", "d.csv",
            "--rtt", "r.csv",
            "--output", "plots",
            "--fps", "30",
            "--warmup", "0",
            "--charts", "encoding,rtt",
            "--format", "svg",
            "--width", "800",
            "--height", "600",
            "--label", "WebRTC",
            "--summary", "plots/summary.json",
            "--log-format", "json",
            "--no-color",
            "--verbose",
            "--debug",
        ]);

        assert_eq!(cli.rtt, Some(PathBuf::from("r.csv")));
        assert_eq!(cli.output, Some(PathBuf::from("plots")));
        assert_eq!(cli.fps, Some(30));
        assert_eq!(cli.warmup, Some(0));
        assert_eq!(cli.charts.as_deref(), Some("encoding,rtt"));
        assert_eq!(cli.format.as_deref(), Some("svg"));
        assert_eq!((cli.width, cli.height), (Some(800), Some(600)));
        assert_eq!(cli.label.as_deref(), Some("WebRTC"));
        assert_eq!(cli.summary, Some(PathBuf::from("plots/summary.json")));
        assert_eq!(cli.log_format.as_deref(), Some("json"));
        assert!(cli.no_color && cli.verbose && cli.debug);
    }

    #[test]
    fn test_short_flags() {
        let cli = Cli::parse_from(["stp", "-r", "rtt.csv", "-o", "out"]);
        assert_eq!(cli.rtt, Some(PathBuf::from("rtt.csv")));
        assert_eq!(cli.output, Some(PathBuf::from("out")));
    }

    #[test]
    fn test_non_numeric_fps_rejected_by_parser() {
        assert!(Cli::try_parse_from(["stp", "--fps", "fast"]).is_err());
    }

    #[test]
    fn test_cli_help_topic_methods() {
        let cli_with_topic = Cli::parse_from(["stp", "--help-topic", "charts"]);
        assert!(cli_with_topic.should_show_topic_help());
        assert_eq!(cli_with_topic.get_help_topic(), Some("charts"));
        assert!(!cli_with_topic.has_log_arguments());

        let cli_without_topic = Cli::parse_from(["stp"]);
        assert!(!cli_without_topic.should_show_topic_help());
        assert_eq!(cli_without_topic.get_help_topic(), None);
    }

    #[test]
    fn test_help_display() {
        let cli = Cli::parse_from(["stp", "--no-color"]);
        let help = cli.display_help();
        assert!(help.contains("Stream Telemetry Plotter"));
        assert!(help.contains("USAGE:"));

        let topic_help = Cli::parse_from(["stp", "--no-color", "--help-topic", "CONFIG"]).display_help();
        assert!(topic_help.contains("CONFIGURATION REFERENCE"));

        let invalid_help = Cli::parse_from(["stp", "--no-color", "--help-topic", "jitter"]).display_help();
        assert!(invalid_help.contains("Unknown help topic: 'jitter'"));
        assert!(invalid_help.contains("Available topics: logs, charts"));
    }

    #[test]
    fn test_use_colors_method() {
        let cli_no_color = Cli::parse_from(["stp", "--no-color"]);
        assert!(!cli_no_color.use_colors());

        let cli_color = Cli::parse_from(["stp", "--color"]);
        assert!(cli_color.use_colors());
    }

    #[test]
    fn test_cli_validation() {
        let cli_conflict = Cli::parse_from(["stp", "--color", "--no-color", "-d", "d.csv"]);
        assert!(cli_conflict.validate().unwrap_err().contains("Cannot specify both"));

        // clap refuses an empty path before validation runs
        assert!(Cli::try_parse_from(["stp", "-e", ""]).is_err());

        let cli_ok = Cli::parse_from(["stp", "-d", "d.csv"]);
        assert!(cli_ok.validate().is_ok());
    }

    #[test]
    fn test_config_summary() {
        let cli = Cli::parse_from(["stp", "-d", "dec.csv", "--fps", "25", "--verbose", "--no-color"]);
        let summary = cli.get_config_summary();
        assert!(summary.contains("Decoder log: dec.csv"));
        assert!(summary.contains("FPS: 25"));
        assert!(summary.contains("Verbose mode: true"));
        assert!(!summary.contains("Encoder log"));
    }
}
