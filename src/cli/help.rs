//! Command-line help system with examples and topic references
//!
//! This module provides detailed help text, usage examples and references
//! for the telemetry log layouts, the charts and the configuration sources.

use crate::{
    config::env::EnvManager,
    types::{ChartKind, LogKind},
};
use colored::*;

/// Help topics accepted by `--help-topic`
pub const HELP_TOPICS: &[&str] = &["logs", "charts", "config", "env", "examples", "output"];

/// Help system for the CLI application
pub struct HelpSystem {
    binary: &'static str,
}

impl HelpSystem {
    /// Create a new help system
    pub fn new() -> Self {
        Self { binary: "stp" }
    }

    /// Display the main help message with all available options
    pub fn display_main_help(&self, use_colors: bool) -> String {
        [
            self.format_header(use_colors),
            self.format_usage_section(use_colors),
            self.format_options_section(use_colors),
            self.format_examples_section(use_colors),
            self.format_environment_section(use_colors),
            self.format_footer(use_colors),
        ]
        .join("\n")
    }

    /// Display help for a specific topic
    pub fn display_topic_help(&self, topic: &str, use_colors: bool) -> Option<String> {
        match topic.to_lowercase().as_str() {
            "logs" | "log" | "csv" => Some(self.format_logs_help(use_colors)),
            "charts" | "chart" => Some(self.format_charts_help(use_colors)),
            "config" | "configuration" => Some(self.format_configuration_help(use_colors)),
            "env" | "environment" => Some(self.format_environment_help(use_colors)),
            "examples" => Some(self.format_examples_section(use_colors)),
            "output" | "formatting" => Some(self.format_output_help(use_colors)),
            _ => None,
        }
    }

    fn section(&self, title: &str, use_colors: bool) -> String {
        if use_colors {
            title.bright_green().bold().to_string()
        } else {
            title.to_string()
        }
    }

    /// Format the main header
    fn format_header(&self, use_colors: bool) -> String {
        let title = "Stream Telemetry Plotter";
        let subtitle = "Per-second latency, throughput and RTT charts from video streaming CSV logs";
        let version = env!("CARGO_PKG_VERSION");

        if use_colors {
            format!(
                "{}\n{}\nVersion: {}\n",
                title.bright_cyan().bold(),
                subtitle.bright_blue(),
                version.green()
            )
        } else {
            format!("{}\n{}\nVersion: {}\n", title, subtitle, version)
        }
    }

    /// Format the usage section
    fn format_usage_section(&self, use_colors: bool) -> String {
        let usage_patterns = [
            format!("{} --encoder <CSV> --decoder <CSV> [OPTIONS]", self.binary),
            format!("{} --decoder <CSV> --charts throughput [OPTIONS]", self.binary),
            format!("{} --rtt <CSV> --charts rtt [OPTIONS]", self.binary),
            format!("{} --help-topic <TOPIC>", self.binary),
        ];

        let mut usage = format!("{}\n", self.section("USAGE:", use_colors));
        for pattern in usage_patterns {
            if use_colors {
                usage.push_str(&format!("  {}\n", pattern.bright_white()));
            } else {
                usage.push_str(&format!("  {}\n", pattern));
            }
        }

        usage
    }

    /// Format the options section
    fn format_options_section(&self, use_colors: bool) -> String {
        let options = [
            OptionHelp {
                short: Some("e"),
                long: "encoder",
                value: "<PATH>",
                description: "Encoder log (frame_id,size,generation_us,encode_ms)",
                example: Some("-e logs/encoder.csv"),
            },
            OptionHelp {
                short: Some("d"),
                long: "decoder",
                value: "<PATH>",
                description: "Decoder log (frame_id,size,decodable_us,decode_ms)",
                example: Some("-d logs/decoder.csv"),
            },
            OptionHelp {
                short: Some("r"),
                long: "rtt",
                value: "<PATH>",
                description: "Round-trip time log (frame_id,size,ack_us,rtt_ms)",
                example: None,
            },
            OptionHelp {
                short: Some("o"),
                long: "output",
                value: "<DIR>",
                description: "Directory for the chart images (created if missing)",
                example: Some("-o plots"),
            },
            OptionHelp {
                short: None,
                long: "fps",
                value: "<N>",
                description: "Frame rate; one point per N frames (1-240, default 24)",
                example: Some("--fps 30"),
            },
            OptionHelp {
                short: None,
                long: "warmup",
                value: "<N>",
                description: "Leading throughput windows to discard (default 2)",
                example: None,
            },
            OptionHelp {
                short: None,
                long: "charts",
                value: "<LIST>",
                description: "Comma-separated charts: encoding, decoding, throughput, rtt",
                example: Some("--charts encoding,throughput"),
            },
            OptionHelp {
                short: None,
                long: "format",
                value: "<png|svg>",
                description: "Image format (default png)",
                example: None,
            },
            OptionHelp {
                short: None,
                long: "width / --height",
                value: "<PX>",
                description: "Image size in pixels (default 640x480)",
                example: None,
            },
            OptionHelp {
                short: None,
                long: "label",
                value: "<TEXT>",
                description: "Legend label of the throughput series (default Baseline)",
                example: None,
            },
            OptionHelp {
                short: None,
                long: "summary",
                value: "<PATH>",
                description: "Also write the run report as JSON",
                example: Some("--summary plots/summary.json"),
            },
            OptionHelp {
                short: None,
                long: "log-format",
                value: "<FORMAT>",
                description: "Diagnostic log format: console, json or compact",
                example: None,
            },
            OptionHelp {
                short: None,
                long: "verbose",
                value: "",
                description: "Log progress and show extra report columns",
                example: None,
            },
            OptionHelp {
                short: None,
                long: "debug",
                value: "",
                description: "Enable debug logging with stage timings",
                example: None,
            },
            OptionHelp {
                short: None,
                long: "no-color",
                value: "",
                description: "Disable colored output",
                example: None,
            },
        ];

        let mut output = format!("{}\n", self.section("OPTIONS:", use_colors));
        for option in options {
            output.push_str(&option.format(use_colors));
            output.push('\n');
        }

        output
    }

    /// Format the examples section
    fn format_examples_section(&self, use_colors: bool) -> String {
        let examples = [
            ExampleHelp {
                title: "All charts for a 24 fps session",
                command: "stp -e encoder.csv -d decoder.csv -o plots",
                description: "Writes throughput.png, encoding_time.png and decoding_time.png",
            },
            ExampleHelp {
                title: "Throughput of a 30 fps stream without warm-up trimming",
                command: "stp -d decoder.csv --charts throughput --fps 30 --warmup 0",
                description: "One point per 30 frames, starting at the first frame",
            },
            ExampleHelp {
                title: "RTT chart as SVG",
                command: "stp -r rtt.csv --format svg -o plots",
                description: "Writes plots/rtt.svg",
            },
            ExampleHelp {
                title: "Machine-readable summary",
                command: "stp -e encoder.csv -d decoder.csv --summary out.json --log-format json --verbose",
                description: "Writes the per-chart statistics as JSON and logs JSON lines to stderr",
            },
        ];

        let mut output = format!("{}\n", self.section("EXAMPLES:", use_colors));
        for example in examples {
            output.push_str(&example.format(use_colors));
            output.push('\n');
        }

        output
    }

    /// Format the environment variables section
    fn format_environment_section(&self, use_colors: bool) -> String {
        let mut output = format!("{}\n", self.section("ENVIRONMENT VARIABLES:", use_colors));
        output.push_str("Configuration priority: CLI arguments > Environment variables > .env file > Defaults\n\n");

        for (var_name, description, _example) in EnvManager::get_supported_env_vars() {
            if use_colors {
                output.push_str(&format!("  {}: {}\n", var_name.bright_yellow().bold(), description.white()));
            } else {
                output.push_str(&format!("  {}: {}\n", var_name, description));
            }
        }

        output
    }

    /// Format the footer with topic pointers
    fn format_footer(&self, use_colors: bool) -> String {
        let mut footer = format!("{}\n", self.section("ADDITIONAL HELP:", use_colors));

        let help_topics = [
            ("--help-topic logs", "CSV layouts of the encoder, decoder and RTT logs"),
            ("--help-topic charts", "How each chart is computed"),
            ("--help-topic config", "Configuration sources and limits"),
            ("--help-topic env", "Environment variables and .env files"),
            ("--help-topic examples", "Usage examples"),
            ("--help-topic output", "Console report and JSON summary"),
        ];

        for (command, description) in help_topics {
            if use_colors {
                footer.push_str(&format!("  {}: {}\n", command.bright_yellow(), description.white()));
            } else {
                footer.push_str(&format!("  {}: {}\n", command, description));
            }
        }

        footer
    }

    /// CSV layouts
    fn format_logs_help(&self, use_colors: bool) -> String {
        let mut help = format!("{}\n\n", self.section("TELEMETRY LOG REFERENCE:", use_colors));

        help.push_str("Logs are header-less CSV files with one row per frame and exactly 4 columns.\n");
        help.push_str("Whitespace around fields is ignored; lines starting with '#' are comments.\n\n");

        for kind in [LogKind::Encoder, LogKind::Decoder, LogKind::Rtt] {
            let columns = kind.column_names().join(",");
            if use_colors {
                help.push_str(&format!("  {:<8} {}\n", kind.name().bright_cyan(), columns));
            } else {
                help.push_str(&format!("  {:<8} {}\n", kind.name(), columns));
            }
        }

        help.push_str("\nVALIDATION:\n");
        help.push_str("- Every row must have 4 columns; the error names the line number\n");
        help.push_str("- Ids, sizes and timestamps are non-negative integers (12.0 is accepted)\n");
        help.push_str("- Millisecond columns are finite, non-negative numbers\n");
        help.push_str("- A log without any frame row is rejected\n");

        help
    }

    /// How each chart is derived
    fn format_charts_help(&self, use_colors: bool) -> String {
        let mut help = format!("{}\n\n", self.section("CHART REFERENCE:", use_colors));

        help.push_str("Per-frame values are grouped into windows of --fps consecutive frames\n");
        help.push_str("(one window per second of video). Window totals are differences of the\n");
        help.push_str("running sum at the window boundaries.\n\n");

        for kind in ChartKind::ALL {
            let reduction = match kind.aggregation() {
                crate::types::Aggregation::Mean => "mean per window",
                crate::types::Aggregation::Sum => "sum per window, warm-up windows dropped",
            };
            let name = format!("{:<11}", kind.cli_name());
            let name = if use_colors { name.bright_cyan().to_string() } else { name };
            help.push_str(&format!(
                "  {} {}.png from the {} log: {} ({})\n",
                name,
                kind.file_stem(),
                kind.source(),
                kind.y_label(),
                reduction
            ));
        }

        help.push_str("\nThroughput converts frame sizes to megabits (bytes x 8 / 1e6).\n");
        help.push_str("A trailing incomplete window is kept for latency charts and dropped for throughput.\n");
        help.push_str("The x axis is labelled 'Streaming Time (s)'.\n");

        help
    }

    /// Format detailed configuration help
    fn format_configuration_help(&self, use_colors: bool) -> String {
        let mut help = format!("{}\n\n", self.section("CONFIGURATION REFERENCE:", use_colors));

        help.push_str("CONFIGURATION PRIORITY (highest to lowest):\n");
        help.push_str("1. Command-line arguments\n");
        help.push_str("2. Environment variables\n");
        help.push_str("3. .env file in the current directory\n");
        help.push_str("4. Default values\n\n");

        help.push_str("PARAMETER LIMITS:\n");
        help.push_str("- At least one of --encoder, --decoder, --rtt is required\n");
        help.push_str("- FPS: 1-240\n");
        help.push_str("- Image width and height: 100-8192 pixels\n");
        help.push_str("- Requested charts need their source log\n");
        help.push_str("- The throughput label cannot be empty\n");

        help
    }

    /// Format detailed environment help
    fn format_environment_help(&self, use_colors: bool) -> String {
        let mut help = format!("{}\n\n", self.section("ENVIRONMENT VARIABLES REFERENCE:", use_colors));

        help.push_str("LOADING ORDER:\n");
        help.push_str("1. .env file in current directory (if present)\n");
        help.push_str("2. System environment variables (override .env)\n");
        help.push_str("3. Command-line arguments (override both)\n\n");

        help.push_str("SUPPORTED VARIABLES:\n");
        for (var_name, description, example) in EnvManager::get_supported_env_vars() {
            if use_colors {
                help.push_str(&format!("{}:\n  {}\n  Example: {}\n\n",
                    var_name.bright_yellow().bold(),
                    description.white(),
                    example.bright_blue().italic()
                ));
            } else {
                help.push_str(&format!("{}:\n  {}\n  Example: {}\n\n", var_name, description, example));
            }
        }

        help.push_str("EXAMPLE .env FILE:\n");
        help.push_str(&EnvManager::create_example_env_content());

        help
    }

    /// Format output help
    fn format_output_help(&self, use_colors: bool) -> String {
        let mut help = format!("{}\n\n", self.section("OUTPUT REFERENCE:", use_colors));

        help.push_str("CONSOLE REPORT (stdout):\n");
        help.push_str("- Run summary: frame rate, output directory, rendered/skipped counts\n");
        help.push_str("- Per-chart table: windows, mean, min/max, p95 (plus std dev and frames with --verbose)\n");
        help.push_str("- A warning line for every skipped chart\n\n");

        help.push_str("LATENCY COLORS (relative to one frame interval, 1000/fps ms):\n");
        if use_colors {
            help.push_str(&format!("- {}: within one frame interval\n", "Green".green()));
            help.push_str(&format!("- {}: up to two frame intervals\n", "Yellow".yellow()));
            help.push_str(&format!("- {}: more than two frame intervals\n", "Red".red()));
        } else {
            help.push_str("- Green: within one frame interval\n");
            help.push_str("- Yellow: up to two frame intervals\n");
            help.push_str("- Red: more than two frame intervals\n");
        }

        help.push_str("\nDIAGNOSTICS (stderr):\n");
        help.push_str("- --verbose logs loaded logs and rendered charts\n");
        help.push_str("- --debug adds stage timings and source locations\n");
        help.push_str("- --log-format json emits one JSON object per line\n\n");

        help.push_str("JSON SUMMARY (--summary):\n");
        help.push_str("- session_id, generated_at, fps, output_dir\n");
        help.push_str("- charts: kind, path, unit and summary statistics\n");
        help.push_str("- skipped: kind and reason\n");

        help
    }
}

impl Default for HelpSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper struct for formatting individual options
struct OptionHelp {
    short: Option<&'static str>,
    long: &'static str,
    value: &'static str,
    description: &'static str,
    example: Option<&'static str>,
}

impl OptionHelp {
    fn format(&self, use_colors: bool) -> String {
        let mut option_str = String::new();

        if let Some(short) = self.short {
            if use_colors {
                option_str.push_str(&format!("  {}, ", format!("-{}", short).bright_cyan()));
            } else {
                option_str.push_str(&format!("  -{}, ", short));
            }
        } else {
            option_str.push_str("      ");
        }

        let long_with_value = if self.value.is_empty() {
            format!("--{}", self.long)
        } else {
            format!("--{} {}", self.long, self.value)
        };

        if use_colors {
            option_str.push_str(&format!("{:<30} {}", long_with_value.bright_cyan(), self.description.white()));
        } else {
            option_str.push_str(&format!("{:<30} {}", long_with_value, self.description));
        }

        if let Some(example) = self.example {
            if use_colors {
                option_str.push_str(&format!("\n{}{}", " ".repeat(37),
                    format!("Example: {}", example).bright_blue().italic()
                ));
            } else {
                option_str.push_str(&format!("\n{}Example: {}", " ".repeat(37), example));
            }
        }

        option_str
    }
}

/// Helper struct for formatting examples
struct ExampleHelp {
    title: &'static str,
    command: &'static str,
    description: &'static str,
}

impl ExampleHelp {
    fn format(&self, use_colors: bool) -> String {
        if use_colors {
            format!("  {}:\n    {}\n    {}\n",
                self.title.bright_yellow().bold(),
                self.command.bright_white(),
                self.description.bright_blue().italic()
            )
        } else {
            format!("  {}:\n    {}\n    {}\n", self.title, self.command, self.description)
        }
    }
}
