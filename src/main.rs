//! Stream Telemetry Plotter - Main CLI Application
//!
//! Reads encoder, decoder and RTT telemetry logs and writes one
//! per-second chart for each selected metric.

use clap::Parser;
use stream_telemetry_plotter::{
    charts::ChartRendererFactory,
    cli::Cli,
    config::{load_config, validate_config, EnvManager, ValidationLevel},
    error::{AppError, ErrorReporter, Result},
    log_info,
    logging::{ErrorEventLogger, Logger},
    models::Config,
    output::{OutputCoordinator, OutputFormatterFactory},
    pipeline::Pipeline,
    PKG_NAME, VERSION,
};
use std::process;

fn main() {
    // Set up better panic handling
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        eprintln!("Please report this issue with the command line and the telemetry logs used");
        process::exit(99);
    }));

    // Parse command line arguments
    let cli = Cli::parse();

    if cli.should_show_topic_help() {
        println!("{}", cli.display_help());
        return;
    }

    let use_color = cli.use_colors();
    let verbose = cli.verbose;
    let debug = cli.debug;

    // Handle the actual application logic
    if let Err(e) = run_application(cli) {
        ErrorReporter::new(use_color, verbose).report_error(&e);

        if debug {
            let config = Config { debug: true, enable_color: use_color, ..Config::default() };
            ErrorEventLogger::new(&config).log_error(&e, Some("run"), None);
        }

        // Print suggestions for common errors
        print_error_suggestions(&e);

        process::exit(e.exit_code());
    }
}

/// Main application logic
fn run_application(cli: Cli) -> Result<()> {
    cli.validate().map_err(AppError::config)?;

    // Show debug info if requested
    if cli.debug {
        eprintln!("{} v{} ({}, built {} for {})",
            PKG_NAME,
            VERSION,
            option_env!("GIT_COMMIT").unwrap_or("unknown commit"),
            env!("BUILD_TIME"),
            env!("TARGET_TRIPLE"));
        eprintln!("Debug mode enabled");
        eprintln!("{}", cli.get_config_summary());
    }

    // Load and validate configuration
    let config = load_config(cli)?;

    if config.debug {
        if let Some(warnings) = EnvManager::check_env_file()? {
            for warning in warnings {
                eprintln!(".env: {}", warning);
            }
        }
        for warning in EnvManager::validate_current_env()? {
            eprintln!("{}", warning);
        }
    }

    for warning in validate_config(&config)? {
        if warning.level != ValidationLevel::Info || config.verbose {
            eprintln!("{}", warning.format(config.enable_color));
        }
    }

    let pipeline = Pipeline::new(config.clone(), ChartRendererFactory::create_renderer());
    let report = pipeline.run()?;

    let formatter = OutputFormatterFactory::create_formatter(config.enable_color, config.verbose);
    let coordinator = OutputCoordinator::new(formatter);
    println!("{}", coordinator.display_report(&report)?);

    if let Some(ref path) = config.summary_path {
        report.write_json(path)?;
        if config.verbose {
            let logger = Logger::with_config("MAIN".to_string(), &config);
            log_info!(logger, "Run summary written to {}", path.display());
        }
    }

    Ok(())
}

/// Print helpful suggestions for common errors
fn print_error_suggestions(error: &AppError) {
    match error {
        AppError::Config(_) | AppError::Validation(_) => {
            eprintln!();
            eprintln!("Configuration help:");
            eprintln!("  - Give at least one log with --encoder, --decoder or --rtt");
            eprintln!("  - --fps must be between 1 and 240");
            eprintln!("  - Check your .env file format (see --help-topic env)");
        }
        AppError::Schema(_) | AppError::Parse(_) => {
            eprintln!();
            eprintln!("Telemetry log help:");
            eprintln!("  - Every row needs 4 columns: frame_id, frame_size_bytes, timestamp_us, metric");
            eprintln!("  - Lines starting with '#' are ignored");
            eprintln!("  - See --help-topic logs for the column layout");
        }
        AppError::Io(_) => {
            eprintln!();
            eprintln!("File troubleshooting:");
            eprintln!("  - Check that the log paths exist and are readable");
            eprintln!("  - Check that the output directory is writable");
        }
        AppError::EmptyLog(_) | AppError::Statistics(_) => {
            eprintln!();
            eprintln!("Data troubleshooting:");
            eprintln!("  - A chart needs at least one frame; throughput needs at least");
            eprintln!("    (warm-up + 1) x fps frames");
            eprintln!("  - Lower --warmup or --fps for short captures");
        }
        _ => {}
    }
}
