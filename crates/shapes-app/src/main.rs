mod app;
mod canvas;
mod config;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use eframe::egui;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::config::Config;

const DEFAULT_CONFIG: &str = "shapes.toml";

#[derive(Parser, Debug)]
#[command(name = "shapes")]
#[command(about = "Interactive shape scene driven by a stack language")]
struct Cli {
    /// Config file. Without this flag `shapes.toml` is read if present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Command script to run at startup, instead of the configured one.
    #[arg(long)]
    script: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `shapes_lang=trace`. Overrides RUST_LOG
    /// and the config file.
    #[arg(long)]
    log: Option<String>,
}

fn init_logging(cli_filter: Option<&str>, config_filter: &str) {
    let filter = match cli_filter {
        Some(f) => EnvFilter::try_new(f),
        None => EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(config_filter)),
    }
    .unwrap_or_else(|e| {
        eprintln!("bad log filter ({e}), using `info`");
        EnvFilter::new("info")
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let (path, required) = match &cli.config {
        Some(p) => (p.clone(), true),
        None => (PathBuf::from(DEFAULT_CONFIG), false),
    };
    let mut config = match Config::load(&path, required) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("shapes: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(script) = cli.script {
        config.startup.script = Some(script);
    }

    init_logging(cli.log.as_deref(), &config.log.filter);
    info!(config = %path.display(), "starting");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window.width, config.window.height]),
        ..Default::default()
    };
    let result = eframe::run_native(
        "Shapes",
        options,
        Box::new(move |_cc| Ok(Box::new(App::new(&config)))),
    );
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "window closed with an error");
            ExitCode::FAILURE
        }
    }
}
