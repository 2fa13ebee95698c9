//! Heartdeck - gesture-gated slide presentation for the terminal
//!
//! A manifest of slides is shown full-screen; some slides hold a small
//! interaction (repair a heart, join hands, open a book) that must be
//! completed before the presentation moves on.

mod config;
mod core;
mod data;
mod frontend;
mod sound;
mod widgets;

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, Subcommand};
use frontend::{Frontend, FrontendEvent, TuiFrontend};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Longest the loop sleeps when nothing is moving
const IDLE_POLL: Duration = Duration::from_millis(250);

#[derive(ClapParser)]
#[command(name = "heartdeck")]
#[command(about = "Interactive, gesture-gated slide presentation", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Presentation manifest (default: ~/.heartdeck/manifests/presentation.json)
    #[arg(short, long, value_name = "FILE")]
    manifest: Option<PathBuf>,

    /// Custom data directory (default: ~/.heartdeck)
    /// Can also be set via HEARTDECK_DIR environment variable
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Slide number to start on (1-based; stops early at an unsolved gate)
    #[arg(long, value_name = "N")]
    start: Option<usize>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a presentation manifest
    Validate {
        /// Manifest file to validate
        #[arg(value_name = "FILE")]
        manifest: Option<PathBuf>,
    },
    /// List the slides of a manifest
    Slides {
        /// Manifest file to list
        #[arg(value_name = "FILE")]
        manifest: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // TUI apps can't log to stdout, so we write to a file
    // (use RUST_LOG env var to control level, e.g. RUST_LOG=info)
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("heartdeck.log")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false) // No color codes in log file
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Set custom data directory if specified (via CLI or environment variable)
    if let Some(data_dir) = &cli.data_dir {
        std::env::set_var("HEARTDECK_DIR", data_dir);
        tracing::info!("Using custom data directory: {:?}", data_dir);
    } else if let Ok(env_dir) = std::env::var("HEARTDECK_DIR") {
        tracing::info!("Using data directory from HEARTDECK_DIR: {}", env_dir);
    }

    // Handle subcommands
    if let Some(command) = cli.command {
        match command {
            Commands::Validate { manifest } => validate_manifest(manifest.as_deref()),
            Commands::Slides { manifest } => list_slides(manifest.as_deref())?,
        }
        return Ok(());
    }

    // Load configuration
    let config = if let Some(config_path) = &cli.config {
        config::Config::load_from_path(config_path)?
    } else {
        config::Config::load()?
    };
    sound::ensure_sounds_directory()?;

    let manifest = load_manifest(cli.manifest.as_deref())?;
    tracing::info!(
        "Loaded {} slides ({} gated)",
        manifest.len(),
        manifest.gated_count()
    );

    run_tui(config, manifest, cli.start)
}

/// Explicit path, else the extracted default, else the embedded copy
fn load_manifest(path: Option<&Path>) -> Result<data::Manifest> {
    if let Some(path) = path {
        return data::Manifest::load_from_file(path);
    }
    let default_path = config::Config::default_manifest_path()?;
    if default_path.exists() {
        return data::Manifest::load_from_file(&default_path);
    }
    let embedded = config::Config::embedded_manifest().context("No embedded default manifest")?;
    data::Manifest::from_json(embedded)
}

fn validate_manifest(path: Option<&Path>) {
    match path {
        Some(p) => println!("Validating manifest: {:?}", p),
        None => println!("Validating default manifest"),
    }

    match load_manifest(path) {
        Ok(manifest) => {
            println!("✓ Manifest loaded successfully");
            println!(
                "  {} slides, {} gated by an interaction",
                manifest.len(),
                manifest.gated_count()
            );

            let mut warnings = 0;
            for slide in manifest.slides() {
                if slide.slide_type == data::SlideType::Interaction && !slide.requires_interaction {
                    println!(
                        "⚠ Warning: interaction slide '{}' does not require interaction",
                        slide.id
                    );
                    warnings += 1;
                }
                for media in slide.media() {
                    if media.source.trim().is_empty() {
                        println!("⚠ Warning: slide '{}' has an empty media reference", slide.id);
                        warnings += 1;
                    }
                }
            }

            if warnings == 0 {
                println!("✓ Manifest is valid with no issues");
            } else {
                println!("⚠ Found {} warning(s)", warnings);
            }
        }
        Err(e) => {
            eprintln!("✗ Failed to load manifest: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn list_slides(path: Option<&Path>) -> Result<()> {
    let manifest = load_manifest(path)?;
    for (i, slide) in manifest.slides().iter().enumerate() {
        let gate = match slide.gate() {
            Some(kind) => format!(" [gate: {}]", kind.display_name()),
            None => String::new(),
        };
        let media = slide.media();
        let media = if media.is_empty() {
            String::new()
        } else {
            let videos = media.iter().filter(|m| m.is_video()).count();
            format!(" ({} media, {} video)", media.len(), videos)
        };
        println!(
            "{:>2}. {:<14} {:<14} {}{}{}",
            i + 1,
            slide.id,
            slide.slide_type.as_str(),
            slide.title,
            gate,
            media
        );
    }
    Ok(())
}

fn run_tui(config: config::Config, manifest: data::Manifest, start: Option<usize>) -> Result<()> {
    let audio = if config.sound.enabled {
        match sound::AmbientAudio::new(&config.sound) {
            Ok(audio) => Some(audio),
            Err(e) => {
                tracing::warn!("Audio unavailable, music controls will be silent: {}", e);
                None
            }
        }
    } else {
        None
    };

    let poll_timeout = Duration::from_millis(config.ui.poll_timeout_ms);
    let mut frontend = TuiFrontend::new()?;

    let now = Instant::now();
    let mut core = core::AppCore::new(config, manifest, audio, now);
    let (width, height) = frontend.size();
    core.handle_event(FrontendEvent::resize(width, height), now);
    if let Some(n) = start {
        core.start_at(n.saturating_sub(1), now);
    }

    while core.running {
        let now = Instant::now();
        let animating = core.is_animating(now);
        if core.needs_render || animating {
            frontend.render(&mut core)?;
        }

        let wait = if animating { poll_timeout } else { IDLE_POLL };
        let wait = core.next_timer_in(now).map_or(wait, |due| due.min(wait));
        for event in frontend.poll_events(wait)? {
            core.handle_event(event, Instant::now());
        }
        core.tick(Instant::now());
    }

    frontend.cleanup()?;
    tracing::info!("Presentation closed");
    Ok(())
}
