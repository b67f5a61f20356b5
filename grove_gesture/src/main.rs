//! grove_gesture — interactive entry point.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use grove_field::ThemeColor;
use grove_gesture::app::run;
use grove_gesture::config::{AppConfig, SourceKind};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON configuration file; missing keys keep their defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of particles.
    #[arg(short, long)]
    particles: Option<usize>,

    /// Seed for the particle layout.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Theme color: ember, aurora, lagoon, orchid or frost.
    #[arg(short, long, value_parser = parse_theme)]
    theme: Option<ThemeColor>,

    /// Hand source: sim or leap.
    #[arg(long, value_parser = parse_source)]
    source: Option<SourceKind>,

    /// Never open a MIDI port.
    #[arg(long)]
    mute: bool,

    #[arg(long, default_value_t = log::LevelFilter::Info)]
    log_level: log::LevelFilter,
}

fn parse_theme(s: &str) -> Result<ThemeColor, String> {
    ThemeColor::parse(s).ok_or_else(|| {
        let names: Vec<_> = ThemeColor::ALL.iter().map(|t| t.name()).collect();
        format!("unknown theme '{}' (expected one of {})", s, names.join(", "))
    })
}

fn parse_source(s: &str) -> Result<SourceKind, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "sim"  => Ok(SourceKind::Sim),
        "leap" => Ok(SourceKind::Leap),
        _      => Err(format!("unknown source '{}' (expected sim or leap)", s)),
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .write_style(env_logger::WriteStyle::Auto)
        .filter_level(args.log_level)
        .parse_env(env_logger::Env::default())
        .init();

    let mut cfg = match &args.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("reading configuration {}", path.display()))?,
        None => AppConfig::default(),
    };
    if let Some(n) = args.particles { cfg.particle_count = n; }
    if let Some(s) = args.seed      { cfg.seed = s; }
    if let Some(t) = args.theme     { cfg.theme = t; }
    if let Some(s) = args.source    { cfg.source = s; }
    if args.mute                    { cfg.audio.enabled = false; }

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║        Grove — Gesture-Controlled Particle Forest            ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
    match cfg.source {
        SourceKind::Leap if cfg!(feature = "leap") => println!("  Mode: LeapMotion hardware"),
        _ => println!("  Mode: Keyboard + mouse simulation  (use --features leap for hardware)"),
    }
    println!("  Particles: {}   Trees: {}   Theme: {}", cfg.particle_count, cfg.tree_count, cfg.theme.name());
    println!();
    println!("  Opening visualizer window…");
    println!();

    run(cfg).context("grove_gesture stopped")?;
    Ok(())
}
