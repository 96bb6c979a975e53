#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that hosts a Noise Identification module.
//!
//! Commands are read line by line from standard input using the remote
//! command syntax, applied to the module, and the resulting feedback is
//! played out frame by frame before the next command is read.

mod console_host;
mod texture_manifest;

use std::{
    io::{self, BufRead},
    path::PathBuf,
    time::Duration,
};

use anyhow::{Context, Result};
use clap::Parser;
use noise_identification_core::Command;
use noise_identification_module::{self as module, deliver, query, ModuleIdAllocator, NoiseModule};
use noise_identification_system_feedback::{
    DisplayPose, Feedback, FeedbackConfig, FeedbackFrame, LedMaterial,
};
use noise_identification_system_remote::{self as remote, HELP_MESSAGE};
use noise_identification_system_sequence::{Config, SequenceGenerator};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::{console_host::ConsoleHost, texture_manifest::TextureManifest};

/// Upper bound on simulated frames spent settling animations after a command.
const MAX_SETTLE_FRAMES: u32 = 10_000;

#[derive(Debug, Parser)]
#[command(
    name = "noise-identification",
    about = "Play a Noise Identification module from the terminal"
)]
struct Args {
    /// Seed for stage generation and texture selection; random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// TOML manifest listing five texture assets per category.
    #[arg(long, value_name = "PATH")]
    textures: Option<PathBuf>,
    /// Simulated frame length used to play animations out between commands.
    #[arg(
        long,
        value_name = "MS",
        default_value_t = 16,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    frame_ms: u64,
}

/// Entry point for the Noise Identification command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let config = args.seed.map_or_else(Config::from_entropy, Config::new);
    let seed = config.rng_seed();
    let manifest = args
        .textures
        .as_deref()
        .map(TextureManifest::load)
        .transpose()?;

    let mut feedback_config = FeedbackConfig::new(seed.rotate_left(32));
    if let Some(manifest) = &manifest {
        feedback_config = feedback_config.with_textures(manifest.table());
    }
    let mut feedback = Feedback::new(feedback_config);
    let mut generator = SequenceGenerator::new(config);
    let mut ids = ModuleIdAllocator::new();
    let mut host = ConsoleHost::default();
    let frame = Duration::from_millis(args.frame_ms);

    let mut events = Vec::new();
    let mut noise_module = NoiseModule::initialize(ids.allocate(), &mut generator, &mut events);
    feedback.handle(&events);
    tracing::info!(seed, "module ready");

    println!("{HELP_MESSAGE}");
    println!("{}", describe(&feedback.frame(), manifest.as_ref()));

    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read command from standard input")?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match remote::to_command(&line) {
            Ok(command) => command,
            Err(error) => {
                println!("{error}. {HELP_MESSAGE}");
                continue;
            }
        };

        events.clear();
        module::apply(&mut noise_module, command, &mut events);
        deliver(&events, &mut host);
        feedback.handle(&events);
        settle(&mut noise_module, &mut feedback, frame);
        println!("{}", describe(&feedback.frame(), manifest.as_ref()));

        if query::is_solved(&noise_module) {
            break;
        }
    }

    println!(
        "Finished with {} strike(s); solved: {}.",
        host.strikes(),
        host.solved()
    );
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter)
        .init();
}

/// Advances the presentation clock until every animation has come to rest.
fn settle(noise_module: &mut NoiseModule, feedback: &mut Feedback, frame: Duration) {
    let mut events = Vec::new();
    for _ in 0..MAX_SETTLE_FRAMES {
        if feedback.is_idle() {
            return;
        }
        events.clear();
        module::apply(noise_module, Command::Tick { dt: frame }, &mut events);
        feedback.handle(&events);
    }
}

fn describe(frame: &FeedbackFrame, manifest: Option<&TextureManifest>) -> String {
    let leds: String = frame
        .leds
        .iter()
        .map(|led| match led {
            LedMaterial::On => '*',
            LedMaterial::Off => '.',
        })
        .collect();

    let display = match frame.texture {
        _ if frame.pose == DisplayPose::COLLAPSED => "hidden".to_owned(),
        Some(texture) => manifest
            .and_then(|manifest| manifest.asset(texture))
            .map_or_else(
                || format!("texture #{}", texture.get()),
                |path| path.display().to_string(),
            ),
        None => "blank".to_owned(),
    };

    format!("[LEDs {leds}] display: {display}")
}
