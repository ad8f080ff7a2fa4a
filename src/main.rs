//! padmux input probe
//!
//! Small diagnostic binary around the library: selects a backend, builds a
//! pipeline and logs the per-frame action mask so bindings, turbo and the
//! hotkey gate can be checked without a full frontend attached.

use anyhow::Result;
use clap::Parser;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;

use padmux::config::InputSettings;
use padmux::pipeline::InputPipeline;
use padmux::{backend, ActionMask};

/// Padmux input probe - poll the input pipeline and log pressed actions
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the input settings file; defaults apply when omitted
    #[arg(short, long)]
    config: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// List compiled-in input backends
    #[arg(long)]
    list_backends: bool,

    /// Probe the menu key mask instead of the frontend mask
    #[arg(long)]
    menu: bool,

    /// Number of frames to probe (0 = run until interrupted)
    #[arg(long, default_value = "0")]
    frames: u64,

    /// Probe frame rate
    #[arg(long, default_value = "60")]
    fps: u32,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level)?;

    if args.list_backends {
        for ident in backend::backend_idents() {
            println!("{ident}");
        }
        return Ok(());
    }

    let settings = match &args.config {
        Some(path) => InputSettings::load(path)?,
        None => InputSettings::default(),
    };

    let backend = backend::find_backend(&settings.backend);
    let mut pipeline = InputPipeline::new(settings, backend);
    info!(backend = pipeline.backend_ident(), "probing input");

    let frame_time = Duration::from_secs(1) / args.fps.max(1);
    let mut last_mask = ActionMask::EMPTY;
    let mut frame: u64 = 0;

    loop {
        let started = Instant::now();
        pipeline.poll();

        let mask = if args.menu {
            pipeline.menu_keys_pressed()
        } else {
            pipeline.keys_pressed()
        };

        if mask != last_mask {
            let pressed: Vec<_> = mask.iter().collect();
            info!(frame, ?pressed, "mask changed");
            last_mask = mask;
        }

        frame += 1;
        if args.frames != 0 && frame >= args.frames {
            break;
        }
        if let Some(remaining) = frame_time.checked_sub(started.elapsed()) {
            std::thread::sleep(remaining);
        }
    }

    info!(frames = frame, "probe finished");
    Ok(())
}

fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("padmux={level}")));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}
