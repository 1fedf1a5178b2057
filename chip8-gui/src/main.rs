use std::io::Read;

use chip8::{Dialect, HEIGHT, WIDTH};
use host::{Config, Host};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use eframe::egui;
use log::info;

use chip8_gui::Stage;

/// CHIP-8 runner
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// ROM to load and execute
    rom: std::path::PathBuf,

    /// Interpreter dialect
    #[clap(long, value_enum, default_value_t = Dialect::Modern)]
    dialect: Dialect,

    /// Instructions per frame
    #[clap(long, default_value_t = host::DEFAULT_INSTRUCTIONS_PER_FRAME)]
    ipf: usize,

    /// Random number seed (defaults to the current time)
    #[clap(long)]
    seed: Option<u64>,

    /// Draw any number of sprites per frame
    #[clap(long)]
    no_display_wait: bool,

    /// Scale factor for the window
    #[clap(long, default_value_t = 10.0)]
    scale: f32,
}

fn main() -> Result<()> {
    let env = env_logger::Env::default()
        .filter_or("CHIP8_LOG", "info")
        .write_style_or("CHIP8_LOG", "always");
    env_logger::init_from_env(env);

    let args = Args::parse();
    let mut f = std::fs::File::open(&args.rom)
        .with_context(|| format!("failed to open {:?}", args.rom))?;

    let mut rom = vec![];
    f.read_to_end(&mut rom).context("failed to read file")?;

    let seed = args.seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default()
    });
    let config = Config {
        dialect: args.dialect,
        instructions_per_frame: args.ipf,
        display_wait: !args.no_display_wait,
        seed,
        ..Config::default()
    };
    let vm = config.boot(&rom).context("failed to load ROM")?;
    let host = Host::new(config);

    let scale = args.scale;
    info!("running {:?} as {:?} with seed {seed}", args.rom, args.dialect);
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(
                egui::Vec2::new(WIDTH as f32, HEIGHT as f32) * scale,
            )
            .with_resizable(false),
        ..Default::default()
    };

    eframe::run_native(
        "CHIP-8",
        options,
        Box::new(move |cc| Ok(Box::new(Stage::new(vm, host, &cc.egui_ctx)))),
    )
    .map_err(|e| anyhow!("got egui error: {e:?}"))
}
