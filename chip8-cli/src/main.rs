use std::io::Read;
use std::path::PathBuf;
use std::sync::mpsc::{self, TryRecvError};

use chip8::Dialect;
use host::{key_for_char, Config, FrameClock, Host, Input};

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

mod disasm;

const ESC: u8 = 0x1b;

/// CHIP-8 runner
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// ROM to load and execute
    rom: PathBuf,

    /// Interpreter dialect
    #[clap(long, value_enum, default_value_t = Dialect::Modern)]
    dialect: Dialect,

    /// Stop after this many instructions
    #[clap(long)]
    cycles: Option<u64>,

    /// Pace frames at 60 Hz instead of running flat out
    #[clap(long)]
    realtime: bool,

    /// Instructions per frame
    #[clap(
        long,
        default_value_t = host::DEFAULT_INSTRUCTIONS_PER_FRAME as u64,
        value_parser = clap::value_parser!(u64).range(1..),
    )]
    ipf: u64,

    /// Random number seed (defaults to the current time)
    #[clap(long)]
    seed: Option<u64>,

    /// Draw any number of sprites per frame
    #[clap(long)]
    no_display_wait: bool,

    /// Print a disassembly of the ROM and exit
    #[clap(long)]
    disassemble: bool,

    /// Print the screen as text when the run ends
    #[clap(long)]
    dump: bool,
}

/// Spawns a worker thread that listens on `stdin` and emits bytes
///
/// The channel disconnects when `stdin` reaches end-of-file.
fn stdin_worker() -> mpsc::Receiver<u8> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let mut i = std::io::stdin().lock();
        let mut buf = [0u8; 32];
        loop {
            let n = match i.read(&mut buf) {
                Ok(0) => return,
                Ok(n) => n,
                Err(e) => {
                    warn!("stdin closed: {e}");
                    return;
                }
            };
            for &c in &buf[..n] {
                if tx.send(c).is_err() {
                    return;
                }
            }
        }
    });
    rx
}

/// Collects queued keystrokes into a frame's worth of input
///
/// Each mapped byte is a tap: pressed this frame, released the next.
/// Returns `false` in the second slot once `stdin` has closed.
fn poll_keys(rx: &mpsc::Receiver<u8>) -> (Input, bool) {
    let mut input = Input::default();
    loop {
        match rx.try_recv() {
            Ok(ESC) => input.quit = true,
            Ok(c) => {
                if let Some(k) = key_for_char(char::from(c)) {
                    input.pressed.push(k);
                    input.released.push(k);
                }
            }
            Err(TryRecvError::Empty) => return (input, true),
            Err(TryRecvError::Disconnected) => return (input, false),
        }
    }
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

    if args.disassemble {
        print!("{}", disasm::disassemble(&rom));
        return Ok(());
    }

    let seed = args.seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default()
    });
    let config = Config {
        dialect: args.dialect,
        instructions_per_frame: usize::try_from(args.ipf)
            .context("--ipf is too large")?,
        display_wait: !args.no_display_wait,
        seed,
        ..Config::default()
    };
    info!("running {:?} as {:?} with seed {seed}", args.rom, args.dialect);

    let mut vm = config.boot(&rom).context("failed to load ROM")?;
    let mut host = Host::new(config);
    host.set_instruction_limit(args.cycles);
    let mut clock = args
        .realtime
        .then(|| FrameClock::new(config.frame_interval));

    let keys = stdin_worker();
    let start = std::time::Instant::now();
    let result = loop {
        let (input, stdin_open) = poll_keys(&keys);
        let out = match host.frame(&mut vm, input) {
            Ok(out) => out,
            Err(e) => break Err(e),
        };
        if out.quit {
            info!("quit requested");
            break Ok(());
        }
        if out.stalled && !stdin_open {
            info!("waiting for a key with stdin closed");
            break Ok(());
        }
        if host.limit_reached() {
            info!("instruction limit reached");
            break Ok(());
        }
        if let Some(clock) = clock.as_mut() {
            clock.wait();
        } else if out.stalled {
            std::thread::sleep(config.frame_interval);
        }
    };

    let stats = host.stats();
    info!(
        "ran {} instructions over {} frames ({} redraws) in {:?}",
        stats.instructions,
        stats.frames,
        stats.redraws,
        start.elapsed()
    );
    if args.dump {
        print!("{}", vm.frame());
    }
    result.context("VM halted")
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ipf_must_be_positive() {
        assert!(Args::try_parse_from(["chip8", "a.ch8", "--ipf", "0"]).is_err());
        let args =
            Args::try_parse_from(["chip8", "a.ch8", "--ipf", "3"]).unwrap();
        assert_eq!(args.ipf, 3);
        let args = Args::try_parse_from(["chip8", "a.ch8"]).unwrap();
        assert_eq!(args.ipf, host::DEFAULT_INSTRUCTIONS_PER_FRAME as u64);
    }
}
