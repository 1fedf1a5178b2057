//! Frame driver for a [`Chip8`] machine
//!
//! The [`Host`] turns a stream of per-frame [`Input`] events into VM
//! execution: keys are latched, timers tick at the frame rate, a bounded
//! number of instructions run, and any screen update is handed back in the
//! [`Output`].  Frontends own the window (or terminal) and the clock.
#![warn(missing_docs)]
use chip8::{Chip8, Error, FrameBuffer, Step};
use log::{debug, error, trace};

mod clock;
mod config;
mod keymap;

pub use clock::FrameClock;
pub use config::{
    Config, DEFAULT_FRAME_INTERVAL, DEFAULT_INSTRUCTIONS_PER_FRAME,
};
pub use keymap::{key_for_char, KEYMAP};

/// Input to [`Host::frame`], including all events since the previous frame
#[derive(Clone, Debug, Default)]
pub struct Input {
    /// Keypad keys pressed (`0x0..=0xF`)
    pub pressed: Vec<u8>,

    /// Keypad keys released
    ///
    /// A key that is both pressed and released in the same frame stays down
    /// until the following frame, so short taps are never lost.
    pub released: Vec<u8>,

    /// The user asked to exit
    pub quit: bool,
}

/// Output from [`Host::frame`]
#[derive(Debug)]
pub struct Output<'a> {
    /// New screen contents, if anything was drawn since the last frame
    pub frame: Option<&'a FrameBuffer>,

    /// The sound timer is running, so a tone should be playing
    pub beep: bool,

    /// The frontend should exit
    pub quit: bool,

    /// Number of instructions executed this frame
    pub executed: usize,

    /// The VM is blocked on `FX0A`, waiting for a key
    pub stalled: bool,
}

/// Running totals, for end-of-run reporting
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    /// Frames run
    pub frames: u64,
    /// Instructions executed
    pub instructions: u64,
    /// Screen updates handed to the frontend
    pub redraws: u64,
}

/// Drives a VM one frame at a time
pub struct Host {
    config: Config,

    /// Keys pressed and released in the same frame, to release next frame
    deferred: Vec<u8>,

    /// First runtime error; once set, no further frames are run
    failed: Option<Error>,

    /// Total instructions to run before every frame becomes empty
    limit: Option<u64>,

    stats: Stats,
}

impl Host {
    /// Builds a new host
    pub fn new(config: Config) -> Self {
        Self {
            config,
            deferred: vec![],
            failed: None,
            limit: None,
            stats: Stats::default(),
        }
    }

    /// Caps the total number of instructions run across all frames
    ///
    /// The frame that reaches the cap is cut short, so
    /// [`Stats::instructions`] never exceeds it.
    pub fn set_instruction_limit(&mut self, limit: Option<u64>) {
        self.limit = limit;
    }

    /// Checks whether the instruction cap has been reached
    pub fn limit_reached(&self) -> bool {
        self.limit.is_some_and(|n| self.stats.instructions >= n)
    }

    /// Returns the active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns running totals
    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// Returns the error that stopped the VM, if any
    pub fn error(&self) -> Option<Error> {
        self.failed
    }

    /// Runs a single frame
    ///
    /// Key events are applied, timers tick once, and then up to
    /// [`Config::instructions_per_frame`] instructions run.  The frame ends
    /// early if the VM blocks on `FX0A`, or (with
    /// [`Config::display_wait`]) before a second sprite draw.
    ///
    /// A runtime error is logged, returned, and returned again from every
    /// later call.
    pub fn frame<'a>(
        &mut self,
        vm: &'a mut Chip8,
        input: Input,
    ) -> Result<Output<'a>, Error> {
        if let Some(e) = self.failed {
            return Err(e);
        }
        self.apply_keys(vm, &input);
        vm.tick_timers();

        let (executed, stalled) = match self.run(vm) {
            Ok(r) => r,
            Err(e) => {
                error!("VM halted: {e}");
                self.failed = Some(e);
                return Err(e);
            }
        };
        self.stats.frames += 1;
        self.stats.instructions += executed as u64;

        let redraw = vm.take_redraw();
        if redraw {
            self.stats.redraws += 1;
        }
        let vm: &'a Chip8 = vm;
        Ok(Output {
            frame: redraw.then_some(vm.frame()),
            beep: vm.regs().beeping(),
            quit: input.quit,
            executed,
            stalled,
        })
    }

    fn apply_keys(&mut self, vm: &mut Chip8, input: &Input) {
        let keys = vm.keys_mut();
        for k in self.deferred.drain(..) {
            keys.release(k);
        }
        for &k in &input.pressed {
            keys.press(k);
        }
        for &k in &input.released {
            if input.pressed.contains(&k) {
                self.deferred.push(k);
            } else {
                keys.release(k);
            }
        }
    }

    /// Instructions allowed this frame
    fn budget(&self) -> usize {
        let ipf = self.config.instructions_per_frame;
        match self.limit {
            Some(n) => {
                let left = n.saturating_sub(self.stats.instructions);
                usize::try_from(left).map_or(ipf, |left| left.min(ipf))
            }
            None => ipf,
        }
    }

    /// Runs the instruction budget, returning `(executed, stalled)`
    fn run(&mut self, vm: &mut Chip8) -> Result<(usize, bool), Error> {
        let budget = self.budget();
        let mut executed = 0;
        let mut drew = false;
        while executed < budget {
            if drew && self.config.display_wait && vm.peek().is_draw() {
                debug!("deferring draw at {:#05x}", vm.regs().pc);
                break;
            }
            let pc = vm.regs().pc;
            match vm.step()? {
                Step::Executed(op) => {
                    trace!("{pc:#05x}: {op}");
                    executed += 1;
                    drew |= op.is_draw();
                }
                Step::AwaitingKey { x } => {
                    trace!("{pc:#05x}: waiting for key into V{x:X}");
                    return Ok((executed, true));
                }
            }
        }
        Ok((executed, false))
    }
}
