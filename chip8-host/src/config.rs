use chip8::{Chip8, Dialect, Error};
use std::time::Duration;

/// Instructions executed per 60 Hz frame, unless configured otherwise
pub const DEFAULT_INSTRUCTIONS_PER_FRAME: usize = 11;

/// Wall-clock length of a frame, unless configured otherwise
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Runtime settings for a [`Host`](crate::Host)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Dialect used to build the VM
    pub dialect: Dialect,

    /// Upper bound on instructions executed per frame
    pub instructions_per_frame: usize,

    /// Target frame period
    pub frame_interval: Duration,

    /// Ends a frame early when a second sprite would be drawn in it
    pub display_wait: bool,

    /// Seed for the `CXNN` random number generator
    pub seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            instructions_per_frame: DEFAULT_INSTRUCTIONS_PER_FRAME,
            frame_interval: DEFAULT_FRAME_INTERVAL,
            display_wait: true,
            seed: 0,
        }
    }
}

impl Config {
    /// Builds a VM with this configuration and loads the given ROM into it
    pub fn boot(&self, rom: &[u8]) -> Result<Chip8, Error> {
        let mut vm = Chip8::new(self.dialect, self.seed);
        vm.load_rom(rom)?;
        Ok(vm)
    }
}
