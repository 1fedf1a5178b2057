//! CHIP-8 virtual machine
//!
//! The [`Chip8`] type owns every piece of machine state (memory, registers,
//! call stack, framebuffer and keypad) and executes one instruction per call
//! to [`Chip8::step`].  Pacing, timers and I/O are left to the caller.
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod display;
mod exec;
mod keypad;
mod memory;
pub mod op;
mod quirks;
mod regs;

pub use display::{FrameBuffer, HEIGHT, WIDTH};
pub use keypad::{Keypad, KEY_COUNT};
pub use memory::{Memory, FONT, FONT_ADDR, GLYPH_SIZE, PROGRAM_ADDR, RAM_SIZE};
pub use op::{Instruction, Op};
pub use quirks::{Dialect, Quirks};
pub use regs::{Registers, Stack, STACK_DEPTH};

use rand::{rngs::SmallRng, SeedableRng};

/// Fatal conditions raised while loading or running a program
///
/// Unrecognized opcodes are not errors; they execute as no-ops.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// `2NNN` executed with all 16 stack slots in use
    StackOverflow {
        /// Address of the offending instruction
        pc: u16,
    },
    /// `00EE` executed with an empty stack
    StackUnderflow {
        /// Address of the offending instruction
        pc: u16,
    },
    /// An instruction tried to write into the interpreter area below `0x200`
    ReservedWrite {
        /// Target address, already wrapped into the 4 KiB address space
        addr: u16,
    },
    /// The ROM image does not fit between `0x200` and the end of memory
    RomTooLarge {
        /// Size of the rejected image, in bytes
        len: usize,
    },
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::StackOverflow { pc } => {
                write!(f, "stack overflow at {pc:#05x}")
            }
            Error::StackUnderflow { pc } => {
                write!(f, "stack underflow at {pc:#05x}")
            }
            Error::ReservedWrite { addr } => {
                write!(f, "write to reserved address {addr:#05x}")
            }
            Error::RomTooLarge { len } => write!(
                f,
                "ROM is {len} bytes, but only {} bytes are available",
                RAM_SIZE - usize::from(PROGRAM_ADDR)
            ),
        }
    }
}

impl core::error::Error for Error {}

/// Result of a single call to [`Chip8::step`]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// The given operation was executed
    Executed(Op),
    /// The VM is blocked on `FX0A`, waiting for a key to store in `VX`
    ///
    /// The program counter still points at the `FX0A` instruction.
    AwaitingKey {
        /// Destination register
        x: u8,
    },
}

/// Interpreter state, distinguishing normal execution from a key stall
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum State {
    Running,
    AwaitingKey { x: u8 },
}

/// The virtual machine itself
pub struct Chip8 {
    mem: Memory,
    regs: Registers,
    stack: Stack,
    fb: FrameBuffer,
    keys: Keypad,

    /// Dialect-specific behavior, fixed at construction
    quirks: Quirks,
    rng: SmallRng,
    state: State,

    /// Set when the framebuffer changes; cleared by [`Chip8::take_redraw`]
    redraw: bool,
}

impl Chip8 {
    /// Builds a new VM for the given dialect
    ///
    /// The font is loaded at [`FONT_ADDR`], every register is zeroed and the
    /// program counter points at [`PROGRAM_ADDR`].  `seed` drives the `CXNN`
    /// random number generator, so two VMs built with the same seed and fed
    /// the same input behave identically.
    pub fn new(dialect: Dialect, seed: u64) -> Self {
        Self::with_quirks(dialect.into(), seed)
    }

    /// Builds a new VM with an explicit set of quirks
    pub fn with_quirks(quirks: Quirks, seed: u64) -> Self {
        Self {
            mem: Memory::new(),
            regs: Registers::new(),
            stack: Stack::default(),
            fb: FrameBuffer::new(),
            keys: Keypad::default(),
            quirks,
            rng: SmallRng::seed_from_u64(seed),
            state: State::Running,
            redraw: false,
        }
    }

    /// Copies a program image into memory at [`PROGRAM_ADDR`]
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<(), Error> {
        self.mem.load(rom)
    }

    /// Returns the quirks selected at construction
    #[inline]
    pub fn quirks(&self) -> Quirks {
        self.quirks
    }

    /// Shared borrow of the register file
    #[inline]
    pub fn regs(&self) -> &Registers {
        &self.regs
    }

    /// Shared borrow of the call stack
    #[inline]
    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    /// Shared borrow of memory
    #[inline]
    pub fn mem(&self) -> &Memory {
        &self.mem
    }

    /// Shared borrow of the framebuffer
    #[inline]
    pub fn frame(&self) -> &FrameBuffer {
        &self.fb
    }

    /// Shared borrow of the keypad latch
    #[inline]
    pub fn keys(&self) -> &Keypad {
        &self.keys
    }

    /// Mutable borrow of the keypad latch, for the input collector
    #[inline]
    pub fn keys_mut(&mut self) -> &mut Keypad {
        &mut self.keys
    }

    /// Checks whether the VM is stalled on `FX0A`
    #[inline]
    pub fn awaiting_key(&self) -> bool {
        matches!(self.state, State::AwaitingKey { .. })
    }

    /// Checks and clears the redraw flag
    pub fn take_redraw(&mut self) -> bool {
        core::mem::take(&mut self.redraw)
    }

    /// Decrements the delay and sound timers
    ///
    /// This should be called at 60 Hz, independently of instruction
    /// execution.
    pub fn tick_timers(&mut self) {
        self.regs.tick_timers();
    }

    /// Decodes the instruction at the program counter without executing it
    pub fn peek(&self) -> Op {
        Op::decode(Instruction(self.mem.read_word(self.regs.pc)))
    }

    /// Runs one fetch / decode / execute cycle
    ///
    /// If the VM is waiting for a key, no instruction is fetched: the keypad
    /// is checked, and execution resumes past the `FX0A` once a key has been
    /// pressed.
    pub fn step(&mut self) -> Result<Step, Error> {
        if let State::AwaitingKey { x } = self.state {
            return Ok(self.resume(x));
        }

        let pc = self.regs.pc;
        let op = Op::decode(Instruction(self.mem.read_word(pc)));
        self.regs.pc = pc.wrapping_add(2);
        self.execute(op)?;

        Ok(match self.state {
            State::Running => Step::Executed(op),
            State::AwaitingKey { x } => Step::AwaitingKey { x },
        })
    }

    /// Executes a single decoded operation
    ///
    /// The program counter is expected to already point past the
    /// instruction, as it does after a fetch.
    pub fn execute(&mut self, op: Op) -> Result<(), Error> {
        match op {
            Op::Cls => self.cls(),
            Op::Ret => return self.ret(),
            Op::Jump { nnn } => self.regs.pc = nnn,
            Op::Call { nnn } => return self.call(nnn),
            Op::SkipEqImm { x, nn } => self.skip_if(self.v(x) == nn),
            Op::SkipNeImm { x, nn } => self.skip_if(self.v(x) != nn),
            Op::SkipEq { x, y } => self.skip_if(self.v(x) == self.v(y)),
            Op::SkipNe { x, y } => self.skip_if(self.v(x) != self.v(y)),
            Op::LoadImm { x, nn } => self.set_v(x, nn),
            Op::AddImm { x, nn } => self.set_v(x, self.v(x).wrapping_add(nn)),
            Op::Move { x, y } => self.set_v(x, self.v(y)),
            Op::Or { x, y } => self.logic(x, y, |a, b| a | b),
            Op::And { x, y } => self.logic(x, y, |a, b| a & b),
            Op::Xor { x, y } => self.logic(x, y, |a, b| a ^ b),
            Op::Add { x, y } => self.add(x, y),
            Op::Sub { x, y } => self.sub(x, self.v(x), self.v(y)),
            Op::SubN { x, y } => self.sub(x, self.v(y), self.v(x)),
            Op::Shr { x, y } => self.shr(x, y),
            Op::Shl { x, y } => self.shl(x, y),
            Op::JumpV0 { nnn } => self.jump_plus(0, nnn),
            Op::JumpOffset { x, nnn } => self.jump_offset(x, nnn),
            Op::LoadIndex { nnn } => self.regs.i = nnn,
            Op::Random { x, nn } => self.random(x, nn),
            Op::Draw { x, y, n } => self.draw(x, y, n),
            Op::SkipKey { x } => self.skip_if(self.keys.is_pressed(self.v(x))),
            Op::SkipNoKey { x } => {
                self.skip_if(!self.keys.is_pressed(self.v(x)))
            }
            Op::GetDelay { x } => self.set_v(x, self.regs.delay),
            Op::WaitKey { x } => self.wait_key(x),
            Op::SetDelay { x } => self.regs.delay = self.v(x),
            Op::SetSound { x } => self.regs.sound = self.v(x),
            Op::AddIndex { x } => {
                self.regs.i = self.regs.i.wrapping_add(u16::from(self.v(x)))
            }
            Op::Font { x } => self.font(x),
            Op::Bcd { x } => return self.bcd(x),
            Op::Store { x } => return self.store(x),
            Op::Load { x } => self.load(x),
            Op::Unknown(_) => (),
        }
        Ok(())
    }

    /// Finishes a pending `FX0A` if a key is down
    fn resume(&mut self, x: u8) -> Step {
        let Some(k) = self.keys.take_first() else {
            return Step::AwaitingKey { x };
        };
        self.set_v(x, k);
        self.regs.pc = self.regs.pc.wrapping_add(2);
        self.state = State::Running;
        Step::Executed(Op::WaitKey { x })
    }

    /// Address of the instruction currently being executed
    #[inline]
    fn current_pc(&self) -> u16 {
        self.regs.pc.wrapping_sub(2)
    }

    #[inline]
    fn v(&self, x: u8) -> u8 {
        self.regs.v[usize::from(x)]
    }

    #[inline]
    fn set_v(&mut self, x: u8, value: u8) {
        self.regs.v[usize::from(x)] = value;
    }
}
