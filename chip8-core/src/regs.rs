use crate::PROGRAM_ADDR;

/// Maximum call depth
pub const STACK_DEPTH: usize = 16;

/// Register file
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Registers {
    /// General-purpose registers `V0..=VF`; `VF` doubles as the flag register
    pub v: [u8; 16],
    /// Index register
    ///
    /// This is 16 bits wide and wraps on overflow; only its low 12 bits are
    /// used when addressing memory.
    pub i: u16,
    /// Program counter
    pub pc: u16,
    /// Delay timer, decremented at 60 Hz
    pub delay: u8,
    /// Sound timer, decremented at 60 Hz; a tone plays while it is nonzero
    pub sound: u8,
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

impl Registers {
    /// Zeroed registers, with the program counter at [`PROGRAM_ADDR`]
    pub fn new() -> Self {
        Self {
            v: [0; 16],
            i: 0,
            pc: PROGRAM_ADDR,
            delay: 0,
            sound: 0,
        }
    }

    /// Decrements both timers, stopping at zero
    pub fn tick_timers(&mut self) {
        self.delay = self.delay.saturating_sub(1);
        self.sound = self.sound.saturating_sub(1);
    }

    /// Checks whether the sound timer is running
    #[inline]
    pub fn beeping(&self) -> bool {
        self.sound > 0
    }
}

/// Return-address stack
#[derive(Copy, Clone, Debug, Default)]
pub struct Stack {
    data: [u16; STACK_DEPTH],
    len: usize,
}

impl Stack {
    /// Pushes a return address
    ///
    /// If the stack is full, the address is handed back as the error.
    pub fn push(&mut self, addr: u16) -> Result<(), u16> {
        let slot = self.data.get_mut(self.len).ok_or(addr)?;
        *slot = addr;
        self.len += 1;
        Ok(())
    }

    /// Pops the most recent return address
    pub fn pop(&mut self) -> Option<u16> {
        self.len = self.len.checked_sub(1)?;
        Some(self.data[self.len])
    }

    /// Number of addresses on the stack
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Checks whether the stack is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Addresses on the stack, oldest first
    #[inline]
    pub fn as_slice(&self) -> &[u16] {
        &self.data[..self.len]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn stack() {
        let mut s = Stack::default();
        assert_eq!(s.pop(), None);
        for i in 0..STACK_DEPTH as u16 {
            s.push(i * 2).unwrap();
        }
        assert_eq!(s.push(0x123), Err(0x123));
        assert_eq!(s.len(), STACK_DEPTH);
        assert_eq!(s.as_slice()[1], 2);
        assert_eq!(s.pop(), Some(30));
        assert_eq!(s.len(), STACK_DEPTH - 1);
    }

    #[test]
    fn timers_saturate() {
        let mut r = Registers::new();
        r.delay = 1;
        r.sound = 2;
        assert!(r.beeping());
        r.tick_timers();
        assert_eq!((r.delay, r.sound), (0, 1));
        r.tick_timers();
        r.tick_timers();
        assert_eq!((r.delay, r.sound), (0, 0));
        assert!(!r.beeping());
    }
}
