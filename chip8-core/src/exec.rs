//! Semantic handlers, one per opcode family
//!
//! Every handler runs with `pc` already pointing past the current
//! instruction.  Handlers that write `VF` as a flag do so last, so the flag
//! wins when `VF` is also the destination register.
use crate::{memory::GLYPH_SIZE, Chip8, Error, State, FONT_ADDR};
use rand::Rng;

impl Chip8 {
    /// Clear the screen
    ///
    /// ```text
    /// 00E0
    /// ```
    pub(crate) fn cls(&mut self) {
        self.fb.clear();
        self.redraw = true;
    }

    /// Return from a subroutine
    ///
    /// ```text
    /// 00EE
    /// ```
    pub(crate) fn ret(&mut self) -> Result<(), Error> {
        let pc = self.current_pc();
        self.regs.pc =
            self.stack.pop().ok_or(Error::StackUnderflow { pc })?;
        Ok(())
    }

    /// Call the subroutine at `NNN`
    ///
    /// ```text
    /// 2NNN
    /// ```
    ///
    /// The return address (the instruction after the call) is pushed.
    pub(crate) fn call(&mut self, nnn: u16) -> Result<(), Error> {
        let pc = self.current_pc();
        self.stack
            .push(self.regs.pc)
            .map_err(|_| Error::StackOverflow { pc })?;
        self.regs.pc = nnn;
        Ok(())
    }

    /// Skips the next instruction if `cond` is true
    #[inline]
    pub(crate) fn skip_if(&mut self, cond: bool) {
        if cond {
            self.regs.pc = self.regs.pc.wrapping_add(2);
        }
    }

    /// Bitwise logic
    ///
    /// ```text
    /// 8XY1 | 8XY2 | 8XY3
    /// ```
    ///
    /// The modern dialect clears `VF` afterwards.
    pub(crate) fn logic(&mut self, x: u8, y: u8, f: fn(u8, u8) -> u8) {
        self.set_v(x, f(self.v(x), self.v(y)));
        if self.quirks.logic_clears_vf {
            self.set_v(0xF, 0);
        }
    }

    /// Add with carry
    ///
    /// ```text
    /// 8XY4
    /// ```
    pub(crate) fn add(&mut self, x: u8, y: u8) {
        let (v, carry) = self.v(x).overflowing_add(self.v(y));
        self.set_v(x, v);
        self.set_v(0xF, carry as u8);
    }

    /// Subtract with borrow, storing `a - b` in `VX`
    ///
    /// ```text
    /// 8XY5 (a = VX, b = VY) | 8XY7 (a = VY, b = VX)
    /// ```
    ///
    /// `VF` is 0 on borrow and 1 otherwise.
    pub(crate) fn sub(&mut self, x: u8, a: u8, b: u8) {
        let (v, borrow) = a.overflowing_sub(b);
        self.set_v(x, v);
        self.set_v(0xF, !borrow as u8);
    }

    /// Returns the value to be shifted by `8XY6` / `8XYE`
    ///
    /// In the legacy dialect, `VY` is first copied into `VX`.
    fn shift_source(&mut self, x: u8, y: u8) -> u8 {
        if self.quirks.shift_uses_vy {
            self.set_v(x, self.v(y));
        }
        self.v(x)
    }

    /// Shift right
    ///
    /// ```text
    /// 8XY6
    /// ```
    pub(crate) fn shr(&mut self, x: u8, y: u8) {
        let v = self.shift_source(x, y);
        self.set_v(x, v >> 1);
        self.set_v(0xF, v & 1);
    }

    /// Shift left
    ///
    /// ```text
    /// 8XYE
    /// ```
    pub(crate) fn shl(&mut self, x: u8, y: u8) {
        let v = self.shift_source(x, y);
        self.set_v(x, v << 1);
        self.set_v(0xF, v >> 7);
    }

    /// Jump to `NNN + VR`
    ///
    /// ```text
    /// BNNN (r = 0)
    /// ```
    pub(crate) fn jump_plus(&mut self, r: u8, nnn: u16) {
        self.regs.pc = nnn.wrapping_add(u16::from(self.v(r)));
    }

    /// Offset jump through an unassigned `8XYN` word
    ///
    /// Adds `V0`, or `VX` in the modern dialect.  `X` is the top nibble of
    /// `NNN`.
    pub(crate) fn jump_offset(&mut self, x: u8, nnn: u16) {
        let r = if self.quirks.jump_uses_vx { x } else { 0 };
        self.jump_plus(r, nnn);
    }

    /// Random number
    ///
    /// ```text
    /// CXNN
    /// ```
    pub(crate) fn random(&mut self, x: u8, nn: u8) {
        let r: u8 = self.rng.gen();
        self.set_v(x, r & nn);
    }

    /// Draw an `N`-row sprite from `I` at `(VX, VY)`
    ///
    /// ```text
    /// DXYN
    /// ```
    ///
    /// `VF` is set to 1 if any lit pixel was turned off.
    pub(crate) fn draw(&mut self, x: u8, y: u8, n: u8) {
        let mut sprite = [0u8; 15];
        let sprite = &mut sprite[..usize::from(n)];
        for (i, row) in sprite.iter_mut().enumerate() {
            *row = self.mem.read_byte(self.regs.i.wrapping_add(i as u16));
        }
        let hit = self.fb.draw(self.v(x), self.v(y), sprite);
        self.set_v(0xF, hit as u8);
        self.redraw = true;
    }

    /// Wait for a key press
    ///
    /// ```text
    /// FX0A
    /// ```
    ///
    /// If a key is already down, it is consumed immediately; otherwise the
    /// program counter is rewound onto this instruction and the VM enters
    /// the key-wait state.
    pub(crate) fn wait_key(&mut self, x: u8) {
        match self.keys.take_first() {
            Some(k) => self.set_v(x, k),
            None => {
                self.regs.pc = self.current_pc();
                self.state = State::AwaitingKey { x };
            }
        }
    }

    /// Point `I` at the font glyph for the low nibble of `VX`
    ///
    /// ```text
    /// FX29
    /// ```
    pub(crate) fn font(&mut self, x: u8) {
        let digit = u16::from(self.v(x) & 0xF);
        self.regs.i = FONT_ADDR + digit * GLYPH_SIZE as u16;
    }

    /// Binary-coded decimal
    ///
    /// ```text
    /// FX33
    /// ```
    pub(crate) fn bcd(&mut self, x: u8) -> Result<(), Error> {
        let v = self.v(x);
        let i = self.regs.i;
        self.mem.check_writable(i, 3)?;
        self.mem.write_byte(i, v / 100)?;
        self.mem.write_byte(i.wrapping_add(1), (v / 10) % 10)?;
        self.mem.write_byte(i.wrapping_add(2), v % 10)?;
        Ok(())
    }

    /// Store `V0..=VX` at `I`
    ///
    /// ```text
    /// FX55
    /// ```
    ///
    /// Nothing is written if any byte of the range is reserved.
    pub(crate) fn store(&mut self, x: u8) -> Result<(), Error> {
        self.mem.check_writable(self.regs.i, u16::from(x) + 1)?;
        for r in 0..=x {
            let addr = self.regs.i.wrapping_add(u16::from(r));
            self.mem.write_byte(addr, self.v(r))?;
        }
        self.advance_index(x);
        Ok(())
    }

    /// Load `V0..=VX` from `I`
    ///
    /// ```text
    /// FX65
    /// ```
    pub(crate) fn load(&mut self, x: u8) {
        for r in 0..=x {
            let addr = self.regs.i.wrapping_add(u16::from(r));
            self.set_v(r, self.mem.read_byte(addr));
        }
        self.advance_index(x);
    }

    /// Moves `I` past the registers stored or loaded, if the dialect says so
    fn advance_index(&mut self, x: u8) {
        if self.quirks.load_store_advances_i {
            self.regs.i = self.regs.i.wrapping_add(u16::from(x) + 1);
        }
    }
}
