//! Instruction decoding
//!
//! Every CHIP-8 instruction is a big-endian 16-bit word.  The top nibble
//! selects a family; the remaining twelve bits are sliced into operand
//! fields:
//!
//! ```text
//!   F   X   Y   N
//!  ┌───┬───┬───┬───┐
//!  │ 4 │ 4 │ 4 │ 4 │   NN = low byte, NNN = low 12 bits
//!  └───┴───┴───┴───┘
//! ```
//!
//! Decoding is total: any word that does not name a supported operation
//! becomes [`Op::Unknown`], which executes as a no-op.

/// Raw 16-bit instruction word
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Instruction(pub u16);

impl Instruction {
    /// Builds an instruction from its two bytes, high byte first
    #[inline]
    pub fn from_bytes(hi: u8, lo: u8) -> Self {
        Self(u16::from_be_bytes([hi, lo]))
    }

    /// Top nibble, selecting the instruction family
    #[inline]
    pub fn family(self) -> u8 {
        (self.0 >> 12) as u8
    }

    /// Second nibble, usually a register index
    #[inline]
    pub fn x(self) -> u8 {
        ((self.0 >> 8) & 0xF) as u8
    }

    /// Third nibble, usually a register index
    #[inline]
    pub fn y(self) -> u8 {
        ((self.0 >> 4) & 0xF) as u8
    }

    /// Low nibble
    #[inline]
    pub fn n(self) -> u8 {
        (self.0 & 0xF) as u8
    }

    /// Low byte
    #[inline]
    pub fn nn(self) -> u8 {
        self.0 as u8
    }

    /// Low 12 bits, usually an address
    #[inline]
    pub fn nnn(self) -> u16 {
        self.0 & 0xFFF
    }
}

impl From<u16> for Instruction {
    fn from(w: u16) -> Self {
        Self(w)
    }
}

/// Decoded operation
///
/// Field names follow the usual opcode notation: `x` and `y` are register
/// indices, `n` is a nibble, `nn` a byte and `nnn` a 12-bit address.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Op {
    /// `00E0`: clear the screen
    Cls,
    /// `00EE`: return from a subroutine
    Ret,
    /// `1NNN`: jump to `NNN`
    Jump { nnn: u16 },
    /// `2NNN`: call the subroutine at `NNN`
    Call { nnn: u16 },
    /// `3XNN`: skip if `VX == NN`
    SkipEqImm { x: u8, nn: u8 },
    /// `4XNN`: skip if `VX != NN`
    SkipNeImm { x: u8, nn: u8 },
    /// `5XYN`: skip if `VX == VY`; `N` is ignored
    SkipEq { x: u8, y: u8 },
    /// `9XYN`: skip if `VX != VY`; `N` is ignored
    SkipNe { x: u8, y: u8 },
    /// `6XNN`: `VX = NN`
    LoadImm { x: u8, nn: u8 },
    /// `7XNN`: `VX += NN`, without touching `VF`
    AddImm { x: u8, nn: u8 },
    /// `8XY0`: `VX = VY`
    Move { x: u8, y: u8 },
    /// `8XY1`: `VX |= VY`
    Or { x: u8, y: u8 },
    /// `8XY2`: `VX &= VY`
    And { x: u8, y: u8 },
    /// `8XY3`: `VX ^= VY`
    Xor { x: u8, y: u8 },
    /// `8XY4`: `VX += VY`, with carry in `VF`
    Add { x: u8, y: u8 },
    /// `8XY5`: `VX -= VY`, with not-borrow in `VF`
    Sub { x: u8, y: u8 },
    /// `8XY7`: `VX = VY - VX`, with not-borrow in `VF`
    SubN { x: u8, y: u8 },
    /// `8XY6`: shift right, with the shifted-out bit in `VF`
    Shr { x: u8, y: u8 },
    /// `8XYE`: shift left, with the shifted-out bit in `VF`
    Shl { x: u8, y: u8 },
    /// `BNNN`: jump to `NNN + V0`
    JumpV0 { nnn: u16 },
    /// Unassigned `8XYN` words: jump to their low 12 bits plus an offset
    /// register, which depends on the dialect
    JumpOffset { x: u8, nnn: u16 },
    /// `ANNN`: `I = NNN`
    LoadIndex { nnn: u16 },
    /// `CXNN`: `VX = random() & NN`
    Random { x: u8, nn: u8 },
    /// `DXYN`: draw an `N`-row sprite from `I` at `(VX, VY)`
    Draw { x: u8, y: u8, n: u8 },
    /// `EXYE`: skip if key `VX` is pressed (usually written `EX9E`)
    SkipKey { x: u8 },
    /// `EXY1`: skip if key `VX` is not pressed (usually written `EXA1`)
    SkipNoKey { x: u8 },
    /// `FX07`: `VX = delay`
    GetDelay { x: u8 },
    /// `FX0A`: block until a key is pressed, then store it in `VX`
    WaitKey { x: u8 },
    /// `FX15`: `delay = VX`
    SetDelay { x: u8 },
    /// `FX18`: `sound = VX`
    SetSound { x: u8 },
    /// `FX1E`: `I += VX`
    AddIndex { x: u8 },
    /// `FX29`: point `I` at the font glyph for `VX`
    Font { x: u8 },
    /// `FX33`: store the decimal digits of `VX` at `I..I+3`
    Bcd { x: u8 },
    /// `FX55`: store `V0..=VX` at `I`
    Store { x: u8 },
    /// `FX65`: load `V0..=VX` from `I`
    Load { x: u8 },
    /// Anything else, executed as a no-op
    Unknown(u16),
}

impl Op {
    /// Decodes a single instruction
    pub fn decode(i: Instruction) -> Self {
        let (x, y, n, nn, nnn) = (i.x(), i.y(), i.n(), i.nn(), i.nnn());
        match i.family() {
            0x0 => match i.0 {
                0x00E0 => Op::Cls,
                0x00EE => Op::Ret,
                _ => Op::Unknown(i.0),
            },
            0x1 => Op::Jump { nnn },
            0x2 => Op::Call { nnn },
            0x3 => Op::SkipEqImm { x, nn },
            0x4 => Op::SkipNeImm { x, nn },
            0x5 => Op::SkipEq { x, y },
            0x6 => Op::LoadImm { x, nn },
            0x7 => Op::AddImm { x, nn },
            0x8 => match n {
                0x0 => Op::Move { x, y },
                0x1 => Op::Or { x, y },
                0x2 => Op::And { x, y },
                0x3 => Op::Xor { x, y },
                0x4 => Op::Add { x, y },
                0x5 => Op::Sub { x, y },
                0x6 => Op::Shr { x, y },
                0x7 => Op::SubN { x, y },
                0xE => Op::Shl { x, y },
                _ => Op::JumpOffset { x, nnn },
            },
            0x9 => Op::SkipNe { x, y },
            0xA => Op::LoadIndex { nnn },
            0xB => Op::JumpV0 { nnn },
            0xC => Op::Random { x, nn },
            0xD => Op::Draw { x, y, n },
            0xE => match n {
                0xE => Op::SkipKey { x },
                0x1 => Op::SkipNoKey { x },
                _ => Op::Unknown(i.0),
            },
            0xF => match nn {
                0x07 => Op::GetDelay { x },
                0x0A => Op::WaitKey { x },
                0x15 => Op::SetDelay { x },
                0x18 => Op::SetSound { x },
                0x1E => Op::AddIndex { x },
                0x29 => Op::Font { x },
                0x33 => Op::Bcd { x },
                0x55 => Op::Store { x },
                0x65 => Op::Load { x },
                _ => Op::Unknown(i.0),
            },
            _ => Op::Unknown(i.0),
        }
    }

    /// Checks whether this operation writes to the framebuffer
    #[inline]
    pub fn is_draw(&self) -> bool {
        matches!(self, Op::Draw { .. })
    }
}

impl From<u16> for Op {
    fn from(w: u16) -> Self {
        Op::decode(Instruction(w))
    }
}

impl core::fmt::Display for Op {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match *self {
            Op::Cls => write!(f, "CLS"),
            Op::Ret => write!(f, "RET"),
            Op::Jump { nnn } => write!(f, "JP {nnn:#05x}"),
            Op::Call { nnn } => write!(f, "CALL {nnn:#05x}"),
            Op::SkipEqImm { x, nn } => write!(f, "SE V{x:X}, {nn:#04x}"),
            Op::SkipNeImm { x, nn } => write!(f, "SNE V{x:X}, {nn:#04x}"),
            Op::SkipEq { x, y } => write!(f, "SE V{x:X}, V{y:X}"),
            Op::SkipNe { x, y } => write!(f, "SNE V{x:X}, V{y:X}"),
            Op::LoadImm { x, nn } => write!(f, "LD V{x:X}, {nn:#04x}"),
            Op::AddImm { x, nn } => write!(f, "ADD V{x:X}, {nn:#04x}"),
            Op::Move { x, y } => write!(f, "LD V{x:X}, V{y:X}"),
            Op::Or { x, y } => write!(f, "OR V{x:X}, V{y:X}"),
            Op::And { x, y } => write!(f, "AND V{x:X}, V{y:X}"),
            Op::Xor { x, y } => write!(f, "XOR V{x:X}, V{y:X}"),
            Op::Add { x, y } => write!(f, "ADD V{x:X}, V{y:X}"),
            Op::Sub { x, y } => write!(f, "SUB V{x:X}, V{y:X}"),
            Op::SubN { x, y } => write!(f, "SUBN V{x:X}, V{y:X}"),
            Op::Shr { x, y } => write!(f, "SHR V{x:X}, V{y:X}"),
            Op::Shl { x, y } => write!(f, "SHL V{x:X}, V{y:X}"),
            Op::JumpV0 { nnn } => write!(f, "JP V0, {nnn:#05x}"),
            Op::JumpOffset { x, nnn } => {
                write!(f, "JP V0/V{x:X}, {nnn:#05x}")
            }
            Op::LoadIndex { nnn } => write!(f, "LD I, {nnn:#05x}"),
            Op::Random { x, nn } => write!(f, "RND V{x:X}, {nn:#04x}"),
            Op::Draw { x, y, n } => write!(f, "DRW V{x:X}, V{y:X}, {n}"),
            Op::SkipKey { x } => write!(f, "SKP V{x:X}"),
            Op::SkipNoKey { x } => write!(f, "SKNP V{x:X}"),
            Op::GetDelay { x } => write!(f, "LD V{x:X}, DT"),
            Op::WaitKey { x } => write!(f, "LD V{x:X}, K"),
            Op::SetDelay { x } => write!(f, "LD DT, V{x:X}"),
            Op::SetSound { x } => write!(f, "LD ST, V{x:X}"),
            Op::AddIndex { x } => write!(f, "ADD I, V{x:X}"),
            Op::Font { x } => write!(f, "LD F, V{x:X}"),
            Op::Bcd { x } => write!(f, "LD B, V{x:X}"),
            Op::Store { x } => write!(f, "LD [I], V{x:X}"),
            Op::Load { x } => write!(f, "LD V{x:X}, [I]"),
            Op::Unknown(w) => write!(f, "DW {w:#06x}"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn fields() {
        let i = Instruction(0xD12F);
        assert_eq!(i.family(), 0xD);
        assert_eq!(i.x(), 1);
        assert_eq!(i.y(), 2);
        assert_eq!(i.n(), 0xF);
        assert_eq!(i.nn(), 0x2F);
        assert_eq!(i.nnn(), 0x12F);
        assert_eq!(Instruction::from_bytes(0xD1, 0x2F), i);
    }

    #[test]
    fn decode() {
        for (w, op) in [
            (0x00E0, Op::Cls),
            (0x00EE, Op::Ret),
            (0x0123, Op::Unknown(0x0123)),
            (0x1ABC, Op::Jump { nnn: 0xABC }),
            (0x2ABC, Op::Call { nnn: 0xABC }),
            (0x5120, Op::SkipEq { x: 1, y: 2 }),
            (0x5121, Op::SkipEq { x: 1, y: 2 }),
            (0x9120, Op::SkipNe { x: 1, y: 2 }),
            (0x912F, Op::SkipNe { x: 1, y: 2 }),
            (0x812E, Op::Shl { x: 1, y: 2 }),
            (0x8128, Op::JumpOffset { x: 1, nnn: 0x128 }),
            (0x812F, Op::JumpOffset { x: 1, nnn: 0x12F }),
            (0xB234, Op::JumpV0 { nnn: 0x234 }),
            (0xD125, Op::Draw { x: 1, y: 2, n: 5 }),
            (0xE59E, Op::SkipKey { x: 5 }),
            (0xE5A1, Op::SkipNoKey { x: 5 }),
            (0xE50E, Op::SkipKey { x: 5 }),
            (0xE591, Op::SkipNoKey { x: 5 }),
            (0xE5A2, Op::Unknown(0xE5A2)),
            (0xF50A, Op::WaitKey { x: 5 }),
            (0xF565, Op::Load { x: 5 }),
            (0xF5FF, Op::Unknown(0xF5FF)),
        ] {
            assert_eq!(Op::from(w), op, "decoding {w:04x}");
        }
    }

    #[test]
    fn decode_is_total() {
        for w in 0..=u16::MAX {
            let op = Op::from(w);
            if let Op::Unknown(v) = op {
                assert_eq!(v, w);
            }
        }
    }

    #[test]
    fn mnemonics() {
        assert_eq!(Op::from(0xD125).to_string(), "DRW V1, V2, 5");
        assert_eq!(Op::from(0x6A42).to_string(), "LD VA, 0x42");
        assert_eq!(Op::from(0xA123).to_string(), "LD I, 0x123");
        assert_eq!(Op::from(0xF30A).to_string(), "LD V3, K");
        assert_eq!(Op::from(0x0123).to_string(), "DW 0x0123");
        assert_eq!(Op::from(0xB234).to_string(), "JP V0, 0x234");
        assert_eq!(Op::from(0x8238).to_string(), "JP V0/V2, 0x238");
    }
}
