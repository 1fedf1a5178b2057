use chip8::{Instruction, Op, PROGRAM_ADDR};
use std::fmt::Write;

/// Renders a ROM image as one `addr: word  mnemonic` line per instruction
///
/// A trailing odd byte is shown padded with zero.
pub fn disassemble(rom: &[u8]) -> String {
    let mut out = String::new();
    for (i, pair) in rom.chunks(2).enumerate() {
        let addr = usize::from(PROGRAM_ADDR) + i * 2;
        let lo = pair.get(1).copied().unwrap_or(0);
        let word = Instruction::from_bytes(pair[0], lo);
        let op = Op::decode(word);
        // Writing to a String cannot fail
        let _ = writeln!(out, "{addr:03x}: {:04x}  {op}", word.0);
    }
    out
}
