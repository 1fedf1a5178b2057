use crate::Error;
use static_assertions::const_assert;

/// Size of the address space, in bytes
pub const RAM_SIZE: usize = 4096;

/// Address at which programs are loaded and execution begins
pub const PROGRAM_ADDR: u16 = 0x200;

/// Address of the first font glyph
pub const FONT_ADDR: u16 = 0x050;

/// Bytes per font glyph
pub const GLYPH_SIZE: usize = 5;

/// Hexadecimal font, one 4×5 glyph per digit `0..=F`
///
/// Each byte is one row; only the high nibble is lit.
pub const FONT: [u8; 16 * GLYPH_SIZE] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

const ADDR_MASK: u16 = (RAM_SIZE - 1) as u16;

const_assert!(RAM_SIZE.is_power_of_two());
const_assert!(FONT_ADDR as usize + FONT.len() <= PROGRAM_ADDR as usize);

/// 4 KiB of byte-addressed memory
///
/// Addresses are reduced modulo the memory size, so reads never fail.  The
/// interpreter area below [`PROGRAM_ADDR`] (which holds the font) is
/// read-only to programs.
#[derive(Clone)]
pub struct Memory([u8; RAM_SIZE]);

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    /// Builds a zeroed memory image with the font installed
    pub fn new() -> Self {
        let mut ram = [0u8; RAM_SIZE];
        let font = usize::from(FONT_ADDR);
        ram[font..font + FONT.len()].copy_from_slice(&FONT);
        Self(ram)
    }

    /// Copies a program image to [`PROGRAM_ADDR`]
    ///
    /// Memory past the end of the image is zeroed.
    pub fn load(&mut self, rom: &[u8]) -> Result<(), Error> {
        let start = usize::from(PROGRAM_ADDR);
        if rom.len() > RAM_SIZE - start {
            return Err(Error::RomTooLarge { len: rom.len() });
        }
        let (image, rest) = self.0[start..].split_at_mut(rom.len());
        image.copy_from_slice(rom);
        rest.fill(0);
        Ok(())
    }

    /// Reads a single byte
    #[inline]
    pub fn read_byte(&self, addr: u16) -> u8 {
        self.0[usize::from(addr & ADDR_MASK)]
    }

    /// Reads a big-endian word
    ///
    /// The second byte wraps to address 0 if `addr` is the last byte.
    #[inline]
    pub fn read_word(&self, addr: u16) -> u16 {
        let hi = self.read_byte(addr);
        let lo = self.read_byte(addr.wrapping_add(1));
        u16::from_be_bytes([hi, lo])
    }

    /// Writes a single byte, refusing writes below [`PROGRAM_ADDR`]
    #[inline]
    pub fn write_byte(&mut self, addr: u16, value: u8) -> Result<(), Error> {
        let addr = addr & ADDR_MASK;
        if addr < PROGRAM_ADDR {
            return Err(Error::ReservedWrite { addr });
        }
        self.0[usize::from(addr)] = value;
        Ok(())
    }

    /// Checks that `len` bytes starting at `addr` could all be written
    ///
    /// Returns the first reserved address in the (wrapping) range.
    pub fn check_writable(&self, addr: u16, len: u16) -> Result<(), Error> {
        match (0..len)
            .map(|k| addr.wrapping_add(k) & ADDR_MASK)
            .find(|a| *a < PROGRAM_ADDR)
        {
            Some(addr) => Err(Error::ReservedWrite { addr }),
            None => Ok(()),
        }
    }

    /// Borrows the whole address space
    #[inline]
    pub fn as_bytes(&self) -> &[u8; RAM_SIZE] {
        &self.0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn font_installed() {
        let m = Memory::new();
        for (i, b) in FONT.iter().enumerate() {
            assert_eq!(m.read_byte(FONT_ADDR + i as u16), *b);
        }
        assert_eq!(m.read_byte(PROGRAM_ADDR), 0);
    }

    #[test]
    fn load_limits() {
        let mut m = Memory::new();
        let max = RAM_SIZE - usize::from(PROGRAM_ADDR);
        assert!(m.load(&vec![0xAB; max]).is_ok());
        assert_eq!(m.read_byte(0xFFF), 0xAB);
        assert_eq!(
            m.load(&vec![0; max + 1]),
            Err(Error::RomTooLarge { len: max + 1 })
        );

        // Reloading a shorter image clears the tail
        m.load(&[1, 2]).unwrap();
        assert_eq!(m.read_word(PROGRAM_ADDR), 0x0102);
        assert_eq!(m.read_byte(0xFFF), 0);
    }

    #[test]
    fn addresses_wrap() {
        let mut m = Memory::new();
        m.write_byte(0xFFF, 0x12).unwrap();
        assert_eq!(m.read_byte(0x1FFF), 0x12);
        assert_eq!(m.read_word(0xFFF), 0x1200);
        assert_eq!(
            m.write_byte(0x1000, 0),
            Err(Error::ReservedWrite { addr: 0 })
        );
        m.write_byte(0x1200, 7).unwrap();
        assert_eq!(m.read_byte(0x200), 7);
    }

    #[test]
    fn writable_ranges() {
        let m = Memory::new();
        assert_eq!(m.check_writable(0x200, 16), Ok(()));
        assert_eq!(m.check_writable(0xFF0, 16), Ok(()));
        assert_eq!(
            m.check_writable(0xFFE, 4),
            Err(Error::ReservedWrite { addr: 0 })
        );
        assert_eq!(
            m.check_writable(0x1F0, 3),
            Err(Error::ReservedWrite { addr: 0x1F0 })
        );
        assert_eq!(m.check_writable(0x1F0, 0), Ok(()));
    }
}
