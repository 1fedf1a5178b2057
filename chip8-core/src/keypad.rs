/// Number of keys on the hexadecimal keypad
pub const KEY_COUNT: usize = 16;

/// Latched state of the 16-key keypad
///
/// Keys stay pressed until the host releases them or `FX0A` consumes them.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Keypad(u16);

impl Keypad {
    /// Marks a key as pressed; values above `0xF` are ignored
    #[inline]
    pub fn press(&mut self, key: u8) {
        if usize::from(key) < KEY_COUNT {
            self.0 |= 1 << key;
        }
    }

    /// Marks a key as released
    #[inline]
    pub fn release(&mut self, key: u8) {
        if usize::from(key) < KEY_COUNT {
            self.0 &= !(1 << key);
        }
    }

    /// Checks a key; values above `0xF` are never pressed
    #[inline]
    pub fn is_pressed(&self, key: u8) -> bool {
        usize::from(key) < KEY_COUNT && self.0 & (1 << key) != 0
    }

    /// Returns the lowest-numbered pressed key, if any
    #[inline]
    pub fn first_pressed(&self) -> Option<u8> {
        (self.0 != 0).then(|| self.0.trailing_zeros() as u8)
    }

    /// Consumes a press, returning whether the key was down
    pub fn take(&mut self, key: u8) -> bool {
        let down = self.is_pressed(key);
        self.release(key);
        down
    }

    /// Returns and releases the lowest-numbered pressed key
    pub fn take_first(&mut self) -> Option<u8> {
        let k = self.first_pressed()?;
        self.take(k);
        Some(k)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn latch() {
        let mut k = Keypad::default();
        assert_eq!(k.first_pressed(), None);
        k.press(0xF);
        k.press(0x3);
        k.press(0x10);
        assert!(k.is_pressed(0x3));
        assert!(!k.is_pressed(0x10));
        assert_eq!(k.take_first(), Some(0x3));
        assert_eq!(k.take_first(), Some(0xF));
        assert_eq!(k.take_first(), None);
        assert_eq!(k.first_pressed(), None);

        k.press(1);
        k.press(2);
        assert!(k.take(1));
        assert!(!k.take(1));
        assert_eq!(k.first_pressed(), Some(2));
        k.release(2);
        assert_eq!(k.first_pressed(), None);
    }
}
