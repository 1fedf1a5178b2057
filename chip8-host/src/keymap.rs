/// Conventional QWERTY layout for the hexadecimal keypad
///
/// ```text
///   keyboard         keypad
///   1 2 3 4          1 2 3 C
///   q w e r    →     4 5 6 D
///   a s d f          7 8 9 E
///   z x c v          A 0 B F
/// ```
pub const KEYMAP: [(char, u8); 16] = [
    ('1', 0x1),
    ('2', 0x2),
    ('3', 0x3),
    ('4', 0xC),
    ('q', 0x4),
    ('w', 0x5),
    ('e', 0x6),
    ('r', 0xD),
    ('a', 0x7),
    ('s', 0x8),
    ('d', 0x9),
    ('f', 0xE),
    ('z', 0xA),
    ('x', 0x0),
    ('c', 0xB),
    ('v', 0xF),
];

/// Looks up the keypad key for a keyboard character (case-insensitive)
pub fn key_for_char(c: char) -> Option<u8> {
    let c = c.to_ascii_lowercase();
    KEYMAP.iter().find(|(k, _)| *k == c).map(|(_, v)| *v)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn every_key_mapped_once() {
        let mut seen = [false; 16];
        for (_, k) in KEYMAP {
            assert!(!seen[usize::from(k)], "key {k:x} mapped twice");
            seen[usize::from(k)] = true;
        }
    }

    #[test]
    fn lookup() {
        assert_eq!(key_for_char('x'), Some(0x0));
        assert_eq!(key_for_char('V'), Some(0xF));
        assert_eq!(key_for_char('4'), Some(0xC));
        assert_eq!(key_for_char('5'), None);
        assert_eq!(key_for_char('\x1b'), None);
    }
}
