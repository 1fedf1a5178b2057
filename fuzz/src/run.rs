#![no_main]

use chip8::{Chip8, Dialect, Step, FONT, FONT_ADDR, STACK_DEPTH};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // The first two bytes are a held-key mask; the rest is the ROM
    let Some((keys, rom)) = data.split_first_chunk::<2>() else {
        return;
    };
    let keys = u16::from_le_bytes(*keys);

    for dialect in [Dialect::Legacy, Dialect::Modern] {
        let mut vm = Chip8::new(dialect, 0);
        if vm.load_rom(rom).is_err() {
            return;
        }
        for i in 0..4096 {
            if i % 11 == 0 {
                vm.tick_timers();
                for k in 0..16 {
                    if keys & (1 << k) != 0 {
                        vm.keys_mut().press(k);
                    }
                }
            }
            let expected = vm.peek();
            match vm.step() {
                Ok(Step::Executed(op)) => assert_eq!(op, expected),
                Ok(Step::AwaitingKey { .. }) => {
                    if keys == 0 {
                        break;
                    }
                }
                Err(_) => break,
            }
            assert!(vm.stack().len() <= STACK_DEPTH);
        }

        let font = usize::from(FONT_ADDR);
        assert_eq!(&vm.mem().as_bytes()[font..font + FONT.len()], &FONT);
    }
});
