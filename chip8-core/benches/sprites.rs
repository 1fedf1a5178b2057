use chip8_core::{Chip8, Dialect};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

/// Draws every font glyph across the screen, then jumps back to the start
///
/// ```text
/// 0x200: 6000 6100 6200     V0 = digit, V1 = x, V2 = y
/// 0x206: f029 d125          I = glyph(V0), draw at (V1, V2)
/// 0x20a: 7001 7105 7201     next digit, step x and y
/// 0x210: 300f 1206          loop until V0 == 15
/// 0x214: 00e0 1200          clear, restart
/// ```
const PROGRAM: [u16; 12] = [
    0x6000, 0x6100, 0x6200, 0xF029, 0xD125, 0x7001, 0x7105, 0x7201, 0x300F,
    0x1206, 0x00E0, 0x1200,
];

fn sprites(c: &mut Criterion) {
    let rom: Vec<u8> = PROGRAM.iter().flat_map(|w| w.to_be_bytes()).collect();
    c.bench_function("sprites", |b| {
        b.iter(|| {
            let mut vm = Chip8::new(Dialect::Modern, 0);
            vm.load_rom(&rom).unwrap();
            for _ in 0..10_000 {
                vm.step().unwrap();
            }
            black_box(vm.frame().pixels().iter().filter(|p| **p).count())
        })
    });
}

criterion_group!(benches, sprites);
criterion_main!(benches);
