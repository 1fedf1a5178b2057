use chip8::{Chip8, Dialect, Error, WIDTH};
use chip8_host::{Config, Host, Input};

fn rom(words: &[u16]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_be_bytes()).collect()
}

fn boot(config: Config, words: &[u16]) -> (Host, Chip8) {
    let _ = env_logger::builder().is_test(true).try_init();
    let vm = config.boot(&rom(words)).expect("could not load ROM");
    (Host::new(config), vm)
}

/// Clears the screen, then draws the `0` glyph at x = 0 and again at x = 8
const TWO_SPRITES: [u16; 8] = [
    0x00E0, 0x6000, 0x6100, 0xF029, 0xD015, 0x6208, 0xD215, 0x120E,
];

#[test]
fn display_wait_splits_frames() {
    let (mut host, mut vm) = boot(Config::default(), &TWO_SPRITES);

    let out = host.frame(&mut vm, Input::default()).unwrap();
    assert_eq!(out.executed, 6);
    let fb = out.frame.expect("missing redraw");
    assert!(fb.get(0, 0));
    assert!(!fb.get(8, 0));
    assert_eq!(vm.regs().pc, 0x20C);

    let out = host.frame(&mut vm, Input::default()).unwrap();
    assert_eq!(out.executed, 11);
    let fb = out.frame.expect("missing redraw");
    assert!(fb.get(8, 0));

    let out = host.frame(&mut vm, Input::default()).unwrap();
    assert!(out.frame.is_none());
    assert_eq!(host.stats().redraws, 2);
    assert_eq!(host.stats().frames, 3);
}

#[test]
fn without_display_wait() {
    let config = Config {
        display_wait: false,
        ..Config::default()
    };
    let (mut host, mut vm) = boot(config, &TWO_SPRITES);
    let out = host.frame(&mut vm, Input::default()).unwrap();
    assert_eq!(out.executed, 11);
    let fb = out.frame.expect("missing redraw");
    assert!(fb.get(0, 0) && fb.get(8, 0));
    assert!(!fb.get(WIDTH - 1, 0));
}

#[test]
fn stall_until_key() {
    let (mut host, mut vm) = boot(Config::default(), &[0xF30A, 0x6101, 0x1204]);
    for _ in 0..3 {
        let out = host.frame(&mut vm, Input::default()).unwrap();
        assert!(out.stalled);
        assert_eq!(out.executed, 0);
        assert_eq!(vm.regs().pc, 0x200);
    }

    let input = Input {
        pressed: vec![0x7],
        ..Input::default()
    };
    let out = host.frame(&mut vm, input).unwrap();
    assert!(!out.stalled);
    assert_eq!(out.executed, 11);
    assert_eq!(vm.regs().v[3], 0x7);
    assert_eq!(vm.regs().v[1], 0x1);
    assert!(!vm.keys().is_pressed(0x7));
}

#[test]
fn errors_are_sticky() {
    let (mut host, mut vm) = boot(Config::default(), &[0x6001, 0x00EE]);
    let err = Error::StackUnderflow { pc: 0x202 };
    assert_eq!(host.frame(&mut vm, Input::default()).unwrap_err(), err);
    assert_eq!(host.error(), Some(err));

    let pc = vm.regs().pc;
    assert_eq!(host.frame(&mut vm, Input::default()).unwrap_err(), err);
    assert_eq!(vm.regs().pc, pc);
    assert_eq!(host.stats().frames, 0);
}

#[test]
fn beep_follows_sound_timer() {
    let (mut host, mut vm) = boot(Config::default(), &[0x6302, 0xF318, 0x1204]);
    let beeps: Vec<bool> = (0..4)
        .map(|_| host.frame(&mut vm, Input::default()).unwrap().beep)
        .collect();
    assert_eq!(beeps, [true, true, false, false]);
}

#[test]
fn quit_is_reported() {
    let (mut host, mut vm) = boot(Config::default(), &[0x1200]);
    let out = host
        .frame(
            &mut vm,
            Input {
                quit: true,
                ..Input::default()
            },
        )
        .unwrap();
    assert!(out.quit);
}

#[test]
fn seeded_runs_are_deterministic() {
    let program = [0xC0FF, 0xC1FF, 0xC2FF, 0xD015, 0x1200];
    let config = Config {
        dialect: Dialect::Legacy,
        seed: 42,
        ..Config::default()
    };
    let (mut host_a, mut a) = boot(config, &program);
    let (mut host_b, mut b) = boot(config, &program);
    for _ in 0..20 {
        host_a.frame(&mut a, Input::default()).unwrap();
        host_b.frame(&mut b, Input::default()).unwrap();
    }
    assert_eq!(a.regs(), b.regs());
    assert_eq!(a.frame(), b.frame());
}
