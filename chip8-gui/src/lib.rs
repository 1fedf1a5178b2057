use std::time::Instant;

use chip8::{Chip8, FrameBuffer, HEIGHT, WIDTH};
use host::{key_for_char, FrameClock, Host, Input};

use eframe::egui;
use log::{debug, info};

const FOREGROUND: egui::Color32 = egui::Color32::from_rgb(0xE8, 0xE8, 0xE8);
const BACKGROUND: egui::Color32 = egui::Color32::from_rgb(0x10, 0x10, 0x10);

pub struct Stage {
    vm: Chip8,
    host: Host,
    clock: FrameClock,

    /// Key events collected since the last frame
    pending: Input,

    /// Set once the VM has failed; the last screen stays up
    halted: bool,
    beeping: bool,

    texture: egui::TextureHandle,
}

impl Stage {
    pub fn new(vm: Chip8, host: Host, ctx: &egui::Context) -> Stage {
        let image = egui::ColorImage::new([WIDTH, HEIGHT], BACKGROUND);
        let texture =
            ctx.load_texture("frame", image, egui::TextureOptions::NEAREST);
        let clock = FrameClock::new(host.config().frame_interval);
        Stage {
            vm,
            host,
            clock,
            pending: Input::default(),
            halted: false,
            beeping: false,
            texture,
        }
    }

    fn collect_input(&mut self, ctx: &egui::Context) {
        ctx.input(|i| {
            for e in i.events.iter() {
                let egui::Event::Key {
                    key,
                    pressed,
                    repeat: false,
                    ..
                } = e
                else {
                    continue;
                };
                if *key == egui::Key::Escape {
                    self.pending.quit = true;
                } else if let Some(k) = decode_key(*key) {
                    if *pressed {
                        self.pending.pressed.push(k);
                    } else {
                        self.pending.released.push(k);
                    }
                }
            }
            if i.viewport().close_requested() {
                self.pending.quit = true;
            }
        });
    }
}

/// Copies the framebuffer into the window texture
fn upload(texture: &mut egui::TextureHandle, fb: &FrameBuffer) {
    let mut image = egui::ColorImage::new([WIDTH, HEIGHT], BACKGROUND);
    for (o, p) in image.pixels.iter_mut().zip(fb.pixels()) {
        if *p {
            *o = FOREGROUND;
        }
    }
    texture.set(image, egui::TextureOptions::NEAREST);
}

impl eframe::App for Stage {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.collect_input(ctx);

        if !self.halted && self.clock.due(Instant::now()) {
            let input = std::mem::take(&mut self.pending);
            match self.host.frame(&mut self.vm, input) {
                Ok(out) => {
                    if out.beep != self.beeping {
                        debug!("beep {}", if out.beep { "on" } else { "off" });
                        self.beeping = out.beep;
                    }
                    if let Some(fb) = out.frame {
                        upload(&mut self.texture, fb);
                    }
                    if out.quit {
                        info!("quit requested");
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                }
                // Already logged by the host
                Err(_) => self.halted = true,
            }
        } else if self.halted && self.pending.quit {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
        if !self.halted {
            ctx.request_repaint_after(self.clock.remaining(Instant::now()));
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                let mut mesh = egui::Mesh::with_texture(self.texture.id());
                mesh.add_rect_with_uv(
                    ui.max_rect(),
                    egui::Rect {
                        min: egui::Pos2::new(0.0, 0.0),
                        max: egui::Pos2::new(1.0, 1.0),
                    },
                    egui::Color32::WHITE,
                );
                ui.painter().add(egui::Shape::mesh(mesh));
            });
    }
}

/// Maps the QWERTY block used for the hex keypad
fn decode_key(k: egui::Key) -> Option<u8> {
    let c = match k {
        egui::Key::Num1 => '1',
        egui::Key::Num2 => '2',
        egui::Key::Num3 => '3',
        egui::Key::Num4 => '4',
        egui::Key::Q => 'q',
        egui::Key::W => 'w',
        egui::Key::E => 'e',
        egui::Key::R => 'r',
        egui::Key::A => 'a',
        egui::Key::S => 's',
        egui::Key::D => 'd',
        egui::Key::F => 'f',
        egui::Key::Z => 'z',
        egui::Key::X => 'x',
        egui::Key::C => 'c',
        egui::Key::V => 'v',
        _ => return None,
    };
    key_for_char(c)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn keypad_block() {
        assert_eq!(decode_key(egui::Key::Num4), Some(0xC));
        assert_eq!(decode_key(egui::Key::X), Some(0x0));
        assert_eq!(decode_key(egui::Key::V), Some(0xF));
        assert_eq!(decode_key(egui::Key::Num5), None);
    }
}
