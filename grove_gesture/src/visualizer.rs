//! Software-rendered visualizer using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                                                              │
//! │        particle field (perspective splats, additive)         │
//! │                                                              │
//! ├──────────────────────────────────────────────────────────────┤
//! │ STATE / RAIN / STORM / GESTURE / HANDS / THEME / AUDIO       │
//! │ status message                                               │
//! │ key legend                                                   │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use std::sync::mpsc::Sender;

use glam::Vec3;
use grove_blend::{CameraRig, GestureLabel, GestureState};
use grove_field::RenderParticle;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use crate::app::UiSnapshot;
use crate::config::WindowConfig;
use crate::error::{Error, Result};
use crate::inference::{SimInput, SimPointer};

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const HUD_H:   usize = 46;
const BG_COLOR:    u32   = 0xFF05060A;
const HUD_BG:      u32   = 0xFF0F1626;
const TEXT_COLOR:  u32   = 0xFFEEEEEE;
const DIM_TEXT:    u32   = 0xFF888888;
const ALERT_COLOR: u32   = 0xFFFFB347;
/// Energy one full-opacity particle deposits.
const INTENSITY:   f32   = 0.35;
/// Point sizes are tuned for a 720-pixel-high view.
const REFERENCE_H: f32   = 720.0;
/// Radians of orbit per pixel of right-drag.
const ORBIT_SPEED: f32   = 0.005;

/// Held-key → simulated gesture, in key order 1..5.
const GESTURE_KEYS: [(Key, GestureLabel); 5] = [
    (Key::Key1, GestureLabel::ClosedFist),
    (Key::Key2, GestureLabel::OpenPalm),
    (Key::Key3, GestureLabel::Victory),
    (Key::Key4, GestureLabel::ThumbUp),
    (Key::Key5, GestureLabel::PointingUp),
];

// ════════════════════════════════════════════════════════════════════════════
// Input
// ════════════════════════════════════════════════════════════════════════════

/// Commands from the keyboard "control panel".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UiCommand {
    CycleTheme,
    ToggleAudio,
    NextPadVoice,
    SetState(GestureState),
    LatchRain,
    LatchStorm,
    Reset,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameInput {
    pub quit:     bool,
    pub commands: Vec<UiCommand>,
    /// Drag-orbit delta (azimuth, polar) in radians.
    pub orbit:    Option<(f32, f32)>,
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window:     Window,
    width:      usize,
    height:     usize,
    buf:        Vec<u32>,
    accum:      Vec<Vec3>,
    sim_tx:     Sender<SimInput>,
    last_sim:   SimInput,
    drag_from:  Option<(f32, f32)>,
}

impl Visualizer {
    pub fn new(cfg: &WindowConfig, sim_tx: Sender<SimInput>) -> Result<Self> {
        let width  = cfg.width.max(320);
        let height = cfg.height.max(240);
        let mut window = Window::new(
            "Grove: gesture particle field",
            width, height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).map_err(|e| Error::Window(e.to_string()))?;

        window.limit_update_rate(Some(std::time::Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            width,
            height,
            buf:       vec![BG_COLOR; width * height],
            accum:     vec![Vec3::ZERO; width * height],
            sim_tx,
            last_sim:  SimInput::default(),
            drag_from: None,
        })
    }

    pub fn is_open(&self) -> bool { self.window.is_open() }

    pub fn aspect(&self) -> f32 { self.width as f32 / self.height as f32 }

    /// Poll keyboard and mouse. Forwards hand/gesture simulation to the
    /// inference thread and returns everything else to the caller.
    pub fn poll_input(&mut self) -> FrameInput {
        let mut input = FrameInput::default();
        if !self.window.is_open() {
            input.quit = true;
            return input;
        }

        let one_shot = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);

        input.quit = one_shot(Key::Q) || one_shot(Key::Escape);
        let bindings = [
            (Key::C, UiCommand::CycleTheme),
            (Key::M, UiCommand::ToggleAudio),
            (Key::V, UiCommand::NextPadVoice),
            (Key::T, UiCommand::SetState(GestureState::Trees)),
            (Key::P, UiCommand::SetState(GestureState::Spread)),
            (Key::R, UiCommand::LatchRain),
            (Key::W, UiCommand::LatchStorm),
            (Key::X, UiCommand::Reset),
        ];
        input.commands = bindings
            .iter()
            .filter(|(k, _)| one_shot(*k))
            .map(|(_, c)| *c)
            .collect();

        let shift = self.window.is_key_down(Key::LeftShift)
                 || self.window.is_key_down(Key::RightShift);
        let mouse = self.window.get_mouse_pos(MouseMode::Discard);

        // ── simulated hands + gesture ─────────────────────────────────────
        let gesture = GESTURE_KEYS
            .iter()
            .find(|(k, _)| self.window.is_key_down(*k))
            .map(|(_, g)| *g);
        let pointer = match mouse {
            Some((mx, my)) if self.window.get_mouse_down(MouseButton::Left) => Some(SimPointer {
                // camera images are mirrored
                x: 1.0 - mx / self.width as f32,
                y: my / self.height as f32,
                mirrored: shift,
            }),
            _ => None,
        };
        let sim = SimInput { gesture, pointer };
        if sim != self.last_sim {
            self.last_sim = sim;
            let _ = self.sim_tx.send(sim);
        }

        // ── right-drag orbit ──────────────────────────────────────────────
        if self.window.get_mouse_down(MouseButton::Right) {
            if let (Some((x0, y0)), Some((x1, y1))) = (self.drag_from, mouse) {
                input.orbit = Some((-(x1 - x0) * ORBIT_SPEED, -(y1 - y0) * ORBIT_SPEED));
            }
            self.drag_from = mouse;
        } else {
            self.drag_from = None;
        }

        input
    }

    /// Render one frame.
    pub fn render(&mut self, particles: &[RenderParticle], camera: &CameraRig, ui: &UiSnapshot) {
        self.splat(particles, camera);
        self.draw_hud(ui);
        if let Err(e) = self.window.update_with_buffer(&self.buf, self.width, self.height) {
            log::warn!("window update failed: {}", e);
        }
    }

    // ── Particles ─────────────────────────────────────────────────────────

    fn splat(&mut self, particles: &[RenderParticle], camera: &CameraRig) {
        let (w, h) = (self.width, self.height);
        let view_h = h.saturating_sub(HUD_H).max(1);
        let vp = camera.view_projection(w as f32 / view_h as f32);
        let px_scale = view_h as f32 / REFERENCE_H;

        self.accum.fill(Vec3::ZERO);
        for p in particles {
            if p.opacity <= 0.0 {
                continue;
            }
            let clip = vp * p.position.extend(1.0);
            if clip.w <= 0.1 {
                continue;
            }
            let ndc = clip.truncate() / clip.w;
            if ndc.x.abs() > 1.0 || ndc.y.abs() > 1.0 || ndc.z > 1.0 {
                continue;
            }
            let sx = ((ndc.x * 0.5 + 0.5) * w as f32) as isize;
            let sy = ((0.5 - ndc.y * 0.5) * view_h as f32) as isize;

            let radius = p.size * px_scale * 0.5;
            let energy = p.color * p.opacity * INTENSITY;
            let r = radius.round().clamp(0.0, 3.0) as isize;
            if r == 0 {
                self.deposit(sx, sy, view_h, energy * (radius * 2.0).clamp(0.3, 1.0));
            } else {
                let share = energy / (1 + r) as f32;
                for dy in -r..=r {
                    for dx in -r..=r {
                        self.deposit(sx + dx, sy + dy, view_h, share);
                    }
                }
            }
        }

        let bg = unpack(BG_COLOR);
        for (px, e) in self.buf.iter_mut().zip(&self.accum) {
            // soft saturation keeps dense crowns from clipping flat
            let c = bg + (Vec3::ONE - (-*e).exp());
            *px = pack(c);
        }
    }

    fn deposit(&mut self, x: isize, y: isize, view_h: usize, energy: Vec3) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= view_h {
            return;
        }
        self.accum[y as usize * self.width + x as usize] += energy;
    }

    // ── HUD ───────────────────────────────────────────────────────────────

    fn draw_hud(&mut self, ui: &UiSnapshot) {
        let (w, h) = (self.width, self.height);
        let top = h.saturating_sub(HUD_H);
        self.fill_rect(0, top, w, HUD_H, HUD_BG);

        let on = |b: bool| if b { "ON" } else { "OFF" };
        let line = format!(
            "STATE {}  RAIN {}  STORM {}  GESTURE {}  HANDS {}  THEME {}  AUDIO {}",
            ui.state.name(),
            on(ui.raining),
            on(ui.stormy),
            ui.last_label.as_str(),
            ui.hands_active,
            ui.theme.name(),
            on(ui.audio_playing),
        );
        self.draw_label(&line, 10, top + 6, TEXT_COLOR);

        let status_color = if ui.alert { ALERT_COLOR } else { TEXT_COLOR };
        self.draw_label(&ui.status, 10, top + 18, status_color);

        self.draw_label(
            "1-5=gesture  lmb=hand  shift+lmb=two hands  rmb drag=orbit  t/p/r/w/x=panel  c=theme  m=audio  v=voice  q=quit",
            10, top + 32, DIM_TEXT,
        );
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(self.height) {
            for col in x..(x + w).min(self.width) {
                self.buf[row * self.width + col] = color;
            }
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < self.width && y < self.height {
            self.buf[y * self.width + x] = color;
        }
    }

    /// 3×5 bitmap font, one pixel per bit.
    fn draw_label(&mut self, text: &str, x: usize, y: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.set_pixel(cx + col, y + row, color);
                    }
                }
            }
            cx += 4; // 3 wide + 1 gap
            if cx + 4 > self.width { break; }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Color packing
// ────────────────────────────────────────────────────────────────────────────

fn unpack(c: u32) -> Vec3 {
    Vec3::new(
        ((c >> 16) & 0xFF) as f32 / 255.0,
        ((c >>  8) & 0xFF) as f32 / 255.0,
        ( c        & 0xFF) as f32 / 255.0,
    )
}

fn pack(c: Vec3) -> u32 {
    let c = (c.clamp(Vec3::ZERO, Vec3::ONE) * 255.0).round();
    0xFF000000 | ((c.x as u32) << 16) | ((c.y as u32) << 8) | c.z as u32
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '_' => [0b000, 0b000, 0b000, 0b000, 0b111],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        '(' => [0b010, 0b100, 0b100, 0b100, 0b010],
        ')' => [0b010, 0b001, 0b001, 0b001, 0b010],
        '\'' => [0b010, 0b010, 0b000, 0b000, 0b000],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}
