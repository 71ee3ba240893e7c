//! Effekt-Renderer
//!
//! `FxEngine` implementiert [`EffectEngine`] für einen Strip mit `N` LEDs.
//! Jeder Frame ist eine reine Funktion aus (Modus, Farbe, Speed, vergangene
//! Zeit seit Modus-Start); Zufall kommt aus einem Hash der Zeit, damit
//! Frames in Tests reproduzierbar sind.
//!
//! Die 56 Modus-Ordinals folgen der üblichen WS2812FX Reihenfolge und werden
//! auf eine kleinere Menge von Effekt-Kernels abgebildet.

use rgb::RGB8;

use crate::logic::{color_wheel, scale_color, unpack_color};
use crate::sequence::FULL_RANGE_SIZE;
use crate::settings::{DEFAULT_BRIGHTNESS, DEFAULT_COLOR, DEFAULT_MODE, DEFAULT_SPEED};
use crate::traits::{EffectEngine, LedError, SmartLedWriter};

/// Minimaler Abstand zwischen zwei geschriebenen Frames
pub const FRAME_INTERVAL_MS: u32 = 20;

const BLACK: RGB8 = RGB8 { r: 0, g: 0, b: 0 };
const WHITE: RGB8 = RGB8 {
    r: 255,
    g: 255,
    b: 255,
};

/// Feste Farben für zweifarbige Lauflichter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    Color,
    White,
    Black,
    Red,
    Green,
    Blue,
    Orange,
    Purple,
}

impl Tone {
    const fn resolve(self, color: RGB8) -> RGB8 {
        match self {
            Tone::Color => color,
            Tone::White => WHITE,
            Tone::Black => BLACK,
            Tone::Red => RGB8 { r: 255, g: 0, b: 0 },
            Tone::Green => RGB8 { r: 0, g: 255, b: 0 },
            Tone::Blue => RGB8 { r: 0, g: 0, b: 255 },
            Tone::Orange => RGB8 { r: 255, g: 64, b: 0 },
            Tone::Purple => RGB8 { r: 64, g: 0, b: 128 },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kernel {
    Static,
    Blink { rainbow: bool },
    Strobe { rainbow: bool },
    Breath,
    Fade,
    Wipe { reverse: bool, invert: bool, random: bool },
    RandomColor,
    Dynamic { single: bool },
    Rainbow,
    RainbowCycle,
    Scan { dual: bool },
    Larson,
    Comet,
    TheaterChase { rainbow: bool },
    RunningLights,
    Running { front: Tone, back: Tone },
    Twinkle { random: bool },
    Sparkle { flash: bool },
    Fire { intensity: u8 },
}

const fn wipe(reverse: bool, invert: bool, random: bool) -> Kernel {
    Kernel::Wipe {
        reverse,
        invert,
        random,
    }
}

const fn running(front: Tone, back: Tone) -> Kernel {
    Kernel::Running { front, back }
}

/// Modus-Ordinal → Kernel
const MODE_TABLE: [Kernel; FULL_RANGE_SIZE] = [
    Kernel::Static,                            // 0 static
    Kernel::Blink { rainbow: false },          // 1 blink
    Kernel::Breath,                            // 2 breath
    wipe(false, false, false),                 // 3 color wipe
    wipe(false, true, false),                  // 4 color wipe inverse
    wipe(true, false, false),                  // 5 color wipe reverse
    wipe(true, true, false),                   // 6 color wipe reverse inverse
    wipe(false, false, true),                  // 7 color wipe random
    Kernel::RandomColor,                       // 8 random color
    Kernel::Dynamic { single: true },          // 9 single dynamic
    Kernel::Dynamic { single: false },         // 10 multi dynamic
    Kernel::Rainbow,                           // 11 rainbow
    Kernel::RainbowCycle,                      // 12 rainbow cycle
    Kernel::Scan { dual: false },              // 13 scan
    Kernel::Scan { dual: true },               // 14 dual scan
    Kernel::Fade,                              // 15 fade
    Kernel::TheaterChase { rainbow: false },   // 16 theater chase
    Kernel::TheaterChase { rainbow: true },    // 17 theater chase rainbow
    Kernel::RunningLights,                     // 18 running lights
    Kernel::Twinkle { random: false },         // 19 twinkle
    Kernel::Twinkle { random: true },          // 20 twinkle random
    Kernel::Twinkle { random: false },         // 21 twinkle fade
    Kernel::Twinkle { random: true },          // 22 twinkle fade random
    Kernel::Sparkle { flash: false },          // 23 sparkle
    Kernel::Sparkle { flash: true },           // 24 flash sparkle
    Kernel::Sparkle { flash: true },           // 25 hyper sparkle
    Kernel::Strobe { rainbow: false },         // 26 strobe
    Kernel::Strobe { rainbow: true },          // 27 strobe rainbow
    Kernel::Strobe { rainbow: false },         // 28 multi strobe
    Kernel::Blink { rainbow: true },           // 29 blink rainbow
    running(Tone::White, Tone::Color),         // 30 chase white
    running(Tone::Color, Tone::White),         // 31 chase color
    Kernel::Comet,                             // 32 chase random
    Kernel::TheaterChase { rainbow: true },    // 33 chase rainbow
    Kernel::Sparkle { flash: true },           // 34 chase flash
    Kernel::Sparkle { flash: true },           // 35 chase flash random
    Kernel::RainbowCycle,                      // 36 chase rainbow white
    running(Tone::Color, Tone::Black),         // 37 chase blackout
    Kernel::TheaterChase { rainbow: true },    // 38 chase blackout rainbow
    wipe(false, false, true),                  // 39 color sweep random
    running(Tone::Color, Tone::White),         // 40 running color
    running(Tone::Red, Tone::Blue),            // 41 running red blue
    Kernel::Dynamic { single: false },         // 42 running random
    Kernel::Larson,                            // 43 larson scanner
    Kernel::Comet,                             // 44 comet
    Kernel::Twinkle { random: false },         // 45 fireworks
    Kernel::Twinkle { random: true },          // 46 fireworks random
    running(Tone::Red, Tone::Green),           // 47 merry christmas
    Kernel::Fire { intensity: 96 },            // 48 fire flicker
    Kernel::Fire { intensity: 48 },            // 49 fire flicker soft
    Kernel::Fire { intensity: 160 },           // 50 fire flicker intense
    running(Tone::Red, Tone::White),           // 51 circus combustion
    running(Tone::Orange, Tone::Purple),       // 52 halloween
    running(Tone::Color, Tone::Blue),          // 53 bicolor chase
    Kernel::TheaterChase { rainbow: false },   // 54 tricolor chase
    Kernel::Larson,                            // 55 icu
];

fn kernel_for(mode: u8) -> Kernel {
    let index = (mode as usize).min(FULL_RANGE_SIZE - 1);
    MODE_TABLE[index]
}

/// Deterministischer Hash für "zufällige" Pixel
const fn hash(a: u32, b: u32) -> u32 {
    let mut x = a.wrapping_mul(0x9E37_79B9) ^ b.wrapping_mul(0x85EB_CA6B);
    x ^= x >> 16;
    x = x.wrapping_mul(0x7FEB_352D);
    x ^= x >> 15;
    x = x.wrapping_mul(0x846C_A68B);
    x ^ (x >> 16)
}

/// Dreieckswelle 0 → 255 → 0 über einen Zyklus
fn triangle(phase: u32, cycle: u32) -> u8 {
    let half = (cycle / 2).max(1);
    let level = if phase < half {
        phase * 255 / half
    } else {
        (cycle - phase.min(cycle)) * 255 / half
    };
    level.min(255) as u8
}

/// Rendert Effekte auf einen LED-Strip mit `N` Pixeln
pub struct FxEngine<W: SmartLedWriter, const N: usize> {
    writer: W,
    frame: [RGB8; N],
    mode: u8,
    brightness: u8,
    speed: u16,
    color: RGB8,
    running: bool,
    dirty: bool,
    mode_started_ms: Option<u32>,
    last_frame_ms: Option<u32>,
}

impl<W: SmartLedWriter, const N: usize> FxEngine<W, N> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            frame: [BLACK; N],
            mode: DEFAULT_MODE,
            brightness: DEFAULT_BRIGHTNESS,
            speed: DEFAULT_SPEED,
            color: unpack_color(DEFAULT_COLOR),
            running: false,
            dirty: true,
            mode_started_ms: None,
            last_frame_ms: None,
        }
    }

    pub fn mode(&self) -> u8 {
        self.mode
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    pub fn speed(&self) -> u16 {
        self.speed
    }

    pub fn color(&self) -> RGB8 {
        self.color
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Zuletzt gerenderter Frame (vor der Helligkeits-Skalierung)
    pub fn frame(&self) -> &[RGB8; N] {
        &self.frame
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    fn render(&mut self, elapsed: u32) {
        let cycle = (self.speed as u32).max(1);
        let phase = elapsed % cycle;
        let step = elapsed / cycle;
        let color = self.color;
        let n = N as u32;
        let pixels = &mut self.frame;

        match kernel_for(self.mode) {
            Kernel::Static => pixels.fill(color),
            Kernel::Blink { rainbow } => {
                let on = if rainbow {
                    color_wheel(step.wrapping_mul(32) as u8)
                } else {
                    color
                };
                pixels.fill(if phase < cycle / 2 { on } else { BLACK });
            }
            Kernel::Strobe { rainbow } => {
                let on = if rainbow {
                    color_wheel(step.wrapping_mul(32) as u8)
                } else {
                    color
                };
                let flash = (cycle / 10).max(FRAME_INTERVAL_MS);
                pixels.fill(if phase < flash { on } else { BLACK });
            }
            Kernel::Breath => {
                let level = triangle(phase, cycle) as u32;
                // Quadratisch wirkt für das Auge gleichmässiger
                let eased = (level * level / 255) as u8;
                pixels.fill(scale_color(color, eased.max(4)));
            }
            Kernel::Fade => pixels.fill(scale_color(color, triangle(phase, cycle))),
            Kernel::Wipe {
                reverse,
                invert,
                random,
            } => {
                let front = if random {
                    color_wheel(hash(step, 7) as u8)
                } else {
                    color
                };
                let (fg, bg) = if invert { (BLACK, front) } else { (front, BLACK) };
                let position = phase * 2 * n / cycle;
                for (i, pixel) in pixels.iter_mut().enumerate() {
                    let i = if reverse { n - 1 - i as u32 } else { i as u32 };
                    let lit = if position < n {
                        i <= position
                    } else {
                        i > position - n
                    };
                    *pixel = if lit { fg } else { bg };
                }
            }
            Kernel::RandomColor => pixels.fill(color_wheel(hash(step, 0) as u8)),
            Kernel::Dynamic { single } => {
                let tick = elapsed / (cycle / 8).max(FRAME_INTERVAL_MS);
                if single {
                    pixels.fill(color);
                    if n > 0 {
                        let index = (hash(tick, 1) % n) as usize;
                        pixels[index] = color_wheel(hash(tick, 2) as u8);
                    }
                } else {
                    for (i, pixel) in pixels.iter_mut().enumerate() {
                        *pixel = color_wheel(hash(tick, i as u32) as u8);
                    }
                }
            }
            Kernel::Rainbow => pixels.fill(color_wheel((phase * 256 / cycle) as u8)),
            Kernel::RainbowCycle => {
                let offset = phase * 256 / cycle;
                for (i, pixel) in pixels.iter_mut().enumerate() {
                    *pixel = color_wheel((i as u32 * 256 / n + offset) as u8);
                }
            }
            Kernel::Scan { dual } => {
                let head = bounce(phase, cycle, n);
                pixels.fill(BLACK);
                if let Some(pixel) = pixels.get_mut(head as usize) {
                    *pixel = color;
                }
                if dual && n > 0 {
                    pixels[(n - 1 - head) as usize] = color;
                }
            }
            Kernel::Larson => {
                let head = bounce(phase, cycle, n);
                for (i, pixel) in pixels.iter_mut().enumerate() {
                    let distance = (i as u32).abs_diff(head);
                    let level = 255u32.saturating_sub(distance * 64);
                    *pixel = scale_color(color, level as u8);
                }
            }
            Kernel::Comet => {
                let head = if n > 0 { phase * n / cycle } else { 0 };
                for (i, pixel) in pixels.iter_mut().enumerate() {
                    let behind = (head + n - i as u32) % n.max(1);
                    let level = 255u32.saturating_sub(behind * 48);
                    *pixel = scale_color(color, level as u8);
                }
            }
            Kernel::TheaterChase { rainbow } => {
                let offset = phase * 3 / cycle;
                for (i, pixel) in pixels.iter_mut().enumerate() {
                    let on = (i as u32 + offset) % 3 == 0;
                    *pixel = match (on, rainbow) {
                        (false, _) => BLACK,
                        (true, false) => color,
                        (true, true) => {
                            let hue = (i as u32 * 256 / n).wrapping_add(step.wrapping_mul(16));
                            color_wheel(hue as u8)
                        }
                    };
                }
            }
            Kernel::RunningLights => {
                let offset = phase * 256 / cycle;
                for (i, pixel) in pixels.iter_mut().enumerate() {
                    let angle = (i as u32 * 32 + offset) % 256;
                    *pixel = scale_color(color, triangle(angle, 256));
                }
            }
            Kernel::Running { front, back } => {
                let front = front.resolve(color);
                let back = back.resolve(color);
                let offset = phase * 4 / cycle;
                for (i, pixel) in pixels.iter_mut().enumerate() {
                    *pixel = if (i as u32 + offset) % 4 < 2 { front } else { back };
                }
            }
            Kernel::Twinkle { random } => {
                let tick = elapsed / (cycle / 16).max(FRAME_INTERVAL_MS);
                for (i, pixel) in pixels.iter_mut().enumerate() {
                    let roll = hash(tick, i as u32);
                    *pixel = match (roll % 4 == 0, random) {
                        (false, _) => BLACK,
                        (true, false) => color,
                        (true, true) => color_wheel((roll >> 8) as u8),
                    };
                }
            }
            Kernel::Sparkle { flash } => {
                let tick = elapsed / (cycle / 16).max(FRAME_INTERVAL_MS);
                let (background, spark) = if flash { (color, WHITE) } else { (BLACK, color) };
                pixels.fill(background);
                if n > 0 {
                    pixels[(hash(tick, 3) % n) as usize] = spark;
                }
            }
            Kernel::Fire { intensity } => {
                let tick = elapsed / FRAME_INTERVAL_MS;
                for (i, pixel) in pixels.iter_mut().enumerate() {
                    let flicker = hash(tick, i as u32) % (intensity as u32 + 1);
                    *pixel = scale_color(color, (255 - flicker) as u8);
                }
            }
        }
    }
}

/// Position eines hin und her laufenden Pixels
fn bounce(phase: u32, cycle: u32, n: u32) -> u32 {
    if n < 2 {
        return 0;
    }
    let span = 2 * n - 2;
    let position = phase * span / cycle;
    if position < n { position } else { span - position }
}

impl<W: SmartLedWriter, const N: usize> EffectEngine for FxEngine<W, N> {
    fn init(&mut self) {
        self.frame = [BLACK; N];
        self.running = false;
        self.dirty = true;
        self.mode_started_ms = None;
        self.last_frame_ms = None;
    }

    fn set_mode(&mut self, mode: u8) {
        self.mode = mode;
        self.mode_started_ms = None;
        self.dirty = true;
    }

    fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness;
        self.dirty = true;
    }

    fn set_speed(&mut self, speed: u16) {
        self.speed = speed;
        self.dirty = true;
    }

    fn set_color(&mut self, color: u32) {
        self.color = unpack_color(color);
        self.dirty = true;
    }

    fn start(&mut self) {
        self.running = true;
        self.dirty = true;
    }

    fn service(&mut self, now_ms: u32) -> Result<(), LedError> {
        if !self.running {
            return Ok(());
        }

        let started = *self.mode_started_ms.get_or_insert(now_ms);
        if !self.dirty {
            if let Some(last) = self.last_frame_ms {
                if now_ms.wrapping_sub(last) < FRAME_INTERVAL_MS {
                    return Ok(());
                }
            }
        }

        self.render(now_ms.wrapping_sub(started));
        self.last_frame_ms = Some(now_ms);
        self.dirty = false;

        let mut output = [BLACK; N];
        for (out, pixel) in output.iter_mut().zip(self.frame.iter()) {
            *out = scale_color(*pixel, self.brightness);
        }
        self.writer.write(&output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FrameSink {
        last: Option<[RGB8; 4]>,
        writes: usize,
    }

    impl SmartLedWriter for FrameSink {
        fn write(&mut self, pixels: &[RGB8]) -> Result<(), LedError> {
            let mut frame = [BLACK; 4];
            frame.copy_from_slice(pixels);
            self.last = Some(frame);
            self.writes += 1;
            Ok(())
        }
    }

    fn started_engine() -> FxEngine<FrameSink, 4> {
        let mut engine = FxEngine::new(FrameSink::default());
        engine.init();
        engine.set_brightness(255);
        engine.start();
        engine
    }

    #[test]
    fn test_not_running_writes_nothing() {
        let mut engine: FxEngine<FrameSink, 4> = FxEngine::new(FrameSink::default());
        engine.service(0).unwrap();
        assert_eq!(engine.writer().writes, 0);
    }

    #[test]
    fn test_static_fills_color() {
        let mut engine = started_engine();
        engine.set_color(0xFF8000);
        engine.service(0).unwrap();

        let orange = RGB8 { r: 255, g: 128, b: 0 };
        assert_eq!(engine.writer().last, Some([orange; 4]));
    }

    #[test]
    fn test_brightness_scales_output_not_frame() {
        let mut engine = started_engine();
        engine.set_color(0xC86400);
        engine.set_brightness(127);
        engine.service(0).unwrap();

        assert_eq!(engine.frame()[0], RGB8 { r: 200, g: 100, b: 0 });
        assert_eq!(
            engine.writer().last.unwrap()[0],
            RGB8 { r: 100, g: 50, b: 0 }
        );
    }

    #[test]
    fn test_frame_interval_limits_writes() {
        let mut engine = started_engine();
        engine.service(0).unwrap();
        engine.service(5).unwrap();
        engine.service(19).unwrap();
        assert_eq!(engine.writer().writes, 1);

        engine.service(20).unwrap();
        assert_eq!(engine.writer().writes, 2);
    }

    #[test]
    fn test_setting_change_forces_frame() {
        let mut engine = started_engine();
        engine.service(0).unwrap();
        engine.set_color(0x00FF00);
        engine.service(1).unwrap();
        assert_eq!(engine.writer().writes, 2);
    }

    #[test]
    fn test_blink_toggles_per_half_cycle() {
        let mut engine = started_engine();
        engine.set_mode(1);
        engine.set_speed(1000);
        engine.set_color(0x0000FF);

        engine.service(0).unwrap();
        assert_eq!(engine.frame()[0], RGB8 { r: 0, g: 0, b: 255 });

        engine.service(600).unwrap();
        assert_eq!(engine.frame()[0], BLACK);
    }

    #[test]
    fn test_color_wipe_progresses() {
        let mut engine = started_engine();
        engine.set_mode(3);
        engine.set_speed(800);
        engine.set_color(0xFF0000);
        let red = RGB8 { r: 255, g: 0, b: 0 };

        // Start bei t=0: erster Pixel an
        engine.service(0).unwrap();
        assert_eq!(engine.frame(), &[red, BLACK, BLACK, BLACK]);

        // Halber Zyklus: Strip voll
        engine.service(300).unwrap();
        assert_eq!(engine.frame(), &[red; 4]);
    }

    #[test]
    fn test_scan_moves_single_pixel() {
        let mut engine = started_engine();
        engine.set_mode(13);
        engine.set_speed(600);
        engine.set_color(0x00FF00);

        engine.service(0).unwrap();
        let lit = engine.frame().iter().filter(|p| **p != BLACK).count();
        assert_eq!(lit, 1);
        assert_ne!(engine.frame()[0], BLACK);
    }

    #[test]
    fn test_out_of_range_mode_is_clamped() {
        assert_eq!(kernel_for(200), kernel_for(55));
    }

    #[test]
    fn test_every_mode_renders() {
        let mut engine = started_engine();
        for mode in 0..FULL_RANGE_SIZE as u8 {
            engine.set_mode(mode);
            engine.service(mode as u32 * 1000).unwrap();
            engine.service(mode as u32 * 1000 + 777).unwrap();
        }
        assert_eq!(engine.writer().writes, FULL_RANGE_SIZE * 2);
    }

    #[test]
    fn test_triangle_wave() {
        assert_eq!(triangle(0, 100), 0);
        assert_eq!(triangle(50, 100), 255);
        assert_eq!(triangle(100, 100), 0);
    }
}
