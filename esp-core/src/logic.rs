//! Pure Business Logic Functions
//!
//! Farb-Packing, Payload-Parsing und Helligkeits-Skalierung
//! ohne Hardware-Dependencies (testbar!)

use rgb::RGB8;

/// Packt eine RGB-Farbe in das 24-Bit Format `0x00RRGGBB`
///
/// Entspricht dem Packing der Effekt-Engine (`(r << 16) | (g << 8) | b`).
///
/// # Beispiele
///
/// ```
/// # use rgb::RGB8;
/// # use esp_core::pack_color;
/// assert_eq!(pack_color(RGB8 { r: 255, g: 128, b: 0 }), 0xFF8000);
/// ```
pub const fn pack_color(color: RGB8) -> u32 {
    ((color.r as u32) << 16) | ((color.g as u32) << 8) | color.b as u32
}

/// Entpackt `0x00RRGGBB` in eine RGB-Farbe (oberes Byte wird ignoriert)
pub const fn unpack_color(packed: u32) -> RGB8 {
    RGB8 {
        r: (packed >> 16) as u8,
        g: (packed >> 8) as u8,
        b: packed as u8,
    }
}

/// Parst ein Farb-Triplet im Format `"R.G.B"` (dezimal, je 0-255)
///
/// Trennt am ersten und am letzten Punkt. Fehlt ein Trennzeichen oder ist
/// ein Teil keine Zahl im Bereich 0-255, wird `None` zurückgegeben.
///
/// ```
/// # use rgb::RGB8;
/// # use esp_core::parse_color_triplet;
/// assert_eq!(parse_color_triplet("255.128.0"), Some(RGB8 { r: 255, g: 128, b: 0 }));
/// assert_eq!(parse_color_triplet("25500"), None);
/// ```
pub fn parse_color_triplet(text: &str) -> Option<RGB8> {
    let text = text.trim();
    let first = text.find('.')?;
    let last = text.rfind('.')?;
    if first == last {
        return None;
    }

    let r = text[..first].trim().parse().ok()?;
    let g = text[first + 1..last].trim().parse().ok()?;
    let b = text[last + 1..].trim().parse().ok()?;
    Some(RGB8 { r, g, b })
}

/// Skaliert eine Farbe mit einer Helligkeit (0 = aus, 255 = volle Helligkeit)
pub const fn scale_color(color: RGB8, brightness: u8) -> RGB8 {
    let factor = brightness as u16 + 1;
    RGB8 {
        r: ((color.r as u16 * factor) >> 8) as u8,
        g: ((color.g as u16 * factor) >> 8) as u8,
        b: ((color.b as u16 * factor) >> 8) as u8,
    }
}

/// Farbrad: 0..=255 → Rot → Grün → Blau → Rot
pub const fn color_wheel(position: u8) -> RGB8 {
    let pos = 255 - position;
    if pos < 85 {
        RGB8 {
            r: 255 - pos * 3,
            g: 0,
            b: pos * 3,
        }
    } else if pos < 170 {
        let pos = pos - 85;
        RGB8 {
            r: 0,
            g: pos * 3,
            b: 255 - pos * 3,
        }
    } else {
        let pos = pos - 170;
        RGB8 {
            r: pos * 3,
            g: 255 - pos * 3,
            b: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_color_orange() {
        let packed = pack_color(RGB8 { r: 255, g: 128, b: 0 });
        assert_eq!(packed, 0x00FF_8000);
    }

    #[test]
    fn test_unpack_color_ignores_upper_byte() {
        assert_eq!(unpack_color(0xAB00_00FF), RGB8 { r: 0, g: 0, b: 255 });
    }

    #[test]
    fn test_pack_unpack_blue() {
        let blue = RGB8 { r: 0, g: 0, b: 255 };
        assert_eq!(unpack_color(pack_color(blue)), blue);
    }

    #[test]
    fn test_parse_color_triplet_valid() {
        assert_eq!(
            parse_color_triplet("10.20.30"),
            Some(RGB8 { r: 10, g: 20, b: 30 })
        );
    }

    #[test]
    fn test_parse_color_triplet_tolerates_whitespace() {
        assert_eq!(
            parse_color_triplet(" 1.2.3\n"),
            Some(RGB8 { r: 1, g: 2, b: 3 })
        );
    }

    #[test]
    fn test_parse_color_triplet_without_delimiters() {
        assert_eq!(parse_color_triplet("25500"), None);
    }

    #[test]
    fn test_parse_color_triplet_single_delimiter() {
        assert_eq!(parse_color_triplet("255.0"), None);
    }

    #[test]
    fn test_parse_color_triplet_out_of_range() {
        assert_eq!(parse_color_triplet("256.0.0"), None);
    }

    #[test]
    fn test_parse_color_triplet_four_parts() {
        // Mittelteil "2.3" ist keine Zahl
        assert_eq!(parse_color_triplet("1.2.3.4"), None);
    }

    #[test]
    fn test_parse_color_triplet_empty_part() {
        assert_eq!(parse_color_triplet("1..3"), None);
    }

    #[test]
    fn test_scale_color_full_and_off() {
        let white = RGB8 { r: 255, g: 255, b: 255 };
        assert_eq!(scale_color(white, 255), white);
        assert_eq!(scale_color(white, 0), RGB8 { r: 0, g: 0, b: 0 });
    }

    #[test]
    fn test_scale_color_half() {
        let color = RGB8 { r: 200, g: 100, b: 0 };
        assert_eq!(scale_color(color, 127), RGB8 { r: 100, g: 50, b: 0 });
    }

    #[test]
    fn test_color_wheel_primaries() {
        assert_eq!(color_wheel(0), RGB8 { r: 255, g: 0, b: 0 });
        assert_eq!(color_wheel(85), RGB8 { r: 0, g: 255, b: 0 });
        assert_eq!(color_wheel(170), RGB8 { r: 0, g: 0, b: 255 });
    }
}
