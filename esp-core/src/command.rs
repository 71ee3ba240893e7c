//! Kommandos aus MQTT-Payloads
//!
//! Ein eingehender Payload wird anhand seines Topics in ein [`Command`]
//! übersetzt. Fehlerhafte Payloads ergeben einen [`CommandError`] und
//! lassen die Einstellungen unverändert.

use core::str::FromStr;

use crate::channel::Topic;
use crate::logic::{pack_color, parse_color_triplet};
use crate::settings::AutoValuesRaw;

/// Geparstes Kommando für den Controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Auto-Modus ein/aus (Payload `1` / `0`)
    SetAuto(bool),
    /// Neuer Auto-Values Payload (roh, wird im Controller dekodiert)
    SetAutoValues(AutoValuesRaw),
    SetAutoDelay(u32),
    SetMode(u8),
    SetBrightness(u8),
    SetSpeed(u16),
    /// Farbe im Format `0x00RRGGBB`
    SetColor(u32),
}

/// Fehler beim Parsen eines Payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    InvalidUtf8,
    /// Keine Zahl oder ausserhalb des Wertebereichs
    InvalidNumber,
    /// Auto-Flag ist weder `0` noch `1`
    InvalidFlag,
    /// Kein `"R.G.B"` Triplet
    InvalidColor,
    /// Auto-Values Payload grösser als der Speicher
    PayloadTooLong,
}

impl core::fmt::Display for CommandError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CommandError::InvalidUtf8 => write!(f, "payload is not utf-8"),
            CommandError::InvalidNumber => write!(f, "payload is not a valid number"),
            CommandError::InvalidFlag => write!(f, "auto flag must be 0 or 1"),
            CommandError::InvalidColor => write!(f, "color must be R.G.B"),
            CommandError::PayloadTooLong => write!(f, "payload too long"),
        }
    }
}

impl Command {
    /// Übersetzt einen Payload für ein Topic
    ///
    /// Gibt `Ok(None)` für das Status-Topic zurück (kein Kommando).
    ///
    /// ```
    /// # use esp_core::{Command, Topic};
    /// let cmd = Command::parse(Topic::Color, b"255.128.0").unwrap();
    /// assert_eq!(cmd, Some(Command::SetColor(0xFF8000)));
    /// ```
    pub fn parse(topic: Topic, payload: &[u8]) -> Result<Option<Self>, CommandError> {
        let text = core::str::from_utf8(payload).map_err(|_| CommandError::InvalidUtf8)?;

        let command = match topic {
            Topic::Status => return Ok(None),
            Topic::Auto => match parse_number::<u8>(text)? {
                0 => Command::SetAuto(false),
                1 => Command::SetAuto(true),
                _ => return Err(CommandError::InvalidFlag),
            },
            Topic::AutoValues => Command::SetAutoValues(
                AutoValuesRaw::try_from(text).map_err(|_| CommandError::PayloadTooLong)?,
            ),
            Topic::AutoDelay => Command::SetAutoDelay(parse_number(text)?),
            Topic::Mode => Command::SetMode(parse_number(text)?),
            Topic::Brightness => Command::SetBrightness(parse_number(text)?),
            Topic::Speed => Command::SetSpeed(parse_number(text)?),
            Topic::Color => Command::SetColor(pack_color(
                parse_color_triplet(text).ok_or(CommandError::InvalidColor)?,
            )),
        };

        Ok(Some(command))
    }

    /// Topic, zu dem das Kommando gehört
    pub const fn topic(&self) -> Topic {
        match self {
            Command::SetAuto(_) => Topic::Auto,
            Command::SetAutoValues(_) => Topic::AutoValues,
            Command::SetAutoDelay(_) => Topic::AutoDelay,
            Command::SetMode(_) => Topic::Mode,
            Command::SetBrightness(_) => Topic::Brightness,
            Command::SetSpeed(_) => Topic::Speed,
            Command::SetColor(_) => Topic::Color,
        }
    }
}

fn parse_number<T: FromStr>(text: &str) -> Result<T, CommandError> {
    text.trim().parse().map_err(|_| CommandError::InvalidNumber)
}

// ============================================================================
// defmt::Format Implementation (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl defmt::Format for Command {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Command::SetAuto(enabled) => defmt::write!(fmt, "SetAuto({})", enabled),
            Command::SetAutoValues(raw) => {
                defmt::write!(fmt, "SetAutoValues({})", raw.as_str())
            }
            Command::SetAutoDelay(delay) => defmt::write!(fmt, "SetAutoDelay({}ms)", delay),
            Command::SetMode(mode) => defmt::write!(fmt, "SetMode({})", mode),
            Command::SetBrightness(brightness) => {
                defmt::write!(fmt, "SetBrightness({})", brightness)
            }
            Command::SetSpeed(speed) => defmt::write!(fmt, "SetSpeed({})", speed),
            Command::SetColor(color) => defmt::write!(fmt, "SetColor({=u32:#x})", color),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_auto_flag() {
        assert_eq!(
            Command::parse(Topic::Auto, b"1"),
            Ok(Some(Command::SetAuto(true)))
        );
        assert_eq!(
            Command::parse(Topic::Auto, b"0"),
            Ok(Some(Command::SetAuto(false)))
        );
        assert_eq!(
            Command::parse(Topic::Auto, b"2"),
            Err(CommandError::InvalidFlag)
        );
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(
            Command::parse(Topic::Mode, b"12"),
            Ok(Some(Command::SetMode(12)))
        );
        assert_eq!(
            Command::parse(Topic::Brightness, b" 255 "),
            Ok(Some(Command::SetBrightness(255)))
        );
        assert_eq!(
            Command::parse(Topic::Speed, b"1000"),
            Ok(Some(Command::SetSpeed(1000)))
        );
        assert_eq!(
            Command::parse(Topic::AutoDelay, b"5000"),
            Ok(Some(Command::SetAutoDelay(5000)))
        );
    }

    #[test]
    fn test_parse_invalid_number() {
        assert_eq!(
            Command::parse(Topic::Mode, b"abc"),
            Err(CommandError::InvalidNumber)
        );
        assert_eq!(
            Command::parse(Topic::Brightness, b"256"),
            Err(CommandError::InvalidNumber)
        );
        assert_eq!(
            Command::parse(Topic::AutoDelay, b"-1"),
            Err(CommandError::InvalidNumber)
        );
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(
            Command::parse(Topic::Color, b"0.0.255"),
            Ok(Some(Command::SetColor(0x0000FF)))
        );
        assert_eq!(
            Command::parse(Topic::Color, b"25500"),
            Err(CommandError::InvalidColor)
        );
    }

    #[test]
    fn test_parse_status_is_not_a_command() {
        assert_eq!(Command::parse(Topic::Status, b"on"), Ok(None));
    }

    #[test]
    fn test_parse_invalid_utf8() {
        assert_eq!(
            Command::parse(Topic::Mode, &[0xFF, 0xFE]),
            Err(CommandError::InvalidUtf8)
        );
    }

    #[test]
    fn test_parse_auto_values_too_long() {
        let payload = [b' '; 300];
        assert_eq!(
            Command::parse(Topic::AutoValues, &payload),
            Err(CommandError::PayloadTooLong)
        );
    }

    #[test]
    fn test_command_topic() {
        assert_eq!(Command::SetColor(0).topic(), Topic::Color);
        assert_eq!(Command::SetAuto(true).topic(), Topic::Auto);
    }
}
