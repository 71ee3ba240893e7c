//! Hardware Abstraction Traits
//!
//! Diese Traits definieren Schnittstellen für Hardware-Zugriff
//! ohne konkrete Implementierung.

use rgb::RGB8;

/// Fehler-Typ für LED-Operationen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedError {
    WriteFailed,
}

impl core::fmt::Display for LedError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LedError::WriteFailed => write!(f, "LED write failed"),
        }
    }
}

/// Trait für SmartLED Hardware-Zugriff
///
/// Abstrahiert den Zugriff auf einen RGB LED-Strip (WS2812/Neopixel).
///
/// # Implementierungen
/// - **Production:** RmtLedWriter (ESP32 RMT Peripheral)
/// - **Testing:** MockLedWriter (in-memory Mock)
pub trait SmartLedWriter: Send {
    /// Schreibt einen kompletten Frame (ein Pixel pro LED) auf den Strip
    ///
    /// # Fehlerbehandlung
    /// Gibt `LedError::WriteFailed` zurück wenn Hardware-Zugriff fehlschlägt
    fn write(&mut self, pixels: &[RGB8]) -> Result<(), LedError>;
}

/// Trait für die Effekt-Engine
///
/// Die Engine bekommt Modus, Helligkeit, Speed und Farbe über Setter
/// und rendert bei jedem `service()` Aufruf den aktuellen Frame.
/// Setter ändern nur den Zustand der Engine, geschrieben wird in `service()`.
///
/// # Implementierungen
/// - **Production:** `FxEngine` (rendert auf einen `SmartLedWriter`)
/// - **Testing:** RecordingEngine in esp-tests (zeichnet Aufrufe auf)
pub trait EffectEngine {
    fn init(&mut self);

    /// Effekt-Ordinal (0..=55)
    fn set_mode(&mut self, mode: u8);

    fn set_brightness(&mut self, brightness: u8);

    /// Zykluslänge des Effekts in Millisekunden
    fn set_speed(&mut self, speed: u16);

    /// Farbe im Format `0x00RRGGBB`
    fn set_color(&mut self, color: u32);

    fn start(&mut self);

    /// Wird bei jedem Loop-Tick aufgerufen und treibt das eigentliche Rendering
    ///
    /// `now_ms` ist ein monotoner Millisekunden-Zähler (darf überlaufen).
    fn service(&mut self, now_ms: u32) -> Result<(), LedError>;
}
