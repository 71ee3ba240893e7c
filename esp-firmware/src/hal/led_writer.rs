// RMT-basierter SmartLED Writer für den LED-Strip
//
// Implementiert esp_core::SmartLedWriter, damit der Effekt-Renderer
// hardware-unabhängig bleibt (Tests nutzen einen Mock in esp-tests).

use esp_hal::Blocking;
use esp_hal::rmt::{PulseCode, Rmt};
use esp_hal::time::Rate;
use esp_hal_smartled::SmartLedsAdapter;
use rgb::RGB8;
use smart_leds_trait::SmartLedsWrite;

use crate::config::LED_COUNT;
use crate::{LedError, SmartLedWriter};

/// Buffer-Größe für den Strip (3 Farben * 8 Bits pro LED + 1 Reset)
pub const LED_BUFFER_SIZE: usize = LED_COUNT * 24 + 1;

/// Puls-Buffer für den RMT Adapter
pub type LedBuffer = [PulseCode; LED_BUFFER_SIZE];

/// Real Hardware LED Writer
///
/// Nutzt das ESP32 RMT Peripheral um WS2812 LEDs anzusteuern.
///
/// Hinweis: Der Buffer muss länger leben als der Writer, daher wird er im
/// Task erstellt und als Parameter übergeben statt im Constructor allokiert.
pub struct RmtLedWriter<'a> {
    strip: SmartLedsAdapter<'a, LED_BUFFER_SIZE>,
}

impl<'a> RmtLedWriter<'a> {
    /// Erstellt einen neuen RmtLedWriter
    ///
    /// # Parameter
    /// - `data_pin`: GPIO für die Datenleitung des Strips
    /// - `rmt_peripheral`: RMT Peripheral
    /// - `rmt_clock_mhz`: RMT Clock Frequenz in MHz (z.B. 80)
    /// - `buffer`: Buffer für LED-Daten (erstellt mit smart_led_buffer!(LED_COUNT))
    ///
    /// Schlägt fehl, wenn das RMT Peripheral die Taktfrequenz nicht unterstützt.
    pub fn new(
        data_pin: esp_hal::peripherals::GPIO8<'a>,
        rmt_peripheral: esp_hal::peripherals::RMT<'a>,
        rmt_clock_mhz: u32,
        buffer: &'a mut LedBuffer,
    ) -> Result<Self, LedError> {
        let rmt: Rmt<'a, Blocking> = Rmt::new(rmt_peripheral, Rate::from_mhz(rmt_clock_mhz))
            .map_err(|_| LedError::WriteFailed)?;

        let strip = SmartLedsAdapter::new(rmt.channel0, data_pin, buffer);

        Ok(Self { strip })
    }
}

impl SmartLedWriter for RmtLedWriter<'_> {
    fn write(&mut self, pixels: &[RGB8]) -> Result<(), LedError> {
        self.strip
            .write(pixels.iter().copied())
            .map_err(|_| LedError::WriteFailed)
    }
}
