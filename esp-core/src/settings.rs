//! Settings Store
//!
//! Aktuelle Gerätekonfiguration. Setter ersetzen nur den Wert,
//! Seiteneffekte auf die Effekt-Engine macht der Controller.

use heapless::String;

/// Maximale Länge des Auto-Values Payloads in Bytes
pub const AUTO_VALUES_CAPACITY: usize = 256;

/// Roher Auto-Values Payload (JSON, z.B. `{"n":3,"v":[5,10,15]}`)
pub type AutoValuesRaw = String<AUTO_VALUES_CAPACITY>;

pub const DEFAULT_MODE: u8 = 0;
pub const DEFAULT_BRIGHTNESS: u8 = 100;
pub const DEFAULT_SPEED: u16 = 2048;
/// Blau
pub const DEFAULT_COLOR: u32 = 0x0000_00FF;
pub const DEFAULT_AUTO_DELAY_MS: u32 = 10_240;

/// Gerätekonfiguration (genau eine Instanz, lebt so lange wie der Prozess)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSettings {
    mode: u8,
    brightness: u8,
    speed: u16,
    color: u32,
    auto_enabled: bool,
    auto_delay_ms: u32,
    auto_values_raw: AutoValuesRaw,
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            mode: DEFAULT_MODE,
            brightness: DEFAULT_BRIGHTNESS,
            speed: DEFAULT_SPEED,
            color: DEFAULT_COLOR,
            auto_enabled: false,
            auto_delay_ms: DEFAULT_AUTO_DELAY_MS,
            auto_values_raw: AutoValuesRaw::new(),
        }
    }
}

impl DeviceSettings {
    pub fn mode(&self) -> u8 {
        self.mode
    }

    pub fn set_mode(&mut self, mode: u8) {
        self.mode = mode;
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    pub fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness;
    }

    pub fn speed(&self) -> u16 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: u16) {
        self.speed = speed;
    }

    /// Farbe im Format `0x00RRGGBB`
    pub fn color(&self) -> u32 {
        self.color
    }

    pub fn set_color(&mut self, color: u32) {
        self.color = color;
    }

    pub fn auto_enabled(&self) -> bool {
        self.auto_enabled
    }

    pub fn set_auto_enabled(&mut self, enabled: bool) {
        self.auto_enabled = enabled;
    }

    pub fn auto_delay_ms(&self) -> u32 {
        self.auto_delay_ms
    }

    pub fn set_auto_delay_ms(&mut self, delay_ms: u32) {
        self.auto_delay_ms = delay_ms;
    }

    pub fn auto_values_raw(&self) -> &str {
        &self.auto_values_raw
    }

    pub fn set_auto_values_raw(&mut self, raw: AutoValuesRaw) {
        self.auto_values_raw = raw;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = DeviceSettings::default();
        assert_eq!(settings.mode(), 0);
        assert_eq!(settings.brightness(), 100);
        assert_eq!(settings.speed(), 2048);
        assert_eq!(settings.color(), 0x0000FF);
        assert!(!settings.auto_enabled());
        assert_eq!(settings.auto_delay_ms(), 10_240);
        assert_eq!(settings.auto_values_raw(), "");
    }

    #[test]
    fn test_setters_replace_values() {
        let mut settings = DeviceSettings::default();
        settings.set_mode(12);
        settings.set_brightness(255);
        settings.set_speed(500);
        settings.set_color(0xFF8000);
        settings.set_auto_enabled(true);
        settings.set_auto_delay_ms(1000);
        settings.set_auto_values_raw(AutoValuesRaw::try_from("{\"n\":0}").unwrap());

        assert_eq!(settings.mode(), 12);
        assert_eq!(settings.brightness(), 255);
        assert_eq!(settings.speed(), 500);
        assert_eq!(settings.color(), 0xFF8000);
        assert!(settings.auto_enabled());
        assert_eq!(settings.auto_delay_ms(), 1000);
        assert_eq!(settings.auto_values_raw(), "{\"n\":0}");
    }
}
