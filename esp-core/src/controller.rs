//! Command Dispatcher
//!
//! Der Controller besitzt den kompletten Zustand (Topics, Einstellungen,
//! dekodierte Auto-Sequenz, Auto-Cursor) und die Effekt-Engine.
//! Änderungen werden nur bei tatsächlich neuem Wert an die Engine gegeben.

use crate::channel::{ChannelBinding, Topic};
use crate::command::{Command, CommandError};
use crate::scheduler::{AutoCycle, AutoCycleCursor, Tick};
use crate::sequence::{AutoSequence, DecodeError};
use crate::settings::DeviceSettings;
use crate::traits::{EffectEngine, LedError};

/// Ergebnis eines angewendeten Kommandos
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// Topic gehört nicht zu diesem Gerät oder ist kein Kommando-Topic
    Ignored,
    /// Wert war bereits gesetzt, nichts passiert
    Unchanged(Topic),
    /// Wert wurde übernommen
    Changed(Topic),
    /// Auto-Values wurden übernommen, sind aber ungültig: Auto-Modus pausiert
    SequenceRejected(DecodeError),
}

/// LED-Controller: Settings Store + Dispatcher + Auto-Scheduler
pub struct Controller<E: EffectEngine> {
    binding: ChannelBinding,
    settings: DeviceSettings,
    sequence: AutoSequence,
    auto_cycle: AutoCycle,
    engine: E,
}

impl<E: EffectEngine> Controller<E> {
    /// Erstellt einen Controller mit Default-Einstellungen
    pub fn new(binding: ChannelBinding, engine: E) -> Self {
        Self::with_settings(binding, engine, DeviceSettings::default())
    }

    pub fn with_settings(binding: ChannelBinding, engine: E, settings: DeviceSettings) -> Self {
        let sequence = AutoSequence::decode(settings.auto_values_raw()).unwrap_or_default();
        Self {
            binding,
            settings,
            sequence,
            auto_cycle: AutoCycle::default(),
            engine,
        }
    }

    /// Initialisiert die Engine mit den aktuellen Einstellungen und startet sie
    pub fn start(&mut self) {
        self.engine.init();
        self.engine.set_mode(self.settings.mode());
        self.engine.set_brightness(self.settings.brightness());
        self.engine.set_speed(self.settings.speed());
        self.engine.set_color(self.settings.color());
        self.engine.start();
    }

    /// Einstiegspunkt für eingehende MQTT-Nachrichten
    ///
    /// Fremde Topics werden ignoriert. Fehlerhafte Payloads lassen die
    /// Einstellungen unverändert.
    pub fn apply(
        &mut self,
        channel_id: &str,
        payload: &[u8],
        now_ms: u32,
    ) -> Result<Outcome, CommandError> {
        let Some(topic) = self.binding.resolve(channel_id) else {
            return Ok(Outcome::Ignored);
        };

        match Command::parse(topic, payload)? {
            Some(command) => Ok(self.apply_command(command, now_ms)),
            None => Ok(Outcome::Ignored),
        }
    }

    /// Wendet ein bereits geparstes Kommando an
    pub fn apply_command(&mut self, command: Command, now_ms: u32) -> Outcome {
        let topic = command.topic();

        match command {
            Command::SetAuto(enabled) => {
                if self.settings.auto_enabled() == enabled {
                    return Outcome::Unchanged(topic);
                }
                self.settings.set_auto_enabled(enabled);
                if enabled {
                    self.auto_cycle.reset(now_ms);
                } else {
                    // Letzten expliziten Modus wiederherstellen
                    self.engine.set_mode(self.settings.mode());
                }
            }
            Command::SetAutoValues(raw) => {
                if self.settings.auto_values_raw() == raw.as_str() {
                    return Outcome::Unchanged(topic);
                }
                let decoded = AutoSequence::decode(&raw);
                self.settings.set_auto_values_raw(raw);
                if self.settings.auto_enabled() {
                    self.auto_cycle.reset(now_ms);
                }
                match decoded {
                    Ok(sequence) => self.sequence = sequence,
                    Err(e) => {
                        self.sequence = AutoSequence::Empty;
                        return Outcome::SequenceRejected(e);
                    }
                }
            }
            Command::SetAutoDelay(delay_ms) => {
                if self.settings.auto_delay_ms() == delay_ms {
                    return Outcome::Unchanged(topic);
                }
                self.settings.set_auto_delay_ms(delay_ms);
            }
            Command::SetMode(mode) => {
                if self.settings.mode() == mode {
                    return Outcome::Unchanged(topic);
                }
                self.settings.set_mode(mode);
                self.engine.set_mode(mode);
            }
            Command::SetBrightness(brightness) => {
                if self.settings.brightness() == brightness {
                    return Outcome::Unchanged(topic);
                }
                self.settings.set_brightness(brightness);
                self.engine.set_brightness(brightness);
            }
            Command::SetSpeed(speed) => {
                if self.settings.speed() == speed {
                    return Outcome::Unchanged(topic);
                }
                self.settings.set_speed(speed);
                self.engine.set_speed(speed);
            }
            Command::SetColor(color) => {
                if self.settings.color() == color {
                    return Outcome::Unchanged(topic);
                }
                self.settings.set_color(color);
                self.engine.set_color(color);
            }
        }

        Outcome::Changed(topic)
    }

    /// Auto-Scheduler Tick, bei jedem Loop-Durchlauf aufrufen
    pub fn tick(&mut self, now_ms: u32) -> Tick {
        self.auto_cycle
            .step(&self.settings, &self.sequence, &mut self.engine, now_ms)
    }

    /// Rendering der Engine, bei jedem Loop-Durchlauf aufrufen
    pub fn service(&mut self, now_ms: u32) -> Result<(), LedError> {
        self.engine.service(now_ms)
    }

    pub fn binding(&self) -> &ChannelBinding {
        &self.binding
    }

    pub fn settings(&self) -> &DeviceSettings {
        &self.settings
    }

    pub fn sequence(&self) -> &AutoSequence {
        &self.sequence
    }

    pub fn cursor(&self) -> &AutoCycleCursor {
        self.auto_cycle.cursor()
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }
}
