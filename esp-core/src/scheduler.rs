//! Auto-Cycle Scheduler
//!
//! Wird bei jedem Loop-Tick aufgerufen und schaltet im Auto-Modus nach
//! Ablauf von `auto_delay_ms` zum nächsten Modus der Sequenz.
//! Kein eigener Timer: die Zeit wird bei jedem Aufruf gepollt.
//!
//! Zeitstempel sind `u32` Millisekunden. Die Differenz wird mit
//! `wrapping_sub` berechnet, damit bleibt das Gate auch beim Überlauf
//! des Zählers (nach ~49,7 Tagen) korrekt.

use crate::sequence::AutoSequence;
use crate::settings::DeviceSettings;
use crate::traits::EffectEngine;

/// Position in der Auto-Sequenz und Zeitpunkt des letzten Wechsels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AutoCycleCursor {
    index: usize,
    last_advance_ms: u32,
}

impl AutoCycleCursor {
    pub const fn new(now_ms: u32) -> Self {
        Self {
            index: 0,
            last_advance_ms: now_ms,
        }
    }

    /// Setzt auf (0, now) zurück
    pub fn reset(&mut self, now_ms: u32) {
        *self = Self::new(now_ms);
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn last_advance_ms(&self) -> u32 {
        self.last_advance_ms
    }

    /// Vergangene Zeit seit dem letzten Wechsel (überlaufsicher)
    pub fn elapsed_ms(&self, now_ms: u32) -> u32 {
        now_ms.wrapping_sub(self.last_advance_ms)
    }
}

/// Ergebnis eines Scheduler-Ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tick {
    /// Auto-Modus ist aus
    Disabled,
    /// Delay noch nicht abgelaufen
    Waiting,
    /// Modus wurde an die Engine gegeben
    Advanced(u8),
    /// Delay abgelaufen, aber keine gültige Sequenz vorhanden
    NoSequence,
}

/// Zeitgesteuerter Auto-Modus
#[derive(Debug, Clone, Default)]
pub struct AutoCycle {
    cursor: AutoCycleCursor,
}

impl AutoCycle {
    pub fn cursor(&self) -> &AutoCycleCursor {
        &self.cursor
    }

    pub fn reset(&mut self, now_ms: u32) {
        self.cursor.reset(now_ms);
    }

    /// Ein Tick des Auto-Modus
    ///
    /// Ruft die Engine höchstens einmal auf und nur wenn das Delay
    /// abgelaufen ist. Der Zeitstempel wird bei jedem Ablauf erneuert,
    /// auch wenn keine Sequenz vorhanden ist.
    pub fn step<E: EffectEngine>(
        &mut self,
        settings: &DeviceSettings,
        sequence: &AutoSequence,
        engine: &mut E,
        now_ms: u32,
    ) -> Tick {
        if !settings.auto_enabled() {
            return Tick::Disabled;
        }

        if self.cursor.elapsed_ms(now_ms) < settings.auto_delay_ms() {
            return Tick::Waiting;
        }
        self.cursor.last_advance_ms = now_ms;

        let len = sequence.len();
        let index = if self.cursor.index < len {
            self.cursor.index
        } else {
            0
        };

        let Some(mode) = sequence.get(index) else {
            return Tick::NoSequence;
        };

        engine.set_mode(mode);
        self.cursor.index = (index + 1) % len;
        Tick::Advanced(mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::LedError;

    #[derive(Default)]
    struct ModeRecorder {
        last_mode: Option<u8>,
        calls: usize,
    }

    impl EffectEngine for ModeRecorder {
        fn init(&mut self) {}
        fn set_mode(&mut self, mode: u8) {
            self.last_mode = Some(mode);
            self.calls += 1;
        }
        fn set_brightness(&mut self, _brightness: u8) {}
        fn set_speed(&mut self, _speed: u16) {}
        fn set_color(&mut self, _color: u32) {}
        fn start(&mut self) {}
        fn service(&mut self, _now_ms: u32) -> Result<(), LedError> {
            Ok(())
        }
    }

    fn enabled_settings(delay_ms: u32) -> DeviceSettings {
        let mut settings = DeviceSettings::default();
        settings.set_auto_enabled(true);
        settings.set_auto_delay_ms(delay_ms);
        settings
    }

    #[test]
    fn test_disabled_never_touches_engine() {
        let settings = DeviceSettings::default();
        let mut cycle = AutoCycle::default();
        let mut engine = ModeRecorder::default();

        let tick = cycle.step(&settings, &AutoSequence::FullRange, &mut engine, 1_000_000);
        assert_eq!(tick, Tick::Disabled);
        assert_eq!(engine.calls, 0);
    }

    #[test]
    fn test_waiting_before_delay() {
        let settings = enabled_settings(100);
        let mut cycle = AutoCycle::default();
        cycle.reset(1000);
        let mut engine = ModeRecorder::default();

        let tick = cycle.step(&settings, &AutoSequence::FullRange, &mut engine, 1099);
        assert_eq!(tick, Tick::Waiting);
        assert_eq!(engine.calls, 0);
        assert_eq!(*cycle.cursor(), AutoCycleCursor::new(1000));
    }

    #[test]
    fn test_advances_on_delay() {
        let settings = enabled_settings(100);
        let mut cycle = AutoCycle::default();
        cycle.reset(1000);
        let mut engine = ModeRecorder::default();

        let tick = cycle.step(&settings, &AutoSequence::FullRange, &mut engine, 1100);
        assert_eq!(tick, Tick::Advanced(0));
        assert_eq!(engine.last_mode, Some(0));
        assert_eq!(cycle.cursor().index(), 1);
        assert_eq!(cycle.cursor().last_advance_ms(), 1100);
    }

    #[test]
    fn test_empty_sequence_resets_timer_without_advancing() {
        let settings = enabled_settings(100);
        let mut cycle = AutoCycle::default();
        let mut engine = ModeRecorder::default();

        let tick = cycle.step(&settings, &AutoSequence::Empty, &mut engine, 500);
        assert_eq!(tick, Tick::NoSequence);
        assert_eq!(engine.calls, 0);
        assert_eq!(cycle.cursor().index(), 0);
        assert_eq!(cycle.cursor().last_advance_ms(), 500);

        // Direkt danach: Delay läuft wieder
        let tick = cycle.step(&settings, &AutoSequence::Empty, &mut engine, 550);
        assert_eq!(tick, Tick::Waiting);
    }

    #[test]
    fn test_gate_survives_counter_overflow() {
        let settings = enabled_settings(100);
        let mut cycle = AutoCycle::default();
        cycle.reset(u32::MAX - 49);
        let mut engine = ModeRecorder::default();

        // 90ms vergangen (über den Überlauf hinweg)
        let tick = cycle.step(&settings, &AutoSequence::FullRange, &mut engine, 40);
        assert_eq!(tick, Tick::Waiting);

        // 100ms vergangen
        let tick = cycle.step(&settings, &AutoSequence::FullRange, &mut engine, 50);
        assert_eq!(tick, Tick::Advanced(0));
    }

    #[test]
    fn test_index_beyond_shrunk_sequence_restarts() {
        let settings = enabled_settings(0);
        let mut cycle = AutoCycle::default();
        let mut engine = ModeRecorder::default();

        for now in 0..10 {
            cycle.step(&settings, &AutoSequence::FullRange, &mut engine, now);
        }
        assert_eq!(cycle.cursor().index(), 10);

        let short = AutoSequence::decode(r#"{"n":2,"v":[7,8]}"#).unwrap();
        let tick = cycle.step(&settings, &short, &mut engine, 10);
        assert_eq!(tick, Tick::Advanced(7));
        assert_eq!(cycle.cursor().index(), 1);
    }
}
