// Strip Task - Controller + Effekt-Engine auf dem RMT LED-Strip
use defmt::{debug, error, info, warn};
use embassy_time::{Duration, Instant, Timer};
use esp_core::{ChannelBinding, Controller, FxEngine, Outcome, Tick};
use esp_hal_smartled::smart_led_buffer;

use crate::config::{LED_COUNT, RMT_CLOCK_MHZ, STRIP_LOOP_INTERVAL_MS};
use crate::hal::{LedBuffer, RmtLedWriter};
use crate::{SmartLedWriter, StripCommandReceiver};

/// Aktuelle Zeit für Scheduler und Renderer (wrapt nach ~49 Tagen)
fn now_ms() -> u32 {
    Instant::now().as_millis() as u32
}

/// Strip Logic - Hauptschleife ohne direkte Hardware-Abhängigkeit
///
/// Pro Durchlauf:
/// 1. Alle wartenden Kommandos vom MQTT Task übernehmen
/// 2. Auto-Scheduler ticken
/// 3. Engine rendern lassen
///
/// Kommandos werden nur hier angewendet, Scheduler und Dispatcher teilen
/// sich so den Zustand ohne Locking.
pub async fn strip_logic<W: SmartLedWriter>(
    writer: W,
    binding: ChannelBinding,
    command_receiver: StripCommandReceiver,
) {
    let engine = FxEngine::<W, LED_COUNT>::new(writer);
    let mut controller = Controller::new(binding, engine);
    controller.start();
    info!(
        "Strip: Started with {} LEDs, topic prefix '{}'",
        LED_COUNT,
        controller.binding().prefix()
    );

    loop {
        while let Ok(command) = command_receiver.try_receive() {
            let now = now_ms();
            match controller.apply_command(command, now) {
                Outcome::Changed(topic) => info!("Strip: {} updated", topic),
                Outcome::Unchanged(topic) => debug!("Strip: {} unchanged", topic),
                Outcome::SequenceRejected(e) => {
                    warn!("Strip: Auto values rejected ({}), auto cycling paused", e)
                }
                Outcome::Ignored => {}
            }
        }

        let now = now_ms();
        match controller.tick(now) {
            Tick::Advanced(mode) => debug!("Strip: Auto mode -> {}", mode),
            Tick::NoSequence => warn!("Strip: Auto enabled but no valid sequence"),
            Tick::Disabled | Tick::Waiting => {}
        }

        if let Err(e) = controller.service(now) {
            error!("Strip: Failed to write frame: {}", e);
        }

        Timer::after(Duration::from_millis(STRIP_LOOP_INTERVAL_MS)).await;
    }
}

/// Strip Task - Embassy Task für parallele Ausführung
///
/// Übernimmt die Hardware-Initialisierung und ruft dann `strip_logic()` auf.
///
/// # Parameter
/// - `data_pin`: GPIO8 für die Datenleitung
/// - `rmt_peripheral`: RMT Peripheral für präzises Timing
/// - `binding`: Topic-Zuordnung dieses Geräts
/// - `command_receiver`: Kommandos vom MQTT Task
#[embassy_executor::task]
pub async fn strip_task(
    data_pin: esp_hal::peripherals::GPIO8<'static>,
    rmt_peripheral: esp_hal::peripherals::RMT<'static>,
    binding: &'static ChannelBinding,
    command_receiver: StripCommandReceiver,
) {
    // Macro allokiert Speicher im richtigen Format für RMT
    let mut rmt_buffer: LedBuffer = smart_led_buffer!(LED_COUNT);

    let writer = match RmtLedWriter::new(data_pin, rmt_peripheral, RMT_CLOCK_MHZ, &mut rmt_buffer)
    {
        Ok(writer) => writer,
        Err(e) => {
            error!("Strip: RMT init failed: {}", e);
            return;
        }
    };

    strip_logic(writer, binding.clone(), command_receiver).await;
}
