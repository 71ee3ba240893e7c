// Hardware Abstraction Layer (HAL) Module
//
// Hardware-Implementierungen der Traits aus esp-core.

pub mod led_writer;

pub use led_writer::{LED_BUFFER_SIZE, LedBuffer, RmtLedWriter};
