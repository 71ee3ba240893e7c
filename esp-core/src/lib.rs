//! ESP Core - Platform-agnostic Logic and Traits
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Sie enthält den kompletten Controller (Settings, Dispatcher,
//! Auto-Scheduler) sowie den Effekt-Renderer.

#![no_std]

pub mod channel;
pub mod command;
pub mod controller;
pub mod effects;
pub mod logic;
pub mod scheduler;
pub mod sequence;
pub mod settings;
pub mod traits;

// Re-exports für einfachen Zugriff
pub use channel::{BindingError, COMMAND_TOPIC_COUNT, ChannelBinding, Topic};
pub use command::{Command, CommandError};
pub use controller::{Controller, Outcome};
pub use effects::{FRAME_INTERVAL_MS, FxEngine};
pub use logic::{color_wheel, pack_color, parse_color_triplet, scale_color, unpack_color};
pub use scheduler::{AutoCycle, AutoCycleCursor, Tick};
pub use sequence::{AutoSequence, DecodeError, FULL_RANGE_SIZE};
pub use settings::{AutoValuesRaw, DeviceSettings};
pub use traits::{EffectEngine, LedError, SmartLedWriter};
