// Library-Root: Hardware-Anbindung und Embassy Tasks
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

// Module
pub mod config;
pub mod hal;
pub mod tasks;

// Re-exports von esp-core
pub use esp_core::{ChannelBinding, Command, LedError, SmartLedWriter};

// Embassy Channel-Typen
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};

use crate::config::COMMAND_QUEUE_SIZE;

// ============================================================================
// Type-Aliase für Channel-Typen
// ============================================================================
//
// Statt:  Sender<'static, NoopRawMutex, Command, 4>
// Nutze:  StripCommandSender
//
// Beide Tasks laufen auf demselben Executor, daher reicht NoopRawMutex.

/// Channel für geparste Kommandos (MQTT Task → Strip Task)
pub type StripCommandChannel = Channel<NoopRawMutex, Command, COMMAND_QUEUE_SIZE>;

/// Sender für Kommandos (MQTT Task)
pub type StripCommandSender = Sender<'static, NoopRawMutex, Command, COMMAND_QUEUE_SIZE>;

/// Receiver für Kommandos (Strip Task, non-blocking via try_receive)
pub type StripCommandReceiver = Receiver<'static, NoopRawMutex, Command, COMMAND_QUEUE_SIZE>;
