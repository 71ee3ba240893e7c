// Task-Modul: Enthält alle Embassy Tasks
//
// Jeder Task läuft asynchron und unabhängig.
// Kommandos fließen über einen Embassy Channel vom MQTT Task zum Strip Task.

pub mod mqtt;
pub mod strip;
pub mod wifi;

// Re-export Tasks für einfachen Import
pub use mqtt::mqtt_task;
pub use strip::strip_task;
pub use wifi::{connection_task, dhcp_task, net_task};
