// Projekt-Konfiguration: Konstanten und Hardware-Zuordnungen

// ============================================================================
// LED-Strip Konfiguration
// ============================================================================
//
// Die Pins sind typisierte Peripherals und werden in bin/main.rs vergeben:
// Strip-Daten an GPIO8, Status-LED (active-low) an GPIO15.

/// Anzahl der LEDs im Strip
pub const LED_COUNT: usize = 30;

/// RMT Taktfrequenz in MHz
/// 80 MHz ist optimal für WS2812 LED-Timing
pub const RMT_CLOCK_MHZ: u32 = 80;

/// Intervall der Strip-Schleife in Millisekunden
/// Kommandos abholen, Auto-Scheduler ticken, Engine rendern
pub const STRIP_LOOP_INTERVAL_MS: u64 = 5;

// ============================================================================
// Geräte-Identität
// ============================================================================

/// Firmenname, erster Teil des Topic-Präfix "<company>-<device>"
/// Wird zur Build-Zeit aus der Environment Variable DEVICE_COMPANY geladen
pub const DEVICE_COMPANY: &str = env!(
    "DEVICE_COMPANY",
    "Device Company nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// Geräte-ID, zweiter Teil des Topic-Präfix "<company>-<device>"
/// Wird zur Build-Zeit aus der Environment Variable DEVICE_ID geladen
pub const DEVICE_ID: &str = env!(
    "DEVICE_ID",
    "Device ID nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

// ============================================================================
// WiFi Konfiguration
// ============================================================================

/// WiFi SSID (Netzwerk-Name)
/// Wird zur Build-Zeit aus der Environment Variable WIFI_SSID geladen
/// Setze diese in .env file (siehe .env.example)
pub const WIFI_SSID: &str = env!(
    "WIFI_SSID",
    "WiFi SSID nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// WiFi Passwort
/// Wird zur Build-Zeit aus der Environment Variable WIFI_PASSWORD geladen
/// Setze diese in .env file (siehe .env.example)
pub const WIFI_PASSWORD: &str = env!(
    "WIFI_PASSWORD",
    "WiFi Password nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// WiFi Reconnect Delay in Sekunden
pub const WIFI_RECONNECT_DELAY_SECS: u64 = 2;

/// Heap-Größe für WiFi (Bytes)
/// WiFi benötigt dynamischen Speicher für Pakete
pub const WIFI_HEAP_SIZE: usize = 65536; // 64 KB

/// Zusätzliche Heap-Größe (Bytes)
pub const EXTRA_HEAP_SIZE: usize = 36864; // 36 KB

// ============================================================================
// MQTT Konfiguration
// ============================================================================

/// MQTT Broker Hostname oder IP-Adresse
/// Wird zur Build-Zeit aus der Environment Variable MQTT_BROKER geladen
/// Setze diese in .env file (siehe .env.example)
pub const MQTT_BROKER: &str = env!(
    "MQTT_BROKER",
    "MQTT Broker nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// MQTT Broker Port
/// Standard: 1883 (unverschlüsselt)
pub const MQTT_PORT: u16 = 1883;

/// MQTT Client ID
/// Eindeutige Kennung für diesen ESP32-C6
/// Wird zur Build-Zeit aus der Environment Variable MQTT_CLIENT_ID geladen
pub const MQTT_CLIENT_ID: &str = env!(
    "MQTT_CLIENT_ID",
    "MQTT Client ID nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// Payload des Status-Topics solange das Gerät verbunden ist (retained)
pub const MQTT_STATUS_ONLINE: &str = "on";

/// Last-Will Payload des Status-Topics (retained)
pub const MQTT_STATUS_OFFLINE: &str = "off";

/// MQTT Keep-Alive in Sekunden (wird dem Broker beim CONNECT mitgeteilt)
pub const MQTT_KEEP_ALIVE_SECS: u16 = 30;

/// Heartbeat-Intervall in Sekunden, deutlich unter dem Keep-Alive
/// Der Status wird dann erneut als QoS0 PUBLISH gesendet
pub const MQTT_HEARTBEAT_INTERVAL_SECS: u64 = 15;

/// MQTT Reconnect Delay in Sekunden
/// Wartezeit nach Verbindungsfehler vor erneutem Versuch
pub const MQTT_RECONNECT_DELAY_SECS: u64 = 2;

/// MQTT Buffer-Größe in Bytes
/// Muss groß genug für das längste Auto-Values JSON plus Topic sein
pub const MQTT_BUFFER_SIZE: usize = 1024;

/// TCP RX/TX Buffer-Größe für die Broker-Verbindung in Bytes
pub const MQTT_SOCKET_BUFFER_SIZE: usize = 4096;

/// TCP Socket Timeout in Sekunden
/// Muss größer als das Heartbeat-Intervall sein, sonst bricht eine ruhige Verbindung ab
pub const MQTT_SOCKET_TIMEOUT_SECS: u64 = 60;

/// DNS Query Timeout in Sekunden
pub const DNS_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// Task-Kommunikation
// ============================================================================

/// Kapazität des Kommando-Channels (MQTT Task → Strip Task)
pub const COMMAND_QUEUE_SIZE: usize = 4;
