// MQTT Task - Empfängt Kommandos vom Broker und meldet den Online-Status
use defmt::{Debug2Format, error, info, warn};
use embassy_futures::select::{Either, select};
use embassy_net::{IpAddress, Stack, dns::DnsQueryType, tcp::TcpSocket};
use embassy_time::{Duration, Instant, Timer, with_timeout};
use esp_hal::gpio::Output;

use rust_mqtt::client::client::MqttClient;
use rust_mqtt::client::client_config::{ClientConfig, MqttVersion};
use rust_mqtt::packet::v5::publish_packet::QualityOfService;
use rust_mqtt::utils::rng_generator::CountingRng;
use rust_mqtt::utils::types::EncodedString;

use esp_core::{COMMAND_TOPIC_COUNT, Topic};

use crate::config::*;
use crate::{ChannelBinding, Command, StripCommandSender};

/// MQTT Task - läuft parallel zum Strip Task
///
/// - Wartet auf Netzwerk-Verbindung
/// - Verbindet sich mit dem Broker (Last Will "off" auf dem Status-Topic)
/// - Published "on" (retained) und abonniert alle Kommando-Topics
/// - Parst eingehende Nachrichten und reicht sie an den Strip Task weiter
/// - Automatisches Reconnect bei Fehlern
///
/// Die Status-LED (active-low) zeigt eine bestehende Broker-Verbindung an.
///
/// # Parameter
/// - `stack`: embassy-net Stack für Netzwerk-Zugriff
/// - `binding`: Topic-Zuordnung dieses Geräts
/// - `command_sender`: Channel zum Strip Task
/// - `status_led`: Status-LED, beim Start auf High (aus)
#[embassy_executor::task]
pub async fn mqtt_task(
    stack: &'static Stack<'static>,
    binding: &'static ChannelBinding,
    command_sender: StripCommandSender,
    mut status_led: Output<'static>,
) {
    info!("MQTT: Task started, waiting for network...");
    wait_for_network(stack).await;
    info!("MQTT: Network ready");

    loop {
        match mqtt_connect_and_listen(stack, binding, &command_sender, &mut status_led).await {
            Ok(_) => warn!("MQTT: Connection closed normally"),
            Err(e) => error!("MQTT: Error: {}", e),
        }
        status_led.set_high();
        info!("MQTT: Reconnecting in {}s...", MQTT_RECONNECT_DELAY_SECS);
        Timer::after(Duration::from_secs(MQTT_RECONNECT_DELAY_SECS)).await;
    }
}

/// Wartet bis Netzwerk-Verbindung verfügbar ist
///
/// Prüft kontinuierlich Link-Status und DHCP-Konfiguration.
async fn wait_for_network(stack: &'static Stack<'static>) {
    loop {
        if stack.is_link_up() && stack.config_v4().is_some() {
            break;
        }
        Timer::after(Duration::from_millis(500)).await;
    }
}

/// Ergebnis eines Schleifendurchlaufs, ohne Borrow auf den Client
enum Inbound {
    Command(Command),
    Skipped,
    HeartbeatDue,
}

/// Verbindet mit dem Broker und verarbeitet eingehende Kommandos
///
/// 1. DNS-Auflösung des Broker-Hostnames
/// 2. TCP-Verbindung aufbauen
/// 3. MQTT CONNECT mit Last Will senden
/// 4. Online-Status publishen und Kommando-Topics abonnieren
/// 5. Nachrichten empfangen, zwischendurch den Status als Heartbeat senden
///
/// Bei jedem Fehler wird die Funktion beendet und der Haupt-Loop
/// startet automatisch einen Reconnect-Versuch.
async fn mqtt_connect_and_listen(
    stack: &'static Stack<'static>,
    binding: &'static ChannelBinding,
    command_sender: &StripCommandSender,
    status_led: &mut Output<'static>,
) -> Result<(), MqttError> {
    // DNS Lookup
    info!("MQTT: Resolving '{}'...", MQTT_BROKER);
    let broker_ip = resolve_hostname(stack, MQTT_BROKER).await?;
    info!("MQTT: Resolved to {}", Debug2Format(&broker_ip));

    // TCP Connect
    let mut rx_buffer = [0u8; MQTT_SOCKET_BUFFER_SIZE];
    let mut tx_buffer = [0u8; MQTT_SOCKET_BUFFER_SIZE];
    let mut socket = TcpSocket::new(*stack, &mut rx_buffer, &mut tx_buffer);
    socket.set_timeout(Some(Duration::from_secs(MQTT_SOCKET_TIMEOUT_SECS)));

    socket
        .connect((broker_ip, MQTT_PORT))
        .await
        .map_err(|_| MqttError::ConnectionFailed)?;
    info!("MQTT: TCP connected");

    // MQTT Client Configuration
    let status_topic = binding.topic(Topic::Status);
    let rng = CountingRng(20000);
    let mut config = ClientConfig::<5, _>::new(MqttVersion::MQTTv5, rng);
    config.client_id = EncodedString {
        string: MQTT_CLIENT_ID,
        len: MQTT_CLIENT_ID.len() as u16,
    };
    config.keep_alive = MQTT_KEEP_ALIVE_SECS;
    config.max_packet_size = MQTT_BUFFER_SIZE as u32;
    config.add_max_subscribe_qos(QualityOfService::QoS1);
    config.add_will(status_topic, MQTT_STATUS_OFFLINE.as_bytes(), true);

    // MQTT Buffer
    let mut send_buffer = [0u8; MQTT_BUFFER_SIZE];
    let mut recv_buffer = [0u8; MQTT_BUFFER_SIZE];

    let mut client = MqttClient::<_, 5, _>::new(
        socket,
        &mut send_buffer,
        MQTT_BUFFER_SIZE,
        &mut recv_buffer,
        MQTT_BUFFER_SIZE,
        config,
    );

    // MQTT CONNECT
    client
        .connect_to_broker()
        .await
        .map_err(|_| MqttError::ProtocolError)?;
    info!("MQTT: Connected to broker as '{}'", MQTT_CLIENT_ID);
    status_led.set_low();

    // Online-Status (überschreibt den retained Last Will)
    client
        .send_message(
            status_topic,
            MQTT_STATUS_ONLINE.as_bytes(),
            QualityOfService::QoS1,
            true,
        )
        .await
        .map_err(|_| MqttError::PublishFailed)?;
    info!("MQTT: Published '{}' to {}", MQTT_STATUS_ONLINE, status_topic);

    // Ein einziges SUBSCRIBE: rust-mqtt erwartet als nächstes Paket genau
    // ein SUBACK, retained Kommandos kommen erst danach über receive_message
    let topics = binding.subscription().into_iter().collect();
    client
        .subscribe_to_topics::<COMMAND_TOPIC_COUNT>(&topics)
        .await
        .map_err(|_| MqttError::SubscribeFailed)?;
    info!(
        "MQTT: Subscribed to {} command topics under {}/",
        COMMAND_TOPIC_COUNT,
        binding.prefix()
    );

    // Receive Loop
    //
    // Keep-Alive ohne PINGREQ: send_ping() verlangt PINGRESP als nächstes
    // Paket und würde ein gleichzeitig eintreffendes PUBLISH verwerfen.
    // Ein QoS0 PUBLISH des Status zählt beim Broker ebenfalls als Aktivität
    // und wartet auf keine Antwort.
    //
    // Feuert der Timer während receive_message() mitten in einem Paket,
    // geht der Rest des Pakets verloren. Der nächste Receive schlägt dann
    // fehl und die Verbindung wird neu aufgebaut (retained Werte kommen
    // beim erneuten SUBSCRIBE wieder).
    let heartbeat_interval = Duration::from_secs(MQTT_HEARTBEAT_INTERVAL_SECS);
    let mut next_heartbeat = Instant::now() + heartbeat_interval;
    loop {
        let inbound = match select(client.receive_message(), Timer::at(next_heartbeat)).await {
            Either::First(Ok((topic, payload))) => match decode_message(binding, topic, payload) {
                Some(command) => Inbound::Command(command),
                None => Inbound::Skipped,
            },
            Either::First(Err(e)) => {
                warn!("MQTT: Receive failed: {}", Debug2Format(&e));
                return Err(MqttError::ReceiveFailed);
            }
            Either::Second(()) => Inbound::HeartbeatDue,
        };

        match inbound {
            Inbound::Command(command) => command_sender.send(command).await,
            Inbound::Skipped => {}
            Inbound::HeartbeatDue => {
                client
                    .send_message(
                        status_topic,
                        MQTT_STATUS_ONLINE.as_bytes(),
                        QualityOfService::QoS0,
                        true,
                    )
                    .await
                    .map_err(|_| MqttError::HeartbeatFailed)?;
                next_heartbeat = Instant::now() + heartbeat_interval;
            }
        }
    }
}

/// Loggt eine eingehende Nachricht und parst sie zu einem Kommando
///
/// Fremde Topics, das Status-Topic und ungültige Payloads ergeben `None`.
fn decode_message(binding: &ChannelBinding, topic: &str, payload: &[u8]) -> Option<Command> {
    match core::str::from_utf8(payload) {
        Ok(text) => info!("MQTT: [{}] {}", topic, text),
        Err(_) => info!("MQTT: [{}] <{} bytes, not UTF-8>", topic, payload.len()),
    }

    let Some(channel) = binding.resolve(topic) else {
        warn!("MQTT: Ignoring message on unknown topic {}", topic);
        return None;
    };

    match Command::parse(channel, payload) {
        Ok(command) => command,
        Err(e) => {
            warn!("MQTT: Rejected payload on {}: {}", channel, e);
            None
        }
    }
}

/// Löst Hostname zu IPv4-Adresse auf
///
/// Nutzt embassy-net DNS-Stack mit konfigurierbarem Timeout.
async fn resolve_hostname(
    stack: &'static Stack<'static>,
    hostname: &str,
) -> Result<embassy_net::Ipv4Address, MqttError> {
    let result = with_timeout(
        Duration::from_secs(DNS_TIMEOUT_SECS),
        stack.dns_query(hostname, DnsQueryType::A),
    )
    .await;

    match result {
        Ok(Ok(addrs)) => {
            for addr in addrs {
                if let IpAddress::Ipv4(ipv4) = addr {
                    return Ok(ipv4);
                }
            }
            Err(MqttError::DnsResolutionFailed)
        }
        Ok(Err(_)) => Err(MqttError::DnsResolutionFailed),
        Err(_) => Err(MqttError::DnsTimeout),
    }
}

/// MQTT Fehler-Typen
///
/// Alle Fehler beenden die Verbindung und lösen einen Reconnect aus.
#[derive(Debug)]
enum MqttError {
    DnsResolutionFailed,
    DnsTimeout,
    ConnectionFailed,
    ProtocolError,
    PublishFailed,
    SubscribeFailed,
    ReceiveFailed,
    HeartbeatFailed,
}

impl defmt::Format for MqttError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            MqttError::DnsResolutionFailed => defmt::write!(fmt, "DNS failed"),
            MqttError::DnsTimeout => defmt::write!(fmt, "DNS timeout"),
            MqttError::ConnectionFailed => defmt::write!(fmt, "Connection failed"),
            MqttError::ProtocolError => defmt::write!(fmt, "Protocol error"),
            MqttError::PublishFailed => defmt::write!(fmt, "Publish failed"),
            MqttError::SubscribeFailed => defmt::write!(fmt, "Subscribe failed"),
            MqttError::ReceiveFailed => defmt::write!(fmt, "Receive failed"),
            MqttError::HeartbeatFailed => defmt::write!(fmt, "Heartbeat publish failed"),
        }
    }
}
