//! MQTT Topic-Zuordnung
//!
//! Jede Einstellung hat ein eigenes Topic der Form
//! `"<company>-<device_id>/<suffix>"`. Die Topics werden einmal beim Start
//! gebaut; eingehende Topics werden über den Suffix auf [`Topic`] abgebildet.

use core::fmt::Write;
use heapless::String;

/// Maximale Länge eines Topic-Strings in Bytes
pub const TOPIC_CAPACITY: usize = 64;

pub type TopicString = String<TOPIC_CAPACITY>;

const TOPIC_COUNT: usize = 8;

/// Anzahl der Kommando-Topics (alle außer Status)
pub const COMMAND_TOPIC_COUNT: usize = TOPIC_COUNT - 1;

/// Logischer Name eines Topics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Topic {
    /// Online-Status (`"on"` / Last-Will `"off"`), kein Kommando-Topic
    Status,
    Mode,
    Brightness,
    Speed,
    Color,
    Auto,
    AutoDelay,
    AutoValues,
}

impl Topic {
    pub const ALL: [Topic; TOPIC_COUNT] = [
        Topic::Status,
        Topic::Mode,
        Topic::Brightness,
        Topic::Speed,
        Topic::Color,
        Topic::Auto,
        Topic::AutoDelay,
        Topic::AutoValues,
    ];

    /// Alle Topics, die das Gerät abonniert
    pub const COMMANDS: [Topic; COMMAND_TOPIC_COUNT] = [
        Topic::Mode,
        Topic::Brightness,
        Topic::Speed,
        Topic::Color,
        Topic::Auto,
        Topic::AutoDelay,
        Topic::AutoValues,
    ];

    pub const fn suffix(self) -> &'static str {
        match self {
            Topic::Status => "status",
            Topic::Mode => "mode",
            Topic::Brightness => "brightness",
            Topic::Speed => "speed",
            Topic::Color => "color",
            Topic::Auto => "auto",
            Topic::AutoDelay => "auto_delay",
            Topic::AutoValues => "auto_values",
        }
    }

    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "status" => Some(Topic::Status),
            "mode" => Some(Topic::Mode),
            "brightness" => Some(Topic::Brightness),
            "speed" => Some(Topic::Speed),
            "color" => Some(Topic::Color),
            "auto" => Some(Topic::Auto),
            "auto_delay" => Some(Topic::AutoDelay),
            "auto_values" => Some(Topic::AutoValues),
            _ => None,
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// Fehler beim Aufbau der Topic-Zuordnung
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BindingError {
    /// Prefix + Suffix passen nicht in [`TOPIC_CAPACITY`]
    TooLong,
}

impl core::fmt::Display for BindingError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BindingError::TooLong => write!(f, "topic exceeds {} bytes", TOPIC_CAPACITY),
        }
    }
}

/// Feste Zuordnung Topic → Topic-String, nach dem Start unveränderlich
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelBinding {
    prefix_len: usize,
    topics: [TopicString; TOPIC_COUNT],
}

impl ChannelBinding {
    /// Baut alle Topics aus Firmen-Prefix und Geräte-ID
    ///
    /// ```
    /// # use esp_core::{ChannelBinding, Topic};
    /// let binding = ChannelBinding::new("acme", "strip01").unwrap();
    /// assert_eq!(binding.topic(Topic::AutoDelay), "acme-strip01/auto_delay");
    /// ```
    pub fn new(company: &str, device_id: &str) -> Result<Self, BindingError> {
        let mut topics: [TopicString; TOPIC_COUNT] = core::array::from_fn(|_| TopicString::new());
        for topic in Topic::ALL {
            write!(
                topics[topic.index()],
                "{}-{}/{}",
                company,
                device_id,
                topic.suffix()
            )
            .map_err(|_| BindingError::TooLong)?;
        }

        Ok(Self {
            prefix_len: company.len() + 1 + device_id.len(),
            topics,
        })
    }

    /// `"<company>-<device_id>"`
    pub fn prefix(&self) -> &str {
        &self.topics[Topic::Status.index()][..self.prefix_len]
    }

    pub fn topic(&self, topic: Topic) -> &str {
        &self.topics[topic.index()]
    }

    /// Bildet einen eingehenden Topic-String auf [`Topic`] ab
    ///
    /// Unbekannte Topics ergeben `None`.
    pub fn resolve(&self, channel_id: &str) -> Option<Topic> {
        let suffix = channel_id
            .strip_prefix(self.prefix())?
            .strip_prefix('/')?;
        Topic::from_suffix(suffix)
    }

    /// Alle Kommando-Topic-Strings für ein einzelnes SUBSCRIBE
    ///
    /// Retained Nachrichten kommen erst nach dem SUBACK, daher müssen alle
    /// Topics in einem Paket abonniert werden.
    pub fn subscription(&self) -> [&str; COMMAND_TOPIC_COUNT] {
        Topic::COMMANDS.map(|topic| self.topic(topic))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binding() -> ChannelBinding {
        ChannelBinding::new("acme", "42").unwrap()
    }

    #[test]
    fn test_topic_strings() {
        let binding = binding();
        assert_eq!(binding.prefix(), "acme-42");
        assert_eq!(binding.topic(Topic::Status), "acme-42/status");
        assert_eq!(binding.topic(Topic::Mode), "acme-42/mode");
        assert_eq!(binding.topic(Topic::Brightness), "acme-42/brightness");
        assert_eq!(binding.topic(Topic::Speed), "acme-42/speed");
        assert_eq!(binding.topic(Topic::Color), "acme-42/color");
        assert_eq!(binding.topic(Topic::Auto), "acme-42/auto");
        assert_eq!(binding.topic(Topic::AutoDelay), "acme-42/auto_delay");
        assert_eq!(binding.topic(Topic::AutoValues), "acme-42/auto_values");
    }

    #[test]
    fn test_resolve_roundtrip_all_topics() {
        let binding = binding();
        for topic in Topic::ALL {
            assert_eq!(binding.resolve(binding.topic(topic)), Some(topic));
        }
    }

    #[test]
    fn test_resolve_foreign_prefix() {
        let binding = binding();
        assert_eq!(binding.resolve("other-42/mode"), None);
        assert_eq!(binding.resolve("acme-421/mode"), None);
    }

    #[test]
    fn test_resolve_unknown_suffix() {
        let binding = binding();
        assert_eq!(binding.resolve("acme-42/volume"), None);
        assert_eq!(binding.resolve("acme-42/mode/extra"), None);
        assert_eq!(binding.resolve("acme-42"), None);
    }

    #[test]
    fn test_subscription_is_single_batch_of_commands() {
        let binding = binding();
        let batch = binding.subscription();

        assert_eq!(batch.len(), Topic::COMMANDS.len());
        assert!(!batch.contains(&binding.topic(Topic::Status)));
        for (topic, name) in Topic::COMMANDS.into_iter().zip(batch) {
            assert_eq!(binding.resolve(name), Some(topic));
        }
        // Kein Topic doppelt (sonst verschiedene SUBACK Reason Codes)
        for (i, name) in batch.iter().enumerate() {
            assert!(!batch[i + 1..].contains(name));
        }
    }

    #[test]
    fn test_prefix_too_long() {
        let long = core::str::from_utf8(&[b'x'; TOPIC_CAPACITY]).unwrap();
        assert_eq!(
            ChannelBinding::new(long, "1"),
            Err(BindingError::TooLong)
        );
    }
}
