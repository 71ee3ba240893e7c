//! Auto-Sequence Decoder
//!
//! Dekodiert den Auto-Values Payload `{"n": <anzahl>, "v": [<modi>...]}`
//! einmal pro Änderung in eine indizierbare Sequenz von Effekt-Ordinals.

use heapless::Vec;
use serde::Deserialize;

/// Anzahl der eingebauten Effekt-Modi (Ordinals 0..=55)
pub const FULL_RANGE_SIZE: usize = 56;

/// Maximale Anzahl expliziter Werte im Payload
pub const MAX_AUTO_VALUES: usize = 64;

pub type AutoValues = Vec<u8, MAX_AUTO_VALUES>;

/// JSON-Form des Payloads
#[derive(Deserialize)]
struct AutoValuesPayload {
    #[serde(default)]
    n: Option<i32>,
    #[serde(default)]
    v: Option<AutoValues>,
}

/// Dekodierte Auto-Sequenz
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AutoSequence {
    /// Keine gültige Sequenz vorhanden, Auto-Modus pausiert
    #[default]
    Empty,
    /// Vom Benutzer vorgegebene Modi, Länge entspricht `n`
    Explicit(AutoValues),
    /// Alle eingebauten Modi 0..=55
    FullRange,
}

/// Fehler beim Dekodieren des Auto-Values Payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Kein gültiges JSON (oder Werte ausserhalb 0..=255, mehr als 64 Werte)
    InvalidJson,
    /// Feld `n` fehlt
    MissingCount,
    /// `n` ist grösser als die Anzahl der Werte in `v`
    ShortValueList { declared: i32, supplied: usize },
}

impl core::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DecodeError::InvalidJson => write!(f, "invalid auto values json"),
            DecodeError::MissingCount => write!(f, "auto values without count"),
            DecodeError::ShortValueList { declared, supplied } => write!(
                f,
                "auto values declare {} entries but supply {}",
                declared, supplied
            ),
        }
    }
}

impl AutoSequence {
    /// Dekodiert einen rohen Payload
    ///
    /// - `n > 0`: die ersten `n` Werte aus `v`
    /// - `n <= 0`: alle eingebauten Modi
    ///
    /// ```
    /// # use esp_core::AutoSequence;
    /// let seq = AutoSequence::decode(r#"{"n":2,"v":[7,9,11]}"#).unwrap();
    /// assert_eq!(seq.len(), 2);
    /// assert_eq!(seq.get(1), Some(9));
    /// ```
    pub fn decode(raw: &str) -> Result<Self, DecodeError> {
        let (payload, _) = serde_json_core::from_str::<AutoValuesPayload>(raw)
            .map_err(|_| DecodeError::InvalidJson)?;

        let count = payload.n.ok_or(DecodeError::MissingCount)?;
        if count <= 0 {
            return Ok(AutoSequence::FullRange);
        }

        let mut values = payload.v.unwrap_or_default();
        let declared = count as usize;
        if values.len() < declared {
            return Err(DecodeError::ShortValueList {
                declared: count,
                supplied: values.len(),
            });
        }
        values.truncate(declared);

        Ok(AutoSequence::Explicit(values))
    }

    pub fn len(&self) -> usize {
        match self {
            AutoSequence::Empty => 0,
            AutoSequence::Explicit(values) => values.len(),
            AutoSequence::FullRange => FULL_RANGE_SIZE,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Modus an Position `index`, `None` ausserhalb der Sequenz
    pub fn get(&self, index: usize) -> Option<u8> {
        match self {
            AutoSequence::Empty => None,
            AutoSequence::Explicit(values) => values.get(index).copied(),
            AutoSequence::FullRange => (index < FULL_RANGE_SIZE).then_some(index as u8),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_explicit() {
        let seq = AutoSequence::decode(r#"{"n":3,"v":[5,10,15]}"#).unwrap();
        assert_eq!(seq.len(), 3);
        assert_eq!(seq.get(0), Some(5));
        assert_eq!(seq.get(1), Some(10));
        assert_eq!(seq.get(2), Some(15));
        assert_eq!(seq.get(3), None);
    }

    #[test]
    fn test_decode_explicit_truncates_to_count() {
        let seq = AutoSequence::decode(r#"{"n":2,"v":[1,2,3,4]}"#).unwrap();
        assert_eq!(seq.len(), 2);
        assert_eq!(seq.get(2), None);
    }

    #[test]
    fn test_decode_zero_count_is_full_range() {
        assert_eq!(
            AutoSequence::decode(r#"{"n":0}"#),
            Ok(AutoSequence::FullRange)
        );
    }

    #[test]
    fn test_decode_negative_count_is_full_range() {
        assert_eq!(
            AutoSequence::decode(r#"{"n":-3,"v":[1]}"#),
            Ok(AutoSequence::FullRange)
        );
    }

    #[test]
    fn test_decode_missing_count() {
        assert_eq!(
            AutoSequence::decode(r#"{"v":[1,2]}"#),
            Err(DecodeError::MissingCount)
        );
    }

    #[test]
    fn test_decode_short_value_list() {
        assert_eq!(
            AutoSequence::decode(r#"{"n":3,"v":[1]}"#),
            Err(DecodeError::ShortValueList {
                declared: 3,
                supplied: 1
            })
        );
    }

    #[test]
    fn test_decode_count_without_values() {
        assert_eq!(
            AutoSequence::decode(r#"{"n":2}"#),
            Err(DecodeError::ShortValueList {
                declared: 2,
                supplied: 0
            })
        );
    }

    #[test]
    fn test_decode_invalid_json() {
        assert_eq!(AutoSequence::decode(""), Err(DecodeError::InvalidJson));
        assert_eq!(
            AutoSequence::decode("not json"),
            Err(DecodeError::InvalidJson)
        );
    }

    #[test]
    fn test_decode_value_out_of_range() {
        assert_eq!(
            AutoSequence::decode(r#"{"n":1,"v":[300]}"#),
            Err(DecodeError::InvalidJson)
        );
    }

    #[test]
    fn test_full_range_indexing() {
        let seq = AutoSequence::FullRange;
        assert_eq!(seq.len(), 56);
        assert_eq!(seq.get(0), Some(0));
        assert_eq!(seq.get(55), Some(55));
        assert_eq!(seq.get(56), None);
    }

    #[test]
    fn test_empty_sequence() {
        let seq = AutoSequence::default();
        assert!(seq.is_empty());
        assert_eq!(seq.get(0), None);
    }
}
