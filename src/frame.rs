//! Decoder for the fixed 8-byte uplink frame sent by the environment sensor.
//!
//! Layout (little-endian):
//!
//! | offset | width | type | meaning              |
//! |--------|-------|------|----------------------|
//! | 0      | 1     | u8   | status code          |
//! | 1      | 2     | i16  | raw DHT temperature  |
//! | 3      | 2     | u16  | raw DHT humidity     |
//! | 5      | 2     | i16  | raw ATA temperature  |
//! | 7      | 1     | u8   | last-message flag    |
//!
//! Decoding either yields a fully populated [`Frame`] or a [`DecodeError`];
//! there is no partially decoded state.

use crate::conversions::{self, ATA_TEMPERATURE, DHT_HUMIDITY, DHT_TEMPERATURE};
use crate::point::FieldValue;
use thiserror::Error;

pub const FRAME_LEN: usize = 8;

#[derive(Debug, Error, PartialEq)]
pub enum DecodeError {
    #[error("malformed hex payload {input:?}: {reason}")]
    MalformedHex { input: String, reason: hex::FromHexError },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub status: u8,
    pub dht_temperature: f64,
    pub dht_humidity: f64,
    pub ata_temperature: f64,
    pub last_message: u8,
}

impl Frame {
    pub fn decode(hex_data: &str) -> Result<Self, DecodeError> {
        let trimmed = hex_data.trim();
        let mut buf = [0u8; FRAME_LEN];
        hex::decode_to_slice(trimmed, &mut buf).map_err(|reason| DecodeError::MalformedHex {
            input: trimmed.to_string(),
            reason,
        })?;
        Ok(Self::from_bytes(&buf))
    }

    pub fn from_bytes(buf: &[u8; FRAME_LEN]) -> Self {
        let raw_temp = i16::from_le_bytes([buf[1], buf[2]]);
        let raw_humi = u16::from_le_bytes([buf[3], buf[4]]);
        let raw_ata = i16::from_le_bytes([buf[5], buf[6]]);

        Self {
            status: buf[0],
            dht_temperature: conversions::int16_to_float(raw_temp, DHT_TEMPERATURE),
            dht_humidity: conversions::uint16_to_float(raw_humi, DHT_HUMIDITY),
            ata_temperature: conversions::int16_to_float(raw_ata, ATA_TEMPERATURE),
            last_message: buf[7],
        }
    }

    /// Field set written to the store, keyed by the names dashboards query on.
    pub fn fields(&self) -> Vec<(String, FieldValue)> {
        vec![
            ("status".to_string(), FieldValue::Integer(i64::from(self.status))),
            ("dhtTemp".to_string(), FieldValue::Float(self.dht_temperature)),
            ("dhtHumi".to_string(), FieldValue::Float(self.dht_humidity)),
            ("ataTemp".to_string(), FieldValue::Float(self.ata_temperature)),
            ("lastMsg".to_string(), FieldValue::Integer(i64::from(self.last_message))),
        ]
    }
}

pub fn decode(hex_data: &str) -> Result<Frame, DecodeError> {
    Frame::decode(hex_data)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "01320abe14280a00";

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_decode_sample_frame() {
        let frame = decode(SAMPLE).expect("sample frame decodes");
        assert_eq!(frame.status, 1);
        assert_eq!(frame.last_message, 0);
        // raw 2610, 5310 and 2600 respectively
        assert!(close(frame.dht_temperature, 12.744), "{}", frame.dht_temperature);
        assert!(close(frame.dht_humidity, 8.102), "{}", frame.dht_humidity);
        assert!(close(frame.ata_temperature, 9.521), "{}", frame.ata_temperature);
    }

    #[test]
    fn test_decode_is_deterministic() {
        let a = decode(SAMPLE).unwrap();
        let b = decode(SAMPLE).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_decode_accepts_uppercase_and_whitespace() {
        let frame = decode("  01320ABE14280A00\n").unwrap();
        assert_eq!(frame, decode(SAMPLE).unwrap());
    }

    #[test]
    fn test_decode_negative_temperatures() {
        // 0xff38 = -200, 0xfc18 = -1000
        let frame = decode("0238ff000018fc01").unwrap();
        assert_eq!(frame.status, 2);
        assert_eq!(frame.last_message, 1);
        assert!(frame.dht_temperature < 0.0);
        assert!(close(frame.dht_temperature, -200.0 / 204.8));
        assert!(close(frame.ata_temperature, -1000.0 / (32768.0 / 120.0)));
        assert_eq!(frame.dht_humidity, 0.0);
    }

    #[test]
    fn test_decode_rejects_wrong_length() {
        for input in ["", "01", "01320abe14280a", "01320abe14280a0000"] {
            let err = decode(input).unwrap_err();
            assert!(matches!(err, DecodeError::MalformedHex { .. }), "{input}");
        }
    }

    #[test]
    fn test_decode_rejects_odd_length() {
        assert!(matches!(
            decode("01320abe14280a0"),
            Err(DecodeError::MalformedHex { reason: hex::FromHexError::OddLength, .. })
        ));
    }

    #[test]
    fn test_decode_rejects_non_hex() {
        let err = decode("zz320abe14280a00").unwrap_err();
        assert!(matches!(
            err,
            DecodeError::MalformedHex { reason: hex::FromHexError::InvalidHexCharacter { c: 'z', index: 0 }, .. }
        ));
        assert!(err.to_string().contains("zz320abe14280a00"));
    }

    #[test]
    fn test_fields_use_wire_names() {
        let names: Vec<String> = decode(SAMPLE).unwrap().fields().into_iter().map(|(k, _)| k).collect();
        assert_eq!(names, ["status", "dhtTemp", "dhtHumi", "ataTemp", "lastMsg"]);
    }
}
