// Raw sensor samples are transmitted as 16-bit integers spread linearly over the
// sensor's physical range. These helpers undo that encoding. They are plain
// linear rescales: nothing is clamped, so a raw value outside the sensor's
// nominal range yields a proportionally out-of-range physical value.

/// Magnitude of the signed 16-bit raw domain.
pub const INT16_DOMAIN: f64 = 32768.0;
/// Magnitude of the unsigned 16-bit raw domain.
pub const UINT16_DOMAIN: f64 = 65536.0;

/// Physical range `[min, max]` a sensor channel is scaled over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionRange {
    pub min: f64,
    pub max: f64,
}

impl ConversionRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// DHT22 temperature, degrees Celsius.
pub const DHT_TEMPERATURE: ConversionRange = ConversionRange::new(-40.0, 120.0);
/// DHT22 relative humidity, percent.
pub const DHT_HUMIDITY: ConversionRange = ConversionRange::new(0.0, 100.0);
/// Temperature reported by the radio module itself, degrees Celsius.
pub const ATA_TEMPERATURE: ConversionRange = ConversionRange::new(-60.0, 60.0);

pub fn int16_to_float(raw: i16, range: ConversionRange) -> f64 {
    let factor = INT16_DOMAIN / range.span();
    f64::from(raw) / factor
}

pub fn uint16_to_float(raw: u16, range: ConversionRange) -> f64 {
    let factor = UINT16_DOMAIN / range.span();
    f64::from(raw) / factor
}
