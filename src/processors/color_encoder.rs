use crate::error::{ProcessingError, Result};

/// Plasma colour scale sampled at 0.0, 0.1, ..., 1.0.
const PLASMA_STOPS: [(u8, u8, u8); 11] = [
    (0x0d, 0x08, 0x87),
    (0x41, 0x04, 0x9d),
    (0x6a, 0x00, 0xa8),
    (0x8f, 0x0d, 0xa4),
    (0xb1, 0x2a, 0x90),
    (0xcc, 0x47, 0x78),
    (0xe1, 0x64, 0x62),
    (0xf2, 0x84, 0x4b),
    (0xfc, 0xa6, 0x36),
    (0xfc, 0xce, 0x25),
    (0xf0, 0xf9, 0x21),
];

/// Maps a normalized level to a `#rrggbb` colour on the plasma scale.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorEncoder;

impl ColorEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Callers normalize first; values outside [0, 1] are rejected, not clamped.
    pub fn encode(&self, value: f64) -> Result<String> {
        let (r, g, b) = self.rgb(value)?;
        Ok(format!("#{:02x}{:02x}{:02x}", r, g, b))
    }

    pub fn rgb(&self, value: f64) -> Result<(u8, u8, u8)> {
        if !(0.0..=1.0).contains(&value) {
            return Err(ProcessingError::NormalizedValueOutOfRange(value));
        }

        let segments = (PLASMA_STOPS.len() - 1) as f64;
        let position = value * segments;
        let index = (position.floor() as usize).min(PLASMA_STOPS.len() - 2);
        let t = position - index as f64;

        let (r0, g0, b0) = PLASMA_STOPS[index];
        let (r1, g1, b1) = PLASMA_STOPS[index + 1];

        Ok((lerp(r0, r1, t), lerp(g0, g1, t), lerp(b0, b1, t)))
    }
}

fn lerp(from: u8, to: u8, t: f64) -> u8 {
    let value = f64::from(from) + (f64::from(to) - f64::from(from)) * t;
    value.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        let encoder = ColorEncoder::new();
        assert_eq!(encoder.encode(0.0).unwrap(), "#0d0887");
        assert_eq!(encoder.encode(1.0).unwrap(), "#f0f921");
        assert_eq!(encoder.encode(0.5).unwrap(), "#cc4778");
    }

    #[test]
    fn test_deterministic() {
        let encoder = ColorEncoder::new();
        for i in 0..=20 {
            let v = f64::from(i) / 20.0;
            assert_eq!(encoder.encode(v).unwrap(), encoder.encode(v).unwrap());
        }
    }

    #[test]
    fn test_evenly_spaced_samples_are_distinct() {
        let encoder = ColorEncoder::new();
        let colors: Vec<String> = (0..10)
            .map(|i| encoder.encode(f64::from(i) / 9.0).unwrap())
            .collect();

        for pair in colors.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
        assert_ne!(colors[0], colors[9]);
    }

    #[test]
    fn test_interpolates_between_stops() {
        // Halfway between #0d0887 and #41049d
        assert_eq!(ColorEncoder::new().rgb(0.05).unwrap(), (0x27, 0x06, 0x92));
    }

    #[test]
    fn test_out_of_range_rejected() {
        let encoder = ColorEncoder::new();
        for v in [-0.01, 1.0001, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                encoder.encode(v),
                Err(ProcessingError::NormalizedValueOutOfRange(_))
            ));
        }
    }
}
