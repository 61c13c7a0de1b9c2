// Derived from asciinema (https://github.com/asciinema/asciinema)
// Copyright (c) asciinema authors
// Licensed under GPL-3.0-or-later
// Vendored by AGR project

use std::time::Duration;

/// Parse a record interval (seconds, microsecond precision).
///
/// The number is read through its shortest decimal form so that a value
/// written as `0.000001` comes back as exactly one microsecond.
pub fn parse_interval(value: &serde_json::Value) -> Result<Duration, String> {
    let number = value
        .as_f64()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| v.to_string())
        .ok_or_else(|| format!("expected a non-negative interval, got {value}"))?;

    match number.split_once('.') {
        Some((left, right)) => {
            let secs: u64 = left.parse().map_err(|e| format!("{e}"))?;
            let digits = &right[..6.min(right.len())];
            let micros: u64 = format!("{digits:0<6}").parse().map_err(|e| format!("{e}"))?;
            Ok(Duration::from_secs(secs) + Duration::from_micros(micros))
        }
        None => {
            let secs: u64 = number.parse().map_err(|e| format!("{e}"))?;
            Ok(Duration::from_secs(secs))
        }
    }
}

/// Format an interval as seconds with six decimals.
pub fn format_interval(duration: Duration) -> String {
    format!("{}.{:06}", duration.as_secs(), duration.subsec_micros())
}

/// Quantizer using error diffusion based on Bresenham algorithm.
/// It ensures the accumulated error at any point is less than Q/2.
pub struct Quantizer {
    q: i128,
    error: i128,
}

impl Quantizer {
    pub fn new(q: u128) -> Self {
        Quantizer {
            q: q as i128,
            error: 0,
        }
    }

    pub fn next(&mut self, value: u128) -> u128 {
        let error_corrected_value = value as i128 + self.error;
        let steps = ((error_corrected_value + self.q / 2) / self.q).max(0);
        let quantized_value = steps * self.q;

        self.error = error_corrected_value - quantized_value;

        quantized_value as u128
    }
}
