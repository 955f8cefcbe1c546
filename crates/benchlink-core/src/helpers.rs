//! Formatting helpers for instrument front-ends.
//!
//! Small utility functions that status displays and CLI tools need when
//! presenting instrument readbacks.

/// Format a frequency in kilohertz as a human-readable MHz string.
///
/// Returns a string like `"2450.010 MHz"` with three decimal places,
/// matching the 10 kHz resolution of fine-step tuning.
///
/// # Example
///
/// ```
/// use benchlink_core::format_frequency_khz;
///
/// assert_eq!(format_frequency_khz(2_450_010), "2450.010 MHz");
/// assert_eq!(format_frequency_khz(2_400_000), "2400.000 MHz");
/// ```
pub fn format_frequency_khz(khz: u32) -> String {
    let mhz = f64::from(khz) / 1_000.0;
    format!("{mhz:.3} MHz")
}

/// Format a voltage reading with two decimal places.
///
/// # Example
///
/// ```
/// use benchlink_core::format_voltage;
///
/// assert_eq!(format_voltage(5.0212), "5.02 V");
/// assert_eq!(format_voltage(31.9), "31.90 V");
/// ```
pub fn format_voltage(volts: f64) -> String {
    format!("{volts:.2} V")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_frequency_fine_resolution() {
        assert_eq!(format_frequency_khz(2_450_010), "2450.010 MHz");
        assert_eq!(format_frequency_khz(2_499_990), "2499.990 MHz");
    }

    #[test]
    fn format_frequency_coarse_values() {
        assert_eq!(format_frequency_khz(2_400_000), "2400.000 MHz");
        assert_eq!(format_frequency_khz(2_500_000), "2500.000 MHz");
    }

    #[test]
    fn format_frequency_zero() {
        assert_eq!(format_frequency_khz(0), "0.000 MHz");
    }

    #[test]
    fn format_voltage_rounds_to_centivolts() {
        assert_eq!(format_voltage(5.0212), "5.02 V");
        assert_eq!(format_voltage(32.006), "32.01 V");
        assert_eq!(format_voltage(0.0), "0.00 V");
    }
}
