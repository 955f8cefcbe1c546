//! Kuhne Electronic model definitions.
//!
//! Static capability data for the supported generators. The model feeds
//! the builder's defaults (baud rate, power ceiling) and the
//! [`InstrumentInfo`](benchlink_core::InstrumentInfo) reported by the
//! driver.

/// Static description of one Kuhne generator model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KuhneModel {
    /// Manufacturer display name.
    pub manufacturer: &'static str,
    /// Model display name.
    pub name: &'static str,
    /// Short machine-friendly model identifier.
    pub model_id: &'static str,
    /// Hard ceiling on the power set-point in watts.
    pub max_power_watts: u16,
    /// Tunable frequency range in MHz.
    pub frequency_range_mhz: (u16, u16),
    /// Factory serial configuration baud rate.
    pub default_baud: u32,
}

/// The KU SG 2.45-250 A, a 2.45 GHz ISM-band microwave generator.
pub fn ku_sg_2_45_250a() -> KuhneModel {
    KuhneModel {
        manufacturer: "Kuhne Electronic",
        name: "KU SG 2.45-250 A",
        model_id: "KUSG245-250A",
        max_power_watts: 250,
        frequency_range_mhz: (2400, 2500),
        default_baud: 115_200,
    }
}
