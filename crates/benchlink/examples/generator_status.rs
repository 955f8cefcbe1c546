//! Basic generator status example.
//!
//! Demonstrates connecting to a KU SG 2.45-250 A microwave generator,
//! reading every readback the device exposes, and printing a one-shot
//! status report -- the same set of values a control panel would poll.
//!
//! # Requirements
//!
//! - A KU SG 2.45-250 A connected via USB/RS-232
//! - The serial port path adjusted for your system (e.g., `/dev/ttyUSB0`
//!   on Linux, `COM3` on Windows)
//!
//! # Usage
//!
//! ```sh
//! cargo run -p benchlink --example generator_status
//! ```

use std::time::Duration;

use benchlink::kuhne::KusgBuilder;
use benchlink::kuhne::models::ku_sg_2_45_250a;
use benchlink::{format_frequency_khz, format_voltage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Adjust this to match your system's serial port.
    let serial_port = "/dev/ttyUSB0";

    println!("Connecting to generator on {}...", serial_port);

    let generator = KusgBuilder::new(ku_sg_2_45_250a())
        .serial_port(serial_port)
        .command_timeout(Duration::from_millis(500))
        .build()
        .await?;

    let model = generator.model();
    println!(
        "Connected: {} {} (firmware {})",
        model.manufacturer,
        model.name,
        generator.version().await?
    );

    // Supply rails and temperature.
    println!("5V rail:  {}", format_voltage(generator.voltage_5v().await?));
    println!("32V rail: {}", format_voltage(generator.voltage_32v().await?));
    println!("Temperature: {:.1} °C", generator.temperature().await?);

    // Frequency: the readback format depends on the step mode.
    if generator.fine_steps_enabled().await? {
        let khz = generator.frequency_fine().await?;
        println!("Frequency: {} (fine steps)", format_frequency_khz(khz));
    } else {
        let mhz = generator.frequency_coarse().await?;
        println!("Frequency: {} MHz (coarse steps)", mhz);
    }

    // Power and protection.
    println!("Power set-point: {} W", generator.power_setpoint().await?);
    println!("Forward power:   {} W", generator.power_forward().await?);
    println!("Reflected power: {} W", generator.power_reverse().await?);
    println!("Reflection limit: {} W", generator.reflection_limit().await?);

    // Switch states.
    println!("External enable: {}", generator.external_enabled().await?);
    println!("Bias:            {}", generator.bias_enabled().await?);
    println!("RF output:       {}", generator.rf_enabled().await?);
    println!("Pulse mode:      {}", generator.pulse_mode_enabled().await?);

    // Pulse timing.
    println!("Pulse width: {} ms", generator.pulse_width().await?);
    println!("Off time:    {} ms", generator.off_time().await?);

    println!("\nDone.");
    Ok(())
}
