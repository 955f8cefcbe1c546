//! Safe power-up / power-down sequence example.
//!
//! Runs the generator through the sanctioned sequence: set a conservative
//! power set-point, turn on (bias first, settle, then RF), tune for
//! lowest reflection, hold, and shut down in the reverse order (RF off
//! before bias off).
//!
//! # Usage
//!
//! ```sh
//! cargo run -p benchlink --example safe_power_cycle
//! ```

use std::time::Duration;

use benchlink::kuhne::KusgBuilder;
use benchlink::kuhne::models::ku_sg_2_45_250a;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let serial_port = "/dev/ttyUSB0";

    // Cap the set-point well below the 250 W ceiling for this bench.
    let generator = KusgBuilder::new(ku_sg_2_45_250a())
        .serial_port(serial_port)
        .power_limit(100)
        .build()
        .await?;

    // Keep enabling under serial control and start from a known set-point.
    generator.set_external_enabled(false).await?;
    generator.set_power_setpoint(20).await?;

    println!("Turning on (bias, settle, RF)...");
    generator.turn_on().await?;

    println!("Tuning at 20 W...");
    generator.tune(20).await?;

    // Let the sweep settle, then check where we ended up.
    tokio::time::sleep(Duration::from_secs(2)).await;
    println!("Forward power:   {} W", generator.power_forward().await?);
    println!("Reflected power: {} W", generator.power_reverse().await?);

    println!("Shutting down (RF off, bias off)...");
    generator.shutdown().await?;

    println!("Done.");
    Ok(())
}
