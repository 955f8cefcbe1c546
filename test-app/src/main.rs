// benchlink test application -- CLI tool for exercising the generator
// driver against real hardware or a mock transport.
//
// Usage:
//   benchlink-test-app --port /dev/ttyUSB0 info
//   benchlink-test-app --port /dev/ttyUSB0 status
//   benchlink-test-app --port /dev/ttyUSB0 get power_forward
//   benchlink-test-app --port /dev/ttyUSB0 --power-limit 100 set power_setpoint 20
//   benchlink-test-app --port /dev/ttyUSB0 on
//   benchlink-test-app --port /dev/ttyUSB0 tune 20
//   benchlink-test-app --port /dev/ttyUSB0 invoke clear_error
//   benchlink-test-app --port /dev/ttyUSB0 invoke tune 20
//   benchlink-test-app --mock info
//   benchlink-test-app --mock params
//
// `get` and `set` go through the by-name Instrument surface, so this tool
// doubles as a smoke test for what a GUI control panel would exercise.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use benchlink::kuhne::models::ku_sg_2_45_250a;
use benchlink::kuhne::{Kusg245, KusgBuilder};
use benchlink::{format_frequency_khz, format_voltage, Access, Instrument, Value};
use benchlink_test_harness::MockTransport;

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// benchlink test application -- exercises the generator driver from the
/// command line.
#[derive(Parser)]
#[command(name = "benchlink-test-app", version, about)]
struct Cli {
    /// Serial port path (e.g. /dev/ttyUSB0, COM3).
    /// Required unless --mock is used.
    #[arg(long)]
    port: Option<String>,

    /// Override the factory baud rate (115200).
    #[arg(long)]
    baud: Option<u32>,

    /// Power set-point ceiling in watts (1-250). Every set-point and tune
    /// power is truncated to this before transmission.
    #[arg(long)]
    power_limit: Option<u16>,

    /// Reply timeout in milliseconds.
    #[arg(long, default_value_t = 500)]
    timeout_ms: u64,

    /// Use a mock transport instead of a real serial port.
    /// Useful for verifying CLI parsing and builder wiring without
    /// hardware; only commands that skip device I/O (`info`, `params`)
    /// complete against an empty mock.
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print instrument identification and configuration.
    Info,
    /// Print every readback the generator exposes.
    Status,
    /// List the parameters and actions on the by-name surface.
    Params,
    /// Read one parameter by name.
    Get {
        /// Parameter name (see `params`).
        name: String,
    },
    /// Write one parameter by name.
    Set {
        /// Parameter name (see `params`).
        name: String,
        /// New value, parsed according to the parameter's kind.
        value: String,
    },
    /// Invoke an action by name.
    Invoke {
        /// Action name (see `params`).
        name: String,
        /// Argument, parsed according to the action's declared kind.
        arg: Option<String>,
    },
    /// Safe turn-on: bias, settling delay, RF.
    On,
    /// Safe shutdown: RF off, then bias off.
    Off,
    /// Sweep for the frequency with lowest reflection at the given power.
    Tune {
        /// Tuning power in watts (truncated to the power limit).
        watts: u16,
    },
    /// Clear the VSWR error after a reflection-limit trip.
    ClearError,
    /// Persist the current settings to EEPROM.
    Store,
}

// ---------------------------------------------------------------------------
// Connection
// ---------------------------------------------------------------------------

async fn connect(cli: &Cli) -> Result<Kusg245> {
    let mut builder = KusgBuilder::new(ku_sg_2_45_250a())
        .command_timeout(Duration::from_millis(cli.timeout_ms));

    if let Some(limit) = cli.power_limit {
        builder = builder.power_limit(limit);
    }

    if cli.mock {
        let generator = builder.build_with_transport(Box::new(MockTransport::new()))?;
        return Ok(generator);
    }

    let Some(port) = &cli.port else {
        bail!("--port is required unless --mock is given");
    };
    builder = builder.serial_port(port);
    if let Some(baud) = cli.baud {
        builder = builder.baud_rate(baud);
    }

    let generator = builder
        .build()
        .await
        .with_context(|| format!("failed to connect on {port}"))?;
    Ok(generator)
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn print_info(generator: &Kusg245) {
    let info = Instrument::info(generator);
    let model = generator.model();
    println!("{} {} (id: {})", info.manufacturer, info.model_name, info.model_id);
    println!(
        "Frequency range: {}-{} MHz",
        model.frequency_range_mhz.0, model.frequency_range_mhz.1
    );
    println!("Model ceiling: {} W", model.max_power_watts);
    println!("Configured power limit: {} W", generator.power_limit());
}

async fn print_status(generator: &Kusg245) -> Result<()> {
    println!("Firmware:    {}", generator.version().await?);
    println!("Temperature: {:.1} °C", generator.temperature().await?);
    println!("5V rail:     {}", format_voltage(generator.voltage_5v().await?));
    println!("32V rail:    {}", format_voltage(generator.voltage_32v().await?));

    if generator.fine_steps_enabled().await? {
        let khz = generator.frequency_fine().await?;
        println!("Frequency:   {} (fine steps)", format_frequency_khz(khz));
    } else {
        let mhz = generator.frequency_coarse().await?;
        println!("Frequency:   {} MHz (coarse steps)", mhz);
    }

    println!("Set-point:   {} W", generator.power_setpoint().await?);
    println!("Forward:     {} W", generator.power_forward().await?);
    println!("Reflected:   {} W", generator.power_reverse().await?);
    println!("Refl. limit: {} W", generator.reflection_limit().await?);

    println!("External:    {}", generator.external_enabled().await?);
    println!("Bias:        {}", generator.bias_enabled().await?);
    println!("RF output:   {}", generator.rf_enabled().await?);
    println!("Pulse mode:  {}", generator.pulse_mode_enabled().await?);
    println!("Pulse width: {} ms", generator.pulse_width().await?);
    println!("Off time:    {} ms", generator.off_time().await?);

    Ok(())
}

fn print_params(generator: &Kusg245) {
    println!("Parameters:");
    for p in generator.parameters() {
        let access = match p.access {
            Access::ReadOnly => "ro",
            Access::ReadWrite => "rw",
        };
        let kind = p.kind.to_string();
        let unit = p.unit.unwrap_or("-");
        println!(
            "  {:<20} {:<6} {:<3} {:<4} {}",
            p.name, kind, access, unit, p.summary
        );
    }

    println!("Actions:");
    for a in generator.actions() {
        let arg = match a.arg {
            Some(kind) => kind.to_string(),
            None => "-".to_string(),
        };
        println!("  {:<20} arg: {:<5} {}", a.name, arg, a.summary);
    }
}

async fn get_parameter(generator: &Kusg245, name: &str) -> Result<()> {
    let value = generator.get(name).await?;
    match generator.parameter(name).and_then(|p| p.unit) {
        Some(unit) => println!("{value} {unit}"),
        None => println!("{value}"),
    }
    Ok(())
}

async fn set_parameter(generator: &Kusg245, name: &str, raw: &str) -> Result<()> {
    let descriptor = generator
        .parameter(name)
        .with_context(|| format!("unknown parameter: {name}"))?;
    if descriptor.access != Access::ReadWrite {
        bail!("parameter {name} is read-only");
    }

    let value = Value::parse(descriptor.kind, raw)
        .with_context(|| format!("bad value for {name}"))?;
    generator.set(name, value).await?;
    println!("ok");
    Ok(())
}

async fn invoke_action(generator: &Kusg245, name: &str, raw: Option<&str>) -> Result<()> {
    let descriptor = generator
        .action(name)
        .with_context(|| format!("unknown action: {name}"))?;

    let arg = match (descriptor.arg, raw) {
        (Some(kind), Some(raw)) => Some(
            Value::parse(kind, raw).with_context(|| format!("bad argument for {name}"))?,
        ),
        (Some(_), None) => bail!("action {name} requires an argument"),
        (None, Some(_)) => bail!("action {name} takes no argument"),
        (None, None) => None,
    };

    generator.invoke(name, arg).await?;
    println!("ok");
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let generator = connect(&cli).await?;

    match &cli.command {
        Command::Info => print_info(&generator),
        Command::Status => print_status(&generator).await?,
        Command::Params => print_params(&generator),
        Command::Get { name } => get_parameter(&generator, name).await?,
        Command::Set { name, value } => set_parameter(&generator, name, value).await?,
        Command::Invoke { name, arg } => invoke_action(&generator, name, arg.as_deref()).await?,
        Command::On => {
            generator.turn_on().await?;
            println!("RF on");
        }
        Command::Off => {
            generator.shutdown().await?;
            println!("RF off, bias off");
        }
        Command::Tune { watts } => {
            generator.tune(*watts).await?;
            println!("tune started at {} W (clamped to the power limit)", watts);
        }
        Command::ClearError => {
            generator.clear_vswr_error().await?;
            println!("VSWR error cleared");
        }
        Command::Store => {
            generator.store_settings().await?;
            println!("settings stored to EEPROM");
        }
    }

    Ok(())
}
