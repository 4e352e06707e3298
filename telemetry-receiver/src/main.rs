mod line;

use crate::line::{Line, LineAssembler};
use clap::Parser;
use std::{io::Read, time::Duration};
use tracing::{debug, error, info, warn};

/// Tool to receive telemetry frames from a climate transmitter.
#[derive(Parser)]
struct Cli {
    /// Serial port
    #[arg(short, long)]
    port: String,

    /// Serial baud rate
    #[arg(short, long, default_value = "115200")]
    baud: u32,

    /// Also log every raw line as received
    #[arg(long)]
    raw: bool,
}

fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let port = serialport::new(&cli.port, cli.baud)
        .timeout(Duration::from_millis(10))
        .open();

    match port {
        Ok(port) => {
            info!("Listening on {} at {} baud", cli.port, cli.baud);

            let mut assembler = LineAssembler::default();

            for b in port.bytes().flatten() {
                match assembler.push(b) {
                    Some(Line::Complete(line)) => handle_line(&line, cli.raw),
                    Some(Line::Overlong) => warn!("Discarded overlong line"),
                    None => {}
                }
            }
        }
        Err(e) => {
            error!("Failed to open port: {}", e);
            ::std::process::exit(1);
        }
    }
}

fn handle_line(line: &str, raw: bool) {
    if raw {
        info!("Raw: {}", line);
    } else {
        debug!("Raw: {}", line);
    }

    match climate_transmitter_core::parse(line) {
        Ok(reading) => info!(
            "Temperature: {:.2} °C, humidity: {:.2} %RH",
            reading.temperature, reading.humidity
        ),
        Err(e) => warn!("Failed to parse frame \"{}\": {}", line, e),
    }
}
