//! Diode Lab - virtual diode characterisation bench
//!
//! # Usage
//!
//! ```bash
//! diode-lab serve --bind 127.0.0.1:5000
//! diode-lab measure --material Zener --voltage -6
//! diode-lab sweep --material Ge --start -1 --end 1 --csv > ge.csv
//! ```

use std::io::{self, Write};
use std::net::SocketAddr;

use clap::{Parser, Subcommand};
use diode_lab::{
    config::{ServerConfig, DEFAULT_BIND},
    error::{LabError, Result},
    lab::{self, SweepRange, SweepResult},
    logging::{init_logging, LogConfig, LogFormat, LogLevel},
    server, DiodeParameters, Material, DEFAULT_SWEEP_END, DEFAULT_SWEEP_START,
    DEFAULT_ZENER_VOLTAGE, REFERENCE_TEMPERATURE_C,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Diode I-V characteristic lab
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Log level (RUST_LOG takes precedence)
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the JSON API
    Serve {
        /// Listen address
        #[arg(short, long, default_value = DEFAULT_BIND)]
        bind: SocketAddr,

        /// Seed for measurement noise and mystery picks
        #[arg(long)]
        seed: Option<u64>,

        /// Disable cross-origin requests
        #[arg(long)]
        no_cors: bool,
    },

    /// Take a single noisy reading and print it as JSON
    Measure {
        /// Si, Ge, RedLED, BlueLED or Zener
        #[arg(short, long, default_value = "Si")]
        material: Material,

        /// Junction temperature in degrees C
        #[arg(short, long, default_value_t = REFERENCE_TEMPERATURE_C, allow_negative_numbers = true)]
        temp: f64,

        /// Bias voltage in volts
        #[arg(short, long, default_value_t = 0.0, allow_negative_numbers = true)]
        voltage: f64,

        /// Zener breakdown magnitude in volts
        #[arg(long, default_value_t = DEFAULT_ZENER_VOLTAGE)]
        zener: f64,

        /// Seed for the noise generator
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Sweep the I-V curve and print it as JSON or CSV
    Sweep {
        /// Si, Ge, RedLED, BlueLED or Zener
        #[arg(short, long, default_value = "Si")]
        material: Material,

        /// Junction temperature in degrees C
        #[arg(short, long, default_value_t = REFERENCE_TEMPERATURE_C, allow_negative_numbers = true)]
        temp: f64,

        /// First voltage of the sweep
        #[arg(long, default_value_t = DEFAULT_SWEEP_START, allow_negative_numbers = true)]
        start: f64,

        /// Last voltage of the sweep
        #[arg(long, default_value_t = DEFAULT_SWEEP_END, allow_negative_numbers = true)]
        end: f64,

        /// Zener breakdown magnitude in volts
        #[arg(long, default_value_t = DEFAULT_ZENER_VOLTAGE)]
        zener: f64,

        /// Emit `v,i,p` rows instead of JSON
        #[arg(long)]
        csv: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&LogConfig {
        level: args.log_level,
        format: args.log_format,
        filter: None,
    });

    match args.command {
        Command::Serve {
            bind,
            seed,
            no_cors,
        } => {
            let config = ServerConfig::new()
                .with_bind(bind)
                .with_seed(seed)
                .with_cors(!no_cors);
            server::serve(config).await
        }

        Command::Measure {
            material,
            temp,
            voltage,
            zener,
            seed,
        } => {
            let params = DiodeParameters::with_zener_voltage(material, temp, zener)?;
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let reading = lab::measure_at(&params, voltage, &mut rng)?;
            println!("{}", serde_json::to_string_pretty(&reading)?);
            Ok(())
        }

        Command::Sweep {
            material,
            temp,
            start,
            end,
            zener,
            csv,
        } => {
            let params = DiodeParameters::with_zener_voltage(material, temp, zener)?;
            let curve = lab::sweep_with(&params, SweepRange::new(start, end)?)?;
            if csv {
                write_csv(&curve).map_err(|e| LabError::io("writing CSV", e))
            } else {
                println!("{}", serde_json::to_string_pretty(&curve)?);
                Ok(())
            }
        }
    }
}

fn write_csv(curve: &SweepResult) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "v,i,p")?;
    for sample in &curve.data {
        writeln!(out, "{},{:e},{:e}", sample.voltage, sample.current, sample.power)?;
    }
    out.flush()
}
