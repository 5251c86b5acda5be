use ads1115_hal::{ADS1115, I2cTransport, InputPinSignal, StdClock};
use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use rppal::gpio::{Gpio, InputPin};
use rppal::i2c::I2c;

use cli::Commands;

mod cli;
mod comparator;
mod diagnostics;
mod read;
mod scan;
mod util;

pub(crate) type Adc = ADS1115<I2cTransport<I2c>, InputPinSignal<InputPin>>;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_logging(cli.verbose);

    let mut bus =
        I2c::with_bus(cli.bus).with_context(|| format!("opening I2C bus {}", cli.bus))?;
    if let Commands::Scan = cli.command {
        return scan::action(&mut bus);
    }
    let signal = cli.ready_pin.map(open_ready_pin).transpose()?;
    let mut adc: Adc = ADS1115::from_parts(I2cTransport::new(bus), signal, StdClock::new());
    adc.begin(cli.config())
        .with_context(|| format!("starting ADS1115 at {:#04X}", cli.address))?;

    match cli.command {
        // Handled before the device is started.
        Commands::Scan => {}
        Commands::Read(args) => read::action(&mut adc, args)?,
        Commands::Config => diagnostics::show_config(&mut adc)?,
        Commands::Probe => diagnostics::probe(&mut adc)?,
        Commands::Health => diagnostics::health(&mut adc)?,
        Commands::Stress { count, wait_ms } => diagnostics::stress(&mut adc, count, wait_ms)?,
        Commands::Thresholds { low, high } => comparator::thresholds(&mut adc, low, high)?,
        Commands::ReadyPin => comparator::ready_pin(&mut adc)?,
    }
    adc.end();
    Ok(())
}

fn open_ready_pin(pin: u8) -> anyhow::Result<InputPinSignal<InputPin>> {
    let pin = Gpio::new()
        .context("opening GPIO")?
        .get(pin)
        .with_context(|| format!("claiming GPIO {pin}"))?
        .into_input();
    Ok(InputPinSignal::new(pin))
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .init();
}

#[cfg(test)]
mod test {
    use crate::cli::Cli;

    use clap::{CommandFactory, Parser};

    #[test]
    fn check_cli_debug_asserts() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_options_build_the_driver_config() {
        let cli = Cli::try_parse_from([
            "ads1115", "-a", "0x4A", "-g", "4.096", "-r", "860", "--ready-pin", "17", "probe",
        ])
        .unwrap();
        let config = cli.config();
        assert_eq!(config.address, 0x4A);
        assert_eq!(config.gain, ads1115_hal::Gain::Fsr4_096V);
        assert_eq!(config.data_rate, ads1115_hal::DataRate::Sps860);
        assert_eq!(config.ready_pin, Some(17));
        assert!(config.is_conversion_ready_mode());
    }

    #[test]
    fn scan_needs_no_device_options() {
        let cli = Cli::try_parse_from(["ads1115", "-b", "0", "scan"]).unwrap();
        assert_eq!(cli.bus, 0);
        assert!(matches!(cli.command, crate::cli::Commands::Scan));
    }

    #[test]
    fn read_accepts_poll_with_a_differential_pair() {
        let cli = Cli::try_parse_from([
            "ads1115", "read", "--poll", "--diff", "2-3", "-c", "5", "--voltage",
        ]);
        assert!(matches!(cli.unwrap().command, crate::cli::Commands::Read(_)));
        let err = Cli::try_parse_from(["ads1115", "read", "--channel", "1", "--diff", "0-1"]);
        assert!(err.is_err());
    }

    #[test]
    fn thresholds_accept_negative_codes() {
        let cli =
            Cli::try_parse_from(["ads1115", "thresholds", "--low", "-100", "--high", "2000"])
                .unwrap();
        assert!(matches!(
            cli.command,
            crate::cli::Commands::Thresholds {
                low: Some(-100),
                high: Some(2000)
            }
        ));
    }
}
