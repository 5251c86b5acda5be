use std::time::Duration;

use ads1115_hal::{Config, DataRate, Gain, Mode};
use clap::{ArgAction, Parser, ValueEnum};

use crate::read::ReadArgs;
use crate::util;

/// Bring-up tool for the ADS1115 16-bit I2C ADC
///
/// Talks to an ADS1115 on a Linux I2C bus, such as /dev/i2c-1 on a Raspberry
/// Pi. Every invocation programs the device with the settings given by the
/// global options, then runs a single command.
///
/// Single-shot conversions are detected by polling the device unless
/// --ready-pin names the GPIO wired to ALERT/RDY, in which case the comparator
/// is set up as a conversion-ready signal and the pin is watched instead.
#[derive(Debug, Parser)]
#[command(version, about)]
pub(crate) struct Cli {
    /// I2C bus number, as in /dev/i2c-N
    #[arg(short, long, default_value_t = 1)]
    pub(crate) bus: u8,
    /// Device address in hexadecimal, 0x48 to 0x4B
    #[arg(short, long, default_value = "0x48", value_parser = util::u8_from_hex)]
    pub(crate) address: u8,
    /// Bus transaction timeout in milliseconds
    #[arg(long, default_value_t = 50)]
    pub(crate) timeout_ms: u64,
    /// Full-scale range in volts
    #[arg(short, long, default_value = "2.048")]
    pub(crate) gain: GainArg,
    /// Data rate in samples per second
    #[arg(short, long, default_value = "128")]
    pub(crate) rate: RateArg,
    /// Operating mode
    #[arg(short, long, default_value = "single-shot")]
    pub(crate) mode: ModeArg,
    /// BCM GPIO number wired to ALERT/RDY
    #[arg(long)]
    pub(crate) ready_pin: Option<u8>,
    /// Log more (-v info, -vv debug, -vvv register traffic)
    #[arg(short, long, action = ArgAction::Count)]
    pub(crate) verbose: u8,
    #[command(subcommand)]
    pub(crate) command: Commands,
}

impl Cli {
    /// Driver configuration described by the global options.
    pub(crate) fn config(&self) -> Config {
        let config = Config::default()
            .with_address(self.address)
            .with_timeout(Duration::from_millis(self.timeout_ms))
            .with_gain(self.gain.into())
            .with_data_rate(self.rate.into())
            .with_mode(self.mode.into());
        match self.ready_pin {
            Some(pin) => config.with_conversion_ready_comparator().with_ready_pin(pin),
            None => config,
        }
    }
}

#[derive(Debug, Parser)]
pub(crate) enum Commands {
    /// List the addresses that answer on the bus. The device is not started.
    Scan,
    /// Take readings, blocking or by polling for completion.
    Read(ReadArgs),
    /// Show the configuration register, raw and decoded.
    Config,
    /// Check that the device answers.
    Probe,
    /// Check the device once more, then print the driver's health counters.
    Health,
    /// Run many conversions back to back, then print the health counters.
    Stress {
        /// Number of conversions.
        #[arg(short, long, default_value_t = 100)]
        count: u32,
        /// Time allowed for each conversion, in milliseconds.
        #[arg(long, default_value_t = 200)]
        wait_ms: u32,
    },
    /// Show the comparator thresholds, or set them if both are given.
    Thresholds {
        /// Low threshold as a raw conversion code.
        #[arg(long, requires = "high", allow_negative_numbers = true)]
        low: Option<i16>,
        /// High threshold as a raw conversion code.
        #[arg(long, requires = "low", allow_negative_numbers = true)]
        high: Option<i16>,
    },
    /// Make ALERT/RDY pulse at the end of every conversion.
    ReadyPin,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum GainArg {
    /// ±6.144 V
    #[value(name = "6.144")]
    V6_144,
    /// ±4.096 V
    #[value(name = "4.096")]
    V4_096,
    /// ±2.048 V
    #[value(name = "2.048")]
    V2_048,
    /// ±1.024 V
    #[value(name = "1.024")]
    V1_024,
    /// ±0.512 V
    #[value(name = "0.512")]
    V0_512,
    /// ±0.256 V
    #[value(name = "0.256")]
    V0_256,
}

impl From<GainArg> for Gain {
    fn from(value: GainArg) -> Self {
        match value {
            GainArg::V6_144 => Gain::Fsr6_144V,
            GainArg::V4_096 => Gain::Fsr4_096V,
            GainArg::V2_048 => Gain::Fsr2_048V,
            GainArg::V1_024 => Gain::Fsr1_024V,
            GainArg::V0_512 => Gain::Fsr0_512V,
            GainArg::V0_256 => Gain::Fsr0_256V,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum RateArg {
    #[value(name = "8")]
    Sps8,
    #[value(name = "16")]
    Sps16,
    #[value(name = "32")]
    Sps32,
    #[value(name = "64")]
    Sps64,
    #[value(name = "128")]
    Sps128,
    #[value(name = "250")]
    Sps250,
    #[value(name = "475")]
    Sps475,
    #[value(name = "860")]
    Sps860,
}

impl From<RateArg> for DataRate {
    fn from(value: RateArg) -> Self {
        match value {
            RateArg::Sps8 => DataRate::Sps8,
            RateArg::Sps16 => DataRate::Sps16,
            RateArg::Sps32 => DataRate::Sps32,
            RateArg::Sps64 => DataRate::Sps64,
            RateArg::Sps128 => DataRate::Sps128,
            RateArg::Sps250 => DataRate::Sps250,
            RateArg::Sps475 => DataRate::Sps475,
            RateArg::Sps860 => DataRate::Sps860,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum ModeArg {
    /// Convert once per request, powering down in between.
    SingleShot,
    /// Convert continuously.
    Continuous,
}

impl From<ModeArg> for Mode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::SingleShot => Mode::SingleShot,
            ModeArg::Continuous => Mode::Continuous,
        }
    }
}
