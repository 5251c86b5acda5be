use std::thread;
use std::time::{Duration, Instant};

use ads1115_hal::{Mode, Mux};
use anyhow::{Context, bail};
use clap::{ValueEnum, value_parser};

use crate::Adc;

#[derive(Debug, clap::Args)]
pub(crate) struct ReadArgs {
    /// Number of readings to take.
    #[arg(short, long, default_value_t = 1)]
    count: u32,
    /// Measure this input against ground.
    #[arg(long, value_parser = value_parser!(u8).range(0..=3), conflicts_with = "diff")]
    channel: Option<u8>,
    /// Measure between this pair of inputs.
    #[arg(long)]
    diff: Option<DiffArg>,
    /// Print volts rather than raw conversion codes.
    #[arg(long)]
    voltage: bool,
    /// Time allowed for each reading, in milliseconds.
    #[arg(long, default_value_t = 200)]
    wait_ms: u32,
    /// Start each conversion and poll for completion instead of blocking.
    #[arg(long)]
    poll: bool,
}

/// Differential input pair, positive input first.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum DiffArg {
    #[value(name = "0-1")]
    Ain0Ain1,
    #[value(name = "0-3")]
    Ain0Ain3,
    #[value(name = "1-3")]
    Ain1Ain3,
    #[value(name = "2-3")]
    Ain2Ain3,
}

impl From<DiffArg> for Mux {
    fn from(value: DiffArg) -> Self {
        match value {
            DiffArg::Ain0Ain1 => Mux::Ain0Ain1,
            DiffArg::Ain0Ain3 => Mux::Ain0Ain3,
            DiffArg::Ain1Ain3 => Mux::Ain1Ain3,
            DiffArg::Ain2Ain3 => Mux::Ain2Ain3,
        }
    }
}

impl ReadArgs {
    fn mux(&self) -> Result<Option<Mux>, ads1115_hal::Error> {
        match (self.channel, self.diff) {
            (Some(channel), _) => Mux::single_ended(channel).map(Some),
            (None, Some(pair)) => Ok(Some(pair.into())),
            (None, None) => Ok(None),
        }
    }
}

pub(crate) fn action(adc: &mut Adc, args: ReadArgs) -> anyhow::Result<()> {
    if let Some(mux) = args.mux()? {
        adc.set_mux(mux)
            .with_context(|| format!("selecting input {mux:?}"))?;
    }
    let mux = adc.mux();
    for n in 0..args.count {
        let context = || format!("reading {mux:?} (reading {})", n + 1);
        if args.poll {
            let raw = poll_once(adc, args.wait_ms).with_context(context)?;
            if args.voltage {
                println!("{:.6}", adc.raw_to_voltage(raw));
            } else {
                println!("{raw}");
            }
        } else if args.voltage {
            let volts = adc.read_blocking_voltage(args.wait_ms);
            println!("{:.6}", volts.with_context(context)?);
        } else {
            let raw = adc.read_blocking(args.wait_ms);
            println!("{}", raw.with_context(context)?);
        }
    }
    Ok(())
}

/// Start a single-shot conversion and drive it to completion with `tick`.
fn poll_once(adc: &mut Adc, wait_ms: u32) -> anyhow::Result<i16> {
    if adc.mode() == Mode::Continuous {
        return Ok(adc.read_raw()?);
    }
    let started = adc.start_conversion()?;
    let clock = Instant::now();
    let mut polls = 0u32;
    loop {
        let elapsed = clock.elapsed().as_millis() as u32;
        adc.tick(started.started_at_ms.wrapping_add(elapsed));
        polls += 1;
        if adc.conversion_ready() {
            break;
        }
        if elapsed >= wait_ms {
            bail!("no result after {wait_ms} ms ({polls} polls)");
        }
        thread::sleep(Duration::from_millis(1));
    }
    log::debug!("conversion ready after {polls} polls");
    Ok(adc.read_raw()?)
}
