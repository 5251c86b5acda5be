//! A simulated ADS1115 and a hand-cranked clock, shared by the integration tests.
#![allow(dead_code)]
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use ads1115_hal::registers::{
    CONFIG_DEFAULT, CONVERSION_DEFAULT, HIGH_THRESHOLD_DEFAULT, LOW_THRESHOLD_DEFAULT, OS_START,
};
use ads1115_hal::{ADS1115, Clock, Config, Error, ErrorKind, ReadySignal, Transport};

pub const ADDRESS: u8 = 0x48;
pub const NACK: Error = Error::new(ErrorKind::TransportError, "NACK").with_detail(-121);

const MODE_BIT: u16 = 1 << 8;
const POLARITY_BIT: u16 = 1 << 3;

/// One bus transaction as seen by the simulated device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    /// Pointer byte and 16-bit value.
    Write(u8, u16),
    /// Pointer byte.
    Read(u8),
}

/// Register file and fault injection for the simulated device.
#[derive(Debug)]
pub struct SimState {
    pub registers: [u16; 4],
    /// Result produced by the next conversion.
    pub sample: i16,
    /// Config reads that still report busy after a conversion is started.
    pub busy_polls: u32,
    pub never_completes: bool,
    /// Fail every transaction.
    pub absent: bool,
    /// Fail this many transactions, then recover.
    pub fail_next: u32,
    pub log: Vec<Op>,
    pub converting: bool,
    pub pin_reads: u32,
    remaining_polls: u32,
}

impl Default for SimState {
    fn default() -> Self {
        Self {
            registers: [
                CONVERSION_DEFAULT,
                CONFIG_DEFAULT,
                LOW_THRESHOLD_DEFAULT,
                HIGH_THRESHOLD_DEFAULT,
            ],
            sample: 0,
            busy_polls: 0,
            never_completes: false,
            absent: false,
            fail_next: 0,
            log: Vec::new(),
            converting: false,
            pin_reads: 0,
            remaining_polls: 0,
        }
    }
}

impl SimState {
    fn check(&mut self, address: u8) -> Result<(), Error> {
        if self.absent || address != ADDRESS {
            return Err(NACK);
        }
        if self.fail_next > 0 {
            self.fail_next -= 1;
            return Err(NACK);
        }
        Ok(())
    }

    fn single_shot(&self) -> bool {
        self.registers[1] & MODE_BIT != 0
    }

    fn write_config(&mut self, value: u16) {
        self.registers[1] = value & !OS_START;
        if self.single_shot() && value & OS_START != 0 {
            self.converting = true;
            self.remaining_polls = self.busy_polls;
        } else {
            self.converting = false;
        }
    }

    fn finish_conversion(&mut self) {
        self.converting = false;
        self.registers[0] = self.sample as u16;
    }

    fn read_config(&mut self) -> u16 {
        if self.converting && !self.never_completes {
            if self.remaining_polls == 0 {
                self.finish_conversion();
            } else {
                self.remaining_polls -= 1;
            }
        }
        if self.converting {
            self.registers[1]
        } else {
            self.registers[1] | OS_START
        }
    }

    /// Config register value last written, OS bit clear.
    pub fn config(&self) -> u16 {
        self.registers[1]
    }

    pub fn writes(&self) -> Vec<(u8, u16)> {
        self.log
            .iter()
            .filter_map(|op| match op {
                Op::Write(pointer, value) => Some((*pointer, *value)),
                Op::Read(_) => None,
            })
            .collect()
    }

    pub fn reads(&self) -> usize {
        self.log.iter().filter(|op| matches!(op, Op::Read(_))).count()
    }
}

pub type Sim = Rc<RefCell<SimState>>;

/// [`Transport`] backed by the simulated device.
#[derive(Debug, Clone)]
pub struct SimBus {
    state: Sim,
}

impl Transport for SimBus {
    fn write(&mut self, address: u8, bytes: &[u8], _timeout: Duration) -> Result<(), Error> {
        let mut sim = self.state.borrow_mut();
        let &[pointer, high, low] = bytes else {
            return Err(Error::new(ErrorKind::InvalidParam, "Bad write length"));
        };
        let value = u16::from_be_bytes([high, low]);
        sim.log.push(Op::Write(pointer, value));
        sim.check(address)?;
        match pointer {
            0x01 => sim.write_config(value),
            0x02 | 0x03 => sim.registers[usize::from(pointer)] = value,
            _ => return Err(NACK),
        }
        Ok(())
    }

    fn write_read(
        &mut self,
        address: u8,
        tx: &[u8],
        rx: &mut [u8],
        _timeout: Duration,
    ) -> Result<(), Error> {
        let mut sim = self.state.borrow_mut();
        let &[pointer] = tx else {
            return Err(Error::new(ErrorKind::InvalidParam, "Bad pointer length"));
        };
        sim.log.push(Op::Read(pointer));
        sim.check(address)?;
        let value = match pointer {
            0x00 if !sim.single_shot() => sim.sample as u16,
            0x01 => sim.read_config(),
            0x00 | 0x02 | 0x03 => sim.registers[usize::from(pointer)],
            _ => return Err(NACK),
        };
        rx.copy_from_slice(&value.to_be_bytes());
        Ok(())
    }
}

/// ALERT/RDY line of the simulated device.
///
/// Asserts as soon as it is sampled during a conversion (unless the device
/// never completes), honouring the polarity bit of the config register.
#[derive(Debug, Clone)]
pub struct SimAlert {
    state: Sim,
}

impl ReadySignal for SimAlert {
    fn is_high(&mut self, _pin: u8) -> bool {
        let mut sim = self.state.borrow_mut();
        sim.pin_reads += 1;
        if sim.converting && !sim.never_completes {
            sim.finish_conversion();
        }
        let asserted = !sim.converting;
        let active_high = sim.config() & POLARITY_BIT != 0;
        asserted == active_high
    }
}

/// Clock that only moves when told to, plus `step` per reading.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<u32>>,
    step: Rc<Cell<u32>>,
}

impl ManualClock {
    pub fn set(&self, now_ms: u32) {
        self.now.set(now_ms);
    }

    pub fn advance(&self, ms: u32) {
        self.now.set(self.now.get().wrapping_add(ms));
    }

    pub fn set_step(&self, step_ms: u32) {
        self.step.set(step_ms);
    }

    pub fn peek(&self) -> u32 {
        self.now.get()
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u32 {
        let now = self.now.get();
        self.now.set(now.wrapping_add(self.step.get()));
        now
    }
}

pub type SimAdc = ADS1115<SimBus, SimAlert, ManualClock>;

pub struct Harness {
    pub adc: SimAdc,
    pub sim: Sim,
    pub clock: ManualClock,
}

impl Harness {
    /// Driver without an ALERT/RDY reader, not yet started.
    pub fn new() -> Self {
        Self::build(false)
    }

    /// Driver with an ALERT/RDY reader, not yet started.
    pub fn with_alert() -> Self {
        Self::build(true)
    }

    fn build(alert: bool) -> Self {
        let sim = Sim::default();
        let clock = ManualClock::default();
        let bus = SimBus { state: sim.clone() };
        let signal = alert.then(|| SimAlert { state: sim.clone() });
        let adc = ADS1115::from_parts(bus, signal, clock.clone());
        Self { adc, sim, clock }
    }

    /// Begin with `config` and forget the transactions that took.
    pub fn started(mut self, config: Config) -> Self {
        self.adc.begin(config).unwrap();
        self.sim.borrow_mut().log.clear();
        self
    }

    pub fn state(&self) -> std::cell::RefMut<'_, SimState> {
        self.sim.borrow_mut()
    }
}

/// Driver with the default configuration, already started.
pub fn started() -> Harness {
    Harness::new().started(Config::default())
}
