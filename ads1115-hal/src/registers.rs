//! ADS1115 register map and configuration-register encoding.
//!
//! Every register is 16 bits wide and transferred as a pointer byte followed by
//! the value in big-endian order. See section 8.6 of the datasheet.
//!
//! Configuration register layout:
//!
//! | Bits  | Field      | Meaning                                     |
//! | ----- | ---------- | ------------------------------------------- |
//! | 15    | OS         | Read: 1 = idle. Write: 1 = start conversion |
//! | 14:12 | MUX        | Input multiplexer                           |
//! | 11:9  | PGA        | Full-scale range                            |
//! | 8     | MODE       | 0 = continuous, 1 = single-shot             |
//! | 7:5   | DR         | Data rate                                   |
//! | 4     | COMP_MODE  | Comparator mode                             |
//! | 3     | COMP_POL   | ALERT/RDY polarity                          |
//! | 2     | COMP_LAT   | ALERT/RDY latching                          |
//! | 1:0   | COMP_QUE   | Comparator queue / disable                  |
use std::ops::Range;

use bit_field::BitField;

use crate::config::{
    ComparatorLatch, ComparatorMode, ComparatorPolarity, ComparatorQueue, Config, DataRate, Gain,
    Mode, Mux,
};

/// Value of the pointer register selecting one of the four data registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    /// Last conversion result, two's complement. Read-only.
    Conversion,
    /// Configuration register.
    Config,
    /// Comparator low threshold.
    LowThreshold,
    /// Comparator high threshold.
    HighThreshold,
}

impl From<Register> for u8 {
    fn from(value: Register) -> Self {
        match value {
            Register::Conversion => 0x00,
            Register::Config => 0x01,
            Register::LowThreshold => 0x02,
            Register::HighThreshold => 0x03,
        }
    }
}

/// Conversion register value at power-on.
pub const CONVERSION_DEFAULT: u16 = 0x0000;
/// Configuration register value at power-on.
pub const CONFIG_DEFAULT: u16 = 0x8583;
/// Low threshold register value at power-on.
pub const LOW_THRESHOLD_DEFAULT: u16 = 0x8000;
/// High threshold register value at power-on.
pub const HIGH_THRESHOLD_DEFAULT: u16 = 0x7FFF;

/// Operational status / single-shot start bit.
pub const OS_BIT: usize = 15;
/// OS bit mask. Reads set when idle; written set to start a conversion.
pub const OS_START: u16 = 1 << OS_BIT;

const MUX_BITS: Range<usize> = 12..15;
const PGA_BITS: Range<usize> = 9..12;
const MODE_BIT: usize = 8;
const DR_BITS: Range<usize> = 5..8;
const COMP_MODE_BIT: usize = 4;
const COMP_POL_BIT: usize = 3;
const COMP_LAT_BIT: usize = 2;
const COMP_QUE_BITS: Range<usize> = 0..2;

/// Decoded fields of the configuration register, excluding the OS bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigFields {
    /// MUX\[2:0\]
    pub mux: Mux,
    /// PGA\[2:0\]
    pub gain: Gain,
    /// MODE
    pub mode: Mode,
    /// DR\[2:0\]
    pub data_rate: DataRate,
    /// COMP_MODE
    pub comparator_mode: ComparatorMode,
    /// COMP_POL
    pub comparator_polarity: ComparatorPolarity,
    /// COMP_LAT
    pub comparator_latch: ComparatorLatch,
    /// COMP_QUE\[1:0\]
    pub comparator_queue: ComparatorQueue,
}

impl ConfigFields {
    /// Pack the fields into a register value with the OS bit clear.
    pub fn encode(&self) -> u16 {
        let mut value = 0u16;
        value.set_bits(MUX_BITS, u8::from(self.mux).into());
        value.set_bits(PGA_BITS, u8::from(self.gain).into());
        value.set_bit(MODE_BIT, self.mode.into());
        value.set_bits(DR_BITS, u8::from(self.data_rate).into());
        value.set_bit(COMP_MODE_BIT, self.comparator_mode.into());
        value.set_bit(COMP_POL_BIT, self.comparator_polarity.into());
        value.set_bit(COMP_LAT_BIT, self.comparator_latch.into());
        value.set_bits(COMP_QUE_BITS, u8::from(self.comparator_queue).into());
        value
    }

    /// Unpack a register value. The OS bit is ignored.
    ///
    /// This never fails. The reserved PGA codes 6 and 7 decode as ±0.256 V,
    /// which is how the device interprets them; use [`is_valid`] to reject them.
    pub fn decode(value: u16) -> Self {
        // Every field is at most three bits wide, so the casts cannot truncate.
        let bits = |range: Range<usize>| value.get_bits(range) as u8;
        Self {
            mux: Mux::from_bits(bits(MUX_BITS)),
            gain: Gain::from_bits(bits(PGA_BITS)),
            mode: value.get_bit(MODE_BIT).into(),
            data_rate: DataRate::from_bits(bits(DR_BITS)),
            comparator_mode: value.get_bit(COMP_MODE_BIT).into(),
            comparator_polarity: value.get_bit(COMP_POL_BIT).into(),
            comparator_latch: value.get_bit(COMP_LAT_BIT).into(),
            comparator_queue: ComparatorQueue::from_bits(bits(COMP_QUE_BITS)),
        }
    }
}

impl From<&Config> for ConfigFields {
    fn from(config: &Config) -> Self {
        Self {
            mux: config.mux,
            gain: config.gain,
            mode: config.mode,
            data_rate: config.data_rate,
            comparator_mode: config.comparator_mode,
            comparator_polarity: config.comparator_polarity,
            comparator_latch: config.comparator_latch,
            comparator_queue: config.comparator_queue,
        }
    }
}

impl Config {
    /// Copy decoded register fields into the configuration.
    pub(crate) fn apply_fields(&mut self, fields: ConfigFields) {
        self.mux = fields.mux;
        self.gain = fields.gain;
        self.mode = fields.mode;
        self.data_rate = fields.data_rate;
        self.comparator_mode = fields.comparator_mode;
        self.comparator_polarity = fields.comparator_polarity;
        self.comparator_latch = fields.comparator_latch;
        self.comparator_queue = fields.comparator_queue;
    }
}

/// True if every field of a raw configuration value is within its domain.
///
/// The only field wide enough to hold an undefined value is PGA, where codes 6
/// and 7 are reserved.
pub fn is_valid(value: u16) -> bool {
    value.get_bits(PGA_BITS) <= 5
}

/// True if the OS bit of a configuration value read back from the device says
/// no conversion is in progress.
pub fn is_idle(value: u16) -> bool {
    value.get_bit(OS_BIT)
}
