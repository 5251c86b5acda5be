//! Driver configuration and the enumerated configuration-register fields.
//!
//! Each enumeration maps one-to-one onto a field of the ADS1115 configuration
//! register (see section 8.6.3 of the datasheet). Conversion from a raw `u8`
//! goes through [`TryFrom`], which rejects values outside the field's domain
//! with [`ErrorKind::InvalidParam`].
use std::time::Duration;

use crate::error::{DETAIL_INVALID_ADDRESS, DETAIL_ZERO_TIMEOUT, Error, ErrorKind};

/// Lowest 7-bit address the ADS1115 can be strapped to (ADDR tied to GND).
pub const MIN_ADDRESS: u8 = 0x48;
/// Highest 7-bit address the ADS1115 can be strapped to (ADDR tied to SCL).
pub const MAX_ADDRESS: u8 = 0x4B;

const fn invalid(message: &'static str) -> Error {
    Error::new(ErrorKind::InvalidParam, message)
}

/// Input multiplexer setting (MUX\[2:0\]).
///
/// The first four settings are differential pairs, the last four measure a
/// single input against ground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mux {
    /// AINp = AIN0, AINn = AIN1. Power-on default of the device.
    Ain0Ain1,
    /// AINp = AIN0, AINn = AIN3.
    Ain0Ain3,
    /// AINp = AIN1, AINn = AIN3.
    Ain1Ain3,
    /// AINp = AIN2, AINn = AIN3.
    Ain2Ain3,
    /// AIN0 against GND. Driver default.
    Ain0Gnd,
    /// AIN1 against GND.
    Ain1Gnd,
    /// AIN2 against GND.
    Ain2Gnd,
    /// AIN3 against GND.
    Ain3Gnd,
}

impl Mux {
    /// Single-ended input for the given channel (0-3).
    pub fn single_ended(channel: u8) -> Result<Self, Error> {
        match channel {
            0 => Ok(Self::Ain0Gnd),
            1 => Ok(Self::Ain1Gnd),
            2 => Ok(Self::Ain2Gnd),
            3 => Ok(Self::Ain3Gnd),
            _ => Err(invalid("Invalid channel")),
        }
    }

    /// Decode the three MUX bits. Every bit pattern is a valid setting.
    pub(crate) fn from_bits(bits: u8) -> Self {
        match bits & 0b111 {
            0 => Self::Ain0Ain1,
            1 => Self::Ain0Ain3,
            2 => Self::Ain1Ain3,
            3 => Self::Ain2Ain3,
            4 => Self::Ain0Gnd,
            5 => Self::Ain1Gnd,
            6 => Self::Ain2Gnd,
            _ => Self::Ain3Gnd,
        }
    }
}

impl TryFrom<u8> for Mux {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0..=7 => Ok(Self::from_bits(value)),
            _ => Err(invalid("Invalid mux")),
        }
    }
}

impl From<Mux> for u8 {
    fn from(value: Mux) -> Self {
        value as u8
    }
}

/// Programmable gain amplifier setting (PGA\[2:0\]), as full-scale range.
///
/// The FSR does not allow more than VDD + 0.3 V to be applied to the inputs;
/// it only sets the span mapped onto the 16-bit output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gain {
    /// ±6.144 V, LSB 187.5 µV.
    Fsr6_144V,
    /// ±4.096 V, LSB 125 µV.
    Fsr4_096V,
    /// ±2.048 V, LSB 62.5 µV. Default.
    Fsr2_048V,
    /// ±1.024 V, LSB 31.25 µV.
    Fsr1_024V,
    /// ±0.512 V, LSB 15.625 µV.
    Fsr0_512V,
    /// ±0.256 V, LSB 7.8125 µV.
    Fsr0_256V,
}

impl Gain {
    /// Size of one output code in volts.
    pub fn lsb_volts(&self) -> f32 {
        match self {
            Gain::Fsr6_144V => 187.5e-6,
            Gain::Fsr4_096V => 125.0e-6,
            Gain::Fsr2_048V => 62.5e-6,
            Gain::Fsr1_024V => 31.25e-6,
            Gain::Fsr0_512V => 15.625e-6,
            Gain::Fsr0_256V => 7.8125e-6,
        }
    }

    /// Positive end of the full-scale range in volts.
    pub fn full_scale_volts(&self) -> f32 {
        self.lsb_volts() * 32_768.0
    }

    /// Decode the three PGA bits.
    ///
    /// Codes 6 and 7 are not separately named by the datasheet; the device
    /// treats them as ±0.256 V, and so does this function.
    pub(crate) fn from_bits(bits: u8) -> Self {
        match bits & 0b111 {
            0 => Self::Fsr6_144V,
            1 => Self::Fsr4_096V,
            2 => Self::Fsr2_048V,
            3 => Self::Fsr1_024V,
            4 => Self::Fsr0_512V,
            _ => Self::Fsr0_256V,
        }
    }
}

impl TryFrom<u8> for Gain {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0..=5 => Ok(Self::from_bits(value)),
            _ => Err(invalid("Invalid gain")),
        }
    }
}

impl From<Gain> for u8 {
    fn from(value: Gain) -> Self {
        value as u8
    }
}

/// Output data rate (DR\[2:0\]) in samples per second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataRate {
    /// 8 SPS
    Sps8,
    /// 16 SPS
    Sps16,
    /// 32 SPS
    Sps32,
    /// 64 SPS
    Sps64,
    /// 128 SPS. Default.
    Sps128,
    /// 250 SPS
    Sps250,
    /// 475 SPS
    Sps475,
    /// 860 SPS
    Sps860,
}

impl DataRate {
    /// Samples per second.
    pub fn samples_per_second(&self) -> u16 {
        match self {
            DataRate::Sps8 => 8,
            DataRate::Sps16 => 16,
            DataRate::Sps32 => 32,
            DataRate::Sps64 => 64,
            DataRate::Sps128 => 128,
            DataRate::Sps250 => 250,
            DataRate::Sps475 => 475,
            DataRate::Sps860 => 860,
        }
    }

    /// Time to wait after starting a single-shot conversion before polling for
    /// its result, in milliseconds.
    ///
    /// This is one sample period rounded up, plus a margin for the internal
    /// oscillator's ±10% tolerance and the power-up time of the device.
    pub fn conversion_time_ms(&self) -> u32 {
        match self {
            DataRate::Sps8 => 125 + 5,
            DataRate::Sps16 => 63 + 5,
            DataRate::Sps32 => 32 + 5,
            DataRate::Sps64 => 16 + 5,
            DataRate::Sps128 => 8 + 2,
            DataRate::Sps250 => 4 + 2,
            DataRate::Sps475 => 3 + 1,
            DataRate::Sps860 => 2 + 1,
        }
    }

    pub(crate) fn from_bits(bits: u8) -> Self {
        match bits & 0b111 {
            0 => Self::Sps8,
            1 => Self::Sps16,
            2 => Self::Sps32,
            3 => Self::Sps64,
            4 => Self::Sps128,
            5 => Self::Sps250,
            6 => Self::Sps475,
            _ => Self::Sps860,
        }
    }
}

impl TryFrom<u8> for DataRate {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0..=7 => Ok(Self::from_bits(value)),
            _ => Err(invalid("Invalid data rate")),
        }
    }
}

impl From<DataRate> for u8 {
    fn from(value: DataRate) -> Self {
        value as u8
    }
}

/// Device operating mode (MODE bit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// The device converts continuously and every read returns the latest sample.
    Continuous,
    /// The device powers down between conversions, which must each be started
    /// explicitly. Default.
    SingleShot,
}

impl From<bool> for Mode {
    fn from(bit: bool) -> Self {
        if bit { Self::SingleShot } else { Self::Continuous }
    }
}

impl From<Mode> for bool {
    fn from(value: Mode) -> Self {
        matches!(value, Mode::SingleShot)
    }
}

/// Comparator mode (COMP_MODE bit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparatorMode {
    /// Assert above the high threshold, release below the low one. Default.
    Traditional,
    /// Assert outside the window between the thresholds.
    Window,
}

impl From<bool> for ComparatorMode {
    fn from(bit: bool) -> Self {
        if bit { Self::Window } else { Self::Traditional }
    }
}

impl From<ComparatorMode> for bool {
    fn from(value: ComparatorMode) -> Self {
        matches!(value, ComparatorMode::Window)
    }
}

/// Polarity of the ALERT/RDY pin (COMP_POL bit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparatorPolarity {
    /// Asserted low. Default.
    ActiveLow,
    /// Asserted high.
    ActiveHigh,
}

impl From<bool> for ComparatorPolarity {
    fn from(bit: bool) -> Self {
        if bit { Self::ActiveHigh } else { Self::ActiveLow }
    }
}

impl From<ComparatorPolarity> for bool {
    fn from(value: ComparatorPolarity) -> Self {
        matches!(value, ComparatorPolarity::ActiveHigh)
    }
}

/// Whether ALERT/RDY latches once asserted (COMP_LAT bit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparatorLatch {
    /// Default.
    NonLatching,
    /// Stays asserted until the conversion register is read.
    Latching,
}

impl From<bool> for ComparatorLatch {
    fn from(bit: bool) -> Self {
        if bit { Self::Latching } else { Self::NonLatching }
    }
}

impl From<ComparatorLatch> for bool {
    fn from(value: ComparatorLatch) -> Self {
        matches!(value, ComparatorLatch::Latching)
    }
}

/// Number of successive out-of-threshold conversions before ALERT/RDY asserts
/// (COMP_QUE\[1:0\]), or disabling the comparator entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparatorQueue {
    /// After one conversion.
    Assert1,
    /// After two conversions.
    Assert2,
    /// After four conversions.
    Assert4,
    /// Comparator disabled, ALERT/RDY high-impedance. Default.
    Disable,
}

impl ComparatorQueue {
    pub(crate) fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0 => Self::Assert1,
            1 => Self::Assert2,
            2 => Self::Assert4,
            _ => Self::Disable,
        }
    }
}

impl TryFrom<u8> for ComparatorQueue {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0..=3 => Ok(Self::from_bits(value)),
            _ => Err(invalid("Invalid comparator queue")),
        }
    }
}

impl From<ComparatorQueue> for u8 {
    fn from(value: ComparatorQueue) -> Self {
        value as u8
    }
}

/// Settings applied by [`ADS1115::begin`].
///
/// Build one from [`Config::default`] and the `with_*` methods:
///
/// ```rust
/// # use ads1115_hal::{Config, DataRate, Gain, Mux};
/// let config = Config::default()
///     .with_address(0x49)
///     .with_mux(Mux::Ain2Gnd)
///     .with_gain(Gain::Fsr4_096V)
///     .with_data_rate(DataRate::Sps860);
/// assert_eq!(config.offline_threshold, 5);
/// ```
///
/// [`ADS1115::begin`]: crate::ADS1115::begin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// 7-bit I2C address, `0x48..=0x4B` depending on the ADDR pin strapping.
    pub address: u8,
    /// Timeout handed to the transport for every transaction. Must be non-zero.
    pub timeout: Duration,
    /// Input multiplexer.
    pub mux: Mux,
    /// Full-scale range.
    pub gain: Gain,
    /// Output data rate.
    pub data_rate: DataRate,
    /// Operating mode.
    pub mode: Mode,
    /// Comparator mode.
    pub comparator_mode: ComparatorMode,
    /// ALERT/RDY polarity.
    pub comparator_polarity: ComparatorPolarity,
    /// ALERT/RDY latching.
    pub comparator_latch: ComparatorLatch,
    /// Comparator queue, or disabled.
    pub comparator_queue: ComparatorQueue,
    /// Low threshold register value.
    pub threshold_low: i16,
    /// High threshold register value.
    pub threshold_high: i16,
    /// Pin number wired to ALERT/RDY, passed to the driver's
    /// [`ReadySignal`](crate::ReadySignal). `None` to poll the OS bit instead.
    pub ready_pin: Option<u8>,
    /// Consecutive transport failures before the driver reports
    /// [`DriverState::Offline`](crate::DriverState::Offline). Zero is treated as 1.
    pub offline_threshold: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: MIN_ADDRESS,
            timeout: Duration::from_millis(50),
            mux: Mux::Ain0Gnd,
            gain: Gain::Fsr2_048V,
            data_rate: DataRate::Sps128,
            mode: Mode::SingleShot,
            comparator_mode: ComparatorMode::Traditional,
            comparator_polarity: ComparatorPolarity::ActiveLow,
            comparator_latch: ComparatorLatch::NonLatching,
            comparator_queue: ComparatorQueue::Disable,
            threshold_low: i16::MIN,
            threshold_high: i16::MAX,
            ready_pin: None,
            offline_threshold: 5,
        }
    }
}

impl Config {
    /// Set the I2C address.
    pub fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    /// Set the transport timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the input multiplexer.
    pub fn with_mux(mut self, mux: Mux) -> Self {
        self.mux = mux;
        self
    }

    /// Set the full-scale range.
    pub fn with_gain(mut self, gain: Gain) -> Self {
        self.gain = gain;
        self
    }

    /// Set the data rate.
    pub fn with_data_rate(mut self, data_rate: DataRate) -> Self {
        self.data_rate = data_rate;
        self
    }

    /// Set the operating mode.
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Set both comparator thresholds.
    pub fn with_thresholds(mut self, low: i16, high: i16) -> Self {
        self.threshold_low = low;
        self.threshold_high = high;
        self
    }

    /// Use the given pin to detect conversion completion.
    ///
    /// This only takes effect while the comparator is in conversion-ready mode,
    /// see [`Config::with_conversion_ready_comparator`].
    pub fn with_ready_pin(mut self, pin: u8) -> Self {
        self.ready_pin = Some(pin);
        self
    }

    /// Set the comparator up so that ALERT/RDY signals conversion completion.
    ///
    /// See section 8.3.8 of the datasheet: the high threshold's MSB must be
    /// set, the low threshold's MSB clear, and the queue enabled.
    pub fn with_conversion_ready_comparator(mut self) -> Self {
        self.threshold_low = 0x0000;
        self.threshold_high = i16::MIN;
        self.comparator_queue = ComparatorQueue::Assert1;
        self.comparator_mode = ComparatorMode::Traditional;
        self.comparator_latch = ComparatorLatch::NonLatching;
        self
    }

    /// Set the number of consecutive failures before the device is offline.
    pub fn with_offline_threshold(mut self, threshold: u8) -> Self {
        self.offline_threshold = threshold;
        self
    }

    /// True if the comparator is configured as a conversion-ready signal.
    pub fn is_conversion_ready_mode(&self) -> bool {
        self.threshold_low == 0x0000
            && self.threshold_high == i16::MIN
            && self.comparator_queue == ComparatorQueue::Assert1
            && self.comparator_mode == ComparatorMode::Traditional
            && self.comparator_latch == ComparatorLatch::NonLatching
    }

    /// Check the settings that the type system cannot.
    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.timeout.is_zero() {
            return Err(Error::new(ErrorKind::InvalidConfig, "Timeout must be > 0")
                .with_detail(DETAIL_ZERO_TIMEOUT));
        }
        if !(MIN_ADDRESS..=MAX_ADDRESS).contains(&self.address) {
            return Err(Error::new(ErrorKind::InvalidConfig, "Invalid I2C address")
                .with_detail(DETAIL_INVALID_ADDRESS));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn lsb_matches_full_scale_range() {
        let close = |a: f32, b: f32| (a - b).abs() < 1e-5;
        assert!(close(Gain::Fsr6_144V.full_scale_volts(), 6.144));
        assert!(close(Gain::Fsr2_048V.full_scale_volts(), 2.048));
        assert!(close(Gain::Fsr0_256V.full_scale_volts(), 0.256));
        assert_eq!(Gain::Fsr0_256V.lsb_volts(), 7.8125e-6);
    }

    #[test]
    fn conversion_times_cover_one_sample_period() {
        for bits in 0..=7 {
            let rate = DataRate::from_bits(bits);
            let period_ms = 1000.0 / f32::from(rate.samples_per_second());
            assert!(rate.conversion_time_ms() as f32 >= period_ms, "{rate:?}");
        }
        assert_eq!(DataRate::Sps860.conversion_time_ms(), 3);
        assert_eq!(DataRate::Sps8.conversion_time_ms(), 130);
    }

    #[test]
    fn try_from_rejects_out_of_domain_values() {
        assert_eq!(Gain::try_from(5), Ok(Gain::Fsr0_256V));
        assert_eq!(Gain::try_from(6).unwrap_err().kind(), ErrorKind::InvalidParam);
        assert_eq!(Mux::try_from(8).unwrap_err().kind(), ErrorKind::InvalidParam);
        assert_eq!(DataRate::try_from(7), Ok(DataRate::Sps860));
        assert!(ComparatorQueue::try_from(4).is_err());
        assert!(Mux::single_ended(4).is_err());
        assert_eq!(Mux::single_ended(2), Ok(Mux::Ain2Gnd));
    }

    #[test]
    fn validate_checks_timeout_then_address() {
        assert!(Config::default().validate().is_ok());

        let err = Config::default()
            .with_timeout(Duration::ZERO)
            .with_address(0x10)
            .validate()
            .unwrap_err();
        assert_eq!(err.detail(), DETAIL_ZERO_TIMEOUT);

        let err = Config::default().with_address(0x4C).validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
        assert_eq!(err.detail(), DETAIL_INVALID_ADDRESS);
    }

    #[test]
    fn conversion_ready_comparator_is_detected() {
        let config = Config::default();
        assert!(!config.is_conversion_ready_mode());
        assert!(config.with_conversion_ready_comparator().is_conversion_ready_mode());
    }
}
