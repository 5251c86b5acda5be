//! Capabilities the driver needs from its environment.
//!
//! The driver never touches a bus, pin or clock directly. Instead it is handed:
//!
//! - a [`Transport`] to move bytes to and from the ADS1115,
//! - optionally, a [`ReadySignal`] to sample the ALERT/RDY line,
//! - a [`Clock`] to measure conversion times.
//!
//! Adapters are provided for the [`embedded_hal`] I2C and digital input traits,
//! so that any HAL implementing those can be used directly.
use std::time::{Duration, Instant};

use embedded_hal::digital::InputPin;
use embedded_hal::i2c::{self, I2c, NoAcknowledgeSource};

use crate::error::{Error, ErrorKind};

/// Byte-level access to the bus the ADS1115 is attached to.
///
/// Implementations must complete (or fail) each call within `timeout`. The
/// driver does not retry failed calls, but counts them towards its health
/// state; see [`DriverState`](crate::DriverState).
///
/// Return [`ErrorKind::TransportError`] for bus failures, with whatever detail
/// code helps diagnose them. Returning [`ErrorKind::InvalidConfig`] or
/// [`ErrorKind::InvalidParam`] marks the failure as the caller's fault, and it
/// is not counted against the device.
pub trait Transport {
    /// Write `bytes` to the target at the 7-bit `address`.
    fn write(&mut self, address: u8, bytes: &[u8], timeout: Duration) -> Result<(), Error>;

    /// Write `tx` then, without a STOP condition in between, fill `rx` from the
    /// target at the 7-bit `address`.
    fn write_read(
        &mut self,
        address: u8,
        tx: &[u8],
        rx: &mut [u8],
        timeout: Duration,
    ) -> Result<(), Error>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn write(&mut self, address: u8, bytes: &[u8], timeout: Duration) -> Result<(), Error> {
        (**self).write(address, bytes, timeout)
    }

    fn write_read(
        &mut self,
        address: u8,
        tx: &[u8],
        rx: &mut [u8],
        timeout: Duration,
    ) -> Result<(), Error> {
        (**self).write_read(address, tx, rx, timeout)
    }
}

/// Detail codes attached by [`I2cTransport`] to its transport errors, one per
/// [`embedded_hal::i2c::ErrorKind`].
pub mod i2c_detail {
    /// Bus error (misplaced START or STOP).
    pub const BUS: i32 = 1;
    /// Arbitration lost to another controller.
    pub const ARBITRATION_LOSS: i32 = 2;
    /// The target did not acknowledge its address.
    pub const NACK_ADDRESS: i32 = 3;
    /// The target did not acknowledge a data byte.
    pub const NACK_DATA: i32 = 4;
    /// The target did not acknowledge, cause unknown.
    pub const NACK_UNKNOWN: i32 = 5;
    /// The peripheral's receive buffer overran.
    pub const OVERRUN: i32 = 6;
    /// Any other HAL error.
    pub const OTHER: i32 = 7;
}

/// [`Transport`] over any blocking [`embedded_hal::i2c::I2c`] bus.
///
/// The embedded-hal traits have no per-call timeout, so the `timeout` argument
/// is not enforced here; configure the bus implementation's own timeout instead.
#[derive(Debug)]
pub struct I2cTransport<I> {
    bus: I,
}

impl<I: I2c> I2cTransport<I> {
    /// Wrap an I2C bus.
    pub fn new(bus: I) -> Self {
        Self { bus }
    }

    /// Give back the I2C bus.
    pub fn release(self) -> I {
        self.bus
    }
}

impl<I: I2c> From<I> for I2cTransport<I> {
    fn from(bus: I) -> Self {
        Self::new(bus)
    }
}

fn bus_error<E: i2c::Error>(error: E) -> Error {
    use i2c::ErrorKind as Kind;
    let (detail, message) = match error.kind() {
        Kind::Bus => (i2c_detail::BUS, "I2C bus error"),
        Kind::ArbitrationLoss => (i2c_detail::ARBITRATION_LOSS, "I2C arbitration lost"),
        Kind::NoAcknowledge(NoAcknowledgeSource::Address) => {
            (i2c_detail::NACK_ADDRESS, "I2C address not acknowledged")
        }
        Kind::NoAcknowledge(NoAcknowledgeSource::Data) => {
            (i2c_detail::NACK_DATA, "I2C data not acknowledged")
        }
        Kind::NoAcknowledge(_) => (i2c_detail::NACK_UNKNOWN, "I2C not acknowledged"),
        Kind::Overrun => (i2c_detail::OVERRUN, "I2C overrun"),
        _ => (i2c_detail::OTHER, "I2C error"),
    };
    Error::new(ErrorKind::TransportError, message).with_detail(detail)
}

impl<I: I2c> Transport for I2cTransport<I> {
    fn write(&mut self, address: u8, bytes: &[u8], _timeout: Duration) -> Result<(), Error> {
        self.bus.write(address, bytes).map_err(bus_error)
    }

    fn write_read(
        &mut self,
        address: u8,
        tx: &[u8],
        rx: &mut [u8],
        _timeout: Duration,
    ) -> Result<(), Error> {
        self.bus.write_read(address, tx, rx).map_err(bus_error)
    }
}

/// Reads the logic level of the pin wired to ALERT/RDY.
///
/// The driver passes the [`Config::ready_pin`](crate::Config::ready_pin) number
/// and applies the comparator polarity itself, so implementations report the
/// raw level: `true` for high.
///
/// Closures taking the pin number implement this trait:
///
/// ```rust
/// # use ads1115_hal::ReadySignal;
/// let mut always_low = |_pin: u8| false;
/// assert!(!always_low.is_high(17));
/// ```
pub trait ReadySignal {
    /// Current level of `pin`.
    fn is_high(&mut self, pin: u8) -> bool;
}

impl<F: FnMut(u8) -> bool> ReadySignal for F {
    fn is_high(&mut self, pin: u8) -> bool {
        self(pin)
    }
}

/// Placeholder [`ReadySignal`] for drivers that only poll the OS bit.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoReadySignal;

impl ReadySignal for NoReadySignal {
    fn is_high(&mut self, _pin: u8) -> bool {
        false
    }
}

/// [`ReadySignal`] over a single [`embedded_hal::digital::InputPin`].
///
/// The pin number is ignored, as the wrapped pin is already the ALERT/RDY line.
/// A failed read is reported as high, which is the idle level for the default
/// active-low polarity.
#[derive(Debug)]
pub struct InputPinSignal<P> {
    pin: P,
}

impl<P: InputPin> InputPinSignal<P> {
    /// Wrap the input pin connected to ALERT/RDY.
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// Give back the input pin.
    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: InputPin> ReadySignal for InputPinSignal<P> {
    fn is_high(&mut self, _pin: u8) -> bool {
        self.pin.is_high().unwrap_or_else(|e| {
            log::warn!("ALERT/RDY pin read failed: {:?}", embedded_hal::digital::Error::kind(&e));
            true
        })
    }
}

/// Millisecond time source.
///
/// The value only needs to be monotonic modulo 2^32: the driver compares
/// timestamps with wrapping arithmetic, so rollover is harmless as long as no
/// single wait exceeds about 24 days.
pub trait Clock {
    /// Milliseconds since an arbitrary epoch.
    fn now_ms(&self) -> u32;
}

impl<F: Fn() -> u32> Clock for F {
    fn now_ms(&self) -> u32 {
        self()
    }
}

/// [`Clock`] backed by [`std::time::Instant`], counting from its creation.
#[derive(Debug, Clone, Copy)]
pub struct StdClock {
    epoch: Instant,
}

impl StdClock {
    /// Start counting from now.
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for StdClock {
    fn now_ms(&self) -> u32 {
        // Truncation is the intended wrapping behaviour.
        self.epoch.elapsed().as_millis() as u32
    }
}
