#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
mod driver;
pub mod error;
mod health;
pub mod registers;
pub mod transport;

pub use config::{
    ComparatorLatch, ComparatorMode, ComparatorPolarity, ComparatorQueue, Config, DataRate, Gain,
    Mode, Mux,
};
pub use driver::{ADS1115, InProgress};
pub use error::{Error, ErrorKind};
pub use health::{DriverState, Health};
pub use transport::{
    Clock, I2cTransport, InputPinSignal, NoReadySignal, ReadySignal, StdClock, Transport,
};
