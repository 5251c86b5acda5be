//! The driver's error type.

/// Classification of a failed driver operation.
///
/// The kinds fall into three groups, and the driver treats each differently:
///
/// - Caller faults ([`InvalidConfig`], [`InvalidParam`], [`NotInitialized`]) are
///   never retried and never counted against the device's health.
/// - Bus faults ([`TransportError`], [`DeviceNotFound`], [`Timeout`]) indicate
///   that the ADS1115 may be unreachable. Transport failures are counted by the
///   health tracker, but not retried; that is left to the caller.
/// - Polling outcomes ([`ConversionNotReady`], [`Busy`]) are expected during
///   normal single-shot operation and are not faults at all.
///
/// [`InvalidConfig`]: ErrorKind::InvalidConfig
/// [`InvalidParam`]: ErrorKind::InvalidParam
/// [`NotInitialized`]: ErrorKind::NotInitialized
/// [`TransportError`]: ErrorKind::TransportError
/// [`DeviceNotFound`]: ErrorKind::DeviceNotFound
/// [`Timeout`]: ErrorKind::Timeout
/// [`ConversionNotReady`]: ErrorKind::ConversionNotReady
/// [`Busy`]: ErrorKind::Busy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// [`ADS1115::begin`] has not been called, or [`ADS1115::end`] was called.
    ///
    /// [`ADS1115::begin`]: crate::ADS1115::begin
    /// [`ADS1115::end`]: crate::ADS1115::end
    NotInitialized,
    /// The [`Config`](crate::Config) passed to `begin` was rejected.
    ///
    /// The error detail is one of the `DETAIL_*` constants in this module.
    InvalidConfig,
    /// The transport failed to complete a bus transaction.
    ///
    /// The error detail is whatever code the transport attached.
    TransportError,
    /// A blocking read did not complete before its deadline.
    Timeout,
    /// An argument was outside its permitted range.
    InvalidParam,
    /// The ADS1115 did not respond when probed.
    DeviceNotFound,
    /// A single-shot conversion has not finished, or none was started.
    ConversionNotReady,
    /// A conversion is already outstanding, or the device is in continuous mode.
    Busy,
}

/// The configured timeout was zero.
pub const DETAIL_ZERO_TIMEOUT: i32 = 1;
/// The configured address was outside `0x48..=0x4B`.
pub const DETAIL_INVALID_ADDRESS: i32 = 2;
/// A ready pin was configured but the driver has no ready-signal reader.
pub const DETAIL_READY_PIN_WITHOUT_READER: i32 = 3;

/// Error returned by every fallible driver operation.
///
/// Carries an [`ErrorKind`], an optional numeric detail (zero when absent), and
/// a static description of what went wrong.
///
/// Transport implementations construct these directly:
///
/// ```rust
/// # use ads1115_hal::{Error, ErrorKind};
/// let err = Error::new(ErrorKind::TransportError, "I2C NACK").with_detail(-121);
/// assert_eq!(err.kind(), ErrorKind::TransportError);
/// assert_eq!(err.detail(), -121);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    detail: i32,
    message: &'static str,
}

impl Error {
    /// Create an error with no detail code.
    pub const fn new(kind: ErrorKind, message: &'static str) -> Self {
        Self {
            kind,
            detail: 0,
            message,
        }
    }

    /// Attach a numeric detail, such as an underlying bus error code.
    pub const fn with_detail(self, detail: i32) -> Self {
        Self { detail, ..self }
    }

    /// Classification of the failure.
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Numeric diagnostic detail, or 0 if none was attached.
    pub const fn detail(&self) -> i32 {
        self.detail
    }

    /// Static description of the failure.
    pub const fn message(&self) -> &'static str {
        self.message
    }

    /// True for the normal outcomes of polling a single-shot conversion.
    ///
    /// These are not faults and do not affect the device's health.
    pub const fn is_transient(&self) -> bool {
        matches!(self.kind, ErrorKind::ConversionNotReady | ErrorKind::Busy)
    }

    /// True if the error stems from the caller's configuration or arguments
    /// rather than the device, and so must not count against its health.
    pub(crate) const fn is_caller_fault(&self) -> bool {
        matches!(self.kind, ErrorKind::InvalidConfig | ErrorKind::InvalidParam)
    }

    pub(crate) const fn not_initialized() -> Self {
        Self::new(ErrorKind::NotInitialized, "Driver not initialized")
    }

    pub(crate) const fn not_ready() -> Self {
        Self::new(ErrorKind::ConversionNotReady, "Conversion not ready")
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)?;
        if self.detail != 0 {
            write!(f, " (detail {})", self.detail)?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}
