//! Device health as observed through bus transactions.
use crate::error::Error;

/// Operational state of the driver.
///
/// After a successful [`ADS1115::begin`], the state is derived solely from the
/// number of consecutive failed transport calls:
///
/// | Consecutive failures           | State                        |
/// | ------------------------------ | ---------------------------- |
/// | 0                              | [`Ready`](Self::Ready)       |
/// | 1 up to the offline threshold  | [`Degraded`](Self::Degraded) |
/// | the offline threshold or more  | [`Offline`](Self::Offline)   |
///
/// [`ADS1115::begin`]: crate::ADS1115::begin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriverState {
    /// `begin` has not succeeded, or `end` was called.
    Uninitialized,
    /// The last transport call succeeded.
    Ready,
    /// Some recent transport calls have failed.
    Degraded,
    /// Enough consecutive transport calls have failed that the device is
    /// presumed absent. Call [`ADS1115::recover`](crate::ADS1115::recover) to
    /// check whether it has come back.
    Offline,
}

impl DriverState {
    /// True if the device is believed to be reachable.
    pub fn is_online(&self) -> bool {
        matches!(self, DriverState::Ready | DriverState::Degraded)
    }
}

impl std::fmt::Display for DriverState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DriverState::Uninitialized => "uninitialized",
            DriverState::Ready => "ready",
            DriverState::Degraded => "degraded",
            DriverState::Offline => "offline",
        };
        f.write_str(name)
    }
}

/// Counters describing the outcome of tracked transport calls.
///
/// All counters saturate rather than wrap. They are reset only by
/// [`ADS1115::begin`](crate::ADS1115::begin).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Health {
    /// Timestamp (from the driver's clock) of the last successful call.
    pub last_ok_ms: u32,
    /// Timestamp of the last failed call.
    pub last_error_ms: u32,
    /// The last failure, if any call has failed since `begin`.
    pub last_error: Option<Error>,
    /// Failures since the last success.
    pub consecutive_failures: u8,
    /// Failures since `begin`.
    pub total_failures: u32,
    /// Successes since `begin`.
    pub total_success: u32,
}

impl Health {
    pub(crate) fn record_success(&mut self, now_ms: u32) {
        self.last_ok_ms = now_ms;
        self.consecutive_failures = 0;
        self.total_success = self.total_success.saturating_add(1);
    }

    pub(crate) fn record_failure(&mut self, error: Error, now_ms: u32) {
        self.last_error_ms = now_ms;
        self.last_error = Some(error);
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        self.total_failures = self.total_failures.saturating_add(1);
    }

    /// State implied by the failure streak for the given offline threshold.
    pub(crate) fn classify(&self, offline_threshold: u8) -> DriverState {
        match self.consecutive_failures {
            0 => DriverState::Ready,
            n if n >= offline_threshold => DriverState::Offline,
            _ => DriverState::Degraded,
        }
    }
}
