//! core::timeout
//!
//! Bounded-duration contexts for remote calls.
//!
//! Every remote call runs under a [`TimeoutContext`] created from the
//! command's `--timeout` flag. The context carries an absolute deadline;
//! [`TimeoutContext::run`] drops the governed future when the deadline
//! passes, which aborts any in-flight request.
//!
//! Durations use the familiar unit-suffixed syntax: `1ms`, `500ms`, `2s`,
//! `1m30s`, `1.5h`.

use std::fmt;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Timeout applied when `--timeout` is not given.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// The deadline of a [`TimeoutContext`] passed before the call finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedOut(pub Duration);

impl fmt::Display for TimedOut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "operation timed out after {}", format_duration(self.0))
    }
}

impl std::error::Error for TimedOut {}

/// A deadline for one remote call.
///
/// Contexts are created per call and never shared between calls.
#[derive(Debug)]
pub struct TimeoutContext {
    timeout: Duration,
    deadline: Instant,
}

impl TimeoutContext {
    /// Start a context expiring `timeout` from now.
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            deadline: Instant::now() + timeout,
        }
    }

    /// The configured duration.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Time left before the deadline; zero once expired.
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    /// Drive `fut` until it completes or the deadline passes.
    ///
    /// On expiry the future is dropped and `TimedOut` is converted into the
    /// caller's error type.
    pub async fn run<F, T, E>(&self, fut: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: From<TimedOut>,
    {
        match tokio::time::timeout_at(self.deadline, fut).await {
            Ok(result) => result,
            Err(_) => Err(TimedOut(self.timeout).into()),
        }
    }
}

/// Parse a unit-suffixed duration such as `1m30s`.
///
/// A bare `0` is accepted. Units: `ns`, `us` (or `µs`), `ms`, `s`, `m`, `h`.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let s = input.trim();
    if s.is_empty() {
        return Err("empty duration".to_string());
    }
    if s == "0" {
        return Ok(Duration::ZERO);
    }

    let mut rest = s;
    let mut total = 0f64;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if number_len == 0 {
            return Err(format!("invalid duration '{}'", input));
        }
        let value: f64 = rest[..number_len]
            .parse()
            .map_err(|_| format!("invalid duration '{}'", input))?;
        rest = &rest[number_len..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let nanos_per_unit = match &rest[..unit_len] {
            "ns" => 1.0,
            "us" | "µs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            "" => return Err(format!("missing unit in duration '{}'", input)),
            unit => return Err(format!("unknown unit '{}' in duration '{}'", unit, input)),
        };
        rest = &rest[unit_len..];
        total += value * nanos_per_unit;
    }

    if !total.is_finite() || total > u64::MAX as f64 {
        return Err(format!("duration '{}' out of range", input));
    }
    Ok(Duration::from_nanos(total.round() as u64))
}

/// Render a duration in the same syntax `parse_duration` accepts.
pub fn format_duration(d: Duration) -> String {
    if d.is_zero() {
        return "0s".to_string();
    }
    let nanos = d.as_nanos();
    if nanos < 1_000 {
        return format!("{}ns", nanos);
    }
    if nanos < 1_000_000 {
        return format!("{}µs", trim_float(nanos as f64 / 1e3));
    }
    if nanos < 1_000_000_000 {
        return format!("{}ms", trim_float(nanos as f64 / 1e6));
    }

    let total_secs = d.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let secs = (total_secs % 60) as f64 + f64::from(d.subsec_nanos()) / 1e9;

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{}h", hours));
    }
    if hours > 0 || minutes > 0 {
        out.push_str(&format!("{}m", minutes));
    }
    out.push_str(&format!("{}s", trim_float(secs)));
    out
}

fn trim_float(value: f64) -> String {
    let text = format!("{:.9}", value);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}
