//! Wall-clock timing for interactive sessions.

use core::time::Duration;
use std::time::Instant;

/// Measures elapsed time from the moment it was started.
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    started: Instant,
}

impl Stopwatch {
    #[must_use]
    pub fn start() -> Self {
        Self { started: Instant::now() }
    }

    /// Start over from now.
    pub fn restart(&mut self) {
        self.started = Instant::now();
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// A line such as `Loading took 1.23 seconds`.
    #[must_use]
    pub fn report(&self, activity: &str) -> String {
        let line = describe(activity, self.elapsed());
        log::info!("{line}");
        line
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::start()
    }
}

/// Describe how long `activity` took, to three significant digits.
#[must_use]
pub fn describe(activity: &str, elapsed: Duration) -> String {
    format!("{activity} took {} seconds", format_significant(elapsed.as_secs_f64(), 3))
}

/// Format `value` with `digits` significant digits, dropping trailing zeros.
///
/// Very large or very small magnitudes switch to exponent notation, e.g. `1.5e+04`.
#[must_use]
pub fn format_significant(value: f64, digits: usize) -> String {
    if value == 0.0 || !value.is_finite() {
        return format!("{value}");
    }

    let digits = digits.max(1);
    let scientific = format!("{value:.prec$e}", prec = digits - 1);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let digits = i32::try_from(digits).unwrap_or(i32::MAX);

    if exponent < -4 || exponent >= digits {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{sign}{:02}", trim_fraction(mantissa), exponent.abs())
    } else {
        let decimals = usize::try_from(digits - 1 - exponent).unwrap_or(0);
        trim_fraction(&format!("{value:.decimals$}"))
    }
}

fn trim_fraction(number: &str) -> String {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        number.to_string()
    }
}
