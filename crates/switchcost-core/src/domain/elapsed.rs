use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use chrono::{Duration, NaiveDateTime};

const MICROSECONDS_PER_SECOND: i64 = 1_000_000;
const SECONDS_PER_DAY: i64 = 86_400;

/// Non-negative wall-clock gap between two transition events.
///
/// Rendered as `H:MM:SS` with an optional `.ffffff` fraction, prefixed by
/// `N day, ` / `N days, ` once it spans more than a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Elapsed(Duration);

impl Elapsed {
    pub fn zero() -> Self {
        Self(Duration::zero())
    }

    /// Gap from `earlier` to `later`, clamped to zero when the clock went backwards.
    pub fn between(earlier: NaiveDateTime, later: NaiveDateTime) -> Self {
        Self::from_duration(later.signed_duration_since(earlier))
    }

    pub fn from_duration(duration: Duration) -> Self {
        if duration < Duration::zero() {
            Self::zero()
        } else {
            Self(duration)
        }
    }

    /// Saturates at the largest representable gap.
    pub fn from_seconds(seconds: i64) -> Self {
        match Duration::try_seconds(seconds) {
            Some(duration) => Self::from_duration(duration),
            None if seconds < 0 => Self::zero(),
            None => Self(Duration::max_value()),
        }
    }

    pub fn as_seconds_f64(&self) -> f64 {
        self.total_microseconds() as f64 / MICROSECONDS_PER_SECOND as f64
    }

    pub fn whole_seconds(&self) -> i64 {
        self.0.num_seconds()
    }

    fn total_microseconds(&self) -> i64 {
        self.0.num_microseconds().unwrap_or(i64::MAX)
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();

        let (days, clock) = match value.split_once(", ") {
            Some((day_part, clock)) => {
                let count = day_part
                    .strip_suffix(" days")
                    .or_else(|| day_part.strip_suffix(" day"))?;
                (count.trim().parse::<i64>().ok()?, clock)
            }
            None => (0, value),
        };

        let mut fields = clock.split(':');
        let hours: i64 = fields.next()?.parse().ok()?;
        let minutes: i64 = fields.next()?.parse().ok()?;
        let seconds_field = fields.next()?;
        if fields.next().is_some() {
            return None;
        }

        let (whole_seconds, fraction) = seconds_field
            .split_once('.')
            .unwrap_or((seconds_field, ""));
        let seconds: i64 = whole_seconds.parse().ok()?;
        let microseconds = parse_fraction(fraction)?;

        if days < 0 || hours < 0 || !(0..60).contains(&minutes) || !(0..60).contains(&seconds) {
            return None;
        }

        let duration = Duration::try_days(days)?
            .checked_add(&Duration::try_hours(hours)?)?
            .checked_add(&Duration::try_minutes(minutes)?)?
            .checked_add(&Duration::try_seconds(seconds)?)?
            .checked_add(&Duration::microseconds(microseconds))?;

        Some(Self(duration))
    }
}

fn parse_fraction(fraction: &str) -> Option<i64> {
    if fraction.is_empty() {
        return Some(0);
    }

    if fraction.len() > 6 || !fraction.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }

    let digits: i64 = fraction.parse().ok()?;
    Some(digits * 10_i64.pow(6 - fraction.len() as u32))
}

impl fmt::Display for Elapsed {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_microseconds = self.total_microseconds();
        let microseconds = total_microseconds % MICROSECONDS_PER_SECOND;
        let total_seconds = total_microseconds / MICROSECONDS_PER_SECOND;

        let days = total_seconds / SECONDS_PER_DAY;
        let hours = (total_seconds % SECONDS_PER_DAY) / 3_600;
        let minutes = (total_seconds % 3_600) / 60;
        let seconds = total_seconds % 60;

        if days > 0 {
            let unit = if days == 1 { "day" } else { "days" };
            write!(formatter, "{} {}, ", days, unit)?;
        }

        write!(formatter, "{}:{:02}:{:02}", hours, minutes, seconds)?;

        if microseconds > 0 {
            write!(formatter, ".{:06}", microseconds)?;
        }

        Ok(())
    }
}

impl Add for Elapsed {
    type Output = Elapsed;

    /// Saturates instead of overflowing; both sides are never negative.
    fn add(self, other: Elapsed) -> Elapsed {
        Elapsed(
            self.0
                .checked_add(&other.0)
                .unwrap_or_else(Duration::max_value),
        )
    }
}

impl AddAssign for Elapsed {
    fn add_assign(&mut self, other: Elapsed) {
        *self = *self + other;
    }
}

impl Sum for Elapsed {
    fn sum<I: Iterator<Item = Elapsed>>(iter: I) -> Self {
        iter.fold(Elapsed::zero(), Add::add)
    }
}
