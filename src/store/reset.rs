use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, ParseError, Utc};

/// Once-per-day wipe of all items, due at a wall-clock time in a fixed
/// UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyReset {
    at: NaiveTime,
    offset: FixedOffset,
}

impl DailyReset {
    #[must_use]
    pub fn new(at: NaiveTime, offset: FixedOffset) -> Self {
        Self { at, offset }
    }

    /// Parse `"HH:MM[:SS]"` and an offset such as `"+05:30"`.
    pub fn parse(at: &str, utc_offset: &str) -> Result<Self, ParseError> {
        let time = NaiveTime::parse_from_str(at, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(at, "%H:%M"))?;
        let offset: FixedOffset = utc_offset.parse()?;
        Ok(Self::new(time, offset))
    }

    #[must_use]
    pub fn at(&self) -> NaiveTime {
        self.at
    }

    #[must_use]
    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// The local date to reset for, if a reset is due at `now`.
    ///
    /// Due once the local clock has passed the reset time on a date that has
    /// not been reset yet.
    #[must_use]
    pub fn due(&self, now: DateTime<Utc>, last_reset: Option<NaiveDate>) -> Option<NaiveDate> {
        let local = now.with_timezone(&self.offset);
        let today = local.date_naive();
        if last_reset == Some(today) || local.time() < self.at {
            return None;
        }
        Some(today)
    }
}
