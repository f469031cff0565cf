use chrono::{DateTime, FixedOffset, Local, NaiveDate, Offset, Utc};

/// Represents an entity responsible for providing dates across application. This can allow it to
/// be used for testing.
///
/// Calendar-day questions ("is this today?", "were these on the same day?") are answered in the
/// clock's own zone, so every projection sharing one clock agrees on where a day starts.
pub trait Clock: Send + Sync + 'static {
    fn time(&self) -> DateTime<Utc>;

    /// Moves a moment into the zone the user lives in.
    fn local(&self, moment: DateTime<Utc>) -> DateTime<FixedOffset>;

    fn day_of(&self, moment: DateTime<Utc>) -> NaiveDate {
        self.local(moment).date_naive()
    }

    fn today(&self) -> NaiveDate {
        self.day_of(self.time())
    }

    fn is_same_calendar_day(&self, a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
        self.day_of(a) == self.day_of(b)
    }

    fn is_today(&self, moment: DateTime<Utc>) -> bool {
        self.day_of(moment) == self.today()
    }
}

pub struct DefaultClock;

impl Clock for DefaultClock {
    fn time(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn local(&self, moment: DateTime<Utc>) -> DateTime<FixedOffset> {
        moment.with_timezone(&Local).fixed_offset()
    }
}

/// Clock frozen at a single moment. Used by tests and by the `--today` override.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Utc>,
    offset: FixedOffset,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self { now, offset }
    }

    pub fn utc(now: DateTime<Utc>) -> Self {
        Self::new(now, Utc.fix())
    }
}

impl Clock for FixedClock {
    fn time(&self) -> DateTime<Utc> {
        self.now
    }

    fn local(&self, moment: DateTime<Utc>) -> DateTime<FixedOffset> {
        moment.with_timezone(&self.offset)
    }
}
