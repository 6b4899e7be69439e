// Shared value types and the two sources of non-determinism: time and ids.
//
// Timestamps
// - All timestamps are epoch milliseconds (i64). Calendar math goes through chrono.

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use uuid::Uuid;

pub type EpochMillis = i64;

pub const MILLIS_PER_MINUTE: i64 = 60_000;

pub trait Clock: Send + Sync {
    fn now(&self) -> EpochMillis;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> EpochMillis {
        Utc::now().timestamp_millis()
    }
}

/// Clock frozen at a given instant; it only moves when told to.
#[derive(Debug, Default)]
pub struct FixedClock {
    now: AtomicI64,
}

impl FixedClock {
    pub fn at(now: EpochMillis) -> Self {
        Self {
            now: AtomicI64::new(now),
        }
    }

    pub fn advance_minutes(&self, minutes: i64) {
        self.now
            .fetch_add(minutes * MILLIS_PER_MINUTE, Ordering::SeqCst);
    }

    pub fn set(&self, now: EpochMillis) {
        self.now.store(now, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> EpochMillis {
        self.now.load(Ordering::SeqCst)
    }
}

pub trait IdGenerator: Send + Sync {
    fn next_id(&self, prefix: &str) -> String;
}

/// Time-ordered ids: `<prefix>-<uuid v7>`.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidV7Ids;

impl IdGenerator for UuidV7Ids {
    fn next_id(&self, prefix: &str) -> String {
        format!("{prefix}-{}", Uuid::now_v7())
    }
}

/// Predictable ids for tests and seeding: `<prefix>-0001`, `<prefix>-0002`, ...
#[derive(Debug, Default)]
pub struct SequentialIds {
    counter: AtomicU64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self, prefix: &str) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        format!("{prefix}-{n:04}")
    }
}

/// Time and id source handed to a decision. Everything a decision stamps on a
/// record comes from here.
pub struct Stamp<'a> {
    pub now: EpochMillis,
    ids: &'a dyn IdGenerator,
}

impl<'a> Stamp<'a> {
    pub fn new(now: EpochMillis, ids: &'a dyn IdGenerator) -> Self {
        Self { now, ids }
    }

    pub fn id(&self, prefix: &str) -> String {
        self.ids.next_id(prefix)
    }
}

pub fn to_local(at: EpochMillis, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    DateTime::<Utc>::from_timestamp_millis(at).map(|utc| utc.with_timezone(&offset))
}

pub fn local_date(at: EpochMillis, offset: FixedOffset) -> Option<NaiveDate> {
    to_local(at, offset).map(|local| local.date_naive())
}

/// First millisecond of `day` in the given offset.
pub fn start_of_local_day(day: NaiveDate, offset: FixedOffset) -> EpochMillis {
    day.and_time(chrono::NaiveTime::MIN).and_utc().timestamp_millis()
        - i64::from(offset.local_minus_utc()) * 1000
}

pub fn format_local(at: EpochMillis, offset: FixedOffset) -> String {
    to_local(at, offset)
        .map(|local| local.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

pub fn utc_offset(minutes: i32) -> FixedOffset {
    FixedOffset::east_opt(minutes * 60).unwrap_or_else(|| Utc.fix())
}
