// Business hours and the overtime they imply.
//
// Overtime is every minute of a session that falls outside the daily
// [start_hour, end_hour) window, evaluated per local calendar day so that
// overnight sessions are split correctly.

use crate::shared::core::primitives::{EpochMillis, MILLIS_PER_MINUTE, local_date, utc_offset};
use chrono::{Duration, FixedOffset, NaiveDate, NaiveTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessHours {
    pub start_hour: u32,
    pub end_hour: u32,
    pub offset: FixedOffset,
}

impl BusinessHours {
    pub fn new(start_hour: u32, end_hour: u32, offset: FixedOffset) -> Self {
        Self {
            start_hour,
            end_hour,
            offset,
        }
    }

    pub fn total_minutes(login: EpochMillis, logout: EpochMillis) -> i64 {
        (logout - login).max(0) / MILLIS_PER_MINUTE
    }

    pub fn overtime_minutes(&self, login: EpochMillis, logout: EpochMillis) -> i64 {
        if logout <= login {
            return 0;
        }
        let (Some(first), Some(last)) = (
            local_date(login, self.offset),
            local_date(logout, self.offset),
        ) else {
            return 0;
        };

        let mut inside = 0;
        let mut day = Some(first);
        while let Some(current) = day.filter(|d| *d <= last) {
            let open = self.local_to_epoch(current, self.start_hour);
            let close = self.local_to_epoch(current, self.end_hour);
            let from = login.max(open);
            let to = logout.min(close);
            if to > from {
                inside += to - from;
            }
            day = current.succ_opt();
        }

        (logout - login - inside) / MILLIS_PER_MINUTE
    }

    fn local_to_epoch(&self, day: NaiveDate, hour: u32) -> EpochMillis {
        let local = day.and_time(NaiveTime::MIN) + Duration::hours(i64::from(hour));
        local.and_utc().timestamp_millis() - i64::from(self.offset.local_minus_utc()) * 1000
    }
}

impl Default for BusinessHours {
    fn default() -> Self {
        Self::new(9, 20, utc_offset(0))
    }
}
