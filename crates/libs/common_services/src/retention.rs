//! Album lifetime math.
//!
//! Every album lives on two clocks anchored to its first upload: an upload
//! window measured in hours, after which the album locks (read-only), and a
//! lifetime measured in days, after which the album is gone. An album that
//! never received an upload counts its upload window from creation and is
//! never auto-deleted.

use app_state::RetentionConstants;

const MS_PER_HOUR: i64 = 3_600_000;
const MS_PER_DAY: i64 = 86_400_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    pub upload_window_hours: i64,
    pub lifetime_days: i64,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            upload_window_hours: 42,
            lifetime_days: 7,
        }
    }
}

impl From<&RetentionConstants> for RetentionPolicy {
    fn from(constants: &RetentionConstants) -> Self {
        Self {
            upload_window_hours: constants.upload_window_hours,
            lifetime_days: constants.lifetime_days,
        }
    }
}

/// A snapshot of where an album sits on both clocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlbumWindow {
    /// Whole hours left in the upload window. Negative once it has closed.
    pub hours_remaining: i64,
    /// Whole days left before deletion; `None` while no upload has happened.
    pub days_remaining: Option<i64>,
    /// The upload window has closed but the album still exists.
    pub locked: bool,
    /// The album is past its deletion threshold.
    pub expired: bool,
}

impl RetentionPolicy {
    /// Hours left in the upload window. `>= 0` means uploads are still
    /// permitted; negative means the window has closed.
    #[must_use]
    pub fn hours_remaining(&self, now_ms: i64, anchor_ms: i64) -> i64 {
        self.upload_window_hours - (now_ms - anchor_ms).div_euclid(MS_PER_HOUR)
    }

    /// Days left before the album is deleted. Negative means it is past the
    /// hard threshold and must be treated as gone.
    #[must_use]
    pub fn days_remaining(&self, now_ms: i64, anchor_ms: i64) -> i64 {
        self.lifetime_days - (now_ms - anchor_ms).div_euclid(MS_PER_DAY)
    }

    /// Resolve both clocks for an album. `first_upload_ms` being `None`
    /// means the retention clock has not started: the hour budget counts
    /// from creation and the album never expires.
    #[must_use]
    pub fn window(
        &self,
        now_ms: i64,
        created_ms: i64,
        first_upload_ms: Option<i64>,
    ) -> AlbumWindow {
        let hour_anchor = first_upload_ms.unwrap_or(created_ms);
        let hours_remaining = self.hours_remaining(now_ms, hour_anchor);
        let days_remaining = first_upload_ms.map(|anchor| self.days_remaining(now_ms, anchor));

        AlbumWindow {
            hours_remaining,
            days_remaining,
            locked: first_upload_ms.is_some() && hours_remaining < 0,
            expired: days_remaining.is_some_and(|days| days < 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const ANCHOR: i64 = 1_700_000_000_000;

    #[rstest]
    #[case(0, 42)]
    #[case(MS_PER_HOUR - 1, 42)]
    #[case(MS_PER_HOUR, 41)]
    #[case(MS_PER_HOUR * 5, 37)]
    #[case(MS_PER_HOUR * 42, 0)]
    #[case(MS_PER_HOUR * 43, -1)]
    fn hours_remaining_cases(#[case] elapsed: i64, #[case] expected: i64) {
        let policy = RetentionPolicy::default();
        assert_eq!(policy.hours_remaining(ANCHOR + elapsed, ANCHOR), expected);
    }

    #[rstest]
    #[case(0, 7)]
    #[case(MS_PER_DAY * 7, 0)]
    #[case(MS_PER_DAY * 8, -1)]
    fn days_remaining_cases(#[case] elapsed: i64, #[case] expected: i64) {
        let policy = RetentionPolicy::default();
        assert_eq!(policy.days_remaining(ANCHOR + elapsed, ANCHOR), expected);
    }

    #[test]
    fn hours_remaining_is_non_increasing() {
        let policy = RetentionPolicy::default();
        let mut previous = i64::MAX;
        for step in 0..200 {
            // Quarter-hour steps cross each hour boundary exactly once.
            let now = ANCHOR + step * (MS_PER_HOUR / 4);
            let hours = policy.hours_remaining(now, ANCHOR);
            assert!(hours <= previous);
            previous = hours;
        }
        assert_eq!(previous, 42 - 49);
    }

    #[test]
    fn hours_drop_by_one_per_hour_boundary() {
        let policy = RetentionPolicy::default();
        for hour in 0..50 {
            let before = policy.hours_remaining(ANCHOR + hour * MS_PER_HOUR - 1, ANCHOR);
            let after = policy.hours_remaining(ANCHOR + hour * MS_PER_HOUR, ANCHOR);
            if hour > 0 {
                assert_eq!(before - after, 1);
            }
        }
    }

    #[test]
    fn window_without_upload_never_expires() {
        let policy = RetentionPolicy::default();
        let far_future = ANCHOR + MS_PER_DAY * 365;
        let window = policy.window(far_future, ANCHOR, None);
        assert_eq!(window.days_remaining, None);
        assert!(!window.expired);
        // The hour budget still ran out against creation, but an album that
        // never started its clock does not lock.
        assert!(window.hours_remaining < 0);
        assert!(!window.locked);
    }

    #[test]
    fn window_locks_after_upload_budget_spent() {
        let policy = RetentionPolicy::default();
        let now = ANCHOR + MS_PER_HOUR * 43;
        let window = policy.window(now, ANCHOR - MS_PER_DAY, Some(ANCHOR));
        assert!(window.locked);
        assert!(!window.expired);
        assert_eq!(window.days_remaining, Some(6));
    }

    #[test]
    fn window_expires_after_lifetime() {
        let policy = RetentionPolicy::default();
        let now = ANCHOR + MS_PER_DAY * 8;
        let window = policy.window(now, ANCHOR, Some(ANCHOR));
        assert!(window.expired);
        assert_eq!(window.days_remaining, Some(-1));
    }
}
