//! Chat-history date binning
//!
//! Groups timestamped chat sessions into the labeled recency buckets the
//! history sidebar displays: Today, Yesterday, a weekday name for earlier
//! days of the current week, Last 30 days, a month name for earlier months
//! of the current year, and month plus year for anything older.
//!
//! Binning is a pure function of the items and an explicit `now`, so it is
//! safe to call concurrently and deterministic under test. All calendar
//! arithmetic happens in UTC; weeks start on Sunday.

use crate::error::Result;
use chrono::{DateTime, Datelike, Duration, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub mod locale;
pub use locale::{BinLabels, EnglishLabels, JapaneseLabels, Locale};

/// One stored chat session as the sidebar sees it
///
/// The binner reads only `timestamp`; the other fields ride along opaquely.
/// Timestamps are RFC 3339 strings as produced by the persistence layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryItem {
    /// Unique identifier for the session
    pub id: String,
    /// When the session was last active (RFC 3339)
    pub timestamp: String,
    /// User-facing description or first prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A labeled group of history items sharing one recency category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bin {
    /// Display label for the group
    pub category: String,
    /// Items in the group, most recent first
    pub items: Vec<HistoryItem>,
}

/// Recency category of a single item relative to `now`
///
/// Kept separate from label rendering so the classification rules and the
/// locale strings stay independently testable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum DateCategory {
    Today,
    Yesterday,
    Weekday(Weekday),
    LastThirtyDays,
    Month(u32),
    MonthYear(u32, i32),
}

impl DateCategory {
    fn label(&self, labels: &dyn BinLabels) -> String {
        match self {
            Self::Today => labels.today(),
            Self::Yesterday => labels.yesterday(),
            Self::Weekday(weekday) => labels.weekday(*weekday),
            Self::LastThirtyDays => labels.last_thirty_days(),
            Self::Month(month) => labels.month(*month),
            Self::MonthYear(month, year) => labels.month_year(*month, *year),
        }
    }
}

/// Group history items into ordered, labeled recency bins
///
/// Items are sorted most recent first (stable, so equal timestamps keep
/// their input order), each is classified against `now`, and bins are
/// emitted in the order their category is first seen during that scan. For
/// well-formed history this yields a recency-descending bin order without
/// ever sorting bins by a fixed calendar priority.
///
/// Future-dated items are classified by the same rules: same calendar day
/// as `now` lands in Today, anything else falls through to whichever later
/// rule matches.
///
/// # Errors
///
/// Fails with [`crate::error::ChatRelayError::HistoryTimestamp`] if any
/// item's timestamp is not valid RFC 3339. The whole call fails; bad
/// entries are never skipped silently.
///
/// # Examples
///
/// ```
/// use chatrelay::history::{bin_by_date, HistoryItem, JapaneseLabels};
/// use chrono::{TimeZone, Utc};
///
/// let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
/// let items = vec![HistoryItem {
///     id: "a".to_string(),
///     timestamp: "2024-03-15T09:00:00Z".to_string(),
///     description: None,
/// }];
/// let bins = bin_by_date(items, now, &JapaneseLabels).unwrap();
/// assert_eq!(bins[0].category, "今日");
/// ```
pub fn bin_by_date(
    items: Vec<HistoryItem>,
    now: DateTime<Utc>,
    labels: &dyn BinLabels,
) -> Result<Vec<Bin>> {
    // Parse every timestamp up front so a malformed entry fails the call
    // before any bin is built.
    let mut dated: Vec<(HistoryItem, DateTime<Utc>)> = Vec::with_capacity(items.len());
    for item in items {
        let timestamp = DateTime::parse_from_rfc3339(&item.timestamp)
            .map_err(crate::error::ChatRelayError::HistoryTimestamp)?
            .with_timezone(&Utc);
        dated.push((item, timestamp));
    }

    // Most recent first; sort_by is stable so ties keep input order.
    dated.sort_by(|a, b| b.1.cmp(&a.1));

    let mut bins: Vec<Bin> = Vec::new();
    let mut bin_lookup: HashMap<String, usize> = HashMap::new();

    for (item, timestamp) in dated {
        let category = date_category(timestamp, now).label(labels);

        match bin_lookup.get(&category) {
            Some(&index) => bins[index].items.push(item),
            None => {
                bin_lookup.insert(category.clone(), bins.len());
                bins.push(Bin {
                    category,
                    items: vec![item],
                });
            }
        }
    }

    Ok(bins)
}

/// Classify one timestamp against `now`
///
/// Rules are evaluated in strict priority order; the first match wins:
///
/// 1. same calendar day -> Today
/// 2. previous calendar day -> Yesterday
/// 3. same calendar week (Sunday start) -> weekday
/// 4. strictly after `now - 30 days` -> Last 30 days
/// 5. same calendar year -> month
/// 6. otherwise -> month and year
fn date_category(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> DateCategory {
    let date = timestamp.date_naive();
    let today = now.date_naive();

    if date == today {
        return DateCategory::Today;
    }

    if Some(date) == today.pred_opt() {
        return DateCategory::Yesterday;
    }

    if date.week(Weekday::Sun).first_day() == today.week(Weekday::Sun).first_day() {
        return DateCategory::Weekday(date.weekday());
    }

    // Exclusive boundary: an item exactly 30 days old falls through.
    if timestamp > now - Duration::days(30) {
        return DateCategory::LastThirtyDays;
    }

    if date.year() == today.year() {
        return DateCategory::Month(date.month());
    }

    DateCategory::MonthYear(date.month(), date.year())
}
