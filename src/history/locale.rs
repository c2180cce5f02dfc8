//! Localized label rendering for history bins
//!
//! Bin labels (weekday names, month names, the fixed Today/Yesterday/Last-30
//! strings) are locale concerns, kept separate from the binning algorithm so
//! the two stay independently testable. The product shipped with Japanese
//! labels; an English table is provided for deployments that want it.

use chrono::Weekday;

/// Label table for one locale
///
/// Implementations render the six recency categories into display strings.
/// Months are numbered 1 through 12 as `chrono` reports them.
pub trait BinLabels: Send + Sync {
    /// Label for items from the current calendar day
    fn today(&self) -> String;

    /// Label for items from the previous calendar day
    fn yesterday(&self) -> String;

    /// Weekday name for items earlier in the current calendar week
    fn weekday(&self, weekday: Weekday) -> String;

    /// Label for items within the preceding 30 days
    fn last_thirty_days(&self) -> String;

    /// Month name for items from the current calendar year
    fn month(&self, month: u32) -> String;

    /// Month and year for items from earlier years
    fn month_year(&self, month: u32, year: i32) -> String;
}

/// Japanese labels (the product default)
#[derive(Debug, Clone, Copy, Default)]
pub struct JapaneseLabels;

impl BinLabels for JapaneseLabels {
    fn today(&self) -> String {
        "今日".to_string()
    }

    fn yesterday(&self) -> String {
        "昨日".to_string()
    }

    fn weekday(&self, weekday: Weekday) -> String {
        let name = match weekday {
            Weekday::Mon => "月曜日",
            Weekday::Tue => "火曜日",
            Weekday::Wed => "水曜日",
            Weekday::Thu => "木曜日",
            Weekday::Fri => "金曜日",
            Weekday::Sat => "土曜日",
            Weekday::Sun => "日曜日",
        };
        name.to_string()
    }

    fn last_thirty_days(&self) -> String {
        "最後の30日".to_string()
    }

    fn month(&self, month: u32) -> String {
        format!("{}月", month)
    }

    fn month_year(&self, month: u32, year: i32) -> String {
        format!("{}月 {}", month, year)
    }
}

/// English labels
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishLabels;

impl BinLabels for EnglishLabels {
    fn today(&self) -> String {
        "Today".to_string()
    }

    fn yesterday(&self) -> String {
        "Yesterday".to_string()
    }

    fn weekday(&self, weekday: Weekday) -> String {
        let name = match weekday {
            Weekday::Mon => "Monday",
            Weekday::Tue => "Tuesday",
            Weekday::Wed => "Wednesday",
            Weekday::Thu => "Thursday",
            Weekday::Fri => "Friday",
            Weekday::Sat => "Saturday",
            Weekday::Sun => "Sunday",
        };
        name.to_string()
    }

    fn last_thirty_days(&self) -> String {
        "Last 30 days".to_string()
    }

    fn month(&self, month: u32) -> String {
        month_name(month).to_string()
    }

    fn month_year(&self, month: u32, year: i32) -> String {
        format!("{} {}", month_name(month), year)
    }
}

/// English month name for a 1-based month number
fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        _ => "December",
    }
}

/// Locale selector used by configuration
///
/// Parsed from the `history.locale` config field ("ja" or "en").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum Locale {
    /// Japanese labels (default)
    #[default]
    #[serde(rename = "ja")]
    Japanese,
    /// English labels
    #[serde(rename = "en")]
    English,
}

impl Locale {
    /// The label table for this locale
    pub fn labels(&self) -> &'static dyn BinLabels {
        match self {
            Self::Japanese => &JapaneseLabels,
            Self::English => &EnglishLabels,
        }
    }
}
