use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::Serialize;

use crate::records::{date_key, MistakeRecord, RecordStore};

/// Viewed month and selected day. Not part of the record snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarSelection {
    reference_month: NaiveDate,
    selected: NaiveDate,
}

impl CalendarSelection {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            reference_month: first_of_month(today),
            selected: today,
        }
    }

    /// Always the 1st of the viewed month.
    pub fn reference_month(&self) -> NaiveDate {
        self.reference_month
    }

    pub fn selected(&self) -> NaiveDate {
        self.selected
    }

    pub fn next_month(&mut self) {
        if let Some(next) = self.reference_month.checked_add_months(Months::new(1)) {
            self.reference_month = next;
        }
    }

    pub fn prev_month(&mut self) {
        if let Some(prev) = self.reference_month.checked_sub_months(Months::new(1)) {
            self.reference_month = prev;
        }
    }

    pub fn select_date(&mut self, date: NaiveDate) {
        self.selected = date;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date: String,
    pub day_of_month: u32,
    pub mistake_count: usize,
    pub is_current_month: bool,
    pub is_today: bool,
    pub is_selected: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthView {
    /// `YYYY-MM`
    pub month: String,
    pub selected_date: String,
    pub days: Vec<CalendarDay>,
    /// Records of the selected day, newest first.
    pub selected_records: Vec<MistakeRecord>,
}

impl MonthView {
    pub fn weeks(&self) -> impl Iterator<Item = &[CalendarDay]> {
        self.days.chunks(7)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TodayStatus {
    Good,
    Normal,
    Attention,
}

impl TodayStatus {
    pub fn from_count(count: usize) -> Self {
        match count {
            0 => Self::Good,
            1..=2 => Self::Normal,
            _ => Self::Attention,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Good => "Nothing logged today, looking good!",
            Self::Normal => "A few entries, normal ups and downs.",
            Self::Attention => "Quite a lot today, keep an eye on it!",
        }
    }
}

/// Every date from the Sunday on or before the 1st of `month` to the
/// Saturday on or after its last day.
pub fn month_grid(month: NaiveDate) -> Vec<NaiveDate> {
    let first = first_of_month(month);
    let last = last_of_month(first);
    let start = first - Duration::days(i64::from(first.weekday().num_days_from_sunday()));
    let end = last + Duration::days(6 - i64::from(last.weekday().num_days_from_sunday()));

    start.iter_days().take_while(|date| *date <= end).collect()
}

pub fn project_month(
    selection: &CalendarSelection,
    today: NaiveDate,
    store: &RecordStore,
) -> MonthView {
    let month = selection.reference_month();
    let selected = selection.selected();

    let days = month_grid(month)
        .into_iter()
        .map(|date| CalendarDay {
            date: date_key(date),
            day_of_month: date.day(),
            mistake_count: store.count_on(date),
            is_current_month: date.year() == month.year() && date.month() == month.month(),
            is_today: date == today,
            is_selected: date == selected,
        })
        .collect();

    MonthView {
        month: month.format("%Y-%m").to_string(),
        selected_date: date_key(selected),
        days,
        selected_records: records_newest_first(store, selected),
    }
}

pub fn records_newest_first(store: &RecordStore, date: NaiveDate) -> Vec<MistakeRecord> {
    let mut records = store.get_by_date(&date_key(date)).to_vec();
    records.sort_by(|a, b| b.start_time.cmp(&a.start_time));
    records
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

fn last_of_month(first: NaiveDate) -> NaiveDate {
    first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(first)
}
