//! The journal owns the record store, the timer, the calendar selection and
//! the achievement book, and wires the one-way flow between them:
//! timer save → store append → achievement and calendar recompute.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use crate::achievements::{AchievementBook, AchievementKey};
use crate::calendar::{
    project_month, records_newest_first, CalendarSelection, MonthView, TodayStatus,
};
use crate::records::{date_key, local_date_of, MistakeRecord, RecordStore, RecordStoreSnapshot};
use crate::timer::{MistakeTimer, TimerSnapshot};

#[derive(Debug, Clone, Serialize)]
pub struct SavedRecord {
    pub record: MistakeRecord,
    pub unlocked: Vec<AchievementKey>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodaySummary {
    pub date: String,
    pub total_count: usize,
    pub today_count: usize,
    pub status: TodayStatus,
    pub message: &'static str,
}

#[derive(Debug)]
pub struct Journal {
    store: RecordStore,
    timer: MistakeTimer,
    selection: CalendarSelection,
    achievements: AchievementBook,
    view: MonthView,
    view_day: NaiveDate,
}

impl Journal {
    pub fn new(now_ms: i64) -> Self {
        Self::from_snapshot(RecordStoreSnapshot::default(), now_ms)
    }

    pub fn from_snapshot(snapshot: RecordStoreSnapshot, now_ms: i64) -> Self {
        let today = local_date_of(now_ms);
        let store = RecordStore::from_snapshot(snapshot);
        let selection = CalendarSelection::new(today);
        let mut achievements = AchievementBook::new();
        achievements.evaluate_store(&store);
        let view = project_month(&selection, today, &store);

        Self {
            store,
            timer: MistakeTimer::new(),
            selection,
            achievements,
            view,
            view_day: today,
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn timer(&self) -> &MistakeTimer {
        &self.timer
    }

    pub fn achievements(&self) -> &AchievementBook {
        &self.achievements
    }

    pub fn selection(&self) -> &CalendarSelection {
        &self.selection
    }

    pub fn snapshot(&self) -> RecordStoreSnapshot {
        self.store.snapshot()
    }

    // ── Timer ────────────────────────────────────────────────────────

    pub fn open_timer(&mut self, now_ms: i64) -> bool {
        self.timer.open(now_ms)
    }

    pub fn tick_timer(&mut self, now_ms: i64) -> bool {
        self.timer.tick(now_ms)
    }

    pub fn stop_timer(&mut self, now_ms: i64) -> bool {
        self.timer.stop(now_ms)
    }

    pub fn set_timer_category(&mut self, category: impl Into<String>) -> bool {
        self.timer.set_category(category)
    }

    pub fn set_timer_draft(&mut self, summary: impl Into<String>) -> bool {
        self.timer.set_draft_summary(summary)
    }

    pub fn discard_timer(&mut self) -> bool {
        self.timer.discard()
    }

    pub fn timer_snapshot(&self, now_ms: i64) -> TimerSnapshot {
        self.timer.snapshot(now_ms)
    }

    /// Save the stopped session and append it. `None` when the timer is not
    /// stopped; nothing is recorded in that case.
    pub fn save_timer(&mut self, summary: &str, now_ms: i64) -> Option<SavedRecord> {
        let record = self.timer.save(summary, now_ms)?;
        let unlocked = self.append(record.clone(), now_ms);
        Some(SavedRecord { record, unlocked })
    }

    // ── Store ────────────────────────────────────────────────────────

    /// Append a record, then recompute the store-driven achievements and the
    /// calendar view. Returns the achievements unlocked by this append.
    pub fn append(&mut self, record: MistakeRecord, now_ms: i64) -> Vec<AchievementKey> {
        info!(
            date = %record.date_key(),
            category = %record.category,
            duration = ?record.duration,
            "mistake recorded"
        );
        self.store.append(record);
        let unlocked = self.achievements.evaluate_store(&self.store);
        self.refresh_view(local_date_of(now_ms));
        unlocked
    }

    /// Records filed under `date`, newest first.
    pub fn records_on(&self, date: NaiveDate) -> Vec<MistakeRecord> {
        records_newest_first(&self.store, date)
    }

    pub fn today_summary(&self, now_ms: i64) -> TodaySummary {
        let today = local_date_of(now_ms);
        let today_count = self.store.count_on(today);
        let status = TodayStatus::from_count(today_count);
        TodaySummary {
            date: date_key(today),
            total_count: self.store.total_count(),
            today_count,
            status,
            message: status.message(),
        }
    }

    // ── Calendar ─────────────────────────────────────────────────────

    pub fn next_month(&mut self, now_ms: i64) -> &MonthView {
        self.selection.next_month();
        self.refresh_view(local_date_of(now_ms));
        &self.view
    }

    pub fn prev_month(&mut self, now_ms: i64) -> &MonthView {
        self.selection.prev_month();
        self.refresh_view(local_date_of(now_ms));
        &self.view
    }

    /// Select a day. This is the only trigger of the perfect-day rule.
    pub fn select_date(&mut self, date: NaiveDate, now_ms: i64) -> Option<AchievementKey> {
        let today = local_date_of(now_ms);
        self.selection.select_date(date);
        let unlocked = self.achievements.evaluate_selection(date, today, &self.store);
        self.refresh_view(today);
        unlocked
    }

    /// Current month view. Re-projected when the local day has rolled over
    /// since the last recompute so `is_today` stays accurate.
    pub fn month_view(&mut self, now_ms: i64) -> &MonthView {
        let today = local_date_of(now_ms);
        if today != self.view_day {
            self.refresh_view(today);
        }
        &self.view
    }

    fn refresh_view(&mut self, today: NaiveDate) {
        self.view = project_month(&self.selection, today, &self.store);
        self.view_day = today;
    }
}
