//! Achievement catalog and unlock rules.
//!
//! Unlocking is one-way: `AchievementBook::unlock` is the only place an
//! achievement changes state and it never clears the flag. Rules are only
//! tested while their achievement is still locked.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::info;

use crate::records::{parse_date_key, RecordStore};

const LONG_MISTAKE_SECS: i64 = 300;
const QUICK_FIX_SECS: i64 = 60;
const SPREE_PER_DAY: usize = 3;
const EXPLORER_CATEGORIES: usize = 3;
const CONSISTENT_STREAK_DAYS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AchievementKey {
    FirstRecord,
    LongMistake,
    Spree,
    QuickFix,
    CategoryExplorer,
    PerfectDay,
    ConsistentRecorder,
}

impl AchievementKey {
    pub const ALL: [AchievementKey; 7] = [
        AchievementKey::FirstRecord,
        AchievementKey::LongMistake,
        AchievementKey::Spree,
        AchievementKey::QuickFix,
        AchievementKey::CategoryExplorer,
        AchievementKey::PerfectDay,
        AchievementKey::ConsistentRecorder,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::FirstRecord => "First Step",
            Self::LongMistake => "The Long Haul",
            Self::Spree => "On a Roll",
            Self::QuickFix => "Quick Fix",
            Self::CategoryExplorer => "Category Explorer",
            Self::PerfectDay => "Perfect Day",
            Self::ConsistentRecorder => "Consistent Recorder",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::FirstRecord => "Recorded a mistake for the first time",
            Self::LongMistake => "Recorded a mistake lasting at least 5 minutes",
            Self::Spree => "Recorded 3 or more mistakes in a single day",
            Self::QuickFix => "Recorded a mistake lasting less than a minute",
            Self::CategoryExplorer => "Used at least 3 different categories",
            Self::PerfectDay => "Looked at a past day with no mistakes at all",
            Self::ConsistentRecorder => "Recorded mistakes 3 days in a row",
        }
    }

    /// Rules evaluated whenever the record store changes. `None` for rules
    /// with a different trigger.
    fn holds_for_store(self, store: &RecordStore) -> Option<bool> {
        let holds = match self {
            Self::FirstRecord => has_any_record(store),
            Self::LongMistake => has_long_mistake(store),
            Self::Spree => has_spree_day(store),
            Self::QuickFix => has_quick_fix(store),
            Self::CategoryExplorer => has_explored_categories(store),
            Self::ConsistentRecorder => has_consistent_streak(store),
            Self::PerfectDay => return None,
        };
        Some(holds)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Achievement {
    pub key: AchievementKey,
    pub name: &'static str,
    pub description: &'static str,
    pub unlocked: bool,
}

#[derive(Debug, Clone)]
pub struct AchievementBook {
    achievements: Vec<Achievement>,
}

impl Default for AchievementBook {
    fn default() -> Self {
        Self::new()
    }
}

impl AchievementBook {
    pub fn new() -> Self {
        let achievements = AchievementKey::ALL
            .into_iter()
            .map(|key| Achievement {
                key,
                name: key.name(),
                description: key.description(),
                unlocked: false,
            })
            .collect();
        Self { achievements }
    }

    pub fn all(&self) -> &[Achievement] {
        &self.achievements
    }

    pub fn is_unlocked(&self, key: AchievementKey) -> bool {
        self.achievements
            .iter()
            .any(|achievement| achievement.key == key && achievement.unlocked)
    }

    pub fn unlocked_count(&self) -> usize {
        self.achievements.iter().filter(|a| a.unlocked).count()
    }

    /// Re-test every still-locked store rule. Returns the keys unlocked by
    /// this pass.
    pub fn evaluate_store(&mut self, store: &RecordStore) -> Vec<AchievementKey> {
        let mut newly_unlocked = Vec::new();
        for key in AchievementKey::ALL {
            if self.is_unlocked(key) {
                continue;
            }
            if key.holds_for_store(store) == Some(true) && self.unlock(key) {
                newly_unlocked.push(key);
            }
        }
        newly_unlocked
    }

    /// Perfect-day check, run only when a date is selected. Future dates
    /// never qualify.
    pub fn evaluate_selection(
        &mut self,
        selected: NaiveDate,
        today: NaiveDate,
        store: &RecordStore,
    ) -> Option<AchievementKey> {
        let key = AchievementKey::PerfectDay;
        if self.is_unlocked(key) || selected > today || store.count_on(selected) != 0 {
            return None;
        }
        self.unlock(key).then_some(key)
    }

    fn unlock(&mut self, key: AchievementKey) -> bool {
        let Some(achievement) = self.achievements.iter_mut().find(|a| a.key == key) else {
            return false;
        };
        if achievement.unlocked {
            return false;
        }
        achievement.unlocked = true;
        info!(achievement = ?key, title = achievement.name, "achievement unlocked");
        true
    }
}

fn has_any_record(store: &RecordStore) -> bool {
    store.total_count() > 0
}

fn has_long_mistake(store: &RecordStore) -> bool {
    store
        .all_records_flat()
        .iter()
        .any(|record| record.duration.is_some_and(|secs| secs >= LONG_MISTAKE_SECS))
}

fn has_spree_day(store: &RecordStore) -> bool {
    store.days().any(|(_, records)| records.len() >= SPREE_PER_DAY)
}

fn has_quick_fix(store: &RecordStore) -> bool {
    store
        .all_records_flat()
        .iter()
        .any(|record| record.duration.is_some_and(|secs| secs < QUICK_FIX_SECS))
}

fn has_explored_categories(store: &RecordStore) -> bool {
    let categories: HashSet<&str> = store
        .all_records_flat()
        .into_iter()
        .map(|record| record.category.as_str())
        .collect();
    categories.len() >= EXPLORER_CATEGORIES
}

fn has_consistent_streak(store: &RecordStore) -> bool {
    longest_daily_streak(store) >= CONSISTENT_STREAK_DAYS
}

/// Longest run of date-keys that are exactly one calendar day apart.
pub fn longest_daily_streak(store: &RecordStore) -> usize {
    let dates: Vec<NaiveDate> = store.date_keys().filter_map(parse_date_key).collect();

    let mut longest = usize::from(!dates.is_empty());
    let mut current = longest;
    for pair in dates.windows(2) {
        if pair[1] - pair[0] == Duration::days(1) {
            current += 1;
        } else {
            current = 1;
        }
        longest = longest.max(current);
    }
    longest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::tests::{local_ms, record_at};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn unlocked(book: &AchievementBook) -> Vec<AchievementKey> {
        book.all().iter().filter(|a| a.unlocked).map(|a| a.key).collect()
    }

    #[test]
    fn catalog_starts_locked() {
        let book = AchievementBook::new();
        assert_eq!(book.all().len(), 7);
        assert_eq!(book.unlocked_count(), 0);
    }

    #[test]
    fn empty_store_unlocks_nothing() {
        let mut book = AchievementBook::new();
        assert!(book.evaluate_store(&RecordStore::new()).is_empty());
        assert_eq!(book.unlocked_count(), 0);
    }

    #[test]
    fn same_day_durations_unlock_long_quick_and_spree() {
        let mut store = RecordStore::new();
        for (hour, secs) in [(9, 400), (12, 30), (15, 120)] {
            store.append(record_at(local_ms(2024, 4, 2, hour, 0, 0), "same", secs));
        }

        let mut book = AchievementBook::new();
        let newly = book.evaluate_store(&store);
        assert!(newly.contains(&AchievementKey::FirstRecord));
        assert!(book.is_unlocked(AchievementKey::LongMistake));
        assert!(book.is_unlocked(AchievementKey::QuickFix));
        assert!(book.is_unlocked(AchievementKey::Spree));
        assert!(!book.is_unlocked(AchievementKey::CategoryExplorer));
        assert!(!book.is_unlocked(AchievementKey::PerfectDay));
    }

    #[test]
    fn three_categories_unlock_explorer() {
        let mut store = RecordStore::new();
        for (hour, category) in [(9, "a"), (12, "b"), (15, "c")] {
            store.append(record_at(local_ms(2024, 4, 2, hour, 0, 0), category, 120));
        }
        let mut book = AchievementBook::new();
        book.evaluate_store(&store);
        assert!(book.is_unlocked(AchievementKey::CategoryExplorer));
    }

    #[test]
    fn quick_fix_ignores_missing_duration() {
        let mut store = RecordStore::new();
        let mut record = record_at(local_ms(2024, 4, 2, 9, 0, 0), "a", 10);
        record.duration = None;
        store.append(record);

        let mut book = AchievementBook::new();
        book.evaluate_store(&store);
        assert!(!book.is_unlocked(AchievementKey::QuickFix));
        assert!(book.is_unlocked(AchievementKey::FirstRecord));
    }

    #[test]
    fn reevaluation_is_idempotent() {
        let mut store = RecordStore::new();
        store.append(record_at(local_ms(2024, 4, 2, 9, 0, 0), "a", 10));
        let mut book = AchievementBook::new();
        book.evaluate_store(&store);
        let before = unlocked(&book);

        assert!(book.evaluate_store(&store).is_empty());
        assert_eq!(unlocked(&book), before);
        assert!(book.evaluate_store(&RecordStore::new()).is_empty());
        assert_eq!(unlocked(&book), before);
    }

    #[test]
    fn consecutive_days_unlock_consistent_recorder() {
        let mut store = RecordStore::new();
        let mut book = AchievementBook::new();
        store.append(record_at(local_ms(2024, 1, 1, 10, 0, 0), "a", 90));
        store.append(record_at(local_ms(2024, 1, 2, 10, 0, 0), "a", 90));
        book.evaluate_store(&store);
        assert!(!book.is_unlocked(AchievementKey::ConsistentRecorder));

        store.append(record_at(local_ms(2024, 1, 3, 10, 0, 0), "a", 90));
        assert_eq!(book.evaluate_store(&store), vec![AchievementKey::ConsistentRecorder]);
    }

    #[test]
    fn gap_in_days_does_not_count_as_streak() {
        let mut store = RecordStore::new();
        for day in [1, 2, 5] {
            store.append(record_at(local_ms(2024, 1, day, 10, 0, 0), "a", 90));
        }
        let mut book = AchievementBook::new();
        book.evaluate_store(&store);
        assert!(!book.is_unlocked(AchievementKey::ConsistentRecorder));
        assert_eq!(longest_daily_streak(&store), 2);
    }

    #[test]
    fn streak_crosses_month_and_year_boundaries() {
        let mut store = RecordStore::new();
        store.append(record_at(local_ms(2023, 12, 30, 10, 0, 0), "a", 90));
        store.append(record_at(local_ms(2023, 12, 31, 10, 0, 0), "a", 90));
        store.append(record_at(local_ms(2024, 1, 1, 10, 0, 0), "a", 90));
        assert_eq!(longest_daily_streak(&store), 3);
    }

    #[test]
    fn perfect_day_needs_empty_past_or_today() {
        let store = RecordStore::new();
        let today = ymd(2024, 6, 15);

        let mut book = AchievementBook::new();
        assert_eq!(book.evaluate_selection(ymd(2024, 6, 16), today, &store), None);
        assert!(!book.is_unlocked(AchievementKey::PerfectDay));

        assert_eq!(
            book.evaluate_selection(ymd(2024, 6, 14), today, &store),
            Some(AchievementKey::PerfectDay)
        );
        assert!(book.is_unlocked(AchievementKey::PerfectDay));

        let mut book = AchievementBook::new();
        assert!(book.evaluate_selection(today, today, &store).is_some());
    }

    #[test]
    fn perfect_day_rejects_days_with_records() {
        let mut store = RecordStore::new();
        store.append(record_at(local_ms(2024, 6, 14, 10, 0, 0), "a", 90));
        let mut book = AchievementBook::new();
        assert_eq!(book.evaluate_selection(ymd(2024, 6, 14), ymd(2024, 6, 15), &store), None);
    }

    #[test]
    fn store_evaluation_never_touches_perfect_day() {
        let mut book = AchievementBook::new();
        book.evaluate_selection(ymd(2024, 6, 14), ymd(2024, 6, 15), &RecordStore::new());
        book.evaluate_store(&RecordStore::new());
        assert!(book.is_unlocked(AchievementKey::PerfectDay));
    }
}
