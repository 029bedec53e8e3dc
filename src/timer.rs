//! Mistake timer state machine.
//!
//! The timer is wall-clock based and owns no thread: every command takes the
//! current time in epoch milliseconds and the caller drives `tick()` once per
//! second while a session is running.
//!
//! ```text
//! Idle -> Running -> Stopped -> (Saved | Discarded) -> Idle
//!            \---------------------> Discarded -> Idle
//! ```
//!
//! Commands issued from the wrong phase are ignored and report `false`/`None`.

use chrono::Local;
use serde::Serialize;
use tracing::debug;

use crate::records::MistakeRecord;

pub const CATEGORIES: [&str; 11] = [
    "Admired some code a little too long",
    "Too sleepy to focus",
    "Food delivery detour",
    "Tried out a new gadget",
    "Empty dorm, no supervision",
    "Unboxed a new toy",
    "Fell for a meme",
    "Slacked off during work or class",
    "Got baited by the group chat",
    "Late-night mood spiral",
    "Other",
];

pub const QUICK_SUMMARIES: [&str; 12] = [
    "Will be careful next time",
    "Pure accident",
    "Could not help myself",
    "Force of habit",
    "What else could I do",
    "I repent",
    "Totally worth it, no regrets",
    "Empty feeling afterwards",
    "Never again, I promise",
    "Day one of doing better",
    "Need a reset",
    "Running on empty",
];

pub const EMPTY_SUMMARY_PLACEHOLDER: &str = "Slipped up, but wrote no summary";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    Idle,
    Running,
    Stopped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSession {
    /// Epoch milliseconds.
    pub start_time: i64,
    pub elapsed_seconds: i64,
    pub stopped: bool,
    pub category: String,
    pub draft_summary: String,
}

/// Display view of the timer, with the elapsed value brought up to `now`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    pub phase: TimerPhase,
    pub session: Option<TimerSession>,
}

#[derive(Debug, Clone, Default)]
pub struct MistakeTimer {
    session: Option<TimerSession>,
}

impl MistakeTimer {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> TimerPhase {
        match &self.session {
            None => TimerPhase::Idle,
            Some(session) if session.stopped => TimerPhase::Stopped,
            Some(_) => TimerPhase::Running,
        }
    }

    pub fn session(&self) -> Option<&TimerSession> {
        self.session.as_ref()
    }

    pub fn snapshot(&self, now_ms: i64) -> TimerSnapshot {
        let mut session = self.session.clone();
        if let Some(session) = session.as_mut().filter(|s| !s.stopped) {
            session.elapsed_seconds = session
                .elapsed_seconds
                .max(elapsed_between(session.start_time, now_ms));
        }
        TimerSnapshot {
            phase: self.phase(),
            session,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn open(&mut self, now_ms: i64) -> bool {
        if self.session.is_some() {
            debug!("timer open ignored: a session is already active");
            return false;
        }
        self.session = Some(TimerSession {
            start_time: now_ms,
            elapsed_seconds: 0,
            stopped: false,
            category: CATEGORIES[0].to_string(),
            draft_summary: String::new(),
        });
        true
    }

    /// Recompute elapsed time from the wall clock. Returns whether the
    /// session is still running, so a driver knows when to stop ticking.
    pub fn tick(&mut self, now_ms: i64) -> bool {
        match self.session.as_mut() {
            Some(session) if !session.stopped => {
                let elapsed = elapsed_between(session.start_time, now_ms);
                session.elapsed_seconds = session.elapsed_seconds.max(elapsed);
                true
            }
            _ => false,
        }
    }

    pub fn stop(&mut self, now_ms: i64) -> bool {
        if !self.tick(now_ms) {
            debug!("timer stop ignored: not running");
            return false;
        }
        if let Some(session) = self.session.as_mut() {
            session.stopped = true;
        }
        true
    }

    pub fn set_category(&mut self, category: impl Into<String>) -> bool {
        match self.session.as_mut() {
            Some(session) => {
                session.category = category.into();
                true
            }
            None => false,
        }
    }

    pub fn set_draft_summary(&mut self, summary: impl Into<String>) -> bool {
        match self.session.as_mut() {
            Some(session) => {
                session.draft_summary = summary.into();
                true
            }
            None => false,
        }
    }

    /// Close a stopped session into a record. The timer returns to idle.
    pub fn save(&mut self, summary: &str, now_ms: i64) -> Option<MistakeRecord> {
        if self.phase() != TimerPhase::Stopped {
            debug!("timer save ignored: session is not stopped");
            return None;
        }
        let session = self.session.take()?;
        let summary = summary.trim();
        let summary = if summary.is_empty() {
            EMPTY_SUMMARY_PLACEHOLDER.to_string()
        } else {
            summary.to_string()
        };

        Some(MistakeRecord {
            id: session.start_time,
            category: session.category,
            start_time: session.start_time,
            end_time: Some(now_ms.max(session.start_time)),
            duration: Some(session.elapsed_seconds),
            summary,
        })
    }

    pub fn discard(&mut self) -> bool {
        self.session.take().is_some()
    }
}

pub fn now_ms() -> i64 {
    Local::now().timestamp_millis()
}

fn elapsed_between(start_ms: i64, now_ms: i64) -> i64 {
    ((now_ms - start_ms) / 1000).max(0)
}
