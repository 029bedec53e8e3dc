use crate::achievements::Achievement;
use crate::calendar::MonthView;
use crate::errors::AppError;
use crate::image_source::{default_source, fetch_image_url, find_source, IMAGE_SOURCES};
use crate::journal::{SavedRecord, TodaySummary};
use crate::models::{
    CategoryRequest, DayRecordsResponse, DraftSummaryRequest, ImageQuery, ImageResponse,
    ImageSourcesResponse, RecordsQuery, SaveForm, SaveRequest, SelectDateRequest,
    SelectDateResponse, ThemesResponse,
};
use crate::records::{date_key, local_date_of, parse_date_key};
use crate::state::AppState;
use crate::themes::THEMES;
use crate::timer::{now_ms, TimerPhase, TimerSnapshot, CATEGORIES, QUICK_SUMMARIES};
use crate::ui::{render_index, IndexPage};
use axum::{
    extract::{Query, State},
    response::{Html, Redirect},
    Form, Json,
};
use chrono::NaiveDate;
use tracing::error;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let now = now_ms();
    let mut journal = state.journal.lock().await;
    let view = journal.month_view(now).clone();
    let page = IndexPage {
        theme: state.theme,
        view: &view,
        summary: journal.today_summary(now),
        timer: journal.timer_snapshot(now),
        achievements: journal.achievements(),
    };
    Html(render_index(&page))
}

// ── Calendar ─────────────────────────────────────────────────────────

pub async fn get_calendar(State(state): State<AppState>) -> Json<MonthView> {
    let mut journal = state.journal.lock().await;
    Json(journal.month_view(now_ms()).clone())
}

pub async fn next_month(State(state): State<AppState>) -> Json<MonthView> {
    let mut journal = state.journal.lock().await;
    Json(journal.next_month(now_ms()).clone())
}

pub async fn prev_month(State(state): State<AppState>) -> Json<MonthView> {
    let mut journal = state.journal.lock().await;
    Json(journal.prev_month(now_ms()).clone())
}

pub async fn select_date(
    State(state): State<AppState>,
    Json(payload): Json<SelectDateRequest>,
) -> Result<Json<SelectDateResponse>, AppError> {
    let date = parse_date(&payload.date)?;
    Ok(Json(apply_select(&state, date).await))
}

pub async fn next_month_form(State(state): State<AppState>) -> Redirect {
    state.journal.lock().await.next_month(now_ms());
    Redirect::to("/")
}

pub async fn prev_month_form(State(state): State<AppState>) -> Redirect {
    state.journal.lock().await.prev_month(now_ms());
    Redirect::to("/")
}

pub async fn select_date_form(
    State(state): State<AppState>,
    Form(payload): Form<SelectDateRequest>,
) -> Result<Redirect, AppError> {
    let date = parse_date(&payload.date)?;
    apply_select(&state, date).await;
    Ok(Redirect::to("/"))
}

async fn apply_select(state: &AppState, date: NaiveDate) -> SelectDateResponse {
    let now = now_ms();
    let mut journal = state.journal.lock().await;
    let unlocked = journal.select_date(date, now);
    SelectDateResponse {
        unlocked,
        view: journal.month_view(now).clone(),
    }
}

// ── Records ──────────────────────────────────────────────────────────

pub async fn get_records(
    State(state): State<AppState>,
    Query(query): Query<RecordsQuery>,
) -> Result<Json<DayRecordsResponse>, AppError> {
    let date = match query.date.as_deref() {
        Some(value) => parse_date(value)?,
        None => local_date_of(now_ms()),
    };
    let journal = state.journal.lock().await;
    Ok(Json(DayRecordsResponse {
        date: date_key(date),
        records: journal.records_on(date),
    }))
}

pub async fn get_summary(State(state): State<AppState>) -> Json<TodaySummary> {
    let journal = state.journal.lock().await;
    Json(journal.today_summary(now_ms()))
}

// ── Timer ────────────────────────────────────────────────────────────

pub async fn get_timer(State(state): State<AppState>) -> Json<TimerSnapshot> {
    let journal = state.journal.lock().await;
    Json(journal.timer_snapshot(now_ms()))
}

pub async fn open_timer(State(state): State<AppState>) -> Result<Json<TimerSnapshot>, AppError> {
    Ok(Json(apply_open(&state).await?))
}

pub async fn stop_timer(State(state): State<AppState>) -> Result<Json<TimerSnapshot>, AppError> {
    Ok(Json(apply_stop(&state).await?))
}

pub async fn discard_timer(State(state): State<AppState>) -> Result<Json<TimerSnapshot>, AppError> {
    Ok(Json(apply_discard(&state).await?))
}

pub async fn set_category(
    State(state): State<AppState>,
    Json(payload): Json<CategoryRequest>,
) -> Result<Json<TimerSnapshot>, AppError> {
    let category = validate_category(&payload.category)?;
    let now = now_ms();
    let mut journal = state.journal.lock().await;
    if !journal.set_timer_category(category) {
        return Err(AppError::conflict("no timer session is active"));
    }
    Ok(Json(journal.timer_snapshot(now)))
}

pub async fn set_draft_summary(
    State(state): State<AppState>,
    Json(payload): Json<DraftSummaryRequest>,
) -> Result<Json<TimerSnapshot>, AppError> {
    let now = now_ms();
    let mut journal = state.journal.lock().await;
    if !journal.set_timer_draft(payload.summary) {
        return Err(AppError::conflict("no timer session is active"));
    }
    Ok(Json(journal.timer_snapshot(now)))
}

pub async fn save_timer(
    State(state): State<AppState>,
    payload: Option<Json<SaveRequest>>,
) -> Result<Json<SavedRecord>, AppError> {
    let summary = payload.and_then(|Json(payload)| payload.summary);
    Ok(Json(apply_save(&state, None, summary).await?))
}

pub async fn open_timer_form(State(state): State<AppState>) -> Result<Redirect, AppError> {
    apply_open(&state).await?;
    Ok(Redirect::to("/"))
}

pub async fn stop_timer_form(State(state): State<AppState>) -> Result<Redirect, AppError> {
    apply_stop(&state).await?;
    Ok(Redirect::to("/"))
}

pub async fn discard_timer_form(State(state): State<AppState>) -> Result<Redirect, AppError> {
    apply_discard(&state).await?;
    Ok(Redirect::to("/"))
}

pub async fn save_timer_form(
    State(state): State<AppState>,
    Form(payload): Form<SaveForm>,
) -> Result<Redirect, AppError> {
    let category = validate_category(&payload.category)?;
    apply_save(&state, Some(category), Some(payload.summary)).await?;
    Ok(Redirect::to("/"))
}

async fn apply_open(state: &AppState) -> Result<TimerSnapshot, AppError> {
    let now = now_ms();
    let snapshot = {
        let mut journal = state.journal.lock().await;
        if !journal.open_timer(now) {
            return Err(AppError::conflict("a timer session is already active"));
        }
        journal.timer_snapshot(now)
    };
    state.start_ticker().await;
    Ok(snapshot)
}

async fn apply_stop(state: &AppState) -> Result<TimerSnapshot, AppError> {
    let now = now_ms();
    let snapshot = {
        let mut journal = state.journal.lock().await;
        if !journal.stop_timer(now) {
            return Err(AppError::conflict("the timer is not running"));
        }
        journal.timer_snapshot(now)
    };
    state.stop_ticker().await;
    Ok(snapshot)
}

async fn apply_discard(state: &AppState) -> Result<TimerSnapshot, AppError> {
    let now = now_ms();
    let snapshot = {
        let mut journal = state.journal.lock().await;
        if !journal.discard_timer() {
            return Err(AppError::conflict("no timer session is active"));
        }
        journal.timer_snapshot(now)
    };
    state.stop_ticker().await;
    Ok(snapshot)
}

async fn apply_save(
    state: &AppState,
    category: Option<&'static str>,
    summary: Option<String>,
) -> Result<SavedRecord, AppError> {
    let now = now_ms();
    let mut journal = state.journal.lock().await;
    if journal.timer().phase() != TimerPhase::Stopped {
        return Err(AppError::conflict("the timer must be stopped before saving"));
    }
    if let Some(category) = category {
        journal.set_timer_category(category);
    }
    let summary = summary
        .or_else(|| journal.timer().session().map(|s| s.draft_summary.clone()))
        .unwrap_or_default();

    let saved = journal
        .save_timer(&summary, now)
        .ok_or_else(|| AppError::conflict("the timer must be stopped before saving"))?;
    state.stop_ticker().await;

    // The record stays in memory even if the snapshot write fails.
    state.persist(&journal).await?;
    Ok(saved)
}

// ── Catalogs ─────────────────────────────────────────────────────────

pub async fn get_achievements(State(state): State<AppState>) -> Json<Vec<Achievement>> {
    let journal = state.journal.lock().await;
    Json(journal.achievements().all().to_vec())
}

pub async fn get_categories() -> Json<&'static [&'static str]> {
    Json(&CATEGORIES)
}

pub async fn get_quick_summaries() -> Json<&'static [&'static str]> {
    Json(&QUICK_SUMMARIES)
}

pub async fn get_themes(State(state): State<AppState>) -> Json<ThemesResponse> {
    Json(ThemesResponse {
        current: state.theme.id,
        themes: &THEMES,
    })
}

// ── Images ───────────────────────────────────────────────────────────

pub async fn get_image_sources() -> Json<ImageSourcesResponse> {
    Json(ImageSourcesResponse {
        default: default_source().name,
        sources: &IMAGE_SOURCES,
    })
}

pub async fn get_image(
    State(state): State<AppState>,
    Query(query): Query<ImageQuery>,
) -> Result<Json<ImageResponse>, AppError> {
    let source = match query.source.as_deref() {
        Some(name) => find_source(name)?,
        None => default_source(),
    };
    let url = fetch_image_url(&state.http, source, now_ms())
        .await
        .inspect_err(|err| error!(source = source.name, "failed to fetch image: {err}"))?;
    Ok(Json(ImageResponse {
        source: source.name,
        url,
    }))
}

fn parse_date(value: &str) -> Result<NaiveDate, AppError> {
    parse_date_key(value).ok_or_else(|| AppError::bad_request("date must be YYYY-MM-DD"))
}

fn validate_category(value: &str) -> Result<&'static str, AppError> {
    let value = value.trim();
    CATEGORIES
        .iter()
        .copied()
        .find(|category| *category == value)
        .ok_or_else(|| AppError::bad_request(format!("unknown category: {value}")))
}
