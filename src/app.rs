use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/calendar/next", post(handlers::next_month_form))
        .route("/calendar/prev", post(handlers::prev_month_form))
        .route("/calendar/select", post(handlers::select_date_form))
        .route("/timer/open", post(handlers::open_timer_form))
        .route("/timer/stop", post(handlers::stop_timer_form))
        .route("/timer/save", post(handlers::save_timer_form))
        .route("/timer/discard", post(handlers::discard_timer_form))
        .route("/api/calendar", get(handlers::get_calendar))
        .route("/api/calendar/next", post(handlers::next_month))
        .route("/api/calendar/prev", post(handlers::prev_month))
        .route("/api/calendar/select", post(handlers::select_date))
        .route("/api/records", get(handlers::get_records))
        .route("/api/summary", get(handlers::get_summary))
        .route("/api/timer", get(handlers::get_timer))
        .route("/api/timer/open", post(handlers::open_timer))
        .route("/api/timer/stop", post(handlers::stop_timer))
        .route("/api/timer/category", post(handlers::set_category))
        .route("/api/timer/summary", post(handlers::set_draft_summary))
        .route("/api/timer/save", post(handlers::save_timer))
        .route("/api/timer/discard", post(handlers::discard_timer))
        .route("/api/achievements", get(handlers::get_achievements))
        .route("/api/categories", get(handlers::get_categories))
        .route("/api/quick-summaries", get(handlers::get_quick_summaries))
        .route("/api/themes", get(handlers::get_themes))
        .route("/api/image-sources", get(handlers::get_image_sources))
        .route("/api/image", get(handlers::get_image))
        .with_state(state)
}
