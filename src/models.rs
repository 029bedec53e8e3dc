use serde::{Deserialize, Serialize};

use crate::achievements::AchievementKey;
use crate::calendar::MonthView;
use crate::image_source::ImageSource;
use crate::records::MistakeRecord;
use crate::themes::Theme;

#[derive(Debug, Deserialize)]
pub struct SelectDateRequest {
    pub date: String,
}

#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    pub category: String,
}

#[derive(Debug, Deserialize)]
pub struct DraftSummaryRequest {
    pub summary: String,
}

/// When `summary` is absent the session's draft summary is saved.
#[derive(Debug, Deserialize)]
pub struct SaveRequest {
    pub summary: Option<String>,
}

/// Body of the index page's save form.
#[derive(Debug, Deserialize)]
pub struct SaveForm {
    pub category: String,
    #[serde(default)]
    pub summary: String,
}

#[derive(Debug, Deserialize)]
pub struct RecordsQuery {
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ImageQuery {
    pub source: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SelectDateResponse {
    pub unlocked: Option<AchievementKey>,
    pub view: MonthView,
}

#[derive(Debug, Serialize)]
pub struct DayRecordsResponse {
    pub date: String,
    pub records: Vec<MistakeRecord>,
}

#[derive(Debug, Serialize)]
pub struct ThemesResponse {
    pub current: &'static str,
    pub themes: &'static [Theme],
}

#[derive(Debug, Serialize)]
pub struct ImageSourcesResponse {
    pub default: &'static str,
    pub sources: &'static [ImageSource],
}

#[derive(Debug, Serialize)]
pub struct ImageResponse {
    pub source: &'static str,
    pub url: String,
}
