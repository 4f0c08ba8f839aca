use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::{json, Value};

use super::criteria::{BatchCriteria, ResolvedCriteria, ScoringMode};
use super::domain::{parse_day, SadhanaEntry, UserId};
use super::progress::GroupProgress;
use super::repository::{ConfigurationStore, EntryRepository, ProfileRepository};
use super::service::SadhanaService;
use super::views::{DailyScoreReport, WeeklyReport};
use crate::error::AppError;

type SharedService<E, P, C> = Arc<SadhanaService<E, P, C>>;

/// Router builder exposing entry submission, scoring, and configuration endpoints.
pub fn sadhana_router<E, P, C>(service: SharedService<E, P, C>) -> Router
where
    E: EntryRepository + 'static,
    P: ProfileRepository + 'static,
    C: ConfigurationStore + 'static,
{
    Router::new()
        .route("/api/v1/sadhana/entries", post(submit_handler::<E, P, C>))
        .route(
            "/api/v1/sadhana/entries/:user_id/:date",
            get(entry_handler::<E, P, C>),
        )
        .route(
            "/api/v1/sadhana/entries/:user_id/:date/score",
            get(daily_score_handler::<E, P, C>),
        )
        .route(
            "/api/v1/sadhana/weekly/:user_id",
            get(weekly_handler::<E, P, C>),
        )
        .route(
            "/api/v1/sadhana/criteria/:batch",
            get(criteria_handler::<E, P, C>).put(save_criteria_handler::<E, P, C>),
        )
        .route(
            "/api/v1/sadhana/settings/scoring-mode",
            get(scoring_mode_handler::<E, P, C>).put(set_scoring_mode_handler::<E, P, C>),
        )
        .route(
            "/api/v1/sadhana/groups/progress",
            post(group_progress_handler::<E, P, C>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct WeekQuery {
    #[serde(default)]
    anchor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScoringModeBody {
    mode: ScoringMode,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GroupProgressRequest {
    members: Vec<UserId>,
    #[serde(default)]
    anchor: Option<String>,
}

pub(crate) async fn submit_handler<E, P, C>(
    State(service): State<SharedService<E, P, C>>,
    Json(entry): Json<SadhanaEntry>,
) -> Result<Json<DailyScoreReport>, AppError>
where
    E: EntryRepository + 'static,
    P: ProfileRepository + 'static,
    C: ConfigurationStore + 'static,
{
    Ok(Json(service.submit(entry)?))
}

pub(crate) async fn entry_handler<E, P, C>(
    State(service): State<SharedService<E, P, C>>,
    Path((user_id, date)): Path<(String, String)>,
) -> Result<Json<SadhanaEntry>, AppError>
where
    E: EntryRepository + 'static,
    P: ProfileRepository + 'static,
    C: ConfigurationStore + 'static,
{
    let date = parse_day(&date).ok_or(AppError::InvalidDate(date))?;
    let user_id = UserId(user_id);

    service
        .entry(&user_id, date)?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("entry for {user_id} on {date}")))
}

pub(crate) async fn daily_score_handler<E, P, C>(
    State(service): State<SharedService<E, P, C>>,
    Path((user_id, date)): Path<(String, String)>,
) -> Result<Json<DailyScoreReport>, AppError>
where
    E: EntryRepository + 'static,
    P: ProfileRepository + 'static,
    C: ConfigurationStore + 'static,
{
    let date = parse_day(&date).ok_or(AppError::InvalidDate(date))?;
    Ok(Json(service.daily_score(&UserId(user_id), date)?))
}

pub(crate) async fn weekly_handler<E, P, C>(
    State(service): State<SharedService<E, P, C>>,
    Path(user_id): Path<String>,
    Query(query): Query<WeekQuery>,
) -> Result<Json<WeeklyReport>, AppError>
where
    E: EntryRepository + 'static,
    P: ProfileRepository + 'static,
    C: ConfigurationStore + 'static,
{
    let anchor = anchor_or_today(query.anchor)?;
    Ok(Json(service.weekly_report(&UserId(user_id), anchor)?))
}

pub(crate) async fn criteria_handler<E, P, C>(
    State(service): State<SharedService<E, P, C>>,
    Path(batch): Path<String>,
) -> Json<ResolvedCriteria>
where
    E: EntryRepository + 'static,
    P: ProfileRepository + 'static,
    C: ConfigurationStore + 'static,
{
    Json(service.criteria(&batch))
}

pub(crate) async fn save_criteria_handler<E, P, C>(
    State(service): State<SharedService<E, P, C>>,
    Path(batch): Path<String>,
    Json(criteria): Json<BatchCriteria>,
) -> Result<Json<ResolvedCriteria>, AppError>
where
    E: EntryRepository + 'static,
    P: ProfileRepository + 'static,
    C: ConfigurationStore + 'static,
{
    Ok(Json(service.save_criteria(&batch, criteria)?))
}

pub(crate) async fn scoring_mode_handler<E, P, C>(
    State(service): State<SharedService<E, P, C>>,
) -> Json<Value>
where
    E: EntryRepository + 'static,
    P: ProfileRepository + 'static,
    C: ConfigurationStore + 'static,
{
    mode_body(service.scoring_mode())
}

pub(crate) async fn set_scoring_mode_handler<E, P, C>(
    State(service): State<SharedService<E, P, C>>,
    Json(body): Json<ScoringModeBody>,
) -> Result<Json<Value>, AppError>
where
    E: EntryRepository + 'static,
    P: ProfileRepository + 'static,
    C: ConfigurationStore + 'static,
{
    service.set_scoring_mode(body.mode)?;
    Ok(mode_body(body.mode))
}

pub(crate) async fn group_progress_handler<E, P, C>(
    State(service): State<SharedService<E, P, C>>,
    Json(request): Json<GroupProgressRequest>,
) -> Result<Json<GroupProgress>, AppError>
where
    E: EntryRepository + 'static,
    P: ProfileRepository + 'static,
    C: ConfigurationStore + 'static,
{
    let anchor = anchor_or_today(request.anchor)?;
    Ok(Json(service.group_progress(request.members, anchor).await))
}

fn mode_body(mode: ScoringMode) -> Json<Value> {
    Json(json!({ "mode": mode, "label": mode.label() }))
}

fn anchor_or_today(raw: Option<String>) -> Result<NaiveDate, AppError> {
    match raw {
        None => Ok(Local::now().date_naive()),
        Some(value) => parse_day(&value).ok_or(AppError::InvalidDate(value)),
    }
}
