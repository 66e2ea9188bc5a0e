use crate::calendar::history;
use crate::codec::{ImportPreview, ImportSummary, export_filename, export_json, parse_import};
use crate::dates::DateKey;
use crate::errors::AppError;
use crate::models::{
    AppData, DayQuery, DayResponse, Goal, GoalDayView, GoalRequest, HistoryQuery, HistoryResponse,
    RecordRequest, WipeRequest,
};
use crate::state::AppState;
use crate::stats::{GoalStats, compute_stats, compute_stats_at};
use crate::status::classify;
use crate::store::GoalDraft;
use crate::ui::render_index;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse},
};
use chrono::Utc;
use tracing::{info, warn};

pub async fn index() -> Html<String> {
    Html(render_index(DateKey::today()))
}

pub async fn get_day(
    State(state): State<AppState>,
    Query(query): Query<DayQuery>,
) -> Result<Json<DayResponse>, AppError> {
    let today = DateKey::today();
    let date = resolve_date(query.date.as_deref(), today)?;
    let data = state.data.lock().await;
    Ok(Json(build_day(&data, date, today)))
}

pub async fn create_goal(
    State(state): State<AppState>,
    Json(payload): Json<GoalRequest>,
) -> Result<(StatusCode, Json<Goal>), AppError> {
    let draft = GoalDraft::validate(payload)?;
    let goal = state
        .mutate(|data| Ok(data.add_goal(draft, Utc::now()).clone()))
        .await?;
    info!(goal_id = %goal.id, kind = ?goal.kind, "goal created");
    Ok((StatusCode::CREATED, Json(goal)))
}

pub async fn update_goal(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<GoalRequest>,
) -> Result<Json<Goal>, AppError> {
    let draft = GoalDraft::validate(payload)?;
    let goal = state
        .mutate(|data| Ok(data.update_goal(&id, draft)?.clone()))
        .await?;
    info!(goal_id = %goal.id, "goal updated");
    Ok(Json(goal))
}

pub async fn delete_goal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let removed = state.mutate(|data| Ok(data.delete_goal(&id)?)).await?;
    info!(goal_id = %removed.id, "goal deleted with its records");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_goal_stats(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<GoalStats> {
    let data = state.data.lock().await;
    Json(compute_stats(&data, &id))
}

pub async fn set_record(
    State(state): State<AppState>,
    Path((id, date)): Path<(String, String)>,
    Json(payload): Json<RecordRequest>,
) -> Result<Json<GoalDayView>, AppError> {
    let date = DateKey::parse(&date)?;
    let today = DateKey::today();
    let view = state
        .mutate(|data| {
            data.set_record(&id, date, payload.value)?;
            goal_day_view(data, &id, date, today)
                .ok_or_else(|| AppError::not_found(format!("goal '{id}' not found")))
        })
        .await?;
    Ok(Json(view))
}

pub async fn get_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, AppError> {
    let today = DateKey::today();
    let reference = resolve_date(query.date.as_deref(), today)?;
    let data = state.data.lock().await;
    let goal = data
        .goal(&id)
        .ok_or_else(|| AppError::not_found(format!("goal '{id}' not found")))?;

    let view = history(
        goal,
        data.records_for(&id),
        query.mode.unwrap_or_default(),
        reference,
        today,
    );
    Ok(Json(HistoryResponse {
        goal: goal.clone(),
        mode: view.mode,
        reference: view.reference,
        label: view.label,
        previous: view.previous,
        next: view.next,
        stats: view.stats,
        months: view.months,
    }))
}

pub async fn export_data(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let body = {
        let data = state.data.lock().await;
        export_json(&data, Utc::now()).map_err(AppError::internal)?
    };
    let disposition = format!(
        "attachment; filename=\"{}\"",
        export_filename(DateKey::today())
    );
    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}

pub async fn preview_import(body: String) -> Result<Json<ImportPreview>, AppError> {
    let document = parse_import(&body).inspect_err(|err| warn!("rejected import: {err}"))?;
    Ok(Json(document.summary().into()))
}

pub async fn import_data(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<ImportSummary>, AppError> {
    let document = parse_import(&body).inspect_err(|err| warn!("rejected import: {err}"))?;
    let summary = document.summary();
    state
        .mutate(|data| {
            data.replace(document.into_data());
            Ok(())
        })
        .await?;
    info!(goals = summary.goals, records = summary.records, "imported backup");
    Ok(Json(summary))
}

pub async fn wipe_data(
    State(state): State<AppState>,
    Json(payload): Json<WipeRequest>,
) -> Result<StatusCode, AppError> {
    let mut answers = [payload.confirm, payload.confirm_final].into_iter();
    state
        .mutate(|data| {
            if data.clear_with_confirmation(|_| answers.next().unwrap_or(false)) {
                Ok(())
            } else {
                Err(AppError::bad_request("deleting all data needs two confirmations"))
            }
        })
        .await?;
    info!("all goals and records deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub fn build_day(data: &AppData, date: DateKey, today: DateKey) -> DayResponse {
    let goals = data
        .goals
        .iter()
        .filter_map(|goal| goal_day_view(data, &goal.id, date, today))
        .collect();

    DayResponse {
        date,
        label: date.display_label(),
        is_today: date == today,
        previous: date.pred(),
        next: date.succ(),
        goals,
    }
}

fn goal_day_view(data: &AppData, id: &str, date: DateKey, today: DateKey) -> Option<GoalDayView> {
    let goal = data.goal(id)?;
    let value = data.record(id, date).copied();
    Some(GoalDayView {
        goal: goal.clone(),
        value,
        status: classify(goal, value.as_ref()),
        stats: compute_stats_at(today, data, id),
    })
}

fn resolve_date(raw: Option<&str>, today: DateKey) -> Result<DateKey, AppError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(today),
        Some(value) => Ok(DateKey::parse(value)?),
    }
}
