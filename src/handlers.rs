use crate::draft::Draft;
use crate::errors::AppError;
use crate::models::{
    ConfirmRequest, ReportResponse, SubmitOutcome, SubmitResponse, TodayResponse, UserId,
};
use crate::state::AppState;
use crate::ui::render_index;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
    Json,
};
use chrono::{NaiveDate, Utc};

pub async fn index(Path(user_id): Path<UserId>) -> Html<String> {
    Html(render_index(user_id))
}

pub async fn get_today(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<TodayResponse>, AppError> {
    let today = state.tracker.open_day(user_id, today()).await?;
    Ok(Json(today))
}

pub async fn put_draft(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Json(draft): Json<Draft>,
) -> Result<Json<Draft>, AppError> {
    if draft.keys().any(|key| !key.starts_with("task_")) {
        return Err(AppError::bad_request("draft keys must be task controls"));
    }
    let stored = state.tracker.save_draft(user_id, today(), draft).await?;
    Ok(Json(stored))
}

pub async fn submit(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<(StatusCode, Json<SubmitResponse>), AppError> {
    let response = state.tracker.request_submit(user_id, today()).await?;
    Ok(with_status(response))
}

pub async fn confirm(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Json(payload): Json<ConfirmRequest>,
) -> Result<(StatusCode, Json<SubmitResponse>), AppError> {
    let response = state
        .tracker
        .confirm_submit(user_id, today(), payload.proceed)
        .await?;
    Ok(with_status(response))
}

pub async fn get_report(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Json<ReportResponse> {
    Json(ReportResponse {
        days: state.tracker.report(user_id).await,
    })
}

fn with_status(response: SubmitResponse) -> (StatusCode, Json<SubmitResponse>) {
    let status = match response.outcome {
        SubmitOutcome::Failed => StatusCode::BAD_GATEWAY,
        _ => StatusCode::OK,
    };
    (status, Json(response))
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}
