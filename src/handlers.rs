use crate::errors::AppError;
use crate::models::{
    CompletionResponse, CreateTaskRequest, NotificationsResponse, ResetRequest, StateResponse, Task,
    WeekPoint,
};
use crate::state::AppState;
use crate::ui::render_index;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, Redirect},
    Form, Json,
};

const RESET_UNCONFIRMED: &str = "reset requires confirmation";

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let tracker = state.tracker.lock().await;
    Html(render_index(&tracker.snapshot(), &tracker.notifications()))
}

pub async fn get_state(State(state): State<AppState>) -> Json<StateResponse> {
    let tracker = state.tracker.lock().await;
    Json(tracker.snapshot())
}

pub async fn get_week(State(state): State<AppState>) -> Json<Vec<WeekPoint>> {
    let tracker = state.tracker.lock().await;
    Json(tracker.snapshot().week)
}

pub async fn get_notifications(State(state): State<AppState>) -> Json<NotificationsResponse> {
    let tracker = state.tracker.lock().await;
    Json(NotificationsResponse {
        notifications: tracker.notifications(),
    })
}

pub async fn add_task(
    State(state): State<AppState>,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>), AppError> {
    let task = state
        .tracker
        .lock()
        .await
        .add_task(&payload.name, &payload.deadline)
        .await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn complete_task(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<CompletionResponse>, AppError> {
    let response = state.tracker.lock().await.complete_task(id).await?;
    Ok(Json(response))
}

pub async fn reset(
    State(state): State<AppState>,
    Json(payload): Json<ResetRequest>,
) -> Result<Json<StateResponse>, AppError> {
    if !payload.confirm {
        return Err(AppError::bad_request(RESET_UNCONFIRMED));
    }

    let mut tracker = state.tracker.lock().await;
    tracker.reset().await?;
    Ok(Json(tracker.snapshot()))
}

pub async fn add_task_form(
    State(state): State<AppState>,
    Form(payload): Form<CreateTaskRequest>,
) -> Result<Redirect, AppError> {
    state
        .tracker
        .lock()
        .await
        .add_task(&payload.name, &payload.deadline)
        .await?;
    Ok(Redirect::to("/"))
}

pub async fn complete_task_form(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Redirect, AppError> {
    state.tracker.lock().await.complete_task(id).await?;
    Ok(Redirect::to("/"))
}

pub async fn reset_form(
    State(state): State<AppState>,
    Form(payload): Form<ResetRequest>,
) -> Result<Redirect, AppError> {
    if !payload.confirm {
        return Err(AppError::bad_request(RESET_UNCONFIRMED));
    }

    state.tracker.lock().await.reset().await?;
    Ok(Redirect::to("/"))
}
