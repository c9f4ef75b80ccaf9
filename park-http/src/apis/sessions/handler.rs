use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use park_core::{CloseRequest, OpenRequest, PageRequest, SessionFilter, SessionStatus};
use tracing::info;
use uuid::Uuid;

use super::types::{
    CloseSessionRequest, CreateSessionRequest, ListQuery, SearchQuery, SessionEnvelope,
    SessionListResponse, SessionView,
};
use crate::auth::Identity;
use crate::error::{ApiJson, ErrorResponse};
use crate::http::ServerState;

/// Register a vehicle entering the lot
pub async fn create_session(
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<CreateSessionRequest>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let request_id = Uuid::new_v4();
    info!("[{}] POST /api/v1/sessions plate='{}'", request_id, payload.plate);

    let session = state
        .engine
        .open(OpenRequest {
            plate: payload.plate,
            park_lot: payload.park_lot,
            photo_ref: payload.photo_ref,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SessionEnvelope {
            message: "Session created successfully".to_string(),
            session: SessionView::render(&session, state.public_url()),
        }),
    ))
}

/// Close the latest session for a plate, stamping the acting operator
pub async fn close_session(
    State(state): State<ServerState>,
    Path(plate): Path<String>,
    Identity(operator): Identity,
    ApiJson(payload): ApiJson<CloseSessionRequest>,
) -> Result<Json<SessionEnvelope>, ErrorResponse> {
    let request_id = Uuid::new_v4();
    info!("[{}] POST /api/v1/sessions/{}/close", request_id, plate);

    let session = state
        .engine
        .close(
            &plate,
            CloseRequest {
                end_time: payload.end_time,
                reason: payload.reason,
            },
            operator,
        )
        .await?;

    Ok(Json(SessionEnvelope {
        message: "Session closed successfully".to_string(),
        session: SessionView::render(&session, state.public_url()),
    }))
}

/// Paged list, optionally narrowed to one park lot
pub async fn list_sessions(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<SessionListResponse>, ErrorResponse> {
    let page = state
        .engine
        .search(
            SessionFilter {
                park_lot: query.park_lot,
                ..Default::default()
            },
            PageRequest {
                page: query.page.unwrap_or(1),
                limit: query.limit.unwrap_or(5),
            },
        )
        .await?;

    Ok(Json(SessionListResponse::render(page, state.public_url())))
}

/// Filtered search across plate, lot, status and entry/exit dates
pub async fn search_sessions(
    State(state): State<ServerState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SessionListResponse>, ErrorResponse> {
    let status = query
        .status
        .as_deref()
        .map(str::parse::<SessionStatus>)
        .transpose()?;

    let page = state
        .engine
        .search(
            SessionFilter {
                plate_contains: query.plate,
                park_lot: query.park_lot,
                status,
                start_date: query.start_date,
                end_date: query.end_date,
            },
            PageRequest {
                page: query.page.unwrap_or(1),
                limit: query.limit.unwrap_or(5),
            },
        )
        .await?;

    Ok(Json(SessionListResponse::render(page, state.public_url())))
}

/// Single session by id
pub async fn get_session(
    State(state): State<ServerState>,
    Path(id): Path<u64>,
) -> Result<Json<SessionView>, ErrorResponse> {
    let session = state.engine.get(id).await?;
    Ok(Json(SessionView::render(&session, state.public_url())))
}
