use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
};

use crate::{
    dto::borrow_requests::{CreateBorrowRequest, UpdateRequestStatusRequest},
    error::AppResult,
    middleware::identity::CallerIdentity,
    models::BorrowRequest,
    routes::params::BorrowRequestQuery,
    services::borrow_request_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_requests).post(create_request))
        .route("/{id}", get(get_request))
        .route("/{id}/status", patch(update_request_status))
}

#[utoipa::path(
    get,
    path = "/requests",
    params(BorrowRequestQuery),
    responses(
        (status = 200, description = "Borrow requests matching every supplied filter", body = Vec<BorrowRequest>),
    ),
    tag = "Borrow Requests"
)]
pub async fn list_requests(
    State(state): State<AppState>,
    Query(query): Query<BorrowRequestQuery>,
) -> AppResult<Json<Vec<BorrowRequest>>> {
    let requests = borrow_request_service::list_requests(&state, query).await?;
    Ok(Json(requests))
}

#[utoipa::path(
    post,
    path = "/requests",
    request_body = CreateBorrowRequest,
    params(
        ("x-user-id" = Option<String>, Header, description = "Caller user id, used when the body has none"),
        ("x-user-name" = Option<String>, Header, description = "Caller display name, used when the body has none"),
    ),
    responses(
        (status = 201, description = "Created borrow request, always PENDING", body = BorrowRequest),
    ),
    tag = "Borrow Requests"
)]
pub async fn create_request(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Json(mut payload): Json<CreateBorrowRequest>,
) -> AppResult<(StatusCode, Json<BorrowRequest>)> {
    let requester = caller.requester(payload.user_id.take(), payload.user_name.take());
    let created = borrow_request_service::create_request(&state, requester, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/requests/{id}",
    params(("id" = String, Path, description = "Borrow request ID")),
    responses(
        (status = 200, description = "Borrow request", body = BorrowRequest),
        (status = 404, description = "Not Found"),
    ),
    tag = "Borrow Requests"
)]
pub async fn get_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<BorrowRequest>> {
    let request = borrow_request_service::get_request(&state, &id).await?;
    Ok(Json(request))
}

#[utoipa::path(
    patch,
    path = "/requests/{id}/status",
    params(
        ("id" = String, Path, description = "Borrow request ID"),
        ("x-user-id" = Option<String>, Header, description = "Approver, used when the body has no approvedBy"),
    ),
    request_body = UpdateRequestStatusRequest,
    responses(
        (status = 200, description = "Updated borrow request", body = BorrowRequest),
        (status = 400, description = "Invalid status"),
        (status = 404, description = "Not Found"),
    ),
    tag = "Borrow Requests"
)]
pub async fn update_request_status(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<String>,
    Json(mut payload): Json<UpdateRequestStatusRequest>,
) -> AppResult<Json<BorrowRequest>> {
    let approved_by = caller.approver(payload.approved_by.take());
    let request =
        borrow_request_service::update_status(&state, &id, &approved_by, payload).await?;
    Ok(Json(request))
}
