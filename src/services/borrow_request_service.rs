use chrono::Utc;
use uuid::Uuid;

use crate::{
    dto::borrow_requests::{CreateBorrowRequest, UpdateRequestStatusRequest},
    error::{AppError, AppResult},
    models::{BorrowRequest, BorrowRequestFilter, BorrowStatus, Requester},
    routes::params::BorrowRequestQuery,
    state::AppState,
};

pub async fn create_request(
    state: &AppState,
    requester: Requester,
    payload: CreateBorrowRequest,
) -> AppResult<BorrowRequest> {
    let request = BorrowRequest::new(
        payload.equipment_id,
        payload.quantity,
        payload.notes,
        requester,
        Utc::now(),
    );
    let saved = state.borrow_requests.insert(request).await?;

    tracing::info!(
        request_id = %saved.id,
        equipment_id = %saved.equipment_id,
        user_id = %saved.user_id,
        "borrow request created"
    );
    Ok(saved)
}

pub async fn list_requests(
    state: &AppState,
    query: BorrowRequestQuery,
) -> AppResult<Vec<BorrowRequest>> {
    let status = match query.status.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => match raw.parse::<BorrowStatus>() {
            Ok(status) => Some(status),
            Err(err) => {
                // An unknown status matches nothing.
                tracing::debug!(error = %err, "ignoring listing with unknown status filter");
                return Ok(Vec::new());
            }
        },
        None => None,
    };

    let filter = BorrowRequestFilter {
        status,
        user_id: query.user_id.filter(|s| !s.is_empty()),
        equipment_id: query.equipment_id.filter(|s| !s.is_empty()),
    };
    state.borrow_requests.find_all(&filter).await
}

pub async fn get_request(state: &AppState, id: &str) -> AppResult<BorrowRequest> {
    let id = parse_request_id(id)?;
    let request = state.borrow_requests.find_by_id(id).await?;
    match request {
        Some(r) => Ok(r),
        None => Err(AppError::NotFound),
    }
}

pub async fn update_status(
    state: &AppState,
    id: &str,
    approved_by: &str,
    payload: UpdateRequestStatusRequest,
) -> AppResult<BorrowRequest> {
    let mut request = get_request(state, id).await?;

    let status = payload
        .status
        .parse::<BorrowStatus>()
        .map_err(|_| AppError::BadRequest(format!("Invalid status: {}", payload.status)))?;

    let previous = request.status;
    request.transition(status, approved_by, Utc::now());
    let saved = state.borrow_requests.update(request).await?;

    tracing::info!(
        request_id = %saved.id,
        from = %previous,
        to = %saved.status,
        "borrow request status updated"
    );
    Ok(saved)
}

// Ids are opaque to clients; anything that is not one of ours is simply unknown.
fn parse_request_id(id: &str) -> AppResult<Uuid> {
    Uuid::parse_str(id).map_err(|_| AppError::NotFound)
}
