use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};

use crate::{
    dto::invoices::{CreateInvoiceRequest, OverdueProcessRequest, OverdueSummary, PaymentRequest},
    error::AppResult,
    models::Invoice,
    response::{ApiResponse, Meta},
    services::invoice_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/invoices", get(list_invoices).post(create_invoice))
        .route("/invoices/{id}", get(get_invoice))
        .route("/invoices/{id}/payments", put(pay_invoice))
        .route("/process-overdue", post(process_overdue))
}

#[utoipa::path(
    get,
    path = "/v1/invoices",
    responses(
        (status = 200, description = "All invoices", body = Vec<Invoice>),
        (status = 204, description = "No invoices stored"),
        (status = 500, description = "Internal Server Error"),
    ),
    tag = "Invoices"
)]
pub async fn list_invoices(State(state): State<AppState>) -> AppResult<Response> {
    let invoices = invoice_service::list_invoices(&state).await?;
    if invoices.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }
    Ok(Json(invoices).into_response())
}

#[utoipa::path(
    get,
    path = "/v1/invoices/{id}",
    params(("id" = i32, Path, description = "Invoice ID")),
    responses(
        (status = 200, description = "Invoice", body = Invoice),
        (status = 404, description = "Not Found"),
    ),
    tag = "Invoices"
)]
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Invoice>> {
    let invoice = invoice_service::get_invoice(&state, id).await?;
    Ok(Json(invoice))
}

#[utoipa::path(
    post,
    path = "/v1/invoices",
    request_body = CreateInvoiceRequest,
    responses(
        (status = 201, description = "Created invoice with a server-assigned id", body = Invoice),
        (status = 500, description = "Internal Server Error"),
    ),
    tag = "Invoices"
)]
pub async fn create_invoice(
    State(state): State<AppState>,
    Json(payload): Json<CreateInvoiceRequest>,
) -> AppResult<(StatusCode, Json<Invoice>)> {
    let invoice = invoice_service::create_invoice(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(invoice)))
}

#[utoipa::path(
    put,
    path = "/v1/invoices/{id}/payments",
    params(("id" = i32, Path, description = "Invoice ID")),
    request_body = PaymentRequest,
    responses(
        (status = 200, description = "Invoice after the payment", body = Invoice),
        (status = 404, description = "Not Found"),
    ),
    tag = "Invoices"
)]
pub async fn pay_invoice(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<PaymentRequest>,
) -> AppResult<Json<Invoice>> {
    let invoice = invoice_service::pay_invoice(&state, id, payload).await?;
    Ok(Json(invoice))
}

#[utoipa::path(
    post,
    path = "/v1/process-overdue",
    request_body = OverdueProcessRequest,
    responses(
        (status = 200, description = "Overdue invoices processed", body = ApiResponse<OverdueSummary>),
    ),
    tag = "Invoices"
)]
pub async fn process_overdue(
    State(state): State<AppState>,
    Json(payload): Json<OverdueProcessRequest>,
) -> AppResult<Json<ApiResponse<OverdueSummary>>> {
    let summary = invoice_service::process_overdue(&state, payload).await?;
    let meta = Meta::with_total(summary.processed as i64);
    Ok(Json(ApiResponse::success(
        "Overdue invoices processed.",
        summary,
        Some(meta),
    )))
}
