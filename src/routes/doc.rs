use utoipa::OpenApi;
use utoipa::openapi::OpenApi as OpenApiSpec;
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        borrow_requests::{CreateBorrowRequest, UpdateRequestStatusRequest},
        invoices::{CreateInvoiceRequest, OverdueProcessRequest, OverdueSummary, PaymentRequest},
    },
    models::{BorrowRequest, BorrowStatus, Invoice, InvoiceStatus},
    response::{ApiResponse, Meta},
    routes::{borrow_requests, health, invoices, params},
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Invoice System API",
        version = "1.0.0",
        description = "Equipment borrow requests and invoices."
    ),
    paths(
        health::health_check,
        borrow_requests::list_requests,
        borrow_requests::create_request,
        borrow_requests::get_request,
        borrow_requests::update_request_status,
        invoices::list_invoices,
        invoices::get_invoice,
        invoices::create_invoice,
        invoices::pay_invoice,
        invoices::process_overdue
    ),
    components(
        schemas(
            BorrowRequest,
            BorrowStatus,
            Invoice,
            InvoiceStatus,
            CreateBorrowRequest,
            UpdateRequestStatusRequest,
            CreateInvoiceRequest,
            PaymentRequest,
            OverdueProcessRequest,
            OverdueSummary,
            params::BorrowRequestQuery,
            health::HealthData,
            Meta,
            ApiResponse<OverdueSummary>,
            ApiResponse<health::HealthData>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Borrow Requests", description = "Equipment borrow request endpoints"),
        (name = "Invoices", description = "Invoice and payment endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
