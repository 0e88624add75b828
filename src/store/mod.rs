use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{BorrowRequest, BorrowRequestFilter, Invoice, InvoiceStatus, NewInvoice},
};

pub mod memory;
pub mod postgres;

pub use memory::{InMemoryBorrowRequestStore, InMemoryInvoiceStore};
pub use postgres::{PgBorrowRequestStore, PgInvoiceStore};

#[async_trait]
pub trait BorrowRequestStore: Send + Sync {
    async fn insert(&self, request: BorrowRequest) -> AppResult<BorrowRequest>;

    async fn find_all(&self, filter: &BorrowRequestFilter) -> AppResult<Vec<BorrowRequest>>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<BorrowRequest>>;

    async fn update(&self, request: BorrowRequest) -> AppResult<BorrowRequest>;
}

#[async_trait]
pub trait InvoiceStore: Send + Sync {
    async fn next_id(&self) -> AppResult<i32>;

    async fn insert(&self, invoice: Invoice) -> AppResult<Invoice>;

    // Id allocation and insert happen under one lock.
    async fn insert_next(&self, draft: NewInvoice) -> AppResult<Invoice>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Invoice>>;

    async fn find_all(&self) -> AppResult<Vec<Invoice>>;

    async fn find_by_status_and_due_date_before(
        &self,
        status: InvoiceStatus,
        date: NaiveDate,
    ) -> AppResult<Vec<Invoice>>;

    async fn update(&self, invoice: Invoice) -> AppResult<Invoice>;
}
