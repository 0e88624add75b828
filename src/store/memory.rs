use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use super::{BorrowRequestStore, InvoiceStore};
use crate::{
    error::{AppError, AppResult},
    models::{BorrowRequest, BorrowRequestFilter, Invoice, InvoiceStatus, NewInvoice},
};

#[derive(Default)]
pub struct InMemoryBorrowRequestStore {
    requests: RwLock<HashMap<Uuid, BorrowRequest>>,
}

impl InMemoryBorrowRequestStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BorrowRequestStore for InMemoryBorrowRequestStore {
    async fn insert(&self, request: BorrowRequest) -> AppResult<BorrowRequest> {
        let mut requests = self
            .requests
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;
        requests.insert(request.id, request.clone());
        Ok(request)
    }

    async fn find_all(&self, filter: &BorrowRequestFilter) -> AppResult<Vec<BorrowRequest>> {
        let requests = self
            .requests
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;
        let mut found: Vec<BorrowRequest> = requests
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        found.sort_by_key(|r| r.request_date);
        Ok(found)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<BorrowRequest>> {
        let requests = self
            .requests
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;
        Ok(requests.get(&id).cloned())
    }

    async fn update(&self, request: BorrowRequest) -> AppResult<BorrowRequest> {
        let mut requests = self
            .requests
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;
        let slot = requests.get_mut(&request.id).ok_or(AppError::NotFound)?;
        *slot = request.clone();
        Ok(request)
    }
}

#[derive(Default)]
pub struct InMemoryInvoiceStore {
    invoices: RwLock<BTreeMap<i32, Invoice>>,
}

impl InMemoryInvoiceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn max_plus_one(invoices: &BTreeMap<i32, Invoice>) -> i32 {
    invoices.keys().next_back().copied().unwrap_or(0) + 1
}

#[async_trait]
impl InvoiceStore for InMemoryInvoiceStore {
    async fn next_id(&self) -> AppResult<i32> {
        let invoices = self
            .invoices
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;
        Ok(max_plus_one(&invoices))
    }

    async fn insert(&self, invoice: Invoice) -> AppResult<Invoice> {
        let mut invoices = self
            .invoices
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;
        invoices.insert(invoice.id, invoice.clone());
        Ok(invoice)
    }

    async fn insert_next(&self, draft: NewInvoice) -> AppResult<Invoice> {
        let mut invoices = self
            .invoices
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;
        let invoice = draft.with_id(max_plus_one(&invoices));
        invoices.insert(invoice.id, invoice.clone());
        Ok(invoice)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Invoice>> {
        let invoices = self
            .invoices
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;
        Ok(invoices.get(&id).cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<Invoice>> {
        let invoices = self
            .invoices
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;
        Ok(invoices.values().cloned().collect())
    }

    async fn find_by_status_and_due_date_before(
        &self,
        status: InvoiceStatus,
        date: NaiveDate,
    ) -> AppResult<Vec<Invoice>> {
        let invoices = self
            .invoices
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;
        Ok(invoices
            .values()
            .filter(|inv| inv.status == status && inv.due_date < date)
            .cloned()
            .collect())
    }

    async fn update(&self, invoice: Invoice) -> AppResult<Invoice> {
        let mut invoices = self
            .invoices
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;
        let slot = invoices.get_mut(&invoice.id).ok_or(AppError::NotFound)?;
        *slot = invoice.clone();
        Ok(invoice)
    }
}
