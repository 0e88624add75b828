use std::sync::Arc;

use crate::{
    db::OrmConn,
    store::{
        BorrowRequestStore, InMemoryBorrowRequestStore, InMemoryInvoiceStore, InvoiceStore,
        PgBorrowRequestStore, PgInvoiceStore,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub borrow_requests: Arc<dyn BorrowRequestStore>,
    pub invoices: Arc<dyn InvoiceStore>,
    pub backend: &'static str,
}

impl AppState {
    pub fn postgres(orm: OrmConn) -> Self {
        Self {
            borrow_requests: Arc::new(PgBorrowRequestStore::new(orm.clone())),
            invoices: Arc::new(PgInvoiceStore::new(orm)),
            backend: "postgres",
        }
    }

    pub fn in_memory() -> Self {
        Self {
            borrow_requests: Arc::new(InMemoryBorrowRequestStore::new()),
            invoices: Arc::new(InMemoryInvoiceStore::new()),
            backend: "memory",
        }
    }
}
