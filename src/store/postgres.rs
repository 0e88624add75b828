use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, Statement, TransactionTrait,
};
use uuid::Uuid;

use super::{BorrowRequestStore, InvoiceStore};
use crate::{
    db::OrmConn,
    entity::{
        borrow_requests::{
            ActiveModel as RequestActive, Column as RequestCol, Entity as BorrowRequests,
            Model as RequestModel,
        },
        invoices::{
            ActiveModel as InvoiceActive, Column as InvoiceCol, Entity as Invoices,
            Model as InvoiceModel,
        },
    },
    error::{AppError, AppResult},
    models::{
        BorrowRequest, BorrowRequestFilter, BorrowStatus, Invoice, InvoiceStatus, NewInvoice,
    },
};

#[derive(Clone)]
pub struct PgBorrowRequestStore {
    orm: OrmConn,
}

impl PgBorrowRequestStore {
    pub fn new(orm: OrmConn) -> Self {
        Self { orm }
    }
}

#[async_trait]
impl BorrowRequestStore for PgBorrowRequestStore {
    async fn insert(&self, request: BorrowRequest) -> AppResult<BorrowRequest> {
        let model = request_active(request).insert(&self.orm).await?;
        request_from_entity(model)
    }

    async fn find_all(&self, filter: &BorrowRequestFilter) -> AppResult<Vec<BorrowRequest>> {
        let mut condition = Condition::all();
        if let Some(status) = filter.status {
            condition = condition.add(RequestCol::Status.eq(status.as_str()));
        }
        if let Some(user_id) = filter.user_id.as_ref() {
            condition = condition.add(RequestCol::UserId.eq(user_id.clone()));
        }
        if let Some(equipment_id) = filter.equipment_id.as_ref() {
            condition = condition.add(RequestCol::EquipmentId.eq(equipment_id.clone()));
        }

        BorrowRequests::find()
            .filter(condition)
            .order_by_asc(RequestCol::RequestDate)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(request_from_entity)
            .collect()
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<BorrowRequest>> {
        BorrowRequests::find_by_id(id)
            .one(&self.orm)
            .await?
            .map(request_from_entity)
            .transpose()
    }

    async fn update(&self, request: BorrowRequest) -> AppResult<BorrowRequest> {
        match request_active(request).update(&self.orm).await {
            Ok(model) => request_from_entity(model),
            Err(DbErr::RecordNotUpdated) => Err(AppError::NotFound),
            Err(err) => Err(err.into()),
        }
    }
}

#[derive(Clone)]
pub struct PgInvoiceStore {
    orm: OrmConn,
}

impl PgInvoiceStore {
    pub fn new(orm: OrmConn) -> Self {
        Self { orm }
    }
}

async fn max_plus_one<C: ConnectionTrait>(conn: &C) -> Result<i32, DbErr> {
    let last = Invoices::find()
        .order_by_desc(InvoiceCol::Id)
        .one(conn)
        .await?;
    Ok(last.map(|m| m.id).unwrap_or(0) + 1)
}

#[async_trait]
impl InvoiceStore for PgInvoiceStore {
    async fn next_id(&self) -> AppResult<i32> {
        Ok(max_plus_one(&self.orm).await?)
    }

    async fn insert(&self, invoice: Invoice) -> AppResult<Invoice> {
        let model = invoice_active(invoice).insert(&self.orm).await?;
        invoice_from_entity(model)
    }

    async fn insert_next(&self, draft: NewInvoice) -> AppResult<Invoice> {
        let txn = self.orm.begin().await?;

        // Blocks other allocators (and plain inserts) until commit; readers are unaffected.
        let backend = txn.get_database_backend();
        txn.execute(Statement::from_string(
            backend,
            "LOCK TABLE invoices IN SHARE ROW EXCLUSIVE MODE",
        ))
        .await?;

        let id = max_plus_one(&txn).await?;
        let model = invoice_active(draft.with_id(id)).insert(&txn).await?;

        txn.commit().await?;
        invoice_from_entity(model)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Invoice>> {
        Invoices::find_by_id(id)
            .one(&self.orm)
            .await?
            .map(invoice_from_entity)
            .transpose()
    }

    async fn find_all(&self) -> AppResult<Vec<Invoice>> {
        Invoices::find()
            .order_by_asc(InvoiceCol::Id)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(invoice_from_entity)
            .collect()
    }

    async fn find_by_status_and_due_date_before(
        &self,
        status: InvoiceStatus,
        date: NaiveDate,
    ) -> AppResult<Vec<Invoice>> {
        Invoices::find()
            .filter(
                Condition::all()
                    .add(InvoiceCol::Status.eq(status.as_str()))
                    .add(InvoiceCol::DueDate.lt(date)),
            )
            .order_by_asc(InvoiceCol::Id)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(invoice_from_entity)
            .collect()
    }

    async fn update(&self, invoice: Invoice) -> AppResult<Invoice> {
        match invoice_active(invoice).update(&self.orm).await {
            Ok(model) => invoice_from_entity(model),
            Err(DbErr::RecordNotUpdated) => Err(AppError::NotFound),
            Err(err) => Err(err.into()),
        }
    }
}

fn request_active(request: BorrowRequest) -> RequestActive {
    RequestActive {
        id: Set(request.id),
        equipment_id: Set(request.equipment_id),
        user_id: Set(request.user_id),
        user_name: Set(request.user_name),
        quantity: Set(request.quantity),
        notes: Set(request.notes),
        status: Set(request.status.as_str().to_string()),
        request_date: Set(request.request_date.into()),
        approved_date: Set(request.approved_date.map(Into::into)),
        return_date: Set(request.return_date.map(Into::into)),
        approved_by: Set(request.approved_by),
    }
}

fn request_from_entity(model: RequestModel) -> AppResult<BorrowRequest> {
    let status = model
        .status
        .parse::<BorrowStatus>()
        .map_err(|e| anyhow!("borrow request {}: {}", model.id, e))?;
    Ok(BorrowRequest {
        id: model.id,
        equipment_id: model.equipment_id,
        user_id: model.user_id,
        user_name: model.user_name,
        quantity: model.quantity,
        notes: model.notes,
        status,
        request_date: model.request_date.with_timezone(&Utc),
        approved_date: model.approved_date.map(|dt| dt.with_timezone(&Utc)),
        return_date: model.return_date.map(|dt| dt.with_timezone(&Utc)),
        approved_by: model.approved_by,
    })
}

fn invoice_active(invoice: Invoice) -> InvoiceActive {
    InvoiceActive {
        id: Set(invoice.id),
        amount: Set(invoice.amount),
        paid_amount: Set(invoice.paid_amount),
        due_date: Set(invoice.due_date),
        status: Set(invoice.status.as_str().to_string()),
    }
}

fn invoice_from_entity(model: InvoiceModel) -> AppResult<Invoice> {
    let status = model
        .status
        .parse::<InvoiceStatus>()
        .map_err(|e| anyhow!("invoice {}: {}", model.id, e))?;
    Ok(Invoice {
        id: model.id,
        amount: model.amount,
        paid_amount: model.paid_amount,
        due_date: model.due_date,
        status,
    })
}
