use chrono::{NaiveDate, TimeDelta, Utc};
use rust_decimal::Decimal;

use crate::{
    dto::invoices::{CreateInvoiceRequest, OverdueProcessRequest, OverdueSummary, PaymentRequest},
    error::{AppError, AppResult},
    models::{Invoice, InvoiceStatus, NewInvoice},
    state::AppState,
};

pub async fn create_invoice(state: &AppState, payload: CreateInvoiceRequest) -> AppResult<Invoice> {
    if payload.paid_amount < Decimal::ZERO {
        return Err(AppError::BadRequest("paidAmount must not be negative".into()));
    }
    let draft = NewInvoice {
        amount: payload.amount,
        paid_amount: payload.paid_amount,
        due_date: payload.due_date,
    };
    let invoice = state.invoices.insert_next(draft).await?;

    tracing::info!(invoice_id = invoice.id, amount = %invoice.amount, "invoice created");
    Ok(invoice)
}

pub async fn list_invoices(state: &AppState) -> AppResult<Vec<Invoice>> {
    state.invoices.find_all().await
}

pub async fn get_invoice(state: &AppState, id: i32) -> AppResult<Invoice> {
    let invoice = state.invoices.find_by_id(id).await?;
    match invoice {
        Some(inv) => Ok(inv),
        None => Err(AppError::NotFound),
    }
}

pub async fn pay_invoice(
    state: &AppState,
    id: i32,
    payment: PaymentRequest,
) -> AppResult<Invoice> {
    let mut invoice = get_invoice(state, id).await?;
    let was = invoice.status;

    invoice
        .apply_payment(payment.amount)
        .map_err(|err| AppError::BadRequest(err.to_string()))?;
    let invoice = state.invoices.update(invoice).await?;

    tracing::info!(
        invoice_id = invoice.id,
        payment = %payment.amount,
        paid_amount = %invoice.paid_amount,
        from = %was,
        to = %invoice.status,
        "payment applied"
    );
    Ok(invoice)
}

pub async fn process_overdue(
    state: &AppState,
    request: OverdueProcessRequest,
) -> AppResult<OverdueSummary> {
    let today = Utc::now().date_naive();
    process_overdue_on(state, request.late_fee, request.overdue_days, today).await
}

// An invoice whose arithmetic overflows is left PENDING and reported in `skipped`.
// The close and the successor are separate writes.
pub async fn process_overdue_on(
    state: &AppState,
    late_fee: Decimal,
    overdue_days: i64,
    today: NaiveDate,
) -> AppResult<OverdueSummary> {
    let threshold = overdue_days
        .checked_neg()
        .and_then(|days| shift_days(today, days))
        .ok_or_else(|| out_of_range(overdue_days))?;
    let successor_due =
        shift_days(today, overdue_days).ok_or_else(|| out_of_range(overdue_days))?;

    let overdue = state
        .invoices
        .find_by_status_and_due_date_before(InvoiceStatus::Pending, threshold)
        .await?;

    tracing::debug!(%threshold, count = overdue.len(), "processing overdue invoices");

    let mut summary = OverdueSummary::default();
    for mut invoice in overdue {
        let successor = match invoice.close_overdue(late_fee, successor_due) {
            Ok(successor) => successor,
            Err(err) => {
                tracing::warn!(invoice_id = invoice.id, error = %err, "overdue invoice skipped");
                summary.skipped.push(invoice.id);
                continue;
            }
        };
        let closed = state.invoices.update(invoice).await?;

        summary.processed += 1;
        match closed.status {
            InvoiceStatus::Paid => summary.paid += 1,
            InvoiceStatus::Void => summary.voided += 1,
            InvoiceStatus::Pending => {}
        }

        match successor {
            Some(draft) => {
                let next = state.invoices.insert_next(draft).await?;
                tracing::info!(
                    invoice_id = closed.id,
                    status = %closed.status,
                    successor_id = next.id,
                    successor_amount = %next.amount,
                    "overdue invoice closed with successor"
                );
                summary.successors.push(next.id);
            }
            None => {
                tracing::info!(
                    invoice_id = closed.id,
                    status = %closed.status,
                    "overdue invoice closed"
                );
            }
        }
    }

    Ok(summary)
}

fn shift_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    TimeDelta::try_days(days).and_then(|delta| date.checked_add_signed(delta))
}

fn out_of_range(days: i64) -> AppError {
    AppError::BadRequest(format!("overdueDays out of range: {days}"))
}
