use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceRequest {
    pub amount: Decimal,
    #[serde(default)]
    pub paid_amount: Decimal,
    pub due_date: NaiveDate,
}

// Accepts the invoice shape; only `amount` is read.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PaymentRequest {
    #[serde(default)]
    pub amount: Decimal,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OverdueProcessRequest {
    #[serde(default)]
    pub late_fee: Decimal,
    #[serde(default)]
    pub overdue_days: i64,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OverdueSummary {
    pub processed: usize,
    pub paid: usize,
    pub voided: usize,
    pub successors: Vec<i32>,
    pub skipped: Vec<i32>,
}
