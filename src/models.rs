use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

pub const SYSTEM_ACTOR: &str = "system";
pub const UNKNOWN_USER: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown status: {}", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountOutOfRange;

impl fmt::Display for AmountOutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("amount out of range")
    }
}

impl std::error::Error for AmountOutOfRange {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum BorrowStatus {
    Pending,
    Approved,
    Rejected,
    Returned,
}

impl BorrowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BorrowStatus::Pending => "PENDING",
            BorrowStatus::Approved => "APPROVED",
            BorrowStatus::Rejected => "REJECTED",
            BorrowStatus::Returned => "RETURNED",
        }
    }
}

impl FromStr for BorrowStatus {
    type Err = UnknownStatus;

    // Accepts any letter case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(BorrowStatus::Pending),
            "approved" => Ok(BorrowStatus::Approved),
            "rejected" => Ok(BorrowStatus::Rejected),
            "returned" => Ok(BorrowStatus::Returned),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

impl fmt::Display for BorrowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum InvoiceStatus {
    Pending,
    Paid,
    Void,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "PENDING",
            InvoiceStatus::Paid => "PAID",
            InvoiceStatus::Void => "VOID",
        }
    }
}

impl FromStr for InvoiceStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(InvoiceStatus::Pending),
            "paid" => Ok(InvoiceStatus::Paid),
            "void" => Ok(InvoiceStatus::Void),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BorrowRequest {
    pub id: Uuid,
    pub equipment_id: String,
    pub user_id: String,
    pub user_name: String,
    pub quantity: i32,
    pub notes: Option<String>,
    pub status: BorrowStatus,
    pub request_date: DateTime<Utc>,
    pub approved_date: Option<DateTime<Utc>>,
    pub return_date: Option<DateTime<Utc>>,
    pub approved_by: Option<String>,
}

impl BorrowRequest {
    pub fn new(
        equipment_id: String,
        quantity: i32,
        notes: Option<String>,
        requester: Requester,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            equipment_id,
            user_id: requester.user_id,
            user_name: requester.user_name,
            quantity,
            notes,
            status: BorrowStatus::Pending,
            request_date: now,
            approved_date: None,
            return_date: None,
            approved_by: None,
        }
    }

    // Unguarded: any status may follow any other.
    pub fn transition(&mut self, status: BorrowStatus, approved_by: &str, now: DateTime<Utc>) {
        self.status = status;
        match status {
            BorrowStatus::Approved => {
                self.approved_date = Some(now);
                self.approved_by = Some(approved_by.to_string());
            }
            BorrowStatus::Returned => {
                self.return_date = Some(now);
            }
            BorrowStatus::Pending | BorrowStatus::Rejected => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requester {
    pub user_id: String,
    pub user_name: String,
}

#[derive(Debug, Clone, Default)]
pub struct BorrowRequestFilter {
    pub status: Option<BorrowStatus>,
    pub user_id: Option<String>,
    pub equipment_id: Option<String>,
}

impl BorrowRequestFilter {
    pub fn matches(&self, request: &BorrowRequest) -> bool {
        self.status.is_none_or(|s| s == request.status)
            && self
                .user_id
                .as_deref()
                .is_none_or(|u| u == request.user_id)
            && self
                .equipment_id
                .as_deref()
                .is_none_or(|e| e == request.equipment_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: i32,
    pub amount: Decimal,
    pub paid_amount: Decimal,
    pub due_date: NaiveDate,
    pub status: InvoiceStatus,
}

impl Invoice {
    pub fn remaining(&self) -> Result<Decimal, AmountOutOfRange> {
        self.amount
            .checked_sub(self.paid_amount)
            .ok_or(AmountOutOfRange)
    }

    pub fn apply_payment(&mut self, payment: Decimal) -> Result<(), AmountOutOfRange> {
        self.paid_amount = self
            .paid_amount
            .checked_add(payment)
            .ok_or(AmountOutOfRange)?;
        if self.status == InvoiceStatus::Pending && self.paid_amount >= self.amount {
            self.status = InvoiceStatus::Paid;
        }
        Ok(())
    }

    /// Close an overdue invoice as PAID (something was paid) or VOID, returning
    /// the successor for any balance. On overflow the invoice is left untouched.
    pub fn close_overdue(
        &mut self,
        late_fee: Decimal,
        successor_due: NaiveDate,
    ) -> Result<Option<NewInvoice>, AmountOutOfRange> {
        let remaining = self.remaining()?;
        let successor = if remaining > Decimal::ZERO {
            Some(NewInvoice {
                amount: remaining.checked_add(late_fee).ok_or(AmountOutOfRange)?,
                paid_amount: Decimal::ZERO,
                due_date: successor_due,
            })
        } else {
            None
        };

        self.status = if self.paid_amount > Decimal::ZERO {
            InvoiceStatus::Paid
        } else {
            InvoiceStatus::Void
        };
        Ok(successor)
    }
}

// Stored as PENDING once an id is allocated.
#[derive(Debug, Clone, PartialEq)]
pub struct NewInvoice {
    pub amount: Decimal,
    pub paid_amount: Decimal,
    pub due_date: NaiveDate,
}

impl NewInvoice {
    pub fn with_id(self, id: i32) -> Invoice {
        Invoice {
            id,
            amount: self.amount,
            paid_amount: self.paid_amount,
            due_date: self.due_date,
            status: InvoiceStatus::Pending,
        }
    }
}
