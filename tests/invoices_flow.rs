use chrono::{Days, NaiveDate, Utc};
use equipment_ledger_api::{
    dto::invoices::{CreateInvoiceRequest, PaymentRequest},
    error::AppError,
    models::{Invoice, InvoiceStatus, NewInvoice},
    services::invoice_service,
    state::AppState,
};
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    s.parse().expect("decimal literal")
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn days_ago(days: u64) -> NaiveDate {
    today().checked_sub_days(Days::new(days)).expect("date")
}

async fn seed(state: &AppState, amount: &str, paid: &str, due_date: NaiveDate) -> Invoice {
    state
        .invoices
        .insert_next(NewInvoice {
            amount: dec(amount),
            paid_amount: dec(paid),
            due_date,
        })
        .await
        .expect("seed invoice")
}

#[tokio::test]
async fn ids_are_sequential_from_one() -> anyhow::Result<()> {
    let state = AppState::in_memory();
    assert_eq!(state.invoices.next_id().await?, 1);

    let first = invoice_service::create_invoice(
        &state,
        CreateInvoiceRequest {
            amount: dec("100"),
            paid_amount: Decimal::ZERO,
            due_date: today(),
        },
    )
    .await?;
    let second = invoice_service::create_invoice(
        &state,
        CreateInvoiceRequest {
            amount: dec("20"),
            paid_amount: Decimal::ZERO,
            due_date: today(),
        },
    )
    .await?;

    assert_eq!(first.id, 1);
    assert_eq!(second.id, 2);
    assert_eq!(first.status, InvoiceStatus::Pending);
    assert_eq!(state.invoices.next_id().await?, 3);
    Ok(())
}

#[tokio::test]
async fn ids_follow_current_max_not_a_counter() -> anyhow::Result<()> {
    let state = AppState::in_memory();
    let draft = NewInvoice {
        amount: dec("10"),
        paid_amount: Decimal::ZERO,
        due_date: today(),
    };
    state.invoices.insert(draft.clone().with_id(41)).await?;

    let created = state.invoices.insert_next(draft).await?;
    assert_eq!(created.id, 42);
    Ok(())
}

#[tokio::test]
async fn payment_completing_amount_marks_paid() -> anyhow::Result<()> {
    let state = AppState::in_memory();
    let invoice = seed(&state, "100", "60", today()).await;

    let paid =
        invoice_service::pay_invoice(&state, invoice.id, PaymentRequest { amount: dec("40") })
            .await?;
    assert_eq!(paid.paid_amount, dec("100"));
    assert_eq!(paid.status, InvoiceStatus::Paid);

    let stored = invoice_service::get_invoice(&state, invoice.id).await?;
    assert_eq!(stored, paid);
    Ok(())
}

#[tokio::test]
async fn payment_on_paid_invoice_accumulates_and_persists() -> anyhow::Result<()> {
    let state = AppState::in_memory();
    let invoice = seed(&state, "100", "60", today()).await;
    invoice_service::pay_invoice(&state, invoice.id, PaymentRequest { amount: dec("40") }).await?;

    let again =
        invoice_service::pay_invoice(&state, invoice.id, PaymentRequest { amount: dec("10") })
            .await?;
    assert_eq!(again.paid_amount, dec("110"));
    assert_eq!(again.status, InvoiceStatus::Paid);

    let stored = invoice_service::get_invoice(&state, invoice.id).await?;
    assert_eq!(stored.paid_amount, dec("110"));
    Ok(())
}

#[tokio::test]
async fn paying_unknown_invoice_is_not_found() {
    let state = AppState::in_memory();
    let err = invoice_service::pay_invoice(&state, 99, PaymentRequest { amount: dec("1") })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}

#[tokio::test]
async fn overdue_partial_payment_closes_as_paid_with_successor() -> anyhow::Result<()> {
    let state = AppState::in_memory();
    let invoice = seed(&state, "100", "30", days_ago(40)).await;

    let summary = invoice_service::process_overdue_on(&state, dec("5"), 30, today()).await?;
    assert_eq!(summary.processed, 1);
    assert_eq!(summary.paid, 1);
    assert_eq!(summary.successors.len(), 1);

    let closed = invoice_service::get_invoice(&state, invoice.id).await?;
    assert_eq!(closed.status, InvoiceStatus::Paid);
    assert_eq!(closed.paid_amount, dec("30"));

    let successor = invoice_service::get_invoice(&state, summary.successors[0]).await?;
    assert_eq!(successor.id, invoice.id + 1);
    assert_eq!(successor.amount, dec("75"));
    assert_eq!(successor.paid_amount, Decimal::ZERO);
    assert_eq!(successor.status, InvoiceStatus::Pending);
    assert_eq!(
        successor.due_date,
        today().checked_add_days(Days::new(30)).expect("date")
    );
    Ok(())
}

#[tokio::test]
async fn overdue_unpaid_invoice_is_voided_with_successor() -> anyhow::Result<()> {
    let state = AppState::in_memory();
    let invoice = seed(&state, "50", "0", days_ago(40)).await;

    let summary = invoice_service::process_overdue_on(&state, dec("5"), 30, today()).await?;
    assert_eq!(summary.voided, 1);

    let closed = invoice_service::get_invoice(&state, invoice.id).await?;
    assert_eq!(closed.status, InvoiceStatus::Void);

    let successor = invoice_service::get_invoice(&state, summary.successors[0]).await?;
    assert_eq!(successor.amount, dec("55"));
    Ok(())
}

#[tokio::test]
async fn sweep_leaves_recent_and_settled_invoices_alone() -> anyhow::Result<()> {
    let state = AppState::in_memory();
    let recent = seed(&state, "80", "0", days_ago(10)).await;
    let boundary = seed(&state, "80", "0", days_ago(30)).await;
    let paid = seed(&state, "80", "80", days_ago(60)).await;
    let paid = invoice_service::pay_invoice(&state, paid.id, PaymentRequest { amount: Decimal::ZERO })
        .await?;
    assert_eq!(paid.status, InvoiceStatus::Paid);

    let summary = invoice_service::process_overdue_on(&state, dec("5"), 30, today()).await?;
    assert_eq!(summary.processed, 0);
    assert!(summary.successors.is_empty());

    for before in [recent, boundary, paid] {
        let after = invoice_service::get_invoice(&state, before.id).await?;
        assert_eq!(after, before);
    }
    assert_eq!(invoice_service::list_invoices(&state).await?.len(), 3);
    Ok(())
}

#[tokio::test]
async fn successors_are_not_swept_twice_in_one_run() -> anyhow::Result<()> {
    let state = AppState::in_memory();
    seed(&state, "100", "0", days_ago(90)).await;
    seed(&state, "40", "10", days_ago(45)).await;

    let summary = invoice_service::process_overdue_on(&state, dec("2.50"), 30, today()).await?;
    assert_eq!(summary.processed, 2);
    assert_eq!(summary.successors, vec![3, 4]);

    let amounts: Vec<Decimal> = invoice_service::list_invoices(&state)
        .await?
        .into_iter()
        .filter(|inv| inv.status == InvoiceStatus::Pending)
        .map(|inv| inv.amount)
        .collect();
    assert_eq!(amounts, vec![dec("102.50"), dec("32.50")]);

    let again = invoice_service::process_overdue_on(&state, dec("2.50"), 30, today()).await?;
    assert_eq!(again.processed, 0);
    Ok(())
}

#[tokio::test]
async fn negative_paid_amount_is_rejected_on_create() {
    let state = AppState::in_memory();
    let err = invoice_service::create_invoice(
        &state,
        CreateInvoiceRequest {
            amount: dec("100"),
            paid_amount: dec("-1"),
            due_date: today(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(ref msg) if msg == "paidAmount must not be negative"));
    assert!(invoice_service::list_invoices(&state).await.unwrap().is_empty());
}

#[tokio::test]
async fn overflowing_payment_is_rejected_and_not_stored() -> anyhow::Result<()> {
    let state = AppState::in_memory();
    let invoice = seed(&state, "1", &Decimal::MAX.to_string(), today()).await;

    let err = invoice_service::pay_invoice(&state, invoice.id, PaymentRequest { amount: dec("1") })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(ref msg) if msg == "amount out of range"));

    let stored = invoice_service::get_invoice(&state, invoice.id).await?;
    assert_eq!(stored, invoice);
    Ok(())
}

#[tokio::test]
async fn payment_on_void_invoice_accumulates_but_stays_void() -> anyhow::Result<()> {
    let state = AppState::in_memory();
    let invoice = seed(&state, "50", "0", days_ago(40)).await;
    invoice_service::process_overdue_on(&state, dec("5"), 30, today()).await?;

    let paid =
        invoice_service::pay_invoice(&state, invoice.id, PaymentRequest { amount: dec("50") })
            .await?;
    assert_eq!(paid.status, InvoiceStatus::Void);
    assert_eq!(paid.paid_amount, dec("50"));

    let stored = invoice_service::get_invoice(&state, invoice.id).await?;
    assert_eq!(stored, paid);
    Ok(())
}

#[tokio::test]
async fn sweep_skips_overflowing_invoice_and_continues() -> anyhow::Result<()> {
    let state = AppState::in_memory();
    let huge = seed(&state, &Decimal::MAX.to_string(), "0", days_ago(40)).await;
    let small = seed(&state, "50", "0", days_ago(40)).await;

    let summary = invoice_service::process_overdue_on(&state, dec("1"), 30, today()).await?;
    assert_eq!(summary.skipped, vec![huge.id]);
    assert_eq!(summary.processed, 1);
    assert_eq!(summary.voided, 1);
    assert_eq!(summary.successors, vec![3]);

    let untouched = invoice_service::get_invoice(&state, huge.id).await?;
    assert_eq!(untouched, huge);
    let closed = invoice_service::get_invoice(&state, small.id).await?;
    assert_eq!(closed.status, InvoiceStatus::Void);
    Ok(())
}
