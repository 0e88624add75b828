use chrono::{Days, NaiveDate, Utc};
use equipment_ledger_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
    models::{BorrowRequest, BorrowStatus, NewInvoice, Requester},
    state::AppState,
};
use rust_decimal::Decimal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(config.require_database_url()?).await?;
    // Ensure migrations are applied.
    run_migrations(&pool).await?;
    let state = AppState::postgres(create_orm_conn(pool));

    seed_borrow_requests(&state).await?;
    seed_invoices(&state).await?;

    println!("Seed completed.");
    Ok(())
}

async fn seed_borrow_requests(state: &AppState) -> anyhow::Result<()> {
    let now = Utc::now();
    let samples = [
        ("microscope-01", 1, "Histology lab session", "s1001", "Ana Ruiz", None),
        ("projector-03", 1, "Thesis defence rehearsal", "s1002", "Ben Okafor", Some(BorrowStatus::Approved)),
        ("laptop-12", 2, "Field survey", "s1003", "Chen Wei", Some(BorrowStatus::Returned)),
    ];

    for (equipment_id, quantity, notes, user_id, user_name, status) in samples {
        let requester = Requester {
            user_id: user_id.to_string(),
            user_name: user_name.to_string(),
        };
        let mut request = BorrowRequest::new(
            equipment_id.to_string(),
            quantity,
            Some(notes.to_string()),
            requester,
            now,
        );
        if let Some(status) = status {
            request.transition(status, "seed", now);
        }
        let saved = state.borrow_requests.insert(request).await?;
        println!("Seeded borrow request {} ({})", saved.id, saved.status);
    }
    Ok(())
}

async fn seed_invoices(state: &AppState) -> anyhow::Result<()> {
    let today = Utc::now().date_naive();
    let past = |days: u64| -> anyhow::Result<NaiveDate> {
        today
            .checked_sub_days(Days::new(days))
            .ok_or_else(|| anyhow::anyhow!("date out of range"))
    };
    let future = today
        .checked_add_days(Days::new(30))
        .ok_or_else(|| anyhow::anyhow!("date out of range"))?;

    let drafts = [
        NewInvoice {
            amount: Decimal::new(12000, 2),
            paid_amount: Decimal::ZERO,
            due_date: future,
        },
        // Overdue with a partial payment: closes as PAID with a successor.
        NewInvoice {
            amount: Decimal::new(10000, 2),
            paid_amount: Decimal::new(3000, 2),
            due_date: past(40)?,
        },
        // Overdue and untouched: closes as VOID with a successor.
        NewInvoice {
            amount: Decimal::new(5000, 2),
            paid_amount: Decimal::ZERO,
            due_date: past(45)?,
        },
    ];

    for draft in drafts {
        let invoice = state.invoices.insert_next(draft).await?;
        println!("Seeded invoice {} due {}", invoice.id, invoice.due_date);
    }
    Ok(())
}
