use axum::extract::State;
use equipment_ledger_api::{routes::health::health_check, state::AppState};

#[tokio::test]
async fn health_check_returns_ok() {
    let response = health_check(State(AppState::in_memory())).await;
    assert_eq!(response.0.message, "Health check");

    let data = response.0.data.expect("health data");
    assert_eq!(data.status, "ok");
    assert_eq!(data.store, "memory");
}
