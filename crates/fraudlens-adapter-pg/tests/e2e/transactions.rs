//! Transaction resources against live tables.
//!
//! - id lookups on `SERIAL` keys
//! - range queries with one-sided and two-sided date windows on
//!   `TIMESTAMP` and `DATE` columns
//! - field filters, including NUMERIC values as displayed

use super::common::*;
use fraudlens_query::{QueryOutcome, ResourcePath};
use serde_json::json;

fn ids(outcome: &QueryOutcome) -> Vec<i64> {
    column(outcome, "id")
        .iter()
        .map(|v| v.as_i64().expect("integer id"))
        .collect()
}

// =============================================================================
// ID LOOKUP
// =============================================================================

pub async fn test_authorization_by_id(ctx: &TestContext) {
    println!("  🧪 test_authorization_by_id");

    let outcome = ctx
        .ok(ResourcePath::Authorizations, &[("auth_transaction_id", "1")])
        .await;
    let item = outcome.item().expect("id lookup is a single item");

    assert_eq!(item["id"], json!(1));
    assert_eq!(item["amount"], json!("12.50"));
    assert_eq!(item["transaction_datetime"], json!("2024-01-15T10:00:00"));
    assert_eq!(item["approval_status"], json!("Approved"));
    assert_eq!(item["decline_reason"], json!(null));

    let generic = ctx
        .ok(ResourcePath::Authorizations, &[("transaction_id", " 2 ")])
        .await;
    assert_eq!(generic.item().expect("single item")["amount"], json!("99.99"));
}

pub async fn test_settlement_by_id(ctx: &TestContext) {
    println!("  🧪 test_settlement_by_id");

    let outcome = ctx
        .ok(ResourcePath::Settlements, &[("transaction_id", "2")])
        .await;
    let item = outcome.item().expect("id lookup is a single item");
    assert_eq!(item["processed_amount"], json!("99.99"));
    assert_eq!(item["transaction_date"], json!("2024-02-11"));

    let named = ctx
        .ok(ResourcePath::Settlements, &[("settlement_transaction_id", "1")])
        .await;
    assert_eq!(named.item().expect("single item")["tran_id"], json!("T1"));
}

pub async fn test_missing_and_malformed_ids(ctx: &TestContext) {
    println!("  🧪 test_missing_and_malformed_ids");

    let missing = ctx
        .route(ResourcePath::Authorizations, &[("auth_transaction_id", "999")])
        .await
        .unwrap_err();
    assert_eq!(missing.status_code(), 404);
    assert_eq!(missing.to_string(), "Transaction 999 not found");

    let malformed = ctx
        .route(ResourcePath::Settlements, &[("transaction_id", "abc")])
        .await
        .unwrap_err();
    assert_eq!(malformed.status_code(), 400);
}

// =============================================================================
// DATE WINDOWS
// =============================================================================

pub async fn test_authorization_windows(ctx: &TestContext) {
    println!("  🧪 test_authorization_windows");

    let all = ctx
        .ok(ResourcePath::Authorizations, &[("merchant_number", "MRCH1")])
        .await;
    assert_eq!(ids(&all), vec![3, 2, 1]);
    assert!(all.to_body().get("count").is_none());

    let from = ctx
        .ok(
            ResourcePath::Authorizations,
            &[("merchant_number", "MRCH1"), ("date_from", "2024-02-01")],
        )
        .await;
    assert_eq!(ids(&from), vec![3, 2]);

    let to = ctx
        .ok(
            ResourcePath::Authorizations,
            &[("merchant_number", "MRCH1"), ("date_to", "2024-01-31")],
        )
        .await;
    assert_eq!(ids(&to), vec![1]);

    let between = ctx
        .ok(
            ResourcePath::Authorizations,
            &[
                ("merchant_number", "MRCH1"),
                ("date_from", "2024-02-01"),
                ("date_to", "2024-02-29 23:59:59"),
            ],
        )
        .await;
    assert_eq!(ids(&between), vec![2]);
}

pub async fn test_authorization_declines(ctx: &TestContext) {
    println!("  🧪 test_authorization_declines");

    let declines = ctx
        .ok(
            ResourcePath::Authorizations,
            &[
                ("merchant_number", "MRCH1"),
                ("approval_status", "Declined"),
                ("date_from", "2024-01-01"),
                ("date_to", "2024-12-31"),
            ],
        )
        .await;
    assert_eq!(ids(&declines), vec![3, 2]);

    let limited = ctx
        .ok(
            ResourcePath::Authorizations,
            &[
                ("merchant_number", "MRCH1"),
                ("approval_status", "Declined"),
                ("limit", "1"),
            ],
        )
        .await;
    assert_eq!(ids(&limited), vec![3]);
}

pub async fn test_settlement_windows(ctx: &TestContext) {
    println!("  🧪 test_settlement_windows");

    let all = ctx
        .ok(ResourcePath::Settlements, &[("merchant_number", "MRCH1")])
        .await;
    assert_eq!(ids(&all), vec![2, 1]);

    let from = ctx
        .ok(
            ResourcePath::Settlements,
            &[("merchant_number", "MRCH1"), ("date_from", "2024-02-01")],
        )
        .await;
    assert_eq!(ids(&from), vec![2]);

    let to = ctx
        .ok(
            ResourcePath::Settlements,
            &[("merchant_number", "MRCH1"), ("date_to", "2024-01-31")],
        )
        .await;
    assert_eq!(ids(&to), vec![1]);

    let between = ctx
        .ok(
            ResourcePath::Settlements,
            &[
                ("merchant_number", "MRCH1"),
                ("date_from", "2024-01-16"),
                ("date_to", "2024-01-16"),
            ],
        )
        .await;
    assert_eq!(ids(&between), vec![1]);

    let empty = ctx
        .route(
            ResourcePath::Settlements,
            &[("merchant_number", "MRCH1"), ("date_from", "2025-01-01")],
        )
        .await
        .unwrap_err();
    assert_eq!(empty.status_code(), 404);
}

// =============================================================================
// FIELD FILTERS
// =============================================================================

pub async fn test_filter_amount_as_displayed(ctx: &TestContext) {
    println!("  🧪 test_filter_amount_as_displayed");

    let outcome = ctx
        .ok(
            ResourcePath::FilterTransactions,
            &[("field", "amount"), ("value", "12.50")],
        )
        .await;
    let body = outcome.to_body();
    assert_eq!(body["count"], json!(1));
    assert_eq!(body["items"][0]["id"], json!(1));

    // A value read back from a lookup filters to the same row.
    let amount = body["items"][0]["amount"].as_str().expect("amount is text");
    let again = ctx
        .ok(
            ResourcePath::FilterTransactions,
            &[("field", "amount"), ("value", amount)],
        )
        .await;
    assert_eq!(ids(&again), vec![1]);
}

pub async fn test_filter_settlements_and_declines(ctx: &TestContext) {
    println!("  🧪 test_filter_settlements_and_declines");

    let settled = ctx
        .ok(
            ResourcePath::FilterTransactions,
            &[
                ("table", "settlements"),
                ("field", "processed_amount"),
                ("value", "99.99"),
            ],
        )
        .await;
    assert_eq!(ids(&settled), vec![2]);

    let declined = ctx
        .ok(
            ResourcePath::FilterTransactions,
            &[("field", "approval_status"), ("value", "Declined")],
        )
        .await;
    assert_eq!(ids(&declined), vec![3, 2]);
    assert_eq!(declined.to_body()["count"], json!(2));

    let reason = ctx
        .ok(
            ResourcePath::FilterTransactions,
            &[("field", "decline_reason"), ("value", "Do not honor")],
        )
        .await;
    assert_eq!(column(&reason, "amount"), vec![json!("45.00")]);

    let by_time = ctx
        .ok(
            ResourcePath::FilterTransactions,
            &[
                ("field", "transaction_datetime"),
                ("value", "2024-01-15 10:00:00"),
            ],
        )
        .await;
    assert_eq!(ids(&by_time), vec![1]);
}

pub async fn test_filter_no_match(ctx: &TestContext) {
    println!("  🧪 test_filter_no_match");

    let err = ctx
        .route(
            ResourcePath::FilterTransactions,
            &[("field", "amount"), ("value", "12.5")],
        )
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 404);
}

pub async fn run_all_tests(ctx: &TestContext) {
    println!("\n💳 Running Transaction Tests\n");

    test_authorization_by_id(ctx).await;
    test_settlement_by_id(ctx).await;
    test_missing_and_malformed_ids(ctx).await;

    test_authorization_windows(ctx).await;
    test_authorization_declines(ctx).await;
    test_settlement_windows(ctx).await;

    test_filter_amount_as_displayed(ctx).await;
    test_filter_settlements_and_declines(ctx).await;
    test_filter_no_match(ctx).await;

    println!("\n✅ All transaction tests passed!\n");
}
