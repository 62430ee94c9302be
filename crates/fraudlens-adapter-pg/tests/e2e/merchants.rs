//! Merchant resources against live tables.
//!
//! - details and stats lookups by key
//! - metric projection over the live `merchant_stats` columns
//! - single-field lookups, including NUMERIC and DATE fields
//! - search filters and pagination

use super::common::*;
use fraudlens_query::{Pagination, QueryOutcome, ResourcePath};
use serde_json::{Value, json};

// =============================================================================
// DETAILS AND STATS
// =============================================================================

pub async fn test_details_by_merchant_number(ctx: &TestContext) {
    println!("  🧪 test_details_by_merchant_number");

    let outcome = ctx
        .ok(ResourcePath::MerchantDetails, &[("merchant_number", "MRCH1")])
        .await;
    let item = outcome.item().expect("details is a single item");

    assert_eq!(item["business_name"], json!("Corner Cafe"));
    assert_eq!(item["merchant_category_code"], json!("5812"));
    assert_eq!(item["signature_amount"], json!("1500.00"));
    assert_eq!(item["first_post_date"], json!("2020-05-01"));
}

pub async fn test_details_unknown_merchant(ctx: &TestContext) {
    println!("  🧪 test_details_unknown_merchant");

    let err = ctx
        .route(ResourcePath::MerchantDetails, &[("merchant_number", "MRCH404")])
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 404);
}

pub async fn test_stats_latest_row_wins(ctx: &TestContext) {
    println!("  🧪 test_stats_latest_row_wins");

    let outcome = ctx
        .ok(
            ResourcePath::MerchantStats,
            &[("merchant_number", "MRCH1"), ("stat_date", "Day")],
        )
        .await;
    let item = outcome.item().expect("stats is a single item");

    // The row with a NULL updated_at sorts last.
    assert_eq!(item["id"], json!(2));
    assert_eq!(item["credit_sales_count"], json!(42));
    assert_eq!(item["credit_sales_volume"], json!("2100.00"));
    assert_eq!(item["updated_at"], json!("2024-03-02T08:00:00"));
    assert_eq!(item["credit_sales_average_ticket"], Value::Null);
}

pub async fn test_stats_unknown_period(ctx: &TestContext) {
    println!("  🧪 test_stats_unknown_period");

    let err = ctx
        .route(
            ResourcePath::MerchantStats,
            &[("merchant_number", "MRCH1"), ("stat_date", "Week")],
        )
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 404);
}

// =============================================================================
// METRIC PROJECTION
// =============================================================================

fn sorted_keys(outcome: &QueryOutcome) -> Vec<String> {
    let mut keys: Vec<String> = outcome
        .item()
        .expect("single item")
        .keys()
        .cloned()
        .collect();
    keys.sort();
    keys
}

pub async fn test_filter_stats_refunds(ctx: &TestContext) {
    println!("  🧪 test_filter_stats_refunds");

    let outcome = ctx
        .ok(
            ResourcePath::FilterMerchantStats,
            &[("merchant_number", "MRCH1"), ("metric_type", "refunds")],
        )
        .await;

    // credit_refunds_legacy exists in the table but is not whitelisted.
    assert_eq!(
        sorted_keys(&outcome),
        vec![
            "bucket_date",
            "credit_refunds_average_ticket",
            "credit_refunds_count",
            "credit_refunds_percent",
            "credit_refunds_volume",
            "debit_refunds_average_ticket",
            "debit_refunds_count",
            "debit_refunds_volume",
            "merchant_number",
        ]
    );
    let item = outcome.item().expect("single item");
    assert_eq!(item["bucket_date"], json!("Day"));
    assert_eq!(item["credit_refunds_volume"], json!("25.00"));
    assert_eq!(item["debit_refunds_volume"], json!("7.25"));
}

pub async fn test_filter_stats_period_and_all(ctx: &TestContext) {
    println!("  🧪 test_filter_stats_period_and_all");

    let outcome = ctx
        .ok(
            ResourcePath::FilterMerchantStats,
            &[
                ("merchant_number", "MRCH1"),
                ("stat_date", "Month"),
                ("metric_type", "ALL"),
            ],
        )
        .await;
    let item = outcome.item().expect("single item");
    assert_eq!(item["credit_sales_count"], json!(900));
    assert_eq!(item["credit_reversals_volume"], json!("80.00"));
    assert!(item.get("id").is_none());
    assert!(item.get("credit_refunds_legacy").is_none());
}

pub async fn test_filter_stats_invalid_metric(ctx: &TestContext) {
    println!("  🧪 test_filter_stats_invalid_metric");

    let err = ctx
        .route(
            ResourcePath::FilterMerchantStats,
            &[("merchant_number", "MRCH1"), ("metric_type", "chargebacks")],
        )
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 400);
}

// =============================================================================
// SINGLE FIELD
// =============================================================================

pub async fn test_filter_field_values(ctx: &TestContext) {
    println!("  🧪 test_filter_field_values");

    let city = ctx
        .ok(
            ResourcePath::FilterMerchantField,
            &[("merchant_number", "MRCH1"), ("field", "City")],
        )
        .await;
    assert_eq!(city.to_body(), json!({"item": {"city": "Austin"}}));

    let amount = ctx
        .ok(
            ResourcePath::FilterMerchantField,
            &[("merchant_number", "MRCH2"), ("field", "signature_amount")],
        )
        .await;
    assert_eq!(amount.to_body(), json!({"item": {"signature_amount": "250.50"}}));

    let posted = ctx
        .ok(
            ResourcePath::FilterMerchantField,
            &[
                ("merchant_number", "MRCH1"),
                ("filter", "{'field': 'first_post_date'}"),
            ],
        )
        .await;
    assert_eq!(
        posted.to_body(),
        json!({"item": {"first_post_date": "2020-05-01"}})
    );

    let missing = ctx
        .ok(
            ResourcePath::FilterMerchantField,
            &[("merchant_number", "MRCH3"), ("field", "signature_amount")],
        )
        .await;
    assert_eq!(missing.to_body(), json!({"item": {"signature_amount": null}}));
}

pub async fn test_filter_field_not_whitelisted(ctx: &TestContext) {
    println!("  🧪 test_filter_field_not_whitelisted");

    let err = ctx
        .route(
            ResourcePath::FilterMerchantField,
            &[("merchant_number", "MRCH1"), ("field", "merchant_id_status")],
        )
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 400);
}

// =============================================================================
// SEARCH
// =============================================================================

fn merchant_numbers(outcome: &QueryOutcome) -> Vec<Value> {
    column(outcome, "merchant_number")
}

fn pagination(outcome: &QueryOutcome) -> Pagination {
    match outcome {
        QueryOutcome::Page { pagination, .. } => *pagination,
        other => panic!("expected a page, got {:?}", other),
    }
}

pub async fn test_search_by_name(ctx: &TestContext) {
    println!("  🧪 test_search_by_name");

    let outcome = ctx
        .ok(ResourcePath::SearchMerchants, &[("business_name", "CAFE")])
        .await;
    assert_eq!(merchant_numbers(&outcome), vec![json!("MRCH1"), json!("MRCH2")]);
    assert_eq!(pagination(&outcome), Pagination::new(2, 1, 10));
}

pub async fn test_search_pages(ctx: &TestContext) {
    println!("  🧪 test_search_pages");

    let outcome = ctx
        .ok(
            ResourcePath::SearchMerchants,
            &[("category_code", "5812"), ("page", "2"), ("page_size", "1")],
        )
        .await;
    assert_eq!(merchant_numbers(&outcome), vec![json!("MRCH2")]);
    assert_eq!(pagination(&outcome), Pagination::new(2, 2, 1));
    assert_eq!(pagination(&outcome).pages, 2);
}

pub async fn test_search_by_status_and_unfiltered(ctx: &TestContext) {
    println!("  🧪 test_search_by_status_and_unfiltered");

    let closed = ctx
        .ok(ResourcePath::SearchMerchants, &[("status", "Closed")])
        .await;
    assert_eq!(merchant_numbers(&closed), vec![json!("MRCH3")]);

    let all = ctx.ok(ResourcePath::SearchMerchants, &[]).await;
    assert_eq!(
        merchant_numbers(&all),
        vec![json!("MRCH1"), json!("MRCH2"), json!("MRCH3")]
    );
    assert_eq!(pagination(&all).total, 3);
}

pub async fn run_all_tests(ctx: &TestContext) {
    println!("\n🏪 Running Merchant Tests\n");

    test_details_by_merchant_number(ctx).await;
    test_details_unknown_merchant(ctx).await;
    test_stats_latest_row_wins(ctx).await;
    test_stats_unknown_period(ctx).await;

    test_filter_stats_refunds(ctx).await;
    test_filter_stats_period_and_all(ctx).await;
    test_filter_stats_invalid_metric(ctx).await;

    test_filter_field_values(ctx).await;
    test_filter_field_not_whitelisted(ctx).await;

    test_search_by_name(ctx).await;
    test_search_pages(ctx).await;
    test_search_by_status_and_unfiltered(ctx).await;

    println!("\n✅ All merchant tests passed!\n");
}
