//! Merchant tool set.
//!
//! Eight read-only tools over the `/api/merchant/*` routes plus the
//! authorization range query used for decline analysis. Three of them
//! (chargebacks, refund summary, decline analysis) reshape the gateway reply
//! into a compact summary instead of passing it through.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use serde_json::{Value, json};

use crate::error::GatewayError;
use crate::gateway::{GatewayClient, QueryArgs};
use crate::protocol::ToolDefinition;
use crate::tools::{
    Arguments, ToolSet, error_result, list_error_result, merchant_number_schema, non_empty,
    reply_rows,
};

pub const DETAILS_PATH: &str = "/api/merchant/details";
pub const STATS_PATH: &str = "/api/merchant/stats";
pub const FILTER_STATS_PATH: &str = "/api/merchant/filter-stats";
pub const FILTER_DATA_PATH: &str = "/api/merchant/filter-data";
pub const SEARCH_PATH: &str = "/api/merchant/search";
pub const AUTHORIZATION_PATH: &str = "/api/transaction/authorization";

/// Field names accepted by `filter_data`.
pub const FILTER_DATA_FIELDS: &[&str] = &[
    "Merchant_Name",
    "Business_Name",
    "Business_City",
    "Business_State",
    "Business_Contact_Name",
    "Business_Email",
    "Business_Phone",
    "Billing_County",
    "Billing_City",
    "Billing_Name",
    "Merchant_Category_Code",
    "Account_Status",
    "Merchant_Zip_Code",
    "Address_Line1",
    "Address_Line2",
    "Legal_Contact_Name",
    "Legal_Name",
    "First_Post_Date",
    "Last_Post_Date",
    "Installation_Date",
    "Merchant_Website",
    "Terminated_Indicator",
    "Created_At",
    "Updated_At",
];

/// Aggregation bucket of `merchant_stats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatPeriod {
    Day,
    Month,
    Year,
}

impl StatPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatPeriod::Day => "Day",
            StatPeriod::Month => "Month",
            StatPeriod::Year => "Year",
        }
    }
}

const PERIOD_PATTERNS: &[(&str, StatPeriod)] = &[
    (r"^(daily|day|24hours|today)$", StatPeriod::Day),
    (r"^(month|currentmonth|30days)$", StatPeriod::Month),
    (
        r"^(year|12months|12month|1year|annual|twelve)$",
        StatPeriod::Year,
    ),
];

static PERIODS: LazyLock<Vec<(Regex, StatPeriod)>> = LazyLock::new(|| {
    PERIOD_PATTERNS
        .iter()
        .filter_map(|(pattern, period)| Regex::new(pattern).ok().map(|re| (re, *period)))
        .collect()
});

/// Map free-text periods ("12 Months", "today", ...) onto a bucket.
/// Unrecognized input falls back to [`StatPeriod::Day`].
pub fn normalize_stat_date(input: &str) -> StatPeriod {
    let compact: String = input
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    PERIODS
        .iter()
        .find(|(re, _)| re.is_match(&compact))
        .map(|(_, period)| *period)
        .unwrap_or(StatPeriod::Day)
}

/// Tools over merchant profiles and statistics.
#[derive(Debug, Clone, Copy, Default)]
pub struct MerchantTools;

#[async_trait]
impl ToolSet for MerchantTools {
    fn server_name(&self) -> &'static str {
        "fraudlens-merchant"
    }

    fn tools(&self) -> Vec<ToolDefinition> {
        let period = json!({
            "type": "string",
            "enum": ["Day", "Month", "Year"],
            "default": "Day",
            "description": "Time period for stats"
        });
        let free_period = json!({
            "type": "string",
            "default": "Day",
            "description": "Time period for stats (Day, Month, Year, or phrases such as '12 months')"
        });

        vec![
            ToolDefinition::read_only(
                "get_merchant_details",
                "Get the full profile of a merchant: names, addresses, billing and legal \
                 contacts, category code, account status and key lifecycle dates.",
                json!({
                    "type": "object",
                    "properties": {
                        "merchant_number": merchant_number_schema("Unique identifier for the merchant")
                    },
                    "required": ["merchant_number"]
                }),
            ),
            ToolDefinition::read_only(
                "get_merchant_stats",
                "Get the merchant statistics record for a Day, Month or Year bucket: credit and \
                 debit sales, refunds, disputes, reversals, entry methods and authorizations.",
                json!({
                    "type": "object",
                    "properties": {
                        "merchant_number": merchant_number_schema("Merchant number to get statistics for"),
                        "stat_date": period
                    },
                    "required": ["merchant_number"]
                }),
            ),
            ToolDefinition::read_only(
                "filter_merchant_stats",
                "Get only one family of merchant statistics. metric_type is one of sales, \
                 refunds, disputes, reversals, authorizations, entry_method or all.",
                json!({
                    "type": "object",
                    "properties": {
                        "merchant_number": merchant_number_schema("The merchant number to filter stats for"),
                        "stat_date": period,
                        "metric_type": {
                            "type": "string",
                            "default": "all",
                            "description": "Type of metrics to return"
                        }
                    },
                    "required": ["merchant_number"]
                }),
            ),
            ToolDefinition::read_only(
                "search_merchants",
                "Search merchants by partial business name and/or four digit category code, \
                 with pagination.",
                json!({
                    "type": "object",
                    "properties": {
                        "business_name": {
                            "type": ["string", "null"],
                            "minLength": 1,
                            "maxLength": 100,
                            "description": "Business name to search for"
                        },
                        "category_code": {
                            "type": ["string", "null"],
                            "pattern": r"^\d{4}$",
                            "description": "Merchant category code"
                        },
                        "page": {
                            "type": "integer",
                            "minimum": 1,
                            "default": 1,
                            "description": "Page number for pagination"
                        },
                        "page_size": {
                            "type": "integer",
                            "minimum": 1,
                            "maximum": 100,
                            "default": 10,
                            "description": "Number of items per page"
                        }
                    }
                }),
            ),
            ToolDefinition::read_only(
                "filter_data",
                "Get a single profile field of a merchant, e.g. Business_Email or Account_Status.",
                json!({
                    "type": "object",
                    "properties": {
                        "merchant_number": merchant_number_schema("The merchant number to filter data for"),
                        "field": {
                            "type": "string",
                            "enum": FILTER_DATA_FIELDS,
                            "description": "Field name to filter on"
                        }
                    },
                    "required": ["merchant_number", "field"]
                }),
            ),
            ToolDefinition::read_only(
                "get_recent_chargebacks",
                "Get the dispute (chargeback) statistics of a merchant for a period.",
                json!({
                    "type": "object",
                    "properties": {
                        "merchant_number": merchant_number_schema("Merchant number to get chargebacks for"),
                        "stat_date": free_period
                    },
                    "required": ["merchant_number"]
                }),
            ),
            ToolDefinition::read_only(
                "get_refund_summary",
                "Summarize merchant refunds for a period: total count, total volume, average \
                 refund and the credit/debit breakdown.",
                json!({
                    "type": "object",
                    "properties": {
                        "merchant_number": merchant_number_schema("Merchant number to get refund summary for"),
                        "stat_date": free_period
                    },
                    "required": ["merchant_number"]
                }),
            ),
            ToolDefinition::read_only(
                "get_decline_analysis",
                "Count declined authorizations of a merchant by decline reason within a date range.",
                json!({
                    "type": "object",
                    "properties": {
                        "merchant_number": merchant_number_schema("Merchant identification number"),
                        "date_from": {"type": "string", "description": "Start date in YYYY-MM-DD format"},
                        "date_to": {"type": "string", "description": "End date in YYYY-MM-DD format"}
                    },
                    "required": ["merchant_number", "date_from", "date_to"]
                }),
            ),
        ]
    }

    async fn call(&self, gateway: &GatewayClient, name: &str, args: &Arguments) -> Value {
        let merchant_number = args.text_or("merchant_number", "");
        match name {
            "get_merchant_details" => {
                let query = QueryArgs::new().arg("merchant_number", merchant_number);
                item_or_error(
                    gateway.get(DETAILS_PATH, &query).await,
                    format!("Merchant details not found: {}", merchant_number),
                )
            }
            "get_merchant_stats" => {
                let query = QueryArgs::new()
                    .arg("merchant_number", merchant_number)
                    .arg("stat_date", args.text_or("stat_date", "Day"));
                item_or_error(
                    gateway.get(STATS_PATH, &query).await,
                    format!("Merchant stats for {} not found", merchant_number),
                )
            }
            "filter_merchant_stats" => {
                let query = QueryArgs::new()
                    .arg("merchant_number", merchant_number)
                    .arg("stat_date", args.text_or("stat_date", "Day"))
                    .arg("metric_type", args.text_or("metric_type", "all"));
                item_or_error(
                    gateway.get(FILTER_STATS_PATH, &query).await,
                    format!("Merchant stats not found: {}", merchant_number),
                )
            }
            "search_merchants" => {
                let query = QueryArgs::new()
                    .opt("business_name", args.text("business_name"))
                    .opt("category_code", args.text("category_code"))
                    .arg("page", args.int_or("page", 1))
                    .arg("page_size", args.int_or("page_size", 10));
                item_or_error(
                    gateway.get(SEARCH_PATH, &query).await,
                    "Merchant details not found".to_string(),
                )
            }
            "filter_data" => {
                let query = QueryArgs::new()
                    .arg("merchant_number", merchant_number)
                    .arg("field", args.text_or("field", ""));
                match fetch_item(
                    gateway,
                    FILTER_DATA_PATH,
                    &query,
                    format!("Merchant details not found: {}", merchant_number),
                )
                .await
                {
                    Ok(item) => item,
                    Err(err) => list_error_result(&err),
                }
            }
            "get_recent_chargebacks" => {
                let period = normalize_stat_date(args.text_or("stat_date", "Day"));
                match stats_for(gateway, merchant_number, period, "disputes", "Chargeback").await {
                    Ok(item) => json!({ "raw_response": item }),
                    Err(err) => list_error_result(&err),
                }
            }
            "get_refund_summary" => {
                let period = normalize_stat_date(args.text_or("stat_date", "Day"));
                match stats_for(gateway, merchant_number, period, "refunds", "Refund").await {
                    Ok(item) => refund_summary(&item),
                    Err(err) => list_error_result(&err),
                }
            }
            "get_decline_analysis" => {
                let query = QueryArgs::new()
                    .arg("merchant_number", merchant_number)
                    .arg("transaction_type", "authorization")
                    .opt("date_from", args.text("date_from"))
                    .opt("date_to", args.text("date_to"))
                    .arg("approval_status", "Declined");
                let rows = match gateway.get(AUTHORIZATION_PATH, &query).await {
                    Ok(reply) => reply_rows(&reply),
                    Err(err) => return list_error_result(&err),
                };
                if rows.is_empty() {
                    return list_error_result(&GatewayError::not_found(format!(
                        "No decline data found for merchant {}",
                        merchant_number
                    )));
                }
                decline_analysis(&rows)
            }
            other => json!({ "error": format!("Unknown tool: {}", other) }),
        }
    }
}

/// GET and return the non-empty `item`, or a synthesized 404.
async fn fetch_item(
    gateway: &GatewayClient,
    path: &str,
    query: &QueryArgs,
    not_found: String,
) -> Result<Value, GatewayError> {
    let reply = gateway.get(path, query).await?;
    tracing::debug!(%path, reply = %reply, "Gateway reply");
    non_empty(&reply, "item")
        .cloned()
        .ok_or_else(|| GatewayError::not_found(not_found))
}

fn item_or_error(reply: Result<Value, GatewayError>, not_found: String) -> Value {
    match reply.and_then(|reply| {
        non_empty(&reply, "item")
            .cloned()
            .ok_or_else(|| GatewayError::not_found(not_found))
    }) {
        Ok(item) => item,
        Err(err) => error_result(&err),
    }
}

async fn stats_for(
    gateway: &GatewayClient,
    merchant_number: &str,
    period: StatPeriod,
    metric_type: &str,
    label: &str,
) -> Result<Value, GatewayError> {
    tracing::info!(merchant_number, period = period.as_str(), metric_type, "Fetching stats");
    let query = QueryArgs::new()
        .arg("merchant_number", merchant_number)
        .arg("stat_date", period.as_str())
        .arg("metric_type", metric_type);
    fetch_item(
        gateway,
        FILTER_STATS_PATH,
        &query,
        format!("{} stats not found for merchant {}", label, merchant_number),
    )
    .await
}

/// Numeric stat that may arrive as a number or a numeric string.
fn stat_number(stats: &Value, key: &str) -> f64 {
    match stats.get(key) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn stat_count(stats: &Value, key: &str) -> i64 {
    stat_number(stats, key).round() as i64
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Refund totals and the credit/debit breakdown of a refunds stats item.
pub fn refund_summary(stats: &Value) -> Value {
    let credit_count = stat_count(stats, "credit_refunds_count");
    let debit_count = stat_count(stats, "debit_refunds_count");
    let credit_volume = stat_number(stats, "credit_refunds_volume");
    let debit_volume = stat_number(stats, "debit_refunds_volume");

    let total_refunds = credit_count + debit_count;
    let total_volume = round2(credit_volume + debit_volume);
    let average_refund = if total_refunds > 0 {
        round2(total_volume / total_refunds as f64)
    } else {
        0.0
    };

    json!({
        "summary": {
            "total_refunds": total_refunds,
            "total_volume": total_volume,
            "average_refund": average_refund
        },
        "details": {
            "credit": {
                "count": credit_count,
                "volume": round2(credit_volume),
                "percent": stat_number(stats, "credit_refunds_percent")
            },
            "debit": {
                "count": debit_count,
                "volume": round2(debit_volume),
                "percent": stat_number(stats, "debit_refunds_percent")
            }
        }
    })
}

/// Declines grouped by reason, most frequent first, ties by reason.
pub fn decline_analysis(rows: &[Value]) -> Value {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for row in rows {
        let reason = match row.get("decline_reason") {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(Value::Null) | Some(Value::String(_)) | None => "Unknown".to_string(),
            Some(other) => other.to_string(),
        };
        *counts.entry(reason).or_default() += 1;
    }

    let mut grouped: Vec<(String, u64)> = counts.into_iter().collect();
    grouped.sort_by(|a, b| b.1.cmp(&a.1));

    let total: u64 = grouped.iter().map(|(_, c)| c).sum();
    let unique = grouped.len();
    let items: Vec<Value> = grouped
        .into_iter()
        .map(|(reason, count)| json!({ "reason": reason, "count": count }))
        .collect();

    json!({
        "items": items,
        "summary": {
            "total_declines": total,
            "unique_reasons": unique
        }
    })
}
