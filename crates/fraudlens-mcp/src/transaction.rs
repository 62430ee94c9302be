//! Transaction tool set over `/api/transaction/*`.

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::error::GatewayError;
use crate::gateway::{GatewayClient, QueryArgs};
use crate::protocol::ToolDefinition;
use crate::tools::{
    Arguments, ToolSet, error_result, list_error_result, merchant_number_schema, non_empty,
    reply_rows,
};

pub const AUTHORIZATION_PATH: &str = "/api/transaction/authorization";
pub const SETTLEMENT_PATH: &str = "/api/transaction/settlement";
pub const FILTER_PATH: &str = "/api/transaction/filter";

/// Field names offered by `filter_transactions`. The query service still
/// checks each against the chosen table.
pub const FILTER_FIELDS: &[&str] = &[
    "transaction_type",
    "payment_method",
    "approval_status",
    "transaction_status",
    "card_issue_type",
    "transaction_mode",
    "card_country",
    "card_class",
    "amount",
    "currency",
    "auth_code",
    "transaction_datetime",
    "decline_reason",
];

/// Which transaction route a call targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Authorization,
    Settlement,
}

impl TransactionKind {
    /// Parse the `transaction_type` argument; anything but `settlement`
    /// means authorization.
    pub fn from_arg(value: &str) -> Self {
        if value == "settlement" {
            TransactionKind::Settlement
        } else {
            TransactionKind::Authorization
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Authorization => "authorization",
            TransactionKind::Settlement => "settlement",
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            TransactionKind::Authorization => AUTHORIZATION_PATH,
            TransactionKind::Settlement => SETTLEMENT_PATH,
        }
    }

    /// Column the recency sort uses.
    pub fn date_field(&self) -> &'static str {
        match self {
            TransactionKind::Authorization => "transaction_datetime",
            TransactionKind::Settlement => "transaction_date",
        }
    }
}

/// Tools over authorizations and settlements.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionTools;

#[async_trait]
impl ToolSet for TransactionTools {
    fn server_name(&self) -> &'static str {
        "fraudlens-transaction"
    }

    fn tools(&self) -> Vec<ToolDefinition> {
        let transaction_type = json!({
            "type": "string",
            "enum": ["authorization", "settlement"],
            "default": "authorization",
            "description": "Type of transaction to retrieve either authorization or settlement"
        });

        vec![
            ToolDefinition::read_only(
                "get_authorization_transaction_by_id",
                "Get one authorization transaction by its id: amount, currency, card, auth code, \
                 approval status and decline reason.",
                json!({
                    "type": "object",
                    "properties": {
                        "auth_transaction_id": {
                            "type": ["string", "integer"],
                            "description": "Unique identifier for the authorization transaction"
                        }
                    },
                    "required": ["auth_transaction_id"]
                }),
            ),
            ToolDefinition::read_only(
                "get_settlement_transaction_by_id",
                "Get one settlement transaction by its id: processed and authorized amounts, \
                 status, card class and mode.",
                json!({
                    "type": "object",
                    "properties": {
                        "settlement_transaction_id": {
                            "type": ["string", "integer"],
                            "description": "Unique identifier for the settlement transaction"
                        }
                    },
                    "required": ["settlement_transaction_id"]
                }),
            ),
            ToolDefinition::read_only(
                "get_transactions_by_merchant",
                "List a merchant's authorizations or settlements, newest first, optionally \
                 within a date range.",
                json!({
                    "type": "object",
                    "properties": {
                        "merchant_number": merchant_number_schema("Merchant identification number"),
                        "transaction_type": transaction_type,
                        "date_from": {"type": ["string", "null"], "description": "Start date in YYYY-MM-DD format"},
                        "date_to": {"type": ["string", "null"], "description": "End date in YYYY-MM-DD format"}
                    },
                    "required": ["merchant_number"]
                }),
            ),
            ToolDefinition::read_only(
                "get_recent_transactions",
                "Get the most recent transactions of a merchant.",
                json!({
                    "type": "object",
                    "properties": {
                        "merchant_number": merchant_number_schema("Merchant identification number"),
                        "transaction_type": transaction_type,
                        "limit": {
                            "type": "integer",
                            "minimum": 1,
                            "maximum": 100,
                            "default": 5,
                            "description": "Number of transactions to retrieve"
                        }
                    },
                    "required": ["merchant_number"]
                }),
            ),
            ToolDefinition::read_only(
                "filter_transactions",
                "Find transactions whose field equals a value, e.g. decline_reason or \
                 payment_method. Returns at most 100 rows, newest first.",
                json!({
                    "type": "object",
                    "properties": {
                        "field": {
                            "type": "string",
                            "enum": FILTER_FIELDS,
                            "description": "Field name to filter on"
                        },
                        "value": {
                            "type": "string",
                            "minLength": 1,
                            "maxLength": 100,
                            "description": "Value to filter by"
                        },
                        "table": {
                            "type": ["string", "null"],
                            "enum": ["authorizations", "settlements", null],
                            "description": "Table to search (default authorizations)"
                        }
                    },
                    "required": ["field", "value"]
                }),
            ),
        ]
    }

    async fn call(&self, gateway: &GatewayClient, name: &str, args: &Arguments) -> Value {
        match name {
            "get_authorization_transaction_by_id" => {
                by_id(gateway, TransactionKind::Authorization, "auth_transaction_id", args).await
            }
            "get_settlement_transaction_by_id" => {
                by_id(
                    gateway,
                    TransactionKind::Settlement,
                    "settlement_transaction_id",
                    args,
                )
                .await
            }
            "get_transactions_by_merchant" => {
                let merchant_number = args.text_or("merchant_number", "");
                let kind = TransactionKind::from_arg(args.text_or("transaction_type", "authorization"));
                let query = QueryArgs::new()
                    .arg("merchant_number", merchant_number)
                    .opt("date_from", args.text("date_from"))
                    .opt("date_to", args.text("date_to"));
                let rows = match gateway.get(kind.path(), &query).await {
                    Ok(reply) => reply_rows(&reply),
                    Err(err) => return error_result(&err),
                };
                if rows.is_empty() {
                    return error_result(&GatewayError::not_found(format!(
                        "Transaction for {} not found",
                        merchant_number
                    )));
                }
                Value::Array(rows)
            }
            "get_recent_transactions" => {
                let merchant_number = args.text_or("merchant_number", "");
                let kind = TransactionKind::from_arg(args.text_or("transaction_type", "authorization"));
                let limit = args.int_or("limit", 5);
                let query = QueryArgs::new()
                    .arg("merchant_number", merchant_number)
                    .arg("transaction_type", kind.as_str())
                    .arg("limit", limit);
                let rows = match gateway.get(kind.path(), &query).await {
                    Ok(reply) => reply_rows(&reply),
                    Err(err) => return list_error_result(&err),
                };
                if rows.is_empty() {
                    return list_error_result(&GatewayError::not_found(format!(
                        "No transactions found for merchant {}",
                        merchant_number
                    )));
                }
                recent(rows, kind, usize::try_from(limit).unwrap_or(5))
            }
            "filter_transactions" => {
                let query = QueryArgs::new()
                    .opt("table", args.text("table"))
                    .arg("field", args.text_or("field", ""))
                    .arg("value", args.text_or("value", ""));
                match gateway.get(FILTER_PATH, &query).await {
                    Ok(reply) => match non_empty(&reply, "items") {
                        Some(items) => json!({
                            "items": items,
                            "count": reply.get("count").cloned().unwrap_or(Value::Null)
                        }),
                        None => list_error_result(&GatewayError::not_found(
                            "Filter transactions not found",
                        )),
                    },
                    Err(err) => list_error_result(&err),
                }
            }
            other => json!({ "error": format!("Unknown tool: {}", other) }),
        }
    }
}

async fn by_id(
    gateway: &GatewayClient,
    kind: TransactionKind,
    id_arg: &'static str,
    args: &Arguments,
) -> Value {
    let id = args.id_text(id_arg).unwrap_or_default();
    tracing::info!(kind = kind.as_str(), %id, "Transaction lookup");
    let query = QueryArgs::new().arg(id_arg, &id);
    let reply = gateway.get(kind.path(), &query).await.and_then(|reply| {
        non_empty(&reply, "item")
            .cloned()
            .ok_or_else(|| GatewayError::not_found(format!("Transaction {} not found", id)))
    });
    match reply {
        Ok(item) => item,
        Err(err) => error_result(&err),
    }
}

/// Newest `limit` rows by the kind's date column, plus how many came back.
pub fn recent(mut rows: Vec<Value>, kind: TransactionKind, limit: usize) -> Value {
    let total_available = rows.len();
    let field = kind.date_field();
    // ISO-8601 strings sort chronologically; rows without a date go last.
    rows.sort_by(|a, b| {
        let a = a.get(field).and_then(Value::as_str).unwrap_or("");
        let b = b.get(field).and_then(Value::as_str).unwrap_or("");
        b.cmp(a)
    });
    rows.truncate(limit);

    json!({
        "summary": {
            "total_returned": rows.len(),
            "total_available": total_available
        },
        "items": rows
    })
}
