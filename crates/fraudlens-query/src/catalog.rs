//! Code-owned identifier whitelists.
//!
//! Every table or column name that appears in generated SQL text is one of the
//! constants below. Caller input is only ever compared against these lists and
//! then replaced by the matching constant.

pub const MERCHANT_DETAILS_TABLE: &str = "merchant_details";
pub const MERCHANT_STATS_TABLE: &str = "merchant_stats";

/// Columns of `merchant_details` a caller may ask for by name.
pub const MERCHANT_FIELDS: &[&str] = &[
    "merchant_number",
    "merchant_name",
    "address_line1",
    "address_line2",
    "county",
    "city",
    "state",
    "billing_address_line1",
    "billing_address_line2",
    "billing_city",
    "billing_county",
    "billing_name",
    "billing_phone",
    "billing_state",
    "billing_zip_code",
    "business_contact_name",
    "business_email",
    "business_phone",
    "business_name",
    "business_zip_code",
    "business_address_line1",
    "business_address_line2",
    "business_city",
    "business_state",
    "legal_contact_name",
    "legal_phone_line1",
    "legal_name",
    "country_code",
    "merchant_category_code",
    "merchant_category_description",
    "merchant_website",
    "merchant_phone",
    "merchant_zip_code",
    "standard_industrial_classification",
    "sic_code",
    "account_status",
    "signature_amount",
    "signature_volume",
    "terminated_indicator",
    "first_post_date",
    "installation_date",
    "last_cancel_date",
    "last_post_date",
    "last_status_date",
    "last_settlement_date",
    "business_address_change_date",
    "business_phone_change_date",
    "business_email_change_date",
];

/// Key columns always projected first from `merchant_stats`.
pub const MERCHANT_STATS_KEY_COLUMNS: &[&str] = &["merchant_number", "bucket_date"];

/// Projectable `merchant_stats` columns, key columns first.
pub const MERCHANT_STATS_COLUMNS: &[&str] = &[
    "merchant_number",
    "bucket_date",
    "credit_sales_count",
    "credit_sales_volume",
    "credit_sales_average_ticket",
    "credit_refunds_count",
    "credit_refunds_volume",
    "credit_refunds_average_ticket",
    "credit_refunds_percent",
    "credit_disputes_count",
    "credit_disputes_volume",
    "credit_disputes_average_ticket",
    "credit_disputes_percent",
    "credit_reversals_count",
    "credit_reversals_volume",
    "credit_reversals_percent",
    "entry_method_keyed_percent",
    "entry_method_ecomm_percent",
    "entry_method_chipped_percent",
    "entry_method_swiped_percent",
    "authorizations_count",
    "authorizations_volume",
    "authorizations_declines_count",
    "authorizations_declines_volume",
    "authorizations_declines_percent",
    "debit_sales_count",
    "debit_sales_volume",
    "debit_sales_average_ticket",
    "debit_refunds_count",
    "debit_refunds_volume",
    "debit_refunds_average_ticket",
    "debit_disputes_count",
    "debit_disputes_volume",
    "debit_disputes_percent",
    "created_at",
    "updated_at",
];

/// Metric type to column prefixes, in projection order.
pub const METRIC_PREFIXES: &[(&str, &[&str])] = &[
    ("sales", &["credit_sales_", "debit_sales_"]),
    ("refunds", &["credit_refunds_", "debit_refunds_"]),
    ("disputes", &["credit_disputes_", "debit_disputes_"]),
    ("reversals", &["credit_reversals_"]),
    ("authorizations", &["authorizations_"]),
    ("entry_method", &["entry_method_"]),
];

/// Sentinel selecting every whitelisted stats column.
pub const ALL_METRICS: &str = "all";

pub const AUTHORIZATION_FILTER_FIELDS: &[&str] = &[
    "merchant_number",
    "account_number",
    "amount",
    "currency",
    "transaction_type",
    "payment_method",
    "card_expiry_date",
    "auth_code",
    "transaction_datetime",
    "approval_status",
    "decline_reason",
];

pub const SETTLEMENT_FILTER_FIELDS: &[&str] = &[
    "merchant_number",
    "account_number",
    "same_card",
    "transaction_date",
    "processed_amount",
    "auth_amount",
    "tran_id",
    "transaction_type",
    "transaction_status",
    "card_issue_type",
    "transaction_mode",
    "payment_method",
    "auth_code",
    "auth_date",
    "card_class",
];

/// Names of the metric types, in map order.
pub fn metric_types() -> Vec<&'static str> {
    METRIC_PREFIXES.iter().map(|(name, _)| *name).collect()
}

/// Prefixes for an exact metric type name.
pub fn metric_prefixes(metric_type: &str) -> Option<&'static [&'static str]> {
    METRIC_PREFIXES
        .iter()
        .find(|(name, _)| *name == metric_type)
        .map(|(_, prefixes)| *prefixes)
}

/// Canonical spelling of a merchant field, matched case-insensitively.
pub fn merchant_field(name: &str) -> Option<&'static str> {
    MERCHANT_FIELDS
        .iter()
        .copied()
        .find(|field| field.eq_ignore_ascii_case(name))
}

/// Whitelisted spelling of a live `merchant_stats` column.
pub fn stats_column(name: &str) -> Option<&'static str> {
    MERCHANT_STATS_COLUMNS.iter().copied().find(|c| *c == name)
}

/// One of the two transaction tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionTable {
    Authorizations,
    Settlements,
}

impl TransactionTable {
    pub const NAMES: [&'static str; 2] = ["authorizations", "settlements"];

    /// Exact, case-sensitive table lookup.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "authorizations" => Some(TransactionTable::Authorizations),
            "settlements" => Some(TransactionTable::Settlements),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TransactionTable::Authorizations => "authorizations",
            TransactionTable::Settlements => "settlements",
        }
    }

    /// Column transactions are ordered and windowed by.
    pub fn date_column(&self) -> &'static str {
        match self {
            TransactionTable::Authorizations => "transaction_datetime",
            TransactionTable::Settlements => "transaction_date",
        }
    }

    /// Cast applied to date-window parameters.
    pub fn date_cast(&self) -> &'static str {
        match self {
            TransactionTable::Authorizations => "timestamp",
            TransactionTable::Settlements => "date",
        }
    }

    /// Parameters accepted as the row id, in precedence order.
    pub fn id_params(&self) -> &'static [&'static str] {
        match self {
            TransactionTable::Authorizations => &["auth_transaction_id", "transaction_id"],
            TransactionTable::Settlements => &["settlement_transaction_id", "transaction_id"],
        }
    }

    pub fn filter_fields(&self) -> &'static [&'static str] {
        match self {
            TransactionTable::Authorizations => AUTHORIZATION_FILTER_FIELDS,
            TransactionTable::Settlements => SETTLEMENT_FILTER_FIELDS,
        }
    }

    /// Canonical spelling of a filter field, matched exactly.
    pub fn filter_field(&self, name: &str) -> Option<&'static str> {
        self.filter_fields().iter().copied().find(|f| *f == name)
    }

    /// Whether the range query accepts an `approval_status` filter.
    pub fn has_approval_status(&self) -> bool {
        matches!(self, TransactionTable::Authorizations)
    }
}
