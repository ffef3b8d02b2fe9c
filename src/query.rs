//! Filter expressions for document lookups and the optional-filter structs of each list endpoint.

use serde::Deserialize;
use serde_json::Value;

/// Default number of readings returned when `limit` is not given.
pub const DEFAULT_READING_LIMIT: u32 = 50;

/// How a single field is matched.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldMatch {
    /// Field equals the value exactly (JSON equality).
    Exact(Value),
    /// Field is a string containing the needle, ignoring case. The needle is literal text.
    ContainsIgnoreCase(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Condition {
    pub field: String,
    pub matcher: FieldMatch,
}

/// Conjunction of field conditions. An empty filter matches every document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exact(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition {
            field: field.into(),
            matcher: FieldMatch::Exact(value.into()),
        });
        self
    }

    pub fn contains_ignore_case(mut self, field: impl Into<String>, needle: impl Into<String>) -> Self {
        self.conditions.push(Condition {
            field: field.into(),
            matcher: FieldMatch::ContainsIgnoreCase(needle.into()),
        });
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

/// Treats empty query values as absent.
fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().filter(|s| !s.is_empty())
}

/// Query string of `GET /api/customers`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CustomerQuery {
    /// Case-insensitive substring of `name`.
    pub q: Option<String>,
    /// Exact `meter_number`.
    pub meter: Option<String>,
}

impl CustomerQuery {
    pub fn to_filter(&self) -> Filter {
        let mut filter = Filter::new();
        if let Some(q) = non_empty(&self.q) {
            filter = filter.contains_ignore_case("name", q);
        }
        if let Some(meter) = non_empty(&self.meter) {
            filter = filter.exact("meter_number", meter);
        }
        filter
    }
}

/// Query string of `GET /api/readings`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ReadingQuery {
    /// Matched as-is against the `customer_id` string stored at creation, which
    /// is kept exactly as the client sent it. Not checked for id format.
    pub customer_id: Option<String>,
    pub limit: Option<u32>,
}

impl ReadingQuery {
    pub fn to_filter(&self) -> Filter {
        let mut filter = Filter::new();
        if let Some(customer_id) = non_empty(&self.customer_id) {
            filter = filter.exact("customer_id", customer_id);
        }
        filter
    }

    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_READING_LIMIT)
    }
}

/// Filter for the QR lookup endpoint.
pub fn qr_filter(qr: &str) -> Filter {
    Filter::new().exact("qrcode_value", qr)
}
