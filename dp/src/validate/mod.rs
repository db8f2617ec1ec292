//! Response validation
//!
//! Turns raw model text into a typed [`DietPlan`] or [`StoreList`], or a
//! [`CoreError::MalformedResponse`] carrying the raw text. Validation is
//! structural only and all-or-nothing: a single bad day rejects the plan.

mod conform;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

pub use conform::conform;

use crate::domain::{DayPlan, DietPlan, Store, StoreList};
use crate::error::CoreError;
use crate::request::RequestKind;

/// A successfully validated response
#[derive(Debug, Clone, PartialEq)]
pub enum Validated {
    Plan(DietPlan),
    Stores(StoreList),
}

/// Strip a surrounding markdown code fence, if any
///
/// Handles both bare fences and fences with an info string such as
/// ```` ```json ````.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the info string on the opening line
    match body.find('\n') {
        Some(newline) if !body[..newline].trim_start().starts_with(['[', '{']) => body[newline + 1..].trim(),
        _ => body.trim(),
    }
}

fn parse_against<T: DeserializeOwned>(raw: &str, kind: RequestKind) -> Result<T, CoreError> {
    let text = strip_code_fences(raw);
    if text.is_empty() {
        return Err(CoreError::malformed(kind, "response is empty", raw));
    }

    let value: Value =
        serde_json::from_str(text).map_err(|e| CoreError::malformed(kind, format!("invalid JSON: {}", e), raw))?;

    conform(&kind.shape(), &value, "$").map_err(|reason| CoreError::malformed(kind, reason, raw))?;

    serde_json::from_value(value).map_err(|e| CoreError::malformed(kind, e.to_string(), raw))
}

/// Validate a diet-plan response
pub fn validate_plan(raw: &str) -> Result<DietPlan, CoreError> {
    debug!(raw_len = raw.len(), "validate_plan: called");
    let days: Vec<DayPlan> =
        parse_against(raw, RequestKind::DietPlan).inspect_err(|e| warn!(error = %e, "validate_plan: rejected"))?;
    let count = days.len();
    DietPlan::from_days(days).ok_or_else(|| {
        CoreError::malformed(RequestKind::DietPlan, format!("expected 7 days, got {}", count), raw)
    })
}

/// Validate a store-lookup response
pub fn validate_stores(raw: &str) -> Result<StoreList, CoreError> {
    debug!(raw_len = raw.len(), "validate_stores: called");
    let stores: Vec<Store> =
        parse_against(raw, RequestKind::StoreLookup).inspect_err(|e| warn!(error = %e, "validate_stores: rejected"))?;
    let count = stores.len();
    StoreList::from_stores(stores).ok_or_else(|| {
        CoreError::malformed(RequestKind::StoreLookup, format!("expected 3 to 5 stores, got {}", count), raw)
    })
}

/// Validate a response of either kind
pub fn validate(raw: &str, kind: RequestKind) -> Result<Validated, CoreError> {
    match kind {
        RequestKind::DietPlan => validate_plan(raw).map(Validated::Plan),
        RequestKind::StoreLookup => validate_stores(raw).map(Validated::Stores),
    }
}
