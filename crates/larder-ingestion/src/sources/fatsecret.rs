//! Nutrition API client.
//!
//! Two-step lookup: `foods.search` for the name, then `food.get.v2` on the
//! first hit. The API reports failures in-band as an `error` object; the
//! quota rejection (code 12) is the only retryable class and goes through
//! a bounded exponential backoff. Everything else — no hit, no servings,
//! an unrelated API error — collapses to "not found" for the caller.

use std::future::Future;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, instrument, warn};

use larder_common::sandbox::SandboxClient;
use larder_common::{LarderError, Result};

use crate::models::{NutrientMeasurement, NutritionInfo};

const DEFAULT_BASE_URL: &str = "https://platform.fatsecret.com/rest/server.api";

/// In-band API error code for a rate-limit rejection.
const QUOTA_ERROR_CODE: i64 = 12;

/// Nutrient keys worth keeping, with the unit the API reports them in.
/// Keys outside this list are dropped silently.
const NUTRIENT_UNITS: &[(&str, &str)] = &[
    ("calories", "kcal"),
    ("protein", "g"),
    ("carbohydrate", "g"),
    ("fat", "g"),
    ("fiber", "g"),
    ("sugar", "g"),
    ("sodium", "mg"),
    ("potassium", "mg"),
    ("cholesterol", "mg"),
    ("iron", "mg"),
    ("calcium", "mg"),
    ("vitamin_a", "mcg"),
    ("vitamin_c", "mg"),
    ("saturated_fat", "g"),
    ("polyunsaturated_fat", "g"),
    ("monounsaturated_fat", "g"),
];

/// Bounded retry policy for quota rejections.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Extra attempts after the first, before the quota error is terminal.
    pub max_retries: u32,
    /// Delay before the first retry; doubles per attempt.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(5),
        }
    }
}

pub struct FatSecretClient {
    client: SandboxClient,
    access_token: String,
    base_url: String,
    retry: RetryPolicy,
}

impl FatSecretClient {
    pub fn new(client: SandboxClient, access_token: impl Into<String>) -> Self {
        Self {
            client,
            access_token: access_token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            retry: RetryPolicy::default(),
        }
    }

    /// Point the client at a different endpoint (tests, proxies).
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Look up the canonical nutrient set for an English food name.
    /// `Ok(None)` covers every "no data" outcome: no search hit, no
    /// servings, nothing on the allow-list. Only transport failures and a
    /// terminal quota rejection surface as errors.
    #[instrument(skip(self))]
    pub async fn lookup(&self, food_name: &str) -> Result<Option<NutritionInfo>> {
        let Some(food_id) = self.search_first_id(food_name).await? else {
            debug!(food = food_name, "no search hit");
            return Ok(None);
        };
        let details = self.food_details(&food_id).await?;
        Ok(extract_nutrition(&details))
    }

    /// `foods.search`, keeping only the first hit's id. Singleton results
    /// arrive as a bare object, result lists as an array.
    async fn search_first_id(&self, food_name: &str) -> Result<Option<String>> {
        let params = [
            ("method", "foods.search"),
            ("search_expression", food_name),
            ("format", "json"),
        ];
        let resp = with_quota_retry(&self.retry, || self.call(&params)).await?;

        let first = match resp.pointer("/foods/food") {
            Some(Value::Array(items)) => items.first().cloned(),
            Some(single @ Value::Object(_)) => Some(single.clone()),
            _ => None,
        };
        Ok(first.and_then(|f| id_string(f.get("food_id"))))
    }

    async fn food_details(&self, food_id: &str) -> Result<Value> {
        let params = [
            ("method", "food.get.v2"),
            ("food_id", food_id),
            ("format", "json"),
        ];
        with_quota_retry(&self.retry, || self.call(&params)).await
    }

    /// One API round-trip. An in-band quota error becomes
    /// [`LarderError::Quota`]; any other in-band error degrades to a null
    /// payload so the caller lands on "not found".
    async fn call(&self, params: &[(&str, &str)]) -> Result<Value> {
        let resp = self
            .client
            .get(&self.base_url)?
            .bearer_auth(&self.access_token)
            .query(params)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(LarderError::Http {
                status: resp.status().as_u16(),
                url: self.base_url.clone(),
            });
        }

        let value: Value = resp.json().await?;
        match classify_error(&value) {
            Some(ApiFailure::Quota(message)) => Err(LarderError::Quota(message)),
            Some(ApiFailure::Other { code, message }) => {
                debug!(code, message = %message, "nutrition API error, treating as not found");
                Ok(Value::Null)
            }
            None => Ok(value),
        }
    }
}

/// In-band API failure, split by retryability.
#[derive(Debug)]
enum ApiFailure {
    Quota(String),
    Other { code: i64, message: String },
}

fn classify_error(value: &Value) -> Option<ApiFailure> {
    let err = value.get("error")?;
    let code = err.get("code").and_then(Value::as_i64).unwrap_or_default();
    let message = err
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("unknown API error")
        .to_string();

    if code == QUOTA_ERROR_CODE {
        Some(ApiFailure::Quota(message))
    } else {
        Some(ApiFailure::Other { code, message })
    }
}

/// Run `op`, retrying only quota rejections: up to `max_retries` extra
/// attempts with exponential backoff starting at `base_delay`. Once the
/// cap is reached the quota error surfaces to the caller; every other
/// outcome passes straight through.
pub async fn with_quota_retry<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut delay = policy.base_delay;
    let mut attempt = 0;
    loop {
        match op().await {
            Err(e) if e.is_quota() && attempt < policy.max_retries => {
                attempt += 1;
                warn!(
                    attempt,
                    max_retries = policy.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    "quota exhausted, backing off"
                );
                tokio::time::sleep(delay).await;
                delay *= 2;
            }
            other => return other,
        }
    }
}

/// Extract the canonical nutrient set from a `food.get.v2` payload: first
/// serving only, allow-listed keys only. Returns `None` when nothing
/// usable remains.
pub fn extract_nutrition(details: &Value) -> Option<NutritionInfo> {
    let servings = details.pointer("/food/servings/serving")?;
    let first = match servings {
        Value::Array(items) => items.first()?,
        single @ Value::Object(_) => single,
        _ => return None,
    };

    let mut nutrients = Vec::new();
    for (key, unit) in NUTRIENT_UNITS {
        let Some(raw) = first.get(*key) else { continue };
        let Some(value) = number(raw) else { continue };
        let (value, unit) = convert_to_grams(value, unit);
        nutrients.push(NutrientMeasurement {
            name: (*key).to_string(),
            value,
            unit: unit.to_string(),
        });
    }

    if nutrients.is_empty() {
        return None;
    }

    Some(NutritionInfo {
        portion_description: string_field(first, "measurement_description"),
        portion_amount: string_field(first, "metric_serving_amount"),
        portion_unit: string_field(first, "metric_serving_unit"),
        nutrients,
    })
}

/// Milligram and microgram values collapse to grams; other units pass
/// through. Values round to 3 decimals.
fn convert_to_grams(value: f64, unit: &str) -> (f64, &str) {
    let (value, unit) = match unit {
        "mg" => (value * 0.001, "g"),
        "mcg" => (value * 0.000_001, "g"),
        other => (value, other),
    };
    (round3(value), unit)
}

fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

/// The API reports numbers as strings; accept both.
fn number(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn string_field(obj: &Value, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(String::from)
}

fn id_string(v: Option<&Value>) -> Option<String> {
    match v? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;

    fn details_with_serving(serving: Value) -> Value {
        json!({ "food": { "servings": { "serving": [serving] } } })
    }

    #[test]
    fn test_mg_value_converted_to_grams() {
        let details = details_with_serving(json!({ "sodium": "500" }));
        let info = extract_nutrition(&details).unwrap();
        assert_eq!(info.nutrients.len(), 1);
        assert_eq!(info.nutrients[0].name, "sodium");
        assert_eq!(info.nutrients[0].value, 0.5);
        assert_eq!(info.nutrients[0].unit, "g");
    }

    #[test]
    fn test_mcg_value_converted_to_grams() {
        let details = details_with_serving(json!({ "vitamin_a": "500000" }));
        let info = extract_nutrition(&details).unwrap();
        assert_eq!(info.nutrients[0].value, 0.5);
        assert_eq!(info.nutrients[0].unit, "g");
    }

    #[test]
    fn test_gram_units_pass_through() {
        let details = details_with_serving(json!({ "protein": "12.345678", "calories": "52" }));
        let info = extract_nutrition(&details).unwrap();
        let protein = info.nutrients.iter().find(|n| n.name == "protein").unwrap();
        assert_eq!(protein.value, 12.346); // rounded, unit untouched
        assert_eq!(protein.unit, "g");
        let calories = info.nutrients.iter().find(|n| n.name == "calories").unwrap();
        assert_eq!(calories.unit, "kcal");
    }

    #[test]
    fn test_unlisted_keys_dropped() {
        let details = details_with_serving(json!({
            "protein": "5",
            "caffeine": "95",
            "serving_description": "1 cup"
        }));
        let info = extract_nutrition(&details).unwrap();
        assert_eq!(info.nutrients.len(), 1);
        assert_eq!(info.nutrients[0].name, "protein");
    }

    #[test]
    fn test_empty_nutrient_set_is_none() {
        let details = details_with_serving(json!({ "serving_description": "1 cup" }));
        assert!(extract_nutrition(&details).is_none());
        assert!(extract_nutrition(&Value::Null).is_none());
    }

    #[test]
    fn test_single_object_serving_accepted() {
        let details = json!({
            "food": { "servings": { "serving": {
                "calories": "52",
                "measurement_description": "100 g",
                "metric_serving_amount": "100.000",
                "metric_serving_unit": "g"
            } } }
        });
        let info = extract_nutrition(&details).unwrap();
        assert_eq!(info.portion_description.as_deref(), Some("100 g"));
        assert_eq!(info.nutrients[0].value, 52.0);
    }

    #[test]
    fn test_classify_quota_error() {
        let value = json!({ "error": { "code": 12, "message": "too many actions" } });
        assert!(matches!(
            classify_error(&value),
            Some(ApiFailure::Quota(_))
        ));
    }

    #[test]
    fn test_classify_other_error() {
        let value = json!({ "error": { "code": 106, "message": "invalid id" } });
        assert!(matches!(
            classify_error(&value),
            Some(ApiFailure::Other { code: 106, .. })
        ));
        assert!(classify_error(&json!({ "foods": {} })).is_none());
    }

    #[tokio::test]
    async fn test_quota_then_success_returns_success() {
        let policy = RetryPolicy {
            max_retries: 3,
            base_delay: Duration::from_millis(1),
        };
        let calls = Cell::new(0u32);

        let result = with_quota_retry(&policy, || {
            let n = calls.get();
            calls.set(n + 1);
            async move {
                if n == 0 {
                    Err(LarderError::Quota("too many actions".to_string()))
                } else {
                    Ok(7)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.get(), 2);
    }

    #[tokio::test]
    async fn test_persistent_quota_surfaces_after_cap() {
        let policy = RetryPolicy {
            max_retries: 2,
            base_delay: Duration::from_millis(1),
        };
        let calls = Cell::new(0u32);

        let result: Result<()> = with_quota_retry(&policy, || {
            calls.set(calls.get() + 1);
            async { Err(LarderError::Quota("too many actions".to_string())) }
        })
        .await;

        assert!(result.unwrap_err().is_quota());
        assert_eq!(calls.get(), 3); // initial attempt + 2 retries
    }

    #[tokio::test]
    async fn test_non_quota_errors_never_retry() {
        let policy = RetryPolicy::default();
        let calls = Cell::new(0u32);

        let result: Result<()> = with_quota_retry(&policy, || {
            calls.set(calls.get() + 1);
            async {
                Err(LarderError::Translation("nope".to_string()))
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.get(), 1);
    }
}
