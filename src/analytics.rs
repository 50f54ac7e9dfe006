//! Dashboard counters

use reqwest::Method;
use serde_json::Value;

use crate::envelope::Envelope;
use crate::error::{Error, Notice};
use crate::fetch::ApiContext;

/// Client for `/admin/analytics`
#[derive(Clone)]
pub struct AnalyticsApi {
    ctx: ApiContext,
}

impl AnalyticsApi {
    pub(crate) fn new(ctx: ApiContext) -> Self {
        Self { ctx }
    }

    /// Users active today
    pub async fn daily_active_users(&self) -> Result<u64, Error> {
        self.counter("/admin/analytics/dailyActiveUsers").await
    }

    /// Users registered today
    pub async fn daily_new_users(&self) -> Result<u64, Error> {
        self.counter("/admin/analytics/dailyNewUsers").await
    }

    async fn counter(&self, path: &str) -> Result<u64, Error> {
        let envelope = self
            .ctx
            .request(Method::GET, path)
            .execute::<Envelope<Value>>()
            .await?;

        envelope
            .data
            .as_ref()
            .and_then(counter_value)
            .ok_or_else(|| Error::general(format!("unexpected counter payload from {}", path)))
    }
}

/// Accepts a bare number, or an object carrying `count`/`total`, or the
/// first numeric field of an object
fn counter_value(data: &Value) -> Option<u64> {
    match data {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().map(|f| f.max(0.0).round() as u64)),
        Value::String(s) => s.trim().parse().ok(),
        Value::Object(map) => ["count", "total"]
            .iter()
            .find_map(|key| map.get(*key).and_then(counter_value))
            .or_else(|| map.values().find_map(|v| v.as_u64())),
        _ => None,
    }
}

/// The two stat cards, each loaded on its own
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub active_users: Result<u64, Notice>,
    pub new_users_today: Result<u64, Notice>,
}

impl Dashboard {
    /// Fire both counters concurrently; one failing does not affect the other
    pub async fn load(api: &AnalyticsApi) -> Self {
        let (active, new_today) = tokio::join!(api.daily_active_users(), api.daily_new_users());

        Self {
            active_users: active.map_err(|e| Notice::from_error(&e, "Failed to fetch active users")),
            new_users_today: new_today.map_err(|e| Notice::from_error(&e, "Failed to fetch new users")),
        }
    }
}
