//! Webhook endpoint directory
//!
//! Key-value lookup from logical webhook name to endpoint (url + method),
//! kept in the coordinator database alongside the session tables.

use sqlx::{Row, SqlitePool};
use tsr_common::Result;

use crate::services::webhook::{HttpMethod, WebhookEndpoint};

/// Resolve an endpoint by logical name; absent is a first-class `None`
pub async fn get_webhook(pool: &SqlitePool, name: &str) -> Result<Option<WebhookEndpoint>> {
    let row = sqlx::query("SELECT url, method FROM webhooks WHERE name = ?")
        .bind(name)
        .fetch_optional(pool)
        .await?;

    row.map(|row| {
        let method: String = row.get("method");
        let method = HttpMethod::parse(&method).ok_or_else(|| {
            tsr_common::Error::Internal(format!("Unknown webhook method: {}", method))
        })?;

        Ok(WebhookEndpoint {
            url: row.get("url"),
            method,
        })
    })
    .transpose()
}

/// Register or replace an endpoint under a logical name
pub async fn set_webhook(pool: &SqlitePool, name: &str, endpoint: &WebhookEndpoint) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO webhooks (name, url, method)
        VALUES (?, ?, ?)
        ON CONFLICT(name) DO UPDATE SET
            url = excluded.url,
            method = excluded.method
        "#,
    )
    .bind(name)
    .bind(&endpoint.url)
    .bind(endpoint.method.as_str())
    .execute(pool)
    .await?;

    Ok(())
}
