//! Message templates, bulk messaging and delivery logs

use super::request::{ApiRequest, with_query};
use super::{ApiClient, ClientError};
use serde_json::Value as JsonValue;

impl ApiClient {
    /// List message templates
    pub async fn message_templates(&self) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::get("/communications/templates"))
            .await
    }

    /// Create a message template
    pub async fn create_message_template(
        &self,
        template: JsonValue,
    ) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::post("/communications/templates").json(template))
            .await
    }

    /// Update a message template
    pub async fn update_message_template(
        &self,
        template_id: i64,
        template: JsonValue,
    ) -> Result<JsonValue, ClientError> {
        let request =
            ApiRequest::put(format!("/communications/templates/{template_id}")).json(template);
        self.execute(&request).await
    }

    /// Delete a message template
    pub async fn delete_message_template(&self, template_id: i64) -> Result<JsonValue, ClientError> {
        let path = format!("/communications/templates/{template_id}");
        self.execute(&ApiRequest::delete(path)).await
    }

    /// Install the built-in templates
    pub async fn seed_default_templates(&self) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::post("/communications/templates/seed-defaults"))
            .await
    }

    /// Send one message to a recipient group
    pub async fn send_bulk_message(&self, message: JsonValue) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::post("/communications/bulk-send").json(message))
            .await
    }

    /// Groups a bulk message can target
    pub async fn recipient_groups(&self) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::get("/communications/recipient-groups"))
            .await
    }

    /// Delivery logs, optionally filtered by status
    pub async fn communication_logs(&self, status: Option<&str>) -> Result<JsonValue, ClientError> {
        let path = with_query(
            "/communications/logs",
            [("status_filter", status.map(str::to_string))],
        );
        self.execute(&ApiRequest::get(path)).await
    }

    /// Get one delivery log
    pub async fn communication_log(&self, log_id: i64) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::get(format!("/communications/logs/{log_id}")))
            .await
    }
}
