//! Agent management client methods

use super::request::{ApiRequest, ListParams};
use super::{ApiClient, ClientError};
use serde_json::Value as JsonValue;

impl ApiClient {
    /// List agents
    pub async fn list_agents(&self, skip: u32, limit: u32) -> Result<JsonValue, ClientError> {
        let path = ListParams::page(skip, limit).apply("/agents/");
        self.execute(&ApiRequest::get(path)).await
    }

    /// List active agents only
    pub async fn active_agents(&self) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::get("/agents/active")).await
    }

    /// Get an agent
    pub async fn get_agent(&self, agent_id: i64) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::get(format!("/agents/{agent_id}")))
            .await
    }

    /// Create an agent
    pub async fn create_agent(&self, agent: JsonValue) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::post("/agents/").json(agent)).await
    }

    /// Update an agent
    pub async fn update_agent(
        &self,
        agent_id: i64,
        agent: JsonValue,
    ) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::put(format!("/agents/{agent_id}")).json(agent))
            .await
    }

    /// Delete an agent
    pub async fn delete_agent(&self, agent_id: i64) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::delete(format!("/agents/{agent_id}")))
            .await
    }

    /// Record performance figures for an agent
    pub async fn update_agent_performance(
        &self,
        agent_id: i64,
        performance: JsonValue,
    ) -> Result<JsonValue, ClientError> {
        let request = ApiRequest::put(format!("/agents/{agent_id}/performance")).json(performance);
        self.execute(&request).await
    }
}
