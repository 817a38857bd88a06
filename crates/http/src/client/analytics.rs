//! Dashboard analytics client methods

use super::request::{ApiRequest, EXTENDED_TIMEOUT, ListParams, RequestOptions, with_query};
use super::{ApiClient, ClientError};
use bytes::Bytes;
use serde_json::Value as JsonValue;

impl ApiClient {
    /// Summary figures for the dashboard landing page
    pub async fn dashboard_summary(&self) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::get("/analytics/dashboard-summary"))
            .await
    }

    /// Analytics for one property
    pub async fn property_analytics(&self, property_id: i64) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::get(format!("/analytics/property/{property_id}")))
            .await
    }

    /// Rental statistics for an entity, e.g. `("property", 4)`
    pub async fn rental_stats(&self, kind: &str, id: i64) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::get(format!("/rental-stats/{kind}/{id}")))
            .await
    }

    /// Occupancy, optionally for one property
    pub async fn occupancy_analytics(
        &self,
        property_id: Option<i64>,
    ) -> Result<JsonValue, ClientError> {
        let path = with_query(
            "/analytics/occupancy",
            [("property_id", property_id.map(|id| id.to_string()))],
        );
        self.execute(&ApiRequest::get(path)).await
    }

    /// Payment analytics
    pub async fn payment_analytics(&self, filters: &ListParams) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::get(filters.apply("/analytics/payments")))
            .await
    }

    /// Maintenance analytics
    pub async fn maintenance_analytics(
        &self,
        filters: &ListParams,
    ) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::get(filters.apply("/analytics/maintenance")))
            .await
    }

    /// Spreadsheet export of `export_type` (e.g. `payments`, `tenants`)
    ///
    /// Exports can take a while to build, so the extended timeout applies.
    pub async fn export_excel(
        &self,
        export_type: &str,
        filters: &ListParams,
    ) -> Result<Bytes, ClientError> {
        let params = ListParams {
            filters: std::iter::once(("export_type".to_string(), export_type.to_string()))
                .chain(filters.filters.iter().cloned())
                .collect(),
            ..filters.clone()
        };
        let request = ApiRequest::get(params.apply("/analytics/export/excel"))
            .options(RequestOptions::blob().with_timeout(EXTENDED_TIMEOUT));
        let response = self.request(&request).await?;
        Ok(response.bytes().await?)
    }

    /// Monthly report, optionally for one property
    pub async fn monthly_report(
        &self,
        year: i32,
        month: u32,
        property_id: Option<i64>,
    ) -> Result<JsonValue, ClientError> {
        let path = with_query(
            &format!("/analytics/monthly-report/{year}/{month}"),
            [("property_id", property_id.map(|id| id.to_string()))],
        );
        self.execute(&ApiRequest::get(path)).await
    }
}
