//! PDF report downloads
//!
//! Reports are generated server-side and returned as binary bodies.

use super::request::with_query;
use super::{ApiClient, ClientError};
use bytes::Bytes;
use chrono::NaiveDate;

impl ApiClient {
    /// Monthly statement for one tenant
    pub async fn tenant_statement_pdf(
        &self,
        tenant_id: i64,
        year: i32,
        month: u32,
    ) -> Result<Bytes, ClientError> {
        let path = with_query(
            &format!("/reports/tenant-statement/{tenant_id}/pdf"),
            [
                ("year", Some(year.to_string())),
                ("month", Some(month.to_string())),
            ],
        );
        self.download(path).await
    }

    /// Property report for a date range
    pub async fn property_report_pdf(
        &self,
        property_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Bytes, ClientError> {
        let path = with_query(
            &format!("/reports/property-report/{property_id}/pdf"),
            [
                ("start_date", Some(start_date.to_string())),
                ("end_date", Some(end_date.to_string())),
            ],
        );
        self.download(path).await
    }

    /// Year-end report across all properties
    pub async fn year_end_report_pdf(&self, year: i32) -> Result<Bytes, ClientError> {
        self.download(format!("/reports/year-end/{year}/pdf")).await
    }

    /// Tax report for one property and year
    pub async fn tax_report_pdf(&self, property_id: i64, year: i32) -> Result<Bytes, ClientError> {
        self.download(format!("/reports/tax-report/{property_id}/{year}/pdf"))
            .await
    }
}
