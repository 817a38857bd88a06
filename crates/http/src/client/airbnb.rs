//! Airbnb listing, booking and payment client methods

use super::request::ApiRequest;
use super::{ApiClient, ClientError};
use serde_json::Value as JsonValue;

impl ApiClient {
    /// List Airbnb listings visible to the signed-in user
    pub async fn list_airbnbs(&self) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::get("/airbnb/")).await
    }

    /// Listings shown on the public site; no credentials needed
    pub async fn public_airbnbs(&self) -> Result<JsonValue, ClientError> {
        self.execute_public(&ApiRequest::get("/airbnb/public")).await
    }

    /// Get a listing
    pub async fn get_airbnb(&self, airbnb_id: i64) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::get(format!("/airbnb/{airbnb_id}")))
            .await
    }

    /// Create a listing
    pub async fn create_airbnb(&self, listing: JsonValue) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::post("/airbnb/").json(listing)).await
    }

    /// Update a listing
    pub async fn update_airbnb(
        &self,
        airbnb_id: i64,
        listing: JsonValue,
    ) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::put(format!("/airbnb/{airbnb_id}")).json(listing))
            .await
    }

    /// Delete a listing
    pub async fn delete_airbnb(&self, airbnb_id: i64) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::delete(format!("/airbnb/{airbnb_id}")))
            .await
    }

    /// Bookings of one listing
    pub async fn airbnb_bookings(&self, airbnb_id: i64) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::get(format!("/airbnb/{airbnb_id}/bookings")))
            .await
    }

    /// Create a booking
    pub async fn create_airbnb_booking(&self, booking: JsonValue) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::post("/airbnb/bookings").json(booking))
            .await
    }

    /// Update a booking
    pub async fn update_airbnb_booking(
        &self,
        booking_id: i64,
        booking: JsonValue,
    ) -> Result<JsonValue, ClientError> {
        let request = ApiRequest::put(format!("/airbnb/bookings/{booking_id}")).json(booking);
        self.execute(&request).await
    }

    /// All bookings across listings (admin)
    pub async fn admin_airbnb_bookings(&self) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::get("/admin/airbnb/bookings")).await
    }

    /// Approve a booking (admin)
    pub async fn approve_airbnb_booking(&self, booking_id: i64) -> Result<JsonValue, ClientError> {
        let path = format!("/admin/airbnb/bookings/{booking_id}/approve");
        self.execute(&ApiRequest::patch(path)).await
    }

    /// Decline a booking (admin)
    pub async fn decline_airbnb_booking(&self, booking_id: i64) -> Result<JsonValue, ClientError> {
        let path = format!("/admin/airbnb/bookings/{booking_id}/decline");
        self.execute(&ApiRequest::patch(path)).await
    }

    /// All booking payments (admin)
    pub async fn admin_airbnb_payments(&self) -> Result<JsonValue, ClientError> {
        self.execute(&ApiRequest::get("/admin/airbnb/payments")).await
    }
}
