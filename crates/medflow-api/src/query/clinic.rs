//! Clinic repository, covering clinics and the services they offer.

use std::future::Future;

use medflow_core::{ApiRequest, Result};

use crate::ApiClient;
use crate::model::{Clinic, ClinicFields, Service, ServiceFields};

const CLINICS: &str = "/clinics/";
const SERVICES: &str = "/services/";

fn clinic_path(id: i64) -> String {
    format!("{CLINICS}{id}/")
}

fn service_path(id: i64) -> String {
    format!("{SERVICES}{id}/")
}

/// Repository for clinics and their services.
///
/// Listing is open to every signed-in account; changes require an
/// administrator.
pub trait ClinicRepository {
    /// Lists the clinics.
    fn list_clinics(&self) -> impl Future<Output = Result<Vec<Clinic>>> + Send;

    /// Finds a clinic by identifier.
    fn find_clinic(&self, id: i64) -> impl Future<Output = Result<Clinic>> + Send;

    /// Creates a clinic.
    fn create_clinic(&self, fields: ClinicFields) -> impl Future<Output = Result<Clinic>> + Send;

    /// Applies a partial update to a clinic.
    fn update_clinic(
        &self,
        id: i64,
        fields: ClinicFields,
    ) -> impl Future<Output = Result<Clinic>> + Send;

    /// Deletes a clinic.
    fn delete_clinic(&self, id: i64) -> impl Future<Output = Result<()>> + Send;

    /// Lists the services clinics offer for booking.
    fn list_services(&self) -> impl Future<Output = Result<Vec<Service>>> + Send;

    /// Finds a service by identifier.
    fn find_service(&self, id: i64) -> impl Future<Output = Result<Service>> + Send;

    /// Creates a service.
    fn create_service(&self, fields: ServiceFields) -> impl Future<Output = Result<Service>> + Send;

    /// Applies a partial update to a service.
    fn update_service(
        &self,
        id: i64,
        fields: ServiceFields,
    ) -> impl Future<Output = Result<Service>> + Send;

    /// Deletes a service.
    fn delete_service(&self, id: i64) -> impl Future<Output = Result<()>> + Send;
}

impl ClinicRepository for ApiClient {
    async fn list_clinics(&self) -> Result<Vec<Clinic>> {
        self.fetch_list(ApiRequest::get(CLINICS)).await
    }

    async fn find_clinic(&self, id: i64) -> Result<Clinic> {
        self.fetch(ApiRequest::get(clinic_path(id))).await
    }

    async fn create_clinic(&self, fields: ClinicFields) -> Result<Clinic> {
        self.fetch(ApiRequest::post(CLINICS).with_json(&fields)?)
            .await
    }

    async fn update_clinic(&self, id: i64, fields: ClinicFields) -> Result<Clinic> {
        self.fetch(ApiRequest::patch(clinic_path(id)).with_json(&fields)?)
            .await
    }

    async fn delete_clinic(&self, id: i64) -> Result<()> {
        self.perform(ApiRequest::delete(clinic_path(id))).await
    }

    async fn list_services(&self) -> Result<Vec<Service>> {
        self.fetch_list(ApiRequest::get(SERVICES)).await
    }

    async fn find_service(&self, id: i64) -> Result<Service> {
        self.fetch(ApiRequest::get(service_path(id))).await
    }

    async fn create_service(&self, fields: ServiceFields) -> Result<Service> {
        self.fetch(ApiRequest::post(SERVICES).with_json(&fields)?)
            .await
    }

    async fn update_service(&self, id: i64, fields: ServiceFields) -> Result<Service> {
        self.fetch(ApiRequest::patch(service_path(id)).with_json(&fields)?)
            .await
    }

    async fn delete_service(&self, id: i64) -> Result<()> {
        self.perform(ApiRequest::delete(service_path(id))).await
    }
}

#[cfg(test)]
mod tests {
    use medflow_core::Method;
    use medflow_core::mock::{MockReply, MockTransport};
    use serde_json::json;

    use super::*;
    use crate::client::tests::signed_in_client;
    use crate::model::ServiceType;

    #[tokio::test]
    async fn test_create_clinic_returns_record() {
        let transport = MockTransport::new();
        let client = signed_in_client(&transport).await;
        transport.push(
            Method::Post,
            CLINICS,
            MockReply::json(
                201,
                json!({
                    "id": 2,
                    "name": "Clinique du Parc",
                    "address": "1 rue du Parc",
                    "city": "Lyon",
                    "opening_hours": {},
                    "is_active": true,
                    "created_at": "2025-01-01T08:00:00Z",
                    "updated_at": "2025-01-01T08:00:00Z",
                }),
            ),
        );

        let fields = ClinicFields {
            name: Some("Clinique du Parc".to_owned()),
            address: Some("1 rue du Parc".to_owned()),
            city: Some("Lyon".to_owned()),
            ..ClinicFields::default()
        };
        let clinic = client.create_clinic(fields).await.unwrap();
        assert_eq!(clinic.id, 2);
        assert_eq!(clinic.is_active, Some(true));

        let body = transport.requests_to(Method::Post, CLINICS)[0]
            .body
            .clone()
            .unwrap();
        assert_eq!(
            body,
            json!({ "name": "Clinique du Parc", "address": "1 rue du Parc", "city": "Lyon" })
        );
    }

    #[tokio::test]
    async fn test_update_service_is_partial() {
        let transport = MockTransport::new();
        let client = signed_in_client(&transport).await;
        transport.push(
            Method::Patch,
            "/services/5/",
            MockReply::json(
                200,
                json!({
                    "id": 5,
                    "clinic": 2,
                    "clinic_name": "Clinique du Parc",
                    "name": "Vaccin grippe",
                    "service_type": "vaccination",
                    "duration": 15,
                    "price": "25.00",
                    "is_active": true,
                }),
            ),
        );

        let fields = ServiceFields {
            price: Some("25.00".to_owned()),
            ..ServiceFields::default()
        };
        let service = client.update_service(5, fields).await.unwrap();
        assert_eq!(service.service_type, Some(ServiceType::Vaccination));
        assert_eq!(service.price.as_deref(), Some("25.00"));

        let body = transport.requests_to(Method::Patch, "/services/5/")[0]
            .body
            .clone()
            .unwrap();
        assert_eq!(body, json!({ "price": "25.00" }));
    }

    #[tokio::test]
    async fn test_list_services_accepts_paginated_body() {
        let transport = MockTransport::new();
        let client = signed_in_client(&transport).await;
        transport.push(
            Method::Get,
            SERVICES,
            MockReply::json(
                200,
                json!({ "count": 1, "results": [{ "id": 5, "name": "Consultation" }] }),
            ),
        );

        let services = client.list_services().await.unwrap();
        assert_eq!(services.len(), 1);
        assert_eq!(services[0].name, "Consultation");
    }

    #[tokio::test]
    async fn test_delete_clinic_accepts_empty_body() {
        let transport = MockTransport::new();
        let client = signed_in_client(&transport).await;
        transport.push(
            Method::Delete,
            "/clinics/2/",
            MockReply::Raw {
                status: 204,
                body: Vec::new(),
            },
        );

        client.delete_clinic(2).await.unwrap();
        assert_eq!(transport.requests_to(Method::Delete, "/clinics/2/").len(), 1);
    }
}
