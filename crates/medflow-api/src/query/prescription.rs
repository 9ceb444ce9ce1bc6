//! Prescription repository.

use std::future::Future;

use bytes::Bytes;
use medflow_core::{ApiRequest, Result};

use crate::ApiClient;
use crate::model::{NewPrescription, Prescription};

const PRESCRIPTIONS: &str = "/prescriptions/";

fn prescription_path(id: i64) -> String {
    format!("{PRESCRIPTIONS}{id}/")
}

/// Repository for prescriptions.
pub trait PrescriptionRepository {
    /// Lists the prescriptions visible to the signed-in account.
    fn list_prescriptions(&self) -> impl Future<Output = Result<Vec<Prescription>>> + Send;

    /// Finds a prescription by identifier.
    fn find_prescription(&self, id: i64) -> impl Future<Output = Result<Prescription>> + Send;

    /// Issues a prescription.
    fn create_prescription(
        &self,
        prescription: NewPrescription,
    ) -> impl Future<Output = Result<Prescription>> + Send;

    /// Replaces a prescription.
    fn update_prescription(
        &self,
        id: i64,
        prescription: NewPrescription,
    ) -> impl Future<Output = Result<Prescription>> + Send;

    /// Deletes a prescription.
    fn delete_prescription(&self, id: i64) -> impl Future<Output = Result<()>> + Send;

    /// Records that the patient collected the prescription.
    fn mark_prescription_picked_up(&self, id: i64) -> impl Future<Output = Result<()>> + Send;

    /// Downloads the printable PDF of a prescription.
    fn download_prescription_pdf(&self, id: i64) -> impl Future<Output = Result<Bytes>> + Send;
}

impl PrescriptionRepository for ApiClient {
    async fn list_prescriptions(&self) -> Result<Vec<Prescription>> {
        self.fetch_list(ApiRequest::get(PRESCRIPTIONS)).await
    }

    async fn find_prescription(&self, id: i64) -> Result<Prescription> {
        self.fetch(ApiRequest::get(prescription_path(id))).await
    }

    async fn create_prescription(&self, prescription: NewPrescription) -> Result<Prescription> {
        self.fetch(ApiRequest::post(PRESCRIPTIONS).with_json(&prescription)?)
            .await
    }

    async fn update_prescription(
        &self,
        id: i64,
        prescription: NewPrescription,
    ) -> Result<Prescription> {
        self.fetch(ApiRequest::put(prescription_path(id)).with_json(&prescription)?)
            .await
    }

    async fn delete_prescription(&self, id: i64) -> Result<()> {
        self.perform(ApiRequest::delete(prescription_path(id))).await
    }

    async fn mark_prescription_picked_up(&self, id: i64) -> Result<()> {
        self.perform(ApiRequest::post(format!("{PRESCRIPTIONS}{id}/mark_picked_up/")))
            .await
    }

    async fn download_prescription_pdf(&self, id: i64) -> Result<Bytes> {
        let request = ApiRequest::get(format!("{PRESCRIPTIONS}{id}/download_pdf/"))
            .with_header("Accept", "application/pdf");
        Ok(self.execute(request).await?.body)
    }
}

#[cfg(test)]
mod tests {
    use medflow_core::Method;
    use medflow_core::mock::{MockReply, MockTransport};
    use serde_json::json;

    use super::*;
    use crate::client::tests::signed_in_client;
    use crate::model::{Medication, PrescriptionStatus};

    #[tokio::test]
    async fn test_create_prescription_payload() {
        let transport = MockTransport::new();
        let client = signed_in_client(&transport).await;
        transport.push(
            Method::Post,
            PRESCRIPTIONS,
            MockReply::json(
                201,
                json!({ "id": 11, "patient": 1, "diagnosis": "Angine", "status": "active" }),
            ),
        );

        let medication = Medication {
            medication_name: "Amoxicilline".to_owned(),
            dosage: "1g".to_owned(),
            frequency: "2x/jour".to_owned(),
            duration: "7 jours".to_owned(),
            ..Medication::default()
        };
        let created = client
            .create_prescription(NewPrescription::new(1, "Angine", vec![medication]))
            .await
            .unwrap();
        assert_eq!(created.status, PrescriptionStatus::Active);

        let body = transport.requests_to(Method::Post, PRESCRIPTIONS)[0]
            .body
            .clone()
            .unwrap();
        assert_eq!(body["status"], "active");
        assert_eq!(body["medications"][0]["medication_name"], "Amoxicilline");
        assert!(body["medications"][0].get("instructions").is_none());
    }

    #[tokio::test]
    async fn test_download_pdf_returns_raw_bytes() {
        let transport = MockTransport::new();
        let client = signed_in_client(&transport).await;
        transport.push(
            Method::Get,
            "/prescriptions/11/download_pdf/",
            MockReply::Raw {
                status: 200,
                body: b"%PDF-1.4".to_vec(),
            },
        );

        let pdf = client.download_prescription_pdf(11).await.unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }
}
