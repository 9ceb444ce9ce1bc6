//! Patient repository.

use std::future::Future;

use medflow_core::{ApiRequest, Result};

use crate::ApiClient;
use crate::model::{MedicalHistory, MedicalInfoUpdate, Patient, PatientFields};

const PATIENTS: &str = "/patients/";

fn patient_path(id: i64) -> String {
    format!("{PATIENTS}{id}/")
}

/// Repository for patient records.
pub trait PatientRepository {
    /// Lists the patients visible to the signed-in account.
    fn list_patients(&self) -> impl Future<Output = Result<Vec<Patient>>> + Send;

    /// Finds a patient by identifier.
    fn find_patient(&self, id: i64) -> impl Future<Output = Result<Patient>> + Send;

    /// Returns the signed-in patient's own record.
    fn my_patient_profile(&self) -> impl Future<Output = Result<Patient>> + Send;

    /// Creates a patient record and returns the stored fields.
    fn create_patient(
        &self,
        fields: PatientFields,
    ) -> impl Future<Output = Result<PatientFields>> + Send;

    /// Applies a partial update to a patient record and returns the stored fields.
    fn update_patient(
        &self,
        id: i64,
        fields: PatientFields,
    ) -> impl Future<Output = Result<PatientFields>> + Send;

    /// Deletes a patient record.
    fn delete_patient(&self, id: i64) -> impl Future<Output = Result<()>> + Send;

    /// Returns the medical summary of a patient.
    fn medical_history(&self, id: i64) -> impl Future<Output = Result<MedicalHistory>> + Send;

    /// Updates the medical notes of a patient.
    fn update_medical_info(
        &self,
        id: i64,
        update: MedicalInfoUpdate,
    ) -> impl Future<Output = Result<()>> + Send;
}

impl PatientRepository for ApiClient {
    async fn list_patients(&self) -> Result<Vec<Patient>> {
        self.fetch_list(ApiRequest::get(PATIENTS)).await
    }

    async fn find_patient(&self, id: i64) -> Result<Patient> {
        self.fetch(ApiRequest::get(patient_path(id))).await
    }

    async fn my_patient_profile(&self) -> Result<Patient> {
        self.fetch(ApiRequest::get(format!("{PATIENTS}my_profile/")))
            .await
    }

    async fn create_patient(&self, fields: PatientFields) -> Result<PatientFields> {
        self.fetch(ApiRequest::post(PATIENTS).with_json(&fields)?)
            .await
    }

    async fn update_patient(&self, id: i64, fields: PatientFields) -> Result<PatientFields> {
        self.fetch(ApiRequest::patch(patient_path(id)).with_json(&fields)?)
            .await
    }

    async fn delete_patient(&self, id: i64) -> Result<()> {
        self.perform(ApiRequest::delete(patient_path(id))).await
    }

    async fn medical_history(&self, id: i64) -> Result<MedicalHistory> {
        self.fetch(ApiRequest::get(format!("{PATIENTS}{id}/medical_history/")))
            .await
    }

    async fn update_medical_info(&self, id: i64, update: MedicalInfoUpdate) -> Result<()> {
        let request =
            ApiRequest::patch(format!("{PATIENTS}{id}/update_medical_info/")).with_json(&update)?;
        self.perform(request).await
    }
}
