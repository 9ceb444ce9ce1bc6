//! Staff repository: doctors, receptionists and a clinic's patients.

use std::future::Future;

use medflow_core::{ApiRequest, Result};

use crate::ApiClient;
use crate::model::{Doctor, Patient, PatientList, Receptionist};

const DOCTORS: &str = "/doctors/";
const RECEPTIONISTS: &str = "/receptionists/";

/// Repository for clinic staff records.
pub trait StaffRepository {
    /// Lists the doctors visible to the signed-in account.
    fn list_doctors(&self) -> impl Future<Output = Result<Vec<Doctor>>> + Send;

    /// Finds a doctor by identifier.
    fn find_doctor(&self, id: i64) -> impl Future<Output = Result<Doctor>> + Send;

    /// Lists the receptionists visible to the signed-in account.
    fn list_receptionists(&self) -> impl Future<Output = Result<Vec<Receptionist>>> + Send;

    /// Finds a receptionist by identifier.
    fn find_receptionist(&self, id: i64) -> impl Future<Output = Result<Receptionist>> + Send;

    /// Lists the patients of the signed-in staff member's clinic.
    fn clinic_patients(&self) -> impl Future<Output = Result<Vec<Patient>>> + Send;
}

impl StaffRepository for ApiClient {
    async fn list_doctors(&self) -> Result<Vec<Doctor>> {
        self.fetch_list(ApiRequest::get(DOCTORS)).await
    }

    async fn find_doctor(&self, id: i64) -> Result<Doctor> {
        self.fetch(ApiRequest::get(format!("{DOCTORS}{id}/")))
            .await
    }

    async fn list_receptionists(&self) -> Result<Vec<Receptionist>> {
        self.fetch_list(ApiRequest::get(RECEPTIONISTS)).await
    }

    async fn find_receptionist(&self, id: i64) -> Result<Receptionist> {
        self.fetch(ApiRequest::get(format!("{RECEPTIONISTS}{id}/")))
            .await
    }

    async fn clinic_patients(&self) -> Result<Vec<Patient>> {
        let list: PatientList = self.fetch(ApiRequest::get("/clinic-patients/")).await?;
        Ok(list.patients)
    }
}
