//! Appointment repository for booking and slot lookup.

use std::future::Future;

use medflow_core::{ApiRequest, Result};

use crate::ApiClient;
use crate::model::{
    Appointment, AvailableSlots, NewAppointment, SavedAppointment, SlotQuery, UpdateAppointment,
};

const APPOINTMENTS: &str = "/appointments/";

fn appointment_path(id: i64) -> String {
    format!("{APPOINTMENTS}{id}/")
}

fn appointment_action(id: i64, action: &str) -> String {
    format!("{APPOINTMENTS}{id}/{action}/")
}

/// Repository for appointment operations.
///
/// Scheduling conflicts are enforced by the backend; a rejected booking
/// surfaces as a request failure carrying the backend's reason.
pub trait AppointmentRepository {
    /// Lists the appointments visible to the signed-in account.
    fn list_appointments(&self) -> impl Future<Output = Result<Vec<Appointment>>> + Send;

    /// Finds an appointment by identifier.
    fn find_appointment(&self, id: i64) -> impl Future<Output = Result<Appointment>> + Send;

    /// Lists the signed-in patient's or doctor's own appointments.
    fn my_appointments(&self) -> impl Future<Output = Result<Vec<Appointment>>> + Send;

    /// Books an appointment.
    ///
    /// The backend echoes the submitted fields; fetch the appointment list
    /// for the display names.
    fn create_appointment(
        &self,
        appointment: NewAppointment,
    ) -> impl Future<Output = Result<SavedAppointment>> + Send;

    /// Applies a partial update to an appointment.
    fn update_appointment(
        &self,
        id: i64,
        updates: UpdateAppointment,
    ) -> impl Future<Output = Result<SavedAppointment>> + Send;

    /// Deletes an appointment.
    fn delete_appointment(&self, id: i64) -> impl Future<Output = Result<()>> + Send;

    /// Marks an appointment as confirmed.
    fn confirm_appointment(&self, id: i64) -> impl Future<Output = Result<Appointment>> + Send;

    /// Marks an appointment as cancelled.
    fn cancel_appointment(&self, id: i64) -> impl Future<Output = Result<Appointment>> + Send;

    /// Hides an appointment from the patient's own listing.
    fn hide_appointment_for_patient(&self, id: i64) -> impl Future<Output = Result<()>> + Send;

    /// Lists the free start times of a doctor on a given day.
    fn available_slots(&self, query: SlotQuery)
    -> impl Future<Output = Result<AvailableSlots>> + Send;
}

impl AppointmentRepository for ApiClient {
    async fn list_appointments(&self) -> Result<Vec<Appointment>> {
        self.fetch_list(ApiRequest::get(APPOINTMENTS)).await
    }

    async fn find_appointment(&self, id: i64) -> Result<Appointment> {
        self.fetch(ApiRequest::get(appointment_path(id))).await
    }

    async fn my_appointments(&self) -> Result<Vec<Appointment>> {
        self.fetch_list(ApiRequest::get(format!("{APPOINTMENTS}my_appointments/")))
            .await
    }

    async fn create_appointment(&self, appointment: NewAppointment) -> Result<SavedAppointment> {
        let request = ApiRequest::post(APPOINTMENTS).with_json(&appointment)?;
        self.fetch(request).await
    }

    async fn update_appointment(
        &self,
        id: i64,
        updates: UpdateAppointment,
    ) -> Result<SavedAppointment> {
        let request = ApiRequest::patch(appointment_path(id)).with_json(&updates)?;
        self.fetch(request).await
    }

    async fn delete_appointment(&self, id: i64) -> Result<()> {
        self.perform(ApiRequest::delete(appointment_path(id))).await
    }

    async fn confirm_appointment(&self, id: i64) -> Result<Appointment> {
        self.fetch(ApiRequest::patch(appointment_action(id, "confirm")))
            .await
    }

    async fn cancel_appointment(&self, id: i64) -> Result<Appointment> {
        self.fetch(ApiRequest::patch(appointment_action(id, "cancel")))
            .await
    }

    async fn hide_appointment_for_patient(&self, id: i64) -> Result<()> {
        self.perform(ApiRequest::patch(appointment_action(id, "hide_for_patient")))
            .await
    }

    async fn available_slots(&self, query: SlotQuery) -> Result<AvailableSlots> {
        let request = query.to_query().into_iter().fold(
            ApiRequest::get(format!("{APPOINTMENTS}available_slots/")),
            |request, (name, value)| request.with_query(name, value),
        );
        self.fetch(request).await
    }
}
