//! Account repository: the signed-in profile and administrator user management.

use std::future::Future;

use medflow_core::{ApiRequest, Result, Role};

use crate::ApiClient;
use crate::model::{
    ActionReply, NewUser, PasswordReset, UserList, UserProfile, UserReply, UserStatus, UserUpdate,
};

const PROFILE: &str = "/auth/profile/";
const USERS: &str = "/users/";

fn user_path(id: i64) -> String {
    format!("{USERS}{id}/")
}

fn user_action(id: i64, action: &str) -> String {
    format!("{USERS}{id}/{action}/")
}

/// Repository for accounts.
///
/// Everything but the profile operations requires an administrator, except
/// [`UserRepository::clinic_users`], which is open to clinic staff.
pub trait UserRepository {
    /// Returns the signed-in account's full profile.
    fn profile(&self) -> impl Future<Output = Result<UserProfile>> + Send;

    /// Applies a partial update to the signed-in account's profile.
    fn update_profile(
        &self,
        update: UserUpdate,
    ) -> impl Future<Output = Result<UserProfile>> + Send;

    /// Lists accounts, optionally only those of `role`.
    fn list_users(&self, role: Option<Role>) -> impl Future<Output = Result<Vec<UserProfile>>> + Send;

    /// Finds an account by identifier.
    fn find_user(&self, id: i64) -> impl Future<Output = Result<UserProfile>> + Send;

    /// Creates an account together with its role profile.
    fn create_user(&self, user: NewUser) -> impl Future<Output = Result<UserReply>> + Send;

    /// Updates an account and its role profile.
    fn update_user(
        &self,
        id: i64,
        update: UserUpdate,
    ) -> impl Future<Output = Result<UserReply>> + Send;

    /// Deletes an account.
    fn delete_user(&self, id: i64) -> impl Future<Output = Result<ActionReply>> + Send;

    /// Activates an inactive account or deactivates an active one.
    fn toggle_user_status(&self, id: i64) -> impl Future<Output = Result<UserStatus>> + Send;

    /// Replaces an account's password with a generated temporary one.
    fn reset_user_password(&self, id: i64) -> impl Future<Output = Result<PasswordReset>> + Send;

    /// Lists the accounts of the signed-in staff member's clinic.
    fn clinic_users(&self) -> impl Future<Output = Result<UserList>> + Send;
}

impl UserRepository for ApiClient {
    async fn profile(&self) -> Result<UserProfile> {
        self.fetch(ApiRequest::get(PROFILE)).await
    }

    async fn update_profile(&self, update: UserUpdate) -> Result<UserProfile> {
        self.fetch(ApiRequest::patch(PROFILE).with_json(&update)?)
            .await
    }

    async fn list_users(&self, role: Option<Role>) -> Result<Vec<UserProfile>> {
        let mut request = ApiRequest::get(format!("{USERS}list/"));
        if let Some(role) = role {
            request = request.with_query("user_type", role.as_ref());
        }

        let list: UserList = self.fetch(request).await?;
        Ok(list.users)
    }

    async fn find_user(&self, id: i64) -> Result<UserProfile> {
        self.fetch(ApiRequest::get(user_path(id))).await
    }

    async fn create_user(&self, user: NewUser) -> Result<UserReply> {
        let request = ApiRequest::post(format!("{USERS}create-user/")).with_json(&user)?;
        let reply: UserReply = self.fetch(request).await?;
        tracing::info!(
            target: crate::TRACING_TARGET,
            user_id = reply.user.id,
            role = %reply.user.role,
            "Account created"
        );
        Ok(reply)
    }

    async fn update_user(&self, id: i64, update: UserUpdate) -> Result<UserReply> {
        self.fetch(ApiRequest::put(user_path(id)).with_json(&update)?)
            .await
    }

    async fn delete_user(&self, id: i64) -> Result<ActionReply> {
        self.fetch(ApiRequest::delete(user_path(id))).await
    }

    async fn toggle_user_status(&self, id: i64) -> Result<UserStatus> {
        self.fetch(ApiRequest::post(user_action(id, "toggle-status")))
            .await
    }

    async fn reset_user_password(&self, id: i64) -> Result<PasswordReset> {
        self.fetch(ApiRequest::post(user_action(id, "reset-password")))
            .await
    }

    async fn clinic_users(&self) -> Result<UserList> {
        self.fetch(ApiRequest::get("/clinic-users/")).await
    }
}

#[cfg(test)]
mod tests {
    use medflow_core::mock::{MockReply, MockTransport};
    use medflow_core::{ErrorKind, Method};
    use serde_json::json;

    use super::*;
    use crate::client::tests::signed_in_client;

    fn user_json(id: i64, username: &str, role: &str) -> serde_json::Value {
        json!({
            "id": id,
            "username": username,
            "email": format!("{username}@example.org"),
            "first_name": "",
            "last_name": "",
            "user_type": role,
            "is_active": true,
        })
    }

    #[tokio::test]
    async fn test_list_users_filters_by_role() {
        let transport = MockTransport::new();
        let client = signed_in_client(&transport).await;
        transport.push(
            Method::Get,
            "/users/list/",
            MockReply::json(
                200,
                json!({ "users": [user_json(3, "dr.house", "doctor")], "count": 1 }),
            ),
        );

        let users = client.list_users(Some(Role::Doctor)).await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].role, Role::Doctor);

        let sent = transport.requests_to(Method::Get, "/users/list/");
        assert_eq!(
            sent[0].query,
            vec![("user_type".to_owned(), "doctor".to_owned())]
        );
    }

    #[tokio::test]
    async fn test_create_user_sends_profile_fields() {
        let transport = MockTransport::new();
        let client = signed_in_client(&transport).await;
        transport.push(
            Method::Post,
            "/users/create-user/",
            MockReply::json(
                201,
                json!({
                    "user": user_json(12, "dr.grey", "doctor"),
                    "message": "Utilisateur créé avec succès",
                }),
            ),
        );

        let user = NewUser::new(Role::Doctor, "dr.grey", "grey@example.org", "s3cret")
            .with_name("Meredith", "Grey")
            .with_phone_number("0600000000")
            .with_date_of_birth("1980-04-02")
            .with_clinic(2)
            .with_field("specialization", "Surgery")
            .with_field("license_number", "LIC-42");
        let reply = client.create_user(user).await.unwrap();
        assert_eq!(reply.user.id, 12);

        let body = transport.requests_to(Method::Post, "/users/create-user/")[0]
            .body
            .clone()
            .unwrap();
        assert_eq!(body["user_type"], "doctor");
        assert_eq!(body["license_number"], "LIC-42");
        assert_eq!(body["date_of_birth"], "1980-04-02");
    }

    #[tokio::test]
    async fn test_update_user_uses_put() {
        let transport = MockTransport::new();
        let client = signed_in_client(&transport).await;
        transport.push(
            Method::Put,
            "/users/12/",
            MockReply::json(200, json!({ "user": user_json(12, "dr.grey", "doctor") })),
        );

        let update = UserUpdate {
            phone_number: Some("0611111111".to_owned()),
            ..UserUpdate::default()
        }
        .with_field("consultation_fee", "90.00");
        client.update_user(12, update).await.unwrap();

        let body = transport.requests_to(Method::Put, "/users/12/")[0]
            .body
            .clone()
            .unwrap();
        assert_eq!(
            body,
            json!({ "phone_number": "0611111111", "consultation_fee": "90.00" })
        );
    }

    #[tokio::test]
    async fn test_toggle_and_reset() {
        let transport = MockTransport::new();
        let client = signed_in_client(&transport).await;
        let mut inactive = user_json(12, "dr.grey", "doctor");
        inactive["is_active"] = json!(false);
        transport.push(
            Method::Post,
            "/users/12/toggle-status/",
            MockReply::json(
                200,
                json!({ "message": "Utilisateur désactivé", "is_active": false, "user": inactive }),
            ),
        );
        transport.push(
            Method::Post,
            "/users/12/reset-password/",
            MockReply::json(
                200,
                json!({
                    "message": "Mot de passe réinitialisé",
                    "temporary_password": "Tmp-9x2",
                    "user_email": "dr.grey@example.org",
                    "note": "Communiquez ce mot de passe",
                }),
            ),
        );

        let status = client.toggle_user_status(12).await.unwrap();
        assert!(!status.is_active);
        assert_eq!(status.user.is_active, Some(false));

        let reset = client.reset_user_password(12).await.unwrap();
        assert_eq!(reset.temporary_password, "Tmp-9x2");
    }

    #[tokio::test]
    async fn test_profile_update_is_partial() {
        let transport = MockTransport::new();
        let client = signed_in_client(&transport).await;
        let mut updated = user_json(3, "dr.house", "doctor");
        updated["address"] = json!("221B Baker Street");
        transport.push(Method::Patch, PROFILE, MockReply::json(200, updated));

        let update = UserUpdate {
            address: Some("221B Baker Street".to_owned()),
            ..UserUpdate::default()
        };
        let profile = client.update_profile(update).await.unwrap();
        assert_eq!(profile.address.as_deref(), Some("221B Baker Street"));

        let body = transport.requests_to(Method::Patch, PROFILE)[0]
            .body
            .clone()
            .unwrap();
        assert_eq!(body, json!({ "address": "221B Baker Street" }));
    }

    #[tokio::test]
    async fn test_forbidden_for_non_admin() {
        let transport = MockTransport::new();
        let client = signed_in_client(&transport).await;
        transport.push(
            Method::Delete,
            "/users/12/",
            MockReply::json(403, json!({ "error": "Permission refusée" })),
        );

        let error = client.delete_user(12).await.unwrap_err();
        assert_eq!(error.kind, ErrorKind::RequestFailed);
        assert_eq!(error.status, Some(403));
        assert_eq!(error.user_message(), "Permission refusée");
        assert!(client.access_token().is_some());
    }
}
