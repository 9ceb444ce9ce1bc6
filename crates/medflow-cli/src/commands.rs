//! Subcommands and their execution.
//!
//! Every command renders its result as text for stdout; diagnostics go
//! through tracing.

use anyhow::Context;
use clap::{Args, Subcommand};
use jiff::civil::Date;
use medflow_api::model::SlotQuery;
use medflow_api::{ApiClient, AppointmentRepository, StaffRepository};
use medflow_core::{ApiRequest, ApiResponse, Role, Session, SessionView};
use medflow_router::{
    DEFAULT_DASHBOARD_PATH, DEFAULT_LOGIN_PATH, RouteDecision, RouteGuard, RoutePaths, RouteTable,
};
use medflow_session::{Credentials, Registration};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::TRACING_TARGET_COMMAND;

/// Operation to run against the backend.
#[derive(Debug, Clone, Subcommand, Serialize, Deserialize)]
pub enum Command {
    /// Sign in and store the session.
    Login(LoginArgs),
    /// Create an account and sign it in.
    Register(RegisterArgs),
    /// Sign out and discard the stored session.
    Logout,
    /// Show the signed-in account.
    Whoami,
    /// Exchange the refresh token for a new access token.
    Refresh,
    /// Show where navigating to a path would lead.
    Authorize(AuthorizeArgs),
    /// Call a backend endpoint with the stored credentials.
    Get(GetArgs),
    /// List the free appointment slots of a doctor.
    Slots(SlotsArgs),
    /// List the doctors visible to the signed-in account.
    Doctors,
}

/// Arguments of `login`.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
pub struct LoginArgs {
    /// Account name.
    pub username: String,

    /// Account password.
    #[arg(long, env = "MEDFLOW_PASSWORD", hide_env_values = true)]
    #[serde(skip_serializing)]
    pub password: String,
}

/// Arguments of `register`.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
pub struct RegisterArgs {
    /// Account name.
    pub username: String,

    /// Contact address.
    #[arg(long)]
    pub email: String,

    /// Account password.
    #[arg(long, env = "MEDFLOW_PASSWORD", hide_env_values = true)]
    #[serde(skip_serializing)]
    pub password: String,

    /// Account role: admin, doctor, receptionist or patient.
    #[arg(long, default_value = "patient")]
    pub role: Role,

    /// Given name.
    #[arg(long, default_value = "")]
    pub first_name: String,

    /// Family name.
    #[arg(long, default_value = "")]
    pub last_name: String,

    /// Clinic the account belongs to.
    #[arg(long)]
    pub clinic: Option<i64>,

    /// Phone number.
    #[arg(long)]
    pub phone_number: Option<String>,

    /// Date of birth.
    #[arg(long)]
    pub date_of_birth: Option<Date>,
}

impl RegisterArgs {
    fn into_registration(self) -> Registration {
        let mut registration = Registration::new(self.username, self.email, self.password, self.role)
            .with_name(self.first_name, self.last_name);
        if let Some(clinic) = self.clinic {
            registration = registration.with_clinic(clinic);
        }
        if let Some(phone_number) = self.phone_number {
            registration = registration.with_phone_number(phone_number);
        }
        if let Some(date_of_birth) = self.date_of_birth {
            registration = registration.with_date_of_birth(date_of_birth.to_string());
        }
        registration
    }
}

/// Arguments of `authorize`.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
pub struct AuthorizeArgs {
    /// Application path, e.g. `/admin/dashboard`.
    pub path: String,

    /// Sign-in screen path.
    #[arg(long, env = "MEDFLOW_LOGIN_PATH", default_value = DEFAULT_LOGIN_PATH)]
    pub login_path: String,

    /// Generic dashboard path.
    #[arg(long, env = "MEDFLOW_DASHBOARD_PATH", default_value = DEFAULT_DASHBOARD_PATH)]
    pub dashboard_path: String,
}

impl AuthorizeArgs {
    fn route_table(&self) -> RouteTable {
        let paths = RoutePaths::default()
            .with_login(&self.login_path)
            .with_dashboard(&self.dashboard_path);
        RouteTable::medflow(RouteGuard::new(paths))
    }
}

/// Arguments of `get`.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
pub struct GetArgs {
    /// Endpoint relative to the API base URL, e.g. `/patients/`.
    pub endpoint: String,

    /// Query parameters as `name=value`.
    #[arg(short, long = "query", value_parser = parse_query_pair)]
    pub query: Vec<(String, String)>,
}

fn parse_query_pair(value: &str) -> Result<(String, String), String> {
    value
        .split_once('=')
        .map(|(name, value)| (name.to_owned(), value.to_owned()))
        .ok_or_else(|| format!("expected name=value, got `{value}`"))
}

/// Arguments of `slots`.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
pub struct SlotsArgs {
    /// Doctor identifier.
    #[arg(long)]
    pub doctor: i64,

    /// Day to search, as `YYYY-MM-DD`.
    #[arg(long)]
    pub date: Date,

    /// Service whose duration sizes the slots.
    #[arg(long)]
    pub service: Option<i64>,
}

impl Command {
    /// Returns the subcommand name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Login(_) => "login",
            Self::Register(_) => "register",
            Self::Logout => "logout",
            Self::Whoami => "whoami",
            Self::Refresh => "refresh",
            Self::Authorize(_) => "authorize",
            Self::Get(_) => "get",
            Self::Slots(_) => "slots",
            Self::Doctors => "doctors",
        }
    }

    /// Runs the command and returns the text to print.
    ///
    /// Backend calls stop early with a cancellation error once `cancel` fires.
    pub async fn execute(self, client: &ApiClient, cancel: CancellationToken) -> anyhow::Result<String> {
        tracing::debug!(
            target: TRACING_TARGET_COMMAND,
            command = self.name(),
            "Running command"
        );

        match self {
            Self::Login(args) => {
                let credentials = Credentials::new(args.username, args.password);
                let session = client
                    .login_cancellable(credentials, cancel)
                    .await
                    .context("login failed")?;
                Ok(signed_in(&session))
            }
            Self::Register(args) => {
                let session = client
                    .register_cancellable(args.into_registration(), cancel)
                    .await
                    .context("registration failed")?;
                Ok(signed_in(&session))
            }
            Self::Logout => {
                let was_signed_in = client.is_authenticated();
                client.logout().await;
                Ok(if was_signed_in {
                    "Signed out".to_owned()
                } else {
                    "No session to sign out of".to_owned()
                })
            }
            Self::Whoami => Ok(match client.current_user() {
                Some(user) => format!("{} ({}, id {})", user.display_name(), user.role, user.id),
                None => "Not signed in".to_owned(),
            }),
            Self::Refresh => {
                client
                    .refresh_cancellable(cancel)
                    .await
                    .context("token refresh failed")?;
                Ok("Access token refreshed".to_owned())
            }
            Self::Authorize(args) => {
                let decision = args.route_table().resolve(&args.path, client.session());
                Ok(match decision {
                    RouteDecision::Allow => format!("allow {}", args.path),
                    RouteDecision::RedirectTo(target) => format!("redirect {target}"),
                })
            }
            Self::Get(args) => {
                let request = args
                    .query
                    .into_iter()
                    .fold(ApiRequest::get(args.endpoint), |request, (name, value)| {
                        request.with_query(name, value)
                    })
                    .with_cancellation(cancel);
                let response = client
                    .authenticated_request(request)
                    .await
                    .context("request failed")?;
                render_body(&response)
            }
            Self::Slots(args) => {
                let mut query = SlotQuery::new(args.doctor, args.date);
                if let Some(service) = args.service {
                    query = query.with_service(service);
                }
                let slots = client
                    .clone()
                    .with_cancellation(cancel)
                    .available_slots(query)
                    .await
                    .context("slot lookup failed")?;

                let free: Vec<String> = slots
                    .slots
                    .iter()
                    .filter(|slot| slot.available)
                    .map(|slot| slot.time.to_string())
                    .collect();
                Ok(if free.is_empty() {
                    "No free slots".to_owned()
                } else {
                    free.join("\n")
                })
            }
            Self::Doctors => {
                let doctors = client
                    .clone()
                    .with_cancellation(cancel)
                    .list_doctors()
                    .await
                    .context("doctor lookup failed")?;

                let lines: Vec<String> = doctors
                    .iter()
                    .map(|doctor| {
                        let specialization = doctor.specialization.as_deref().unwrap_or("-");
                        format!("{}\t{}\t{specialization}", doctor.id, doctor.display_name())
                    })
                    .collect();
                Ok(if lines.is_empty() {
                    "No doctors".to_owned()
                } else {
                    lines.join("\n")
                })
            }
        }
    }
}

fn signed_in(session: &Session) -> String {
    format!(
        "Signed in as {} ({})",
        session.user.display_name(),
        session.user.role
    )
}

fn render_body(response: &ApiResponse) -> anyhow::Result<String> {
    match response.json_value() {
        Some(value) => serde_json::to_string_pretty(&value).context("failed to format response"),
        None => Ok(response.text()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use medflow_core::mock::{MockReply, MockTransport};
    use medflow_core::{ErrorKind, Method};
    use medflow_session::{LOGIN_ENDPOINT, LOGOUT_ENDPOINT, MemoryStore, SessionManager};
    use serde_json::json;

    use super::*;

    fn client(transport: &MockTransport) -> ApiClient {
        let session =
            SessionManager::new(Arc::new(transport.clone()), Arc::new(MemoryStore::new())).unwrap();
        ApiClient::new(session)
    }

    fn login(username: &str) -> Command {
        Command::Login(LoginArgs {
            username: username.to_owned(),
            password: "pw".to_owned(),
        })
    }

    fn authorize(path: &str) -> Command {
        Command::Authorize(AuthorizeArgs {
            path: path.to_owned(),
            login_path: DEFAULT_LOGIN_PATH.to_owned(),
            dashboard_path: DEFAULT_DASHBOARD_PATH.to_owned(),
        })
    }

    fn push_login(transport: &MockTransport, role: &str) {
        transport.push(
            Method::Post,
            LOGIN_ENDPOINT,
            MockReply::json(
                200,
                json!({
                    "access": "A1",
                    "refresh": "R1",
                    "user": {
                        "id": 7,
                        "username": "alice",
                        "first_name": "Alice",
                        "last_name": "Martin",
                        "user_type": role,
                    },
                }),
            ),
        );
    }

    #[tokio::test]
    async fn test_login_then_whoami() {
        let transport = MockTransport::new();
        let client = client(&transport);
        push_login(&transport, "patient");

        let output = login("alice")
            .execute(&client, CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(output, "Signed in as Alice Martin (patient)");

        let output = Command::Whoami
            .execute(&client, CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(output, "Alice Martin (patient, id 7)");
    }

    #[tokio::test]
    async fn test_rejected_login_keeps_kind() {
        let transport = MockTransport::new();
        let client = client(&transport);
        transport.push(
            Method::Post,
            LOGIN_ENDPOINT,
            MockReply::json(401, json!({ "detail": "Identifiants invalides" })),
        );

        let error = login("alice")
            .execute(&client, CancellationToken::new())
            .await
            .unwrap_err();
        let cause = error.downcast_ref::<medflow_core::Error>().unwrap();
        assert_eq!(cause.kind, ErrorKind::InvalidCredentials);
        assert!(!client.is_authenticated());
    }

    #[tokio::test]
    async fn test_authorize_follows_role() {
        let transport = MockTransport::new();
        let client = client(&transport);

        let output = authorize("/admin/dashboard")
            .execute(&client, CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(output, "redirect /login");

        push_login(&transport, "doctor");
        login("alice")
            .execute(&client, CancellationToken::new())
            .await
            .unwrap();

        let output = authorize("/admin/dashboard")
            .execute(&client, CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(output, "redirect /doctor/dashboard");
    }

    #[tokio::test]
    async fn test_logout_clears_even_when_backend_fails() {
        let transport = MockTransport::new();
        let client = client(&transport);
        push_login(&transport, "patient");
        transport.push(Method::Post, LOGOUT_ENDPOINT, MockReply::NetworkError);

        login("alice")
            .execute(&client, CancellationToken::new())
            .await
            .unwrap();
        let output = Command::Logout
            .execute(&client, CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(output, "Signed out");
        assert!(!client.is_authenticated());
    }

    #[tokio::test]
    async fn test_get_renders_pretty_json_with_query() {
        let transport = MockTransport::new();
        let client = client(&transport);
        push_login(&transport, "patient");
        transport.push(
            Method::Get,
            "/appointments/",
            MockReply::json(200, json!([{ "id": 4 }])),
        );

        login("alice")
            .execute(&client, CancellationToken::new())
            .await
            .unwrap();
        let output = Command::Get(GetArgs {
            endpoint: "/appointments/".to_owned(),
            query: vec![("status".to_owned(), "confirmed".to_owned())],
        })
        .execute(&client, CancellationToken::new())
        .await
        .unwrap();

        assert_eq!(output, "[\n  {\n    \"id\": 4\n  }\n]");
        let sent = transport.requests_to(Method::Get, "/appointments/");
        assert_eq!(sent[0].bearer.as_deref(), Some("A1"));
        assert_eq!(sent[0].query, vec![("status".to_owned(), "confirmed".to_owned())]);
    }

    #[tokio::test]
    async fn test_get_without_session_is_unauthenticated() {
        let transport = MockTransport::new();
        let client = client(&transport);

        let error = Command::Get(GetArgs {
            endpoint: "/patients/".to_owned(),
            query: Vec::new(),
        })
        .execute(&client, CancellationToken::new())
        .await
        .unwrap_err();

        let cause = error.downcast_ref::<medflow_core::Error>().unwrap();
        assert_eq!(cause.kind, ErrorKind::Unauthenticated);
        assert!(transport.requests_to(Method::Get, "/patients/").is_empty());
    }

    #[tokio::test]
    async fn test_slots_lists_free_times_only() {
        let transport = MockTransport::new();
        let client = client(&transport);
        push_login(&transport, "patient");
        transport.push(
            Method::Get,
            "/appointments/available_slots/",
            MockReply::json(
                200,
                json!({ "slots": [
                    { "time": "2025-03-07T08:00:00Z", "available": true },
                    { "time": "2025-03-07T08:30:00Z", "available": false },
                ] }),
            ),
        );

        login("alice")
            .execute(&client, CancellationToken::new())
            .await
            .unwrap();
        let output = Command::Slots(SlotsArgs {
            doctor: 3,
            date: Date::constant(2025, 3, 7),
            service: None,
        })
        .execute(&client, CancellationToken::new())
        .await
        .unwrap();

        assert_eq!(output, "2025-03-07T08:00:00Z");
    }

    #[tokio::test]
    async fn test_cancelled_slots_keep_session() {
        let transport = MockTransport::new();
        let client = client(&transport);
        push_login(&transport, "patient");
        transport.push(
            Method::Get,
            "/appointments/available_slots/",
            MockReply::json(200, json!({ "slots": [] })),
        );

        login("alice")
            .execute(&client, CancellationToken::new())
            .await
            .unwrap();

        let cancel = CancellationToken::new();
        cancel.cancel();
        let error = Command::Slots(SlotsArgs {
            doctor: 3,
            date: Date::constant(2025, 3, 7),
            service: Some(5),
        })
        .execute(&client, cancel)
        .await
        .unwrap_err();

        let cause = error.downcast_ref::<medflow_core::Error>().unwrap();
        assert_eq!(cause.kind, ErrorKind::Cancelled);
        assert!(client.is_authenticated());
    }

    #[tokio::test]
    async fn test_doctors_lists_names_and_specialization() {
        let transport = MockTransport::new();
        let client = client(&transport);
        push_login(&transport, "patient");
        transport.push(
            Method::Get,
            "/doctors/",
            MockReply::json(
                200,
                json!([
                    { "id": 3, "user_full_name": "Gregory House", "specialization": "Diagnostics" },
                    { "id": 4, "user_full_name": "Lisa Cuddy" },
                ]),
            ),
        );

        login("alice")
            .execute(&client, CancellationToken::new())
            .await
            .unwrap();
        let output = Command::Doctors
            .execute(&client, CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(output, "3\tGregory House\tDiagnostics\n4\tLisa Cuddy\t-");
    }

    #[test]
    fn test_parse_query_pair() {
        assert_eq!(
            parse_query_pair("doctor_id=3").unwrap(),
            ("doctor_id".to_owned(), "3".to_owned())
        );
        assert!(parse_query_pair("doctor_id").is_err());
    }
}
