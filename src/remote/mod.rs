//! Ticketing backend client.
//!
//! `TicketBackend` is the seam the ticket panel talks through; `HttpBackend`
//! implements it over the REST API, and tests substitute in-memory backends.
//! The remaining types mirror the backend's user and login payloads.

pub mod error;
pub mod http;

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{DeskError, Result};
use crate::session::Credentials;
use crate::ticket::ParsedTickets;
use crate::transition::TransitionRequest;
use crate::types::Role;

pub use error::ApiError;
pub use http::HttpBackend;

/// Common interface for ticket sources
pub trait TicketBackend: Send + Sync {
    /// Fetch the ticket collection visible to the session's role
    fn fetch_tickets(
        &self,
        credentials: &Credentials,
    ) -> impl std::future::Future<Output = Result<ParsedTickets>> + Send;

    /// Ask the backend to apply a status transition
    fn update_ticket(
        &self,
        request: &TransitionRequest,
        credentials: &Credentials,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Reply to a successful login
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub role: String,
}

impl LoginResponse {
    pub fn into_credentials(self, email: impl Into<String>) -> Credentials {
        let role = Role::from_login(&self.role);
        Credentials::new(email, self.token, role)
    }
}

/// A support agent or admin account as listed by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    #[serde(default, deserialize_with = "id_text")]
    pub id: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub local_date: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub enabled: bool,
}

fn id_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

impl Agent {
    /// Case-insensitive match against name, username and email
    pub fn matches_search(&self, term: &str) -> bool {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [&self.first_name, &self.username, &self.email]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    pub fn display_name(&self) -> &str {
        if !self.first_name.trim().is_empty() {
            &self.first_name
        } else {
            &self.username
        }
    }

    /// City, state and country joined, skipping blanks
    pub fn location(&self) -> String {
        [&self.city, &self.state, &self.country]
            .iter()
            .filter_map(|part| part.as_deref())
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Swap the listed agent sharing `updated`'s id for `updated`.
///
/// Returns false, leaving the list alone, when no listed agent has that id.
pub fn replace_agent(agents: &mut [Agent], updated: Agent) -> bool {
    let Some(id) = updated.id.clone() else {
        return false;
    };
    match agents.iter_mut().find(|a| a.id.as_deref() == Some(id.as_str())) {
        Some(slot) => {
            *slot = updated;
            true
        }
        None => false,
    }
}

/// The signed-in user's own contact details
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, deserialize_with = "text_or_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub email: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub phone: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub address: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub city: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub state: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub zip: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub country: String,
}

fn text_or_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

/// Profile fields to change; `None` keeps the current value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        *self == ProfileChanges::default()
    }
}

impl Profile {
    /// Overlay `changes`. The email address is never changed here.
    pub fn apply(&mut self, changes: ProfileChanges) {
        let fields = [
            (&mut self.name, changes.name),
            (&mut self.phone, changes.phone),
            (&mut self.address, changes.address),
            (&mut self.city, changes.city),
            (&mut self.state, changes.state),
            (&mut self.zip, changes.zip),
            (&mut self.country, changes.country),
        ];
        for (slot, value) in fields {
            if let Some(value) = value {
                *slot = value.trim().to_string();
            }
        }
    }
}

/// Changes an admin makes to a listed agent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentChanges {
    pub first_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl AgentChanges {
    pub fn is_empty(&self) -> bool {
        *self == AgentChanges::default()
    }
}

impl Agent {
    /// Overlay `changes`, rejecting an email that fails the account form rule
    pub fn apply(&mut self, changes: AgentChanges) -> Result<()> {
        if let Some(email) = &changes.email
            && !EMAIL_REGEX.is_match(email.trim())
        {
            return Err(DeskError::Validation(format!("email: Email is invalid ('{email}')")));
        }
        if let Some(first_name) = changes.first_name {
            self.first_name = first_name.trim().to_string();
        }
        if let Some(email) = changes.email {
            self.email = email.trim().to_string();
        }
        if let Some(phone) = changes.phone {
            self.phone = Some(phone.trim().to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Gender {
    #[default]
    Male,
    Female,
    Other,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
            Gender::Other => write!(f, "other"),
        }
    }
}

impl FromStr for Gender {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            _ => Err(DeskError::Validation(format!(
                "gender '{s}' must be one of: male, female, other"
            ))),
        }
    }
}

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email regex should be valid"));

pub const MIN_PASSWORD_LEN: usize = 6;

/// Account creation form
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub first_name: String,
    pub username: String,
    pub password: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
    pub role: Role,
    pub gender: Gender,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("first_name", &self.first_name)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("email", &self.email)
            .field("role", &self.role)
            .field("gender", &self.gender)
            .finish_non_exhaustive()
    }
}

/// One rejected form field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn require(
    errors: &mut Vec<FieldError>,
    field: &'static str,
    value: &str,
    message: &'static str,
) {
    if value.trim().is_empty() {
        errors.push(FieldError { field, message });
    }
}

impl NewUser {
    /// Every problem with the form, in field order. Empty when valid.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        require(&mut errors, "first_name", &self.first_name, "First name is required");
        require(&mut errors, "username", &self.username, "Username is required");
        require(&mut errors, "password", &self.password, "Password is required");

        if !self.password.trim().is_empty() && self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.push(FieldError {
                field: "password",
                message: "Password must be at least 6 characters",
            });
        }

        require(&mut errors, "email", &self.email, "Email is required");
        if !self.email.trim().is_empty() && !EMAIL_REGEX.is_match(&self.email) {
            errors.push(FieldError {
                field: "email",
                message: "Email is invalid",
            });
        }

        require(&mut errors, "phone", &self.phone, "Phone is required");
        require(&mut errors, "address", &self.address, "Address is required");
        require(&mut errors, "city", &self.city, "City is required");
        require(&mut errors, "state", &self.state, "State is required");
        require(&mut errors, "zip", &self.zip, "ZIP code is required");
        require(&mut errors, "country", &self.country, "Country is required");

        errors
    }

    pub fn ensure_valid(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            return Ok(());
        }
        Err(DeskError::Validation(
            errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; "),
        ))
    }

    /// Endpoint that creates an account of this role
    pub fn endpoint(&self) -> &'static str {
        match self.role {
            Role::Admin => "/admin/createAdmin",
            Role::Agent => "/admin/createAgent",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_user() -> NewUser {
        NewUser {
            first_name: "Dana".to_string(),
            username: "dana".to_string(),
            password: "hunter22".to_string(),
            email: "dana@example.com".to_string(),
            phone: "555-0100".to_string(),
            address: "1 Main St".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            zip: "62701".to_string(),
            country: "US".to_string(),
            role: Role::Agent,
            gender: Gender::Female,
        }
    }

    #[test]
    fn test_valid_user_passes() {
        assert!(valid_user().validate().is_empty());
        assert!(valid_user().ensure_valid().is_ok());
    }

    #[test]
    fn test_short_password_and_bad_email() {
        let mut user = valid_user();
        user.password = "abc".to_string();
        user.email = "dana-at-example".to_string();

        let errors = user.validate();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].message, "Password must be at least 6 characters");
        assert_eq!(errors[1].message, "Email is invalid");
    }

    #[test]
    fn test_blank_fields_are_required() {
        let mut user = valid_user();
        user.first_name = " ".to_string();
        user.zip = String::new();

        let err = user.ensure_valid().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("First name is required"));
        assert!(message.contains("ZIP code is required"));
    }

    #[test]
    fn test_blank_form_reports_fields_in_order() {
        let mut user = valid_user();
        for field in [
            &mut user.first_name,
            &mut user.username,
            &mut user.password,
            &mut user.email,
            &mut user.phone,
            &mut user.address,
            &mut user.city,
            &mut user.state,
            &mut user.zip,
            &mut user.country,
        ] {
            field.clear();
        }

        let fields: Vec<&str> = user.validate().iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "first_name", "username", "password", "email", "phone", "address", "city",
                "state", "zip", "country"
            ]
        );
        assert!(user.validate().iter().all(|e| e.message != "Email is invalid"));
    }

    #[test]
    fn test_endpoint_by_role() {
        let mut user = valid_user();
        assert_eq!(user.endpoint(), "/admin/createAgent");
        user.role = Role::Admin;
        assert_eq!(user.endpoint(), "/admin/createAdmin");
    }

    #[test]
    fn test_new_user_wire_format() {
        let json = serde_json::to_value(valid_user()).unwrap();
        assert_eq!(json["firstName"], "Dana");
        assert_eq!(json["role"], "AGENT");
        assert_eq!(json["gender"], "FEMALE");
        assert!(!format!("{:?}", valid_user()).contains("hunter22"));
    }

    #[test]
    fn test_agent_deserialize_and_search() {
        let agent: Agent = serde_json::from_str(
            r#"{"id": 12, "firstName": "Sam", "username": "sam.k", "email": "sam@desk.io",
                "role": "AGENT", "localDate": "2024-02-01", "city": "Oslo",
                "country": "NO", "state": null, "enabled": true}"#,
        )
        .unwrap();

        assert_eq!(agent.id.as_deref(), Some("12"));
        assert_eq!(agent.location(), "Oslo, NO");
        assert!(agent.matches_search("SAM"));
        assert!(agent.matches_search("desk.io"));
        assert!(!agent.matches_search("billing"));
        assert!(agent.matches_search(""));
    }

    #[test]
    fn test_login_response_role_mapping() {
        let login: LoginResponse =
            serde_json::from_str(r#"{"token": "abc", "role": "ADMIN"}"#).unwrap();
        let creds = login.into_credentials("boss@example.com");
        assert_eq!(creds.role, Role::Admin);
        assert_eq!(creds.token(), "abc");

        let login: LoginResponse = serde_json::from_str(r#"{"token": "xyz"}"#).unwrap();
        assert_eq!(login.into_credentials("a@example.com").role, Role::Agent);
    }

    fn listed(id: &str, name: &str) -> Agent {
        Agent {
            id: Some(id.to_string()),
            first_name: name.to_string(),
            username: name.to_lowercase(),
            email: format!("{}@desk.io", name.to_lowercase()),
            role: "AGENT".to_string(),
            local_date: None,
            gender: None,
            phone: None,
            address: None,
            city: None,
            state: None,
            zip: None,
            country: None,
            enabled: true,
        }
    }

    #[test]
    fn test_replace_agent_by_id() {
        let mut agents = vec![listed("1", "Sam"), listed("2", "Kim")];
        let mut updated = listed("2", "Kimberly");
        updated.phone = Some("555-0199".to_string());

        assert!(replace_agent(&mut agents, updated.clone()));
        assert_eq!(agents[1], updated);
        assert_eq!(agents[0].first_name, "Sam");

        assert!(!replace_agent(&mut agents, listed("9", "Ghost")));
        let mut anonymous = listed("1", "Nobody");
        anonymous.id = None;
        assert!(!replace_agent(&mut agents, anonymous));
        assert_eq!(agents.len(), 2);
        assert_eq!(agents[0].first_name, "Sam");
    }

    #[test]
    fn test_agent_apply_checks_email() {
        let mut agent = listed("1", "Sam");
        let err = agent
            .apply(AgentChanges {
                first_name: Some("Samuel".to_string()),
                email: Some("sam-at-desk".to_string()),
                phone: None,
            })
            .unwrap_err();
        assert!(err.to_string().contains("Email is invalid"));
        assert_eq!(agent.first_name, "Sam");

        agent
            .apply(AgentChanges {
                first_name: Some(" Samuel ".to_string()),
                email: None,
                phone: Some("555-0100".to_string()),
            })
            .unwrap();
        assert_eq!(agent.first_name, "Samuel");
        assert_eq!(agent.email, "sam@desk.io");
        assert_eq!(agent.phone.as_deref(), Some("555-0100"));
    }

    #[test]
    fn test_profile_lenient_fields_and_apply() {
        let mut profile: Profile = serde_json::from_str(
            r#"{"name": "Ana", "email": "ana@example.com", "zip": 62701, "city": null}"#,
        )
        .unwrap();
        assert_eq!(profile.zip, "62701");
        assert_eq!(profile.city, "");

        profile.apply(ProfileChanges {
            city: Some("Springfield".to_string()),
            ..ProfileChanges::default()
        });
        assert_eq!(profile.city, "Springfield");
        assert_eq!(profile.name, "Ana");
        assert!(ProfileChanges::default().is_empty());
    }

    #[test]
    fn test_gender_from_str() {
        assert_eq!("FEMALE".parse::<Gender>().unwrap(), Gender::Female);
        assert!("unknown".parse::<Gender>().is_err());
    }
}
