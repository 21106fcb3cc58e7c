//! REST client for the ticketing backend.
//!
//! Every endpoint is a JSON `POST`. Session tokens travel in the request body,
//! never in headers or URLs, so nothing sensitive lands in reqwest's request
//! logging.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{Agent, ApiError, LoginResponse, NewUser, Profile, TicketBackend};
use crate::config::{Config, validate_base_url};
use crate::error::{DeskError, Result};
use crate::session::Credentials;
use crate::stats::AgentStats;
use crate::ticket::{ParsedTickets, parse_tickets};
use crate::transition::TransitionRequest;
use crate::types::{Role, TicketStatus};
use crate::utils::truncate_string;

const AUTHENTICATE: &str = "/admin/authenticate/";
const ALL_TICKETS: &str = "/admin/getAllTickets";
const MY_TICKETS: &str = "/ticket/getMyTickets";
const UPDATE_TICKET: &str = "/ticket/updateTicket";
const GET_AGENTS: &str = "/admin/getAgents";
const DELETE_PROFILE: &str = "/admin/deleteProfile";
const MY_STATS: &str = "/ticket/getMyStats";
const NOTIFICATIONS: &str = "/ticket/ticketNotifications";
const FORGET_PASSWORD: &str = "/admin/forget-password";
const PROFILE_DATA: &str = "/admin/getProfileData";
const UPDATE_PROFILE: &str = "/admin/updateProfile";
const EDIT_PROFILE: &str = "/admin/editProfile";

/// Longest slice of an error body echoed back to the user
const MAX_ERROR_BODY: usize = 200;

#[derive(Serialize)]
struct EmailBody<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct TokenBody<'a> {
    token: &'a str,
}

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateTicketBody<'a> {
    ticket_id: &'a str,
    status: TicketStatus,
    token: &'a str,
    reply: &'a str,
}

/// Body shared by the admin's edit and delete calls
#[derive(Serialize)]
struct AgentBody<'a> {
    token: &'a str,
    agent: &'a Agent,
}

#[derive(Serialize)]
struct UpdateProfileBody<'a> {
    #[serde(flatten)]
    profile: &'a Profile,
    password: &'a str,
}

/// HTTP implementation of [`TicketBackend`]
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a client for `base_url` with the given total request timeout.
    ///
    /// The connect timeout is the smaller of `timeout` and ten seconds.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let parsed = validate_base_url(base_url)?;
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .build()?;

        Ok(Self {
            client,
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.effective_base_url(), config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST `body` and fail on network errors or non-2xx statuses
    async fn send<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> std::result::Result<Response, ApiError> {
        tracing::debug!("POST {}", path);

        let response = self
            .client
            .post(self.endpoint(path))
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::new(describe_send_error(&e), path))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = if text.trim().is_empty() {
                "request failed".to_string()
            } else {
                truncate_string(text.trim(), MAX_ERROR_BODY)
            };
            tracing::debug!("POST {} failed with {}", path, status);
            return Err(ApiError::with_status(message, path, status));
        }

        Ok(response)
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response> {
        Ok(self.send(path, body).await?)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.post(path, body).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::new(format!("failed to read response: {e}"), path))?;
        serde_json::from_slice(&bytes).map_err(|e| {
            DeskError::Api(format!("{path}: unexpected response body: {e}"))
        })
    }

    /// Exchange an email and password for a session
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Credentials> {
        let body = LoginBody { email, password };
        let response = match self.send(AUTHENTICATE, &body).await {
            Ok(response) => response,
            Err(e) if e.is_auth() => {
                return Err(DeskError::Auth("invalid email or password".to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        let login: LoginResponse = response.json().await.map_err(|e| {
            DeskError::Api(format!("{AUTHENTICATE}: unexpected response body: {e}"))
        })?;

        if login.token.trim().is_empty() {
            return Err(DeskError::Auth("login response carried no token".to_string()));
        }

        tracing::info!("Authenticated {}", email);
        Ok(login.into_credentials(email))
    }

    pub async fn fetch_agents(&self, credentials: &Credentials) -> Result<Vec<Agent>> {
        self.post_json(
            GET_AGENTS,
            &TokenBody {
                token: credentials.token(),
            },
        )
        .await
    }

    pub async fn delete_agent(&self, agent: &Agent, credentials: &Credentials) -> Result<()> {
        let body = AgentBody {
            token: credentials.token(),
            agent,
        };
        self.post(DELETE_PROFILE, &body).await?;
        tracing::info!("Deleted agent {}", agent.email);
        Ok(())
    }

    /// Send the admin's changes to an agent and return the record as stored
    pub async fn edit_agent(&self, agent: &Agent, credentials: &Credentials) -> Result<Agent> {
        let body = AgentBody {
            token: credentials.token(),
            agent,
        };
        let updated: Agent = self.post_json(EDIT_PROFILE, &body).await?;
        tracing::info!("Edited agent {}", updated.email);
        Ok(updated)
    }

    /// Contact details of the signed-in user.
    ///
    /// A profile without an email address gets the session's.
    pub async fn fetch_profile(&self, credentials: &Credentials) -> Result<Profile> {
        let mut profile: Profile = self
            .post_json(
                PROFILE_DATA,
                &EmailBody {
                    email: &credentials.email,
                },
            )
            .await?;
        if profile.email.trim().is_empty() {
            profile.email = credentials.email.clone();
        }
        Ok(profile)
    }

    /// Save the signed-in user's profile. A blank `password` keeps the current one.
    pub async fn update_profile(&self, profile: &Profile, password: &str) -> Result<()> {
        let body = UpdateProfileBody { profile, password };
        self.post(UPDATE_PROFILE, &body).await?;
        tracing::info!("Updated profile for {}", profile.email);
        Ok(())
    }

    pub async fn create_user(&self, user: &NewUser) -> Result<()> {
        user.ensure_valid()?;
        self.post(user.endpoint(), user).await?;
        tracing::info!("Created {} account {}", user.role, user.username);
        Ok(())
    }

    pub async fn fetch_agent_stats(&self, credentials: &Credentials) -> Result<AgentStats> {
        self.post_json(
            MY_STATS,
            &TokenBody {
                token: credentials.token(),
            },
        )
        .await
    }

    /// Tickets recently touched for the session's agent
    pub async fn fetch_notifications(&self, credentials: &Credentials) -> Result<ParsedTickets> {
        let body: Value = self
            .post_json(
                NOTIFICATIONS,
                &EmailBody {
                    email: &credentials.email,
                },
            )
            .await?;
        parse_tickets(body)
    }

    /// Ask the backend to mail a password reset link
    pub async fn request_password_reset(&self, email: &str) -> Result<()> {
        match self.send(FORGET_PASSWORD, &EmailBody { email }).await {
            Ok(_) => Ok(()),
            Err(e) if e.status == Some(StatusCode::NOT_FOUND) => Err(DeskError::Other(format!(
                "no user found with email address '{email}'"
            ))),
            Err(e) => Err(e.into()),
        }
    }
}

/// Ticket list endpoint for a role
pub fn tickets_endpoint(role: Role) -> &'static str {
    match role {
        Role::Admin => ALL_TICKETS,
        Role::Agent => MY_TICKETS,
    }
}

fn describe_send_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_connect() {
        "could not connect to the ticketing backend".to_string()
    } else {
        error.to_string()
    }
}

impl TicketBackend for HttpBackend {
    async fn fetch_tickets(&self, credentials: &Credentials) -> Result<ParsedTickets> {
        let path = tickets_endpoint(credentials.role);
        let body: Value = self
            .post_json(
                path,
                &EmailBody {
                    email: &credentials.email,
                },
            )
            .await?;
        let parsed = parse_tickets(body)?;
        tracing::debug!(
            "Fetched {} tickets ({} warnings, {} skipped)",
            parsed.tickets.len(),
            parsed.warnings.len(),
            parsed.skipped()
        );
        Ok(parsed)
    }

    async fn update_ticket(
        &self,
        request: &TransitionRequest,
        credentials: &Credentials,
    ) -> Result<()> {
        let body = UpdateTicketBody {
            ticket_id: request.ticket_id().as_str(),
            status: request.target_status(),
            token: credentials.token(),
            reply: request.reply().unwrap_or_default(),
        };
        self.post(UPDATE_TICKET, &body).await?;
        tracing::info!(
            "Ticket {} {}",
            request.ticket_id(),
            request.action().past_tense()
        );
        Ok(())
    }
}
