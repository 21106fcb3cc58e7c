use owo_colors::OwoColorize;
use serde_json::json;

use super::{CommandOutput, backend, session};
use crate::error::Result;
use crate::remote::{Gender, NewUser};
use crate::types::Role;

/// Fields of the account creation form, as given on the command line
pub struct CreateUserOptions {
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

impl From<CreateUserOptions> for NewUser {
    fn from(options: CreateUserOptions) -> Self {
        NewUser {
            first_name: options.first_name,
            username: options.username,
            password: options.password,
            email: options.email,
            phone: options.phone,
            address: options.address,
            city: options.city,
            state: options.state,
            zip: options.zip,
            country: options.country,
            role: options.role,
            gender: options.gender,
        }
    }
}

/// Create an agent or admin account. Admins only.
///
/// The form is validated locally and every problem reported at once before
/// anything is sent.
pub async fn cmd_create_user(options: CreateUserOptions, output_json: bool) -> Result<()> {
    let credentials = session()?;
    credentials.require_role(Role::Admin)?;

    let user = NewUser::from(options);
    user.ensure_valid()?;
    backend()?.create_user(&user).await?;

    CommandOutput::new(json!({
        "username": user.username,
        "email": user.email,
        "role": user.role,
        "created": true,
    }))
    .with_text(format!(
        "Created {} account {} ({})",
        user.role,
        user.username.cyan(),
        user.email
    ))
    .print(output_json)
}
