use clap::{Parser, Subcommand, ValueEnum};
use owo_colors::OwoColorize;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use ticketdesk::commands::{
    CreateUserOptions, cmd_agents, cmd_config_get, cmd_config_set, cmd_config_show,
    cmd_create_user, cmd_dashboard, cmd_delete_agent, cmd_edit_agent, cmd_login, cmd_logout,
    cmd_my_stats, cmd_notifications, cmd_profile, cmd_reopen, cmd_reset_password, cmd_resolve,
    cmd_show, cmd_tickets, cmd_update_profile, cmd_view, cmd_whoami,
};
use ticketdesk::filter::FilterBucket;
use ticketdesk::remote::{AgentChanges, Gender, ProfileChanges};
use ticketdesk::types::Role;

#[derive(Parser)]
#[command(name = "ticketdesk")]
#[command(about = "Customer support ticket dashboard")]
#[command(version)]
struct Cli {
    /// Log line format on stderr
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session
    Login {
        /// Account email
        email: String,

        /// Password (read from stdin if not provided)
        #[arg(long)]
        password: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove the stored session
    Logout {
        #[arg(long)]
        json: bool,
    },

    /// Show the logged-in account
    Whoami {
        #[arg(long)]
        json: bool,
    },

    /// Request a password reset email
    ResetPassword {
        email: String,

        #[arg(long)]
        json: bool,
    },

    /// Open a dashboard panel (falls back to the role's default)
    View {
        /// Panel name, e.g. tickets, agents, create-user
        page: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// List tickets
    #[command(visible_alias = "ls")]
    Tickets {
        /// Status filter: all, new, open, closed (case-insensitive)
        #[arg(short, long, default_value = "all")]
        filter: FilterBucket,

        /// Case-insensitive text matched against subject, body and category
        #[arg(short, long)]
        search: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Display a ticket with its replies
    #[command(visible_alias = "s")]
    Show {
        /// Ticket ID
        id: String,

        #[arg(long)]
        json: bool,
    },

    /// Mark a NEW or OPEN ticket as closed
    Resolve {
        /// Ticket ID
        id: String,

        /// Reply recorded with the transition
        #[arg(short, long)]
        reply: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Move a CLOSED ticket back to open
    Reopen {
        /// Ticket ID
        id: String,

        /// Reply recorded with the transition
        #[arg(short, long)]
        reply: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Ticket counts by status and priority (admin)
    Dashboard {
        #[arg(long)]
        json: bool,
    },

    /// Your solved versus received ticket counts (agent)
    MyStats {
        #[arg(long)]
        json: bool,
    },

    /// Recently updated tickets (agent)
    Notifications {
        #[arg(long)]
        json: bool,
    },

    /// Show your profile
    Profile {
        #[arg(long)]
        json: bool,
    },

    /// Change your profile; unset fields keep their current value
    UpdateProfile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        state: Option<String>,
        #[arg(long)]
        zip: Option<String>,
        #[arg(long)]
        country: Option<String>,
        /// New password, at least 6 characters
        #[arg(long)]
        password: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// List agents (admin)
    Agents {
        /// Match name, username or email
        #[arg(short, long)]
        search: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Edit an agent's name, email or phone (admin)
    EditAgent {
        /// Agent ID
        id: String,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Delete an agent account (admin)
    DeleteAgent {
        /// Agent ID
        id: String,

        #[arg(long)]
        json: bool,
    },

    /// Create an agent or admin account (admin)
    CreateUser {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        username: String,
        /// At least 6 characters
        #[arg(long)]
        password: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        address: String,
        #[arg(long)]
        city: String,
        #[arg(long)]
        state: String,
        #[arg(long)]
        zip: String,
        #[arg(long)]
        country: String,
        /// admin or agent
        #[arg(long, default_value = "agent")]
        role: Role,
        /// male, female or other
        #[arg(long, default_value = "male")]
        gender: Gender,

        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show {
        #[arg(long)]
        json: bool,
    },
    /// Print one configuration value
    Get {
        /// base_url, timeout or default_role
        key: String,
        #[arg(long)]
        json: bool,
    },
    /// Set a configuration value
    Set {
        key: String,
        value: String,
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let _ = match format {
        LogFormat::Text => registry.with(layer).try_init(),
        LogFormat::Json => registry.with(layer.json()).try_init(),
    };
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let result = match cli.command {
        Commands::Login {
            email,
            password,
            json,
        } => cmd_login(&email, password, json).await,
        Commands::Logout { json } => cmd_logout(json),
        Commands::Whoami { json } => cmd_whoami(json),
        Commands::ResetPassword { email, json } => cmd_reset_password(&email, json).await,
        Commands::View { page, json } => cmd_view(page.as_deref(), json).await,
        Commands::Tickets {
            filter,
            search,
            json,
        } => cmd_tickets(filter, search, json).await,
        Commands::Show { id, json } => cmd_show(&id, json).await,
        Commands::Resolve { id, reply, json } => cmd_resolve(&id, reply, json).await,
        Commands::Reopen { id, reply, json } => cmd_reopen(&id, reply, json).await,
        Commands::Dashboard { json } => cmd_dashboard(json).await,
        Commands::MyStats { json } => cmd_my_stats(json).await,
        Commands::Notifications { json } => cmd_notifications(json).await,
        Commands::Agents { search, json } => cmd_agents(search, json).await,
        Commands::Profile { json } => cmd_profile(json).await,
        Commands::UpdateProfile {
            name,
            phone,
            address,
            city,
            state,
            zip,
            country,
            password,
            json,
        } => {
            let changes = ProfileChanges {
                name,
                phone,
                address,
                city,
                state,
                zip,
                country,
            };
            cmd_update_profile(changes, password, json).await
        }
        Commands::EditAgent {
            id,
            first_name,
            email,
            phone,
            json,
        } => {
            let changes = AgentChanges {
                first_name,
                email,
                phone,
            };
            cmd_edit_agent(&id, changes, json).await
        }
        Commands::DeleteAgent { id, json } => cmd_delete_agent(&id, json).await,
        Commands::CreateUser {
            first_name,
            username,
            password,
            email,
            phone,
            address,
            city,
            state,
            zip,
            country,
            role,
            gender,
            json,
        } => {
            let options = CreateUserOptions {
                first_name,
                username,
                password,
                email,
                phone,
                address,
                city,
                state,
                zip,
                country,
                role,
                gender,
            };
            cmd_create_user(options, json).await
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { json } => cmd_config_show(json),
            ConfigAction::Get { key, json } => cmd_config_get(&key, json),
            ConfigAction::Set { key, value, json } => cmd_config_set(&key, &value, json),
        },
    };

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "error:".red(), e);
            ExitCode::FAILURE
        }
    }
}
