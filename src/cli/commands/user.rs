use anyhow::Context;
use clap::Subcommand;
use serde_json::json;

use crate::auth::{register_user, PasswordHasher, RegistrationError};
use crate::cli::{
    utils::{output_error, output_success},
    OutputFormat,
};
use crate::config::AppConfig;
use crate::database::{DatabaseManager, PgStore};

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "Create a user account directly in the database")]
    Create {
        #[arg(help = "User name")]
        user_name: String,
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Password")]
        password: String,
    },
}

pub async fn handle(
    cmd: UserCommands,
    config: &AppConfig,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        UserCommands::Create {
            user_name,
            email,
            password,
        } => {
            let pool = DatabaseManager::connect(&config.database)
                .await
                .context("failed to connect to database")?;
            let store = PgStore::new(pool);
            let hasher = PasswordHasher::new();

            match register_user(&store, &hasher, &user_name, &email, &password).await {
                Ok(identity) => output_success(
                    output_format,
                    &format!("User '{}' created", identity.user_name),
                    Some(json!({
                        "userId": identity.user_id,
                        "userName": identity.user_name,
                        "email": email,
                    })),
                ),
                Err(RegistrationError::Duplicate(name)) => {
                    output_error(
                        output_format,
                        &format!("User name '{}' is already taken", name),
                        Some("CONFLICT"),
                    )?;
                    anyhow::bail!("user was not created")
                }
                Err(e) => Err(e.into()),
            }
        }
    }
}
