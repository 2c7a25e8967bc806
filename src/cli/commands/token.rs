use clap::Subcommand;
use serde_json::json;

use crate::auth::{TokenIssuer, TokenValidator};
use crate::cli::{
    utils::{output_error, output_success},
    OutputFormat,
};
use crate::config::AppConfig;
use crate::types::UserIdentity;

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Sign an access token with the configured JWT_SECRET")]
    Issue {
        #[arg(help = "User name")]
        user_name: String,
        #[arg(long, help = "Numeric user id")]
        user_id: i64,
    },

    #[command(about = "Validate an access token and print its identity")]
    Verify {
        #[arg(help = "Access token (without the Bearer prefix)")]
        token: String,
    },
}

pub fn handle(
    cmd: TokenCommands,
    config: &AppConfig,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        TokenCommands::Issue { user_name, user_id } => {
            let identity = UserIdentity::new(user_id, user_name);
            let token = TokenIssuer::new(&config.security).issue(&identity)?;

            output_success(
                output_format,
                &format!("Issued token for '{}'", identity.user_name),
                Some(json!({
                    "accessToken": token.token,
                    "expiresIn": token.expires_in,
                })),
            )
        }
        TokenCommands::Verify { token } => {
            match TokenValidator::new(&config.security).validate(&token) {
                Ok(identity) => output_success(
                    output_format,
                    "Token is valid",
                    Some(json!({
                        "userId": identity.user_id,
                        "userName": identity.user_name,
                    })),
                ),
                Err(reason) => {
                    output_error(output_format, &reason.to_string(), Some("UNAUTHORIZED"))?;
                    anyhow::bail!("token rejected")
                }
            }
        }
    }
}
