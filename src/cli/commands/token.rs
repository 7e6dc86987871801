use clap::Subcommand;
use serde_json::json;

use crate::auth::{generate_jwt, Claims, ROOT_ACCESS};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config;

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Sign a token with the configured JWT secret")]
    Issue {
        #[arg(long, help = "Subject (user) of the token")]
        subject: String,
        #[arg(long, help = "Tenant id to put into the tenant claim")]
        tenant: Option<i32>,
        #[arg(long, help = "Grant root access for tenant administration")]
        root: bool,
        #[arg(long, help = "Lifetime in hours (defaults to configured expiry)")]
        hours: Option<u64>,
    },
}

pub fn handle(cmd: TokenCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let config = config::config();

    match cmd {
        TokenCommands::Issue {
            subject,
            tenant,
            root,
            hours,
        } => {
            let access = if root { ROOT_ACCESS } else { "user" };
            let mut claims = Claims::new(
                subject,
                access,
                hours.unwrap_or(config.security.jwt_expiry_hours),
            );
            if let Some(tenant_id) = tenant {
                claims = claims.with_claim(&config.tenancy.tenant_claim, tenant_id.to_string());
            }

            let token = generate_jwt(&claims, &config.security.jwt_secret)?;
            match output_format {
                OutputFormat::Json => output_success(
                    &output_format,
                    "Token issued",
                    Some(json!({ "token": token, "expires_at": claims.exp })),
                ),
                OutputFormat::Text => {
                    println!("{}", token);
                    Ok(())
                }
            }
        }
    }
}
