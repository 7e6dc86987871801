use std::sync::Arc;

use anyhow::Context;
use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::config;
use crate::database::context::DbContextFactory;
use crate::database::{
    DatabaseManager, NewTenant, PgSchemaManager, PgTenantCatalog, TenantFilter,
};
use crate::services::TenantService;

#[derive(Subcommand)]
pub enum TenantCommands {
    #[command(about = "List all tenants")]
    List,

    #[command(about = "Show tenant information")]
    Show {
        #[arg(help = "Tenant ID")]
        id: i32,
    },

    #[command(about = "Register a tenant and provision its database")]
    Create {
        #[arg(long, help = "Tenant display name")]
        name: String,
        #[arg(long, help = "Tenant subdomain")]
        subdomain: String,
        #[arg(long, help = "Database name (derived from the name when omitted)")]
        database: Option<String>,
    },

    #[command(about = "Remove a tenant and drop its database")]
    Delete {
        #[arg(help = "Tenant ID")]
        id: i32,
    },

    #[command(about = "Apply catalog migrations")]
    Migrate,
}

pub async fn handle(cmd: TenantCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let (service, catalog, pools) = connect().await?;

    let result = match cmd {
        TenantCommands::List => {
            let tenants = service.list().await?;
            if tenants.is_empty() {
                output_empty_collection(&output_format, "tenants", "No tenants registered")
            } else {
                output_tenants(&output_format, &tenants)
            }
        }
        TenantCommands::Show { id } => {
            let tenant = service.get(&TenantFilter::by_id(id)).await?;
            output_tenant(&output_format, &tenant)
        }
        TenantCommands::Create {
            name,
            subdomain,
            database,
        } => {
            let tenant = service
                .create(NewTenant {
                    name,
                    subdomain,
                    database_name: database,
                })
                .await?;
            output_success(
                &output_format,
                &format!("Created tenant {} ({})", tenant.id, tenant.database_name),
                Some(json!(tenant)),
            )
        }
        TenantCommands::Delete { id } => {
            let tenant = service.delete(&TenantFilter::by_id(id)).await?;
            output_success(
                &output_format,
                &format!("Deleted tenant {} and dropped {}", tenant.id, tenant.database_name),
                Some(json!(tenant)),
            )
        }
        TenantCommands::Migrate => {
            catalog.migrate().await?;
            output_success(&output_format, "Catalog is up to date", None)
        }
    };

    pools.close_all().await;
    result
}

async fn connect() -> anyhow::Result<(TenantService, PgTenantCatalog, DatabaseManager)> {
    let config = config::config();
    let catalog_url = config
        .database
        .catalog_url
        .as_deref()
        .context("CATALOG_DATABASE_URL (or DATABASE_URL) must be set")?;

    let pools = DatabaseManager::new(&config.database);
    let catalog = PgTenantCatalog::new(pools.pool(catalog_url).await?);
    let schema = Arc::new(PgSchemaManager::new(pools.clone()));
    let contexts = DbContextFactory::new(&config.tenancy, pools.clone(), schema);
    let service = TenantService::new(Arc::new(catalog.clone()), contexts);

    Ok((service, catalog, pools))
}
