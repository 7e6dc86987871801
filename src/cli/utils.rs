use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::database::models::Tenant;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let Some(data_value) = data {
                response["data"] = data_value;
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an empty collection in the appropriate format
pub fn output_empty_collection(
    output_format: &OutputFormat,
    collection_name: &str,
    message: &str,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ collection_name: [] }))?);
        }
        OutputFormat::Text => {
            println!("{}", message);
        }
    }
    Ok(())
}

/// Print tenants as a table or JSON array
pub fn output_tenants(output_format: &OutputFormat, tenants: &[Tenant]) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ "tenants": tenants }))?);
        }
        OutputFormat::Text => {
            println!("{:<6} {:<25} {:<20} {}", "ID", "NAME", "SUBDOMAIN", "DATABASE");
            println!("{}", "-".repeat(75));
            for tenant in tenants {
                println!(
                    "{:<6} {:<25} {:<20} {}",
                    tenant.id, tenant.name, tenant.subdomain, tenant.database_name
                );
            }
        }
    }
    Ok(())
}

/// Print a single tenant
pub fn output_tenant(output_format: &OutputFormat, tenant: &Tenant) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(tenant)?);
        }
        OutputFormat::Text => {
            println!("ID:        {}", tenant.id);
            println!("Name:      {}", tenant.name);
            println!("Subdomain: {}", tenant.subdomain);
            println!("Database:  {}", tenant.database_name);
        }
    }
    Ok(())
}
