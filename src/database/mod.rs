pub mod catalog;
pub mod connection;
pub mod context;
pub mod filter;
pub mod manager;
pub mod memory;
pub mod models;
pub mod schema;

pub use catalog::{PgTenantCatalog, TenantCatalog};
pub use connection::build_connection_string;
pub use context::{DbContextFactory, TenantDbContext, UnboundDbContext};
pub use filter::TenantFilter;
pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryTenantCatalog;
pub use models::{NewTenant, Tenant};
pub use schema::{PgSchemaManager, SchemaManager};
