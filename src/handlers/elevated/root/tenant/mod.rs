// handlers/elevated/root/tenant/mod.rs - Tenant management handlers
//
// Administrative tenant lifecycle operations. Requires a JWT with root access.

pub mod create; // POST /api/root/tenants
pub mod delete; // DELETE /api/root/tenants/:id
pub mod list; // GET /api/root/tenants
pub mod show; // GET /api/root/tenants/:id

pub use create::tenant_create;
pub use delete::tenant_delete;
pub use list::tenant_list;
pub use show::tenant_show;
