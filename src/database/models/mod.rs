pub mod tenant;

pub use tenant::{NewTenant, Tenant};
