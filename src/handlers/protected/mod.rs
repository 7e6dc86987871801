// handlers/protected/mod.rs - Protected handlers
//
// Route Prefix: /api/tenant/*
// Middleware: JWT validation, then tenant resolution

pub mod tenant;

pub use tenant::{tenant_current, tenant_ping};
