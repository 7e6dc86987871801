// handlers/mod.rs - 3-Tier Handler Architecture
//
// Public (no auth) → Protected (JWT auth + tenant resolution) → Elevated (root JWT auth)
pub mod elevated; // Tier 3: Root JWT authentication required (/api/root/*)
pub mod protected; // Tier 2: JWT authentication and tenant resolution (/api/*)
pub mod public; // Tier 1: No authentication required
