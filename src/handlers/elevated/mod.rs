// handlers/elevated/mod.rs - Elevated handlers (root access required)

pub mod root;
