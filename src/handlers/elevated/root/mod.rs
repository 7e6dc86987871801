// handlers/elevated/root/mod.rs - Root administration

pub mod tenant;
