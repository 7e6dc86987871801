pub mod tenant;
pub mod token;
