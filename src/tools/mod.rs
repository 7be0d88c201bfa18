pub mod registry;
pub mod search;
