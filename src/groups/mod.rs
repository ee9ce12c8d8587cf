mod models;
mod routes;
mod services;

pub use models::{Group, Membership, Role};
pub use routes::{routes, CreateGroupForm};
pub use services::{create_group, validation_message};
