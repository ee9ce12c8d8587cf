mod models;
mod routes;
mod services;

pub use models::PresidentTerm;
pub use routes::routes;
pub use services::{resolve_president, WeekWindow};
