mod models;
mod routes;

pub use models::Profile;
pub use routes::routes;
