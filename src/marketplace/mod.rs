mod models;
mod routes;
mod store;

pub use models::{Bundle, HireRequest, Organizer};
pub use routes::routes;
pub use store::{InMemoryOrganizers, OrganizerStore};
