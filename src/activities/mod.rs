mod models;
mod routes;
mod rsvps;
mod services;

pub use models::Activity;
pub use routes::routes;
pub use rsvps::RsvpResponse;
