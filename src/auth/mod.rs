mod claims;
mod middleware;

pub use claims::{create_token, decode_claims, AuthClaims, Keys};
pub use middleware::{jwt_middleware, CurrentUser};
