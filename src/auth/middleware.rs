use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::{errors::AppError, state::AppState, users::Profile};

use super::claims::decode_claims;

/// The caller as every handler sees it: the internal profile key, not the
/// external auth id the token carries.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub pk: i64,
    pub auth_id: String,
    pub name: String,
}

pub async fn jwt_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(bearer) = bearer.ok_or_else(|| {
        AppError::Unauthenticated("Missing or invalid authorization header".to_owned())
    })?;

    let claims = decode_claims(bearer.token(), state.domain(), &state.keys.decoding)?;

    let profile = Profile::find_by_auth_id(&state.primary_database, &claims.sub)
        .await?
        .ok_or_else(|| {
            AppError::Unauthenticated(
                "User profile not found. Please complete registration.".to_owned(),
            )
        })?;

    request.extensions_mut().insert(CurrentUser {
        pk: profile.pk,
        auth_id: profile.auth_id,
        name: profile.name,
    });

    Ok(next.run(request).await)
}
