use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, StatusCode},
};
use uuid::Uuid;

use super::jwt::{Claims, JwtKeys};
use crate::state::AppState;

pub const AUTH_COOKIE: &str = "authToken";

/// Pulls the session token out of the `authToken` cookie, falling back to a
/// bearer Authorization header for non-browser clients.
pub fn token_from_headers(parts: &Parts) -> Option<&str> {
    let cookie_token = parts
        .headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|cookies| {
            cookies.split(';').find_map(|c| {
                c.trim().strip_prefix(AUTH_COOKIE).and_then(|rest| rest.strip_prefix('='))
            })
        });
    cookie_token.or_else(|| {
        parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|auth| auth.strip_prefix("Bearer "))
    })
}

pub fn verify_request(parts: &Parts, state: &AppState) -> Option<Claims> {
    let token = token_from_headers(parts)?;
    JwtKeys::from_ref(state).verify(token).ok()
}

/// Extracts and validates the session token, returning the user ID.
pub struct AuthUser(pub Uuid);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = (StatusCode, String);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = verify_request(parts, state)
            .ok_or((StatusCode::UNAUTHORIZED, "invalid or missing token".into()))?;
        Ok(AuthUser(claims.sub))
    }
}

/// Like [`AuthUser`] but only admits the configured admin account. Used for
/// editing public recipes.
#[derive(Debug)]
pub struct AdminUser(pub Uuid);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = (StatusCode, String);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = verify_request(parts, state)
            .ok_or((StatusCode::UNAUTHORIZED, "invalid or missing token".into()))?;
        if state.config.admin_email.is_empty() || claims.email != state.config.admin_email {
            return Err((
                StatusCode::FORBIDDEN,
                "only the admin account can edit public recipes".into(),
            ));
        }
        Ok(AdminUser(claims.sub))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(header_name: header::HeaderName, value: &str) -> Parts {
        let (parts, ()) = Request::builder()
            .header(header_name, value)
            .body(())
            .expect("request")
            .into_parts();
        parts
    }

    #[test]
    fn cookie_token_is_found_between_other_cookies() {
        let parts = parts_with(header::COOKIE, "theme=dark; authToken=abc.def.ghi; lang=ru");
        assert_eq!(token_from_headers(&parts), Some("abc.def.ghi"));
    }

    #[test]
    fn bearer_header_is_a_fallback() {
        let parts = parts_with(header::AUTHORIZATION, "Bearer tok-123");
        assert_eq!(token_from_headers(&parts), Some("tok-123"));
    }

    #[test]
    fn missing_token_yields_none() {
        let parts = parts_with(header::COOKIE, "theme=dark");
        assert_eq!(token_from_headers(&parts), None);
    }

    #[tokio::test]
    async fn admin_extractor_rejects_non_admin_email() {
        let state = AppState::fake();
        let keys = JwtKeys::from_ref(&state);
        let token = keys.sign(Uuid::new_v4(), "someone@example.com").unwrap();
        let mut parts = parts_with(header::AUTHORIZATION, &format!("Bearer {token}"));
        let err = AdminUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert_eq!(err.0, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn admin_extractor_accepts_configured_email() {
        let state = AppState::fake();
        let keys = JwtKeys::from_ref(&state);
        let user_id = Uuid::new_v4();
        let token = keys.sign(user_id, "admin@example.com").unwrap();
        let mut parts = parts_with(header::AUTHORIZATION, &format!("Bearer {token}"));
        let AdminUser(id) = AdminUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert_eq!(id, user_id);
    }
}
