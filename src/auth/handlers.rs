use axum::{
    extract::{FromRef, Query, State},
    http::{header, request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect},
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthUrlResponse, CallbackQuery, LogoutResponse, MeResponse, PublicUser},
        extractors::{verify_request, AUTH_COOKIE},
        google::GoogleClient,
        jwt::JwtKeys,
        repo::User,
    },
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/google/url", get(google_url))
        .route("/auth/google/callback", get(google_callback))
        .route("/auth/me", get(me))
        .route("/auth/logout", post(logout))
}

/// Callback address as seen by the browser; honors the proxy protocol
/// header so the URL survives TLS termination.
fn redirect_uri(headers: &HeaderMap) -> String {
    let proto = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("http");
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost:8080");
    format!("{proto}://{host}/api/auth/google/callback")
}

#[instrument(skip(state, headers))]
pub async fn google_url(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<AuthUrlResponse> {
    let client = GoogleClient::new(&state.config.google);
    Json(AuthUrlResponse {
        auth_url: client.auth_url(&redirect_uri(&headers)),
    })
}

#[instrument(skip(state, headers, query))]
pub async fn google_callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<CallbackQuery>,
) -> impl IntoResponse {
    let error_redirect = format!("{}?auth=error", state.config.frontend_url);

    let Some(code) = query.code else {
        warn!("callback without authorization code");
        return Redirect::temporary(&error_redirect).into_response();
    };

    let client = GoogleClient::new(&state.config.google);
    let redirect = redirect_uri(&headers);

    let access_token = match client.exchange_code(&code, &redirect).await {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "google code exchange failed");
            return Redirect::temporary(&error_redirect).into_response();
        }
    };

    let info = match client.fetch_user_info(&access_token).await {
        Ok(i) => i,
        Err(e) => {
            error!(error = %e, "google userinfo failed");
            return Redirect::temporary(&error_redirect).into_response();
        }
    };

    let user = match User::upsert_from_google(&state.db, &info).await {
        Ok(u) => u,
        Err(e) => {
            error!(error = %e, "user upsert failed");
            return Redirect::temporary(&error_redirect).into_response();
        }
    };

    let keys = JwtKeys::from_ref(&state);
    let token = match keys.sign(user.id, &user.email) {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "jwt sign failed");
            return Redirect::temporary(&error_redirect).into_response();
        }
    };

    info!(user_id = %user.id, email = %user.email, "user logged in via google");
    let cookie = format!(
        "{AUTH_COOKIE}={token}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        keys.ttl.as_secs()
    );
    (
        [(header::SET_COOKIE, cookie)],
        Redirect::temporary(&state.config.frontend_url),
    )
        .into_response()
}

#[instrument(skip(state, parts))]
pub async fn me(State(state): State<AppState>, parts: Parts) -> Json<MeResponse> {
    let Some(claims) = verify_request(&parts, &state) else {
        return Json(MeResponse {
            authenticated: false,
            user: None,
        });
    };

    match User::find_by_id(&state.db, claims.sub).await {
        Ok(Some(user)) => Json(MeResponse {
            authenticated: true,
            user: Some(PublicUser {
                id: user.id,
                email: user.email,
                name: user.name,
                picture: user.picture,
            }),
        }),
        Ok(None) => Json(MeResponse {
            authenticated: false,
            user: None,
        }),
        Err(e) => {
            error!(error = %e, user_id = %claims.sub, "me lookup failed");
            Json(MeResponse {
                authenticated: false,
                user: None,
            })
        }
    }
}

#[instrument]
pub async fn logout() -> impl IntoResponse {
    let cookie = format!("{AUTH_COOKIE}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0");
    (
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(LogoutResponse { success: true }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirect_uri_prefers_forwarded_proto() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, "meals.example.com".parse().unwrap());
        headers.insert("x-forwarded-proto", "https".parse().unwrap());
        assert_eq!(
            redirect_uri(&headers),
            "https://meals.example.com/api/auth/google/callback"
        );
    }

    #[test]
    fn redirect_uri_defaults_to_local_http() {
        assert_eq!(
            redirect_uri(&HeaderMap::new()),
            "http://localhost:8080/api/auth/google/callback"
        );
    }

    #[test]
    fn me_response_hides_absent_user() {
        let json = serde_json::to_string(&MeResponse {
            authenticated: false,
            user: None,
        })
        .unwrap();
        assert_eq!(json, r#"{"authenticated":false}"#);
    }
}
