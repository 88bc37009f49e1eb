use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth;
use crate::authz::LoginUser;

/// Caller identity resolved once per request: the login user, or `None`
/// for an anonymous request.
#[derive(Clone, Debug)]
pub struct SessionUser(pub Option<LoginUser>);

/// Resolves the caller from the bearer session token and injects it into
/// the request extensions. This middleware never rejects a request by
/// itself: allow/deny belongs to the access decision functions, which also
/// need to see anonymous callers. An invalid or expired token is the same
/// as no token.
pub async fn resolve_session(headers: HeaderMap, mut request: Request, next: Next) -> Response {
    let login_user = bearer_token(&headers).and_then(|token| {
        match auth::verify_session_token(&token) {
            Ok(claims) => Some(claims.login_user()),
            Err(e) => {
                tracing::debug!("discarding session token: {}", e);
                None
            }
        }
    });

    request.extensions_mut().insert(SessionUser(login_user));
    next.run(request).await
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth_header = headers
        .get("authorization")
        .or_else(|| headers.get("Authorization"))?;

    let token = auth_header.to_str().ok()?.strip_prefix("Bearer ")?;
    if token.trim().is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_token_requires_the_bearer_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Basic abc"));
        assert!(bearer_token(&headers).is_none());

        headers.insert("authorization", HeaderValue::from_static("Bearer abc"));
        assert_eq!(bearer_token(&headers).as_deref(), Some("abc"));
    }

    #[test]
    fn empty_bearer_token_is_absent() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer   "));
        assert!(bearer_token(&headers).is_none());
    }
}
