//! 管理后台会话
//!
//! 令牌由外部认证服务签发（HS256）。本服务只校验签名、过期时间与受众，
//! 再用 `sub` 查询角色表。未登录返回 401；已登录但不是管理员返回 404，
//! 不暴露管理接口的存在。

use crate::state::AppState;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use certverify_common::models::Role;
use certverify_common::{CertError, CertResult};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str, audience: Option<&str>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);
        match audience {
            Some(aud) => validation.set_audience(&[aud]),
            None => validation.validate_aud = false,
        }
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// 校验令牌并取出用户 id。
    pub fn verify(&self, token: &str) -> CertResult<Uuid> {
        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| {
            debug!(error = %e, "rejected session token");
            match e.kind() {
                ErrorKind::ExpiredSignature => CertError::unauthorized("session expired"),
                _ => CertError::unauthorized("invalid session token"),
            }
        })?;
        Uuid::parse_str(&data.claims.sub)
            .map_err(|_| CertError::unauthorized("invalid session subject"))
    }
}

pub fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// 已通过管理员校验的会话，作为处理函数参数显式传入。
#[derive(Debug, Clone, Copy)]
pub struct AdminSession {
    pub user_id: Uuid,
}

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = CertError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(bearer_token)
            .ok_or_else(|| CertError::unauthorized("missing bearer token"))?;
        let user_id = state.jwt.verify(token)?;

        if !state.store.has_role(user_id, Role::Admin).await? {
            debug!(user_id = %user_id, "non-admin user hit admin route");
            return Err(CertError::not_found("page"));
        }
        Ok(Self { user_id })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Claims;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{EncodingKey, Header, encode};
    use uuid::Uuid;

    pub const SECRET: &str = "test-secret-for-unit-testing-only";

    pub fn token_for(user_id: Uuid, aud: Option<&str>, ttl: Duration) -> String {
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (Utc::now() + ttl).timestamp() as u64,
            aud: aud.map(str::to_string),
            email: None,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{SECRET, token_for};
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("abc"), None);
    }

    #[test]
    fn test_valid_token_yields_user_id() {
        let verifier = JwtVerifier::new(SECRET, Some("authenticated"));
        let user = Uuid::new_v4();
        let token = token_for(user, Some("authenticated"), Duration::hours(1));
        assert_eq!(verifier.verify(&token).unwrap(), user);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let verifier = JwtVerifier::new(SECRET, Some("authenticated"));
        let token = token_for(Uuid::new_v4(), Some("authenticated"), Duration::hours(-2));
        let err = verifier.verify(&token).unwrap_err();
        assert!(matches!(err, CertError::Unauthorized(ref m) if m == "session expired"));
    }

    #[test]
    fn test_audience_check() {
        let token = token_for(Uuid::new_v4(), Some("anon"), Duration::hours(1));
        let strict = JwtVerifier::new(SECRET, Some("authenticated"));
        assert!(strict.verify(&token).is_err());

        let relaxed = JwtVerifier::new(SECRET, None);
        assert!(relaxed.verify(&token).is_ok());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let verifier = JwtVerifier::new("another-secret", None);
        let token = token_for(Uuid::new_v4(), None, Duration::hours(1));
        assert!(matches!(verifier.verify(&token), Err(CertError::Unauthorized(_))));
    }
}
