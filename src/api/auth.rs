use std::future::{Ready, ready};

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web::Data};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::api::job::service::ServiceError;

/// Claims carried by an access token
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub sub: String,
    pub is_admin: bool,
    pub exp: usize,
}

/// Token verification key shared across server workers, derived from the
/// configured secret (HS256).
pub struct AuthKeys {
    decoding: DecodingKey,
}

impl AuthKeys {
    pub fn from_secret(secret: &str) -> Self {
        Self {
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// Extractor proving the caller is an authenticated admin.
///
/// Runs before the handler body, so a failed check never reaches the
/// repository. Fails closed: a missing header, a malformed or expired token,
/// and a valid token without the admin claim are all rejected alike.
#[derive(Debug)]
pub struct AdminUser {
    pub username: String,
}

impl FromRequest for AdminUser {
    type Error = ServiceError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(admin_from_request(req))
    }
}

fn admin_from_request(req: &HttpRequest) -> Result<AdminUser, ServiceError> {
    let keys = req.app_data::<Data<AuthKeys>>().ok_or_else(|| {
        ServiceError::Unauthorized("authorization is not configured".to_string())
    })?;

    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ServiceError::Unauthorized("missing bearer token".to_string()))?;

    let token = header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
        .ok_or_else(|| ServiceError::Unauthorized("missing bearer token".to_string()))?;

    let token_data = decode::<Claims>(token, &keys.decoding, &Validation::new(Algorithm::HS256))
        .map_err(|_| ServiceError::Unauthorized("invalid token".to_string()))?;

    if !token_data.claims.is_admin {
        return Err(ServiceError::Unauthorized("admin role required".to_string()));
    }

    Ok(AdminUser {
        username: token_data.claims.sub,
    })
}

#[cfg(test)]
pub(crate) fn token_for(username: &str, is_admin: bool, secret: &str) -> String {
    use jsonwebtoken::{EncodingKey, Header, encode};

    let claims = Claims {
        sub: username.to_string(),
        is_admin,
        // 2100-01-01, far enough out for any test run
        exp: 4102444800,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;

    use super::*;

    const SECRET: &str = "test-secret";

    fn request_with_token(token: Option<&str>) -> HttpRequest {
        let mut req = TestRequest::default().app_data(Data::new(AuthKeys::from_secret(SECRET)));
        if let Some(token) = token {
            req = req.insert_header((header::AUTHORIZATION, format!("Bearer {}", token)));
        }
        req.to_http_request()
    }

    #[test]
    fn accepts_admin_token() {
        let token = token_for("admin", true, SECRET);
        let admin = admin_from_request(&request_with_token(Some(&token))).unwrap();
        assert_eq!(admin.username, "admin");
    }

    #[test]
    fn rejects_non_admin_token() {
        let token = token_for("user", false, SECRET);
        let result = admin_from_request(&request_with_token(Some(&token)));
        assert!(matches!(result, Err(ServiceError::Unauthorized(_))));
    }

    #[test]
    fn rejects_missing_header() {
        let result = admin_from_request(&request_with_token(None));
        assert!(matches!(result, Err(ServiceError::Unauthorized(_))));
    }

    #[test]
    fn rejects_token_signed_with_wrong_secret() {
        let token = token_for("admin", true, "other-secret");
        let result = admin_from_request(&request_with_token(Some(&token)));
        assert!(matches!(result, Err(ServiceError::Unauthorized(_))));
    }

    #[test]
    fn rejects_garbage_token() {
        let result = admin_from_request(&request_with_token(Some("not.a.jwt")));
        assert!(matches!(result, Err(ServiceError::Unauthorized(_))));
    }
}
