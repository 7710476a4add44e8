use actix_web::dev::Payload;
use actix_web::{http::header, web, Error as ActixError, FromRequest, HttpRequest};
use futures::future::{ready, LocalBoxFuture};
use sqlx::PgPool;

use crate::auth::token::{Claims, TokenIssuer};
use crate::error::AppError;
use crate::models::User;
use crate::repository::users;

/// The user behind a valid access token.
///
/// Handlers that take this extractor require `Authorization: Bearer <token>`.
/// The token is verified with the `web::Data<TokenIssuer>` registered on the
/// app, then the subject is loaded through `web::Data<PgPool>`. A missing
/// header, a rejected token or a subject that no longer exists all produce
/// `AppError::Unauthorized`.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl AuthenticatedUser {
    pub fn id(&self) -> i32 {
        self.0.id
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ActixError; // AppError will be converted into ActixError via ResponseError
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let claims = match bearer_claims(req) {
            Ok(claims) => claims,
            Err(err) => return Box::pin(ready(Err(err.into()))),
        };
        let pool = req.app_data::<web::Data<PgPool>>().cloned();

        Box::pin(async move {
            let pool = pool.ok_or_else(|| {
                AppError::InternalServerError("Database pool is not configured".into())
            })?;
            let mut conn = pool.acquire().await.map_err(AppError::from)?;
            let user = users::find_by_username(&mut conn, &claims.sub)
                .await?
                .ok_or_else(|| AppError::Unauthorized("Invalid token".into()))?;
            Ok::<_, ActixError>(AuthenticatedUser(user))
        })
    }
}

/// Extracts the bearer token from the `Authorization` header.
pub fn bearer_token(req: &HttpRequest) -> Option<&str> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

/// Verifies the request's bearer token as an access token.
fn bearer_claims(req: &HttpRequest) -> Result<Claims, AppError> {
    let issuer = req
        .app_data::<web::Data<TokenIssuer>>()
        .ok_or_else(|| AppError::InternalServerError("Token issuer is not configured".into()))?;
    let token =
        bearer_token(req).ok_or_else(|| AppError::Unauthorized("Not authenticated".into()))?;
    issuer.decode_access_token(token)
}
