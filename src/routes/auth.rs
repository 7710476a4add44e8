use crate::{
    auth::{
        hash_password, verify_against_dummy, verify_password, LoginForm, RefreshRequest,
        RegisterRequest, TokenIssuer,
    },
    error::AppError,
    repository::users::{self, NewUser},
};
use actix_web::{post, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

/// Register a new user
///
/// Creates a new user account and returns the public user record.
///
/// ## Responses:
/// - `201 Created`: the new `User`.
/// - `400 Bad Request`: the username or email is already registered, or the body is malformed.
/// - `422 Unprocessable Entity`: the body failed validation.
#[post("/register")]
pub async fn register(
    pool: web::Data<PgPool>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;
    let request = register_data.into_inner();

    let mut conn = pool.acquire().await?;
    if users::username_exists(&mut conn, &request.username).await? {
        return Err(AppError::BadRequest("Username already registered".into()));
    }
    if users::email_exists(&mut conn, &request.email).await? {
        return Err(AppError::BadRequest("Email already registered".into()));
    }
    // Release the connection while bcrypt runs.
    drop(conn);

    let password = request.password.clone();
    let password_hash = web::block(move || hash_password(&password)).await??;

    let mut tx = pool.begin().await?;
    let user = users::create(
        &mut tx,
        NewUser {
            username: &request.username,
            email: &request.email,
            password_hash: &password_hash,
            full_name: request.full_name.as_deref(),
        },
    )
    .await?;
    tx.commit().await?;

    log::info!("registered user {} (id {})", user.username, user.id);
    Ok(HttpResponse::Created().json(user))
}

/// Login user
///
/// Checks a username/password form and returns a fresh access and refresh token pair.
///
/// ## Responses:
/// - `200 OK`: a `TokenPair`.
/// - `401 Unauthorized`: unknown username or wrong password. No token is issued.
#[post("/token")]
pub async fn login(
    pool: web::Data<PgPool>,
    issuer: web::Data<TokenIssuer>,
    login_data: web::Form<LoginForm>,
) -> Result<impl Responder, AppError> {
    let LoginForm { username, password } = login_data.into_inner();

    let mut conn = pool.acquire().await?;
    let credentials = users::find_credentials_by_username(&mut conn, &username).await?;
    drop(conn);

    let credentials = match credentials {
        Some(credentials) => credentials,
        None => {
            // Unknown usernames pay the bcrypt cost too.
            web::block(move || verify_against_dummy(&password)).await?;
            return Err(AppError::Unauthorized("Incorrect username or password".into()));
        }
    };

    let password_hash = credentials.password_hash.clone();
    let valid = web::block(move || verify_password(&password, &password_hash)).await?;
    if !valid {
        return Err(AppError::Unauthorized("Incorrect username or password".into()));
    }

    let tokens = issuer.create_token_pair(&credentials.username)?;
    log::debug!("issued tokens for user id {}", credentials.id);
    Ok(HttpResponse::Ok().json(tokens))
}

/// Refresh tokens
///
/// Exchanges a valid refresh token, given as the `refresh_token` query parameter or
/// in a JSON body, for a new token pair for the same subject. The presented token
/// stays valid until it expires.
///
/// ## Responses:
/// - `200 OK`: a `TokenPair`.
/// - `401 Unauthorized`: the token is invalid, expired, or not a refresh token.
/// - `422 Unprocessable Entity`: no refresh token was supplied.
#[post("/refresh-token")]
pub async fn refresh_token(
    issuer: web::Data<TokenIssuer>,
    query: web::Query<RefreshRequest>,
    body: Option<web::Json<RefreshRequest>>,
) -> Result<impl Responder, AppError> {
    let token = query
        .into_inner()
        .refresh_token
        .or_else(|| body.and_then(|body| body.into_inner().refresh_token))
        .ok_or_else(|| AppError::ValidationError("refresh_token is required".into()))?;

    let claims = issuer.decode_refresh_token(&token)?;
    let tokens = issuer.create_token_pair(&claims.sub)?;
    Ok(HttpResponse::Ok().json(tokens))
}
