use crate::{
    auth::{AuthResponse, LoginRequest, RegisterRequest, TokenService},
    error::AppError,
    models::NewUser,
    repository::CredentialStore,
};
use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use validator::Validate;

/// Register a new user
///
/// Creates a new user account. The password is hashed by the credential
/// store and never returned.
pub async fn register(
    store: web::Data<dyn CredentialStore>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    // Validate input
    register_data.validate()?;

    let register_data = register_data.into_inner();
    let new_user = NewUser {
        username: register_data.username,
        password: register_data.password,
        email: register_data.email,
        role: register_data.role,
    };

    let user = store.register(new_user).await?;
    log::info!("registered user {}", user.username);

    Ok(HttpResponse::Created().json(json!({
        "message": "User registered successfully"
    })))
}

/// Login user
///
/// Authenticates a user and returns a signed session token carrying the
/// identity and role claims.
pub async fn login(
    store: web::Data<dyn CredentialStore>,
    token_service: web::Data<TokenService>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    // Validate input
    login_data.validate()?;

    let user = store
        .authenticate(&login_data.username, &login_data.password)
        .await
        .map_err(|err| match err {
            // Whether the username exists is not revealed to the caller.
            AppError::NotFound(_) | AppError::Unauthorized(_) => {
                AppError::Unauthorized("Invalid credentials".into())
            }
            other => other,
        })?;

    let token = token_service.issue(&user)?;

    Ok(HttpResponse::Ok().json(AuthResponse { token }))
}
