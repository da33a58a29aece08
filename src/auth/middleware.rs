use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    Error, HttpMessage, ResponseError,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::token::TokenService;
use crate::error::AppError;

/// Identity and role attached to the request context by [`AuthMiddleware`]
/// after a successful token validation.
#[derive(Debug, Clone)]
pub struct AuthClaims {
    pub username: String,
    pub role: String,
}

/// The auth gate. Wraps every protected route, requires a well-formed bearer
/// `Authorization` header, validates the token, and injects [`AuthClaims`]
/// into the request extensions. Validation detail is logged internally and
/// never leaked to the caller.
pub struct AuthMiddleware {
    token_service: TokenService,
}

impl AuthMiddleware {
    pub fn new(token_service: TokenService) -> Self {
        Self { token_service }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            token_service: self.token_service.clone(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    token_service: TokenService,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let auth_header = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        let header_value = match auth_header {
            Some(value) => value,
            None => {
                let app_err = AppError::Unauthorized("Authorization header required".into());
                return Box::pin(async move { Ok(error_service_response(req, app_err)) });
            }
        };

        // Exactly two space-separated parts, scheme case-insensitively "bearer".
        let parts: Vec<&str> = header_value.split(' ').collect();
        if parts.len() != 2 || !parts[0].eq_ignore_ascii_case("bearer") {
            let app_err = AppError::Unauthorized("Invalid Authorization header format".into());
            return Box::pin(async move { Ok(error_service_response(req, app_err)) });
        }

        match self.token_service.validate(parts[1]) {
            Ok(claims) => {
                req.extensions_mut().insert(AuthClaims {
                    username: claims.username,
                    role: claims.role,
                });
                let fut = self.service.call(req);
                Box::pin(async move { Ok(fut.await?.map_into_left_body()) })
            }
            Err(token_err) => {
                // Log the validation detail; the caller only sees a generic 401.
                log::warn!("rejected token on {}: {}", req.path(), token_err);
                let app_err = AppError::Unauthorized("Invalid or expired token".into());
                Box::pin(async move { Ok(error_service_response(req, app_err)) })
            }
        }
    }
}

/// Turns an [`AppError`] into the same HTTP response its `ResponseError`
/// conversion would produce, packaged as the middleware's `ServiceResponse`.
fn error_service_response<B>(req: ServiceRequest, err: AppError) -> ServiceResponse<EitherBody<B>> {
    let (req, _payload) = req.into_parts();
    let response = err.error_response().map_into_right_body();
    ServiceResponse::new(req, response)
}

/// Role gate, composed after [`AuthMiddleware`] on routes that require a
/// specific role. A missing role in the request context (the auth gate did
/// not run) is itself a `Forbidden`.
pub struct RequireRole {
    role: &'static str,
}

impl RequireRole {
    pub fn new(role: &'static str) -> Self {
        Self { role }
    }

    pub fn admin() -> Self {
        Self::new("admin")
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RequireRoleService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleService {
            service,
            role: self.role,
        }))
    }
}

pub struct RequireRoleService<S> {
    service: S,
    role: &'static str,
}

impl<S, B> Service<ServiceRequest> for RequireRoleService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let granted = req
            .extensions()
            .get::<AuthClaims>()
            .map(|claims| claims.role.clone());

        match granted {
            Some(role) if role == self.role => {
                let fut = self.service.call(req);
                Box::pin(async move { Ok(fut.await?.map_into_left_body()) })
            }
            Some(_) => {
                let app_err = AppError::Forbidden(format!(
                    "Access denied. Requires '{}' role.",
                    self.role
                ));
                Box::pin(async move { Ok(error_service_response(req, app_err)) })
            }
            None => {
                let app_err = AppError::Forbidden("User role not found in context".into());
                Box::pin(async move { Ok(error_service_response(req, app_err)) })
            }
        }
    }
}
