pub mod auth;
pub mod health;
pub mod tasks;

use crate::auth::{AuthMiddleware, RequireRole, TokenService};
use actix_web::web;

/// Wires the HTTP surface: public registration/login and health, and the
/// protected `/tasks` scope behind the auth gate. PUT and DELETE on a task
/// additionally pass the admin role gate.
pub fn config(cfg: &mut web::ServiceConfig, token_service: TokenService) {
    cfg.service(health::health)
        .route("/register", web::post().to(auth::register))
        .route("/login", web::post().to(auth::login))
        .service(
            web::scope("/tasks")
                .wrap(AuthMiddleware::new(token_service))
                .service(
                    web::resource("")
                        .route(web::get().to(tasks::get_tasks))
                        .route(web::post().to(tasks::create_task)),
                )
                .service(
                    web::resource("/{id}")
                        .route(web::get().to(tasks::get_task))
                        .route(web::put().to(tasks::update_task).wrap(RequireRole::admin()))
                        .route(
                            web::delete().to(tasks::delete_task).wrap(RequireRole::admin()),
                        ),
                ),
        );
}
