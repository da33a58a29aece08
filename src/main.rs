use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use sqlx::PgPool;
use std::sync::Arc;

use taskhub::auth::TokenService;
use taskhub::config::Config;
use taskhub::repository::postgres::{init_schema, PgCredentialStore, PgTaskRepository};
use taskhub::repository::{CredentialStore, TaskRepository};
use taskhub::routes;
use taskhub::usecase::TaskUsecase;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    // Missing DATABASE_URL or JWT_SECRET aborts startup here.
    let config = Config::from_env();

    let pool = PgPool::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");
    init_schema(&pool)
        .await
        .expect("Failed to initialize database schema");

    let token_service = TokenService::new(&config.jwt_secret);
    let task_repo: Arc<dyn TaskRepository> = Arc::new(PgTaskRepository::new(pool.clone()));
    let credential_store: Arc<dyn CredentialStore> = Arc::new(PgCredentialStore::new(pool));
    let task_usecase = TaskUsecase::new(task_repo);

    log::info!("Starting TaskHub server at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(task_usecase.clone()))
            .app_data(web::Data::from(credential_store.clone()))
            .app_data(web::Data::new(token_service.clone()))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(|cfg| routes::config(cfg, token_service.clone()))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
