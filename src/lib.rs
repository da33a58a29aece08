#![doc = "The `taskhub` library crate."]
#![doc = ""]
#![doc = "This crate contains the domain models, authentication mechanisms, persistence"]
#![doc = "abstractions, the task use-case layer, routing configuration, and error handling"]
#![doc = "for the TaskHub service. It is used by the main binary (`main.rs`) to construct"]
#![doc = "and run the application."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod routes;
pub mod usecase;
