//!
//! # Persistence Abstractions
//!
//! The two capability interfaces of the persistence layer: [`TaskRepository`]
//! for task records and [`CredentialStore`] for user records. Each has one
//! production implementation backed by Postgres ([`postgres`]) and one
//! in-memory implementation used by tests ([`memory`]).
//!
//! Cross-request consistency (uniqueness enforcement, atomic update) is
//! delegated to the backend; the implementations hold no client-visible locks.

pub mod memory;
pub mod postgres;

use crate::error::AppError;
use crate::models::{NewUser, Task, User};
use async_trait::async_trait;
use uuid::Uuid;

/// Persistence contract for task records, keyed by a repository-assigned
/// unique identifier.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Returns every task in storage order. An empty collection is a success.
    async fn get_all(&self) -> Result<Vec<Task>, AppError>;

    /// Fails with `NotFound` when the identifier does not resolve.
    async fn get_by_id(&self, id: Uuid) -> Result<Task, AppError>;

    /// Ignores the identifier on the input, assigns a fresh one, and returns
    /// the stored record.
    async fn add(&self, task: Task) -> Result<Task, AppError>;

    /// Replaces the full record for an existing identifier and returns the
    /// post-update record. Fails with `NotFound` when the identifier does
    /// not resolve.
    async fn update(&self, task: Task) -> Result<Task, AppError>;

    /// Fails with `NotFound` when zero records matched.
    async fn delete(&self, id: Uuid) -> Result<(), AppError>;
}

/// Persistence contract for user records with username/email uniqueness.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Registers a new user: username uniqueness is checked before email,
    /// the password is hashed irreversibly, a fresh identifier is assigned,
    /// and the role defaults to "user" when unspecified. Fails with
    /// `DuplicateCredential` naming the colliding field.
    async fn register(&self, new_user: NewUser) -> Result<User, AppError>;

    /// Looks up by username (`NotFound` when absent) and verifies the
    /// password against the stored hash (`Unauthorized` on mismatch).
    /// Returns the stored record, including the role, for token issuance.
    async fn authenticate(&self, username: &str, password: &str) -> Result<User, AppError>;

    /// Fails with `NotFound` when the identifier does not resolve.
    async fn find_by_id(&self, id: Uuid) -> Result<User, AppError>;
}
