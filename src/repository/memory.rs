use crate::auth::password::{hash_password, verify_password};
use crate::error::AppError;
use crate::models::{NewUser, Task, User};
use crate::repository::{CredentialStore, TaskRepository};
use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory `TaskRepository` used by tests. Insertion order is storage order.
#[derive(Default)]
pub struct MemoryTaskRepository {
    tasks: RwLock<Vec<Task>>,
}

impl MemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskRepository for MemoryTaskRepository {
    async fn get_all(&self) -> Result<Vec<Task>, AppError> {
        Ok(self.tasks.read().await.clone())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Task, AppError> {
        self.tasks
            .read()
            .await
            .iter()
            .find(|task| task.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("task not found".into()))
    }

    async fn add(&self, mut task: Task) -> Result<Task, AppError> {
        task.id = Uuid::new_v4();
        self.tasks.write().await.push(task.clone());
        Ok(task)
    }

    async fn update(&self, task: Task) -> Result<Task, AppError> {
        let mut tasks = self.tasks.write().await;
        match tasks.iter_mut().find(|stored| stored.id == task.id) {
            Some(stored) => {
                *stored = task.clone();
                Ok(task)
            }
            None => Err(AppError::NotFound("task not found".into())),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut tasks = self.tasks.write().await;
        let before = tasks.len();
        tasks.retain(|task| task.id != id);
        if tasks.len() == before {
            return Err(AppError::NotFound("task not found".into()));
        }
        Ok(())
    }
}

/// In-memory `CredentialStore` used by tests. Mirrors the production
/// uniqueness semantics: username is checked before email.
#[derive(Default)]
pub struct MemoryCredentialStore {
    users: RwLock<Vec<User>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn register(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.username == new_user.username) {
            return Err(AppError::DuplicateCredential("username".into()));
        }
        if users.iter().any(|u| u.email == new_user.email) {
            return Err(AppError::DuplicateCredential("email".into()));
        }

        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username,
            password_hash: hash_password(&new_user.password)?,
            email: new_user.email,
            role: new_user.role.unwrap_or_default(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn authenticate(&self, username: &str, password: &str) -> Result<User, AppError> {
        let user = self
            .users
            .read()
            .await
            .iter()
            .find(|u| u.username == username)
            .cloned()
            .ok_or_else(|| AppError::NotFound("user not found".into()))?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::Unauthorized("invalid credentials".into()));
        }
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<User, AppError> {
        self.users
            .read()
            .await
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("user not found".into()))
    }
}
