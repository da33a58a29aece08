use crate::auth::password::{hash_password, verify_password};
use crate::error::AppError;
use crate::models::{NewUser, Role, Task, TaskStatus, User};
use crate::repository::{CredentialStore, TaskRepository};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

/// Creates the tables and the unique indexes on username and email. Must
/// succeed before the service accepts any registration; a failure here is
/// startup-fatal.
pub async fn init_schema(pool: &PgPool) -> Result<(), AppError> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS tasks (
             id UUID PRIMARY KEY,
             title TEXT NOT NULL,
             description TEXT NOT NULL DEFAULT '',
             due_date DATE NOT NULL,
             status TEXT NOT NULL
         )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users (
             id UUID PRIMARY KEY,
             username TEXT NOT NULL,
             password_hash TEXT NOT NULL,
             email TEXT NOT NULL,
             role TEXT NOT NULL DEFAULT 'user'
         )",
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE UNIQUE INDEX IF NOT EXISTS users_username_key ON users (username)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE UNIQUE INDEX IF NOT EXISTS users_email_key ON users (email)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Persistence model for a task row. Status is stored as text; a row whose
/// status no longer parses is a corrupt record.
#[derive(Debug, sqlx::FromRow)]
struct TaskRow {
    id: Uuid,
    title: String,
    description: String,
    due_date: NaiveDate,
    status: String,
}

impl TaskRow {
    fn into_task(self) -> Result<Task, AppError> {
        let status = self.status.parse::<TaskStatus>().map_err(|_| {
            AppError::CorruptRecord(format!(
                "task {} has unrecognized status '{}'",
                self.id, self.status
            ))
        })?;
        Ok(Task {
            id: self.id,
            title: self.title,
            description: self.description,
            due_date: self.due_date,
            status,
        })
    }
}

/// Persistence model for a user row.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    password_hash: String,
    email: String,
    role: String,
}

impl UserRow {
    fn into_user(self) -> Result<User, AppError> {
        let role = self.role.parse::<Role>().map_err(|_| {
            AppError::CorruptRecord(format!(
                "user {} has unrecognized role '{}'",
                self.id, self.role
            ))
        })?;
        Ok(User {
            id: self.id,
            username: self.username,
            password_hash: self.password_hash,
            email: self.email,
            role,
        })
    }
}

const SELECT_TASK: &str = "SELECT id, title, description, due_date, status FROM tasks";
const SELECT_USER: &str = "SELECT id, username, password_hash, email, role FROM users";

/// Decodes a fetched batch into domain tasks. The first row that fails to
/// decode aborts the whole batch; partial results are not an acceptable
/// substitute for a clear failure.
fn decode_tasks(rows: Vec<TaskRow>) -> Result<Vec<Task>, AppError> {
    rows.into_iter().map(TaskRow::into_task).collect()
}

/// Production `TaskRepository` backed by Postgres.
pub struct PgTaskRepository {
    pool: PgPool,
}

impl PgTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn get_all(&self) -> Result<Vec<Task>, AppError> {
        let rows = sqlx::query_as::<_, TaskRow>(SELECT_TASK)
            .fetch_all(&self.pool)
            .await?;

        decode_tasks(rows)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Task, AppError> {
        let row = sqlx::query_as::<_, TaskRow>(&format!("{} WHERE id = $1", SELECT_TASK))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => row.into_task(),
            None => Err(AppError::NotFound("task not found".into())),
        }
    }

    async fn add(&self, task: Task) -> Result<Task, AppError> {
        // The identifier on the input is ignored; the repository assigns one.
        let id = Uuid::new_v4();
        let row = sqlx::query_as::<_, TaskRow>(
            "INSERT INTO tasks (id, title, description, due_date, status)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, title, description, due_date, status",
        )
        .bind(id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.due_date)
        .bind(task.status.as_str())
        .fetch_one(&self.pool)
        .await?;

        row.into_task()
    }

    async fn update(&self, task: Task) -> Result<Task, AppError> {
        let row = sqlx::query_as::<_, TaskRow>(
            "UPDATE tasks
             SET title = $1, description = $2, due_date = $3, status = $4
             WHERE id = $5
             RETURNING id, title, description, due_date, status",
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.due_date)
        .bind(task.status.as_str())
        .bind(task.id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => row.into_task(),
            None => Err(AppError::NotFound("task not found".into())),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("task not found".into()));
        }
        Ok(())
    }
}

/// Production `CredentialStore` backed by Postgres. Uniqueness is enforced
/// both by explicit lookups (so the colliding field can be named) and by the
/// unique indexes, which catch the insert-time race.
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn exists(&self, column: &str, value: &str) -> Result<bool, AppError> {
        // `column` is one of two fixed identifiers, never caller input.
        let row = sqlx::query(&format!("SELECT 1 FROM users WHERE {} = $1", column))
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn register(&self, new_user: NewUser) -> Result<User, AppError> {
        // Username is checked before email; the first collision wins.
        if self.exists("username", &new_user.username).await? {
            return Err(AppError::DuplicateCredential("username".into()));
        }
        if self.exists("email", &new_user.email).await? {
            return Err(AppError::DuplicateCredential("email".into()));
        }

        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username,
            password_hash: hash_password(&new_user.password)?,
            email: new_user.email,
            role: new_user.role.unwrap_or_default(),
        };

        let result = sqlx::query(
            "INSERT INTO users (id, username, password_hash, email, role)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.email)
        .bind(user.role.as_str())
        .execute(&self.pool)
        .await;

        if let Err(sqlx::Error::Database(db_err)) = &result {
            // A duplicate-key race slipped past the explicit checks.
            if db_err.code().as_deref() == Some("23505") {
                let field = match db_err.constraint() {
                    Some(constraint) if constraint.contains("email") => "email",
                    _ => "username",
                };
                return Err(AppError::DuplicateCredential(field.into()));
            }
        }
        result?;

        Ok(user)
    }

    async fn authenticate(&self, username: &str, password: &str) -> Result<User, AppError> {
        let row = sqlx::query_as::<_, UserRow>(&format!("{} WHERE username = $1", SELECT_USER))
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        let user = match row {
            Some(row) => row.into_user()?,
            None => return Err(AppError::NotFound("user not found".into())),
        };

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::Unauthorized("invalid credentials".into()));
        }
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<User, AppError> {
        let row = sqlx::query_as::<_, UserRow>(&format!("{} WHERE id = $1", SELECT_USER))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => row.into_user(),
            None => Err(AppError::NotFound("user not found".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_row_with_unknown_status_is_corrupt() {
        let row = TaskRow {
            id: Uuid::new_v4(),
            title: "Write spec".to_string(),
            description: String::new(),
            due_date: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
            status: "Archived".to_string(),
        };
        match row.into_task() {
            Err(AppError::CorruptRecord(msg)) => assert!(msg.contains("Archived")),
            other => panic!("expected CorruptRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_task_row_decodes_valid_status() {
        let id = Uuid::new_v4();
        let row = TaskRow {
            id,
            title: "Write spec".to_string(),
            description: "draft".to_string(),
            due_date: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
            status: "In Progress".to_string(),
        };
        let task = row.into_task().unwrap();
        assert_eq!(task.id, id);
        assert_eq!(task.status, TaskStatus::InProgress);
    }

    #[test]
    fn test_one_corrupt_row_aborts_the_whole_listing() {
        let good = |title: &str, status: &str| TaskRow {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: String::new(),
            due_date: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
            status: status.to_string(),
        };
        let rows = vec![
            good("Write spec", "Pending"),
            good("Review spec", "Archived"), // no longer a recognized status
            good("Ship spec", "Completed"),
        ];

        // The bad row fails the whole batch; no partial Vec comes back.
        match decode_tasks(rows) {
            Err(AppError::CorruptRecord(msg)) => assert!(msg.contains("Archived")),
            other => panic!("expected CorruptRecord, got {:?}", other),
        }

        // A batch of only valid rows still decodes in full.
        let rows = vec![good("Write spec", "Pending"), good("Ship spec", "Completed")];
        assert_eq!(decode_tasks(rows).unwrap().len(), 2);
    }

    #[test]
    fn test_user_row_with_unknown_role_is_corrupt() {
        let row = UserRow {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            password_hash: "hash".to_string(),
            email: "a@x.com".to_string(),
            role: "superuser".to_string(),
        };
        assert!(matches!(
            row.into_user(),
            Err(AppError::CorruptRecord(_))
        ));
    }
}
