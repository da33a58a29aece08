pub mod task;
pub mod user;

pub use task::{Task, TaskDto, TaskPayload, TaskStatus, DUE_DATE_FORMAT};
pub use user::{NewUser, Role, User};
