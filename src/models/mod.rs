pub mod api_key;
pub mod list;
pub mod task;
pub mod user;

pub use api_key::ApiKey;
pub use list::{List, ListInput};
pub use task::{NewTask, Task, TaskInput, TaskUpdate};
pub use user::User;
