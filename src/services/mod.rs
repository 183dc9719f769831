//! Domain services.
//!
//! Services are cheap per-request wrappers around a borrowed `Store`. They raise
//! every domain error (`NotFound`, `Forbidden`, `Conflict`, ...) themselves; handlers
//! only translate the results into HTTP responses.

pub mod auth;
pub mod lists;
pub mod tasks;

pub use auth::{resolve_principal, AuthService};
pub use lists::ListService;
pub use tasks::TaskService;
