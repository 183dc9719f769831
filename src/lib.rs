#![doc = "The `todoapi` library crate."]
#![doc = ""]
#![doc = "Domain models, storage backends, services, API-key authentication, routing"]
#![doc = "and error handling for a multi-user task list API. The binary (`main.rs`)"]
#![doc = "wires these together into an `HttpServer`."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;
