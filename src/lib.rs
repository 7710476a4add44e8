#![doc = "The `tasktrack` library crate."]
#![doc = ""]
#![doc = "Users own projects, projects contain tasks, and requests are authenticated with"]
#![doc = "bearer tokens. This crate holds the token and password logic, the domain models,"]
#![doc = "the repository functions over Postgres, the route handlers and error handling."]
#![doc = "The binary (`main.rs`) loads configuration, opens the pool and runs the server."]

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod repository;
pub mod routes;

pub use crate::error::AppError;
