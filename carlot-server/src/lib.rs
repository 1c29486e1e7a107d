//! carlot-server: HTTP server for a car inventory
//!
//! Serves a single `Car` resource backed by SQLite, with filter endpoints
//! by color and price. An empty store is seeded with a default inventory
//! on startup.

pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod seed;
pub mod server;

pub use db::Database;
pub use error::{ServerError, ServerResult};
pub use models::{Car, NewCar, ValidationError};
pub use seed::{seed_if_empty, SeedOutcome};
pub use server::{build_router, run_server, ServerArgs};
