//! Route handlers for carlot-server
//!
//! - cars: inventory listing, create, and color/price filters
//! - health: Health check endpoint

pub mod cars;
pub mod health;

pub use cars::*;
pub use health::*;
