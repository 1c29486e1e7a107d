//! Request and response models for carlot-server

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Cars
// ============================================================================

/// A stored car record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Car {
    pub id: i64,
    pub color: String,
    pub model: String,
    pub price: f64,
}

/// A car that has not been persisted yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCar {
    pub color: String,
    pub model: String,
    pub price: f64,
}

impl NewCar {
    pub fn new(color: impl Into<String>, model: impl Into<String>, price: f64) -> Self {
        Self {
            color: color.into(),
            model: model.into(),
            price,
        }
    }

    /// Checks required fields and the price range before persistence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.color.trim().is_empty() {
            return Err(ValidationError::Empty { field: "color" });
        }
        if self.model.trim().is_empty() {
            return Err(ValidationError::Empty { field: "model" });
        }
        if !self.price.is_finite() {
            return Err(ValidationError::NotFinite { field: "price" });
        }
        if self.price < 0.0 {
            return Err(ValidationError::Negative { field: "price" });
        }
        Ok(())
    }
}

/// Lower-cased form of a color used for case-insensitive matching.
///
/// Only letter case is folded; callers normalize whitespace before saving.
pub fn color_key(color: &str) -> String {
    color.to_lowercase()
}

// ============================================================================
// Validation
// ============================================================================

/// Validation error for car input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is blank
    Empty { field: &'static str },

    /// Numeric field is NaN or infinite
    NotFinite { field: &'static str },

    /// Numeric field is below zero
    Negative { field: &'static str },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::NotFinite { field } => write!(f, "{} must be a finite number", field),
            Self::Negative { field } => write!(f, "{} cannot be negative", field),
        }
    }
}

impl std::error::Error for ValidationError {}

// ============================================================================
// Health Check
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub database: DatabaseHealth,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseHealth {
    pub connected: bool,
    pub path: String,
    pub car_count: i64,
}
