//! Health check route

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::Extension, Json};

use crate::db::Database;
use crate::error::ServerResult;
use crate::models::{DatabaseHealth, HealthResponse};

/// Server start time for uptime calculation
pub struct ServerState {
    pub db: Database,
    pub start_time: Instant,
}

impl ServerState {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            start_time: Instant::now(),
        }
    }
}

/// Shared state wrapper
pub type SharedState = Arc<ServerState>;

/// GET /health - Health check endpoint
pub async fn health_check(
    Extension(state): Extension<SharedState>,
) -> ServerResult<Json<HealthResponse>> {
    let car_count = state.db.count_cars()?;

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        database: DatabaseHealth {
            connected: true,
            path: state.db.path().display().to_string(),
            car_count,
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewCar;

    #[tokio::test]
    async fn health_reports_car_count() {
        let db = Database::open_in_memory().unwrap();
        db.save_car(&NewCar::new("red", "Ferrari", 250000.0)).unwrap();
        let state = Arc::new(ServerState::new(db));

        let Json(body) = health_check(Extension(state)).await.unwrap();
        assert_eq!(body.status, "ok");
        assert_eq!(body.database.car_count, 1);
        assert_eq!(body.database.path, ":memory:");
    }
}
