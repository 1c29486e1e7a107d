//! Car routes - inventory listing and filters
//!
//! The unfiltered listing answers 200 even when empty. Filters answer 404
//! with an empty array when nothing matches, and the range filter answers
//! 400 with an empty array when `min > max`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::db::Database;
use crate::error::{ServerError, ServerResult};
use crate::models::{Car, NewCar};

/// Status plus car array, the body shape shared by every filter endpoint
pub type CarList = (StatusCode, Json<Vec<Car>>);

/// GET /api/cars - List all cars
pub async fn list_cars(State(db): State<Database>) -> ServerResult<Json<Vec<Car>>> {
    let cars = db.list_cars()?;
    Ok(Json(cars))
}

/// POST /api/cars - Add a car
pub async fn create_car(
    State(db): State<Database>,
    Json(req): Json<NewCar>,
) -> ServerResult<(StatusCode, Json<Car>)> {
    let car = db.save_car(&req)?;
    tracing::info!(id = car.id, model = %car.model, "car created");
    Ok((StatusCode::CREATED, Json(car)))
}

/// GET /api/cars/color/{color} - Cars of a color, any letter case
pub async fn cars_by_color(
    State(db): State<Database>,
    Path(color): Path<String>,
) -> ServerResult<CarList> {
    Ok(filtered(db.find_by_color(&color)?))
}

/// GET /api/cars/price/between/{min}/{max} - Cars priced within [min, max]
pub async fn cars_by_price_between(
    State(db): State<Database>,
    Path((min, max)): Path<(String, String)>,
) -> ServerResult<CarList> {
    let min = parse_price("min", &min)?;
    let max = parse_price("max", &max)?;

    if min > max {
        return Ok((StatusCode::BAD_REQUEST, Json(Vec::new())));
    }

    Ok(filtered(db.find_by_price_between(min, max)?))
}

/// GET /api/cars/price/under/{max} - Cars priced at most max
pub async fn cars_by_price_under(
    State(db): State<Database>,
    Path(max): Path<String>,
) -> ServerResult<CarList> {
    let max = parse_price("max", &max)?;
    Ok(filtered(db.find_by_price_at_most(max)?))
}

/// GET /api/cars/price/over/{min} - Cars priced at least min
pub async fn cars_by_price_over(
    State(db): State<Database>,
    Path(min): Path<String>,
) -> ServerResult<CarList> {
    let min = parse_price("min", &min)?;
    Ok(filtered(db.find_by_price_at_least(min)?))
}

fn filtered(cars: Vec<Car>) -> CarList {
    if cars.is_empty() {
        (StatusCode::NOT_FOUND, Json(cars))
    } else {
        (StatusCode::OK, Json(cars))
    }
}

fn parse_price(name: &str, raw: &str) -> ServerResult<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| ServerError::BadRequest(format!("{} must be a number, got '{}'", name, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_price_accepts_integers_and_decimals() {
        assert_eq!(parse_price("min", "10000").unwrap(), 10000.0);
        assert_eq!(parse_price("max", "15999.5").unwrap(), 15999.5);
    }

    #[test]
    fn parse_price_rejects_non_finite_and_garbage() {
        for raw in ["abc", "", "NaN", "inf", "-infinity"] {
            let err = parse_price("max", raw).unwrap_err();
            assert!(matches!(err, ServerError::BadRequest(_)), "raw {raw:?}");
        }
    }

    #[test]
    fn empty_filter_result_is_not_found() {
        let (status, Json(cars)) = filtered(Vec::new());
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(cars.is_empty());
    }
}
