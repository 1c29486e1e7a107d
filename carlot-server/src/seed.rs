//! Startup data initializer
//!
//! Populates the default inventory when the store is empty. The check and
//! the inserts are separate statements, so two processes seeding the same
//! file at once can both insert.

use crate::db::Database;
use crate::error::ServerResult;
use crate::models::NewCar;

/// Default inventory inserted into an empty store, in insertion order.
pub fn default_cars() -> [NewCar; 4] {
    [
        NewCar::new("black", "BMW x5", 25000.0),
        NewCar::new("green", "Audi A4", 15000.0),
        NewCar::new("white", "MB A220", 18000.0),
        NewCar::new("red", "Ferrari", 250000.0),
    ]
}

/// Outcome of a seeding run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// Store was empty; this many rows were inserted
    Seeded(usize),
    /// Store already held this many rows; nothing was inserted
    Skipped(i64),
}

/// Insert the default inventory if the store holds no cars.
pub fn seed_if_empty(db: &Database) -> ServerResult<SeedOutcome> {
    let existing = db.count_cars()?;
    if existing > 0 {
        tracing::info!(existing, "store already populated, skipping seed");
        return Ok(SeedOutcome::Skipped(existing));
    }

    let cars = default_cars();
    for car in &cars {
        db.save_car(car)?;
    }

    tracing::info!(inserted = cars.len(), "seeded default cars");
    Ok(SeedOutcome::Seeded(cars.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_empty_store_in_order() {
        let db = Database::open_in_memory().unwrap();

        assert_eq!(seed_if_empty(&db).unwrap(), SeedOutcome::Seeded(4));

        let cars = db.list_cars().unwrap();
        let rows: Vec<(&str, &str, f64)> = cars
            .iter()
            .map(|c| (c.color.as_str(), c.model.as_str(), c.price))
            .collect();
        assert_eq!(
            rows,
            [
                ("black", "BMW x5", 25000.0),
                ("green", "Audi A4", 15000.0),
                ("white", "MB A220", 18000.0),
                ("red", "Ferrari", 250000.0),
            ]
        );
    }

    #[test]
    fn second_run_is_a_no_op() {
        let db = Database::open_in_memory().unwrap();

        seed_if_empty(&db).unwrap();
        assert_eq!(seed_if_empty(&db).unwrap(), SeedOutcome::Skipped(4));
        assert_eq!(db.count_cars().unwrap(), 4);
    }

    #[test]
    fn any_existing_row_blocks_seeding() {
        let db = Database::open_in_memory().unwrap();
        db.save_car(&NewCar::new("blue", "Lada Niva", 8000.0)).unwrap();

        assert_eq!(seed_if_empty(&db).unwrap(), SeedOutcome::Skipped(1));

        let cars = db.list_cars().unwrap();
        assert_eq!(cars.len(), 1);
        assert_eq!(cars[0].model, "Lada Niva");
    }
}
