//! SQLite database layer for carlot-server
//!
//! Uses rusqlite with the schema applied on open. All car lookups return
//! rows in insertion order and never fail for "no matches".

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{params, Connection, Params, Row};

use crate::error::{ServerError, ServerResult};
use crate::models::{color_key, Car, NewCar};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS cars (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    color TEXT NOT NULL,
    color_key TEXT NOT NULL,
    model TEXT NOT NULL,
    price REAL NOT NULL CHECK (price >= 0)
);
"#;

const INDEXES: &str = r#"
CREATE INDEX IF NOT EXISTS idx_cars_color_key ON cars(color_key);
CREATE INDEX IF NOT EXISTS idx_cars_price ON cars(price);
"#;

const CAR_COLUMNS: &str = "id, color, model, price";

/// Thread-safe database wrapper
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
    path: PathBuf,
}

impl Database {
    /// Open or create the database at the given path
    pub fn open(path: impl Into<PathBuf>) -> ServerResult<Self> {
        let path = path.into();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(&path)?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
            path,
        };

        db.run_migrations()?;
        tracing::info!(path = %db.path.display(), "database opened");
        Ok(db)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> ServerResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
            path: PathBuf::from(":memory:"),
        };
        db.run_migrations()?;
        Ok(db)
    }

    /// Get the database file path
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn lock(&self) -> ServerResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| ServerError::Internal("database connection lock poisoned".into()))
    }

    /// Run schema migrations
    fn run_migrations(&self) -> ServerResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(SCHEMA)?;
        conn.execute_batch(INDEXES)?;
        Ok(())
    }

    // ========================================================================
    // Cars
    // ========================================================================

    /// Total number of stored cars.
    pub fn count_cars(&self) -> ServerResult<i64> {
        let conn = self.lock()?;
        let count = conn.query_row("SELECT COUNT(*) FROM cars", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Persist a new car and return it with its assigned id.
    pub fn save_car(&self, car: &NewCar) -> ServerResult<Car> {
        car.validate()?;

        let color = car.color.trim();
        let model = car.model.trim();

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO cars (color, color_key, model, price) VALUES (?1, ?2, ?3, ?4)",
            params![color, color_key(color), model, car.price],
        )?;

        Ok(Car {
            id: conn.last_insert_rowid(),
            color: color.to_string(),
            model: model.to_string(),
            price: car.price,
        })
    }

    /// All cars in insertion order.
    pub fn list_cars(&self) -> ServerResult<Vec<Car>> {
        self.query_cars("", params![])
    }

    /// Cars whose color matches `color` ignoring case.
    pub fn find_by_color(&self, color: &str) -> ServerResult<Vec<Car>> {
        self.query_cars("WHERE color_key = ?1", [color_key(color)])
    }

    /// Cars with `min <= price <= max`.
    pub fn find_by_price_between(&self, min: f64, max: f64) -> ServerResult<Vec<Car>> {
        self.query_cars("WHERE price BETWEEN ?1 AND ?2", params![min, max])
    }

    /// Cars with `price <= max`.
    pub fn find_by_price_at_most(&self, max: f64) -> ServerResult<Vec<Car>> {
        self.query_cars("WHERE price <= ?1", [max])
    }

    /// Cars with `price >= min`.
    pub fn find_by_price_at_least(&self, min: f64) -> ServerResult<Vec<Car>> {
        self.query_cars("WHERE price >= ?1", [min])
    }

    fn query_cars<P: Params>(&self, filter: &str, params: P) -> ServerResult<Vec<Car>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {CAR_COLUMNS} FROM cars {filter} ORDER BY id ASC"
        ))?;

        let cars = stmt
            .query_map(params, row_to_car)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(cars)
    }
}

fn row_to_car(row: &Row<'_>) -> rusqlite::Result<Car> {
    Ok(Car {
        id: row.get(0)?,
        color: row.get(1)?,
        model: row.get(2)?,
        price: row.get(3)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> Database {
        let db = Database::open_in_memory().unwrap();
        for (color, model, price) in [
            ("black", "BMW x5", 25000.0),
            ("green", "Audi A4", 15000.0),
            ("white", "MB A220", 18000.0),
            ("red", "Ferrari", 250000.0),
        ] {
            db.save_car(&NewCar::new(color, model, price)).unwrap();
        }
        db
    }

    fn models(cars: &[Car]) -> Vec<&str> {
        cars.iter().map(|c| c.model.as_str()).collect()
    }

    #[test]
    fn empty_store_counts_zero() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.count_cars().unwrap(), 0);
        assert!(db.list_cars().unwrap().is_empty());
    }

    #[test]
    fn save_assigns_increasing_ids() {
        let db = Database::open_in_memory().unwrap();
        let first = db.save_car(&NewCar::new("black", "BMW x5", 25000.0)).unwrap();
        let second = db.save_car(&NewCar::new("green", "Audi A4", 15000.0)).unwrap();

        assert!(second.id > first.id);
        assert_eq!(first.model, "BMW x5");
        assert_eq!(db.count_cars().unwrap(), 2);
    }

    #[test]
    fn save_rejects_invalid_car() {
        let db = Database::open_in_memory().unwrap();
        let err = db.save_car(&NewCar::new("red", "Ferrari", -5.0)).unwrap_err();
        assert!(matches!(err, ServerError::Validation(_)));
        assert_eq!(db.count_cars().unwrap(), 0);
    }

    #[test]
    fn list_keeps_insertion_order() {
        let db = seeded();
        assert_eq!(
            models(&db.list_cars().unwrap()),
            ["BMW x5", "Audi A4", "MB A220", "Ferrari"]
        );
    }

    #[test]
    fn color_lookup_ignores_case() {
        let db = seeded();
        for query in ["red", "RED", "ReD", "rEd"] {
            let cars = db.find_by_color(query).unwrap();
            assert_eq!(models(&cars), ["Ferrari"], "query {query}");
            assert_eq!(cars[0].color, "red");
        }
        assert!(db.find_by_color("purple").unwrap().is_empty());
    }

    #[test]
    fn color_lookup_does_not_trim_whitespace() {
        let db = seeded();
        for query in [" red ", "\tRED", "red\n"] {
            assert!(db.find_by_color(query).unwrap().is_empty(), "query {query:?}");
        }
    }

    #[test]
    fn saved_color_is_trimmed() {
        let db = Database::open_in_memory().unwrap();
        let car = db.save_car(&NewCar::new("  Blue ", "Volvo XC60", 42000.0)).unwrap();
        assert_eq!(car.color, "Blue");
        assert_eq!(db.find_by_color("BLUE").unwrap().len(), 1);
    }

    #[test]
    fn color_lookup_folds_non_ascii() {
        let db = Database::open_in_memory().unwrap();
        db.save_car(&NewCar::new("Écru", "Citroën 2CV", 9000.0)).unwrap();
        assert_eq!(db.find_by_color("écru").unwrap().len(), 1);
        assert_eq!(db.find_by_color("ÉCRU").unwrap().len(), 1);
    }

    #[test]
    fn price_between_is_inclusive() {
        let db = seeded();
        assert_eq!(
            models(&db.find_by_price_between(10000.0, 30000.0).unwrap()),
            ["BMW x5", "Audi A4", "MB A220"]
        );
        assert_eq!(
            models(&db.find_by_price_between(15000.0, 18000.0).unwrap()),
            ["Audi A4", "MB A220"]
        );
        assert!(db.find_by_price_between(100.0, 500.0).unwrap().is_empty());
    }

    #[test]
    fn price_between_inverted_range_matches_nothing() {
        let db = seeded();
        assert!(db.find_by_price_between(30000.0, 10000.0).unwrap().is_empty());
    }

    #[test]
    fn price_thresholds_are_inclusive() {
        let db = seeded();
        assert_eq!(models(&db.find_by_price_at_most(16000.0).unwrap()), ["Audi A4"]);
        assert_eq!(
            models(&db.find_by_price_at_most(18000.0).unwrap()),
            ["Audi A4", "MB A220"]
        );
        assert_eq!(
            models(&db.find_by_price_at_least(25000.0).unwrap()),
            ["BMW x5", "Ferrari"]
        );
        assert!(db.find_by_price_at_least(1_000_000.0).unwrap().is_empty());
    }

    #[test]
    fn file_database_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cars.db");

        let db = Database::open(&path).unwrap();
        db.save_car(&NewCar::new("white", "MB A220", 18000.0)).unwrap();
        drop(db);

        let reopened = Database::open(&path).unwrap();
        assert_eq!(reopened.count_cars().unwrap(), 1);
        assert_eq!(reopened.path(), &path);
    }
}
