use sea_orm::DatabaseConnection;
use std::sync::Arc;

pub mod expense_repository;
pub mod trip_repository;

pub use expense_repository::{ExpenseRepository, TruckExpenseLedger};
pub use trip_repository::{TripLedger, TripRepository};

/// Repository trait for common database operations
pub trait Repository {
    fn get_db(&self) -> &DatabaseConnection;
}

#[derive(Debug, Clone)]
pub struct BaseRepository {
    db: Arc<DatabaseConnection>,
}

impl BaseRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl Repository for BaseRepository {
    fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }
}
