use sea_orm::DatabaseConnection;
use std::sync::Arc;

pub mod historical_performance_repository;
pub mod purchase_order_repository;
pub mod vendor_repository;

pub use historical_performance_repository::HistoricalPerformanceRepository;
pub use purchase_order_repository::PurchaseOrderRepository;
pub use vendor_repository::VendorRepository;

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
