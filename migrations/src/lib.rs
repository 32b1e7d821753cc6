pub use sea_orm_migration::prelude::*;

mod m20240301_000001_create_vendors_table;
mod m20240301_000002_create_purchase_orders_table;
mod m20240301_000003_create_historical_performances_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_vendors_table::Migration),
            Box::new(m20240301_000002_create_purchase_orders_table::Migration),
            Box::new(m20240301_000003_create_historical_performances_table::Migration),
        ]
    }
}
