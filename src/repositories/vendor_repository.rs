use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use std::sync::Arc;

use crate::entities::{
    historical_performance::{self, Entity as HistoricalPerformance},
    purchase_order::{self, Entity as PurchaseOrder},
    vendor::{ActiveModel as VendorActiveModel, Column, Entity as Vendor, Model as VendorModel},
};
use crate::errors::ServiceError;
use crate::repositories::Repository;
use crate::services::performance::VendorPerformance;

use super::BaseRepository;

/// Repository for vendor operations
#[derive(Debug, Clone)]
pub struct VendorRepository {
    base: BaseRepository,
}

impl VendorRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All vendors ordered by id
    pub async fn find_all(&self) -> Result<Vec<VendorModel>, ServiceError> {
        Ok(Vendor::find()
            .order_by_asc(Column::Id)
            .all(self.base.get_db())
            .await?)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<VendorModel>, ServiceError> {
        self.find_by_id_in(self.base.get_db(), id).await
    }

    pub async fn find_by_id_in(
        &self,
        db: &impl ConnectionTrait,
        id: i32,
    ) -> Result<Option<VendorModel>, ServiceError> {
        Ok(Vendor::find_by_id(id).one(db).await?)
    }

    pub async fn find_by_vendor_code(
        &self,
        vendor_code: &str,
    ) -> Result<Option<VendorModel>, ServiceError> {
        Ok(Vendor::find()
            .filter(Column::VendorCode.eq(vendor_code))
            .one(self.base.get_db())
            .await?)
    }

    /// Insert a vendor; a unique-index hit is reported against `vendor_code`.
    pub async fn create(&self, vendor: VendorActiveModel) -> Result<VendorModel, ServiceError> {
        vendor
            .insert(self.base.get_db())
            .await
            .map_err(|e| ServiceError::from_write_error(e, "vendor_code", "id"))
    }

    pub async fn update(&self, vendor: VendorActiveModel) -> Result<VendorModel, ServiceError> {
        vendor
            .update(self.base.get_db())
            .await
            .map_err(|e| ServiceError::from_write_error(e, "vendor_code", "id"))
    }

    /// Overwrite the four stored metrics of a vendor.
    pub async fn update_metrics(
        &self,
        db: &impl ConnectionTrait,
        vendor: VendorModel,
        performance: &VendorPerformance,
    ) -> Result<VendorModel, ServiceError> {
        let mut active: VendorActiveModel = vendor.into();
        active.on_time_delivery_rate = Set(performance.on_time_delivery_rate);
        active.quality_rating_avg = Set(performance.quality_rating_avg);
        active.average_response_time = Set(performance.average_response_time);
        active.fulfillment_rate = Set(performance.fulfillment_rate);

        Ok(active.update(db).await?)
    }

    /// Delete a vendor together with its purchase orders and metric history.
    ///
    /// Returns the number of purchase orders removed. All three deletes
    /// share one transaction.
    pub async fn delete_cascade(&self, id: i32) -> Result<u64, ServiceError> {
        let txn = self.base.get_db().begin().await?;

        HistoricalPerformance::delete_many()
            .filter(historical_performance::Column::VendorId.eq(id))
            .exec(&txn)
            .await?;

        let orders = PurchaseOrder::delete_many()
            .filter(purchase_order::Column::VendorId.eq(id))
            .exec(&txn)
            .await?;

        let vendor = Vendor::delete_by_id(id).exec(&txn).await?;
        if vendor.rows_affected == 0 {
            txn.rollback().await?;
            return Err(ServiceError::not_found("Vendor", id));
        }

        txn.commit().await?;
        Ok(orders.rows_affected)
    }
}
