use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, QueryFilter, QueryOrder,
};
use std::sync::Arc;

use crate::entities::purchase_order::{
    ActiveModel as PurchaseOrderActiveModel, Column, Entity as PurchaseOrder,
    Model as PurchaseOrderModel,
};
use crate::errors::ServiceError;
use crate::repositories::Repository;

use super::BaseRepository;

/// Repository for purchase order operations
#[derive(Debug, Clone)]
pub struct PurchaseOrderRepository {
    base: BaseRepository,
}

impl PurchaseOrderRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Purchase orders ordered by id, optionally restricted to one vendor
    pub async fn find_all(
        &self,
        vendor_id: Option<i32>,
    ) -> Result<Vec<PurchaseOrderModel>, ServiceError> {
        let mut query = PurchaseOrder::find();
        if let Some(vendor_id) = vendor_id {
            query = query.filter(Column::VendorId.eq(vendor_id));
        }

        Ok(query
            .order_by_asc(Column::Id)
            .all(self.base.get_db())
            .await?)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<PurchaseOrderModel>, ServiceError> {
        Ok(PurchaseOrder::find_by_id(id)
            .one(self.base.get_db())
            .await?)
    }

    /// All orders of one vendor, read through `db` so it can run inside a
    /// transaction
    pub async fn find_by_vendor(
        &self,
        db: &impl ConnectionTrait,
        vendor_id: i32,
    ) -> Result<Vec<PurchaseOrderModel>, ServiceError> {
        Ok(PurchaseOrder::find()
            .filter(Column::VendorId.eq(vendor_id))
            .order_by_asc(Column::Id)
            .all(db)
            .await?)
    }

    pub async fn find_by_po_number(
        &self,
        po_number: &str,
    ) -> Result<Option<PurchaseOrderModel>, ServiceError> {
        Ok(PurchaseOrder::find()
            .filter(Column::PoNumber.eq(po_number))
            .one(self.base.get_db())
            .await?)
    }

    pub async fn create(
        &self,
        db: &impl ConnectionTrait,
        order: PurchaseOrderActiveModel,
    ) -> Result<PurchaseOrderModel, ServiceError> {
        order
            .insert(db)
            .await
            .map_err(|e| ServiceError::from_write_error(e, "po_number", "vendor"))
    }

    pub async fn update(
        &self,
        db: &impl ConnectionTrait,
        order: PurchaseOrderActiveModel,
    ) -> Result<PurchaseOrderModel, ServiceError> {
        order
            .update(db)
            .await
            .map_err(|e| ServiceError::from_write_error(e, "po_number", "vendor"))
    }

    /// Set `acknowledgment_date` only if it is still null.
    ///
    /// Returns false when the order is missing or was already acknowledged.
    pub async fn stamp_acknowledgment(
        &self,
        db: &impl ConnectionTrait,
        id: i32,
        at: DateTime<Utc>,
    ) -> Result<bool, ServiceError> {
        let result = PurchaseOrder::update_many()
            .col_expr(Column::AcknowledgmentDate, Expr::value(at))
            .col_expr(Column::UpdatedAt, Expr::value(at))
            .filter(Column::Id.eq(id))
            .filter(Column::AcknowledgmentDate.is_null())
            .exec(db)
            .await?;
        Ok(result.rows_affected == 1)
    }

    /// Delete a purchase order; returns whether a row was removed
    pub async fn delete(&self, db: &impl ConnectionTrait, id: i32) -> Result<bool, ServiceError> {
        let result = PurchaseOrder::delete_by_id(id).exec(db).await?;
        Ok(result.rows_affected > 0)
    }
}
