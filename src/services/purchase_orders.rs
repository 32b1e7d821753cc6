use crate::{
    db::DbPool,
    dto::{PurchaseOrderInput, REQUIRED_MESSAGE},
    entities::{purchase_order, vendor, PurchaseOrderStatus},
    errors::ServiceError,
    repositories::{HistoricalPerformanceRepository, PurchaseOrderRepository, VendorRepository},
    services::performance::{compute_vendor_performance, VendorPerformance},
};
use chrono::{DateTime, SubsecRound, Utc};
use sea_orm::{ConnectionTrait, Set, TransactionTrait};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, instrument};

const DUPLICATE_PO_NUMBER_MESSAGE: &str = "purchase order with this po number already exists.";

/// Service for managing purchase orders
///
/// Every mutation recomputes the metrics of the vendor(s) it touches in the
/// same transaction as the write.
#[derive(Clone, Debug)]
pub struct PurchaseOrderService {
    db_pool: Arc<DbPool>,
    orders: PurchaseOrderRepository,
    vendors: VendorRepository,
    history: HistoricalPerformanceRepository,
}

impl PurchaseOrderService {
    /// Creates a new purchase order service instance
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            orders: PurchaseOrderRepository::new(db_pool.clone()),
            vendors: VendorRepository::new(db_pool.clone()),
            history: HistoricalPerformanceRepository::new(db_pool.clone()),
            db_pool,
        }
    }

    /// Lists purchase orders ordered by id, optionally for a single vendor
    #[instrument(skip(self))]
    pub async fn list_purchase_orders(
        &self,
        vendor_id: Option<i32>,
    ) -> Result<Vec<purchase_order::Model>, ServiceError> {
        self.orders.find_all(vendor_id).await
    }

    /// Gets a purchase order by ID
    #[instrument(skip(self))]
    pub async fn get_purchase_order(
        &self,
        id: i32,
    ) -> Result<purchase_order::Model, ServiceError> {
        self.orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Purchase order", id))
    }

    /// Creates a purchase order for an existing vendor
    #[instrument(skip(self), fields(po_number = %input.po_number))]
    pub async fn create_purchase_order(
        &self,
        input: PurchaseOrderInput,
    ) -> Result<purchase_order::Model, ServiceError> {
        let vendor_id = input
            .vendor_id
            .ok_or_else(|| ServiceError::invalid_field("vendor", REQUIRED_MESSAGE))?;
        let vendor = self.resolve_vendor(vendor_id).await?;

        if self
            .orders
            .find_by_po_number(&input.po_number)
            .await?
            .is_some()
        {
            return Err(ServiceError::invalid_field(
                "po_number",
                DUPLICATE_PO_NUMBER_MESSAGE,
            ));
        }

        let now = Utc::now();
        let completed_at = (input.status == PurchaseOrderStatus::Completed).then_some(now);

        let active = purchase_order::ActiveModel {
            vendor_id: Set(vendor.id),
            po_number: Set(input.po_number),
            order_date: Set(input.order_date),
            delivery_date: Set(input.delivery_date),
            items: Set(input.items.unwrap_or_else(|| json!([]))),
            quantity: Set(input.quantity),
            status: Set(input.status),
            quality_rating: Set(input.quality_rating.flatten()),
            issue_date: Set(input.issue_date.unwrap_or(now)),
            completed_at: Set(completed_at),
            acknowledgment_date: Set(None),
            ..Default::default()
        };

        let txn = self.db_pool.begin().await?;
        let created = self.orders.create(&txn, active).await?;
        self.recompute_vendor_metrics(&txn, vendor.id).await?;
        txn.commit().await?;

        info!(
            purchase_order_id = created.id,
            vendor_id = vendor.id,
            "Purchase order created"
        );
        Ok(created)
    }

    /// Replaces a purchase order's fields.
    ///
    /// `vendor`, `items`, `quality_rating` and `issue_date` are kept when the
    /// input leaves them out; an explicit null `quality_rating` clears it.
    /// The acknowledgment date is never changed here.
    #[instrument(skip(self), fields(po_number = %input.po_number))]
    pub async fn update_purchase_order(
        &self,
        id: i32,
        input: PurchaseOrderInput,
    ) -> Result<purchase_order::Model, ServiceError> {
        let existing = self.get_purchase_order(id).await?;
        let previous_vendor_id = existing.vendor_id;

        let vendor_id = match input.vendor_id {
            Some(vendor_id) if vendor_id != previous_vendor_id => {
                self.resolve_vendor(vendor_id).await?.id
            }
            _ => previous_vendor_id,
        };

        if let Some(other) = self.orders.find_by_po_number(&input.po_number).await? {
            if other.id != id {
                return Err(ServiceError::invalid_field(
                    "po_number",
                    DUPLICATE_PO_NUMBER_MESSAGE,
                ));
            }
        }

        let completed_at = match (existing.is_completed(), input.status) {
            (true, PurchaseOrderStatus::Completed) => existing.completed_at,
            (false, PurchaseOrderStatus::Completed) => Some(Utc::now()),
            (_, _) => None,
        };

        let mut active: purchase_order::ActiveModel = existing.into();
        active.vendor_id = Set(vendor_id);
        active.po_number = Set(input.po_number);
        active.order_date = Set(input.order_date);
        active.delivery_date = Set(input.delivery_date);
        active.quantity = Set(input.quantity);
        active.status = Set(input.status);
        active.completed_at = Set(completed_at);
        if let Some(items) = input.items {
            active.items = Set(items);
        }
        if let Some(rating) = input.quality_rating {
            active.quality_rating = Set(rating);
        }
        if let Some(issue_date) = input.issue_date {
            active.issue_date = Set(issue_date);
        }

        let txn = self.db_pool.begin().await?;
        let updated = self.orders.update(&txn, active).await?;
        self.recompute_vendor_metrics(&txn, vendor_id).await?;
        if previous_vendor_id != vendor_id {
            self.recompute_vendor_metrics(&txn, previous_vendor_id).await?;
        }
        txn.commit().await?;

        info!(purchase_order_id = id, vendor_id, "Purchase order updated");
        Ok(updated)
    }

    /// Deletes a purchase order and refreshes its former vendor's metrics
    #[instrument(skip(self))]
    pub async fn delete_purchase_order(&self, id: i32) -> Result<(), ServiceError> {
        let existing = self.get_purchase_order(id).await?;

        let txn = self.db_pool.begin().await?;
        if !self.orders.delete(&txn, id).await? {
            txn.rollback().await?;
            return Err(ServiceError::not_found("Purchase order", id));
        }
        self.recompute_vendor_metrics(&txn, existing.vendor_id).await?;
        txn.commit().await?;

        info!(purchase_order_id = id, "Purchase order deleted");
        Ok(())
    }

    /// Stamps the acknowledgment date of a purchase order.
    ///
    /// The date is written at most once: acknowledging again, including a
    /// racing request that loses the conditional write, returns the stored
    /// date unchanged.
    #[instrument(skip(self))]
    pub async fn acknowledge_purchase_order(
        &self,
        id: i32,
    ) -> Result<DateTime<Utc>, ServiceError> {
        let existing = self.get_purchase_order(id).await?;

        if let Some(acknowledged) = existing.acknowledgment_date {
            debug!(purchase_order_id = id, "Purchase order already acknowledged");
            return Ok(acknowledged);
        }

        // Microseconds match what every supported backend stores
        let now = Utc::now().trunc_subsecs(6);
        if existing.order_date > now {
            return Err(ServiceError::invalid_field(
                "acknowledgment_date",
                "A purchase order cannot be acknowledged before its order date.",
            ));
        }

        let vendor_id = existing.vendor_id;
        let txn = self.db_pool.begin().await?;
        if !self.orders.stamp_acknowledgment(&txn, id, now).await? {
            txn.rollback().await?;
            debug!(purchase_order_id = id, "Purchase order acknowledged concurrently");
            return self
                .get_purchase_order(id)
                .await?
                .acknowledgment_date
                .ok_or_else(|| ServiceError::not_found("Purchase order", id));
        }
        self.recompute_vendor_metrics(&txn, vendor_id).await?;
        txn.commit().await?;

        info!(purchase_order_id = id, vendor_id, "Purchase order acknowledged");
        Ok(now)
    }

    /// Recomputes and stores a vendor's metrics from all of its purchase
    /// orders, appending a history snapshot. Runs on `db`, normally the
    /// transaction of the write that triggered it.
    #[instrument(skip(self, db))]
    pub async fn recompute_vendor_metrics(
        &self,
        db: &impl ConnectionTrait,
        vendor_id: i32,
    ) -> Result<VendorPerformance, ServiceError> {
        let vendor = match self.vendors.find_by_id_in(db, vendor_id).await? {
            Some(vendor) => vendor,
            None => return Ok(VendorPerformance::default()),
        };

        let orders = self.orders.find_by_vendor(db, vendor_id).await?;
        let performance = compute_vendor_performance(&orders);

        self.vendors.update_metrics(db, vendor, &performance).await?;
        self.history
            .append(db, vendor_id, Utc::now(), &performance)
            .await?;

        debug!(
            vendor_id,
            orders = orders.len(),
            on_time_delivery_rate = performance.on_time_delivery_rate,
            quality_rating_avg = performance.quality_rating_avg,
            average_response_time = performance.average_response_time,
            fulfillment_rate = performance.fulfillment_rate,
            "Vendor metrics recomputed"
        );
        Ok(performance)
    }

    async fn resolve_vendor(&self, vendor_id: i32) -> Result<vendor::Model, ServiceError> {
        self.vendors.find_by_id(vendor_id).await?.ok_or_else(|| {
            ServiceError::invalid_field(
                "vendor",
                format!("Invalid pk \"{}\" - object does not exist.", vendor_id),
            )
        })
    }
}
