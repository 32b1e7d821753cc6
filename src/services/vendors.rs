use crate::{
    db::DbPool,
    dto::VendorInput,
    entities::{historical_performance, vendor},
    errors::ServiceError,
    repositories::{HistoricalPerformanceRepository, VendorRepository},
    services::performance::VendorPerformance,
};
use sea_orm::Set;
use std::sync::Arc;
use tracing::{info, instrument};

const DUPLICATE_CODE_MESSAGE: &str = "vendor with this vendor code already exists.";

/// Service for managing vendors
#[derive(Clone, Debug)]
pub struct VendorService {
    vendors: VendorRepository,
    history: HistoricalPerformanceRepository,
}

impl VendorService {
    /// Creates a new vendor service instance
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            vendors: VendorRepository::new(db_pool.clone()),
            history: HistoricalPerformanceRepository::new(db_pool),
        }
    }

    /// Lists all vendors ordered by id
    #[instrument(skip(self))]
    pub async fn list_vendors(&self) -> Result<Vec<vendor::Model>, ServiceError> {
        self.vendors.find_all().await
    }

    /// Gets a vendor by ID
    #[instrument(skip(self))]
    pub async fn get_vendor(&self, id: i32) -> Result<vendor::Model, ServiceError> {
        self.vendors
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Vendor", id))
    }

    /// Creates a new vendor with zeroed metrics
    #[instrument(skip(self), fields(vendor_code = %input.vendor_code))]
    pub async fn create_vendor(&self, input: VendorInput) -> Result<vendor::Model, ServiceError> {
        if self
            .vendors
            .find_by_vendor_code(&input.vendor_code)
            .await?
            .is_some()
        {
            return Err(ServiceError::invalid_field(
                "vendor_code",
                DUPLICATE_CODE_MESSAGE,
            ));
        }

        let active = vendor::ActiveModel {
            name: Set(input.name),
            contact_details: Set(input.contact_details),
            address: Set(input.address),
            vendor_code: Set(input.vendor_code),
            on_time_delivery_rate: Set(0.0),
            quality_rating_avg: Set(0.0),
            average_response_time: Set(0.0),
            fulfillment_rate: Set(0.0),
            ..Default::default()
        };

        let created = self.vendors.create(active).await?;
        info!(vendor_id = created.id, "Vendor created");
        Ok(created)
    }

    /// Replaces a vendor's descriptive fields; metrics are left untouched
    #[instrument(skip(self), fields(vendor_code = %input.vendor_code))]
    pub async fn update_vendor(
        &self,
        id: i32,
        input: VendorInput,
    ) -> Result<vendor::Model, ServiceError> {
        let existing = self.get_vendor(id).await?;

        if let Some(other) = self.vendors.find_by_vendor_code(&input.vendor_code).await? {
            if other.id != id {
                return Err(ServiceError::invalid_field(
                    "vendor_code",
                    DUPLICATE_CODE_MESSAGE,
                ));
            }
        }

        let mut active: vendor::ActiveModel = existing.into();
        active.name = Set(input.name);
        active.contact_details = Set(input.contact_details);
        active.address = Set(input.address);
        active.vendor_code = Set(input.vendor_code);

        let updated = self.vendors.update(active).await?;
        info!(vendor_id = id, "Vendor updated");
        Ok(updated)
    }

    /// Deletes a vendor along with its purchase orders and metric history
    #[instrument(skip(self))]
    pub async fn delete_vendor(&self, id: i32) -> Result<(), ServiceError> {
        let removed_orders = self.vendors.delete_cascade(id).await?;
        info!(vendor_id = id, removed_orders, "Vendor deleted");
        Ok(())
    }

    /// Current stored metrics of a vendor
    #[instrument(skip(self))]
    pub async fn get_performance(&self, id: i32) -> Result<VendorPerformance, ServiceError> {
        let vendor = self.get_vendor(id).await?;
        Ok(VendorPerformance::from(&vendor))
    }

    /// Recorded metric snapshots of a vendor, oldest first
    #[instrument(skip(self))]
    pub async fn get_performance_history(
        &self,
        id: i32,
    ) -> Result<Vec<historical_performance::Model>, ServiceError> {
        self.get_vendor(id).await?;
        self.history.find_by_vendor(id).await
    }
}
