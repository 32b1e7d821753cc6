// Vendor management
pub mod vendors;

// Purchase orders and acknowledgment
pub mod purchase_orders;

// Metrics derived from purchase orders
pub mod performance;

pub use performance::{compute_vendor_performance, VendorPerformance};
pub use purchase_orders::PurchaseOrderService;
pub use vendors::VendorService;
