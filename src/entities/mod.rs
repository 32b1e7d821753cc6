pub mod historical_performance;
pub mod purchase_order;
pub mod vendor;

pub use purchase_order::PurchaseOrderStatus;
