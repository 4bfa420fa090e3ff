pub mod audit;
pub mod logger;

pub use audit::AuditLog;
pub use logger::init_logger;
