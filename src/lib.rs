pub mod api;
pub mod config;
pub mod datasource;
pub mod db;
pub mod domain;
pub mod engine;
pub mod error;
pub mod orchestration;

pub use config::Config;
pub use datasource::{DataSourceError, MockRecordStore, RecordStore, RestRecordStore};
pub use db::{init_db, Repository};
pub use domain::{Competition, Decimal, Employee, Month, PeriodBucket, SalesRecord};
pub use engine::{CommissionPlan, PayBreakdown};
pub use error::AppError;
pub use orchestration::PayrollService;
