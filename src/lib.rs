// Library interface for the fitrank scoring engine
// This allows integration tests to access the core functionality

pub mod config;
pub mod error;
pub mod export;
pub mod load;
pub mod logging;
pub mod models;
pub mod readiness;
pub mod records;
pub mod report;
pub mod scoring;
pub mod zones;

// Re-export commonly used types for convenience
pub use models::*;
pub use error::{FitrankError, Result};
pub use load::{AcwrStatus, LoadAggregator, LoadConfig, LoadSummary, TrendDirection};
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use readiness::{CompositeScoreEngine, ReadinessLevel, ReadinessReport};
pub use records::{RecordsReport, RecordsTracker};
pub use report::{DashboardEngine, DashboardReport, ReportData};
pub use scoring::{score_activity, score_bundle, ActivityScore, ScoringMethod};
pub use zones::{ZoneBoundaryResolver, ZoneStrategy};
