//! Analytics module for clientdash
//!
//! Pure functions from the current record set to what the dashboard shows:
//! - Headline KPIs ([`DashboardMetrics`])
//! - Status distribution ([`StatusBreakdown`])
//! - Per-client revenue bars ([`revenue_series`])
//!
//! None of these hold state. The presentation layer owns the records and
//! calls in whenever it needs fresh numbers.

pub mod breakdown;
pub mod dashboard;

pub use breakdown::{revenue_series, RevenuePoint, StatusBreakdown, StatusShare};
pub use dashboard::DashboardMetrics;
