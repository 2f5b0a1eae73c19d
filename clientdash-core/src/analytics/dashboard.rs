//! Headline metrics for the dashboard KPI row.
//!
//! Everything here is recomputed from the full record slice on each call.
//! Nothing is cached or maintained incrementally.

use serde::Serialize;

use crate::types::{ClientRecord, KnownStatus};

/// Aggregates shown in the KPI widgets.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardMetrics {
    // Totals
    /// Sum of all order prices
    pub total_revenue: f64,
    /// Number of records
    pub total_clients: usize,
    /// Sum of headshot counts
    pub total_headshots: u64,

    // Status counts
    /// Records whose status is exactly "Delivered"
    pub delivered_count: usize,
    /// Records whose status is exactly "In Progress"
    pub in_progress_count: usize,

    // Ratios (0 when there are no records)
    /// delivered / total, in `0.0..=1.0`
    pub completion_rate: f64,
    /// total revenue / total clients
    pub average_order_value: f64,
}

impl DashboardMetrics {
    /// Compute every aggregate in one pass.
    pub fn compute(records: &[ClientRecord]) -> Self {
        let mut metrics = Self {
            total_clients: records.len(),
            ..Self::default()
        };

        for record in records {
            metrics.total_revenue += record.price;
            metrics.total_headshots += u64::from(record.headshot_count);
            match record.known_status() {
                Some(KnownStatus::Delivered) => metrics.delivered_count += 1,
                Some(KnownStatus::InProgress) => metrics.in_progress_count += 1,
                _ => {}
            }
        }

        if metrics.total_clients > 0 {
            let total = metrics.total_clients as f64;
            metrics.completion_rate = metrics.delivered_count as f64 / total;
            metrics.average_order_value = metrics.total_revenue / total;
        }

        metrics
    }

    /// Completion rate as a percentage.
    pub fn completion_percent(&self) -> f64 {
        self.completion_rate * 100.0
    }

    /// Format the completion rate for display (e.g., "66.7%").
    pub fn format_completion_rate(&self) -> String {
        format!("{:.1}%", self.completion_percent())
    }
}
