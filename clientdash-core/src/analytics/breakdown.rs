//! Chart series derived from the record set.

use serde::Serialize;

use crate::types::ClientRecord;

/// Share of records carrying one status label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusShare {
    /// Label exactly as it appears in the sheet
    pub status: String,
    /// Number of records with this label
    pub count: usize,
    /// count / total * 100
    pub percentage: f64,
}

impl StatusShare {
    /// Percentage with one decimal (e.g., "33.3%").
    pub fn format_percentage(&self) -> String {
        format!("{:.1}%", self.percentage)
    }
}

/// Record counts grouped by status, in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatusBreakdown {
    pub shares: Vec<StatusShare>,
}

impl StatusBreakdown {
    /// Group records by their status label.
    pub fn compute(records: &[ClientRecord]) -> Self {
        let mut shares: Vec<StatusShare> = Vec::new();

        for record in records {
            match shares.iter_mut().find(|s| s.status == record.status) {
                Some(share) => share.count += 1,
                None => shares.push(StatusShare {
                    status: record.status.clone(),
                    count: 1,
                    percentage: 0.0,
                }),
            }
        }

        let total = records.len() as f64;
        for share in &mut shares {
            share.percentage = share.count as f64 / total * 100.0;
        }

        Self { shares }
    }

    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }

    /// Count for a label, 0 if absent.
    pub fn count_for(&self, status: &str) -> usize {
        self.shares
            .iter()
            .find(|s| s.status == status)
            .map(|s| s.count)
            .unwrap_or(0)
    }
}

/// One bar in the revenue chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenuePoint {
    pub name: String,
    pub revenue: f64,
    pub headshots: u32,
    pub status: String,
}

/// One point per record, in sheet order.
pub fn revenue_series(records: &[ClientRecord]) -> Vec<RevenuePoint> {
    records
        .iter()
        .map(|r| RevenuePoint {
            name: r.client_name.clone(),
            revenue: r.price,
            headshots: r.headshot_count,
            status: r.status.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, price: f64, status: &str) -> ClientRecord {
        ClientRecord {
            client_name: name.to_string(),
            headshot_count: 2,
            price,
            status: status.to_string(),
            email: String::new(),
        }
    }

    #[test]
    fn test_breakdown_first_appearance_order() {
        let records = vec![
            record("A", 1.0, "Pending"),
            record("B", 1.0, "Delivered"),
            record("C", 1.0, "Pending"),
            record("D", 1.0, "On Hold"),
        ];

        let breakdown = StatusBreakdown::compute(&records);
        let labels: Vec<&str> = breakdown.shares.iter().map(|s| s.status.as_str()).collect();
        assert_eq!(labels, vec!["Pending", "Delivered", "On Hold"]);
        assert_eq!(breakdown.count_for("Pending"), 2);
        assert_eq!(breakdown.count_for("Cancelled"), 0);
        assert_eq!(breakdown.shares[0].percentage, 50.0);
        assert_eq!(breakdown.shares[1].format_percentage(), "25.0%");
    }

    #[test]
    fn test_breakdown_empty() {
        let breakdown = StatusBreakdown::compute(&[]);
        assert!(breakdown.is_empty());
    }

    #[test]
    fn test_empty_status_is_its_own_group() {
        let records = vec![record("A", 1.0, ""), record("B", 1.0, "")];
        let breakdown = StatusBreakdown::compute(&records);
        assert_eq!(breakdown.shares.len(), 1);
        assert_eq!(breakdown.shares[0].percentage, 100.0);
    }

    #[test]
    fn test_revenue_series_keeps_order() {
        let records = vec![record("Zed", 300.0, "Pending"), record("Amy", 100.0, "Delivered")];
        let series = revenue_series(&records);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].name, "Zed");
        assert_eq!(series[0].revenue, 300.0);
        assert_eq!(series[1].status, "Delivered");
        assert_eq!(series[1].headshots, 2);
    }
}
