use std::collections::BTreeMap;

use crate::model::MonthlyRecord;

/// Derives the corporation-wide "all" series from the three branch series.
///
/// For every month present in at least one branch, additive fields are
/// summed across whichever branches reported it (missing branches
/// contribute nothing). `profit_margin` and `self_pay_rate` are recomputed
/// from the summed absolutes; `unit_utilization_rate` and
/// `cancellation_rate` are averaged over the count of branches that had
/// data for the month, so a branch with no data yet does not drag the
/// average down.
pub fn roll_up(branches: &[&[MonthlyRecord]]) -> Vec<MonthlyRecord> {
    // BTreeMap keeps the month union sorted; "YYYY-MM" keys order
    // chronologically under string comparison.
    let mut months: BTreeMap<String, (MonthlyRecord, u32)> = BTreeMap::new();

    for series in branches {
        for record in *series {
            let entry = months
                .entry(record.month.clone())
                .or_insert_with(|| (MonthlyRecord::for_month(&record.month), 0));
            entry.0.absorb(record);
            entry.1 += 1;
        }
    }

    months
        .into_values()
        .map(|(mut record, count)| {
            if count > 0 {
                record.unit_utilization_rate /= count as f64;
                record.cancellation_rate /= count as f64;
            }
            record.recompute_rates();
            record
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(month: &str, revenue: f64, insurance: f64, self_pay: f64) -> MonthlyRecord {
        let mut r = MonthlyRecord::for_month(month);
        r.total_revenue = revenue;
        r.insurance_revenue = insurance;
        r.self_pay_revenue = self_pay;
        r
    }

    #[test]
    fn sums_branches_per_month() {
        let urayasu = vec![record("2024-01", 1_000_000.0, 600_000.0, 400_000.0)];
        let marunouchi = vec![record("2024-01", 500_000.0, 300_000.0, 200_000.0)];
        let kunisaki: Vec<MonthlyRecord> = Vec::new();

        let all = roll_up(&[&urayasu, &marunouchi, &kunisaki]);
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].month, "2024-01");
        assert_eq!(all[0].total_revenue, 1_500_000.0);
        assert_eq!(all[0].insurance_revenue, 900_000.0);
        assert_eq!(all[0].self_pay_revenue, 600_000.0);
        assert!((all[0].self_pay_rate - 40.0).abs() < 1e-9);
    }

    #[test]
    fn month_union_and_ordering() {
        let a = vec![record("2024-02", 10.0, 0.0, 0.0)];
        let b = vec![record("2024-01", 20.0, 0.0, 0.0)];
        let c = vec![record("2024-02", 30.0, 0.0, 0.0)];

        let all = roll_up(&[&a, &b, &c]);
        let months: Vec<&str> = all.iter().map(|r| r.month.as_str()).collect();
        assert_eq!(months, vec!["2024-01", "2024-02"]);
        assert_eq!(all[1].total_revenue, 40.0);
    }

    #[test]
    fn operational_rates_average_over_reporting_branches() {
        let mut a = record("2024-01", 100.0, 0.0, 0.0);
        a.unit_utilization_rate = 80.0;
        a.cancellation_rate = 4.0;
        let mut b = record("2024-01", 100.0, 0.0, 0.0);
        b.unit_utilization_rate = 60.0;
        b.cancellation_rate = 2.0;
        let empty: Vec<MonthlyRecord> = Vec::new();

        // Two reporting branches: divide by 2, not by 3.
        let all = roll_up(&[&[a], &[b], &empty]);
        assert!((all[0].unit_utilization_rate - 70.0).abs() < 1e-9);
        assert!((all[0].cancellation_rate - 3.0).abs() < 1e-9);
    }

    #[test]
    fn margin_from_summed_absolutes() {
        let mut a = record("2024-01", 100.0, 0.0, 0.0);
        a.operating_profit = 10.0;
        let mut b = record("2024-01", 50.0, 0.0, 0.0);
        b.operating_profit = 20.0;
        let empty: Vec<MonthlyRecord> = Vec::new();

        let all = roll_up(&[&[a], &[b], &empty]);
        // 30 / 150 = 20%, not (10% + 40%) / 2 = 25%.
        assert!((all[0].profit_margin - 20.0).abs() < 1e-9);
    }

    #[test]
    fn empty_input_gives_empty_series() {
        let empty: Vec<MonthlyRecord> = Vec::new();
        assert!(roll_up(&[&empty, &empty, &empty]).is_empty());
    }
}
