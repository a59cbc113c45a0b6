use serde::Serialize;

use crate::model::MonthlyRecord;

/// Segments whose share falls below this are skipped by the renderers to
/// keep the waterfall readable. Display rule only; the underlying amounts
/// stay intact.
pub const DISPLAY_THRESHOLD_PCT: f64 = 1.0;

/// One bar of the stracture (ストラック図) waterfall: a line item and its
/// share of total revenue.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Segment {
    pub label: &'static str,
    pub amount: f64,
    /// Percent of total revenue; 0 when revenue is 0.
    pub share: f64,
}

/// The cost-structure chart: every line item of one month (or an annual
/// roll-up) expressed as percent-of-revenue, grouped the way the
/// management-accounting convention stacks them.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct StractureChart {
    pub total_revenue: f64,
    /// 保険診療 / 自由診療 / その他
    pub revenue: Vec<Segment>,
    /// 材料仕入 / 自費材料 / 保険技工 / 自費技工
    pub costs: Vec<Segment>,
    /// 人件費 / 専門医 / 広告費 / 減価償却 / その他販管
    pub sga: Vec<Segment>,
    pub operating_profit: Segment,
    pub total_cost_share: f64,
    pub total_sga_share: f64,
}

impl StractureChart {
    pub fn from_record(record: &MonthlyRecord) -> StractureChart {
        let revenue = record.total_revenue;
        let pct = |amount: f64| if revenue > 0.0 { amount / revenue * 100.0 } else { 0.0 };
        let seg = |label: &'static str, amount: f64| Segment {
            label,
            amount,
            share: pct(amount),
        };

        // The three small SG&A lines collapse into one catch-all bucket so
        // the chart keeps a small segment count.
        let other_sga =
            record.expense_training + record.expense_commission + record.expense_other_sga;

        StractureChart {
            total_revenue: revenue,
            revenue: vec![
                seg("保険診療", record.insurance_revenue),
                seg("自由診療", record.self_pay_revenue),
                seg("その他", record.other_revenue),
            ],
            costs: vec![
                seg("材料仕入", record.cost_materials),
                seg("自費材料", record.cost_materials_self_pay),
                seg("保険技工", record.cost_lab_insurance),
                seg("自費技工", record.cost_lab_self_pay),
            ],
            sga: vec![
                seg("人件費", record.expense_personnel),
                seg("専門医", record.expense_specialist),
                seg("広告費", record.expense_ads),
                seg("減価償却", record.expense_depreciation),
                seg("その他販管", other_sga),
            ],
            operating_profit: seg("営業利益", record.operating_profit),
            total_cost_share: pct(record.total_cost),
            total_sga_share: pct(record.total_sga),
        }
    }

    /// Annual variant: sums the whole series into one record-shaped total
    /// first. `None` for an empty series.
    pub fn from_annual(series: &[MonthlyRecord]) -> Option<StractureChart> {
        if series.is_empty() {
            return None;
        }
        let mut total = MonthlyRecord::for_month(format!("{} 年間", year_of(series)));
        for record in series {
            total.absorb(record);
        }
        total.recompute_rates();
        Some(StractureChart::from_record(&total))
    }
}

fn year_of(series: &[MonthlyRecord]) -> String {
    series
        .first()
        .and_then(|r| r.month.split('-').next())
        .unwrap_or("----")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> MonthlyRecord {
        let mut r = MonthlyRecord::for_month("2024-06");
        r.total_revenue = 1_000_000.0;
        r.insurance_revenue = 600_000.0;
        r.self_pay_revenue = 350_000.0;
        r.other_revenue = 50_000.0;
        r.cost_materials = 100_000.0;
        r.total_cost = 250_000.0;
        r.expense_personnel = 270_000.0;
        r.expense_training = 10_000.0;
        r.expense_commission = 15_000.0;
        r.expense_other_sga = 25_000.0;
        r.total_sga = 450_000.0;
        r.operating_profit = 300_000.0;
        r
    }

    #[test]
    fn shares_are_percent_of_revenue() {
        let chart = StractureChart::from_record(&record());
        assert!((chart.revenue[0].share - 60.0).abs() < 1e-9);
        assert!((chart.revenue[1].share - 35.0).abs() < 1e-9);
        assert!((chart.costs[0].share - 10.0).abs() < 1e-9);
        assert!((chart.operating_profit.share - 30.0).abs() < 1e-9);
        assert!((chart.total_cost_share - 25.0).abs() < 1e-9);
        assert!((chart.total_sga_share - 45.0).abs() < 1e-9);
    }

    #[test]
    fn catch_all_bucket_sums_three_lines() {
        let chart = StractureChart::from_record(&record());
        let other = chart.sga.iter().find(|s| s.label == "その他販管").unwrap();
        assert_eq!(other.amount, 50_000.0);
        assert!((other.share - 5.0).abs() < 1e-9);
    }

    #[test]
    fn zero_revenue_means_zero_shares() {
        let chart = StractureChart::from_record(&MonthlyRecord::for_month("2024-01"));
        assert_eq!(chart.operating_profit.share, 0.0);
        assert!(chart.revenue.iter().all(|s| s.share == 0.0));
    }

    #[test]
    fn annual_chart_sums_months() {
        let mut jan = record();
        jan.month = "2024-01".to_string();
        let mut feb = record();
        feb.month = "2024-02".to_string();
        let chart = StractureChart::from_annual(&[jan, feb]).unwrap();
        assert_eq!(chart.total_revenue, 2_000_000.0);
        // Shares are scale-invariant: doubling every amount keeps them.
        assert!((chart.operating_profit.share - 30.0).abs() < 1e-9);
    }

    #[test]
    fn annual_of_empty_series_is_none() {
        assert!(StractureChart::from_annual(&[]).is_none());
    }
}
