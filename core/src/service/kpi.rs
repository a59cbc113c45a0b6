use serde::{Deserialize, Serialize};

use crate::model::MonthlyRecord;

/// A formatted period-over-period movement, ready for a KPI card chip.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Delta {
    /// "+12.3%", "-4.0%", "+1.2pt" ...
    pub text: String,
    pub positive: bool,
}

/// Relative growth versus the previous period. No previous value (or a
/// previous value of zero) is reported as "0.0%" and positive by
/// convention, never NaN.
pub fn growth(current: f64, previous: f64) -> Delta {
    if previous == 0.0 {
        return Delta {
            text: "0.0%".to_string(),
            positive: true,
        };
    }
    let diff = (current - previous) / previous * 100.0;
    Delta {
        text: format!("{}{:.1}%", if diff > 0.0 { "+" } else { "" }, diff),
        positive: diff >= 0.0,
    }
}

/// Point difference for rate-type KPIs (the self-pay rate card shows
/// "+1.2pt" rather than a relative percentage).
pub fn point_diff(current: f64, previous: f64) -> Delta {
    let diff = current - previous;
    Delta {
        text: format!("{}{:.1}pt", if diff > 0.0 { "+" } else { "" }, diff),
        positive: diff >= 0.0,
    }
}

/// Progress toward the revenue target in percent. Deliberately unclamped:
/// values over 100 are meaningful and only the progress-bar rendering caps
/// them. Zero target yields zero.
pub fn target_progress(revenue: f64, target: f64) -> f64 {
    if target > 0.0 {
        revenue / target * 100.0
    } else {
        0.0
    }
}

/// The four dashboard cards for one selected month of a series.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyKpis {
    pub month: String,
    pub revenue: f64,
    pub revenue_delta: Delta,
    /// Raw percentage, possibly over 100.
    pub target_progress: f64,
    pub operating_profit: f64,
    pub profit_delta: Delta,
    pub profit_margin: f64,
    pub new_patients: u32,
    pub patients_delta: Delta,
    pub self_pay_rate: f64,
    pub self_pay_delta: Delta,
}

/// Derives the KPI card set for `month_idx` of `series`. Returns `None`
/// for an empty series so callers render a no-data state instead of
/// fabricated zeros. An out-of-range index clamps to the latest month.
pub fn monthly(series: &[MonthlyRecord], month_idx: usize) -> Option<MonthlyKpis> {
    if series.is_empty() {
        return None;
    }
    let idx = month_idx.min(series.len() - 1);
    let current = &series[idx];
    let previous = if idx > 0 { Some(&series[idx - 1]) } else { None };

    let rel = |field: fn(&MonthlyRecord) -> f64| match previous {
        Some(prev) => growth(field(current), field(prev)),
        None => growth(field(current), 0.0),
    };

    Some(MonthlyKpis {
        month: current.month.clone(),
        revenue: current.total_revenue,
        revenue_delta: rel(|r| r.total_revenue),
        target_progress: target_progress(current.total_revenue, current.target_revenue),
        operating_profit: current.operating_profit,
        profit_delta: rel(|r| r.operating_profit),
        profit_margin: current.profit_margin,
        new_patients: current.new_patients,
        patients_delta: rel(|r| r.new_patients as f64),
        self_pay_rate: current.self_pay_rate,
        self_pay_delta: match previous {
            Some(prev) => point_diff(current.self_pay_rate, prev.self_pay_rate),
            None => point_diff(current.self_pay_rate, current.self_pay_rate),
        },
    })
}

/// Annual roll-up across every month of the active series. Yearly rates
/// are derived from the summed absolutes, never averaged per-month.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnualSummary {
    pub months: usize,
    pub revenue: f64,
    pub target: f64,
    pub operating_profit: f64,
    pub insurance_revenue: f64,
    pub self_pay_revenue: f64,
    pub new_patients: u32,
    pub self_pay_rate: f64,
    pub profit_margin: f64,
    pub target_progress: f64,
}

pub fn annual(series: &[MonthlyRecord]) -> Option<AnnualSummary> {
    if series.is_empty() {
        return None;
    }
    let mut revenue = 0.0;
    let mut target = 0.0;
    let mut profit = 0.0;
    let mut insurance = 0.0;
    let mut self_pay = 0.0;
    let mut patients = 0u32;
    for r in series {
        revenue += r.total_revenue;
        target += r.target_revenue;
        profit += r.operating_profit;
        insurance += r.insurance_revenue;
        self_pay += r.self_pay_revenue;
        patients += r.new_patients;
    }
    let self_pay_rate = if revenue > 0.0 {
        self_pay / revenue * 100.0
    } else {
        0.0
    };
    let profit_margin = if revenue > 0.0 {
        profit / revenue * 100.0
    } else {
        0.0
    };
    Some(AnnualSummary {
        months: series.len(),
        revenue,
        target,
        operating_profit: profit,
        insurance_revenue: insurance,
        self_pay_revenue: self_pay,
        new_patients: patients,
        self_pay_rate,
        profit_margin,
        target_progress: target_progress(revenue, target),
    })
}
