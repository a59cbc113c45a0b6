use serde::{Deserialize, Serialize};

/// One branch's (or one staff member's) financial and operational snapshot
/// for a single calendar month.
///
/// Money fields are yen. Rates are percentages (0-100 scale, not 0-1).
/// `profit_margin` and `self_pay_rate` are derived values: any code that
/// sums records must recompute them from the summed absolutes afterwards,
/// never average the per-record percentages.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct MonthlyRecord {
    /// Sort key, zero-padded "YYYY-MM". Lexicographic order is
    /// chronological order.
    pub month: String,

    // Revenue breakdown
    pub total_revenue: f64,
    pub insurance_revenue: f64,
    pub self_pay_revenue: f64,
    pub other_revenue: f64,
    pub target_revenue: f64,

    // Cost of sales breakdown
    pub cost_materials: f64,
    pub cost_materials_self_pay: f64,
    pub cost_lab_insurance: f64,
    pub cost_lab_self_pay: f64,
    pub total_cost: f64,

    pub gross_profit: f64,

    // SG&A breakdown
    pub expense_personnel: f64,
    pub expense_specialist: f64,
    pub expense_training: f64,
    pub expense_ads: f64,
    pub expense_commission: f64,
    pub expense_depreciation: f64,
    pub expense_other_sga: f64,
    pub total_sga: f64,

    pub operating_profit: f64,
    /// Derived: operating_profit / total_revenue * 100.
    pub profit_margin: f64,

    // Patient counts
    pub new_patients: u32,
    pub total_patients: u32,

    /// Derived: self_pay_revenue / total_revenue * 100.
    pub self_pay_rate: f64,

    // Operational metrics. Averaged (not summed) when branches are rolled
    // up, over the count of branches that reported the month.
    pub unit_utilization_rate: f64,
    pub cancellation_rate: f64,

    // Web analytics counts
    pub hp_visits: u32,
    pub reserve_visits: u32,
    pub google_visits: u32,
}

impl MonthlyRecord {
    pub fn for_month(month: impl Into<String>) -> Self {
        MonthlyRecord {
            month: month.into(),
            ..MonthlyRecord::default()
        }
    }

    /// Folds another record for the same month into this one. Additive
    /// fields are summed; the rate fields `unit_utilization_rate` and
    /// `cancellation_rate` are summed provisionally so the caller can
    /// divide by the contributor count, and `profit_margin` /
    /// `self_pay_rate` are left stale until `recompute_rates`.
    pub fn absorb(&mut self, other: &MonthlyRecord) {
        self.total_revenue += other.total_revenue;
        self.insurance_revenue += other.insurance_revenue;
        self.self_pay_revenue += other.self_pay_revenue;
        self.other_revenue += other.other_revenue;
        self.target_revenue += other.target_revenue;

        self.cost_materials += other.cost_materials;
        self.cost_materials_self_pay += other.cost_materials_self_pay;
        self.cost_lab_insurance += other.cost_lab_insurance;
        self.cost_lab_self_pay += other.cost_lab_self_pay;
        self.total_cost += other.total_cost;

        self.gross_profit += other.gross_profit;

        self.expense_personnel += other.expense_personnel;
        self.expense_specialist += other.expense_specialist;
        self.expense_training += other.expense_training;
        self.expense_ads += other.expense_ads;
        self.expense_commission += other.expense_commission;
        self.expense_depreciation += other.expense_depreciation;
        self.expense_other_sga += other.expense_other_sga;
        self.total_sga += other.total_sga;

        self.operating_profit += other.operating_profit;

        self.new_patients += other.new_patients;
        self.total_patients += other.total_patients;

        self.unit_utilization_rate += other.unit_utilization_rate;
        self.cancellation_rate += other.cancellation_rate;

        self.hp_visits += other.hp_visits;
        self.reserve_visits += other.reserve_visits;
        self.google_visits += other.google_visits;
    }

    /// Recomputes the derived percentage fields from the absolute amounts.
    /// Zero revenue yields zero rates, not NaN.
    pub fn recompute_rates(&mut self) {
        if self.total_revenue > 0.0 {
            self.profit_margin = self.operating_profit / self.total_revenue * 100.0;
            self.self_pay_rate = self.self_pay_revenue / self.total_revenue * 100.0;
        } else {
            self.profit_margin = 0.0;
            self.self_pay_rate = 0.0;
        }
    }
}
