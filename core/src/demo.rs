use rand::Rng;

use crate::aggregate;
use crate::model::{BranchId, DentalDataMap, MonthlyRecord, PersonnelSeries};

const MONTHS: [&str; 12] = [
    "2024-01", "2024-02", "2024-03", "2024-04", "2024-05", "2024-06", "2024-07", "2024-08",
    "2024-09", "2024-10", "2024-11", "2024-12",
];

/// Generates a full year of plausible, randomized demo data: three
/// branches, five staff, and the rolled-up "all" series.
///
/// This is explicitly non-deterministic, unlike the CSV import pipeline.
/// Any consumer that renders it must make clear synthetic content is
/// displayed; it must never stand in for a failed import silently.
pub fn generate_data_map() -> DentalDataMap {
    let mut rng = rand::thread_rng();

    let urayasu = monthly_series(&mut rng, 15_000_000.0);
    let marunouchi = monthly_series(&mut rng, 12_000_000.0);
    let kunisaki = monthly_series(&mut rng, 8_000_000.0);
    let all = aggregate::roll_up(&[&urayasu, &marunouchi, &kunisaki]);

    let staff = |rng: &mut _, id: &str, name: &str, branch, base: f64| PersonnelSeries {
        id: id.to_string(),
        name: name.to_string(),
        branch_id: branch,
        monthly: monthly_series(rng, base),
    };
    let personnel = vec![
        staff(&mut rng, "dr_tanaka", "田中 太郎", BranchId::Urayasu, 5_000_000.0),
        staff(&mut rng, "dr_sato", "佐藤 花子", BranchId::Urayasu, 4_500_000.0),
        staff(&mut rng, "dr_suzuki", "鈴木 一郎", BranchId::Marunouchi, 4_000_000.0),
        staff(&mut rng, "dr_yamada", "山田 美咲", BranchId::Marunouchi, 3_800_000.0),
        staff(&mut rng, "dr_watanabe", "渡辺 健", BranchId::Kunisaki, 3_000_000.0),
    ];

    DentalDataMap {
        all,
        urayasu,
        marunouchi,
        kunisaki,
        personnel,
    }
}

fn monthly_series<R: Rng>(rng: &mut R, base_revenue: f64) -> Vec<MonthlyRecord> {
    MONTHS
        .iter()
        .map(|month| {
            // 80-120% variance around the branch's base revenue.
            let variance = 0.8 + rng.gen::<f64>() * 0.4;
            let total_revenue = (base_revenue * variance).floor();
            let insurance_revenue = (total_revenue * 0.6).floor();
            let self_pay_revenue = (total_revenue * 0.35).floor();
            let other_revenue = total_revenue - insurance_revenue - self_pay_revenue;

            let total_cost = (total_revenue * 0.25).floor();
            let gross_profit = total_revenue - total_cost;
            let total_sga = (total_revenue * 0.45).floor();
            let operating_profit = gross_profit - total_sga;

            let mut r = MonthlyRecord::for_month(*month);
            r.total_revenue = total_revenue;
            r.insurance_revenue = insurance_revenue;
            r.self_pay_revenue = self_pay_revenue;
            r.other_revenue = other_revenue;
            r.target_revenue = (base_revenue * 1.05).floor();

            r.cost_materials = (total_cost * 0.4).floor();
            r.cost_materials_self_pay = (total_cost * 0.2).floor();
            r.cost_lab_insurance = (total_cost * 0.25).floor();
            r.cost_lab_self_pay = (total_cost * 0.15).floor();
            r.total_cost = total_cost;

            r.gross_profit = gross_profit;

            r.expense_personnel = (total_sga * 0.6).floor();
            r.expense_specialist = (total_sga * 0.1).floor();
            r.expense_training = (total_sga * 0.05).floor();
            r.expense_ads = (total_sga * 0.1).floor();
            r.expense_commission = (total_sga * 0.05).floor();
            r.expense_depreciation = (total_sga * 0.05).floor();
            r.expense_other_sga = (total_sga * 0.05).floor();
            r.total_sga = total_sga;

            r.operating_profit = operating_profit;

            r.new_patients = rng.gen_range(50..80);
            r.total_patients = rng.gen_range(300..400);

            r.unit_utilization_rate = 75.0 + rng.gen::<f64>() * 20.0;
            r.cancellation_rate = rng.gen::<f64>() * 5.0;

            r.hp_visits = rng.gen_range(1_000..5_000);
            r.reserve_visits = rng.gen_range(100..500);
            r.google_visits = rng.gen_range(500..3_000);

            r.recompute_rates();
            r
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_map_is_fully_populated() {
        let map = generate_data_map();
        assert_eq!(map.all.len(), 12);
        assert_eq!(map.urayasu.len(), 12);
        assert_eq!(map.marunouchi.len(), 12);
        assert_eq!(map.kunisaki.len(), 12);
        assert_eq!(map.personnel.len(), 5);
        assert!(!map.is_empty());
    }

    #[test]
    fn demo_all_series_is_the_branch_sum() {
        let map = generate_data_map();
        for (idx, all) in map.all.iter().enumerate() {
            let expected = map.urayasu[idx].total_revenue
                + map.marunouchi[idx].total_revenue
                + map.kunisaki[idx].total_revenue;
            assert_eq!(all.total_revenue, expected);
        }
    }

    #[test]
    fn demo_records_hold_revenue_identity() {
        let map = generate_data_map();
        for r in &map.urayasu {
            assert_eq!(
                r.total_revenue,
                r.insurance_revenue + r.self_pay_revenue + r.other_revenue
            );
            assert!(r.total_revenue >= 15_000_000.0 * 0.8);
            assert!(r.total_revenue <= 15_000_000.0 * 1.2);
        }
    }
}
