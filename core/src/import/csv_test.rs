use crate::import::csv::{parse_csv, ParseOutcome, WarningKind};
use crate::model::{BranchId, DentalDataMap};

fn must_parse(input: &str) -> DentalDataMap {
    match parse_csv(input) {
        ParseOutcome::Parsed { data, .. } => data,
        other => panic!("expected Parsed, got {other:?}"),
    }
}

#[test]
fn two_branches_roll_up_into_all() {
    let csv = "\
month,branchId,staffId,staffName,totalRevenue,insuranceRevenue,selfPayRevenue,otherRevenue
2024-01,urayasu,,,1000000,600000,400000,0
2024-01,marunouchi,,,500000,300000,200000,0
";
    let data = must_parse(csv);
    assert_eq!(data.all.len(), 1);
    let all = &data.all[0];
    assert_eq!(all.month, "2024-01");
    assert_eq!(all.total_revenue, 1_500_000.0);
    assert_eq!(all.insurance_revenue, 900_000.0);
    assert_eq!(all.self_pay_revenue, 600_000.0);
    assert!((all.self_pay_rate - 40.0).abs() < 1e-9);
}

#[test]
fn staff_rows_fold_into_their_branch() {
    let csv = "\
month,branchId,staffId,staffName,totalRevenue
2024-02,urayasu,dr_tanaka,田中 太郎,300000
";
    let data = must_parse(csv);

    // The staff member's own series exists...
    assert_eq!(data.personnel.len(), 1);
    let tanaka = &data.personnel[0];
    assert_eq!(tanaka.id, "dr_tanaka");
    assert_eq!(tanaka.name, "田中 太郎");
    assert_eq!(tanaka.branch_id, BranchId::Urayasu);
    assert_eq!(tanaka.monthly.len(), 1);
    assert_eq!(tanaka.monthly[0].total_revenue, 300_000.0);

    // ...and the contribution also shows up as the branch total.
    assert_eq!(data.urayasu.len(), 1);
    assert_eq!(data.urayasu[0].month, "2024-02");
    assert_eq!(data.urayasu[0].total_revenue, 300_000.0);
    assert_eq!(data.all[0].total_revenue, 300_000.0);
}

#[test]
fn staff_and_branch_rows_merge_per_month() {
    let csv = "\
month,branchId,staffId,staffName,totalRevenue,selfPayRevenue,operatingProfit
2024-01,urayasu,dr_tanaka,田中 太郎,400000,100000,40000
2024-01,urayasu,dr_sato,佐藤 花子,600000,300000,110000
";
    let data = must_parse(csv);
    assert_eq!(data.urayasu.len(), 1, "duplicate months must merge");
    let month = &data.urayasu[0];
    assert_eq!(month.total_revenue, 1_000_000.0);
    assert_eq!(month.self_pay_revenue, 400_000.0);
    // Branch rates come from the summed absolutes, not averaged rows.
    assert!((month.self_pay_rate - 40.0).abs() < 1e-9);
    assert!((month.profit_margin - 15.0).abs() < 1e-9);
    assert_eq!(data.personnel.len(), 2);
}

#[test]
fn duplicate_branch_rows_merge_not_duplicate() {
    let csv = "\
month,branchId,staffId,staffName,totalRevenue
2024-03,kunisaki,,,100000
2024-03,kunisaki,,,200000
";
    let data = must_parse(csv);
    assert_eq!(data.kunisaki.len(), 1);
    assert_eq!(data.kunisaki[0].total_revenue, 300_000.0);
}

#[test]
fn unknown_branch_rows_are_dropped() {
    let csv = "\
month,branchId,staffId,staffName,totalRevenue
2024-01,shibuya,,,100000
2024-01,shibuya,dr_ghost,誰か,100000
2024-01,urayasu,,,500000
";
    match parse_csv(csv) {
        ParseOutcome::Parsed { data, warnings } => {
            assert_eq!(data.urayasu.len(), 1);
            assert!(data.marunouchi.is_empty());
            // The staff row with an unknown branch must not leak a
            // personnel entry either.
            assert!(data.personnel.is_empty());
            let dropped: Vec<_> = warnings
                .iter()
                .filter(|w| w.kind == WarningKind::UnknownBranch)
                .collect();
            assert_eq!(dropped.len(), 2);
            assert_eq!(dropped[0].raw, "shibuya");
        }
        other => panic!("expected Parsed, got {other:?}"),
    }
}

#[test]
fn malformed_numeric_cells_degrade_to_zero_with_report() {
    let csv = "\
month,branchId,staffId,staffName,totalRevenue,insuranceRevenue
2024-01,urayasu,,,not_a_number,250000
";
    match parse_csv(csv) {
        ParseOutcome::Parsed { data, warnings } => {
            assert_eq!(data.urayasu[0].total_revenue, 0.0);
            assert_eq!(data.urayasu[0].insurance_revenue, 250_000.0);
            assert_eq!(warnings.len(), 1);
            let w = &warnings[0];
            assert_eq!(w.line, 2);
            assert_eq!(w.column, "totalRevenue");
            assert_eq!(w.raw, "not_a_number");
            assert_eq!(w.kind, WarningKind::BadNumber);
        }
        other => panic!("expected Parsed, got {other:?}"),
    }
}

#[test]
fn empty_numeric_cells_are_silent_zeros() {
    let csv = "\
month,branchId,staffId,staffName,totalRevenue,insuranceRevenue
2024-01,urayasu,,,,
";
    match parse_csv(csv) {
        ParseOutcome::Parsed { data, warnings } => {
            assert_eq!(data.urayasu[0].total_revenue, 0.0);
            assert!(warnings.is_empty(), "empty cells are not data errors");
        }
        other => panic!("expected Parsed, got {other:?}"),
    }
}

#[test]
fn short_rows_are_dropped_with_report() {
    let csv = "\
month,branchId,staffId,staffName,totalRevenue
2024-01,urayasu
2024-01,urayasu,,,500000
";
    match parse_csv(csv) {
        ParseOutcome::Parsed { data, warnings } => {
            assert_eq!(data.urayasu.len(), 1);
            assert_eq!(data.urayasu[0].total_revenue, 500_000.0);
            assert!(warnings.iter().any(|w| w.kind == WarningKind::ShortRow));
        }
        other => panic!("expected Parsed, got {other:?}"),
    }
}

#[test]
fn header_only_is_empty_not_demo() {
    let csv = "month,branchId,staffId,staffName,totalRevenue\n";
    assert_eq!(parse_csv(csv), ParseOutcome::Empty);
}

#[test]
fn blank_input_is_failed() {
    assert!(matches!(parse_csv(""), ParseOutcome::Failed { .. }));
    assert!(matches!(parse_csv("   \n  \n"), ParseOutcome::Failed { .. }));
}

#[test]
fn months_sort_ascending_regardless_of_input_order() {
    let csv = "\
month,branchId,staffId,staffName,totalRevenue
2024-03,urayasu,,,300
2024-01,urayasu,,,100
2024-02,urayasu,,,200
";
    let data = must_parse(csv);
    let months: Vec<&str> = data.urayasu.iter().map(|r| r.month.as_str()).collect();
    assert_eq!(months, vec!["2024-01", "2024-02", "2024-03"]);
}

#[test]
fn blank_rate_cells_recompute_from_row_absolutes() {
    let csv = "\
month,branchId,staffId,staffName,totalRevenue,selfPayRevenue,operatingProfit,profitMargin,selfPayRate
2024-01,urayasu,dr_tanaka,田中 太郎,200000,50000,40000,,
";
    let data = must_parse(csv);
    let row = &data.personnel[0].monthly[0];
    assert!((row.profit_margin - 20.0).abs() < 1e-9);
    assert!((row.self_pay_rate - 25.0).abs() < 1e-9);
}

#[test]
fn reparsing_is_deterministic() {
    let csv = "\
month,branchId,staffId,staffName,totalRevenue,selfPayRevenue,operatingProfit
2024-01,urayasu,,,1000000,350000,150000
2024-02,urayasu,dr_tanaka,田中 太郎,400000,100000,50000
2024-01,marunouchi,,,800000,200000,90000
";
    let first = must_parse(csv);
    let second = must_parse(csv);
    assert_eq!(first, second);
}

#[test]
fn additivity_holds_for_every_month() {
    let csv = "\
month,branchId,staffId,staffName,totalRevenue
2024-01,urayasu,,,100
2024-01,marunouchi,,,200
2024-02,marunouchi,,,300
2024-02,kunisaki,,,400
";
    let data = must_parse(csv);
    for all_month in &data.all {
        let sum: f64 = [&data.urayasu, &data.marunouchi, &data.kunisaki]
            .iter()
            .filter_map(|series| series.iter().find(|r| r.month == all_month.month))
            .map(|r| r.total_revenue)
            .sum();
        assert_eq!(all_month.total_revenue, sum);
    }
}
