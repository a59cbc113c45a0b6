use dentadash_core::{Segment, StractureChart, DISPLAY_THRESHOLD_PCT};
use unicode_width::UnicodeWidthStr;

use crate::format;

const BAR_SCALE: f64 = 0.6; // 100% of revenue = 60 columns
const LABEL_WIDTH: usize = 12;

/// Renders the stracture waterfall as stacked percent-of-revenue bars.
/// Segments under the display threshold are skipped, matching the web
/// dashboard's behaviour; the amounts behind them are untouched.
pub fn render(label: &str, chart: &StractureChart) {
    println!("\n\x1b[1m{} ストラック図 (経営分析)\x1b[0m", label);
    println!("売上高合計 {} 円\n", format::yen(chart.total_revenue));

    if chart.total_revenue <= 0.0 {
        println!("売上データがありません");
        return;
    }

    println!("\x1b[1m売上構成\x1b[0m");
    for seg in &chart.revenue {
        line(seg);
    }

    println!(
        "\n\x1b[1m費用・利益構成\x1b[0m  (売上原価 {} / 販管費 {})",
        format::percent(chart.total_cost_share),
        format::percent(chart.total_sga_share)
    );
    for seg in &chart.costs {
        line(seg);
    }
    for seg in &chart.sga {
        line(seg);
    }
    line(&chart.operating_profit);
}

fn line(seg: &Segment) {
    if seg.share < DISPLAY_THRESHOLD_PCT {
        return;
    }
    let bar_len = (seg.share * BAR_SCALE).round().max(1.0) as usize;
    println!(
        "{} {} {:>5} {:>12} 円",
        pad_label(seg.label),
        "█".repeat(bar_len),
        format::percent(seg.share),
        format::yen(seg.amount),
    );
}

/// Pads the label to a fixed display width. Japanese labels are
/// double-width per character, so byte or char counts would misalign the
/// bars.
fn pad_label(label: &str) -> String {
    let width = UnicodeWidthStr::width(label);
    let padding = LABEL_WIDTH.saturating_sub(width);
    format!("{}{}", label, " ".repeat(padding))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pad_label_accounts_for_double_width() {
        // 4 double-width chars = display width 8, so 4 spaces of padding.
        assert_eq!(pad_label("保険診療").len(), "保険診療".len() + 4);
        assert_eq!(UnicodeWidthStr::width(pad_label("保険診療").as_str()), LABEL_WIDTH);
        assert_eq!(UnicodeWidthStr::width(pad_label("その他販管").as_str()), LABEL_WIDTH);
    }
}
