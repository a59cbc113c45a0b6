use dentadash_core::service::kpi;
use dentadash_core::{Delta, Segment, StractureChart, DISPLAY_THRESHOLD_PCT};
use ratatui::{
    prelude::*,
    widgets::{Bar, BarChart, BarGroup, Block, BorderType, Borders, Gauge, Padding, Paragraph},
};

use crate::format;
use crate::tui::app::{ChartView, DashboardApp};

// --- THEME ---
struct Theme {
    primary: Color,
    muted: Color,
    text: Color,
    insurance: Color,
    self_pay: Color,
    profit: Color,
    cost: Color,
    warn: Color,
}

const THEME: Theme = Theme {
    primary: Color::Cyan,
    muted: Color::DarkGray,
    text: Color::White,
    insurance: Color::Blue,
    self_pay: Color::Cyan,
    profit: Color::Green,
    cost: Color::Red,
    warn: Color::Yellow,
};

pub fn draw(frame: &mut Frame, app: &DashboardApp) {
    let size = frame.area();

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Chart + Info panel
            Constraint::Length(1), // Footer / Help
        ])
        .split(size);

    draw_header(frame, app, main_layout[0]);

    if app.active_series().is_empty() {
        frame.render_widget(
            Paragraph::new("データがありません (import するか --demo を使ってください)")
                .alignment(Alignment::Center),
            main_layout[1],
        );
    } else {
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(70), // Chart area
                Constraint::Length(1),      // Gutter
                Constraint::Percentage(30), // Info panel
            ])
            .split(main_layout[1]);

        match app.view {
            ChartView::Revenue => draw_revenue_chart(frame, app, content_chunks[0]),
            ChartView::Stracture => draw_stracture(frame, app, content_chunks[0]),
        }
        draw_info_panel(frame, app, content_chunks[2]);
    }

    let help = Line::from(vec![
        Span::styled("月: ", Style::default().fg(THEME.muted)),
        Span::styled("←/→", Style::default().fg(THEME.text)),
        Span::raw("  "),
        Span::styled("院: ", Style::default().fg(THEME.muted)),
        Span::styled("b", Style::default().fg(THEME.text)),
        Span::raw("  "),
        Span::styled("個人: ", Style::default().fg(THEME.muted)),
        Span::styled("s", Style::default().fg(THEME.text)),
        Span::raw("  "),
        Span::styled("グラフ: ", Style::default().fg(THEME.muted)),
        Span::styled("v", Style::default().fg(THEME.text)),
        Span::raw("  "),
        Span::styled("終了: ", Style::default().fg(THEME.muted)),
        Span::styled("q", Style::default().fg(THEME.text)),
    ]);
    let footer = Paragraph::new(help)
        .alignment(Alignment::Center)
        .style(Style::default().fg(THEME.muted));
    frame.render_widget(footer, main_layout[2]);
}

fn draw_header(frame: &mut Frame, app: &DashboardApp, area: Rect) {
    let header_block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(THEME.muted));

    let header_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(30),
            Constraint::Min(1),
            Constraint::Length(34),
        ])
        .split(area);

    let mut title_spans = vec![Span::styled(
        "DENTADASH",
        Style::default().fg(THEME.primary).add_modifier(Modifier::BOLD),
    )];
    if app.demo {
        title_spans.push(Span::raw(" "));
        title_spans.push(Span::styled(
            " DEMO ",
            Style::default().fg(Color::Black).bg(THEME.warn),
        ));
    }
    let app_title = Paragraph::new(Line::from(title_spans))
        .block(Block::default().padding(Padding::new(0, 0, 1, 0)));
    frame.render_widget(app_title, header_layout[0]);

    let month = app
        .current_month()
        .map(|r| r.month.clone())
        .unwrap_or_else(|| "----".to_string());
    let nav_text = Line::from(vec![
        Span::styled(" < ", Style::default().fg(THEME.text)),
        Span::styled(
            format!("{} {}", month, app.target_label()),
            Style::default().fg(THEME.text).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" > ", Style::default().fg(THEME.text)),
    ]);
    let nav = Paragraph::new(nav_text)
        .alignment(Alignment::Right)
        .block(Block::default().padding(Padding::new(0, 0, 1, 0)));
    frame.render_widget(nav, header_layout[2]);

    frame.render_widget(header_block, area);
}

/// Stacked-look revenue chart: for every month a blue insurance bar and a
/// cyan self-pay bar, scaled to 万円.
fn draw_revenue_chart(frame: &mut Frame, app: &DashboardApp, area: Rect) {
    let series = app.active_series();

    let mut bar_data: Vec<(String, u64, Color)> = Vec::new();
    for record in series {
        // Bars are labeled with the month number only; the year lives in
        // the header.
        let label = record
            .month
            .split('-')
            .nth(1)
            .unwrap_or(record.month.as_str())
            .to_string();
        bar_data.push((label, (record.insurance_revenue / 10_000.0) as u64, THEME.insurance));
        bar_data.push((String::new(), (record.self_pay_revenue / 10_000.0) as u64, THEME.self_pay));
        bar_data.push((String::new(), 0, Color::Reset)); // Spacer
    }

    let bar_items: Vec<Bar> = bar_data
        .iter()
        .map(|(label, value, color)| {
            Bar::default()
                .label(label.as_str())
                .value(*value)
                .style(Style::default().fg(*color))
                .text_value(if *value > 0 {
                    format!("{}", value)
                } else {
                    String::new()
                })
        })
        .collect();

    let max = bar_data.iter().map(|(_, v, _)| *v).max().unwrap_or(0);

    let chart_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(THEME.muted))
        .title(" 月次売上推移 (万円 / 青=保険 水=自費) ");

    let chart = BarChart::default()
        .block(chart_block)
        .bar_width(4)
        .bar_gap(0)
        .data(BarGroup::default().bars(&bar_items))
        .max(max.max(1));

    frame.render_widget(chart, area);
}

/// Text rendition of the stracture waterfall for the selected month.
fn draw_stracture(frame: &mut Frame, app: &DashboardApp, area: Rect) {
    let Some(record) = app.current_month() else {
        return;
    };
    let chart = StractureChart::from_record(record);

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled(
        format!("売上高合計 {} 円", format::yen(chart.total_revenue)),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));

    let mut group = |title: &str, segments: &[Segment], color: Color, lines: &mut Vec<Line>| {
        lines.push(Line::from(Span::styled(
            title.to_string(),
            Style::default().fg(THEME.muted),
        )));
        for seg in segments {
            if seg.share < DISPLAY_THRESHOLD_PCT {
                continue;
            }
            let bar = "█".repeat((seg.share / 2.0).round().max(1.0) as usize);
            lines.push(Line::from(vec![
                Span::styled(format!("{:　<6}", seg.label), Style::default().fg(THEME.text)),
                Span::styled(bar, Style::default().fg(color)),
                Span::styled(
                    format!(" {:>5} {}", format::percent(seg.share), format::yen(seg.amount)),
                    Style::default().fg(THEME.muted),
                ),
            ]));
        }
    };

    group("売上構成", &chart.revenue, THEME.insurance, &mut lines);
    group("売上原価", &chart.costs, THEME.cost, &mut lines);
    group("販管費", &chart.sga, THEME.warn, &mut lines);
    group(
        "営業利益",
        std::slice::from_ref(&chart.operating_profit),
        THEME.profit,
        &mut lines,
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(THEME.muted))
        .title(" ストラック図 (経営分析) ");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn delta_span(delta: &Delta) -> Span<'static> {
    let color = if delta.positive { THEME.profit } else { THEME.cost };
    Span::styled(format!(" ({})", delta.text), Style::default().fg(color))
}

fn draw_info_panel(frame: &mut Frame, app: &DashboardApp, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(10), // KPI summary
            Constraint::Min(1),     // Target gauge
        ])
        .split(area);

    let Some(kpis) = kpi::monthly(app.active_series(), app.month_idx) else {
        return;
    };

    let info_text = vec![
        Line::from(vec![Span::styled(
            "サマリー",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from(vec![
            Span::styled("売上高: ", Style::default().fg(THEME.muted)),
            Span::styled(
                format!("{} 円", format::yen(kpis.revenue)),
                Style::default().fg(THEME.text).add_modifier(Modifier::BOLD),
            ),
            delta_span(&kpis.revenue_delta),
        ]),
        Line::from(vec![
            Span::styled("医業利益: ", Style::default().fg(THEME.muted)),
            Span::styled(
                format!("{} 円", format::yen(kpis.operating_profit)),
                Style::default().fg(THEME.profit).add_modifier(Modifier::BOLD),
            ),
            delta_span(&kpis.profit_delta),
        ]),
        Line::from(vec![
            Span::styled("利益率: ", Style::default().fg(THEME.muted)),
            Span::styled(
                format::percent(kpis.profit_margin),
                Style::default().fg(THEME.text),
            ),
        ]),
        Line::from(vec![
            Span::styled("新患数: ", Style::default().fg(THEME.muted)),
            Span::styled(
                format!("{} 名", kpis.new_patients),
                Style::default().fg(THEME.text),
            ),
            delta_span(&kpis.patients_delta),
        ]),
        Line::from(vec![
            Span::styled("自費率: ", Style::default().fg(THEME.muted)),
            Span::styled(
                format::percent(kpis.self_pay_rate),
                Style::default().fg(THEME.self_pay),
            ),
            delta_span(&kpis.self_pay_delta),
        ]),
    ];

    let info_block = Paragraph::new(info_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(THEME.muted))
            .title(format!(" {} ", app.target_label())),
    );
    frame.render_widget(info_block, chunks[0]);

    // The stored progress value is unclamped; only the gauge caps at 100%.
    let progress = kpis.target_progress;
    let label = format!("目標達成率 {:.1}%", progress);
    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(" 売上目標 ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(THEME.muted)),
        )
        .gauge_style(Style::default().fg(if progress >= 100.0 {
            THEME.profit
        } else {
            THEME.primary
        }))
        .ratio((progress / 100.0).clamp(0.0, 1.0))
        .label(label);
    frame.render_widget(gauge, chunks[1]);
}
