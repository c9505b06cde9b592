use super::utils::format_money;
use super::*;
use crate::app::budget::{BudgetData, UNCATEGORIZED};
use crate::app::{BudgetFocus, TripDetail};
use ratatui::widgets::{LineGauge, List, ListItem, ListState};
use trip_api::format_iso_date;

/// Same order for pie slices and their legend
pub const PALETTE: [Color; 12] = [
    Color::Blue,
    Color::Green,
    Color::Yellow,
    Color::Magenta,
    Color::Cyan,
    Color::Red,
    Color::LightBlue,
    Color::LightGreen,
    Color::LightYellow,
    Color::LightMagenta,
    Color::LightCyan,
    Color::LightRed,
];

pub fn render_budget_tab(frame: &mut Frame, detail: &TripDetail, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);
    render_totals(frame, &detail.budget, rows[0]);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rows[1]);
    let lists = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(cols[0]);

    render_envelopes(frame, detail, lists[0]);
    render_expenses(frame, detail, lists[1]);
    render_pie_panel(frame, &detail.budget, cols[1]);
}

fn focus_border(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn render_totals(frame: &mut Frame, budget: &BudgetData, area: Rect) {
    let planned = budget.planned_total();
    let actual = budget.actual_total();
    let remaining = planned - actual;
    let remaining_color = if remaining >= 0.0 {
        Color::Green
    } else {
        Color::Red
    };
    let muted = Style::default().fg(Color::DarkGray);
    let line = Line::from(vec![
        Span::styled("Planned ", muted),
        Span::styled(format_money(planned), Style::default().fg(Color::Yellow)),
        Span::styled("  |  Spent ", muted),
        Span::styled(format_money(actual), Style::default().fg(Color::White)),
        Span::styled("  |  Remaining ", muted),
        Span::styled(format_money(remaining), Style::default().fg(remaining_color)),
    ]);
    let paragraph = Paragraph::new(line).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Budget "),
    );
    frame.render_widget(paragraph, area);
}

/// Two rows per envelope: a label line and a spent gauge.
fn render_envelopes(frame: &mut Frame, detail: &TripDetail, area: Rect) {
    let focused = detail.budget_focus == BudgetFocus::Envelopes;
    let budget = &detail.budget;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_border(focused))
        .title(format!(" Envelopes ({}) ", budget.envelopes.len()))
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if budget.envelopes.is_empty() {
        frame.render_widget(
            Paragraph::new("No envelopes. Press a to add one.")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray)),
            inner,
        );
        return;
    }

    let fits = (inner.height / 2).max(1) as usize;
    let first = detail.selected_envelope.saturating_sub(fits - 1);
    let editing = detail.editing_envelope_id();

    for (slot, (i, envelope)) in budget
        .envelopes
        .iter()
        .enumerate()
        .skip(first)
        .take(fits)
        .enumerate()
    {
        let y = inner.y + (slot as u16) * 2;
        let label_area = Rect::new(inner.x, y, inner.width, 1);
        let gauge_area = Rect::new(inner.x, y + 1, inner.width, 1);

        let selected = focused && i == detail.selected_envelope;
        let actual = budget.envelope_actual(envelope.id);
        let pct = budget.envelope_percentage(envelope);
        let marker = if editing == Some(envelope.id) {
            "✎ "
        } else if selected {
            "▶ "
        } else {
            "  "
        };
        let name_style = if selected {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        let label = Line::from(vec![
            Span::styled(marker, Style::default().fg(Color::Yellow)),
            Span::styled(envelope.category.clone(), name_style),
            Span::styled(
                format!(
                    "  {} / {} ({}%)",
                    format_money(actual),
                    format_money(envelope.planned_amount),
                    pct
                ),
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        frame.render_widget(Paragraph::new(label), label_area);

        let gauge_color = if pct >= 100 {
            Color::Red
        } else if pct >= 80 {
            Color::Yellow
        } else {
            Color::Cyan
        };
        let gauge = LineGauge::default()
            .ratio(f64::from(pct) / 100.0)
            .label("")
            .filled_symbol(ratatui::symbols::line::THICK_HORIZONTAL)
            .unfilled_symbol("╌")
            .filled_style(Style::default().fg(gauge_color))
            .unfilled_style(Style::default().fg(Color::DarkGray));
        frame.render_widget(gauge, gauge_area);
    }
}

fn render_expenses(frame: &mut Frame, detail: &TripDetail, area: Rect) {
    let focused = detail.budget_focus == BudgetFocus::Expenses;
    let budget = &detail.budget;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_border(focused))
        .title(format!(" Expenses ({}) ", budget.expenses.len()))
        .padding(Padding::horizontal(1));

    if budget.expenses.is_empty() {
        let empty = Paragraph::new("No expenses recorded.")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = budget
        .expenses
        .iter()
        .map(|e| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{}  ", format_iso_date(e.spent_at_date)),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(e.description.clone(), Style::default().fg(Color::White)),
                Span::styled(
                    format!("  {:.2} {}", e.amount, e.currency),
                    Style::default().fg(Color::Green),
                ),
                Span::styled(
                    format!("  {}", budget.envelope_name(e.envelope_id)),
                    Style::default().fg(Color::Cyan),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("▶ ");
    let selected = focused.then_some(detail.selected_expense);
    let mut state = ListState::default().with_selected(selected);
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_pie_panel(frame: &mut Frame, budget: &BudgetData, area: Rect) {
    use tui_piechart::{PieChart, PieSlice};

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(" Spend by envelope ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let slices = budget.spend_slices();
    let total: f64 = slices.iter().map(|s| s.amount).sum();
    if slices.is_empty() || total <= 0.0 {
        let empty = Paragraph::new("Nothing spent yet")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }

    let pie_slices: Vec<PieSlice> = slices
        .iter()
        .enumerate()
        .map(|(i, s)| {
            PieSlice::new(
                s.label.as_str(),
                s.amount / total * 100.0,
                slice_color(i, &s.label),
            )
        })
        .collect();

    // Pie: square-ish (width/2 for aspect ratio), leaving room for the legend
    let legend_rows = slices.len() as u16 + 1;
    let pie_height = (inner.width / 2)
        .min(inner.height / 2)
        .min(inner.height.saturating_sub(legend_rows));
    let split = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(pie_height), Constraint::Min(0)])
        .split(inner);

    let pie = PieChart::new(pie_slices)
        .show_legend(false)
        .show_percentages(false);
    frame.render_widget(pie, split[0]);

    let legend_lines: Vec<Line> = slices
        .iter()
        .enumerate()
        .map(|(i, s)| {
            Line::from(vec![
                Span::styled("■ ", Style::default().fg(slice_color(i, &s.label))),
                Span::styled(
                    format!(
                        "{} {} ({:.0}%)",
                        s.label,
                        format_money(s.amount),
                        s.amount / total * 100.0
                    ),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        })
        .collect();
    let legend = Paragraph::new(legend_lines)
        .alignment(Alignment::Center)
        .block(Block::default().padding(Padding::new(0, 0, 1, 0)));
    frame.render_widget(legend, split[1]);
}

fn slice_color(index: usize, label: &str) -> Color {
    if label == UNCATEGORIZED {
        Color::Gray
    } else {
        PALETTE[index % PALETTE.len()]
    }
}
