use super::utils::format_money;
use super::*;
use crate::app::itinerary::ItineraryRow;
use crate::app::TripDetail;
use ratatui::widgets::{List, ListItem, ListState};
use trip_api::{format_iso_date, Event};

pub fn render_itinerary_tab(frame: &mut Frame, detail: &TripDetail, area: Rect) {
    let rows = detail.rows();
    let days = rows
        .iter()
        .filter(|r| matches!(r, ItineraryRow::Day(_)))
        .count();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(format!(" Itinerary ({} days) ", days))
        .padding(Padding::horizontal(1));

    if rows.is_empty() {
        let empty = Paragraph::new("The trip ends before it starts.")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = rows.iter().map(row_item).collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("▶ ");
    let mut state = ListState::default().with_selected(Some(detail.selected_row));
    frame.render_stateful_widget(list, area, &mut state);
}

fn row_item<'a>(row: &ItineraryRow<'a>) -> ListItem<'a> {
    match *row {
        ItineraryRow::Day(date) => ListItem::new(Line::from(vec![
            Span::styled(
                format_iso_date(date),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {}", date.weekday()),
                Style::default().fg(Color::DarkGray),
            ),
        ])),
        ItineraryRow::Event(event) => {
            let mut spans = vec![
                Span::raw("   "),
                Span::styled(
                    format!("{:<12}", time_span(event)),
                    Style::default().fg(Color::Magenta),
                ),
                Span::styled(event.title.as_str(), Style::default().fg(Color::White)),
                Span::styled(
                    format!("  [{}]", event.kind),
                    Style::default().fg(Color::Cyan),
                ),
            ];
            if let Some(cost) = event.cost {
                spans.push(Span::styled(
                    format!("  {}", format_money(cost)),
                    Style::default().fg(Color::Green),
                ));
            }
            if let Some(notes) = event.notes.as_deref().filter(|n| !n.is_empty()) {
                spans.push(Span::styled(
                    format!("  {}", notes),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            ListItem::new(Line::from(spans))
        }
    }
}

fn time_span(event: &Event) -> String {
    let start = event.start_label().unwrap_or("--:--");
    match event.end_label() {
        Some(end) => format!("{}-{}", start, end),
        None => start.to_string(),
    }
}
