use super::utils::format_money;
use super::*;
use crate::app::weather::format_fahrenheit;
use crate::app::members::member_label;
use crate::app::{OverviewFocus, TripDetail};
use ratatui::widgets::{List, ListItem, ListState};

pub fn render_overview_tab(frame: &mut Frame, detail: &TripDetail, area: Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    // Owner line plus one row per member, inside the borders
    let members_height = (detail.members.len() as u16 + 3).min(8);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(members_height)])
        .split(cols[1]);

    render_summary(frame, detail, cols[0]);
    render_destinations(frame, detail, right[0]);
    render_members(frame, detail, right[1]);
}

fn focus_border(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn render_summary(frame: &mut Frame, detail: &TripDetail, area: Rect) {
    let muted = Style::default().fg(Color::DarkGray);
    let planned = detail.budget.planned_total();
    let actual = detail.budget.actual_total();
    let actual_color = if planned > 0.0 && actual > planned {
        Color::Red
    } else {
        Color::Green
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("Events      ", muted),
            Span::styled(
                detail.event_count().to_string(),
                Style::default().fg(Color::White),
            ),
        ]),
        Line::from(vec![
            Span::styled("Planned     ", muted),
            Span::styled(format_money(planned), Style::default().fg(Color::Yellow)),
        ]),
        Line::from(vec![
            Span::styled("Spent       ", muted),
            Span::styled(format_money(actual), Style::default().fg(actual_color)),
        ]),
    ];

    // Condensed forecast, only once the weather tab has fetched it
    if let Some(weather) = detail.weather.forecast() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Forecast for {}", weather.city),
            muted,
        )));
        let strip: Vec<Span> = weather
            .days
            .iter()
            .flat_map(|day| {
                [
                    Span::styled(
                        format!("{} ", day.date.weekday().to_string().get(..3).unwrap_or("")),
                        muted,
                    ),
                    Span::styled(
                        format!("{}  ", format_fahrenheit(day.temp_max)),
                        Style::default().fg(Color::White),
                    ),
                ]
            })
            .collect();
        lines.push(Line::from(strip));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Summary ")
            .padding(Padding::horizontal(2)),
    );
    frame.render_widget(paragraph, area);
}

fn render_destinations(frame: &mut Frame, detail: &TripDetail, area: Rect) {
    let focused = detail.overview_focus == OverviewFocus::Destinations;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_border(focused))
        .title(format!(" Destinations ({}) ", detail.destinations.len()))
        .padding(Padding::horizontal(1));

    if detail.destinations.is_empty() {
        let empty = Paragraph::new("No stops yet. Press a to add one.")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = detail
        .destinations
        .iter()
        .enumerate()
        .map(|(i, d)| {
            let mut spans = vec![
                Span::styled(format!("{}. ", i + 1), Style::default().fg(Color::DarkGray)),
                Span::styled(d.location.name.clone(), Style::default().fg(Color::White)),
                Span::styled(
                    format!("  {}", d.location.kind),
                    Style::default().fg(Color::Cyan),
                ),
            ];
            if let Some(address) = &d.location.address {
                spans.push(Span::styled(
                    format!("  {}", address),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");
    let selected = focused.then_some(detail.selected_destination);
    let mut state = ListState::default().with_selected(selected);
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_members(frame: &mut Frame, detail: &TripDetail, area: Rect) {
    let focused = detail.overview_focus == OverviewFocus::Members;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_border(focused))
        .title(format!(" Members ({}) ", detail.members.len()))
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let owner = detail
        .trip
        .owner_id
        .map(|id| format!("User #{id}"))
        .unwrap_or_else(|| "unknown".to_string());
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("Owner  ", Style::default().fg(Color::DarkGray)),
            Span::styled(owner, Style::default().fg(Color::White)),
        ])),
        rows[0],
    );

    if detail.members.is_empty() {
        frame.render_widget(
            Paragraph::new("Not shared. Press f then a to add someone.")
                .style(Style::default().fg(Color::DarkGray)),
            rows[1],
        );
        return;
    }

    let items: Vec<ListItem> = detail
        .members
        .iter()
        .map(|m| {
            ListItem::new(Line::from(vec![
                Span::styled(member_label(m), Style::default().fg(Color::White)),
                Span::styled(format!(" · {}", m.role), Style::default().fg(Color::Cyan)),
            ]))
        })
        .collect();
    let list = List::new(items)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");
    let mut state = ListState::default().with_selected(focused.then_some(detail.selected_member));
    frame.render_stateful_widget(list, rows[1], &mut state);
}
