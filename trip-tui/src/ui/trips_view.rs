use super::utils::trip_dates;
use super::widgets::{render_controls, render_form_modal};
use super::*;
use crate::app::TripFilter;
use crate::time_utils::today;
use ratatui::widgets::{Row, Table, TableState, Tabs};

pub fn render_trips_view(frame: &mut Frame, app: &App, body: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Search + filter
            Constraint::Min(0),    // Trip table
            Constraint::Length(3), // Controls
        ])
        .split(body);

    render_search_bar(frame, app, chunks[0]);
    render_trip_table(frame, app, chunks[1]);

    if app.trips.searching {
        render_controls(
            frame,
            chunks[2],
            &[("Type", "Search"), ("Enter", "Keep"), ("Esc", "Clear")],
        );
    } else {
        render_controls(
            frame,
            chunks[2],
            &[
                ("↑↓/jk", "Move"),
                ("Enter", "Open"),
                ("/", "Search"),
                ("f", "Filter"),
                ("n", "New"),
                ("w", "Weekend"),
                ("c", "Duplicate"),
                ("d", "Delete"),
                ("r", "Reload"),
                ("L", "Log out"),
                ("q", "Quit"),
            ],
        );
    }

    if let Some(form) = &app.trips.form {
        let template_hint = Line::from(vec![
            Span::styled("Ctrl+W", Style::default().fg(Color::Yellow)),
            Span::raw(": Next weekend template"),
        ]);
        render_form_modal(frame, form, "New Trip", Some(template_hint));
    }
}

fn render_search_bar(frame: &mut Frame, app: &App, area: Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(34)])
        .split(area);

    let page = &app.trips;
    let search_text = match (page.searching, page.search_input.value.is_empty()) {
        (true, _) => format!("{}█", page.search_input.value),
        (false, true) => "Press / to search".to_string(),
        (false, false) => page.search_input.value.clone(),
    };
    let border = if page.searching {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let search_box = Paragraph::new(search_text)
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(" Search ")
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(search_box, cols[0]);

    let titles: Vec<&str> = TripFilter::ALL.iter().map(|f| f.label()).collect();
    let selected = TripFilter::ALL
        .iter()
        .position(|f| *f == page.filter)
        .unwrap_or(0);
    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Filter (f) "),
        );
    frame.render_widget(tabs, cols[1]);
}

fn render_trip_table(frame: &mut Frame, app: &App, area: Rect) {
    let today = today();
    let visible = app.trips.visible_trips(today);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(format!(" Trips ({}/{}) ", visible.len(), app.trips.trips.len()))
        .padding(Padding::horizontal(1));

    if visible.is_empty() {
        let message = if app.trips.trips.is_empty() {
            "No trips yet. Press n to plan one."
        } else {
            "No trips match."
        };
        let empty = Paragraph::new(message)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let rows: Vec<Row> = visible
        .iter()
        .map(|trip| {
            let (tag, tag_color) = if trip.end_date < today {
                ("past", Color::DarkGray)
            } else if trip.start_date <= today {
                ("now", Color::Green)
            } else {
                ("upcoming", Color::Cyan)
            };
            Row::new(vec![
                Span::styled(trip.name.clone(), Style::default().fg(Color::White)),
                Span::styled(trip.destination.clone(), Style::default().fg(Color::Cyan)),
                Span::styled(trip_dates(trip), Style::default().fg(Color::Yellow)),
                Span::styled(tag, Style::default().fg(tag_color)),
            ])
        })
        .collect();

    let header = Row::new(vec!["Name", "Destination", "Dates", ""])
        .style(Style::default().fg(Color::DarkGray));
    let table = Table::new(
        rows,
        [
            Constraint::Percentage(32),
            Constraint::Percentage(22),
            Constraint::Percentage(36),
            Constraint::Percentage(10),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("▶ ");

    let mut state = TableState::default().with_selected(Some(app.trips.selected));
    frame.render_stateful_widget(table, area, &mut state);
}
