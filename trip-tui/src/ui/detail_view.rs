use super::utils::trip_dates;
use super::widgets::{render_controls, render_form_modal};
use super::*;
use crate::app::{BudgetFocus, DetailEditor, DetailTab, OverviewFocus, TripDetail};
use ratatui::widgets::Tabs;

pub fn render_detail_view(frame: &mut Frame, app: &App, body: Rect) {
    let Some(detail) = &app.detail else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Title + tabs
            Constraint::Min(0),    // Tab body
            Constraint::Length(3), // Controls
        ])
        .split(body);

    render_tab_bar(frame, detail, chunks[0]);

    match detail.tab {
        DetailTab::Overview => super::overview_tab::render_overview_tab(frame, detail, chunks[1]),
        DetailTab::Itinerary => {
            super::itinerary_tab::render_itinerary_tab(frame, detail, chunks[1])
        }
        DetailTab::Budget => super::budget_tab::render_budget_tab(frame, detail, chunks[1]),
        DetailTab::Weather => super::weather_tab::render_weather_tab(frame, detail, chunks[1]),
    }

    render_controls(frame, chunks[2], &controls_for(detail));

    if let Some(editor) = &detail.editor {
        let hint = match editor {
            DetailEditor::Expense(_) => Some(Line::from(Span::styled(
                "Envelope: type a category name, or leave blank for Uncategorized",
                Style::default().fg(Color::DarkGray),
            ))),
            _ => None,
        };
        render_form_modal(frame, editor.form(), editor.title(), hint);
    }
}

fn render_tab_bar(frame: &mut Frame, detail: &TripDetail, area: Rect) {
    let titles: Vec<String> = DetailTab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| format!("{} {}", i + 1, tab.title()))
        .collect();
    let title = Line::from(vec![
        Span::styled(
            format!(" {} ", detail.trip.name),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("· {} · {} ", detail.trip.destination, trip_dates(&detail.trip)),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    let tabs = Tabs::new(titles)
        .select(detail.tab.index())
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(title),
        );
    frame.render_widget(tabs, area);
}

fn controls_for(detail: &TripDetail) -> Vec<(&'static str, &'static str)> {
    let mut keys = vec![("Tab/1-4", "Switch tab")];
    match detail.tab {
        DetailTab::Overview => match detail.overview_focus {
            OverviewFocus::Destinations => keys.extend([
                ("f", "Members"),
                ("e", "Edit trip"),
                ("a", "Add stop"),
                ("d", "Remove stop"),
                ("J/K", "Reorder"),
            ]),
            OverviewFocus::Members => keys.extend([
                ("f", "Stops"),
                ("a", "Add member"),
                ("e", "Change role"),
                ("d", "Remove"),
            ]),
        },
        DetailTab::Itinerary => keys.extend([
            ("a", "Add event"),
            ("e", "Edit"),
            ("d", "Delete"),
        ]),
        DetailTab::Budget => match detail.budget_focus {
            BudgetFocus::Envelopes => keys.extend([
                ("f", "Expenses"),
                ("a", "Add envelope"),
                ("e", "Edit"),
                ("d", "Delete"),
            ]),
            BudgetFocus::Expenses => keys.extend([
                ("f", "Envelopes"),
                ("a", "Add expense"),
                ("d", "Delete"),
            ]),
        },
        DetailTab::Weather => keys.push(("r", "Retry")),
    }
    keys.extend([("p", "Export PDF"), ("Esc", "Back"), ("q", "Quit")]);
    keys
}
