use crate::app::{App, Screen};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Paragraph},
    Frame,
};

mod budget_tab;
mod confirm_dialog;
mod detail_view;
mod itinerary_tab;
mod login_view;
mod overview_tab;
mod trips_view;
pub(super) mod utils;
pub(super) mod widgets;
mod weather_tab;

const LABEL: &str = " Trip Planner";

pub fn render(frame: &mut Frame, app: &mut App) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, root[0], app);

    let body = root[1];
    match app.screen {
        Screen::Login | Screen::Register => login_view::render_login_view(frame, app, body),
        Screen::Trips => trips_view::render_trips_view(frame, app, body),
        Screen::TripDetail => detail_view::render_detail_view(frame, app, body),
    }

    render_status_line(frame, root[2], app);

    // Delete confirmation renders on top of any screen
    if app.delete_context.is_some() {
        confirm_dialog::render_confirm_dialog(frame, app);
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &mut App) {
    // 1 blank row, then the title row with 2-char side padding
    let row = Rect {
        x: area.x + 2,
        y: area.y + 1,
        width: area.width.saturating_sub(4),
        height: area.height.saturating_sub(1),
    };
    let throbber_area = Rect {
        x: row.x + 1,
        y: row.y,
        width: 1,
        height: 1,
    };
    let label_area = Rect {
        x: throbber_area.x + 1,
        y: row.y,
        width: row.width.saturating_sub(2),
        height: 1,
    };

    let throbber = throbber_widgets_tui::Throbber::default()
        .style(Style::default().fg(Color::Yellow))
        .throbber_style(Style::default().fg(Color::Yellow))
        .throbber_set(throbber_widgets_tui::BRAILLE_SIX)
        .use_type(if app.is_loading {
            throbber_widgets_tui::WhichUse::Spin
        } else {
            throbber_widgets_tui::WhichUse::Full
        });
    frame.render_stateful_widget(throbber, throbber_area, &mut app.throbber_state);
    frame.render_widget(
        Paragraph::new(Span::styled(
            LABEL,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        label_area,
    );

    let user = match app.username() {
        Some(name) => Line::from(vec![
            Span::styled("Signed in as ", Style::default().fg(Color::DarkGray)),
            Span::styled(name.to_string(), Style::default().fg(Color::Cyan)),
        ]),
        None => Line::from(Span::styled(
            "Not signed in",
            Style::default().fg(Color::DarkGray),
        )),
    };
    frame.render_widget(Paragraph::new(user).alignment(Alignment::Right), label_area);
}

fn render_status_line(frame: &mut Frame, area: Rect, app: &App) {
    let Some(message) = &app.status_message else {
        return;
    };
    let area = Rect {
        x: area.x + 2,
        width: area.width.saturating_sub(4),
        ..area
    };
    frame.render_widget(
        Paragraph::new(Span::styled(
            message.as_str(),
            Style::default().fg(Color::LightYellow),
        )),
        area,
    );
}
