use super::utils::centered_rect;
use super::widgets::form_lines;
use super::*;

pub fn render_login_view(frame: &mut Frame, app: &App, body: Rect) {
    let registering = app.screen == Screen::Register;
    let (form, title) = if registering {
        (&app.register_form, " Create Account ")
    } else {
        (&app.login_form, " Log In ")
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Plan trips, itineraries and budgets from the terminal.",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ];
    lines.extend(form_lines(form));
    lines.push(Line::from(""));

    let mut hints = vec![
        Span::styled("Tab", Style::default().fg(Color::Yellow)),
        Span::raw(": Switch field  "),
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::raw(": Submit  "),
    ];
    if registering {
        hints.push(Span::styled("Esc", Style::default().fg(Color::Yellow)));
        hints.push(Span::raw(": Back to login"));
    } else {
        hints.push(Span::styled("Ctrl+R", Style::default().fg(Color::Yellow)));
        hints.push(Span::raw(": Register  "));
        hints.push(Span::styled("Esc", Style::default().fg(Color::Yellow)));
        hints.push(Span::raw(": Quit"));
    }
    lines.push(Line::from(hints));

    let height = lines.len() as u16 + 2;
    let area = centered_rect(64, height, body);
    frame.render_widget(Clear, area);

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(Span::styled(title, Style::default().fg(Color::Yellow)))
            .padding(Padding::horizontal(2)),
    );
    frame.render_widget(paragraph, area);
}
