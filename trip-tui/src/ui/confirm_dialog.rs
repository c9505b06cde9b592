use super::utils::centered_rect;
use super::*;
use crate::app::DeleteTarget;

pub fn render_confirm_dialog(frame: &mut Frame, app: &App) {
    let Some(ctx) = &app.delete_context else {
        return;
    };
    let title = match ctx.target {
        DeleteTarget::Trip(_) => " Delete Trip? ",
        DeleteTarget::Destination(_) => " Remove Destination? ",
        DeleteTarget::Member(_) => " Remove Member? ",
        DeleteTarget::Event(_) => " Delete Event? ",
        DeleteTarget::Envelope(_) => " Delete Envelope? ",
        DeleteTarget::Expense(_) => " Delete Expense? ",
    };

    let area = centered_rect(52, 10, frame.area());
    frame.render_widget(Clear, area);

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            ctx.label.as_str(),
            Style::default().fg(Color::White),
        )),
        Line::from(Span::styled(
            ctx.detail.as_str(),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("[y] Yes", Style::default().fg(Color::Red)),
            Span::raw("    "),
            Span::styled("[n] No", Style::default().fg(Color::White)),
        ]),
    ];

    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .padding(Padding::horizontal(1)),
        )
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
