use crate::app::Form;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Paragraph},
    Frame,
};

use super::utils::centered_rect;

/// Width of the label column in forms.
const LABEL_WIDTH: usize = 12;

/// One line per field: label, then the value with a block cursor when focused.
pub fn form_lines(form: &Form) -> Vec<Line<'static>> {
    let mut lines = Vec::with_capacity(form.fields.len() + 3);
    for (i, field) in form.fields.iter().enumerate() {
        let focused = i == form.focused;
        let label_style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let value = if field.masked {
            "•".repeat(field.input.value.chars().count())
        } else {
            field.input.value.clone()
        };
        let mut spans = vec![
            Span::styled(format!("{:<LABEL_WIDTH$}", field.label), label_style),
            Span::styled(
                value,
                if focused {
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                },
            ),
        ];
        if focused {
            spans.push(Span::styled("█", Style::default().fg(Color::White)));
        }
        lines.push(Line::from(spans));
    }

    if let Some(err) = &form.error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            err.clone(),
            Style::default().fg(Color::Red),
        )));
    }
    lines
}

pub fn form_hint_line() -> Line<'static> {
    Line::from(vec![
        Span::styled("Tab", Style::default().fg(Color::Yellow)),
        Span::raw(": Next field  "),
        Span::styled("Ctrl+X", Style::default().fg(Color::Yellow)),
        Span::raw(": Clear  "),
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::raw(": Save  "),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::raw(": Cancel"),
    ])
}

/// A form drawn in a centered box over whatever is behind it.
pub fn render_form_modal(frame: &mut Frame, form: &Form, title: &str, extra_hint: Option<Line>) {
    let mut lines = vec![Line::from("")];
    lines.extend(form_lines(form));
    lines.push(Line::from(""));
    if let Some(hint) = extra_hint {
        lines.push(hint);
    }
    lines.push(form_hint_line());

    let height = lines.len() as u16 + 2;
    let area = centered_rect(64, height, frame.area());
    frame.render_widget(Clear, area);

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(Span::styled(
                format!(" {} ", title),
                Style::default().fg(Color::Yellow),
            ))
            .padding(Padding::horizontal(2)),
    );
    frame.render_widget(paragraph, area);
}

/// The bordered " Controls " bar at the bottom of each screen.
pub fn render_controls(frame: &mut Frame, area: Rect, keys: &[(&str, &str)]) {
    let mut spans = Vec::with_capacity(keys.len() * 2);
    for (i, (key, action)) in keys.iter().enumerate() {
        spans.push(Span::styled(*key, Style::default().fg(Color::Yellow)));
        let sep = if i + 1 < keys.len() { "  " } else { "" };
        spans.push(Span::raw(format!(": {}{}", action, sep)));
    }
    let controls = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(Span::styled(
                    " Controls ",
                    Style::default().fg(Color::DarkGray),
                ))
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(controls, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn masked_fields_never_show_their_value() {
        let form = Form::new(&["Username", "Password"])
            .masked(1)
            .with_value(0, "demo")
            .with_value(1, "hunter2");
        let lines = form_lines(&form);
        assert!(text(&lines[0]).contains("demo"));
        assert!(!text(&lines[1]).contains("hunter2"));
        assert!(text(&lines[1]).contains("•••••••"));
    }

    #[test]
    fn error_is_listed_after_the_fields() {
        let mut form = Form::new(&["Name"]);
        form.set_error("Name is required");
        let lines = form_lines(&form);
        assert_eq!(lines.len(), 3);
        assert_eq!(text(&lines[2]), "Name is required");
    }
}
