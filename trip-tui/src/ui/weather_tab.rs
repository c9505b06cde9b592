use super::*;
use crate::app::weather::{format_fahrenheit, travel_tip, RainBand, WEATHER_ERROR};
use crate::app::{TripDetail, WeatherState};
use ratatui::widgets::{Row, Table};
use trip_api::format_iso_date;

fn rain_color(band: RainBand) -> Color {
    match band {
        RainBand::High => Color::Red,
        RainBand::Moderate => Color::Rgb(255, 191, 0),
        RainBand::Low => Color::Green,
    }
}

pub fn render_weather_tab(frame: &mut Frame, detail: &TripDetail, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(" Weather ")
        .padding(Padding::horizontal(1));

    let message = match &detail.weather {
        WeatherState::NotLoaded | WeatherState::Loading => {
            Some(("Loading forecast…", Color::DarkGray))
        }
        WeatherState::Failed => Some((WEATHER_ERROR, Color::Red)),
        WeatherState::Loaded(weather) if weather.days.is_empty() => {
            Some(("No forecast is available for these dates.", Color::DarkGray))
        }
        WeatherState::Loaded(_) => None,
    };
    if let Some((text, color)) = message {
        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(text, Style::default().fg(color))),
        ];
        if detail.weather == WeatherState::Failed {
            lines.push(Line::from(vec![
                Span::styled("r", Style::default().fg(Color::Yellow)),
                Span::styled(": Try again", Style::default().fg(Color::DarkGray)),
            ]));
        }
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }
    let Some(weather) = detail.weather.forecast() else {
        return;
    };

    let rows: Vec<Row> = weather
        .days
        .iter()
        .map(|day| {
            let band = RainBand::from_probability(day.precip_prob);
            Row::new(vec![
                Span::styled(format_iso_date(day.date), Style::default().fg(Color::Yellow)),
                Span::styled(day.summary.clone(), Style::default().fg(Color::White)),
                Span::styled(
                    format!(
                        "{} / {}",
                        format_fahrenheit(day.temp_max),
                        format_fahrenheit(day.temp_min)
                    ),
                    Style::default().fg(Color::White),
                ),
                Span::styled(
                    format!("{}%", day.precip_prob),
                    Style::default().fg(rain_color(band)),
                ),
                Span::styled(travel_tip(day), Style::default().fg(Color::Cyan)),
            ])
        })
        .collect();

    let header = Row::new(vec!["Date", "Sky", "High / Low", "Rain", "Tip"])
        .style(Style::default().fg(Color::DarkGray));
    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Length(10),
            Constraint::Length(13),
            Constraint::Length(6),
            Constraint::Min(20),
        ],
    )
    .header(header)
    .block(block.title(Span::styled(
        format!(" {} ", weather.city),
        Style::default().fg(Color::Cyan),
    )));
    frame.render_widget(table, area);
}
