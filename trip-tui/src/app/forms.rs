use thiserror::Error;
use time::Date;
use trip_api::parse_iso_date;

use super::TextInput;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("{0} must be a date like 2024-05-01")]
    InvalidDate(&'static str),
    #[error("{0} must be a time like 09:30")]
    InvalidTime(&'static str),
    #[error("{0} must be a number")]
    InvalidNumber(&'static str),
    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),
    #[error("End date must not be before the start date")]
    EndBeforeStart,
    #[error("No envelope named \"{0}\"")]
    UnknownEnvelope(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub label: &'static str,
    pub input: TextInput,
    /// Render the value as bullets (passwords).
    pub masked: bool,
}

/// A vertical list of labelled text inputs with one focused field and an
/// inline error slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Form {
    pub fields: Vec<FormField>,
    pub focused: usize,
    pub error: Option<String>,
}

impl Form {
    pub fn new(labels: &[&'static str]) -> Self {
        Self {
            fields: labels
                .iter()
                .map(|&label| FormField {
                    label,
                    input: TextInput::new(),
                    masked: false,
                })
                .collect(),
            focused: 0,
            error: None,
        }
    }

    pub fn masked(mut self, idx: usize) -> Self {
        if let Some(field) = self.fields.get_mut(idx) {
            field.masked = true;
        }
        self
    }

    pub fn with_value(mut self, idx: usize, value: &str) -> Self {
        self.set_value(idx, value);
        self
    }

    pub fn set_value(&mut self, idx: usize, value: &str) {
        if let Some(field) = self.fields.get_mut(idx) {
            field.input = TextInput::from_str(value);
        }
    }

    /// Trimmed value of a field; empty for unknown indices.
    pub fn value(&self, idx: usize) -> &str {
        self.fields
            .get(idx)
            .map(|f| f.input.trimmed())
            .unwrap_or("")
    }

    /// Untrimmed value, for passwords.
    pub fn raw_value(&self, idx: usize) -> &str {
        self.fields
            .get(idx)
            .map(|f| f.input.value.as_str())
            .unwrap_or("")
    }

    pub fn is_filled(&self, idx: usize) -> bool {
        !self.value(idx).is_empty()
    }

    pub fn next_field(&mut self) {
        if !self.fields.is_empty() {
            self.focused = (self.focused + 1) % self.fields.len();
        }
    }

    pub fn prev_field(&mut self) {
        if !self.fields.is_empty() {
            self.focused = (self.focused + self.fields.len() - 1) % self.fields.len();
        }
    }

    pub fn input_char(&mut self, c: char) {
        if let Some(field) = self.fields.get_mut(self.focused) {
            field.input.insert(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focused) {
            field.input.backspace();
        }
    }

    pub fn clear_focused(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focused) {
            field.input.clear();
        }
    }

    pub fn set_error(&mut self, error: impl ToString) {
        self.error = Some(error.to_string());
    }
}

pub fn required<'a>(form: &'a Form, idx: usize) -> Result<&'a str, FormError> {
    let value = form.value(idx);
    if value.is_empty() {
        Err(FormError::Required(label_of(form, idx)))
    } else {
        Ok(value)
    }
}

pub fn optional(form: &Form, idx: usize) -> Option<String> {
    let value = form.value(idx);
    (!value.is_empty()).then(|| value.to_string())
}

pub fn date_field(form: &Form, idx: usize) -> Result<Date, FormError> {
    let raw = required(form, idx)?;
    parse_iso_date(raw).ok_or(FormError::InvalidDate(label_of(form, idx)))
}

pub fn amount_field(form: &Form, idx: usize) -> Result<f64, FormError> {
    let raw = required(form, idx)?;
    parse_amount(raw).ok_or(FormError::InvalidNumber(label_of(form, idx)))
}

pub fn optional_amount(form: &Form, idx: usize) -> Result<Option<f64>, FormError> {
    match optional(form, idx) {
        None => Ok(None),
        Some(raw) => parse_amount(&raw)
            .map(Some)
            .ok_or(FormError::InvalidNumber(label_of(form, idx))),
    }
}

pub fn optional_time(form: &Form, idx: usize) -> Result<Option<String>, FormError> {
    match optional(form, idx) {
        None => Ok(None),
        Some(raw) => normalize_time(&raw)
            .map(Some)
            .ok_or(FormError::InvalidTime(label_of(form, idx))),
    }
}

fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned = raw.trim().trim_start_matches('$').replace(',', "");
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Normalize a typed time of day to zero-padded "HH:MM".
///
/// Itinerary days are ordered by comparing these strings, so "9:00" has to
/// become "09:00" before it reaches the backend.
pub fn normalize_time(raw: &str) -> Option<String> {
    let mut parts = raw.trim().splitn(3, ':');
    let hours: u8 = parts.next()?.parse().ok()?;
    let minutes_raw = parts.next()?;
    if minutes_raw.len() != 2 {
        return None;
    }
    let minutes: u8 = minutes_raw.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some(format!("{:02}:{:02}", hours, minutes))
}

fn label_of(form: &Form, idx: usize) -> &'static str {
    form.fields.get(idx).map(|f| f.label).unwrap_or("Field")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_time_pads_hours() {
        assert_eq!(normalize_time("9:05"), Some("09:05".to_string()));
        assert_eq!(normalize_time("18:30"), Some("18:30".to_string()));
        assert_eq!(normalize_time("07:15:00"), Some("07:15".to_string()));
        assert_eq!(normalize_time("24:00"), None);
        assert_eq!(normalize_time("9:5"), None);
        assert_eq!(normalize_time("noon"), None);
    }

    #[test]
    fn required_reports_field_label() {
        let form = Form::new(&["Title", "Date"]).with_value(0, "   ");
        assert_eq!(required(&form, 0), Err(FormError::Required("Title")));
        assert_eq!(
            FormError::Required("Title").to_string(),
            "Title is required"
        );
    }

    #[test]
    fn amounts_accept_currency_noise() {
        let form = Form::new(&["Amount"]).with_value(0, "$1,250.50");
        assert_eq!(amount_field(&form, 0), Ok(1250.5));

        let form = Form::new(&["Amount"]).with_value(0, "lots");
        assert_eq!(
            amount_field(&form, 0),
            Err(FormError::InvalidNumber("Amount"))
        );
    }

    #[test]
    fn focus_wraps_around() {
        let mut form = Form::new(&["A", "B", "C"]);
        form.prev_field();
        assert_eq!(form.focused, 2);
        form.next_field();
        assert_eq!(form.focused, 0);
    }

    #[test]
    fn typing_goes_into_focused_field() {
        let mut form = Form::new(&["Username", "Password"]).masked(1);
        form.next_field();
        for c in "hunter2".chars() {
            form.input_char(c);
        }
        assert_eq!(form.value(0), "");
        assert_eq!(form.value(1), "hunter2");
        assert!(form.fields[1].masked);
    }
}
