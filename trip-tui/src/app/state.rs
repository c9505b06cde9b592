#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Register,
    Trips,
    TripDetail,
}

impl Screen {
    pub fn requires_auth(self) -> bool {
        matches!(self, Screen::Trips | Screen::TripDetail)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailTab {
    Overview,
    Itinerary,
    Budget,
    Weather,
}

impl DetailTab {
    pub const ALL: [DetailTab; 4] = [
        DetailTab::Overview,
        DetailTab::Itinerary,
        DetailTab::Budget,
        DetailTab::Weather,
    ];

    pub fn title(self) -> &'static str {
        match self {
            DetailTab::Overview => "Overview",
            DetailTab::Itinerary => "Itinerary",
            DetailTab::Budget => "Budget",
            DetailTab::Weather => "Weather",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Which side of the budget tab has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetFocus {
    Envelopes,
    Expenses,
}

/// Which list of the overview tab has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverviewFocus {
    Destinations,
    Members,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteTarget {
    Trip(i64),
    Destination(i64),
    /// Holds the member's user id, which is how the backend addresses them.
    Member(i64),
    Event(i64),
    Envelope(i64),
    Expense(i64),
}

/// Everything the confirm dialog needs to show and act on.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteContext {
    pub target: DeleteTarget,
    pub label: String,
    pub detail: String,
}

/// A single-line text input with a cursor.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextInput {
    pub value: String,
    pub cursor: usize,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_str(s: &str) -> Self {
        Self {
            value: s.to_string(),
            cursor: s.len(),
        }
    }

    /// Insert a character at the cursor position.
    pub fn insert(&mut self, c: char) {
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Delete the character immediately before the cursor.
    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let mut new_cursor = self.cursor - 1;
        while !self.value.is_char_boundary(new_cursor) {
            new_cursor -= 1;
        }
        self.value.drain(new_cursor..self.cursor);
        self.cursor = new_cursor;
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    pub fn trimmed(&self) -> &str {
        self.value.trim()
    }

    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backspace_removes_multibyte_char() {
        let mut input = TextInput::from_str("Zürich");
        input.backspace();
        input.backspace();
        input.backspace();
        input.backspace();
        assert_eq!(input.value, "Zü");
        input.backspace();
        assert_eq!(input.value, "Z");
        assert_eq!(input.cursor, 1);
    }

    #[test]
    fn tabs_cycle_in_both_directions() {
        assert_eq!(DetailTab::Weather.next(), DetailTab::Overview);
        assert_eq!(DetailTab::Overview.previous(), DetailTab::Weather);
        assert_eq!(DetailTab::Itinerary.next(), DetailTab::Budget);
    }
}
