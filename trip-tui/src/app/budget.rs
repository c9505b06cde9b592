use time::Date;
use trip_api::{
    default_currency, format_iso_date, BudgetEnvelope, BudgetSummary, EnvelopeCreate,
    EnvelopeUpdate, Expense, ExpenseCreate,
};

use super::forms::{amount_field, date_field, optional, required, Form, FormError};

pub const ENVELOPE_CATEGORY: usize = 0;
pub const ENVELOPE_PLANNED: usize = 1;
pub const ENVELOPE_NOTES: usize = 2;

pub const EXPENSE_DESCRIPTION: usize = 0;
pub const EXPENSE_AMOUNT: usize = 1;
pub const EXPENSE_DATE: usize = 2;
pub const EXPENSE_ENVELOPE: usize = 3;
pub const EXPENSE_CURRENCY: usize = 4;

pub const UNCATEGORIZED: &str = "Uncategorized";

/// Budget lists as last fetched, plus the server aggregate used when the lists
/// come back empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BudgetData {
    pub envelopes: Vec<BudgetEnvelope>,
    pub expenses: Vec<Expense>,
    pub summary: BudgetSummary,
}

/// One slice of the spend-by-envelope chart.
#[derive(Debug, Clone, PartialEq)]
pub struct SpendSlice {
    pub label: String,
    pub amount: f64,
}

impl BudgetData {
    pub fn from_summary(summary: BudgetSummary) -> Self {
        Self {
            envelopes: summary.envelopes.clone(),
            expenses: summary.expenses.clone(),
            summary,
        }
    }

    pub fn planned_total(&self) -> f64 {
        if self.envelopes.is_empty() {
            self.summary.total_planned
        } else {
            self.envelopes.iter().map(|e| e.planned_amount).sum()
        }
    }

    pub fn actual_total(&self) -> f64 {
        if self.expenses.is_empty() {
            self.summary.total_actual
        } else {
            self.expenses.iter().map(|e| e.amount).sum()
        }
    }

    /// Sum of the expenses filed under `envelope_id`.
    pub fn envelope_actual(&self, envelope_id: i64) -> f64 {
        self.expenses
            .iter()
            .filter(|e| e.envelope_id == Some(envelope_id))
            .map(|e| e.amount)
            .sum()
    }

    pub fn envelope_percentage(&self, envelope: &BudgetEnvelope) -> u16 {
        spent_percentage(self.envelope_actual(envelope.id), envelope.planned_amount)
    }

    pub fn uncategorized_actual(&self) -> f64 {
        self.expenses
            .iter()
            .filter(|e| e.envelope_id.is_none())
            .map(|e| e.amount)
            .sum()
    }

    pub fn envelope_name(&self, envelope_id: Option<i64>) -> &str {
        envelope_id
            .and_then(|id| self.envelopes.iter().find(|e| e.id == id))
            .map(|e| e.category.as_str())
            .unwrap_or(UNCATEGORIZED)
    }

    /// Spending per envelope, skipping envelopes with nothing spent. Expenses
    /// without an envelope are grouped into an "Uncategorized" slice.
    pub fn spend_slices(&self) -> Vec<SpendSlice> {
        let mut slices: Vec<SpendSlice> = self
            .envelopes
            .iter()
            .map(|envelope| SpendSlice {
                label: envelope.category.clone(),
                amount: self.envelope_actual(envelope.id),
            })
            .filter(|slice| slice.amount > 0.0)
            .collect();

        let uncategorized = self.uncategorized_actual();
        if uncategorized > 0.0 {
            slices.push(SpendSlice {
                label: UNCATEGORIZED.to_string(),
                amount: uncategorized,
            });
        }
        slices
    }
}

/// Share of `planned` already spent, rounded and capped to 0..=100.
/// A non-positive plan reads as 0%.
pub fn spent_percentage(actual: f64, planned: f64) -> u16 {
    if planned <= 0.0 {
        return 0;
    }
    (actual / planned * 100.0).min(100.0).round().max(0.0) as u16
}

/// The single envelope being edited inline. Starting an edit on another
/// envelope replaces it.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvelopeEdit {
    pub envelope_id: i64,
    pub form: Form,
}

impl EnvelopeEdit {
    pub fn start(envelope: &BudgetEnvelope) -> Self {
        Self {
            envelope_id: envelope.id,
            form: envelope_form_from(envelope),
        }
    }
}

pub fn new_envelope_form() -> Form {
    Form::new(&["Category", "Planned amount", "Notes"])
}

pub fn envelope_form_from(envelope: &BudgetEnvelope) -> Form {
    let form = new_envelope_form()
        .with_value(ENVELOPE_CATEGORY, &envelope.category)
        .with_value(ENVELOPE_PLANNED, &format!("{:.2}", envelope.planned_amount));
    match &envelope.notes {
        Some(notes) => form.with_value(ENVELOPE_NOTES, notes),
        None => form,
    }
}

fn planned_amount(form: &Form) -> Result<f64, FormError> {
    let planned = amount_field(form, ENVELOPE_PLANNED)?;
    if planned <= 0.0 {
        return Err(FormError::NotPositive("Planned amount"));
    }
    Ok(planned)
}

pub fn envelope_create_from(form: &Form, trip_id: i64) -> Result<EnvelopeCreate, FormError> {
    let category = required(form, ENVELOPE_CATEGORY)?.to_string();
    let planned_amount = planned_amount(form)?;
    Ok(EnvelopeCreate {
        trip_id,
        category,
        planned_amount,
        notes: optional(form, ENVELOPE_NOTES),
    })
}

pub fn envelope_update_from(form: &Form) -> Result<EnvelopeUpdate, FormError> {
    let category = required(form, ENVELOPE_CATEGORY)?.to_string();
    let planned_amount = planned_amount(form)?;
    Ok(EnvelopeUpdate {
        category: Some(category),
        planned_amount: Some(planned_amount),
        notes: Some(optional(form, ENVELOPE_NOTES)),
    })
}

pub fn new_expense_form(date: Date) -> Form {
    Form::new(&["Description", "Amount", "Date", "Envelope", "Currency"])
        .with_value(EXPENSE_DATE, &format_iso_date(date))
        .with_value(EXPENSE_CURRENCY, &default_currency())
}

/// Resolve a typed envelope name to its id. Blank means uncategorized.
pub fn resolve_envelope(
    name: &str,
    envelopes: &[BudgetEnvelope],
) -> Result<Option<i64>, FormError> {
    let name = name.trim();
    if name.is_empty() || name.eq_ignore_ascii_case(UNCATEGORIZED) {
        return Ok(None);
    }
    envelopes
        .iter()
        .find(|e| e.category.eq_ignore_ascii_case(name))
        .map(|e| Some(e.id))
        .ok_or_else(|| FormError::UnknownEnvelope(name.to_string()))
}

pub fn expense_create_from(
    form: &Form,
    trip_id: i64,
    envelopes: &[BudgetEnvelope],
) -> Result<ExpenseCreate, FormError> {
    let description = required(form, EXPENSE_DESCRIPTION)?.to_string();
    let amount = amount_field(form, EXPENSE_AMOUNT)?;
    let spent_at_date = date_field(form, EXPENSE_DATE)?;
    let envelope_id = resolve_envelope(form.value(EXPENSE_ENVELOPE), envelopes)?;
    Ok(ExpenseCreate {
        trip_id,
        envelope_id,
        event_id: None,
        description,
        amount,
        currency: optional(form, EXPENSE_CURRENCY)
            .map(|c| c.to_uppercase())
            .unwrap_or_else(default_currency),
        spent_at_date,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn envelope(id: i64, category: &str, planned: f64) -> BudgetEnvelope {
        BudgetEnvelope {
            id,
            trip_id: 1,
            category: category.to_string(),
            planned_amount: planned,
            notes: None,
        }
    }

    fn expense(id: i64, envelope_id: Option<i64>, amount: f64) -> Expense {
        Expense {
            id,
            trip_id: 1,
            envelope_id,
            event_id: None,
            description: format!("expense {id}"),
            amount,
            currency: "USD".to_string(),
            spent_at_date: date!(2024 - 05 - 02),
        }
    }

    #[test]
    fn percentage_is_rounded_and_capped() {
        assert_eq!(spent_percentage(50.0, 200.0), 25);
        assert_eq!(spent_percentage(1.0, 3.0), 33);
        assert_eq!(spent_percentage(2.0, 3.0), 67);
        assert_eq!(spent_percentage(500.0, 100.0), 100);
        assert_eq!(spent_percentage(0.0, 100.0), 0);
        assert_eq!(spent_percentage(10.0, 0.0), 0);
    }

    #[test]
    fn totals_sum_lists_when_present() {
        let budget = BudgetData {
            envelopes: vec![envelope(1, "Food", 300.0), envelope(2, "Lodging", 900.0)],
            expenses: vec![expense(1, Some(1), 42.5), expense(2, None, 7.5)],
            summary: BudgetSummary {
                trip_id: 1,
                total_planned: 1.0,
                total_actual: 1.0,
                ..Default::default()
            },
        };
        assert_eq!(budget.planned_total(), 1200.0);
        assert_eq!(budget.actual_total(), 50.0);
        assert_eq!(budget.envelope_actual(1), 42.5);
        assert_eq!(budget.envelope_actual(2), 0.0);
    }

    #[test]
    fn totals_fall_back_to_summary_when_lists_are_empty() {
        let budget = BudgetData::from_summary(BudgetSummary {
            trip_id: 1,
            total_planned: 1200.0,
            total_actual: 310.25,
            envelopes: vec![],
            expenses: vec![],
        });
        assert_eq!(budget.planned_total(), 1200.0);
        assert_eq!(budget.actual_total(), 310.25);
    }

    #[test]
    fn spend_slices_include_uncategorized() {
        let budget = BudgetData {
            envelopes: vec![envelope(1, "Food", 300.0), envelope(2, "Museums", 80.0)],
            expenses: vec![
                expense(1, Some(1), 20.0),
                expense(2, Some(1), 15.0),
                expense(3, None, 5.0),
            ],
            summary: BudgetSummary::default(),
        };
        let slices = budget.spend_slices();
        assert_eq!(
            slices,
            vec![
                SpendSlice {
                    label: "Food".to_string(),
                    amount: 35.0
                },
                SpendSlice {
                    label: UNCATEGORIZED.to_string(),
                    amount: 5.0
                },
            ]
        );
    }

    #[test]
    fn envelope_form_rejects_non_positive_plan() {
        let form = new_envelope_form()
            .with_value(ENVELOPE_CATEGORY, "Food")
            .with_value(ENVELOPE_PLANNED, "0");
        assert_eq!(
            envelope_create_from(&form, 1),
            Err(FormError::NotPositive("Planned amount"))
        );

        let form = form.with_value(ENVELOPE_PLANNED, "250");
        let create = envelope_create_from(&form, 1).unwrap();
        assert_eq!(create.category, "Food");
        assert_eq!(create.planned_amount, 250.0);
        assert_eq!(create.notes, None);

        let missing = form.with_value(ENVELOPE_CATEGORY, "");
        assert_eq!(
            envelope_create_from(&missing, 1),
            Err(FormError::Required("Category"))
        );
    }

    #[test]
    fn emptied_envelope_notes_are_cleared() {
        let mut food = envelope(4, "Food", 300.0);
        food.notes = Some("Mostly gelato".to_string());
        let mut form = envelope_form_from(&food);
        form.set_value(ENVELOPE_NOTES, "");

        let update = envelope_update_from(&form).unwrap();
        assert_eq!(update.notes, Some(None));
        assert_eq!(update.planned_amount, Some(300.0));
    }

    #[test]
    fn expense_envelope_is_matched_by_name() {
        let envelopes = vec![envelope(4, "Food", 300.0)];
        let form = new_expense_form(date!(2024 - 05 - 02))
            .with_value(EXPENSE_DESCRIPTION, "Pizza")
            .with_value(EXPENSE_AMOUNT, "18.50")
            .with_value(EXPENSE_ENVELOPE, "food");

        let create = expense_create_from(&form, 1, &envelopes).unwrap();
        assert_eq!(create.envelope_id, Some(4));
        assert_eq!(create.currency, "USD");
        assert_eq!(create.spent_at_date, date!(2024 - 05 - 02));

        let uncategorized = form.clone().with_value(EXPENSE_ENVELOPE, "");
        assert_eq!(
            expense_create_from(&uncategorized, 1, &envelopes)
                .unwrap()
                .envelope_id,
            None
        );

        let unknown = form.with_value(EXPENSE_ENVELOPE, "Souvenirs");
        assert_eq!(
            expense_create_from(&unknown, 1, &envelopes),
            Err(FormError::UnknownEnvelope("Souvenirs".to_string()))
        );
    }

    #[test]
    fn expense_amount_must_parse() {
        let form = new_expense_form(date!(2024 - 05 - 02))
            .with_value(EXPENSE_DESCRIPTION, "Taxi")
            .with_value(EXPENSE_AMOUNT, "about ten");
        assert_eq!(
            expense_create_from(&form, 1, &[]),
            Err(FormError::InvalidNumber("Amount"))
        );
    }
}
