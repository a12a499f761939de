use anyhow::{anyhow, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::{Customer, NewCustomer};

/// Internal representation of the customer form fields.
#[derive(Default, Clone)]
pub(crate) struct CustomerForm {
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) email: String,
    pub(crate) active: CustomerField,
    pub(crate) error: Option<String>,
}

/// Fields available within the customer form, in tab order.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum CustomerField {
    #[default]
    FirstName,
    LastName,
    Email,
}

impl CustomerField {
    pub(crate) const ALL: [CustomerField; 3] = [
        CustomerField::FirstName,
        CustomerField::LastName,
        CustomerField::Email,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            CustomerField::FirstName => "First name",
            CustomerField::LastName => "Last name",
            CustomerField::Email => "Email",
        }
    }

    /// Row of the field inside the form popup.
    pub(crate) fn row(self) -> u16 {
        match self {
            CustomerField::FirstName => 0,
            CustomerField::LastName => 1,
            CustomerField::Email => 2,
        }
    }

    fn missing_message(self) -> &'static str {
        match self {
            CustomerField::FirstName => "Please enter a first name.",
            CustomerField::LastName => "Please enter a last name.",
            CustomerField::Email => "Please enter an email address.",
        }
    }
}

impl CustomerForm {
    /// Populate the form from an existing customer when editing.
    pub(crate) fn from_customer(customer: &Customer) -> Self {
        Self {
            first_name: customer.first_name.clone(),
            last_name: customer.last_name.clone(),
            email: customer.email.clone(),
            active: CustomerField::FirstName,
            error: None,
        }
    }

    pub(crate) fn focus(&mut self, field: CustomerField) {
        self.active = field;
    }

    /// Move focus to the next field, wrapping from email back to first name.
    pub(crate) fn next_field(&mut self) {
        self.active = match self.active {
            CustomerField::FirstName => CustomerField::LastName,
            CustomerField::LastName => CustomerField::Email,
            CustomerField::Email => CustomerField::FirstName,
        };
    }

    pub(crate) fn previous_field(&mut self) {
        self.active = match self.active {
            CustomerField::FirstName => CustomerField::Email,
            CustomerField::LastName => CustomerField::FirstName,
            CustomerField::Email => CustomerField::LastName,
        };
    }

    fn value(&self, field: CustomerField) -> &String {
        match field {
            CustomerField::FirstName => &self.first_name,
            CustomerField::LastName => &self.last_name,
            CustomerField::Email => &self.email,
        }
    }

    fn value_mut(&mut self, field: CustomerField) -> &mut String {
        match field {
            CustomerField::FirstName => &mut self.first_name,
            CustomerField::LastName => &mut self.last_name,
            CustomerField::Email => &mut self.email,
        }
    }

    /// Append a character to the active field. Control characters are ignored.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        let field = self.active;
        self.value_mut(field).push(ch);
        true
    }

    /// Remove the last character from the active field.
    pub(crate) fn backspace(&mut self) {
        let field = self.active;
        self.value_mut(field).pop();
    }

    /// Check that every field has content and hand back trimmed values. The
    /// first blank field gets focus so the user can fill it straight away.
    pub(crate) fn parse_inputs(&mut self) -> Result<NewCustomer> {
        if let Some(field) = CustomerField::ALL
            .into_iter()
            .find(|field| self.value(*field).trim().is_empty())
        {
            self.focus(field);
            return Err(anyhow!(field.missing_message()));
        }

        Ok(NewCustomer::new(
            self.first_name.trim(),
            self.last_name.trim(),
            self.email.trim(),
        ))
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field: CustomerField) -> Line<'static> {
        let value = self.value(field);
        let is_active = self.active == field;

        let display = if value.is_empty() {
            "<required>".to_string()
        } else {
            value.clone()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{}: ", field.label())),
            Span::styled(display, style),
        ])
    }

    /// Cursor column offset for the requested field, label prefix included.
    pub(crate) fn cursor_offset(&self, field: CustomerField) -> u16 {
        let prefix = field.label().chars().count() + 2;
        (prefix + self.value(field).chars().count()) as u16
    }
}

/// Pending deletion awaiting a yes/no answer.
#[derive(Clone)]
pub(crate) struct ConfirmDelete {
    pub(crate) index: usize,
    pub(crate) full_name: String,
}

impl ConfirmDelete {
    pub(crate) fn new(index: usize, customer: &Customer) -> Self {
        Self {
            index,
            full_name: customer.full_name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_goes_to_the_focused_field() {
        let mut form = CustomerForm::default();
        for ch in "Ann".chars() {
            assert!(form.push_char(ch));
        }
        form.next_field();
        form.push_char('L');
        form.previous_field();
        form.backspace();
        assert_eq!(form.first_name, "An");
        assert_eq!(form.last_name, "L");
        assert!(!form.push_char('\n'));
    }

    #[test]
    fn focus_wraps_in_both_directions() {
        let mut form = CustomerForm::default();
        form.previous_field();
        assert_eq!(form.active, CustomerField::Email);
        form.next_field();
        assert_eq!(form.active, CustomerField::FirstName);
    }

    #[test]
    fn blank_field_is_reported_and_focused() {
        let mut form = CustomerForm {
            first_name: "Ann".into(),
            last_name: "   ".into(),
            email: String::new(),
            active: CustomerField::Email,
            error: None,
        };
        let err = form.parse_inputs().unwrap_err();
        assert_eq!(err.to_string(), "Please enter a last name.");
        assert_eq!(form.active, CustomerField::LastName);
    }

    #[test]
    fn inputs_are_trimmed() {
        let mut form = CustomerForm {
            first_name: " Ann ".into(),
            last_name: "Lee".into(),
            email: " ann@x.com\t".into(),
            ..CustomerForm::default()
        };
        assert_eq!(
            form.parse_inputs().unwrap(),
            NewCustomer::new("Ann", "Lee", "ann@x.com")
        );
    }

    #[test]
    fn cursor_sits_after_the_value() {
        let mut form = CustomerForm::default();
        form.email = "a@b".into();
        assert_eq!(form.cursor_offset(CustomerField::Email), 10);
    }
}
