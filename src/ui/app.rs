use std::mem;
use std::sync::mpsc::{channel, Receiver};

use anyhow::{Context, Result};
use crossterm::event::KeyCode;
use open::that as open_link;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;
use tracing::warn;

use crate::manager::{AddOutcome, CustomerEvent, CustomerManager};

use super::forms::{ConfirmDelete, CustomerField, CustomerForm};
use super::helpers::{centered_rect, fit_width, surface_error};

/// Height reserved for the footer (border + status + instructions).
const FOOTER_HEIGHT: u16 = 3;
/// Column width used for the name column of the customer list.
const NAME_WIDTH: usize = 28;

/// Modal states layered over the customer list. Each variant owns the data
/// its dialog edits so cancelling simply drops it.
enum Mode {
    Normal,
    Adding(CustomerForm),
    Editing { index: usize, form: CustomerForm },
    ConfirmDelete(ConfirmDelete),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusKind {
    Success,
    Error,
}

impl StatusKind {
    /// Convert the status kind to a Ratatui style.
    fn style(&self) -> Style {
        match self {
            StatusKind::Success => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Application state for the terminal form. All customer data lives in the
/// manager; the app only tracks the selection, the open dialog, and the
/// status line fed by manager notifications.
pub struct App {
    manager: CustomerManager,
    /// Notifications forwarded by the manager, drained after every action.
    events: Receiver<CustomerEvent>,
    /// Index of the highlighted customer (zero-based).
    selected: usize,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    /// Take ownership of the manager and subscribe to its notifications.
    pub fn new(mut manager: CustomerManager) -> Self {
        let (tx, rx) = channel();
        manager.subscribe(tx);
        let mut app = Self {
            manager,
            events: rx,
            selected: 0,
            mode: Mode::Normal,
            status: None,
        };
        app.show_totals();
        app
    }

    pub fn manager(&self) -> &CustomerManager {
        &self.manager
    }

    /// Top-level key dispatcher. Every key is routed through the active
    /// `Mode`, which returns the mode to continue with. The boolean result
    /// tells the outer loop whether the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::Adding(form) => self.handle_add(code, form),
            Mode::Editing { index, form } => self.handle_edit(code, index, form),
            Mode::ConfirmDelete(confirm) => self.handle_confirm_delete(code, confirm),
        };

        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        let mode = match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                *exit = true;
                Mode::Normal
            }
            KeyCode::Up => {
                self.move_selection(-1);
                Mode::Normal
            }
            KeyCode::Down => {
                self.move_selection(1);
                Mode::Normal
            }
            KeyCode::Home => {
                self.selected = 0;
                Mode::Normal
            }
            KeyCode::End => {
                self.selected = self.manager.count().saturating_sub(1);
                Mode::Normal
            }
            KeyCode::Char('a') => {
                self.clear_status();
                Mode::Adding(CustomerForm::default())
            }
            KeyCode::Char('e') | KeyCode::Enter => match self.manager.get(self.selected) {
                Ok(customer) => Mode::Editing {
                    index: self.selected,
                    form: CustomerForm::from_customer(customer),
                },
                Err(_) => {
                    self.set_status("Please select a customer to update.", StatusKind::Error);
                    Mode::Normal
                }
            },
            KeyCode::Char('d') | KeyCode::Delete => match self.manager.get(self.selected) {
                Ok(customer) => Mode::ConfirmDelete(ConfirmDelete::new(self.selected, customer)),
                Err(_) => {
                    self.set_status("Please select a customer to delete.", StatusKind::Error);
                    Mode::Normal
                }
            },
            KeyCode::Char('m') => {
                self.open_mail()?;
                Mode::Normal
            }
            _ => Mode::Normal,
        };
        Ok(mode)
    }

    fn handle_add(&mut self, code: KeyCode, mut form: CustomerForm) -> Mode {
        match code {
            KeyCode::Esc => {
                self.show_totals();
                return Mode::Normal;
            }
            KeyCode::Enter => match self.save_new_customer(&mut form) {
                Ok(true) => return Mode::Normal,
                Ok(false) => {
                    let message = "A customer with this email already exists!";
                    form.error = Some(message.to_string());
                    self.set_status(message, StatusKind::Error);
                }
                Err(err) => self.report_form_error(&mut form, &err),
            },
            code => edit_form(&mut form, code),
        }
        Mode::Adding(form)
    }

    fn handle_edit(&mut self, code: KeyCode, index: usize, mut form: CustomerForm) -> Mode {
        match code {
            KeyCode::Esc => {
                self.show_totals();
                return Mode::Normal;
            }
            KeyCode::Enter => match self.save_existing_customer(index, &mut form) {
                Ok(()) => return Mode::Normal,
                Err(err) => self.report_form_error(&mut form, &err),
            },
            code => edit_form(&mut form, code),
        }
        Mode::Editing { index, form }
    }

    /// Confirmation dialog for deletion. Escape or N cancels, Enter or Y
    /// confirms.
    fn handle_confirm_delete(&mut self, code: KeyCode, confirm: ConfirmDelete) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.show_totals();
                Mode::Normal
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                if let Err(err) = self.perform_delete(&confirm) {
                    let err = anyhow::Error::new(err);
                    self.set_status(format!("Error: {}", surface_error(&err)), StatusKind::Error);
                }
                Mode::Normal
            }
            _ => Mode::ConfirmDelete(confirm),
        }
    }

    /// Returns `Ok(false)` when the email is already taken.
    fn save_new_customer(&mut self, form: &mut CustomerForm) -> Result<bool> {
        let fields = form.parse_inputs()?;
        let outcome = self
            .manager
            .add_customer(fields)
            .context("failed to add customer")?;
        match outcome {
            AddOutcome::Added { index, .. } => {
                self.selected = index;
                self.drain_events();
                Ok(true)
            }
            AddOutcome::Duplicate { .. } => Ok(false),
        }
    }

    fn save_existing_customer(&mut self, index: usize, form: &mut CustomerForm) -> Result<()> {
        let fields = form.parse_inputs()?;
        self.manager
            .update_customer(index, &fields.first_name, &fields.last_name, &fields.email)
            .context("failed to update customer")?;
        self.drain_events();
        Ok(())
    }

    fn perform_delete(&mut self, confirm: &ConfirmDelete) -> Result<(), crate::CustomerError> {
        self.manager.delete_customer(confirm.index)?;
        if self.selected >= self.manager.count() {
            self.selected = self.manager.count().saturating_sub(1);
        }
        self.drain_events();
        Ok(())
    }

    fn report_form_error(&mut self, form: &mut CustomerForm, err: &anyhow::Error) {
        let message = format!("Error: {}", surface_error(err));
        form.error = Some(message.clone());
        self.set_status(message, StatusKind::Error);
    }

    /// Turn queued manager notifications into the status line.
    fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            let verb = match &event {
                CustomerEvent::Added(_) => "added",
                CustomerEvent::Updated(_) => "updated",
                CustomerEvent::Deleted(_) => "deleted",
            };
            self.set_status(
                format!(
                    "Customer {verb} successfully: {}",
                    event.customer().full_name()
                ),
                StatusKind::Success,
            );
        }
    }

    fn show_totals(&mut self) {
        let count = self.manager.count();
        if count == 0 {
            self.set_status("No customers in the system.", StatusKind::Success);
        } else {
            self.set_status(format!("Total customers: {count}"), StatusKind::Success);
        }
    }

    fn open_mail(&mut self) -> Result<()> {
        let Ok(customer) = self.manager.get(self.selected) else {
            self.set_status("Please select a customer first.", StatusKind::Error);
            return Ok(());
        };
        let mailto = format!("mailto:{}", customer.email);
        if let Err(err) = open_link(&mailto) {
            warn!(%err, mailto, "could not open mail client");
            self.set_status(
                format!("Could not open mail client: {err}"),
                StatusKind::Error,
            );
        }
        Ok(())
    }

    fn move_selection(&mut self, offset: isize) {
        let count = self.manager.count();
        if count == 0 {
            self.selected = 0;
            return;
        }
        let next = self.selected as isize + offset;
        self.selected = next.clamp(0, count as isize - 1) as usize;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        self.draw_customer_list(frame, content_area);
        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::Adding(form) => self.draw_customer_form(frame, area, "Add Customer", form),
            Mode::Editing { form, .. } => {
                self.draw_customer_form(frame, area, "Update Customer", form)
            }
            Mode::ConfirmDelete(confirm) => self.draw_confirm_delete(frame, area, confirm),
            Mode::Normal => {}
        }
    }

    fn draw_customer_list(&self, frame: &mut Frame, area: Rect) {
        let title = format!(
            "Customers ({})  {:>4}  {:<NAME_WIDTH$}  Email",
            self.manager.count(),
            "ID",
            "Name"
        );
        let block = Block::default().title(title).borders(Borders::ALL);

        if self.manager.is_empty() {
            let paragraph = Paragraph::new("No customers in the system.")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(paragraph, area);
            return;
        }

        let items: Vec<ListItem> = self
            .manager
            .iter()
            .map(|customer| {
                ListItem::new(format!(
                    "{:>4}  {:<NAME_WIDTH$}  {}",
                    customer.id(),
                    fit_width(&customer.full_name(), NAME_WIDTH),
                    customer.email
                ))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        let mut state = ListState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        match &self.mode {
            Mode::Adding(_) | Mode::Editing { .. } => Line::from(vec![
                Span::styled("[Tab]", key_style),
                Span::raw(" Next field   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Save   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            Mode::ConfirmDelete(_) => Line::from(vec![
                Span::styled("[Y]", key_style),
                Span::raw(" Delete   "),
                Span::styled("[N]", key_style),
                Span::raw(" Keep"),
            ]),
            Mode::Normal => Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Select   "),
                Span::styled("[A]", key_style),
                Span::raw(" Add   "),
                Span::styled("[E]", key_style),
                Span::raw(" Update   "),
                Span::styled("[D]", key_style),
                Span::raw(" Delete   "),
                Span::styled("[M]", key_style),
                Span::raw(" Mail   "),
                Span::styled("[Q]", key_style),
                Span::raw(" Exit"),
            ]),
        }
    }

    fn draw_customer_form(&self, frame: &mut Frame, area: Rect, title: &str, form: &CustomerForm) {
        let popup_area = centered_rect(60, 40, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines: Vec<Line> = CustomerField::ALL
            .into_iter()
            .map(|field| form.build_line(field))
            .collect();
        lines.push(Line::from(""));

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save • Tab to switch • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        // No wrapping here: the cursor math assumes one line per field.
        frame.render_widget(Paragraph::new(lines), inner);

        let cursor_x = inner.x + form.cursor_offset(form.active);
        let cursor_y = inner.y + form.active.row();
        frame.set_cursor_position((cursor_x, cursor_y));
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Confirm Deletion")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!(
                "Are you sure you want to delete {}?",
                confirm.full_name
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }
}

/// Shared editing keys for the add and update forms.
fn edit_form(form: &mut CustomerForm, code: KeyCode) {
    match code {
        KeyCode::Tab | KeyCode::Down => form.next_field(),
        KeyCode::BackTab | KeyCode::Up => form.previous_field(),
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char(ch) => {
            if form.push_char(ch) {
                form.error = None;
            }
        }
        _ => {}
    }
}
