use itertools::Itertools;
use std::fmt::Write;
use unsegen::base::*;
use unsegen::widget::*;

use super::{Context, Mode};

/// One-line summary below the calendar: the pending drag, the last error or
/// the current assignments.
pub struct StatusLine<'a> {
    context: &'a Context,
}

impl<'a> StatusLine<'a> {
    pub fn new(context: &'a Context) -> Self {
        StatusLine { context }
    }

    pub fn text(&self) -> String {
        if let Mode::Drag(_) = self.context.mode {
            let name = self
                .context
                .dragged_token()
                .map(|token| token.name.as_str())
                .unwrap_or_default();
            return format!(
                "Dragging {} over {} (Enter: drop, Esc: cancel)",
                name,
                self.context.cursor().format("%Y-%m-%d")
            );
        }

        if let Some(msg) = &self.context.last_error_message {
            return msg.clone();
        }

        if self.context.assignments().is_empty() {
            "No assignments".to_owned()
        } else {
            self.context
                .assignments()
                .iter()
                .map(|(day, assignment)| format!("{}={}", day, assignment.name))
                .join(", ")
        }
    }
}

impl Widget for StatusLine<'_> {
    fn space_demand(&self) -> Demand2D {
        Demand2D {
            width: ColDemand::at_least(1),
            height: RowDemand::exact(1),
        }
    }

    fn draw(&self, mut window: Window, _hints: RenderingHints) {
        let mut cursor = Cursor::new(&mut window);

        if self.context.last_error_message.is_some() {
            cursor.set_style_modifier(self.context.theme.error_style);
        }

        if let Err(err) = write!(&mut cursor, " {}", self.text()) {
            log::warn!("Error while writing status line: {}", err);
        }
    }
}
