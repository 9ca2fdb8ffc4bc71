use std::fmt::Write;
use unsegen::base::*;
use unsegen::input::Scrollable;
use unsegen::widget::*;

use crate::token::Token;
use crate::ui::Context;

/// Palette of the tokens that can be dragged onto the calendar.
pub struct TokenWindow<'a> {
    context: &'a Context,
}

impl<'a> TokenWindow<'a> {
    pub fn new(context: &'a Context) -> Self {
        TokenWindow { context }
    }

    fn marker(&self, idx: usize, token: &Token) -> char {
        let dragged = self.context.dragged_token().map(|token| &token.id);
        if Some(&token.id) == dragged {
            '+'
        } else if idx == self.context.palette_index {
            '>'
        } else {
            ' '
        }
    }
}

impl Widget for TokenWindow<'_> {
    fn space_demand(&self) -> Demand2D {
        Demand2D {
            width: ColDemand::at_least(16),
            height: RowDemand::at_least(self.context.tokens().len() + 1),
        }
    }

    fn draw(&self, mut window: Window, _hints: RenderingHints) {
        let mut cursor = Cursor::new(&mut window);

        cursor.set_style_modifier(self.context.theme.month_header_style);
        if let Err(err) = writeln!(&mut cursor, " Tokens") {
            log::warn!("Error while writing palette header: {}", err);
        }
        cursor.set_style_modifier(StyleModifier::new());

        for (idx, token) in self.context.tokens().iter().enumerate() {
            if let Err(err) = write!(&mut cursor, "{} {} ", self.marker(idx, token), idx + 1) {
                log::warn!("Error while writing token marker: {}", err);
            }

            let saved_style = cursor.get_style_modifier();
            cursor.apply_style_modifier(
                StyleModifier::new()
                    .fg_color(Color::Black)
                    .bg_color(super::token_color(&token.color)),
            );
            if let Err(err) = write!(&mut cursor, " {} ", token.name) {
                log::warn!("Error while writing token: {}", err);
            }
            cursor.set_style_modifier(saved_style);

            cursor.fill_and_wrap_line();
        }
    }
}

pub struct TokenWindowBehaviour<'a>(pub &'a mut Context);

impl Scrollable for TokenWindowBehaviour<'_> {
    fn scroll_backwards(&mut self) -> unsegen::input::OperationResult {
        if self.0.palette_index > 0 {
            self.0.palette_index -= 1;
            Ok(())
        } else {
            Err(())
        }
    }

    fn scroll_forwards(&mut self) -> unsegen::input::OperationResult {
        if self.0.palette_index + 1 < self.0.tokens().len() {
            self.0.palette_index += 1;
            Ok(())
        } else {
            Err(())
        }
    }
}
