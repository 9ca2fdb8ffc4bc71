pub mod app;
mod calendar_window;
mod command;
mod context;
mod status_line;
mod token_window;

pub use calendar_window::CalendarWindow;
pub use command::CommandParser;
pub use context::{Context, Mode, Theme};
pub use status_line::StatusLine;
pub use token_window::{TokenWindow, TokenWindowBehaviour};

use unsegen::base::Color;

use crate::token::TokenColor;

pub(crate) fn token_color(color: &TokenColor) -> Color {
    Color::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}
