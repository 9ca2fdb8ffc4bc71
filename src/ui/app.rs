use crate::config::Config;
use crate::events::{Dispatcher, Event};
use crate::month::MonthIndex;

use super::{
    CalendarWindow, CommandParser, Context, Mode, StatusLine, TokenWindow, TokenWindowBehaviour,
};

use unsegen::base::Terminal;
use unsegen::input::{
    EditBehavior, Event as InputEvent, Input, Key, Navigatable, NavigateBehavior,
    OperationResult, ScrollBehavior,
};
use unsegen::widget::*;

pub struct App {
    context: Context,
}

impl App {
    pub fn new(config: &Config, month: MonthIndex) -> crate::error::Result<App> {
        let context = Context::new(config.tokens.clone(), month)?;
        Ok(App { context })
    }

    fn bottom_bar<'w>(&'w self) -> impl Widget + 'w {
        let mut layout = VLayout::new().widget(StatusLine::new(&self.context));
        if let Mode::Command = self.context.mode {
            layout = layout.widget(self.context.input_sink().as_widget());
        }

        layout
    }

    fn as_widget<'w>(&'w self) -> impl Widget + 'w {
        VLayout::new()
            .widget(
                HLayout::new()
                    .widget(CalendarWindow::new(&self.context))
                    .widget(TokenWindow::new(&self.context)),
            )
            .widget(self.bottom_bar())
    }

    fn report<E: std::fmt::Display>(&mut self, result: Result<(), E>) {
        match result {
            Ok(()) => self.context.last_error_message = None,
            Err(e) => self.context.report_error(e),
        }
    }

    fn handle_normal(&mut self, input: Input) {
        let leftover = input
            .chain(
                NavigateBehavior::new(&mut CursorBehaviour(&mut self.context))
                    .down_on(Key::Char('j'))
                    .down_on(Key::Down)
                    .up_on(Key::Char('k'))
                    .up_on(Key::Up)
                    .left_on(Key::Char('h'))
                    .left_on(Key::Left)
                    .right_on(Key::Char('l'))
                    .right_on(Key::Right),
            )
            .chain(
                ScrollBehavior::new(&mut TokenWindowBehaviour(&mut self.context))
                    .forwards_on(Key::Char(']'))
                    .backwards_on(Key::Char('[')),
            )
            .finish();

        let key = match leftover.map(|input| input.event) {
            Some(InputEvent::Key(key)) => key,
            _ => return,
        };

        match key {
            Key::Char('q') => self.context.quit = true,
            Key::Char(':') => self.context.mode = Mode::Command,
            Key::Char('n') => {
                let res = self.context.next_month();
                self.report(res);
            }
            Key::Char('p') => {
                let res = self.context.prev_month();
                self.report(res);
            }
            Key::Char('t') => {
                let res = self.context.select_today();
                self.report(res);
            }
            Key::Char('x') => self.context.remove_at_cursor(),
            Key::Char('d') | Key::Char('\n') => self.context.begin_drag_selected(),
            Key::Char(c @ '1'..='9') => {
                let n = c as usize - '1' as usize;
                if let Some(token) = self.context.tokens().nth(n) {
                    let id = token.id.clone();
                    self.context.palette_index = n;
                    self.context.begin_drag(id);
                }
            }
            _ => {}
        }
    }

    fn handle_drag(&mut self, input: Input) {
        let leftover = input
            .chain(
                NavigateBehavior::new(&mut CursorBehaviour(&mut self.context))
                    .down_on(Key::Char('j'))
                    .down_on(Key::Down)
                    .up_on(Key::Char('k'))
                    .up_on(Key::Up)
                    .left_on(Key::Char('h'))
                    .left_on(Key::Left)
                    .right_on(Key::Char('l'))
                    .right_on(Key::Right),
            )
            .finish();

        if let Some(InputEvent::Key(Key::Char('\n'))) = leftover.map(|input| input.event) {
            self.context.finish_drag(true);
        }
    }

    fn handle_command(&mut self, input: Input) {
        input
            .chain(CommandParser::new(&mut self.context))
            .chain(
                EditBehavior::new(self.context.input_sink_mut())
                    .delete_forwards_on(Key::Delete)
                    .delete_backwards_on(Key::Backspace)
                    .left_on(Key::Left)
                    .right_on(Key::Right),
            )
            .chain(
                ScrollBehavior::new(self.context.input_sink_mut())
                    .backwards_on(Key::Up)
                    .forwards_on(Key::Down),
            )
            .finish();
    }

    fn handle_input(&mut self, input: Input) {
        if input.matches(Key::Esc) {
            match self.context.mode {
                Mode::Drag(_) => self.context.finish_drag(false),
                Mode::Command => self.context.cancel_command(),
                Mode::Normal => {}
            }
            return;
        }

        match self.context.mode {
            Mode::Normal => self.handle_normal(input),
            Mode::Drag(_) => self.handle_drag(input),
            Mode::Command => self.handle_command(input),
        }
    }

    pub fn run(
        &mut self,
        dispatcher: Dispatcher,
        mut term: Terminal,
    ) -> Result<(), Box<dyn std::error::Error>> {
        while !self.context.quit {
            // Draw
            let root = term.create_root_window();
            self.as_widget().draw(root, RenderingHints::new());
            term.present();

            // Handle events
            match dispatcher.next()? {
                Event::Update => self.context.update(),
                Event::Signal(signal) => log::debug!("Received {:?}, redrawing", signal),
                Event::Input(input) => self.handle_input(input),
            }
        }

        Ok(())
    }
}

struct CursorBehaviour<'a>(&'a mut Context);

impl Navigatable for CursorBehaviour<'_> {
    fn move_down(&mut self) -> OperationResult {
        if self.0.move_cursor(7) {
            Ok(())
        } else {
            Err(())
        }
    }

    fn move_left(&mut self) -> OperationResult {
        if self.0.move_cursor(-1) {
            Ok(())
        } else {
            Err(())
        }
    }

    fn move_right(&mut self) -> OperationResult {
        if self.0.move_cursor(1) {
            Ok(())
        } else {
            Err(())
        }
    }

    fn move_up(&mut self) -> OperationResult {
        if self.0.move_cursor(-7) {
            Ok(())
        } else {
            Err(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment::DayId;
    use crate::token::TokenId;
    use chrono::NaiveDate;

    fn app() -> App {
        App::new(&Config::default(), MonthIndex::try_new(2024, 2).unwrap()).unwrap()
    }

    fn press(app: &mut App, key: Key) {
        app.handle_input(Input {
            event: InputEvent::Key(key),
            raw: vec![],
        });
    }

    fn day(d: u32) -> DayId {
        DayId::from(NaiveDate::from_ymd_opt(2024, 2, d).unwrap())
    }

    #[test]
    fn month_keys() {
        let mut app = app();

        press(&mut app, Key::Char('n'));
        assert_eq!(
            app.context.displayed_month(),
            MonthIndex::try_new(2024, 3).unwrap()
        );

        press(&mut app, Key::Char('p'));
        press(&mut app, Key::Char('p'));
        assert_eq!(
            app.context.displayed_month(),
            MonthIndex::try_new(2024, 1).unwrap()
        );

        press(&mut app, Key::Char('t'));
        assert_eq!(app.context.cursor(), app.context.today());
    }

    #[test]
    fn digit_drag_and_enter_drop() {
        let mut app = app();

        press(&mut app, Key::Char('2'));
        assert_eq!(app.context.mode, Mode::Drag(TokenId::from("erik")));
        assert_eq!(app.context.palette_index, 1);

        press(&mut app, Key::Char('l'));
        press(&mut app, Key::Down);
        press(&mut app, Key::Char('\n'));

        assert_eq!(app.context.mode, Mode::Normal);
        assert_eq!(app.context.assignments().get(&day(9)).unwrap().name, "Erik");

        press(&mut app, Key::Char('x'));
        assert!(app.context.assignments().is_empty());
    }

    #[test]
    fn digit_without_token_does_nothing() {
        let mut app = app();

        press(&mut app, Key::Char('9'));
        assert_eq!(app.context.mode, Mode::Normal);
        assert_eq!(app.context.palette_index, 0);
    }

    #[test]
    fn escape_cancels_drag() {
        let mut app = app();

        press(&mut app, Key::Char('d'));
        assert_eq!(app.context.mode, Mode::Drag(TokenId::from("gløer")));

        press(&mut app, Key::Esc);
        assert_eq!(app.context.mode, Mode::Normal);
        assert!(app.context.assignments().is_empty());
    }

    #[test]
    fn escape_discards_partial_command() {
        let mut app = app();

        press(&mut app, Key::Char(':'));
        press(&mut app, Key::Char('n'));
        press(&mut app, Key::Char('e'));
        assert_eq!(app.context.input_sink().active_line(), "ne");

        press(&mut app, Key::Esc);
        assert_eq!(app.context.mode, Mode::Normal);

        press(&mut app, Key::Char(':'));
        assert_eq!(app.context.input_sink().active_line(), "");
    }

    #[test]
    fn command_line_runs_on_enter() {
        let mut app = app();

        press(&mut app, Key::Char(':'));
        for c in "3next".chars() {
            press(&mut app, Key::Char(c));
        }
        press(&mut app, Key::Char('\n'));

        assert_eq!(app.context.mode, Mode::Normal);
        assert_eq!(
            app.context.displayed_month(),
            MonthIndex::try_new(2024, 5).unwrap()
        );
    }

    #[test]
    fn quit_key() {
        let mut app = app();
        press(&mut app, Key::Char('q'));
        assert!(app.context.quit);
    }
}
