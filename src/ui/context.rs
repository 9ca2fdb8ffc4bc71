use chrono::{DateTime, Duration, Local, NaiveDate};

use unsegen::base::style::*;
use unsegen::widget::builtin::PromptLine;

use crate::assignment::{AssignmentStore, DayId, DragEnd};
use crate::error::{Error, ErrorKind, Result};
use crate::grid::MonthGrid;
use crate::month::MonthIndex;
use crate::token::{Token, TokenId, TokenSet};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Command,
    Drag(TokenId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Forwards,
    Backwards,
}

#[derive(Clone, Debug)]
pub struct Theme {
    pub day_style: StyleModifier,
    pub other_month_day_style: StyleModifier,
    pub focus_day_style: StyleModifier,
    pub drop_target_style: StyleModifier,
    pub today_day_style: StyleModifier,
    pub today_day_char: Option<char>,
    pub month_header_style: StyleModifier,
    pub weekday_label_style: StyleModifier,
    pub error_style: StyleModifier,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            day_style: StyleModifier::default(),
            other_month_day_style: StyleModifier::default().fg_color(Color::LightBlack),
            focus_day_style: StyleModifier::default().bg_color(Color::Blue),
            drop_target_style: StyleModifier::default().bg_color(Color::Yellow),
            today_day_style: StyleModifier::default().invert(true),
            today_day_char: Some('*'),
            month_header_style: StyleModifier::default().fg_color(Color::Yellow),
            weekday_label_style: StyleModifier::default().fg_color(Color::Yellow),
            error_style: StyleModifier::default().fg_color(Color::LightRed),
        }
    }
}

/// All state of a session. Every change goes through the transitions below.
pub struct Context {
    pub mode: Mode,
    pub theme: Theme,
    pub palette_index: usize,
    pub last_error_message: Option<String>,
    pub quit: bool,
    tokens: TokenSet,
    assignments: AssignmentStore,
    grid: MonthGrid,
    cursor: NaiveDate,
    now: DateTime<Local>,
    command_line: PromptLine,
}

impl Context {
    pub fn new(tokens: TokenSet, month: MonthIndex) -> Result<Self> {
        let now = Local::now();
        let grid = MonthGrid::new(month)?;
        let cursor = Self::initial_cursor(&grid, now.date_naive());

        Ok(Context {
            mode: Mode::Normal,
            theme: Theme::default(),
            palette_index: 0,
            last_error_message: None,
            quit: false,
            tokens,
            assignments: AssignmentStore::new(),
            grid,
            cursor,
            now,
            command_line: PromptLine::with_prompt(":".to_owned()),
        })
    }

    fn initial_cursor(grid: &MonthGrid, today: NaiveDate) -> NaiveDate {
        if grid.month().contains(&today) {
            today
        } else {
            grid.current()[0].date
        }
    }

    pub fn tokens(&self) -> &TokenSet {
        &self.tokens
    }

    pub fn assignments(&self) -> &AssignmentStore {
        &self.assignments
    }

    pub fn grid(&self) -> &MonthGrid {
        &self.grid
    }

    pub fn displayed_month(&self) -> MonthIndex {
        self.grid.month()
    }

    pub fn cursor(&self) -> NaiveDate {
        self.cursor
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }

    pub fn update(&mut self) {
        self.now = Local::now();
    }

    pub fn input_sink(&self) -> &PromptLine {
        &self.command_line
    }

    pub fn input_sink_mut(&mut self) -> &mut PromptLine {
        &mut self.command_line
    }

    /// Leaves command mode, discarding the partially typed line.
    pub fn cancel_command(&mut self) {
        let _ = self.command_line.finish_line();
        self.mode = Mode::Normal;
    }

    pub fn goto_month(&mut self, month: MonthIndex) -> Result<()> {
        self.grid = MonthGrid::new(month)?;
        self.cursor = Self::initial_cursor(&self.grid, self.today());
        log::debug!("Displaying {}", month);
        Ok(())
    }

    pub fn next_month(&mut self) -> Result<()> {
        self.goto_month(self.displayed_month().next())
    }

    pub fn prev_month(&mut self) -> Result<()> {
        self.goto_month(self.displayed_month().prev())
    }

    /// Moves `n` months forwards or backwards. Fails without changing the
    /// displayed month if the target cannot be represented.
    pub fn shift_months(&mut self, direction: Direction, n: u32) -> Result<()> {
        let current = self.displayed_month();
        let target = match direction {
            Direction::Forwards => current.checked_add(n),
            Direction::Backwards => current.checked_sub(n),
        }
        .ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidMonth,
                &format!("cannot move {} months from {}", n, current),
            )
        })?;
        self.goto_month(target)
    }

    pub fn select_today(&mut self) -> Result<()> {
        self.update();
        self.goto_month(MonthIndex::from(self.today()))
    }

    /// Moves the cursor by `days`, staying within the displayed grid.
    pub fn move_cursor(&mut self, days: i64) -> bool {
        let target = self.cursor + Duration::days(days);
        if self.grid.contains(&target) {
            self.cursor = target;
            true
        } else {
            false
        }
    }

    pub fn selected_token(&self) -> Option<&Token> {
        self.tokens.nth(self.palette_index)
    }

    pub fn dragged_token(&self) -> Option<&Token> {
        match &self.mode {
            Mode::Drag(id) => self.tokens.get(id),
            _ => None,
        }
    }

    /// Picks up the token `id` from the palette.
    pub fn begin_drag(&mut self, id: TokenId) {
        if self.tokens.get(&id).is_some() {
            log::debug!("Dragging '{}'", id);
            self.mode = Mode::Drag(id);
        }
    }

    pub fn begin_drag_selected(&mut self) {
        if let Some(token) = self.selected_token() {
            let id = token.id.clone();
            self.begin_drag(id);
        }
    }

    /// Ends the current drag, dropping onto the cursor day if `on_target` is
    /// set and onto nothing otherwise.
    pub fn finish_drag(&mut self, on_target: bool) {
        if let Mode::Drag(dragged) = std::mem::replace(&mut self.mode, Mode::Normal) {
            let event = DragEnd {
                dragged,
                dropped_on: if on_target {
                    Some(DayId::from(self.cursor))
                } else {
                    None
                },
            };
            self.assignments.handle_drop(&self.tokens, &event);
        }
    }

    pub fn drop_at_cursor(&mut self, dragged: TokenId) {
        let event = DragEnd {
            dragged,
            dropped_on: Some(DayId::from(self.cursor)),
        };
        self.assignments.handle_drop(&self.tokens, &event);
    }

    pub fn remove_at_cursor(&mut self) {
        self.assignments.remove(&DayId::from(self.cursor));
    }

    pub fn report_error<E: std::fmt::Display>(&mut self, error: E) {
        log::warn!("{}", error);
        self.last_error_message = Some(error.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(year: i32, month: u32) -> Context {
        Context::new(
            TokenSet::default(),
            MonthIndex::try_new(year, month).unwrap(),
        )
        .unwrap()
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn navigation_round_trip() {
        let mut ctx = context(2023, 12);

        ctx.next_month().unwrap();
        assert_eq!(ctx.displayed_month(), MonthIndex::try_new(2024, 1).unwrap());
        ctx.prev_month().unwrap();
        assert_eq!(ctx.displayed_month(), MonthIndex::try_new(2023, 12).unwrap());

        ctx.shift_months(Direction::Backwards, 13).unwrap();
        assert_eq!(ctx.displayed_month(), MonthIndex::try_new(2022, 11).unwrap());
        ctx.shift_months(Direction::Forwards, 13).unwrap();
        assert_eq!(ctx.displayed_month(), MonthIndex::try_new(2023, 12).unwrap());
    }

    #[test]
    fn huge_shift_fails_and_keeps_month() {
        let mut ctx = context(2024, 2);

        for direction in [Direction::Forwards, Direction::Backwards] {
            let err = ctx.shift_months(direction, u32::MAX).unwrap_err();
            assert!(matches!(err.kind, ErrorKind::InvalidMonth));
            assert_eq!(ctx.displayed_month(), MonthIndex::try_new(2024, 2).unwrap());
        }
    }

    #[test]
    fn today_resets_displayed_month() {
        let mut ctx = context(1999, 3);

        ctx.select_today().unwrap();

        assert!(ctx.displayed_month().contains(&Local::now().date_naive()));
        assert_eq!(ctx.cursor(), ctx.today());
    }

    #[test]
    fn navigation_keeps_assignments() {
        let mut ctx = context(2024, 2);
        ctx.drop_at_cursor(TokenId::from("erik"));

        ctx.next_month().unwrap();
        ctx.select_today().unwrap();

        assert_eq!(ctx.assignments().len(), 1);
    }

    #[test]
    fn cursor_stays_inside_grid() {
        let mut ctx = context(2024, 2);
        assert_eq!(ctx.cursor(), date(2024, 2, 1));

        assert!(ctx.move_cursor(-3));
        assert_eq!(ctx.cursor(), date(2024, 1, 29));
        assert!(!ctx.move_cursor(-1));
        assert_eq!(ctx.cursor(), date(2024, 1, 29));

        assert!(ctx.move_cursor(41));
        assert_eq!(ctx.cursor(), date(2024, 3, 10));
        assert!(!ctx.move_cursor(7));
    }

    #[test]
    fn drag_and_drop_on_cursor() {
        let mut ctx = context(2024, 2);
        ctx.move_cursor(7);

        ctx.palette_index = 1;
        ctx.begin_drag_selected();
        assert_eq!(ctx.mode, Mode::Drag(TokenId::from("erik")));
        assert_eq!(ctx.dragged_token().unwrap().name, "Erik");

        ctx.finish_drag(true);
        assert_eq!(ctx.mode, Mode::Normal);

        let day = DayId::from(date(2024, 2, 8));
        assert_eq!(ctx.assignments().get(&day).unwrap().name, "Erik");
    }

    #[test]
    fn cancelled_drag_assigns_nothing() {
        let mut ctx = context(2024, 2);

        ctx.begin_drag(TokenId::from("elias"));
        ctx.finish_drag(false);

        assert_eq!(ctx.mode, Mode::Normal);
        assert!(ctx.assignments().is_empty());
    }

    #[test]
    fn unknown_token_cannot_be_picked_up() {
        let mut ctx = context(2024, 2);

        ctx.begin_drag(TokenId::from("nobody"));
        assert_eq!(ctx.mode, Mode::Normal);

        ctx.drop_at_cursor(TokenId::from("nobody"));
        assert!(ctx.assignments().is_empty());
    }

    #[test]
    fn remove_at_cursor() {
        let mut ctx = context(2024, 2);

        ctx.drop_at_cursor(TokenId::from("erik"));
        ctx.remove_at_cursor();
        assert!(ctx.assignments().is_empty());

        ctx.remove_at_cursor();
        assert!(ctx.assignments().is_empty());
    }
}
