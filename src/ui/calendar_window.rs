use std::fmt::Write;
use unsegen::base::*;
use unsegen::widget::*;

use super::{Context, Mode};
use crate::assignment::{Assignment, DayId};
use crate::grid::{CalendarDay, COLUMNS, ROWS, WEEKDAY_LABELS};

pub struct DayCell<'a> {
    day: &'a CalendarDay,
    assignment: Option<&'a Assignment>,
    selected: bool,
    is_today: bool,
}

impl<'a> DayCell<'a> {
    const CELL_HEIGHT: usize = 2;
    const CELL_WIDTH: usize = 10;

    fn new(day: &'a CalendarDay, assignment: Option<&'a Assignment>) -> Self {
        DayCell {
            day,
            assignment,
            selected: false,
            is_today: false,
        }
    }

    fn select(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    fn today(mut self, is_today: bool) -> Self {
        self.is_today = is_today;
        self
    }

    fn label(&self, today_char: Option<char>) -> String {
        let marker = if self.is_today {
            today_char.unwrap_or(' ')
        } else {
            ' '
        };

        format!(
            "{:<width$}",
            format!(" {}{:>2}", marker, self.day.label()),
            width = Self::CELL_WIDTH
        )
    }

    fn assignment_label(&self) -> String {
        let name = self
            .assignment
            .map(|a| a.name.chars().take(Self::CELL_WIDTH - 2).collect::<String>())
            .unwrap_or_default();

        format!(" {:<width$} ", name, width = Self::CELL_WIDTH - 2)
    }
}

pub struct CalendarWindow<'a> {
    context: &'a Context,
}

impl<'a> CalendarWindow<'a> {
    const HEADER_ROWS: usize = 2;

    pub fn new(context: &'a Context) -> Self {
        CalendarWindow { context }
    }

    fn draw_cell(&self, cursor: &mut Cursor, cell: &DayCell) {
        let theme = &self.context.theme;
        let saved_style = cursor.get_style_modifier();

        cursor.set_style_modifier(if cell.day.is_current_month {
            theme.day_style
        } else {
            theme.other_month_day_style
        });
        if cell.is_today {
            cursor.apply_style_modifier(theme.today_day_style);
        }
        if cell.selected {
            cursor.apply_style_modifier(match self.context.mode {
                Mode::Drag(_) => theme.drop_target_style,
                _ => theme.focus_day_style,
            });
        }

        if let Err(err) = write!(cursor, "{}", cell.label(theme.today_day_char)) {
            log::warn!("Error while writing day cell: {}", err);
        }

        cursor.set_style_modifier(saved_style);
    }

    fn draw_assignment(&self, cursor: &mut Cursor, cell: &DayCell) {
        let saved_style = cursor.get_style_modifier();

        if let Some(assignment) = cell.assignment {
            cursor.set_style_modifier(
                StyleModifier::new()
                    .fg_color(Color::Black)
                    .bg_color(super::token_color(&assignment.color)),
            );
        }

        if let Err(err) = write!(cursor, "{}", cell.assignment_label()) {
            log::warn!("Error while writing assignment: {}", err);
        }

        cursor.set_style_modifier(saved_style);
    }
}

impl Widget for CalendarWindow<'_> {
    fn space_demand(&self) -> Demand2D {
        Demand2D {
            width: ColDemand::exact(COLUMNS * DayCell::CELL_WIDTH),
            height: RowDemand::exact(Self::HEADER_ROWS + ROWS * DayCell::CELL_HEIGHT),
        }
    }

    fn draw(&self, mut window: Window, _hints: RenderingHints) {
        let theme = &self.context.theme;
        let grid = self.context.grid();
        let today = self.context.today();
        let selected = self.context.cursor();

        let mut cursor = Cursor::new(&mut window).style_modifier(theme.month_header_style);

        let month = grid.month();
        if let Err(err) = write!(&mut cursor, " {} {}", month.name(), month.year()) {
            log::warn!("Error while writing month header: {}", err);
        }
        cursor.fill_and_wrap_line();

        cursor.set_style_modifier(theme.weekday_label_style);
        for &head in WEEKDAY_LABELS.iter() {
            if let Err(err) = write!(
                &mut cursor,
                "{:>4}{:width$}",
                head,
                "",
                width = DayCell::CELL_WIDTH - 4
            ) {
                log::warn!("Error while writing weekday label: {}", err);
            }
        }
        cursor.fill_and_wrap_line();
        cursor.set_style_modifier(theme.day_style);

        for week in grid.weeks() {
            let cells: Vec<DayCell> = week
                .iter()
                .map(|day| {
                    DayCell::new(day, self.context.assignments().get(&DayId::from(day.date)))
                        .select(day.date == selected)
                        .today(day.date == today)
                })
                .collect();

            for cell in cells.iter() {
                self.draw_cell(&mut cursor, cell);
            }
            cursor.fill_and_wrap_line();

            for cell in cells.iter() {
                self.draw_assignment(&mut cursor, cell);
            }
            cursor.fill_and_wrap_line();
        }
    }
}
