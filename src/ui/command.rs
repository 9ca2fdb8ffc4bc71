use unsegen::input::*;

use nom::{
    character::complete::{alpha1, digit1, space1},
    combinator::{all_consuming, map_res, opt, rest},
    error::{ErrorKind as NomErrorKind, ParseError},
    sequence::{preceded, tuple},
    IResult,
};

use super::context::{Context, Direction, Mode};
use crate::error::{Error, ErrorKind, Result};
use crate::month::MonthIndex;
use crate::token::TokenId;

pub struct CommandParser<'a> {
    context: &'a mut Context,
}

/// Parses a command name and looks up its action.
pub fn match_action<'i, 's, Act>(
    actions: &'s [(&'static str, Act)],
    input: &'i str,
) -> IResult<&'i str, &'s Act> {
    let (remaining, name) = alpha1(input)?;

    actions
        .iter()
        .find(|(action_name, _)| *action_name == name)
        .map(|(_, act)| (remaining, act))
        .ok_or_else(|| nom::Err::Failure(ParseError::from_error_kind(input, NomErrorKind::Tag)))
}

fn command_action(input: &str) -> IResult<&str, &'static Action> {
    match_action(COMMANDS, input)
}

fn parse_command(input: &str) -> IResult<&str, (Option<u32>, &'static Action, Option<&str>)> {
    all_consuming(tuple((
        opt(map_res(digit1, |digits: &str| digits.parse::<u32>())),
        command_action,
        opt(preceded(space1, rest)),
    )))(input)
}

impl<'a> CommandParser<'a> {
    pub fn new(context: &'a mut Context) -> Self {
        CommandParser { context }
    }

    pub fn run_command(&mut self, cmd: &str) -> Result<()> {
        let cmd = cmd.trim();
        let (_, (repeat, act, arg)) = parse_command(cmd).map_err(|_| {
            Error::new(ErrorKind::UnknownCommand, &format!("'{}'", cmd))
        })?;

        match (act, repeat, arg) {
            (Action::Repeatable(a), repeat, None) => a(self.context, repeat.unwrap_or(1)),
            (Action::NoArg(a), None, None) => a(self.context),
            (Action::Arg(a), None, Some(arg)) => a(self.context, arg.trim()),
            _ => Err(Error::new(
                ErrorKind::UnknownCommand,
                &format!("invalid arguments in '{}'", cmd),
            )),
        }
    }
}

impl Behavior for CommandParser<'_> {
    fn input(mut self, input: Input) -> Option<Input> {
        if let Event::Key(Key::Char('\n')) = input.event {
            let cmd = self.context.input_sink_mut().finish_line().to_owned();
            self.context.mode = Mode::Normal;
            if let Err(e) = self.run_command(&cmd) {
                self.context.report_error(e);
            } else {
                self.context.last_error_message = None;
            }
            None
        } else {
            Some(input)
        }
    }
}

pub type ActionResult = Result<()>;

pub enum Action {
    Arg(fn(&mut Context, &str) -> ActionResult),
    NoArg(fn(&mut Context) -> ActionResult),
    Repeatable(fn(&mut Context, u32) -> ActionResult),
}

const COMMANDS: &[(&str, Action)] = &[
    (
        "next",
        Action::Repeatable(|c, n| c.shift_months(Direction::Forwards, n)),
    ),
    (
        "prev",
        Action::Repeatable(|c, n| c.shift_months(Direction::Backwards, n)),
    ),
    ("today", Action::NoArg(|c| c.select_today())),
    (
        "rm",
        Action::NoArg(|c| {
            c.remove_at_cursor();
            Ok(())
        }),
    ),
    (
        "drop",
        Action::Arg(|c, token| {
            c.drop_at_cursor(TokenId::from(token));
            Ok(())
        }),
    ),
    (
        "goto",
        Action::Arg(|c, month| c.goto_month(month.parse::<MonthIndex>()?)),
    ),
    (
        "quit",
        Action::NoArg(|c| {
            c.quit = true;
            Ok(())
        }),
    ),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment::DayId;
    use crate::token::TokenSet;

    fn context() -> Context {
        Context::new(TokenSet::default(), MonthIndex::try_new(2024, 2).unwrap()).unwrap()
    }

    #[test]
    fn repeatable_commands() {
        let mut ctx = context();

        CommandParser::new(&mut ctx).run_command("next").unwrap();
        assert_eq!(ctx.displayed_month(), MonthIndex::try_new(2024, 3).unwrap());

        CommandParser::new(&mut ctx).run_command("12prev").unwrap();
        assert_eq!(ctx.displayed_month(), MonthIndex::try_new(2023, 3).unwrap());
    }

    #[test]
    fn oversized_repeat_counts_fail_without_moving() {
        let mut ctx = context();
        let start = ctx.displayed_month();

        for cmd in ["2147483648prev", "4294967295prev", "2147483648next", "4294967295next"] {
            let err = CommandParser::new(&mut ctx).run_command(cmd).unwrap_err();
            assert!(matches!(err.kind, ErrorKind::InvalidMonth), "{}", cmd);
            assert_eq!(ctx.displayed_month(), start, "{}", cmd);
        }

        // does not fit in u32
        assert!(CommandParser::new(&mut ctx)
            .run_command("4294967296next")
            .is_err());
        assert_eq!(ctx.displayed_month(), start);
    }

    #[test]
    fn goto_and_drop() {
        let mut ctx = context();

        CommandParser::new(&mut ctx).run_command("goto 2023-01").unwrap();
        assert_eq!(ctx.displayed_month(), MonthIndex::try_new(2023, 1).unwrap());

        CommandParser::new(&mut ctx).run_command("drop erik").unwrap();
        let day = DayId::from(ctx.cursor());
        assert_eq!(ctx.assignments().get(&day).unwrap().name, "Erik");

        CommandParser::new(&mut ctx).run_command("rm").unwrap();
        assert!(ctx.assignments().is_empty());
    }

    #[test]
    fn quit() {
        let mut ctx = context();
        CommandParser::new(&mut ctx).run_command(" quit ").unwrap();
        assert!(ctx.quit);
    }

    #[test]
    fn rejects_malformed_commands() {
        let mut ctx = context();
        let mut parser = CommandParser::new(&mut ctx);

        assert!(parser.run_command("fly").is_err());
        assert!(parser.run_command("").is_err());
        assert!(parser.run_command("3today").is_err());
        assert!(parser.run_command("goto").is_err());
        assert!(parser.run_command("goto 2024-13").is_err());
        assert!(parser.run_command("rm now").is_err());
    }
}
