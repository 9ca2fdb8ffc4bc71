extern crate rota as lib;

use flexi_logger::{FileSpec, Logger};
use lib::events::Dispatcher;
use lib::grid::MonthGrid;
use lib::month::MonthIndex;
use lib::ui::app::App;
use nix::sys::{signal, termios};
use std::io::stdout;
use std::path::PathBuf;
use structopt::StructOpt;
use unsegen::base::Terminal;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "rota",
    author = "Julian Bigge <j.reedts@gmail.com>",
    about = "Rota - assign people to calendar days from the terminal."
)]
pub struct Args {
    #[structopt(
        name = "CONFIG",
        short = "c",
        long = "config",
        help = "path to config file",
        parse(from_os_str)
    )]
    pub configfile: Option<PathBuf>,

    #[structopt(
        short = "m",
        long = "month",
        help = "month to start with, formatted as YYYY-MM"
    )]
    pub month: Option<MonthIndex>,

    #[structopt(
        short = "s",
        long = "show",
        help = "only print the month grid non-interactively"
    )]
    pub show: bool,

    #[structopt(long = "log-file", help = "path to log file", parse(from_os_str))]
    pub log_file: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::from_args();

    const DEFAULT_LOG_LEVEL: &str = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    let mut logger = Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)?;

    if let Some(log_file) = args.log_file {
        logger = logger
            .log_to_file(FileSpec::try_from(log_file)?)
            .print_message();
    } else if !args.show {
        // stderr would draw over the calendar
        logger = logger.do_not_log();
    }

    let _logger = logger.start()?;

    let config = lib::config::load_suitable_config(args.configfile.as_deref())?;
    let month = args.month.unwrap_or_else(MonthIndex::today);

    if args.show {
        print!("{}", MonthGrid::new(month)?);
        return Ok(());
    }

    const STDOUT: std::os::unix::io::RawFd = 0;
    let orig_attr = std::sync::Mutex::new(termios::tcgetattr(STDOUT)?);

    std::panic::set_hook(Box::new(move |info| {
        // Switch to main terminal screen
        println!("{}{}", termion::screen::ToMainScreen, termion::cursor::Show);

        if let Ok(attr) = orig_attr.lock() {
            let _ = termios::tcsetattr(STDOUT, termios::SetArg::TCSANOW, &attr);
        }

        println!("Rota ran into a fatal error!");
        println!("Consider filing an issue with a log file and the backtrace below.");

        println!("{}", info);
        println!("{:?}", backtrace::Backtrace::new());
    }));

    let mut signals_to_wait = signal::SigSet::empty();
    signals_to_wait.add(signal::SIGWINCH);
    signals_to_wait.thread_block()?;

    let dispatcher = Dispatcher::from_config(&config, signals_to_wait);

    // Setup unsegen terminal
    let stdout = stdout();
    let term = Terminal::new(stdout.lock())?;

    let mut app = App::new(&config, month)?;

    app.run(dispatcher, term)
}
