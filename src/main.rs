use std::{
    fs,
    io::{self, BufRead, Write},
    path::PathBuf,
    process::ExitCode,
};

use circulation_desk::{
    BookId, CirculationPolicy, Desk, DeskError, Member, NotificationService, TransitionLogger,
    load_catalog, report,
};
use clap::Parser;
use colored::Colorize;
use flexi_logger::Logger;
use log::info;

/// Command-line arguments for the circulation desk shell
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Catalog file with one `title,author` pair per line
    #[arg(short, long, default_value = "collections.txt")]
    catalog: PathBuf,

    /// JSON file overriding the default circulation policy
    #[arg(short, long)]
    policy: Option<PathBuf>,

    /// Level for diagnostics written to stderr
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

/// A parsed shell command
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    /// Open the desk for the next day
    Open,
    /// Close the desk
    Close,
    /// Issue a card to the named member
    Card(String),
    /// Serve the named member
    Serve(String),
    /// Lend books to the served member
    CheckOut(Vec<BookId>),
    /// Take books back from the served member
    CheckIn(Vec<BookId>),
    /// Renew loans of the served member
    Renew(Vec<BookId>),
    /// Search the shelf
    Search(String),
    /// Overdue books of the served member
    Overdue,
    /// Overdue books of every member
    OverdueAll,
    /// Desk summary
    Status,
    /// Recent desk transitions
    History,
    /// List commands
    Help,
    /// End the session
    Quit,
}

/// Command summary printed by `help`
const HELP: &str = "\
commands:
  open                 open the desk for the next day
  close                close the desk
  card <name>          issue a library card
  serve <name>         serve a card holder
  checkout <id>...     lend books to the served member
  checkin <id>...      take books back from the served member
  renew <id>...        renew loans of the served member
  search <text>        search the shelf (case-insensitive pattern)
  overdue              overdue books of the served member
  overdue-all          overdue books of every member
  status               desk summary
  history              recent desk transitions
  help                 this list
  quit                 end the session";

/// Parse book ids, collecting tokens that are not ids
fn parse_ids(args: &str) -> (Vec<BookId>, Vec<String>) {
    let mut ids = Vec::new();
    let mut rejected = Vec::new();
    for token in args.split(|c: char| c.is_whitespace() || c == ',').filter(|t| !t.is_empty()) {
        match token.parse::<BookId>() {
            Ok(id) => ids.push(id),
            Err(_) => rejected.push(token.to_string()),
        }
    }
    (ids, rejected)
}

/// Parse one input line. Returns the command and any rejected id tokens.
fn parse_command(line: &str) -> Result<(Command, Vec<String>), String> {
    let line = line.trim();
    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();
    let needs_arg = |what: &str| {
        if rest.is_empty() { Err(format!("`{verb}` needs {what}")) } else { Ok(rest.to_string()) }
    };

    let verb_lower = verb.to_ascii_lowercase();
    let command = match verb_lower.as_str() {
        "open" => Command::Open,
        "close" => Command::Close,
        "card" => Command::Card(needs_arg("a member name")?),
        "serve" => Command::Serve(needs_arg("a member name")?),
        batch @ ("checkout" | "checkin" | "renew") => {
            let (ids, rejected) = parse_ids(&needs_arg("at least one book id")?);
            let command = match batch {
                "checkout" => Command::CheckOut(ids),
                "checkin" => Command::CheckIn(ids),
                _ => Command::Renew(ids),
            };
            return Ok((command, rejected));
        }
        "search" => Command::Search(needs_arg("search text")?),
        "overdue" => Command::Overdue,
        "overdue-all" => Command::OverdueAll,
        "status" => Command::Status,
        "history" => Command::History,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command `{other}`; try `help`")),
    };
    Ok((command, Vec::new()))
}

/// Run one command against the desk and return the lines to print
fn execute(desk: &mut Desk, command: &Command) -> Result<Vec<String>, DeskError> {
    let lines = match command {
        Command::Open => vec![report::opened(desk.open()?)],
        Command::Close => {
            desk.close()?;
            vec![report::closed()]
        }
        Command::Card(name) => vec![report::card(&desk.issue_card(name)?)],
        Command::Serve(name) => {
            desk.serve(name)?;
            vec![report::serving(name)]
        }
        Command::CheckOut(ids) => report::check_out(&desk.check_out(ids)?),
        Command::CheckIn(ids) => report::check_in(&desk.check_in(ids)?),
        Command::Renew(ids) => report::renew(&desk.renew(ids)?),
        Command::Search(query) => report::search(&desk.search(query)?),
        Command::Overdue => {
            let books = desk.find_overdue_books()?;
            let name = desk.served_member().map(|m| m.name().to_string()).unwrap_or_default();
            report::overdue(&name, &books)
        }
        Command::OverdueAll => report::all_overdue(&desk.find_all_overdue_books()?),
        Command::Status => status(desk),
        Command::History => desk
            .history()
            .iter()
            .map(|record| format!("day {}: {:?}", record.day, record.event))
            .collect(),
        Command::Help => HELP.lines().map(str::to_string).collect(),
        Command::Quit => vec![report::CLOSING_BANNER.to_string()],
    };
    Ok(lines)
}

/// Summary of the desk state
fn status(desk: &Desk) -> Vec<String> {
    let serving = desk.served_member().map_or("nobody", Member::name);
    let lent = desk.book_count().saturating_sub(desk.available_books().len());
    vec![
        format!("Day {}, desk is {:?}, serving {serving}", desk.today(), desk.state()),
        format!(
            "{} books on the shelf, {lent} lent out, {} card holders",
            desk.available_books().len(),
            desk.members().count()
        ),
    ]
}

/// Build the desk from the command-line arguments
fn build_desk(args: &Args) -> Result<Desk, Box<dyn std::error::Error>> {
    let policy = match &args.policy {
        Some(path) => CirculationPolicy::from_json(&fs::read_to_string(path)?)?,
        None => CirculationPolicy::default(),
    };
    let books = load_catalog(&args.catalog)?;
    info!("event=desk_init books={} loan_days={}", books.len(), policy.loan_days);

    let mut desk = Desk::with_policy(books, policy);
    desk.register_observer(Box::new(TransitionLogger));
    desk.register_observer(Box::new(NotificationService));
    Ok(desk)
}

/// Read commands from stdin until `quit` or end of input
fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut desk = build_desk(args)?;
    println!("{}", "Circulation Desk".green().bold());
    println!("{} books in the catalog; type `help` for commands\n", desk.book_count());

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut input = stdin.lock().lines();
    loop {
        print!("{} ", ">".cyan());
        stdout.flush()?;
        let Some(line) = input.next().transpose()? else {
            println!("{}", report::CLOSING_BANNER.yellow());
            return Ok(());
        };
        if line.trim().is_empty() {
            continue;
        }

        let (command, rejected) = match parse_command(&line) {
            Ok(parsed) => parsed,
            Err(message) => {
                println!("{}", message.red());
                continue;
            }
        };
        for token in rejected {
            println!("{}", format!("`{token}` is not a book id").red());
        }

        match execute(&mut desk, &command) {
            Ok(lines) => {
                for line in lines {
                    println!("{line}");
                }
            }
            Err(err) => println!("{}", err.to_string().red().bold()),
        }
        if command == Command::Quit {
            return Ok(());
        }
    }
}

/// Parse arguments, start logging and run the shell
fn main() -> ExitCode {
    let args = Args::parse();
    if args.no_color {
        colored::control::set_override(false);
    }

    let started = Logger::try_with_str(&args.log_level).and_then(|logger| logger.log_to_stderr().start());
    let _logger = match started {
        Ok(handle) => handle,
        Err(err) => {
            eprintln!("{}", format!("failed to start logger: {err}").red());
            return ExitCode::FAILURE;
        }
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err.to_string().red().bold());
            ExitCode::FAILURE
        }
    }
}
