use super::ui;
use crate::core::Session;
use crate::core::currency::CurrencyCode;
use crate::core::history::HistoryToggle;
use crate::core::picker::Side;
use anyhow::{Result, anyhow, bail};
use console::Term;
use std::str::FromStr;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

const HELP: &[(&str, &str)] = &[
    ("amount <kwota>", "ustaw kwotę, np. amount 12,50"),
    ("from [KOD]", "rozwiń listę walut źródłowych albo wybierz walutę"),
    ("to [KOD]", "rozwiń listę walut docelowych albo wybierz walutę"),
    ("search <from|to> <tekst>", "szukaj waluty po kodzie lub nazwie"),
    ("close", "zwiń listy walut"),
    ("convert", "przelicz"),
    ("swap", "zamień waluty"),
    ("history", "pokaż lub ukryj historię kursu"),
    ("theme", "przełącz motyw"),
    ("show", "pokaż cały ekran"),
    ("help", "ta pomoc"),
    ("quit", "zakończ"),
];

/// One line typed at the prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Amount(String),
    /// Without a code the side's option list is toggled.
    Pick(Side, Option<CurrencyCode>),
    Search(Side, String),
    Close,
    Convert,
    Swap,
    History,
    Theme,
    Show,
    Help,
    Quit,
}

fn parse_side(s: &str) -> Result<Side> {
    match s.to_lowercase().as_str() {
        "from" => Ok(Side::From),
        "to" => Ok(Side::To),
        other => Err(anyhow!("Nieznana strona: {}", other)),
    }
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };

        let command = match head.to_lowercase().as_str() {
            "amount" => Command::Amount(rest.to_string()),
            "from" | "to" => {
                let side = parse_side(head)?;
                if rest.is_empty() {
                    Command::Pick(side, None)
                } else {
                    Command::Pick(side, Some(rest.parse()?))
                }
            }
            "search" => {
                let (side, query) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                Command::Search(parse_side(side)?, query.trim().to_string())
            }
            "close" => Command::Close,
            "convert" => Command::Convert,
            "swap" => Command::Swap,
            "history" => Command::History,
            "theme" => Command::Theme,
            "show" => Command::Show,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            "" => bail!("Puste polecenie"),
            other => bail!("Nieznane polecenie: {} (wpisz help)", other),
        };
        Ok(command)
    }
}

#[derive(Debug, PartialEq)]
pub enum Flow {
    Continue,
    Quit,
}

fn print_help() {
    println!("\n{}", ui::style_text("Polecenia", ui::StyleType::Title));
    for (usage, description) in HELP {
        println!("  {:<26} {}", usage, ui::style_text(description, ui::StyleType::Subtle));
    }
}

fn print_picker(session: &Session, side: Side) {
    if let Some(picker) = session.pickers().get(side) {
        println!("{side}: {}", picker.trigger());
    }
}

fn print_screen(session: &Session) {
    let state = session.state();
    println!("\nKwota: {}", session.amount());
    print_picker(session, Side::From);
    print_picker(session, Side::To);
    println!(
        "{}  [{}]",
        ui::style_text(state.history.toggle_label, ui::StyleType::Subtle),
        state.theme.toggle_icon()
    );
    for line in ui::screen_lines(state) {
        println!("{line}");
    }
}

/// Applies one command to the session.
pub async fn execute(session: &mut Session, command: Command) -> Flow {
    debug!(?command, "Executing");
    match command {
        Command::Amount(amount) => session.set_amount(&amount),
        Command::Pick(side, None) => {
            session.toggle_picker(side);
            let open = session
                .pickers()
                .get(side)
                .filter(|picker| picker.is_open());
            if let Some(picker) = open {
                println!("{}", ui::currency_table(picker.options(), session.state().theme));
            }
        }
        Command::Pick(side, Some(code)) => match session.select(side, code) {
            Some(_) => print_picker(session, side),
            None => println!(
                "{}",
                ui::style_text(&format!("Nieznana waluta: {code}"), ui::StyleType::Error)
            ),
        },
        Command::Search(side, query) => {
            if let Some(picker) = session.pickers().get(side) {
                let found = picker.search(&query);
                if found.is_empty() {
                    println!("{}", ui::style_text("Brak wyników", ui::StyleType::Subtle));
                } else {
                    println!("{}", ui::currency_table(found, session.state().theme));
                }
            }
        }
        Command::Close => session.close_pickers(),
        Command::Convert => {
            let status = session.convert().await;
            debug!(?status, "Conversion finished");
        }
        Command::Swap => {
            session.swap();
            print_picker(session, Side::From);
            print_picker(session, Side::To);
        }
        Command::History => {
            if session.toggle_history().await == HistoryToggle::Hidden {
                println!(
                    "{}",
                    ui::style_text(session.state().history.toggle_label, ui::StyleType::Subtle)
                );
            }
        }
        Command::Theme => {
            session.toggle_theme();
        }
        Command::Show => print_screen(session),
        Command::Help => print_help(),
        Command::Quit => return Flow::Quit,
    }
    Flow::Continue
}

/// Reads commands from stdin until `quit` or end of input.
pub async fn run(session: &mut Session) -> Result<()> {
    info!(pair = %session.pair(), "Starting interactive session");
    session.pickers_mut().subscribe(|change| {
        debug!(side = %change.side, from = %change.previous, to = %change.current, "Picker changed");
    });

    print_help();
    print_screen(session);

    let term = Term::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        term.write_str("> ")?;
        term.flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<Command>() {
            Ok(command) => {
                if execute(session, command).await == Flow::Quit {
                    break;
                }
            }
            Err(e) => println!("{}", ui::style_text(&e.to_string(), ui::StyleType::Error)),
        }
    }
    Ok(())
}
