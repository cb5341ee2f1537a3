//! Headless mode for the planning board.
//!
//! A line-oriented protocol over stdin/stdout for scripted use:
//! - Lines starting with `#` are commands (`#epic 1`, `#show`, `#quit`, ...)
//! - Any other line is added as a new requirement
//! - Output lines are tagged (`[CREATED]`, `[ERROR]`, ...) for easy parsing

use planner_core::{
    ArtifactId, ArtifactKind, Board, BoardView, CompletionBackend, Intent, Outcome,
};
use std::io::{self, BufRead, Write};

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Apply(Intent),
    Show,
    Dump,
    Help,
    Quit,
}

const HELP: &[&str] = &[
    "  #add <text>              - Add a requirement",
    "  #epic <requirement id>   - Convert a requirement to an epic",
    "  #stories <epic id>       - Generate user stories for an epic",
    "  #tasks <story id>        - Break a story into tasks",
    "  #edit <kind> <id> <text> - Replace a card's text",
    "  #delete <kind> <id>      - Delete a card",
    "  #select <task id>        - Select a task and highlight its parents",
    "  #show                    - Print the board",
    "  #dump                    - Print the board as JSON",
    "  #help                    - Show this help",
    "  #quit                    - Exit",
    "  (anything else is added as a requirement)",
];

/// Parse one input line. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let Some(body) = line.strip_prefix('#') else {
        return Ok(Some(Command::Apply(Intent::AddRequirement {
            text: line.to_string(),
        })));
    };

    let (name, rest) = body.split_once(char::is_whitespace).unwrap_or((body, ""));
    let rest = rest.trim();

    let command = match name {
        "add" => {
            if rest.is_empty() {
                return Err("Usage: #add <text>".to_string());
            }
            Command::Apply(Intent::AddRequirement {
                text: rest.to_string(),
            })
        }
        "epic" => Command::Apply(Intent::ConvertToEpic {
            requirement_id: parse_id(rest, "#epic <requirement id>")?,
        }),
        "stories" => Command::Apply(Intent::ExpandEpic {
            epic_id: parse_id(rest, "#stories <epic id>")?,
        }),
        "tasks" => Command::Apply(Intent::BreakStory {
            story_id: parse_id(rest, "#tasks <story id>")?,
        }),
        "select" => Command::Apply(Intent::SelectTask {
            task_id: parse_id(rest, "#select <task id>")?,
        }),
        "edit" => {
            const USAGE: &str = "#edit <kind> <id> <text>";
            let mut parts = rest.splitn(3, char::is_whitespace);
            let kind = parse_kind(parts.next(), USAGE)?;
            let id = parse_id(parts.next().unwrap_or(""), USAGE)?;
            let text = parts.next().unwrap_or("").trim();
            if text.is_empty() {
                return Err(format!("Usage: {USAGE}"));
            }
            Command::Apply(Intent::Edit {
                kind,
                id,
                text: text.to_string(),
            })
        }
        "delete" => {
            const USAGE: &str = "#delete <kind> <id>";
            let mut parts = rest.split_whitespace();
            let kind = parse_kind(parts.next(), USAGE)?;
            let id = parse_id(parts.next().unwrap_or(""), USAGE)?;
            Command::Apply(Intent::Delete { kind, id })
        }
        "show" | "status" => Command::Show,
        "dump" => Command::Dump,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("Unknown command #{other}. Type #help for help.")),
    };
    Ok(Some(command))
}

fn parse_id(arg: &str, usage: &str) -> Result<ArtifactId, String> {
    arg.trim()
        .parse()
        .map_err(|_| format!("Usage: {usage}"))
}

fn parse_kind(arg: Option<&str>, usage: &str) -> Result<ArtifactKind, String> {
    let arg = arg.ok_or_else(|| format!("Usage: {usage}"))?;
    arg.parse().map_err(|e| format!("{e}"))
}

/// Run the board in headless mode on stdin/stdout.
pub async fn run_headless<B: CompletionBackend>(board: Board<B>) -> io::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_session(board, stdin.lock(), stdout.lock()).await
}

/// Drive a board from any line source.
pub async fn run_session<B, R, W>(mut board: Board<B>, input: R, mut out: W) -> io::Result<()>
where
    B: CompletionBackend,
    R: BufRead,
    W: Write,
{
    writeln!(out, "=== Agile Sprint Planning (headless) ===")?;
    writeln!(out, "Model: {}", board.config().model)?;
    writeln!(out, "Type #help for commands.")?;
    writeln!(out)?;
    out.flush()?;

    for line in input.lines() {
        let line = line?;
        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                writeln!(out, "[ERROR] {message}")?;
                out.flush()?;
                continue;
            }
        };

        match command {
            Command::Quit => {
                writeln!(out, "Goodbye!")?;
                break;
            }
            Command::Help => {
                writeln!(out, "[HELP]")?;
                for entry in HELP {
                    writeln!(out, "{entry}")?;
                }
            }
            Command::Show => write_board(&mut out, &board.view())?,
            Command::Dump => {
                let json = serde_json::to_string_pretty(&board.view())
                    .map_err(io::Error::other)?;
                writeln!(out, "{json}")?;
            }
            Command::Apply(intent) => {
                if intent.is_generation() {
                    writeln!(out, "[GENERATING]")?;
                    out.flush()?;
                }
                let creates = intent.creates();
                match board.apply(intent).await {
                    Ok(Outcome::Created(ids)) => {
                        let kind = creates.unwrap_or(ArtifactKind::Requirement);
                        for id in ids {
                            writeln!(out, "[CREATED] {kind} #{id}")?;
                        }
                    }
                    Ok(Outcome::Updated) => writeln!(out, "[OK]")?,
                    Ok(Outcome::Unchanged) => writeln!(out, "[UNCHANGED]")?,
                    Err(e) => {
                        tracing::warn!(error = %e, "headless command failed");
                        writeln!(out, "[ERROR] {e}")?;
                    }
                }
            }
        }
        out.flush()?;
    }

    Ok(())
}

/// Print every column; highlighted cards are marked with `*`.
fn write_board<W: Write>(out: &mut W, view: &BoardView) -> io::Result<()> {
    writeln!(out, "[BOARD]")?;
    if let Some(task) = view.selected_task {
        writeln!(out, "Selected task: #{task}")?;
    }
    for kind in ArtifactKind::ALL {
        let cards = view.column(kind);
        writeln!(out, "{} ({})", kind.column_title(), cards.len())?;
        for card in cards {
            let marker = if card.highlighted { '*' } else { ' ' };
            for (i, line) in card.text.lines().enumerate() {
                if i == 0 {
                    writeln!(out, " {marker} #{:<4} {line}", card.id.to_string())?;
                } else {
                    writeln!(out, "         {line}")?;
                }
            }
        }
    }
    Ok(())
}
