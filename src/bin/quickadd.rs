use anyhow::{Context, Result};
use quickadd::autocomplete::{
    AutocompleteController, CommitEvent, MenuSurface, MenuView, PointerEvent, splice_completion,
};
use quickadd::cache::ReferenceCache;
use quickadd::config::Config;
use quickadd::context::StandardContext;
use quickadd::model::{SyntaxMode, TokenType};
use quickadd::session::{CaptureSession, SessionCommand};
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};
use std::cell::RefCell;
use std::env;
use std::fs;
use std::io::{self, BufRead, Write};
use std::rc::Rc;
use std::str::FromStr;

struct TerminalMenu;

impl MenuSurface for TerminalMenu {
    fn render(&mut self, view: &MenuView<'_>) {
        // +2 for the "> " prompt
        let pad = " ".repeat(view.anchor_column + 2);
        for (i, item) in view.items.iter().enumerate() {
            let marker = if i == view.selected { '▸' } else { ' ' };
            println!("{}{} {}{}  [{}]", pad, marker, view.prefix, item.title, i);
        }
    }

    fn clear(&mut self) {}
}

struct Options {
    verbose: bool,
    mode: Option<SyntaxMode>,
    refs: Option<String>,
    parse: Option<String>,
}

fn parse_args(args: &[String]) -> Result<Options> {
    let mut opts = Options {
        verbose: false,
        mode: None,
        refs: None,
        parse: None,
    };
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--verbose" | "-v" => opts.verbose = true,
            "--mode" => {
                let value = args.get(i + 1).context("--mode needs a value")?;
                opts.mode = Some(
                    SyntaxMode::from_str(value)
                        .with_context(|| format!("Unknown syntax mode '{}'", value))?,
                );
                i += 1;
            }
            "--refs" => {
                opts.refs = Some(args.get(i + 1).context("--refs needs a file")?.clone());
                i += 1;
            }
            "parse" => {
                opts.parse = Some(args[i + 1..].join(" "));
                break;
            }
            other => anyhow::bail!("Unknown argument '{}'", other),
        }
        i += 1;
    }
    Ok(opts)
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() > 1 && (args[1] == "--help" || args[1] == "-h" || args[1] == "help") {
        print_help();
        return Ok(());
    }

    let opts = parse_args(&args)?;
    let level = if opts.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;

    let ctx = StandardContext::new(None);
    let mut config = Config::load_or_default(&ctx);
    if let Some(mode) = opts.mode {
        config.syntax_mode = mode;
    }

    let mut session = CaptureSession::new(config.smart_input, config.syntax_mode);
    if let Some(path) = &opts.refs {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read reference file '{}'", path))?;
        let cache = ReferenceCache::from_json(&json)?;
        session.dispatch(SessionCommand::SetProjects(cache.projects().to_vec()));
        session.dispatch(SessionCommand::SetLabels(cache.labels().to_vec()));
    }

    if let Some(text) = opts.parse {
        let snapshot = session.dispatch(SessionCommand::SetInput(text));
        println!("{}", serde_json::to_string_pretty(&snapshot.draft)?);
        return Ok(());
    }

    run_interactive(session, &config)
}

fn run_interactive(mut session: CaptureSession, config: &Config) -> Result<()> {
    let committed: Rc<RefCell<Option<CommitEvent>>> = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&committed);
    let mut menu = AutocompleteController::mount(
        Some(Box::new(TerminalMenu)),
        session.syntax_mode(),
        move |event| {
            *sink.borrow_mut() = Some(event);
        },
    )?;
    menu.set_enabled(config.autocomplete);

    let mut pending: Option<String> = None;
    let stdin = io::stdin();
    prompt()?;
    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim_end_matches(['\r', '\n']);

        if let Some(cmd) = line.strip_prefix(':') {
            let (name, arg) = cmd.split_once(' ').unwrap_or((cmd, ""));
            match name {
                "quit" | "q" => break,
                "reset" => {
                    session.dispatch(SessionCommand::Reset);
                    menu.hide();
                    pending = None;
                }
                "suppress" => match TokenType::from_str(arg.trim()) {
                    Ok(kind) => {
                        session.dispatch(SessionCommand::Suppress(kind));
                    }
                    Err(_) => log::warn!("Unknown token type '{}'", arg.trim()),
                },
                "mode" => match SyntaxMode::from_str(arg.trim()) {
                    Ok(mode) => {
                        session.dispatch(SessionCommand::SetSyntaxMode(mode));
                        menu.set_syntax_mode(mode);
                    }
                    Err(_) => log::warn!("Unknown syntax mode '{}'", arg.trim()),
                },
                "enable" => {
                    session.dispatch(SessionCommand::SetEnabled(arg.trim() != "off"));
                }
                "complete" => {
                    menu.update(arg, arg.len(), session.cache());
                    if menu.is_visible() {
                        pending = Some(arg.to_string());
                    } else {
                        println!("(no suggestions)");
                    }
                    prompt()?;
                    continue;
                }
                "pick" => {
                    let Some(idx) = parse_pick_index(arg) else {
                        log::warn!("Invalid item index '{}'", arg.trim());
                        prompt()?;
                        continue;
                    };
                    menu.handle_pointer(PointerEvent::Click(idx));
                    if let (Some(event), Some(text)) = (committed.borrow_mut().take(), pending.take())
                    {
                        let (spliced, _) = splice_completion(&text, text.len(), &event);
                        session.dispatch(SessionCommand::SetInput(spliced));
                    }
                }
                other => log::warn!("Unknown command ':{}'", other),
            }
        } else {
            session.dispatch(SessionCommand::SetInput(line.to_string()));
        }

        let snapshot = session.snapshot();
        println!("input: {}", snapshot.input);
        println!("{}", serde_json::to_string_pretty(&snapshot.draft)?);
        prompt()?;
    }
    Ok(())
}

fn parse_pick_index(arg: &str) -> Option<usize> {
    arg.trim().parse().ok()
}

fn prompt() -> Result<()> {
    print!("> ");
    io::stdout().flush()?;
    Ok(())
}

fn print_help() {
    println!(
        "quickadd v{} - parse a one-line task into title, due date, project and labels",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    quickadd [OPTIONS]                  Interactive session on stdin");
    println!("    quickadd [OPTIONS] parse <text...>  Print the parsed draft as JSON");
    println!("    quickadd --help                     Show this help message");
    println!();
    println!("OPTIONS:");
    println!("    --mode <todoist|vikunja>   Prefix syntax (#project @label or +project *label)");
    println!("    --refs <file.json>         Known projects/labels: {{\"projects\":[..],\"labels\":[..]}}");
    println!("    -v, --verbose              Debug logging on stderr");
    println!();
    println!("INTERACTIVE COMMANDS:");
    println!("    :suppress <date|project|label>   Dismiss the detected token kind");
    println!("    :mode <todoist|vikunja>          Switch syntax (clears suppressions)");
    println!("    :enable on|off                   Toggle smart parsing");
    println!("    :complete <text>                 Show suggestions for the caret at end of text");
    println!("    :pick <n>                        Commit suggestion n into the input");
    println!("    :reset                           Discard the draft");
    println!("    :quit                            Exit");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pick_index() {
        assert_eq!(parse_pick_index(" 2 "), Some(2));
        assert_eq!(parse_pick_index("0"), Some(0));
        assert_eq!(parse_pick_index(""), None);
        assert_eq!(parse_pick_index("two"), None);
        assert_eq!(parse_pick_index("-1"), None);
    }
}
