use anyhow::{Context, Result, bail};
use notephemeral_config::Config;
use notephemeral_engine::{Cmd, Document, editing::ResolvedPos, scan};
use std::{
    env,
    io::{self, BufRead},
    path::{Path, PathBuf},
    process,
};

const USAGE: &str = "[--tree|--tokens|--html|--edit] [note.md]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Markdown,
    Tree,
    Tokens,
    Html,
    Edit,
}

/// One line of `--edit` input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Intent {
    Type(String),
    Enter,
    Backspace,
    Paste(String),
    Caret(usize),
    Print,
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = env::args().collect();
    let (mode, note) = match parse_args(&args[1..]) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Usage: {} {USAGE}", args[0]);
            process::exit(1);
        }
    };

    if let Err(e) = run(mode, note.as_deref()) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn parse_args(args: &[String]) -> Result<(Mode, Option<PathBuf>)> {
    let mut mode = Mode::Markdown;
    let mut note = None;
    for arg in args {
        match arg.as_str() {
            "--tree" => mode = Mode::Tree,
            "--tokens" => mode = Mode::Tokens,
            "--html" => mode = Mode::Html,
            "--edit" => mode = Mode::Edit,
            flag if flag.starts_with("--") => bail!("unknown option {flag}"),
            path if note.is_none() => note = Some(PathBuf::from(path)),
            path => bail!("unexpected argument {path}"),
        }
    }
    Ok((mode, note))
}

fn run(mode: Mode, note: Option<&Path>) -> Result<()> {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Ignoring config file: {e}");
            None
        }
    };

    let text = match note {
        Some(note) => {
            let path = match &config {
                Some(config) => config.resolve_note(note),
                None => note.to_path_buf(),
            };
            log::info!("Loading note {}", path.display());
            std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read note at {}", path.display()))?
        }
        None => String::new(),
    };

    let policy = config.map(|c| c.paste_links).unwrap_or_default();
    let mut doc = Document::from_markdown(&text).with_link_policy(policy);

    match mode {
        Mode::Markdown => print!("{}", doc.to_markdown()?),
        Mode::Tree => print!("{}", doc.tree()),
        Mode::Tokens => println!("{:#?}", scan(&text)),
        Mode::Html => print!("{}", doc.to_html()?),
        Mode::Edit => edit(&mut doc, io::stdin().lock())?,
    }
    Ok(())
}

/// Replays edit intents, printing the Markdown after every committed edit.
fn edit(doc: &mut Document, input: impl BufRead) -> Result<()> {
    log::info!("Editing with link policy {:?}", doc.link_policy());
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let intent = match parse_intent(&line) {
            Ok(intent) => intent,
            Err(e) => {
                eprintln!("Error: {e}");
                continue;
            }
        };
        match intent {
            Intent::Print => print!("{}", doc.to_markdown()?),
            Intent::Caret(pos) => match doc.resolve(pos) {
                Ok(_) => doc.set_selection(pos..pos),
                Err(e) => eprintln!("Error: {e}"),
            },
            intent => {
                let Some(cmd) = to_command(doc, intent) else {
                    continue;
                };
                let version = doc.version();
                let patch = doc.apply(cmd);
                if patch.version != version {
                    print!("{}", doc.to_markdown()?);
                }
            }
        }
    }
    Ok(())
}

fn parse_intent(line: &str) -> Result<Intent> {
    let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
    Ok(match word {
        "type" => Intent::Type(unescape(rest)),
        "enter" => Intent::Enter,
        "backspace" => Intent::Backspace,
        "paste" => Intent::Paste(unescape(rest)),
        "caret" => Intent::Caret(
            rest.trim()
                .parse()
                .with_context(|| format!("invalid caret position {rest:?}"))?,
        ),
        "print" => Intent::Print,
        other => bail!("unknown edit intent {other:?}"),
    })
}

fn unescape(text: &str) -> String {
    text.replace("\\n", "\n")
}

/// Translates an intent into a command at the current selection.
fn to_command(doc: &Document, intent: Intent) -> Option<Cmd> {
    let selection = doc.selection();
    let at = selection.end;
    match intent {
        Intent::Type(text) => Some(Cmd::InsertText { at, text }),
        Intent::Paste(text) => Some(Cmd::PasteText { at, text }),
        Intent::Enter => Some(Cmd::Enter),
        Intent::Backspace if !selection.is_empty() => Some(Cmd::DeleteRange { range: selection }),
        Intent::Backspace => match doc.resolve(at).ok()? {
            ResolvedPos::Inline { offset, .. } if offset > 0 => {
                Some(Cmd::DeleteRange { range: at - 1..at })
            }
            // join with the previous block
            ResolvedPos::Inline { index, .. } if index > 0 => {
                Some(Cmd::DeleteRange { range: at - 2..at })
            }
            _ => None,
        },
        Intent::Caret(_) | Intent::Print => None,
    }
}
