use crate::cli::session::Session;
use crate::cli::view;
use regex::Regex;
use winpath::core::{format_error_with_help, WinPathError, WinPathResult};
use winpath::model::Scope;
use winpath::ui;

/// One line typed at the main menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuCommand {
    Backup,
    Load,
    View,
    Filter(String),
    Purge,
    Dedup,
    Shorten,
    /// Combined-view indices, in the order typed
    Delete(Vec<usize>),
    /// `d` without indices
    DeleteUsage,
    Add,
    ShowStore,
    ShowEnv,
    Check,
    Save,
    Help,
    Quit,
    Unknown(String),
}

pub struct MenuParser {
    delete: Regex,
    filter: Regex,
}

impl MenuParser {
    pub fn new() -> WinPathResult<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern)
                .map_err(|e| WinPathError::Input(format!("Invalid menu pattern: {}", e)))
        };
        Ok(Self {
            delete: compile(r"^d\s+(\d+(?:\s+\d+)*)$")?,
            filter: compile(r"^f\s+(.+)$")?,
        })
    }

    pub fn parse(&self, line: &str) -> MenuCommand {
        let line = line.trim().to_lowercase();

        if let Some(caps) = self.delete.captures(&line) {
            let indices = caps[1]
                .split_whitespace()
                .filter_map(|n| n.parse().ok())
                .collect();
            return MenuCommand::Delete(indices);
        }
        if let Some(caps) = self.filter.captures(&line) {
            return MenuCommand::Filter(caps[1].trim().to_string());
        }

        match line.as_str() {
            "b" => MenuCommand::Backup,
            "l" => MenuCommand::Load,
            "" | "v" => MenuCommand::View,
            "p" => MenuCommand::Purge,
            "dedup" => MenuCommand::Dedup,
            "shorten" => MenuCommand::Shorten,
            "d" => MenuCommand::DeleteUsage,
            "a" => MenuCommand::Add,
            "r" => MenuCommand::ShowStore,
            "env" => MenuCommand::ShowEnv,
            "c" => MenuCommand::Check,
            "s" => MenuCommand::Save,
            "h" | "?" => MenuCommand::Help,
            "q" => MenuCommand::Quit,
            _ => MenuCommand::Unknown(line),
        }
    }
}

/// Menu lines, with `p` and `dedup` only when there is something to do.
pub fn menu_items(missing: usize, duplicates: usize) -> Vec<(String, String)> {
    let mut items = vec![
        ("b".to_string(), "backup".to_string()),
        ("l".to_string(), "load a backup".to_string()),
        ("v".to_string(), "view".to_string()),
        ("f <text>".to_string(), "filter the view".to_string()),
    ];
    if missing > 0 {
        items.push(("p".to_string(), format!("purge {} non-existent entries", missing)));
    }
    if duplicates > 0 {
        items.push((
            "dedup".to_string(),
            format!("remove {} entries present in both USER and SYSTEM", duplicates),
        ));
    }
    items.extend([
        ("shorten".to_string(), "replace long directories by junctions".to_string()),
        ("d <n...>".to_string(), "delete entries by number".to_string()),
        ("a".to_string(), "add entries".to_string()),
        ("r".to_string(), "show stored values".to_string()),
        ("env".to_string(), "show %PATH% of this process".to_string()),
        ("c".to_string(), "check lengths".to_string()),
        ("s".to_string(), "save".to_string()),
        ("h".to_string(), "help".to_string()),
        ("q".to_string(), "quit".to_string()),
    ]);
    items
}

/// The interactive loop. Returns when the operator quits.
pub fn run(session: &mut Session) -> WinPathResult<()> {
    let parser = MenuParser::new()?;

    ui::print_header("winpath");
    if !session.store.is_writable(Scope::System) {
        println!(
            "{}",
            ui::warn("The SYSTEM PATH is read-only here. Run as administrator to change it.")
        );
    }
    session.view();

    loop {
        println!();
        session.check_lengths(false);
        print_menu(session);

        let line = session.prompter.input("What do you want to do?", Some("v"))?;
        let command = parser.parse(&line);
        if command == MenuCommand::Quit {
            if session.confirm_quit()? {
                break;
            }
            continue;
        }

        if let Err(e) = execute(session, command) {
            // no more input: leave
            if matches!(e, WinPathError::Input(_)) {
                return Err(e);
            }
            println!("{}", format_error_with_help(&e));
        }
    }
    Ok(())
}

fn print_menu(session: &Session) {
    let items = menu_items(
        session.model.non_existent().len(),
        session.model.duplicates().len(),
    );
    for (key, text) in items {
        println!("{:>10}  {}", key, text);
    }
}

fn execute(session: &mut Session, command: MenuCommand) -> WinPathResult<()> {
    match command {
        MenuCommand::Backup => {
            let comment = session
                .prompter
                .input("Comment for the file name (optional)", Some(""))?;
            session.backup(&comment)?;
        }
        MenuCommand::Load => session.load_interactive()?,
        MenuCommand::View => session.view(),
        MenuCommand::Filter(needle) => view::print_filtered(&session.model, &needle),
        MenuCommand::Purge => {
            session.purge(true)?;
        }
        MenuCommand::Dedup => {
            session.dedup_interactive()?;
        }
        MenuCommand::Shorten => {
            session.shorten();
        }
        MenuCommand::Delete(indices) => {
            session.delete_indices(&indices)?;
        }
        MenuCommand::DeleteUsage => {
            println!("Usage: d <number> [<number>...], with numbers as shown by `v`.")
        }
        MenuCommand::Add => session.add_interactive()?,
        MenuCommand::ShowStore => session.show_store(),
        MenuCommand::ShowEnv => session.show_env(),
        MenuCommand::Check => {
            session.check_lengths(true);
        }
        MenuCommand::Save => {
            session.save();
        }
        MenuCommand::Help => println!("{}", HELP),
        MenuCommand::Quit => {}
        MenuCommand::Unknown(line) => {
            println!("Unknown command '{}'. Type h for help.", line)
        }
    }
    Ok(())
}

pub const HELP: &str = "\
Entries are shown as one numbered list: SYSTEM first, then USER, the order
Windows searches them in.

  S 3   position in the SYSTEM PATH (--- when absent)
  U 0   position in the USER PATH (--- when absent)
  *     the directory does not exist

Nothing is written until you save with `s`. Take a backup with `b` first;
`l` loads one back.

Deleting never removes %SystemRoot% or its system32 from the SYSTEM PATH.
Saving the SYSTEM PATH needs administrator rights; the USER PATH is saved
even when that fails.

Windows stops expanding %PATH% after the configured limit (2047 characters
by default). Entries past it are marked in the view. `shorten` points
entries under Program Files at shorter junctions to save space.";
