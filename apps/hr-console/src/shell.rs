//! Line-driven list view: one command per line, the page is redrawn after each.

use std::{
    io::{BufRead, Write},
    time::Instant,
};

use anyhow::{Result, anyhow, bail};
use platform_store::KeyValueStore;
use platform_ui::{Locale, Notifier};
use products_hr::{ListController, ViewMode, pagination::PAGE_SIZE_OPTIONS};
use uuid::Uuid;

const HELP: &str = "\
commands:
  n | next            next page
  p | prev            previous page
  first | last        jump to the first or last page
  page <n>            go to page n
  size <n>            employees per page (5, 10, 20, 50)
  view table|card     switch the layout
  search <text>       filter by name, email, department or position
  clear               drop the search
  delete <row|id>     delete a row of this page, or a record by id
  lang en|tr          switch the language
  help                this text
  q | quit            leave";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    Row(usize),
    Id(Uuid),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShellCommand {
    Next,
    Previous,
    First,
    Last,
    Page(usize),
    Size(usize),
    View(ViewMode),
    Search(String),
    ClearSearch,
    Delete(Target),
    Language(Locale),
    Help,
    Quit,
}

pub fn parse(line: &str) -> Result<ShellCommand> {
    let line = line.trim();
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();
    let command = match word.to_lowercase().as_str() {
        "n" | "next" => ShellCommand::Next,
        "p" | "prev" | "previous" => ShellCommand::Previous,
        "first" => ShellCommand::First,
        "last" => ShellCommand::Last,
        "page" => ShellCommand::Page(number(rest, "page")?),
        "size" => ShellCommand::Size(number(rest, "size")?),
        "view" => ShellCommand::View(rest.parse()?),
        "search" | "/" => ShellCommand::Search(rest.to_string()),
        "clear" => ShellCommand::ClearSearch,
        "delete" | "rm" => ShellCommand::Delete(target(rest)?),
        "lang" => ShellCommand::Language(rest.parse()?),
        "help" | "?" => ShellCommand::Help,
        "q" | "quit" | "exit" => ShellCommand::Quit,
        other => bail!("unknown command `{other}`; type `help`"),
    };
    Ok(command)
}

fn number(raw: &str, what: &str) -> Result<usize> {
    raw.parse()
        .map_err(|_| anyhow!("`{what}` expects a number, got `{raw}`"))
}

fn target(raw: &str) -> Result<Target> {
    if let Ok(row) = raw.parse::<usize>() {
        return Ok(Target::Row(row));
    }
    Uuid::parse_str(raw)
        .map(Target::Id)
        .map_err(|_| anyhow!("`delete` expects a row number or an employee id"))
}

fn is_yes(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes" | "e" | "evet"
    )
}

/// Runs until `quit` or end of input.
pub fn run<B, N, R, W>(list: &mut ListController<B, N>, input: R, mut out: W) -> Result<()>
where
    B: KeyValueStore,
    N: Notifier,
    R: BufRead,
    W: Write,
{
    writeln!(out, "{}", list.render())?;
    write!(out, "> ")?;
    out.flush()?;

    let mut lines = input.lines();
    while let Some(line) = lines.next() {
        let line = line?;
        if line.trim().is_empty() {
            write!(out, "> ")?;
            out.flush()?;
            continue;
        }
        match parse(&line) {
            Ok(ShellCommand::Quit) => break,
            Ok(ShellCommand::Help) => writeln!(out, "{HELP}")?,
            Ok(ShellCommand::Delete(target)) => {
                let id = match target {
                    Target::Id(id) => Some(id),
                    Target::Row(row) => row
                        .checked_sub(1)
                        .and_then(|index| list.listing().displayed.get(index))
                        .map(|employee| employee.id),
                };
                match id {
                    Some(id) => {
                        write!(out, "{} [y/N] ", list.translator().t("employee.form.deleteConfirm"))?;
                        out.flush()?;
                        let answer = lines.next().transpose()?.unwrap_or_default();
                        if is_yes(&answer) {
                            list.confirm_delete(id, Instant::now());
                        }
                    }
                    None => writeln!(out, "no such row on this page")?,
                }
                writeln!(out, "{}", list.render())?;
            }
            Ok(command) => {
                if let Some(message) = apply(list, command) {
                    writeln!(out, "{message}")?;
                }
                writeln!(out, "{}", list.render())?;
            }
            Err(err) => writeln!(out, "{err}")?,
        }
        write!(out, "> ")?;
        out.flush()?;
    }
    Ok(())
}

/// Applies a navigation or display command; returns a hint when it was refused.
fn apply<B, N>(list: &mut ListController<B, N>, command: ShellCommand) -> Option<String>
where
    B: KeyValueStore,
    N: Notifier,
{
    match command {
        ShellCommand::Next => (!list.next()).then(|| "already on the last page".to_string()),
        ShellCommand::Previous => (!list.previous()).then(|| "already on the first page".to_string()),
        ShellCommand::First => {
            list.first();
            None
        }
        ShellCommand::Last => {
            list.last();
            None
        }
        ShellCommand::Page(page) => {
            let total = list.listing().total_pages;
            if page == 0 || page > total {
                return Some(format!("pages run from 1 to {total}"));
            }
            list.go_to(page);
            None
        }
        ShellCommand::Size(size) => {
            if list.set_page_size(size) {
                None
            } else {
                Some(format!("page size must be one of {PAGE_SIZE_OPTIONS:?}"))
            }
        }
        ShellCommand::View(view) => {
            list.set_view(view);
            None
        }
        ShellCommand::Search(term) => {
            list.set_search(term);
            None
        }
        ShellCommand::ClearSearch => {
            list.clear_search();
            None
        }
        ShellCommand::Language(locale) => {
            list.set_language(locale);
            None
        }
        ShellCommand::Delete(_) | ShellCommand::Help | ShellCommand::Quit => None,
    }
}
