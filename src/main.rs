use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use todoist::application::{Application, Outcome};
use todoist::config::Config;
use todoist::core::row::{Cell, Tone, HEADERS};
use todoist::core::task::Priority;
use todoist::message::Message;
use todoist::sync::keyring;
use todoist::sync::{HttpTransport, RowSink};

type Input = Lines<BufReader<Stdin>>;

/// Rows as last rendered, printed after every command.
#[derive(Default)]
struct TableView {
    rows: Vec<Vec<Cell>>,
}

impl RowSink for TableView {
    fn clear(&mut self) {
        self.rows.clear();
    }

    fn render_row(&mut self, row: usize, cells: Vec<Cell>) {
        if row < self.rows.len() {
            self.rows[row] = cells;
        } else {
            self.rows.push(cells);
        }
    }

    fn remove_row(&mut self, row: usize) {
        if row < self.rows.len() {
            self.rows.remove(row);
        }
    }
}

impl TableView {
    fn print(&self, selected: Option<usize>, status: &str) {
        let mut widths: Vec<usize> = HEADERS.iter().map(|h| h.chars().count()).collect();
        for cells in &self.rows {
            for (i, cell) in cells.iter().enumerate() {
                if let Some(w) = widths.get_mut(i) {
                    *w = (*w).max(cell_text(cell).chars().count());
                }
            }
        }

        let header: Vec<String> = HEADERS
            .iter()
            .zip(&widths)
            .map(|(h, w)| format!("\x1b[1m{:<w$}\x1b[0m", h, w = *w))
            .collect();
        println!("    {}", header.join("  "));

        for (row, cells) in self.rows.iter().enumerate() {
            let marker = if Some(row) == selected { '>' } else { ' ' };
            let line: Vec<String> = cells
                .iter()
                .zip(&widths)
                .map(|(cell, w)| {
                    let text = format!("{:<w$}", cell_text(cell), w = *w);
                    match colour(cell.tone) {
                        Some(code) => format!("\x1b[{}m{}\x1b[0m", code, text),
                        None => text,
                    }
                })
                .collect();
            println!("{}{:>3} {}", marker, row + 1, line.join("  "));
        }
        println!("\x1b[7m{}\x1b[0m", status);
    }
}

fn cell_text(cell: &Cell) -> String {
    match cell.max_width {
        Some(max) if cell.text.chars().count() > max => cell.text.chars().take(max).collect(),
        _ => cell.text.clone(),
    }
}

fn colour(tone: Tone) -> Option<&'static str> {
    match tone {
        Tone::Plain => None,
        Tone::Overdue => Some("31"),
        Tone::DueToday => Some("32"),
        Tone::Priority(Priority::Urgent) => Some("1;31"),
        Tone::Priority(Priority::High) => Some("1;33"),
        Tone::Priority(Priority::Medium) => Some("1;34"),
        Tone::Priority(Priority::Normal) => None,
    }
}

fn init_logging(debug: bool) {
    // Journal logging: todoist targets at info/debug, everything else at warn.
    struct FilteredJournal {
        inner: systemd_journal_logger::JournalLog,
    }

    impl log::Log for FilteredJournal {
        fn enabled(&self, metadata: &log::Metadata) -> bool {
            let max = if !metadata.target().starts_with("todoist") {
                log::LevelFilter::Warn
            } else if todoist::debug_logging() {
                log::LevelFilter::Debug
            } else {
                log::LevelFilter::Info
            };
            metadata.level() <= max
        }
        fn log(&self, record: &log::Record) {
            if self.enabled(record.metadata()) {
                self.inner.log(record);
            }
        }
        fn flush(&self) {
            self.inner.flush();
        }
    }

    todoist::set_debug_logging(debug);

    // Stdout belongs to the table, so no journal means no logging
    let journal = match systemd_journal_logger::JournalLog::new() {
        Ok(journal) => journal.with_syslog_identifier("todoist".to_string()),
        Err(_) => return,
    };
    if log::set_boxed_logger(Box::new(FilteredJournal { inner: journal })).is_ok() {
        log::set_max_level(log::LevelFilter::Debug);
    }
}

async fn prompt(input: &mut Input, text: &str) -> Option<String> {
    print!("{}", text);
    let _ = std::io::stdout().flush();
    input.next_line().await.ok().flatten()
}

/// Token from the environment, the keyring, the config file, or the user.
async fn resolve_token(config: &mut Config, input: &mut Input) -> Option<String> {
    if let Ok(token) = std::env::var("TODOIST_TOKEN") {
        if !token.is_empty() {
            return Some(token);
        }
    }
    match keyring::load_token().await {
        Ok(Some(token)) => return Some(token),
        Ok(None) => {}
        Err(e) => log::warn!("{}", e),
    }
    if !config.token.is_empty() {
        return Some(config.token.clone());
    }

    let token = prompt(input, "Todoist API token: ").await?.trim().to_string();
    if token.is_empty() {
        return None;
    }
    if let Err(e) = keyring::store_token(&token).await {
        log::warn!("{}", e);
    }
    config.token = token.clone();
    if let Err(e) = config.save() {
        log::error!("Failed to save config: {}", e);
    }
    Some(token)
}

/// `<key> [row] [text]`; an empty line is Enter. A row number is only
/// read for keys that act on a task, so text like `a 2 eggs` stays whole.
fn parse_command(line: &str) -> (char, Option<usize>, Option<String>) {
    let line = line.trim();
    let mut chars = line.chars();
    let Some(key) = chars.next() else {
        return ('\n', None, None);
    };
    let rest = chars.as_str().trim_start();

    let takes_row = Message::from_key(key).is_some_and(|m| m.needs_selection());
    let (row, text) = if takes_row {
        let (first, tail) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        match first.parse::<usize>() {
            Ok(n) => (Some(n), tail.trim()),
            Err(_) => (None, rest),
        }
    } else {
        (None, rest)
    };
    let text = (!text.is_empty()).then(|| text.to_string());
    (key, row, text)
}

/// Text for a prompt message typed on the command line.
fn submit_inline(message: &Message, text: String) -> Option<Message> {
    match message {
        Message::PromptQuickAdd => Some(Message::QuickAdd(text)),
        Message::PromptFilter => Some(Message::SetFilter(text)),
        Message::PromptContent => Some(Message::EditContent(text)),
        Message::PromptDue => Some(Message::EditDue(text)),
        Message::PromptProject => Some(Message::MoveProject(text)),
        _ => None,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let debug = args.iter().any(|a| a == "--debug") || std::env::var_os("TODOIST_DEBUG").is_some();
    init_logging(debug);

    let mut input = BufReader::new(tokio::io::stdin()).lines();

    if args.iter().any(|a| a == "--logout") {
        keyring::delete_token().await?;
        println!("Token removed from keyring");
        return Ok(());
    }

    let mut config = Config::load()?;
    let Some(token) = resolve_token(&mut config, &mut input).await else {
        eprintln!("No API token given");
        return Ok(());
    };

    let mut table = TableView::default();
    let mut app = Application::new(config, HttpTransport::new(&token)?);
    if let Err(e) = app.init(&mut table).await {
        app.status().error(&e);
    }

    let mut selected: Option<usize> = None;
    loop {
        selected = match (selected, table.rows.len()) {
            (_, 0) => None,
            (None, _) => Some(0),
            (Some(row), len) => Some(row.min(len - 1)),
        };
        table.print(selected, &app.status().text());

        let Some(line) = prompt(&mut input, "> ").await else {
            break;
        };

        if let Some(token) = line.trim().strip_prefix("token ") {
            let token = token.trim().to_string();
            match HttpTransport::new(&token) {
                Ok(transport) => {
                    if let Err(e) = keyring::store_token(&token).await {
                        log::warn!("{}", e);
                    }
                    app.set_transport(&token, transport);
                    app.update(Message::Refresh, selected, &mut table).await;
                }
                Err(e) => app.status().error(&e),
            }
            continue;
        }

        let (key, row, text) = parse_command(&line);
        match key {
            'j' => {
                selected = selected.map(|r| r + 1);
                continue;
            }
            'k' => {
                selected = selected.map(|r| r.saturating_sub(1));
                continue;
            }
            _ => {}
        }
        if let Some(row) = row {
            selected = Some(row.saturating_sub(1));
        }
        let Some(mut message) = Message::from_key(key) else {
            println!("{}", todoist::application::HELP);
            continue;
        };
        if message.needs_selection() && selected.is_none() {
            println!("No task selected");
            continue;
        }
        if let Some(text) = text {
            if let Some(inline) = submit_inline(&message, text) {
                message = inline;
            }
        }

        // Follow prompts and confirmations until the message is settled
        loop {
            match app.update(message, selected, &mut table).await {
                Outcome::None => break,
                Outcome::Quit => return Ok(()),
                Outcome::Popup { title, body } => {
                    println!("\x1b[1m{}\x1b[0m\n{}\n", title, body);
                    break;
                }
                Outcome::Input { title, initial, submit } => {
                    let Some(answer) = prompt(&mut input, &format!("{} [{}]: ", title, initial)).await else {
                        return Ok(());
                    };
                    let answer = answer.trim();
                    message = submit(if answer.is_empty() { initial } else { answer.to_string() });
                }
                Outcome::Confirm { message: question, buttons, confirm } => {
                    let text = format!("{} {}/{} [y/N]: ", question, buttons[0], buttons[1]);
                    let Some(answer) = prompt(&mut input, &text).await else {
                        return Ok(());
                    };
                    if !answer.trim().eq_ignore_ascii_case("y") {
                        break;
                    }
                    message = confirm;
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_text_commands_keep_leading_numbers() {
        assert_eq!(parse_command("a 2 eggs tomorrow"), ('a', None, Some("2 eggs tomorrow".to_string())));
        assert_eq!(parse_command("f 2024"), ('f', None, Some("2024".to_string())));

        let (key, _, text) = parse_command("a 2 eggs tomorrow");
        let message = Message::from_key(key).unwrap();
        assert_eq!(
            submit_inline(&message, text.unwrap()),
            Some(Message::QuickAdd("2 eggs tomorrow".to_string()))
        );
    }

    #[test]
    fn task_commands_take_a_row_first() {
        assert_eq!(parse_command("e 1 3 apples"), ('e', Some(1), Some("3 apples".to_string())));
        assert_eq!(parse_command("C 4"), ('C', Some(4), None));
        assert_eq!(parse_command("1 3"), ('1', Some(3), None));
        assert_eq!(parse_command("p #Work"), ('p', None, Some("#Work".to_string())));

        let message = Message::from_key('e').unwrap();
        assert_eq!(
            submit_inline(&message, "3 apples".to_string()),
            Some(Message::EditContent("3 apples".to_string()))
        );
    }

    #[test]
    fn empty_line_is_enter() {
        assert_eq!(parse_command("   "), ('\n', None, None));
        assert_eq!(submit_inline(&Message::Complete, "x".to_string()), None);
    }
}
