//! Interactive chat mode for pdfchat
//!
//! Run `pdfchat [FILE]` to enter interactive mode: slash commands for
//! the viewer side (open, navigate, extract), plain text for questions.
//! One request is in flight at a time; the prompt only comes back once
//! the previous command has finished.

use crate::config::Config;
use crate::controller::{AskError, ChatController, NavError};
use crate::credential::CredentialStore;
use crate::llm::OpenAiClient;
use crate::transcript::{Speaker, Transcript};
use anyhow::Result;
use colored::*;
use indicatif::ProgressBar;
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Command definition with name and description
struct Command {
    name: &'static str,
    usage: &'static str,
    description: &'static str,
}

const COMMANDS: &[Command] = &[
    Command { name: "/open", usage: "/open <file>", description: "Load a PDF" },
    Command { name: "/goto", usage: "/goto <page>", description: "Jump to a page" },
    Command { name: "/next", usage: "/next", description: "Next page" },
    Command { name: "/prev", usage: "/prev", description: "Previous page" },
    Command { name: "/page", usage: "/page", description: "Show the current page" },
    Command { name: "/text", usage: "/text [page]", description: "Print extracted text" },
    Command { name: "/summarize", usage: "/summarize", description: "Summarize the document" },
    Command { name: "/key", usage: "/key [sk-...]", description: "Set the API key" },
    Command { name: "/history", usage: "/history", description: "Show the conversation" },
    Command { name: "/info", usage: "/info", description: "Show session info" },
    Command { name: "/help", usage: "/help", description: "Show this help" },
    Command { name: "/exit", usage: "/exit", description: "Exit" },
];

/// Print the welcome banner
fn print_banner(document: Option<&str>) {
    let doc_text = match document {
        Some(name) => name.green().to_string(),
        None => "no document - /open one".yellow().to_string(),
    };

    println!();
    println!(
        "  {} v{}   {}",
        "pdfchat".green().bold(),
        VERSION,
        "Ask questions about a PDF".dimmed()
    );
    println!("  {}", doc_text);
    println!();
    println!(
        "  {} {}",
        "Try:".dimmed(),
        "what is this document about?".white()
    );
    println!("  {} {}", "    ".dimmed(), "/help for commands".dimmed());
    println!();
}

fn print_help() {
    println!();
    for cmd in COMMANDS {
        println!("  {:<16} {}", cmd.usage.white(), cmd.description.dimmed());
    }
    println!("  {}", "Anything else is a question about the document.".dimmed());
    println!();
}

/// The interactive session: controller plus terminal bookkeeping.
pub struct Repl {
    controller: ChatController,
    store: CredentialStore,
    config: Config,
    /// Transcript entries already printed to the terminal.
    printed: usize,
}

impl Repl {
    pub fn new(controller: ChatController, store: CredentialStore, config: Config) -> Self {
        Self {
            controller,
            store,
            config,
            printed: 0,
        }
    }

    /// Run the interactive loop until `/exit` or end of input.
    pub async fn run(mut self) -> Result<()> {
        print_banner(self.controller.session().map(|s| s.name().to_string()).as_deref());
        if !self.controller.has_provider() {
            println!(
                "  {}",
                "No API key configured yet - set one with /key sk-...".yellow()
            );
        }
        self.flush_new();

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            print!("{} ", ">".green().bold());
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                break; // end of input
            };
            let line = line.trim().to_string();
            if line.is_empty() {
                continue;
            }

            if line == "/exit" || line == "/quit" {
                break;
            }
            self.dispatch(&line, &mut lines).await?;
            self.flush_new();
        }

        Ok(())
    }

    async fn dispatch(&mut self, line: &str, lines: &mut Lines<BufReader<Stdin>>) -> Result<()> {
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((c, r)) => (c, r.trim()),
            None => (line, ""),
        };

        if !command.starts_with('/') {
            self.ask(line, lines).await?;
            return Ok(());
        }

        match command {
            "/open" => self.open(rest),
            "/goto" => match rest.parse::<usize>() {
                Ok(page) => self.navigate_absolute(page),
                Err(_) => println!("  {}", "Usage: /goto <page>".yellow()),
            },
            "/next" => self.navigate_relative(1),
            "/prev" => self.navigate_relative(-1),
            "/page" => self.show_page_header(),
            "/text" => self.show_text(rest),
            "/summarize" => self.summarize(lines).await?,
            "/key" => self.set_key(rest, lines).await?,
            "/history" => self.show_history(),
            "/info" => self.show_info(),
            "/help" => print_help(),
            other => match suggest_command(other) {
                Some(name) => println!(
                    "  {}",
                    format!("Unknown command {other}. Did you mean {name}?").yellow()
                ),
                None => println!(
                    "  {}",
                    format!("Unknown command {other}. /help lists commands.").yellow()
                ),
            },
        }
        Ok(())
    }

    /// Print transcript entries appended since the last flush. User
    /// entries are skipped - the user just typed them.
    fn flush_new(&mut self) {
        for entry in self.controller.transcript().from_index(self.printed) {
            match entry.speaker {
                Speaker::User => {}
                Speaker::Assistant => println!("\n{}\n", entry.text),
                Speaker::Notice => println!("  {}", entry.text.yellow()),
            }
        }
        self.printed = self.controller.transcript().len();
    }

    async fn ask(
        &mut self,
        question: &str,
        lines: &mut Lines<BufReader<Stdin>>,
    ) -> Result<()> {
        if !self.require_key(lines).await? {
            return Ok(());
        }

        let spinner = start_spinner("Thinking...");
        let result = self.controller.on_ask(question).await;
        spinner.finish_and_clear();

        // Failures were already recorded as notices; flush_new prints them.
        if let Err(AskError::Prompt(err)) = result {
            println!("  {}", err.to_string().yellow());
        }
        Ok(())
    }

    async fn summarize(&mut self, lines: &mut Lines<BufReader<Stdin>>) -> Result<()> {
        if !self.require_key(lines).await? {
            return Ok(());
        }

        let spinner = start_spinner("Generating summary...");
        let result = self.controller.on_summarize().await;
        spinner.finish_and_clear();

        if let Err(AskError::Prompt(err)) = result {
            println!("  {}", err.to_string().yellow());
        }
        Ok(())
    }

    /// Make sure a provider exists, prompting for the key if not.
    /// Returns whether a question can proceed.
    async fn require_key(&mut self, lines: &mut Lines<BufReader<Stdin>>) -> Result<bool> {
        if !self.controller.has_provider() {
            println!("  {}", "An API key is needed first.".yellow());
            self.set_key("", lines).await?;
        }
        Ok(self.controller.has_provider())
    }

    fn open(&mut self, path: &str) {
        if path.is_empty() {
            println!("  {}", "Usage: /open <file>".yellow());
            return;
        }

        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                println!("  {}", format!("Could not read {path}: {e}").yellow());
                return;
            }
        };
        let name = file_name(path);

        let bar = ProgressBar::new(1);
        let result = self.controller.on_load_document_with_progress(
            &bytes,
            &name,
            |page, total| {
                bar.set_length(total as u64);
                bar.set_position(page as u64);
            },
        );
        bar.finish_and_clear();

        // The load result is in the transcript either way; a success also
        // gets a page header.
        if result.is_ok() {
            self.flush_new();
            self.show_page_header();
        }
    }

    fn navigate_relative(&mut self, delta: isize) {
        match self.controller.on_navigate(delta) {
            Ok(_) => self.show_page_header(),
            Err(err) => println!("  {}", err.to_string().yellow()),
        }
    }

    fn navigate_absolute(&mut self, page: usize) {
        match self.controller.on_go_to(page) {
            Ok(_) => self.show_page_header(),
            Err(err) => println!("  {}", err.to_string().yellow()),
        }
    }

    /// One line of page state, geometry included - the raster handle is
    /// what a graphical front end would draw from.
    fn show_page_header(&self) {
        let Some(session) = self.controller.session() else {
            println!("  {}", NavError::NoDocumentLoaded.to_string().yellow());
            return;
        };
        let raster = session.render(self.config.render_scale);
        println!(
            "  {}",
            format!(
                "Page {}/{} · {:.0}x{:.0} pt @ {}x · {}",
                session.current_page(),
                session.page_count(),
                raster.width,
                raster.height,
                self.config.render_scale,
                session.name()
            )
            .dimmed()
        );
    }

    fn show_text(&self, rest: &str) {
        let Some(session) = self.controller.session() else {
            println!("  {}", NavError::NoDocumentLoaded.to_string().yellow());
            return;
        };

        let text = if rest.is_empty() {
            Ok(session.current_page_text())
        } else {
            match rest.parse::<usize>() {
                Ok(page) => session.page_text(page),
                Err(_) => {
                    println!("  {}", "Usage: /text [page]".yellow());
                    return;
                }
            }
        };

        match text {
            Ok(text) if text.is_empty() => {
                println!("  {}", "(no text on this page)".dimmed())
            }
            Ok(text) => println!("{text}"),
            Err(err) => println!("  {}", err.to_string().yellow()),
        }
    }

    async fn set_key(
        &mut self,
        rest: &str,
        lines: &mut Lines<BufReader<Stdin>>,
    ) -> Result<()> {
        let raw = if rest.is_empty() {
            print!("  Enter API key (sk-...): ");
            std::io::stdout().flush()?;
            match lines.next_line().await? {
                Some(line) => line,
                None => return Ok(()),
            }
        } else {
            rest.to_string()
        };

        match self.store.set(&raw) {
            Ok(credential) => {
                self.controller
                    .set_provider(Box::new(OpenAiClient::from_config(credential, &self.config)));
                println!("  {}", "API key saved.".green());
            }
            Err(err) => println!("  {}", err.to_string().yellow()),
        }
        Ok(())
    }

    fn show_history(&self) {
        let transcript: &Transcript = self.controller.transcript();
        if transcript.is_empty() {
            println!("  {}", "Nothing said yet.".dimmed());
            return;
        }
        for entry in transcript.all() {
            let label = format!("[{}] {:<9}", entry.at.format("%H:%M"), entry.speaker.label());
            match entry.speaker {
                Speaker::User => println!("  {} {}", label.green(), entry.text),
                Speaker::Assistant => println!("  {} {}", label.cyan(), entry.text),
                Speaker::Notice => println!("  {} {}", label.yellow(), entry.text.dimmed()),
            }
        }
    }

    fn show_info(&self) {
        println!(
            "  Model:       {} ({} token window)",
            self.config.model.name(),
            self.config.model.context_window()
        );
        println!("  Temperature: {}", self.config.temperature);
        println!("  Context:     {} chars", self.config.max_context_chars);
        println!(
            "  API key:     {}",
            if self.controller.has_provider() {
                "configured".green()
            } else {
                "not set".yellow()
            }
        );
        match self.controller.session() {
            Some(session) => println!(
                "  Document:    {} ({} pages, {} chars extracted)",
                session.name(),
                session.page_count(),
                session.full_text().len()
            ),
            None => println!("  Document:    none"),
        }
    }
}

/// The single command the input is an unambiguous prefix of, if any.
fn suggest_command(input: &str) -> Option<&'static str> {
    let mut matches = COMMANDS.iter().filter(|c| c.name.starts_with(input));
    match (matches.next(), matches.next()) {
        (Some(cmd), None) => Some(cmd.name),
        _ => None,
    }
}

fn start_spinner(message: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

fn file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}
