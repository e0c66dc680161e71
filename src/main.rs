//! pdfchat CLI
//!
//! Commands:
//!   (default)  - open a PDF and chat about it interactively
//!   ask        - ask one question and print the answer
//!   summarize  - print a summary of the document
//!   extract    - dump extracted text
//!   key        - manage the API key
//!   info       - show configuration and paths

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use indicatif::ProgressBar;
use pdfchat::{
    ChatController, Config, CredentialStore, LopdfEngine, OpenAiClient, PromptBuilder, Repl,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pdfchat")]
#[command(about = "Ask questions about a PDF from the terminal")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// PDF to open in interactive mode
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask one question about a PDF
    Ask {
        /// Path to the PDF
        file: PathBuf,

        /// The question to ask
        question: String,
    },

    /// Summarize a PDF
    Summarize {
        /// Path to the PDF
        file: PathBuf,
    },

    /// Print the text extracted from a PDF
    Extract {
        /// Path to the PDF
        file: PathBuf,

        /// Only this page (1-indexed)
        #[arg(short, long)]
        page: Option<usize>,
    },

    /// Set, show, or clear the API key
    Key {
        /// The key to save (prompts when omitted)
        value: Option<String>,

        /// Remove the stored key
        #[arg(long)]
        clear: bool,

        /// Show whether a key is stored
        #[arg(long)]
        show: bool,
    },

    /// Show configuration and storage paths
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?.unwrap_or_default();
    let store = CredentialStore::open_default()?;

    match cli.command {
        None => run_interactive(cli.file, config, store).await,
        Some(Commands::Ask { file, question }) => {
            let mut controller = one_shot_controller(&config, &store)?;
            load_file(&mut controller, &file)?;
            let id = controller.on_ask(&question).await?;
            let answer = controller
                .transcript()
                .get(id)
                .context("answer missing from transcript")?;
            println!("{}", answer.text);
            Ok(())
        }
        Some(Commands::Summarize { file }) => {
            let mut controller = one_shot_controller(&config, &store)?;
            load_file(&mut controller, &file)?;
            let id = controller.on_summarize().await?;
            let answer = controller
                .transcript()
                .get(id)
                .context("summary missing from transcript")?;
            println!("{}", answer.text);
            Ok(())
        }
        Some(Commands::Extract { file, page }) => {
            let mut controller = ChatController::new(Box::new(LopdfEngine::new()));
            load_file(&mut controller, &file)?;
            let session = controller.session().context("no session after load")?;
            match page {
                Some(page) => println!("{}", session.page_text(page)?),
                None => println!("{}", session.full_text()),
            }
            Ok(())
        }
        Some(Commands::Key { value, clear, show }) => run_key(&store, value, clear, show),
        Some(Commands::Info) => run_info(&config, &store),
    }
}

/// Build the interactive session and hand it to the REPL.
async fn run_interactive(
    file: Option<PathBuf>,
    config: Config,
    store: CredentialStore,
) -> Result<()> {
    let mut controller = make_controller(&config);
    if let Some(credential) = store.get()? {
        controller.set_provider(Box::new(OpenAiClient::from_config(credential, &config)));
    }

    if let Some(file) = file {
        // A failed load is already a notice in the transcript; the REPL
        // prints it and the session simply starts without a document.
        let _ = load_file(&mut controller, &file);
    }

    Repl::new(controller, store, config).run().await
}

fn make_controller(config: &Config) -> ChatController {
    ChatController::new(Box::new(LopdfEngine::new()))
        .with_prompt_builder(PromptBuilder::with_max_chars(config.max_context_chars))
}

/// Controller for one-shot commands; requires a stored credential.
fn one_shot_controller(config: &Config, store: &CredentialStore) -> Result<ChatController> {
    let Some(credential) = store.get()? else {
        bail!("no API key configured - run 'pdfchat key sk-...' first");
    };

    let mut controller = make_controller(config);
    controller.set_provider(Box::new(OpenAiClient::from_config(credential, config)));
    Ok(controller)
}

/// Read a PDF from disk into the controller, with a page progress bar.
fn load_file(controller: &mut ChatController, path: &Path) -> Result<()> {
    let bytes =
        std::fs::read(path).with_context(|| format!("could not read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let bar = ProgressBar::new(1);
    let result = controller.on_load_document_with_progress(&bytes, &name, |page, total| {
        bar.set_length(total as u64);
        bar.set_position(page as u64);
    });
    bar.finish_and_clear();

    result.with_context(|| format!("could not load {}", path.display()))
}

fn run_key(store: &CredentialStore, value: Option<String>, clear: bool, show: bool) -> Result<()> {
    if clear {
        store.clear()?;
        println!("{} API key removed.", "✓".green());
        return Ok(());
    }

    if show {
        match store.get()? {
            Some(_) => println!("API key: {} ({})", "configured".green(), store.path().display()),
            None => println!("API key: {}", "not set".yellow()),
        }
        return Ok(());
    }

    let raw = match value {
        Some(value) => value,
        None => {
            print!("Enter API key (sk-...): ");
            use std::io::Write;
            std::io::stdout().flush()?;
            let mut line = String::new();
            std::io::stdin().read_line(&mut line)?;
            line
        }
    };

    store.set(&raw)?;
    println!("{} API key saved.", "✓".green());
    Ok(())
}

fn run_info(config: &Config, store: &CredentialStore) -> Result<()> {
    println!("pdfchat v{}\n", env!("CARGO_PKG_VERSION"));
    println!(
        "Model:        {} ({} token window)",
        config.model.name(),
        config.model.context_window()
    );
    println!("Temperature:  {}", config.temperature);
    println!("Context:      {} chars", config.max_context_chars);
    println!("Render scale: {}x", config.render_scale);
    println!(
        "API key:      {}",
        if store.get()?.is_some() {
            "configured".green()
        } else {
            "not set".yellow()
        }
    );
    println!("Config file:  {}", Config::path()?.display());
    println!("Key file:     {}", store.path().display());
    Ok(())
}
