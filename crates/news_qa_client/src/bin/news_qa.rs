//! news-qa: terminal chat with the news answer service.
//! Reads config, then submits the positional question or every stdin line, and
//! prints each answer with its sources as it arrives.

use std::cell::RefCell;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::process;
use std::rc::Rc;

use clap::Parser;
use news_qa_client::config::{self, Config};
use news_qa_client::{
    exchange, Bubble, ChatSession, Client, HtmlSurface, Surface, TerminalSurface,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::{JoinHandle, LocalSet};

#[derive(Debug, Parser)]
#[command(name = "news-qa", version, about = "Ask the news answer service")]
struct Cli {
    /// Config file (default: ~/.news-qa/config.yaml)
    #[arg(long, env = "NEWS_QA_CONFIG")]
    config: Option<PathBuf>,

    /// Answer service endpoint, overrides api.endpoint
    #[arg(long)]
    endpoint: Option<String>,

    /// Write the conversation as an HTML page when input ends
    #[arg(long)]
    transcript: Option<PathBuf>,

    /// Question to ask; when absent every stdin line is a question and `:N`
    /// fires suggestion N
    question: Vec<String>,
}

/// Terminal output, mirrored into an HTML page when a transcript file is wanted.
struct CliSurface {
    term: TerminalSurface<Stdout>,
    page: Option<HtmlSurface>,
}

impl Surface for CliSurface {
    fn append(&mut self, bubble: Bubble<'_>) {
        self.term.append(bubble);
        if let Some(page) = &mut self.page {
            page.append(bubble);
        }
    }

    fn remove(&mut self, marker: &str) {
        self.term.remove(marker);
        if let Some(page) = &mut self.page {
            page.remove(marker);
        }
    }

    fn scroll_to_bottom(&mut self) {
        self.term.scroll_to_bottom();
        if let Some(page) = &mut self.page {
            page.scroll_to_bottom();
        }
    }

    fn read_input(&self) -> String {
        self.term.read_input()
    }

    fn write_input(&mut self, text: &str) {
        self.term.write_input(text);
        if let Some(page) = &mut self.page {
            page.write_input(text);
        }
    }
}

type Session = Rc<RefCell<ChatSession<CliSurface>>>;

fn load_config(cli: &Cli) -> Result<Config, String> {
    // 1. --config flag or NEWS_QA_CONFIG; must exist
    if let Some(path) = &cli.config {
        return config::load(path)
            .map_err(|e| format!("failed to load config from {}: {}", path.display(), e));
    }
    // 2. Default path (~/.news-qa/config.yaml); optional
    match config::default_config_path() {
        Some(path) => config::load_or_default(&path)
            .map_err(|e| format!("failed to load config from {}: {}", path.display(), e)),
        None => Ok(Config::default()),
    }
}

/// `:3` selects the third suggestion.
fn suggestion_index(line: &str) -> Option<usize> {
    line.trim()
        .strip_prefix(':')?
        .parse::<usize>()
        .ok()?
        .checked_sub(1)
}

fn submit_line(session: &Session, client: &Client, line: &str) -> Option<JoinHandle<()>> {
    let query = {
        let mut s = session.borrow_mut();
        match suggestion_index(line) {
            Some(i) => s.suggestion(i),
            None => {
                s.surface_mut().write_input(line);
                s.submit()
            }
        }
    }?;

    let session = Rc::clone(session);
    let client = client.clone();
    Some(tokio::task::spawn_local(async move {
        exchange(&session, &client, query).await;
    }))
}

async fn run(cli: Cli, cfg: Config) -> Result<usize, String> {
    let endpoint = cli
        .endpoint
        .clone()
        .unwrap_or_else(|| cfg.endpoint().to_string());
    let client = Client::new(endpoint).with_top_k(cfg.api.top_k);

    let options = cfg.render_options();
    let surface = CliSurface {
        term: TerminalSurface::new(io::stdout(), options.clone()),
        page: cli.transcript.as_ref().map(|_| HtmlSurface::new(options)),
    };
    let session: Session = Rc::new(RefCell::new(ChatSession::new(
        surface,
        cfg.session_settings(),
    )));

    let mut tasks = Vec::new();
    if !cli.question.is_empty() {
        tasks.extend(submit_line(&session, &client, &cli.question.join(" ")));
    } else {
        for (i, phrase) in session.borrow().suggestions().iter().enumerate() {
            eprintln!(":{}  {}", i + 1, phrase);
        }
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => tasks.extend(submit_line(&session, &client, &line)),
                Ok(None) => break,
                Err(e) => {
                    log::error!("failed to read stdin: {}", e);
                    break;
                }
            }
        }
    }

    for task in tasks {
        if let Err(e) = task.await {
            log::error!("exchange task failed: {}", e);
        }
    }

    let done = session.borrow();
    if let (Some(path), Some(page)) = (&cli.transcript, &done.surface().page) {
        std::fs::write(path, page.to_document("News Q&A"))
            .map_err(|e| format!("failed to write transcript {}: {}", path.display(), e))?;
    }
    Ok(done.failed_exchanges())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("error")).init();
    let cli = Cli::parse();

    let cfg = load_config(&cli).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap_or_else(|e| {
            eprintln!("Error: failed to create runtime: {}", e);
            process::exit(1);
        });

    let local = LocalSet::new();
    match rt.block_on(local.run_until(run(cli, cfg))) {
        Ok(0) => {}
        Ok(failed) => {
            eprintln!("Error: {} question(s) could not be answered", failed);
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
