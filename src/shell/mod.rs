use std::sync::Arc;

use colored::Colorize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

use crate::api::CatalogApi;
use crate::browser::CategoryBrowser;
use crate::detail::DetailView;
use crate::fetch::{Applied, FetchOutcome, FetchTicket};
use crate::logger::Logger;
use crate::output::{self, OutputFormat};
use crate::page::{Page, PageView};
use crate::router::Route;

pub const HELP: &str = "\
Commands:
  go <path>        open a router path (/, /people, /people/1)
  open <n>         follow the n-th link on the current page
  next | prev      move between listing pages
  page <n>         jump to listing page n
  search [term]    search the category (empty term clears the search)
  clear            clear the search and return to page 1
  retry            repeat the failed request
  back             go up one level
  home             return to the category menu
  help             show this text
  quit             leave the shell
";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Go(String),
    Open(usize),
    Next,
    Prev,
    Page(u32),
    Search(String),
    Clear,
    Retry,
    Back,
    Home,
    Help,
    Quit,
}

impl Command {
    /// Parses one input line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Command>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        if line.starts_with('/') {
            return Ok(Some(Command::Go(line.to_string())));
        }
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let cmd = match word.to_lowercase().as_str() {
            "go" | "cd" => {
                if rest.is_empty() {
                    return Err("usage: go <path>".to_string());
                }
                Command::Go(rest.to_string())
            }
            "open" | "o" => Command::Open(parse_number(rest, "open <n>")?),
            "next" | "n" => Command::Next,
            "prev" | "previous" | "p" => Command::Prev,
            "page" => Command::Page(parse_number(rest, "page <n>")?),
            "search" | "s" => Command::Search(rest.to_string()),
            "clear" => Command::Clear,
            "retry" | "r" => Command::Retry,
            "back" | "b" => Command::Back,
            "home" => Command::Home,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(format!("unknown command '{other}', try 'help'")),
        };
        Ok(Some(cmd))
    }
}

fn parse_number<T: std::str::FromStr + PartialEq + From<u8>>(
    raw: &str,
    usage: &str,
) -> Result<T, String> {
    match raw.parse::<T>() {
        Ok(n) if n != T::from(0) => Ok(n),
        _ => Err(format!("usage: {usage} (positive integer)")),
    }
}

#[derive(Debug)]
pub struct Completion {
    pub epoch: u64,
    pub ticket: FetchTicket,
    pub outcome: FetchOutcome,
}

/// Interactive browsing session.
///
/// Fetches run as spawned tasks and report back over a channel. `epoch`
/// changes whenever the page component is replaced, so completions that
/// belong to a page the user already left are dropped; within one page the
/// generation on the ticket does the same job.
pub struct Shell<A> {
    api: Arc<A>,
    logger: Logger,
    format: OutputFormat,
    page: Page,
    epoch: u64,
    pending: usize,
    tx: mpsc::UnboundedSender<Completion>,
}

impl<A: CatalogApi + 'static> Shell<A> {
    pub fn new(
        api: Arc<A>,
        logger: Logger,
        format: OutputFormat,
    ) -> (Self, mpsc::UnboundedReceiver<Completion>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let shell = Self {
            api,
            logger,
            format,
            page: Page::Home,
            epoch: 0,
            pending: 0,
            tx,
        };
        (shell, rx)
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Moves to `route`. A category-to-category move keeps the browser and
    /// lets its generation retire the old fetch; anything else swaps the page.
    pub fn go(&mut self, route: &Route) -> Option<FetchTicket> {
        if let (Page::Category(browser), Route::Category { slug }) = (&mut self.page, route) {
            return browser.navigate(slug);
        }
        let (page, ticket) = Page::open(route);
        self.page = page;
        self.epoch += 1;
        ticket
    }

    /// Applies `cmd` to the session state. Returns the fetch to start, or a
    /// message for the user when the command does not apply here.
    pub fn handle(&mut self, cmd: Command) -> Result<Option<FetchTicket>, String> {
        match cmd {
            Command::Go(path) => Ok(self.go(&Route::resolve(&path))),
            Command::Open(n) => {
                let links = self.page.view().links();
                let path = n
                    .checked_sub(1)
                    .and_then(|i| links.get(i))
                    .ok_or_else(|| format!("no link #{n} on this page ({} available)", links.len()))?
                    .clone();
                Ok(self.go(&Route::resolve(&path)))
            }
            Command::Back => {
                let parent = self.page.route().parent();
                Ok(self.go(&parent))
            }
            Command::Home => Ok(self.go(&Route::Home)),
            Command::Next => self.with_browser(|b| b.next_page()),
            Command::Prev => self.with_browser(|b| b.previous_page()),
            Command::Page(n) => self.with_browser(|b| b.go_to_page(n)),
            Command::Search(term) => self.with_browser(|b| {
                b.set_search_input(&term);
                b.submit_search()
            }),
            Command::Clear => self.with_browser(|b| b.clear_search()),
            Command::Retry => {
                if let PageView::Item(DetailView::Errored { .. }) = self.page.view() {
                    let route = self.page.route();
                    return Ok(self.go(&route));
                }
                Ok(self.page.browser_mut().and_then(|b| b.retry()))
            }
            Command::Help | Command::Quit => Ok(None),
        }
    }

    fn with_browser(
        &mut self,
        f: impl FnOnce(&mut CategoryBrowser) -> Option<FetchTicket>,
    ) -> Result<Option<FetchTicket>, String> {
        match self.page.browser_mut() {
            Some(browser) => Ok(f(browser)),
            None => Err("not on a category page".to_string()),
        }
    }

    pub fn spawn(&mut self, ticket: FetchTicket) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        let epoch = self.epoch;
        self.pending += 1;
        self.logger.debug(format!("fetching {}", ticket.request));
        tokio::spawn(async move {
            let outcome = api.execute(&ticket.request).await;
            let _ = tx.send(Completion {
                epoch,
                ticket,
                outcome,
            });
        });
    }

    /// Folds a finished fetch into the page. Returns whether the view changed.
    pub fn absorb(&mut self, done: Completion) -> bool {
        self.pending = self.pending.saturating_sub(1);
        if done.epoch != self.epoch {
            self.logger.debug(format!(
                "discarded response for {} from a page that is no longer open",
                done.ticket.request
            ));
            return false;
        }
        if let Err(e) = &done.outcome {
            self.logger.warn(format!("{} failed: {e}", done.ticket.request));
        }
        match self.page.apply(&done.ticket, done.outcome) {
            Applied::Applied => true,
            Applied::Stale => {
                self.logger
                    .debug(format!("discarded stale response for {}", done.ticket.request));
                false
            }
        }
    }

    async fn render<W: AsyncWrite + Unpin>(&self, out: &mut W) -> Result<(), String> {
        let mut bytes = format!("\n{} {}\n", "::".dimmed(), self.page.route().path().bold())
            .into_bytes();
        bytes.extend(output::render(&self.page.view(), self.format));
        write_all(out, &bytes).await
    }

    /// Runs the session until `quit`, or until input ends and every
    /// outstanding fetch has reported back.
    pub async fn run<R, W>(
        mut self,
        start: Route,
        input: R,
        mut out: W,
        mut rx: mpsc::UnboundedReceiver<Completion>,
    ) -> Result<(), String>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        let mut input_open = true;

        if let Some(ticket) = self.go(&start) {
            self.spawn(ticket);
        }
        self.render(&mut out).await?;

        loop {
            if !input_open && self.pending == 0 {
                break;
            }
            tokio::select! {
                line = lines.next_line(), if input_open => {
                    let line = match line {
                        Ok(Some(line)) => line,
                        Ok(None) => {
                            input_open = false;
                            continue;
                        }
                        Err(e) => return Err(format!("failed to read input: {e}")),
                    };
                    match Command::parse(&line) {
                        Ok(None) => {}
                        Ok(Some(Command::Quit)) => break,
                        Ok(Some(Command::Help)) => write_all(&mut out, HELP.as_bytes()).await?,
                        Ok(Some(cmd)) => match self.handle(cmd) {
                            Ok(ticket) => {
                                if let Some(ticket) = ticket {
                                    self.spawn(ticket);
                                }
                                self.render(&mut out).await?;
                            }
                            Err(msg) => self.logger.warn(msg),
                        },
                        Err(msg) => self.logger.warn(msg),
                    }
                }
                Some(done) = rx.recv() => {
                    if self.absorb(done) {
                        self.render(&mut out).await?;
                    }
                }
            }
        }
        out.flush()
            .await
            .map_err(|e| format!("failed to flush output: {e}"))
    }
}

async fn write_all<W: AsyncWrite + Unpin>(out: &mut W, bytes: &[u8]) -> Result<(), String> {
    out.write_all(bytes)
        .await
        .map_err(|e| format!("failed to write output: {e}"))
}
