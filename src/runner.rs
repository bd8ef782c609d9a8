use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;

use crate::api::{CatalogApi, HttpCatalog};
use crate::catalog::DEFAULT_API_BASE;
use crate::fetch::{Applied, FetchTicket};
use crate::logger::Logger;
use crate::page::{Page, PageView};
use crate::router::Route;

pub const DEFAULT_USER_AGENT: &str = concat!("holocron/", env!("CARGO_PKG_VERSION"));

#[derive(Clone, Debug)]
pub struct Options {
    pub base_url: String,
    pub timeout_seconds: usize,
    pub proxy: Option<String>,
    pub user_agent: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            timeout_seconds: 10,
            proxy: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("invalid api base url: {url}: {message}")]
    InvalidBaseUrl { url: String, message: String },

    #[error("invalid timeout {value}, expected positive integer")]
    InvalidTimeout { value: usize },

    #[error("invalid user agent: {value}")]
    InvalidUserAgent { value: String },

    #[error("failed to build HTTP client: {source}")]
    HttpClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to setup proxy: {proxy}: {source}")]
    ProxySetup {
        proxy: String,
        #[source]
        source: reqwest::Error,
    },
}

// one-shot adjustments applied after the page first settles
#[derive(Clone, Debug, Default)]
pub struct VisitOptions {
    pub page: Option<u32>,
    pub search: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Visit {
    pub route: Route,
    pub view: PageView,
    pub fetches: usize,
    pub elapsed: Duration,
}

pub struct Runner<A = HttpCatalog> {
    options: Options,
    api: Arc<A>,
    logger: Logger,
}

impl Runner<HttpCatalog> {
    pub fn new(options: Options) -> Result<Self, RunnerError> {
        let base = parse_base_url(&options.base_url)?;
        let client = build_client(
            options.proxy.as_deref(),
            options.timeout_seconds,
            &options.user_agent,
        )?;
        Ok(Self {
            api: Arc::new(HttpCatalog::new(client, base)),
            options,
            logger: Logger::default(),
        })
    }
}

impl<A: CatalogApi> Runner<A> {
    pub fn with_api(options: Options, api: A) -> Self {
        Self {
            options,
            api: Arc::new(api),
            logger: Logger::default(),
        }
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn api(&self) -> Arc<A> {
        Arc::clone(&self.api)
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Runs `ticket` (if any) to completion and applies it to `page`.
    /// Returns whether a fetch was made.
    pub async fn settle(&self, page: &mut Page, ticket: Option<FetchTicket>) -> bool {
        let ticket = match ticket {
            Some(ticket) => ticket,
            None => return false,
        };
        self.logger.debug(format!("fetching {}", ticket.request));
        let outcome = self.api.execute(&ticket.request).await;
        if let Err(e) = &outcome {
            self.logger.warn(format!("{} failed: {e}", ticket.request));
        }
        if page.apply(&ticket, outcome) == Applied::Stale {
            self.logger
                .debug(format!("discarded stale response for {}", ticket.request));
        }
        true
    }

    /// Opens `route`, waits for its data and applies `opts` on top.
    pub async fn visit(&self, route: &Route, opts: &VisitOptions) -> Visit {
        let started_at = Instant::now();
        let mut fetches = 0;

        let (mut page, ticket) = Page::open(route);
        self.logger.info(format!("opening {}", route.path()));
        if self.settle(&mut page, ticket).await {
            fetches += 1;
        }

        if let Some(n) = opts.page {
            let ticket = page.browser_mut().and_then(|b| b.go_to_page(n));
            if self.settle(&mut page, ticket).await {
                fetches += 1;
            }
        }

        if let Some(term) = opts.search.as_deref() {
            let ticket = page.browser_mut().and_then(|b| {
                b.set_search_input(term);
                b.submit_search()
            });
            if self.settle(&mut page, ticket).await {
                fetches += 1;
            }
        }

        Visit {
            route: page.route(),
            view: page.view(),
            fetches,
            elapsed: started_at.elapsed(),
        }
    }
}

pub fn parse_base_url(raw: &str) -> Result<reqwest::Url, RunnerError> {
    let url = reqwest::Url::parse(raw.trim()).map_err(|e| RunnerError::InvalidBaseUrl {
        url: raw.to_string(),
        message: e.to_string(),
    })?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(RunnerError::InvalidBaseUrl {
            url: raw.to_string(),
            message: "expected an http(s) url".to_string(),
        });
    }
    Ok(url)
}

pub fn build_client(
    proxy: Option<&str>,
    timeout_seconds: usize,
    user_agent: &str,
) -> Result<reqwest::Client, RunnerError> {
    if timeout_seconds == 0 {
        return Err(RunnerError::InvalidTimeout {
            value: timeout_seconds,
        });
    }
    let mut headers = reqwest::header::HeaderMap::new();
    let agent = reqwest::header::HeaderValue::from_str(user_agent).map_err(|_| {
        RunnerError::InvalidUserAgent {
            value: user_agent.to_string(),
        }
    })?;
    headers.insert(reqwest::header::USER_AGENT, agent);
    headers.insert(
        reqwest::header::ACCEPT,
        reqwest::header::HeaderValue::from_static("application/json"),
    );

    let timeout = Duration::from_secs(timeout_seconds.try_into().unwrap_or(10));
    let mut builder = reqwest::Client::builder()
        .default_headers(headers)
        .redirect(reqwest::redirect::Policy::limited(10))
        .timeout(timeout);

    if let Some(proxy) = proxy.filter(|p| !p.trim().is_empty()) {
        let proxy = reqwest::Proxy::all(proxy).map_err(|e| RunnerError::ProxySetup {
            proxy: proxy.to_string(),
            source: e,
        })?;
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| RunnerError::HttpClientBuild { source: e })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::BrowserView;
    use crate::detail::DetailView;
    use crate::tests::FakeCatalog;

    #[test]
    fn rejects_bad_options() {
        let err = Runner::new(Options {
            base_url: "not a url".to_string(),
            ..Options::default()
        })
        .err()
        .unwrap();
        assert!(matches!(err, RunnerError::InvalidBaseUrl { .. }));

        let err = Runner::new(Options {
            timeout_seconds: 0,
            ..Options::default()
        })
        .err()
        .unwrap();
        assert!(matches!(err, RunnerError::InvalidTimeout { value: 0 }));

        let err = Runner::new(Options {
            base_url: "mailto:someone@example.com".to_string(),
            ..Options::default()
        })
        .err()
        .unwrap();
        assert!(matches!(err, RunnerError::InvalidBaseUrl { .. }));
    }

    #[tokio::test]
    async fn visit_listing_then_page_then_search() {
        let runner = Runner::with_api(Options::default(), FakeCatalog::people(87));

        let visit = runner
            .visit(
                &Route::resolve("/people"),
                &VisitOptions {
                    page: Some(3),
                    search: None,
                },
            )
            .await;
        assert_eq!(visit.fetches, 2);
        match visit.view {
            PageView::Category(BrowserView::Listing { pagination, .. }) => {
                let p = pagination.unwrap();
                assert_eq!((p.current_page, p.total_pages), (3, 9));
            }
            other => panic!("unexpected view {other:?}"),
        }

        let visit = runner
            .visit(
                &Route::resolve("/people"),
                &VisitOptions {
                    page: Some(3),
                    search: Some("luke".to_string()),
                },
            )
            .await;
        assert_eq!(visit.fetches, 3);
        match visit.view {
            PageView::Category(BrowserView::Searching { cards, .. }) => {
                assert_eq!(cards[0].title, "Luke Skywalker");
            }
            other => panic!("unexpected view {other:?}"),
        }
        assert_eq!(runner.api().calls().len(), 5);
    }

    #[tokio::test]
    async fn visit_unknown_category_makes_no_request() {
        let runner = Runner::with_api(Options::default(), FakeCatalog::people(10));
        let visit = runner
            .visit(&Route::resolve("/droids"), &VisitOptions::default())
            .await;
        assert_eq!(visit.fetches, 0);
        assert!(runner.api().calls().is_empty());
        assert!(matches!(
            visit.view,
            PageView::Category(BrowserView::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn visit_detail_failure_is_errored() {
        let runner = Runner::with_api(Options::default(), FakeCatalog::people(10));
        let visit = runner
            .visit(&Route::resolve("/people/404"), &VisitOptions::default())
            .await;
        match visit.view {
            PageView::Item(DetailView::Errored { back_link, .. }) => {
                assert_eq!(back_link, "/people");
            }
            other => panic!("unexpected view {other:?}"),
        }
    }
}
