//! Category listing with search and pagination.
//!
//! [`CategoryBrowser`] never performs I/O. Every transition that needs data
//! hands back a [`FetchTicket`]; the caller runs it against a
//! [`CatalogApi`](crate::api::CatalogApi) and feeds the outcome to
//! [`CategoryBrowser::apply`]. Only the most recently issued ticket is
//! applied, so a slow response can never overwrite a newer one.

pub mod view;

use crate::catalog::{self, CategoryDescriptor};
use crate::fetch::{
    unexpected_response, Applied, FetchOutcome, FetchRequest, FetchResponse, FetchTicket,
    Generation,
};
use crate::record::Record;

pub use view::{BrowserView, Card, Pagination};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Loading,
    Ready,
    Errored(String),
}

#[derive(Clone, Debug)]
pub struct CategoryBrowser {
    slug: String,
    category: Option<&'static CategoryDescriptor>,
    current_page: u32,
    total_pages: u32,
    search_input: String,
    active_search: Option<String>,
    data: Vec<Record>,
    search_results: Vec<Record>,
    status: Status,
    generation: Generation,
}

impl CategoryBrowser {
    /// Mounts the browser on `slug`. Unknown categories produce no fetch.
    pub fn open(slug: &str) -> (Self, Option<FetchTicket>) {
        let mut browser = CategoryBrowser {
            slug: String::new(),
            category: None,
            current_page: 1,
            total_pages: 1,
            search_input: String::new(),
            active_search: None,
            data: Vec::new(),
            search_results: Vec::new(),
            status: Status::Loading,
            generation: Generation::default(),
        };
        let ticket = browser.navigate(slug);
        (browser, ticket)
    }

    pub fn navigate(&mut self, slug: &str) -> Option<FetchTicket> {
        self.slug = slug.to_string();
        self.category = catalog::lookup(slug);
        self.current_page = 1;
        self.total_pages = 1;
        self.search_input.clear();
        self.active_search = None;
        self.data.clear();
        self.search_results.clear();
        if self.category.is_none() {
            self.generation.invalidate();
            return None;
        }
        Some(self.issue_listing())
    }

    pub fn set_search_input(&mut self, text: &str) {
        self.search_input = text.to_string();
    }

    pub fn submit_search(&mut self) -> Option<FetchTicket> {
        self.category?;
        let term = self.search_input.trim().to_string();
        if term.is_empty() {
            self.search_input.clear();
            self.active_search = None;
            self.search_results.clear();
            return Some(self.issue_listing());
        }
        self.active_search = Some(term.clone());
        Some(self.issue_search(term))
    }

    pub fn clear_search(&mut self) -> Option<FetchTicket> {
        self.category?;
        self.search_input.clear();
        self.active_search = None;
        self.search_results.clear();
        self.current_page = 1;
        Some(self.issue_listing())
    }

    pub fn next_page(&mut self) -> Option<FetchTicket> {
        self.go_to_page(self.current_page.saturating_add(1))
    }

    pub fn previous_page(&mut self) -> Option<FetchTicket> {
        self.go_to_page(self.current_page.saturating_sub(1))
    }

    /// Jumps to `page`, clamped to `[1, total_pages]`. Does nothing while a
    /// search is active or when the clamped page is the current one.
    pub fn go_to_page(&mut self, page: u32) -> Option<FetchTicket> {
        self.category?;
        if self.is_searching() {
            return None;
        }
        let page = page.clamp(1, self.total_pages);
        if page == self.current_page {
            return None;
        }
        self.current_page = page;
        Some(self.issue_listing())
    }

    pub fn retry(&mut self) -> Option<FetchTicket> {
        self.category?;
        if !matches!(self.status, Status::Errored(_)) {
            return None;
        }
        match self.active_search.clone() {
            Some(term) => Some(self.issue_search(term)),
            None => Some(self.issue_listing()),
        }
    }

    pub fn apply(&mut self, ticket: &FetchTicket, outcome: FetchOutcome) -> Applied {
        if !self.generation.is_current(ticket) {
            return Applied::Stale;
        }
        self.status = match (&ticket.request, outcome) {
            (FetchRequest::List { .. }, Ok(FetchResponse::Page(page))) => {
                self.total_pages = catalog::total_pages(page.count);
                self.current_page = self.current_page.clamp(1, self.total_pages);
                self.data = page.results;
                Status::Ready
            }
            (FetchRequest::Search { .. }, Ok(FetchResponse::Search(found))) => {
                self.search_results = found.results;
                Status::Ready
            }
            (request, Ok(_)) => Status::Errored(unexpected_response(request).to_string()),
            (_, Err(e)) => Status::Errored(e.to_string()),
        };
        Applied::Applied
    }

    fn issue_listing(&mut self) -> FetchTicket {
        self.status = Status::Loading;
        let endpoint = self.endpoint();
        self.generation.issue(FetchRequest::List {
            endpoint,
            page: self.current_page,
        })
    }

    fn issue_search(&mut self, term: String) -> FetchTicket {
        self.status = Status::Loading;
        let endpoint = self.endpoint();
        self.generation.issue(FetchRequest::Search { endpoint, term })
    }

    fn endpoint(&self) -> String {
        self.category
            .map(|c| c.endpoint.to_string())
            .unwrap_or_default()
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn category(&self) -> Option<&'static CategoryDescriptor> {
        self.category
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    pub fn is_searching(&self) -> bool {
        self.active_search.is_some()
    }

    pub fn can_go_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn can_go_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn view(&self) -> BrowserView {
        let category = match self.category {
            Some(category) => category,
            None => {
                return BrowserView::NotFound {
                    slug: self.slug.clone(),
                    home_link: "/".to_string(),
                }
            }
        };
        let name = category.name.to_string();
        match &self.status {
            Status::Loading => return BrowserView::Loading { category: name },
            Status::Errored(message) => {
                return BrowserView::Errored {
                    category: name,
                    message: message.clone(),
                }
            }
            Status::Ready => {}
        }

        if let Some(term) = &self.active_search {
            let cards: Vec<Card> = self
                .search_results
                .iter()
                .map(|r| view::build_card(category, r))
                .collect();
            let no_results = cards
                .is_empty()
                .then(|| format!("No results found for \"{term}\""));
            return BrowserView::Searching {
                category: name,
                term: term.clone(),
                cards,
                no_results,
            };
        }

        let pagination = (self.total_pages > 1).then(|| Pagination {
            current_page: self.current_page,
            total_pages: self.total_pages,
            previous_enabled: self.can_go_previous(),
            next_enabled: self.can_go_next(),
        });
        BrowserView::Listing {
            category: name,
            search_input: self.search_input.clone(),
            cards: self
                .data
                .iter()
                .map(|r| view::build_card(category, r))
                .collect(),
            pagination,
            show_clear: !self.search_input.is_empty(),
        }
    }
}
