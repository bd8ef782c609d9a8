use serde::Serialize;

use crate::browser::{BrowserView, CategoryBrowser};
use crate::catalog;
use crate::detail::{DetailView, ItemDetail};
use crate::fetch::{Applied, FetchOutcome, FetchTicket};
use crate::router::Route;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MenuEntry {
    pub name: String,
    pub icon: String,
    pub link: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum PageView {
    Home { categories: Vec<MenuEntry> },
    Category(BrowserView),
    Item(DetailView),
}

impl PageView {
    /// Every router path this view links to, in display order.
    pub fn links(&self) -> Vec<String> {
        match self {
            PageView::Home { categories } => categories.iter().map(|c| c.link.clone()).collect(),
            PageView::Category(view) => view.cards().iter().filter_map(|c| c.link.clone()).collect(),
            PageView::Item(_) => Vec::new(),
        }
    }
}

pub fn menu() -> Vec<MenuEntry> {
    catalog::all()
        .iter()
        .map(|c| MenuEntry {
            name: c.name.to_string(),
            icon: c.icon.to_string(),
            link: format!("/{}", c.slug),
        })
        .collect()
}

/// The page component the router selected for the current path.
#[derive(Clone, Debug)]
pub enum Page {
    Home,
    Category(CategoryBrowser),
    Item(ItemDetail),
}

impl Page {
    pub fn open(route: &Route) -> (Page, Option<FetchTicket>) {
        match route {
            Route::Home => (Page::Home, None),
            Route::Category { slug } => {
                let (browser, ticket) = CategoryBrowser::open(slug);
                (Page::Category(browser), ticket)
            }
            Route::Item { slug, id } => {
                let (detail, ticket) = ItemDetail::open(slug, id);
                (Page::Item(detail), ticket)
            }
        }
    }

    pub fn route(&self) -> Route {
        match self {
            Page::Home => Route::Home,
            Page::Category(browser) => Route::Category {
                slug: browser.slug().to_string(),
            },
            Page::Item(detail) => Route::Item {
                slug: detail.slug().to_string(),
                id: detail.id().to_string(),
            },
        }
    }

    pub fn apply(&mut self, ticket: &FetchTicket, outcome: FetchOutcome) -> Applied {
        match self {
            Page::Home => Applied::Stale,
            Page::Category(browser) => browser.apply(ticket, outcome),
            Page::Item(detail) => detail.apply(ticket, outcome),
        }
    }

    pub fn view(&self) -> PageView {
        match self {
            Page::Home => PageView::Home {
                categories: menu(),
            },
            Page::Category(browser) => PageView::Category(browser.view()),
            Page::Item(detail) => PageView::Item(detail.view()),
        }
    }

    pub fn browser_mut(&mut self) -> Option<&mut CategoryBrowser> {
        match self {
            Page::Category(browser) => Some(browser),
            _ => None,
        }
    }
}
