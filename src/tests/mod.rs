use std::future::{ready, Future};
use std::sync::Mutex;

use serde_json::json;

use crate::api::CatalogApi;
use crate::browser::BrowserView;
use crate::catalog;
use crate::fetch::{FetchError, FetchRequest};
use crate::page::{Page, PageView};
use crate::record::{Record, RecordPage, SearchResults};
use crate::router::Route;
use crate::runner::{Options, Runner, VisitOptions};

/// Canned people catalog: record 1 is Luke, the rest are numbered.
pub(crate) struct FakeCatalog {
    count: u64,
    calls: Mutex<Vec<FetchRequest>>,
}

impl FakeCatalog {
    pub(crate) fn people(count: u64) -> Self {
        Self {
            count,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> Vec<FetchRequest> {
        self.calls.lock().unwrap().clone()
    }

    fn person(id: u64) -> Record {
        let name = if id == 1 {
            "Luke Skywalker".to_string()
        } else {
            format!("Person {id}")
        };
        serde_json::from_value(json!({
            "name": name,
            "height": "172",
            "birth_year": "19BBY",
            "films": [],
            "created": "2014-12-09T13:50:51.644000Z",
            "url": format!("https://swapi.py4e.com/api/people/{id}/"),
        }))
        .unwrap()
    }

    fn record_call(&self, request: FetchRequest) {
        self.calls.lock().unwrap().push(request);
    }
}

impl CatalogApi for FakeCatalog {
    fn list_page(
        &self,
        endpoint: &str,
        page: u32,
    ) -> impl Future<Output = Result<RecordPage, FetchError>> + Send {
        self.record_call(FetchRequest::List {
            endpoint: endpoint.to_string(),
            page,
        });
        let result = if endpoint == "people" {
            let first = (u64::from(page) - 1) * catalog::PAGE_SIZE + 1;
            let last = (u64::from(page) * catalog::PAGE_SIZE).min(self.count);
            Ok(RecordPage {
                count: self.count,
                results: (first..=last).map(Self::person).collect(),
            })
        } else {
            Err(FetchError::failed("Failed to fetch data"))
        };
        ready(result)
    }

    fn search(
        &self,
        endpoint: &str,
        term: &str,
    ) -> impl Future<Output = Result<SearchResults, FetchError>> + Send {
        self.record_call(FetchRequest::Search {
            endpoint: endpoint.to_string(),
            term: term.to_string(),
        });
        let needle = term.to_lowercase();
        let results = (1..=self.count)
            .map(Self::person)
            .filter(|r| r.display_name().to_lowercase().contains(&needle))
            .collect();
        ready(Ok(SearchResults { results }))
    }

    fn detail(
        &self,
        endpoint: &str,
        id: &str,
    ) -> impl Future<Output = Result<Record, FetchError>> + Send {
        self.record_call(FetchRequest::Detail {
            endpoint: endpoint.to_string(),
            id: id.to_string(),
        });
        let result = match id.parse::<u64>() {
            Ok(n) if endpoint == "people" && n >= 1 && n <= self.count => Ok(Self::person(n)),
            _ => Err(FetchError::failed("Failed to fetch data")),
        };
        ready(result)
    }
}

#[tokio::test]
async fn people_first_page_end_to_end() {
    let runner = Runner::with_api(Options::default(), FakeCatalog::people(87));
    let visit = runner
        .visit(&Route::resolve("/people"), &VisitOptions::default())
        .await;
    assert_eq!(
        runner.api().calls(),
        vec![FetchRequest::List {
            endpoint: "people".to_string(),
            page: 1
        }]
    );
    match &visit.view {
        PageView::Category(BrowserView::Listing {
            cards, pagination, ..
        }) => {
            assert_eq!(cards.len(), 10);
            assert_eq!(cards[0].title, "Luke Skywalker");
            assert_eq!(cards[0].fields, vec!["Height: 172 cm", "Birth Year: 19BBY"]);
            assert_eq!(cards[0].link.as_deref(), Some("/people/1"));
            assert_eq!(pagination.map(|p| p.total_pages), Some(9));
        }
        other => panic!("unexpected view {other:?}"),
    }
    assert_eq!(visit.view.links()[0], "/people/1");
}

#[tokio::test]
async fn last_page_is_partial_and_next_disabled() {
    let runner = Runner::with_api(Options::default(), FakeCatalog::people(25));
    let visit = runner
        .visit(
            &Route::resolve("/people"),
            &VisitOptions {
                page: Some(3),
                search: None,
            },
        )
        .await;
    match visit.view {
        PageView::Category(BrowserView::Listing {
            cards, pagination, ..
        }) => {
            assert_eq!(cards.len(), 5);
            let p = pagination.unwrap();
            assert!(!p.next_enabled);
            assert!(p.previous_enabled);
        }
        other => panic!("unexpected view {other:?}"),
    }
}

#[tokio::test]
async fn search_from_listing_shows_only_matches() {
    let runner = Runner::with_api(Options::default(), FakeCatalog::people(25));
    let visit = runner
        .visit(
            &Route::resolve("/people"),
            &VisitOptions {
                page: None,
                search: Some("luke".to_string()),
            },
        )
        .await;
    let json = serde_json::to_value(&visit.view).unwrap();
    assert_eq!(json["page"], "category");
    assert_eq!(json["state"], "searching");
    assert_eq!(json["cards"].as_array().unwrap().len(), 1);
    assert!(json.get("pagination").is_none());
}

#[tokio::test]
async fn detail_hides_metadata_and_renders_none() {
    let runner = Runner::with_api(Options::default(), FakeCatalog::people(3));
    let (mut page, ticket) = Page::open(&Route::resolve("/people/1"));
    assert!(runner.settle(&mut page, ticket).await);

    let json = serde_json::to_value(page.view()).unwrap();
    assert_eq!(json["page"], "item");
    assert_eq!(json["state"], "loaded");
    let keys: Vec<&str> = json["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["key"].as_str().unwrap())
        .collect();
    assert!(!keys.contains(&"url"));
    assert!(!keys.contains(&"created"));
    let films = json["fields"]
        .as_array()
        .unwrap()
        .iter()
        .find(|f| f["key"] == "films")
        .unwrap();
    assert_eq!(films["display"]["value"], "None");
}

#[tokio::test]
async fn failing_category_then_retry() {
    let runner = Runner::with_api(Options::default(), FakeCatalog::people(3));
    let (mut page, ticket) = Page::open(&Route::resolve("/planets"));
    runner.settle(&mut page, ticket).await;
    assert!(matches!(
        page.view(),
        PageView::Category(BrowserView::Errored { .. })
    ));

    let retry = page.browser_mut().and_then(|b| b.retry());
    assert!(retry.is_some());
    runner.settle(&mut page, retry).await;
    assert_eq!(runner.api().calls().len(), 2);
}
