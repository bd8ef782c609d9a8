use std::future::Future;

use reqwest::Url;
use serde::de::DeserializeOwned;

use crate::fetch::{FetchError, FetchOutcome, FetchRequest, FetchResponse};
use crate::record::{Record, RecordPage, SearchResults};

/// The external catalog as the pages see it.
///
/// [`HttpCatalog`] talks to the REST API; tests substitute canned
/// implementations so the page state machines can be driven without a network.
pub trait CatalogApi: Send + Sync {
    fn list_page(
        &self,
        endpoint: &str,
        page: u32,
    ) -> impl Future<Output = Result<RecordPage, FetchError>> + Send;

    fn search(
        &self,
        endpoint: &str,
        term: &str,
    ) -> impl Future<Output = Result<SearchResults, FetchError>> + Send;

    fn detail(
        &self,
        endpoint: &str,
        id: &str,
    ) -> impl Future<Output = Result<Record, FetchError>> + Send;

    fn execute(&self, request: &FetchRequest) -> impl Future<Output = FetchOutcome> + Send {
        async move {
            match request {
                FetchRequest::List { endpoint, page } => self
                    .list_page(endpoint, *page)
                    .await
                    .map(FetchResponse::Page),
                FetchRequest::Search { endpoint, term } => {
                    self.search(endpoint, term).await.map(FetchResponse::Search)
                }
                FetchRequest::Detail { endpoint, id } => {
                    self.detail(endpoint, id).await.map(FetchResponse::Record)
                }
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct HttpCatalog {
    client: reqwest::Client,
    base: Url,
}

impl HttpCatalog {
    pub fn new(client: reqwest::Client, base: Url) -> Self {
        Self { client, base }
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn endpoint_url(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = self.base.clone();
        url.set_query(None);
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| FetchError::failed(format!("invalid api base: {}", self.base)))?;
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
            // the api only answers on trailing-slash paths
            path.push("");
        }
        Ok(url)
    }

    pub fn list_url(&self, endpoint: &str, page: u32) -> Result<Url, FetchError> {
        let mut url = self.endpoint_url(&[endpoint])?;
        url.query_pairs_mut().append_pair("page", &page.to_string());
        Ok(url)
    }

    pub fn search_url(&self, endpoint: &str, term: &str) -> Result<Url, FetchError> {
        let mut url = self.endpoint_url(&[endpoint])?;
        url.query_pairs_mut().append_pair("search", term);
        Ok(url)
    }

    pub fn detail_url(&self, endpoint: &str, id: &str) -> Result<Url, FetchError> {
        self.endpoint_url(&[endpoint, id])
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::failed(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(FetchError::failed("Failed to fetch data"));
        }
        let body = resp
            .bytes()
            .await
            .map_err(|e| FetchError::failed(e.to_string()))?;
        serde_json::from_slice(&body)
            .map_err(|e| FetchError::failed(format!("invalid response body: {e}")))
    }
}

impl CatalogApi for HttpCatalog {
    fn list_page(
        &self,
        endpoint: &str,
        page: u32,
    ) -> impl Future<Output = Result<RecordPage, FetchError>> + Send {
        let url = self.list_url(endpoint, page);
        async move { self.get_json(url?).await }
    }

    fn search(
        &self,
        endpoint: &str,
        term: &str,
    ) -> impl Future<Output = Result<SearchResults, FetchError>> + Send {
        let url = self.search_url(endpoint, term);
        async move { self.get_json(url?).await }
    }

    fn detail(
        &self,
        endpoint: &str,
        id: &str,
    ) -> impl Future<Output = Result<Record, FetchError>> + Send {
        let url = self.detail_url(endpoint, id);
        async move { self.get_json(url?).await }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn catalog(base: &str) -> HttpCatalog {
        HttpCatalog::new(reqwest::Client::new(), Url::parse(base).unwrap())
    }

    #[test]
    fn urls_follow_the_rest_layout() {
        let api = catalog("https://swapi.py4e.com/api");
        assert_eq!(
            api.list_url("people", 2).unwrap().as_str(),
            "https://swapi.py4e.com/api/people/?page=2"
        );
        assert_eq!(
            api.search_url("planets", "hoth").unwrap().as_str(),
            "https://swapi.py4e.com/api/planets/?search=hoth"
        );
        assert_eq!(
            api.detail_url("films", "1").unwrap().as_str(),
            "https://swapi.py4e.com/api/films/1/"
        );
    }

    #[test]
    fn base_with_trailing_slash_does_not_double_up() {
        let api = catalog("https://swapi.py4e.com/api/");
        assert_eq!(
            api.detail_url("people", "4").unwrap().as_str(),
            "https://swapi.py4e.com/api/people/4/"
        );
    }

    #[test]
    fn search_terms_are_encoded() {
        let api = catalog("https://swapi.py4e.com/api");
        let url = api.search_url("people", "r2&d2").unwrap();
        assert_eq!(url.query(), Some("search=r2%26d2"));
    }

    #[tokio::test]
    async fn list_page_decodes_count_and_results() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/people/").query_param("page", "1");
                then.status(200).json_body(json!({
                    "count": 87,
                    "next": "https://swapi.py4e.com/api/people/?page=2",
                    "results": [
                        {"name": "Luke Skywalker", "height": "172", "url": "https://swapi.py4e.com/api/people/1/"}
                    ]
                }));
            })
            .await;

        let api = catalog(&server.url("/api"));
        let page = api.list_page("people", 1).await.unwrap();
        mock.assert_async().await;
        assert_eq!(page.count, 87);
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].display_name(), "Luke Skywalker");
        assert_eq!(page.results[0].id(), Some("1"));
    }

    #[tokio::test]
    async fn non_success_status_is_a_fetch_failure() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/planets/99/");
                then.status(404).json_body(json!({"detail": "Not found"}));
            })
            .await;

        let api = catalog(&server.url("/api"));
        let err = api.detail("planets", "99").await.unwrap_err();
        assert_eq!(err, FetchError::failed("Failed to fetch data"));
    }

    #[tokio::test]
    async fn execute_dispatches_search() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/people/")
                    .query_param("search", "luke");
                then.status(200).json_body(json!({
                    "count": 1,
                    "results": [{"name": "Luke Skywalker"}]
                }));
            })
            .await;

        let api = catalog(&server.url("/api"));
        let outcome = api
            .execute(&FetchRequest::Search {
                endpoint: "people".to_string(),
                term: "luke".to_string(),
            })
            .await
            .unwrap();
        match outcome {
            FetchResponse::Search(found) => assert_eq!(found.results.len(), 1),
            other => panic!("unexpected response {other:?}"),
        }
    }

    #[tokio::test]
    async fn garbage_body_is_a_fetch_failure() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/films/");
                then.status(200).body("<html>not json</html>");
            })
            .await;

        let api = catalog(&server.url("/api"));
        let err = api.list_page("films", 1).await.unwrap_err();
        assert!(err.to_string().starts_with("invalid response body"));
    }
}
