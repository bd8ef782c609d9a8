use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::record::{Record, RecordPage, SearchResults};

/// The only failure a page ever sees. Transport errors, non-success statuses
/// and undecodable bodies all end up here with a human-readable message.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("{message}")]
    FetchFailed { message: String },
}

impl FetchError {
    pub fn failed(message: impl Into<String>) -> Self {
        FetchError::FetchFailed {
            message: message.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FetchRequest {
    List { endpoint: String, page: u32 },
    Search { endpoint: String, term: String },
    Detail { endpoint: String, id: String },
}

impl fmt::Display for FetchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchRequest::List { endpoint, page } => write!(f, "{endpoint} page {page}"),
            FetchRequest::Search { endpoint, term } => write!(f, "{endpoint} search \"{term}\""),
            FetchRequest::Detail { endpoint, id } => write!(f, "{endpoint}/{id}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchResponse {
    Page(RecordPage),
    Search(SearchResults),
    Record(Record),
}

pub type FetchOutcome = Result<FetchResponse, FetchError>;

/// A request tagged with the generation of the state that issued it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub request: FetchRequest,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Applied {
    Applied,
    Stale,
}

// monotonic counter; only the newest ticket may update a page
#[derive(Clone, Debug, Default)]
pub struct Generation {
    current: u64,
}

impl Generation {
    pub fn issue(&mut self, request: FetchRequest) -> FetchTicket {
        self.current += 1;
        FetchTicket {
            generation: self.current,
            request,
        }
    }

    // drops whatever is in flight without issuing anything new
    pub fn invalidate(&mut self) {
        self.current += 1;
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.generation == self.current
    }

    pub fn current(&self) -> u64 {
        self.current
    }
}

pub(crate) fn unexpected_response(request: &FetchRequest) -> FetchError {
    let kind = match request {
        FetchRequest::List { .. } => "page",
        FetchRequest::Search { .. } => "search",
        FetchRequest::Detail { .. } => "detail",
    };
    FetchError::failed(format!("unexpected response to {kind} request"))
}
