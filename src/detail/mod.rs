use serde::Serialize;

use crate::catalog::{self, CategoryDescriptor};
use crate::fetch::{
    unexpected_response, Applied, FetchOutcome, FetchRequest, FetchResponse, FetchTicket,
    Generation,
};
use crate::record::{FieldValue, Record};

// metadata fields that never make it into the detail view
pub const EXCLUDED_FIELDS: [&str; 3] = ["url", "created", "edited"];

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldDisplay {
    Line(String),
    List(Vec<String>),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DetailField {
    pub key: String,
    pub label: String,
    pub display: FieldDisplay,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DetailView {
    NotFound {
        slug: String,
        home_link: String,
    },
    Loading,
    Errored {
        message: String,
        back_link: String,
        back_label: String,
    },
    Loaded {
        title: String,
        subtitle: String,
        back_link: String,
        back_label: String,
        home_link: String,
        fields: Vec<DetailField>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum State {
    Loading,
    Errored(String),
    Loaded(Record),
}

#[derive(Clone, Debug)]
pub struct ItemDetail {
    slug: String,
    id: String,
    category: Option<&'static CategoryDescriptor>,
    state: State,
    generation: Generation,
}

/// `birth_year` -> `Birth Year`
pub fn field_label(key: &str) -> String {
    key.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Renders every field of `record` except [`EXCLUDED_FIELDS`], in payload order.
pub fn render_fields(record: &Record) -> Vec<DetailField> {
    record
        .fields()
        .filter(|(key, _)| !EXCLUDED_FIELDS.contains(key))
        .map(|(key, value)| {
            let display = match value {
                FieldValue::Sequence(items) if items.is_empty() => {
                    FieldDisplay::Line("None".to_string())
                }
                FieldValue::Sequence(items) => FieldDisplay::List(items.clone()),
                FieldValue::Scalar(s) => FieldDisplay::Line(s.clone()),
                FieldValue::Missing => FieldDisplay::Line("Unknown".to_string()),
            };
            DetailField {
                key: key.to_string(),
                label: field_label(key),
                display,
            }
        })
        .collect()
}

impl ItemDetail {
    pub fn open(slug: &str, id: &str) -> (Self, Option<FetchTicket>) {
        let mut detail = ItemDetail {
            slug: slug.to_string(),
            id: id.to_string(),
            category: catalog::lookup(slug),
            state: State::Loading,
            generation: Generation::default(),
        };
        let ticket = detail.category.map(|category| {
            detail.generation.issue(FetchRequest::Detail {
                endpoint: category.endpoint.to_string(),
                id: id.to_string(),
            })
        });
        (detail, ticket)
    }

    pub fn apply(&mut self, ticket: &FetchTicket, outcome: FetchOutcome) -> Applied {
        if self.category.is_none() || !self.generation.is_current(ticket) {
            return Applied::Stale;
        }
        self.state = match outcome {
            Ok(FetchResponse::Record(record)) if record.is_empty() => {
                State::Errored("Item not found".to_string())
            }
            Ok(FetchResponse::Record(record)) => State::Loaded(record),
            Ok(_) => State::Errored(unexpected_response(&ticket.request).to_string()),
            Err(e) => State::Errored(e.to_string()),
        };
        Applied::Applied
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn record(&self) -> Option<&Record> {
        match &self.state {
            State::Loaded(record) => Some(record),
            _ => None,
        }
    }

    pub fn view(&self) -> DetailView {
        let category = match self.category {
            Some(category) => category,
            None => {
                return DetailView::NotFound {
                    slug: self.slug.clone(),
                    home_link: "/".to_string(),
                }
            }
        };
        let back_link = format!("/{}", category.slug);
        let back_label = format!("Back to {}", category.name);
        match &self.state {
            State::Loading => DetailView::Loading,
            State::Errored(message) => DetailView::Errored {
                message: message.clone(),
                back_link,
                back_label,
            },
            State::Loaded(record) => DetailView::Loaded {
                title: record.display_name().to_string(),
                subtitle: format!("{} Details", category.singular),
                back_link,
                back_label,
                home_link: "/".to_string(),
                fields: render_fields(record),
            },
        }
    }
}
