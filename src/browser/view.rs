use serde::Serialize;

use crate::catalog::{CardField, CategoryDescriptor};
use crate::record::{FieldValue, Record};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Card {
    pub title: String,
    pub link: Option<String>,
    pub fields: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub previous_enabled: bool,
    pub next_enabled: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum BrowserView {
    NotFound {
        slug: String,
        home_link: String,
    },
    Loading {
        category: String,
    },
    Errored {
        category: String,
        message: String,
    },
    Listing {
        category: String,
        search_input: String,
        cards: Vec<Card>,
        pagination: Option<Pagination>,
        show_clear: bool,
    },
    Searching {
        category: String,
        term: String,
        cards: Vec<Card>,
        no_results: Option<String>,
    },
}

impl BrowserView {
    pub fn cards(&self) -> &[Card] {
        match self {
            BrowserView::Listing { cards, .. } | BrowserView::Searching { cards, .. } => cards,
            _ => &[],
        }
    }
}

fn card_line(field: &CardField, record: &Record) -> String {
    match record.get(field.key) {
        Some(FieldValue::Scalar(value)) => match field.unit {
            Some(unit) => format!("{}: {} {}", field.label, value, unit),
            None => format!("{}: {}", field.label, value),
        },
        Some(FieldValue::Sequence(items)) if !items.is_empty() => {
            format!("{}: {}", field.label, items.join(", "))
        }
        _ => format!("{}: Unknown", field.label),
    }
}

pub fn build_card(category: &CategoryDescriptor, record: &Record) -> Card {
    Card {
        title: record.display_name().to_string(),
        link: record.id().map(|id| format!("/{}/{}", category.slug, id)),
        fields: category
            .card_fields
            .iter()
            .map(|f| card_line(f, record))
            .collect(),
    }
}
