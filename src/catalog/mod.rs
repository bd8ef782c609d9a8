use serde::Serialize;

pub const PAGE_SIZE: u64 = 10;

pub const DEFAULT_API_BASE: &str = "https://swapi.py4e.com/api";

// a field surfaced on a summary card
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CardField {
    pub key: &'static str,
    pub label: &'static str,
    pub unit: Option<&'static str>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryDescriptor {
    pub slug: &'static str,
    pub name: &'static str,
    pub singular: &'static str,
    pub endpoint: &'static str,
    pub icon: &'static str,
    #[serde(skip)]
    pub card_fields: [CardField; 2],
}

const fn field(key: &'static str, label: &'static str) -> CardField {
    CardField {
        key,
        label,
        unit: None,
    }
}

static CATEGORIES: [CategoryDescriptor; 6] = [
    CategoryDescriptor {
        slug: "people",
        name: "People",
        singular: "Person",
        endpoint: "people",
        icon: "user",
        card_fields: [
            CardField {
                key: "height",
                label: "Height",
                unit: Some("cm"),
            },
            field("birth_year", "Birth Year"),
        ],
    },
    CategoryDescriptor {
        slug: "planets",
        name: "Planets",
        singular: "Planet",
        endpoint: "planets",
        icon: "globe",
        card_fields: [field("climate", "Climate"), field("population", "Population")],
    },
    CategoryDescriptor {
        slug: "films",
        name: "Films",
        singular: "Film",
        endpoint: "films",
        icon: "film",
        card_fields: [
            field("director", "Director"),
            field("release_date", "Release Date"),
        ],
    },
    CategoryDescriptor {
        slug: "species",
        name: "Species",
        singular: "Species",
        endpoint: "species",
        icon: "users",
        card_fields: [
            field("classification", "Classification"),
            field("language", "Language"),
        ],
    },
    CategoryDescriptor {
        slug: "vehicles",
        name: "Vehicles",
        singular: "Vehicle",
        endpoint: "vehicles",
        icon: "car",
        card_fields: [field("model", "Model"), field("manufacturer", "Manufacturer")],
    },
    CategoryDescriptor {
        slug: "starships",
        name: "Starships",
        singular: "Starship",
        endpoint: "starships",
        icon: "rocket",
        card_fields: [field("model", "Model"), field("starship_class", "Class")],
    },
];

/// Every known category, in menu order.
pub fn all() -> &'static [CategoryDescriptor] {
    &CATEGORIES
}

/// Looks up a category by the slug used in router paths.
///
/// Matching is exact: `People` or ` people` are unknown categories.
pub fn lookup(slug: &str) -> Option<&'static CategoryDescriptor> {
    CATEGORIES.iter().find(|c| c.slug == slug)
}

pub fn total_pages(count: u64) -> u32 {
    let pages = count.div_ceil(PAGE_SIZE).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}
