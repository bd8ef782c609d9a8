use serde::Serialize;

/// The three navigable shapes. Anything else redirects to [`Route::Home`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "route", rename_all = "snake_case")]
pub enum Route {
    Home,
    Category { slug: String },
    Item { slug: String, id: String },
}

impl Route {
    pub fn resolve(path: &str) -> Route {
        let path = path.trim();
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.strip_prefix('/').unwrap_or(path);
        let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
        if trimmed.is_empty() {
            return Route::Home;
        }
        let segments: Vec<&str> = trimmed.split('/').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Route::Home;
        }
        match segments.as_slice() {
            [slug] => Route::Category {
                slug: slug.to_string(),
            },
            [slug, id] => Route::Item {
                slug: slug.to_string(),
                id: id.to_string(),
            },
            _ => Route::Home,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Category { slug } => format!("/{slug}"),
            Route::Item { slug, id } => format!("/{slug}/{id}"),
        }
    }

    /// The route one level up, used by the shell's `back` command.
    pub fn parent(&self) -> Route {
        match self {
            Route::Home | Route::Category { .. } => Route::Home,
            Route::Item { slug, .. } => Route::Category { slug: slug.clone() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_the_three_shapes() {
        assert_eq!(Route::resolve("/"), Route::Home);
        assert_eq!(Route::resolve(""), Route::Home);
        assert_eq!(
            Route::resolve("/people"),
            Route::Category {
                slug: "people".to_string()
            }
        );
        assert_eq!(
            Route::resolve("/people/1/"),
            Route::Item {
                slug: "people".to_string(),
                id: "1".to_string()
            }
        );
    }

    #[test]
    fn unknown_shapes_redirect_home() {
        assert_eq!(Route::resolve("/people/1/films"), Route::Home);
        assert_eq!(Route::resolve("//people"), Route::Home);
        assert_eq!(Route::resolve("/people//1"), Route::Home);
    }

    #[test]
    fn unknown_category_still_routes() {
        // the page decides it is not found, not the router
        assert_eq!(
            Route::resolve("/droids"),
            Route::Category {
                slug: "droids".to_string()
            }
        );
    }

    #[test]
    fn path_round_trips_and_parent() {
        let item = Route::resolve("/starships/9?x=1");
        assert_eq!(item.path(), "/starships/9");
        assert_eq!(item.parent().path(), "/starships");
        assert_eq!(item.parent().parent(), Route::Home);
    }
}
