use colored::Colorize;
use itertools::Itertools;

use crate::browser::{BrowserView, Card, Pagination};
use crate::detail::{DetailView, FieldDisplay};
use crate::page::{MenuEntry, PageView};

const SEPARATOR: &str = "----------------------------------------------------------";

pub fn render(view: &PageView) -> String {
    let mut out = String::new();
    match view {
        PageView::Home { categories } => render_home(&mut out, categories),
        PageView::Category(view) => render_browser(&mut out, view),
        PageView::Item(view) => render_detail(&mut out, view),
    }
    out
}

fn link(label: &str, path: &str) -> String {
    format!("{} {}", label.bold().blue(), format!("({path})").dimmed())
}

fn heading(out: &mut String, title: &str) {
    out.push_str(&format!("{}\n", title.bold().white()));
    out.push_str(&format!("{}\n", SEPARATOR.dimmed()));
}

fn render_home(out: &mut String, categories: &[MenuEntry]) {
    heading(out, "Star Wars Catalog");
    for (i, c) in categories.iter().enumerate() {
        out.push_str(&format!(
            "{:>3}. {:<8} {}\n",
            i + 1,
            c.icon.dimmed(),
            link(&c.name, &c.link)
        ));
    }
}

fn render_card(out: &mut String, n: usize, card: &Card) {
    let title = match &card.link {
        Some(path) => link(&card.title, path),
        None => card.title.bold().white().to_string(),
    };
    out.push_str(&format!("{:>3}. {}\n", n, title));
    for field in &card.fields {
        out.push_str(&format!("     {}\n", field.dimmed()));
    }
}

fn button(label: &str, enabled: bool) -> String {
    let text = format!("[{label}]");
    if enabled {
        text.bold().cyan().to_string()
    } else {
        text.dimmed().to_string()
    }
}

fn render_pagination(out: &mut String, p: &Pagination) {
    out.push_str(&format!(
        "\n{}   Page {} of {}   {}\n",
        button("← Previous", p.previous_enabled),
        p.current_page,
        p.total_pages,
        button("Next →", p.next_enabled)
    ));
}

fn render_browser(out: &mut String, view: &BrowserView) {
    match view {
        BrowserView::NotFound { home_link, .. } => {
            heading(out, "Category not found");
            out.push_str(&format!("{}\n", link("Return to Home", home_link)));
        }
        BrowserView::Loading { category } => {
            heading(out, &format!("Loading {category}..."));
            out.push_str("⏳ Please wait...\n");
        }
        BrowserView::Errored { category, message } => {
            heading(out, &format!("Error loading {category}"));
            out.push_str(&format!("{} {}\n", "Error:".bold().red(), message));
            out.push_str(&format!("{}\n", button("Retry", true)));
        }
        BrowserView::Listing {
            category,
            search_input,
            cards,
            pagination,
            show_clear,
        } => {
            out.push_str(&format!("{}\n", link("← Back to Home", "/")));
            heading(out, category);
            let mut search = format!(
                "Search {}: {} {}",
                category.to_lowercase(),
                search_input,
                button("Search", true)
            );
            if *show_clear {
                search.push(' ');
                search.push_str(&button("Clear", true));
            }
            out.push_str(&format!("{search}\n\n"));
            for (i, card) in cards.iter().enumerate() {
                render_card(out, i + 1, card);
            }
            if let Some(p) = pagination {
                render_pagination(out, p);
            }
        }
        BrowserView::Searching {
            category,
            term,
            cards,
            no_results,
        } => {
            out.push_str(&format!("{}\n", link("← Back to Home", "/")));
            heading(out, category);
            out.push_str(&format!(
                "Search {}: {} {} {}\n\n",
                category.to_lowercase(),
                term,
                button("Search", true),
                button("Clear", true)
            ));
            for (i, card) in cards.iter().enumerate() {
                render_card(out, i + 1, card);
            }
            if let Some(message) = no_results {
                out.push_str(&format!("{}\n", message.yellow()));
            }
        }
    }
}

fn render_detail(out: &mut String, view: &DetailView) {
    match view {
        DetailView::NotFound { home_link, .. } => {
            heading(out, "Category not found");
            out.push_str(&format!("{}\n", link("Return to Home", home_link)));
        }
        DetailView::Loading => {
            heading(out, "Loading...");
            out.push_str("⏳ Please wait...\n");
        }
        DetailView::Errored {
            message,
            back_link,
            back_label,
        } => {
            heading(out, "Error");
            out.push_str(&format!("{} {}\n", "Error:".bold().red(), message));
            out.push_str(&format!("{}\n", link(back_label, back_link)));
        }
        DetailView::Loaded {
            title,
            subtitle,
            back_link,
            back_label,
            home_link,
            fields,
        } => {
            out.push_str(&format!(
                "{}   {}\n",
                link(&format!("← {back_label}"), back_link),
                link("Home", home_link)
            ));
            heading(out, title);
            out.push_str(&format!("{}\n\n", subtitle.dimmed()));
            let width = fields
                .iter()
                .map(|f| f.label.chars().count())
                .max()
                .unwrap_or(0);
            for field in fields {
                let label = format!("{:<width$}", format!("{}:", field.label), width = width + 1);
                match &field.display {
                    FieldDisplay::Line(value) => {
                        out.push_str(&format!("{} {}\n", label.bold(), value));
                    }
                    FieldDisplay::List(items) => {
                        out.push_str(&format!("{}\n", label.bold()));
                        let list = items.iter().map(|item| format!("  - {item}")).join("\n");
                        out.push_str(&list);
                        out.push('\n');
                    }
                }
            }
        }
    }
}
