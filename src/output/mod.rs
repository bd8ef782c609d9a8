pub mod text;

use crate::page::PageView;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Text);
    }
    None
}

pub fn render_json(view: &PageView) -> Vec<u8> {
    let mut out = serde_json::to_vec_pretty(view).unwrap_or_else(|_| b"{}".to_vec());
    out.push(b'\n');
    out
}

pub fn render_text(view: &PageView) -> Vec<u8> {
    text::render(view).into_bytes()
}

pub fn render(view: &PageView, format: OutputFormat) -> Vec<u8> {
    match format {
        OutputFormat::Text => render_text(view),
        OutputFormat::Json => render_json(view),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::Page;

    #[test]
    fn parse_and_infer_formats() {
        assert_eq!(OutputFormat::parse(" JSON "), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("txt"), Some(OutputFormat::Text));
        assert_eq!(OutputFormat::parse("xml"), None);
        assert_eq!(
            infer_format_from_path("out/people.json"),
            Some(OutputFormat::Json)
        );
        assert_eq!(infer_format_from_path("people.md"), None);
    }

    #[test]
    fn json_render_is_tagged_by_page() {
        let out = render(&Page::Home.view(), OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["page"], "home");
        assert_eq!(value["categories"][0]["name"], "People");
    }
}
