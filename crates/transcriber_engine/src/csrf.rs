use scraper::{Html, Selector};

/// Extracts the value of the hidden `csrfmiddlewaretoken` input from a
/// rendered form page. Returns `None` when the page carries no usable token.
pub fn extract_csrf_token(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    let selector = Selector::parse(r#"input[name="csrfmiddlewaretoken"]"#).ok()?;
    doc.select(&selector)
        .find_map(|input| input.value().attr("value"))
        .map(|value| value.to_string())
        .filter(|value| !value.is_empty())
}
