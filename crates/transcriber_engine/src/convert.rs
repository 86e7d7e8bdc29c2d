/// Renders a server-provided HTML result fragment for terminal display.
pub trait FragmentRenderer: Send + Sync {
    fn render(&self, html: &str) -> String;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Html2MdRenderer;

impl FragmentRenderer for Html2MdRenderer {
    fn render(&self, html: &str) -> String {
        html2md::parse_html(html)
    }
}
