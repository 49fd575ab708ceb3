//! Script and stylesheet tag builders.
//!
//! Thin convenience layer over [`AssetResolver`]: resolve the URL and
//! integrity digest, then compose a `<script>` or `<link>` tag with whatever
//! optional attributes the caller supplied. Composition is purely additive —
//! an attribute is emitted when present and omitted otherwise, with no
//! validation of its value.
//!
//! Markup is generated with [maud](https://maud.lambda.xyz/), so attribute
//! values are auto-escaped.

use maud::html;

use crate::resolve::AssetResolver;

/// Optional attributes for generated tags. All default to absent.
#[derive(Debug, Clone, Default)]
pub struct TagAttrs {
    /// `async` on script tags.
    pub r#async: bool,
    /// `defer` on script tags.
    pub defer: bool,
    /// `crossorigin` value, e.g. `anonymous`.
    pub crossorigin: Option<String>,
    /// `media` query on link tags.
    pub media: Option<String>,
    /// `title` (alternate stylesheet name, or plain tooltip).
    pub title: Option<String>,
}

impl AssetResolver {
    /// A `<script>` tag for the resolved URL, with integrity when known.
    pub fn script_tag(&self, url: &str, attrs: &TagAttrs) -> String {
        let src = self.resolve_url(url);
        let integrity = non_empty(self.resolve_integrity(url));
        html! {
            script
                src=(src)
                integrity=[integrity]
                crossorigin=[attrs.crossorigin.as_deref()]
                title=[attrs.title.as_deref()]
                async[attrs.r#async]
                defer[attrs.defer]
            {}
        }
        .into_string()
    }

    /// A stylesheet `<link>` tag for the resolved URL, with integrity when
    /// known.
    pub fn style_tag(&self, url: &str, attrs: &TagAttrs) -> String {
        let href = self.resolve_url(url);
        let integrity = non_empty(self.resolve_integrity(url));
        html! {
            link
                rel="stylesheet"
                href=(href)
                integrity=[integrity]
                crossorigin=[attrs.crossorigin.as_deref()]
                media=[attrs.media.as_deref()]
                title=[attrs.title.as_deref()];
        }
        .into_string()
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}
