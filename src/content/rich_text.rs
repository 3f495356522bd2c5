//! Rich-text fragments and their HTML rendering

use serde::Serialize;
use serde_json::Value;

use crate::cms::CmsError;
use crate::helpers::html_escape;

/// Block type of a fragment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum FragmentKind {
    Paragraph,
    Heading(u8),
    ListItem,
    OrderedListItem,
    Preformatted,
    Other(String),
}

impl FragmentKind {
    pub fn from_cms(kind: &str) -> Self {
        match kind {
            "paragraph" => FragmentKind::Paragraph,
            "list-item" => FragmentKind::ListItem,
            "o-list-item" => FragmentKind::OrderedListItem,
            "preformatted" => FragmentKind::Preformatted,
            _ => match kind.strip_prefix("heading").and_then(|n| n.parse::<u8>().ok()) {
                Some(level @ 1..=6) => FragmentKind::Heading(level),
                _ => FragmentKind::Other(kind.to_string()),
            },
        }
    }

    fn list_tag(&self) -> Option<&'static str> {
        match self {
            FragmentKind::ListItem => Some("ul"),
            FragmentKind::OrderedListItem => Some("ol"),
            _ => None,
        }
    }
}

impl From<FragmentKind> for String {
    fn from(kind: FragmentKind) -> Self {
        match kind {
            FragmentKind::Paragraph => "paragraph".to_string(),
            FragmentKind::Heading(level) => format!("heading{}", level),
            FragmentKind::ListItem => "list-item".to_string(),
            FragmentKind::OrderedListItem => "o-list-item".to_string(),
            FragmentKind::Preformatted => "preformatted".to_string(),
            FragmentKind::Other(kind) => kind,
        }
    }
}

/// Inline formatting applied to a character range
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Span {
    /// First character (inclusive)
    pub start: usize,
    /// Last character (exclusive)
    pub end: usize,
    pub kind: SpanKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SpanKind {
    Strong,
    Em,
    Hyperlink { url: String },
    Label { label: String },
    Other { name: String },
}

impl SpanKind {
    fn open_tag(&self) -> String {
        match self {
            SpanKind::Strong => "<strong>".to_string(),
            SpanKind::Em => "<em>".to_string(),
            SpanKind::Hyperlink { url } => format!(r#"<a href="{}">"#, html_escape(url)),
            SpanKind::Label { label } => format!(r#"<span class="{}">"#, html_escape(label)),
            SpanKind::Other { .. } => "<span>".to_string(),
        }
    }

    fn close_tag(&self) -> &'static str {
        match self {
            SpanKind::Strong => "</strong>",
            SpanKind::Em => "</em>",
            SpanKind::Hyperlink { .. } => "</a>",
            SpanKind::Label { .. } | SpanKind::Other { .. } => "</span>",
        }
    }
}

/// One block of rich text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RichTextFragment {
    pub kind: FragmentKind,
    pub text: String,
    pub spans: Vec<Span>,
}

impl RichTextFragment {
    /// Parse a fragment from its CMS JSON form
    pub fn from_value(document_id: &str, value: &Value) -> Result<Self, CmsError> {
        let text = value
            .get("text")
            .and_then(Value::as_str)
            .ok_or_else(|| CmsError::malformed(document_id, "rich-text fragment without text"))?
            .to_string();

        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .map(FragmentKind::from_cms)
            .unwrap_or(FragmentKind::Paragraph);

        let spans = value
            .get("spans")
            .and_then(Value::as_array)
            .map(|spans| spans.iter().filter_map(parse_span).collect())
            .unwrap_or_default();

        Ok(Self { kind, text, spans })
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Inline HTML of the text with its spans applied
    ///
    /// Span offsets count UTF-16 code units, as the CMS editor does.
    pub fn inline_html(&self) -> String {
        let chars: Vec<char> = self.text.chars().collect();

        // UTF-16 offset of every char boundary, end of text included
        let boundaries: Vec<usize> = std::iter::once(0)
            .chain(chars.iter().scan(0, |offset, c| {
                *offset += c.len_utf16();
                Some(*offset)
            }))
            .collect();
        let char_index = |offset: usize| boundaries.binary_search(&offset).ok();

        let in_chars: Vec<Span> = self
            .spans
            .iter()
            .filter_map(|s| {
                Some(Span {
                    start: char_index(s.start)?,
                    end: char_index(s.end)?,
                    kind: s.kind.clone(),
                })
            })
            .filter(|s| s.start < s.end)
            .collect();
        let mut spans: Vec<&Span> = in_chars.iter().collect();
        // Outer spans open first
        spans.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

        let mut out = String::with_capacity(self.text.len());
        let mut stack: Vec<&Span> = Vec::new();
        let mut pending = spans.into_iter().peekable();

        for (i, c) in chars.iter().enumerate() {
            close_spans(&mut stack, i, &mut out);
            while let Some(span) = pending.next_if(|s| s.start == i) {
                out.push_str(&span.kind.open_tag());
                stack.push(span);
            }
            match c {
                '\n' => out.push_str("<br />"),
                _ => out.push_str(&html_escape(&c.to_string())),
            }
        }
        close_spans(&mut stack, chars.len(), &mut out);

        out
    }

    /// Block HTML of this fragment
    pub fn to_html(&self) -> String {
        let inner = self.inline_html();
        match &self.kind {
            FragmentKind::Paragraph | FragmentKind::Other(_) => format!("<p>{}</p>", inner),
            FragmentKind::Heading(level) => format!("<h{0}>{1}</h{0}>", level, inner),
            FragmentKind::ListItem | FragmentKind::OrderedListItem => {
                format!("<li>{}</li>", inner)
            }
            FragmentKind::Preformatted => format!("<pre>{}</pre>", inner),
        }
    }
}

/// Close every open span that ends at or before `at`, reopening the ones
/// nested above it that are still running
fn close_spans<'a>(stack: &mut Vec<&'a Span>, at: usize, out: &mut String) {
    let Some(pos) = stack.iter().position(|s| s.end <= at) else {
        return;
    };
    let closed: Vec<&Span> = stack.drain(pos..).collect();
    for span in closed.iter().rev() {
        out.push_str(span.kind.close_tag());
    }
    for span in closed {
        if span.end > at {
            out.push_str(&span.kind.open_tag());
            stack.push(span);
        }
    }
}

fn parse_span(value: &Value) -> Option<Span> {
    let start = value.get("start")?.as_u64()? as usize;
    let end = value.get("end")?.as_u64()? as usize;
    let name = value.get("type")?.as_str()?;
    let data = value.get("data");

    let kind = match name {
        "strong" => SpanKind::Strong,
        "em" => SpanKind::Em,
        "hyperlink" => SpanKind::Hyperlink {
            url: data?.get("url")?.as_str()?.to_string(),
        },
        "label" => SpanKind::Label {
            label: data?.get("label")?.as_str()?.to_string(),
        },
        other => SpanKind::Other {
            name: other.to_string(),
        },
    };

    Some(Span { start, end, kind })
}

/// Plain text of a sequence of fragments, joined by spaces
pub fn as_text(fragments: &[RichTextFragment]) -> String {
    fragments
        .iter()
        .map(|f| f.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Block HTML of a sequence of fragments, grouping consecutive list items
pub fn to_html(fragments: &[RichTextFragment]) -> String {
    let mut out = String::new();
    let mut open_list: Option<&'static str> = None;

    for fragment in fragments {
        let list = fragment.kind.list_tag();
        if open_list != list {
            if let Some(tag) = open_list {
                out.push_str(&format!("</{}>", tag));
            }
            if let Some(tag) = list {
                out.push_str(&format!("<{}>", tag));
            }
            open_list = list;
        }
        out.push_str(&fragment.to_html());
    }
    if let Some(tag) = open_list {
        out.push_str(&format!("</{}>", tag));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fragment(value: Value) -> RichTextFragment {
        RichTextFragment::from_value("doc", &value).unwrap()
    }

    #[test]
    fn test_parse_fragment() {
        let f = fragment(json!({
            "type": "heading2",
            "text": "Hello world",
            "spans": [
                {"start": 0, "end": 5, "type": "strong"},
                {"start": 6, "end": 11, "type": "hyperlink", "data": {"link_type": "Web", "url": "https://example.com"}}
            ]
        }));
        assert_eq!(f.kind, FragmentKind::Heading(2));
        assert_eq!(f.spans.len(), 2);
        assert_eq!(f.word_count(), 2);
        assert_eq!(
            f.to_html(),
            r#"<h2><strong>Hello</strong> <a href="https://example.com">world</a></h2>"#
        );
    }

    #[test]
    fn test_fragment_without_text_is_malformed() {
        let err = RichTextFragment::from_value("doc", &json!({"type": "paragraph"})).unwrap_err();
        assert!(matches!(err, CmsError::Malformed { .. }));
    }

    #[test]
    fn test_nested_and_crossing_spans() {
        let nested = fragment(json!({
            "type": "paragraph",
            "text": "abcdef",
            "spans": [
                {"start": 0, "end": 6, "type": "strong"},
                {"start": 2, "end": 4, "type": "em"}
            ]
        }));
        assert_eq!(
            nested.inline_html(),
            "<strong>ab<em>cd</em>ef</strong>"
        );

        let crossing = fragment(json!({
            "type": "paragraph",
            "text": "abcdef",
            "spans": [
                {"start": 0, "end": 4, "type": "strong"},
                {"start": 2, "end": 6, "type": "em"}
            ]
        }));
        assert_eq!(
            crossing.inline_html(),
            "<strong>ab<em>cd</em></strong><em>ef</em>"
        );
    }

    #[test]
    fn test_span_offsets_count_utf16_units() {
        // The emoji takes two UTF-16 units, "ok" starts at offset 3
        let f = fragment(json!({
            "type": "paragraph",
            "text": "\u{1F680} ok",
            "spans": [{"start": 3, "end": 5, "type": "strong"}]
        }));
        assert_eq!(f.inline_html(), "\u{1F680} <strong>ok</strong>");

        let accented = fragment(json!({
            "type": "paragraph",
            "text": "não é",
            "spans": [{"start": 4, "end": 5, "type": "em"}]
        }));
        assert_eq!(accented.inline_html(), "não <em>é</em>");
    }

    #[test]
    fn test_text_is_escaped_and_bad_spans_ignored() {
        let f = fragment(json!({
            "type": "paragraph",
            "text": "a < b",
            "spans": [{"start": 3, "end": 99, "type": "em"}]
        }));
        assert_eq!(f.to_html(), "<p>a &lt; b</p>");
    }

    #[test]
    fn test_list_grouping() {
        let fragments = vec![
            fragment(json!({"type": "list-item", "text": "one"})),
            fragment(json!({"type": "list-item", "text": "two"})),
            fragment(json!({"type": "paragraph", "text": "after"})),
        ];
        assert_eq!(
            to_html(&fragments),
            "<ul><li>one</li><li>two</li></ul><p>after</p>"
        );
        assert_eq!(as_text(&fragments), "one two after");
    }

    #[test]
    fn test_unknown_kind_renders_as_paragraph() {
        let f = fragment(json!({"type": "image", "text": "caption"}));
        assert_eq!(f.kind, FragmentKind::Other("image".to_string()));
        assert_eq!(f.to_html(), "<p>caption</p>");
        assert_eq!(serde_json::to_value(&f.kind).unwrap(), json!("image"));
    }
}
