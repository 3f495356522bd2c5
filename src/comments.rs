//! Comments widget (utterances) embedding
//!
//! Every post page carries a single container element. When comments are
//! configured, a small inline script appends the third-party `<script>`
//! into it once per page view and removes the widget again when the page
//! is really left (not when it is kept in the back/forward cache).

use crate::config::CommentsConfig;
use crate::helpers::{html_escape, js_string};

/// Stable id of the element the widget mounts into
pub const CONTAINER_ID: &str = "commentsContainer";

/// Class the third-party script gives its iframe wrapper
const WIDGET_CLASS: &str = "utterances";

/// Comment threads are keyed by the page path
const ISSUE_TERM: &str = "pathname";

/// Markup generator for the comments widget
pub struct CommentsWidget<'a> {
    config: &'a CommentsConfig,
}

impl<'a> CommentsWidget<'a> {
    pub fn new(config: &'a CommentsConfig) -> Self {
        Self { config }
    }

    /// Whether the mounting script should be emitted
    pub fn enabled(&self) -> bool {
        self.config.enable && !self.config.repo.trim().is_empty()
    }

    /// Container element, followed by the mounting script when enabled
    pub fn render(&self) -> String {
        let container = format!(
            r#"<div id="{}" class="comments-container"></div>"#,
            html_escape(CONTAINER_ID)
        );
        if !self.enabled() {
            return container;
        }

        let attributes = [
            ("src", self.config.script_src.as_str()),
            ("crossorigin", "anonymous"),
            ("async", "true"),
            ("repo", self.config.repo.as_str()),
            ("issue-term", ISSUE_TERM),
            ("theme", self.config.theme.as_str()),
        ];
        let setters: String = attributes
            .iter()
            .map(|(name, value)| {
                format!(
                    "    script.setAttribute({}, {});\n",
                    js_string(name),
                    js_string(value)
                )
            })
            .collect();

        format!(
            r#"{container}
<script>
(function() {{
  var anchor = document.getElementById({id_js});
  if (!anchor || document.getElementsByClassName({class_js}).length > 0) return;
  var script = document.createElement("script");
{setters}  anchor.appendChild(script);
  window.addEventListener("pagehide", function(event) {{
    if (event.persisted) return;
    while (anchor.firstChild) anchor.removeChild(anchor.firstChild);
  }});
}})();
</script>"#,
            container = container,
            id_js = js_string(CONTAINER_ID),
            class_js = js_string(WIDGET_CLASS),
            setters = setters,
        )
    }
}
