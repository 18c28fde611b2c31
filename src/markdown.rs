//! Markdown to HTML for the article viewer.
//!
//! Rendering goes through `pulldown-cmark` with the GitHub-style extensions
//! turned on. Every code block is wrapped and preceded by a copy button:
//!
//! ```html
//! <div class="code-block">
//!   <button class="btn-copy" type="button" data-code-index="0">复制代码</button>
//!   <pre><code class="language-rust">...</code></pre>
//! </div>
//! ```
//!
//! The embedded `copy.js` wires the buttons to the clipboard.

use crate::config::ViewerConfig;
use maud::html;
use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd, html as md_html};

fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
}

/// Render an article body.
pub fn render_markdown(body: &str, viewer: &ViewerConfig) -> String {
    let mut code_index = 0usize;
    let events = Parser::new_ext(body, options()).flat_map(|event| match event {
        Event::Start(Tag::CodeBlock(kind)) => {
            let button = copy_button(code_index, viewer);
            code_index += 1;
            vec![
                Event::Html(CowStr::from(format!("<div class=\"code-block\">{button}"))),
                Event::Start(Tag::CodeBlock(kind)),
            ]
        }
        Event::End(TagEnd::CodeBlock) => vec![
            Event::End(TagEnd::CodeBlock),
            Event::Html(CowStr::from("</div>\n")),
        ],
        other => vec![other],
    });

    let mut out = String::with_capacity(body.len() * 3 / 2);
    md_html::push_html(&mut out, events);
    out
}

fn copy_button(index: usize, viewer: &ViewerConfig) -> String {
    html! {
        button.btn-copy type="button" data-code-index=(index) data-copied=(viewer.copied_label) {
            (viewer.copy_label)
        }
    }
    .into_string()
}

/// Text of the first `# heading`, if any.
pub fn first_heading(body: &str) -> Option<String> {
    body.lines()
        .find(|line| line.starts_with("# "))
        .map(|line| line.trim_start_matches("# ").trim().to_string())
        .filter(|title| !title.is_empty())
}
