//! Flatten an HTML fragment into styled terminal lines.
//!
//! Block elements start new lines, inline elements map to span styles, and
//! whitespace in text nodes collapses the way a browser would render it.
//! Lines are not wrapped here; their unwrapped width is the container's
//! natural width.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use scraper::node::Node;
use scraper::{ElementRef, Html};

const SKIPPED: &[&str] = &["script", "style", "head", "title", "template", "noscript"];
const BLOCKS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "dd",
    "div",
    "dl",
    "dt",
    "figcaption",
    "figure",
    "footer",
    "form",
    "header",
    "li",
    "main",
    "nav",
    "ol",
    "p",
    "section",
    "table",
    "tr",
    "ul",
];

/// Render `html` into lines. Always returns at least one line.
pub fn html_to_lines(html: &str) -> Vec<Line<'static>> {
    let fragment = Html::parse_fragment(html);
    let mut builder = LineBuilder::default();
    walk(fragment.root_element(), Style::default(), &mut builder);
    builder.finish()
}

/// Plain-text rendering of `html`, one string per line.
pub fn html_to_plain(html: &str) -> Vec<String> {
    html_to_lines(html)
        .iter()
        .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
        .collect()
}

#[derive(Default)]
struct LineBuilder {
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    pending_space: bool,
    preformatted: usize,
    lists: Vec<Option<usize>>,
}

impl LineBuilder {
    fn push_text(&mut self, text: &str, style: Style) {
        if self.preformatted > 0 {
            let mut parts = text.split('\n');
            if let Some(first) = parts.next() {
                self.push_raw(first, style);
            }
            for part in parts {
                self.hard_break();
                self.push_raw(part, style);
            }
            return;
        }
        let starts_with_space = text.starts_with(char::is_whitespace);
        let ends_with_space = text.ends_with(char::is_whitespace);
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() {
            if starts_with_space {
                self.pending_space = true;
            }
            return;
        }
        if starts_with_space {
            self.pending_space = true;
        }
        let mut collapsed = String::new();
        if self.pending_space && !self.current.is_empty() {
            collapsed.push(' ');
        }
        collapsed.push_str(&words.join(" "));
        self.pending_space = ends_with_space;
        self.current.push(Span::styled(collapsed, style));
    }

    fn push_raw(&mut self, text: &str, style: Style) {
        if !text.is_empty() {
            self.current.push(Span::styled(text.to_string(), style));
        }
    }

    /// End the current line if it has content.
    fn soft_break(&mut self) {
        if !self.current.is_empty() {
            self.hard_break();
        }
        self.pending_space = false;
    }

    fn hard_break(&mut self) {
        let spans = std::mem::take(&mut self.current);
        self.lines.push(Line::from(spans));
        self.pending_space = false;
    }

    fn blank_line(&mut self) {
        self.soft_break();
        if self.lines.last().is_some_and(|l| l.width() > 0) {
            self.lines.push(Line::default());
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.soft_break();
        while self.lines.last().is_some_and(|l| l.width() == 0) {
            self.lines.pop();
        }
        if self.lines.is_empty() {
            self.lines.push(Line::default());
        }
        self.lines
    }
}

fn walk(element: ElementRef<'_>, style: Style, out: &mut LineBuilder) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_text(&text.text, style),
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    visit(child, style, out);
                }
            }
            _ => {}
        }
    }
}

fn visit(element: ElementRef<'_>, style: Style, out: &mut LineBuilder) {
    let name = element.value().name();
    if SKIPPED.contains(&name) {
        return;
    }
    match name {
        "br" => out.hard_break(),
        "hr" => {
            out.soft_break();
            out.lines.push(Line::from("────────"));
        }
        "img" => {
            let alt = element.value().attr("alt").unwrap_or("image");
            out.push_text(
                &format!(" [{alt}] "),
                style.fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            );
        }
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            out.blank_line();
            let mut heading = style.add_modifier(Modifier::BOLD);
            if name == "h1" {
                heading = heading.add_modifier(Modifier::UNDERLINED);
            }
            walk(element, heading, out);
            out.blank_line();
        }
        "pre" => {
            out.soft_break();
            out.preformatted += 1;
            walk(element, style.fg(Color::Yellow), out);
            out.preformatted -= 1;
            out.blank_line();
        }
        "p" => {
            out.blank_line();
            walk(element, style, out);
            out.blank_line();
        }
        "ul" | "ol" => {
            out.soft_break();
            out.lists.push((name == "ol").then_some(0));
            walk(element, style, out);
            out.lists.pop();
            out.soft_break();
        }
        "li" => {
            out.soft_break();
            let depth = out.lists.len().saturating_sub(1);
            let bullet = match out.lists.last_mut() {
                Some(Some(n)) => {
                    *n += 1;
                    format!("{}{}. ", "  ".repeat(depth), n)
                }
                _ => format!("{}• ", "  ".repeat(depth)),
            };
            out.push_raw(&bullet, style);
            walk(element, style, out);
            out.soft_break();
        }
        "td" | "th" => {
            if !out.current.is_empty() {
                out.push_raw(" │ ", style.fg(Color::DarkGray));
            }
            let cell = if name == "th" {
                style.add_modifier(Modifier::BOLD)
            } else {
                style
            };
            walk(element, cell, out);
        }
        "strong" | "b" => walk(element, style.add_modifier(Modifier::BOLD), out),
        "em" | "i" => walk(element, style.add_modifier(Modifier::ITALIC), out),
        "u" | "a" => walk(element, style.add_modifier(Modifier::UNDERLINED), out),
        "code" | "kbd" | "samp" => walk(element, style.fg(Color::Yellow), out),
        _ if BLOCKS.contains(&name) => {
            out.soft_break();
            walk(element, style, out);
            out.soft_break();
        }
        _ => walk(element, style, out),
    }
}
