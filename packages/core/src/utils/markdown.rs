//! Markdown import and export for documents
//!
//! `to_markdown` renders a document as CommonMark; `from_markdown` turns
//! CommonMark back into blocks using `pulldown-cmark`.
//!
//! Mapping:
//!
//! | Block      | Markdown                              |
//! |------------|---------------------------------------|
//! | `h1`..`h3` | `#`, `##`, `###` (deeper levels parse as `h3`) |
//! | `p`        | paragraph; an empty one is `<!-- empty -->` |
//! | `ol`/`ul`  | `1.` / `-` lists (nested items are flattened) |
//! | `code`     | fenced block with info string         |
//! | `callout`  | `> [!INFO]` blockquote                |
//!
//! Exported text is escaped, so a document read back from its own export has
//! the same blocks with the same text. Newlines inside text become hard line
//! breaks. Leading and trailing whitespace of text blocks, empty list items
//! and newlines inside headings are not preserved.
//!
//! Parsed blocks receive fresh ids. Inline formatting in foreign markdown is
//! kept as literal markdown inside the block text. A heading, code block or
//! quote inside a list item ends the list there; remaining items form a new
//! list after it.

use crate::models::{
    Block, BlockKind, BlockValidationError, CalloutVariant, Document, HeadingLevel,
    DEFAULT_CODE_LANGUAGE,
};
use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel as MdHeadingLevel, Parser, Tag, TagEnd};

/// Placeholder written for a paragraph with no text
const EMPTY_PARAGRAPH: &str = "<!-- empty -->";

/// Characters that could start inline markup
const INLINE_SPECIAL: &[char] = &['\\', '`', '*', '_', '[', ']', '<', '&'];

/// Render `document` as CommonMark
pub fn to_markdown(document: &Document) -> String {
    let mut rendered = Vec::with_capacity(document.len());
    let mut alternate = false;
    let mut previous: Option<&BlockKind> = None;

    for block in document {
        // Adjacent lists of the same kind would merge; switch the marker.
        alternate = match (previous, block.kind()) {
            (Some(BlockKind::OrderedList { .. }), BlockKind::OrderedList { .. })
            | (Some(BlockKind::UnorderedList { .. }), BlockKind::UnorderedList { .. }) => {
                !alternate
            }
            _ => false,
        };
        rendered.push(render_block(block, alternate));
        previous = Some(block.kind());
    }

    let mut output = rendered.join("\n\n");
    output.push('\n');
    output
}

fn render_block(block: &Block, alternate: bool) -> String {
    match block.kind() {
        BlockKind::Heading { level, content } => {
            let text = escape_inline(&content.replace('\n', " ")).replace('#', "\\#");
            format!("{} {}", "#".repeat(level.get() as usize), text)
        }
        BlockKind::Paragraph { content } => {
            let content = content.trim_end_matches('\n');
            if content.is_empty() {
                EMPTY_PARAGRAPH.to_string()
            } else {
                flowing_lines(content).join("\\\n")
            }
        }
        BlockKind::OrderedList { items } => {
            let delimiter = if alternate { ')' } else { '.' };
            render_list(items, |index| format!("{}{}", index + 1, delimiter))
        }
        BlockKind::UnorderedList { items } => {
            let bullet = if alternate { "+" } else { "-" };
            render_list(items, |_| bullet.to_string())
        }
        BlockKind::Code { language, content } => {
            let fence = fence_for(content);
            format!("{}{}\n{}\n{}", fence, language, content, fence)
        }
        BlockKind::Callout { variant, content } => {
            let mut lines = vec![format!("> [!{}]", variant.as_str().to_ascii_uppercase())];
            let content = content.trim_end_matches('\n');
            if !content.is_empty() {
                let body = flowing_lines(content);
                let last = body.len() - 1;
                for (index, line) in body.iter().enumerate() {
                    let line_break = if index < last { "\\" } else { "" };
                    lines.push(format!("> {}{}", line, line_break));
                }
            }
            lines.join("\n")
        }
    }
}

fn render_list(items: &[String], marker: impl Fn(usize) -> String) -> String {
    if items.is_empty() {
        return marker(0);
    }

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let marker = marker(index);
            let item = item.trim_end_matches('\n');
            if item.is_empty() {
                return marker;
            }
            let indent = " ".repeat(marker.len() + 1);
            let continuation = format!("\\\n{}", indent);
            format!("{} {}", marker, flowing_lines(item).join(continuation.as_str()))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Escaped lines of paragraph-like text
fn flowing_lines(content: &str) -> Vec<String> {
    content.split('\n').map(escape_line).collect()
}

fn escape_inline(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if INLINE_SPECIAL.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Escape one line of text so it cannot open a block construct
fn escape_line(line: &str) -> String {
    let escaped = escape_inline(line.trim_start());
    match escaped.chars().next() {
        Some('#' | '>' | '-' | '+' | '=' | '~' | '|') => format!("\\{}", escaped),
        Some(c) if c.is_ascii_digit() => {
            let digits = escaped.chars().take_while(|c| c.is_ascii_digit()).count();
            match escaped[digits..].chars().next() {
                Some('.' | ')') => format!("{}\\{}", &escaped[..digits], &escaped[digits..]),
                _ => escaped,
            }
        }
        _ => escaped,
    }
}

/// A backtick fence longer than any backtick run in `content`
fn fence_for(content: &str) -> String {
    let longest = content
        .split(|c| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    "`".repeat(longest.max(2) + 1)
}

/// Parse CommonMark into a document
///
/// # Errors
///
/// `BlockValidationError::EmptyDocument` if the input contains no blocks.
pub fn from_markdown(markdown: &str) -> Result<Document, BlockValidationError> {
    let mut reader = MarkdownReader::default();
    for event in Parser::new(markdown) {
        reader.handle(event);
    }
    Document::new(reader.blocks)
}

#[derive(Debug)]
struct ListBuilder {
    ordered: bool,
    depth: usize,
    items: Vec<String>,
    /// Part of the list was already emitted before an interrupting block
    split: bool,
}

impl ListBuilder {
    fn take_block(&mut self) -> Block {
        let items = std::mem::take(&mut self.items);
        if self.ordered {
            Block::ordered_list(items)
        } else {
            Block::unordered_list(items)
        }
    }
}

#[derive(Debug, Default)]
struct MarkdownReader {
    blocks: Vec<Block>,
    buffer: String,
    code_language: Option<String>,
    list: Option<ListBuilder>,
    quote: Option<Vec<String>>,
}

impl MarkdownReader {
    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.buffer.push_str(&text),
            Event::Code(code) => {
                self.buffer.push('`');
                self.buffer.push_str(&code);
                self.buffer.push('`');
            }
            Event::SoftBreak | Event::HardBreak => self.buffer.push('\n'),
            Event::Html(html)
                if html.trim() == EMPTY_PARAGRAPH && self.list.is_none() && self.quote.is_none() =>
            {
                self.blocks.push(Block::paragraph(""));
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { .. } => self.begin_leaf(),
            Tag::Paragraph if self.list.is_none() => self.buffer.clear(),
            Tag::CodeBlock(kind) => {
                self.begin_leaf();
                let language = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(str::to_string)
                        .unwrap_or_else(|| DEFAULT_CODE_LANGUAGE.to_string()),
                    CodeBlockKind::Indented => DEFAULT_CODE_LANGUAGE.to_string(),
                };
                self.code_language = Some(language);
            }
            Tag::List(start) => {
                // Nested lists flatten into the outermost one.
                self.flush_item();
                match &mut self.list {
                    Some(list) => list.depth += 1,
                    None => {
                        self.list = Some(ListBuilder {
                            ordered: start.is_some(),
                            depth: 1,
                            items: Vec::new(),
                            split: false,
                        });
                    }
                }
            }
            Tag::Item => self.flush_item(),
            Tag::BlockQuote { .. } => {
                self.begin_leaf();
                self.quote = Some(Vec::new());
            }
            Tag::Emphasis => self.buffer.push('*'),
            Tag::Strong => self.buffer.push_str("**"),
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Heading(level) => {
                let content = self.take_buffer();
                self.blocks.push(Block::heading(heading_level(level), content));
            }
            TagEnd::Paragraph => {
                if let Some(paragraphs) = &mut self.quote {
                    let content = std::mem::take(&mut self.buffer);
                    paragraphs.push(content.trim().to_string());
                } else if self.list.is_none() {
                    let content = self.take_buffer();
                    self.blocks.push(Block::paragraph(content));
                }
            }
            TagEnd::CodeBlock => {
                let mut content = std::mem::take(&mut self.buffer);
                if content.ends_with('\n') {
                    content.pop();
                }
                let language = self
                    .code_language
                    .take()
                    .unwrap_or_else(|| DEFAULT_CODE_LANGUAGE.to_string());
                self.blocks.push(Block::code(language, content));
            }
            TagEnd::Item => self.flush_item(),
            TagEnd::List(_) => {
                let finished = match &mut self.list {
                    Some(list) if list.depth > 1 => {
                        list.depth -= 1;
                        false
                    }
                    Some(_) => true,
                    None => false,
                };
                if finished {
                    if let Some(mut list) = self.list.take() {
                        if !list.split || !list.items.is_empty() {
                            self.blocks.push(list.take_block());
                        }
                    }
                }
            }
            TagEnd::BlockQuote { .. } => {
                if let Some(paragraphs) = self.quote.take() {
                    self.blocks.push(callout_from_quote(&paragraphs.join("\n\n")));
                }
            }
            TagEnd::Emphasis => self.buffer.push('*'),
            TagEnd::Strong => self.buffer.push_str("**"),
            _ => {}
        }
    }

    /// Prepare for a block that cannot live inside a list item
    ///
    /// Buffered item text is kept and the items gathered so far are emitted
    /// as their own list block ahead of the new block.
    fn begin_leaf(&mut self) {
        self.flush_item();
        if let Some(list) = &mut self.list {
            if !list.items.is_empty() {
                let block = list.take_block();
                self.blocks.push(block);
            }
            list.split = true;
        }
        self.buffer.clear();
    }

    /// Move buffered item text into the open list
    fn flush_item(&mut self) {
        let text = self.take_buffer();
        if text.is_empty() {
            return;
        }
        if let Some(list) = &mut self.list {
            list.items.push(text);
        }
    }

    fn take_buffer(&mut self) -> String {
        let text = std::mem::take(&mut self.buffer);
        text.trim().to_string()
    }
}

fn heading_level(level: MdHeadingLevel) -> HeadingLevel {
    match level {
        MdHeadingLevel::H1 => HeadingLevel::One,
        MdHeadingLevel::H2 => HeadingLevel::Two,
        _ => HeadingLevel::Three,
    }
}

/// Build a callout from blockquote text, reading an optional `[!VARIANT]` marker
fn callout_from_quote(text: &str) -> Block {
    let marker = text
        .strip_prefix("[!")
        .and_then(|rest| rest.split_once(']'));

    match marker {
        Some((name, rest)) => {
            let variant = name.parse::<CalloutVariant>().unwrap_or_default();
            Block::callout(variant, rest.trim())
        }
        None => Block::callout(CalloutVariant::Info, text),
    }
}
