//! Lexer adapter: turns markdown text into the changelog [`Token`] tree.
//!
//! Raw tokenization is delegated to `pulldown-cmark`. Its event stream is
//! folded into tokens here, keeping the raw source of inline content so that
//! formatting like ``**`name`**`` or links survives a lex/render round trip.

use std::ops::Range;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::token::{CodeToken, ListItemToken, ListToken, Token, Tokens, UnsupportedToken};

/// Lexes markdown text into a normalized token tree.
#[must_use]
pub fn lex(source: &str) -> Tokens {
    let mut builder = TokenBuilder::new(source);
    for (event, range) in Parser::new_ext(source, Options::empty()).into_offset_iter() {
        builder.push_event(event, range);
    }
    let mut tokens = builder.finish();
    assign_list_depths(&mut tokens, 0);
    tokens
}

/// Sets the depth of every list (and its items) to its nesting level.
pub fn assign_list_depths(tokens: &mut [Token], depth: usize) {
    for token in tokens {
        if let Token::List(list) = token {
            list.depth = depth;
            for item in &mut list.items {
                item.depth = depth;
                assign_list_depths(&mut item.tokens, depth + 1);
            }
        }
    }
}

fn heading_depth(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn is_inline_tag(tag: &Tag<'_>) -> bool {
    matches!(
        tag,
        Tag::Emphasis
            | Tag::Strong
            | Tag::Strikethrough
            | Tag::Link { .. }
            | Tag::Image { .. }
    )
}

fn unsupported_kind(tag: &Tag<'_>) -> &'static str {
    match tag {
        Tag::BlockQuote(_) => "blockquote",
        Tag::HtmlBlock => "html",
        Tag::Table(_) | Tag::TableHead | Tag::TableRow | Tag::TableCell => "table",
        Tag::FootnoteDefinition(_) => "footnote_definition",
        Tag::MetadataBlock(_) => "metadata",
        _ => "unknown",
    }
}

#[derive(Debug, Clone, Copy)]
enum InlineBlock {
    Heading(u8),
    Paragraph,
    ItemText,
}

#[derive(Debug)]
struct InlineCapture {
    block: InlineBlock,
    span: Option<Range<usize>>,
}

#[derive(Debug)]
struct CodeCapture {
    lang: String,
    text: String,
}

#[derive(Debug)]
enum Frame {
    List(ListToken),
    Item(ListItemToken),
}

struct TokenBuilder<'a> {
    source: &'a str,
    root: Tokens,
    stack: Vec<Frame>,
    inline: Option<InlineCapture>,
    code: Option<CodeCapture>,
    // nesting depth of an unsupported block whose events are being skipped
    skipping: usize,
    last_block_end: usize,
}

impl<'a> TokenBuilder<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            root: Tokens::new(),
            stack: Vec::new(),
            inline: None,
            code: None,
            skipping: 0,
            last_block_end: 0,
        }
    }

    fn push_event(&mut self, event: Event<'_>, range: Range<usize>) {
        if self.skipping > 0 {
            match event {
                Event::Start(_) => self.skipping += 1,
                Event::End(_) => self.skipping -= 1,
                _ => {}
            }
            return;
        }

        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                self.flush_item_text();
                self.open_block(range.start);
                self.inline = Some(InlineCapture {
                    block: InlineBlock::Heading(heading_depth(level)),
                    span: None,
                });
            }
            Event::Start(Tag::Paragraph) => {
                self.flush_item_text();
                self.open_block(range.start);
                self.inline = Some(InlineCapture {
                    block: InlineBlock::Paragraph,
                    span: None,
                });
            }
            Event::End(TagEnd::Heading(_) | TagEnd::Paragraph) => self.close_inline(range.end),
            Event::Start(Tag::List(start)) => {
                self.flush_item_text();
                self.open_block(range.start);
                self.stack.push(Frame::List(ListToken {
                    ordered: start.is_some(),
                    ..ListToken::default()
                }));
            }
            Event::End(TagEnd::List(_)) => self.close_list(range.end),
            Event::Start(Tag::Item) => self.stack.push(Frame::Item(ListItemToken::default())),
            Event::End(TagEnd::Item) => self.close_item(),
            Event::Start(Tag::CodeBlock(kind)) => {
                self.flush_item_text();
                self.open_block(range.start);
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => {
                        info.split_whitespace().next().unwrap_or_default().to_string()
                    }
                    CodeBlockKind::Indented => String::new(),
                };
                self.code = Some(CodeCapture {
                    lang,
                    text: String::new(),
                });
            }
            Event::End(TagEnd::CodeBlock) => self.close_code(range.end),
            Event::Text(text) if self.code.is_some() => {
                if let Some(code) = self.code.as_mut() {
                    code.text.push_str(&text);
                }
            }
            Event::Start(tag) if is_inline_tag(&tag) => self.extend_inline(range),
            Event::Start(tag) => {
                self.push_unsupported(unsupported_kind(&tag), range);
                self.skipping = 1;
            }
            Event::Rule => self.push_unsupported("thematic_break", range),
            _ => self.extend_inline(range),
        }
    }

    fn finish(mut self) -> Tokens {
        self.flush_item_text();
        while let Some(frame) = self.stack.pop() {
            match frame {
                Frame::Item(item) => self.attach_item(item),
                Frame::List(list) => self.push_token(Token::List(list), self.source.len()),
            }
        }
        self.root
    }

    fn in_item(&self) -> bool {
        matches!(self.stack.last(), Some(Frame::Item(_)))
    }

    /// Called before every block; adds a spacer at the top level when the
    /// previous block does not render its own blank line and one was present.
    fn open_block(&mut self, start: usize) {
        if !self.stack.is_empty() {
            return;
        }
        let needs_spacer = matches!(
            self.root.last(),
            Some(Token::Paragraph(_) | Token::Code(_) | Token::Unsupported(_))
        );
        if needs_spacer && self.has_blank_line(self.last_block_end, start) {
            self.root.push(Token::Space);
        }
    }

    fn has_blank_line(&self, previous_end: usize, next_start: usize) -> bool {
        let content_end = self.source[..previous_end.min(next_start)].trim_end().len();
        self.source[content_end..next_start].matches('\n').count() >= 2
    }

    fn extend_inline(&mut self, range: Range<usize>) {
        if self.inline.is_none() {
            if !self.in_item() {
                return;
            }
            self.inline = Some(InlineCapture {
                block: InlineBlock::ItemText,
                span: None,
            });
        }
        if let Some(capture) = self.inline.as_mut() {
            capture.span = Some(match capture.span.take() {
                Some(span) => span.start.min(range.start)..span.end.max(range.end),
                None => range,
            });
        }
    }

    fn close_inline(&mut self, end: usize) {
        let Some(capture) = self.inline.take() else {
            return;
        };
        let text = capture
            .span
            .map(|span| self.source[span].trim().to_string())
            .unwrap_or_default();
        let token = match capture.block {
            InlineBlock::Heading(depth) => Token::heading(depth, text),
            InlineBlock::Paragraph if self.in_item() => Token::text(text),
            InlineBlock::Paragraph => Token::paragraph(text),
            InlineBlock::ItemText => Token::text(text),
        };
        self.push_token(token, end);
    }

    /// Closes a tight list item's text run before a nested block starts.
    fn flush_item_text(&mut self) {
        if matches!(
            self.inline,
            Some(InlineCapture {
                block: InlineBlock::ItemText,
                ..
            })
        ) {
            self.close_inline(self.last_block_end);
        }
    }

    fn close_code(&mut self, end: usize) {
        let Some(capture) = self.code.take() else {
            return;
        };
        let text = capture
            .text
            .strip_suffix('\n')
            .unwrap_or(&capture.text)
            .to_string();
        self.push_token(
            Token::Code(CodeToken {
                text,
                lang: capture.lang,
            }),
            end,
        );
    }

    fn close_item(&mut self) {
        self.flush_item_text();
        match self.stack.pop() {
            Some(Frame::Item(item)) => self.attach_item(item),
            Some(frame) => self.stack.push(frame),
            None => {}
        }
    }

    fn attach_item(&mut self, mut item: ListItemToken) {
        item.text = item.first_text().unwrap_or_default().to_string();
        match self.stack.last_mut() {
            Some(Frame::List(list)) => list.items.push(item),
            _ => tracing::debug!(text = %item.text, "dropping list item outside of a list"),
        }
    }

    fn close_list(&mut self, end: usize) {
        match self.stack.pop() {
            Some(Frame::List(list)) => self.push_token(Token::List(list), end),
            Some(frame) => self.stack.push(frame),
            None => {}
        }
    }

    fn push_unsupported(&mut self, kind: &str, range: Range<usize>) {
        self.flush_item_text();
        self.open_block(range.start);
        let raw = self.source[range.clone()].trim_end().to_string();
        self.push_token(
            Token::Unsupported(UnsupportedToken {
                kind: kind.to_string(),
                raw,
            }),
            range.end,
        );
    }

    fn push_token(&mut self, token: Token, end: usize) {
        match self.stack.last_mut() {
            Some(Frame::Item(item)) => item.tokens.push(token),
            Some(Frame::List(_)) => {
                tracing::debug!(kind = token.kind(), "dropping token found directly in a list");
            }
            None => {
                self.root.push(token);
                self.last_block_end = end;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::HeadingToken;

    const SAMPLE: &str = "# Changelog

## master

### 🐛 Bug fixes

- Fixed X ([#12](https://github.com/expo/expo/pull/12) by [@alice](https://github.com/alice))
- **`expo-foo`**
  - Fixed Y

## 1.0.0

_This version does not introduce any user-facing changes._
";

    #[test]
    fn test_lex_headings() {
        let tokens = lex(SAMPLE);

        assert_eq!(
            tokens[0],
            Token::Heading(HeadingToken {
                depth: 1,
                text: "Changelog".to_string()
            })
        );
        assert_eq!(tokens[1], Token::heading(2, "master"));
        assert_eq!(tokens[2], Token::heading(3, "🐛 Bug fixes"));
        assert_eq!(tokens[4], Token::heading(2, "1.0.0"));
    }

    #[test]
    fn test_lex_keeps_inline_source() {
        let tokens = lex(SAMPLE);
        let Token::List(list) = &tokens[3] else {
            panic!("expected a list, got {:?}", tokens[3]);
        };

        assert_eq!(
            list.items[0].text,
            "Fixed X ([#12](https://github.com/expo/expo/pull/12) by [@alice](https://github.com/alice))"
        );
        assert_eq!(list.items[1].text, "**`expo-foo`**");
        assert_eq!(
            tokens[5],
            Token::paragraph("_This version does not introduce any user-facing changes._")
        );
    }

    #[test]
    fn test_lex_assigns_list_depths() {
        let tokens = lex(SAMPLE);
        let Token::List(list) = &tokens[3] else {
            panic!("expected a list");
        };

        assert_eq!(list.depth, 0);
        assert!(list.items.iter().all(|item| item.depth == 0));

        let group = &list.items[1];
        let Token::List(nested) = &group.tokens[1] else {
            panic!("expected a nested list");
        };
        assert_eq!(nested.depth, 1);
        assert_eq!(nested.items[0].depth, 1);
        assert_eq!(nested.items[0].tokens, vec![Token::text("Fixed Y")]);
    }

    #[test]
    fn test_lex_ordered_list() {
        let tokens = lex("1. first\n2. second\n");
        let Token::List(list) = &tokens[0] else {
            panic!("expected a list");
        };

        assert!(list.ordered);
        assert_eq!(list.items.len(), 2);
        assert_eq!(list.items[1].text, "second");
    }

    #[test]
    fn test_lex_code_block() {
        let tokens = lex("```sh\nyarn add expo\n```\n");

        assert_eq!(tokens, vec![Token::code("yarn add expo", "sh")]);
    }

    #[test]
    fn test_lex_space_after_paragraph() {
        let tokens = lex("Intro text.\n\n## master\n");

        assert_eq!(
            tokens,
            vec![
                Token::paragraph("Intro text."),
                Token::Space,
                Token::heading(2, "master"),
            ]
        );
    }

    #[test]
    fn test_lex_unsupported_block() {
        let tokens = lex("> quoted\n\n## master\n");

        assert_eq!(tokens[0].kind(), "blockquote");
        assert_eq!(tokens.last(), Some(&Token::heading(2, "master")));
    }

    #[test]
    fn test_lex_empty_input() {
        assert!(lex("").is_empty());
    }
}
