//! Renders a token tree back to canonical markdown.

use crate::error::{ChangelogError, Result};
use crate::token::{CodeToken, HeadingToken, ListItemToken, ListToken, Token};

const EOL: &str = "\n";
const INDENT_UNIT: &str = "  ";

/// Per-token rendering state.
#[derive(Debug, Clone, Copy, Default)]
struct RenderContext {
    indent: usize,
    ordered_list: bool,
    item_index: usize,
}

/// Markdown renderer for the changelog token subset.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl MarkdownRenderer {
    /// Renders `tokens` to markdown ending with exactly one line break.
    ///
    /// # Errors
    ///
    /// Returns [`ChangelogError::UnsupportedTokenKind`] when the tree holds a
    /// token outside the modeled subset.
    pub fn render(&self, tokens: &[Token]) -> Result<String> {
        let mut output = String::with_capacity(tokens.len() * 32);
        for token in tokens {
            output.push_str(&self.render_token(token, RenderContext::default())?);
        }
        let decoded = html_escape::decode_html_entities(&output);
        Ok(format!("{}{EOL}", decoded.trim_end()))
    }

    fn render_token(&self, token: &Token, ctx: RenderContext) -> Result<String> {
        match token {
            Token::Heading(heading) => Ok(self.heading(heading)),
            Token::List(list) => self.list(list, ctx),
            Token::ListItem(item) => self.list_item(item, ctx),
            Token::Paragraph(paragraph) => Ok(format!("{}{EOL}", paragraph.text)),
            Token::Text(text) => Ok(text.text.clone()),
            Token::Space => Ok(EOL.to_string()),
            Token::Code(code) => Ok(self.code(code, ctx)),
            Token::Unsupported(token) => {
                Err(ChangelogError::UnsupportedTokenKind(token.kind.clone()))
            }
        }
    }

    fn heading(&self, heading: &HeadingToken) -> String {
        format!(
            "{} {}{EOL}{EOL}",
            "#".repeat(usize::from(heading.depth)),
            heading.text
        )
    }

    fn list(&self, list: &ListToken, ctx: RenderContext) -> Result<String> {
        let mut output = String::new();
        for (index, item) in list.items.iter().enumerate() {
            let item_ctx = RenderContext {
                ordered_list: list.ordered,
                item_index: index + 1,
                ..ctx
            };
            output.push_str(&self.list_item(item, item_ctx)?);
        }
        output.push_str(EOL);
        Ok(output)
    }

    fn list_item(&self, item: &ListItemToken, ctx: RenderContext) -> Result<String> {
        let bullet = if ctx.ordered_list {
            format!("{}.", ctx.item_index.max(1))
        } else {
            "-".to_string()
        };
        let mut output = format!("{}{bullet} ", INDENT_UNIT.repeat(item.depth));
        let child_ctx = RenderContext {
            indent: item.depth + 1,
            ..ctx
        };
        for child in &item.tokens {
            output.push_str(self.render_token(child, child_ctx)?.trim_end());
            output.push_str(EOL);
        }
        Ok(format!("{}{EOL}", output.trim_end()))
    }

    fn code(&self, code: &CodeToken, ctx: RenderContext) -> String {
        let indent = INDENT_UNIT.repeat(ctx.indent);
        let fence_open = format!("```{}", code.lang);
        let lines: Vec<String> = std::iter::once(fence_open.as_str())
            .chain(code.text.split(EOL))
            .chain(std::iter::once("```"))
            .map(|line| format!("{indent}{line}"))
            .collect();
        format!("{}{EOL}", lines.join(EOL))
    }
}

/// Renders `tokens` with the default [`MarkdownRenderer`].
///
/// # Errors
///
/// See [`MarkdownRenderer::render`].
pub fn render(tokens: &[Token]) -> Result<String> {
    MarkdownRenderer.render(tokens)
}
