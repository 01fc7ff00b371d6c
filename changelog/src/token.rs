//! Token model for the changelog subset of markdown.
//!
//! A document is an ordered sequence of [`Token`]s. Only the constructs
//! changelogs actually use are modeled; anything else the lexer meets is kept
//! as [`Token::Unsupported`] so that rendering it fails loudly instead of
//! silently dropping content.

/// Ordered token sequence, in document order.
pub type Tokens = Vec<Token>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Heading(HeadingToken),
    List(ListToken),
    ListItem(ListItemToken),
    Paragraph(ParagraphToken),
    Text(TextToken),
    Space,
    Code(CodeToken),
    Unsupported(UnsupportedToken),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingToken {
    pub depth: u8,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListToken {
    pub depth: usize,
    pub ordered: bool,
    pub items: Vec<ListItemToken>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListItemToken {
    pub depth: usize,
    pub text: String,
    pub tokens: Tokens,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParagraphToken {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextToken {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeToken {
    pub text: String,
    pub lang: String,
}

/// A block the changelog model does not cover (block quote, table, raw HTML, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedToken {
    pub kind: String,
    pub raw: String,
}

impl Token {
    pub fn heading(depth: u8, text: impl Into<String>) -> Self {
        Self::Heading(HeadingToken {
            depth,
            text: text.into(),
        })
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::Paragraph(ParagraphToken { text: text.into() })
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(TextToken { text: text.into() })
    }

    pub fn code(text: impl Into<String>, lang: impl Into<String>) -> Self {
        Self::Code(CodeToken {
            text: text.into(),
            lang: lang.into(),
        })
    }

    /// Name of the token kind, as reported in render errors.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::Heading(_) => "heading",
            Self::List(_) => "list",
            Self::ListItem(_) => "list_item",
            Self::Paragraph(_) => "paragraph",
            Self::Text(_) => "text",
            Self::Space => "space",
            Self::Code(_) => "code",
            Self::Unsupported(token) => &token.kind,
        }
    }

    #[must_use]
    pub fn as_heading(&self) -> Option<&HeadingToken> {
        match self {
            Self::Heading(heading) => Some(heading),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_heading(&self) -> bool {
        matches!(self, Self::Heading(_))
    }

    /// True for a heading of exactly `depth`.
    #[must_use]
    pub fn is_heading_of_depth(&self, depth: u8) -> bool {
        self.as_heading().is_some_and(|heading| heading.depth == depth)
    }
}

impl ListToken {
    #[must_use]
    pub fn new(depth: usize) -> Self {
        Self {
            depth,
            ..Self::default()
        }
    }
}

impl ListItemToken {
    /// Plain entry item: a single text child holding `text`.
    pub fn new(text: impl Into<String>, depth: usize) -> Self {
        let text = text.into();
        Self {
            depth,
            tokens: vec![Token::text(text.clone())],
            text,
        }
    }

    /// Text of the first child when it is a text token.
    #[must_use]
    pub fn first_text(&self) -> Option<&str> {
        match self.tokens.first() {
            Some(Token::Text(text)) => Some(text.text.as_str()),
            _ => None,
        }
    }

    /// Nested list owned by this item, created when missing.
    pub fn sub_list_mut(&mut self) -> &mut ListToken {
        let depth = self.depth + 1;
        let index = match self
            .tokens
            .iter()
            .position(|token| matches!(token, Token::List(_)))
        {
            Some(index) => index,
            None => {
                self.tokens.push(Token::List(ListToken::new(depth)));
                self.tokens.len() - 1
            }
        };
        match &mut self.tokens[index] {
            Token::List(list) => list,
            other => unreachable!("expected a list token, found {}", other.kind()),
        }
    }
}
