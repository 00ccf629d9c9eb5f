//! Tokens and token trees produced by the lexer.

use bitflags::bitflags;
use std::fmt;
use strum_macros::Display;

/// Byte range into the source text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    pub fn to(self, other: Span) -> Span {
        Span::new(self.start, other.end)
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.start..self.end).unwrap_or_default()
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct TokenFlags: u8 {
        const DEFAULT = 0;
        // A line terminator separates this token from the previous one.
        const NEWLINE_BEFORE = 1;
    }
}

#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
pub enum TokenKind {
    Ident,
    Punct,
    Number,
    String,
    Regex,
    /// A template literal without substitutions.
    Template,
    /// `` `…${ ``, which opens a template group.
    TemplateHead,
    /// `}…${` between two substitutions.
    TemplateMiddle,
    /// `` }…` ``, which closes a template group.
    TemplateTail,
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    OpenBrace,
    CloseBrace,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub flags: TokenFlags,
}

impl Token {
    pub fn newline_before(&self) -> bool {
        self.flags.contains(TokenFlags::NEWLINE_BEFORE)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delimiter {
    Paren,
    Bracket,
    Brace,
    Template,
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pair = match self {
            Delimiter::Paren => "()",
            Delimiter::Bracket => "[]",
            Delimiter::Brace => "{}",
            Delimiter::Template => "``",
        };
        f.write_str(pair)
    }
}

/// A delimited sequence of trees. For templates the substitutions are the
/// children, separated by `TemplateMiddle` leaves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    pub delimiter: Delimiter,
    pub open: Span,
    pub close: Span,
    pub flags: TokenFlags,
    pub trees: Vec<TokenTree>,
}

impl Group {
    pub fn span(&self) -> Span {
        self.open.to(self.close)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenTree {
    Leaf(Token),
    Group(Group),
}

impl TokenTree {
    pub fn span(&self) -> Span {
        match self {
            TokenTree::Leaf(token) => token.span,
            TokenTree::Group(group) => group.span(),
        }
    }

    pub fn flags(&self) -> TokenFlags {
        match self {
            TokenTree::Leaf(token) => token.flags,
            TokenTree::Group(group) => group.flags,
        }
    }

    pub fn newline_before(&self) -> bool {
        self.flags().contains(TokenFlags::NEWLINE_BEFORE)
    }

    /// The identifier text, if this is an identifier (keywords included).
    pub fn ident<'a>(&self, source: &'a str) -> Option<&'a str> {
        match self {
            TokenTree::Leaf(token) if token.kind == TokenKind::Ident => Some(token.span.text(source)),
            _ => None,
        }
    }

    pub fn is_ident(&self, source: &str, name: &str) -> bool {
        self.ident(source) == Some(name)
    }

    pub fn is_punct(&self, source: &str, punct: &str) -> bool {
        matches!(self, TokenTree::Leaf(token)
            if token.kind == TokenKind::Punct && token.span.text(source) == punct)
    }

    pub fn group(&self) -> Option<&Group> {
        match self {
            TokenTree::Group(group) => Some(group),
            TokenTree::Leaf(_) => None,
        }
    }

    pub fn group_of(&self, delimiter: Delimiter) -> Option<&Group> {
        self.group().filter(|g| g.delimiter == delimiter)
    }

    pub fn leaf(&self) -> Option<&Token> {
        match self {
            TokenTree::Leaf(token) => Some(token),
            TokenTree::Group(_) => None,
        }
    }
}

/// Reserved words that can never name a binding.
pub const RESERVED_WORDS: &[&str] = &[
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for", "function",
    "if", "import", "in", "instanceof", "new", "null", "return", "super", "switch", "this",
    "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
];

pub fn is_reserved(word: &str) -> bool {
    RESERVED_WORDS.contains(&word)
}

pub fn is_ident_start(c: char) -> bool {
    c == '$' || c == '_' || c.is_alphabetic()
}

pub fn is_ident_part(c: char) -> bool {
    is_ident_start(c) || c.is_alphanumeric() || c == '\u{200c}' || c == '\u{200d}'
}
