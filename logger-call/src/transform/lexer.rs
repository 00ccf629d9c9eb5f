//! JavaScript lexer and token tree builder.
//!
//! The lexer only needs to be exact about token boundaries: where strings,
//! comments, templates and regular expressions start and end, and which
//! brackets pair up. Everything inside them is opaque, which is what keeps a
//! name inside `"logger.log(1)"` from ever looking like code.

use crate::error::{SyntaxError, SyntaxErrorKind};
use crate::transform::token::{
    is_ident_part, is_ident_start, Delimiter, Group, Span, Token, TokenFlags, TokenKind, TokenTree,
};

const PUNCTUATORS: &[&str] = &[
    ">>>=", "...", "===", "!==", "**=", "<<=", ">>=", ">>>", "&&=", "||=", "??=", "=>", "==",
    "!=", "<=", ">=", "&&", "||", "??", "?.", "++", "--", "+=", "-=", "*=", "/=", "%=", "&=",
    "|=", "^=", "**", "<<", ">>", ";", ",", "<", ">", "+", "-", "*", "/", "%", "&", "|", "^",
    "!", "~", "?", ":", "=", ".", "@", "#",
];

/// Keywords after which a `/` starts a regular expression.
const EXPRESSION_KEYWORDS: &[&str] = &[
    "return", "typeof", "instanceof", "in", "of", "new", "delete", "void", "throw", "case", "do",
    "else", "yield", "await",
];

/// Keywords whose parenthesized head is followed by a statement.
const CONDITION_KEYWORDS: &[&str] = &["if", "while", "for", "with"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BraceKind {
    Block,
    Substitution,
}

struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    newline: bool,
    braces: Vec<BraceKind>,
    // One entry per open `(`: whether it starts a statement head.
    parens: Vec<bool>,
    // Start of the last `)` that closed a statement head.
    condition_close: Option<usize>,
    tokens: Vec<Token>,
}

/// Split `source` into tokens.
pub fn tokenize(source: &str) -> Result<Vec<Token>, SyntaxError> {
    let mut lexer = Lexer {
        source,
        pos: 0,
        newline: false,
        braces: Vec::new(),
        parens: Vec::new(),
        condition_close: None,
        tokens: Vec::new(),
    };
    lexer.run()?;
    Ok(lexer.tokens)
}

/// Tokenize `source` and pair up its delimiters into token trees.
pub fn parse_trees(source: &str) -> Result<Vec<TokenTree>, SyntaxError> {
    build_trees(tokenize(source)?)
}

impl<'a> Lexer<'a> {
    fn rest(&self) -> &'a str {
        self.source.get(self.pos..).unwrap_or_default()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn error(&self, kind: SyntaxErrorKind, offset: usize) -> SyntaxError {
        SyntaxError::new(kind, offset)
    }

    fn run(&mut self) -> Result<(), SyntaxError> {
        if self.rest().starts_with("#!") {
            self.skip_line();
        }
        loop {
            self.skip_trivia()?;
            let start = self.pos;
            let Some(c) = self.peek() else {
                return Ok(());
            };
            let kind = match c {
                '`' => {
                    self.bump();
                    self.template_chunk(start, true)?
                }
                '}' if self.braces.last() == Some(&BraceKind::Substitution) => {
                    self.braces.pop();
                    self.bump();
                    self.template_chunk(start, false)?
                }
                '"' | '\'' => self.string(start, c)?,
                '/' if self.regex_allowed() => self.regex(start)?,
                '.' if self.peek_second().is_some_and(|n| n.is_ascii_digit()) => self.number(),
                c if c.is_ascii_digit() => self.number(),
                c if is_ident_start(c) => self.ident(),
                '(' | ')' | '[' | ']' | '{' | '}' => {
                    self.bump();
                    match c {
                        '(' => {
                            let head = self
                                .keyword_before()
                                .is_some_and(|word| CONDITION_KEYWORDS.contains(&word));
                            self.parens.push(head);
                            TokenKind::OpenParen
                        }
                        ')' => {
                            if self.parens.pop() == Some(true) {
                                self.condition_close = Some(start);
                            }
                            TokenKind::CloseParen
                        }
                        '[' => TokenKind::OpenBracket,
                        ']' => TokenKind::CloseBracket,
                        '{' => {
                            self.braces.push(BraceKind::Block);
                            TokenKind::OpenBrace
                        }
                        _ => {
                            self.braces.pop();
                            TokenKind::CloseBrace
                        }
                    }
                }
                _ => self.punct(start, c)?,
            };
            let flags = if std::mem::take(&mut self.newline) {
                TokenFlags::NEWLINE_BEFORE
            } else {
                TokenFlags::DEFAULT
            };
            self.tokens.push(Token {
                kind,
                span: Span::new(start, self.pos),
                flags,
            });
        }
    }

    fn skip_line(&mut self) {
        while let Some(c) = self.peek() {
            if is_line_terminator(c) {
                break;
            }
            self.bump();
        }
    }

    fn skip_trivia(&mut self) -> Result<(), SyntaxError> {
        while let Some(c) = self.peek() {
            if is_line_terminator(c) {
                self.newline = true;
                self.bump();
            } else if c.is_whitespace() || c == '\u{feff}' {
                self.bump();
            } else if self.rest().starts_with("//") {
                self.skip_line();
            } else if self.rest().starts_with("/*") {
                let start = self.pos;
                let body = self.rest().get(2..).unwrap_or_default();
                let Some(end) = body.find("*/") else {
                    return Err(self.error(SyntaxErrorKind::UnterminatedComment, start));
                };
                if body.get(..end).unwrap_or_default().chars().any(is_line_terminator) {
                    self.newline = true;
                }
                self.pos += 2 + end + 2;
            } else {
                break;
            }
        }
        Ok(())
    }

    /// The last token as a keyword: an identifier that is not a member name.
    fn keyword_before(&self) -> Option<&'a str> {
        let (last, before) = match self.tokens.as_slice() {
            [.., before, last] => (last, Some(before)),
            [last] => (last, None),
            [] => return None,
        };
        let member = before.is_some_and(|token| {
            token.kind == TokenKind::Punct && matches!(token.span.text(self.source), "." | "?.")
        });
        (last.kind == TokenKind::Ident && !member).then(|| last.span.text(self.source))
    }

    fn regex_allowed(&self) -> bool {
        let Some(last) = self.tokens.last() else {
            return true;
        };
        match last.kind {
            TokenKind::Ident => self
                .keyword_before()
                .is_some_and(|word| EXPRESSION_KEYWORDS.contains(&word)),
            TokenKind::Punct => !matches!(last.span.text(self.source), "++" | "--"),
            TokenKind::CloseParen => self.condition_close == Some(last.span.start),
            TokenKind::Number
            | TokenKind::String
            | TokenKind::Regex
            | TokenKind::Template
            | TokenKind::TemplateTail
            | TokenKind::CloseBracket => false,
            TokenKind::CloseBrace
            | TokenKind::TemplateHead
            | TokenKind::TemplateMiddle
            | TokenKind::OpenParen
            | TokenKind::OpenBracket
            | TokenKind::OpenBrace => true,
        }
    }

    /// Scan template text up to the closing backtick or the next `${`.
    fn template_chunk(&mut self, start: usize, head: bool) -> Result<TokenKind, SyntaxError> {
        loop {
            match self.bump() {
                None => return Err(self.error(SyntaxErrorKind::UnterminatedTemplate, start)),
                Some('\\') => {
                    self.bump();
                }
                Some('`') => {
                    return Ok(if head {
                        TokenKind::Template
                    } else {
                        TokenKind::TemplateTail
                    });
                }
                Some('$') if self.peek() == Some('{') => {
                    self.bump();
                    self.braces.push(BraceKind::Substitution);
                    return Ok(if head {
                        TokenKind::TemplateHead
                    } else {
                        TokenKind::TemplateMiddle
                    });
                }
                Some(_) => {}
            }
        }
    }

    fn string(&mut self, start: usize, quote: char) -> Result<TokenKind, SyntaxError> {
        self.bump();
        loop {
            match self.bump() {
                None => return Err(self.error(SyntaxErrorKind::UnterminatedString, start)),
                Some('\\') => {
                    self.bump();
                }
                Some(c) if c == quote => return Ok(TokenKind::String),
                Some('\n') | Some('\r') => {
                    return Err(self.error(SyntaxErrorKind::UnterminatedString, start));
                }
                Some(_) => {}
            }
        }
    }

    fn regex(&mut self, start: usize) -> Result<TokenKind, SyntaxError> {
        self.bump();
        let mut in_class = false;
        loop {
            match self.bump() {
                None => return Err(self.error(SyntaxErrorKind::UnterminatedRegex, start)),
                Some(c) if is_line_terminator(c) => {
                    return Err(self.error(SyntaxErrorKind::UnterminatedRegex, start));
                }
                Some('\\') => {
                    self.bump();
                }
                Some('[') => in_class = true,
                Some(']') => in_class = false,
                Some('/') if !in_class => break,
                Some(_) => {}
            }
        }
        while self.peek().is_some_and(is_ident_part) {
            self.bump();
        }
        Ok(TokenKind::Regex)
    }

    fn number(&mut self) -> TokenKind {
        let radix = {
            let rest = self.rest();
            ["0x", "0X", "0b", "0B", "0o", "0O"]
                .iter()
                .any(|prefix| rest.starts_with(prefix))
        };
        while let Some(c) = self.peek() {
            if !(c.is_ascii_alphanumeric() || c == '_' || c == '.') {
                break;
            }
            self.bump();
            if !radix && (c == 'e' || c == 'E') && matches!(self.peek(), Some('+') | Some('-')) {
                self.bump();
            }
        }
        TokenKind::Number
    }

    fn ident(&mut self) -> TokenKind {
        while self.peek().is_some_and(is_ident_part) {
            self.bump();
        }
        TokenKind::Ident
    }

    fn punct(&mut self, start: usize, c: char) -> Result<TokenKind, SyntaxError> {
        let rest = self.rest();
        let matched = PUNCTUATORS.iter().find(|p| {
            rest.starts_with(**p)
                // `a?.5:b` is a conditional, not optional chaining.
                && !(**p == "?." && rest.chars().nth(2).is_some_and(|n| n.is_ascii_digit()))
        });
        match matched {
            Some(p) => {
                self.pos += p.len();
                Ok(TokenKind::Punct)
            }
            None => Err(self.error(SyntaxErrorKind::UnexpectedChar(c), start)),
        }
    }
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

fn open_delimiter(kind: TokenKind) -> Option<Delimiter> {
    match kind {
        TokenKind::OpenParen => Some(Delimiter::Paren),
        TokenKind::OpenBracket => Some(Delimiter::Bracket),
        TokenKind::OpenBrace => Some(Delimiter::Brace),
        TokenKind::TemplateHead => Some(Delimiter::Template),
        _ => None,
    }
}

fn close_delimiter(kind: TokenKind) -> Option<Delimiter> {
    match kind {
        TokenKind::CloseParen => Some(Delimiter::Paren),
        TokenKind::CloseBracket => Some(Delimiter::Bracket),
        TokenKind::CloseBrace => Some(Delimiter::Brace),
        TokenKind::TemplateTail => Some(Delimiter::Template),
        _ => None,
    }
}

/// Pair up delimiters into groups.
pub fn build_trees(tokens: Vec<Token>) -> Result<Vec<TokenTree>, SyntaxError> {
    let mut stack: Vec<(Delimiter, Token, Vec<TokenTree>)> = Vec::new();
    let mut current: Vec<TokenTree> = Vec::new();

    for token in tokens {
        if let Some(delimiter) = open_delimiter(token.kind) {
            stack.push((delimiter, token, std::mem::take(&mut current)));
        } else if let Some(close) = close_delimiter(token.kind) {
            let Some((open, open_token, parent)) = stack.pop() else {
                return Err(SyntaxError::new(
                    SyntaxErrorKind::UnexpectedClose(close),
                    token.span.start,
                ));
            };
            if open != close {
                return Err(SyntaxError::new(
                    SyntaxErrorKind::MismatchedClose { open, close },
                    token.span.start,
                ));
            }
            let trees = std::mem::replace(&mut current, parent);
            current.push(TokenTree::Group(Group {
                delimiter: open,
                open: open_token.span,
                close: token.span,
                flags: open_token.flags,
                trees,
            }));
        } else if token.kind == TokenKind::TemplateMiddle {
            if !matches!(stack.last(), Some((Delimiter::Template, _, _))) {
                return Err(SyntaxError::new(
                    SyntaxErrorKind::UnexpectedClose(Delimiter::Brace),
                    token.span.start,
                ));
            }
            current.push(TokenTree::Leaf(token));
        } else {
            current.push(TokenTree::Leaf(token));
        }
    }

    match stack.pop() {
        Some((delimiter, open, _)) => Err(SyntaxError::new(
            SyntaxErrorKind::Unclosed(delimiter),
            open.span.start,
        )),
        None => Ok(current),
    }
}
