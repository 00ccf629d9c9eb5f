//! Import and re-export discovery.

use std::sync::OnceLock;

use regex::Regex;

use crate::transform::token::{Delimiter, Span, TokenKind, TokenTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    /// `import x, { a as b } from "m"` or `import * as ns from "m"`.
    Static,
    /// `import "m"`.
    SideEffect,
    /// `export { a } from "m"` or `export * from "m"`.
    ReExport,
    /// `import("m")` or `import(expr)`.
    Dynamic,
}

/// One name introduced by an import clause. `imported` is `default` for a
/// default import and `*` for a namespace import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportName {
    pub imported: String,
    pub local: String,
}

impl ImportName {
    pub fn is_namespace(&self) -> bool {
        self.imported == "*"
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRecord {
    pub kind: ImportKind,
    /// The whole statement, including a trailing semicolon.
    pub span: Span,
    /// The unescaped module specifier; `None` for a computed dynamic import.
    pub specifier: Option<String>,
    pub names: Vec<ImportName>,
}

impl ImportRecord {
    /// Whether the specifier is a string known before the module runs.
    pub fn is_static(&self) -> bool {
        self.kind != ImportKind::Dynamic && self.specifier.is_some()
    }

    /// Local names bound by default and named imports.
    pub fn local_names(&self) -> Vec<&str> {
        self.names
            .iter()
            .filter(|name| !name.is_namespace())
            .map(|name| name.local.as_str())
            .collect()
    }
}

fn import_hint() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"\b(import|export)\b").ok())
        .as_ref()
}

/// Compile the module-syntax pre-check ahead of the first file.
pub fn warm_up() {
    let _ = import_hint();
}

/// Cheap textual test for module syntax. A file that fails it has no imports.
pub fn may_have_imports(source: &str) -> bool {
    import_hint().map_or(true, |pattern| pattern.is_match(source))
}

/// List static imports, re-exports and dynamic imports in source order.
pub fn scan_imports(source: &str, trees: &[TokenTree]) -> Vec<ImportRecord> {
    let mut records = Vec::new();
    let mut pos = 0;
    while let Some(tree) = trees.get(pos) {
        let next = if tree.is_ident(source, "import") {
            static_import(source, trees, pos, &mut records)
        } else if tree.is_ident(source, "export") {
            re_export(source, trees, pos, &mut records)
        } else {
            None
        };
        pos = next.unwrap_or(pos + 1);
    }
    dynamic_imports(source, trees, &mut records);
    records.sort_by_key(|record| record.span.start);
    records
}

fn string_at(source: &str, trees: &[TokenTree], pos: usize) -> Option<(String, Span)> {
    match trees.get(pos) {
        Some(TokenTree::Leaf(token)) if token.kind == TokenKind::String => {
            Some((unescape_string(token.span.text(source)), token.span))
        }
        _ => None,
    }
}

/// The end of an import-like statement whose specifier is at `pos`.
fn statement_end(source: &str, trees: &[TokenTree], pos: usize, specifier: Span) -> (usize, usize) {
    let mut next = pos + 1;
    let mut end = specifier.end;
    let attributes = trees
        .get(next)
        .and_then(|t| t.ident(source))
        .is_some_and(|w| w == "with" || w == "assert");
    if attributes {
        if let Some(group) = trees.get(next + 1).and_then(|t| t.group_of(Delimiter::Brace)) {
            end = group.close.end;
            next += 2;
        }
    }
    if let Some(semi) = trees.get(next).filter(|t| t.is_punct(source, ";")) {
        end = semi.span().end;
        next += 1;
    }
    (next, end)
}

fn static_import(
    source: &str,
    trees: &[TokenTree],
    pos: usize,
    records: &mut Vec<ImportRecord>,
) -> Option<usize> {
    let start = trees.get(pos)?.span().start;
    let mut at = pos + 1;
    let mut names = Vec::new();

    if let Some((specifier, span)) = string_at(source, trees, at) {
        let (next, end) = statement_end(source, trees, at, span);
        records.push(ImportRecord {
            kind: ImportKind::SideEffect,
            span: Span::new(start, end),
            specifier: Some(specifier),
            names,
        });
        return Some(next);
    }

    loop {
        let tree = trees.get(at)?;
        if tree.is_ident(source, "from") {
            break;
        }
        if let Some(group) = tree.group_of(Delimiter::Brace) {
            names.extend(named_clause(source, &group.trees));
        } else if tree.is_punct(source, "*") {
            let local = trees.get(at + 2).and_then(|t| t.ident(source))?;
            names.push(ImportName {
                imported: "*".to_string(),
                local: local.to_string(),
            });
            at += 2;
        } else if let Some(local) = tree.ident(source) {
            names.push(ImportName {
                imported: "default".to_string(),
                local: local.to_string(),
            });
        } else if !tree.is_punct(source, ",") {
            return None;
        }
        at += 1;
    }

    let (specifier, span) = string_at(source, trees, at + 1)?;
    let (next, end) = statement_end(source, trees, at + 1, span);
    records.push(ImportRecord {
        kind: ImportKind::Static,
        span: Span::new(start, end),
        specifier: Some(specifier),
        names,
    });
    Some(next)
}

/// `{ a, b as c, "d" as e, default as f }`.
fn named_clause(source: &str, trees: &[TokenTree]) -> Vec<ImportName> {
    trees
        .split(|t| t.is_punct(source, ","))
        .filter_map(|specifier| {
            let imported = match specifier.first()? {
                TokenTree::Leaf(token) if token.kind == TokenKind::String => {
                    unescape_string(token.span.text(source))
                }
                tree => tree.ident(source)?.to_string(),
            };
            let local = match specifier {
                [_, as_kw, local] if as_kw.is_ident(source, "as") => local.ident(source)?.to_string(),
                [_] => imported.clone(),
                _ => return None,
            };
            Some(ImportName { imported, local })
        })
        .collect()
}

fn re_export(
    source: &str,
    trees: &[TokenTree],
    pos: usize,
    records: &mut Vec<ImportRecord>,
) -> Option<usize> {
    let start = trees.get(pos)?.span().start;
    let mut at = pos + 1;
    let head = trees.get(at)?;
    if head.is_punct(source, "*") {
        if trees.get(at + 1).is_some_and(|t| t.is_ident(source, "as")) {
            at += 2;
        }
    } else if head.group_of(Delimiter::Brace).is_none() {
        return None;
    }
    if !trees.get(at + 1)?.is_ident(source, "from") {
        return None;
    }
    let (specifier, span) = string_at(source, trees, at + 2)?;
    let (next, end) = statement_end(source, trees, at + 2, span);
    records.push(ImportRecord {
        kind: ImportKind::ReExport,
        span: Span::new(start, end),
        specifier: Some(specifier),
        names: Vec::new(),
    });
    Some(next)
}

fn dynamic_imports(source: &str, trees: &[TokenTree], records: &mut Vec<ImportRecord>) {
    for (at, tree) in trees.iter().enumerate() {
        if let Some(group) = tree.group() {
            dynamic_imports(source, &group.trees, records);
            continue;
        }
        if !tree.is_ident(source, "import") {
            continue;
        }
        let member = at
            .checked_sub(1)
            .and_then(|prev| trees.get(prev))
            .is_some_and(|prev| prev.is_punct(source, ".") || prev.is_punct(source, "?."));
        let Some(args) = trees.get(at + 1).and_then(|t| t.group_of(Delimiter::Paren)) else {
            continue;
        };
        if member {
            continue;
        }
        let first_argument = args.trees.split(|t| t.is_punct(source, ",")).next();
        let specifier = match first_argument {
            Some([TokenTree::Leaf(token)]) if token.kind == TokenKind::String => {
                Some(unescape_string(token.span.text(source)))
            }
            _ => None,
        };
        records.push(ImportRecord {
            kind: ImportKind::Dynamic,
            span: tree.span().to(args.close),
            specifier,
            names: Vec::new(),
        });
    }
}

/// Decode a quoted string literal, quotes included in `raw`.
pub fn unescape_string(raw: &str) -> String {
    let inner = raw
        .get(1..raw.len().saturating_sub(1))
        .unwrap_or_default();
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(escaped) = chars.next() else {
            break;
        };
        match escaped {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' => out.push('\0'),
            'x' => {
                let hex: String = chars.by_ref().take(2).collect();
                push_code_point(&mut out, &hex);
            }
            'u' if chars.peek() == Some(&'{') => {
                chars.next();
                let hex: String = chars.by_ref().take_while(|c| *c != '}').collect();
                push_code_point(&mut out, &hex);
            }
            'u' => {
                let hex: String = chars.by_ref().take(4).collect();
                push_code_point(&mut out, &hex);
            }
            // Line continuation.
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            '\n' | '\u{2028}' | '\u{2029}' => {}
            other => out.push(other),
        }
    }
    out
}

fn push_code_point(out: &mut String, hex: &str) {
    let decoded = u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
    out.push(decoded.unwrap_or(char::REPLACEMENT_CHARACTER));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::lexer::parse_trees;

    fn scan(source: &str) -> Vec<ImportRecord> {
        parse_trees(source)
            .map(|trees| scan_imports(source, &trees))
            .unwrap_or_default()
    }

    #[test]
    fn test_named_and_default_imports() {
        let source = r#"import log, { logger, debug as d, "weird name" as w } from "/src/logger";"#;
        let records = scan(source);
        assert_eq!(records.len(), 1);
        let record = records.first();
        assert_eq!(record.map(|r| r.kind), Some(ImportKind::Static));
        assert_eq!(record.and_then(|r| r.specifier.as_deref()), Some("/src/logger"));
        assert_eq!(record.map(|r| r.span), Some(Span::new(0, source.len())));
        assert_eq!(
            record.map(ImportRecord::local_names),
            Some(vec!["log", "logger", "d", "w"])
        );
    }

    #[test]
    fn test_namespace_import_binds_no_logger_names() {
        let records = scan(r#"import * as ns from "./logger.js""#);
        let record = records.first();
        assert_eq!(record.map(|r| r.names.len()), Some(1));
        assert_eq!(record.map(ImportRecord::local_names), Some(Vec::new()));
    }

    #[test]
    fn test_side_effect_and_attributes() {
        let source = "import './styles.css' with { type: 'css' };\nimport x from \"./x\"";
        let records = scan(source);
        let kinds: Vec<ImportKind> = records.iter().map(|r| r.kind).collect();
        assert_eq!(kinds, vec![ImportKind::SideEffect, ImportKind::Static]);
        assert_eq!(records.first().map(|r| r.span.text(source)), source.lines().next());
    }

    #[test]
    fn test_re_exports() {
        let records = scan(
            r#"export { logger } from "./logger"; export * from './a'; export * as b from './b'; export const c = 1;"#,
        );
        let specifiers: Vec<Option<&str>> =
            records.iter().map(|r| r.specifier.as_deref()).collect();
        assert_eq!(specifiers, vec![Some("./logger"), Some("./a"), Some("./b")]);
        assert!(records.iter().all(|r| r.kind == ImportKind::ReExport));
        assert!(records.iter().all(|r| r.local_names().is_empty()));
    }

    #[test]
    fn test_dynamic_imports() {
        let source = "async function f(name) { await import('./a.js'); import(name); import.meta.url; x.import('y') }";
        let records = scan(source);
        assert_eq!(records.len(), 2);
        assert_eq!(records.first().and_then(|r| r.specifier.as_deref()), Some("./a.js"));
        assert_eq!(records.get(1).map(|r| r.specifier.is_none()), Some(true));
        assert!(records.iter().all(|r| !r.is_static()));
    }

    #[test]
    fn test_strings_and_comments_are_not_imports() {
        let records = scan(r#"const s = "import x from 'y'"; // import z from "w""#);
        assert!(records.is_empty());
    }

    #[test]
    fn test_import_hint() {
        warm_up();
        assert!(may_have_imports("import x from 'y'"));
        assert!(may_have_imports("export const a = 1"));
        assert!(!may_have_imports("const important = exported;"));
    }

    #[test]
    fn test_unescape_string() {
        assert_eq!(unescape_string(r#""/src/logger""#), "/src/logger");
        assert_eq!(unescape_string(r"'a\'b'"), "a'b");
        assert_eq!(unescape_string(r"'\x41B\u{43}\n'"), "ABC\n");
        assert_eq!(unescape_string("'a\\\nb'"), "ab");
    }
}
