//! Statement-level structure of a module.
//!
//! [`Program`] walks the token trees the way a parser would walk statements,
//! but only keeps what the transform needs: every expression statement with
//! its tokens and lexical scope, and the names each scope binds.

use std::collections::HashSet;

use crate::error::{SyntaxError, SyntaxErrorKind};
use crate::transform::lexer::parse_trees;
use crate::transform::token::{is_reserved, Delimiter, Group, Span, TokenKind, TokenTree};

pub type ScopeId = usize;

/// The module scope always has id 0.
pub const MODULE_SCOPE: ScopeId = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Module,
    Function,
    Block,
}

#[derive(Debug, Clone)]
pub struct Scope {
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    bindings: HashSet<String>,
}

impl Scope {
    fn new(kind: ScopeKind, parent: Option<ScopeId>) -> Self {
        Scope {
            kind,
            parent,
            bindings: HashSet::new(),
        }
    }

    pub fn binds(&self, name: &str) -> bool {
        self.bindings.contains(name)
    }
}

/// An expression statement. `trees` excludes the terminating semicolon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExprStmt {
    pub id: usize,
    pub span: Span,
    pub trees: Vec<TokenTree>,
    pub scope: ScopeId,
}

#[derive(Debug, Clone)]
pub struct Program {
    statements: Vec<ExprStmt>,
    scopes: Vec<Scope>,
}

impl Program {
    pub fn parse(source: &str) -> Result<Program, SyntaxError> {
        Program::from_trees(source, &parse_trees(source)?)
    }

    pub fn from_trees(source: &str, trees: &[TokenTree]) -> Result<Program, SyntaxError> {
        let mut walker = Walker {
            source,
            scopes: vec![Scope::new(ScopeKind::Module, None)],
            statements: Vec::new(),
        };
        walker.body(trees, MODULE_SCOPE)?;
        Ok(Program {
            statements: walker.statements,
            scopes: walker.scopes,
        })
    }

    pub fn statements(&self) -> &[ExprStmt] {
        &self.statements
    }

    pub fn statement(&self, id: usize) -> Option<&ExprStmt> {
        self.statements.get(id)
    }

    pub fn scope(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id)
    }

    /// The smallest expression statement whose span contains `offset`.
    pub fn enclosing_statement(&self, offset: usize) -> Option<&ExprStmt> {
        self.statements
            .iter()
            .filter(|stmt| stmt.span.contains(offset))
            .min_by_key(|stmt| stmt.span.len())
    }

    /// Whether `name` is rebound by some scope between `scope` and the module
    /// scope. Module-level bindings never count as shadowing.
    pub fn is_shadowed(&self, name: &str, scope: ScopeId) -> bool {
        let mut current = Some(scope);
        while let Some(id) = current {
            let Some(scope) = self.scopes.get(id) else {
                return false;
            };
            if scope.kind != ScopeKind::Module && scope.binds(name) {
                return true;
            }
            current = scope.parent;
        }
        false
    }
}

struct Walker<'s> {
    source: &'s str,
    scopes: Vec<Scope>,
    statements: Vec<ExprStmt>,
}

fn expected(what: &'static str, trees: &[TokenTree], pos: usize) -> SyntaxError {
    let offset = trees
        .get(pos)
        .map(|t| t.span().start)
        .or_else(|| trees.last().map(|t| t.span().end))
        .unwrap_or_default();
    SyntaxError::new(SyntaxErrorKind::Expected(what), offset)
}

fn group_at(trees: &[TokenTree], pos: usize, delimiter: Delimiter) -> Option<&Group> {
    trees.get(pos).and_then(|t| t.group_of(delimiter))
}

fn split_at_punct<'t>(
    trees: &'t [TokenTree],
    source: &str,
    punct: &str,
) -> (&'t [TokenTree], Option<&'t [TokenTree]>) {
    match trees.iter().position(|t| t.is_punct(source, punct)) {
        Some(at) => (
            trees.get(..at).unwrap_or_default(),
            trees.get(at + 1..),
        ),
        None => (trees, None),
    }
}

impl<'s> Walker<'s> {
    fn ident_at(&self, trees: &[TokenTree], pos: usize) -> Option<&'s str> {
        trees.get(pos).and_then(|t| t.ident(self.source))
    }

    fn is_ident_at(&self, trees: &[TokenTree], pos: usize, name: &str) -> bool {
        self.ident_at(trees, pos) == Some(name)
    }

    fn is_punct_at(&self, trees: &[TokenTree], pos: usize, punct: &str) -> bool {
        trees.get(pos).is_some_and(|t| t.is_punct(self.source, punct))
    }

    fn skip_semicolon(&self, trees: &[TokenTree], pos: usize) -> usize {
        if self.is_punct_at(trees, pos, ";") {
            pos + 1
        } else {
            pos
        }
    }

    fn push_scope(&mut self, kind: ScopeKind, parent: ScopeId) -> ScopeId {
        self.scopes.push(Scope::new(kind, Some(parent)));
        self.scopes.len() - 1
    }

    fn bind(&mut self, scope: ScopeId, name: &str) {
        if let Some(scope) = self.scopes.get_mut(scope) {
            scope.bindings.insert(name.to_string());
        }
    }

    /// `var` bindings hoist to the nearest function or module scope.
    fn hoisting_scope(&self, scope: ScopeId) -> ScopeId {
        let mut current = scope;
        while let Some(s) = self.scopes.get(current) {
            match (s.kind, s.parent) {
                (ScopeKind::Block, Some(parent)) => current = parent,
                _ => break,
            }
        }
        current
    }

    fn bind_pattern(&mut self, pattern: &[TokenTree], scope: ScopeId) {
        let (pattern, _default) = split_at_punct(pattern, self.source, "=");
        let Some(first) = pattern.first() else {
            return;
        };
        if first.is_punct(self.source, "...") {
            self.bind_pattern(pattern.get(1..).unwrap_or_default(), scope);
        } else if let Some(name) = first.ident(self.source) {
            if pattern.len() == 1 && !is_reserved(name) {
                self.bind(scope, name);
            }
        } else if let Some(group) = first.group_of(Delimiter::Bracket) {
            for element in group.trees.split(|t| t.is_punct(self.source, ",")) {
                self.bind_pattern(element, scope);
            }
        } else if let Some(group) = first.group_of(Delimiter::Brace) {
            for property in group.trees.split(|t| t.is_punct(self.source, ",")) {
                match split_at_punct(property, self.source, ":") {
                    (_, Some(value)) => self.bind_pattern(value, scope),
                    (shorthand, None) => self.bind_pattern(shorthand, scope),
                }
            }
        }
    }

    fn bind_params(&mut self, params: &[TokenTree], scope: ScopeId) {
        for param in params.split(|t| t.is_punct(self.source, ",")) {
            self.bind_pattern(param, scope);
        }
    }

    fn body(&mut self, trees: &[TokenTree], scope: ScopeId) -> Result<(), SyntaxError> {
        let mut pos = 0;
        while pos < trees.len() {
            pos = self.statement(trees, pos, scope)?;
        }
        Ok(())
    }

    fn required_statement(
        &mut self,
        trees: &[TokenTree],
        pos: usize,
        scope: ScopeId,
    ) -> Result<usize, SyntaxError> {
        if pos >= trees.len() {
            return Err(expected("statement", trees, pos));
        }
        self.statement(trees, pos, scope)
    }

    fn statement(
        &mut self,
        trees: &[TokenTree],
        pos: usize,
        scope: ScopeId,
    ) -> Result<usize, SyntaxError> {
        let Some(first) = trees.get(pos) else {
            return Ok(pos);
        };
        if first.is_punct(self.source, ";") {
            return Ok(pos + 1);
        }
        if let Some(block) = first.group_of(Delimiter::Brace) {
            let inner = self.push_scope(ScopeKind::Block, scope);
            self.body(&block.trees, inner)?;
            return Ok(pos + 1);
        }

        let next_is_group = |d| group_at(trees, pos + 1, d).is_some();
        let next_ident = self.ident_at(trees, pos + 1);
        match first.ident(self.source) {
            Some("if") => {
                let next = self.paren_head(trees, pos + 1, scope, "`(` after `if`")?;
                let next = self.required_statement(trees, next, scope)?;
                if self.is_ident_at(trees, next, "else") {
                    self.required_statement(trees, next + 1, scope)
                } else {
                    Ok(next)
                }
            }
            Some("while") | Some("with") => {
                let next = self.paren_head(trees, pos + 1, scope, "`(` after `while`")?;
                self.required_statement(trees, next, scope)
            }
            Some("do") => {
                let next = self.required_statement(trees, pos + 1, scope)?;
                if !self.is_ident_at(trees, next, "while") {
                    return Err(expected("`while` after `do` body", trees, next));
                }
                let next = self.paren_head(trees, next + 1, scope, "`(` after `while`")?;
                Ok(self.skip_semicolon(trees, next))
            }
            Some("for") => self.for_statement(trees, pos, scope),
            Some("try") => self.try_statement(trees, pos, scope),
            Some("switch") => self.switch_statement(trees, pos, scope),
            Some("function") => self.function(trees, pos, scope, true),
            Some("async")
                if next_ident == Some("function")
                    && !trees.get(pos + 1).is_some_and(TokenTree::newline_before) =>
            {
                self.function(trees, pos + 1, scope, true)
            }
            Some("class") => self.class(trees, pos, scope, true),
            Some("const") | Some("var") => self.declaration(trees, pos, scope),
            Some("let")
                if next_ident.is_some_and(|n| !is_reserved(n))
                    || next_is_group(Delimiter::Bracket)
                    || next_is_group(Delimiter::Brace) =>
            {
                self.declaration(trees, pos, scope)
            }
            Some("return") | Some("throw") => {
                let start = pos + 1;
                let bare = trees
                    .get(start)
                    .map_or(true, |t| t.newline_before() || t.is_punct(self.source, ";"));
                if bare {
                    return Ok(self.skip_semicolon(trees, start));
                }
                let end = self.expression_end(trees, start);
                self.scan_expression(trees.get(start..end).unwrap_or_default(), scope)?;
                Ok(self.skip_semicolon(trees, end))
            }
            Some("break") | Some("continue") => {
                let mut next = pos + 1;
                let labelled = trees.get(next).is_some_and(|t| {
                    !t.newline_before() && t.ident(self.source).is_some_and(|n| !is_reserved(n))
                });
                if labelled {
                    next += 1;
                }
                Ok(self.skip_semicolon(trees, next))
            }
            Some("debugger") => Ok(self.skip_semicolon(trees, pos + 1)),
            Some("import")
                if !next_is_group(Delimiter::Paren) && !self.is_punct_at(trees, pos + 1, ".") =>
            {
                self.module_clause(trees, pos + 1, true)
            }
            Some("export") => self.export(trees, pos, scope),
            Some(label) if !is_reserved(label) && self.is_punct_at(trees, pos + 1, ":") => {
                self.required_statement(trees, pos + 2, scope)
            }
            _ => self.expression_statement(trees, pos, scope),
        }
    }

    /// Where the expression starting at `start` ends: at a top-level `;` or
    /// at a line break where no expression can continue.
    fn expression_end(&self, trees: &[TokenTree], start: usize) -> usize {
        let mut pos = start;
        while let Some(tree) = trees.get(pos) {
            if tree.is_punct(self.source, ";") {
                return pos;
            }
            if pos > start && tree.newline_before() {
                let ends = pos
                    .checked_sub(1)
                    .and_then(|prev| trees.get(prev))
                    .is_some_and(|prev| self.ends_expression(prev));
                if ends && !self.continues_expression(tree) {
                    return pos;
                }
            }
            pos += 1;
        }
        pos
    }

    fn ends_expression(&self, tree: &TokenTree) -> bool {
        match tree {
            TokenTree::Group(_) => true,
            TokenTree::Leaf(token) => match token.kind {
                TokenKind::Ident => !matches!(
                    token.span.text(self.source),
                    "typeof" | "instanceof" | "in" | "new" | "delete" | "void" | "await" | "yield"
                ),
                TokenKind::Punct => matches!(token.span.text(self.source), "++" | "--"),
                _ => true,
            },
        }
    }

    fn continues_expression(&self, tree: &TokenTree) -> bool {
        match tree {
            TokenTree::Group(group) => group.delimiter != Delimiter::Brace,
            TokenTree::Leaf(token) => match token.kind {
                TokenKind::Template => true,
                TokenKind::Ident => {
                    matches!(token.span.text(self.source), "in" | "instanceof")
                }
                TokenKind::Punct => !matches!(
                    token.span.text(self.source),
                    "++" | "--" | "!" | "~" | "..." | "@" | "#"
                ),
                _ => false,
            },
        }
    }

    fn expression_statement(
        &mut self,
        trees: &[TokenTree],
        pos: usize,
        scope: ScopeId,
    ) -> Result<usize, SyntaxError> {
        let end = self.expression_end(trees, pos);
        let slice = trees.get(pos..end).unwrap_or_default();
        if let (Some(first), Some(last)) = (slice.first(), slice.last()) {
            self.statements.push(ExprStmt {
                id: self.statements.len(),
                span: first.span().to(last.span()),
                trees: slice.to_vec(),
                scope,
            });
        }
        self.scan_expression(slice, scope)?;
        Ok(self.skip_semicolon(trees, end))
    }

    fn paren_head(
        &mut self,
        trees: &[TokenTree],
        pos: usize,
        scope: ScopeId,
        what: &'static str,
    ) -> Result<usize, SyntaxError> {
        let head = group_at(trees, pos, Delimiter::Paren).ok_or_else(|| expected(what, trees, pos))?;
        self.scan_expression(&head.trees, scope)?;
        Ok(pos + 1)
    }

    fn block_at(
        &mut self,
        trees: &[TokenTree],
        pos: usize,
        scope: ScopeId,
        what: &'static str,
    ) -> Result<usize, SyntaxError> {
        let block = group_at(trees, pos, Delimiter::Brace).ok_or_else(|| expected(what, trees, pos))?;
        let inner = self.push_scope(ScopeKind::Block, scope);
        self.body(&block.trees, inner)?;
        Ok(pos + 1)
    }

    fn declaration(
        &mut self,
        trees: &[TokenTree],
        pos: usize,
        scope: ScopeId,
    ) -> Result<usize, SyntaxError> {
        let target = if self.is_ident_at(trees, pos, "var") {
            self.hoisting_scope(scope)
        } else {
            scope
        };
        let end = self.expression_end(trees, pos + 1);
        let declarators = trees.get(pos + 1..end).unwrap_or_default();
        for declarator in declarators.split(|t| t.is_punct(self.source, ",")) {
            self.bind_pattern(declarator, target);
        }
        self.scan_expression(declarators, scope)?;
        Ok(self.skip_semicolon(trees, end))
    }

    fn for_statement(
        &mut self,
        trees: &[TokenTree],
        pos: usize,
        scope: ScopeId,
    ) -> Result<usize, SyntaxError> {
        let mut next = pos + 1;
        if self.is_ident_at(trees, next, "await") {
            next += 1;
        }
        let head = group_at(trees, next, Delimiter::Paren)
            .ok_or_else(|| expected("`(` after `for`", trees, next))?;
        let inner = self.push_scope(ScopeKind::Block, scope);
        let head_trees = &head.trees;
        let keyword = head_trees.first().and_then(|t| t.ident(self.source));
        if let Some(keyword @ ("let" | "const" | "var")) = keyword {
            let target = if keyword == "var" {
                self.hoisting_scope(scope)
            } else {
                inner
            };
            let rest = head_trees.get(1..).unwrap_or_default();
            let end = rest
                .iter()
                .position(|t| {
                    t.is_punct(self.source, ";")
                        || t.is_ident(self.source, "of")
                        || t.is_ident(self.source, "in")
                })
                .unwrap_or(rest.len());
            for declarator in rest
                .get(..end)
                .unwrap_or_default()
                .split(|t| t.is_punct(self.source, ","))
            {
                self.bind_pattern(declarator, target);
            }
        }
        self.scan_expression(head_trees, inner)?;
        self.required_statement(trees, next + 1, inner)
    }

    fn try_statement(
        &mut self,
        trees: &[TokenTree],
        pos: usize,
        scope: ScopeId,
    ) -> Result<usize, SyntaxError> {
        let mut next = self.block_at(trees, pos + 1, scope, "block after `try`")?;
        if self.is_ident_at(trees, next, "catch") {
            next += 1;
            let handler = self.push_scope(ScopeKind::Block, scope);
            if let Some(param) = group_at(trees, next, Delimiter::Paren) {
                self.bind_params(&param.trees, handler);
                next += 1;
            }
            next = self.block_at(trees, next, handler, "block after `catch`")?;
        }
        if self.is_ident_at(trees, next, "finally") {
            next = self.block_at(trees, next + 1, scope, "block after `finally`")?;
        }
        Ok(next)
    }

    fn switch_statement(
        &mut self,
        trees: &[TokenTree],
        pos: usize,
        scope: ScopeId,
    ) -> Result<usize, SyntaxError> {
        let next = self.paren_head(trees, pos + 1, scope, "`(` after `switch`")?;
        let cases = group_at(trees, next, Delimiter::Brace)
            .ok_or_else(|| expected("block after `switch`", trees, next))?;
        let inner = self.push_scope(ScopeKind::Block, scope);
        let body = &cases.trees;
        let mut at = 0;
        while at < body.len() {
            if self.is_ident_at(body, at, "case") {
                let colon = self
                    .case_colon(body, at + 1)
                    .ok_or_else(|| expected("`:` after `case`", body, at))?;
                self.scan_expression(body.get(at + 1..colon).unwrap_or_default(), inner)?;
                at = colon + 1;
            } else if self.is_ident_at(body, at, "default") && self.is_punct_at(body, at + 1, ":") {
                at += 2;
            } else {
                at = self.statement(body, at, inner)?;
            }
        }
        Ok(next + 1)
    }

    /// The `:` ending a `case` test, skipping those of conditional expressions.
    fn case_colon(&self, trees: &[TokenTree], start: usize) -> Option<usize> {
        let mut pending = 0usize;
        for (at, tree) in trees.iter().enumerate().skip(start) {
            if tree.is_punct(self.source, "?") {
                pending += 1;
            } else if tree.is_punct(self.source, ":") {
                if pending == 0 {
                    return Some(at);
                }
                pending -= 1;
            }
        }
        None
    }

    /// `function` at `pos`, optionally a generator, optionally named.
    fn function(
        &mut self,
        trees: &[TokenTree],
        pos: usize,
        scope: ScopeId,
        declaration: bool,
    ) -> Result<usize, SyntaxError> {
        let mut next = pos + 1;
        if self.is_punct_at(trees, next, "*") {
            next += 1;
        }
        let name = self.ident_at(trees, next);
        if name.is_some() {
            next += 1;
        }
        let params = group_at(trees, next, Delimiter::Paren)
            .ok_or_else(|| expected("function parameters", trees, next))?;
        let body = group_at(trees, next + 1, Delimiter::Brace)
            .ok_or_else(|| expected("function body", trees, next + 1))?;
        let inner = self.push_scope(ScopeKind::Function, scope);
        if let Some(name) = name {
            self.bind(if declaration { scope } else { inner }, name);
        }
        self.bind_params(&params.trees, inner);
        self.scan_expression(&params.trees, inner)?;
        self.body(&body.trees, inner)?;
        Ok(next + 2)
    }

    fn class(
        &mut self,
        trees: &[TokenTree],
        pos: usize,
        scope: ScopeId,
        declaration: bool,
    ) -> Result<usize, SyntaxError> {
        let mut next = pos + 1;
        let name = self.ident_at(trees, next).filter(|n| *n != "extends");
        if name.is_some() {
            next += 1;
        }
        let body_at = trees
            .iter()
            .enumerate()
            .skip(next)
            .find(|(_, t)| t.group_of(Delimiter::Brace).is_some())
            .map(|(at, _)| at)
            .ok_or_else(|| expected("class body", trees, next))?;
        let inner = self.push_scope(ScopeKind::Block, scope);
        if let Some(name) = name {
            self.bind(if declaration { scope } else { inner }, name);
        }
        if self.is_ident_at(trees, next, "extends") {
            self.scan_expression(trees.get(next + 1..body_at).unwrap_or_default(), scope)?;
        }
        if let Some(body) = group_at(trees, body_at, Delimiter::Brace) {
            self.scan_expression(&body.trees, inner)?;
        }
        Ok(body_at + 1)
    }

    fn export(
        &mut self,
        trees: &[TokenTree],
        pos: usize,
        scope: ScopeId,
    ) -> Result<usize, SyntaxError> {
        let next = pos + 1;
        if self.is_punct_at(trees, next, "*") || group_at(trees, next, Delimiter::Brace).is_some() {
            return self.module_clause(trees, next, false);
        }
        if !self.is_ident_at(trees, next, "default") {
            return self.required_statement(trees, next, scope);
        }
        let value = next + 1;
        match self.ident_at(trees, value) {
            Some("function") => self.function(trees, value, scope, true),
            Some("async") if self.is_ident_at(trees, value + 1, "function") => {
                self.function(trees, value + 1, scope, true)
            }
            Some("class") => self.class(trees, value, scope, true),
            _ => {
                let end = self.expression_end(trees, value);
                self.scan_expression(trees.get(value..end).unwrap_or_default(), scope)?;
                Ok(self.skip_semicolon(trees, end))
            }
        }
    }

    /// Skip an import clause or re-export up to its end. Imports always name a
    /// module; `export { a }` without `from` does not.
    fn module_clause(
        &self,
        trees: &[TokenTree],
        pos: usize,
        requires_specifier: bool,
    ) -> Result<usize, SyntaxError> {
        let specifier = trees.iter().enumerate().skip(pos).find(|(at, t)| {
            matches!(t, TokenTree::Leaf(token) if token.kind == TokenKind::String)
                || (*at > pos && t.newline_before() && !requires_specifier)
                || t.is_punct(self.source, ";")
        });
        let mut next = match specifier {
            Some((at, TokenTree::Leaf(token))) if token.kind == TokenKind::String => at + 1,
            Some((at, _)) if !requires_specifier => at,
            None if !requires_specifier => trees.len(),
            _ => return Err(expected("module specifier", trees, pos)),
        };
        if self.ident_at(trees, next).is_some_and(|w| w == "with" || w == "assert")
            && group_at(trees, next + 1, Delimiter::Brace).is_some()
        {
            next += 2;
        }
        Ok(self.skip_semicolon(trees, next))
    }

    /// Find function, arrow, method and class bodies nested in an expression.
    fn scan_expression(&mut self, trees: &[TokenTree], scope: ScopeId) -> Result<(), SyntaxError> {
        let mut pos = 0;
        while let Some(tree) = trees.get(pos) {
            match tree {
                TokenTree::Group(group) => {
                    let method_body = group_at(trees, pos + 1, Delimiter::Brace)
                        .filter(|_| group.delimiter == Delimiter::Paren);
                    if let Some(body) = method_body {
                        let inner = self.push_scope(ScopeKind::Function, scope);
                        self.bind_params(&group.trees, inner);
                        self.scan_expression(&group.trees, inner)?;
                        self.body(&body.trees, inner)?;
                        pos += 2;
                        continue;
                    }
                    self.scan_expression(&group.trees, scope)?;
                }
                TokenTree::Leaf(token)
                    if token.kind == TokenKind::Ident && self.is_property_name(trees, pos) => {}
                TokenTree::Leaf(_) => {
                    if tree.is_ident(self.source, "function") {
                        pos = self.function(trees, pos, scope, false)?;
                        continue;
                    }
                    if tree.is_ident(self.source, "class")
                        && group_at(trees, pos + 1, Delimiter::Paren).is_none()
                    {
                        pos = self.class(trees, pos, scope, false)?;
                        continue;
                    }
                    if tree.is_ident(self.source, "static") {
                        if let Some(block) = group_at(trees, pos + 1, Delimiter::Brace) {
                            let inner = self.push_scope(ScopeKind::Function, scope);
                            self.body(&block.trees, inner)?;
                            pos += 2;
                            continue;
                        }
                    }
                    if tree.is_punct(self.source, "=>") {
                        pos = self.arrow(trees, pos, scope)?;
                        continue;
                    }
                }
            }
            pos += 1;
        }
        Ok(())
    }

    /// Whether the word at `pos` names a property: `a.class`, `{ class: 1 }`.
    fn is_property_name(&self, trees: &[TokenTree], pos: usize) -> bool {
        let member = pos
            .checked_sub(1)
            .and_then(|at| trees.get(at))
            .is_some_and(|t| t.is_punct(self.source, ".") || t.is_punct(self.source, "?."));
        member || self.is_punct_at(trees, pos + 1, ":")
    }

    /// The arrow at `pos`; returns the position after its body.
    fn arrow(&mut self, trees: &[TokenTree], pos: usize, scope: ScopeId) -> Result<usize, SyntaxError> {
        let inner = self.push_scope(ScopeKind::Function, scope);
        match pos.checked_sub(1).and_then(|at| trees.get(at)) {
            Some(TokenTree::Group(params)) if params.delimiter == Delimiter::Paren => {
                self.bind_params(&params.trees, inner);
            }
            Some(param) => {
                if let Some(name) = param.ident(self.source) {
                    self.bind(inner, name);
                }
            }
            None => return Err(expected("arrow parameters", trees, pos)),
        }
        if let Some(body) = group_at(trees, pos + 1, Delimiter::Brace) {
            self.body(&body.trees, inner)?;
            return Ok(pos + 2);
        }
        let start = pos + 1;
        if start >= trees.len() {
            return Err(expected("arrow body", trees, start));
        }
        let end = trees
            .iter()
            .enumerate()
            .skip(start)
            .find(|(_, t)| t.is_punct(self.source, ",") || t.is_punct(self.source, ";"))
            .map_or(trees.len(), |(at, _)| at);
        self.scan_expression(trees.get(start..end).unwrap_or_default(), inner)?;
        Ok(end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statement_texts(source: &str) -> Vec<String> {
        Program::parse(source)
            .map(|program| {
                program
                    .statements()
                    .iter()
                    .map(|stmt| stmt.span.text(source).to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn find_statement<'p>(program: &'p Program, source: &str, text: &str) -> Option<&'p ExprStmt> {
        program
            .statements()
            .iter()
            .find(|stmt| stmt.span.text(source) == text)
    }

    #[test]
    fn test_semicolons_and_asi() {
        let source = "a();\nb()\nc\n(d)\nlet x = 1\nx++\ny";
        // `c\n(d)` is one call expression.
        assert_eq!(statement_texts(source), vec!["a()", "b()", "c\n(d)", "x++", "y"]);
    }

    #[test]
    fn test_asi_continuation() {
        let source = "a\n.b()\nx = 1 +\n2\nfoo\n++bar";
        assert_eq!(statement_texts(source), vec!["a\n.b()", "x = 1 +\n2", "foo", "++bar"]);
    }

    #[test]
    fn test_return_is_restricted() {
        let source = "function f() {\n  return\n  logger.log(1)\n}";
        assert_eq!(statement_texts(source), vec!["logger.log(1)"]);
    }

    #[test]
    fn test_nested_bodies() {
        let source = r#"
            if (a) { one() } else if (b) two(); else { three() }
            for (let i = 0; i < 3; i++) four(i)
            while (c) five()
            do { six() } while (d)
            try { seven() } catch (e) { eight(e) } finally { nine() }
            switch (k) { case 1: ten(); break; default: eleven() }
            label: twelve()
        "#;
        assert_eq!(
            statement_texts(source),
            vec![
                "one()", "two()", "three()", "four(i)", "five()", "six()", "seven()", "eight(e)",
                "nine()", "ten()", "eleven()", "twelve()",
            ]
        );
    }

    #[test]
    fn test_function_bodies_inside_expressions() {
        let source = r#"
            items.forEach((item) => { logger.log(item) })
            const handler = async function () { inner() }
            const obj = { method() { fromMethod() }, arrow: x => { fromArrow(x) } }
            class Service { run() { fromClass() } static { fromStatic() } field = () => { fromField() } }
            export default function () { fromDefault() }
        "#;
        let texts = statement_texts(source);
        for expected in [
            "logger.log(item)",
            "inner()",
            "fromMethod()",
            "fromArrow(x)",
            "fromClass()",
            "fromStatic()",
            "fromField()",
            "fromDefault()",
        ] {
            assert!(texts.iter().any(|t| t == expected), "missing {expected}");
        }
    }

    #[test]
    fn test_imports_and_exports_are_not_expression_statements() {
        let source = r#"
            import { logger } from "/src/logger"
            import "./side-effect.js";
            export { logger } from "./logger.js"
            export * from "./all.js"
            export const value = 1
            export { value as other }
            import("./lazy.js").then(load)
            logger.log("hi")
        "#;
        assert_eq!(
            statement_texts(source),
            vec![r#"import("./lazy.js").then(load)"#, r#"logger.log("hi")"#]
        );
    }

    #[test]
    fn test_reserved_words_as_property_names() {
        let source = r#"
            _createElementVNode("div", { class: "box", function: 1 })
            const ratio = x.class / 2 / 3
            y?.function(z)
            const api = { class() { fromKey() } }
            logger.log(ratio)
        "#;
        let texts = statement_texts(source);
        assert!(texts.iter().any(|t| t.starts_with("_createElementVNode")));
        assert!(texts.iter().any(|t| t == "fromKey()"));
        assert!(texts.iter().any(|t| t == "logger.log(ratio)"));
    }

    #[test]
    fn test_export_clause_at_end_of_file() {
        for source in [
            "logger.log(1)\nconst x = 1\nexport { x as y }",
            "logger.log(1)\nexport { logger }",
            "logger.log(1)\nexport {}",
        ] {
            assert_eq!(statement_texts(source), vec!["logger.log(1)"], "{source}");
        }
    }

    #[test]
    fn test_regex_after_statement_head() {
        let source = "if (x) /[)]/.test(s)\nlogger.log(1)";
        assert_eq!(statement_texts(source), vec!["/[)]/.test(s)", "logger.log(1)"]);
    }

    #[test]
    fn test_shadowing() {
        let source = r#"
            import { logger } from "/src/logger";
            logger.log("module");
            function f(logger) { logger.log("param") }
            { const { logger } = deps; logger.log("destructured") }
            { logger.log("hoisted"); let logger = other }
            items.map(([logger]) => { logger.log("arrow") })
            try {} catch (logger) { logger.log("catch") }
            for (const logger of all) { logger.log("for") }
            function g() { if (x) { var logger = 1 } logger.log("var") }
            function h() { logger.log("free") }
        "#;
        let program = Program::parse(source);
        assert!(program.is_ok());
        let Ok(program) = program else { return };

        let shadowed = |text: &str| {
            find_statement(&program, source, text).map(|stmt| program.is_shadowed("logger", stmt.scope))
        };
        assert_eq!(shadowed(r#"logger.log("module")"#), Some(false));
        assert_eq!(shadowed(r#"logger.log("free")"#), Some(false));
        for text in [
            r#"logger.log("param")"#,
            r#"logger.log("destructured")"#,
            r#"logger.log("hoisted")"#,
            r#"logger.log("arrow")"#,
            r#"logger.log("catch")"#,
            r#"logger.log("for")"#,
            r#"logger.log("var")"#,
        ] {
            assert_eq!(shadowed(text), Some(true), "{text}");
        }
    }

    #[test]
    fn test_enclosing_statement_is_innermost() {
        let source = "outer(function () { inner(logger) })";
        let program = Program::parse(source);
        assert!(program.is_ok());
        let Ok(program) = program else { return };
        let offset = source.find("logger").unwrap_or_default();
        let stmt = program.enclosing_statement(offset);
        assert_eq!(stmt.map(|s| s.span.text(source)), Some("inner(logger)"));
        assert_eq!(program.statements().len(), 2);
    }

    #[test]
    fn test_malformed_statements() {
        let err = |source: &str| Program::parse(source).err().map(|e| e.kind);
        assert_eq!(err("if x {}"), Some(SyntaxErrorKind::Expected("`(` after `if`")));
        assert_eq!(err("function f {}"), Some(SyntaxErrorKind::Expected("function parameters")));
        assert_eq!(err("try {} catch (e)"), Some(SyntaxErrorKind::Expected("block after `catch`")));
        assert_eq!(err("import x from"), Some(SyntaxErrorKind::Expected("module specifier")));
        assert_eq!(err("f(x"), Some(SyntaxErrorKind::Unclosed(Delimiter::Paren)));
    }
}
