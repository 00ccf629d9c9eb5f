//! Finds the statements that call through the logger binding.
//!
//! Occurrences of each bound name are found textually, then every candidate
//! is checked against the statement's tokens. Only the text search is
//! heuristic; the token check decides.

use std::collections::BTreeMap;

use regex::Regex;

use crate::transform::resolver::ImportBinding;
use crate::transform::syntax::{ExprStmt, Program};
use crate::transform::token::{is_ident_part, Delimiter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    /// Id of the enclosing expression statement.
    pub statement: usize,
    pub is_member_call_shape: bool,
    /// Byte offset just past the call's closing parenthesis.
    pub call_end: usize,
}

/// Byte offsets of `name` in `source` at or after `from`, on identifier
/// boundaries.
pub fn occurrences(source: &str, name: &str, from: usize) -> Vec<usize> {
    let Ok(pattern) = Regex::new(&regex::escape(name)) else {
        return Vec::new();
    };
    let Some(haystack) = source.get(from..) else {
        return Vec::new();
    };
    pattern
        .find_iter(haystack)
        .filter(|found| {
            let before = haystack.get(..found.start()).and_then(|s| s.chars().next_back());
            let after = haystack.get(found.end()..).and_then(|s| s.chars().next());
            !before.is_some_and(is_ident_part) && !after.is_some_and(is_ident_part)
        })
        .map(|found| from + found.start())
        .collect()
}

/// Candidate statements for `binding`, one per statement, in source order.
pub fn locate_call_sites(source: &str, program: &Program, binding: &ImportBinding) -> Vec<CallSite> {
    let mut statements: BTreeMap<usize, &ExprStmt> = BTreeMap::new();
    for name in &binding.local_names {
        for offset in occurrences(source, name, binding.span.end) {
            if let Some(stmt) = program.enclosing_statement(offset) {
                statements.entry(stmt.id).or_insert(stmt);
            }
        }
    }

    statements
        .into_values()
        .map(|stmt| match member_call_end(source, program, stmt, &binding.local_names) {
            Some(call_end) => CallSite {
                statement: stmt.id,
                is_member_call_shape: true,
                call_end,
            },
            None => {
                log::trace!(
                    "rejecting statement at {}: not a logger member call",
                    stmt.span.start
                );
                CallSite {
                    statement: stmt.id,
                    is_member_call_shape: false,
                    call_end: stmt.span.end,
                }
            }
        })
        .collect()
}

/// For `name.level(…)` or `name.level.modifier(…)` where `name` is an
/// unshadowed logger binding, the offset after the closing parenthesis.
fn member_call_end(
    source: &str,
    program: &Program,
    stmt: &ExprStmt,
    names: &[String],
) -> Option<usize> {
    let (object, path, args) = match stmt.trees.as_slice() {
        [object, dot, level, args] if dot.is_punct(source, ".") => (object, vec![level], args),
        [object, dot, level, dot2, modifier, args]
            if dot.is_punct(source, ".") && dot2.is_punct(source, ".") =>
        {
            (object, vec![level, modifier], args)
        }
        _ => return None,
    };
    let name = object.ident(source)?;
    if !names.iter().any(|n| n == name) || program.is_shadowed(name, stmt.scope) {
        return None;
    }
    if !path.iter().all(|segment| segment.ident(source).is_some()) {
        return None;
    }
    args.group_of(Delimiter::Paren).map(|group| group.close.end)
}

/// Statements whose calls return a deferred action that must be invoked.
pub fn member_calls(sites: &[CallSite]) -> impl Iterator<Item = &CallSite> {
    sites.iter().filter(|site| site.is_member_call_shape)
}
