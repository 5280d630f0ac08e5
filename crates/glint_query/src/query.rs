//! Query compilation and execution.
//!
//! A query is compiled into a flat list of [`QueryStep`]s. Each step takes
//! the current result set and replaces it with the matching nodes found
//! either among the immediate children ([`SearchMode::Shallow`]) or among
//! all descendants ([`SearchMode::Recursive`]) of every current node.
//!
//! # Step construction
//!
//! The text is split on `..` into chunks and each chunk on `.` into tokens.
//! The first token of every chunk after the first is searched recursively,
//! the rest shallowly. Empty tokens at the start of a chunk are skipped, so
//! `..z` is a single recursive search for `z` and `.a` a shallow one for
//! `a`. An empty token anywhere else is malformed.

use std::fmt;

use glint_core::{NodeHandle, Result};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::lexer::{Separator, split_pieces};
use crate::source::QuerySource;
use crate::token::QueryToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Match immediate children only.
    Shallow,
    /// Match descendants at any depth, in pre-order.
    Recursive,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryStep {
    pub mode: SearchMode,
    pub token: QueryToken,
}

/// A compiled query.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    text: String,
    steps: SmallVec<[QueryStep; 4]>,
}

impl Query {
    /// Compiles `text`. Never fails: malformed tokens compile to
    /// [`QueryToken::Invalid`] steps that match nothing.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut steps = SmallVec::new();
        let mut chunk_index = 0usize;
        let mut chunk_has_token = false;

        for piece in split_pieces(text) {
            if piece.sep == Separator::DotDot {
                chunk_index += 1;
                chunk_has_token = false;
            }

            let token = if piece.text.is_empty() {
                if !chunk_has_token {
                    continue;
                }
                log::debug!("Empty token at byte {} of query {text:?}", piece.offset);
                QueryToken::Invalid
            } else {
                QueryToken::parse_lenient(piece.text, piece.offset)
            };

            let mode = if chunk_index > 0 && !chunk_has_token {
                SearchMode::Recursive
            } else {
                SearchMode::Shallow
            };
            chunk_has_token = true;
            steps.push(QueryStep { mode, token });
        }

        Self {
            text: text.to_owned(),
            steps,
        }
    }

    #[inline]
    #[must_use]
    pub fn steps(&self) -> &[QueryStep] {
        &self.steps
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Whether the query can only ever produce an empty result.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty() || self.steps.iter().any(|step| step.token.is_invalid())
    }

    /// Runs the query from `context`, or from the source's root.
    ///
    /// Results are in discovery order with duplicates removed. Any step
    /// that matches nothing short-circuits to an empty result.
    pub fn execute<S: QuerySource + ?Sized>(
        &self,
        source: &S,
        context: Option<NodeHandle>,
    ) -> Result<Vec<NodeHandle>> {
        let root = source.query_root()?;
        if self.is_empty() {
            return Ok(Vec::new());
        }

        let start = context.unwrap_or(root);
        if !source.contains(start) {
            log::debug!("Query {:?} started from unknown node {start:?}", self.text);
            return Ok(Vec::new());
        }

        let mut current = vec![start];
        let mut seen = FxHashSet::default();
        let mut expanded = FxHashSet::default();
        let mut stack = Vec::new();

        for step in &self.steps {
            let mut next = Vec::new();
            seen.clear();
            expanded.clear();

            for &node in &current {
                match step.mode {
                    SearchMode::Shallow => {
                        for &child in source.child_handles(node) {
                            if step.token.matches(source, child) && seen.insert(child) {
                                next.push(child);
                            }
                        }
                    }
                    SearchMode::Recursive => {
                        // A subtree already scanned from an ancestor in this
                        // step holds no new matches.
                        if !expanded.insert(node) {
                            continue;
                        }
                        stack.clear();
                        stack.extend(source.child_handles(node).iter().rev().copied());
                        while let Some(candidate) = stack.pop() {
                            if step.token.matches(source, candidate) && seen.insert(candidate) {
                                next.push(candidate);
                            }
                            if expanded.insert(candidate) {
                                stack.extend(source.child_handles(candidate).iter().rev().copied());
                            }
                        }
                    }
                }
            }

            if next.is_empty() {
                return Ok(next);
            }
            current = next;
        }

        Ok(current)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Query entry point bound to one source.
#[derive(Debug)]
pub struct SceneQuery<'a, S: QuerySource + ?Sized> {
    source: &'a S,
}

impl<'a, S: QuerySource + ?Sized> SceneQuery<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Finds nodes below the root. `None` and `""` yield an empty result.
    pub fn find(&self, query: Option<&str>) -> Result<Vec<NodeHandle>> {
        self.find_from(query, None)
    }

    /// Finds nodes below `context`, or below the root when `context` is `None`.
    pub fn find_from(
        &self,
        query: Option<&str>,
        context: Option<NodeHandle>,
    ) -> Result<Vec<NodeHandle>> {
        self.source.query_root()?;
        match query {
            Some(text) if !text.is_empty() => Query::parse(text).execute(self.source, context),
            _ => Ok(Vec::new()),
        }
    }
}
