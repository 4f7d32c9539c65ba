//! tree::search
//!
//! Recursive name search over the remote content tree.
//!
//! # Traversal contract
//!
//! The search is a depth-first, pre-order walk: siblings are visited in
//! the repository's listing order, and a folder's subtree is fully
//! explored (subject to the result cap) before the next sibling is
//! taken. This order is observable in the results, so it is a
//! contract, not an implementation detail.
//!
//! The walk uses an explicit work stack rather than call recursion:
//! tree depth is unbounded and remote, and the stack makes the early
//! stop at `max_results` a plain `break` instead of an unwind through
//! nested calls.
//!
//! # Partial failure
//!
//! A subtree whose listing fails upstream is skipped, not fatal: the
//! failure is recorded in the outcome and logged, and the walk
//! continues with the siblings. Only a failure to resolve the start
//! path aborts the search.

use std::sync::Arc;

use thiserror::Error;
use tracing::warn;

use super::resolver::{PathResolver, ResolveError};
use crate::core::types::FolderPath;
use crate::repository::{ContentDirectory, DirectoryError, Node};

/// Errors that abort a search outright.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The start path could not be resolved.
    #[error("cannot start search: {0}")]
    Resolve(#[from] ResolveError),
}

/// A single search match.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    /// The matching node.
    pub node: Node,
    /// Path of the folder the node was found in.
    pub containing_path: FolderPath,
}

/// A subtree that was skipped after its listing failed.
#[derive(Debug, Clone)]
pub struct SkippedSubtree {
    /// Path of the folder that could not be listed.
    pub path: FolderPath,
    /// The upstream failure.
    pub error: DirectoryError,
}

/// The result of a search: matches in traversal order, plus the
/// subtrees that had to be skipped.
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    /// Matches, in pre-order traversal order, at most `max_results`.
    pub hits: Vec<SearchHit>,
    /// Subtrees skipped after upstream listing failures.
    pub skipped: Vec<SkippedSubtree>,
}

/// One level of the walk: a folder's path and its remaining children.
struct Frame {
    path: FolderPath,
    children: std::vec::IntoIter<Node>,
}

/// Recursive name search over the content tree.
#[derive(Clone)]
pub struct TreeSearch {
    directory: Arc<dyn ContentDirectory>,
    resolver: PathResolver,
}

impl std::fmt::Debug for TreeSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeSearch")
            .field("directory", &self.directory.name())
            .finish()
    }
}

impl TreeSearch {
    /// Create a search over a directory, resolving start paths with the
    /// given resolver.
    pub fn new(directory: Arc<dyn ContentDirectory>, resolver: PathResolver) -> Self {
        Self { directory, resolver }
    }

    /// Find nodes whose name contains `query`, case-insensitively,
    /// starting from `start_path`.
    ///
    /// Collects at most `max_results` hits; once the cap is reached the
    /// entire walk stops: no further siblings or subtrees are visited,
    /// and no further listings are requested.
    ///
    /// # Errors
    ///
    /// [`SearchError::Resolve`] if the start path cannot be resolved.
    /// Listing failures below the start do not error; see
    /// [`SearchOutcome::skipped`].
    pub async fn search(
        &self,
        query: &str,
        max_results: usize,
        start_path: &FolderPath,
    ) -> Result<SearchOutcome, SearchError> {
        let start_id = self.resolver.resolve(start_path).await?;
        let needle = query.to_lowercase();

        let mut outcome = SearchOutcome::default();
        let mut stack: Vec<Frame> = Vec::new();

        match self.directory.list_children(&start_id).await {
            Ok(children) => stack.push(Frame {
                path: start_path.clone(),
                children: children.into_iter(),
            }),
            Err(error) => {
                warn!(path = %start_path, %error, "skipping unreadable search root");
                outcome.skipped.push(SkippedSubtree {
                    path: start_path.clone(),
                    error,
                });
            }
        }

        loop {
            let Some(frame) = stack.last_mut() else { break };

            let Some(child) = frame.children.next() else {
                stack.pop();
                continue;
            };

            if outcome.hits.len() >= max_results {
                break;
            }

            let here = frame.path.clone();

            if child.name.to_lowercase().contains(&needle) {
                outcome.hits.push(SearchHit {
                    node: child.clone(),
                    containing_path: here.clone(),
                });
                // The cap is reached by this very hit: stop before any
                // descent so no subtree beyond the last match is visited.
                if outcome.hits.len() >= max_results {
                    break;
                }
            }

            if child.is_folder {
                let child_path = here.join(&child.name);
                match self.directory.list_children(&child.id).await {
                    Ok(children) => stack.push(Frame {
                        path: child_path,
                        children: children.into_iter(),
                    }),
                    Err(error) => {
                        warn!(path = %child_path, %error, "skipping unreadable subtree");
                        outcome.skipped.push(SkippedSubtree {
                            path: child_path,
                            error,
                        });
                    }
                }
            }
        }

        Ok(outcome)
    }
}
