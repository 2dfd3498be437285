//! First-resolvable-wins selection over prioritised candidates.

use crate::error::ResolveError;

/// Outcome of walking the candidate list.
#[derive(Debug)]
pub enum Selection<'a, T> {
    Found { candidate: &'a T, url: String },
    /// Every candidate failed; one message per failure, in order.
    Exhausted { failures: Vec<String> },
}

/// Tries `candidates` in order and returns the first that `resolve_one` turns into a URL.
/// Ordinary failures are logged and skipped. A `ResolveError::Blocked` aborts the walk:
/// the remaining candidates go through the same endpoint and would be blocked too.
pub fn select_first<'a, T, F>(
    candidates: &'a [T],
    mut resolve_one: F,
) -> anyhow::Result<Selection<'a, T>>
where
    T: std::fmt::Debug,
    F: FnMut(&T) -> anyhow::Result<String>,
{
    let mut failures = Vec::new();
    for candidate in candidates {
        match resolve_one(candidate) {
            Ok(url) => {
                tracing::debug!(?candidate, "candidate resolved");
                return Ok(Selection::Found { candidate, url });
            }
            Err(e) => {
                if matches!(e.downcast_ref::<ResolveError>(), Some(ResolveError::Blocked { .. })) {
                    return Err(e);
                }
                tracing::warn!(?candidate, "candidate failed: {:#}", e);
                failures.push(format!("{:#}", e));
            }
        }
    }
    Ok(Selection::Exhausted { failures })
}
