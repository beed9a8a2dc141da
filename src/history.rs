//! History walker: ancestor enumeration and split-point search.
//!
//! The commit graph is a DAG (merge commits have two parents), so walks use
//! breadth-first search with a visited set. The walk is tolerant of
//! truncated history: a parent edge pointing at an object that is not in the
//! store ends that path instead of failing, which lets the same traversal
//! serve local history queries and partially-replicated remote stores.
//!
//! # Split point
//!
//! The merge base of two commits is the common ancestor minimizing the sum
//! of BFS edge distances from both tips; ties prefer the candidate closer to
//! the second tip, then the lexicographically smaller id. Unrelated
//! histories have no common ancestor, in which case the first tip itself is
//! returned so a merge between them still has a defined (empty-overlap)
//! base.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::debug;

use crate::error::GitliteError;
use crate::model::ObjectId;
use crate::objects::ObjectStore;

/// All commits reachable from `start` (inclusive) that exist in `store`.
///
/// # Errors
/// Fails with corruption when a reachable object exists but does not parse
/// as a commit record.
pub fn ancestors(
    store: &ObjectStore,
    start: &ObjectId,
) -> Result<HashSet<ObjectId>, GitliteError> {
    Ok(distances(store, start)?.into_keys().collect())
}

/// Whether `candidate` is reachable from `tip` (every commit is its own
/// ancestor).
///
/// # Errors
/// Fails with corruption when a reachable record does not parse.
pub fn is_ancestor(
    store: &ObjectStore,
    candidate: &ObjectId,
    tip: &ObjectId,
) -> Result<bool, GitliteError> {
    Ok(ancestors(store, tip)?.contains(candidate))
}

/// Minimum edge count from `start` to every reachable commit in `store`.
///
/// BFS explores commits in distance order, so the first visit to a node
/// records its minimum distance. Parents missing from the store end their
/// path silently.
///
/// # Errors
/// Fails with corruption when a reachable record does not parse.
pub fn distances(
    store: &ObjectStore,
    start: &ObjectId,
) -> Result<HashMap<ObjectId, u32>, GitliteError> {
    let mut dist: HashMap<ObjectId, u32> = HashMap::new();
    let mut queue: VecDeque<(ObjectId, u32)> = VecDeque::new();
    if store.has(start) {
        dist.insert(start.clone(), 0);
        queue.push_back((start.clone(), 0));
    }
    while let Some((id, d)) = queue.pop_front() {
        let commit = store.read_commit(&id)?;
        for parent in &commit.parents {
            if !store.has(parent) {
                // Truncated history: stop at the missing edge.
                continue;
            }
            if !dist.contains_key(parent) {
                dist.insert(parent.clone(), d + 1);
                queue.push_back((parent.clone(), d + 1));
            }
        }
    }
    Ok(dist)
}

/// The split point (merge base) of `a` and `b`.
///
/// Over all common ancestors, picks the one minimizing `dist_a + dist_b`,
/// breaking ties by smaller `dist_b`, then by lexicographic id. Returns `a`
/// itself when the histories share no commit.
///
/// # Errors
/// Fails with corruption when a reachable record does not parse.
pub fn split_point(
    store: &ObjectStore,
    a: &ObjectId,
    b: &ObjectId,
) -> Result<ObjectId, GitliteError> {
    let dist_a = distances(store, a)?;
    let dist_b = distances(store, b)?;

    let mut common: Vec<&ObjectId> = dist_a.keys().filter(|id| dist_b.contains_key(id)).collect();
    common.sort();

    let mut best: Option<(u32, u32, &ObjectId)> = None;
    for id in common {
        let da = dist_a[id];
        let db = dist_b[id];
        let key = (da + db, db);
        // Strict comparison over a sorted scan keeps the lexicographically
        // smallest id among equal-distance candidates.
        if best.is_none_or(|(sum, tie, _)| key < (sum, tie)) {
            best = Some((key.0, key.1, id));
        }
    }

    let split = best.map_or_else(|| a.clone(), |(_, _, id)| id.clone());
    debug!(a = %a, b = %b, split = %split, "computed split point");
    Ok(split)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
