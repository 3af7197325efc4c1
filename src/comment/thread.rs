use std::collections::HashMap;

use crate::comment::model::{Comment, CommentNode};

/// What to do with a comment whose `parent_id` does not resolve within the
/// article's comment set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrphanPolicy {
    /// Show the comment (and its replies) as a top-level thread.
    PromoteToRoot,
    /// Leave the comment and its replies out of the tree.
    #[allow(dead_code)]
    Discard,
}

pub const ORPHAN_POLICY: OrphanPolicy = OrphanPolicy::PromoteToRoot;

/// Assemble a flat list of comments into a forest of reply trees.
///
/// Every comment is indexed before any linking happens, so the result does
/// not depend on input order. Roots come back newest first; replies keep the
/// order in which they were visited.
pub fn build_threads(comments: &[Comment], policy: OrphanPolicy) -> Vec<CommentNode> {
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(comments.len());
    for (i, comment) in comments.iter().enumerate() {
        index.entry(comment.id.as_str()).or_insert(i);
    }

    let parent_of: Vec<Option<usize>> = comments
        .iter()
        .map(|comment| {
            comment
                .parent_id
                .as_deref()
                .and_then(|pid| index.get(pid).copied())
        })
        .collect();

    let cyclic = cycle_members(&parent_of);

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); comments.len()];
    let mut roots: Vec<usize> = Vec::new();

    for (i, comment) in comments.iter().enumerate() {
        match parent_of[i] {
            Some(p) if !cyclic[i] => children[p].push(i),
            _ if comment.parent_id.is_none() => roots.push(i),
            _ => match policy {
                OrphanPolicy::PromoteToRoot => roots.push(i),
                OrphanPolicy::Discard => {
                    log::debug!("dropping orphaned comment {}", comment.id);
                }
            },
        }
    }

    // Preorder from the roots; walking it backwards visits every child
    // before its parent, so nodes can be assembled without recursion.
    let mut preorder = Vec::with_capacity(comments.len());
    let mut stack: Vec<usize> = roots.iter().rev().copied().collect();
    while let Some(i) = stack.pop() {
        preorder.push(i);
        stack.extend(children[i].iter().rev().copied());
    }

    let mut built: Vec<Option<CommentNode>> = vec![None; comments.len()];
    for &i in preorder.iter().rev() {
        let mut node = CommentNode::from(&comments[i]);
        node.replies = children[i]
            .iter()
            .filter_map(|&c| built[c].take())
            .collect();
        built[i] = Some(node);
    }

    let mut forest: Vec<CommentNode> = roots.iter().filter_map(|&r| built[r].take()).collect();
    forest.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    forest
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnPath,
    Done,
}

/// Flags every comment whose parent links lead back to itself.
///
/// Each node is walked at most once, so a long reply chain costs one pass.
/// A walk that reaches a node already on its own path has closed a loop;
/// a walk that reaches a finished node stops there.
fn cycle_members(parent_of: &[Option<usize>]) -> Vec<bool> {
    let mut mark = vec![Mark::Unvisited; parent_of.len()];
    let mut cyclic = vec![false; parent_of.len()];
    let mut path: Vec<usize> = Vec::new();

    for start in 0..parent_of.len() {
        let mut current = Some(start);
        while let Some(i) = current {
            match mark[i] {
                Mark::Unvisited => {
                    mark[i] = Mark::OnPath;
                    path.push(i);
                    current = parent_of[i];
                }
                Mark::OnPath => {
                    if let Some(pos) = path.iter().rposition(|&p| p == i) {
                        for &member in &path[pos..] {
                            cyclic[member] = true;
                        }
                    }
                    break;
                }
                Mark::Done => break,
            }
        }
        for i in path.drain(..) {
            mark[i] = Mark::Done;
        }
    }

    cyclic
}
