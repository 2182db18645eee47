//! Combining bundled and backend posts into a single, identifier-unique sequence.

use std::collections::HashMap;

use crate::domain::entities::Post;

/// Append `backend` after `bundled` and collapse duplicate identifiers.
///
/// A post keeps the position of the first occurrence of its `id`, while the
/// content comes from the last occurrence, so a backend row replaces the
/// bundled record it shadows without moving it. Nothing is filtered here.
pub fn merge_posts<B, L>(bundled: B, backend: L) -> Vec<Post>
where
    B: IntoIterator<Item = Post>,
    L: IntoIterator<Item = Post>,
{
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut merged: Vec<Post> = Vec::new();

    for post in bundled.into_iter().chain(backend) {
        match positions.get(&post.id) {
            Some(&index) => merged[index] = post,
            None => {
                positions.insert(post.id.clone(), merged.len());
                merged.push(post);
            }
        }
    }

    merged
}
