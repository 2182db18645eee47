mod data;

pub use data::POSTS;

#[derive(Debug, Clone, Copy)]
pub struct BundledAuthor {
    pub name: &'static str,
    pub avatar: Option<&'static str>,
}

/// A post compiled into the binary; always available and never mutated.
#[derive(Debug, Clone, Copy)]
pub struct BundledPost {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub content: &'static str,
    pub date: &'static str,
    pub author: BundledAuthor,
    pub cover_image: &'static str,
    pub reading_time: &'static str,
    pub tags: &'static [&'static str],
    pub featured: bool,
}

pub fn all() -> &'static [BundledPost] {
    &POSTS
}

pub fn find_by_id<'a>(catalog: &'a [BundledPost], id: &str) -> Option<&'a BundledPost> {
    catalog.iter().find(|post| post.id == id)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn catalog_ids_are_unique() {
        let ids: HashSet<_> = all().iter().map(|post| post.id).collect();
        assert_eq!(ids.len(), all().len());
    }

    #[test]
    fn first_two_posts_are_featured() {
        let featured: Vec<_> = all()
            .iter()
            .filter(|post| post.featured)
            .map(|post| post.id)
            .collect();
        assert_eq!(featured, ["1", "2"]);
    }

    #[test]
    fn find_by_id_requires_exact_match() {
        assert_eq!(find_by_id(all(), "3").map(|post| post.id), Some("3"));
        assert!(find_by_id(all(), " 3").is_none());
        assert!(find_by_id(all(), "30").is_none());
    }
}
