//! Distinct tags across a merged post sequence.

use serde::Serialize;

use crate::domain::entities::Post;

/// Label shown for the "no filter" pseudo-category.
pub const ALL_LABEL: &str = "全部";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub name: String,
    /// Published posts carrying the tag.
    pub count: usize,
}

/// Tags in first-seen order; every name appears once.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct TagIndex {
    entries: Vec<TagCount>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category<'a> {
    All,
    Tag(&'a str),
}

impl Category<'_> {
    pub fn label(&self) -> &str {
        match self {
            Category::All => ALL_LABEL,
            Category::Tag(name) => name,
        }
    }
}

impl TagIndex {
    pub fn from_posts(posts: &[Post]) -> Self {
        let mut entries: Vec<TagCount> = Vec::new();
        for post in posts {
            for tag in &post.tags {
                let increment = usize::from(post.published);
                match entries.iter_mut().find(|entry| entry.name == *tag) {
                    Some(entry) => entry.count += increment,
                    None => entries.push(TagCount {
                        name: tag.clone(),
                        count: increment,
                    }),
                }
            }
        }
        Self { entries }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    pub fn entries(&self) -> &[TagCount] {
        &self.entries
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.entries.iter().any(|entry| entry.name == tag)
    }

    pub fn count(&self, tag: &str) -> usize {
        self.entries
            .iter()
            .find(|entry| entry.name == tag)
            .map_or(0, |entry| entry.count)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The selector row: `All` first, then each tag.
    pub fn categories(&self) -> Vec<Category<'_>> {
        std::iter::once(Category::All)
            .chain(self.names().map(Category::Tag))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Author;

    fn post(id: &str, tags: &[&str], published: bool) -> Post {
        Post {
            id: id.to_string(),
            title: id.to_string(),
            description: String::new(),
            content: String::new(),
            cover_image: String::new(),
            tags: tags.iter().map(|tag| (*tag).to_string()).collect(),
            date: String::new(),
            reading_time: String::new(),
            author: Author {
                name: "a".to_string(),
                avatar: None,
            },
            published,
            featured: false,
        }
    }

    #[test]
    fn preserves_first_seen_order_without_duplicates() {
        let posts = vec![
            post("1", &["设计", "技术"], true),
            post("2", &["职场", "设计"], true),
            post("3", &["技术", "rust"], true),
        ];

        let index = TagIndex::from_posts(&posts);
        assert_eq!(index.names().collect::<Vec<_>>(), ["设计", "技术", "职场", "rust"]);
        assert_eq!(index.count("设计"), 2);
        assert_eq!(index.count("missing"), 0);
    }

    #[test]
    fn drafts_contribute_tags_but_not_counts() {
        let posts = vec![post("1", &["draft-only"], false), post("2", &["shared"], true)];

        let index = TagIndex::from_posts(&posts);
        assert!(index.contains("draft-only"));
        assert_eq!(index.count("draft-only"), 0);
        assert_eq!(index.count("shared"), 1);
    }

    #[test]
    fn categories_start_with_all() {
        let index = TagIndex::from_posts(&[post("1", &["a", "b"], true)]);
        let categories = index.categories();

        assert_eq!(categories, [Category::All, Category::Tag("a"), Category::Tag("b")]);
        assert_eq!(categories[0].label(), ALL_LABEL);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn empty_sequence_yields_empty_index() {
        let index = TagIndex::from_posts(&[]);
        assert!(index.is_empty());
        assert_eq!(index.categories(), [Category::All]);
    }
}
