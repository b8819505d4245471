//! Post record and form input types

use serde::{Deserialize, Serialize};

/// Author used when a new post is submitted without one
pub const DEFAULT_AUTHOR: &str = "Anonymous";
/// Title used when a new post is submitted without one
pub const DEFAULT_TITLE: &str = "Untitled";
/// Content used when a new post is submitted without one
pub const DEFAULT_CONTENT: &str = "";

/// A single blog entry as stored in the JSON document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub author: String,
    pub title: String,
    pub content: String,
}

impl Post {
    pub fn new(id: i64, author: &str, title: &str, content: &str) -> Self {
        Self {
            id,
            author: author.to_string(),
            title: title.to_string(),
            content: content.to_string(),
        }
    }
}

/// Submitted post fields
///
/// `None` means the field was absent from the form. A field that was sent
/// empty is `Some("")` and is kept as-is: defaults only fill in missing
/// fields, never blank ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostForm {
    pub author: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
}

impl PostForm {
    /// Build a new post, substituting the creation defaults for missing fields
    pub fn into_new_post(self, id: i64) -> Post {
        Post {
            id,
            author: self.author.unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
            title: self.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            content: self.content.unwrap_or_else(|| DEFAULT_CONTENT.to_string()),
        }
    }

    /// Overwrite the fields of `post` that were submitted, keep the rest
    pub fn apply_to(self, post: &mut Post) {
        if let Some(author) = self.author {
            post.author = author;
        }
        if let Some(title) = self.title {
            post.title = title;
        }
        if let Some(content) = self.content {
            post.content = content;
        }
    }
}

/// Next id to assign: one past the largest existing id, or 1 when empty
///
/// `None` when the largest id is `i64::MAX` and no larger id exists.
pub fn next_id(posts: &[Post]) -> Option<i64> {
    posts.iter().map(|p| p.id).max().unwrap_or(0).checked_add(1)
}

/// Sample posts written on first run
pub fn seed_posts() -> Vec<Post> {
    vec![
        Post::new(1, "John Doe", "First Post", "This is my first post."),
        Post::new(2, "Jane Doe", "Second Post", "This is another post."),
        Post::new(3, "Alice Smith", "Third Post", "Welcome to my blog!"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_ids(ids: &[i64]) -> Vec<Post> {
        ids.iter().map(|&id| Post::new(id, "a", "t", "c")).collect()
    }

    #[test]
    fn test_next_id_after_gaps() {
        assert_eq!(next_id(&with_ids(&[2, 5, 7])), Some(8));
        assert_eq!(next_id(&with_ids(&[7, 2, 5])), Some(8));
    }

    #[test]
    fn test_next_id_empty() {
        assert_eq!(next_id(&[]), Some(1));
    }

    #[test]
    fn test_next_id_with_negative_ids() {
        assert_eq!(next_id(&with_ids(&[-1, 2])), Some(3));
        assert_eq!(next_id(&with_ids(&[-7, -3])), Some(-2));
    }

    #[test]
    fn test_next_id_at_largest_id() {
        assert_eq!(next_id(&with_ids(&[1, i64::MAX - 1])), Some(i64::MAX));
        assert_eq!(next_id(&with_ids(&[1, i64::MAX])), None);
    }

    #[test]
    fn test_new_post_defaults() {
        let post = PostForm::default().into_new_post(4);
        assert_eq!(post, Post::new(4, "Anonymous", "Untitled", ""));
    }

    #[test]
    fn test_new_post_keeps_blank_fields() {
        let form = PostForm {
            author: Some(String::new()),
            title: Some("Hello".to_string()),
            content: None,
        };
        let post = form.into_new_post(1);
        assert_eq!(post.author, "");
        assert_eq!(post.title, "Hello");
        assert_eq!(post.content, "");
    }

    #[test]
    fn test_apply_only_submitted_fields() {
        let mut post = Post::new(2, "Jane Doe", "Second Post", "This is another post.");
        let form = PostForm {
            title: Some("Renamed".to_string()),
            ..PostForm::default()
        };
        form.apply_to(&mut post);
        assert_eq!(
            post,
            Post::new(2, "Jane Doe", "Renamed", "This is another post.")
        );
    }

    #[test]
    fn test_seed_ids() {
        let ids: Vec<i64> = seed_posts().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
