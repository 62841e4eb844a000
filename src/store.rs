use crate::models::{BlogPost, Category, Comment, Record, User};
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

/// Insertion-ordered records with a monotonic id counter.
///
/// Ids are handed out from `next_id` rather than derived from the length, so
/// they stay unique even if records are ever removed.
#[derive(Debug)]
pub struct Collection<T> {
    items: Vec<T>,
    next_id: u64,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            next_id: 1,
        }
    }
}

impl<T: Record + Clone> Collection<T> {
    pub fn list(&self) -> &[T] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Assign the next id, build the record with it and append it.
    pub fn insert_with(&mut self, build: impl FnOnce(String) -> T) -> T {
        let id = self.next_id.to_string();
        self.next_id += 1;
        let record = build(id);
        self.items.push(record.clone());
        record
    }
}

/// In-memory backing for every entity. Each collection has its own lock.
#[derive(Debug, Default)]
pub struct Store {
    pub users: RwLock<Collection<User>>,
    pub posts: RwLock<Collection<BlogPost>>,
    pub categories: RwLock<Collection<Category>>,
    pub comments: RwLock<Collection<Comment>>,
}

fn at(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding the demo users, categories and posts.
    pub fn seeded() -> Self {
        let mut users = Collection::default();
        users.insert_with(|id| User {
            id,
            username: "johndoe".into(),
            password: "********".into(),
            email: "john@example.com".into(),
            display_name: Some("John Doe".into()),
            profile_image_url: Some("https://randomuser.me/api/portraits/men/1.jpg".into()),
            roles: vec!["user".into()],
            created_at: at(1_704_067_200),
            updated_at: at(1_748_822_400),
        });
        users.insert_with(|id| User {
            id,
            username: "janedoe".into(),
            password: "********".into(),
            email: "jane@example.com".into(),
            display_name: Some("Jane Doe".into()),
            profile_image_url: Some("https://randomuser.me/api/portraits/women/2.jpg".into()),
            roles: vec!["admin".into()],
            created_at: at(1_706_745_600),
            updated_at: at(1_748_822_400),
        });

        let mut categories = Collection::default();
        for name in ["General", "Tech"] {
            categories.insert_with(|id| Category {
                id,
                name: name.into(),
                created_at: at(1_704_067_200),
                updated_at: at(1_704_067_200),
            });
        }

        let mut posts = Collection::default();
        posts.insert_with(|id| BlogPost {
            id,
            title: "Welcome to NextBlog".into(),
            content: "NextBlog is a small demo for managing users, blog posts and categories. \
                      Everything you add lives in memory and disappears when the server restarts."
                .into(),
            author_id: "1".into(),
            created_at: at(1_741_564_800),
            updated_at: at(1_741_564_800),
            tags: vec!["intro".into(), "news".into()],
            cover_image_url: None,
            category_id: Some("1".into()),
        });
        posts.insert_with(|id| BlogPost {
            id,
            title: "Routing Requests in Rust".into(),
            content: "A short tour of how requests find their handlers: the router matches the \
                      path, extractors pull state and bodies out of the request, and the handler \
                      returns something that converts into a response."
                .into(),
            author_id: "2".into(),
            created_at: at(1_745_280_000),
            updated_at: at(1_745_280_000),
            tags: vec!["rust".into(), "web".into()],
            cover_image_url: None,
            category_id: Some("2".into()),
        });

        Self {
            users: RwLock::new(users),
            posts: RwLock::new(posts),
            categories: RwLock::new(categories),
            comments: RwLock::new(Collection::default()),
        }
    }
}
