//! Post store module
//!
//! Sole owner of the JSON document holding every post. Reads always go to
//! disk; there is no in-memory copy shared between requests. Mutations run
//! their whole load-modify-save cycle under one async lock, and every write
//! replaces the document through a rename so readers never see a partial file.
//! A document that fails to load is never rewritten, whatever the policy.

mod error;
mod post;

pub use error::StoreError;
pub use post::{seed_posts, Post, PostForm};

use post::next_id;

use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

use crate::config::{CorruptPolicy, StorageConfig};
use crate::logger;

/// File-backed post collection
pub struct PostStore {
    path: PathBuf,
    on_corrupt: CorruptPolicy,
    /// Held across every load-modify-save cycle and while seeding
    writer: Mutex<()>,
}

impl PostStore {
    pub fn new<P: AsRef<Path>>(path: P, on_corrupt: CorruptPolicy) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            on_corrupt,
            writer: Mutex::new(()),
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(&config.path, config.on_corrupt)
    }

    #[allow(clippy::missing_const_for_fn)]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every post, seeding the document if it does not exist yet
    ///
    /// Read and parse failures are returned as-is; see [`Self::posts`] for
    /// the variant that applies the configured corruption policy.
    pub async fn load(&self) -> Result<Vec<Post>, StoreError> {
        if let Some(posts) = self.read_existing().await? {
            return Ok(posts);
        }
        let _writer = self.writer.lock().await;
        self.load_locked().await
    }

    /// Read every post, applying the configured policy to read failures
    pub async fn posts(&self) -> Result<Vec<Post>, StoreError> {
        let loaded = self.load().await;
        self.degrade(loaded)
    }

    /// Replace the whole document with `posts`
    pub async fn save(&self, posts: &[Post]) -> Result<(), StoreError> {
        let data = encode(posts).map_err(|source| StoreError::Serialize {
            path: self.path.clone(),
            source,
        })?;
        self.write_atomically(&data)
            .await
            .map_err(|source| StoreError::Write {
                path: self.path.clone(),
                source,
            })?;
        logger::log_debug(&format!(
            "[Store] Saved {} posts to {}",
            posts.len(),
            self.path.display()
        ));
        Ok(())
    }

    /// Look up a single post; every call re-reads the document
    pub async fn fetch_by_id(&self, id: i64) -> Result<Option<Post>, StoreError> {
        Ok(self.posts().await?.into_iter().find(|p| p.id == id))
    }

    /// Append a post built from `form` with the next free id
    pub async fn create(&self, form: PostForm) -> Result<Post, StoreError> {
        let _writer = self.writer.lock().await;
        let mut posts = self.load_locked().await?;
        let id = next_id(&posts).ok_or_else(|| StoreError::IdsExhausted {
            path: self.path.clone(),
        })?;
        let post = form.into_new_post(id);
        posts.push(post.clone());
        self.save(&posts).await?;
        Ok(post)
    }

    /// Apply `form` to the post with `id`
    ///
    /// Returns `Ok(None)` without writing anything when no such post exists.
    pub async fn update(&self, id: i64, form: PostForm) -> Result<Option<Post>, StoreError> {
        let _writer = self.writer.lock().await;
        let mut posts = self.load_locked().await?;
        let Some(post) = posts.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        form.apply_to(post);
        let updated = post.clone();
        self.save(&posts).await?;
        Ok(Some(updated))
    }

    /// Remove the post with `id`; an unknown id leaves the collection as it was
    ///
    /// Returns whether a post was removed.
    pub async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let _writer = self.writer.lock().await;
        let mut posts = self.load_locked().await?;
        let before = posts.len();
        posts.retain(|p| p.id != id);
        self.save(&posts).await?;
        Ok(posts.len() != before)
    }

    /// Caller must hold `writer`
    ///
    /// Mutations go through here without the corruption policy, so a
    /// document that cannot be read or parsed is never overwritten.
    async fn load_locked(&self) -> Result<Vec<Post>, StoreError> {
        match self.read_existing().await? {
            Some(posts) => Ok(posts),
            None => {
                let posts = seed_posts();
                self.save(&posts).await?;
                logger::log_info(&format!(
                    "[Store] Seeded {} with {} sample posts",
                    self.path.display(),
                    posts.len()
                ));
                Ok(posts)
            }
        }
    }

    /// `Ok(None)` when the document does not exist
    async fn read_existing(&self) -> Result<Option<Vec<Post>>, StoreError> {
        let data = match fs::read(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Unreadable {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        serde_json::from_slice(&data)
            .map(Some)
            .map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            })
    }

    fn degrade(&self, loaded: Result<Vec<Post>, StoreError>) -> Result<Vec<Post>, StoreError> {
        match loaded {
            Err(e) if e.is_read_failure() && self.on_corrupt == CorruptPolicy::Empty => {
                logger::log_warning(&format!("{e}; continuing with no posts"));
                Ok(Vec::new())
            }
            other => other,
        }
    }

    async fn write_atomically(&self, data: &[u8]) -> io::Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir).await?;
            }
        }
        let tmp = temp_path(&self.path);
        fs::write(&tmp, data).await?;
        fs::rename(&tmp, &self.path).await
    }
}

/// Pretty-print with four-space indentation
fn encode(posts: &[Post]) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    posts.serialize(&mut serializer)?;
    Ok(buf)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(std::ffi::OsStr::to_os_string)
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
