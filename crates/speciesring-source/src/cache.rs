//! On-disk response cache.
//!
//! Every cached response lives in its own JSON file named by the SHA-256
//! digest of the request URL. Entries record when they were fetched and are
//! ignored once older than the configured expiry.

use std::{
    fs,
    path::{Path, PathBuf},
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{
    SourceError,
    transport::{Page, Transport},
};

/// Default lifetime of a cache entry: one day.
pub const DEFAULT_EXPIRY: Duration = Duration::from_secs(86_400);

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    fetched_at: u64,
    page: Page,
}

/// A directory of cached responses.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    dir: PathBuf,
    expiry: Duration,
}

impl ResponseCache {
    /// Creates a cache rooted at `dir`. The directory is created lazily on
    /// the first write. A zero `expiry` disables the cache.
    pub fn new(dir: impl Into<PathBuf>, expiry: Duration) -> Self {
        Self {
            dir: dir.into(),
            expiry,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn is_enabled(&self) -> bool {
        !self.expiry.is_zero()
    }

    /// Returns the cached page for `url` when present and still fresh.
    ///
    /// Unreadable or corrupt entries count as misses.
    pub fn lookup(&self, url: &str) -> Option<Page> {
        if !self.is_enabled() {
            return None;
        }

        let path = self.entry_path(url);
        let content = fs::read_to_string(&path).ok()?;
        let entry: CacheEntry = match serde_json::from_str(&content) {
            Ok(entry) => entry,
            Err(err) => {
                warn!(path = path.display().to_string(), err:%; "Ignoring corrupt cache entry");
                return None;
            }
        };

        let age = now_secs().saturating_sub(entry.fetched_at);
        if age >= self.expiry.as_secs() {
            debug!(url, age; "Cache entry expired");
            return None;
        }

        debug!(url; "Cache hit");
        Some(entry.page)
    }

    /// Stores `page` as the response for `url`.
    ///
    /// # Errors
    ///
    /// Returns an error when the cache directory or entry file cannot be
    /// written.
    pub fn store(&self, url: &str, page: &Page) -> Result<(), SourceError> {
        if !self.is_enabled() {
            return Ok(());
        }

        fs::create_dir_all(&self.dir)?;
        let entry = CacheEntry {
            fetched_at: now_secs(),
            page: page.clone(),
        };
        fs::write(self.entry_path(url), serde_json::to_string(&entry)?)?;
        Ok(())
    }

    fn entry_path(&self, url: &str) -> PathBuf {
        self.dir.join(format!("{}.json", cache_key(url)))
    }
}

/// Hex-encoded SHA-256 digest of `url`.
///
/// # Examples
///
/// ```
/// use speciesring_source::cache::cache_key;
///
/// let key = cache_key("https://rest.uniprot.org/uniprotkb/search");
/// assert_eq!(key.len(), 64);
/// assert_eq!(key, cache_key("https://rest.uniprot.org/uniprotkb/search"));
/// ```
pub fn cache_key(url: &str) -> String {
    format!("{:x}", Sha256::digest(url.as_bytes()))
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}

/// A [`Transport`] answering from a [`ResponseCache`] before delegating.
#[derive(Debug)]
pub struct CachedTransport<T> {
    inner: T,
    cache: ResponseCache,
}

impl<T> CachedTransport<T> {
    pub fn new(inner: T, cache: ResponseCache) -> Self {
        Self { inner, cache }
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }
}

impl<T: Transport> Transport for CachedTransport<T> {
    fn get(&self, url: &str) -> Result<Page, SourceError> {
        if let Some(page) = self.cache.lookup(url) {
            return Ok(page);
        }

        let page = self.inner.get(url)?;
        if let Err(err) = self.cache.store(url, &page) {
            warn!(url, err:%; "Failed to write cache entry");
        }
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use tempfile::tempdir;

    use super::*;

    /// Counts requests and answers every URL with its own text.
    struct CountingTransport {
        calls: Cell<usize>,
    }

    impl CountingTransport {
        fn new() -> Self {
            Self {
                calls: Cell::new(0),
            }
        }
    }

    impl Transport for CountingTransport {
        fn get(&self, url: &str) -> Result<Page, SourceError> {
            self.calls.set(self.calls.get() + 1);
            Ok(Page::new(url, None))
        }
    }

    #[test]
    fn test_cache_key_is_stable_hex() {
        let key = cache_key("https://example.org");
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(key, cache_key("https://example.org/other"));
    }

    #[test]
    fn test_store_then_lookup() {
        let dir = tempdir().unwrap();
        let cache = ResponseCache::new(dir.path().join("uniprot_cache"), DEFAULT_EXPIRY);

        assert!(cache.lookup("https://example.org/a").is_none());

        let page = Page::new("body", Some("https://example.org/b".to_string()));
        cache.store("https://example.org/a", &page).unwrap();

        assert_eq!(cache.lookup("https://example.org/a"), Some(page));
        assert!(cache.lookup("https://example.org/b").is_none());
    }

    #[test]
    fn test_expired_entry_is_ignored() {
        let dir = tempdir().unwrap();
        let cache = ResponseCache::new(dir.path(), Duration::from_secs(60));

        let stale = CacheEntry {
            fetched_at: now_secs() - 3600,
            page: Page::new("old", None),
        };
        fs::write(
            cache.entry_path("https://example.org"),
            serde_json::to_string(&stale).unwrap(),
        )
        .unwrap();

        assert!(cache.lookup("https://example.org").is_none());
    }

    #[test]
    fn test_corrupt_entry_is_a_miss() {
        let dir = tempdir().unwrap();
        let cache = ResponseCache::new(dir.path(), DEFAULT_EXPIRY);
        fs::write(cache.entry_path("https://example.org"), "not json").unwrap();

        assert!(cache.lookup("https://example.org").is_none());
    }

    #[test]
    fn test_disabled_cache_never_writes() {
        let dir = tempdir().unwrap();
        let cache = ResponseCache::new(dir.path().join("off"), Duration::ZERO);
        assert!(!cache.is_enabled());

        cache
            .store("https://example.org", &Page::new("x", None))
            .unwrap();
        assert!(!cache.dir().exists());
    }

    #[test]
    fn test_cached_transport_fetches_once() {
        let dir = tempdir().unwrap();
        let transport = CachedTransport::new(
            CountingTransport::new(),
            ResponseCache::new(dir.path(), DEFAULT_EXPIRY),
        );

        let first = transport.get("https://example.org/x").unwrap();
        let second = transport.get("https://example.org/x").unwrap();

        assert_eq!(first, second);
        assert_eq!(first.body(), "https://example.org/x");
        assert_eq!(transport.inner.calls.get(), 1);
    }
}
