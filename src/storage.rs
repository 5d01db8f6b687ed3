//! Per-browser persistence backends.
//!
//! Two stores are involved: the durable key/value store (`localStorage`) and
//! the legacy cookie jar that older versions of the calculator wrote to. Both
//! sit behind small traits so the migration logic runs unchanged against the
//! in-memory implementations in tests.

use std::collections::HashMap;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StorageError {
    #[error("failed to write {key:?}: {reason}")]
    Write { key: String, reason: String },
}

/// Durable string key/value store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str);
}

/// Read-and-delete access to legacy cookies. Values come back URI-decoded.
pub trait CookieJar {
    fn get(&self, name: &str) -> Option<String>;
    fn delete(&mut self, name: &str);

    fn check(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

/// Store that lives only as long as the page. Used in tests and as the
/// fallback when `localStorage` is disabled (private browsing, sandboxed
/// iframes).
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Cookie jar over a parsed `document.cookie` snapshot.
#[derive(Debug, Default, Clone)]
pub struct MemoryCookieJar {
    cookies: Vec<(String, String)>,
}

impl MemoryCookieJar {
    #[cfg(test)]
    pub fn from_header(header: &str) -> Self {
        Self {
            cookies: parse_cookie_header(header),
        }
    }

    pub fn insert(&mut self, name: &str, value: &str) {
        self.delete(name);
        self.cookies.push((name.to_string(), value.to_string()));
    }
}

impl CookieJar for MemoryCookieJar {
    fn get(&self, name: &str) -> Option<String> {
        lookup(&self.cookies, name)
    }

    fn delete(&mut self, name: &str) {
        self.cookies.retain(|(n, _)| n != name);
    }
}

fn lookup(cookies: &[(String, String)], name: &str) -> Option<String> {
    cookies
        .iter()
        .find(|(n, _)| n == name)
        .map(|(_, v)| v.clone())
}

/// Split a `document.cookie` string into decoded `(name, value)` pairs.
///
/// Values that are not valid percent-encoding are kept verbatim.
pub fn parse_cookie_header(header: &str) -> Vec<(String, String)> {
    header
        .split(';')
        .filter_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((decode_component(name), decode_component(value.trim())))
        })
        .collect()
}

fn decode_component(raw: &str) -> String {
    match urlencoding::decode(raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw.to_string(),
    }
}

/// `Set-Cookie`-style strings that expire `name` for the page path and for `/`.
pub fn expiry_cookies(name: &str) -> [String; 2] {
    let name = urlencoding::encode(name);
    [
        format!("{name}=; expires=Thu, 01 Jan 1970 00:00:01 GMT"),
        format!("{name}=; expires=Thu, 01 Jan 1970 00:00:01 GMT; path=/"),
    ]
}

#[cfg(target_arch = "wasm32")]
pub use browser::{BrowserCookieJar, BrowserStorage};

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::*;

    /// `window.localStorage`.
    pub struct BrowserStorage {
        storage: web_sys::Storage,
    }

    impl BrowserStorage {
        /// `None` when the browser refuses storage access.
        pub fn open() -> Option<Self> {
            let storage = web_sys::window()?.local_storage().ok()??;
            Some(Self { storage })
        }
    }

    impl KeyValueStore for BrowserStorage {
        fn get(&self, key: &str) -> Option<String> {
            self.storage.get_item(key).ok().flatten()
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            self.storage
                .set_item(key, value)
                .map_err(|e| StorageError::Write {
                    key: key.to_string(),
                    reason: format!("{e:?}"),
                })
        }

        fn remove(&mut self, key: &str) {
            if let Err(e) = self.storage.remove_item(key) {
                tracing::warn!(key, "failed to remove storage entry: {e:?}");
            }
        }
    }

    /// `document.cookie`, re-read on every access.
    pub struct BrowserCookieJar {
        document: web_sys::Document,
    }

    impl BrowserCookieJar {
        pub fn open() -> Option<Self> {
            let document = web_sys::window()?.document()?;
            Some(Self { document })
        }

        fn header(&self) -> String {
            js_sys::Reflect::get(&self.document, &"cookie".into())
                .ok()
                .and_then(|v| v.as_string())
                .unwrap_or_default()
        }
    }

    impl CookieJar for BrowserCookieJar {
        fn get(&self, name: &str) -> Option<String> {
            lookup(&parse_cookie_header(&self.header()), name)
        }

        fn delete(&mut self, name: &str) {
            for expiry in expiry_cookies(name) {
                if let Err(e) =
                    js_sys::Reflect::set(&self.document, &"cookie".into(), &expiry.as_str().into())
                {
                    tracing::warn!(name, "failed to expire cookie: {e:?}");
                }
            }
        }
    }
}
