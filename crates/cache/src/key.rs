use derive_more::Display;

/// Identity of the content item (post, page, ...) that owns cache entries.
#[derive(Debug, Display, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(String);
impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl From<u64> for ItemId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}
impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}
impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Key of one cached passage within a content item: the BLAKE3 hash of the
/// citation text followed by the translation code.
///
/// Both the citation and the translation are part of the key, so editing
/// either on the same item never reads a stale entry.
#[derive(Debug, Display, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);
impl CacheKey {
    pub fn new(citation: impl AsRef<str>, translation: impl AsRef<str>) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(citation.as_ref().as_bytes());
        hasher.update(translation.as_ref().as_bytes());
        Self(hasher.finalize().to_hex().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
