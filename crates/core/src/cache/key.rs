//! Composite cache keys.
//!
//! Layout: `camply_cache:<content_type>:<owner_id>[:<scope_id>]` for the entry,
//! and the same string with a `#meta` suffix for its metadata. Components are
//! percent-escaped for `%`, `:` and `#`, so any tuple maps to exactly one key
//! and every key parses back to its tuple.

/// Namespace marker shared by every key the cache writes.
pub const CACHE_NAMESPACE: &str = "camply_cache";

/// Suffix turning an entry key into its metadata key.
pub const METADATA_SUFFIX: &str = "#meta";

const SEPARATOR: char = ':';

/// Entry and metadata keys for one cache slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    entry: String,
    metadata: String,
}

/// The tuple a cache key was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyParts {
    pub content_type: String,
    pub owner_id: String,
    pub scope_id: Option<String>,
}

impl CacheKey {
    /// Build the keys for `(content_type, owner_id, scope_id)`.
    ///
    /// An empty scope is the same slot as no scope.
    pub fn new(content_type: &str, owner_id: &str, scope_id: Option<&str>) -> Self {
        let mut entry = format!("{CACHE_NAMESPACE}{SEPARATOR}{}{SEPARATOR}{}", escape(content_type), escape(owner_id));
        if let Some(scope) = scope_id.filter(|s| !s.is_empty()) {
            entry.push(SEPARATOR);
            entry.push_str(&escape(scope));
        }
        let metadata = format!("{entry}{METADATA_SUFFIX}");
        Self { entry, metadata }
    }

    /// Rebuild the pair from a stored metadata key.
    ///
    /// Returns `None` for anything outside the cache namespace.
    pub fn from_metadata_key(key: &str) -> Option<Self> {
        let entry = key.strip_suffix(METADATA_SUFFIX)?;
        parse_entry(entry)?;
        Some(Self { entry: entry.to_string(), metadata: key.to_string() })
    }

    pub fn entry(&self) -> &str {
        &self.entry
    }

    pub fn metadata(&self) -> &str {
        &self.metadata
    }

    /// Decode an entry or metadata key. `None` if it is not a cache key.
    pub fn parse(key: &str) -> Option<KeyParts> {
        parse_entry(key.strip_suffix(METADATA_SUFFIX).unwrap_or(key))
    }

    /// Whether `key` is an entry key of the cache namespace.
    pub fn is_entry_key(key: &str) -> bool {
        !key.ends_with(METADATA_SUFFIX) && parse_entry(key).is_some()
    }

    /// Whether `key` is a metadata key of the cache namespace.
    pub fn is_metadata_key(key: &str) -> bool {
        key.strip_suffix(METADATA_SUFFIX).and_then(parse_entry).is_some()
    }
}

fn parse_entry(entry: &str) -> Option<KeyParts> {
    let mut segments = entry.split(SEPARATOR);
    if segments.next()? != CACHE_NAMESPACE {
        return None;
    }
    let content_type = unescape(segments.next()?)?;
    let owner_id = unescape(segments.next()?)?;
    let scope_id = match segments.next() {
        Some(scope) if !scope.is_empty() => Some(unescape(scope)?),
        Some(_) => return None,
        None => None,
    };
    if segments.next().is_some() {
        return None;
    }
    Some(KeyParts { content_type, owner_id, scope_id })
}

fn escape(component: &str) -> String {
    let mut out = String::with_capacity(component.len());
    for c in component.chars() {
        match c {
            '%' => out.push_str("%25"),
            ':' => out.push_str("%3A"),
            '#' => out.push_str("%23"),
            _ => out.push(c),
        }
    }
    out
}

fn unescape(component: &str) -> Option<String> {
    if component.contains('#') {
        return None;
    }
    let mut out = String::with_capacity(component.len());
    let mut rest = component;
    while let Some(idx) = rest.find('%') {
        out.push_str(&rest[..idx]);
        let code = rest.get(idx + 1..idx + 3)?;
        out.push(match code {
            "25" => '%',
            "3A" => ':',
            "23" => '#',
            _ => return None,
        });
        rest = &rest[idx + 3..];
    }
    out.push_str(rest);
    Some(out)
}
