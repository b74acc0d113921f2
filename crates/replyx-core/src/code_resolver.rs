//! Diagnostic code derivation
//!
//! A diagnostic code identifies the source location that produced a failure.
//! Files listed in the class-code map get `PREFIX-LINE`; everything else
//! collapses to `{APP}_COMMON`.

use replyx_core_types::schema::COMMON_CODE_SUFFIX;
use replyx_core_types::CallSite;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::Settings;

/// Mapping from project-relative source path to a short code prefix
///
/// Loaded once with the settings and read-only afterwards. Keys are matched
/// exactly; there is no partial or fuzzy matching.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassCodeMap(BTreeMap<String, String>);

impl ClassCodeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mapping (builder style)
    pub fn with(mut self, path: impl Into<String>, prefix: impl Into<String>) -> Self {
        self.0.insert(path.into(), prefix.into());
        self
    }

    /// Prefix for an exact path; empty prefixes count as unmapped
    pub fn get(&self, path: &str) -> Option<&str> {
        self.0
            .get(path)
            .map(String::as_str)
            .filter(|prefix| !prefix.is_empty())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ClassCodeMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Strip the project root (and the following separator) from a source path
///
/// Paths outside the root are returned unchanged.
pub fn normalize_path<'a>(file: &'a str, base_path: &str) -> &'a str {
    let root = base_path.trim_end_matches(is_separator);
    if root.is_empty() {
        return file;
    }
    file.strip_prefix(root)
        .and_then(|rest| rest.strip_prefix(is_separator))
        .unwrap_or(file)
}

fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Derives diagnostic codes from call-site locations
///
/// Pure and deterministic: identical (file, line) pairs always produce
/// identical codes.
#[derive(Debug, Clone, Copy)]
pub struct CodeResolver<'a> {
    class_codes: &'a ClassCodeMap,
    app_name: &'a str,
    base_path: &'a str,
}

impl<'a> CodeResolver<'a> {
    pub fn new(class_codes: &'a ClassCodeMap, app_name: &'a str, base_path: &'a str) -> Self {
        Self {
            class_codes,
            app_name,
            base_path,
        }
    }

    /// Resolver over the class-code map, app name and root of `settings`
    pub fn from_settings(settings: &'a Settings) -> Self {
        Self::new(
            settings.class_codes(),
            settings.app_name(),
            settings.base_path(),
        )
    }

    /// Code for `file`/`line`
    ///
    /// # Example
    ///
    /// ```
    /// use replyx_core::{ClassCodeMap, CodeResolver};
    ///
    /// let map = ClassCodeMap::new().with("src/handlers/users.rs", "USR");
    /// let resolver = CodeResolver::new(&map, "SHOP", "/srv/shop");
    ///
    /// assert_eq!(resolver.resolve("/srv/shop/src/handlers/users.rs", 42), "USR-42");
    /// assert_eq!(resolver.resolve("src/handlers/users.rs", 0), "USR");
    /// assert_eq!(resolver.resolve("src/main.rs", 7), "SHOP_COMMON");
    /// ```
    pub fn resolve(&self, file: &str, line: u32) -> String {
        let path = normalize_path(file, self.base_path);
        if path.is_empty() {
            return self.default_code();
        }
        match self.class_codes.get(path) {
            Some(prefix) if line > 0 => format!("{}-{}", prefix, line),
            Some(prefix) => prefix.to_string(),
            None => self.default_code(),
        }
    }

    pub fn resolve_site(&self, site: &CallSite) -> String {
        self.resolve(&site.file, site.line)
    }

    /// `{APP}_COMMON`
    pub fn default_code(&self) -> String {
        format!("{}{}", self.app_name, COMMON_CODE_SUFFIX)
    }
}
