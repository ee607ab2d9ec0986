//! Versioned cache namespaces and the shell manifest.

/// Shell resources needed to boot the application offline, relative to the worker scope.
pub const DEFAULT_SHELL: &[&str] = &[
    "./",
    "./?source=pwa",
    "./index.html",
    "./manifest.json",
    "./icons/icon-192.png",
    "./icons/icon-512.png",
    "./icons/maskable-192.png",
    "./icons/maskable-512.png",
];

/// Query parameter carrying the version tag on shell URLs.
pub const VERSION_PARAM: &str = "v";

/// Name of the cache namespace for an app at a given version.
pub fn namespace_name(app_name: &str, version: &str) -> String {
    format!("{app_name}-cache-v{version}")
}

/// Append the version parameter to a (possibly relative) URL.
///
/// Uses `?` when the URL has no query yet, `&` otherwise.
pub fn with_version(url: &str, version: &str) -> String {
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{url}{sep}{VERSION_PARAM}={version}")
}

/// Ordered list of shell resource URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellManifest {
    entries: Vec<String>,
}

impl ShellManifest {
    pub fn new(entries: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self { entries: entries.into_iter().map(Into::into).collect() }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Manifest URLs decorated with the version parameter, in manifest order.
    pub fn versioned(&self, version: &str) -> Vec<String> {
        self.entries.iter().map(|url| with_version(url, version)).collect()
    }
}

impl Default for ShellManifest {
    fn default() -> Self {
        Self::new(DEFAULT_SHELL.iter().copied())
    }
}
