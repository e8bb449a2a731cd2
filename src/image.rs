//! Symbolic image identifiers and their resolution into displayable assets.
//!
//! The engine never decodes anything itself. Nodes carry identifiers such as
//! `images/background.png`; an [`ImageProvider`] turns each one into a
//! [`slint::Image`] or reports it unavailable. Animated formats are never handed to
//! the provider at all: the entry keeps its name and renders as a placeholder.

use crate::config::ImageConfig;
use crate::error::ImageError;
#[cfg(feature = "file-images")]
use std::path::{Path, PathBuf};

/// The displayable asset a resolved identifier turns into.
pub type AssetHandle = slint::Image;

/// Resolves an image identifier to a displayable asset.
pub trait ImageProvider {
    fn resolve(&self, identifier: &str) -> Result<AssetHandle, ImageError>;
}

/// Loads images from disk, relative to a base directory.
#[cfg(feature = "file-images")]
#[derive(Debug, Clone)]
pub struct FileImageProvider {
    base_dir: PathBuf,
}

#[cfg(feature = "file-images")]
impl FileImageProvider {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self { base_dir: base_dir.into() }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

#[cfg(feature = "file-images")]
impl ImageProvider for FileImageProvider {
    fn resolve(&self, identifier: &str) -> Result<AssetHandle, ImageError> {
        let path = self.base_dir.join(identifier);
        if !path.is_file() {
            return Err(ImageError::NotFound(identifier.to_string()));
        }
        slint::Image::load_from_path(&path).map_err(|_| ImageError::Decode {
            identifier: identifier.to_string(),
            reason: "unsupported or corrupt image data".to_string(),
        })
    }
}

/// Provider for headless use: everything is unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullImageProvider;

impl ImageProvider for NullImageProvider {
    fn resolve(&self, identifier: &str) -> Result<AssetHandle, ImageError> {
        Err(ImageError::NotFound(identifier.to_string()))
    }
}

/// Ordered image identifiers with a parallel list of resolved handles.
///
/// `handles[i]` belongs to `names[i]`; `None` means the image is unavailable (failed to
/// resolve, or animated) and is drawn as a placeholder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageSet {
    names: Vec<String>,
    handles: Vec<Option<AssetHandle>>,
}

impl ImageSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn handle(&self, index: usize) -> Option<&AssetHandle> {
        self.handles.get(index).and_then(Option::as_ref)
    }

    pub fn is_available(&self, index: usize) -> bool {
        self.handle(index).is_some()
    }

    /// `(name, handle)` pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&AssetHandle>)> + '_ {
        self.names.iter().map(String::as_str).zip(self.handles.iter().map(Option::as_ref))
    }

    pub fn push(&mut self, name: impl Into<String>, handle: Option<AssetHandle>) {
        self.names.push(name.into());
        self.handles.push(handle);
    }

    pub fn clear(&mut self) {
        self.names.clear();
        self.handles.clear();
    }

    /// Copy of the entries at `indices`, handles included. Out-of-range indices are
    /// skipped.
    pub fn select(&self, indices: impl IntoIterator<Item = usize>) -> ImageSet {
        let mut selected = ImageSet::new();
        for index in indices {
            if let Some(name) = self.names.get(index) {
                selected.push(name.clone(), self.handles.get(index).cloned().flatten());
            }
        }
        selected
    }
}

/// Wraps an [`ImageProvider`] with the animated-format filter and failure logging.
pub struct ImageResolver {
    provider: Box<dyn ImageProvider>,
    animated_extensions: Vec<String>,
}

impl ImageResolver {
    pub fn new(provider: Box<dyn ImageProvider>, config: &ImageConfig) -> Self {
        Self {
            provider,
            animated_extensions: config
                .animated_extensions
                .iter()
                .map(|ext| ext.to_ascii_lowercase())
                .collect(),
        }
    }

    /// Whether `identifier` ends in one of the animated extensions (case-insensitive)
    pub fn is_animated(&self, identifier: &str) -> bool {
        let lower = identifier.to_ascii_lowercase();
        self.animated_extensions.iter().any(|ext| lower.ends_with(ext.as_str()))
    }

    /// Resolve one identifier. Animated ones are skipped; failures are logged and
    /// yield `None`.
    pub fn resolve(&self, identifier: &str) -> Option<AssetHandle> {
        if self.is_animated(identifier) {
            log::debug!("not resolving animated image {identifier}");
            return None;
        }
        match self.provider.resolve(identifier) {
            Ok(handle) => Some(handle),
            Err(err) => {
                log::warn!("image unavailable: {err}");
                None
            }
        }
    }

    /// Resolve every identifier independently into a fresh set
    pub fn resolve_all<I, S>(&self, identifiers: I) -> ImageSet
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = ImageSet::new();
        for identifier in identifiers {
            let identifier = identifier.into();
            let handle = self.resolve(&identifier);
            set.push(identifier, handle);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Resolves everything except names containing "missing", recording each request.
    struct RecordingProvider {
        requests: Rc<RefCell<Vec<String>>>,
    }

    impl ImageProvider for RecordingProvider {
        fn resolve(&self, identifier: &str) -> Result<AssetHandle, ImageError> {
            self.requests.borrow_mut().push(identifier.to_string());
            if identifier.contains("missing") {
                Err(ImageError::NotFound(identifier.to_string()))
            } else {
                Ok(slint::Image::default())
            }
        }
    }

    fn resolver() -> (ImageResolver, Rc<RefCell<Vec<String>>>) {
        let requests = Rc::new(RefCell::new(Vec::new()));
        let provider = RecordingProvider { requests: requests.clone() };
        (ImageResolver::new(Box::new(provider), &ImageConfig::default()), requests)
    }

    #[test]
    fn test_animated_never_reaches_provider() {
        let (resolver, requests) = resolver();
        assert!(resolver.resolve("images/ultrafast_360.gif").is_none());
        assert!(resolver.resolve("images/OTHER.GIF").is_none());
        assert!(requests.borrow().is_empty());
    }

    #[test]
    fn test_is_animated_matches_suffix_only() {
        let (resolver, _) = resolver();
        assert!(resolver.is_animated("a.gif"));
        assert!(resolver.is_animated("a.Gif"));
        assert!(!resolver.is_animated("gif.png"));
        assert!(!resolver.is_animated("a.gifv"));
    }

    #[test]
    fn test_failure_stores_none() {
        let (resolver, requests) = resolver();
        let set = resolver.resolve_all(["images/a.png", "images/missing.png"]);
        assert_eq!(set.len(), 2);
        assert!(set.is_available(0));
        assert!(!set.is_available(1));
        assert_eq!(set.name(1), Some("images/missing.png"));
        assert_eq!(requests.borrow().len(), 2);
    }

    #[test]
    fn test_select_copies_names_and_handles() {
        let (resolver, _) = resolver();
        let set = resolver.resolve_all(["a.png", "missing.png", "c.gif"]);
        let selected = set.select([2, 0, 7]);

        assert_eq!(selected.names(), ["c.gif".to_string(), "a.png".to_string()]);
        assert!(!selected.is_available(0));
        assert!(selected.is_available(1));
    }

    #[test]
    fn test_clear() {
        let mut set = ImageSet::new();
        set.push("x.png", None);
        assert!(!set.is_empty());
        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.iter().count(), 0);
    }

    #[test]
    fn test_null_provider_reports_not_found() {
        assert_eq!(
            NullImageProvider.resolve("images/input.png"),
            Err(ImageError::NotFound("images/input.png".to_string()))
        );
    }

    #[cfg(feature = "file-images")]
    #[test]
    fn test_file_provider_missing_file() {
        let provider = FileImageProvider::new("/definitely/not/a/dir");
        assert_eq!(
            provider.resolve("images/input.png"),
            Err(ImageError::NotFound("images/input.png".to_string()))
        );
    }
}
