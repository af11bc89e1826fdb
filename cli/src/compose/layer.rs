//! Compose layer filename grammar.
//!
//! Layers are flat files in the compose directory, named by a small grammar:
//!
//! ```text
//! base:   compose.yml                        always included, always first
//! simple: compose.<tag>[.<tag>...].yml       included when ANY tag is active
//! cross:  compose.x.<tag>.<tag>[...].yml     included when ALL tags are active
//! ```
//!
//! `x` is reserved as the cross marker and cannot itself be a tag. A cross
//! form needs at least two tags after the marker; `compose.x.yml` and
//! `compose.x.a.yml` are both rejected by the parser. The wildcard
//! tag `*` matches every simple-form layer but never satisfies a cross-form
//! requirement.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// The base layer file name, included unconditionally in every plan.
pub const BASE_FILE: &str = "compose.yml";

/// Filename segment marking a cross-form layer.
pub const CROSS_MARKER: &str = "x";

/// Active tag that matches every simple-form layer.
pub const WILDCARD_TAG: &str = "*";

const LAYER_PREFIX: &str = "compose.";
const LAYER_SUFFIX: &str = ".yml";

/// One discovered configuration fragment.
///
/// Immutable; rediscovered fresh on every resolution pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    /// Full path to the layer file.
    pub path: PathBuf,
    /// Tag segments extracted from the file name, in filename order.
    pub tags: Vec<String>,
    /// Cross-form layers require ALL of their tags active; simple-form
    /// layers require ANY.
    pub cross: bool,
}

impl Layer {
    /// Merge-order key: the number of tag segments. The base layer is
    /// handled outside the sort and always comes first.
    #[must_use]
    pub fn specificity(&self) -> usize {
        self.tags.len()
    }

    /// File name component, used as the deterministic tie-break for layers
    /// of equal specificity.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
    }

    /// Whether this layer applies under the given active tag set.
    #[must_use]
    pub fn matches(&self, active: &HashSet<String>) -> bool {
        if self.cross {
            self.tags.iter().all(|tag| active.contains(tag))
        } else {
            active.contains(WILDCARD_TAG) || self.tags.iter().any(|tag| active.contains(tag))
        }
    }
}

/// Parse a path into a [`Layer`].
///
/// Returns `None` for anything outside the grammar: the base file (the
/// resolver includes it separately), files without the `compose.` prefix or
/// `.yml` suffix, and a cross marker with fewer than two tags after it.
#[must_use]
pub fn parse(path: &Path) -> Option<Layer> {
    let name = path.file_name()?.to_str()?;
    if name == BASE_FILE {
        return None;
    }
    let middle = name.strip_prefix(LAYER_PREFIX)?.strip_suffix(LAYER_SUFFIX)?;
    if middle.is_empty() {
        return None;
    }

    let mut segments: Vec<&str> = middle.split('.').collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return None;
    }

    let cross = segments.first() == Some(&CROSS_MARKER);
    if cross {
        segments.remove(0);
        // Cross form means "all of these together"; that needs at least two.
        if segments.len() < 2 {
            return None;
        }
    }

    Some(Layer {
        path: path.to_path_buf(),
        tags: segments.into_iter().map(str::to_string).collect(),
        cross,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active(tags: &[&str]) -> HashSet<String> {
        tags.iter().map(|tag| (*tag).to_string()).collect()
    }

    #[test]
    fn test_parse_rejects_base_file() {
        assert!(parse(Path::new("/stack/compose.yml")).is_none());
    }

    #[test]
    fn test_parse_simple_single_tag() {
        let layer = parse(Path::new("/stack/compose.webui.yml")).expect("layer");
        assert_eq!(layer.tags, vec!["webui"]);
        assert!(!layer.cross);
        assert_eq!(layer.specificity(), 1);
    }

    #[test]
    fn test_parse_simple_multi_tag() {
        let layer = parse(Path::new("/stack/compose.webui.ollama.yml")).expect("layer");
        assert_eq!(layer.tags, vec!["webui", "ollama"]);
        assert!(!layer.cross);
        assert_eq!(layer.specificity(), 2);
    }

    #[test]
    fn test_parse_cross_form() {
        let layer = parse(Path::new("/stack/compose.x.webui.ollama.yml")).expect("layer");
        assert_eq!(layer.tags, vec!["webui", "ollama"]);
        assert!(layer.cross);
        assert_eq!(layer.specificity(), 2);
    }

    #[test]
    fn test_parse_rejects_cross_marker_with_fewer_than_two_tags() {
        assert!(parse(Path::new("/stack/compose.x.yml")).is_none());
        assert!(parse(Path::new("/stack/compose.x.a.yml")).is_none());
    }

    #[test]
    fn test_parse_rejects_foreign_files() {
        assert!(parse(Path::new("/stack/README.md")).is_none());
        assert!(parse(Path::new("/stack/docker-compose.yml")).is_none());
        assert!(parse(Path::new("/stack/compose.webui.yaml")).is_none());
    }

    #[test]
    fn test_parse_rejects_empty_segments() {
        assert!(parse(Path::new("/stack/compose..yml")).is_none());
        assert!(parse(Path::new("/stack/compose.a..b.yml")).is_none());
    }

    #[test]
    fn test_simple_matches_on_any_tag() {
        let layer = parse(Path::new("/stack/compose.a.b.yml")).expect("layer");
        assert!(layer.matches(&active(&["a"])));
        assert!(layer.matches(&active(&["b", "z"])));
        assert!(!layer.matches(&active(&["z"])));
        assert!(!layer.matches(&active(&[])));
    }

    #[test]
    fn test_wildcard_matches_every_simple_layer() {
        let layer = parse(Path::new("/stack/compose.a.yml")).expect("layer");
        assert!(layer.matches(&active(&["*"])));
    }

    #[test]
    fn test_cross_requires_all_tags() {
        let layer = parse(Path::new("/stack/compose.x.a.b.c.yml")).expect("layer");
        assert!(layer.matches(&active(&["a", "b", "c", "z"])));
        assert!(!layer.matches(&active(&["a", "b"])));
        assert!(!layer.matches(&active(&["a", "c"])));
    }

    #[test]
    fn test_wildcard_does_not_satisfy_cross_form() {
        let layer = parse(Path::new("/stack/compose.x.a.b.yml")).expect("layer");
        assert!(!layer.matches(&active(&["*"])));
        assert!(!layer.matches(&active(&["*", "a"])));
        assert!(layer.matches(&active(&["*", "a", "b"])));
    }
}
