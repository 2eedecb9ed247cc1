//! Lexical path resolution.
//!
//! Turns user-typed path fragments into canonical, rooted paths. Nothing in
//! this module touches the filesystem: a resolved path may name an entry that
//! does not exist, and existence checks belong to the command handlers.
//!
//! # Path Convention
//!
//! - Windows style: `C:\Users\me`, drive root `C:\`
//! - Unix style: `/home/me`, root `/`
//! - Empty string: a path that climbed above its root ("nothing navigable")

use std::fmt;
use std::path::Path;

/// Parent-reference segment.
pub const PARENT: &str = "..";

/// Current-directory segment.
const CURRENT: &str = ".";

// =============================================================================
// Path Style
// =============================================================================

/// Syntax family used to interpret typed paths.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PathStyle {
    /// Drive letters and `\` separators.
    Windows,
    /// Single `/` root and `/` separators.
    Unix,
}

impl PathStyle {
    /// Style of the platform the binary was built for.
    pub const fn native() -> Self {
        if cfg!(windows) { Self::Windows } else { Self::Unix }
    }

    pub const fn separator(self) -> char {
        match self {
            Self::Windows => '\\',
            Self::Unix => '/',
        }
    }

    /// The separator of the *other* style. Typed paths may not contain it.
    pub const fn foreign_separator(self) -> char {
        match self {
            Self::Windows => '/',
            Self::Unix => '\\',
        }
    }

    /// `C:` exactly (Windows only).
    pub fn is_drive_designator(self, raw: &str) -> bool {
        self == Self::Windows && raw.len() == 2 && self.has_drive_prefix(raw)
    }

    fn has_drive_prefix(self, raw: &str) -> bool {
        let bytes = raw.as_bytes();
        self == Self::Windows && bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
    }

    /// Absolute on its own, without consulting a current directory.
    fn is_absolute(self, raw: &str) -> bool {
        match self {
            Self::Windows => self.has_drive_prefix(raw),
            Self::Unix => raw.starts_with('/'),
        }
    }

    fn starts_with_parent(self, raw: &str) -> bool {
        raw == PARENT
            || raw
                .strip_prefix(PARENT)
                .is_some_and(|rest| rest.starts_with(self.separator()))
    }

    fn segments_equal(self, a: &str, b: &str) -> bool {
        match self {
            Self::Windows => a.eq_ignore_ascii_case(b),
            Self::Unix => a == b,
        }
    }
}

impl Default for PathStyle {
    fn default() -> Self {
        Self::native()
    }
}

// =============================================================================
// Resolved Path
// =============================================================================

/// A canonical absolute path: separator-normalized, free of `.` and `..`.
///
/// The empty path is the one exception to "absolute": it is produced when a
/// path climbs above its root and means there is nothing to navigate to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResolvedPath {
    text: String,
    style: PathStyle,
}

impl ResolvedPath {
    /// Parse an absolute path (e.g. one restored from disk).
    ///
    /// Returns `None` for relative input.
    pub fn parse(raw: &str, style: PathStyle) -> Option<Self> {
        if style.is_drive_designator(raw) || style.is_absolute(raw) {
            Some(normalize(raw, style))
        } else {
            None
        }
    }

    /// Convert a native filesystem path.
    pub fn from_native(path: &Path) -> Option<Self> {
        Self::parse(&path.to_string_lossy(), PathStyle::native())
    }

    fn empty(style: PathStyle) -> Self {
        Self {
            text: String::new(),
            style,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn as_path(&self) -> &Path {
        Path::new(&self.text)
    }

    pub fn style(&self) -> PathStyle {
        self.style
    }

    /// True when the path climbed above its root.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Non-empty path segments (the drive designator counts as one).
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.text
            .split(self.style.separator())
            .filter(|s| !s.is_empty())
    }

    /// The root this path hangs from: `C:\` or `/`.
    pub fn root(&self) -> Option<Self> {
        match self.style {
            PathStyle::Windows => {
                let drive = self.text.get(..2)?;
                self.style
                    .is_drive_designator(drive)
                    .then(|| normalize(drive, self.style))
            }
            PathStyle::Unix => (!self.is_empty()).then(|| normalize("/", self.style)),
        }
    }

    /// Last segment, unless the path is a root.
    pub fn file_name(&self) -> Option<&str> {
        let last = self.segments().last()?;
        if self.style.is_drive_designator(last) {
            None
        } else {
            Some(last)
        }
    }

    /// Parent directory, unless the path is a root.
    pub fn parent(&self) -> Option<Self> {
        self.file_name()?;
        let sep = self.style.separator();
        let segments: Vec<&str> = self.segments().collect();
        let parent = segments[..segments.len() - 1].join(&sep.to_string());
        let text = match self.style {
            PathStyle::Windows => parent,
            PathStyle::Unix => format!("/{}", parent),
        };
        Some(normalize(&text, self.style))
    }

    /// Append a single entry name.
    pub fn join(&self, name: &str) -> Self {
        let sep = self.style.separator();
        let text = if self.text.ends_with(sep) {
            format!("{}{}", self.text, name)
        } else {
            format!("{}{}{}", self.text, sep, name)
        };
        normalize(&text, self.style)
    }

    /// Segment-wise prefix test (`C:\a\b` is within `C:\a`, `C:\ab` is not).
    pub fn is_within(&self, ancestor: &ResolvedPath) -> bool {
        if self.style != ancestor.style || self.is_empty() || ancestor.is_empty() {
            return false;
        }
        let mut own = self.segments();
        ancestor
            .segments()
            .all(|a| own.next().is_some_and(|s| self.style.segments_equal(a, s)))
    }
}

impl fmt::Display for ResolvedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl AsRef<Path> for ResolvedPath {
    fn as_ref(&self) -> &Path {
        self.as_path()
    }
}

// =============================================================================
// Resolution
// =============================================================================

/// Resolve a typed path against the current directory.
///
/// Returns `None` when the input is relative (or root-relative) and there is
/// no current directory to anchor it to.
pub fn resolve(raw: &str, current_dir: Option<&ResolvedPath>, style: PathStyle) -> Option<ResolvedPath> {
    let sep = style.separator();

    // A bare drive is always fully specified
    if style.is_drive_designator(raw) {
        return Some(normalize(raw, style));
    }

    if style.is_absolute(raw) && !style.starts_with_parent(raw) {
        return Some(normalize(raw, style));
    }

    let current = current_dir.filter(|dir| !dir.is_empty())?;

    let anchored = if raw.starts_with(sep) {
        let root = current.root()?;
        format!("{}{}", root.as_str(), raw.trim_start_matches(sep))
    } else if current.as_str().ends_with(sep) {
        format!("{}{}", current.as_str(), raw)
    } else {
        format!("{}{}{}", current.as_str(), sep, raw)
    };

    Some(normalize(&anchored, style))
}

/// Collapse `.` and `..` segments of an anchored path.
///
/// Each `..` removes itself together with the segment before it. A `..` with
/// nothing left to remove (or only the drive) collapses the whole path to
/// empty.
pub fn normalize(path: &str, style: PathStyle) -> ResolvedPath {
    let sep = style.separator();
    let mut segments: Vec<&str> = path
        .split(sep)
        .filter(|s| !s.is_empty() && *s != CURRENT)
        .collect();

    while let Some(index) = segments.iter().position(|s| *s == PARENT) {
        // Climbing past the drive or root leaves nothing to stand on
        if index == 0 || style.is_drive_designator(segments[index - 1]) {
            return ResolvedPath::empty(style);
        }
        segments.drain(index - 1..=index);
    }

    let joined = segments.join(&sep.to_string());
    let text = match style {
        PathStyle::Windows if style.is_drive_designator(&joined) => format!("{}{}", joined, sep),
        PathStyle::Windows => joined,
        PathStyle::Unix => format!("/{}", joined),
    };

    ResolvedPath { text, style }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const WIN: PathStyle = PathStyle::Windows;
    const UNIX: PathStyle = PathStyle::Unix;

    fn win(s: &str) -> ResolvedPath {
        ResolvedPath::parse(s, WIN).expect("absolute windows path")
    }

    fn unix(s: &str) -> ResolvedPath {
        ResolvedPath::parse(s, UNIX).expect("absolute unix path")
    }

    fn resolve_win(raw: &str, current: &str) -> String {
        resolve(raw, Some(&win(current)), WIN)
            .expect("resolvable")
            .as_str()
            .to_string()
    }

    #[test]
    fn test_drive_designator_gets_separator() {
        assert_eq!(resolve_win("D:", "C:\\a"), "D:\\");
        assert_eq!(resolve("C:", None, WIN).unwrap().as_str(), "C:\\");
    }

    #[test]
    fn test_absolute_ignores_current_dir() {
        for raw in ["C:\\Users\\me", "C:\\a\\..\\b", "D:\\x\\.\\y\\"] {
            let expected = normalize(raw, WIN);
            assert_eq!(resolve(raw, Some(&win("E:\\elsewhere")), WIN), Some(expected.clone()));
            assert_eq!(resolve(raw, None, WIN), Some(expected));
        }
        assert_eq!(resolve("/etc/../usr", None, UNIX).unwrap().as_str(), "/usr");
    }

    #[test]
    fn test_relative_joins_current_dir() {
        assert_eq!(resolve_win("docs", "C:\\Users\\me"), "C:\\Users\\me\\docs");
        assert_eq!(resolve_win("docs", "C:\\"), "C:\\docs");
        assert_eq!(
            resolve("src/lib.rs", Some(&unix("/home/me")), UNIX).unwrap().as_str(),
            "/home/me/src/lib.rs"
        );
    }

    #[test]
    fn test_leading_separator_anchors_to_drive_root() {
        assert_eq!(resolve_win("\\Windows\\System32", "C:\\Users\\me"), "C:\\Windows\\System32");
        assert_eq!(resolve_win("\\", "D:\\data"), "D:\\");
    }

    #[test]
    fn test_parent_reference_collapses() {
        assert_eq!(resolve_win("..\\x", "C:\\a\\b"), "C:\\a\\x");
        assert_eq!(resolve_win("..\\..\\x", "C:\\a\\b"), "C:\\x");
        assert_eq!(resolve_win("..", "C:\\Users"), "C:\\");
        assert_eq!(resolve_win("a\\..\\..\\b", "C:\\x\\y"), "C:\\x\\b");
    }

    #[test]
    fn test_no_parent_segments_survive() {
        for depth in 0..8 {
            let raw = vec![".."; depth].join("\\") + "\\x";
            let resolved = resolve(&raw, Some(&win("C:\\a\\b\\c")), WIN).unwrap();
            assert!(resolved.segments().all(|s| s != PARENT), "depth {}: {}", depth, resolved);
            assert!(resolved.is_empty() || resolved.as_str().starts_with("C:\\"));
        }
    }

    #[test]
    fn test_only_parents_degenerate_to_empty() {
        assert!(resolve("..\\..\\..", Some(&win("C:\\a")), WIN).unwrap().is_empty());
        assert!(resolve("..\\..", Some(&win("C:\\")), WIN).unwrap().is_empty());
        assert!(normalize("..\\..", WIN).is_empty());
        assert!(resolve("../../..", Some(&unix("/a")), UNIX).unwrap().is_empty());
    }

    #[test]
    fn test_unix_parent_of_top_level_is_root() {
        assert_eq!(resolve("..", Some(&unix("/home")), UNIX).unwrap().as_str(), "/");
    }

    #[test]
    fn test_unresolved_without_current_dir() {
        assert!(resolve("docs", None, WIN).is_none());
        assert!(resolve("\\docs", None, WIN).is_none());
        assert!(resolve("..\\docs", None, WIN).is_none());
        assert!(resolve("docs", None, UNIX).is_none());
    }

    #[test]
    fn test_empty_current_dir_is_unresolved() {
        let empty = normalize("..", WIN);
        assert!(resolve("docs", Some(&empty), WIN).is_none());
    }

    #[test]
    fn test_normalize_repeated_separators_and_dots() {
        assert_eq!(normalize("C:\\\\a\\.\\b\\\\", WIN).as_str(), "C:\\a\\b");
        assert_eq!(normalize("//usr//./lib/", UNIX).as_str(), "/usr/lib");
    }

    #[test]
    fn test_parse_rejects_relative() {
        assert!(ResolvedPath::parse("docs", WIN).is_none());
        assert!(ResolvedPath::parse("docs", UNIX).is_none());
        assert!(ResolvedPath::parse("C:", WIN).is_some());
    }

    #[test]
    fn test_parent_and_file_name() {
        let path = win("C:\\a\\b.txt");
        assert_eq!(path.file_name(), Some("b.txt"));
        assert_eq!(path.parent().unwrap().as_str(), "C:\\a");
        assert_eq!(win("C:\\a").parent().unwrap().as_str(), "C:\\");
        assert!(win("C:\\").parent().is_none());
        assert!(win("C:\\").file_name().is_none());

        assert_eq!(unix("/a").parent().unwrap().as_str(), "/");
        assert!(unix("/").parent().is_none());
    }

    #[test]
    fn test_join() {
        assert_eq!(win("C:\\").join("a").as_str(), "C:\\a");
        assert_eq!(win("C:\\a").join("b").as_str(), "C:\\a\\b");
        assert_eq!(unix("/").join("tmp").as_str(), "/tmp");
    }

    #[test]
    fn test_is_within() {
        assert!(win("C:\\a\\b").is_within(&win("C:\\a")));
        assert!(win("c:\\A\\b").is_within(&win("C:\\a")));
        assert!(win("C:\\a").is_within(&win("C:\\a")));
        assert!(!win("C:\\ab").is_within(&win("C:\\a")));
        assert!(!unix("/Home/x").is_within(&unix("/home")));
    }

    #[test]
    fn test_root() {
        assert_eq!(win("D:\\x\\y").root().unwrap().as_str(), "D:\\");
        assert_eq!(unix("/x/y").root().unwrap().as_str(), "/");
    }
}
