use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// The six routing buckets. Every file lands in exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Images,
    Video,
    Documents,
    Audio,
    Archives,
    Others,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Images,
        Category::Video,
        Category::Documents,
        Category::Audio,
        Category::Archives,
        Category::Others,
    ];

    /// Map an extension (without the dot) to its category. Case-insensitive;
    /// anything not listed is `Others`.
    pub fn classify(extension: &str) -> Category {
        match extension.to_lowercase().as_str() {
            "jpeg" | "png" | "jpg" | "svg" => Category::Images,
            "avi" | "mp4" | "mov" | "mkv" => Category::Video,
            "doc" | "docx" | "txt" | "pdf" | "xlsx" | "pptx" => Category::Documents,
            "mp3" | "ogg" | "wav" | "amr" => Category::Audio,
            "zip" | "gz" | "tar" => Category::Archives,
            _ => Category::Others,
        }
    }

    /// Whether the extension belongs to one of the listed sets.
    pub fn is_known(self) -> bool {
        self != Category::Others
    }

    /// Name of the destination subdirectory.
    pub fn dir_name(self) -> &'static str {
        match self {
            Category::Images => "images",
            Category::Video => "video",
            Category::Documents => "documents",
            Category::Audio => "audio",
            Category::Archives => "archives",
            Category::Others => "others",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Lower-cased suffix after the last `.` of the file name, or "" when there
/// is none. Dotfiles such as `.bashrc` have no extension.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// The destination root with one subdirectory per category.
#[derive(Debug, Clone)]
pub struct DestinationTree {
    root: PathBuf,
}

impl DestinationTree {
    /// Create all six category directories under `root`, whether or not
    /// anything will land in them.
    pub fn create(root: &Path) -> io::Result<Self> {
        for category in Category::ALL {
            fs::create_dir_all(root.join(category.dir_name()))?;
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn dir_for(&self, category: Category) -> PathBuf {
        self.root.join(category.dir_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_classify_documented_sets() {
        let table = [
            (Category::Images, &["jpeg", "png", "jpg", "svg"][..]),
            (Category::Video, &["avi", "mp4", "mov", "mkv"][..]),
            (
                Category::Documents,
                &["doc", "docx", "txt", "pdf", "xlsx", "pptx"][..],
            ),
            (Category::Audio, &["mp3", "ogg", "wav", "amr"][..]),
            (Category::Archives, &["zip", "gz", "tar"][..]),
        ];
        for (expected, extensions) in table {
            for ext in extensions {
                assert_eq!(Category::classify(ext), expected, "{ext}");
                assert_eq!(Category::classify(&ext.to_uppercase()), expected, "{ext}");
            }
        }
    }

    #[test]
    fn test_classify_unknown_is_others() {
        for ext in ["", "rs", "exe", "jpgx", "tar.gz", "7z"] {
            assert_eq!(Category::classify(ext), Category::Others, "{ext:?}");
            assert!(!Category::classify(ext).is_known());
        }
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of(Path::new("/a/b/Photo.JPG")), "jpg");
        assert_eq!(extension_of(Path::new("backup.tar.gz")), "gz");
        assert_eq!(extension_of(Path::new("README")), "");
        assert_eq!(extension_of(Path::new(".bashrc")), "");
        assert_eq!(extension_of(Path::new("dir.d/noext")), "");
    }

    #[test]
    fn test_destination_tree_creates_all_dirs() {
        let tmp = tempdir().unwrap();
        let tree = DestinationTree::create(&tmp.path().join("out")).unwrap();
        for category in Category::ALL {
            assert!(tree.dir_for(category).is_dir(), "{category} missing");
        }
        // Creating again over an existing tree is fine.
        DestinationTree::create(tree.root()).unwrap();
    }
}
