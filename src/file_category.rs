/// File categorization by extension.
///
/// This module holds the fixed, ordered category taxonomy and maps file
/// extensions to it. The last category, [`Category::Other`], is the catch-all
/// and receives every file whose extension matches nothing else.
///
/// # Examples
///
/// ```
/// use clean_folder::file_category::{Category, FileMapper};
///
/// let mapper = FileMapper::default();
/// assert_eq!(mapper.extension_to_category("png"), Some(Category::Images));
/// assert_eq!(mapper.extension_to_category("MP3"), Some(Category::Audio));
/// assert_eq!(mapper.categorize(Some("exe")), Category::Other);
/// ```
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// A destination category.
///
/// Variant order is the declaration order of the taxonomy and drives both
/// first-match-wins lookup and the order in which directories are created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Image files (JPEG, PNG, SVG)
    Images,
    /// Document files (DOC, DOCX, TXT, PDF, XLSX, PPTX)
    Documents,
    /// Audio files (MP3, OGG, WAV, AMR)
    Audio,
    /// Video files (AVI, MP4, MOV, MKV)
    Video,
    /// Archive files (ZIP, GZ, TAR)
    Archives,
    /// Everything else
    Other,
}

/// Ordered extension lists for every category except the catch-all.
pub const TAXONOMY: &[(Category, &[&str])] = &[
    (Category::Images, &["jpeg", "png", "jpg", "svg"]),
    (
        Category::Documents,
        &["doc", "docx", "txt", "pdf", "xlsx", "pptx"],
    ),
    (Category::Audio, &["mp3", "ogg", "wav", "amr"]),
    (Category::Video, &["avi", "mp4", "mov", "mkv"]),
    (Category::Archives, &["zip", "gz", "tar"]),
];

impl Category {
    /// Every category in declaration order; the catch-all is last.
    pub const ALL: [Category; 6] = [
        Category::Images,
        Category::Documents,
        Category::Audio,
        Category::Video,
        Category::Archives,
        Category::Other,
    ];

    /// The category that receives unmatched files.
    pub const CATCH_ALL: Category = Category::Other;

    /// Returns the directory name for this category.
    ///
    /// # Examples
    ///
    /// ```
    /// use clean_folder::file_category::Category;
    ///
    /// assert_eq!(Category::Images.dir_name(), "images");
    /// assert_eq!(Category::Other.dir_name(), "other");
    /// ```
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Images => "images",
            Category::Documents => "documents",
            Category::Audio => "audio",
            Category::Video => "video",
            Category::Archives => "archives",
            Category::Other => "other",
        }
    }

    /// Extensions declared for this category. Empty for the catch-all.
    pub fn extensions(&self) -> &'static [&'static str] {
        TAXONOMY
            .iter()
            .find(|(category, _)| category == self)
            .map(|(_, exts)| *exts)
            .unwrap_or(&[])
    }

    /// Returns true if `name` is exactly the directory name of some category.
    ///
    /// The scanner uses this to skip destination folders left by earlier runs.
    pub fn is_reserved_dir_name(name: &OsStr) -> bool {
        Category::ALL
            .iter()
            .any(|category| name == OsStr::new(category.dir_name()))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Returns the text after the last `.` of the file name, or `None` if there is no `.`.
///
/// Unlike [`Path::extension`], a leading dot counts, so `.bashrc` has extension `bashrc`.
pub fn file_extension(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_string_lossy();
    name.rsplit_once('.').map(|(_, ext)| ext.to_string())
}

/// Maps file extensions to categories.
///
/// The lookup is built once from an ordered table. When an extension is
/// listed under more than one category, the earliest declaration wins.
#[derive(Debug, Clone)]
pub struct FileMapper {
    extension_map: HashMap<String, Category>,
}

impl FileMapper {
    /// Creates a new `FileMapper` from the standard [`TAXONOMY`].
    pub fn new() -> Self {
        Self::from_table(TAXONOMY)
    }

    /// Builds a mapper from an ordered `(category, extensions)` table.
    pub fn from_table(table: &[(Category, &[&str])]) -> Self {
        let mut mapper = Self {
            extension_map: HashMap::new(),
        };
        for (category, extensions) in table {
            for ext in *extensions {
                mapper.add_extension_mapping(ext, *category);
            }
        }
        mapper
    }

    /// Adds an extension mapping unless the extension is already claimed.
    fn add_extension_mapping(&mut self, ext: &str, category: Category) {
        self.extension_map
            .entry(ext.to_lowercase())
            .or_insert(category);
    }

    /// Maps a file extension to a category, case-insensitively.
    ///
    /// # Examples
    ///
    /// ```
    /// use clean_folder::file_category::{Category, FileMapper};
    ///
    /// let mapper = FileMapper::default();
    /// assert_eq!(mapper.extension_to_category("PDF"), Some(Category::Documents));
    /// assert_eq!(mapper.extension_to_category("rs"), None);
    /// ```
    pub fn extension_to_category(&self, ext: &str) -> Option<Category> {
        self.extension_map.get(&ext.to_lowercase()).copied()
    }

    /// Determines the category for a file given its extension, if any.
    pub fn categorize(&self, ext: Option<&str>) -> Category {
        ext.and_then(|e| self.extension_to_category(e))
            .unwrap_or(Category::CATCH_ALL)
    }

    /// Determines the category for a file path.
    pub fn categorize_path(&self, path: &Path) -> Category {
        self.categorize(file_extension(path).as_deref())
    }
}

impl Default for FileMapper {
    fn default() -> Self {
        Self::new()
    }
}

/// Files grouped by category, one entry per category in declaration order.
#[derive(Debug, Clone, Default)]
pub struct CategorizedFiles {
    buckets: BTreeMap<Category, Vec<PathBuf>>,
}

impl CategorizedFiles {
    /// Creates a map with an empty list for every category.
    pub fn new() -> Self {
        Self {
            buckets: Category::ALL.iter().map(|c| (*c, Vec::new())).collect(),
        }
    }

    pub fn push(&mut self, category: Category, path: PathBuf) {
        self.buckets.entry(category).or_default().push(path);
    }

    /// Files assigned to `category`, in scan order.
    pub fn files(&self, category: Category) -> &[PathBuf] {
        self.buckets
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Iterates categories in declaration order with their files.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[PathBuf])> {
        self.buckets.iter().map(|(c, files)| (*c, files.as_slice()))
    }

    /// Total number of files across all categories.
    pub fn total(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Assigns every file to exactly one category using the standard taxonomy.
pub fn categorize<I, P>(files: I) -> CategorizedFiles
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    categorize_with(&FileMapper::default(), files)
}

/// Assigns every file to exactly one category using `mapper`.
pub fn categorize_with<I, P>(mapper: &FileMapper, files: I) -> CategorizedFiles
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    let mut categorized = CategorizedFiles::new();
    for file in files {
        let path = file.into();
        let category = mapper.categorize_path(&path);
        categorized.push(category, path);
    }
    categorized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_dir_names() {
        assert_eq!(Category::Images.dir_name(), "images");
        assert_eq!(Category::Documents.dir_name(), "documents");
        assert_eq!(Category::Audio.dir_name(), "audio");
        assert_eq!(Category::Video.dir_name(), "video");
        assert_eq!(Category::Archives.dir_name(), "archives");
        assert_eq!(Category::Other.dir_name(), "other");
    }

    #[test]
    fn test_catch_all_is_last_and_has_no_extensions() {
        assert_eq!(Category::ALL.last(), Some(&Category::CATCH_ALL));
        assert!(Category::CATCH_ALL.extensions().is_empty());
        assert!(TAXONOMY.iter().all(|(c, _)| *c != Category::CATCH_ALL));
    }

    #[test]
    fn test_taxonomy_extensions_are_disjoint() {
        let mut seen = std::collections::HashSet::new();
        for (_, exts) in TAXONOMY {
            for ext in *exts {
                assert!(seen.insert(*ext), "extension {ext} listed twice");
            }
        }
    }

    #[test]
    fn test_every_declared_extension_maps_to_its_category() {
        let mapper = FileMapper::default();
        for (category, exts) in TAXONOMY {
            for ext in *exts {
                assert_eq!(mapper.extension_to_category(ext), Some(*category));
                assert_eq!(
                    mapper.extension_to_category(&ext.to_uppercase()),
                    Some(*category)
                );
            }
        }
    }

    #[test]
    fn test_unknown_extension_goes_to_catch_all() {
        let mapper = FileMapper::default();
        assert_eq!(mapper.categorize(Some("exe")), Category::Other);
        assert_eq!(mapper.categorize(Some("")), Category::Other);
        assert_eq!(mapper.categorize(None), Category::Other);
    }

    #[test]
    fn test_first_declared_category_wins() {
        let table: &[(Category, &[&str])] = &[
            (Category::Images, &["png", "dup"]),
            (Category::Documents, &["dup", "txt"]),
        ];
        let mapper = FileMapper::from_table(table);
        assert_eq!(mapper.extension_to_category("dup"), Some(Category::Images));
        assert_eq!(mapper.extension_to_category("txt"), Some(Category::Documents));
    }

    #[test]
    fn test_file_extension_uses_last_dot() {
        assert_eq!(
            file_extension(Path::new("/a/archive.tar.gz")),
            Some("gz".to_string())
        );
        assert_eq!(
            file_extension(Path::new(".bashrc")),
            Some("bashrc".to_string())
        );
        assert_eq!(file_extension(Path::new("README")), None);
    }

    #[test]
    fn test_reserved_dir_names() {
        assert!(Category::is_reserved_dir_name(OsStr::new("images")));
        assert!(Category::is_reserved_dir_name(OsStr::new("other")));
        assert!(!Category::is_reserved_dir_name(OsStr::new("Images")));
        assert!(!Category::is_reserved_dir_name(OsStr::new("old")));
    }

    #[test]
    fn test_categorize_keeps_every_category_in_order() {
        let categorized = categorize(["a/photo.JPG", "b/notes.txt", "c/README", "d/x.tar"]);

        let order: Vec<Category> = categorized.iter().map(|(c, _)| c).collect();
        assert_eq!(order, Category::ALL.to_vec());

        assert_eq!(categorized.files(Category::Images), [PathBuf::from("a/photo.JPG")]);
        assert_eq!(categorized.files(Category::Documents), [PathBuf::from("b/notes.txt")]);
        assert_eq!(categorized.files(Category::Archives), [PathBuf::from("d/x.tar")]);
        assert_eq!(categorized.files(Category::Other), [PathBuf::from("c/README")]);
        assert!(categorized.files(Category::Video).is_empty());
        assert_eq!(categorized.total(), 4);
    }
}
