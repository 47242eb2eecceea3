/// Category used for any extension not listed below.
pub const OTHER_FILES: &str = "Other Files";

/// Broad file categories keyed by lowercase extension. Checked in order; the
/// first category listing an extension wins.
pub const TYPE_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Images",
        &[
            "jpg", "jpeg", "png", "gif", "webp", "bmp", "tiff", "tif", "svg", "ico", "heic",
            "heif", "avif", "cr2", "nef", "arw", "dng",
        ],
    ),
    (
        "Videos",
        &[
            "mp4", "mkv", "webm", "mov", "avi", "flv", "wmv", "3gp", "mpeg", "mpg",
        ],
    ),
    (
        "Audio",
        &["mp3", "wav", "ogg", "flac", "aac", "wma", "aiff", "mid", "midi"],
    ),
    ("Documents", &["pdf", "doc", "docx", "odt", "txt", "rtf", "md"]),
    ("Spreadsheets", &["xls", "xlsx", "ods", "csv"]),
    ("Presentations", &["ppt", "pptx", "odp"]),
    ("Ebooks", &["epub", "mobi"]),
    ("Archives", &["zip", "rar", "7z", "gz", "tar", "bz2"]),
    (
        "Executables & Installers",
        &["exe", "dll", "dmg", "msi", "jar", "bat"],
    ),
    (
        "Code & Scripts",
        &[
            "py", "js", "ts", "jsx", "tsx", "sh", "php", "rb", "html", "css", "json", "xml",
            "java", "c", "cpp", "h", "sql",
        ],
    ),
    ("Fonts", &["otf", "ttf", "woff", "woff2"]),
    ("3D Models", &["obj", "stl", "fbx", "gltf", "glb"]),
];

/// Map an extension (any case, without the dot) to its category name.
pub fn category_for_extension(extension: &str) -> &'static str {
    let extension = extension.to_ascii_lowercase();
    TYPE_CATEGORIES
        .iter()
        .find(|(_, extensions)| extensions.contains(&extension.as_str()))
        .map(|(category, _)| *category)
        .unwrap_or(OTHER_FILES)
}
