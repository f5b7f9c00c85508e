//! File name and extension extraction from a URL path.

/// Returns the last segment of `path`: everything after the final `/`.
///
/// A path that is empty or ends in `/` yields an empty string; callers decide
/// whether that is acceptable.
pub fn file_name_from_path(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// Returns the extension of `file_name` without the leading dot.
///
/// Leading dots belong to the name (`.bashrc` has no extension). Case is
/// preserved.
pub fn extension_of(file_name: &str) -> &str {
    let stem_start = file_name.len() - file_name.trim_start_matches('.').len();
    let rest = &file_name[stem_start..];
    match rest.rfind('.') {
        Some(idx) => &rest[idx + 1..],
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_segment() {
        assert_eq!(file_name_from_path("/a/b/report.PDF"), "report.PDF");
        assert_eq!(file_name_from_path("/single"), "single");
        assert_eq!(file_name_from_path("bare"), "bare");
    }

    #[test]
    fn trailing_slash_or_empty() {
        assert_eq!(file_name_from_path("/dir/"), "");
        assert_eq!(file_name_from_path("/"), "");
        assert_eq!(file_name_from_path(""), "");
    }

    #[test]
    fn extension_case_preserved() {
        assert_eq!(extension_of("report.PDF"), "PDF");
        assert_eq!(extension_of("archive.tar.gz"), "gz");
    }

    #[test]
    fn no_extension() {
        assert_eq!(extension_of("README"), "");
        assert_eq!(extension_of(""), "");
        assert_eq!(extension_of("trailing."), "");
    }

    #[test]
    fn dot_files() {
        assert_eq!(extension_of(".bashrc"), "");
        assert_eq!(extension_of("..hidden"), "");
        assert_eq!(extension_of(".config.toml"), "toml");
    }
}
