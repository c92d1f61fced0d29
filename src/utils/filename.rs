//! Upload filename handling.

/// Reduce a client-supplied filename to a safe basename.
///
/// Keeps ASCII alphanumerics, `.`, `-` and `_`. Whitespace becomes `_`,
/// directory components and leading dots are dropped.
pub fn secure_filename(name: &str) -> String {
    let base = name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(name);

    let cleaned: String = base
        .chars()
        .filter_map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                Some(c)
            } else if c.is_whitespace() {
                Some('_')
            } else {
                None
            }
        })
        .collect();

    let trimmed = cleaned.trim_start_matches('.').trim_matches('_');
    if trimmed.is_empty() {
        "upload".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Lowercased extension of a filename, if it has one.
pub fn file_extension(name: &str) -> Option<String> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secure_filename_strips_paths() {
        assert_eq!(secure_filename("../../etc/passwd"), "passwd");
        assert_eq!(secure_filename("C:\\Users\\me\\report.pdf"), "report.pdf");
    }

    #[test]
    fn test_secure_filename_spaces_and_symbols() {
        assert_eq!(secure_filename("My Report (final).docx"), "My_Report_final.docx");
        assert_eq!(secure_filename(".hidden.pdf"), "hidden.pdf");
        assert_eq!(secure_filename("***"), "upload");
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("a.PDF").as_deref(), Some("pdf"));
        assert_eq!(file_extension("archive.tar.docx").as_deref(), Some("docx"));
        assert_eq!(file_extension("noext"), None);
        assert_eq!(file_extension(".pdf"), None);
        assert_eq!(file_extension("trailing."), None);
    }
}
