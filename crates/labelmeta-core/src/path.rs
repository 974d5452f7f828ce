//! Path normalization and naming helpers

use std::borrow::Cow;

const REMOTE_SCHEMES: &[&str] = &["http://", "https://", "file:"];

/// Check whether a path already carries a recognized scheme
pub fn has_known_scheme(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    REMOTE_SCHEMES.iter().any(|scheme| lower.starts_with(scheme))
}

/// Normalize a path into the string the asset id is derived from
///
/// Paths with a known scheme are returned unchanged; anything else is
/// treated as a local file and encoded with [`encode_file_uri`].
pub fn normalize_path(path: &str) -> String {
    if has_known_scheme(path) {
        path.to_string()
    } else {
        encode_file_uri(path)
    }
}

/// Encode a local path as a `file:` reference
///
/// Backslashes become forward slashes and every segment is
/// percent-encoded. A leading drive designator (`C:`) is kept as is.
pub fn encode_file_uri(path: &str) -> String {
    let unified = path.replace('\\', "/");
    let encoded: Vec<Cow<'_, str>> = unified
        .split('/')
        .enumerate()
        .map(|(i, segment)| {
            if i == 0 && is_drive(segment) {
                Cow::Borrowed(segment)
            } else {
                urlencoding::encode(segment)
            }
        })
        .collect();
    format!("file:{}", encoded.join("/"))
}

fn is_drive(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    bytes.len() == 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Percent-decode an asset name, keeping the raw name if it is not valid
/// UTF-8 once decoded
pub fn decode_name(name: &str) -> String {
    urlencoding::decode(name)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| name.to_string())
}

/// Last segment of a `/` or `\` separated path
pub fn last_path_segment(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Lower-cased extension of a file name, without any query or fragment
///
/// Returns an empty string when the name has no `.`.
pub fn nominal_extension(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((_, ext)) => ext
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase(),
        None => String::new(),
    }
}

/// Check whether `asset_name` sits directly inside `folder`
///
/// An empty folder is the root, which only contains names without a `/`.
/// Nested sub-folders do not count as being in the folder.
pub fn is_in_exact_folder_path(asset_name: &str, folder: &str) -> bool {
    if folder.is_empty() {
        return !asset_name.contains('/');
    }
    asset_name.starts_with(&format!("{}/", folder))
        && asset_name.rfind('/') == Some(folder.len())
}

/// Move a file name under another prefix, keeping only its final segment
pub fn redirect_to_prefix(file_name: &str, prefix: &str) -> String {
    format!(
        "{}/{}",
        prefix.trim_end_matches(['/', '\\']),
        last_path_segment(file_name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_schemes_untouched() {
        assert_eq!(normalize_path("https://host/a b.png"), "https://host/a b.png");
        assert_eq!(normalize_path("HTTP://host/a.png"), "HTTP://host/a.png");
        assert_eq!(normalize_path("file:/data/a.png"), "file:/data/a.png");
    }

    #[test]
    fn test_local_paths_encoded() {
        assert_eq!(normalize_path("/data/my scan.png"), "file:/data/my%20scan.png");
        assert_eq!(normalize_path("C:\\scans\\a#1.pdf"), "file:C:/scans/a%231.pdf");
    }

    #[test]
    fn test_decode_name() {
        assert_eq!(decode_name("my%20scan.png"), "my scan.png");
        assert_eq!(decode_name("plain.png"), "plain.png");
        assert_eq!(decode_name("bad%FF.png"), "bad%FF.png");
    }

    #[test]
    fn test_last_path_segment() {
        assert_eq!(last_path_segment("file:/a/b/c.png"), "c.png");
        assert_eq!(last_path_segment("a\\b.png"), "b.png");
        assert_eq!(last_path_segment("c.png"), "c.png");
    }

    #[test]
    fn test_nominal_extension() {
        assert_eq!(nominal_extension("scan.JPG"), "jpg");
        assert_eq!(nominal_extension("archive.tar.gz"), "gz");
        assert_eq!(nominal_extension("image.png?sv=2020&sig=x"), "png");
        assert_eq!(nominal_extension("image.png#page=2"), "png");
        assert_eq!(nominal_extension("README"), "");
    }

    #[test]
    fn test_is_in_exact_folder_path() {
        assert!(is_in_exact_folder_path("a.png", ""));
        assert!(!is_in_exact_folder_path("b/a.png", ""));
        assert!(is_in_exact_folder_path("a/b/c.png", "a/b"));
        assert!(!is_in_exact_folder_path("a/b/c/d.png", "a/b"));
        assert!(!is_in_exact_folder_path("a/bc/d.png", "a/b"));
    }

    #[test]
    fn test_redirect_to_prefix() {
        assert_eq!(
            redirect_to_prefix("folder/a.png.labels.json", "staging/run1/"),
            "staging/run1/a.png.labels.json"
        );
        assert_eq!(redirect_to_prefix("a.ocr.json", "out"), "out/a.ocr.json");
    }
}
