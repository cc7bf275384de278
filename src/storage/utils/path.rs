// Path and object-key helpers shared across storage operations
use std::path::Path;

/// Whether `key` is a folder marker (an object whose key ends with '/').
pub fn is_folder_marker(key: &str) -> bool {
    key.ends_with('/')
}

/// All folder markers among `keys`, in listing order.
pub fn folder_markers<S: AsRef<str>>(keys: &[S]) -> Vec<String> {
    keys.iter()
        .map(AsRef::as_ref)
        .filter(|key| is_folder_marker(key))
        .map(str::to_string)
        .collect()
}

/// File names that sit directly inside `folder`.
///
/// With no folder, returns the files at bucket root. Folder markers and
/// objects nested deeper than one level are skipped.
pub fn files_in_folder<S: AsRef<str>>(keys: &[S], folder: Option<&str>) -> Vec<String> {
    let folder = folder.map(|f| f.trim_matches('/')).filter(|f| !f.is_empty());

    keys.iter()
        .map(AsRef::as_ref)
        .filter(|key| !is_folder_marker(key))
        .filter_map(|key| {
            let (parent, name) = match key.rsplit_once('/') {
                Some((parent, name)) => (Some(parent), name),
                None => (None, key),
            };
            (parent == folder).then(|| name.to_string())
        })
        .collect()
}

/// Key under which a local file is stored, `folder/file_name` or just `file_name`.
pub fn object_key(folder: &str, file_name: &str) -> String {
    let folder = folder.trim_matches('/');
    if folder.is_empty() {
        file_name.to_string()
    } else {
        format!("{folder}/{file_name}")
    }
}

/// Extract a normalized basename from a remote path.
pub fn basename(path: &str) -> String {
    Path::new(path.trim_start_matches('/'))
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.trim_matches('/').to_string())
}

/// Return a new String that guarantees a trailing '/'.
pub fn ensure_trailing_slash(path: &str) -> String {
    if path.ends_with('/') {
        path.to_string()
    } else {
        format!("{}/", path)
    }
}
