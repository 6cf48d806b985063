//! Load a previously downloaded source document from disk.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde_json::Value;

use crate::error::AppError;

/// Read a JSON document (e.g. a saved copy of the BCE feed).
pub fn read_document_json(path: &Path) -> Result<Value, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open input JSON '{}': {e}", path.display())))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::new(4, format!("Invalid input JSON '{}': {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn missing_file_is_config_error() {
        let err = read_document_json(Path::new("/nonexistent/indicadores/feed.json")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn invalid_json_is_upstream_error() {
        let path = std::env::temp_dir().join(format!("indicadores-doc-{}.json", std::process::id()));
        fs::write(&path, "<html>maintenance</html>").unwrap();
        let err = read_document_json(&path).unwrap_err();
        assert_eq!(err.exit_code(), 4);
        let _ = fs::remove_file(&path);
    }
}
