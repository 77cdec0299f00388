use crate::common::error::Result;
use crate::common::types::Row;
use std::fs;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Header for a set of rows: every column, in first-seen order.
pub fn collect_columns(rows: &[Row]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for row in rows {
        for column in row.columns() {
            if !columns.iter().any(|c| c == column) {
                columns.push(column.to_string());
            }
        }
    }
    columns
}

/// Write rows to `path` as CSV, replacing any existing file.
///
/// Data goes to a temp file in the target directory and is persisted over
/// the target, so an interrupted write never truncates a previously good
/// file. The temp file is removed whenever the write fails. Returns the
/// number of data rows written.
pub fn write_rows(path: &Path, rows: &[Row]) -> Result<usize> {
    let parent = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            fs::create_dir_all(parent)?;
            parent
        }
        None => Path::new("."),
    };

    let columns = collect_columns(rows);
    let mut staged = NamedTempFile::new_in(parent)?;
    {
        let mut writer = csv::Writer::from_writer(staged.as_file_mut());
        writer.write_record(&columns)?;
        for row in rows {
            writer.write_record(columns.iter().map(|c| row.get(c).unwrap_or("")))?;
        }
        writer.flush()?;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        staged
            .as_file()
            .set_permissions(fs::Permissions::from_mode(0o644))?;
    }
    staged.persist(path).map_err(|e| e.error)?;

    debug!("Wrote {} rows ({} columns) to {}", rows.len(), columns.len(), path.display());
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn rows() -> Vec<Row> {
        vec![
            Row::from_iter([("rk", "1"), ("nm", "Krys Gorski"), ("ti", "48.92"), ("auto", "yes")]),
            Row::from_iter([("rk", "2"), ("nm", "Jane Doe, Jr."), ("ti", "50.10")]),
        ]
    }

    #[test]
    fn test_collect_columns_first_seen_order() {
        let rows = vec![
            Row::from_iter([("a", "1"), ("b", "2")]),
            Row::from_iter([("c", "3"), ("a", "4")]),
        ];
        assert_eq!(collect_columns(&rows), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_write_rows_creates_parents_and_fills_missing_cells() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/ohio/2024-2025-finals-girls-d1-50-freestyle.csv");

        let written = write_rows(&path, &rows()).unwrap();
        assert_eq!(written, 2);

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "rk,nm,ti,auto\n1,Krys Gorski,48.92,yes\n2,\"Jane Doe, Jr.\",50.10,\n"
        );
        let entries: Vec<_> = fs::read_dir(path.parent().unwrap()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_write_rows_overwrites_with_identical_bytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("event.csv");
        fs::write(&path, "stale content that is longer than the new file\n".repeat(20)).unwrap();

        write_rows(&path, &rows()).unwrap();
        let first = fs::read(&path).unwrap();
        write_rows(&path, &rows()).unwrap();
        let second = fs::read(&path).unwrap();

        assert_eq!(first, second);
        assert!(String::from_utf8(first).unwrap().starts_with("rk,nm"));
    }

    #[test]
    fn test_failed_write_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("event.csv");
        // A directory in the way makes the final rename fail.
        fs::create_dir(&path).unwrap();

        assert!(write_rows(&path, &rows()).is_err());

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("event.csv")]);
        assert!(path.is_dir());
    }
}
