use crate::error::Error;
use crate::model::FileRecord;
use serde::Serialize;
use std::io::Write;
use tracing::debug;

/// One exported row. Field names double as the CSV header.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct ExportRow<'a> {
    name: &'a str,
    extension: &'a str,
    path: &'a str,
}

/// Write `Name,Extension,Path` rows for `files`. Fields containing a comma,
/// a double quote or a newline are quoted with embedded quotes doubled.
/// Nothing at all is written for an empty file list.
pub fn write_csv<'a, W, I>(writer: W, files: I) -> Result<usize, Error>
where
    W: Write,
    I: IntoIterator<Item = &'a FileRecord>,
{
    let mut csv_writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    let mut rows = 0;
    for file in files {
        csv_writer.serialize(ExportRow {
            name: file.stem(),
            extension: file.extension(),
            path: &file.path,
        })?;
        rows += 1;
    }
    csv_writer.flush()?;

    debug!("Exported {} row(s) to CSV", rows);
    Ok(rows)
}

/// Default export file name for a bucket: whitespace and characters that are
/// unsafe in file names become `_`.
pub fn export_file_name(label: &str) -> String {
    let safe: String = label
        .chars()
        .map(|c| match c {
            '/' | '\\' | '?' | '%' | '*' | ':' | '"' | '<' | '>' | '|' => '_',
            c if c.is_whitespace() => '_',
            c => c,
        })
        .collect();
    format!("{safe}_files.csv")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn export(files: &[FileRecord]) -> String {
        let mut out = Vec::new();
        write_csv(&mut out, files).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_header_and_rows() {
        let files = vec![
            FileRecord::new("/docs/report.final.pdf", 1, 0.0),
            FileRecord::new("/bin/Makefile", 1, 0.0),
        ];
        assert_eq!(
            export(&files),
            "Name,Extension,Path\n\
             report.final,pdf,/docs/report.final.pdf\n\
             Makefile,,/bin/Makefile\n"
        );
    }

    #[test]
    fn test_quoting() {
        let files = vec![FileRecord::new("/x/a, \"b\".txt", 1, 0.0)];
        assert_eq!(
            export(&files),
            "Name,Extension,Path\n\"a, \"\"b\"\"\",txt,\"/x/a, \"\"b\"\".txt\"\n"
        );

        let multiline = vec![FileRecord::new("/x/line\nbreak.md", 1, 0.0)];
        assert_eq!(
            export(&multiline),
            "Name,Extension,Path\n\"line\nbreak\",md,\"/x/line\nbreak.md\"\n"
        );
    }

    #[test]
    fn test_empty_writes_nothing() {
        assert_eq!(export(&[]), "");
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(export_file_name("Documents"), "Documents_files.csv");
        assert_eq!(
            export_file_name("Tiny (0 KB - 100 KB)"),
            "Tiny_(0_KB_-_100_KB)_files.csv"
        );
        assert_eq!(
            export_file_name("AC/DC: \"Live\"?"),
            "AC_DC___Live___files.csv"
        );
    }
}
