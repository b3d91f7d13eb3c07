//! Workbook datasets, flattened into CSV so the extractors read a single format.

use std::{
    io::{Read, Seek},
    path::Path,
};

use calamine::{Data, DataType, Reader, open_workbook_auto_from_rs};

use crate::prelude::*;

/// How a dataset file is encoded, judging by its extension.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DatasetFormat {
    Csv,

    /// Excel or OpenDocument workbook, the first worksheet holds the records.
    Workbook,
}

impl DatasetFormat {
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        let extension = path.extension().and_then(|extension| extension.to_str());
        match extension.map(str::to_ascii_lowercase).as_deref() {
            Some("xlsx" | "xlsm" | "xlsb" | "xls" | "ods") => Self::Workbook,
            _ => Self::Csv,
        }
    }
}

/// Render the first worksheet of the workbook as CSV, the first row being the header.
#[instrument(skip_all)]
pub fn workbook_to_csv<RS: Read + Seek + Clone>(reader: RS) -> Result<Vec<u8>> {
    let mut workbook = open_workbook_auto_from_rs(reader)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::data("the workbook has no worksheets"))??;
    let (n_rows, n_columns) = range.get_size();
    debug!(n_rows, n_columns, "read the worksheet");

    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in range.rows() {
        writer.write_record(row.iter().map(render_cell))?;
    }
    writer.into_inner().map_err(|error| Error::data(error.to_string()))
}

fn render_cell(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::DateTime(_) => cell.as_datetime().map_or_else(
            || cell.to_string(),
            |timestamp| timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
        ),
        _ => cell.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn format_from_path_ok() {
        assert_eq!(DatasetFormat::from_path(Path::new("trips.xlsx")), DatasetFormat::Workbook);
        assert_eq!(DatasetFormat::from_path(Path::new("cells.XLS")), DatasetFormat::Workbook);
        assert_eq!(DatasetFormat::from_path(Path::new("cells.ods")), DatasetFormat::Workbook);
        assert_eq!(DatasetFormat::from_path(Path::new("trips.csv")), DatasetFormat::Csv);
        assert_eq!(DatasetFormat::from_path(Path::new("trips")), DatasetFormat::Csv);
    }

    #[test]
    fn render_cell_ok() {
        assert_eq!(render_cell(&Data::Empty), "");
        assert_eq!(render_cell(&Data::String("B5".into())), "B5");
        assert_eq!(render_cell(&Data::Int(579_236)), "579236");
        assert_eq!(render_cell(&Data::Float(12.5)), "12.5");
        let timestamp = Data::DateTimeIso("2023-03-01T08:00:00".into());
        assert_eq!(render_cell(&timestamp), "2023-03-01T08:00:00");
    }

    #[test]
    fn not_a_workbook() {
        let error = workbook_to_csv(Cursor::new(b"user_id,start_date\n".to_vec())).unwrap_err();
        assert!(matches!(error, Error::Data(_)), "{error:?}");
    }
}
