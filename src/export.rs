// src/export.rs

use crate::error::Result;
use crate::models::LogEntry;
use rust_xlsxwriter::{Format, Workbook};
use std::io::Write;

const HEADER: [&str; 7] = [
    "id",
    "operator",
    "macchina",
    "linea",
    "ore",
    "data",
    "descrizione",
];

/// Writes entries as CSV with a header row. Returns the number of data rows.
pub fn export_csv<W: Write>(entries: &[LogEntry], writer: W) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(HEADER)?;

    for entry in entries {
        csv_writer.write_record([
            &entry.id.to_string(),
            &entry.operator,
            &entry.machine,
            &entry.line,
            &format!("{:.2}", entry.hours),
            &entry.date,
            &entry.description,
        ])?;
    }

    csv_writer.flush()?;
    Ok(entries.len())
}

/// Builds a one-sheet workbook with the same columns as [`export_csv`].
///
/// Ids are written as text so large values keep every digit; hours are numeric.
pub fn export_xlsx(entries: &[LogEntry]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Report")?;

    for (col, title) in (0u16..).zip(HEADER) {
        sheet.write_string_with_format(0, col, title, &bold)?;
    }
    for (row, entry) in (1u32..).zip(entries) {
        sheet.write_string(row, 0, entry.id.to_string())?;
        sheet.write_string(row, 1, &entry.operator)?;
        sheet.write_string(row, 2, &entry.machine)?;
        sheet.write_string(row, 3, &entry.line)?;
        sheet.write_number(row, 4, entry.hours)?;
        sheet.write_string(row, 5, &entry.date)?;
        sheet.write_string(row, 6, &entry.description)?;
    }

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::tests::{entry, sample};

    #[test]
    fn csv_has_header_and_rows() {
        let mut buf = Vec::new();
        let count = export_csv(&sample(), &mut buf).unwrap();
        assert_eq!(count, 4);

        let output = String::from_utf8(buf).unwrap();
        let mut lines = output.lines();
        assert_eq!(
            lines.next(),
            Some("id,operator,macchina,linea,ore,data,descrizione")
        );
        assert_eq!(lines.next(), Some("1,Mario,M1,L1,1.00,01/01/2024,manutenzione"));
        assert_eq!(output.lines().count(), 5);
    }

    #[test]
    fn csv_quotes_embedded_commas() {
        let mut buf = Vec::new();
        let e = entry(9, "Anna", "M1", "L1", "01/01/2024", "olio, filtro");
        export_csv(&[e], &mut buf).unwrap();
        let output = String::from_utf8(buf).unwrap();
        assert!(output.contains("\"olio, filtro\""));
    }

    #[test]
    fn empty_export_is_header_only() {
        let mut buf = Vec::new();
        assert_eq!(export_csv(&[], &mut buf).unwrap(), 0);
        assert_eq!(String::from_utf8(buf).unwrap().lines().count(), 1);
    }

    #[test]
    fn xlsx_is_a_zip_container() {
        let bytes = export_xlsx(&sample()).unwrap();
        assert!(bytes.len() > 100);
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn empty_xlsx_still_has_header_sheet() {
        let bytes = export_xlsx(&[]).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }
}
