use std::path::{Path, PathBuf};

use csv::WriterBuilder;

use crate::error::ExtractoError;
use crate::sheet::Sheet;

/// Write the sheet, header first, as a delimited file.
pub fn write_csv(path: &Path, sheet: &Sheet, delimiter: u8) -> Result<(), ExtractoError> {
    let mut writer = WriterBuilder::new().delimiter(delimiter).from_path(path)?;
    for record in sheet.to_grid() {
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_csv_to_string(sheet: &Sheet, delimiter: u8) -> Result<String, ExtractoError> {
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::<u8>::new());
    for record in sheet.to_grid() {
        writer.write_record(&record)?;
    }
    writer.flush()?;

    let bytes = writer
        .into_inner()
        .map_err(|error| ExtractoError::Io(error.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|error| ExtractoError::Extraction(format!("invalid utf-8 csv output: {error}")))
}

/// Default export path: the input's file name with a `.csv` extension.
pub fn export_file_name(input: &Path) -> PathBuf {
    input.with_extension("csv")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::Cell;
    use rust_decimal_macros::dec;

    fn sheet() -> Sheet {
        Sheet::new(
            vec!["FECHA OPER.".into(), "DESCRIPCION".into(), "ITF".into()],
            vec![vec![
                Cell::Text("01/02".into()),
                Cell::Text("PAGO, LUZ".into()),
                Cell::Number(dec!(-0.50)),
            ]],
        )
    }

    #[test]
    fn test_csv_quotes_and_numbers() {
        let out = write_csv_to_string(&sheet(), b',').unwrap();
        assert_eq!(
            out,
            "FECHA OPER.,DESCRIPCION,ITF\n01/02,\"PAGO, LUZ\",-0.50\n"
        );
    }

    #[test]
    fn test_custom_delimiter() {
        let out = write_csv_to_string(&sheet(), b';').unwrap();
        assert!(out.starts_with("FECHA OPER.;DESCRIPCION;ITF\n"));
        assert!(out.contains("01/02;PAGO, LUZ;-0.50"));
    }

    #[test]
    fn test_write_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_csv(&path, &sheet(), b',').unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, write_csv_to_string(&sheet(), b',').unwrap());
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(
            export_file_name(Path::new("docs/estado_enero.pdf")),
            PathBuf::from("docs/estado_enero.csv")
        );
        assert_eq!(
            export_file_name(Path::new("extracto")),
            PathBuf::from("extracto.csv")
        );
    }
}
