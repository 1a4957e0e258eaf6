use extracto_core::error::ExtractoError;
use extracto_core::model::ExtractedTable;

pub fn print(tables: &[ExtractedTable]) -> Result<(), ExtractoError> {
    let json = serde_json::to_string_pretty(tables)?;
    println!("{json}");
    Ok(())
}
