use std::path::Path;

use crate::error::ExtractoError;
use crate::extraction::FragmentSource;
use crate::model::PageFragments;

/// Parse a JSON dump of per-page fragments.
///
/// The document is an array of `{"page_number": n, "fragments": [...]}`
/// objects; `width` and `height` may be omitted.
pub fn parse_fragments_str(json: &str) -> Result<Vec<PageFragments>, ExtractoError> {
    let pages: Vec<PageFragments> =
        serde_json::from_str(json).map_err(|e| ExtractoError::FragmentParse(e.to_string()))?;

    for page in &pages {
        for (i, f) in page.fragments.iter().enumerate() {
            if ![f.x, f.y, f.width, f.height].iter().all(|v| v.is_finite()) {
                return Err(ExtractoError::FragmentParse(format!(
                    "page {} fragment {} ('{}') has a non-finite coordinate",
                    page.page_number, i, f.text
                )));
            }
        }
    }

    Ok(pages)
}

/// Load a fragments JSON file from disk.
pub fn load_fragments(path: &Path) -> Result<Vec<PageFragments>, ExtractoError> {
    let content = std::fs::read_to_string(path)?;
    parse_fragments_str(&content)
}

/// Backend reading fragments that another tool already extracted.
///
/// The input bytes are the JSON document itself.
#[derive(Debug, Default)]
pub struct JsonFragmentSource;

impl FragmentSource for JsonFragmentSource {
    fn extract_fragments(&self, pdf_bytes: &[u8]) -> Result<Vec<PageFragments>, ExtractoError> {
        let json = std::str::from_utf8(pdf_bytes)
            .map_err(|e| ExtractoError::FragmentParse(format!("input is not UTF-8: {}", e)))?;
        parse_fragments_str(json)
    }

    fn backend_name(&self) -> &str {
        "fragments-json"
    }
}
