pub mod fragments_json;
pub mod pdftotext;

use crate::error::ExtractoError;
use crate::model::PageFragments;

/// Trait for backends that turn a document into positioned text fragments.
pub trait FragmentSource: Send + Sync {
    /// Extract the fragments of every page, one `PageFragments` per page in order.
    fn extract_fragments(&self, pdf_bytes: &[u8]) -> Result<Vec<PageFragments>, ExtractoError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}
