use serde::{Deserialize, Serialize};

/// A positioned piece of text as reported by a PDF text layer.
///
/// Coordinates are page-local layout units with `y` growing downwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    pub text: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
}

impl Fragment {
    pub fn new(text: impl Into<String>, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            width,
            height,
        }
    }

    /// Horizontal center of the fragment box.
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }
}

/// All fragments of one page, in the order the text layer produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageFragments {
    pub page_number: usize,
    pub fragments: Vec<Fragment>,
}

/// Fragments sharing one vertical cluster, ordered left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// y of the first fragment that opened the cluster.
    pub y: f32,
    pub fragments: Vec<Fragment>,
}

impl Row {
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Lower-cased texts, used by the keyword checks.
    pub fn lowercase_texts(&self) -> Vec<String> {
        self.fragments.iter().map(|f| f.text.to_lowercase()).collect()
    }
}

/// A reconstructed statement table for one page.
///
/// `rows[0]` holds the canonical header labels; every following row has the
/// same number of cells, each cell belonging to the header at the same index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedTable {
    pub page: usize,
    pub rows: Vec<Vec<String>>,
}

impl ExtractedTable {
    pub fn header(&self) -> &[String] {
        self.rows.first().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn data_rows(&self) -> &[Vec<String>] {
        self.rows.get(1..).unwrap_or(&[])
    }
}
