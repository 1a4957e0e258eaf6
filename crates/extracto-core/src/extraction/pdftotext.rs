use std::io::Write;
use std::process::Command;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, warn};

use crate::error::ExtractoError;
use crate::extraction::FragmentSource;
use crate::model::{Fragment, PageFragments};

/// Horizontal gap, in points, under which neighbouring words form one fragment.
pub const DEFAULT_WORD_GAP: f32 = 3.0;

/// Fragment backend using `pdftotext -bbox-layout` (from poppler-utils).
///
/// pdftotext reports single words; words of one layout line that nearly touch
/// are joined back into the text runs a table cell is made of.
pub struct PdftotextSource {
    word_gap: f32,
}

impl PdftotextSource {
    pub fn new() -> Self {
        PdftotextSource {
            word_gap: DEFAULT_WORD_GAP,
        }
    }

    pub fn with_word_gap(word_gap: f32) -> Self {
        PdftotextSource { word_gap }
    }

    /// Fragments from `pdftotext -bbox-layout` output, joined with this source's word gap.
    pub fn fragments_from_xml(&self, xml: &str) -> Result<Vec<PageFragments>, ExtractoError> {
        parse_bbox_xml(xml, self.word_gap)
    }
}

impl Default for PdftotextSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FragmentSource for PdftotextSource {
    fn extract_fragments(&self, pdf_bytes: &[u8]) -> Result<Vec<PageFragments>, ExtractoError> {
        let mut tmpfile =
            tempfile::NamedTempFile::new().map_err(|e| ExtractoError::Extraction(e.to_string()))?;
        tmpfile
            .write_all(pdf_bytes)
            .map_err(|e| ExtractoError::Extraction(e.to_string()))?;

        let output = Command::new("pdftotext")
            .arg("-bbox-layout")
            .arg(tmpfile.path())
            .arg("-")
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ExtractoError::PdftotextNotFound
                } else {
                    ExtractoError::Extraction(format!("pdftotext -bbox-layout failed: {}", e))
                }
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(ExtractoError::PdftotextFailed { code, stderr });
        }

        let xml = String::from_utf8_lossy(&output.stdout);
        let pages = self.fragments_from_xml(&xml)?;

        let total: usize = pages.iter().map(|p| p.fragments.len()).sum();
        if total == 0 {
            warn!(pages = pages.len(), "pdftotext returned no text, the PDF may be scanned");
        } else {
            debug!(pages = pages.len(), fragments = total, "pdftotext fragments extracted");
        }

        Ok(pages)
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}

#[derive(Debug, Clone)]
struct Word {
    text: String,
    x_min: f32,
    y_min: f32,
    x_max: f32,
    y_max: f32,
}

/// Parse pdftotext's bbox XHTML into per-page fragments.
///
/// Pages are numbered by their order in the document.
fn parse_bbox_xml(xml: &str, word_gap: f32) -> Result<Vec<PageFragments>, ExtractoError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut pages: Vec<PageFragments> = Vec::new();
    let mut line: Vec<Word> = Vec::new();
    let mut word: Option<Word> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| ExtractoError::Extraction(format!("bbox xml: {}", e)))?;
        match event {
            Event::Start(e) => match e.name().as_ref() {
                b"page" => pages.push(PageFragments {
                    page_number: pages.len() + 1,
                    fragments: Vec::new(),
                }),
                b"line" => line.clear(),
                b"word" => word = Some(word_box(&e)?),
                _ => {}
            },
            Event::Text(t) => {
                if let Some(w) = word.as_mut() {
                    let text = t
                        .unescape()
                        .map_err(|e| ExtractoError::Extraction(format!("bbox xml: {}", e)))?;
                    w.text.push_str(&text);
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"word" => {
                    if let Some(w) = word.take() {
                        if !w.text.trim().is_empty() {
                            line.push(w);
                        }
                    }
                }
                b"line" => {
                    if let Some(page) = pages.last_mut() {
                        page.fragments.extend(join_words(&line, word_gap));
                    }
                    line.clear();
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(pages)
}

fn word_box(tag: &BytesStart) -> Result<Word, ExtractoError> {
    Ok(Word {
        text: String::new(),
        x_min: attr_f32(tag, "xMin")?,
        y_min: attr_f32(tag, "yMin")?,
        x_max: attr_f32(tag, "xMax")?,
        y_max: attr_f32(tag, "yMax")?,
    })
}

fn attr_f32(tag: &BytesStart, name: &str) -> Result<f32, ExtractoError> {
    let attr = tag
        .try_get_attribute(name)
        .map_err(|e| ExtractoError::Extraction(format!("bbox xml: {}", e)))?
        .ok_or_else(|| ExtractoError::Extraction(format!("word without {name} attribute")))?;
    let value = attr
        .unescape_value()
        .map_err(|e| ExtractoError::Extraction(format!("bbox xml: {}", e)))?;
    value
        .trim()
        .parse()
        .map_err(|_| ExtractoError::Extraction(format!("invalid {name} value '{value}'")))
}

/// Merge the words of one line into fragments, splitting where the gap exceeds `word_gap`.
fn join_words(words: &[Word], word_gap: f32) -> Vec<Fragment> {
    let mut runs: Vec<Word> = Vec::new();
    for w in words {
        match runs.last_mut() {
            Some(run) if w.x_min - run.x_max <= word_gap => {
                run.text.push(' ');
                run.text.push_str(w.text.trim());
                run.x_max = w.x_max;
                run.y_min = run.y_min.min(w.y_min);
                run.y_max = run.y_max.max(w.y_max);
            }
            _ => runs.push(Word {
                text: w.text.trim().to_string(),
                ..w.clone()
            }),
        }
    }

    runs.into_iter()
        .map(|r| Fragment::new(r.text, r.x_min, r.y_min, r.x_max - r.x_min, r.y_max - r.y_min))
        .collect()
}
