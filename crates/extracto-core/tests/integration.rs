//! Integration tests for the extract_pdf() end-to-end pipeline.
//!
//! Uses a MockSource that returns pre-built PageFragments without
//! invoking pdftotext, so these tests run without poppler-utils.

use extracto_core::combine::{available_headers, combine_tables};
use extracto_core::config::LayoutConfig;
use extracto_core::error::ExtractoError;
use extracto_core::export::write_csv_to_string;
use extracto_core::extraction::fragments_json::JsonFragmentSource;
use extracto_core::extraction::FragmentSource;
use extracto_core::model::{ExtractedTable, Fragment, PageFragments};
use extracto_core::schema::CanonicalLabel;
use extracto_core::{extract_pdf, extract_tables};

struct MockSource {
    pages: Vec<PageFragments>,
}

impl FragmentSource for MockSource {
    fn extract_fragments(&self, _pdf_bytes: &[u8]) -> Result<Vec<PageFragments>, ExtractoError> {
        Ok(self.pages.clone())
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

struct FailingSource;

impl FragmentSource for FailingSource {
    fn extract_fragments(&self, _pdf_bytes: &[u8]) -> Result<Vec<PageFragments>, ExtractoError> {
        Err(ExtractoError::PdftotextNotFound)
    }

    fn backend_name(&self) -> &str {
        "failing"
    }
}

const XS: [f32; 9] = [20.0, 70.0, 130.0, 260.0, 310.0, 350.0, 410.0, 480.0, 520.0];

const HEADER: [&str; 9] = [
    "FECHA OPER.",
    "FECHA VALOR",
    "DESCRIPCION",
    "OFICINA",
    "CAN",
    "N° OPER.",
    "CARGO/ABONO",
    "ITF",
    "SALDO CONTABLE",
];

const PAGO: [&str; 9] = [
    "01-02",
    "01-02",
    "PAGO SERVICIOS",
    "101",
    "01",
    "000123",
    "-150.00",
    "0.00",
    "1500.00",
];

const ABONO: [&str; 9] = [
    "05-02",
    "05-02",
    "DEPOSITO REMUNERACION",
    "101",
    "02",
    "000124",
    "2,000.00",
    "0.00",
    "3,500.00",
];

/// One fragment per non-empty cell, at the column positions above.
fn cells(y: f32, texts: [&str; 9]) -> Vec<Fragment> {
    texts
        .iter()
        .zip(XS)
        .filter(|(t, _)| !t.is_empty())
        .map(|(t, x)| Fragment::new(*t, x, y, 30.0, 8.0))
        .collect()
}

fn words(y: f32, parts: &[(&str, f32)]) -> Vec<Fragment> {
    parts
        .iter()
        .map(|(t, x)| Fragment::new(*t, *x, y, 30.0, 8.0))
        .collect()
}

fn page(number: usize, rows: Vec<Vec<Fragment>>) -> PageFragments {
    PageFragments {
        page_number: number,
        fragments: rows.into_iter().flatten().collect(),
    }
}

fn owned(row: [&str; 9]) -> Vec<String> {
    row.iter().map(|s| s.to_string()).collect()
}

fn run(pages: Vec<PageFragments>) -> Vec<ExtractedTable> {
    let source = MockSource { pages };
    extract_pdf(&[], &source, &LayoutConfig::default()).unwrap()
}

// ---------------------------------------------------------------------------
// Scenario A: a clean row passes through unchanged
// ---------------------------------------------------------------------------
#[test]
fn clean_row_passes_through() {
    let config = LayoutConfig {
        min_data_rows: 1,
        ..LayoutConfig::default()
    };
    let pages = vec![page(1, vec![cells(100.0, HEADER), cells(120.0, PAGO)])];

    let tables = extract_tables(&pages, &config);

    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].page, 1);
    assert_eq!(tables[0].rows, vec![owned(HEADER), owned(PAGO)]);
}

// ---------------------------------------------------------------------------
// Scenario B: undated line continues the previous description
// ---------------------------------------------------------------------------
#[test]
fn continuation_merges_into_description() {
    // Words arrive as separate fragments; a line of one fragment is noise.
    let tables = run(vec![page(
        1,
        vec![
            cells(100.0, HEADER),
            cells(120.0, PAGO),
            words(
                130.0,
                &[("CONTINUA", 130.0), ("DESCRIPCION", 150.0), ("LARGA", 185.0)],
            ),
            cells(150.0, ABONO),
        ],
    )]);

    assert_eq!(tables.len(), 1);
    let rows = tables[0].data_rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][2], "PAGO SERVICIOS CONTINUA DESCRIPCION LARGA");
    assert_eq!(rows[0][8], "1500.00");
    assert_eq!(rows[1], owned(ABONO));
}

// ---------------------------------------------------------------------------
// Scenario C: footer ends the page table
// ---------------------------------------------------------------------------
#[test]
fn footer_truncates_page() {
    let tables = run(vec![page(
        1,
        vec![
            cells(100.0, HEADER),
            cells(120.0, PAGO),
            cells(140.0, ABONO),
            words(170.0, &[("Rogamos verifique la informacion", 20.0)]),
            cells(190.0, PAGO),
            words(210.0, &[("BANCO EJEMPLO S.A.", 20.0), ("RUC 20100", 300.0)]),
        ],
    )]);

    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].data_rows().len(), 2);
    assert_eq!(tables[0].data_rows()[1], owned(ABONO));
}

#[test]
fn totales_por_itf_drops_everything_below() {
    let tables = run(vec![page(
        1,
        vec![
            cells(100.0, HEADER),
            cells(120.0, PAGO),
            cells(140.0, ABONO),
            words(160.0, &[("TOTALES POR ITF", 130.0), ("0.00", 480.0)]),
            cells(180.0, ABONO),
            cells(200.0, PAGO),
        ],
    )]);

    assert_eq!(tables[0].data_rows().len(), 2);
}

// ---------------------------------------------------------------------------
// Scenario D: header wrapped over two physical lines
// ---------------------------------------------------------------------------
#[test]
fn wrapped_header_resolves_canonical_columns() {
    let first_line = [
        "FECHA",
        "FECHA",
        "DESCRIPCION",
        "OFICINA",
        "CAN",
        "N° OPER.",
        "CARGO/ABONO",
        "ITF",
        "SALDO",
    ];
    let second_line = words(
        110.0,
        &[("OPER.", 20.0), ("VALOR", 70.0), ("CONTABLE", 520.0)],
    );

    let tables = run(vec![page(
        1,
        vec![
            cells(100.0, first_line),
            second_line,
            cells(130.0, PAGO),
            cells(150.0, ABONO),
        ],
    )]);

    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].header(), owned(HEADER).as_slice());
    // The second header line is not a data row.
    assert_eq!(tables[0].data_rows().len(), 2);
    assert_eq!(tables[0].data_rows()[0], owned(PAGO));
}

// ---------------------------------------------------------------------------
// Multi-page documents
// ---------------------------------------------------------------------------
#[test]
fn layout_shared_across_pages() {
    let preamble = words(
        40.0,
        &[("ESTADO DE CUENTA", 20.0), ("Cliente: ANA PEREZ", 300.0)],
    );
    let page_one = page(
        1,
        vec![
            preamble.clone(),
            words(
                70.0,
                &[("SALDO ANTERIOR", 130.0), ("1,650.00", 520.0)],
            ),
            cells(100.0, HEADER),
            cells(120.0, PAGO),
            cells(140.0, ABONO),
        ],
    );
    // Dates merged into one run, a page number line and the header repeated mid-page.
    let page_two = page(
        2,
        vec![
            preamble,
            cells(100.0, HEADER),
            words(
                120.0,
                &[
                    ("07-02  08-02", 20.0),
                    ("COMPRA TIENDA", 130.0),
                    ("-45.90", 410.0),
                    ("3,454.10", 520.0),
                ],
            ),
            words(140.0, &[("Página 2 de 2", 400.0), ("x", 500.0)]),
            cells(160.0, HEADER),
            cells(180.0, ABONO),
        ],
    );

    let tables = run(vec![page_one, page_two]);

    assert_eq!(tables.len(), 2);
    assert_eq!(tables[1].page, 2);
    let rows = tables[1].data_rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][0], "07-02");
    assert_eq!(rows[0][1], "08-02");
    assert_eq!(rows[0][2], "COMPRA TIENDA");
    assert_eq!(rows[0][6], "-45.90");
    assert_eq!(rows[1], owned(ABONO));
}

#[test]
fn short_page_contributes_nothing() {
    let tables = run(vec![
        page(1, vec![cells(100.0, HEADER), cells(120.0, PAGO), cells(140.0, ABONO)]),
        page(2, vec![cells(100.0, HEADER), cells(120.0, PAGO)]),
    ]);

    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].page, 1);
}

#[test]
fn every_row_matches_header_width() {
    let tables = run(vec![page(
        1,
        vec![
            cells(100.0, HEADER),
            words(120.0, &[("SALDO ANT.", 130.0), ("900.00", 520.0)]),
            cells(140.0, PAGO),
            words(150.0, &[("REF", 130.0), ("A-77", 600.0)]),
            words(170.0, &[("TRANSF", 22.0), ("INTERNET", 72.0), ("10-02", 75.0)]),
            cells(190.0, ABONO),
        ],
    )]);

    for table in &tables {
        let width = table.header().len();
        assert_eq!(width, 9);
        assert!(table.data_rows().iter().all(|r| r.len() == width));
    }
    let rows = tables[0].data_rows();
    assert_eq!(rows[0][8], "900.00");
    assert_eq!(rows[1][2], "PAGO SERVICIOS REF A-77");
    assert_eq!(rows[1][8], "1500.00");
    assert_eq!(rows[2][0], "10-02");
    assert_eq!(rows[2][2], "TRANSF INTERNET");
}

// ---------------------------------------------------------------------------
// Layout failure
// ---------------------------------------------------------------------------
#[test]
fn too_few_columns_yields_no_tables() {
    let tables = run(vec![page(
        1,
        vec![
            words(
                100.0,
                &[
                    ("Fecha", 20.0),
                    ("Descripcion", 130.0),
                    ("Cargo", 300.0),
                    ("Saldo", 400.0),
                    ("Moneda", 500.0),
                ],
            ),
            words(120.0, &[("01-02", 20.0), ("PAGO", 130.0), ("10.00", 300.0)]),
            words(140.0, &[("02-02", 20.0), ("PAGO", 130.0), ("12.00", 300.0)]),
        ],
    )]);

    assert!(tables.is_empty());
}

#[test]
fn document_without_header_yields_no_tables() {
    let tables = run(vec![page(1, vec![cells(120.0, PAGO), cells(140.0, ABONO)])]);
    assert!(tables.is_empty());
}

#[test]
fn source_error_propagates() {
    let err = extract_pdf(b"%PDF", &FailingSource, &LayoutConfig::default()).unwrap_err();
    assert!(matches!(err, ExtractoError::PdftotextNotFound));
}

// ---------------------------------------------------------------------------
// Selection and export
// ---------------------------------------------------------------------------
#[test]
fn combine_and_export_selected_tables() {
    let tables = run(vec![
        page(1, vec![cells(100.0, HEADER), cells(120.0, PAGO), cells(140.0, ABONO)]),
        page(2, vec![cells(100.0, HEADER), cells(120.0, ABONO), cells(140.0, PAGO)]),
    ]);
    assert_eq!(tables.len(), 2);
    assert_eq!(available_headers(&tables, &[0, 1]), CanonicalLabel::ALL.to_vec());

    let sheet = combine_tables(
        &tables,
        &[0, 1],
        &[CanonicalLabel::SaldoContable, CanonicalLabel::FechaOper],
    )
    .unwrap()
    .auto_format();
    let csv = write_csv_to_string(&sheet, b',').unwrap();

    assert_eq!(
        csv,
        "FECHA OPER.,SALDO CONTABLE\n\
         01/02,1500.00\n\
         05/02,3500.00\n\
         05/02,3500.00\n\
         01/02,1500.00\n"
    );
}

#[test]
fn json_fragments_end_to_end() {
    let pages = vec![page(
        1,
        vec![cells(100.0, HEADER), cells(120.0, PAGO), cells(140.0, ABONO)],
    )];
    let json = serde_json::to_vec(&pages).unwrap();

    let tables = extract_pdf(&json, &JsonFragmentSource, &LayoutConfig::default()).unwrap();

    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].data_rows()[0], owned(PAGO));
}
