use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the nine columns of the statement schema.
///
/// Variant order is the schema order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CanonicalLabel {
    #[serde(rename = "FECHA OPER.")]
    FechaOper,
    #[serde(rename = "FECHA VALOR")]
    FechaValor,
    #[serde(rename = "DESCRIPCION")]
    Descripcion,
    #[serde(rename = "OFICINA")]
    Oficina,
    #[serde(rename = "CAN")]
    Can,
    #[serde(rename = "N° OPER.")]
    NumOper,
    #[serde(rename = "CARGO/ABONO")]
    CargoAbono,
    #[serde(rename = "ITF")]
    Itf,
    #[serde(rename = "SALDO CONTABLE")]
    SaldoContable,
}

impl CanonicalLabel {
    /// The full schema, in order.
    pub const ALL: [CanonicalLabel; 9] = [
        CanonicalLabel::FechaOper,
        CanonicalLabel::FechaValor,
        CanonicalLabel::Descripcion,
        CanonicalLabel::Oficina,
        CanonicalLabel::Can,
        CanonicalLabel::NumOper,
        CanonicalLabel::CargoAbono,
        CanonicalLabel::Itf,
        CanonicalLabel::SaldoContable,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CanonicalLabel::FechaOper => "FECHA OPER.",
            CanonicalLabel::FechaValor => "FECHA VALOR",
            CanonicalLabel::Descripcion => "DESCRIPCION",
            CanonicalLabel::Oficina => "OFICINA",
            CanonicalLabel::Can => "CAN",
            CanonicalLabel::NumOper => "N° OPER.",
            CanonicalLabel::CargoAbono => "CARGO/ABONO",
            CanonicalLabel::Itf => "ITF",
            CanonicalLabel::SaldoContable => "SALDO CONTABLE",
        }
    }

    /// Exact (already canonical) label lookup.
    pub fn from_canonical(s: &str) -> Option<CanonicalLabel> {
        CanonicalLabel::ALL.into_iter().find(|l| l.as_str() == s)
    }

    /// Date columns carry a `FECHA` label.
    pub fn is_date(self) -> bool {
        self.as_str().contains("FECHA")
    }

    /// Columns holding signed amounts.
    pub fn is_amount(self) -> bool {
        matches!(
            self,
            CanonicalLabel::CargoAbono | CanonicalLabel::Itf | CanonicalLabel::SaldoContable
        )
    }
}

impl fmt::Display for CanonicalLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of normalizing a free-text header label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedLabel {
    Canonical(CanonicalLabel),
    /// Upper-cased, trimmed, whitespace-collapsed text that matched no rule.
    Unmapped(String),
}

impl NormalizedLabel {
    pub fn canonical(&self) -> Option<CanonicalLabel> {
        match self {
            NormalizedLabel::Canonical(label) => Some(*label),
            NormalizedLabel::Unmapped(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            NormalizedLabel::Canonical(label) => label.as_str(),
            NormalizedLabel::Unmapped(text) => text,
        }
    }
}

/// Map a header label (possibly two wrapped lines joined by a space) to the schema.
///
/// Rules are tried in order and the first match wins. Both date columns are
/// checked before everything else because their labels share `FECHA`.
pub fn normalize_label(raw: &str) -> NormalizedLabel {
    use CanonicalLabel::*;

    let v = raw
        .to_uppercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let has = |needle: &str| v.contains(needle);

    let label = if has("FECHA") && has("VALOR") {
        FechaValor
    } else if has("FECHA") && (has("OPER") || has("F.")) {
        FechaOper
    } else if v == "VALOR" {
        FechaValor
    } else if v == "OPER." || v == "OPER" {
        FechaOper
    } else if has("FECHA") {
        FechaOper
    } else if has("DESCRIP") || has("CONCEPTO") {
        Descripcion
    } else if has("OFICINA") {
        Oficina
    } else if has("CAN") {
        Can
    } else if (has("N°") || has("NRO") || has("NUM")) && (has("OPER") || has("OP")) {
        NumOper
    } else if has("CARGO") || has("ABONO") {
        CargoAbono
    } else if has("ITF") {
        Itf
    } else if has("SALDO") || has("CONTABLE") {
        SaldoContable
    } else {
        return NormalizedLabel::Unmapped(v);
    };

    NormalizedLabel::Canonical(label)
}

/// String form of [`normalize_label`], used when reconciling table headers.
pub fn normalize_header(raw: &str) -> String {
    normalize_label(raw).as_str().to_string()
}
