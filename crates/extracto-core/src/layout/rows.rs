use crate::model::{Fragment, Row};

/// Cluster a page's fragments into rows by vertical proximity.
///
/// Blank fragments are dropped. Fragments are visited top to bottom (then
/// left to right) and a fragment joins the open row when its y is within
/// `tolerance` of the previous fragment's y.
pub fn group_rows(fragments: &[Fragment], tolerance: f32) -> Vec<Row> {
    let mut sorted: Vec<&Fragment> = fragments
        .iter()
        .filter(|f| !f.text.trim().is_empty())
        .collect();
    sorted.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));

    let mut rows = Vec::new();
    let mut current: Vec<Fragment> = Vec::new();
    let mut last_y: Option<f32> = None;

    for fragment in sorted {
        if let Some(y) = last_y {
            if (fragment.y - y).abs() > tolerance {
                rows.push(close_row(std::mem::take(&mut current)));
            }
        }
        current.push(fragment.clone());
        last_y = Some(fragment.y);
    }

    if !current.is_empty() {
        rows.push(close_row(current));
    }

    rows
}

fn close_row(mut fragments: Vec<Fragment>) -> Row {
    let y = fragments.first().map_or(0.0, |f| f.y);
    fragments.sort_by(|a, b| a.x.total_cmp(&b.x));
    Row { y, fragments }
}
