use extracto_core::model::ExtractedTable;

pub fn print(tables: &[ExtractedTable]) {
    for (i, table) in tables.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!(
            "=== Table {} (page {}, {} rows) ===\n",
            i + 1,
            table.page,
            table.data_rows().len()
        );
        print!("{}", format_table(table));
    }
}

/// Render a table as left-aligned columns separated by two spaces.
pub fn format_table(table: &ExtractedTable) -> String {
    let columns = table.header().len();
    let widths: Vec<usize> = (0..columns)
        .map(|c| {
            table
                .rows
                .iter()
                .filter_map(|r| r.get(c))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    for (r, row) in table.rows.iter().enumerate() {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{:<width$}", cell, width = w))
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str("  ");
        out.push_str(line.trim_end());
        out.push('\n');
        if r == 0 {
            let rule = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
            out.push_str("  ");
            out.push_str(&rule.join("  "));
            out.push('\n');
        }
    }
    out
}
