//! Plain-text grid rendering for the "view" operations. The renderer is a
//! string builder with no terminal dependencies so every table is equally at
//! home in a pipe, a log file, or an interactive session.

/// Render `rows` under `headers` as a bordered grid.
///
/// Cells may contain embedded newlines (appended sighting notes do) and are
/// laid out as multi-line rows. Rows shorter than the header are padded with
/// blank cells; anything longer is truncated to the header width.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let columns = headers.len();
    if columns == 0 {
        return String::new();
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (idx, cell) in row.iter().take(columns).enumerate() {
            for line in cell.lines() {
                widths[idx] = widths[idx].max(line.chars().count());
            }
        }
    }

    let border = border_line(&widths);
    let mut out = String::new();
    out.push_str(&border);
    out.push('\n');
    out.push_str(&format_line(
        &headers.iter().map(|h| h.to_string()).collect::<Vec<_>>(),
        &widths,
    ));
    out.push('\n');
    out.push_str(&border);
    out.push('\n');

    for row in rows {
        let mut cells: Vec<Vec<&str>> = Vec::with_capacity(columns);
        for idx in 0..columns {
            let cell = row.get(idx).map(String::as_str).unwrap_or("");
            let lines: Vec<&str> = if cell.is_empty() {
                vec![""]
            } else {
                cell.lines().collect()
            };
            cells.push(lines);
        }

        let height = cells.iter().map(Vec::len).max().unwrap_or(1);
        for line_idx in 0..height {
            let line_cells: Vec<String> = cells
                .iter()
                .map(|lines| lines.get(line_idx).copied().unwrap_or("").to_string())
                .collect();
            out.push_str(&format_line(&line_cells, &widths));
            out.push('\n');
        }
        out.push_str(&border);
        out.push('\n');
    }

    out
}

/// Number a list of names into a two-column grid, mirroring the serial-number
/// listing the species-names view shows.
pub fn render_numbered_list(header: &str, names: &[String]) -> String {
    let rows: Vec<Vec<String>> = names
        .iter()
        .enumerate()
        .map(|(idx, name)| vec![(idx + 1).to_string(), name.clone()])
        .collect();
    render_table(&["Sl. No.", header], &rows)
}

fn border_line(widths: &[usize]) -> String {
    let mut line = String::from("+");
    for width in widths {
        line.push_str(&"-".repeat(width + 2));
        line.push('+');
    }
    line
}

fn format_line(cells: &[String], widths: &[usize]) -> String {
    let mut line = String::from("|");
    for (cell, width) in cells.iter().zip(widths) {
        let padding = width.saturating_sub(cell.chars().count());
        line.push(' ');
        line.push_str(cell);
        line.push_str(&" ".repeat(padding + 1));
        line.push('|');
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_a_padded_grid() {
        let table = render_table(
            &["Id", "Name"],
            &[
                vec!["1".to_string(), "Sparrow".to_string()],
                vec!["2".to_string(), "Owl".to_string()],
            ],
        );
        let expected = "\
+----+---------+
| Id | Name    |
+----+---------+
| 1  | Sparrow |
+----+---------+
| 2  | Owl     |
+----+---------+
";
        assert_eq!(table, expected);
    }

    #[test]
    fn multi_line_cells_span_extra_lines() {
        let table = render_table(
            &["Notes"],
            &[vec!["first note\n---\nsecond note".to_string()]],
        );
        let expected = "\
+-------------+
| Notes       |
+-------------+
| first note  |
| ---         |
| second note |
+-------------+
";
        assert_eq!(table, expected);
    }

    #[test]
    fn empty_rows_render_header_only() {
        let table = render_table(&["Name"], &[]);
        let expected = "\
+------+
| Name |
+------+
";
        assert_eq!(table, expected);
    }

    #[test]
    fn short_rows_are_padded_with_blank_cells() {
        let table = render_table(
            &["A", "B"],
            &[vec!["x".to_string()]],
        );
        assert!(table.contains("| x |   |"));
    }

    #[test]
    fn numbered_list_counts_from_one() {
        let listing = render_numbered_list(
            "Species Name",
            &["Sparrow".to_string(), "Barn Owl".to_string()],
        );
        assert!(listing.contains("| 1       | Sparrow"));
        assert!(listing.contains("| 2       | Barn Owl"));
    }
}
