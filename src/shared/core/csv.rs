// Comma separated text as exchanged with spreadsheets.
//
// Export shape
// - Two preamble lines (title, generation time), a blank line, a bare header row,
//   then one row per record with every cell double quoted.
//
// Import shape
// - Same delimiter convention; cells may or may not be quoted, `""` escapes a quote.

pub fn quote(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}

pub fn render_report(title: &str, generated: &str, headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut out = format!("{title}\nGenerated: {generated}\n\n");
    out.push_str(&headers.join(","));
    out.push('\n');
    let body: Vec<String> = rows
        .iter()
        .map(|row| row.iter().map(|cell| quote(cell)).collect::<Vec<_>>().join(","))
        .collect();
    out.push_str(&body.join("\n"));
    out
}

/// Split one line into trimmed cells.
pub fn split_line(line: &str) -> Vec<String> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                cells.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    cells.push(current.trim().to_string());
    cells
}
