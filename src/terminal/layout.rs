//! Pure layout helpers: fallback variants, fitting and centering.

use unicode_width::UnicodeWidthStr;

/// Display pieces in plain and (where renderable) big-text form.
#[derive(Debug, Default, Clone, Copy)]
pub struct Variant<'a> {
    pub title: &'a str,
    pub text: &'a str,
    pub end: &'a str,
    pub art_title: Option<&'a str>,
    pub art_text: Option<&'a str>,
    pub art_end: Option<&'a str>,
}

fn stack(parts: &[&str], gap: &str) -> String {
    parts.join(gap).trim_matches('\n').to_string()
}

/// Candidate screen contents in descending order of preference.
///
/// Big-text candidates are only produced for the pieces that could be rendered.
/// The list always ends with the plain forms and finally a lone `E`.
pub fn variants(v: &Variant<'_>) -> Vec<String> {
    let mut out = Vec::new();

    if let Some(art_text) = v.art_text {
        if let (Some(art_title), Some(art_end)) = (v.art_title, v.art_end) {
            out.push(stack(&[art_title, art_text, art_end], "\n\n\n\n"));
            out.push(stack(&[art_title, art_text, art_end], "\n\n"));
        }
        if let Some(art_title) = v.art_title {
            out.push(stack(&[art_title, art_text, v.end], "\n\n"));
        }
        out.push(stack(&[v.title, art_text, v.end], "\n\n"));
    }

    out.push(stack(&[v.title, v.text, v.end], "\n\n"));
    out.push(stack(&[v.title, v.text], "\n\n"));
    out.push(v.text.to_string());
    out.push("E".to_string());
    out
}

/// Columns and rows `text` occupies.
pub fn text_size(text: &str) -> (usize, usize) {
    let lines: Vec<&str> = text.trim_end_matches('\n').split('\n').collect();
    let cols = lines.iter().map(|l| l.width()).max().unwrap_or(0);
    (cols, lines.len())
}

/// Whether `text` can be drawn on a `cols` x `rows` screen.
pub fn fits(text: &str, cols: usize, rows: usize) -> bool {
    let (width, height) = text_size(text);
    width <= cols && height <= rows
}

/// Center `text` on a `cols` x `rows` screen.
///
/// Returns exactly `rows` lines, each padded with spaces to `cols` columns. Lines
/// wider than the screen are left as they are; callers check [`fits`] first.
pub fn pad_to_size(text: &str, cols: usize, rows: usize) -> Vec<String> {
    let lines: Vec<&str> = text.trim_end_matches('\n').split('\n').collect();
    let top = rows.saturating_sub(lines.len()) / 2;
    let blank = " ".repeat(cols);

    let mut out = Vec::with_capacity(rows.max(lines.len()));
    out.extend(std::iter::repeat(blank.clone()).take(top));
    for line in &lines {
        let width = line.width();
        let left = cols.saturating_sub(width) / 2;
        let right = cols.saturating_sub(left + width);
        out.push(format!("{}{}{}", " ".repeat(left), line, " ".repeat(right)));
    }
    while out.len() < rows {
        out.push(blank.clone());
    }
    out
}
