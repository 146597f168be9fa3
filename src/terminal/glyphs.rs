//! Built-in block font for big-text rendering.
//!
//! Every glyph is `GLYPH_HEIGHT` rows tall; rows of one glyph share a width.
//! Lookup is case-insensitive.

/// Number of terminal rows one line of big text occupies.
pub const GLYPH_HEIGHT: usize = 5;

const FILL: char = '█';

type Glyph = [&'static str; GLYPH_HEIGHT];

fn glyph(c: char) -> Option<Glyph> {
    let rows = match c.to_ascii_uppercase() {
        '0' => [" ### ", "#   #", "#   #", "#   #", " ### "],
        '1' => ["  #  ", " ##  ", "  #  ", "  #  ", " ### "],
        '2' => [" ### ", "#   #", "  ## ", " #   ", "#####"],
        '3' => ["#### ", "    #", " ### ", "    #", "#### "],
        '4' => ["#   #", "#   #", "#####", "    #", "    #"],
        '5' => ["#####", "#    ", "#### ", "    #", "#### "],
        '6' => [" ### ", "#    ", "#### ", "#   #", " ### "],
        '7' => ["#####", "    #", "   # ", "  #  ", "  #  "],
        '8' => [" ### ", "#   #", " ### ", "#   #", " ### "],
        '9' => [" ### ", "#   #", " ####", "    #", " ### "],
        'A' => [" ### ", "#   #", "#####", "#   #", "#   #"],
        'B' => ["#### ", "#   #", "#### ", "#   #", "#### "],
        'C' => [" ####", "#    ", "#    ", "#    ", " ####"],
        'D' => ["#### ", "#   #", "#   #", "#   #", "#### "],
        'E' => ["#####", "#    ", "#### ", "#    ", "#####"],
        'F' => ["#####", "#    ", "#### ", "#    ", "#    "],
        'G' => [" ####", "#    ", "#  ##", "#   #", " ### "],
        'H' => ["#   #", "#   #", "#####", "#   #", "#   #"],
        'I' => ["###", " # ", " # ", " # ", "###"],
        'J' => ["    #", "    #", "    #", "#   #", " ### "],
        'K' => ["#   #", "#  # ", "###  ", "#  # ", "#   #"],
        'L' => ["#    ", "#    ", "#    ", "#    ", "#####"],
        'M' => ["#   #", "## ##", "# # #", "#   #", "#   #"],
        'N' => ["#   #", "##  #", "# # #", "#  ##", "#   #"],
        'O' => [" ### ", "#   #", "#   #", "#   #", " ### "],
        'P' => ["#### ", "#   #", "#### ", "#    ", "#    "],
        'Q' => [" ### ", "#   #", "# # #", "#  # ", " ## #"],
        'R' => ["#### ", "#   #", "#### ", "#  # ", "#   #"],
        'S' => [" ####", "#    ", " ### ", "    #", "#### "],
        'T' => ["#####", "  #  ", "  #  ", "  #  ", "  #  "],
        'U' => ["#   #", "#   #", "#   #", "#   #", " ### "],
        'V' => ["#   #", "#   #", "#   #", " # # ", "  #  "],
        'W' => ["#   #", "#   #", "# # #", "## ##", "#   #"],
        'X' => ["#   #", " # # ", "  #  ", " # # ", "#   #"],
        'Y' => ["#   #", " # # ", "  #  ", "  #  ", "  #  "],
        'Z' => ["#####", "   # ", "  #  ", " #   ", "#####"],
        ':' => [" ", "#", " ", "#", " "],
        '-' => ["   ", "   ", "###", "   ", "   "],
        '.' => [" ", " ", " ", " ", "#"],
        ',' => ["  ", "  ", "  ", " #", "# "],
        '!' => ["#", "#", "#", " ", "#"],
        '?' => [" ### ", "#   #", "  ## ", "     ", "  #  "],
        '/' => ["    #", "   # ", "  #  ", " #   ", "#    "],
        '\\' => ["#    ", " #   ", "  #  ", "   # ", "    #"],
        '\'' => ["#", "#", " ", " ", " "],
        ' ' => ["   ", "   ", "   ", "   ", "   "],
        _ => return None,
    };
    Some(rows)
}

/// Render `text` in the block font.
///
/// Each input line becomes `GLYPH_HEIGHT` output rows of equal width; input
/// lines are separated by an empty row. Returns `None` if any character has no
/// glyph, and an empty string for empty input.
pub fn render_big(text: &str) -> Option<String> {
    let mut blocks = Vec::new();
    for line in text.lines() {
        let glyphs = line.chars().map(glyph).collect::<Option<Vec<_>>>()?;
        let rows: Vec<String> = (0..GLYPH_HEIGHT)
            .map(|row| {
                glyphs
                    .iter()
                    .map(|g| g[row].replace('#', &FILL.to_string()))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect();
        blocks.push(rows.join("\n"));
    }
    Some(blocks.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use unicode_width::UnicodeWidthStr;

    #[test]
    fn test_glyph_rows_share_width() {
        let supported = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ:-.,!?/\\' ";
        for c in supported.chars() {
            let rows = glyph(c).unwrap_or_else(|| panic!("missing glyph {:?}", c));
            let width = rows[0].len();
            assert!(rows.iter().all(|r| r.len() == width), "glyph {:?}", c);
        }
    }

    #[test]
    fn test_render_big_dimensions() {
        let art = render_big("12:30").unwrap();
        let rows: Vec<&str> = art.lines().collect();
        assert_eq!(rows.len(), GLYPH_HEIGHT);
        // four digits of 5 columns, one colon of 1, four separators
        assert!(rows.iter().all(|r| r.width() == 4 * 5 + 1 + 4));
    }

    #[test]
    fn test_render_big_case_insensitive() {
        assert_eq!(render_big("done"), render_big("DONE"));
    }

    #[test]
    fn test_render_big_unsupported_char() {
        assert_eq!(render_big("5€"), None);
    }

    #[test]
    fn test_render_big_multiline() {
        let art = render_big("A\nB").unwrap();
        assert_eq!(art.lines().count(), GLYPH_HEIGHT * 2 + 1);
    }

    #[test]
    fn test_render_big_empty() {
        assert_eq!(render_big("").as_deref(), Some(""));
    }
}
