//! Unit tests for terminal layout (variants, fitting, centering) and the block font.
//!
//! These tests cover the pure drawing logic without requiring a real terminal.

use termdown::terminal::{fits, pad_to_size, render_big, text_size, variants, Variant, GLYPH_HEIGHT};
use unicode_width::UnicodeWidthStr;

// ==================== Variant Selection Tests ====================

fn first_fitting(variant: &Variant<'_>, cols: usize, rows: usize) -> Option<String> {
    variants(variant).into_iter().find(|v| fits(v, cols, rows))
}

#[test]
fn test_big_countdown_fits_standard_terminal() {
    let art = render_big("4m 59s").unwrap();
    let v = Variant {
        text: "4m 59s",
        art_text: Some(&art),
        art_end: Some(""),
        ..Default::default()
    };
    let chosen = first_fitting(&v, 80, 24).unwrap();
    assert_eq!(chosen, art);
}

#[test]
fn test_wide_spacing_preferred_when_room() {
    let title = render_big("TEA").unwrap();
    let text = render_big("42").unwrap();
    let end = render_big("12:00").unwrap();
    let v = Variant {
        title: "TEA",
        text: "42",
        end: "12:00",
        art_title: Some(&title),
        art_text: Some(&text),
        art_end: Some(&end),
    };
    let chosen = first_fitting(&v, 80, 24).unwrap();
    // three art blocks and two gaps of three blank lines
    assert_eq!(text_size(&chosen).1, 3 * GLYPH_HEIGHT + 2 * 3);
}

#[test]
fn test_falls_back_to_narrow_spacing() {
    let title = render_big("TEA").unwrap();
    let text = render_big("42").unwrap();
    let end = render_big("12:00").unwrap();
    let v = Variant {
        title: "TEA",
        text: "42",
        end: "12:00",
        art_title: Some(&title),
        art_text: Some(&text),
        art_end: Some(&end),
    };
    let chosen = first_fitting(&v, 80, 20).unwrap();
    assert_eq!(text_size(&chosen).1, 3 * GLYPH_HEIGHT + 2);
}

#[test]
fn test_falls_back_to_plain_text_on_narrow_terminal() {
    let art = render_big("1h 2m 3s").unwrap();
    let v = Variant {
        title: "Meeting",
        text: "1h 2m 3s",
        art_text: Some(&art),
        art_end: Some(""),
        ..Default::default()
    };
    let chosen = first_fitting(&v, 20, 5).unwrap();
    assert_eq!(chosen, "Meeting\n\n1h 2m 3s");
}

#[test]
fn test_last_resort_is_single_letter() {
    let v = Variant {
        text: "a very long text",
        ..Default::default()
    };
    assert_eq!(first_fitting(&v, 3, 1).as_deref(), Some("E"));
    assert_eq!(first_fitting(&v, 0, 0), None);
}

// ==================== Padding Tests ====================

#[test]
fn test_pad_to_size_fills_screen() {
    let art = render_big("10:00").unwrap();
    let lines = pad_to_size(&art, 80, 24);
    assert_eq!(lines.len(), 24);
    assert!(lines.iter().all(|l| l.width() == 80));
}

#[test]
fn test_pad_to_size_vertical_centering() {
    let lines = pad_to_size("x\ny", 5, 6);
    assert_eq!(lines[2].trim(), "x");
    assert_eq!(lines[3].trim(), "y");
}

// ==================== Font Tests ====================

#[test]
fn test_render_big_rows_equal_width() {
    let art = render_big("Tea: 5 min!").unwrap();
    let widths: Vec<usize> = art.lines().map(|l| l.width()).collect();
    assert_eq!(widths.len(), GLYPH_HEIGHT);
    assert!(widths.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn test_render_big_only_block_characters() {
    let art = render_big("88").unwrap();
    assert!(art.chars().all(|c| c == '█' || c == ' ' || c == '\n'));
}
