use unicode_width::UnicodeWidthStr;

pub const GLYPH_HEIGHT: usize = 5;

const FULL: char = '█';

fn glyph(c: char) -> Option<[&'static str; GLYPH_HEIGHT]> {
    let g = match c {
        '0' => ["###", "# #", "# #", "# #", "###"],
        '1' => ["  #", "  #", "  #", "  #", "  #"],
        '2' => ["###", "  #", "###", "#  ", "###"],
        '3' => ["###", "  #", "###", "  #", "###"],
        '4' => ["# #", "# #", "###", "  #", "  #"],
        '5' => ["###", "#  ", "###", "  #", "###"],
        '6' => ["###", "#  ", "###", "# #", "###"],
        '7' => ["###", "  #", "  #", "  #", "  #"],
        '8' => ["###", "# #", "###", "# #", "###"],
        '9' => ["###", "# #", "###", "  #", "###"],
        ':' => [" ", "#", " ", "#", " "],
        ' ' => [" ", " ", " ", " ", " "],
        _ => return None,
    };
    Some(g)
}

/// Render `text` in a five row block font, each cell doubled horizontally so
/// the digits keep their proportions in a terminal. Unknown characters are
/// dropped.
pub fn big_text(text: &str) -> Vec<String> {
    let glyphs: Vec<_> = text.chars().filter_map(glyph).collect();
    (0..GLYPH_HEIGHT)
        .map(|row| {
            glyphs
                .iter()
                .map(|g| {
                    g[row]
                        .chars()
                        .map(|c| if c == '#' { FULL } else { ' ' })
                        .flat_map(|c| [c, c])
                        .collect::<String>()
                })
                .collect::<Vec<_>>()
                .join("  ")
        })
        .collect()
}

/// Display width of the widest row
pub fn big_text_width(lines: &[String]) -> usize {
    lines.iter().map(|l| l.width()).max().unwrap_or(0)
}
