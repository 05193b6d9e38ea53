//! Paragraph segmentation.

/// Closing tag that delimits paragraph-level blocks.
pub const PARAGRAPH_CLOSE: &str = "</p>";

/// Split chapter HTML into trimmed paragraph segments.
///
/// Every piece followed by `</p>` gets the marker back so it is a complete
/// paragraph again. Text after the last marker (or the whole input when
/// there is none) is kept as-is without a marker. Pieces that are blank
/// after trimming are dropped.
pub fn segments(html: &str) -> Vec<String> {
    let pieces: Vec<&str> = html.split(PARAGRAPH_CLOSE).collect();
    let last = pieces.len() - 1;

    pieces
        .into_iter()
        .enumerate()
        .filter(|(_, piece)| !piece.trim().is_empty())
        .map(|(i, piece)| {
            if i < last {
                format!("{}{}", piece, PARAGRAPH_CLOSE).trim().to_string()
            } else {
                piece.trim().to_string()
            }
        })
        .collect()
}
