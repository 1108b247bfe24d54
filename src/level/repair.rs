/// Separator artifacts produced by the game's exporter, with their fixes.
/// Applied in order, each as a single non-overlapping pass.
const SEPARATOR_FIXES: [(&str, &str); 4] = [(",,", ","), (",]", "]"), (",}", "}"), ("]\"", "],\"")];

/// Rewrite exported level text into strict JSON.
///
/// Whitespace is removed everywhere, including inside string values; only
/// the timing fields are read afterwards so this is harmless.
pub fn repair_level_text(text: &str) -> String {
    let mut repaired: String = text
        .chars()
        .filter(|c| !matches!(c, '\n' | '\r' | ' ' | '\t'))
        .collect();

    for (from, to) in SEPARATOR_FIXES {
        repaired = repaired.replace(from, to);
    }

    repaired
}
