/// Strips byte-order marks and zero-width spaces that spreadsheet exports leave in
/// header cells.
pub(crate) fn clean_header(value: &str) -> String {
    value.replace(['\u{feff}', '\u{200b}'], "").trim().to_string()
}

/// Collapses runs of whitespace into single spaces, trimming both ends.
pub fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_header_removes_bom_and_padding() {
        assert_eq!(clean_header("\u{feff}name "), "name");
        assert_eq!(clean_header("area\u{200b}_name"), "area_name");
    }

    #[test]
    fn collapse_whitespace_joins_words_with_single_spaces() {
        assert_eq!(collapse_whitespace("  Data \t  Analyst\n"), "Data Analyst");
        assert_eq!(collapse_whitespace("   "), "");
    }
}
