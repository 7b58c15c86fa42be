/// Normalizes annotation text by stripping surrounding whitespace and
/// decomposing it into Unicode Normalization Form D, so that visually
/// identical species names compare equal.
///
/// ```
/// use fieldmark::normalization::normalize_text;
/// assert_eq!(normalize_text(" h\u{ef} "), "hi\u{308}");
/// ```
pub fn normalize_text(text: impl AsRef<str>) -> String {
    use unicode_normalization::UnicodeNormalization;

    text.as_ref().trim().nfd().to_string()
}
