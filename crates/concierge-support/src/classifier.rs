//! Category classification prompt and output matching

/// Category assigned when classification cannot decide
pub(crate) const DEFAULT_CATEGORY: &str = "general";

/// Classification input is capped so a pasted log does not blow the
/// prompt budget
const CLASSIFY_INPUT_CHARS: usize = 500;

/// Build the single-message classification prompt
pub(crate) fn build_prompt(categories: &[String], text: &str) -> String {
    let excerpt: String = text.chars().take(CLASSIFY_INPUT_CHARS).collect();
    format!(
        "Classify the following support request into exactly one of these categories: {}. \
         Reply with only the category name.\n\nRequest: {excerpt}",
        categories.join(", ")
    )
}

/// Pick the category named in the model output
///
/// Matching is deliberately permissive: the first configured category
/// that appears anywhere in the lowercased output wins, so a verbose
/// model ("This looks like a billing issue") still classifies. Nothing
/// matching falls back to [`DEFAULT_CATEGORY`].
pub(crate) fn pick_category(categories: &[String], output: &str) -> String {
    let output = output.to_lowercase();
    categories
        .iter()
        .find(|category| output.contains(&category.to_lowercase()))
        .cloned()
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_owned())
}
