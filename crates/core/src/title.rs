//! Title generation from free-text prompts
//!
//! Used for mock/fallback content titles when a model response carries no
//! usable title of its own.

/// Derive a short title from a prompt.
///
/// Takes the first 6 whitespace-separated words longer than 3 characters,
/// joins them with spaces, and upper-cases the first letter. Empty input
/// yields an empty title.
pub fn generate_title(prompt: &str) -> String {
    let words: Vec<&str> = prompt
        .split_whitespace()
        .filter(|word| word.len() > 3)
        .take(6)
        .collect();

    capitalize_first(&words.join(" "))
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
