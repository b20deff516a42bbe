use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref URL_PATTERN: Regex =
        Regex::new(r"(?i)[a-z][a-z0-9+.-]*://\S+").expect("invalid URL pattern");
    // Everything that is not a word character, apostrophe, dollar sign, or
    // whitespace becomes a single space.
    static ref NON_TEXT_PATTERN: Regex =
        Regex::new(r"[^\w'$\s]").expect("invalid non-text pattern");
    static ref CONTRACTIONS: HashMap<&'static str, &'static str> = [
        ("ain't", "am not"),
        ("aren't", "are not"),
        ("can't", "cannot"),
        ("couldn't", "could not"),
        ("didn't", "did not"),
        ("doesn't", "does not"),
        ("don't", "do not"),
        ("hadn't", "had not"),
        ("hasn't", "has not"),
        ("haven't", "have not"),
        ("he'd", "he would"),
        ("he'll", "he will"),
        ("he's", "he is"),
        ("here's", "here is"),
        ("how's", "how is"),
        ("i'd", "i would"),
        ("i'll", "i will"),
        ("i'm", "i am"),
        ("i've", "i have"),
        ("isn't", "is not"),
        ("it'd", "it would"),
        ("it'll", "it will"),
        ("it's", "it is"),
        ("let's", "let us"),
        ("mightn't", "might not"),
        ("mustn't", "must not"),
        ("shan't", "shall not"),
        ("she'd", "she would"),
        ("she'll", "she will"),
        ("she's", "she is"),
        ("shouldn't", "should not"),
        ("that's", "that is"),
        ("there's", "there is"),
        ("they'd", "they would"),
        ("they'll", "they will"),
        ("they're", "they are"),
        ("they've", "they have"),
        ("wasn't", "was not"),
        ("we'd", "we would"),
        ("we'll", "we will"),
        ("we're", "we are"),
        ("we've", "we have"),
        ("weren't", "were not"),
        ("what's", "what is"),
        ("where's", "where is"),
        ("who's", "who is"),
        ("won't", "will not"),
        ("wouldn't", "would not"),
        ("you'd", "you would"),
        ("you'll", "you will"),
        ("you're", "you are"),
        ("you've", "you have"),
    ]
    .iter()
    .copied()
    .collect();
}

/// Denoises and lowercases raw text.
///
/// Steps, in fixed order: remove URL-like substrings, replace characters
/// outside `[\w'$\s]` with a space, expand contractions, lowercase.
///
/// Idempotent: re-applying to already-normalized text returns the same
/// string. Expansions contain no apostrophes and URL removal leaves no
/// `://`, so no step can re-trigger on its own output.
pub fn normalize(text: &str) -> String {
    let text = URL_PATTERN.replace_all(text, "");
    let text = NON_TEXT_PATTERN.replace_all(&text, " ");
    let text = expand_contractions(&text);
    text.to_lowercase()
}

/// Expands contracted word forms ("don't" -> "do not") token by token.
///
/// Tokens not in the table fall back to common suffix rules; possessive
/// `'s` is ambiguous and left alone.
fn expand_contractions(text: &str) -> String {
    text.split_whitespace()
        .map(expand_token)
        .collect::<Vec<_>>()
        .join(" ")
}

fn expand_token(token: &str) -> String {
    let lowered = token.to_lowercase();
    if let Some(expansion) = CONTRACTIONS.get(lowered.as_str()) {
        return (*expansion).to_string();
    }
    for (suffix, replacement) in [
        ("n't", " not"),
        ("'re", " are"),
        ("'ve", " have"),
        ("'ll", " will"),
        ("'m", " am"),
    ] {
        if let Some(stem) = lowered.strip_suffix(suffix) {
            if !stem.is_empty() {
                return format!("{}{}", stem, replacement);
            }
        }
    }
    token.to_string()
}
