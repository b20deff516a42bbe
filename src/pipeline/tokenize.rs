use std::collections::HashSet;

use rust_stemmers::{Algorithm, Stemmer};

// Built-in English stop words. Immutable; callers that want to keep some of
// these pass them as exceptions instead of editing the list.
static STOP_WORD_LIST: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst", "an",
    "and", "another", "any", "anyhow", "anyone", "anything", "anyway", "anywhere", "are", "around",
    "as", "at", "be", "became", "because", "become", "becomes", "becoming", "been", "before",
    "beforehand", "behind", "being", "below", "beside", "besides", "between", "beyond", "both",
    "bottom", "but", "by", "call", "can", "cannot", "could", "did", "do", "does", "doing", "done",
    "down", "due", "during", "each", "either", "else", "elsewhere", "empty", "enough", "even",
    "ever", "every", "everyone", "everything", "everywhere", "except", "few", "first", "for",
    "former", "formerly", "from", "front", "full", "further", "had", "has", "have", "he", "hence",
    "her", "here", "hereafter", "hereby", "herein", "hereupon", "hers", "herself", "him",
    "himself", "his", "how", "however", "i", "if", "in", "indeed", "into", "is", "it", "its",
    "itself", "just", "last", "latter", "latterly", "least", "less", "made", "make", "many", "may",
    "me", "meanwhile", "might", "mine", "more", "moreover", "most", "mostly", "move", "much",
    "must", "my", "myself", "namely", "neither", "never", "nevertheless", "next", "no", "nobody",
    "none", "nor", "not", "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one",
    "only", "onto", "or", "other", "others", "otherwise", "our", "ours", "ourselves", "out",
    "over", "own", "part", "per", "perhaps", "please", "put", "quite", "rather", "re", "really",
    "regarding", "same", "say", "see", "seem", "seemed", "seeming", "seems", "serious", "several",
    "she", "should", "show", "side", "since", "so", "some", "somehow", "someone", "something",
    "sometime", "sometimes", "somewhere", "still", "such", "take", "than", "that", "the", "their",
    "theirs", "them", "themselves", "then", "thence", "there", "thereafter", "thereby",
    "therefore", "therein", "thereupon", "these", "they", "this", "those", "though", "through",
    "throughout", "thru", "thus", "to", "together", "too", "top", "toward", "towards", "under",
    "unless", "until", "up", "upon", "us", "used", "using", "various", "very", "via", "was", "we",
    "well", "were", "what", "whatever", "when", "whence", "whenever", "where", "whereafter",
    "whereas", "whereby", "wherein", "whereupon", "wherever", "whether", "which", "while",
    "whither", "who", "whoever", "whole", "whom", "whose", "why", "will", "with", "within",
    "without", "would", "yet", "you", "your", "yours", "yourself", "yourselves",
];

/// The built-in English stop-word list as an owned set.
pub fn default_stop_words() -> HashSet<String> {
    STOP_WORD_LIST.iter().map(|s| s.to_string()).collect()
}

/// Converts normalized text into a space-joined string of lemmatized tokens.
///
/// The effective stop-word set is `stop_words - exceptions`, computed per
/// call; nothing shared is ever mutated. Tokens that are stop words, or
/// whose lemma is a single character or shorter, are dropped. Original token
/// order is preserved.
///
/// Expects lowercased input (the normalizer's output); the stemmer assumes
/// it.
pub fn tokenize(text: &str, stop_words: &HashSet<String>, exceptions: &HashSet<String>) -> String {
    let stemmer = Stemmer::create(Algorithm::English);
    let mut lemmas: Vec<String> = Vec::new();
    for token in text.split_whitespace() {
        if stop_words.contains(token) && !exceptions.contains(token) {
            continue;
        }
        let lemma = stemmer.stem(token);
        if lemma.chars().count() <= 1 {
            continue;
        }
        lemmas.push(lemma.into_owned());
    }
    lemmas.join(" ")
}
