use rand::{
    thread_rng, Rng,
    distributions,
};
use unicode_normalization::UnicodeNormalization;


const FALLBACK_FILE_NAME: &str = "video";


pub fn generate_rand_id(length: usize) -> String {
    thread_rng()
        .sample_iter(&distributions::Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Reduces a client supplied file name to a flat, ASCII-only name that is
/// safe to place inside a directory.
///
/// The name is NFKD-folded first so accented letters keep their base form.
/// Path separators are treated as whitespace, whitespace runs become a single
/// `_`, characters outside `[A-Za-z0-9_.-]` are dropped and leading or
/// trailing `.`/`_` are trimmed. Never returns an empty string.
pub fn sanitize_filename(raw: &str) -> String {
    let folded: String = raw.nfkd().collect();
    let spaced = folded.replace(|c: char| c == '/' || c == '\\', " ");

    let joined = spaced.split_whitespace()
        .collect::<Vec<_>>()
        .join("_");

    let filtered: String = joined.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();

    let trimmed = filtered.trim_matches(|c: char| c == '.' || c == '_');

    if trimmed.is_empty() {
        FALLBACK_FILE_NAME.into()
    }
    else {
        trimmed.into()
    }
}
