// Per-topic keyword extraction — names emerging themes.
//
// Uses the `keyword_extraction` crate over a topic's member comments, each
// comment a separate document for IDF purposes: words every member shares
// get downweighted, words distinctive to the topic get boosted.

use keyword_extraction::tf_idf::{TfIdf, TfIdfParams};
use stop_words::{get, LANGUAGE};

/// Extract the highest-weighted keyword for a topic's member comments.
///
/// Returns None when extraction yields nothing usable — comments too short,
/// or nothing left after stop-word removal.
pub fn top_keyword(texts: &[String]) -> Option<String> {
    if texts.is_empty() {
        return None;
    }

    let stop_words: Vec<String> = get(LANGUAGE::English);

    let params = TfIdfParams::UnprocessedDocuments(texts, &stop_words, None);
    let tfidf = TfIdf::new(params);

    let ranked: Vec<(String, f32)> = tfidf.get_ranked_word_scores(1);

    ranked
        .into_iter()
        .map(|(word, _)| word)
        .find(|word| !word.trim().is_empty())
}
