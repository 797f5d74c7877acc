// Emerging-theme discovery — topic modeling over comments no pillar claimed.
//
// Discovery is best-effort by contract: a clustering fault is contained here
// and mapped to fallback labels instead of propagating. The pipeline never
// sees an error from this module — every unmatched comment comes back with
// some label.

pub mod cluster;
pub mod keywords;
pub mod traits;

use rand::seq::IndexedRandom;
use tracing::{info, warn};

use crate::comments::Comment;
use crate::pipeline::FinalAssignment;
use traits::CommentClusterer;

/// Label for comments that matched nothing and could not be clustered into
/// a nameable topic.
pub const UNKNOWN_THEME: &str = "UNKNOWN THEME";

/// How discovered topics get their human-readable names.
#[derive(Debug, Clone)]
pub enum LabelPolicy {
    /// Name each topic after its highest-weighted TF-IDF keyword
    Keyword,
    /// Map topic ids positionally into a pre-authored candidate list,
    /// falling back to a random pick when the id runs past the list
    Curated(Vec<String>),
}

/// Assign a theme label to every unmatched comment.
///
/// The i-th result corresponds to the i-th input comment; `embeddings` must
/// be the vectors already computed for these comments during matching.
/// Subsets below `min_cluster_size` skip clustering entirely and take the
/// fixed fallback label.
pub fn discover(
    comments: Vec<Comment>,
    embeddings: &[Vec<f64>],
    clusterer: &dyn CommentClusterer,
    policy: &LabelPolicy,
    min_cluster_size: usize,
) -> Vec<FinalAssignment> {
    if comments.is_empty() {
        return Vec::new();
    }

    if comments.len() < min_cluster_size {
        info!(
            count = comments.len(),
            min_cluster_size, "Too few unmatched comments to cluster, assigning fallback label"
        );
        return comments
            .into_iter()
            .map(|comment| FinalAssignment {
                comment,
                themes: vec![UNKNOWN_THEME.to_string()],
            })
            .collect();
    }

    let topic_ids = match clusterer.cluster(embeddings) {
        Ok(ids) if ids.len() == comments.len() => ids,
        Ok(ids) => {
            warn!(
                expected = comments.len(),
                got = ids.len(),
                "Clusterer returned wrong cardinality, assigning fallback labels"
            );
            return fallback_all(comments, policy);
        }
        Err(e) => {
            warn!(error = %e, "Topic clustering failed, assigning fallback labels");
            return fallback_all(comments, policy);
        }
    };

    let topic_count = topic_ids.iter().max().map_or(0, |&max| max + 1);

    // One label per topic, derived from that topic's member comments
    let labels: Vec<String> = (0..topic_count)
        .map(|topic| {
            let members: Vec<String> = comments
                .iter()
                .zip(&topic_ids)
                .filter(|(_, &id)| id == topic)
                .map(|(c, _)| c.text.clone())
                .collect();
            label_for_topic(topic, &members, policy)
        })
        .collect();

    info!(
        comments = comments.len(),
        topics = topic_count,
        "Discovered emerging themes"
    );

    comments
        .into_iter()
        .zip(topic_ids)
        .map(|(comment, topic)| FinalAssignment {
            comment,
            themes: vec![labels[topic].clone()],
        })
        .collect()
}

/// Derive a display label for one topic under the active policy.
fn label_for_topic(topic_id: usize, member_texts: &[String], policy: &LabelPolicy) -> String {
    match policy {
        LabelPolicy::Keyword => match keywords::top_keyword(member_texts) {
            Some(keyword) => format!("NEW EVP: {}", keyword.to_uppercase()),
            None => UNKNOWN_THEME.to_string(),
        },
        LabelPolicy::Curated(candidates) => candidates
            .get(topic_id)
            .cloned()
            .unwrap_or_else(|| random_candidate(candidates)),
    }
}

/// Fallback when clustering itself failed: every member gets the policy's
/// failure label.
fn fallback_all(comments: Vec<Comment>, policy: &LabelPolicy) -> Vec<FinalAssignment> {
    comments
        .into_iter()
        .map(|comment| {
            let theme = match policy {
                LabelPolicy::Keyword => UNKNOWN_THEME.to_string(),
                LabelPolicy::Curated(candidates) => random_candidate(candidates),
            };
            FinalAssignment {
                comment,
                themes: vec![theme],
            }
        })
        .collect()
}

fn random_candidate(candidates: &[String]) -> String {
    candidates
        .choose(&mut rand::rng())
        .cloned()
        .unwrap_or_else(|| UNKNOWN_THEME.to_string())
}
