//! Element resolution: pick the candidate that best matches a target
//! description, provided it is confident enough.
use crate::matching::matcher::SemanticMatcher;
use crate::perception::types::UIElement;

/// A match must score strictly above this to be accepted.
pub const ACCEPTANCE_THRESHOLD: f32 = 0.7;

#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub description: String,
    pub element: UIElement,
    pub score: f32,
}

/// Scores every candidate, keeps the first maximum, and accepts it only if
/// it clears [`ACCEPTANCE_THRESHOLD`]. An empty candidate list is simply no
/// match.
pub async fn resolve_element(
    matcher: &dyn SemanticMatcher,
    description: &str,
    candidates: &[UIElement],
) -> Option<MatchResult> {
    let mut best: Option<(usize, f32)> = None;

    for (i, candidate) in candidates.iter().enumerate() {
        let s = matcher.score(description, candidate).await;
        if s.is_nan() {
            continue;
        }
        // strict `>` keeps the earliest of equal scores
        if best.map_or(true, |(_, b)| s > b) {
            best = Some((i, s));
        }
    }

    let (index, score) = best?;
    if score > ACCEPTANCE_THRESHOLD {
        tracing::debug!(description, index, score, "target resolved");
        Some(MatchResult {
            description: description.to_string(),
            element: candidates[index].clone(),
            score,
        })
    } else {
        tracing::info!(
            description,
            best_score = score,
            candidates = candidates.len(),
            "no confident match"
        );
        None
    }
}
