//! Round-robin pairing: every participant meets every other participant exactly once.

use crate::models::TournamentError;

/// Number of pairs a round robin over `n` participants produces.
pub fn round_robin_len(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// Generate all unordered pairs `(p[i], p[j])` with `i < j`.
///
/// Pairs come out ordered by `(i, j)`: ascending `i`, then ascending `j`. Match numbering
/// downstream depends on this order, so it must not change.
///
/// Fails with [`TournamentError::InvalidInput`] for fewer than two participants, or when the
/// same participant appears twice (which would produce a self-pair).
pub fn round_robin_pairs<T>(participants: &[T]) -> Result<Vec<(T, T)>, TournamentError>
where
    T: Clone + PartialEq + std::fmt::Debug,
{
    if participants.len() < 2 {
        return Err(TournamentError::InvalidInput(format!(
            "at least 2 participants are required (got {})",
            participants.len()
        )));
    }

    let mut pairs = Vec::with_capacity(round_robin_len(participants.len()));
    for (i, first) in participants.iter().enumerate() {
        for second in &participants[i + 1..] {
            if first == second {
                return Err(TournamentError::InvalidInput(format!(
                    "participant {first:?} appears more than once"
                )));
            }
            pairs.push((first.clone(), second.clone()));
        }
    }
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn len_matches_formula() {
        assert_eq!(round_robin_len(0), 0);
        assert_eq!(round_robin_len(1), 0);
        assert_eq!(round_robin_len(2), 1);
        assert_eq!(round_robin_len(7), 21);
    }

    #[test]
    fn duplicate_participant_is_rejected() {
        assert!(matches!(
            round_robin_pairs(&[1, 2, 1]),
            Err(TournamentError::InvalidInput(_))
        ));
    }
}
