//! Sequential equipment id allocation

/// Next id for a registry holding `ids`: 1 when empty, otherwise max + 1.
pub fn next_id<I>(ids: I) -> i64
where
    I: IntoIterator<Item = i64>,
{
    ids.into_iter().max().map_or(1, |max| max.max(0) + 1)
}

/// Candidate to try after `previous` was already reserved by another submission.
pub fn next_candidate<I>(ids: I, previous: i64) -> i64
where
    I: IntoIterator<Item = i64>,
{
    next_id(ids).max(previous + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_registry() {
        assert_eq!(next_id(Vec::new()), 1);
    }

    #[test]
    fn test_max_plus_one() {
        assert_eq!(next_id([1, 2, 5]), 6);
        assert_eq!(next_id([5, 1, 2]), 6);
        assert_eq!(next_id([41]), 42);
        for n in 1..50 {
            assert_eq!(next_id(1..=n), n + 1);
        }
    }

    #[test]
    fn test_next_candidate_skips_lost_reservation() {
        // the reserved-but-unwritten id is not visible in the records
        assert_eq!(next_candidate([1, 2, 5], 6), 7);
        assert_eq!(next_candidate([1, 2, 5, 9], 6), 10);
        assert_eq!(next_candidate(Vec::new(), 1), 2);
    }
}
