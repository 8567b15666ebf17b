use crate::workflows::screening::domain::CandidateId;

/// Next sequential id after the highest `DS` suffix seen; ids outside the
/// scheme are ignored.
pub fn next_candidate_id<'a, I>(ids: I) -> CandidateId
where
    I: IntoIterator<Item = &'a CandidateId>,
{
    let highest = ids
        .into_iter()
        .filter_map(CandidateId::sequence)
        .max()
        .unwrap_or(0);
    CandidateId::from_sequence(highest.saturating_add(1))
}
