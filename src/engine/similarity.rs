use crate::model::{api::similarity::SimilarityEntry, common::MemberStatus, mongodb::Id};

use super::{compare::match_counts, ResponseMap};

/// Members sharing fewer answered questions than this with the caller are not ranked.
pub const DEFAULT_MIN_COMMON_QUESTIONS: usize = 5;

/// Another member of the group, with their answers.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub user_id: Id,
    pub display_name: String,
    pub status: MemberStatus,
    pub responses: ResponseMap,
}

/// Rank every other member by how closely their answers match `mine`.
///
/// The caller themselves and members whose account is not normal are left
/// out, as is anyone sharing fewer than `min_common_questions` answered
/// questions. The result is sorted by descending match percentage; members
/// with equal percentages keep the order they were given in. Nothing is
/// truncated.
pub fn rank(
    me: Id,
    mine: &ResponseMap,
    candidates: impl IntoIterator<Item = Candidate>,
    min_common_questions: usize,
) -> Vec<SimilarityEntry> {
    if mine.is_empty() {
        return Vec::new();
    }

    let mut ranked = candidates
        .into_iter()
        .filter(|candidate| candidate.user_id != me && candidate.status.is_normal())
        .filter_map(|candidate| {
            let counts = match_counts(mine, &candidate.responses);
            (counts.common_questions >= min_common_questions).then(|| SimilarityEntry {
                user_id: candidate.user_id.into(),
                display_name: candidate.display_name,
                common_questions: counts.common_questions,
                matched_answers: counts.matched_answers,
                match_percentage: counts.match_percentage(),
            })
        })
        .collect::<Vec<_>>();

    // `sort_by` is stable.
    ranked.sort_by(|a, b| b.match_percentage.total_cmp(&a.match_percentage));
    debug!("Ranked {} members", ranked.len());
    ranked
}

#[cfg(test)]
mod tests {
    use crate::model::common::Choice::{self, A, B};

    use super::*;

    fn question_ids(n: usize) -> Vec<Id> {
        (0..n).map(|_| Id::new()).collect()
    }

    fn answers(questions: &[Id], choices: &[Choice]) -> ResponseMap {
        questions.iter().copied().zip(choices.iter().copied()).collect()
    }

    fn candidate(name: &str, responses: ResponseMap) -> Candidate {
        Candidate {
            user_id: Id::new(),
            display_name: name.to_string(),
            status: MemberStatus::Normal,
            responses,
        }
    }

    fn names(ranked: &[SimilarityEntry]) -> Vec<&str> {
        ranked.iter().map(|e| e.display_name.as_str()).collect()
    }

    #[test]
    fn ranks_by_descending_match() {
        log4rs_test_utils::test_logging::init_logging_once_for(["balance_backend"], None, None);

        let qs = question_ids(5);
        let me = Id::new();
        let mine = answers(&qs, &[A, A, A, A, A]);
        let candidates = vec![
            candidate("two", answers(&qs, &[A, A, B, B, B])),
            candidate("five", answers(&qs, &[A, A, A, A, A])),
            candidate("none", answers(&qs, &[B, B, B, B, B])),
            candidate("four", answers(&qs, &[A, A, A, A, B])),
        ];

        let ranked = rank(me, &mine, candidates, DEFAULT_MIN_COMMON_QUESTIONS);

        assert_eq!(names(&ranked), vec!["five", "four", "two", "none"]);
        assert_eq!(ranked[0].match_percentage, 100.0);
        assert_eq!(ranked[1].matched_answers, 4);
        assert_eq!(ranked[3].match_percentage, 0.0);
        assert!(ranked
            .windows(2)
            .all(|pair| pair[0].match_percentage >= pair[1].match_percentage));
    }

    #[test]
    fn too_few_common_questions_are_excluded() {
        let qs = question_ids(6);
        let me = Id::new();
        let mine = answers(&qs, &[A, B, A, B, A, B]);
        let candidates = vec![
            // A perfect match, but on a single question.
            candidate("one", answers(&qs[..1], &[A])),
            candidate("nothing", ResponseMap::new()),
            candidate("four", answers(&qs[..4], &[A, B, A, A])),
            candidate("five", answers(&qs[..5], &[B, B, A, B, A])),
        ];

        let ranked = rank(me, &mine, candidates, DEFAULT_MIN_COMMON_QUESTIONS);

        assert_eq!(names(&ranked), vec!["five"]);
        assert_eq!(ranked[0].common_questions, 5);
        assert!(ranked.iter().all(|e| e.common_questions >= 5));
    }

    #[test]
    fn minimum_is_configurable() {
        let qs = question_ids(2);
        let me = Id::new();
        let mine = answers(&qs, &[A, B]);
        let candidates = vec![candidate("one", answers(&qs[..1], &[A]))];

        let ranked = rank(me, &mine, candidates, 1);

        assert_eq!(names(&ranked), vec!["one"]);
        assert_eq!(ranked[0].match_percentage, 100.0);
    }

    #[test]
    fn ties_keep_input_order() {
        let qs = question_ids(5);
        let me = Id::new();
        let mine = answers(&qs, &[A, A, A, A, A]);
        let candidates = vec![
            candidate("first", answers(&qs, &[A, A, A, B, B])),
            candidate("better", answers(&qs, &[A, A, A, A, B])),
            candidate("second", answers(&qs, &[B, B, A, A, A])),
            candidate("third", answers(&qs, &[A, B, A, B, A])),
        ];

        let ranked = rank(me, &mine, candidates, DEFAULT_MIN_COMMON_QUESTIONS);

        assert_eq!(names(&ranked), vec!["better", "first", "second", "third"]);
    }

    #[test]
    fn caller_and_inactive_members_are_excluded() {
        let qs = question_ids(5);
        let me = Id::new();
        let mine = answers(&qs, &[A, A, A, A, A]);
        let mut myself = candidate("me", mine.clone());
        myself.user_id = me;
        let mut gone = candidate("gone", mine.clone());
        gone.status = MemberStatus::Withdrawn;
        let mut asleep = candidate("asleep", mine.clone());
        asleep.status = MemberStatus::Inactive;
        let other = candidate("other", mine.clone());

        let ranked = rank(
            me,
            &mine,
            vec![myself, gone, asleep, other],
            DEFAULT_MIN_COMMON_QUESTIONS,
        );

        assert_eq!(names(&ranked), vec!["other"]);
    }

    #[test]
    fn no_answers_means_no_ranking() {
        let qs = question_ids(5);
        let candidates = vec![candidate("other", answers(&qs, &[A, A, A, A, A]))];

        let ranked = rank(Id::new(), &ResponseMap::new(), candidates, 0);

        assert!(ranked.is_empty());
    }
}
