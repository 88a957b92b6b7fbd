use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::model::{
    api::comparison::{ComparisonOrder, ComparisonResult, ComparisonSummary},
    db::Question,
    mongodb::Id,
};

use super::{percent::match_percentage, ResponseMap};

/// How many questions two members both answered, and on how many they agree.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MatchCounts {
    pub common_questions: usize,
    pub matched_answers: usize,
}

impl MatchCounts {
    pub fn match_percentage(&self) -> f64 {
        match_percentage(self.matched_answers, self.common_questions)
    }
}

/// Count the common and matching answers of two members.
pub fn match_counts(mine: &ResponseMap, theirs: &ResponseMap) -> MatchCounts {
    mine.iter()
        .filter_map(|(question_id, my_choice)| {
            theirs
                .get(question_id)
                .map(|their_choice| my_choice == their_choice)
        })
        .fold(MatchCounts::default(), |mut counts, is_match| {
            counts.common_questions += 1;
            if is_match {
                counts.matched_answers += 1;
            }
            counts
        })
}

/// Compare two members' answers question by question.
///
/// Only questions present in `questions` and not deleted take part; a common
/// answer to anything else is ignored entirely, so `common_questions` always
/// equals the number of comparisons. The caller must already have ruled out
/// comparing a member with themselves, see [`compare_members`].
pub fn compare(
    mine: &ResponseMap,
    theirs: &ResponseMap,
    questions: &HashMap<Id, Question>,
    order: ComparisonOrder,
) -> ComparisonSummary {
    let mut comparisons = mine
        .iter()
        .filter_map(|(question_id, &my_choice)| {
            let their_choice = *theirs.get(question_id)?;
            let question = questions.get(question_id).filter(|q| q.is_live())?;
            Some(ComparisonResult::new(question, my_choice, their_choice))
        })
        .collect::<Vec<_>>();

    if order == ComparisonOrder::MatchesFirst {
        // Stable, so each half keeps question order.
        comparisons.sort_by_key(|comparison| !comparison.is_match);
    }

    let common_questions = comparisons.len();
    let matched_answers = comparisons.iter().filter(|c| c.is_match).count();
    trace!("Compared {common_questions} common questions, {matched_answers} matched");

    ComparisonSummary {
        common_questions,
        matched_answers,
        match_percentage: match_percentage(matched_answers, common_questions),
        comparisons,
    }
}

/// [`compare`] two distinct members.
pub fn compare_members(
    me: Id,
    them: Id,
    mine: &ResponseMap,
    theirs: &ResponseMap,
    questions: &HashMap<Id, Question>,
    order: ComparisonOrder,
) -> Result<ComparisonSummary> {
    ensure_distinct(me, them)?;
    Ok(compare(mine, theirs, questions, order))
}

/// Fail unless `me` and `them` are different members.
pub fn ensure_distinct(me: Id, them: Id) -> Result<()> {
    if me == them {
        return Err(Error::validation("Cannot compare a member with themselves"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::model::common::Choice::{self, A, B};

    use super::*;

    struct Fixture {
        questions: Vec<Question>,
    }

    impl Fixture {
        fn new(n: usize) -> Self {
            let (group, author) = (Id::new(), Id::new());
            // IDs are generated in increasing order.
            let questions = (0..n)
                .map(|i| Question::example(group, author, &format!("Q{}", i + 1)))
                .collect();
            Self { questions }
        }

        fn answers(&self, choices: &[Option<Choice>]) -> ResponseMap {
            self.questions
                .iter()
                .zip(choices)
                .filter_map(|(q, choice)| choice.map(|c| (q.id, c)))
                .collect()
        }

        fn metadata(&self) -> HashMap<Id, Question> {
            self.questions.iter().map(|q| (q.id, q.clone())).collect()
        }
    }

    #[test]
    fn two_of_three_is_sixty_six_point_seven() {
        let fixture = Fixture::new(3);
        let x = fixture.answers(&[Some(A), Some(B), Some(A)]);
        let y = fixture.answers(&[Some(A), Some(A), Some(A)]);

        let summary = compare(&x, &y, &fixture.metadata(), ComparisonOrder::AsAnswered);

        assert_eq!(summary.common_questions, 3);
        assert_eq!(summary.matched_answers, 2);
        assert_eq!(summary.match_percentage, 66.7);
        let matches = summary
            .comparisons
            .iter()
            .map(|c| c.is_match)
            .collect::<Vec<_>>();
        assert_eq!(matches, vec![true, false, true]);
        assert_eq!(summary.comparisons[1].my_choice, B);
        assert_eq!(summary.comparisons[1].their_choice, A);
        assert_eq!(summary.comparisons[1].title, "Q2");
    }

    #[test]
    fn only_common_questions_are_compared() {
        let fixture = Fixture::new(4);
        let x = fixture.answers(&[Some(A), None, Some(B), Some(B)]);
        let y = fixture.answers(&[None, Some(A), Some(B), Some(A)]);

        let summary = compare(&x, &y, &fixture.metadata(), ComparisonOrder::AsAnswered);

        assert_eq!(summary.common_questions, 2);
        assert_eq!(summary.matched_answers, 1);
        assert_eq!(summary.match_percentage, 50.0);
        assert_eq!(*summary.comparisons[0].question_id, fixture.questions[2].id);
        assert_eq!(match_counts(&x, &y), MatchCounts {
            common_questions: 2,
            matched_answers: 1,
        });
    }

    #[test]
    fn nothing_in_common_is_zero_percent() {
        let fixture = Fixture::new(2);
        let x = fixture.answers(&[Some(A), None]);
        let y = fixture.answers(&[None, Some(A)]);

        let summary = compare(&x, &y, &fixture.metadata(), ComparisonOrder::MatchesFirst);

        assert_eq!(summary.common_questions, 0);
        assert_eq!(summary.matched_answers, 0);
        assert_eq!(summary.match_percentage, 0.0);
        assert!(summary.comparisons.is_empty());
    }

    #[test]
    fn matches_first_is_stable() {
        let fixture = Fixture::new(5);
        let x = fixture.answers(&[Some(A), Some(A), Some(B), Some(B), Some(A)]);
        let y = fixture.answers(&[Some(B), Some(A), Some(A), Some(B), Some(A)]);

        let summary = compare(&x, &y, &fixture.metadata(), ComparisonOrder::MatchesFirst);

        let titles = summary
            .comparisons
            .iter()
            .map(|c| c.title.as_str())
            .collect::<Vec<_>>();
        assert_eq!(titles, vec!["Q2", "Q4", "Q5", "Q1", "Q3"]);
        assert_eq!(summary.matched_answers, 3);
        assert_eq!(summary.match_percentage, 60.0);
    }

    #[test]
    fn unknown_and_deleted_questions_are_skipped() {
        let mut fixture = Fixture::new(3);
        fixture.questions[1] = fixture.questions[1].clone().deleted();
        let x = fixture.answers(&[Some(A), Some(A), Some(A)]);
        let y = fixture.answers(&[Some(A), Some(A), Some(B)]);
        let mut metadata = fixture.metadata();
        metadata.remove(&fixture.questions[2].id);

        let summary = compare(&x, &y, &metadata, ComparisonOrder::AsAnswered);

        assert_eq!(summary.common_questions, 1);
        assert_eq!(summary.matched_answers, 1);
        assert_eq!(summary.match_percentage, 100.0);
    }

    #[test]
    fn matched_never_exceeds_common() {
        let fixture = Fixture::new(6);
        let all = [Some(A), Some(B), None];
        for a in all {
            for b in all {
                let x = fixture.answers(&[a, b, a, None, Some(A), b]);
                let y = fixture.answers(&[b, a, a, Some(B), b, None]);
                let summary = compare(&x, &y, &fixture.metadata(), ComparisonOrder::AsAnswered);
                assert!(summary.matched_answers <= summary.common_questions);
                assert_eq!(summary.comparisons.len(), summary.common_questions);
                assert!((0.0..=100.0).contains(&summary.match_percentage));
            }
        }
    }

    #[test]
    fn refuses_self_comparison() {
        let fixture = Fixture::new(1);
        let me = Id::new();
        let mine = fixture.answers(&[Some(A)]);

        let result = compare_members(
            me,
            me,
            &mine,
            &mine,
            &fixture.metadata(),
            ComparisonOrder::AsAnswered,
        );

        assert!(matches!(result, Err(Error::Validation(_))));
        assert!(compare_members(
            me,
            Id::new(),
            &mine,
            &mine,
            &fixture.metadata(),
            ComparisonOrder::AsAnswered,
        )
        .is_ok());
    }
}
