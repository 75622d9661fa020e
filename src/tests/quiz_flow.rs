#[cfg(test)]
mod tests {
    use rand::{SeedableRng, seq::IndexedRandom};
    use rand_chacha::ChaCha8Rng;

    use crate::{
        quiz::{
            catalog::Catalog,
            flow::QuizFlow,
            models::{
                ANSWERED_KEY, CORRECT_KEY, NO_ANSWER_TEXT, QUIZ_ORDER_KEY, QuizError,
                QuizProgress, SubmitOutcome,
            },
        },
        session::{
            models::{SessionError, VisitorId},
            store::SessionHandle,
        },
        tests::support::{
            catalog_of, logged_in_visitor, question, session_store, setup_logging,
        },
    };

    fn scored(outcome: SubmitOutcome) -> crate::quiz::models::SubmissionResult {
        match outcome {
            SubmitOutcome::Scored(result) => result,
            other => panic!("Expected a scored submission, got {:?}", other),
        }
    }

    fn assert_invariant(session: &SessionHandle) {
        let progress = QuizProgress::load(session).unwrap();
        assert!(progress.correct_count <= progress.answered_count);
        assert!(progress.answered_count as usize <= progress.total());
    }

    #[test]
    fn start_quiz_visits_every_question_exactly_once() {
        setup_logging();
        let catalog = catalog_of(10);
        let store = session_store();
        let session = SessionHandle::new(&store, logged_in_visitor(&store));
        let flow = QuizFlow::new(&catalog);
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        let first = flow.start_quiz(&session, &mut rng).unwrap();
        assert_eq!(first, 0);

        let mut seen: Vec<u32> = (0..catalog.len())
            .map(|position| {
                let view = flow.get_question(&session, position).unwrap();
                assert_eq!(view.question_number, position + 1);
                assert_eq!(view.total, 10);
                view.question_id
            })
            .collect();

        seen.sort_unstable();
        assert_eq!(seen, (0..10).collect::<Vec<u32>>());
    }

    #[test]
    fn every_catalog_size_yields_a_permutation() {
        let store = session_store();
        let session = SessionHandle::new(&store, logged_in_visitor(&store));
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        for size in 1..=12 {
            let catalog = catalog_of(size);
            let flow = QuizFlow::new(&catalog);
            flow.start_quiz(&session, &mut rng).unwrap();

            let mut order: Vec<usize> = session.get(QUIZ_ORDER_KEY).unwrap().unwrap();
            order.sort_unstable();
            assert_eq!(order, (0..size as usize).collect::<Vec<usize>>());
        }
    }

    #[test]
    fn scenario_two_questions_half_correct() {
        setup_logging();
        let catalog = Catalog::new(vec![question(0, "A"), question(1, "B")]).unwrap();
        let store = session_store();
        let session = SessionHandle::new(&store, logged_in_visitor(&store));
        let flow = QuizFlow::new(&catalog);

        QuizProgress::started(vec![1, 0]).store(&session).unwrap();

        let first = scored(flow.submit_answer(&session, 0, Some("B")).unwrap());
        assert!(first.is_correct);
        assert_eq!(first.correct_count, 1);
        assert_eq!(first.next_position, 1);
        assert!(!first.is_last);
        assert_eq!(first.submitted_text, "Option B of question 1");
        assert_eq!(first.correct_text, "Option B of question 1");

        let second = scored(flow.submit_answer(&session, 1, Some("Z")).unwrap());
        assert!(!second.is_correct);
        assert_eq!(second.submitted_text, NO_ANSWER_TEXT);
        assert_eq!(second.correct_text, "Option A of question 0");
        assert_eq!(second.next_position, 2);
        assert!(second.is_last);

        let summary = flow.finish(&session).unwrap();
        assert_eq!(summary.answered, 2);
        assert_eq!(summary.correct, 1);
        assert_eq!(summary.percentage, 50);

        let result = flow.get_question(&session, 2);
        assert!(matches!(
            result,
            Err(QuizError::OutOfRangeEnd { position: 2 })
        ));
    }

    #[test]
    fn empty_answer_is_not_scored() {
        let catalog = catalog_of(3);
        let store = session_store();
        let session = SessionHandle::new(&store, logged_in_visitor(&store));
        let flow = QuizFlow::new(&catalog);
        flow.start_quiz(&session, &mut ChaCha8Rng::seed_from_u64(1))
            .unwrap();

        for submitted in [None, Some("")] {
            let outcome = flow.submit_answer(&session, 1, submitted).unwrap();
            assert_eq!(outcome, SubmitOutcome::Unanswered { position: 1 });
        }

        let answered: u32 = session.get_or(ANSWERED_KEY, 99).unwrap();
        let correct: u32 = session.get_or(CORRECT_KEY, 99).unwrap();
        assert_eq!((answered, correct), (0, 0));
    }

    #[test]
    fn counters_stay_ordered_under_random_submissions() {
        let catalog = catalog_of(6);
        let store = session_store();
        let session = SessionHandle::new(&store, logged_in_visitor(&store));
        let flow = QuizFlow::new(&catalog);
        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        let keys = ["A", "B", "C", "Z", ""];

        for _ in 0..20 {
            flow.start_quiz(&session, &mut rng).unwrap();
            for position in 0..catalog.len() {
                let key = *keys.choose(&mut rng).unwrap();
                flow.submit_answer(&session, position, Some(key)).unwrap();
                assert_invariant(&session);
            }
        }
    }

    #[test]
    fn repeated_submission_counts_every_time() {
        let catalog = Catalog::new(vec![question(0, "A"), question(1, "B")]).unwrap();
        let store = session_store();
        let session = SessionHandle::new(&store, logged_in_visitor(&store));
        let flow = QuizFlow::new(&catalog);
        QuizProgress::started(vec![0, 1]).store(&session).unwrap();

        flow.submit_answer(&session, 0, Some("A")).unwrap();
        flow.submit_answer(&session, 0, Some("A")).unwrap();

        let summary = flow.finish(&session).unwrap();
        assert_eq!(summary.answered, 2);
        assert_eq!(summary.correct, 2);
    }

    #[test]
    fn start_quiz_resets_counters() {
        let catalog = catalog_of(2);
        let store = session_store();
        let session = SessionHandle::new(&store, logged_in_visitor(&store));
        let flow = QuizFlow::new(&catalog);
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        flow.start_quiz(&session, &mut rng).unwrap();
        flow.submit_answer(&session, 0, Some("A")).unwrap();
        assert_eq!(flow.finish(&session).unwrap().answered, 1);

        flow.start_quiz(&session, &mut rng).unwrap();
        let summary = flow.finish(&session).unwrap();
        assert_eq!((summary.answered, summary.correct, summary.percentage), (0, 0, 0));
    }

    #[test]
    fn out_of_range_submission_does_not_mutate() {
        let catalog = catalog_of(2);
        let store = session_store();
        let session = SessionHandle::new(&store, logged_in_visitor(&store));
        let flow = QuizFlow::new(&catalog);
        flow.start_quiz(&session, &mut ChaCha8Rng::seed_from_u64(4))
            .unwrap();

        let result = flow.submit_answer(&session, 5, Some("A"));
        assert!(matches!(
            result,
            Err(QuizError::OutOfRangeEnd { position: 5 })
        ));
        assert_eq!(flow.finish(&session).unwrap().answered, 0);
    }

    #[test]
    fn finish_without_quiz_reports_zero() {
        let catalog = catalog_of(3);
        let store = session_store();
        let session = SessionHandle::new(&store, logged_in_visitor(&store));
        let flow = QuizFlow::new(&catalog);

        let summary = flow.finish(&session).unwrap();
        assert_eq!((summary.answered, summary.correct, summary.percentage), (0, 0, 0));

        let question = flow.get_question(&session, 0);
        assert!(matches!(
            question,
            Err(QuizError::NoActiveQuiz)
        ));

        let submission = flow.submit_answer(&session, 0, Some("A"));
        assert!(matches!(
            submission,
            Err(QuizError::NoActiveQuiz)
        ));
    }

    #[test]
    fn empty_catalog_cannot_start() {
        let catalog = Catalog::new(vec![]).unwrap();
        let store = session_store();
        let session = SessionHandle::new(&store, logged_in_visitor(&store));
        let flow = QuizFlow::new(&catalog);

        let result = flow.start_quiz(&session, &mut ChaCha8Rng::seed_from_u64(5));
        assert!(matches!(
            result,
            Err(QuizError::EmptyCatalog)
        ));
    }

    #[test]
    fn anonymous_session_is_refused() {
        let catalog = catalog_of(2);
        let store = session_store();
        let session = SessionHandle::new(&store, VisitorId::new());
        let flow = QuizFlow::new(&catalog);

        let not_authenticated =
            |result: Result<(), QuizError>| matches!(result, Err(QuizError::NotAuthenticated));

        assert!(not_authenticated(
            flow.start_quiz(&session, &mut ChaCha8Rng::seed_from_u64(6))
                .map(|_| ())
        ));
        assert!(not_authenticated(flow.get_question(&session, 0).map(|_| ())));
        assert!(not_authenticated(
            flow.submit_answer(&session, 0, Some("A")).map(|_| ())
        ));
        assert!(not_authenticated(flow.finish(&session).map(|_| ())));
        assert!(session.get::<Vec<usize>>(QUIZ_ORDER_KEY).unwrap().is_none());
    }

    #[test]
    fn unreadable_session_state_is_a_quiz_error() {
        let catalog = catalog_of(2);
        let store = session_store();
        let session = SessionHandle::new(&store, logged_in_visitor(&store));
        let flow = QuizFlow::new(&catalog);

        session.set(QUIZ_ORDER_KEY, &"not a list").unwrap();

        assert!(matches!(
            flow.get_question(&session, 0),
            Err(QuizError::Session(SessionError::Decode { ref key, .. })) if key == QUIZ_ORDER_KEY
        ));
        assert!(matches!(
            flow.finish(&session),
            Err(QuizError::Session(_))
        ));
    }

    #[test]
    fn percentage_rounds_half_to_even() {
        let progress = |answered, correct| QuizProgress {
            quiz_order: None,
            answered_count: answered,
            correct_count: correct,
        };

        assert_eq!(progress(3, 2).summary().percentage, 67);
        assert_eq!(progress(3, 1).summary().percentage, 33);
        assert_eq!(progress(8, 1).summary().percentage, 12);
        assert_eq!(progress(8, 3).summary().percentage, 38);
        assert_eq!(progress(4, 4).summary().percentage, 100);
        assert_eq!(progress(0, 0).summary().percentage, 0);
    }
}
