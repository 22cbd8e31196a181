//! Property tests for question adaptation and scoring

use hearthloop_core::{
    AdaptationParameters, ConversationScorer, DetailLevel, ExplicitKind, ExplicitPayload,
    FeedbackEvent, FeedbackKind, ImplicitKind, ImplicitPayload, PatternAnalyzer, Priority,
    Question, QuestionAdapter, QuestionCount,
};
use chrono::Utc;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashSet};

const TOPICS: [&str; 4] = ["calendar", "school", "medical", "meals"];
const EVENT_TYPES: [&str; 3] = ["doctor_appointment", "school_event", "playdate"];

fn priority() -> impl Strategy<Value = Priority> {
    prop_oneof![Just(Priority::High), Just(Priority::Medium), Just(Priority::Low)]
}

fn question(index: usize) -> impl Strategy<Value = Question> {
    (
        priority(),
        proptest::sample::subsequence(TOPICS.to_vec(), 0..=2),
        proptest::sample::subsequence(EVENT_TYPES.to_vec(), 0..=2),
        any::<bool>(),
    )
        .prop_map(move |(priority, topics, relevant_to, essential)| Question {
            topics: topics.into_iter().map(String::from).collect(),
            relevant_to: relevant_to.into_iter().map(String::from).collect(),
            essential,
            simplified_text: Some(format!("q{}?", index)),
            ..Question::new(format!("q{}", index), format!("Question number {}?", index), priority)
        })
}

fn questions() -> impl Strategy<Value = Vec<Question>> {
    (0usize..12).prop_flat_map(|n| (0..n).map(question).collect::<Vec<_>>())
}

fn parameters() -> impl Strategy<Value = AdaptationParameters> {
    (
        prop_oneof![
            Just(QuestionCount::Fewer),
            Just(QuestionCount::Default),
            Just(QuestionCount::More)
        ],
        prop_oneof![
            Just(DetailLevel::Simpler),
            Just(DetailLevel::Default),
            Just(DetailLevel::Detailed)
        ],
        proptest::sample::subsequence(TOPICS.to_vec(), 0..=2),
    )
        .prop_map(|(question_count, detail_level, focus)| AdaptationParameters {
            question_count,
            detail_level,
            focus_areas: focus.into_iter().map(String::from).collect(),
            avoid_areas: BTreeSet::new(),
        })
}

fn ids(questions: &[Question]) -> Vec<String> {
    questions.iter().map(|q| q.id.clone()).collect()
}

fn explicit_event(kind: ExplicitKind, payload: ExplicitPayload) -> FeedbackEvent {
    FeedbackEvent {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: "u1".to_string(),
        conversation_id: "c1".to_string(),
        message_id: "m".to_string(),
        timestamp: Utc::now(),
        kind: FeedbackKind::Explicit { kind, payload },
    }
}

fn implicit_event(kind: ImplicitKind) -> FeedbackEvent {
    FeedbackEvent {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: "u1".to_string(),
        conversation_id: "c1".to_string(),
        message_id: "m".to_string(),
        timestamp: Utc::now(),
        kind: FeedbackKind::Implicit {
            kind,
            payload: ImplicitPayload::default(),
        },
    }
}

fn feedback_event() -> impl Strategy<Value = FeedbackEvent> {
    prop_oneof![
        (
            proptest::sample::select(ExplicitKind::ALL.to_vec()),
            any::<bool>(),
            any::<bool>(),
            proptest::sample::subsequence(TOPICS.to_vec(), 0..=2),
        )
            .prop_map(|(kind, many, few, topics)| {
                explicit_event(
                    kind,
                    ExplicitPayload {
                        too_many_questions: many,
                        too_few_questions: few,
                        ..Default::default()
                    }
                    .with_topics(topics),
                )
            }),
        proptest::sample::select(vec![
            ImplicitKind::AcceptedSuggestion,
            ImplicitKind::RejectedSuggestion,
            ImplicitKind::ModifiedSuggestion,
            ImplicitKind::IgnoredMessage,
        ])
        .prop_map(implicit_event),
    ]
}

proptest! {
    #[test]
    fn prop_fewer_never_grows_the_list(
        input in questions(),
        params in parameters(),
        event_type in proptest::option::of(proptest::sample::select(EVENT_TYPES.to_vec())),
    ) {
        let params = AdaptationParameters { question_count: QuestionCount::Fewer, ..params };
        let adapted = QuestionAdapter::new(params).adapt(&input, event_type);

        prop_assert!(adapted.len() <= input.len());
        prop_assert!(adapted.iter().all(|q| q.priority != Priority::Low || q.essential));
    }

    #[test]
    fn prop_default_and_more_keep_the_id_set(input in questions(), params in parameters()) {
        for count in [QuestionCount::Default, QuestionCount::More] {
            let adapter = QuestionAdapter::new(AdaptationParameters {
                question_count: count,
                ..params.clone()
            });
            let adapted = adapter.adapt(&input, None);

            let before: HashSet<String> = ids(&input).into_iter().collect();
            let after: HashSet<String> = ids(&adapted).into_iter().collect();
            prop_assert_eq!(before, after);
            prop_assert_eq!(adapted.len(), input.len());
        }
    }

    #[test]
    fn prop_focus_partition_is_stable(input in questions(), params in parameters()) {
        let focus = params.focus_areas.clone();
        let adapted = QuestionAdapter::new(params).adapt(&input, None);

        let is_focus = |q: &Question| q.topics.iter().any(|t| focus.contains(t));
        let first_other = adapted.iter().position(|q| !is_focus(q)).unwrap_or(adapted.len());
        prop_assert!(adapted[first_other..].iter().all(|q| !is_focus(q)));

        // Relative order inside each partition matches the input
        let input_order = ids(&input);
        let position = |id: &String| input_order.iter().position(|x| x == id);
        for part in [&adapted[..first_other], &adapted[first_other..]] {
            let positions: Vec<_> = part.iter().map(|q| position(&q.id)).collect();
            prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn prop_input_is_never_mutated(input in questions(), params in parameters()) {
        let snapshot = input.clone();
        let _ = QuestionAdapter::new(params).adapt(&input, Some("playdate"));
        prop_assert_eq!(input, snapshot);
    }

    #[test]
    fn prop_score_and_analysis_ignore_order(events in proptest::collection::vec(feedback_event(), 0..40)) {
        let mut shuffled = events.clone();
        shuffled.reverse();
        let half = shuffled.len() / 2;
        shuffled.rotate_left(half);

        prop_assert_eq!(
            ConversationScorer::score_events(&events),
            ConversationScorer::score_events(&shuffled)
        );

        let analyzer = PatternAnalyzer::default();
        let params = analyzer.analyze(&events, None);
        prop_assert_eq!(&params, &analyzer.analyze(&shuffled, None));
        prop_assert!(params.focus_areas.is_disjoint(&params.avoid_areas));
    }
}
