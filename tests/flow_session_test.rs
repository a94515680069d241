//! Tests for the flow session: choice latching, deferred cleanup and bubble
//! easter eggs.

use std::time::Duration;
use tokio::sync::mpsc;
use valentine_flow::recording::{
    Autopilot, EffectEvent, PresentationEvent, RecordingEffects, RecordingPresenter,
};
use valentine_flow::{
    Anchor, Choice, ChoiceAction, ChoiceSet, ChoiceSetId, ChromeFeatures, ChromeFx, Deferred,
    ElementId, FlowConfig, FlowSession, Mark, NodeId, OutcomePolicy, Pacing, Position,
    ReportedOutcome, ScriptMessage, Sender, Square, StatusLine, UserInput,
};

type Session = FlowSession<RecordingPresenter, RecordingEffects>;

fn session(features: ChromeFeatures) -> (Session, mpsc::UnboundedSender<UserInput>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let session = FlowSession::new(
        RecordingPresenter::new(features),
        RecordingEffects::new(),
        rx,
        &FlowConfig::default().with_seed(42),
    );
    (session, tx)
}

fn yes_no() -> ChoiceSet {
    ChoiceSet::new(vec![
        Choice::new("Yes", ChoiceAction::Advance(NodeId::YesReply)),
        Choice::new("No", ChoiceAction::Advance(NodeId::Celebration)),
    ])
}

fn reactions(session: &Session) -> Vec<ElementId> {
    session
        .presentation()
        .events()
        .iter()
        .filter_map(|e| match e {
            PresentationEvent::Reaction { id, .. } => Some(*id),
            _ => None,
        })
        .collect()
}

#[tokio::test(start_paused = true)]
async fn test_stale_and_invalid_selections_are_ignored() {
    let (mut session, tx) = session(ChromeFeatures::all());
    tx.send(UserInput::Choose { set: ChoiceSetId(99), index: 0 }).unwrap();
    tx.send(UserInput::Choose { set: ChoiceSetId(1), index: 7 }).unwrap();
    tx.send(UserInput::TapHeart).unwrap();
    tx.send(UserInput::Choose { set: ChoiceSetId(1), index: 1 }).unwrap();
    tx.send(UserInput::Choose { set: ChoiceSetId(1), index: 0 }).unwrap();

    let choice = session.present_choices(&yes_no()).await.unwrap();

    assert_eq!(choice.label, "No");
    assert!(session.armed().is_none());
    assert_eq!(
        session.presentation().messages(),
        vec![(Sender::Sent, "No".to_string())]
    );

    // The leftover click on the first set must not answer the second.
    tx.send(UserInput::Choose { set: ChoiceSetId(2), index: 0 }).unwrap();
    let choice = session.present_choices(&yes_no()).await.unwrap();
    assert_eq!(choice.label, "Yes");
}

#[tokio::test(start_paused = true)]
async fn test_choice_buttons_are_removed_after_the_answer() {
    let (mut session, tx) = session(ChromeFeatures::all());
    tx.send(UserInput::Choose { set: ChoiceSetId(1), index: 0 }).unwrap();

    session.present_choices(&yes_no()).await.unwrap();
    let container = session
        .presentation()
        .events()
        .iter()
        .find_map(|e| match e {
            PresentationEvent::Choices { id, .. } => Some(*id),
            _ => None,
        })
        .unwrap();
    // Continuation does not wait for the cleanup.
    assert_eq!(session.presentation().removals_of(container), 0);

    session.suspend(Duration::from_millis(500)).await;
    assert_eq!(session.presentation().removals_of(container), 1);
}

#[tokio::test(start_paused = true)]
async fn test_double_tap_reacts_and_expires() {
    let (mut session, tx) = session(ChromeFeatures::all());
    let bubble = session
        .deliver_message(&ScriptMessage::received("hi", 0))
        .await;

    tx.send(UserInput::TapBubble(bubble)).unwrap();
    tx.send(UserInput::TapBubble(bubble)).unwrap();
    session.suspend(Duration::from_millis(100)).await;

    let ids = reactions(&session);
    assert_eq!(ids.len(), 1);
    assert!(
        session
            .effects()
            .events()
            .contains(&EffectEvent::ConfettiBurst(Anchor::Element(bubble)))
    );

    session.suspend(Duration::from_millis(1500)).await;
    assert_eq!(session.presentation().removals_of(ids[0]), 1);
}

#[tokio::test(start_paused = true)]
async fn test_new_reaction_replaces_the_old_one() {
    let (mut session, tx) = session(ChromeFeatures::all());
    let bubble = session.deliver_message(&ScriptMessage::sent("hey")).await;

    for _ in 0..2 {
        tx.send(UserInput::TapBubble(bubble)).unwrap();
        tx.send(UserInput::TapBubble(bubble)).unwrap();
        session.suspend(Duration::from_millis(400)).await;
    }

    let ids = reactions(&session);
    assert_eq!(ids.len(), 2);
    assert_eq!(session.presentation().removals_of(ids[0]), 1);

    // The first reaction's own timer fires later and must not remove twice.
    session.suspend(Duration::from_millis(2000)).await;
    assert_eq!(session.presentation().removals_of(ids[0]), 1);
    assert_eq!(session.presentation().removals_of(ids[1]), 1);
}

#[tokio::test(start_paused = true)]
async fn test_three_slow_taps_reveal_the_character() {
    let (mut session, tx) = session(ChromeFeatures::all());
    let bubble = session.deliver_message(&ScriptMessage::sent("hey")).await;

    for _ in 0..3 {
        tx.send(UserInput::TapBubble(bubble)).unwrap();
        session.suspend(Duration::from_millis(400)).await;
    }

    assert!(
        session
            .effects()
            .events()
            .iter()
            .any(|e| matches!(e, EffectEvent::FloatingHeart(Anchor::Element(id), _) if *id == bubble))
    );
    assert!(
        session
            .presentation()
            .events()
            .contains(&PresentationEvent::Chrome(ChromeFx::HiddenCharacter(true)))
    );

    session.suspend(Duration::from_millis(2500)).await;
    assert!(
        session
            .presentation()
            .events()
            .contains(&PresentationEvent::Chrome(ChromeFx::HiddenCharacter(false)))
    );
}

#[tokio::test(start_paused = true)]
async fn test_character_taps_without_character_only_float_a_heart() {
    let (mut session, tx) = session(ChromeFeatures::default());
    let bubble = session.deliver_message(&ScriptMessage::sent("hey")).await;

    for _ in 0..3 {
        tx.send(UserInput::TapBubble(bubble)).unwrap();
        session.suspend(Duration::from_millis(400)).await;
    }

    assert!(
        session
            .effects()
            .events()
            .iter()
            .any(|e| matches!(e, EffectEvent::FloatingHeart(..)))
    );
    assert!(
        !session
            .presentation()
            .events()
            .iter()
            .any(|e| matches!(e, PresentationEvent::Chrome(_)))
    );
}

#[tokio::test(start_paused = true)]
async fn test_received_messages_type_first() {
    let (mut session, _tx) = session(ChromeFeatures::all());
    let start = tokio::time::Instant::now();

    let bubble = session
        .deliver_message(&ScriptMessage::received("hello", 500).typing_for(2000))
        .await;

    assert_eq!(start.elapsed(), Duration::from_millis(2500));
    let events = session.presentation().events();
    assert!(matches!(events[0], PresentationEvent::TypingIndicator { .. }));
    assert!(matches!(events[1], PresentationEvent::Removed(_)));
    assert!(matches!(&events[2], PresentationEvent::Message { id, .. } if *id == bubble));
    assert_eq!(
        session.effects().events(),
        &[EffectEvent::Vibrate(vec![10])]
    );
}

#[tokio::test(start_paused = true)]
async fn test_huge_slowdown_caps_the_wait() {
    let (tx, rx) = mpsc::unbounded_channel::<UserInput>();
    let config = FlowConfig::default().with_pacing(Pacing { speed: 1e-300 });
    let mut session = FlowSession::new(
        RecordingPresenter::new(ChromeFeatures::all()),
        RecordingEffects::new(),
        rx,
        &config,
    );
    let start = tokio::time::Instant::now();

    session.suspend(Duration::from_secs(1)).await;
    session.defer(Duration::from_secs(1), Deferred::HideCharacter);

    assert_eq!(start.elapsed(), Pacing::MAX_DELAY);
    drop(tx);
}

#[tokio::test(start_paused = true)]
async fn test_steal_on_an_open_board_keeps_playing() {
    let reckless = OutcomePolicy {
        risky_threshold: 9,
        skip_block_probability: 1.0,
    };
    let mut kept_playing = 0;
    for seed in 0..32 {
        let (tx, rx) = mpsc::unbounded_channel();
        let presenter = RecordingPresenter::new(ChromeFeatures::all()).with_autopilot(
            Autopilot::new(tx).with_cells([
                Position::TopLeft,
                Position::TopCenter,
                Position::TopRight,
            ]),
        );
        let config = FlowConfig::default()
            .with_seed(seed)
            .with_pacing(Pacing::instant())
            .with_game(reckless);
        let mut session = FlowSession::new(presenter, RecordingEffects::new(), rx, &config);

        assert_eq!(session.play_tictactoe().await, Some(ReportedOutcome::Loss));

        let events = session.presentation().events();
        let spot_now = PresentationEvent::GameStatus(StatusLine::MySpotNow.to_string());
        if let Some(at) = events.iter().position(|e| *e == spot_now) {
            kept_playing += 1;
            assert!(events[at..].iter().any(|e| matches!(
                e,
                PresentationEvent::Cell { square: Square::Occupied(Mark::Human), .. }
            )));
        }
    }
    assert!(kept_playing > 0);
}
