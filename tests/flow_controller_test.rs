//! End-to-end runs of the conversation against recording ports.

use tokio::sync::mpsc;
use tokio::time::Instant;
use valentine_flow::recording::{
    Autopilot, EffectEvent, PresentationEvent, RecordingEffects, RecordingPresenter,
};
use valentine_flow::{
    Anchor, CellFx, ChromeEvent, ChromeFeatures, ChromeFx, Ending, FlowConfig, FlowController,
    NodeId, OutcomePolicy, Pacing, ReportedOutcome, Sender, StatusLine, UserInput, script,
};

type Controller = FlowController<RecordingPresenter, RecordingEffects>;

fn config(seed: u64) -> FlowConfig {
    FlowConfig::default().with_seed(seed)
}

fn autopiloted(
    features: ChromeFeatures,
    config: &FlowConfig,
    pilot: impl FnOnce(Autopilot) -> Autopilot,
) -> (Controller, mpsc::UnboundedSender<UserInput>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let presenter = RecordingPresenter::new(features).with_autopilot(pilot(Autopilot::new(tx.clone())));
    let controller = FlowController::new(
        script::valentine::script(),
        presenter,
        RecordingEffects::new(),
        rx,
        config,
    );
    (controller, tx)
}

fn sent(controller: &Controller) -> Vec<String> {
    controller
        .presentation()
        .messages()
        .into_iter()
        .filter(|(sender, _)| *sender == Sender::Sent)
        .map(|(_, text)| text)
        .collect()
}

#[tokio::test(start_paused = true)]
async fn test_first_options_walk_the_main_line() {
    let (mut controller, _tx) = autopiloted(ChromeFeatures::all(), &config(1), |p| p);

    let transcript = controller.run().await;

    assert_eq!(
        transcript.visited,
        vec![
            NodeId::Greeting,
            NodeId::Weekend,
            NodeId::LastQuestion,
            NodeId::YesReply,
            NodeId::Celebration,
        ]
    );
    assert_eq!(transcript.ending, Ending::Celebrated);
    assert_eq!(transcript.game, None);
    assert_eq!(controller.cursor(), NodeId::Celebration);
    assert_eq!(sent(&controller), vec!["Sure! 😊", "Yep!", "YES YES YES! 🥰"]);

    let messages = controller.presentation().messages();
    assert!(messages.contains(&(Sender::Received, "Will you be my Valentine? 💖".to_string())));
    assert_eq!(
        messages.last(),
        Some(&(Sender::Received, "YAY! See you this weekend! 😘❤️".to_string()))
    );
    assert!(
        controller
            .effects()
            .events()
            .contains(&EffectEvent::ConfettiStream(std::time::Duration::from_millis(3000)))
    );
}

#[tokio::test(start_paused = true)]
async fn test_double_click_advances_once() {
    let (mut controller, _tx) = autopiloted(ChromeFeatures::all(), &config(2), |p| p.repeating(2));

    let transcript = controller.run().await;

    assert_eq!(
        transcript.visited,
        vec![
            NodeId::Greeting,
            NodeId::Weekend,
            NodeId::LastQuestion,
            NodeId::YesReply,
            NodeId::Celebration,
        ]
    );
    let sent = sent(&controller);
    assert_eq!(sent.iter().filter(|t| *t == "Sure! 😊").count(), 1);
    assert_eq!(sent.iter().filter(|t| *t == "Yep!").count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_typing_indicators_are_removed_exactly_once() {
    let (mut controller, _tx) = autopiloted(ChromeFeatures::all(), &config(3), |p| p);
    controller.run().await;

    let presenter = controller.presentation();
    let indicators: Vec<_> = presenter
        .events()
        .iter()
        .filter_map(|e| match e {
            PresentationEvent::TypingIndicator { id, .. } => Some(*id),
            _ => None,
        })
        .collect();
    assert!(!indicators.is_empty());
    for id in indicators {
        assert_eq!(presenter.removals_of(id), 1, "{id}");
    }
}

#[tokio::test(start_paused = true)]
async fn test_heart_challenge_rejoins_the_last_question() {
    // Three taps per prompt: the extras after the burst must do nothing.
    let (mut controller, _tx) = autopiloted(ChromeFeatures::all(), &config(4), |p| {
        p.with_choices([0, 1, 0]).repeating(3)
    });

    let transcript = controller.run().await;

    assert_eq!(
        transcript.visited,
        vec![
            NodeId::Greeting,
            NodeId::Weekend,
            NodeId::HeartChallenge,
            NodeId::LastQuestion,
            NodeId::YesReply,
            NodeId::Celebration,
        ]
    );

    let statuses: Vec<_> = controller
        .presentation()
        .events()
        .iter()
        .filter_map(|e| match e {
            PresentationEvent::HeartStatus { text, taps } => Some((text.clone(), *taps)),
            _ => None,
        })
        .collect();
    assert_eq!(statuses.first(), Some(&("Tap it!".to_string(), 0)));
    assert_eq!(statuses.last(), Some(&("DONE! 💥".to_string(), 5)));

    let effects = controller.effects().events();
    let pulses = effects
        .iter()
        .filter(|e| **e == EffectEvent::Vibrate(vec![50]))
        .count();
    assert_eq!(pulses, 5);
    assert!(effects.contains(&EffectEvent::ConfettiBurst(Anchor::Heart)));
    assert!(
        controller
            .presentation()
            .messages()
            .contains(&(
                Sender::Received,
                "Haha, looks like your heart has something to say! 😆".to_string()
            ))
    );
}

#[tokio::test(start_paused = true)]
async fn test_game_is_always_lost_and_rejoins() {
    let stolen = [
        StatusLine::StolenWin.to_string(),
        StatusLine::ClaimedWin.to_string(),
        StatusLine::MySpotNow.to_string(),
        StatusLine::DrawRigged.to_string(),
    ];

    for seed in 0..6 {
        let config = config(seed).with_game(OutcomePolicy {
            risky_threshold: 9,
            skip_block_probability: 1.0,
        });
        let (mut controller, _tx) =
            autopiloted(ChromeFeatures::all(), &config, |p| p.with_choices([0, 2, 0]));

        let transcript = controller.run().await;

        assert_eq!(transcript.game, Some(ReportedOutcome::Loss), "seed {seed}");
        assert_eq!(transcript.ending, Ending::Celebrated);
        assert_eq!(
            &transcript.visited[2..4],
            &[NodeId::GameChallenge, NodeId::LastQuestion]
        );

        let presenter = controller.presentation();
        let statuses = presenter.statuses();
        assert_eq!(statuses.first(), Some(&StatusLine::Intro.to_string()));
        assert!(presenter.messages().contains(&(
            Sender::Received,
            "I win! You have to listen now! 😎".to_string()
        )));

        let cell_stolen = presenter
            .events()
            .iter()
            .any(|e| matches!(e, PresentationEvent::Cell { fx: CellFx::Stolen, .. }));
        let rigged = statuses.iter().any(|s| stolen.contains(s));
        assert_eq!(cell_stolen, rigged, "seed {seed}: {statuses:?}");
    }
}

#[tokio::test(start_paused = true)]
async fn test_no_is_autocorrected_into_yes() {
    let (mut controller, _tx) =
        autopiloted(ChromeFeatures::all(), &config(5), |p| p.with_choices([0, 0, 1]));

    let transcript = controller.run().await;

    assert_eq!(
        transcript.visited,
        vec![
            NodeId::Greeting,
            NodeId::Weekend,
            NodeId::LastQuestion,
            NodeId::Celebration,
        ]
    );
    assert_eq!(sent(&controller), vec!["Sure! 😊", "Yep!", "YES YES YES !!"]);

    let events = controller.presentation().events();
    let drafts: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            PresentationEvent::InputDraft { draft, highlighted } => Some((draft.clone(), *highlighted)),
            _ => None,
        })
        .collect();
    assert_eq!(drafts.first(), Some(&(Some("N".to_string()), false)));
    assert!(drafts.contains(&(Some("YES YES YES !!".to_string()), true)));
    assert_eq!(drafts.last(), Some(&(None, false)));
    assert!(events.contains(&PresentationEvent::Notification(
        "Autocorrected to \"YES YES YES !!\"".to_string()
    )));
}

#[tokio::test(start_paused = true)]
async fn test_missing_input_field_skips_only_the_animation() {
    let (mut controller, _tx) =
        autopiloted(ChromeFeatures::default(), &config(6), |p| p.with_choices([0, 0, 1]));

    let transcript = controller.run().await;

    assert_eq!(transcript.ending, Ending::Celebrated);
    assert!(
        !controller
            .presentation()
            .events()
            .iter()
            .any(|e| matches!(e, PresentationEvent::InputDraft { .. }))
    );
    assert_eq!(sent(&controller).last().map(String::as_str), Some("YES YES YES !!"));
}

#[tokio::test(start_paused = true)]
async fn test_absent_chrome_is_ignored() {
    let (mut controller, tx) = autopiloted(ChromeFeatures::default(), &config(7), |p| p);
    for event in [
        ChromeEvent::Back,
        ChromeEvent::VideoCall,
        ChromeEvent::HeaderLongPress,
        ChromeEvent::Footer,
    ] {
        tx.send(UserInput::Chrome(event)).unwrap();
    }

    let transcript = controller.run().await;

    assert_eq!(transcript.ending, Ending::Celebrated);
    let presenter = controller.presentation();
    assert!(
        !presenter
            .events()
            .iter()
            .any(|e| matches!(e, PresentationEvent::Chrome(_) | PresentationEvent::Notification(_)))
    );
}

#[tokio::test(start_paused = true)]
async fn test_present_chrome_reacts_with_cooldown() {
    let (mut controller, tx) = autopiloted(ChromeFeatures::all(), &config(8), |p| p);
    for event in [
        ChromeEvent::Back,
        ChromeEvent::VideoCall,
        ChromeEvent::VideoCall,
        ChromeEvent::HeaderLongPress,
        ChromeEvent::Footer,
        ChromeEvent::SheetCancel,
    ] {
        tx.send(UserInput::Chrome(event)).unwrap();
    }

    controller.run().await;

    let events = controller.presentation().events();
    let chrome: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            PresentationEvent::Chrome(fx) => Some(*fx),
            _ => None,
        })
        .collect();
    assert_eq!(
        chrome,
        vec![
            ChromeFx::ShakeBack,
            ChromeFx::NightMode(true),
            ChromeFx::ActionSheet(true),
            ChromeFx::ActionSheet(false),
        ]
    );
    let notices = events
        .iter()
        .filter(|e| **e == PresentationEvent::Notification("Video call unavailable".to_string()))
        .count();
    assert_eq!(notices, 1);
    assert!(
        controller
            .effects()
            .events()
            .contains(&EffectEvent::Vibrate(vec![50, 50, 50]))
    );
}

#[tokio::test(start_paused = true)]
async fn test_closed_input_stops_the_run() {
    let (tx, rx) = mpsc::unbounded_channel();
    drop(tx);
    let mut controller = FlowController::new(
        script::valentine::script(),
        RecordingPresenter::new(ChromeFeatures::all()),
        RecordingEffects::new(),
        rx,
        &config(9),
    );

    let transcript = controller.run().await;

    assert_eq!(transcript.ending, Ending::InputClosed);
    assert_eq!(transcript.visited, vec![NodeId::Greeting]);
    assert_eq!(
        controller.presentation().messages(),
        vec![(Sender::Received, "Hey… can I ask you something? 💌".to_string())]
    );
}

#[tokio::test(start_paused = true)]
async fn test_instant_pacing_takes_no_time() {
    let config = config(10).with_pacing(Pacing::instant());
    let (mut controller, _tx) = autopiloted(ChromeFeatures::all(), &config, |p| p);

    let start = Instant::now();
    let transcript = controller.run().await;

    assert_eq!(transcript.ending, Ending::Celebrated);
    assert_eq!(Instant::now(), start);
}

#[tokio::test(start_paused = true)]
async fn test_idle_floats_hearts_from_the_bottom() {
    let config = config(11).with_pacing(Pacing::instant());
    let (mut controller, _tx) = autopiloted(ChromeFeatures::all(), &config, |p| p);
    controller.run().await;
    let before = controller.effects().events().len();

    for _ in 0..3 {
        controller.idle_beat().await;
    }

    let hearts: Vec<_> = controller.effects().events()[before..]
        .iter()
        .filter_map(|e| match e {
            EffectEvent::FloatingHeart(Anchor::Screen { x, y }, glyph) => Some((*x, *y, glyph.clone())),
            _ => None,
        })
        .collect();
    assert_eq!(hearts.len(), 3);
    for (x, y, glyph) in hearts {
        assert!((0.0..1.0).contains(&x));
        assert_eq!(y, 1.0);
        assert!(valentine_flow::FLOATING_HEARTS.contains(&glyph.as_str()));
    }
}
