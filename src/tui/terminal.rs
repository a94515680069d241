//! Ports backed by a ratatui terminal.

use super::input::{KeyAction, map_key};
use super::ui;
use super::view::{BoardView, ChatView, Entry, HeartView};
use crate::games::tictactoe::{Board, Position, Square};
use crate::ports::{
    Anchor, CellFx, ChromeFeatures, ChromeFx, EffectsPort, ElementId, InputPrompt,
    PresentationPort, UserInput,
};
use crate::script::{ChoiceSetId, Sender};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::Backend};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;
use std::time::Duration;
use tokio::sync::{mpsc::UnboundedSender, oneshot};
use tracing::{debug, error, info, instrument, warn};

/// A terminal and the view drawn on it.
pub struct Screen<B: Backend> {
    terminal: Terminal<B>,
    view: ChatView,
}

/// A [`Screen`] shared by the ports and the key reader.
pub type SharedScreen<B> = Arc<Mutex<Screen<B>>>;

impl<B: Backend> Screen<B> {
    /// Wraps a terminal with an empty view.
    pub fn new(terminal: Terminal<B>) -> Self {
        Self {
            terminal,
            view: ChatView::default(),
        }
    }

    /// Wraps a terminal for sharing.
    pub fn shared(terminal: Terminal<B>) -> SharedScreen<B> {
        Arc::new(Mutex::new(Self::new(terminal)))
    }

    /// Current view.
    pub fn view(&self) -> &ChatView {
        &self.view
    }

    /// The underlying terminal.
    pub fn terminal_mut(&mut self) -> &mut Terminal<B> {
        &mut self.terminal
    }

    /// Changes the view, then redraws.
    pub fn update<T>(&mut self, change: impl FnOnce(&mut ChatView) -> T) -> T {
        let out = change(&mut self.view);
        self.redraw();
        out
    }

    /// Draws the view. Failures are logged; the conversation carries on.
    pub fn redraw(&mut self) {
        let view = &self.view;
        if let Err(err) = self.terminal.draw(|frame| ui::draw(frame, view)) {
            warn!(error = ?err, "terminal draw failed");
        }
    }
}

fn lock<B: Backend>(screen: &SharedScreen<B>) -> MutexGuard<'_, Screen<B>> {
    screen.lock().unwrap_or_else(PoisonError::into_inner)
}

/// [`PresentationPort`] that draws into a [`Screen`].
pub struct TerminalPresenter<B: Backend> {
    screen: SharedScreen<B>,
    features: ChromeFeatures,
}

impl<B: Backend> TerminalPresenter<B> {
    /// A presenter with every optional chrome element available.
    pub fn new(screen: SharedScreen<B>) -> Self {
        Self {
            screen,
            features: ChromeFeatures::all(),
        }
    }

    /// Restricts the optional chrome.
    pub fn with_features(mut self, features: ChromeFeatures) -> Self {
        self.features = features;
        self
    }

    fn update<T>(&self, change: impl FnOnce(&mut ChatView) -> T) -> T {
        lock(&self.screen).update(change)
    }
}

impl<B: Backend> PresentationPort for TerminalPresenter<B> {
    fn chrome(&self) -> ChromeFeatures {
        self.features
    }

    fn render_message(&mut self, text: &str, sender: Sender) -> ElementId {
        self.update(|view| view.push_message(text, sender))
    }

    fn render_typing_indicator(&mut self, heart: bool) -> ElementId {
        self.update(|view| {
            let id = view.mount();
            view.typing = Some((id, heart));
            id
        })
    }

    fn render_choices(&mut self, set: ChoiceSetId, labels: &[&'static str]) -> ElementId {
        self.update(|view| {
            let id = view.mount();
            view.choices = Some((id, set, labels.to_vec()));
            id
        })
    }

    fn render_notification(&mut self, text: &str) {
        self.update(|view| view.entries.push(Entry::Notification(text.to_string())));
    }

    fn render_board(&mut self) -> ElementId {
        self.update(|view| {
            let id = view.mount();
            view.board = Some(BoardView {
                id,
                board: Board::new(),
                flash: None,
                status: String::new(),
            });
            id
        })
    }

    fn render_board_cell(&mut self, position: Position, square: Square, fx: CellFx) {
        self.update(|view| view.set_cell(position, square, fx));
    }

    fn render_game_status(&mut self, text: &str) {
        self.update(|view| {
            if let Some(board) = view.board.as_mut() {
                board.status = text.to_string();
            }
        });
    }

    fn render_heart(&mut self) -> ElementId {
        self.update(|view| {
            let id = view.mount();
            view.heart = Some(HeartView {
                id,
                status: String::new(),
                taps: 0,
            });
            id
        })
    }

    fn render_heart_status(&mut self, text: &str, taps: u32) {
        self.update(|view| {
            if let Some(heart) = view.heart.as_mut() {
                heart.status = text.to_string();
                heart.taps = taps;
            }
        });
    }

    fn render_reaction(&mut self, anchor: Anchor, glyph: &str) -> ElementId {
        self.update(|view| {
            let id = view.mount();
            view.reactions.push((id, anchor, glyph.to_string()));
            id
        })
    }

    fn render_input_draft(&mut self, draft: Option<&str>, highlighted: bool) {
        self.update(|view| view.draft = draft.map(|d| (d.to_string(), highlighted)));
    }

    fn render_prompt(&mut self, prompt: &InputPrompt) {
        self.update(|view| view.prompt = Some(prompt.clone()));
    }

    fn render_chrome(&mut self, fx: ChromeFx) {
        self.update(|view| view.apply_chrome(fx));
    }

    fn is_attached(&self, id: ElementId) -> bool {
        lock(&self.screen).view().is_attached(id)
    }

    fn remove_element(&mut self, id: ElementId) {
        self.update(|view| view.remove(id));
    }
}

/// [`EffectsPort`] that shows effects as a footer flourish.
pub struct TerminalEffects<B: Backend> {
    screen: SharedScreen<B>,
}

impl<B: Backend> TerminalEffects<B> {
    /// Effects drawn on `screen`.
    pub fn new(screen: SharedScreen<B>) -> Self {
        Self { screen }
    }

    fn flourish(&self, text: String) {
        lock(&self.screen).update(|view| view.flourish = Some(text));
    }
}

impl<B: Backend> EffectsPort for TerminalEffects<B> {
    fn confetti_burst(&mut self, origin: Anchor) {
        debug!(?origin, "confetti burst");
        self.flourish("🎉 🎊 🎉".to_string());
    }

    fn confetti_stream(&mut self, duration: Duration) {
        self.flourish(format!(
            "🎊🎉🎊🎉🎊🎉🎊 ({:.1}s of confetti)",
            duration.as_secs_f32()
        ));
    }

    fn floating_heart(&mut self, origin: Anchor, glyph: &str) {
        debug!(?origin, "floating heart");
        self.flourish(format!("{glyph} floats up"));
    }

    fn vibrate(&mut self, pattern: &[u64]) {
        debug!(?pattern, "vibrate (no haptics in a terminal)");
    }
}

/// Reads keys on a blocking thread and feeds them to the flow.
///
/// `quit` fires on `q` or Ctrl+C. The thread ends once the flow drops its
/// input receiver.
#[instrument(skip_all)]
pub fn spawn_key_reader<B>(
    screen: SharedScreen<B>,
    input: UnboundedSender<UserInput>,
    quit: oneshot::Sender<()>,
) -> JoinHandle<()>
where
    B: Backend + Send + 'static,
{
    std::thread::spawn(move || {
        info!("key reader started");
        while !input.is_closed() {
            match event::poll(Duration::from_millis(100)) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(err) => {
                    error!(error = %err, "terminal event poll failed");
                    break;
                }
            }
            let key = match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => key,
                Ok(_) => continue,
                Err(err) => {
                    error!(error = %err, "terminal event read failed");
                    break;
                }
            };
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                let _ = quit.send(());
                return;
            }

            let action = {
                let mut screen = lock(&screen);
                let prompt = screen.view().prompt.clone();
                let last_bubble = screen.view().last_bubble();
                let mut cursor = screen.view().cursor;
                let action = map_key(key.code, prompt.as_ref(), &mut cursor, last_bubble);
                screen.update(|view| view.cursor = cursor);
                action
            };
            match action {
                KeyAction::Send(user_input) => {
                    debug!(?user_input, "key mapped");
                    if input.send(user_input).is_err() {
                        break;
                    }
                }
                KeyAction::Quit => {
                    let _ = quit.send(());
                    return;
                }
                KeyAction::Redraw | KeyAction::Ignore => {}
            }
        }
        info!("key reader stopped");
    })
}
