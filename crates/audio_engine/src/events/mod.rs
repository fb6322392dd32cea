//! Game lifecycle events
//!
//! Publish/subscribe channel for game state transitions (start, complete,
//! over, pause, resume). Handlers are registered per event type and receive
//! the sound manager on dispatch, which is how a game wires "on game over"
//! to a sound cue without either side holding global references.

use crate::audio::{PlayRequest, SoundManager};
use std::collections::HashMap;

/// Game lifecycle transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameEvent {
    /// A run started
    Started,
    /// The level or game was completed
    Completed,
    /// The player lost
    Over,
    /// Gameplay paused
    Paused,
    /// Gameplay resumed after a pause
    Resumed,
}

/// Event handler trait
/// Returns true if event was consumed (stops forwarding)
/// Returns false to allow forwarding to other handlers
pub trait EventHandler {
    /// Handle an event, return true if consumed
    fn on_event(&mut self, event: GameEvent, audio: &mut SoundManager) -> bool;
}

impl<F> EventHandler for F
where
    F: FnMut(GameEvent, &mut SoundManager) -> bool,
{
    fn on_event(&mut self, event: GameEvent, audio: &mut SoundManager) -> bool {
        self(event, audio)
    }
}

/// Handler that plays a sound when its event fires
#[derive(Debug, Clone)]
pub struct SoundCue {
    sound: String,
    request: PlayRequest,
}

impl SoundCue {
    /// One-shot cue for `sound`
    pub fn new(sound: impl Into<String>) -> Self {
        Self {
            sound: sound.into(),
            request: PlayRequest::one_shot(),
        }
    }

    /// Use `request` instead of a plain one-shot
    pub fn with_request(mut self, request: PlayRequest) -> Self {
        self.request = request;
        self
    }
}

impl EventHandler for SoundCue {
    fn on_event(&mut self, _event: GameEvent, audio: &mut SoundManager) -> bool {
        audio.play(&self.sound, self.request);
        false
    }
}

/// Event system with registration and queuing
/// Follows chain of responsibility pattern
#[derive(Default)]
pub struct EventSystem {
    queue: Vec<GameEvent>,
    handlers: HashMap<GameEvent, Vec<Box<dyn EventHandler>>>,
}

impl EventSystem {
    /// Create a new empty event system
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a specific event type
    /// Only handlers registered for this type will be notified
    pub fn register_handler(&mut self, event: GameEvent, handler: Box<dyn EventHandler>) {
        self.handlers
            .entry(event)
            .or_default()
            .push(handler);
    }

    /// Register a [`SoundCue`] for `event`
    pub fn on(&mut self, event: GameEvent, cue: SoundCue) {
        self.register_handler(event, Box::new(cue));
    }

    /// Queue an event for the next dispatch
    pub fn send(&mut self, event: GameEvent) {
        self.queue.push(event);
    }

    /// Number of queued events
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Deliver queued events in order
    pub fn dispatch(&mut self, audio: &mut SoundManager) {
        let queued = std::mem::take(&mut self.queue);
        for event in queued {
            if let Some(handlers) = self.handlers.get_mut(&event) {
                for handler in handlers.iter_mut() {
                    if handler.on_event(event, audio) {
                        // Event consumed, stop forwarding
                        break;
                    }
                }
            }
        }
    }

    /// Drop queued events without delivering them
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

/// Per-run game state that emits lifecycle events
///
/// Pausing sets the time scale to zero; feed [`GameSession::scaled_delta`]
/// to [`SoundManager::tick`] so one-shot timers freeze while paused.
pub struct GameSession {
    events: EventSystem,
    time_scale: f32,
    points: i32,
    coins: i32,
}

impl GameSession {
    /// Create a session with its own event system
    pub fn new(events: EventSystem) -> Self {
        Self {
            events,
            time_scale: 1.0,
            points: 0,
            coins: 0,
        }
    }

    /// Emit [`GameEvent::Started`]
    pub fn start_game(&mut self) {
        self.events.send(GameEvent::Started);
    }

    /// Emit [`GameEvent::Over`]
    pub fn game_over(&mut self) {
        self.events.send(GameEvent::Over);
    }

    /// Emit [`GameEvent::Completed`]
    pub fn game_complete(&mut self) {
        self.events.send(GameEvent::Completed);
    }

    /// Freeze scaled time and emit [`GameEvent::Paused`]
    pub fn pause_game(&mut self) {
        self.time_scale = 0.0;
        self.events.send(GameEvent::Paused);
    }

    /// Restore scaled time and emit [`GameEvent::Resumed`]
    pub fn resume_game(&mut self) {
        self.time_scale = 1.0;
        self.events.send(GameEvent::Resumed);
    }

    /// Current time scale (0 while paused)
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Frame delta adjusted by the time scale
    pub fn scaled_delta(&self, delta: f32) -> f32 {
        delta * self.time_scale
    }

    /// Deliver pending lifecycle events
    pub fn dispatch(&mut self, audio: &mut SoundManager) {
        self.events.dispatch(audio);
    }

    /// The session's event system
    pub fn events_mut(&mut self) -> &mut EventSystem {
        &mut self.events
    }

    /// Set the point counter
    pub fn set_points(&mut self, value: i32) {
        self.points = value;
    }

    /// Current points
    pub fn points(&self) -> i32 {
        self.points
    }

    /// Set the coin counter
    pub fn set_coins(&mut self, value: i32) {
        self.coins = value;
    }

    /// Add to the coin counter
    pub fn add_coins(&mut self, coins: i32) {
        self.coins += coins;
    }

    /// Current coins
    pub fn coins(&self) -> i32 {
        self.coins
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(EventSystem::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::backend::HeadlessBackend;
    use crate::audio::{AudioAsset, AudioFormat, SoundCatalog};
    use crate::config::MemoryConfigStore;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    fn manager() -> SoundManager {
        let catalog = SoundCatalog::new()
            .with_sound("gameover", AudioAsset::new(vec![0u8; 4], AudioFormat::Wav, Duration::from_secs(1)))
            .with_sound("coin", AudioAsset::new(vec![0u8; 4], AudioFormat::Wav, Duration::from_millis(500)));
        SoundManager::new(
            Box::new(HeadlessBackend::initialized()),
            catalog,
            Box::new(MemoryConfigStore::new()),
        )
        .unwrap()
    }

    #[test]
    fn test_cue_plays_on_dispatch() {
        let mut audio = manager();
        let mut events = EventSystem::new();
        events.on(GameEvent::Over, SoundCue::new("gameover"));

        events.send(GameEvent::Over);
        assert_eq!(audio.active_count(), 0);

        events.dispatch(&mut audio);
        assert_eq!(audio.active_count(), 1);
        assert_eq!(events.pending(), 0);
    }

    #[test]
    fn test_only_registered_handlers_fire() {
        let mut audio = manager();
        let mut events = EventSystem::new();
        events.on(GameEvent::Over, SoundCue::new("gameover"));

        events.send(GameEvent::Started);
        events.dispatch(&mut audio);
        assert_eq!(audio.active_count(), 0);
    }

    #[test]
    fn test_event_consumption() {
        let mut audio = manager();
        let mut events = EventSystem::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let first = Rc::clone(&seen);
        events.register_handler(GameEvent::Completed, Box::new(move |event: GameEvent, _: &mut SoundManager| {
            first.borrow_mut().push(("first", event));
            true
        }));
        let second = Rc::clone(&seen);
        events.register_handler(GameEvent::Completed, Box::new(move |event: GameEvent, _: &mut SoundManager| {
            second.borrow_mut().push(("second", event));
            false
        }));

        events.send(GameEvent::Completed);
        events.dispatch(&mut audio);
        assert_eq!(*seen.borrow(), vec![("first", GameEvent::Completed)]);
    }

    #[test]
    fn test_pause_freezes_one_shot_timers() {
        let mut audio = manager();
        let mut session = GameSession::default();
        session.events_mut().on(GameEvent::Started, SoundCue::new("coin"));

        session.start_game();
        session.dispatch(&mut audio);
        assert_eq!(audio.active_count(), 1);

        session.pause_game();
        session.dispatch(&mut audio);
        audio.tick(session.scaled_delta(1.0));
        assert_eq!(audio.active_count(), 1);

        session.resume_game();
        session.dispatch(&mut audio);
        audio.tick(session.scaled_delta(0.5));
        assert_eq!(audio.active_count(), 0);
    }

    #[test]
    fn test_counters() {
        let mut session = GameSession::default();
        session.set_points(10);
        session.set_coins(3);
        session.add_coins(2);
        assert_eq!(session.points(), 10);
        assert_eq!(session.coins(), 5);
    }

    #[test]
    fn test_clear_drops_pending() {
        let mut audio = manager();
        let mut events = EventSystem::new();
        events.on(GameEvent::Over, SoundCue::new("gameover"));
        events.send(GameEvent::Over);
        events.clear();
        events.dispatch(&mut audio);
        assert_eq!(audio.active_count(), 0);
    }
}
