//! # PitchTrace - Real-Time Pitch Trace GUI
//!
//! Draws a trailing trajectory of the pitch being sung or played: the
//! cursor's height encodes the detected pitch class, and the arrow keys
//! move it left and right across the canvas.
//!
//! ## Architecture
//! - **Main Thread**: Iced GUI application with dark theme
//! - **Audio Thread**: Dedicated thread for capture and pitch analysis
//! - **Communication**: Crossbeam channels for thread-safe data exchange
//! - **Timers**: a 16 ms poll tick for audio events plus a trajectory
//!   tick whose period follows the speed slider

mod ui;

use cpal::traits::StreamTrait;
use crossbeam_channel::{Receiver, Sender};
use iced::keyboard::{self, Key, key::Named};
use iced::widget::canvas;
use iced::{Element, Subscription, Theme};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use trace_core::analysis::Analyzer;
use trace_core::trajectory::{self, DirectionalIntent, DrawCommand, TrajectoryEngine};
use trace_core::{PitchEstimate, audio};
use ui::main_display::create_main_view;
use ui::trace_canvas::Mark;

/// How often the GUI drains the audio event channel.
const POLL_INTERVAL: Duration = Duration::from_millis(16);

/// Default speed slider position; gives the reference 4 ms tick.
const DEFAULT_SPEED: u8 = 50;

/// Logical height of the trace canvas; the pitch-class ladder spans it.
pub const CANVAS_HEIGHT: f32 = 600.0;

/// Pitch class the cursor rides on before the first estimate arrives.
const INITIAL_NOTE_INDEX: i32 = 6;

/// How long the capture-started banner stays up.
const NOTIFICATION_DURATION: Duration = Duration::from_secs(5);

/// Main entry point for the PitchTrace application.
pub fn main() -> iced::Result {
    eprintln!("[MAIN] Starting PitchTrace...");
    let result = iced::application("PitchTrace", TraceApp::update, TraceApp::view)
        .subscription(TraceApp::subscription)
        .theme(TraceApp::theme)
        .run();
    eprintln!("[MAIN] Application finished with result: {:?}", result);
    result
}

/// Application message types for the Iced GUI framework.
#[derive(Debug, Clone)]
pub enum Message {
    /// Poll tick: drain audio events, expire the notification banner.
    Tick,
    /// Trajectory tick: advance the cursor and emit a mark.
    TrajectoryTick,
    /// ArrowRight pressed (true) or released (false).
    AdvanceKey(bool),
    /// ArrowLeft pressed (true) or released (false).
    RetreatKey(bool),
    /// Backspace: clear the trace and return the cursor to its start.
    ResetTrace,
    /// Speed slider moved; value in [1, 100].
    SpeedChanged(u8),
    /// Escape: shut down the audio worker and exit.
    Exit,
}

/// Events flowing from the audio worker thread to the GUI.
#[derive(Debug)]
pub enum AudioEvent {
    /// Capture is live at the given sample rate.
    Started { sample_rate: u32 },
    /// A new pitch estimate was published. Estimates cross the channel
    /// as complete units; fields never update separately.
    Estimate(PitchEstimate),
    /// Acquisition failed; the session runs on without live analysis.
    Failed(String),
}

/// Audio worker thread management structure.
struct AudioWorker {
    shutdown_tx: Sender<()>,
    thread_handle: JoinHandle<()>,
}

impl AudioWorker {
    /// Stops the capture worker. Consuming the worker makes a second
    /// disconnect unrepresentable.
    fn shutdown(self) {
        eprintln!("[MAIN] Shutting down audio worker...");
        let _ = self.shutdown_tx.send(());
        // Stream teardown can wedge on some cpal backends; give the
        // worker a moment instead of blocking on a join.
        thread::sleep(Duration::from_millis(100));
        drop(self.thread_handle);
    }
}

/// Main application state.
struct TraceApp {
    // Audio pipeline
    audio_worker: Option<AudioWorker>,
    event_receiver: Receiver<AudioEvent>,
    estimate: Option<PitchEstimate>,
    sample_rate: Option<u32>,
    audio_error: Option<String>,
    notification: Option<Instant>,

    // Trajectory state
    intent: DirectionalIntent,
    engine: TrajectoryEngine,
    marks: Vec<Mark>,
    trace_cache: canvas::Cache,
    speed: u8,
}

impl Default for TraceApp {
    fn default() -> Self {
        eprintln!("[MAIN] Creating TraceApp...");
        let (event_tx, event_rx) = crossbeam_channel::unbounded();

        let mut app = Self {
            audio_worker: None,
            event_receiver: event_rx,
            estimate: None,
            sample_rate: None,
            audio_error: None,
            notification: None,
            intent: DirectionalIntent::default(),
            engine: TrajectoryEngine::new(CANVAS_HEIGHT),
            marks: Vec::new(),
            trace_cache: canvas::Cache::new(),
            speed: DEFAULT_SPEED,
        };

        app.audio_worker = Some(start_audio_worker(event_tx));
        eprintln!("[MAIN] TraceApp created with audio enabled");
        app
    }
}

impl TraceApp {
    /// Handles application state updates based on incoming messages.
    fn update(&mut self, message: Message) {
        match message {
            Message::Tick => {
                while let Ok(event) = self.event_receiver.try_recv() {
                    self.process_audio_event(event);
                }
                if self
                    .notification
                    .is_some_and(|shown| shown.elapsed() >= NOTIFICATION_DURATION)
                {
                    self.notification = None;
                }
            }
            Message::TrajectoryTick => {
                let note_index = self
                    .estimate
                    .as_ref()
                    .map(|estimate| estimate.nearest_note)
                    .unwrap_or(INITIAL_NOTE_INDEX);

                if let DrawCommand::Mark { x, y } =
                    self.engine.tick(self.intent.direction(), note_index)
                {
                    self.marks.push(Mark { x, y });
                    self.trace_cache.clear();
                }
            }
            Message::AdvanceKey(pressed) => self.intent.advancing = pressed,
            Message::RetreatKey(pressed) => self.intent.retreating = pressed,
            Message::ResetTrace => {
                // The clear must fully land before the next tick's mark.
                if let DrawCommand::Clear = self.engine.reset() {
                    self.marks.clear();
                    self.trace_cache.clear();
                }
            }
            Message::SpeedChanged(speed) => {
                // The trajectory timer subscription is keyed by its
                // period, so this swaps the old driver for a new one.
                self.speed = speed;
            }
            Message::Exit => {
                eprintln!("[MAIN] Exit requested - starting cleanup...");
                if let Some(worker) = self.audio_worker.take() {
                    worker.shutdown();
                }
                eprintln!("[MAIN] Cleanup completed - exiting");
                std::process::exit(0);
            }
        }
    }

    /// Applies one event from the audio worker.
    fn process_audio_event(&mut self, event: AudioEvent) {
        match event {
            AudioEvent::Started { sample_rate } => {
                eprintln!("[MAIN] Capture started at {sample_rate} Hz");
                self.sample_rate = Some(sample_rate);
                self.notification = Some(Instant::now());
            }
            AudioEvent::Estimate(estimate) => {
                // Keep only the newest; a frame with no pitch publishes
                // nothing, so the previous estimate stays displayed.
                self.estimate = Some(estimate);
            }
            AudioEvent::Failed(message) => {
                eprintln!("[MAIN] Audio acquisition failed: {message}");
                self.audio_error = Some(message);
            }
        }
    }

    /// Renders the main application interface.
    fn view(&self) -> Element<'_, Message> {
        create_main_view(self)
    }

    /// Subscriptions: the audio poll tick, the speed-controlled
    /// trajectory tick, and the keyboard handlers.
    fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            iced::time::every(POLL_INTERVAL).map(|_| Message::Tick),
            iced::time::every(trajectory::period_from_speed(self.speed))
                .map(|_| Message::TrajectoryTick),
            keyboard::on_key_press(handle_key_press),
            keyboard::on_key_release(handle_key_release),
        ])
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn handle_key_press(key: Key, _modifiers: keyboard::Modifiers) -> Option<Message> {
    match key {
        Key::Named(Named::ArrowRight) => Some(Message::AdvanceKey(true)),
        Key::Named(Named::ArrowLeft) => Some(Message::RetreatKey(true)),
        Key::Named(Named::Backspace) => Some(Message::ResetTrace),
        Key::Named(Named::Escape) => Some(Message::Exit),
        _ => None,
    }
}

fn handle_key_release(key: Key, _modifiers: keyboard::Modifiers) -> Option<Message> {
    match key {
        Key::Named(Named::ArrowRight) => Some(Message::AdvanceKey(false)),
        Key::Named(Named::ArrowLeft) => Some(Message::RetreatKey(false)),
        _ => None,
    }
}

/// Spawns the dedicated audio thread: capture, per-frame analysis, and
/// event publication.
///
/// The thread owns the cpal stream for its whole lifetime. Analysis is
/// driven by frame arrival; a frame with no detectable pitch publishes
/// nothing.
fn start_audio_worker(event_tx: Sender<AudioEvent>) -> AudioWorker {
    let (shutdown_tx, shutdown_rx) = crossbeam_channel::bounded(1);

    let thread_handle = thread::spawn(move || {
        eprintln!("[AUDIO-THREAD] Starting audio thread...");
        let (frame_tx, frame_rx) = crossbeam_channel::unbounded::<Vec<f32>>();

        let (stream, sample_rate) = match audio::start_capture(frame_tx) {
            Ok(tuple) => tuple,
            Err(e) => {
                eprintln!("[AUDIO-THREAD] Fatal error starting capture: {e}");
                let _ = event_tx.send(AudioEvent::Failed(e.to_string()));
                return;
            }
        };

        let _ = event_tx.send(AudioEvent::Started { sample_rate });
        let mut analyzer = Analyzer::new(sample_rate);

        eprintln!("[AUDIO-THREAD] Entering analysis loop...");
        loop {
            crossbeam_channel::select! {
                recv(frame_rx) -> msg => match msg {
                    Ok(frame) => {
                        if let Some(estimate) = analyzer.process_frame(&frame) {
                            if event_tx.send(AudioEvent::Estimate(estimate.clone())).is_err() {
                                eprintln!("[AUDIO-THREAD] Event channel closed");
                                break;
                            }
                        }
                    }
                    Err(_) => {
                        eprintln!("[AUDIO-THREAD] Capture channel closed");
                        break;
                    }
                },
                recv(shutdown_rx) -> _ => {
                    eprintln!("[AUDIO-THREAD] Received shutdown signal");
                    break;
                }
            }
        }

        if let Err(e) = stream.pause() {
            eprintln!("[AUDIO-THREAD] Error pausing stream: {e}");
        }
        drop(stream);
        eprintln!("[AUDIO-THREAD] Audio thread finished");
    });

    AudioWorker {
        shutdown_tx,
        thread_handle,
    }
}
