/// Messaging module for Event/Command architecture
///
/// This module implements the Event/Command segregation pattern:
/// - **Commands**: Requests to change the match (imperative, sent by surfaces)
/// - **Events**: Notifications of what changed (past tense, broadcast)
///
/// ## Architecture
///
/// ```text
/// ┌───────────┐   Command    ┌──────────────────┐   Event    ┌─────────────┐
/// │ Surface   │ ───────────> │ Executor thread  │ ─────────> │  Event Bus  │
/// │ (console) │              │  owns MatchEngine│            │             │
/// └───────────┘              │  + 100ms tick    │            └─────────────┘
///                            └──────────────────┘                   │
///                                                                   │ Publishes
///                                                                   ▼
///                                                  ┌──────────────────────────┐
///                                                  │ Renderers, cue dispatcher│
///                                                  └──────────────────────────┘
/// ```
///
/// ## Usage
///
/// ```rust,ignore
/// let bus = EventBus::new();
/// let (rx, _id) = bus.subscribe();
///
/// let engine = MatchEngine::new(&config, MonotonicClock::new(), bus.clone());
/// let executor = CommandExecutor::new(engine, config.tick_interval());
/// let commands = executor.sender();
/// executor.start_processing();
///
/// commands.send(Command::SetSeconds { seconds: 210 })?;
/// commands.send(Command::Start)?;
///
/// while let Ok(event) = rx.recv() {
///     match event {
///         Event::TimeTextChanged { text } => { /* redraw clock */ }
///         Event::Cue { kind } => { /* play alert */ }
///         _ => {}
///     }
/// }
/// ```

pub mod bus;
pub mod commands;
pub mod events;
pub mod executor;

// Re-export commonly used types
pub use bus::{EventBus, SubscriberId};
pub use commands::{Command, CommandResult};
pub use events::Event;
pub use executor::CommandExecutor;
