/// Command executor
///
/// Owns the match engine and is its single writer: commands from any number
/// of senders and the periodic timer tick are serialized onto one thread.

use crossbeam_channel::{select, tick, unbounded, Receiver, Sender};
use std::thread;
use std::time::Duration;

use super::commands::{Command, CommandResult};
use super::events::Event;
use crate::clock::Clock;
use crate::engine::{AbsoluteWinChange, MatchEngine};

/// Command executor that applies commands to the engine and drives its tick
pub struct CommandExecutor<C: Clock> {
    engine: MatchEngine<C>,
    command_tx: Sender<Command>,
    command_rx: Receiver<Command>,
    tick_interval: Duration,
}

impl<C: Clock + 'static> CommandExecutor<C> {
    /// Create a new command executor around an engine
    pub fn new(engine: MatchEngine<C>, tick_interval: Duration) -> Self {
        let (tx, rx) = unbounded();

        Self {
            engine,
            command_tx: tx,
            command_rx: rx,
            tick_interval,
        }
    }

    /// Get a sender for submitting commands
    pub fn sender(&self) -> Sender<Command> {
        self.command_tx.clone()
    }

    pub fn engine(&self) -> &MatchEngine<C> {
        &self.engine
    }

    /// Apply a command immediately on the calling thread
    pub fn execute_sync(&mut self, command: Command) -> CommandResult {
        apply(&mut self.engine, command)
    }

    /// Start the command loop in a background thread
    ///
    /// The loop ends on `Command::Quit` or once every sender is dropped, and
    /// hands the engine back through the join handle.
    pub fn start_processing(self) -> thread::JoinHandle<MatchEngine<C>> {
        let Self {
            mut engine,
            command_tx,
            command_rx,
            tick_interval,
        } = self;
        // Only external senders keep the loop alive
        drop(command_tx);

        thread::spawn(move || {
            tracing::info!("Command loop started (tick every {:?})", tick_interval);
            let ticker = tick(tick_interval);

            loop {
                select! {
                    recv(command_rx) -> command => match command {
                        Ok(Command::Quit) => {
                            tracing::info!("Quit command received, stopping command loop");
                            apply(&mut engine, Command::Quit);
                            break;
                        }
                        Ok(command) => {
                            let result = apply(&mut engine, command);
                            tracing::trace!("Command result: {:?}", result);
                        }
                        Err(_) => {
                            tracing::info!("All command senders dropped");
                            engine.event_bus().publish(Event::Shutdown);
                            break;
                        }
                    },
                    recv(ticker) -> _ => {
                        engine.tick();
                    }
                }
            }

            tracing::info!("Command loop stopped");
            engine
        })
    }
}

fn apply<C: Clock>(engine: &mut MatchEngine<C>, command: Command) -> CommandResult {
    tracing::debug!("Executing command: {}", command.description());

    match command {
        Command::SetTeamNames { team1, team2 } => {
            engine.set_team_names(&team1, &team2);
            CommandResult::Success
        }
        Command::SetTeamColor { team, color } => {
            if engine.set_team_color(team, &color) {
                CommandResult::SuccessWithValue(engine.team_color(team).to_hex())
            } else {
                CommandResult::Ignored(format!(
                    "{} keeps color {}",
                    team,
                    engine.team_color(team)
                ))
            }
        }
        Command::SetCount {
            team,
            treasure,
            slot,
            value,
        } => {
            let stored = engine.set_count(team, treasure, slot, value);
            CommandResult::SuccessWithValue(stored.to_string())
        }
        Command::SetPenalty { team, value } => {
            CommandResult::SuccessWithValue(engine.set_penalty(team, value).to_string())
        }
        Command::SetBonus { team, value } => {
            CommandResult::SuccessWithValue(engine.set_bonus(team, value).to_string())
        }
        Command::SetAbsoluteWin { winner } => match engine.set_absolute_win(winner) {
            AbsoluteWinChange::Rejected { current } => {
                CommandResult::Ignored(format!("{} already holds the absolute win", current))
            }
            change => CommandResult::SuccessWithValue(format!("{:?}", change)),
        },
        Command::ResetScoring => {
            engine.reset_scoring();
            CommandResult::Success
        }
        Command::SetPointValue {
            treasure,
            slot,
            value,
        } => {
            engine.set_point_value(treasure, slot, value);
            CommandResult::Success
        }
        Command::ResetRules => {
            engine.reset_rules();
            CommandResult::Success
        }
        Command::SetSeconds { seconds } => {
            engine.set_seconds(seconds);
            CommandResult::SuccessWithValue(engine.time_text())
        }
        Command::Start => timer_result(engine.start(), "timer not started"),
        Command::Pause => timer_result(engine.pause(), "timer not running"),
        Command::Resume => timer_result(engine.resume(), "timer not paused"),
        Command::Toggle => timer_result(engine.toggle(), "timer not running"),
        Command::ResetTimer => {
            engine.reset_timer();
            CommandResult::Success
        }
        Command::PublishSnapshot => {
            engine.publish_snapshot();
            CommandResult::SuccessWithValue(engine.timer_state().description().to_string())
        }
        Command::Quit => {
            engine.event_bus().publish(Event::Shutdown);
            CommandResult::Success
        }
    }
}

fn timer_result(changed: bool, reason: &str) -> CommandResult {
    if changed {
        CommandResult::Success
    } else {
        CommandResult::Ignored(reason.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::Config;
    use crate::messaging::EventBus;
    use crate::state::{Slot, TeamId, TreasureType};

    fn executor() -> (CommandExecutor<ManualClock>, ManualClock, EventBus) {
        let clock = ManualClock::new();
        let bus = EventBus::new();
        let engine = MatchEngine::new(&Config::default(), clock.clone(), bus.clone());
        (CommandExecutor::new(engine, Duration::from_millis(5)), clock, bus)
    }

    #[test]
    fn test_set_count_reports_stored_value() {
        let (mut executor, _, _) = executor();

        let result = executor.execute_sync(Command::SetCount {
            team: TeamId::Team1,
            treasure: TreasureType::Diamond,
            slot: Slot::First,
            value: 9,
        });
        assert_eq!(result, CommandResult::SuccessWithValue("2".to_string()));
    }

    #[test]
    fn test_rejected_absolute_win_is_ignored() {
        let (mut executor, _, _) = executor();
        executor.execute_sync(Command::SetAbsoluteWin {
            winner: Some(TeamId::Team1),
        });

        let result = executor.execute_sync(Command::SetAbsoluteWin {
            winner: Some(TeamId::Team2),
        });
        assert!(matches!(result, CommandResult::Ignored(_)));
        assert_eq!(executor.engine().display_score(), (1, 0));
    }

    #[test]
    fn test_start_without_time_is_ignored() {
        let (mut executor, _, _) = executor();
        assert!(matches!(
            executor.execute_sync(Command::Start),
            CommandResult::Ignored(_)
        ));
    }

    #[test]
    fn test_status_reports_timer_state() {
        let (mut executor, _, _) = executor();
        executor.execute_sync(Command::SetSeconds { seconds: 60 });
        executor.execute_sync(Command::Start);
        executor.execute_sync(Command::Toggle);

        assert_eq!(
            executor.execute_sync(Command::PublishSnapshot),
            CommandResult::SuccessWithValue("Paused".to_string())
        );
    }

    #[test]
    fn test_quit_command_emits_shutdown_event() {
        let (mut executor, _, bus) = executor();
        let (rx, _id) = bus.subscribe();

        executor.execute_sync(Command::Quit);

        assert_eq!(rx.try_recv(), Ok(Event::Shutdown));
    }

    #[test]
    fn test_background_loop_applies_commands_and_ticks() {
        let (executor, clock, bus) = executor();
        let (rx, _id) = bus.subscribe();
        let sender = executor.sender();
        let handle = executor.start_processing();

        sender.send(Command::SetSeconds { seconds: 3 }).unwrap();
        sender.send(Command::Start).unwrap();

        // deadline is captured when the loop applies Start
        let started = rx
            .iter()
            .find(|event| matches!(event, Event::RunStateChanged { running: true, .. }));
        assert!(started.is_some());
        clock.advance_ms(3_000);

        // wait for the loop to notice expiry through its own ticks
        let expired = rx
            .iter()
            .find(|event| matches!(event, Event::Cue { kind: crate::state::CueKind::Expired }));
        assert!(expired.is_some());

        sender.send(Command::Quit).unwrap();
        let engine = handle.join().unwrap();
        assert_eq!(engine.seconds_remaining(), 0);
        assert!(!engine.run_state().running);
    }

    #[test]
    fn test_loop_stops_when_senders_dropped() {
        let (executor, _, bus) = executor();
        let (rx, _id) = bus.subscribe();
        let sender = executor.sender();
        let handle = executor.start_processing();

        drop(sender);
        handle.join().unwrap();
        assert!(rx.iter().any(|event| event == Event::Shutdown));
    }
}
