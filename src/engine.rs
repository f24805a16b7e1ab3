/// Match engine
///
/// Owns every piece of match state (team identity, inventories,
/// adjustments, absolute win, countdown) and is the only writer of it.
/// Each command leaves the state valid and publishes the resulting
/// snapshot on the event bus; readers never touch engine internals.
use crate::clock::{Clock, MonotonicClock};
use crate::config::Config;
use crate::messaging::{Event, EventBus};
use crate::state::{
    normalize_team_name, CountdownTimer, PerTeam, RunState, ScoringRules, Slot, TeamColor, TeamId,
    TeamRecord, TickOutcome, TimerState, TreasureTotals, TreasureType,
};
use crate::time_text::format_time_text;

/// Result of a `set_absolute_win` request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbsoluteWinChange {
    /// A winner was declared and the timer frozen
    Declared(TeamId),
    /// The declared winner was removed
    Cleared,
    /// Another team is already the declared winner
    Rejected { current: TeamId },
    /// Nothing was declared and nothing was requested
    Unchanged,
}

/// Consistent view of everything a presentation surface renders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSnapshot {
    pub team1_name: String,
    pub score1: i64,
    pub team2_name: String,
    pub score2: i64,
    pub colors: PerTeam<TeamColor>,
    pub seconds_remaining: u64,
    pub time_text: String,
    pub run_state: RunState,
    pub timer_state: TimerState,
    pub absolute_winner: Option<TeamId>,
}

/// Which parts of a snapshot a command announces
#[derive(Debug, Clone, Copy)]
struct Notify {
    scoreboard: bool,
    time_text: bool,
    run_state: bool,
}

impl Notify {
    const ALL: Notify = Notify {
        scoreboard: true,
        time_text: true,
        run_state: true,
    };
    const RUN_STATE: Notify = Notify {
        scoreboard: false,
        time_text: false,
        run_state: true,
    };
    const TIMER: Notify = Notify {
        scoreboard: false,
        time_text: true,
        run_state: true,
    };
}

pub struct MatchEngine<C: Clock = MonotonicClock> {
    clock: C,
    bus: EventBus,
    /// Rules restored by `reset_rules` / `reset_scoring`
    configured_rules: ScoringRules,
    rules: ScoringRules,
    max_name_length: PerTeam<usize>,
    fallback_names: PerTeam<String>,
    teams: PerTeam<TeamRecord>,
    absolute_winner: Option<TeamId>,
    timer: CountdownTimer,
}

impl<C: Clock> MatchEngine<C> {
    /// Create the engine for a new match; counts, adjustments and timer start at zero
    pub fn new(config: &Config, clock: C, bus: EventBus) -> Self {
        let team = |id: TeamId| {
            let name = normalize_team_name(
                config.default_team_names.get(id),
                *config.max_name_length.get(id),
            )
            .unwrap_or_else(|| config.fallback_team_names.get(id).clone());
            TeamRecord::new(name, *config.default_team_colors.get(id))
        };

        Self {
            clock,
            bus,
            configured_rules: config.rules.clone(),
            rules: config.rules.clone(),
            max_name_length: config.max_name_length.clone(),
            fallback_names: config.fallback_team_names.clone(),
            teams: PerTeam::new(team(TeamId::Team1), team(TeamId::Team2)),
            absolute_winner: None,
            timer: CountdownTimer::new(config.near_end_window()),
        }
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.bus
    }

    // ---- team identity ----

    pub fn set_team_names(&mut self, name1: &str, name2: &str) {
        for (team, raw) in [(TeamId::Team1, name1), (TeamId::Team2, name2)] {
            let name = normalize_team_name(raw, *self.max_name_length.get(team))
                .unwrap_or_else(|| self.fallback_names.get(team).clone());
            self.teams.get_mut(team).name = name;
        }
        tracing::debug!(
            "Team names set to '{}' / '{}'",
            self.teams.team1.name,
            self.teams.team2.name
        );
        self.publish(Notify::ALL);
    }

    /// Apply a color; invalid or unchanged values leave the prior color in place
    pub fn set_team_color(&mut self, team: TeamId, value: &str) -> bool {
        let Some(color) = TeamColor::parse(value) else {
            tracing::warn!("Rejected color '{}' for {}", value, team);
            return false;
        };

        let record = self.teams.get_mut(team);
        if record.color == color {
            return false;
        }
        record.color = color;
        self.bus.publish(Event::TeamColorChanged { team, color });
        true
    }

    // ---- scoring ----

    /// Store a clamped count and return the value actually stored
    pub fn set_count(&mut self, team: TeamId, treasure: TreasureType, slot: Slot, value: i64) -> u32 {
        let stored = self
            .teams
            .get_mut(team)
            .inventory
            .set_count(&self.rules, treasure, slot, value);
        self.publish(Notify::ALL);
        stored
    }

    pub fn set_penalty(&mut self, team: TeamId, value: i64) -> u64 {
        let stored = clamp_adjustment(value);
        self.teams.get_mut(team).penalty = stored;
        self.publish(Notify::ALL);
        stored
    }

    pub fn set_bonus(&mut self, team: TeamId, value: i64) -> u64 {
        let stored = clamp_adjustment(value);
        self.teams.get_mut(team).bonus = stored;
        self.publish(Notify::ALL);
        stored
    }

    /// Declare, toggle off or clear the absolute winner
    ///
    /// Requesting the already-declared team clears it. Requesting the other
    /// team while one is declared is rejected. `None` always clears.
    pub fn set_absolute_win(&mut self, winner: Option<TeamId>) -> AbsoluteWinChange {
        let change = match (self.absolute_winner, winner) {
            (Some(current), Some(requested)) if current != requested => {
                tracing::warn!(
                    "Rejected absolute win for {}: {} is already declared",
                    requested,
                    current
                );
                return AbsoluteWinChange::Rejected { current };
            }
            (Some(_), _) => {
                self.absolute_winner = None;
                AbsoluteWinChange::Cleared
            }
            (None, Some(requested)) => {
                let now = self.clock.now();
                if self.timer.freeze(now) {
                    tracing::debug!("Timer frozen at {}s", self.timer.seconds_remaining());
                }
                self.absolute_winner = Some(requested);
                AbsoluteWinChange::Declared(requested)
            }
            (None, None) => AbsoluteWinChange::Unchanged,
        };

        tracing::info!("Absolute win: {:?}", change);
        self.publish(Notify::ALL);
        change
    }

    /// Zero inventories, adjustments and absolute win; names, colors and timer stay
    pub fn reset_scoring(&mut self) {
        for team in TeamId::ALL {
            self.teams.get_mut(team).reset_scoring();
        }
        self.rules = self.configured_rules.clone();
        self.absolute_winner = None;
        tracing::info!("Scoring reset");
        self.publish(Notify::ALL);
    }

    /// Change one point value; counts are untouched
    pub fn set_point_value(&mut self, treasure: TreasureType, slot: Slot, value: u32) {
        self.rules.set_points(treasure, slot, value);
        self.publish(Notify::ALL);
    }

    /// Restore the configured point table and quotas; counts are untouched
    pub fn reset_rules(&mut self) {
        self.rules = self.configured_rules.clone();
        self.publish(Notify::ALL);
    }

    // ---- timer ----

    /// Preset the countdown; clears any absolute win and stops the timer
    pub fn set_seconds(&mut self, seconds: i64) {
        self.absolute_winner = None;
        self.timer.set_seconds(u64::try_from(seconds).unwrap_or(0));
        tracing::debug!("Timer set to {}", format_time_text(self.timer.seconds_remaining()));
        self.publish(Notify::ALL);
    }

    pub fn start(&mut self) -> bool {
        if self.absolute_winner.is_some() {
            tracing::debug!("Start ignored: absolute win declared");
            return false;
        }

        let now = self.clock.now();
        if !self.timer.start(now) {
            tracing::debug!("Start ignored: no time on the clock");
            return false;
        }

        tracing::info!("Countdown started from {}", self.time_text());
        self.publish(Notify::RUN_STATE);
        true
    }

    pub fn pause(&mut self) -> bool {
        if self.absolute_winner.is_some() {
            return false;
        }

        let now = self.clock.now();
        let changed = self.timer.pause(now);
        if changed {
            self.publish(Notify::TIMER);
        }
        changed
    }

    pub fn resume(&mut self) -> bool {
        if self.absolute_winner.is_some() {
            return false;
        }

        let now = self.clock.now();
        let changed = self.timer.resume(now);
        if changed {
            self.publish(Notify::RUN_STATE);
        }
        changed
    }

    /// Pause a running countdown or resume a paused one
    pub fn toggle(&mut self) -> bool {
        if self.absolute_winner.is_some() {
            return false;
        }

        let now = self.clock.now();
        if !self.timer.toggle(now) {
            return false;
        }

        // pausing captures the remaining time, so the clock text is republished
        if self.timer.run_state().paused {
            self.publish(Notify::TIMER);
        } else {
            self.publish(Notify::RUN_STATE);
        }
        true
    }

    /// Zero the countdown and clear any absolute win; scores stay
    pub fn reset_timer(&mut self) {
        self.set_seconds(0);
    }

    /// Periodic update; call at the configured cadence
    pub fn tick(&mut self) -> TickOutcome {
        if self.absolute_winner.is_some() {
            return TickOutcome::default();
        }

        let now = self.clock.now();
        let outcome = self.timer.tick(now);
        if outcome.is_empty() {
            return outcome;
        }

        for kind in &outcome.cues {
            tracing::info!("Cue fired: {:?}", kind);
            self.bus.publish(Event::Cue { kind: *kind });
        }

        self.publish(Notify {
            scoreboard: false,
            time_text: outcome.time_changed,
            run_state: outcome.run_state_changed,
        });
        outcome
    }

    // ---- queries ----

    pub fn compute_score(&self, team: TeamId) -> i64 {
        self.teams.get(team).score(&self.rules)
    }

    /// Scores as displayed: an absolute win overrides them with 1-0 / 0-1
    pub fn display_score(&self) -> (i64, i64) {
        match self.absolute_winner {
            Some(TeamId::Team1) => (1, 0),
            Some(TeamId::Team2) => (0, 1),
            None => (
                self.compute_score(TeamId::Team1),
                self.compute_score(TeamId::Team2),
            ),
        }
    }

    pub fn totals(&self, team: TeamId, treasure: TreasureType) -> TreasureTotals {
        self.teams.get(team).inventory.totals(treasure)
    }

    /// Advisory room in a slot for a type, for pre-clamping input controls
    pub fn available_capacity(&self, team: TeamId, slot: Slot, treasure: TreasureType) -> u32 {
        self.teams.get(team).inventory.available_capacity(slot, treasure)
    }

    pub fn count(&self, team: TeamId, treasure: TreasureType, slot: Slot) -> u32 {
        self.teams.get(team).inventory.count(treasure, slot)
    }

    pub fn is_absolute_eligible(&self, team: TeamId) -> bool {
        self.teams.get(team).inventory.is_absolute_eligible()
    }

    pub fn team_color(&self, team: TeamId) -> TeamColor {
        self.teams.get(team).color
    }

    pub fn team_name(&self, team: TeamId) -> &str {
        &self.teams.get(team).name
    }

    pub fn penalty(&self, team: TeamId) -> u64 {
        self.teams.get(team).penalty
    }

    pub fn bonus(&self, team: TeamId) -> u64 {
        self.teams.get(team).bonus
    }

    pub fn absolute_winner(&self) -> Option<TeamId> {
        self.absolute_winner
    }

    pub fn rules(&self) -> &ScoringRules {
        &self.rules
    }

    pub fn seconds_remaining(&self) -> u64 {
        self.timer.seconds_remaining()
    }

    pub fn time_text(&self) -> String {
        format_time_text(self.timer.seconds_remaining())
    }

    pub fn run_state(&self) -> RunState {
        self.timer.run_state()
    }

    pub fn timer_state(&self) -> TimerState {
        if self.absolute_winner.is_some() {
            TimerState::AbsoluteWinLock
        } else {
            self.timer.state()
        }
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        let (score1, score2) = self.display_score();
        MatchSnapshot {
            team1_name: self.teams.team1.name.clone(),
            score1,
            team2_name: self.teams.team2.name.clone(),
            score2,
            colors: PerTeam::new(self.teams.team1.color, self.teams.team2.color),
            seconds_remaining: self.timer.seconds_remaining(),
            time_text: self.time_text(),
            run_state: self.timer.run_state(),
            timer_state: self.timer_state(),
            absolute_winner: self.absolute_winner,
        }
    }

    /// Publish scoreboard, time text and run state from one snapshot
    pub fn publish_snapshot(&self) {
        self.publish(Notify::ALL);
    }

    fn publish(&self, notify: Notify) {
        let snapshot = self.snapshot();

        if notify.scoreboard {
            self.bus.publish(Event::ScoreboardChanged {
                team1_name: snapshot.team1_name,
                score1: snapshot.score1,
                team2_name: snapshot.team2_name,
                score2: snapshot.score2,
            });
        }
        if notify.time_text {
            self.bus.publish(Event::TimeTextChanged {
                text: snapshot.time_text,
            });
        }
        if notify.run_state {
            tracing::debug!("Timer is {}", snapshot.timer_state.description());
            self.bus.publish(Event::RunStateChanged {
                running: snapshot.run_state.running,
                paused: snapshot.run_state.paused,
            });
        }
    }
}

fn clamp_adjustment(value: i64) -> u64 {
    value.max(0).unsigned_abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn engine() -> (MatchEngine<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let engine = MatchEngine::new(&Config::default(), clock.clone(), EventBus::new());
        (engine, clock)
    }

    fn drain(rx: &crossbeam_channel::Receiver<Event>) -> Vec<Event> {
        rx.try_iter().collect()
    }

    #[test]
    fn test_new_engine_is_zeroed() {
        let (engine, _) = engine();
        assert_eq!(engine.display_score(), (0, 0));
        assert_eq!(engine.team_name(TeamId::Team1), "RED TEAM");
        assert_eq!(engine.team_color(TeamId::Team2).to_hex(), "#1e73be");
        assert_eq!(engine.timer_state(), TimerState::Idle);
        assert_eq!(engine.time_text(), "00:00");
        assert!(engine.absolute_winner().is_none());
    }

    #[test]
    fn test_set_count_publishes_full_snapshot() {
        let (mut engine, _) = engine();
        let (rx, _id) = engine.event_bus().subscribe();

        engine.set_count(TeamId::Team1, TreasureType::Gold, Slot::First, 2);

        let events = drain(&rx);
        assert_eq!(events.len(), 3);
        assert!(events.contains(&Event::ScoreboardChanged {
            team1_name: "RED TEAM".to_string(),
            score1: 30,
            team2_name: "BLUE TEAM".to_string(),
            score2: 0,
        }));
        assert!(events.contains(&Event::TimeTextChanged {
            text: "00:00".to_string()
        }));
        assert!(events.contains(&Event::RunStateChanged {
            running: false,
            paused: false
        }));
    }

    #[test]
    fn test_names_fall_back_when_empty() {
        let (mut engine, _) = engine();
        engine.set_team_names("  Team   A  ", "   ");
        assert_eq!(engine.team_name(TeamId::Team1), "Team A");
        assert_eq!(engine.team_name(TeamId::Team2), "TEAM 2");
    }

    #[test]
    fn test_names_truncated_per_team() {
        let mut config = Config::default();
        config.max_name_length = PerTeam::new(4, 10);
        let mut engine = MatchEngine::new(&config, ManualClock::new(), EventBus::new());

        engine.set_team_names("Dragons", "Dragons of the North");
        assert_eq!(engine.team_name(TeamId::Team1), "Drag");
        assert_eq!(engine.team_name(TeamId::Team2), "Dragons of");
    }

    #[test]
    fn test_color_change_and_rejection() {
        let (mut engine, _) = engine();
        let (rx, _id) = engine.event_bus().subscribe();

        assert!(!engine.set_team_color(TeamId::Team1, "not a color"));
        assert_eq!(engine.team_color(TeamId::Team1).to_hex(), "#e74c3c");

        assert!(!engine.set_team_color(TeamId::Team1, "#E74C3C"), "same color");
        assert!(drain(&rx).is_empty());

        assert!(engine.set_team_color(TeamId::Team1, "gold"));
        assert_eq!(
            drain(&rx),
            vec![Event::TeamColorChanged {
                team: TeamId::Team1,
                color: TeamColor::from_rgb(0xffd700),
            }]
        );
    }

    #[test]
    fn test_penalty_and_bonus_unbounded_above() {
        let (mut engine, _) = engine();
        assert_eq!(engine.set_penalty(TeamId::Team2, -3), 0);
        assert_eq!(engine.set_bonus(TeamId::Team2, 1_000), 1_000);
        assert_eq!(engine.compute_score(TeamId::Team2), 5_000);
        engine.set_penalty(TeamId::Team2, 1_001);
        assert_eq!(engine.compute_score(TeamId::Team2), -5);

        assert_eq!(engine.set_penalty(TeamId::Team1, 5_000_000_000), 5_000_000_000);
        assert_eq!(engine.compute_score(TeamId::Team1), -25_000_000_000);
        // extreme counts saturate the score instead of wrapping
        engine.set_penalty(TeamId::Team1, i64::MAX);
        assert_eq!(engine.compute_score(TeamId::Team1), i64::MIN);
    }

    #[test]
    fn test_toggle_pauses_and_resumes() {
        let (mut engine, clock) = engine();
        engine.set_seconds(30);
        engine.start();
        let (rx, _id) = engine.event_bus().subscribe();

        clock.advance_ms(2_500);
        assert!(engine.toggle());
        assert_eq!(engine.timer_state(), TimerState::Paused);
        assert_eq!(
            drain(&rx),
            vec![
                Event::TimeTextChanged { text: "00:27".to_string() },
                Event::RunStateChanged { running: true, paused: true },
            ]
        );

        clock.advance_ms(10_000);
        assert!(engine.toggle());
        assert_eq!(engine.timer_state(), TimerState::Running);
        assert_eq!(
            drain(&rx),
            vec![Event::RunStateChanged { running: true, paused: false }]
        );

        clock.advance_ms(7_500);
        engine.tick();
        assert_eq!(engine.seconds_remaining(), 20);
    }

    #[test]
    fn test_absolute_win_toggle() {
        let (mut engine, _) = engine();
        assert_eq!(engine.set_absolute_win(Some(TeamId::Team2)), AbsoluteWinChange::Declared(TeamId::Team2));
        assert_eq!(engine.display_score(), (0, 1));
        assert_eq!(engine.timer_state(), TimerState::AbsoluteWinLock);

        assert_eq!(engine.set_absolute_win(Some(TeamId::Team2)), AbsoluteWinChange::Cleared);
        assert!(engine.absolute_winner().is_none());
        assert_eq!(engine.set_absolute_win(None), AbsoluteWinChange::Unchanged);
    }

    #[test]
    fn test_rejected_absolute_win_publishes_nothing() {
        let (mut engine, _) = engine();
        engine.set_absolute_win(Some(TeamId::Team1));
        let (rx, _id) = engine.event_bus().subscribe();

        assert_eq!(
            engine.set_absolute_win(Some(TeamId::Team2)),
            AbsoluteWinChange::Rejected { current: TeamId::Team1 }
        );
        assert!(drain(&rx).is_empty());
        assert_eq!(engine.absolute_winner(), Some(TeamId::Team1));
    }

    #[test]
    fn test_absolute_win_freezes_running_timer() {
        let (mut engine, clock) = engine();
        engine.set_seconds(120);
        assert!(engine.start());
        clock.advance_ms(15_300);

        engine.set_absolute_win(Some(TeamId::Team1));
        assert_eq!(engine.seconds_remaining(), 104);
        assert_eq!(engine.run_state(), RunState::default());

        // timer commands and ticks are inert while locked
        assert!(!engine.start());
        assert!(!engine.toggle());
        clock.advance_ms(5_000);
        assert!(engine.tick().is_empty());
        assert_eq!(engine.seconds_remaining(), 104);
    }

    #[test]
    fn test_set_seconds_clears_absolute_win() {
        let (mut engine, _) = engine();
        engine.set_absolute_win(Some(TeamId::Team1));
        engine.set_seconds(-10);
        assert!(engine.absolute_winner().is_none());
        assert_eq!(engine.seconds_remaining(), 0);
        assert!(!engine.start());
    }

    #[test]
    fn test_reset_scoring_keeps_timer_and_names() {
        let (mut engine, clock) = engine();
        engine.set_team_names("Alpha", "Beta");
        engine.set_seconds(60);
        engine.start();
        engine.set_count(TeamId::Team1, TreasureType::Stone, Slot::Second, 2);
        engine.set_penalty(TeamId::Team2, 4);
        engine.set_point_value(TreasureType::Stone, Slot::Second, 100);
        clock.advance_ms(1_000);

        engine.reset_scoring();

        assert_eq!(engine.display_score(), (0, 0));
        assert_eq!(engine.penalty(TeamId::Team2), 0);
        assert_eq!(engine.rules(), &ScoringRules::default());
        assert_eq!(engine.team_name(TeamId::Team1), "Alpha");
        assert!(engine.run_state().running);
    }

    #[test]
    fn test_reset_timer_keeps_scores() {
        let (mut engine, _) = engine();
        engine.set_count(TeamId::Team2, TreasureType::Diamond, Slot::First, 1);
        engine.set_seconds(30);
        engine.start();
        engine.set_absolute_win(Some(TeamId::Team2));

        engine.reset_timer();

        assert!(engine.absolute_winner().is_none());
        assert_eq!(engine.seconds_remaining(), 0);
        assert_eq!(engine.timer_state(), TimerState::Idle);
        assert_eq!(engine.display_score(), (0, 30));
    }

    #[test]
    fn test_point_value_changes_score_not_counts() {
        let (mut engine, _) = engine();
        engine.set_count(TeamId::Team1, TreasureType::Gold, Slot::Third, 1);
        assert_eq!(engine.compute_score(TeamId::Team1), 20);

        engine.set_point_value(TreasureType::Gold, Slot::Third, 50);
        assert_eq!(engine.compute_score(TeamId::Team1), 50);

        engine.reset_rules();
        assert_eq!(engine.compute_score(TeamId::Team1), 20);
        assert_eq!(engine.count(TeamId::Team1, TreasureType::Gold, Slot::Third), 1);
    }

    #[test]
    fn test_pause_publishes_time_and_run_state() {
        let (mut engine, clock) = engine();
        engine.set_seconds(10);
        engine.start();
        clock.advance_ms(2_500);
        let (rx, _id) = engine.event_bus().subscribe();

        assert!(engine.pause());
        let events = drain(&rx);
        assert!(events.contains(&Event::TimeTextChanged {
            text: "00:07".to_string()
        }));
        assert!(events.contains(&Event::RunStateChanged {
            running: true,
            paused: true
        }));
        assert!(!engine.pause());
    }

    #[test]
    fn test_tick_publishes_cues() {
        let (mut engine, clock) = engine();
        engine.set_seconds(5);
        engine.start();
        let (rx, _id) = engine.event_bus().subscribe();

        clock.advance_ms(1_000);
        engine.tick();
        assert_eq!(
            drain(&rx),
            vec![
                Event::Cue { kind: crate::state::CueKind::NearEnd },
                Event::TimeTextChanged { text: "00:04".to_string() },
            ]
        );

        clock.advance_ms(4_000);
        engine.tick();
        let events = drain(&rx);
        assert_eq!(events[0], Event::Cue { kind: crate::state::CueKind::Expired });
        assert!(events.contains(&Event::RunStateChanged {
            running: false,
            paused: false
        }));
        assert_eq!(engine.timer_state(), TimerState::Expired);
    }

    #[test]
    fn test_snapshot_is_consistent() {
        let (mut engine, _) = engine();
        engine.set_count(TeamId::Team1, TreasureType::Stone, Slot::First, 1);
        engine.set_seconds(75);

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.score1, 5);
        assert_eq!(snapshot.time_text, "01:15");
        assert_eq!(snapshot.timer_state, TimerState::Idle);
        assert_eq!(snapshot.colors.team1, engine.team_color(TeamId::Team1));
    }
}
