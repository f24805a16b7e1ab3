/// Line-oriented operator console
///
/// Turns typed lines into engine commands. This is the text counterpart of a
/// control panel: every line maps to exactly one `Command`.
use crate::error::CommandParseError;
use crate::messaging::Command;
use crate::state::{Slot, TeamId, TreasureType};
use crate::time_text::parse_time_text;

pub const HELP: &str = "\
Commands:
  names <team 1> | <team 2>         rename both teams
  color <team> <#rrggbb|name>       recolor a team
  count <team> <type> <slot> <n>    set stone/gold/diamond count in slot 1-3
  penalty <team> <n>                number of -5 infractions
  bonus <team> <n>                  number of +5 credits
  win <team|none>                   toggle absolute win
  points <type> <slot> <n>          change a point value
  reset-points                      restore the configured point table
  reset-score                       zero all scoring
  time <mm:ss|seconds>              set the countdown
  preset <n>                        use time preset n (1-based)
  start | pause | resume | toggle   timer control (space = toggle)
  reset-timer                       zero the countdown
  status                            print the current state
  quit";

/// Parse one console line
pub fn parse_line(line: &str, presets: &[u64]) -> Result<Command, CommandParseError> {
    // A lone space is the toggle shortcut
    if line == " " {
        return Ok(Command::Toggle);
    }

    let line = line.trim();
    let (keyword, rest) = line
        .split_once(char::is_whitespace)
        .map(|(k, r)| (k, r.trim()))
        .unwrap_or((line, ""));
    let mut args = rest.split_whitespace();

    let command = match keyword.to_ascii_lowercase().as_str() {
        "" => return Err(CommandParseError::Empty),
        "names" => {
            let (team1, team2) = rest.split_once('|').unwrap_or((rest, ""));
            Command::SetTeamNames {
                team1: team1.to_string(),
                team2: team2.to_string(),
            }
        }
        "color" => Command::SetTeamColor {
            team: team_arg(args.next(), "color")?,
            color: required(args.next(), "color", "value")?.to_string(),
        },
        "count" => Command::SetCount {
            team: team_arg(args.next(), "count")?,
            treasure: treasure_arg(args.next(), "count")?,
            slot: slot_arg(args.next(), "count")?,
            value: number_arg(args.next(), "count")?,
        },
        "penalty" => Command::SetPenalty {
            team: team_arg(args.next(), "penalty")?,
            value: number_arg(args.next(), "penalty")?,
        },
        "bonus" => Command::SetBonus {
            team: team_arg(args.next(), "bonus")?,
            value: number_arg(args.next(), "bonus")?,
        },
        "win" => {
            let arg = required(args.next(), "win", "team")?;
            let winner = if arg.eq_ignore_ascii_case("none") {
                None
            } else {
                Some(parse_team(arg)?)
            };
            Command::SetAbsoluteWin { winner }
        }
        "points" => {
            let treasure = treasure_arg(args.next(), "points")?;
            let slot = slot_arg(args.next(), "points")?;
            let value = number_arg(args.next(), "points")?;
            Command::SetPointValue {
                treasure,
                slot,
                value: u32::try_from(value.max(0)).unwrap_or(u32::MAX),
            }
        }
        "reset-points" => Command::ResetRules,
        "reset-score" => Command::ResetScoring,
        "time" => Command::SetSeconds {
            seconds: seconds_arg(parse_time_text(rest)),
        },
        "preset" => {
            let index: usize = required(args.next(), "preset", "n")
                .and_then(|n| n.parse().map_err(|_| CommandParseError::InvalidNumber(n.to_string())))?;
            let seconds = index
                .checked_sub(1)
                .and_then(|i| presets.get(i))
                .ok_or(CommandParseError::UnknownPreset(index))?;
            Command::SetSeconds {
                seconds: seconds_arg(*seconds),
            }
        }
        "start" | "s" => Command::Start,
        "pause" | "p" => Command::Pause,
        "resume" | "c" => Command::Resume,
        "toggle" | "space" => Command::Toggle,
        "reset-timer" => Command::ResetTimer,
        "status" => Command::PublishSnapshot,
        "quit" | "exit" => Command::Quit,
        other => return Err(CommandParseError::UnknownCommand(other.to_string())),
    };

    Ok(command)
}

fn required<'a>(
    arg: Option<&'a str>,
    command: &'static str,
    name: &'static str,
) -> Result<&'a str, CommandParseError> {
    arg.ok_or(CommandParseError::MissingArgument { command, arg: name })
}

fn parse_team(arg: &str) -> Result<TeamId, CommandParseError> {
    arg.parse::<u8>()
        .ok()
        .and_then(|n| TeamId::try_from(n).ok())
        .ok_or_else(|| CommandParseError::InvalidTeam(arg.to_string()))
}

fn team_arg(arg: Option<&str>, command: &'static str) -> Result<TeamId, CommandParseError> {
    parse_team(required(arg, command, "team")?)
}

fn treasure_arg(arg: Option<&str>, command: &'static str) -> Result<TreasureType, CommandParseError> {
    let arg = required(arg, command, "type")?;
    TreasureType::from_name(arg).ok_or_else(|| CommandParseError::InvalidTreasure(arg.to_string()))
}

fn slot_arg(arg: Option<&str>, command: &'static str) -> Result<Slot, CommandParseError> {
    let arg = required(arg, command, "slot")?;
    arg.parse::<u8>()
        .ok()
        .and_then(|n| Slot::try_from(n).ok())
        .ok_or_else(|| CommandParseError::InvalidSlot(arg.to_string()))
}

/// Oversized durations clamp to the largest representable count
fn seconds_arg(seconds: u64) -> i64 {
    i64::try_from(seconds).unwrap_or(i64::MAX)
}

fn number_arg(arg: Option<&str>, command: &'static str) -> Result<i64, CommandParseError> {
    let arg = required(arg, command, "n")?;
    arg.parse()
        .map_err(|_| CommandParseError::InvalidNumber(arg.to_string()))
}
