//! Dot-command parsing (`.take 3 elm`, `.dead 1-10`, ...).
//!
//! Parsing is separate from execution so every command shape can be tested
//! without a [`crate::Bot`]. Command names are case-insensitive; free-text
//! arguments (`.fc`, `.call`, `.host`) keep their case.

use worldbot_types::Location;

use crate::error::WaveError;
use crate::parse::parse_range;

/// Worlds handed out by a bare `.take`.
pub const DEFAULT_TAKE_COUNT: usize = 5;

/// Which worlds a `.dead` command targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeadTarget {
    /// Every whitelisted world in an inclusive range.
    Range(u32, u32),
    /// An explicit list of worlds.
    Worlds(Vec<u32>),
}

/// A parsed dot-command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `.help` / `.guide`: usage text.
    Help,
    /// `.version`.
    Version,
    /// `.instance`: this process's instance id.
    Instance,
    /// `.debug`: registry dump.
    Debug,
    /// `.ignoremode [disable]`.
    IgnoreMode {
        /// `true` for `.ignoremode disable`.
        disable: bool,
    },
    /// `.wbs`: time until the next wave.
    Wbs,
    /// `.reset`: wave summary, then a fresh wave.
    Reset,
    /// `.host [name]`: defaults to the caller.
    Host(Option<String>),
    /// `.scout`: add the caller to the scouts.
    Scout,
    /// `.anti`: add the caller to anti.
    Anti,
    /// `.call <text>`: append to the call history.
    Call(String),
    /// `.dead` / `.d`.
    Dead(DeadTarget),
    /// `.take` / `.t`, and `.taked` / `.td` with `sweep` set.
    Take {
        /// How many worlds to hand out.
        count: usize,
        /// Where the worlds must be.
        location: Location,
        /// Mark the caller's unreported worlds dead first.
        sweep: bool,
    },
    /// `.fc [name]`: show or set the friends chat.
    Fc(Option<String>),
}

impl Command {
    /// Parse `content` as a dot-command.
    ///
    /// Returns `Ok(None)` if `content` does not start with `.` or names an
    /// unknown command.
    ///
    /// # Errors
    ///
    /// Returns a [`WaveError`] when a known command has bad arguments.
    pub fn parse(content: &str) -> Result<Option<Self>, WaveError> {
        let Some(body) = content.trim().strip_prefix('.') else {
            return Ok(None);
        };
        let (name, rest) = body
            .split_once(char::is_whitespace)
            .map_or((body, ""), |(name, rest)| (name, rest.trim()));
        let args: Vec<&str> = rest.split_whitespace().collect();
        let text = (!rest.is_empty()).then(|| rest.to_owned());

        let command = match name.to_lowercase().as_str() {
            "help" | "guide" => Self::Help,
            "version" => Self::Version,
            "instance" => Self::Instance,
            "debug" => Self::Debug,
            "ignoremode" => Self::IgnoreMode {
                disable: args.first().is_some_and(|a| a.eq_ignore_ascii_case("disable")),
            },
            "wbs" => Self::Wbs,
            "reset" => Self::Reset,
            "host" => Self::Host(args.first().map(|a| (*a).to_owned())),
            "scout" => Self::Scout,
            "anti" => Self::Anti,
            "call" => match text {
                Some(text) => Self::Call(text),
                None => return Ok(None),
            },
            "dead" | "d" => Self::Dead(parse_dead_target(&args)?),
            "take" | "t" => parse_take(&args, false)?,
            "taked" | "td" => parse_take(&args, true)?,
            "fc" => Self::Fc(text),
            _ => return Ok(None),
        };
        Ok(Some(command))
    }
}

fn parse_dead_target(args: &[&str]) -> Result<DeadTarget, WaveError> {
    if let Some((lower, upper)) = args.first().and_then(|a| parse_range(a)) {
        return Ok(DeadTarget::Range(lower, upper));
    }
    args.iter()
        .map(|a| {
            a.parse::<u32>()
                .map_err(|_err| WaveError::MalformedNumber((*a).to_owned()))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(DeadTarget::Worlds)
}

fn parse_take(args: &[&str], sweep: bool) -> Result<Command, WaveError> {
    let count = match args.first() {
        Some(arg) => arg
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| WaveError::InvalidCount((*arg).to_owned()))?,
        None => DEFAULT_TAKE_COUNT,
    };
    let location = match args.get(1) {
        Some(arg) => arg
            .parse::<Location>()
            .map_err(|_err| WaveError::InvalidLocation((*arg).to_owned()))?,
        None => Location::Unknown,
    };
    Ok(Command::Take {
        count,
        location,
        sweep,
    })
}

/// Usage text for `.help`.
pub const GUIDE: &str = "\
**Worldbot instructions**

Commands start with a `.`; anything starting with a number is a world update.

General:
- **.help** - show this message
- **.version** - show the bot version
- **.wbs** - time until the next wave

Wave management:
- **.host [user]** - set the host, defaults to you
- **.scout** / **.anti** - add yourself to the scouts / anti
- **.fc [name]** - show or set the in-game fc
- **.call <text>** - add <text> to the call history
- **.reset** - print the wave summary and start a fresh wave

Scouting:
- **list** - show the current status
- **.take [n] [loc]** / **.t** - take n (default 5) unscouted worlds at loc (default unk)
- **.taked [n] [loc]** / **.td** - same, but first mark your unreported worlds dead
- **.dead <worlds...>** / **.d** - mark worlds dead; `.d 1-10` marks a range

World updates (spaces optional, e.g. `10elmhcf7`):
- `dwf` `elm` `rdi` `unk` - location
- `dead`, `beaming` - state
- `dies :07` - dies at :07
- any three of `hcmfs` - tents
- `beamed :02`, `broken :02` - beamed/broken at :02 (now if omitted)
- `xx:xx gc` or `xx:xx` - game clock remaining; `xx:xx mins` for real time
- `mg`, `minigames`, `*` - mark suspicious
- anything else - notes

Examples: `119dwf 10gc`, `119 mhs 4:30mins`, `28 dead`, `84 beamed02 hcf clear`";
