//! Tracked players grouped by position.
//!
//! The roster is read once from the `[gk]`, `[df]`, `[mf]` and `[fw]`
//! sections of the config file. Each key is a player slug and each value is
//! `<team>, <role>`. Declaration order is kept and becomes row order in the
//! output tables.

use std::fmt;
use std::str::FromStr;

use crate::domain::error::BoardError;
use crate::domain::position::Position;
use crate::ports::config_port::ConfigPort;

/// Projected playing-time role. Display-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Starter,
    LikelyStarter,
    LeanStarter,
    LeanBackup,
    LikelyBackup,
    Backup,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::Starter,
        Role::LikelyStarter,
        Role::LeanStarter,
        Role::LeanBackup,
        Role::LikelyBackup,
        Role::Backup,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Role::Starter => "Starter",
            Role::LikelyStarter => "Likely Starter",
            Role::LeanStarter => "Lean Starter",
            Role::LeanBackup => "Lean Backup",
            Role::LikelyBackup => "Likely Backup",
            Role::Backup => "Backup",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ");
        Role::ALL
            .into_iter()
            .find(|r| r.label().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| format!("unknown role '{}'", s.trim()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerEntry {
    pub slug: String,
    pub team: String,
    pub role: Role,
    pub position: Position,
}

impl PlayerEntry {
    /// `roman-celentano` on `CIN` becomes `Celentano (CIN)`.
    pub fn display_name(&self) -> String {
        format!("{} ({})", last_name_from_slug(&self.slug), self.team)
    }
}

pub fn last_name_from_slug(slug: &str) -> String {
    let last = slug.rsplit('-').next().unwrap_or(slug);
    let mut chars = last.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Immutable roster, one player list per position in the fixed order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    groups: Vec<(Position, Vec<PlayerEntry>)>,
}

impl Roster {
    pub fn new(mut groups: Vec<(Position, Vec<PlayerEntry>)>) -> Self {
        for position in Position::ALL {
            if !groups.iter().any(|(p, _)| *p == position) {
                groups.push((position, Vec::new()));
            }
        }
        groups.sort_by_key(|(p, _)| *p);
        Self { groups }
    }

    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, BoardError> {
        let mut groups = Vec::with_capacity(Position::ALL.len());
        for position in Position::ALL {
            let mut entries = Vec::new();
            for slug in config.section_keys(position.key()) {
                let value = config.get_string(position.key(), &slug);
                entries.push(parse_entry(position, &slug, value.as_deref())?);
            }
            groups.push((position, entries));
        }

        let roster = Self::new(groups);
        if roster.player_count() == 0 {
            return Err(BoardError::EmptyRoster);
        }
        Ok(roster)
    }

    pub fn players(&self, position: Position) -> &[PlayerEntry] {
        self.groups
            .iter()
            .find(|(p, _)| *p == position)
            .map(|(_, entries)| entries.as_slice())
            .unwrap_or(&[])
    }

    pub fn groups(&self) -> impl Iterator<Item = (Position, &[PlayerEntry])> {
        self.groups.iter().map(|(p, e)| (*p, e.as_slice()))
    }

    pub fn player_count(&self) -> usize {
        self.groups.iter().map(|(_, e)| e.len()).sum()
    }
}

fn parse_entry(
    position: Position,
    slug: &str,
    value: Option<&str>,
) -> Result<PlayerEntry, BoardError> {
    let fail = |reason: String| BoardError::RosterEntry {
        position: position.code().to_string(),
        slug: slug.to_string(),
        reason,
    };

    if slug.is_empty()
        || !slug
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
    {
        return Err(fail("slug must contain only a-z, 0-9 and '-'".to_string()));
    }

    let value = value.ok_or_else(|| fail("expected '<team>, <role>'".to_string()))?;
    let fields: Vec<&str> = value.split(',').map(str::trim).collect();
    let [team, role] = fields.as_slice() else {
        return Err(fail(format!(
            "expected '<team>, <role>', got {} field(s)",
            fields.len()
        )));
    };
    if team.is_empty() {
        return Err(fail("team is empty".to_string()));
    }
    let role = role.parse::<Role>().map_err(fail)?;

    Ok(PlayerEntry {
        slug: slug.to_string(),
        team: team.to_string(),
        role,
        position,
    })
}
