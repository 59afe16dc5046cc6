//! Team Registry
//!
//! The four competing teams, fixed at build time. Registry order is render
//! order.

/// A competing team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Team {
    /// Display name, also the key used by the totals API
    pub name: &'static str,
    /// Icon shown next to the name
    pub icon: &'static str,
}

/// All teams, in render order
pub const TEAMS: [Team; 4] = [
    Team { name: "Gryff", icon: "🦁" },
    Team { name: "Slyth", icon: "🐍" },
    Team { name: "Raven", icon: "🦅" },
    Team { name: "Huff", icon: "🦡" },
];

/// Look up a team by its display name
pub fn find_team(name: &str) -> Option<&'static Team> {
    TEAMS.iter().find(|team| team.name == name)
}
