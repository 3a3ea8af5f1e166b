//! The four behavioural states.

/// What an agent is currently up to.
///
/// | State       | Doing                                              | Colour    |
/// |-------------|----------------------------------------------------|-----------|
/// | `Thinking`  | waiting for a route to a random destination        | `#99ffff` |
/// | `Moving`    | following that route, watching for victims        | `#00ff00` |
/// | `Stalking`  | closing in on a chosen victim                      | `#ff8800` |
/// | `Loitering` | idling at the end of a route, watching for victims | `#ff00ff` |
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum AgentState {
    #[default]
    Thinking,
    Moving,
    Stalking,
    Loitering,
}

impl AgentState {
    pub const ALL: [AgentState; 4] = [
        AgentState::Thinking,
        AgentState::Moving,
        AgentState::Stalking,
        AgentState::Loitering,
    ];

    /// Display colour for renderers.
    pub const fn colour(self) -> &'static str {
        match self {
            AgentState::Thinking  => "#99ffff",
            AgentState::Moving    => "#00ff00",
            AgentState::Stalking  => "#ff8800",
            AgentState::Loitering => "#ff00ff",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AgentState::Thinking  => "thinking",
            AgentState::Moving    => "moving",
            AgentState::Stalking  => "stalking",
            AgentState::Loitering => "loitering",
        }
    }
}

impl std::fmt::Display for AgentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
