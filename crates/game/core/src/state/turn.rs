use super::TeamId;

/// Turn bookkeeping for a match.
///
/// Teams act in alternation; within a team's turn units act strictly one
/// after another. The nonce increments with every resolved action and feeds
/// the deterministic roll seeds.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnState {
    /// Completed rounds; a round ends when every team has had a turn.
    pub round: u32,

    /// Team whose units may act.
    pub active_team: TeamId,

    /// Action sequence number.
    pub nonce: u64,
}

impl TurnState {
    pub fn new(first_team: TeamId) -> Self {
        Self {
            round: 0,
            active_team: first_team,
            nonce: 0,
        }
    }

    /// Returns the current nonce and advances it.
    pub fn next_nonce(&mut self) -> u64 {
        let nonce = self.nonce;
        self.nonce += 1;
        nonce
    }
}
