// Synthesis voices accepted by the target API.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the eleven synthesis voices the endpoint accepts.
///
/// A run cycles through the voices deterministically by request
/// sequence number, so every voice is exercised regardless of how the
/// run ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Voice {
    Alloy,
    Ash,
    Ballad,
    Coral,
    Echo,
    Fable,
    Onyx,
    Nova,
    Sage,
    Shimmer,
    Verse,
}

impl Voice {
    /// Every voice, in cycling order.
    pub const ALL: [Voice; 11] = [
        Voice::Alloy,
        Voice::Ash,
        Voice::Ballad,
        Voice::Coral,
        Voice::Echo,
        Voice::Fable,
        Voice::Onyx,
        Voice::Nova,
        Voice::Sage,
        Voice::Shimmer,
        Voice::Verse,
    ];

    /// Voice assigned to the `sequence`-th request of a run:
    /// `ALL[(sequence - 1) % 11]`. Sequence numbers start at 1.
    pub fn for_sequence(sequence: u64) -> Voice {
        let idx = sequence.saturating_sub(1) % Self::ALL.len() as u64;
        Self::ALL[idx as usize]
    }

    /// The wire label for this voice.
    pub fn as_str(&self) -> &'static str {
        match self {
            Voice::Alloy => "alloy",
            Voice::Ash => "ash",
            Voice::Ballad => "ballad",
            Voice::Coral => "coral",
            Voice::Echo => "echo",
            Voice::Fable => "fable",
            Voice::Onyx => "onyx",
            Voice::Nova => "nova",
            Voice::Sage => "sage",
            Voice::Shimmer => "shimmer",
            Voice::Verse => "verse",
        }
    }
}

impl fmt::Display for Voice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
