//! AI target selection.
//!
//! Behaviors are shared read-only records; a unit points at one by
//! [`BehaviorId`]. Selection is a single scan over the candidates that only
//! replaces the current best on strict improvement, so among equally good
//! candidates the first one offered wins.
use std::cmp::Ordering;

use crate::state::Unit;

/// How an AI unit ranks candidate targets.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Default,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TargetPriority {
    #[default]
    Closest,
    Furthest,
    LowestHealth,
    HighestHealth,
}

impl TargetPriority {
    /// Ordering of `candidate` against the current `best`; `Greater` means
    /// the candidate is preferred.
    fn compare(self, asker: &Unit, candidate: &Unit, best: &Unit) -> Ordering {
        match self {
            Self::Closest => {
                let candidate = asker.position.euclidean_sq(candidate.position);
                let best = asker.position.euclidean_sq(best.position);
                best.cmp(&candidate)
            }
            Self::Furthest => {
                let candidate = asker.position.euclidean_sq(candidate.position);
                let best = asker.position.euclidean_sq(best.position);
                candidate.cmp(&best)
            }
            Self::LowestHealth => best.health().cmp(&candidate.health()),
            Self::HighestHealth => candidate.health().cmp(&best.health()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BehaviorId(pub u16);

/// Named AI behavior. Two behaviors are the same behavior iff their ids match.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitBehavior {
    pub id: BehaviorId,
    pub name: String,
    pub priority: TargetPriority,
}

impl UnitBehavior {
    pub fn new(id: BehaviorId, name: impl Into<String>, priority: TargetPriority) -> Self {
        Self {
            id,
            name: name.into(),
            priority,
        }
    }
}

impl PartialEq for UnitBehavior {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for UnitBehavior {}

/// Picks the preferred target among `candidates`.
///
/// The caller filters candidates (living, hostile); this only ranks them.
/// Returns `None` for an empty candidate list.
pub fn select_target<'a>(
    asker: &Unit,
    candidates: impl IntoIterator<Item = &'a Unit>,
    priority: TargetPriority,
) -> Option<&'a Unit> {
    let mut best: Option<&'a Unit> = None;
    for candidate in candidates {
        best = match best {
            None => Some(candidate),
            Some(current) if priority.compare(asker, candidate, current) == Ordering::Greater => {
                Some(candidate)
            }
            keep => keep,
        };
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Coordinate;
    use crate::state::{TeamId, UnitId};

    fn unit(id: u32, x: i32, y: i32, health: u32) -> Unit {
        Unit::new(UnitId(id), TeamId(1), Coordinate::new(x, y), 20, 4, "claws")
            .with_health(health)
    }

    #[test]
    fn closest_uses_euclidean_distance() {
        let asker = unit(0, 0, 0, 20);
        // (3, 3) is 18 away squared, (0, 4) is 16: Manhattan would pick wrong.
        let candidates = [unit(1, 3, 3, 20), unit(2, 0, 4, 20)];

        let chosen = select_target(&asker, &candidates, TargetPriority::Closest).unwrap();
        assert_eq!(chosen.id, UnitId(2));

        let chosen = select_target(&asker, &candidates, TargetPriority::Furthest).unwrap();
        assert_eq!(chosen.id, UnitId(1));
    }

    #[test]
    fn health_priorities() {
        let asker = unit(0, 0, 0, 20);
        let candidates = [unit(1, 1, 0, 12), unit(2, 2, 0, 3), unit(3, 3, 0, 17)];

        let lowest = select_target(&asker, &candidates, TargetPriority::LowestHealth).unwrap();
        assert_eq!(lowest.id, UnitId(2));

        let highest = select_target(&asker, &candidates, TargetPriority::HighestHealth).unwrap();
        assert_eq!(highest.id, UnitId(3));
    }

    #[test]
    fn first_candidate_wins_ties() {
        let asker = unit(0, 0, 0, 20);
        let candidates = [unit(1, 2, 0, 5), unit(2, 0, 2, 5), unit(3, -2, 0, 5)];

        for priority in [
            TargetPriority::Closest,
            TargetPriority::Furthest,
            TargetPriority::LowestHealth,
            TargetPriority::HighestHealth,
        ] {
            let chosen = select_target(&asker, &candidates, priority).unwrap();
            assert_eq!(chosen.id, UnitId(1), "{priority}");
        }
    }

    #[test]
    fn no_candidates_no_target() {
        let asker = unit(0, 0, 0, 20);
        assert!(select_target(&asker, &[], TargetPriority::Closest).is_none());
    }

    #[test]
    fn priority_parses_from_snake_case() {
        assert_eq!("lowest_health".parse(), Ok(TargetPriority::LowestHealth));
        assert_eq!("Closest".parse(), Ok(TargetPriority::Closest));
        assert!("random".parse::<TargetPriority>().is_err());
    }

    #[test]
    fn behaviors_compare_by_id() {
        let a = UnitBehavior::new(BehaviorId(1), "Sniper", TargetPriority::Furthest);
        let b = UnitBehavior::new(BehaviorId(1), "Renamed", TargetPriority::Closest);
        let c = UnitBehavior::new(BehaviorId(2), "Sniper", TargetPriority::Furthest);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
