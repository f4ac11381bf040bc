//! Combat resolution system.
//!
//! Pure functions for resolving attacks. All combat logic is deterministic
//! and side-effect free; callers apply the resulting damage to the target.
//!
//! # Core Functions
//!
//! - `resolve_precision`: range legality, distance malus and cover
//! - `resolve_attack`: hit roll + damage roll
//! - `apply_affinities`: resistance/weakness adjustment
pub mod cover;
pub mod damage;
pub mod precision;
pub mod result;
pub mod weapon;

pub use cover::{CoverTable, CoverType};
pub use damage::{
    Affinities, DamageModifiers, DamagePolicy, apply_affinities, roll_damage,
};
pub use precision::{
    AppliedCover, MAX_PRECISION, OutOfRangeAttack, PrecisionReport, PrecisionRequest,
    check_hit, check_range, resolve_precision,
};
pub use result::{AttackOutcome, AttackResult, AttackSeeds, DamageRoll, resolve_attack};
pub use weapon::{
    AmmoRequirement, AttackRange, DamageRange, DamageType, DamageTypes, WeaponData, WeaponError,
};
