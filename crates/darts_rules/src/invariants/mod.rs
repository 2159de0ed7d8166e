//! Properties a leg must satisfy after every submit, undo, and restore.
//!
//! Each one lives in its own module and is checked by the turn contract's
//! postcondition in debug builds.

mod contiguous_sequence;
mod remaining_cache;
mod winner_consistent;

pub use contiguous_sequence::ContiguousSequenceInvariant;
pub use remaining_cache::RemainingCacheInvariant;
pub use winner_consistent::WinnerConsistentInvariant;

/// A property checked against a whole state.
pub trait Invariant<S> {
    /// True when the property holds.
    fn holds(state: &S) -> bool;

    /// What the property promises, used in violation reports.
    fn description() -> &'static str;
}

/// A failed invariant, named by its description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
#[display("{}", description)]
pub struct InvariantViolation {
    /// The failed invariant's description.
    pub description: &'static str,
}

/// Invariants checked as one tuple, reporting every failure.
pub trait InvariantSet<S> {
    /// Checks every member.
    ///
    /// # Errors
    ///
    /// Returns each violated invariant, in tuple order.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

fn violations_of(
    checks: impl IntoIterator<Item = (bool, &'static str)>,
) -> Result<(), Vec<InvariantViolation>> {
    let violations: Vec<InvariantViolation> = checks
        .into_iter()
        .filter(|(held, _)| !held)
        .map(|(_, description)| InvariantViolation { description })
        .collect();
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

impl<S, I1, I2> InvariantSet<S> for (I1, I2)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        violations_of([
            (I1::holds(state), I1::description()),
            (I2::holds(state), I2::description()),
        ])
    }
}

impl<S, I1, I2, I3> InvariantSet<S> for (I1, I2, I3)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        violations_of([
            (I1::holds(state), I1::description()),
            (I2::holds(state), I2::description()),
            (I3::holds(state), I3::description()),
        ])
    }
}

/// Every invariant a leg must satisfy between calls.
pub type LegInvariants = (
    ContiguousSequenceInvariant,
    WinnerConsistentInvariant,
    RemainingCacheInvariant,
);
