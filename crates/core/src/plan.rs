#![forbid(unsafe_code)]

//! Pure position arithmetic.
//!
//! The planner never looks at rows. Callers describe where a record sits
//! today and how many listed records the target list holds; the planner
//! answers with the range shifts and the final position that keep the list
//! numbered `1..=n` without gaps or duplicates.

use crate::condition::Condition;

/// Where the record sits before an insert.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Membership {
    Unlisted,
    /// Listed in the target list at this position.
    Listed(i64),
    /// Listed at this position in some other list.
    Elsewhere(i64),
}

/// Add `delta` to every position in `from..=to` (`to: None` is unbounded).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Shift {
    pub from: i64,
    pub to: Option<i64>,
    pub delta: i64,
}

impl Shift {
    pub fn condition(&self, column: &str) -> Condition {
        Condition::range(column, Some(self.from), self.to)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InsertPlan {
    /// Compaction of the list the record leaves.
    pub vacate: Option<Shift>,
    /// Room made in the target list.
    pub make_room: Option<Shift>,
    pub position: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Higher,
    Lower,
}

/// Clamp `target` into `1..=listed + 1`, where `listed` excludes the record.
pub fn clamp_target(target: i64, listed: i64) -> i64 {
    target.clamp(1, listed.max(0) + 1)
}

/// Plans `insert_at`. Returns `None` when the record already sits there.
///
/// `listed` counts the target list without the record itself.
pub fn plan_insert(membership: Membership, target: i64, listed: i64) -> Option<InsertPlan> {
    let position = clamp_target(target, listed);
    match membership {
        Membership::Listed(old) if old == position => None,
        Membership::Listed(old) if position < old => Some(InsertPlan {
            vacate: None,
            make_room: Some(Shift {
                from: position,
                to: Some(old - 1),
                delta: 1,
            }),
            position,
        }),
        Membership::Listed(old) => Some(InsertPlan {
            vacate: None,
            make_room: Some(Shift {
                from: old + 1,
                to: Some(position),
                delta: -1,
            }),
            position,
        }),
        Membership::Unlisted | Membership::Elsewhere(_) => Some(InsertPlan {
            vacate: match membership {
                Membership::Elsewhere(old) => Some(plan_removal(old)),
                _ => None,
            },
            make_room: (position <= listed).then_some(Shift {
                from: position,
                to: None,
                delta: 1,
            }),
            position,
        }),
    }
}

/// Compaction after the record at `old` leaves its list.
pub fn plan_removal(old: i64) -> Shift {
    Shift {
        from: old + 1,
        to: None,
        delta: -1,
    }
}

/// Position of the neighbour a swap exchanges with, or `None` at the boundary.
///
/// `listed` counts the whole list, the record included.
pub fn swap_partner(position: i64, direction: Direction, listed: i64) -> Option<i64> {
    match direction {
        Direction::Higher if position > 1 => Some(position - 1),
        Direction::Lower if position < listed => Some(position + 1),
        _ => None,
    }
}
