//! Dice-shape validators.
//!
//! Every activation names the dice it wants by index into the player's
//! pool. These helpers check the indices and the shape of the values
//! they point at; none of them mutate the pool.

use smallvec::SmallVec;

use crate::core::{ActionError, ActionResult};

/// Dice values picked out of a pool.
pub type DiceValues = SmallVec<[u8; 4]>;

/// Check that exactly `n` indices are given and that none repeat.
pub fn check_values_unique(indices: &[usize], n: usize) -> ActionResult<()> {
    if indices.len() != n {
        return Err(ActionError::selection(format!(
            "expected {} dice, got {}",
            n,
            indices.len()
        )));
    }
    let mut seen: SmallVec<[usize; 8]> = SmallVec::new();
    for &i in indices {
        if seen.contains(&i) {
            return Err(ActionError::selection(format!("die {} selected twice", i)));
        }
        seen.push(i);
    }
    Ok(())
}

/// Look up the values at `selection`, failing on any index the pool doesn't have.
pub fn dice_values(dice: &[u8], selection: &[usize]) -> ActionResult<DiceValues> {
    selection
        .iter()
        .map(|&i| {
            dice.get(i)
                .copied()
                .ok_or_else(|| ActionError::not_owned(format!("die index {}", i)))
        })
        .collect()
}

/// Every index is distinct and in range.
pub fn check_dice_valid(dice: &[u8], selection: &[usize]) -> ActionResult<DiceValues> {
    check_values_unique(selection, selection.len())?;
    dice_values(dice, selection)
}

/// Exactly one die, showing one of `acceptable`.
pub fn check_die_value(dice: &[u8], selection: &[usize], acceptable: &[u8]) -> ActionResult<u8> {
    check_values_unique(selection, 1)?;
    let value = dice_values(dice, selection)?[0];
    if acceptable.contains(&value) {
        Ok(value)
    } else {
        Err(ActionError::selection(format!(
            "a {} is not one of {:?}",
            value, acceptable
        )))
    }
}

/// Exactly `n` dice, all showing the same value. Returns that value.
pub fn check_dice_equal(dice: &[u8], selection: &[usize], n: usize) -> ActionResult<u8> {
    if n == 0 {
        return Err(ActionError::selection("no dice requested"));
    }
    check_values_unique(selection, n)?;
    let values = dice_values(dice, selection)?;
    let first = values[0];
    if values.iter().all(|&v| v == first) {
        Ok(first)
    } else {
        Err(ActionError::selection("dice values are not equal"))
    }
}

/// Exactly `n` dice forming a run v, v+1, v+2, ... in any order.
pub fn check_dice_series(dice: &[u8], selection: &[usize], n: usize) -> ActionResult<DiceValues> {
    check_values_unique(selection, n)?;
    let mut values = dice_values(dice, selection)?;
    values.sort_unstable();
    if values.windows(2).all(|w| w[1] == w[0] + 1) {
        Ok(values)
    } else {
        Err(ActionError::selection("dice values do not form a series"))
    }
}

/// Exactly `n` dice whose values total at least `sum`. Returns the total.
pub fn check_dice_sum(dice: &[u8], selection: &[usize], n: usize, sum: u32) -> ActionResult<u32> {
    check_values_unique(selection, n)?;
    let total: u32 = dice_values(dice, selection)?.iter().map(|&v| u32::from(v)).sum();
    if total >= sum {
        Ok(total)
    } else {
        Err(ActionError::selection(format!(
            "dice total {} is below {}",
            total, sum
        )))
    }
}

/// Remove values by index, highest index first so earlier indices stay valid.
///
/// Out-of-range indices are ignored; callers validate first.
pub fn remove_indices<T>(values: &mut Vec<T>, indices: &[usize]) {
    let mut sorted: SmallVec<[usize; 8]> = indices.iter().copied().collect();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    sorted.dedup();
    for i in sorted {
        if i < values.len() {
            values.remove(i);
        }
    }
}
