//! Utilities.

/// Returns ceiling log2.
pub const fn clog2(value: usize) -> usize {
    if value == 0 {
        0
    } else {
        (::std::mem::size_of::<usize>() * 8) - (value - 1).leading_zeros() as usize
    }
}

/// Returns `(value + inc) mod modulus`.
///
/// Power-of-two moduli take the masked addition. Other moduli add and then subtract `modulus` once
/// when the sum reaches it, so `value < modulus` and `inc <= modulus` must hold.
pub const fn add_mod(value: usize, inc: usize, modulus: usize) -> usize {
    if modulus.is_power_of_two() {
        (value + inc) & (modulus - 1)
    } else {
        let sum = value + inc;
        if sum >= modulus {
            sum - modulus
        } else {
            sum
        }
    }
}

/// Returns `(value - dec) mod modulus` for `value < modulus` and `dec <= modulus`.
pub const fn sub_mod(value: usize, dec: usize, modulus: usize) -> usize { add_mod(value, modulus - dec, modulus) }

/// Places logical items onto physical lanes, logical item 0 landing on `lane0`.
///
/// Lanes without an item hold `T::default()`. Items beyond `LANES` are ignored.
pub fn pack<T: Copy + Default, const LANES: usize>(lane0: usize, items: &[T]) -> [T; LANES] {
    let mut lanes = [T::default(); LANES];
    for (i, item) in items.iter().take(LANES).enumerate() {
        lanes[add_mod(lane0, i, LANES)] = *item;
    }
    lanes
}
