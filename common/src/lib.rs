pub extern crate rand;
pub extern crate rand_pcg;

use rand::prelude::*;
use rand_pcg::Pcg32;

/// Used when the platform can't give us any entropy.
const FALLBACK_SEED: (u64, u64) = (89538u64, 382173857842u64);

fn seed_bytes((hi, lo): (u64, u64)) -> [u8; 16] {
  let mut bytes = [0u8; 16];
  bytes[..8].copy_from_slice(&hi.to_le_bytes());
  bytes[8..].copy_from_slice(&lo.to_le_bytes());
  bytes
}

fn pumped(mut rng: Pcg32) -> Pcg32 {
  // pump the rng a few times to avoid possible issues with seeding
  for _ in 0..8 {
    let _ = rng.gen::<f32>();
  }

  rng
}

pub fn build_rng(seed: (u64, u64)) -> Pcg32 {
  pumped(Pcg32::from_seed(seed_bytes(seed)))
}

/// Builds a RNG seeded from the platform's entropy source (`crypto.getRandomValues` in the
/// browser).
pub fn entropy_rng() -> Pcg32 {
  let mut bytes = [0u8; 16];
  match getrandom::getrandom(&mut bytes) {
    Ok(()) => pumped(Pcg32::from_seed(bytes)),
    Err(err) => {
      log::warn!("Failed to read entropy, falling back to fixed seed: {err}");
      build_rng(FALLBACK_SEED)
    }
  }
}

/// In-place Fisher-Yates shuffle.  Every permutation of `items` is equally likely given a
/// uniform `rng`.
pub fn shuffle<T>(rng: &mut impl Rng, items: &mut [T]) {
  for i in (1..items.len()).rev() {
    let j = rng.gen_range(0..=i);
    items.swap(i, j);
  }
}

pub fn clamp<T: PartialOrd>(val: T, min: T, max: T) -> T {
  if val < min {
    return min;
  }
  if val > max {
    return max;
  }
  val
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn shuffle_is_a_permutation() {
    let mut rng = build_rng((1, 2));
    let mut items: Vec<usize> = (0..200).collect();
    shuffle(&mut rng, &mut items);

    let mut sorted = items.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, (0..200).collect::<Vec<_>>());
    assert_ne!(items, sorted, "200 elements should essentially never shuffle to identity");
  }

  #[test]
  fn shuffle_handles_tiny_slices() {
    let mut rng = build_rng((3, 4));
    let mut empty: [u8; 0] = [];
    shuffle(&mut rng, &mut empty);
    let mut one = [7];
    shuffle(&mut rng, &mut one);
    assert_eq!(one, [7]);
  }

  #[test]
  fn shuffle_reaches_every_position() {
    // element 0 should be able to land anywhere in a 4-element slice
    let mut rng = build_rng((5, 6));
    let mut seen = [false; 4];
    for _ in 0..500 {
      let mut items = [0, 1, 2, 3];
      shuffle(&mut rng, &mut items);
      let pos = items.iter().position(|&x| x == 0).unwrap();
      seen[pos] = true;
    }
    assert_eq!(seen, [true; 4]);
  }

  #[test]
  fn same_seed_same_stream() {
    let mut a = build_rng((11, 22));
    let mut b = build_rng((11, 22));
    for _ in 0..16 {
      assert_eq!(a.gen::<u32>(), b.gen::<u32>());
    }
  }

  #[test]
  fn clamp_bounds() {
    assert_eq!(clamp(5, 50, 1000), 50);
    assert_eq!(clamp(5000, 50, 1000), 1000);
    assert_eq!(clamp(300, 50, 1000), 300);
    assert_eq!(clamp(-1.5f32, 0., 1.), 0.);
  }
}
