use bitvec::prelude::*;
use common::shuffle;
use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Group {
  Control,
  Variant,
}

/// A set of users that leave before reaching the experiment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DropOffSet {
  /// In the order they were drawn
  indices: Vec<usize>,
  mask: BitVec,
}

impl DropOffSet {
  /// Indices outside `[0, population)` and repeats are skipped.
  pub fn from_indices(population: usize, indices: Vec<usize>) -> Self {
    let mut mask = bitvec![0; population];
    let mut kept = Vec::with_capacity(indices.len());
    for ix in indices {
      if ix >= population || mask[ix] {
        continue;
      }
      mask.set(ix, true);
      kept.push(ix);
    }
    DropOffSet { indices: kept, mask }
  }

  pub fn contains(&self, user_ix: usize) -> bool {
    self.mask.get(user_ix).map(|bit| *bit).unwrap_or(false)
  }

  pub fn len(&self) -> usize {
    self.indices.len()
  }

  pub fn is_empty(&self) -> bool {
    self.indices.is_empty()
  }

  pub fn indices(&self) -> &[usize] {
    &self.indices
  }

  /// Users not in the set, ascending.
  pub fn survivors(&self) -> impl Iterator<Item = usize> + '_ {
    self.mask.iter_zeros()
  }
}

/// One random draw of everything the two panels need.  Scenarios are replaced wholesale, never
/// edited.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scenario {
  population: usize,
  early_drop: DropOffSet,
  late_drop: DropOffSet,
  early_assignment: Vec<Group>,
  late_assignment: Vec<Option<Group>>,
}

impl Scenario {
  pub fn population(&self) -> usize {
    self.population
  }

  pub fn early_drop(&self) -> &DropOffSet {
    &self.early_drop
  }

  pub fn late_drop(&self) -> &DropOffSet {
    &self.late_drop
  }

  /// Group per user, decided at arrival.
  pub fn early_assignment(&self) -> &[Group] {
    &self.early_assignment
  }

  /// Group per user, decided only for users that survived `late_drop`.
  pub fn late_assignment(&self) -> &[Option<Group>] {
    &self.late_assignment
  }
}

/// `ceil(count / 2)` control followed by the rest variant, shuffled.
pub fn balanced_assignment(rng: &mut impl Rng, count: usize) -> Vec<Group> {
  let control_count = count - count / 2;
  let mut groups: Vec<Group> = std::iter::repeat(Group::Control)
    .take(control_count)
    .chain(std::iter::repeat(Group::Variant).take(count - control_count))
    .collect();
  shuffle(rng, &mut groups);
  groups
}

/// Picks `count` distinct users out of `[0, population)` uniformly at random.
pub fn random_indices(rng: &mut impl Rng, population: usize, count: usize) -> Vec<usize> {
  let mut indices: Vec<usize> = (0..population).collect();
  shuffle(rng, &mut indices);
  indices.truncate(count.min(population));
  indices
}

/// Spreads a balanced assignment over the users that didn't drop off.  Dropped users get `None`.
fn survivor_assignment(
  rng: &mut impl Rng,
  drop: &DropOffSet,
  population: usize,
) -> Vec<Option<Group>> {
  let survivors: Vec<usize> = drop.survivors().collect();
  let groups = balanced_assignment(rng, survivors.len());

  let mut assignment = vec![None; population];
  for (user_ix, group) in survivors.into_iter().zip(groups) {
    assignment[user_ix] = Some(group);
  }
  assignment
}

pub fn generate(rng: &mut impl Rng, population: usize, drop_off_count: usize) -> Scenario {
  let drop_off_count = drop_off_count.min(population);

  let early_drop = DropOffSet::from_indices(
    population,
    random_indices(rng, population, drop_off_count),
  );
  let late_drop = DropOffSet::from_indices(
    population,
    random_indices(rng, population, drop_off_count),
  );
  let early_assignment = balanced_assignment(rng, population);
  let late_assignment = survivor_assignment(rng, &late_drop, population);

  log::debug!("Generated scenario with population={population}, drop_off_count={drop_off_count}");

  Scenario {
    population,
    early_drop,
    late_drop,
    early_assignment,
    late_assignment,
  }
}
