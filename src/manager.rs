use rand::Rng;
use rand::seq::SliceRandom;

use crate::{FileEntry, FileGroup};

/// Outcome of trying to place one entry.
#[derive(Debug)]
pub enum Assignment {
	/// The entry went into the group at this index.
	Placed(usize),
	/// No group had room; ownership of the entry goes back to the caller.
	NoRoom(FileEntry),
}

/// Owns a fixed number of groups that all share one capacity, and assigns
/// entries to them one at a time.
///
/// Groups are visited in a freshly shuffled order on every call, so that over
/// many assignments the load spreads evenly instead of filling group 0 first.
/// Within that order the first group with room wins; no attempt is made to
/// find the tightest fit.
pub struct AllocationManager {
	capacity: u64,
	groups: Vec<FileGroup>,
}

impl AllocationManager {
	pub fn new(group_count: usize, capacity: u64) -> Self {
		Self {
			capacity,
			groups: (0..group_count).map(|_| FileGroup::new()).collect(),
		}
	}

	/// Places the entry into the first group of a shuffled order that has
	/// room for it. Returns [`Assignment::NoRoom`] with the entry when no
	/// group can take it; nothing is mutated in that case.
	pub fn assign(&mut self, entry: FileEntry, rng: &mut impl Rng) -> Assignment {
		let mut order: Vec<usize> = (0..self.groups.len()).collect();
		order.shuffle(rng);

		let position = order.into_iter()
			.find(|&index| self.room_left(&self.groups[index]) >= entry.size);

		match position {
			Some(index) => {
				self.groups[index].push(entry);
				Assignment::Placed(index)
			},
			None => Assignment::NoRoom(entry),
		}
	}

	fn room_left(&self, group: &FileGroup) -> u64 {
		self.capacity - group.total_size()
	}

	pub fn group_count(&self) -> usize {
		self.groups.len()
	}

	pub fn capacity(&self) -> u64 {
		self.capacity
	}

	pub fn group(&self, index: usize) -> &FileGroup {
		&self.groups[index]
	}

	pub fn groups(&self) -> &[FileGroup] {
		&self.groups
	}

	pub fn into_groups(self) -> Vec<FileGroup> {
		self.groups
	}

	pub fn sort_groups_by_size(&mut self) {
		for group in &mut self.groups {
			group.sort_descending_by_size();
		}
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::*;

	fn entry(name: &str, size: u64) -> FileEntry {
		FileEntry::new(name, size)
	}

	#[test]
	fn assigns_within_capacity() {
		let mut rng = StdRng::seed_from_u64(7);
		let mut manager = AllocationManager::new(3, 1024);

		for size in [600, 500, 400, 300] {
			match manager.assign(entry("file", size), &mut rng) {
				Assignment::Placed(index) => assert!(index < 3),
				Assignment::NoRoom(_) => panic!("1800 bytes must fit into 3 * 1024"),
			}
		}

		for group in manager.groups() {
			assert!(group.total_size() <= 1024);
		}
	}

	#[test]
	fn oversized_entry_never_fits() {
		let mut rng = StdRng::seed_from_u64(0);
		let mut manager = AllocationManager::new(5, 1024);

		for _ in 0..20 {
			let assignment = manager.assign(entry("big", 2000), &mut rng);
			assert!(matches!(assignment, Assignment::NoRoom(_)));
		}

		assert!(manager.groups().iter().all(FileGroup::is_empty));
	}

	#[test]
	fn no_room_returns_the_entry_untouched() {
		let mut rng = StdRng::seed_from_u64(1);
		let mut manager = AllocationManager::new(1, 10);

		let Assignment::NoRoom(returned) = manager.assign(entry("big", 11), &mut rng) else {
			panic!("11 bytes cannot fit a capacity of 10");
		};

		assert_eq!(returned, entry("big", 11));
		assert_eq!(manager.group(0).total_size(), 0);
	}

	#[test]
	fn zero_size_entry_fits_a_full_group() {
		let mut rng = StdRng::seed_from_u64(2);
		let mut manager = AllocationManager::new(1, 100);

		assert!(matches!(manager.assign(entry("fill", 100), &mut rng), Assignment::Placed(0)));
		assert!(matches!(manager.assign(entry("empty", 0), &mut rng), Assignment::Placed(0)));
		assert_eq!(manager.group(0).len(), 2);
		assert_eq!(manager.group(0).total_size(), 100);
	}

	#[test]
	fn no_groups_means_no_room() {
		let mut rng = StdRng::seed_from_u64(3);
		let mut manager = AllocationManager::new(0, 1024);

		let assignment = manager.assign(entry("anything", 1), &mut rng);
		assert!(matches!(assignment, Assignment::NoRoom(_)));
	}

	#[test]
	fn zero_capacity_still_takes_empty_entries() {
		let mut rng = StdRng::seed_from_u64(4);
		let mut manager = AllocationManager::new(2, 0);

		assert!(matches!(manager.assign(entry("empty", 0), &mut rng), Assignment::Placed(_)));
		assert!(matches!(manager.assign(entry("one byte", 1), &mut rng), Assignment::NoRoom(_)));
	}

	#[test]
	fn same_seed_gives_the_same_partition() {
		let partition = |seed: u64| -> Vec<Vec<u64>> {
			let mut rng = StdRng::seed_from_u64(seed);
			let mut manager = AllocationManager::new(4, 500);

			for size in [300, 250, 200, 150, 100, 100, 50, 25] {
				manager.assign(entry("file", size), &mut rng);
			}

			manager.into_groups()
				.into_iter()
				.map(|group| group.into_entries().into_iter().map(|entry| entry.size).collect())
				.collect()
		};

		assert_eq!(partition(42), partition(42));
	}
}
