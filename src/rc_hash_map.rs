use core::{
	borrow::Borrow,
	fmt::{self, Debug, Formatter},
	hash::{BuildHasher, Hash},
};
use hashbrown::{hash_map::DefaultHashBuilder, HashMap};
use num_traits::{CheckedAdd, CheckedSub, One, Zero};
use std::vec;

/// A reference-counting map that remembers the order in which keys were first inserted.
///
/// Entries whose count drops to zero are kept (as *weak* entries) until [`RcHashMap::drain_weak`] is called,
/// so a key that is decremented to zero and later incremented again keeps its first position.
pub struct RcHashMap<K, C, S = DefaultHashBuilder>
where
	K: Hash + Eq + Clone,
	C: CheckedAdd + CheckedSub + One + Zero + Copy,
	S: BuildHasher,
{
	index: HashMap<K, usize, S>,
	entries: Vec<(K, C)>,
}
impl<K, C, S> Default for RcHashMap<K, C, S>
where
	K: Hash + Eq + Clone,
	C: CheckedAdd + CheckedSub + One + Zero + Copy,
	S: Default + BuildHasher,
{
	fn default() -> Self {
		Self::new()
	}
}
impl<K, C, S> Debug for RcHashMap<K, C, S>
where
	K: Hash + Eq + Clone + Debug,
	C: CheckedAdd + CheckedSub + One + Zero + Copy + Debug,
	S: BuildHasher,
{
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_map().entries(self.entries.iter().map(|(k, c)| (k, c))).finish()
	}
}
impl<K, C, S> RcHashMap<K, C, S>
where
	K: Hash + Eq + Clone,
	C: CheckedAdd + CheckedSub + One + Zero + Copy,
	S: BuildHasher,
{
	#[must_use]
	pub fn new() -> Self
	where
		S: Default,
	{
		Self {
			index: HashMap::with_hasher(S::default()),
			entries: Vec::new(),
		}
	}

	/// Increments the count for `k`, inserting it with a count of one if it's not present yet.
	///
	/// Returns the new count.
	///
	/// # Errors
	///
	/// Iff the count is already at its maximum. The map is left unchanged in that case.
	pub fn increment_or_insert(&mut self, k: K) -> Result<C, CountSaturatedError> {
		match self.index.get(&k) {
			Some(&i) => {
				let (_, c) = &mut self.entries[i];
				*c = c.checked_add(&C::one()).ok_or(CountSaturatedError)?;
				Ok(*c)
			}
			None => {
				self.index.insert(k.clone(), self.entries.len());
				self.entries.push((k, C::one()));
				Ok(C::one())
			}
		}
	}

	/// Decrements the count for `k` if it is present and not zero.
	///
	/// Returns the new count, or [`None`] if nothing was changed.
	pub fn weak_decrement<Q: ?Sized>(&mut self, k: &Q) -> Option<C>
	where
		K: Borrow<Q>,
		Q: Eq + Hash,
	{
		let &i = self.index.get(k)?;
		let (_, c) = &mut self.entries[i];
		*c = c.checked_sub(&C::one())?;
		Some(*c)
	}

	/// The current count for `k`, zero if absent.
	pub fn count<Q: ?Sized>(&self, k: &Q) -> C
	where
		K: Borrow<Q>,
		Q: Eq + Hash,
	{
		self.index.get(k).map_or_else(C::zero, |&i| self.entries[i].1)
	}

	/// Number of entries, including weak ones.
	#[must_use]
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Iterates over keys with a non-zero count, in first-insertion order.
	pub fn iter_strong(&self) -> impl Iterator<Item = &K> {
		self.entries.iter().filter(|(_, c)| !c.is_zero()).map(|(k, _)| k)
	}

	/// Removes all entries with a count of zero, preserving the order of the remaining ones.
	pub fn drain_weak(&mut self) -> DrainWeak<K> {
		let (weak, strong): (Vec<_>, Vec<_>) = self.entries.drain(..).partition(|(_, c)| c.is_zero());
		self.entries = strong;
		self.index.clear();
		for (i, (k, _)) in self.entries.iter().enumerate() {
			self.index.insert(k.clone(), i);
		}
		DrainWeak(weak.into_iter().map(|(k, _)| k).collect::<Vec<_>>().into_iter())
	}
}

#[derive(Debug)]
pub struct DrainWeak<K>(vec::IntoIter<K>);
impl<K> Iterator for DrainWeak<K> {
	type Item = K;

	fn next(&mut self) -> Option<Self::Item> {
		self.0.next()
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		self.0.size_hint()
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountSaturatedError;
impl fmt::Display for CountSaturatedError {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str("reference count saturated")
	}
}
impl std::error::Error for CountSaturatedError {}
