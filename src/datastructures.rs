use bitvec::prelude::*;
use core::mem;
use num::{NumCast, ToPrimitive};
use std::fmt;
use std::fmt::{Debug, Formatter};
use std::hash::{Hash, Hasher};
use std::ops::Index;

/// Fixed-size set of vertices `0..len`, compared and hashed by its bit pattern.
#[derive(Clone, Default)]
pub struct BitSet {
    cardinality: usize,
    bit_vec: BitVec,
}

impl Debug for BitSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let values: Vec<_> = self.iter().map(|i| i.to_string()).collect();
        write!(f, "{{{}}}", values.join(", "))
    }
}

impl PartialEq for BitSet {
    fn eq(&self, other: &Self) -> bool {
        self.cardinality == other.cardinality && self.bit_vec == other.bit_vec
    }
}
impl Eq for BitSet {}

impl Hash for BitSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bit_vec.hash(state)
    }
}

const fn block_size() -> usize {
    mem::size_of::<usize>() * 8
}

const CHUNKS_PER_BLOCK: usize = block_size() / 8;

impl BitSet {
    #[inline]
    pub fn new(size: usize) -> Self {
        Self {
            cardinality: 0,
            bit_vec: bitvec![0; size],
        }
    }

    pub fn new_all_set(size: usize) -> Self {
        let mut set = Self::new(size);
        for v in 0..size {
            set.set_bit(v);
        }
        set
    }

    pub fn from_slice<T: ToPrimitive + Copy>(size: usize, slice: &[T]) -> Self {
        let mut set = Self::new(size);
        for v in slice {
            let v: usize = NumCast::from(*v).expect("vertex index must fit into usize");
            set.set_bit(v);
        }
        set
    }

    #[inline]
    pub fn empty(&self) -> bool {
        self.cardinality == 0
    }

    #[inline]
    pub fn full(&self) -> bool {
        self.cardinality == self.bit_vec.len()
    }

    #[inline]
    pub fn cardinality(&self) -> usize {
        self.cardinality
    }

    /// Size of the universe, not the number of members.
    #[inline]
    pub fn len(&self) -> usize {
        self.bit_vec.len()
    }

    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        self.bit_vec.as_slice()
    }

    /// Returns whether `idx` was already set.
    #[inline]
    pub fn set_bit(&mut self, idx: usize) -> bool {
        if self.bit_vec[idx] {
            true
        } else {
            self.bit_vec.set(idx, true);
            self.cardinality += 1;
            false
        }
    }

    /// Returns whether `idx` was set before.
    #[inline]
    pub fn unset_bit(&mut self, idx: usize) -> bool {
        if self.bit_vec[idx] {
            self.bit_vec.set(idx, false);
            self.cardinality -= 1;
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn or(&mut self, other: &BitSet) {
        if other.len() > self.bit_vec.len() {
            self.bit_vec.resize(other.len(), false);
        }
        for (x, y) in self
            .bit_vec
            .as_mut_slice()
            .iter_mut()
            .zip(other.as_slice().iter())
        {
            *x |= y;
        }
        self.cardinality = self.bit_vec.count_ones();
    }

    #[inline]
    pub fn and(&mut self, other: &BitSet) {
        let blocks = other.as_slice().len();
        for (i, x) in self.bit_vec.as_mut_slice().iter_mut().enumerate() {
            if i < blocks {
                *x &= other.as_slice()[i];
            } else {
                *x = 0;
            }
        }
        self.cardinality = self.bit_vec.count_ones();
    }

    #[inline]
    pub fn and_not(&mut self, other: &BitSet) {
        for (x, y) in self
            .bit_vec
            .as_mut_slice()
            .iter_mut()
            .zip(other.as_slice().iter())
        {
            *x &= !y;
        }
        self.cardinality = self.bit_vec.count_ones();
    }

    pub fn union_with(&self, other: &BitSet) -> BitSet {
        let mut result = self.clone();
        result.or(other);
        result
    }

    pub fn intersect_with(&self, other: &BitSet) -> BitSet {
        let mut result = self.clone();
        result.and(other);
        result
    }

    pub fn subtract(&self, other: &BitSet) -> BitSet {
        let mut result = self.clone();
        result.and_not(other);
        result
    }

    #[inline]
    pub fn is_disjoint_with(&self, other: &BitSet) -> bool {
        self.as_slice()
            .iter()
            .zip(other.as_slice().iter())
            .all(|(x, y)| x & y == 0)
    }

    #[inline]
    pub fn is_subset_of(&self, other: &BitSet) -> bool {
        if self.cardinality > other.cardinality {
            return false;
        }
        let theirs = other.as_slice();
        self.as_slice()
            .iter()
            .enumerate()
            .all(|(i, x)| x & !theirs.get(i).copied().unwrap_or(0) == 0)
    }

    #[inline]
    pub fn get_first_set(&self) -> Option<usize> {
        if self.cardinality == 0 {
            return None;
        }
        self.get_next_set(0)
    }

    #[inline]
    pub fn get_next_set(&self, idx: usize) -> Option<usize> {
        if idx >= self.bit_vec.len() {
            return None;
        }
        let slice = self.bit_vec.as_slice();
        let mut block_idx = idx / block_size();
        let mut block = slice[block_idx] & (usize::MAX << (idx % block_size()));
        while block == 0 {
            block_idx += 1;
            if block_idx >= slice.len() {
                return None;
            }
            block = slice[block_idx];
        }
        let v = block_idx * block_size() + block.trailing_zeros() as usize;
        if v < self.bit_vec.len() {
            Some(v)
        } else {
            None
        }
    }

    /// The eight bits `8 * idx .. 8 * idx + 8` as a byte, lowest vertex in the lowest bit.
    #[inline]
    pub fn chunk(&self, idx: usize) -> u8 {
        let slice = self.bit_vec.as_slice();
        let block_idx = idx / CHUNKS_PER_BLOCK;
        if block_idx >= slice.len() {
            return 0;
        }
        ((slice[block_idx] >> ((idx % CHUNKS_PER_BLOCK) * 8)) & 0xff) as u8
    }

    pub fn to_vec(&self) -> Vec<usize> {
        self.iter().collect()
    }

    #[inline]
    pub fn iter(&self) -> BitSetIterator {
        BitSetIterator {
            set: self,
            next: self.get_first_set(),
        }
    }
}

/// Ascending iteration over the members of a [`BitSet`].
pub struct BitSetIterator<'a> {
    set: &'a BitSet,
    next: Option<usize>,
}

impl<'a> Iterator for BitSetIterator<'a> {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.set.get_next_set(current + 1);
        Some(current)
    }
}

impl Index<usize> for BitSet {
    type Output = bool;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        self.bit_vec.index(index)
    }
}

#[cfg(test)]
mod tests {
    use crate::datastructures::BitSet;

    #[test]
    fn iter() {
        let mut bs = BitSet::new(256);

        let a: Vec<usize> = (0..256).filter(|i| i % 2 == 0).collect();
        for i in &a {
            bs.set_bit(*i);
        }

        let b: Vec<usize> = bs.iter().collect();
        assert_eq!(a, b);
        let mut c = Vec::new();
        let mut v = bs.get_next_set(0);
        while let Some(x) = v {
            c.push(x);
            v = bs.get_next_set(x + 1);
        }
        assert_eq!(a, c);
    }

    #[test]
    fn set_operations() {
        let a = BitSet::from_slice(70, &[1, 5, 64, 69]);
        let b = BitSet::from_slice(70, &[5, 6, 69]);

        assert_eq!(a.union_with(&b).to_vec(), vec![1, 5, 6, 64, 69]);
        assert_eq!(a.intersect_with(&b).to_vec(), vec![5, 69]);
        assert_eq!(a.subtract(&b).to_vec(), vec![1, 64]);
        assert_eq!(a.subtract(&b).cardinality(), 2);

        assert!(!a.is_subset_of(&b));
        assert!(a.intersect_with(&b).is_subset_of(&b));
        assert!(!a.is_disjoint_with(&b));
        assert!(a.subtract(&b).is_disjoint_with(&b));
        assert!(a.is_subset_of(&a.union_with(&b)));
    }

    #[test]
    fn equality_by_bits() {
        let mut a = BitSet::new(10);
        a.set_bit(3);
        a.set_bit(7);
        let b = BitSet::from_slice(10, &[7u32, 3u32]);
        assert_eq!(a, b);

        a.unset_bit(7);
        assert_ne!(a, b);
        assert_eq!(a.cardinality(), 1);
    }

    #[test]
    fn all_set() {
        let all = BitSet::new_all_set(67);
        assert!(all.full());
        assert_eq!(all.cardinality(), 67);
        assert_eq!(all.get_next_set(66), Some(66));
        assert_eq!(all.get_next_set(67), None);
        assert_eq!(all.chunk(8), 0b0000_0111);
    }

    #[test]
    fn chunks() {
        let bs = BitSet::from_slice(20, &[0, 9, 10, 19]);
        assert_eq!(bs.chunk(0), 0b0000_0001);
        assert_eq!(bs.chunk(1), 0b0000_0110);
        assert_eq!(bs.chunk(2), 0b0000_1000);
        assert_eq!(bs.chunk(3), 0);
    }
}
