// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-field bitset indexed by declaration position.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldBits {
    words: Vec<u64>,
}

impl FieldBits {
    pub fn new(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(64)],
        }
    }

    pub fn set(&mut self, index: usize) {
        let word = index / 64;
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        self.words[word] |= 1 << (index % 64);
    }

    pub fn clear(&mut self, index: usize) {
        if let Some(word) = self.words.get_mut(index / 64) {
            *word &= !(1 << (index % 64));
        }
    }

    pub fn clear_all(&mut self) {
        self.words.iter_mut().for_each(|word| *word = 0);
    }

    pub fn get(&self, index: usize) -> bool {
        self.words
            .get(index / 64)
            .is_some_and(|word| word & (1 << (index % 64)) != 0)
    }

    pub fn count(&self) -> usize {
        self.words.iter().map(|word| word.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&word| word == 0)
    }

    /// Indices of set bits, ascending.
    pub fn iter_ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(w, &word)| {
            (0..64)
                .filter(move |bit| word & (1u64 << bit) != 0)
                .map(move |bit| w * 64 + bit)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_clear() {
        let mut bits = FieldBits::new(3);
        assert!(bits.is_empty());
        bits.set(0);
        bits.set(2);
        assert!(bits.get(0));
        assert!(!bits.get(1));
        assert!(bits.get(2));
        assert_eq!(bits.count(), 2);

        bits.clear(0);
        assert!(!bits.get(0));
        assert_eq!(bits.iter_ones().collect::<Vec<_>>(), [2]);
    }

    #[test]
    fn test_grows_past_initial_len() {
        let mut bits = FieldBits::new(1);
        bits.set(130);
        assert!(bits.get(130));
        assert!(!bits.get(129));
        assert!(!bits.get(1000));
        assert_eq!(bits.iter_ones().collect::<Vec<_>>(), [130]);

        bits.clear_all();
        assert!(bits.is_empty());
    }
}
