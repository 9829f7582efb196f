//! Module for bit level manipulation.
//!
//! Paletted containers store fixed-width indices packed into 64-bit words.
//! These functions only know about words and widths; they have no idea what
//! the indices point at.

/// Smallest width ever used for block state indices.
pub const MIN_BLOCK_BITS: u32 = 4;

/// How packed indices are laid out across words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PackingMode {
	/// Each word holds `64 / bits` whole entries and the leftover high bits
	/// are padding. No entry ever spans two words.
	#[default]
	Padded,
	/// Entries are laid end to end and may straddle a word boundary.
	Spanning,
}

pub trait BitLength {
	/// Number of bits needed to represent the value.
	fn bit_length(self) -> u32;
}

macro_rules! __bitlength_impl {
	($type:ty) => {
		impl BitLength for $type {
			fn bit_length(self) -> u32 {
				<$type>::BITS - self.leading_zeros()
			}
		}
	};
}

crate::for_each_int_type!(__bitlength_impl;unsigned);

/// Bits per entry for a block palette of `palette_len` entries:
/// `max(4, ceil(log2(palette_len)))`.
pub fn bits_per_entry(palette_len: usize) -> u32 {
	palette_len.saturating_sub(1).bit_length().max(MIN_BLOCK_BITS)
}

/// Number of entries stored in each word with padded packing.
pub const fn entries_per_word(bits: u32) -> usize {
	(64 / bits) as usize
}

/// Mask selecting the low `bits` bits.
pub const fn low_mask(bits: u32) -> u64 {
	if bits >= 64 {
		u64::MAX
	} else {
		(1u64 << bits) - 1
	}
}

/// Reads entry `index` of width `bits` from `words`.
/// Returns `None` when the entry lies past the end of `words`.
pub fn extract_packed(words: &[u64], bits: u32, index: usize, mode: PackingMode) -> Option<u64> {
	debug_assert!(bits > 0 && bits <= 32);
	let mask = low_mask(bits);
	match mode {
		PackingMode::Padded => {
			let per_word = entries_per_word(bits);
			let word = *words.get(index / per_word)?;
			let shift = (index % per_word) as u32 * bits;
			Some((word >> shift) & mask)
		}
		PackingMode::Spanning => {
			let bit_index = index * bits as usize;
			let word_index = bit_index / 64;
			let shift = (bit_index % 64) as u32;
			let low = *words.get(word_index)? >> shift;
			if shift + bits <= 64 {
				Some(low & mask)
			} else {
				let high = *words.get(word_index + 1)? << (64 - shift);
				Some((low | high) & mask)
			}
		}
	}
}

/// Reinterprets signed words as unsigned without copying.
pub fn as_unsigned_words(words: &[i64]) -> &[u64] {
	bytemuck::cast_slice(words)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::{Rng, SeedableRng, rngs::StdRng};

	#[test]
	fn bits_per_entry_rounds_up() {
		assert_eq!(bits_per_entry(2), 4);
		assert_eq!(bits_per_entry(16), 4);
		assert_eq!(bits_per_entry(17), 5);
		assert_eq!(bits_per_entry(32), 5);
		assert_eq!(bits_per_entry(33), 6);
		assert_eq!(bits_per_entry(100), 7);
		assert_eq!(bits_per_entry(4096), 12);
	}

	fn pack(values: &[u64], bits: u32, mode: PackingMode) -> Vec<u64> {
		let mut words = Vec::new();
		match mode {
			PackingMode::Padded => {
				let per_word = entries_per_word(bits);
				for chunk in values.chunks(per_word) {
					let mut word = 0u64;
					for (i, value) in chunk.iter().enumerate() {
						word |= value << (i as u32 * bits);
					}
					words.push(word);
				}
			}
			PackingMode::Spanning => {
				let total_bits = values.len() * bits as usize;
				words.resize((total_bits + 63) / 64, 0);
				for (i, value) in values.iter().enumerate() {
					let bit = i * bits as usize;
					words[bit / 64] |= value << (bit % 64);
					let spill = (bit % 64) + bits as usize;
					if spill > 64 {
						words[bit / 64 + 1] |= value >> (64 - bit % 64);
					}
				}
			}
		}
		words
	}

	#[test]
	fn packed_values_come_back_out() {
		let mut rng = StdRng::seed_from_u64(0x5eed);
		for bits in [4u32, 5, 6, 7, 9, 12] {
			for mode in [PackingMode::Padded, PackingMode::Spanning] {
				let values: Vec<u64> = (0..4096).map(|_| rng.gen_range(0..(1u64 << bits))).collect();
				let words = pack(&values, bits, mode);
				for (index, expected) in values.iter().enumerate() {
					assert_eq!(extract_packed(&words, bits, index, mode), Some(*expected), "bits {bits} index {index} {mode:?}");
				}
			}
		}
	}

	#[test]
	fn padded_layout_skips_leftover_bits() {
		// 5 bits: 12 entries per word, top 4 bits unused.
		let words = [0xF000_0000_0000_0000u64 | 0b00011, 0b10101];
		assert_eq!(extract_packed(&words, 5, 0, PackingMode::Padded), Some(3));
		assert_eq!(extract_packed(&words, 5, 11, PackingMode::Padded), Some(0));
		assert_eq!(extract_packed(&words, 5, 12, PackingMode::Padded), Some(0b10101));
		assert_eq!(extract_packed(&words, 5, 24, PackingMode::Padded), None);
	}

	#[test]
	fn signed_words_reinterpret() {
		let words = [-1i64, 1];
		assert_eq!(as_unsigned_words(&words), &[u64::MAX, 1]);
	}
}
