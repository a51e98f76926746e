use cosmwasm_std::Uint256;

/// One storage slot worth of packed records.
pub type Word = Uint256;

/// Records never extend past this bit.
pub const USABLE_BITS: u32 = 250;

/// A fixed-width record layout packed side by side into a [`Word`].
///
/// Record `i` occupies bits `[i * WIDTH, (i + 1) * WIDTH)`. Reading or
/// writing past `CAPACITY` is a bug in the caller and panics.
pub trait PackedCodec {
    type Value;

    const WIDTH: u32;
    const CAPACITY: u32;

    fn encode(value: &Self::Value) -> u128;
    fn decode(bits: u128) -> Self::Value;

    fn get(word: Word, index: u32) -> Self::Value {
        Self::decode(read_field(word, index, Self::WIDTH, Self::CAPACITY))
    }

    /// Returns `word` with record `index` replaced; other records keep their bits.
    fn set(word: Word, index: u32, value: &Self::Value) -> Word {
        write_field(word, index, Self::WIDTH, Self::CAPACITY, Self::encode(value))
    }

    /// `(word_index, offset)` of the `global_index`-th record of a sequence.
    fn locate(global_index: u32) -> (u32, u32) {
        locate(global_index, Self::CAPACITY)
    }

    fn words_for(len: u32) -> u32 {
        len.div_ceil(Self::CAPACITY)
    }

    fn pack_all(values: &[Self::Value]) -> Vec<Word> {
        let mut words = vec![Word::zero(); Self::words_for(values.len() as u32) as usize];
        for (global_index, value) in values.iter().enumerate() {
            let (word_index, offset) = Self::locate(global_index as u32);
            let word = &mut words[word_index as usize];
            *word = Self::set(*word, offset, value);
        }
        words
    }

    fn unpack_all(words: &[Word], len: u32) -> Vec<Self::Value> {
        (0..len)
            .map(|global_index| {
                let (word_index, offset) = Self::locate(global_index);
                let word = words.get(word_index as usize).copied().unwrap_or_default();
                Self::get(word, offset)
            })
            .collect()
    }
}

pub fn locate(global_index: u32, capacity: u32) -> (u32, u32) {
    (global_index / capacity, global_index % capacity)
}

fn field_modulus(width: u32) -> Uint256 {
    Uint256::from(1u128 << width)
}

fn low_u128(value: Uint256) -> u128 {
    let bytes = value.to_be_bytes();
    let mut low = [0u8; 16];
    low.copy_from_slice(&bytes[16..]);
    u128::from_be_bytes(low)
}

fn read_field(word: Word, index: u32, width: u32, capacity: u32) -> u128 {
    assert!(
        index < capacity,
        "packed index {index} out of range for capacity {capacity}"
    );
    low_u128((word >> (index * width)) % field_modulus(width))
}

fn write_field(word: Word, index: u32, width: u32, capacity: u32, bits: u128) -> Word {
    assert!(
        bits < 1u128 << width,
        "packed value {bits} does not fit in {width} bits"
    );
    let shift = index * width;
    let old = read_field(word, index, width, capacity);
    word - (Uint256::from(old) << shift) + (Uint256::from(bits) << shift)
}
