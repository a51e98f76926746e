use crate::{PackedCodec, Word, USABLE_BITS};

const SHARE_BITS: u32 = 14;
const SHARE_MASK: u128 = (1 << SHARE_BITS) - 1;

/// Basis points owed to one fee recipient plus whether it was paid out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RecipientShare {
    pub share_bps: u16,
    pub claimed: bool,
}

/// 14-bit share + claimed flag, 16 records per word.
pub struct RecipientShareCodec;

impl PackedCodec for RecipientShareCodec {
    type Value = RecipientShare;

    const WIDTH: u32 = SHARE_BITS + 1;
    const CAPACITY: u32 = 16;

    fn encode(value: &RecipientShare) -> u128 {
        assert!(
            (value.share_bps as u128) <= SHARE_MASK,
            "share {} does not fit in {SHARE_BITS} bits",
            value.share_bps
        );
        value.share_bps as u128 | (u128::from(value.claimed) << SHARE_BITS)
    }

    fn decode(bits: u128) -> RecipientShare {
        RecipientShare {
            share_bps: (bits & SHARE_MASK) as u16,
            claimed: (bits >> SHARE_BITS) & 1 == 1,
        }
    }
}

impl RecipientShareCodec {
    pub fn mark_claimed(word: Word, index: u32) -> Word {
        let share = Self::get(word, index);
        Self::set(
            word,
            index,
            &RecipientShare {
                claimed: true,
                ..share
            },
        )
    }
}

/// Raw 16-bit basis points, 15 records per word.
pub struct CustomShareCodec;

impl PackedCodec for CustomShareCodec {
    type Value = u16;

    const WIDTH: u32 = 16;
    const CAPACITY: u32 = 15;

    fn encode(value: &u16) -> u128 {
        *value as u128
    }

    fn decode(bits: u128) -> u16 {
        bits as u16
    }
}

const _: () = assert!(
    <RecipientShareCodec as PackedCodec>::WIDTH * <RecipientShareCodec as PackedCodec>::CAPACITY
        <= USABLE_BITS
);
const _: () = assert!(
    <CustomShareCodec as PackedCodec>::WIDTH * <CustomShareCodec as PackedCodec>::CAPACITY
        <= USABLE_BITS
);
