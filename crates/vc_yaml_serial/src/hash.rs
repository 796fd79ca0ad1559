//! Hash containers used across the crate, *hashbrown* tables hashed by *foldhash*.

use core::hash::BuildHasher;

use foldhash::fast::{FixedState, FoldHasher};

/// A fixed hash seed.
const FIXED_HASH_STATE: FixedState = FixedState::with_seed(0x7A3C_19E5_D04B_62F1);

/// Fixed Hash State, hash results only depend on the input.
#[derive(Copy, Clone, Default, Debug)]
pub struct FixedHashState;

impl BuildHasher for FixedHashState {
    type Hasher = FoldHasher<'static>;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        FIXED_HASH_STATE.build_hasher()
    }
}

pub type HashMap<K, V> = hashbrown::HashMap<K, V, FixedHashState>;
pub type HashSet<K> = hashbrown::HashSet<K, FixedHashState>;
pub use hashbrown::HashTable;
pub use hashbrown::hash_map::Entry;
