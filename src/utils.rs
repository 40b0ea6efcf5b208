use std::{collections, hash::BuildHasherDefault};

use twox_hash::XxHash64;

/// Identities and base names are short strings hashed on every update.
pub type BuildXxHasher = BuildHasherDefault<XxHash64>;

pub type HashMap<K, V> = collections::HashMap<K, V, BuildXxHasher>;
pub type HashSet<K> = collections::HashSet<K, BuildXxHasher>;
