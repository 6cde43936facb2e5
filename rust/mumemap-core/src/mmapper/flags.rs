use std::collections::BTreeSet;

pub type FlagSet = BTreeSet<&'static str>;

/// Names for the bits of a flag field. Entry `i` names bit `1 << i`; the
/// field width does not matter here.
pub struct NamedBitFlags {
    names: &'static [&'static str],
}

impl NamedBitFlags {
    pub const fn new(names: &'static [&'static str]) -> Self { Self { names } }

    /// Named flags set in `bits`; unnamed bits are ignored.
    pub fn to_set(&self, bits: u32) -> FlagSet {
        self.names
            .iter()
            .enumerate()
            .filter(|(i, _)| bits & (1u32 << i) != 0)
            .map(|(_, name)| *name)
            .collect()
    }

    pub fn to_bits(&self, set: &FlagSet) -> u32 {
        set.iter().filter_map(|name| self.bit(name)).fold(0, |acc, b| acc | b)
    }

    pub fn bit(&self, name: &str) -> Option<u32> {
        self.names.iter().position(|n| *n == name).map(|i| 1u32 << i)
    }
}

pub static MOB_FLAGS: NamedBitFlags = NamedBitFlags::new(&[
    "rent", "shop", "weaponshop", "armourshop", "foodshop", "petshop", "guild", "scoutguild",
    "mageguild", "clericguild", "warriorguild", "rangerguild", "smob", "quest", "any", "reserved2",
]);

pub static LOAD_FLAGS: NamedBitFlags = NamedBitFlags::new(&[
    "treasure", "armour", "weapon", "water", "food", "herb", "key", "mule", "horse", "packhorse",
    "trainedhorse", "rohirrim", "warg", "boat", "attention", "tower",
]);

pub static EXIT_FLAGS: NamedBitFlags = NamedBitFlags::new(&[
    "exit", "door", "road", "climb", "random", "special", "no_match",
]);

pub static DOOR_FLAGS: NamedBitFlags = NamedBitFlags::new(&[
    "hidden", "needkey", "noblock", "nobreak", "nopick", "delayed", "reserved1", "reserved2",
]);

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn bits_map_to_names() {
        let set = EXIT_FLAGS.to_set(0b11);
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec!["door", "exit"]);
        assert_eq!(MOB_FLAGS.to_set(1 << 15).into_iter().next(), Some("reserved2"));
        assert!(DOOR_FLAGS.to_set(0).is_empty());
    }

    #[test]
    fn unnamed_bits_are_dropped() {
        assert!(EXIT_FLAGS.to_set(1 << 7).is_empty());
        assert_eq!(LOAD_FLAGS.to_set(0x0001_0001).len(), 1);
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(DOOR_FLAGS.bit("needkey"), Some(2));
        assert_eq!(DOOR_FLAGS.bit("bogus"), None);
    }

    proptest! {
        #[test]
        fn named_bits_survive(bits in 0u32..=0xFFFF) {
            prop_assert_eq!(MOB_FLAGS.to_bits(&MOB_FLAGS.to_set(bits)), bits);
            prop_assert_eq!(DOOR_FLAGS.to_bits(&DOOR_FLAGS.to_set(bits)), bits & 0xFF);
        }
    }
}
