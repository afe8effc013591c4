/// Newtype identifiers for registry-resident entities. Kept as thin `u32`
/// wrappers the way the teacher wraps `Odds(Chips, Chips)` and `Bucket` —
/// cheap to `Copy`, ordered so they can key `BTreeMap`s deterministically.
use std::fmt;

macro_rules! id_type {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", stringify!($name), self.0)
            }
        }

        impl From<u32> for $name {
            fn from(value: u32) -> Self {
                Self(value)
            }
        }
    };
}

id_type!(SkillId);
id_type!(ActionId);
id_type!(ItemId);
id_type!(PurchaseId);

/// Tool tiers tracked by `BucketKey` and the rate cache's capability key.
/// `spec.md` §3 names these three explicitly ("axe_level, rod_level,
/// pick_level"); the enum keeps them ordered for deterministic iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tool {
    Axe,
    Rod,
    Pick,
}

impl Tool {
    pub const ALL: [Tool; 3] = [Tool::Axe, Tool::Rod, Tool::Pick];
}
