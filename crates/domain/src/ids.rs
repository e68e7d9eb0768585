use std::fmt;

use serde::{Deserialize, Serialize};

/// Host-assigned slot identifiers. The host owns allocation; these only wrap
/// the raw index so the two kinds can't be mixed up.
macro_rules! define_index_id {
    ($name:ident, $repr:ty) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name($repr);

        impl $name {
            pub const fn new(index: $repr) -> Self {
                Self(index)
            }

            pub const fn index(self) -> $repr {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$repr> for $name {
            fn from(value: $repr) -> Self {
                Self(value)
            }
        }

        impl From<$name> for $repr {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

// Player slot, as carried in the one-byte field of network payloads.
define_index_id!(PlayerId, u8);

// Active mob slot in the host world.
define_index_id!(MobId, u16);
