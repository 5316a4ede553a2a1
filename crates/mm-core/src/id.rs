use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global string interner shared by node and edge IDs.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Monotonic counter for generated IDs. Shared so that `node_3` and `edge_3`
/// never come from the same tick.
static COUNTER: AtomicU64 = AtomicU64::new(0);

fn next_with_prefix(prefix: &str) -> Spur {
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    INTERNER.get_or_intern(format!("{prefix}_{n}"))
}

/// Declares an interned, `Copy` identifier type backed by a `Spur`.
macro_rules! interned_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal, $sigil:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(Spur);

        impl $name {
            /// Intern a string as an ID, or return the existing one.
            pub fn intern(s: &str) -> Self {
                Self(INTERNER.get_or_intern(s))
            }

            /// Resolve back to a string slice.
            pub fn as_str(&self) -> &str {
                INTERNER.resolve(&self.0)
            }

            /// Generate a fresh, process-unique ID.
            pub fn generate() -> Self {
                Self(next_with_prefix($prefix))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $sigil, self.as_str())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Ok(Self::intern(&s))
            }
        }
    };
}

interned_id!(
    /// Identifier of a mind-map node. 4 bytes, `Copy`, O(1) compare and hash.
    NodeId,
    "node",
    "@"
);

interned_id!(
    /// Identifier of a connection between two node ports.
    EdgeId,
    "edge",
    "~"
);
