//! 32-byte references to collaborators living outside the graph.
//!
//! A [`FeedId`] names an [`ExternalPriceFeed`](crate::processors::ExternalPriceFeed)
//! and a [`ProcessorId`] names an
//! [`ExternalNodeProcessor`](crate::processors::ExternalNodeProcessor).
//! Both are embedded in node parameters, so they take part in node identity.

use std::fmt;

use sha2::{Digest, Sha256};

macro_rules! reference_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name(pub [u8; 32]);

        impl $name {
            pub const NULL: $name = $name([0u8; 32]);

            /// Derive a reference from a human-readable label.
            pub fn from_label(label: &str) -> Self {
                let mut hasher = Sha256::new();
                hasher.update(label.as_bytes());
                let mut bytes = [0u8; 32];
                bytes.copy_from_slice(&hasher.finalize());
                Self(bytes)
            }

            /// Check if this is the all-zero reference
            #[inline]
            pub fn is_null(&self) -> bool {
                self.0 == [0u8; 32]
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "0x{}", hex::encode(self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self)
            }
        }
    };
}

reference_id!(
    /// Reference to an external price feed.
    FeedId
);

reference_id!(
    /// Reference to an externally registered node processor.
    ProcessorId
);
