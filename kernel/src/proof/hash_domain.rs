//! Typed domain separators for canonical hashing.
//!
//! Every hash computation selects a domain via [`HashDomain`]. This module is
//! the single authority for domain-separator byte strings. Adding a domain is
//! one line in the macro invocation below; the enum, `as_bytes()`, `ALL` and
//! `Display` are generated from it.

/// Declares `HashDomain` enum, `as_bytes()`, `ALL`, and `Display` from one list.
macro_rules! define_hash_domains {
    (
        $(
            $(#[$meta:meta])*
            $variant:ident => $bytes:expr
        ),+ $(,)?
    ) => {
        /// Typed domain separator for [`super::hash::canonical_hash`].
        ///
        /// Every variant maps to a unique, null-terminated byte string used as
        /// a SHA-256 prefix.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum HashDomain {
            $(
                $(#[$meta])*
                $variant,
            )+
        }

        impl HashDomain {
            /// The raw domain-separator bytes (null-terminated).
            #[must_use]
            pub const fn as_bytes(&self) -> &'static [u8] {
                match self {
                    $( Self::$variant => $bytes, )+
                }
            }

            /// All domain variants in declaration order.
            pub const ALL: &[HashDomain] = &[
                $( Self::$variant, )+
            ];
        }

        impl core::fmt::Display for HashDomain {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                match self {
                    $( Self::$variant => write!(f, stringify!($variant)), )+
                }
            }
        }
    };
}

define_hash_domains! {
    // Kernel

    /// Per-node content fingerprint (identifier, costs, metadata, edges).
    GraphNode => b"TRAILHEAD::GRAPH_NODE::V1\0",

    /// Whole-graph digest bound into search trace metadata.
    ActivityGraph => b"TRAILHEAD::ACTIVITY_GRAPH::V1\0",

    // Search

    /// Search trace (expansion audit log) hashing.
    SearchTrace => b"TRAILHEAD::SEARCH_TRACE::V1\0",

    /// Search policy snapshot hashing.
    SearchPolicy => b"TRAILHEAD::SEARCH_POLICY::V1\0",

    // Harness

    /// Bundle artifact content hashing.
    BundleArtifact => b"TRAILHEAD::BUNDLE_ARTIFACT::V1\0",

    /// Bundle digest (normative projection).
    BundleDigest => b"TRAILHEAD::BUNDLE_DIGEST::V1\0",

    // Benchmarks

    /// Benchmark determinism guard.
    BenchGuard => b"TRAILHEAD::BENCH_GUARD::V1\0",
}
