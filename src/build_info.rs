//! Compile-time build metadata for the CLI help trailer.

/// VCS commit hash captured at build time ("unknown" outside a checkout).
pub const GIT_COMMIT: &str = env!("RETINT_BUILD_GIT_HASH");

/// Build time as unix seconds, captured at compile time.
pub const BUILD_EPOCH: &str = env!("RETINT_BUILD_EPOCH");

/// Trailer block appended to `retint --help`.
pub const HELP_BUILD_METADATA: &str = concat!(
    "Build: commit ",
    env!("RETINT_BUILD_GIT_HASH"),
    ", unix time ",
    env!("RETINT_BUILD_EPOCH")
);
