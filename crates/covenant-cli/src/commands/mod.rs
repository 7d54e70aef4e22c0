//! CLI subcommands.

#[expect(
    unreachable_pub,
    reason = "binary crate, pub inside private module is fine"
)]
pub mod check;
#[expect(
    unreachable_pub,
    reason = "binary crate, pub inside private module is fine"
)]
pub mod registry;
