/// Status embed builders shared across commands.
pub mod embed;
/// Permission helper utilities.
pub mod permissions;
