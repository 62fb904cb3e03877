mod generate;

/// Exit status for a services entry that cannot be turned into compose.
pub(crate) const EXIT_DOMAIN_ERROR: u8 = 5;
/// Exit status for unreadable input, bad configuration, or write failures.
pub(crate) const EXIT_INPUT_ERROR: u8 = 2;

pub use generate::{GenerateArgs, Generated, generate};

/// Map a failed run to its process exit status.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<portico_core::Error>() {
        Some(e) if e.is_domain() => EXIT_DOMAIN_ERROR,
        _ => EXIT_INPUT_ERROR,
    }
}
