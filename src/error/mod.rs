mod vertrack;

pub use vertrack::VertrackError;

/// Classifies storage-layer constraint failures so callers can tell a
/// duplicate name, a dangling link, and a rejected field value apart.
pub trait IsConstraintViolation {
    fn is_unique_violation(&self) -> bool;
    fn is_foreign_key_violation(&self) -> bool;
    fn is_check_violation(&self) -> bool;
}
