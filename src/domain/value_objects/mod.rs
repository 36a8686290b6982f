//! Domain value objects

mod change_kind;
mod session_state;

pub use change_kind::ChangeKind;
pub use session_state::SessionState;
