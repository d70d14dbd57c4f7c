use tracing::info;

/// Capability invoked when the backend rejects the session credential.
///
/// The transition is a full reset: whatever flow triggered the rejected
/// request is abandoned and the user starts over at login. Nothing held
/// outside the session store is expected to survive it.
pub trait Navigator: Send + Sync {
    fn redirect_to_login(&self);
}

/// Navigator for the command line. There is no page to swap out, so the
/// reset is a notice telling the user how to sign in again; the failed
/// command then ends the process.
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn redirect_to_login(&self) {
        info!("Redirecting to login");
        eprintln!("Your session has expired. Run `nokori login <email>` to sign in again.");
    }
}
