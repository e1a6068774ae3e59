use std::sync::{
    OnceLock,
    atomic::{AtomicBool, Ordering},
};

static CANCEL_REQUESTED: AtomicBool = AtomicBool::new(false);
static INTERRUPT_HOOK_INSTALLED: OnceLock<()> = OnceLock::new();

/// Installs the Ctrl-C handler once and returns the flag it sets.
///
/// A second Ctrl-C while the flag is already set exits immediately with
/// status 130.
pub fn cancel_flag() -> &'static AtomicBool {
    INTERRUPT_HOOK_INSTALLED.get_or_init(|| {
        if let Err(err) = ctrlc::set_handler(|| {
            if CANCEL_REQUESTED.swap(true, Ordering::Relaxed) {
                std::process::exit(130);
            }
            log::warn!("interrupt: cancellation requested");
        }) {
            log::warn!("interrupt: failed to install handler err={err}");
        }
    });
    &CANCEL_REQUESTED
}

pub fn is_cancelled() -> bool {
    CANCEL_REQUESTED.load(Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::{cancel_flag, is_cancelled};

    #[test]
    fn handler_installs_once_and_starts_clear() {
        let first = cancel_flag();
        let second = cancel_flag();
        assert!(std::ptr::eq(first, second));
        assert!(!first.load(Ordering::Relaxed));
        assert!(!is_cancelled());
    }
}
