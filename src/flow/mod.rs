//! # Flows
//!
//! Headless page orchestration: each flow owns its input, its action state and
//! its [`ResultPresenter`](crate::client::ResultPresenter).
//!
//! `submit` borrows the flow mutably for the whole exchange, so a flow can
//! never have two requests in flight. `action_enabled` reports `false` while
//! one is pending.
//!
//! The pending flag is held by a [`PendingGuard`], so it drops back to `false`
//! even when the `submit` future is abandoned part-way (a timeout or a losing
//! `select!` branch).

pub mod decode;
pub mod encode;

pub use decode::DecodeFlow;
pub use encode::EncodeFlow;

/// Keeps a pending flag raised for as long as it lives.
pub(crate) struct PendingGuard<'a> {
    flag: &'a mut bool,
}

impl<'a> PendingGuard<'a> {
    pub(crate) fn raise(flag: &'a mut bool) -> Self {
        *flag = true;
        Self { flag }
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        *self.flag = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_lowers_flag_on_drop() {
        let mut pending = false;
        {
            let guard = PendingGuard::raise(&mut pending);
            assert!(*guard.flag);
        }
        assert!(!pending);
    }
}
