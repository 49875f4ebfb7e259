use serde::{Deserialize, Serialize};

/// Progress of the latest asynchronous operation of a slice.
///
/// Only the latest operation is reflected: starting one clears whatever
/// error or message the previous one left behind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestState {
    pub loading: bool,
    pub error: Option<String>,
    pub message: Option<String>,
}

impl RequestState {
    pub fn begin(&mut self) {
        self.loading = true;
        self.error = None;
        self.message = None;
    }

    pub fn succeed(&mut self) {
        self.loading = false;
        self.error = None;
    }

    pub fn succeed_with(&mut self, message: Option<String>) {
        self.succeed();
        self.message = message;
    }

    pub fn fail(&mut self, error: impl Into<String>) {
        self.loading = false;
        self.error = Some(error.into());
        self.message = None;
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_clears_previous_outcome() {
        let mut state = RequestState {
            loading: false,
            error: Some("boom".into()),
            message: Some("done".into()),
        };
        state.begin();
        assert!(state.loading);
        assert!(state.error.is_none());
        assert!(state.message.is_none());
    }

    #[test]
    fn test_fail_is_idempotent() {
        let mut once = RequestState::default();
        once.begin();
        once.fail("nope");
        let mut twice = once.clone();
        twice.fail("nope");
        assert_eq!(once, twice);
    }
}
