//! Fetch state of one page's data.

use std::fmt::Display;

/// A failed refresh keeps the last good value as `stale` so the page can
/// keep rendering it under the error banner.
#[derive(Debug, Clone, PartialEq)]
pub enum Loadable<T> {
    Idle,
    Loading { previous: Option<T> },
    Loaded(T),
    Failed { error: String, stale: Option<T> },
}

impl<T> Default for Loadable<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> Loadable<T> {
    /// Enter `Loading`, carrying whatever data is currently shown.
    pub fn start(&mut self) {
        let previous = match std::mem::take(self) {
            Self::Idle => None,
            Self::Loading { previous } => previous,
            Self::Loaded(value) => Some(value),
            Self::Failed { stale, .. } => stale,
        };
        *self = Self::Loading { previous };
    }

    /// Settle with a fetch outcome. Errors keep the previous data.
    pub fn finish<E: Display>(&mut self, result: Result<T, E>) {
        *self = match result {
            Ok(value) => Self::Loaded(value),
            Err(e) => {
                let stale = match std::mem::take(self) {
                    Self::Loading { previous } => previous,
                    Self::Loaded(value) => Some(value),
                    Self::Failed { stale, .. } => stale,
                    Self::Idle => None,
                };
                Self::Failed {
                    error: e.to_string(),
                    stale,
                }
            }
        };
    }

    /// Data to render, fresh or stale.
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Loaded(value) => Some(value),
            Self::Loading { previous } => previous.as_ref(),
            Self::Failed { stale, .. } => stale.as_ref(),
            Self::Idle => None,
        }
    }

    pub fn data_mut(&mut self) -> Option<&mut T> {
        match self {
            Self::Loaded(value) => Some(value),
            Self::Loading { previous } => previous.as_mut(),
            Self::Failed { stale, .. } => stale.as_mut(),
            Self::Idle => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_keeps_stale_data() {
        let mut state: Loadable<Vec<u32>> = Loadable::default();
        state.start();
        state.finish::<String>(Ok(vec![1, 2, 3]));
        state.start();
        assert!(state.is_loading());
        assert_eq!(state.data(), Some(&vec![1, 2, 3]));

        state.finish::<String>(Err("connection refused".into()));
        assert_eq!(state.error(), Some("connection refused"));
        assert_eq!(state.data(), Some(&vec![1, 2, 3]));
    }

    #[test]
    fn test_retry_after_failure_carries_stale() {
        let mut state = Loadable::Failed {
            error: "timeout".into(),
            stale: Some(7),
        };
        state.start();
        assert_eq!(state, Loadable::Loading { previous: Some(7) });
        state.finish::<&str>(Ok(8));
        assert_eq!(state.data(), Some(&8));
        assert!(state.error().is_none());
    }

    #[test]
    fn test_first_failure_has_nothing_to_show() {
        let mut state: Loadable<u8> = Loadable::default();
        state.start();
        state.finish(Err("boom"));
        assert!(state.data().is_none());
        assert_eq!(state.error(), Some("boom"));
    }
}
