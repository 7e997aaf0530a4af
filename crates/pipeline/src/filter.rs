//! Outbound broadcast filters.

use std::{
    fmt,
    sync::{Arc, RwLock},
};

use {
    comet_common::Payload,
    tracing::{debug, info},
};

/// The outcome a broadcast filter returns.
#[derive(Debug, Clone, PartialEq)]
pub enum BroadcastAction {
    /// Pass the (possibly transformed) payload to the next filter.
    Continue(Payload),
    /// Drop the broadcast entirely.
    Abort(Payload),
    /// Deliver the payload as-is without running the remaining filters.
    Skip(Payload),
}

impl BroadcastAction {
    pub fn payload(&self) -> &Payload {
        match self {
            Self::Continue(p) | Self::Abort(p) | Self::Skip(p) => p,
        }
    }

    pub fn into_payload(self) -> Payload {
        match self {
            Self::Continue(p) | Self::Abort(p) | Self::Skip(p) => p,
        }
    }
}

/// A stage applied to every outbound message before fan-out.
pub trait BroadcastFilter: Send + Sync {
    /// A human-readable name, also used to de-duplicate registrations.
    fn name(&self) -> &str;

    fn filter(&self, message: Payload) -> BroadcastAction;
}

// ── FilterChain ─────────────────────────────────────────────────────────────

/// Ordered set of broadcast filters shared by all broadcasters.
#[derive(Default)]
pub struct FilterChain {
    filters: RwLock<Vec<Arc<dyn BroadcastFilter>>>,
}

impl FilterChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a filter. Returns false if a filter with the same name is
    /// already registered.
    pub fn add(&self, filter: Arc<dyn BroadcastFilter>) -> bool {
        let mut filters = self.filters.write().unwrap_or_else(|e| e.into_inner());
        if filters.iter().any(|f| f.name() == filter.name()) {
            debug!(filter = filter.name(), "broadcast filter already registered");
            return false;
        }
        info!(filter = filter.name(), "broadcast filter registered");
        filters.push(filter);
        true
    }

    pub fn len(&self) -> usize {
        self.filters.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registered filter names in execution order.
    pub fn names(&self) -> Vec<String> {
        self.snapshot()
            .iter()
            .map(|f| f.name().to_string())
            .collect()
    }

    /// Run every filter in order.
    ///
    /// Each filter receives the previous filter's output. The first
    /// [`BroadcastAction::Abort`] or [`BroadcastAction::Skip`] ends the run.
    pub fn apply(&self, message: Payload) -> BroadcastAction {
        let mut current = message;
        for filter in self.snapshot() {
            match filter.filter(current) {
                BroadcastAction::Continue(next) => current = next,
                stop => {
                    debug!(filter = filter.name(), action = ?stop, "broadcast filter stopped chain");
                    return stop;
                },
            }
        }
        BroadcastAction::Continue(current)
    }

    // Filters run outside the lock; a filter may register another filter.
    fn snapshot(&self) -> Vec<Arc<dyn BroadcastFilter>> {
        self.filters
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterChain")
            .field("filters", &self.names())
            .finish()
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use comet_common::Body;

    use super::*;

    struct Upper;

    impl BroadcastFilter for Upper {
        fn name(&self) -> &str {
            "upper"
        }

        fn filter(&self, message: Payload) -> BroadcastAction {
            match message {
                Payload::Body(Body::Text(t)) => {
                    BroadcastAction::Continue(Payload::Body(Body::Text(t.to_uppercase())))
                },
                other => BroadcastAction::Continue(other),
            }
        }
    }

    struct Suffix(&'static str);

    impl BroadcastFilter for Suffix {
        fn name(&self) -> &str {
            self.0
        }

        fn filter(&self, message: Payload) -> BroadcastAction {
            match message {
                Payload::Body(Body::Text(t)) => {
                    BroadcastAction::Continue(Payload::Body(Body::Text(format!("{t}{}", self.0))))
                },
                other => BroadcastAction::Continue(other),
            }
        }
    }

    struct Aborter;

    impl BroadcastFilter for Aborter {
        fn name(&self) -> &str {
            "aborter"
        }

        fn filter(&self, message: Payload) -> BroadcastAction {
            BroadcastAction::Abort(message)
        }
    }

    fn text(s: &str) -> Payload {
        Payload::Body(Body::from(s))
    }

    #[test]
    fn filters_run_in_registration_order() {
        let chain = FilterChain::new();
        assert!(chain.add(Arc::new(Suffix("!"))));
        assert!(chain.add(Arc::new(Upper)));
        assert_eq!(chain.names(), vec!["!", "upper"]);

        let result = chain.apply(text("hi"));
        assert_eq!(result, BroadcastAction::Continue(text("HI!")));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let chain = FilterChain::new();
        assert!(chain.add(Arc::new(Upper)));
        assert!(!chain.add(Arc::new(Upper)));
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn abort_short_circuits() {
        let chain = FilterChain::new();
        chain.add(Arc::new(Aborter));
        chain.add(Arc::new(Upper));

        let result = chain.apply(text("hi"));
        assert_eq!(result, BroadcastAction::Abort(text("hi")));
    }

    #[test]
    fn empty_chain_passes_message_through() {
        let chain = FilterChain::new();
        assert!(chain.is_empty());
        assert_eq!(chain.apply(text("x")).into_payload(), text("x"));
    }
}
