//! Category query gating
//!
//! The category list is fetched only after the first products query has
//! succeeded, so the primary content never competes with it. Transitions are
//! driven by explicit events from the application.

/// Phase of the category list query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryPhase {
    /// Not mounted yet
    #[default]
    Idle,
    /// Mounted, waiting for a products query to succeed
    WaitingForProducts,
    /// Category list request running
    Fetching,
    /// Category list loaded; never re-enabled
    Loaded,
}

/// State machine gating the category list query
#[derive(Debug, Default)]
pub struct CategoryCoordinator {
    phase: CategoryPhase,
}

impl CategoryCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> CategoryPhase {
        self.phase
    }

    /// Whether the category query may run
    pub fn categories_enabled(&self) -> bool {
        self.phase == CategoryPhase::Fetching
    }

    pub fn is_loaded(&self) -> bool {
        self.phase == CategoryPhase::Loaded
    }

    /// Called when the product view is first shown
    pub fn mount(&mut self) {
        if self.phase == CategoryPhase::Idle {
            self.transition(CategoryPhase::WaitingForProducts);
        }
    }

    /// Called whenever a products query succeeds
    ///
    /// Returns true when the caller must start the category request.
    pub fn on_products_success(&mut self) -> bool {
        if self.phase == CategoryPhase::WaitingForProducts {
            self.transition(CategoryPhase::Fetching);
            true
        } else {
            false
        }
    }

    /// Called when the category request succeeds
    ///
    /// Returns true on the transition into `Loaded`, false if already there.
    pub fn on_categories_loaded(&mut self) -> bool {
        if self.phase == CategoryPhase::Fetching {
            self.transition(CategoryPhase::Loaded);
            true
        } else {
            false
        }
    }

    /// Called when the category request fails; the next products success retries
    pub fn on_categories_failed(&mut self) {
        if self.phase == CategoryPhase::Fetching {
            self.transition(CategoryPhase::WaitingForProducts);
        }
    }

    fn transition(&mut self, next: CategoryPhase) {
        tracing::debug!(from = ?self.phase, to = ?next, "category phase");
        self.phase = next;
    }
}
