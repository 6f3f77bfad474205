//! Transaction configuration.

/// Order in which a rollback writes captured values back.
///
/// Signals are independent, so either order yields the same final state.
/// The order is only observable through change notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RestoreOrder {
    /// Most recently touched signal first.
    #[default]
    ReverseTouch,
    /// First touched signal first.
    Touch,
}

/// Configuration for a transaction.
#[derive(Debug, Clone)]
pub struct TransactionConfig {
    /// Optional label attached to log events.
    pub label: Option<String>,

    /// Whether dropping a pending `follow` future rolls the transaction back.
    pub rollback_on_cancel: bool,

    /// Write-back order used by rollback.
    pub restore_order: RestoreOrder,
}

impl Default for TransactionConfig {
    fn default() -> Self {
        Self {
            label: None,
            rollback_on_cancel: true,
            restore_order: RestoreOrder::ReverseTouch,
        }
    }
}

impl TransactionConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the label used in log events.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets whether a cancelled `follow` rolls back.
    #[must_use]
    pub fn rollback_on_cancel(mut self, value: bool) -> Self {
        self.rollback_on_cancel = value;
        self
    }

    /// Sets the rollback write-back order.
    #[must_use]
    pub fn restore_order(mut self, order: RestoreOrder) -> Self {
        self.restore_order = order;
        self
    }
}
