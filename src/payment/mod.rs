//! Payment gateway collaborator
//!
//! Checkout is collected by an external hosted widget; this module keeps
//! it a black box behind a small trait so gateway-specific behavior never
//! reaches the cache or session layers. The widget resource is loaded at
//! most once per process lifetime.

use std::sync::{Mutex, OnceLock};

use thiserror::Error;
use tracing::{debug, info};

use crate::api::types::CheckoutOrder;

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("payment widget failed to load: {0}")]
    WidgetLoad(String),
    #[error("no checkout in progress")]
    NoActiveCheckout,
}

/// External payment collaborator: hand it an order descriptor, it collects
/// payment and reports completion back.
pub trait PaymentGateway: Send + Sync {
    /// Present the checkout for a pending order.
    fn open_checkout(&self, order: &CheckoutOrder) -> Result<(), PaymentError>;

    /// The order currently being collected, if any.
    fn active_order(&self) -> Option<CheckoutOrder>;

    /// Called when the user completes (or abandons) the widget. Returns
    /// the completed order so the caller can kick off the settle schedule.
    fn finish(&self) -> Result<CheckoutOrder, PaymentError>;
}

/// Idempotent loader for the hosted widget resource.
#[derive(Debug, Default)]
pub struct WidgetLoader {
    loaded: OnceLock<()>,
}

impl WidgetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the widget, or reuse the already-loaded instance. Repeated
    /// calls never inject a second copy.
    pub fn ensure_loaded(&self) -> Result<(), PaymentError> {
        let mut first = false;
        self.loaded.get_or_init(|| {
            first = true;
        });
        if first {
            info!("payment widget loaded");
        } else {
            debug!("payment widget already loaded, reusing");
        }
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.get().is_some()
    }
}

/// Default gateway: the backend returns a hosted checkout URL; the UI
/// surfaces it as the payment surface and reports completion back.
#[derive(Debug, Default)]
pub struct HostedCheckout {
    widget: WidgetLoader,
    active: Mutex<Option<CheckoutOrder>>,
}

impl HostedCheckout {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_active(&self) -> std::sync::MutexGuard<'_, Option<CheckoutOrder>> {
        self.active
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PaymentGateway for HostedCheckout {
    fn open_checkout(&self, order: &CheckoutOrder) -> Result<(), PaymentError> {
        self.widget.ensure_loaded()?;
        info!(session_id = %order.session_id, "opening hosted checkout");
        *self.lock_active() = Some(order.clone());
        Ok(())
    }

    fn active_order(&self) -> Option<CheckoutOrder> {
        self.lock_active().clone()
    }

    fn finish(&self) -> Result<CheckoutOrder, PaymentError> {
        self.lock_active()
            .take()
            .ok_or(PaymentError::NoActiveCheckout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order() -> CheckoutOrder {
        CheckoutOrder {
            session_id: "cs_123".to_string(),
            checkout_url: "https://pay.example.com/cs_123".to_string(),
        }
    }

    #[test]
    fn test_widget_loads_once() {
        let loader = WidgetLoader::new();
        assert!(!loader.is_loaded());
        loader.ensure_loaded().unwrap();
        loader.ensure_loaded().unwrap();
        assert!(loader.is_loaded());
    }

    #[test]
    fn test_open_then_finish_round_trip() {
        let gateway = HostedCheckout::new();
        gateway.open_checkout(&order()).unwrap();
        assert_eq!(gateway.active_order().unwrap().session_id, "cs_123");

        let finished = gateway.finish().unwrap();
        assert_eq!(finished.session_id, "cs_123");
        assert!(gateway.active_order().is_none());
    }

    #[test]
    fn test_finish_without_checkout_errors() {
        let gateway = HostedCheckout::new();
        assert!(matches!(
            gateway.finish(),
            Err(PaymentError::NoActiveCheckout)
        ));
    }
}
