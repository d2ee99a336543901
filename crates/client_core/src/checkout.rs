use std::{sync::Arc, time::Duration};

use anyhow::Result;
use tokio::{sync::broadcast, time};
use tracing::{info, warn};

use crate::{cart::CartStore, config::Settings, order_link};

/// Opens a URI on the host platform. In the web front end this is a
/// location change; in tests it is a recording fake.
pub trait Navigator: Send + Sync {
    fn open(&self, uri: &str) -> Result<()>;
}

/// Reports whether the page still has user focus. Losing focus after the
/// deep link opens is the only signal that the wallet app took over.
pub trait FocusProbe: Send + Sync {
    fn has_focus(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Android,
    Ios,
    Desktop,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Focus was lost before the fallback delay elapsed: the wallet app
    /// accepted the deep link.
    HandedOff,
    /// The wallet never took over; the caller was redirected to the
    /// platform store listing for it.
    StoreRedirect { listing_url: String },
    /// Desktop has no store listing; the UI should show inline install
    /// instructions for the wallet extension.
    InstallPrompt,
}

/// Fire-and-forget completion signal. There is no acknowledgment channel
/// from the wallet, so submission is final the moment the link is handed
/// off; subscribers wanting a different confirmation strategy hook here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutEvent {
    OrderSubmitted { table: String, link: String },
}

pub struct CheckoutFlow {
    settings: Settings,
    navigator: Arc<dyn Navigator>,
    focus: Arc<dyn FocusProbe>,
    platform: Platform,
    events: broadcast::Sender<CheckoutEvent>,
}

impl CheckoutFlow {
    pub fn new(
        settings: Settings,
        navigator: Arc<dyn Navigator>,
        focus: Arc<dyn FocusProbe>,
        platform: Platform,
    ) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            settings,
            navigator,
            focus,
            platform,
            events,
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<CheckoutEvent> {
        self.events.subscribe()
    }

    /// Encodes the call-waiter transfer for the cart's table, hands the
    /// deep link to the navigator, and arms the fallback timer. The cart is
    /// cleared as soon as the link exists; there is no later acknowledgment
    /// to wait for. Encoding faults propagate to the caller.
    pub async fn call_waiter(
        &self,
        cart: &mut CartStore,
        memo_template: Option<&str>,
    ) -> Result<CheckoutOutcome> {
        let table = cart.table().to_string();
        let link = order_link::build_order_link(&self.settings, &table, memo_template)?;

        let _ = self.events.send(CheckoutEvent::OrderSubmitted {
            table: table.clone(),
            link: link.clone(),
        });
        cart.clear();

        info!(%table, "opening wallet deep link");
        if let Err(err) = self.navigator.open(&link) {
            // Same failure mode as an uninstalled wallet: fall through to
            // the store redirect rather than erroring out.
            warn!(%err, "deep link navigation failed");
        }

        time::sleep(Duration::from_millis(self.settings.fallback_delay_ms)).await;

        if !self.focus.has_focus() {
            return Ok(CheckoutOutcome::HandedOff);
        }

        // Still focused after the delay: the wallet app is not installed or
        // not registered for the scheme.
        match self.platform {
            Platform::Android => {
                let listing_url = self.settings.android_store_url.clone();
                self.navigator.open(&listing_url)?;
                Ok(CheckoutOutcome::StoreRedirect { listing_url })
            }
            Platform::Ios => {
                let listing_url = self.settings.ios_store_url.clone();
                self.navigator.open(&listing_url)?;
                Ok(CheckoutOutcome::StoreRedirect { listing_url })
            }
            Platform::Desktop => Ok(CheckoutOutcome::InstallPrompt),
        }
    }
}

#[cfg(test)]
#[path = "tests/checkout_tests.rs"]
mod tests;
