//! Checkout and payment return commands.

use swiftthrift_core::{CartItemId, Price};
use swiftthrift_storefront::Storefront;
use swiftthrift_storefront::checkout::{CheckoutReturn, CheckoutState};
use swiftthrift_storefront::routes;
use url::Url;

use super::shop::print_orders;
use super::{CliError, out};

/// Select cart lines and hand off to the hosted checkout.
pub async fn checkout(state: &Storefront, items: &[CartItemId], all: bool) -> Result<(), CliError> {
    let session = state.session()?;
    let mut view = state.cart(&session).view(session.user().user_id);
    view.refresh().await?;

    let ledger = view.selection_mut();
    if all {
        ledger.select_all();
    } else {
        for id in items {
            if !ledger.toggle(*id) {
                tracing::warn!(cart_item_id = %id, "Not in your cart, ignoring");
            }
        }
    }
    // Drops lines removed from the cart since the selection was made.
    let ledger = view.refresh().await?;

    let currency = state.config().payment.currency;
    let mut coordinator = state.checkout(&session);
    let redirect = coordinator.checkout(session.user(), ledger).await?;

    out(format_args!(
        "Paying {} for {} item(s)",
        Price::new(ledger.total(), currency),
        ledger.len()
    ))?;
    out(format_args!("Continue to the payment page:\n{}", redirect.url))
}

/// Interpret the URL the hosted checkout redirected to and show orders.
pub async fn handle_return(state: &Storefront, url: &Url) -> Result<(), CliError> {
    let session = state.session()?;
    let mut coordinator = state.checkout(&session);

    let session_id = match coordinator.observe_return(CheckoutReturn::from_url(url))? {
        CheckoutState::ReturnedWithSessionId { session_id } => Some(session_id.clone()),
        _ => {
            out("Checkout was cancelled.")?;
            None
        }
    };

    let view = state
        .orders(&session)
        .view(session.user().user_id, session_id)
        .await?;
    print_orders(view, state.config().payment.currency)
}

/// Serve the payment return listener until interrupted.
pub async fn listen(state: &Storefront) -> Result<(), CliError> {
    let addr = state.config().return_addr();
    out(format_args!(
        "Listening for payment returns on http://{addr}/payment-success"
    ))?;
    routes::serve(state.clone(), addr).await?;
    Ok(())
}
