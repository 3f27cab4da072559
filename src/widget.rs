//! Seam between the link flow and the hosted account-linking widget.

use std::rc::Rc;

use crate::error::LinkError;
use crate::types::{EventMetadata, ExitError, ExitMetadata, LinkMetadata, LinkToken, PublicToken};

/// Callbacks the widget invokes during and after a session.
pub trait LinkHandlers {
    fn on_success(&self, public_token: PublicToken, metadata: LinkMetadata);
    fn on_exit(&self, error: Option<ExitError>, metadata: ExitMetadata);
    fn on_event(&self, event_name: String, metadata: EventMetadata);
}

/// A widget that can be created for a link token and opened.
///
/// In the browser this is `Plaid.create({token, onSuccess, onExit, onEvent}).open()`.
pub trait LinkWidget {
    fn open(&self, token: &LinkToken, handlers: Rc<dyn LinkHandlers>) -> Result<(), LinkError>;
}
