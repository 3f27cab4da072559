//! Application start: find the trigger element and wire its click handler.
//!
//! The host calls [`start`] once the document is ready and passes the page
//! handle in, instead of the glue listening for a global `load` event.

use crate::config::MissingTrigger;
use crate::debug::{self, cat};
use crate::error::LinkError;
use crate::flow::LinkFlow;

/// Element that can carry a click handler.
pub trait Trigger {
    fn on_click(&self, handler: Box<dyn Fn()>) -> Result<(), LinkError>;
}

/// Document-like handle the trigger is looked up in.
pub trait Page {
    type Trigger: Trigger;

    fn query_selector(&self, selector: &str) -> Option<Self::Trigger>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bootstrap {
    /// Click handler attached to the trigger.
    Attached,
    /// No trigger on the page; nothing was wired.
    NoTrigger,
}

pub fn start<P: Page>(page: &P, flow: &LinkFlow) -> Result<Bootstrap, LinkError> {
    let config = flow.config();
    let selector = config.trigger_selector.as_str();

    let Some(trigger) = page.query_selector(selector) else {
        return match config.missing_trigger {
            MissingTrigger::Ignore => {
                log::warn!("[link] trigger {selector:?} not found; account linking disabled");
                Ok(Bootstrap::NoTrigger)
            }
            MissingTrigger::Fail => Err(LinkError::TriggerMissing {
                selector: selector.to_string(),
            }),
        };
    };

    let flow = flow.clone();
    trigger.on_click(Box::new(move || flow.handle_click()))?;
    debug::log(cat::BOOT, format!("click handler attached to {selector}"));
    Ok(Bootstrap::Attached)
}
