//! Drives a single location request through the service.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use combain::registry::SessionId;
use combain::scan::ScanItem;
use combain::service::LocationService;
use tracing::{info, warn};

use crate::error::CliError;
use crate::outcome::LocationOutcome;

/// The CLI is the only client, so it uses a single session.
const CLI_SESSION: SessionId = SessionId(1);

/// Submit `items` as one request and wait for its outcome.
///
/// On deadline expiry or Ctrl-C the request is destroyed so a late
/// response is dropped.
pub async fn locate(
    service: &mut LocationService,
    items: Vec<ScanItem>,
    deadline: Duration,
) -> Result<LocationOutcome, CliError> {
    let slot: Rc<RefCell<Option<LocationOutcome>>> = Rc::default();

    let registry = service.registry_mut();
    let handle = registry.create(CLI_SESSION);
    for item in items {
        registry.append_item(CLI_SESSION, handle, item)?;
    }

    info!(%handle, "Attempting to submit location request");
    let sink = Rc::clone(&slot);
    registry.submit(CLI_SESSION, handle, move |registry, handle, kind| {
        *sink.borrow_mut() = Some(LocationOutcome::collect(registry, CLI_SESSION, handle, kind));
    })?;

    let expiry = tokio::time::sleep(deadline);
    tokio::pin!(expiry);

    loop {
        let finished = slot.borrow_mut().take();
        if let Some(outcome) = finished {
            service.registry_mut().destroy(CLI_SESSION, handle);
            return Ok(outcome);
        }

        tokio::select! {
            _ = service.wait_for_responses() => {
                service.process_responses();
            }
            _ = &mut expiry => {
                warn!(%handle, "Deadline expired; abandoning request");
                service.registry_mut().destroy(CLI_SESSION, handle);
                return Err(CliError::DeadlineExpired(deadline));
            }
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    warn!(error = %e, "Failed to listen for Ctrl-C");
                }
                service.registry_mut().destroy(CLI_SESSION, handle);
                return Err(CliError::Interrupted);
            }
        }
    }
}
