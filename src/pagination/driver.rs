//! The paging loop
//!
//! Drives one operation from its starting cursor until the service stops
//! returning a cursor or the caller has taken manual control. Calls are
//! strictly sequential: each request depends on the previous page's cursor.

use super::types::{NextPage, Page, PaginationState, Paginator};
use crate::context::InvocationContext;
use crate::error::Result;
use crate::failure;
use crate::invoker::ServiceInvoker;
use crate::request::RequestBuilder;
use tracing::debug;

/// Run the paging loop, handing each page to `on_page` before the next call.
///
/// Invoker failures are classified and abort the loop. Pages already handed
/// to `on_page` stay delivered. Nothing is retried here.
pub async fn paginate<I, F>(
    invoker: &I,
    builder: &dyn RequestBuilder,
    paginator: &dyn Paginator,
    context: &InvocationContext,
    mut on_page: F,
) -> Result<PaginationState>
where
    I: ServiceInvoker + ?Sized,
    F: FnMut(&Page) -> Result<()>,
{
    let mut state = PaginationState::starting_at(context.starting_cursor());
    let endpoint = invoker.endpoint();

    loop {
        let cursor = if paginator.is_paginated() {
            state.cursor.as_deref()
        } else {
            None
        };
        let request = builder.build(context, cursor)?;

        debug!(
            endpoint = %endpoint,
            operation = %request.operation,
            cursor = ?cursor,
            "Invoking {} on endpoint {}",
            request.operation,
            endpoint
        );

        state.calls += 1;
        let response = invoker
            .invoke(&request)
            .await
            .map_err(|e| failure::classify(e, &endpoint, context.operation()))?;

        let page = paginator.page(response);
        on_page(&page)?;
        let next = paginator.process_page(&page, &mut state);

        if context.manual_control() || !paginator.is_paginated() {
            state.mark_done();
            break;
        }
        if let NextPage::Done = next {
            break;
        }
    }

    Ok(state)
}
