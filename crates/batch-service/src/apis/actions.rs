//! User action dispatch.
//!
//! Applies one [`UserAction`] to the session and answers with the outcome
//! and the view state right after it.

use super::error::ApiError;
use batch_core::{Dispatch, UiState, UserAction, ViewController};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Body of `POST /api/actions`.
#[derive(Debug, Clone, Deserialize)]
pub struct ActionRequest {
	pub action: UserAction,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActionResponse {
	pub dispatch: Dispatch,
	pub state: UiState,
}

/// Processes an action request against the session.
///
/// Submissions and status checks are started in the background, so the
/// returned state already shows them as pending.
pub async fn process_action(
	request: ActionRequest,
	controller: &Arc<ViewController>,
) -> Result<ActionResponse, ApiError> {
	let dispatch = controller.dispatch(request.action).await?;
	Ok(ActionResponse {
		dispatch,
		state: controller.view(),
	})
}
