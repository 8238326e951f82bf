//! HTTP server for the batch wallet view API.
//!
//! Exposes the session's renderable state and accepts user actions, so any
//! front end can draw the page and forward button presses.

use crate::apis::actions::{process_action, ActionRequest, ActionResponse};
use crate::apis::error::ApiError;
use axum::{
	extract::State,
	response::Json,
	routing::{get, post},
	Router,
};
use batch_config::ApiConfig;
use batch_core::{UiState, ViewController};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

/// Shared application state for the API server.
#[derive(Clone)]
pub struct AppState {
	/// The session behind the view.
	pub controller: Arc<ViewController>,
}

/// Builds the router with the `/api` routes and the health check.
pub fn build_router(controller: Arc<ViewController>) -> Router {
	Router::new()
		.nest(
			"/api",
			Router::new()
				.route("/state", get(handle_state))
				.route("/actions", post(handle_action)),
		)
		.route("/health", get(handle_health))
		.layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
		.with_state(AppState { controller })
}

/// Starts the HTTP server for the API.
pub async fn start_server(
	api_config: ApiConfig,
	controller: Arc<ViewController>,
) -> Result<(), Box<dyn std::error::Error>> {
	let app = build_router(controller);

	let bind_address = format!("{}:{}", api_config.host, api_config.port);
	let listener = TcpListener::bind(&bind_address).await?;

	tracing::info!("Batch wallet API server starting on {}", bind_address);

	axum::serve(listener, app).await?;

	Ok(())
}

/// Handles GET /api/state requests.
async fn handle_state(State(state): State<AppState>) -> Json<UiState> {
	Json(state.controller.view())
}

/// Handles POST /api/actions requests.
///
/// Connector failures are answered with 502; submission and status outcomes
/// are reported through the returned state instead.
async fn handle_action(
	State(state): State<AppState>,
	Json(request): Json<ActionRequest>,
) -> Result<Json<ActionResponse>, ApiError> {
	let action = request.action;
	match process_action(request, &state.controller).await {
		Ok(response) => Ok(Json(response)),
		Err(e) => {
			tracing::warn!(?action, "Action failed: {}", e);
			Err(e)
		},
	}
}

async fn handle_health() -> &'static str {
	"OK"
}

#[cfg(test)]
mod tests {
	use super::*;
	use batch_config::builders::ConfigBuilder;
	use batch_core::ViewSettings;
	use batch_types::{BatchRequest, CallStatus, Receipt, SubmissionResult};
	use batch_wallet::{
		implementations::rpc::create_rpc_wallet, MockBatchTransport, MockStatusQuery,
		MockWalletConnector, WalletError, WalletHandles,
	};
	use serde_json::{json, Value};

	const ADDRESS: &str = "0xABCDEF0123456789ABCDEF0123456789ABCD1234";

	/// Serves `app` on an ephemeral port and returns its base URL.
	async fn serve(app: Router) -> String {
		let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
		let addr = listener.local_addr().unwrap();
		tokio::spawn(async move {
			axum::serve(listener, app).await.unwrap();
		});
		format!("http://{}", addr)
	}

	fn controller(handles: WalletHandles) -> Arc<ViewController> {
		Arc::new(ViewController::new(
			handles,
			BatchRequest::default_transfer().unwrap(),
			ViewSettings::default(),
		))
	}

	fn happy_handles() -> WalletHandles {
		let mut connector = MockWalletConnector::new();
		connector
			.expect_connect()
			.returning(|_| Ok(ADDRESS.to_string()));
		connector.expect_disconnect().returning(|| Ok(()));

		let mut transport = MockBatchTransport::new();
		transport
			.expect_send_calls()
			.returning(|_, _| Ok(SubmissionResult::new("abc123")));

		let mut status = MockStatusQuery::new();
		status
			.expect_get_calls_status()
			.returning(|_| Ok(CallStatus::Success(vec![Receipt::with_hash("0xdeadbeef")])));

		WalletHandles::new(Arc::new(connector), Arc::new(transport), Arc::new(status))
	}

	async fn act(client: &reqwest::Client, url: &str, action: &str) -> reqwest::Response {
		client
			.post(format!("{}/api/actions", url))
			.json(&json!({ "action": action }))
			.send()
			.await
			.unwrap()
	}

	/// Polls the state until `done` holds.
	async fn wait_for_state(client: &reqwest::Client, url: &str, done: fn(&Value) -> bool) -> Value {
		for _ in 0..100 {
			let state: Value = client
				.get(format!("{}/api/state", url))
				.send()
				.await
				.unwrap()
				.json()
				.await
				.unwrap();
			if done(&state) {
				return state;
			}
			tokio::time::sleep(std::time::Duration::from_millis(10)).await;
		}
		panic!("state did not settle");
	}

	#[tokio::test]
	async fn test_health() {
		let url = serve(build_router(controller(happy_handles()))).await;

		let body = reqwest::get(format!("{}/health", url))
			.await
			.unwrap()
			.text()
			.await
			.unwrap();

		assert_eq!(body, "OK");
	}

	#[tokio::test]
	async fn test_initial_state() {
		let url = serve(build_router(controller(happy_handles()))).await;

		let state: Value = reqwest::get(format!("{}/api/state", url))
			.await
			.unwrap()
			.json()
			.await
			.unwrap();

		assert_eq!(state["connection"]["isConnected"], false);
		assert_eq!(state["connection"]["label"], "Not connected");
		assert_eq!(state["connection"]["buttonLabel"], "Connect with MetaMask");
		assert_eq!(state["submission"]["canSend"], false);
		assert_eq!(state["batch"]["summary"][0], "0.001 ETH to 0x364C...8eE1");
	}

	#[tokio::test]
	async fn test_full_session_flow() {
		let url = serve(build_router(controller(happy_handles()))).await;
		let client = reqwest::Client::new();

		let response = act(&client, &url, "connect").await;
		assert_eq!(response.status(), 200);
		let body: Value = response.json().await.unwrap();
		assert_eq!(body["dispatch"], "applied");
		assert_eq!(body["state"]["connection"]["label"], "Connected to 0xABCD...1234");

		let body: Value = act(&client, &url, "send_batch").await.json().await.unwrap();
		assert_eq!(body["dispatch"], "started");
		let state = wait_for_state(&client, &url, |s| s["submission"]["isSuccess"] == true).await;
		assert_eq!(state["submission"]["lastResultId"], "abc123");
		assert_eq!(state["status"]["canCheck"], true);

		let body: Value = act(&client, &url, "check_status").await.json().await.unwrap();
		assert_eq!(body["dispatch"], "started");
		let state = wait_for_state(&client, &url, |s| !s["status"]["confirmedHash"].is_null()).await;
		assert_eq!(state["status"]["confirmedHash"], "0xdeadbeef");
		assert_eq!(
			state["status"]["explorerUrl"],
			"https://sepolia.etherscan.io/tx/0xdeadbeef"
		);

		let body: Value = act(&client, &url, "toggle_connection").await.json().await.unwrap();
		assert_eq!(body["dispatch"], "applied");
		assert_eq!(body["state"]["connection"]["isConnected"], false);
		assert!(body["state"]["submission"]["lastResultId"].is_null());
		assert!(body["state"]["status"]["confirmedHash"].is_null());
	}

	#[tokio::test]
	async fn test_send_while_disconnected_is_ignored() {
		let mut transport = MockBatchTransport::new();
		transport.expect_send_calls().never();
		let handles = WalletHandles::new(
			Arc::new(MockWalletConnector::new()),
			Arc::new(transport),
			Arc::new(MockStatusQuery::new()),
		);
		let url = serve(build_router(controller(handles))).await;

		let body: Value = act(&reqwest::Client::new(), &url, "send_batch")
			.await
			.json()
			.await
			.unwrap();

		assert_eq!(body["dispatch"], "ignored");
		assert_eq!(body["state"]["submission"]["isPending"], false);
	}

	#[tokio::test]
	async fn test_rejected_connect_is_bad_gateway() {
		let mut connector = MockWalletConnector::new();
		connector.expect_connect().returning(|_| {
			Err(WalletError::Rpc {
				code: 4001,
				message: "User rejected the request.".to_string(),
			})
		});
		let handles = WalletHandles::new(
			Arc::new(connector),
			Arc::new(MockBatchTransport::new()),
			Arc::new(MockStatusQuery::new()),
		);
		let url = serve(build_router(controller(handles))).await;

		let response = act(&reqwest::Client::new(), &url, "connect").await;

		assert_eq!(response.status(), 502);
		let body: Value = response.json().await.unwrap();
		assert_eq!(body["error"], "USER_REJECTED");
		assert_eq!(body["message"], "RPC error 4001: User rejected the request.");
	}

	#[tokio::test]
	async fn test_unknown_action_is_rejected() {
		let url = serve(build_router(controller(happy_handles()))).await;

		let response = act(&reqwest::Client::new(), &url, "launch_rocket").await;

		assert!(response.status().is_client_error());
	}

	#[tokio::test]
	async fn test_rpc_wallet_end_to_end() {
		// Minimal wallet endpoint speaking the EIP-5792 methods
		let wallet_app = Router::new().route(
			"/",
			post(|Json(body): Json<Value>| async move {
				let result = match body["method"].as_str().unwrap_or_default() {
					"eth_requestAccounts" => json!([ADDRESS]),
					"wallet_sendCalls" => json!("abc123"),
					"wallet_getCallsStatus" => json!({ "status": 500, "receipts": [] }),
					_ => Value::Null,
				};
				Json(json!({ "jsonrpc": "2.0", "id": body["id"], "result": result }))
			}),
		);
		let rpc_url = serve(wallet_app).await;

		let config = ConfigBuilder::new().rpc_url(rpc_url).build();
		let wallet = create_rpc_wallet(&config).unwrap();
		let controller = Arc::new(ViewController::new(
			WalletHandles::from_shared(wallet),
			config.batch_request().unwrap(),
			ViewSettings::from(&config),
		));
		let url = serve(build_router(controller)).await;
		let client = reqwest::Client::new();

		act(&client, &url, "connect").await;
		act(&client, &url, "send_batch").await;
		wait_for_state(&client, &url, |s| s["submission"]["lastResultId"] == "abc123").await;

		act(&client, &url, "check_status").await;
		let state = wait_for_state(&client, &url, |s| !s["status"]["error"].is_null()).await;

		assert_eq!(state["status"]["error"], "Transaction failed");
		assert_eq!(state["status"]["loading"], false);
	}
}
