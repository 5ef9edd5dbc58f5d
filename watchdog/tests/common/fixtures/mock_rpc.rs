//! Mock Nimiq JSON-RPC server for testing the HTTP client
//!
//! Every method is matched on the `method` field of the POSTed body.

use serde_json::{json, Value};
use std::time::Duration;
use wiremock::{
    matchers::{body_partial_json, method},
    Mock, MockServer, ResponseTemplate,
};

pub struct MockRpcServer {
    pub server: MockServer,
    pub base_url: String,
}

impl MockRpcServer {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let base_url = server.uri();
        Self { server, base_url }
    }

    fn rpc_method(rpc_method: &str) -> wiremock::MockBuilder {
        Mock::given(method("POST")).and(body_partial_json(json!({ "method": rpc_method })))
    }

    /// Respond with `{"result": <result>}`
    pub async fn mock_result(&self, rpc_method: &str, result: Value) {
        Self::rpc_method(rpc_method)
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": result
            })))
            .mount(&self.server)
            .await;
    }

    /// Respond with `{"result": {"data": <data>, "metadata": null}}`
    pub async fn mock_data(&self, rpc_method: &str, data: Value) {
        self.mock_result(rpc_method, json!({ "data": data, "metadata": null }))
            .await;
    }

    pub async fn mock_consensus(&self, established: bool) {
        self.mock_result("isConsensusEstablished", json!(established))
            .await;
    }

    pub async fn mock_block_number(&self, height: u64) {
        self.mock_data("getBlockNumber", json!(height)).await;
    }

    /// Serve each height once, in order
    pub async fn mock_block_sequence(&self, heights: &[u64]) {
        for height in heights {
            Self::rpc_method("getBlockNumber")
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "result": { "data": height, "metadata": null }
                })))
                .up_to_n_times(1)
                .mount(&self.server)
                .await;
        }
    }

    pub async fn mock_epoch_and_batch(&self, epoch: u64, batch: u64) {
        self.mock_data("getEpochNumber", json!(epoch)).await;
        self.mock_data("getBatchNumber", json!(batch)).await;
    }

    pub async fn mock_rpc_error(&self, rpc_method: &str, code: i64, message: &str) {
        Self::rpc_method(rpc_method)
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "error": { "code": code, "message": message }
            })))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_http_status(&self, rpc_method: &str, status: u16) {
        Self::rpc_method(rpc_method)
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_raw_body(&self, rpc_method: &str, body: &str) {
        Self::rpc_method(rpc_method)
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_slow(&self, rpc_method: &str, delay: Duration) {
        Self::rpc_method(rpc_method)
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "jsonrpc": "2.0", "id": 1, "result": true }))
                    .set_delay(delay),
            )
            .mount(&self.server)
            .await;
    }
}
