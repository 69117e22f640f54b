use super::DispatchTool;
use crate::client::CommanderClient;

pub struct GetTargetPlacesTool;

impl DispatchTool for GetTargetPlacesTool {
    fn name(&self) -> &str {
        "get_target_places"
    }

    fn description(&self) -> &str {
        "Retrieve target places from the driving simulator, sorted by distance ascending. \
         Each target has id, lat, lng, distance and status."
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {}
        })
    }

    fn call(
        &self,
        _args: serde_json::Value,
        client: &CommanderClient,
    ) -> Result<serde_json::Value, String> {
        let targets = client.get_all_targets().map_err(|e| e.to_string())?;
        serde_json::to_value(targets).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_targets_array() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/api/set_next_action")
            .with_status(200)
            .with_body(
                r#"{"targets":[{"id":3,"lat":35.0,"lng":135.7,"distance":12.5,"status":"initial"}]}"#,
            )
            .create();

        let client = CommanderClient::new(&server.url());
        let result = GetTargetPlacesTool
            .call(serde_json::json!({}), &client)
            .unwrap();
        assert_eq!(result[0]["id"], 3);
        assert_eq!(result[0]["distance"], 12.5);
    }

    #[test]
    fn server_error_is_reported() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/api/set_next_action")
            .with_status(500)
            .with_body(r#"{"error":"boom"}"#)
            .create();

        let client = CommanderClient::new(&server.url());
        let err = GetTargetPlacesTool
            .call(serde_json::json!({}), &client)
            .unwrap_err();
        assert!(err.contains("boom"));
    }
}
