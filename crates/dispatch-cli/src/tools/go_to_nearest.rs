use super::DispatchTool;
use crate::client::CommanderClient;

pub struct GoToNearestTool;

impl DispatchTool for GoToNearestTool {
    fn name(&self) -> &str {
        "go_to_nearest"
    }

    fn description(&self) -> &str {
        "Move towards the nearest target to your vehicle (for driving simulator)."
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
        client.go_to_nearest().map_err(|e| e.to_string())?;
        Ok(serde_json::json!({ "success": true }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[test]
    fn posts_go_to_nearest() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/api/set_next_action")
            .match_body(Matcher::Json(serde_json::json!({"action": "go_to_nearest"})))
            .with_status(200)
            .with_body(r#"{"success":true}"#)
            .create();

        let client = CommanderClient::new(&server.url());
        let result = GoToNearestTool.call(serde_json::Value::Null, &client).unwrap();
        assert_eq!(result["success"], true);
        mock.assert();
    }
}
