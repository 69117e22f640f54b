use crate::client::CommanderClient;
use crate::output::{print_json, print_table};
use anyhow::Result;

pub fn go_to_nearest(client: &CommanderClient, json: bool) -> Result<()> {
    client.go_to_nearest()?;
    if json {
        print_json(&serde_json::json!({ "success": true }))?;
    } else {
        println!("Sent: go to nearest target");
    }
    Ok(())
}

pub fn go_to_target(client: &CommanderClient, target_id: i64, json: bool) -> Result<()> {
    client.go_to_target(target_id)?;
    if json {
        print_json(&serde_json::json!({ "success": true, "target": target_id }))?;
    } else {
        println!("Sent: go to target {target_id}");
    }
    Ok(())
}

pub fn list_targets(client: &CommanderClient, json: bool) -> Result<()> {
    let targets = client.get_all_targets()?;
    if json {
        return print_json(&targets);
    }

    if targets.is_empty() {
        println!("No targets reported yet.");
        return Ok(());
    }

    let headers = &["ID", "DISTANCE", "STATUS", "LAT", "LNG"];
    let rows: Vec<Vec<String>> = targets
        .iter()
        .map(|t| {
            vec![
                t.id.to_string(),
                format!("{:.1}", t.distance),
                t.status.clone(),
                format!("{:.5}", t.lat),
                format!("{:.5}", t.lng),
            ]
        })
        .collect();

    print_table(headers, rows);
    Ok(())
}
