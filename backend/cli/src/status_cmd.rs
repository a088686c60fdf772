//! CLI Status Command
//!
//! Reports whether an agent is configured and prints the effective
//! configuration with secrets masked.

use anyhow::Result;

use coachline_config::{redacted, CoachConfig};

use crate::terminal_output::{note_success, note_warn, render_table, Column};

pub fn run(config: &CoachConfig) -> Result<()> {
    println!("\nCoachline status\n");

    if config.agent.is_configured() {
        note_success("Agent credentials configured: calls connect to ElevenLabs.");
    } else {
        note_warn("No agent credentials: running in demo mode.");
    }
    println!();

    print!("{}", render_table(&[Column::left("Setting"), Column::left("Value")], &rows(config)));
    println!();
    println!("{}", serde_json::to_string_pretty(&redacted(config))?);
    Ok(())
}

fn rows(config: &CoachConfig) -> Vec<Vec<String>> {
    let safe = redacted(config);
    let show = |value: &Option<String>| value.clone().unwrap_or_else(|| "(unset)".to_string());
    vec![
        vec!["agent.agent_id".into(), show(&safe.agent.agent_id)],
        vec!["agent.api_key".into(), show(&safe.agent.api_key)],
        vec!["agent.branch_id".into(), show(&safe.agent.branch_id)],
        vec!["demo.time_unit_ms".into(), safe.demo.time_unit_ms.to_string()],
        vec!["logging.level".into(), safe.logging.level.clone()],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_never_show_raw_key() {
        let mut config = CoachConfig::default();
        config.agent.agent_id = Some("agent_123".into());
        config.agent.api_key = Some("sk_live_abcdefghijklmnop".into());

        let rows = rows(&config);
        let key_row = rows.iter().find(|r| r[0] == "agent.api_key").unwrap();
        assert_ne!(key_row[1], "sk_live_abcdefghijklmnop");
        assert!(key_row[1].ends_with("***"));

        let branch_row = rows.iter().find(|r| r[0] == "agent.branch_id").unwrap();
        assert_eq!(branch_row[1], "(unset)");
    }
}
