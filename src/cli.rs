use anyhow::{bail, Context, Result};
use serde_json::{json, Value};
use std::io::Read;

use azops::config;
use azops::handlers::project::handle_project_event;
use azops::handlers::work_item::handle_work_item_event;
use azops::runtime::build_services;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Project,
    WorkItem,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub target: Target,
    /// Inline event JSON. `None` means read it from stdin.
    pub event: Option<String>,
}

/// Parse `azops <project|work-item> [json|-]`. Returns `None` when help was requested.
pub fn parse_invoke_args(args: &[String]) -> Result<Option<Invocation>> {
    let Some(first) = args.first() else {
        return Ok(None);
    };

    let target = match first.as_str() {
        "-h" | "--help" | "help" => return Ok(None),
        "project" | "projects" => Target::Project,
        "work-item" | "workitem" | "work-items" => Target::WorkItem,
        other => bail!("Unknown handler '{other}'. Expected 'project' or 'work-item'"),
    };

    let event = match &args[1..] {
        [] => None,
        [single] if single == "-" => None,
        [single] => Some(single.clone()),
        _ => bail!("Pass the event as a single JSON argument (quote it) or via stdin"),
    };

    Ok(Some(Invocation { target, event }))
}

/// Project events arrive wrapped in `{ body }`. Wrap bare requests so both shapes work locally.
pub fn shape_event(target: Target, event: Value) -> Value {
    match target {
        Target::Project if event.get("body").is_none() => json!({ "body": event }),
        _ => event,
    }
}

/// Run the chosen handler once and print the response. Returns the process exit code.
pub async fn handle_invoke(invocation: Invocation) -> Result<i32> {
    let raw = match invocation.event {
        Some(raw) => raw,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read event from stdin")?;
            buf
        }
    };
    let event: Value = serde_json::from_str(&raw).context("Event is not valid JSON")?;
    let event = shape_event(invocation.target, event);

    let config = config::load_config()?;
    let token = std::env::var("AZURE_API_TOKEN").ok().filter(|t| !t.is_empty());
    let services = build_services(&config, token).await;

    let response = match invocation.target {
        Target::Project => handle_project_event(&event, &services).await,
        Target::WorkItem => handle_work_item_event(&event, &services).await,
    };

    let printable = json!({
        "statusCode": response.status_code,
        "body": response.body_json().unwrap_or(Value::String(response.body.clone())),
    });
    println!("{}", serde_json::to_string_pretty(&printable)?);

    Ok(if response.status_code == 200 { 0 } else { 1 })
}

pub fn print_help() {
    println!("azops: invoke the Azure DevOps handlers locally\n");
    println!("USAGE:");
    println!("  azops project <json>     Run the project handler");
    println!("  azops work-item <json>   Run the work item handler");
    println!("  azops <handler> -        Read the event from stdin");
    println!();
    println!("CONFIG:");
    println!("  ~/.azops/config.toml (or $AZOPS_CONFIG), overridden by environment variables.");
    println!("  Set AZURE_API_TOKEN to skip Secrets Manager.");
    println!();
    println!("EXAMPLES:");
    println!("  azops project '{{\"action\":\"list\"}}'");
    println!("  azops work-item '{{\"action\":\"get\",\"payload\":{{\"id\":42}}}}'");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(strs: &[&str]) -> Vec<String> {
        strs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_args_means_help() {
        assert_eq!(parse_invoke_args(&args(&[])).unwrap(), None);
        assert_eq!(parse_invoke_args(&args(&["--help"])).unwrap(), None);
    }

    #[test]
    fn parse_inline_event() {
        let invocation = parse_invoke_args(&args(&["work-item", r#"{"action":"list"}"#]))
            .unwrap()
            .unwrap();
        assert_eq!(invocation.target, Target::WorkItem);
        assert_eq!(invocation.event.as_deref(), Some(r#"{"action":"list"}"#));
    }

    #[test]
    fn dash_reads_stdin() {
        let invocation = parse_invoke_args(&args(&["project", "-"])).unwrap().unwrap();
        assert_eq!(invocation.target, Target::Project);
        assert_eq!(invocation.event, None);
    }

    #[test]
    fn unknown_handler_fails() {
        let result = parse_invoke_args(&args(&["pipelines"]));
        assert!(result.unwrap_err().to_string().contains("Unknown handler"));
    }

    #[test]
    fn unquoted_json_fails() {
        let result = parse_invoke_args(&args(&["project", "{action:", "list}"]));
        assert!(result.unwrap_err().to_string().contains("single JSON argument"));
    }

    #[test]
    fn project_events_get_wrapped() {
        let wrapped = shape_event(Target::Project, json!({ "action": "list" }));
        assert_eq!(wrapped, json!({ "body": { "action": "list" } }));

        let already = shape_event(Target::Project, json!({ "body": "{}" }));
        assert_eq!(already, json!({ "body": "{}" }));

        let work_item = shape_event(Target::WorkItem, json!({ "action": "list" }));
        assert_eq!(work_item, json!({ "action": "list" }));
    }
}
