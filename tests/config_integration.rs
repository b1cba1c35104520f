use linear_mcp_probe::config::AppConfig;
use linear_mcp_probe::driver::RunPlan;
use linear_mcp_probe::error::ProbeError;
use serial_test::serial;
use std::env;
use std::fs;

// Helper to clear environment variables that might interfere with tests
fn clear_env_vars() {
    unsafe {
        env::remove_var("PROBE_CLIENT__SERVER");
        env::remove_var("PROBE_CLIENT__TOKEN_ENV");
        env::remove_var("PROBE_INVOCATION__TOOL");
        env::remove_var("PROBE_INVOCATION__ARGUMENTS");
        env::remove_var("CONFIG_FILE");
        env::remove_var("MCP_CONFIG");
    }
}

#[test]
#[serial]
fn test_default_config() {
    clear_env_vars();

    let config = AppConfig::load_from_args(["linear-mcp-probe"]).expect("defaults should load");
    assert_eq!(config.client.identity, "gomcp-linear-example");
    assert_eq!(config.client.server, "linear");
    assert_eq!(config.client.token_env, "LINEAR_API_TOKEN");
    assert!(config.client.mcp_config.is_none());
    assert_eq!(config.invocation.tool, "list_issues");

    let plan = RunPlan::from_config(&config).unwrap();
    assert_eq!(plan.arguments["team"], "Frontend");
    assert_eq!(plan.launch.mcp_servers.len(), 1);
    assert_eq!(plan.launch.server("linear").unwrap().command, "npx");
}

#[test]
#[serial]
fn test_env_override() {
    clear_env_vars();
    unsafe {
        env::set_var("PROBE_INVOCATION__TOOL", "list_teams");
    }

    let config = AppConfig::load_from_args(["linear-mcp-probe"]).expect("Failed to load config");
    assert_eq!(config.invocation.tool, "list_teams");

    clear_env_vars();
}

#[test]
#[serial]
fn test_cli_beats_env() {
    clear_env_vars();
    unsafe {
        env::set_var("PROBE_INVOCATION__TOOL", "list_teams");
    }

    let config = AppConfig::load_from_args(["linear-mcp-probe", "--tool", "list_projects"])
        .expect("Failed to load config");
    assert_eq!(config.invocation.tool, "list_projects");

    clear_env_vars();
}

#[test]
#[serial]
fn test_file_load() {
    clear_env_vars();

    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("probe.yaml");
    fs::write(
        &file_path,
        r#"
invocation:
  tool: list_cycles
  arguments: '{"team": "Backend"}'
"#,
    )
    .expect("Failed to write temp config");

    unsafe {
        env::set_var("CONFIG_FILE", &file_path);
    }

    let config = AppConfig::load_from_args(["linear-mcp-probe"])
        .expect("Failed to load config from file");
    assert_eq!(config.invocation.tool, "list_cycles");
    assert_eq!(config.invocation.arguments().unwrap()["team"], "Backend");
    // untouched keys keep their defaults
    assert_eq!(config.client.server, "linear");

    clear_env_vars();
}

#[test]
#[serial]
fn test_mcp_config_file_replaces_builtin_launch() {
    clear_env_vars();

    let dir = tempfile::tempdir().unwrap();
    let mcp_path = dir.path().join("mcp.json");
    fs::write(
        &mcp_path,
        r#"{
          "mcpServers": {
            "linear-local": {
              "command": "node",
              "args": ["./dist/index.js"],
              "env": { "LINEAR_API_TOKEN": "${LINEAR_API_TOKEN}" }
            }
          }
        }"#,
    )
    .unwrap();

    let config = AppConfig::load_from_args([
        "linear-mcp-probe",
        "--mcp-config",
        mcp_path.to_str().unwrap(),
        "--server",
        "linear-local",
    ])
    .unwrap();

    let plan = RunPlan::from_config(&config).unwrap();
    assert_eq!(plan.server, "linear-local");
    assert_eq!(plan.launch.server("linear-local").unwrap().command, "node");
    assert!(plan.launch.server("linear").is_none());
}

#[test]
#[serial]
fn test_bad_arguments_fail_before_connecting() {
    clear_env_vars();

    let config = AppConfig::load_from_args(["linear-mcp-probe", "--args", "[1, 2]"]).unwrap();
    let err = RunPlan::from_config(&config).unwrap_err();
    assert!(matches!(err, ProbeError::Config(_)));
    assert_eq!(err.exit_code(), 1);
}

#[test]
#[serial]
fn test_missing_mcp_config_file() {
    clear_env_vars();

    let config = AppConfig::load_from_args([
        "linear-mcp-probe",
        "--mcp-config",
        "/nonexistent/mcp.json",
    ])
    .unwrap();
    let err = RunPlan::from_config(&config).unwrap_err();
    assert!(err.to_string().contains("failed to read MCP config"));
}

#[test]
#[serial]
fn test_token_env_drives_forwarded_template() {
    clear_env_vars();
    unsafe {
        env::set_var("PROBE_CLIENT__TOKEN_ENV", "LINEAR_TOKEN_STAGING");
    }

    let config = AppConfig::load_from_args(["linear-mcp-probe"]).unwrap();
    assert_eq!(config.client.token_env, "LINEAR_TOKEN_STAGING");

    let plan = RunPlan::from_config(&config).unwrap();
    let entry = plan.launch.server("linear").unwrap();
    assert_eq!(
        entry.env.get("LINEAR_API_TOKEN").map(String::as_str),
        Some("${LINEAR_TOKEN_STAGING}")
    );

    clear_env_vars();
}
