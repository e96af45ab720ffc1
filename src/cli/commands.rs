//! CLI command implementations
//!
//! Boot sequence: load and validate configuration, open the stores, wire the
//! capability factory and runtime, then dispatch the command.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;

use crate::blob_store::{BlobBackend, LocalBlobStore};
use crate::config::{EngineConfig, RUNTIME_SUBPROCESS};
use crate::functions::{
    compile, AuditTrail, FunctionDefinition, FunctionError, FunctionStore, InvocationContext,
    Invoker, NativeRuntime, ProcessRuntime, Runtime, RuntimeConfig,
};
use crate::observability::{Logger, Severity};
use crate::sdk::{EventBus, HttpFetch, InProcessBus, ReqwestFetch, SdkFactory, TokenService};
use crate::store::{DocumentStore, FileStore};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command. This is the
/// only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();

    match cli.command {
        Command::Deploy { config, name, file } => deploy(&config, &name, &file),
        Command::Invoke {
            config,
            name,
            query,
            body,
        } => invoke(&config, &name, query.as_deref(), body.as_deref()),
        Command::Logs { config, name } => logs(&config, &name),
    }
}

/// Build a fully wired invoker from configuration
fn boot(config: &EngineConfig) -> CliResult<Invoker> {
    let store: Arc<dyn DocumentStore> = Arc::new(FileStore::new(config.store_path()));
    let blobs: Arc<dyn BlobBackend> = Arc::new(LocalBlobStore::new(config.blob_root()));
    let fetch: Arc<dyn HttpFetch> = Arc::new(ReqwestFetch::new());
    let events: Arc<dyn EventBus> = Arc::new(InProcessBus::new());
    let tokens = Arc::new(TokenService::new(
        &config.token_secret,
        config.token_ttl_secs,
    ));

    let runtime: Arc<dyn Runtime> = if config.runtime == RUNTIME_SUBPROCESS {
        let interpreter = config
            .interpreter
            .as_deref()
            .ok_or_else(|| CliError::config_error("interpreter is required for subprocess"))?;
        Arc::new(ProcessRuntime::new(interpreter))
    } else {
        Arc::new(NativeRuntime::new())
    };

    let sdk = SdkFactory::new(Arc::clone(&store), blobs, fetch, events, tokens);

    let runtime_config = RuntimeConfig {
        timeout_ms: config.timeout_ms,
        max_log_lines: config.max_log_lines,
        debug: false,
    };

    let invoker = Invoker::new(
        FunctionStore::new(Arc::clone(&store)),
        AuditTrail::new(store),
        runtime,
        sdk,
        runtime_config,
    )
    .with_max_call_depth(config.max_call_depth);

    Logger::log(
        Severity::Info,
        "ENGINE_READY",
        &[
            ("namespace", config.namespace.as_str()),
            ("runtime", config.runtime.as_str()),
        ],
    );

    Ok(invoker)
}

fn deploy(config_path: &Path, name: &str, file: &Path) -> CliResult<()> {
    let config = EngineConfig::load(config_path)?;
    let engine = boot(&config)?;

    let source = fs::read_to_string(file)
        .map_err(|e| CliError::io_error(format!("Failed to read {}: {}", file.display(), e)))?;
    let compiled = compile(&source)?;

    // Redeploy keeps the function id stable.
    let definition = match engine.functions().resolve_by_name(name) {
        Ok(mut existing) => {
            existing.update_code(source, compiled);
            existing
        }
        Err(FunctionError::NotFound(_)) => FunctionDefinition::new(name, source, compiled),
        Err(e) => return Err(e.into()),
    };
    engine.functions().upsert(&definition)?;

    let id = definition.id.to_string();
    Logger::log(
        Severity::Info,
        "FUNCTION_DEPLOYED",
        &[
            ("name", name),
            ("id", id.as_str()),
            ("code_hash", definition.code_hash.as_str()),
        ],
    );

    Ok(())
}

fn parse_json_arg(label: &str, raw: Option<&str>) -> CliResult<Value> {
    match raw {
        None => Ok(Value::Null),
        Some(text) => serde_json::from_str(text)
            .map_err(|e| CliError::invalid_argument(format!("Invalid {} JSON: {}", label, e))),
    }
}

fn invoke(
    config_path: &Path,
    name: &str,
    query: Option<&str>,
    body: Option<&str>,
) -> CliResult<()> {
    let config = EngineConfig::load(config_path)?;
    let engine = boot(&config)?;

    let definition = engine.functions().resolve_by_name(name)?;

    let context = InvocationContext::new()
        .with_query(parse_json_arg("query", query)?)
        .with_body(parse_json_arg("body", body)?)
        .normalized();

    let result = engine.invoke(&definition, context, &config.namespace)?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn logs(config_path: &Path, name: &str) -> CliResult<()> {
    let config = EngineConfig::load(config_path)?;
    let engine = boot(&config)?;

    let entries = engine.audit().entries_for(name)?;
    for entry in entries {
        println!("{}", serde_json::to_string(&entry)?);
    }

    Ok(())
}
