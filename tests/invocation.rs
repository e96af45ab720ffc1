//! End-to-end invocation behavior: the bare path, the audited nested path,
//! and the failure policies around them.

use std::sync::Arc;

use serde_json::{json, Value};
use tempfile::TempDir;

use cirrus::blob_store::LocalBlobStore;
use cirrus::functions::{
    compile, AuditTrail, ExecutionResult, FunctionDefinition, FunctionError, FunctionStore,
    InvocationContext, Invoker, NativeRuntime, RuntimeConfig, FUNCTION_LOGS,
};
use cirrus::sdk::{InProcessBus, ReqwestFetch, SdkFactory, TokenService};
use cirrus::store::{DocumentStore, Filter, MemoryStore, StoreError, StoreResult};

fn build_engine(temp: &TempDir, runtime: NativeRuntime, store: Arc<dyn DocumentStore>) -> Invoker {
    let sdk = SdkFactory::new(
        Arc::clone(&store),
        Arc::new(LocalBlobStore::new(temp.path())),
        Arc::new(ReqwestFetch::new()),
        Arc::new(InProcessBus::new()),
        Arc::new(TokenService::new("test-secret", 3600)),
    );

    Invoker::new(
        FunctionStore::new(Arc::clone(&store)),
        AuditTrail::new(store),
        Arc::new(runtime),
        sdk,
        RuntimeConfig::default(),
    )
}

fn deploy(engine: &Invoker, name: &str, source: &str) -> FunctionDefinition {
    let def = FunctionDefinition::new(name, source, compile(source).unwrap());
    engine.functions().insert(&def).unwrap();
    def
}

#[test]
fn bare_invoke_returns_result_shape() {
    let temp = TempDir::new().unwrap();
    let runtime = NativeRuntime::new();
    runtime.register("greet", |_opts| {
        Ok(ExecutionResult::new(json!({"msg": "hi"})))
    });

    let store = Arc::new(MemoryStore::new());
    let engine = build_engine(&temp, runtime, store.clone());
    let def = deploy(&engine, "greet", "return { msg: 'hi' };");

    let result = engine
        .invoke(&def, InvocationContext::new(), "app")
        .unwrap();

    assert_eq!(result.value, json!({"msg": "hi"}));
    assert!(result.logs.is_empty());
    // time_usage is measured, not reported by the handler
    assert!(result.time_usage_ms < 1_000);
    // the bare path persists nothing
    assert!(store.is_empty(FUNCTION_LOGS));
}

#[test]
fn nested_invoke_trace_line_is_first() {
    let temp = TempDir::new().unwrap();
    let runtime = NativeRuntime::new();
    runtime.register("callee", |_opts| {
        Ok(ExecutionResult::new(json!(1)).with_logs(vec!["inside callee".to_string()]))
    });

    let engine = build_engine(&temp, runtime, Arc::new(MemoryStore::new()));
    let def = deploy(&engine, "callee", "return 1;");

    let result = engine.invoke_nested("callee", None, "app").unwrap();

    assert_eq!(
        result.logs,
        vec![
            format!("invoked in function: callee ({})", def.id),
            "inside callee".to_string(),
        ]
    );
}

#[test]
fn nested_invoke_persists_exactly_one_entry() {
    let temp = TempDir::new().unwrap();
    let engine = build_engine(&temp, NativeRuntime::new(), Arc::new(MemoryStore::new()));
    let def = deploy(&engine, "callee", "return 1;");

    engine.invoke_nested("callee", None, "app").unwrap();

    let entries = engine.audit().entries_for("callee").unwrap();
    assert_eq!(entries.len(), 1);

    let entry = &entries[0];
    assert_eq!(entry.request_id, format!("func_{}", def.id));
    assert_eq!(entry.func_id, def.id.to_string());
    assert_eq!(entry.created_by, def.id.to_string());
    assert_eq!(
        entry.logs[0],
        format!("invoked in function: callee ({})", def.id)
    );
}

#[test]
fn nested_invoke_unknown_name_fails_without_audit() {
    let temp = TempDir::new().unwrap();
    let store = Arc::new(MemoryStore::new());
    let engine = build_engine(&temp, NativeRuntime::new(), store.clone());

    let err = engine.invoke_nested("ghost", None, "app").unwrap_err();

    assert!(matches!(err, FunctionError::NotFound(_)));
    assert_eq!(err.to_string(), "failed to get function: ghost");
    assert!(store.is_empty(FUNCTION_LOGS));
}

#[test]
fn absent_context_equivalent_to_explicit_call_method() {
    let temp = TempDir::new().unwrap();
    let runtime = NativeRuntime::new();
    runtime.register("probe", |opts| {
        Ok(ExecutionResult::new(json!({
            "method": opts.context.method,
            "query": opts.context.query,
            "body": opts.context.body,
        })))
    });

    let engine = build_engine(&temp, runtime, Arc::new(MemoryStore::new()));
    deploy(&engine, "probe", "return ctx;");

    let absent = engine.invoke_nested("probe", None, "app").unwrap();
    let explicit = engine
        .invoke_nested(
            "probe",
            Some(InvocationContext::new().with_method("call")),
            "app",
        )
        .unwrap();

    assert_eq!(absent.value, explicit.value);
    assert_eq!(absent.value["method"], "call");
}

#[test]
fn caller_sees_callee_trace_and_one_audit_entry() {
    let temp = TempDir::new().unwrap();
    let runtime = NativeRuntime::new();
    runtime.register("callee", |_opts| {
        Ok(ExecutionResult::new(json!({"from": "callee"})))
    });
    runtime.register("caller", |opts| {
        let nested = opts.sdk.invoke.invoke("callee", None)?;
        Ok(ExecutionResult::new(json!({"nested": nested.value})).with_logs(nested.logs))
    });

    let engine = build_engine(&temp, runtime, Arc::new(MemoryStore::new()));
    let callee = deploy(&engine, "callee", "return { from: 'callee' };");
    deploy(&engine, "caller", "return cloud.invoke('callee');");

    let def = engine.functions().resolve_by_name("caller").unwrap();
    let result = engine
        .invoke(&def, InvocationContext::new().normalized(), "app")
        .unwrap();

    assert_eq!(result.value["nested"], json!({"from": "callee"}));
    assert!(result
        .logs
        .contains(&format!("invoked in function: callee ({})", callee.id)));

    let entries = engine.audit().entries_for("callee").unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].func_name, "callee");
    // the bare outer invocation itself is not audited
    assert!(engine.audit().entries_for("caller").unwrap().is_empty());
}

#[test]
fn self_recursion_hits_depth_ceiling() {
    let temp = TempDir::new().unwrap();
    let runtime = NativeRuntime::new();
    runtime.register("recurse", |opts| {
        let nested = opts.sdk.invoke.invoke("recurse", None)?;
        Ok(ExecutionResult::new(nested.value))
    });

    let engine = build_engine(&temp, runtime, Arc::new(MemoryStore::new())).with_max_call_depth(4);
    deploy(&engine, "recurse", "return cloud.invoke('recurse');");

    let err = engine.invoke_nested("recurse", None, "app").unwrap_err();
    assert!(matches!(err, FunctionError::RecursionLimitExceeded(_)));
}

/// Store whose audit-log writes always fail, everything else delegating.
#[derive(Debug)]
struct FailingLogStore {
    inner: MemoryStore,
}

impl DocumentStore for FailingLogStore {
    fn get_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Value>> {
        self.inner.get_one(collection, filter)
    }

    fn find(&self, collection: &str, filter: &Filter) -> StoreResult<Vec<Value>> {
        self.inner.find(collection, filter)
    }

    fn add(&self, collection: &str, doc: Value) -> StoreResult<String> {
        if collection == FUNCTION_LOGS {
            return Err(StoreError::IoError("log volume offline".into()));
        }
        self.inner.add(collection, doc)
    }

    fn upsert(&self, collection: &str, filter: &Filter, doc: Value) -> StoreResult<String> {
        self.inner.upsert(collection, filter, doc)
    }
}

#[test]
fn audit_write_failure_does_not_discard_result() {
    let temp = TempDir::new().unwrap();
    let runtime = NativeRuntime::new();
    runtime.register("callee", |_opts| {
        Ok(ExecutionResult::new(json!({"ok": true})))
    });

    let store = Arc::new(FailingLogStore {
        inner: MemoryStore::new(),
    });
    let engine = build_engine(&temp, runtime, store);
    let def = deploy(&engine, "callee", "return { ok: true };");

    let result = engine.invoke_nested("callee", None, "app").unwrap();

    // the caller-visible result is final before the durability attempt
    assert_eq!(result.value, json!({"ok": true}));
    assert_eq!(
        result.logs[0],
        format!("invoked in function: callee ({})", def.id)
    );
    assert!(engine.audit().entries_for("callee").unwrap().is_empty());
}

#[test]
fn duplicate_names_resolve_to_first_inserted() {
    let temp = TempDir::new().unwrap();
    let engine = build_engine(&temp, NativeRuntime::new(), Arc::new(MemoryStore::new()));

    let first = deploy(&engine, "dup", "return 'first';");
    deploy(&engine, "dup", "return 'second';");

    let result = engine.invoke_nested("dup", None, "app").unwrap();
    assert_eq!(
        result.logs[0],
        format!("invoked in function: dup ({})", first.id)
    );
}
