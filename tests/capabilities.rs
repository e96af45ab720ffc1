//! Capability bundle behavior observable from function code: namespace
//! scoping, cross-invocation shared state, tokens, events, and the database
//! handle. Compiler guarantees ride along since deployment exercises them.

use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;

use cirrus::blob_store::{BlobBackend, LocalBlobStore};
use cirrus::functions::{
    compile, AuditTrail, ExecutionResult, FunctionDefinition, FunctionStore, InvocationContext,
    Invoker, NativeRuntime, RuntimeConfig,
};
use cirrus::sdk::{EventBus, InProcessBus, ReqwestFetch, SdkFactory, TokenService};
use cirrus::store::{DocumentStore, Filter, MemoryStore};

struct Harness {
    engine: Invoker,
    store: Arc<MemoryStore>,
    bus: Arc<InProcessBus>,
    _temp: TempDir,
}

fn harness(runtime: NativeRuntime) -> Harness {
    let temp = TempDir::new().unwrap();
    let store = Arc::new(MemoryStore::new());
    let bus = Arc::new(InProcessBus::new());

    let docs: Arc<dyn DocumentStore> = Arc::clone(&store) as Arc<dyn DocumentStore>;
    let blobs: Arc<dyn BlobBackend> = Arc::new(LocalBlobStore::new(temp.path()));

    let sdk = SdkFactory::new(
        Arc::clone(&docs),
        blobs,
        Arc::new(ReqwestFetch::new()),
        Arc::clone(&bus) as Arc<dyn EventBus>,
        Arc::new(TokenService::new("test-secret", 3600)),
    );

    let engine = Invoker::new(
        FunctionStore::new(Arc::clone(&docs)),
        AuditTrail::new(docs),
        Arc::new(runtime),
        sdk,
        RuntimeConfig::default(),
    );

    Harness {
        engine,
        store,
        bus,
        _temp: temp,
    }
}

fn deploy(engine: &Invoker, name: &str, source: &str) -> FunctionDefinition {
    let def = FunctionDefinition::new(name, source, compile(source).unwrap());
    engine.functions().insert(&def).unwrap();
    def
}

#[test]
fn storage_capability_is_namespace_scoped() {
    let runtime = NativeRuntime::new();
    runtime.register("writer", |opts| {
        opts.sdk
            .storage
            .put("note.txt", b"tenant data")
            .map_err(|e| cirrus::functions::FunctionError::Execution(e.to_string()))?;
        Ok(ExecutionResult::new(json!(true)))
    });
    runtime.register("reader", |opts| {
        let value = match opts.sdk.storage.get("note.txt") {
            Ok(bytes) => json!(String::from_utf8_lossy(&bytes)),
            Err(_) => json!(null),
        };
        Ok(ExecutionResult::new(value))
    });

    let h = harness(runtime);
    let writer = deploy(&h.engine, "writer", "return true;");
    let reader = deploy(&h.engine, "reader", "return storage.get('note.txt');");

    h.engine
        .invoke(&writer, InvocationContext::new(), "tenant-a")
        .unwrap();

    let same_ns = h
        .engine
        .invoke(&reader, InvocationContext::new(), "tenant-a")
        .unwrap();
    assert_eq!(same_ns.value, json!("tenant data"));

    let other_ns = h
        .engine
        .invoke(&reader, InvocationContext::new(), "tenant-b")
        .unwrap();
    assert_eq!(other_ns.value, json!(null));
}

#[test]
fn shared_preferences_survive_across_invocations() {
    let runtime = NativeRuntime::new();
    runtime.register("first", |opts| {
        opts.sdk.shared.put("k", json!("written by first"));
        Ok(ExecutionResult::new(json!(true)))
    });
    runtime.register("second", |opts| {
        Ok(ExecutionResult::new(
            opts.sdk.shared.get("k").unwrap_or(json!(null)),
        ))
    });

    let h = harness(runtime);
    let first = deploy(&h.engine, "first", "shared.set('k', 'v');");
    let second = deploy(&h.engine, "second", "return shared.get('k');");

    h.engine
        .invoke(&first, InvocationContext::new(), "app")
        .unwrap();
    let result = h
        .engine
        .invoke(&second, InvocationContext::new(), "app")
        .unwrap();

    assert_eq!(result.value, json!("written by first"));
    // visible outside the sandbox through the same process-wide store
    assert_eq!(h.engine.shared().get("k"), Some(json!("written by first")));
}

#[test]
fn events_emitted_by_functions_reach_subscribers() {
    let runtime = NativeRuntime::new();
    runtime.register("emitter", |opts| {
        opts.sdk.emit("greeting.sent", json!({"to": "world"}));
        Ok(ExecutionResult::new(json!(true)))
    });

    let h = harness(runtime);
    let rx = h.bus.subscribe("greeting.sent");
    let emitter = deploy(&h.engine, "emitter", "emit('greeting.sent', {});");

    h.engine
        .invoke(&emitter, InvocationContext::new(), "app")
        .unwrap();

    assert_eq!(rx.try_recv().unwrap(), json!({"to": "world"}));
}

#[test]
fn token_capability_round_trips() {
    let runtime = NativeRuntime::new();
    runtime.register("issuer", |opts| {
        let token = opts
            .sdk
            .get_token("user-7", Some("functions"))
            .map_err(|e| cirrus::functions::FunctionError::Execution(e.to_string()))?;
        let claims = opts
            .sdk
            .parse_token(&token)
            .map_err(|e| cirrus::functions::FunctionError::Execution(e.to_string()))?;
        Ok(ExecutionResult::new(json!({
            "sub": claims.sub,
            "scope": claims.scope,
        })))
    });

    let h = harness(runtime);
    let issuer = deploy(&h.engine, "issuer", "return parseToken(getToken());");

    let result = h
        .engine
        .invoke(&issuer, InvocationContext::new(), "app")
        .unwrap();

    assert_eq!(result.value["sub"], "user-7");
    assert_eq!(result.value["scope"], "functions");
}

#[test]
fn database_capability_writes_are_visible_outside() {
    let runtime = NativeRuntime::new();
    runtime.register("recorder", |opts| {
        let id = opts
            .sdk
            .database
            .collection("notes")
            .add(json!({"text": "from inside"}))
            .map_err(|e| cirrus::functions::FunctionError::Execution(e.to_string()))?;
        Ok(ExecutionResult::new(json!({"id": id})))
    });

    let h = harness(runtime);
    let recorder = deploy(&h.engine, "recorder", "db.collection('notes').add({});");

    h.engine
        .invoke(&recorder, InvocationContext::new(), "app")
        .unwrap();

    let notes = h
        .store
        .find("notes", &Filter::field("text", "from inside"))
        .unwrap();
    assert_eq!(notes.len(), 1);
}

#[test]
fn compile_is_deterministic() {
    let source = "const hello = (name) => `hi ${name}`;\nreturn hello('cloud');";
    assert_eq!(compile(source).unwrap(), compile(source).unwrap());
}

#[test]
fn deploying_invalid_source_fails_before_storage() {
    let h = harness(NativeRuntime::new());

    let source = "function broken( { return 1; }";
    assert!(compile(source).is_err());
    // nothing was stored for the name
    assert!(h.engine.functions().resolve_by_name("broken").is_err());
}
