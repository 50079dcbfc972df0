//! Validator resolution: override, schema strategy, no-op.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::{json, Value};
use validated_publication::{
    Cursor, FactoryConfig, FactoryError, InMemorySubscription, JsonSchemaFactory,
    PublicationError, PublicationSpec, Validator,
};

use crate::support::{counting_schema_factory, factory, registry};

fn list_schema() -> Value {
    json!({
        "type": "object",
        "properties": { "listId": { "type": "string" } },
        "required": ["listId"]
    })
}

#[test]
fn explicit_validate_wins_over_schema() {
    let registry = registry();
    let builds = Arc::new(AtomicUsize::new(0));
    let factory = FactoryConfig::new()
        .schema_factory(counting_schema_factory(&builds))
        .registry(registry.clone())
        .build()
        .unwrap();

    let handler = factory
        .create(
            PublicationSpec::new("todos.inList", |_| Ok(Cursor::new("todos")))
                .schema(list_schema())
                .validate(|_args| Err(PublicationError::Validation("custom".into()))),
        )
        .unwrap();

    assert!(matches!(handler.validator(), Validator::Override(_)));
    assert_eq!(builds.load(Ordering::SeqCst), 0);

    let sub = InMemorySubscription::new();
    handler.call(&sub, &[json!({ "listId": "l1" })]);
    assert_eq!(
        sub.last_error(),
        Some(PublicationError::Validation("custom".into()))
    );
    assert_eq!(builds.load(Ordering::SeqCst), 0);
}

#[test]
fn schema_is_built_once_per_publication() {
    let registry = registry();
    let builds = Arc::new(AtomicUsize::new(0));
    let factory = FactoryConfig::new()
        .schema_factory(counting_schema_factory(&builds))
        .registry(registry.clone())
        .build()
        .unwrap();

    factory
        .create(PublicationSpec::new("a", |_| Ok(())).schema(json!({})))
        .unwrap();
    let sub = InMemorySubscription::new();
    for _ in 0..3 {
        registry.subscribe("a", &sub, &[json!({})]).unwrap();
    }

    assert_eq!(builds.load(Ordering::SeqCst), 1);
    assert_eq!(sub.ready_count(), 3);
}

#[test]
fn json_schema_rejects_bad_arguments_before_run() {
    let registry = registry();
    let runs = Arc::new(AtomicUsize::new(0));
    let runs_in_publication = Arc::clone(&runs);
    let factory = FactoryConfig::new()
        .schema_factory(JsonSchemaFactory::new())
        .registry(registry.clone())
        .build()
        .unwrap();

    factory
        .create(
            PublicationSpec::new("todos.inList", move |inv| {
                runs_in_publication.fetch_add(1, Ordering::SeqCst);
                let params: Value = inv.arg(0)?;
                Ok(Cursor::new("todos").selector(json!({ "listId": params["listId"] })))
            })
            .schema(list_schema()),
        )
        .unwrap();

    let rejected = InMemorySubscription::new();
    let delivered = registry
        .subscribe("todos.inList", &rejected, &[json!({ "listId": 5 })])
        .unwrap();
    assert_eq!(delivered, None);
    assert_eq!(
        rejected.last_error().map(|err| err.code().to_string()),
        Some("validation-error".to_string())
    );
    assert_eq!(runs.load(Ordering::SeqCst), 0);

    let accepted = InMemorySubscription::new();
    let delivered = registry
        .subscribe("todos.inList", &accepted, &[json!({ "listId": "l1" })])
        .unwrap();
    assert!(delivered.is_some());
    assert!(accepted.errors().is_empty());
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[test]
fn schema_sees_null_without_arguments() {
    let registry = registry();
    let factory = FactoryConfig::new()
        .schema_factory(JsonSchemaFactory::new())
        .registry(registry.clone())
        .build()
        .unwrap();
    factory
        .create(PublicationSpec::new("lists.public", |_| Ok(())).schema(json!({ "type": "null" })))
        .unwrap();

    let sub = InMemorySubscription::new();
    registry.subscribe("lists.public", &sub, &[]).unwrap();
    assert!(sub.errors().is_empty());
    assert!(sub.is_ready());
}

#[test]
fn schema_required_when_strategy_configured() {
    let registry = registry();
    let factory = FactoryConfig::new()
        .schema_factory(JsonSchemaFactory::new())
        .registry(registry.clone())
        .build()
        .unwrap();

    let err = factory
        .create(PublicationSpec::new("unchecked", |_| Ok(())))
        .unwrap_err();
    assert!(matches!(err, FactoryError::InvalidConfiguration(ref msg) if msg.contains("unchecked")));

    // A validate override satisfies the requirement.
    factory
        .create(PublicationSpec::new("unchecked", |_| Ok(())).validate(|_| Ok(())))
        .unwrap();
}

#[test]
fn invalid_schema_fails_construction() {
    let registry = registry();
    let factory = FactoryConfig::new()
        .schema_factory(JsonSchemaFactory::new())
        .registry(registry.clone())
        .build()
        .unwrap();

    let err = factory
        .create(PublicationSpec::new("broken", |_| Ok(())).schema(json!({ "type": "nonsense" })))
        .unwrap_err();
    assert!(matches!(
        err,
        FactoryError::SchemaConstruction { ref publication, .. } if publication == "broken"
    ));
    assert!(registry.names().is_empty());
}

#[test]
fn no_strategy_means_no_validation() {
    let registry = registry();
    let handler = factory(&registry)
        .create(PublicationSpec::new("loose", |_| Ok(())).schema(list_schema()))
        .unwrap();

    assert!(matches!(handler.validator(), Validator::AcceptAll));
    let sub = InMemorySubscription::new();
    handler.call(&sub, &[json!("not an object")]);
    assert!(sub.errors().is_empty());
    assert!(sub.is_ready());
}
