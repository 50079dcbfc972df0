//! Mixin pipeline behaviour as seen through the factory.

use std::sync::{Arc, Mutex};

use serde_json::json;
use validated_publication::mixin::builtin;
use validated_publication::{
    Cursor, FactoryConfig, FactoryError, InMemorySubscription, Mixin, PublicationError,
    PublicationOptions, PublicationSpec, Published,
};

use crate::support::{factory, recording, registry};

#[test]
fn endpoint_mixins_run_before_defaults() {
    let registry = registry();
    let log = Arc::new(Mutex::new(Vec::new()));
    let factory = FactoryConfig::new()
        .registry(registry.clone())
        .mixins([recording("c", &log), recording("d", &log)])
        .build()
        .unwrap();

    factory
        .create(
            PublicationSpec::new("ordered", |_| Ok(()))
                .mixins([recording("a", &log), recording("b", &log)]),
        )
        .unwrap();

    assert_eq!(*log.lock().unwrap(), vec!["a", "b", "c", "d"]);
}

#[test]
fn reordering_inputs_reorders_application() {
    let registry = registry();
    let log = Arc::new(Mutex::new(Vec::new()));
    let factory = FactoryConfig::new()
        .registry(registry.clone())
        .mixin(recording("d", &log))
        .mixin(recording("c", &log))
        .build()
        .unwrap();

    factory
        .create(
            PublicationSpec::new("reordered", |_| Ok(()))
                .mixin(recording("b", &log))
                .mixin(recording("a", &log)),
        )
        .unwrap();

    assert_eq!(*log.lock().unwrap(), vec!["b", "a", "d", "c"]);
}

#[test]
fn mixins_run_once_at_construction() {
    let registry = registry();
    let log = Arc::new(Mutex::new(Vec::new()));
    factory(&registry)
        .create(PublicationSpec::new("once", |_| Ok(())).mixin(recording("a", &log)))
        .unwrap();

    let sub = InMemorySubscription::new();
    registry.subscribe("once", &sub, &[]).unwrap();
    registry.subscribe("once", &sub, &[]).unwrap();

    assert_eq!(*log.lock().unwrap(), vec!["a"]);
}

#[test]
fn mixin_returning_nothing_aborts_construction() {
    let registry = registry();
    let err = factory(&registry)
        .create(
            PublicationSpec::new("todos.private", |_| Ok(()))
                .mixin(Mixin::named("forgetful", |_| None)),
        )
        .unwrap_err();

    assert_eq!(
        err,
        FactoryError::MixinContractViolation {
            mixin: Some("forgetful".into()),
            publication: "todos.private".into(),
        }
    );
    assert!(registry.names().is_empty());
}

#[test]
fn mixin_replacing_fields_with_non_mapping_aborts_construction() {
    for bad in [json!(1), json!("fields"), json!([{ "a": 1 }])] {
        let registry = registry();
        let err = factory(&registry)
            .create(
                PublicationSpec::new("todos.private", |_| Ok(())).mixin(Mixin::new(
                    move |mut options: PublicationOptions| {
                        options.fields = bad.clone();
                        Some(options)
                    },
                )),
            )
            .unwrap_err();

        assert!(err.to_string().starts_with("a mixin did not return"));
        assert!(err.to_string().contains("todos.private"));
    }
}

#[test]
fn default_mixin_violation_names_the_endpoint() {
    let registry = registry();
    let factory = FactoryConfig::new()
        .registry(registry.clone())
        .mixin(Mixin::named("broken_default", |_| None))
        .build()
        .unwrap();

    let err = factory
        .create(PublicationSpec::new("lists.public", |_| Ok(())))
        .unwrap_err();
    assert!(matches!(
        err,
        FactoryError::MixinContractViolation { ref mixin, ref publication }
            if mixin.as_deref() == Some("broken_default") && publication == "lists.public"
    ));
}

#[test]
fn fields_set_by_one_mixin_are_visible_downstream() {
    let registry = registry();
    let collection_from_field = Mixin::named("collection", |options: PublicationOptions| {
        let collection = options.field("collection")?.as_str()?.to_string();
        Some(options.wrap_run(move |_inv, _inner| Ok(Cursor::new(collection.clone()).into())))
    });
    let factory = FactoryConfig::new()
        .registry(registry.clone())
        .mixin(collection_from_field)
        .build()
        .unwrap();

    factory
        .create(
            PublicationSpec::new("dynamic", |_| Ok(()))
                .field("collection", json!("lists"))
                .mixin(Mixin::new(|options: PublicationOptions| {
                    let renamed = options.field("collection").cloned();
                    Some(options.with_field("collection", renamed.unwrap_or(json!("todos"))))
                })),
        )
        .unwrap();

    let sub = InMemorySubscription::new();
    assert_eq!(
        registry.subscribe("dynamic", &sub, &[]).unwrap(),
        Some(Published::Cursor(Cursor::new("lists")))
    );
}

#[test]
fn mixin_can_install_validation() {
    let registry = registry();
    let strict = Mixin::named("strict", |options: PublicationOptions| {
        Some(options.with_validate(|args| {
            if args.is_empty() {
                Ok(())
            } else {
                Err(PublicationError::Validation("takes no arguments".into()))
            }
        }))
    });
    factory(&registry)
        .create(PublicationSpec::new("lists.public", |_| Ok(Published::empty())).mixin(strict))
        .unwrap();

    let sub = InMemorySubscription::new();
    assert_eq!(
        registry.subscribe("lists.public", &sub, &[json!(1)]).unwrap(),
        None
    );
    assert_eq!(
        sub.last_error(),
        Some(PublicationError::Validation("takes no arguments".into()))
    );
}

#[test]
fn mixin_can_see_endpoint_mixin_labels() {
    let registry = registry();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_in_mixin = Arc::clone(&seen);
    let inspector = Mixin::new(move |options: PublicationOptions| {
        *seen_in_mixin.lock().unwrap() = options.mixins.clone();
        Some(options)
    });

    factory(&registry)
        .create(
            PublicationSpec::new("labels", |_| Ok(()))
                .mixin(Mixin::named("first", Some))
                .mixin(inspector),
        )
        .unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![Some("first".to_string()), None]);
}

#[test]
fn logged_in_mixin_guards_run() {
    let registry = registry();
    factory(&registry)
        .create(
            PublicationSpec::new("lists.private", |inv| {
                let user = inv.require_user()?;
                Ok(Cursor::new("lists").selector(json!({ "userId": user })))
            })
            .mixin(builtin::logged_in()),
        )
        .unwrap();

    let anonymous = InMemorySubscription::new();
    assert_eq!(
        registry.subscribe("lists.private", &anonymous, &[]).unwrap(),
        None
    );
    assert_eq!(
        anonymous.last_error().map(|err| err.code().to_string()),
        Some("not-authorized".to_string())
    );

    let user = InMemorySubscription::for_user("u1");
    assert!(registry
        .subscribe("lists.private", &user, &[])
        .unwrap()
        .is_some());
}
