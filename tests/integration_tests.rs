//! Integration tests for the DI container

use micro_di::prelude::*;
use micro_di::Module;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// Stub services modeling a small application graph. "FooInterface" and
// "Repo" are registered as non-instantiable descriptors, the identifier-level
// analog of an interface.

struct Foo {
    name: String,
}

struct Bar {
    foo: Arc<Foo>,
}

struct Baz {
    foo: Arc<Foo>,
    bar: Arc<Bar>,
    container_aware: Arc<ContainerAware>,
    name: String,
}

struct ContainerAware {
    container: Arc<Container>,
}

struct FooVariadic {
    foos: Vec<Arc<Foo>>,
}

struct FooAutowired {
    foo: Option<Arc<Foo>>,
    bar: Option<Arc<Bar>>,
}

struct BadAutowired;

struct Wheel;

struct Engine {
    wheel: Arc<Wheel>,
}

struct RepoService {
    repo: Arc<dyn Service>,
}

struct Logger;

/// Registry with descriptors for every stub type
fn stub_registry() -> Arc<TypeRegistry> {
    let registry = Arc::new(TypeRegistry::new());

    registry
        .register(
            TypeDescriptor::build::<Foo>("Foo")
                .constructor(vec![ParameterDescriptor::builtin("name")], |_| {
                    Err(DiError::Other("Foo requires an explicit name".to_string()))
                })
                .finish(),
        )
        .unwrap();

    registry
        .register(
            TypeDescriptor::build::<Bar>("Bar")
                .constructor(vec![ParameterDescriptor::service("foo", "Foo")], |args| {
                    Ok(Bar {
                        foo: args.service::<Foo>(0)?,
                    })
                })
                .finish(),
        )
        .unwrap();

    registry
        .register(
            TypeDescriptor::build::<Baz>("Baz")
                .constructor(
                    vec![
                        ParameterDescriptor::service("foo", "FooInterface"),
                        ParameterDescriptor::service("bar", "Bar"),
                        ParameterDescriptor::service("container_aware", "ContainerAware"),
                        ParameterDescriptor::builtin("name").with_default(),
                    ],
                    |args| {
                        assert!(args.is_default(3));
                        Ok(Baz {
                            foo: args.service::<Foo>(0)?,
                            bar: args.service::<Bar>(1)?,
                            container_aware: args.service::<ContainerAware>(2)?,
                            name: "Default Value".to_string(),
                        })
                    },
                )
                .finish(),
        )
        .unwrap();

    registry
        .register(
            TypeDescriptor::build::<ContainerAware>("ContainerAware")
                .constructor(
                    vec![ParameterDescriptor::service(
                        "container",
                        Container::IDENTIFIER,
                    )],
                    |args| {
                        Ok(ContainerAware {
                            container: args.service::<Container>(0)?,
                        })
                    },
                )
                .finish(),
        )
        .unwrap();

    registry
        .register(
            TypeDescriptor::build::<FooVariadic>("FooVariadic")
                .constructor(
                    vec![ParameterDescriptor::service("foos", "Foo").variadic()],
                    |args| {
                        assert!(args.is_empty_sequence(0));
                        Ok(FooVariadic { foos: Vec::new() })
                    },
                )
                .finish(),
        )
        .unwrap();

    registry
        .register(
            TypeDescriptor::build::<FooAutowired>("FooAutowired")
                .constructor(vec![], |_| Ok(FooAutowired {
                    foo: None,
                    bar: None,
                }))
                .autowired::<Foo, _>("foo", "Foo", |target, service| {
                    target.foo = Some(service);
                })
                // Declared type deliberately disagrees with the override
                .autowired_as::<Bar, _>("bar", "Foo", "Bar", |target, service| {
                    target.bar = Some(service);
                })
                .finish(),
        )
        .unwrap();

    registry
        .register(
            TypeDescriptor::build::<BadAutowired>("BadAutowired")
                .constructor(vec![], |_| Ok(BadAutowired))
                .autowired_untyped("foo")
                .finish(),
        )
        .unwrap();

    registry
        .register(
            TypeDescriptor::build::<Wheel>("Wheel")
                .constructor(vec![], |_| Ok(Wheel))
                .finish(),
        )
        .unwrap();

    registry
        .register(
            TypeDescriptor::build::<Engine>("Engine")
                .constructor(vec![ParameterDescriptor::service("wheel", "Wheel")], |args| {
                    Ok(Engine {
                        wheel: args.service::<Wheel>(0)?,
                    })
                })
                .finish(),
        )
        .unwrap();

    registry
        .register(
            TypeDescriptor::build::<RepoService>("RepoService")
                .constructor(vec![ParameterDescriptor::service("repo", "Repo")], |args| {
                    Ok(RepoService { repo: args.raw(0)? })
                })
                .finish(),
        )
        .unwrap();

    registry
        .register(
            TypeDescriptor::build::<Logger>("Logger")
                .constructor(vec![], |_| Ok(Logger))
                .finish(),
        )
        .unwrap();

    registry
        .register(TypeDescriptor::interface("FooInterface"))
        .unwrap();
    registry.register(TypeDescriptor::interface("Repo")).unwrap();

    registry
}

fn stub_builder() -> ContainerBuilder {
    ContainerBuilder::new().with_registry(stub_registry())
}

fn foo_factory(_: &Container) -> DiResult<Foo> {
    Ok(Foo {
        name: "fooString".to_string(),
    })
}

#[test]
fn test_has_entry() {
    let mut builder = stub_builder();
    builder.register_type("Foo");
    let container = builder.build();

    assert!(container.has("Foo"));
    assert!(!container.has("foo"));
    assert!(container.has(Container::IDENTIFIER));
}

#[test]
fn test_throws_when_entry_not_found() {
    let container = stub_builder().build();
    let err = container.get("foo.class").unwrap_err();

    assert_eq!(
        err.to_string(),
        "no entry was found for 'foo.class' identifier"
    );
    match &err {
        DiError::NotFound { id, .. } => assert_eq!(id, "foo.class"),
        other => panic!("expected NotFound, got {other:?}"),
    }
    assert!(matches!(err.cause(), Some(DiError::TypeNotRegistered(_))));
}

#[test]
fn test_throws_when_builtin_has_no_default() {
    let container = stub_builder().build();
    let err = container.get("Foo").unwrap_err();

    match err.cause() {
        Some(DiError::UnresolvableParameter { owner, name }) => {
            assert_eq!(owner, "Foo");
            assert_eq!(name, "name");
        }
        other => panic!("expected UnresolvableParameter cause, got {other:?}"),
    }
}

#[test]
fn test_resolves_with_definition() {
    let mut builder = stub_builder();
    builder.register_factory("Foo", foo_factory);
    builder.register_alias("foo.alias", "Foo");
    let container = builder.build();

    let service = container.get_as::<Foo>("Foo").unwrap();
    assert_eq!(service.name, "fooString");

    let aliased = container.get_as::<Foo>("foo.alias").unwrap();
    assert!(Arc::ptr_eq(&service, &aliased));
}

#[test]
fn test_throws_when_interface_has_no_definition() {
    let container = stub_builder().build();
    let err = container.get("FooInterface").unwrap_err();

    match err.cause() {
        Some(DiError::NotInstantiable(name)) => assert_eq!(name, "FooInterface"),
        other => panic!("expected NotInstantiable cause, got {other:?}"),
    }
    assert_eq!(
        err.cause().unwrap().to_string(),
        "target 'FooInterface' is not instantiable"
    );
}

#[test]
fn test_resolves_interface_entry() {
    let mut builder = stub_builder();
    builder.register_factory("Foo", foo_factory);
    builder.register_alias("FooInterface", "Foo");
    let container = builder.build();

    let service = container.get_as::<Foo>("FooInterface").unwrap();
    let direct = container.get_as::<Foo>("Foo").unwrap();
    assert!(Arc::ptr_eq(&service, &direct));
}

#[test]
fn test_resolves_with_type_definition() {
    let mut builder = stub_builder();
    builder.register_factory("Foo", foo_factory);
    builder.register_type("Bar");
    let container = builder.build();

    let bar = container.get_as::<Bar>("Bar").unwrap();
    let foo = container.get_as::<Foo>("Foo").unwrap();
    assert!(Arc::ptr_eq(&bar.foo, &foo));
}

#[test]
fn test_resolves_container_aware() {
    let mut builder = stub_builder();
    builder.register_type("ContainerAware");
    let container = builder.build();

    let service = container.get_as::<ContainerAware>("ContainerAware").unwrap();
    let self_instance = container.get_as::<Container>(Container::IDENTIFIER).unwrap();

    // The injected container shares the seeded cache entry
    assert!(Arc::ptr_eq(&service.container, &self_instance));
    assert!(service.container.has(Container::IDENTIFIER));
}

#[test]
fn test_resolves_constructor_graph_with_default() {
    let mut builder = stub_builder();
    builder.register_factory("Foo", foo_factory);
    builder.register_alias("FooInterface", "Foo");
    let container = builder.build();

    let baz = container.get_as::<Baz>("Baz").unwrap();
    let foo = container.get_as::<Foo>("Foo").unwrap();
    let bar = container.get_as::<Bar>("Bar").unwrap();
    let aware = container.get_as::<ContainerAware>("ContainerAware").unwrap();

    assert!(Arc::ptr_eq(&baz.foo, &foo));
    assert!(Arc::ptr_eq(&baz.bar, &bar));
    assert!(Arc::ptr_eq(&baz.container_aware, &aware));
    assert_eq!(baz.name, "Default Value");
}

#[test]
fn test_variadic_binds_empty() {
    let mut builder = stub_builder();
    builder.register_factory("Foo", foo_factory);
    let container = builder.build();

    let service = container.get_as::<FooVariadic>("FooVariadic").unwrap();
    assert!(service.foos.is_empty());
}

#[test]
fn test_autowires_properties() {
    let mut builder = stub_builder();
    builder.register_factory("Foo", foo_factory);
    let container = builder.build();

    let service = container.get_as::<FooAutowired>("FooAutowired").unwrap();
    let foo = container.get_as::<Foo>("Foo").unwrap();
    let bar = container.get_as::<Bar>("Bar").unwrap();

    // Declared-type target
    assert!(Arc::ptr_eq(service.foo.as_ref().unwrap(), &foo));
    // Explicit override target
    assert!(Arc::ptr_eq(service.bar.as_ref().unwrap(), &bar));
}

#[test]
fn test_autowire_override_wins_over_declared_type() {
    let mut builder = stub_builder();
    builder.register_factory("Foo", foo_factory);
    let container = builder.build();

    // `bar` is declared as "Foo" but overridden to "Bar". Were the
    // declared type consulted, injection would receive a Foo and the
    // downcast to Bar would fail the whole resolution.
    let service = container.get_as::<FooAutowired>("FooAutowired").unwrap();
    let bar = container.get_as::<Bar>("Bar").unwrap();
    assert!(Arc::ptr_eq(service.bar.as_ref().unwrap(), &bar));
}

#[test]
fn test_autowired_without_type_or_override_fails() {
    let container = stub_builder().build();
    let err = container.get("BadAutowired").unwrap_err();

    match err.cause() {
        Some(DiError::UnresolvableProperty { owner, name }) => {
            assert_eq!(owner, "BadAutowired");
            assert_eq!(name, "foo");
        }
        other => panic!("expected UnresolvableProperty cause, got {other:?}"),
    }
}

#[test]
fn test_autowiring_runs_once_per_construction() {
    let mut builder = stub_builder();
    builder.register_factory("Foo", foo_factory);
    let container = builder.build();

    let first = container.get_as::<FooAutowired>("FooAutowired").unwrap();
    let second = container.get_as::<FooAutowired>("FooAutowired").unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_literal_value_returned_as_is() {
    let mut builder = stub_builder();
    builder.register_value("greeting", "hello".to_string());
    let container = builder.build();

    let greeting = container.get_as::<String>("greeting").unwrap();
    assert_eq!(*greeting, "hello");

    let again = container.get_as::<String>("greeting").unwrap();
    assert!(Arc::ptr_eq(&greeting, &again));
}

#[test]
fn test_factory_invoked_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();

    let mut builder = stub_builder();
    builder.register_factory("Logger", move |_| {
        counter.fetch_add(1, Ordering::Relaxed);
        Ok(Logger)
    });
    let container = builder.build();

    let first = container.get_as::<Logger>("Logger").unwrap();
    let second = container.get_as::<Logger>("Logger").unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(calls.load(Ordering::Relaxed), 1);
}

#[test]
fn test_factory_result_not_cached_under_runtime_type() {
    let mut builder = stub_builder();
    builder.register_factory("app.logger", |_| Ok(Logger));
    let container = builder.build();

    let named = container.get_as::<Logger>("app.logger").unwrap();
    // "Logger" resolves separately through implicit self-binding
    let typed = container.get_as::<Logger>("Logger").unwrap();
    assert!(!Arc::ptr_eq(&named, &typed));
}

#[test]
fn test_alias_chain_resolves_transitively() {
    let mut builder = stub_builder();
    builder.register_alias("A", "B");
    builder.register_alias("B", "C");
    builder.register_factory("C", foo_factory);
    let container = builder.build();

    let through_chain = container.get_as::<Foo>("A").unwrap();
    let direct = container.get_as::<Foo>("C").unwrap();
    assert!(Arc::ptr_eq(&through_chain, &direct));
}

#[test]
fn test_implicit_self_binding_constructs_unregistered_types() {
    // Neither Engine nor Wheel has a definition; both resolve through
    // their type descriptors alone.
    let container = stub_builder().build();

    let engine = container.get_as::<Engine>("Engine").unwrap();
    let wheel = container.get_as::<Wheel>("Wheel").unwrap();
    assert!(Arc::ptr_eq(&engine.wheel, &wheel));
}

#[test]
fn test_interface_parameter_without_definition_fails() {
    let container = stub_builder().build();
    let err = container.get("RepoService").unwrap_err();

    // First failure wins: the NotFound names the interface identifier
    match &err {
        DiError::NotFound { id, .. } => assert_eq!(id, "Repo"),
        other => panic!("expected NotFound, got {other:?}"),
    }
    match err.cause() {
        Some(DiError::NotInstantiable(name)) => assert_eq!(name, "Repo"),
        other => panic!("expected NotInstantiable cause, got {other:?}"),
    }
}

#[test]
fn test_resolved_interface_parameter_injects_implementation() {
    let mut builder = stub_builder();
    builder.register_factory("Foo", foo_factory);
    builder.register_alias("Repo", "Foo");
    let container = builder.build();

    let service = container.get_as::<RepoService>("RepoService").unwrap();
    assert!(service.repo.is::<Foo>());
}

#[test]
fn test_circular_alias_fails_fast() {
    let mut builder = stub_builder();
    builder.register_alias("X", "Y");
    builder.register_alias("Y", "X");
    let container = builder.build();

    let err = container.get("X").unwrap_err();
    match err.cause() {
        Some(DiError::CircularDependency { path }) => {
            assert_eq!(path, "X -> Y -> X");
        }
        other => panic!("expected CircularDependency cause, got {other:?}"),
    }
}

#[test]
fn test_circular_constructor_dependency_fails_fast() {
    // Two types constructed from each other
    struct Ping;
    struct Pong;

    let registry = Arc::new(TypeRegistry::new());
    registry
        .register(
            TypeDescriptor::build::<Ping>("Ping")
                .constructor(vec![ParameterDescriptor::service("pong", "Pong")], |_| {
                    Ok(Ping)
                })
                .finish(),
        )
        .unwrap();
    registry
        .register(
            TypeDescriptor::build::<Pong>("Pong")
                .constructor(vec![ParameterDescriptor::service("ping", "Ping")], |_| {
                    Ok(Pong)
                })
                .finish(),
        )
        .unwrap();

    let container = ContainerBuilder::new().with_registry(registry).build();
    let err = container.get("Ping").unwrap_err();

    match err.cause() {
        Some(DiError::CircularDependency { path }) => {
            assert_eq!(path, "Ping -> Pong -> Ping");
        }
        other => panic!("expected CircularDependency cause, got {other:?}"),
    }
}

#[test]
fn test_module_registration() {
    struct LoggingModule;

    impl Module for LoggingModule {
        fn configure(&self, builder: &mut ContainerBuilder) {
            builder.register_factory("Logger", |_| Ok(Logger));
        }
    }

    let container = ContainerBuilder::new()
        .with_registry(stub_registry())
        .add_module(LoggingModule)
        .build();

    assert!(container.has("Logger"));
    container.get_as::<Logger>("Logger").unwrap();
}

#[test]
fn test_factory_failure_is_wrapped() {
    let mut builder = stub_builder();
    builder.register_factory("broken", |_| -> DiResult<Logger> {
        Err(DiError::Other("boom".to_string()))
    });
    let container = builder.build();

    let err = container.get("broken").unwrap_err();
    match &err {
        DiError::NotFound { id, .. } => assert_eq!(id, "broken"),
        other => panic!("expected NotFound, got {other:?}"),
    }
    assert!(matches!(err.cause(), Some(DiError::Other(_))));
}
