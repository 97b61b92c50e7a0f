//! End-to-end resolution tests against a small manifest.
//!
//! Each test loads the same route table and exercises the public
//! `Endpoint` surface the way generated bindings do.

use pretty_assertions::assert_eq;
use serde_json::json;

use route_bindings::{
    decode, serialize, ArrayFormat, FormDescriptor, FormMethod, Method, QueryMap, QueryOptions,
    QueryValue, ResolveError, RouteArg, RouteArgs, RouteManifest, RouteRegistry, RouteRequest,
    Scalar,
};

const MANIFEST: &str = r#"{
    "routes": [
        {
            "name": "roles.crear-funcionalidad",
            "methods": ["post"],
            "url": "/roles/{role}/crear-funcionalidad",
            "source": { "file": "app/Http/Controllers/RoleController.php", "line": 42 }
        },
        { "name": "stock.imprimir", "methods": ["get", "head"], "url": "/stock/imprimir" },
        { "name": "users.show", "methods": ["get"], "url": "/users/{user}" },
        { "name": "posts.by-slug", "methods": ["get"], "url": "/posts/{post:slug}" },
        { "name": "archive", "methods": ["get"], "url": "/archive/{year?}/{month?}" },
        { "name": "posts.update", "methods": ["put", "patch"], "url": "/posts/{post}" },
        { "name": "posts.destroy", "methods": ["delete"], "url": "/posts/{post}" }
    ]
}"#;

fn registry() -> RouteRegistry {
    let manifest = RouteManifest::from_json_str(MANIFEST).expect("manifest should parse");
    RouteRegistry::from_manifest(&manifest).expect("manifest should validate")
}

fn none() -> QueryOptions {
    QueryOptions::new()
}

#[test]
fn roles_example_end_to_end() {
    let registry = registry();
    let crear = registry.endpoint("roles.crear-funcionalidad").unwrap();

    let by_scalar = crear.request(7, &none()).unwrap();
    assert_eq!(
        by_scalar,
        RouteRequest {
            url: "/roles/7/crear-funcionalidad".to_string(),
            method: Method::Post,
        }
    );

    let by_entity = crear
        .request(RouteArg::entity([("id", Scalar::from(7))]), &none())
        .unwrap();
    assert_eq!(by_entity, by_scalar);

    assert_eq!(
        crear.form(7, &none()).unwrap(),
        FormDescriptor {
            action: "/roles/7/crear-funcionalidad".to_string(),
            method: FormMethod::Post,
        }
    );
}

#[test]
fn stock_example_end_to_end() {
    let registry = registry();
    let stock = registry.endpoint("stock.imprimir").unwrap();

    assert_eq!(stock.url((), &none()).unwrap(), "/stock/imprimir");
    assert_eq!(
        stock
            .url((), &QueryOptions::from_json(&json!({ "query": { "x": 1 } })))
            .unwrap(),
        "/stock/imprimir?x=1"
    );

    assert_eq!(
        stock.form((), &none()).unwrap(),
        FormDescriptor {
            action: "/stock/imprimir".to_string(),
            method: FormMethod::Get,
        }
    );
    assert_eq!(
        stock.form_as(Method::Head, (), &none()).unwrap(),
        FormDescriptor {
            action: "/stock/imprimir?_method=HEAD".to_string(),
            method: FormMethod::Get,
        }
    );
}

#[test]
fn single_placeholder_argument_shapes_agree() {
    let registry = registry();
    let show = registry.endpoint("users.show").unwrap();

    let shapes: Vec<RouteArgs> = vec![
        5.into(),
        "5".into(),
        RouteArgs::named([("user", 5)]),
        RouteArgs::named([("id", 5)]),
        RouteArg::entity([("id", Scalar::from(5))]).into(),
        RouteArgs::positional([5]),
        RouteArgs::try_from(json!({ "id": 5 })).unwrap(),
        RouteArgs::try_from(json!(5)).unwrap(),
    ];

    for args in shapes {
        assert_eq!(show.url(args, &none()).unwrap(), "/users/5");
    }
}

#[test]
fn binding_field_placeholder_unwraps_entity_field() {
    let registry = registry();
    let post = registry.endpoint("posts.by-slug").unwrap();

    let entity = RouteArg::entity([("id", Scalar::from(1)), ("slug", Scalar::from("hello"))]);
    assert_eq!(post.url(entity, &none()).unwrap(), "/posts/hello");
    assert_eq!(post.url("hello", &none()).unwrap(), "/posts/hello");
}

#[test]
fn missing_parameter_never_yields_braces() {
    let registry = registry();
    let show = registry.endpoint("users.show").unwrap();

    for args in [RouteArgs::None, RouteArgs::named([("other", 1)])] {
        let err = show.url(args, &none()).unwrap_err();
        assert_eq!(
            err,
            ResolveError::MissingParameter {
                route: "users.show".to_string(),
                param: "user".to_string(),
            }
        );
    }
}

#[test]
fn optional_parameters_only_omitted_from_the_end() {
    let registry = registry();
    let archive = registry.endpoint("archive").unwrap();

    assert_eq!(archive.url((), &none()).unwrap(), "/archive");
    assert_eq!(
        archive.url(RouteArgs::named([("year", 2024)]), &none()).unwrap(),
        "/archive/2024"
    );
    assert!(matches!(
        archive.url(RouteArgs::named([("month", 5)]), &none()),
        Err(ResolveError::OptionalParameterGap { .. })
    ));
}

#[test]
fn merge_query_adds_and_overrides_context() {
    let registry = registry();
    let stock = registry.endpoint("stock.imprimir").unwrap();
    let context = QueryMap::from([("a", 1)]);

    let merged = QueryOptions::merge([("b", 2)]).with_context(context.clone());
    let url = stock.url((), &merged).unwrap();
    assert_eq!(url, "/stock/imprimir?a=1&b=2");

    let overridden = QueryOptions::merge([("a", 3)]).with_context(context);
    let url = stock.url((), &overridden).unwrap();
    assert_eq!(url, "/stock/imprimir?a=3");
}

#[test]
fn head_form_keeps_override_with_caller_query() {
    let registry = registry();
    let stock = registry.endpoint("stock.imprimir").unwrap();

    let options = QueryOptions::merge([("page", 2)]).with_context(QueryMap::from([("q", "tinta")]));
    let form = stock.form_as(Method::Head, (), &options).unwrap();
    assert_eq!(form.action, "/stock/imprimir?_method=HEAD&q=tinta&page=2");
    assert_eq!(form.method, FormMethod::Get);
}

#[test]
fn body_method_forms_are_forced_to_get() {
    let registry = registry();

    let destroy = registry.endpoint("posts.destroy").unwrap();
    let form = destroy
        .form(3, &QueryOptions::replace([("_method", "POST"), ("confirm", "1")]))
        .unwrap();
    assert_eq!(
        form,
        FormDescriptor {
            action: "/posts/3?_method=DELETE&confirm=1".to_string(),
            method: FormMethod::Get,
        }
    );

    let update = registry.endpoint("posts.update").unwrap();
    let form = update.form(3, &none()).unwrap();
    assert_eq!(form.action, "/posts/3?_method=PUT");
    assert_eq!(form.method, FormMethod::Get);

    let form = update
        .form_as(Method::Patch, 3, &QueryOptions::merge([("draft", true)]))
        .unwrap();
    assert_eq!(form.action, "/posts/3?_method=PATCH&draft=1");
    assert_eq!(form.method, FormMethod::Get);

    // Direct descriptors keep the real method.
    assert_eq!(destroy.request(3, &none()).unwrap().method, Method::Delete);
}

#[test]
fn undeclared_method_rejected() {
    let registry = registry();
    let stock = registry.endpoint("stock.imprimir").unwrap();

    assert_eq!(
        stock.post((), &none()).unwrap_err(),
        ResolveError::MethodNotAllowed {
            route: "stock.imprimir".to_string(),
            method: Method::Post,
        }
    );
    assert!(stock.form_as(Method::Delete, (), &none()).is_err());
}

#[test]
fn unknown_route_reported() {
    let registry = registry();
    assert!(matches!(
        registry.try_endpoint("missing"),
        Err(ResolveError::UnknownRoute { .. })
    ));
}

#[test]
fn nested_query_round_trips_through_decoder() {
    let query = QueryMap::from([
        ("search", QueryValue::from("tinta negra")),
        ("page", 3.into()),
        ("tags", vec!["a", "b"].into()),
        (
            "filter",
            QueryMap::from([("status", QueryValue::from("open")), ("ids", vec!["7"].into())])
                .into(),
        ),
    ]);

    let encoded = serialize(&query, ArrayFormat::Brackets);
    assert_eq!(
        encoded,
        "?search=tinta%20negra&page=3&tags[]=a&tags[]=b&filter[status]=open&filter[ids][]=7"
    );

    let decoded = decode(&encoded);
    assert_eq!(decoded.get("search"), Some(&QueryValue::from("tinta negra")));
    assert_eq!(decoded.get("page"), Some(&QueryValue::from("3")));
    assert_eq!(decoded.get("tags"), Some(&QueryValue::from(vec!["a", "b"])));
    assert_eq!(
        decoded.get("filter"),
        Some(&QueryValue::from(QueryMap::from([
            ("status", QueryValue::from("open")),
            ("ids", vec!["7"].into()),
        ])))
    );
}

#[test]
fn definition_metadata_exposed() {
    let registry = registry();
    let crear = registry.endpoint("roles.crear-funcionalidad").unwrap();
    let def = crear.definition();

    assert_eq!(def.url(), "/roles/{role}/crear-funcionalidad");
    assert_eq!(def.methods(), &[Method::Post]);
    assert_eq!(
        def.source().map(ToString::to_string).as_deref(),
        Some("app/Http/Controllers/RoleController.php:42")
    );
}
