use apifn_core::parse;
use apifn_core::parse::security::SecuredByEntry;
use apifn_core::parse::type_decl::{TypeDeclaration, TypeExpression};

const GITHUB: &str = include_str!("fixtures/github-repos.yaml");
const ISSUES: &str = include_str!("fixtures/issues.yaml");

#[test]
fn parse_github_yaml() {
    let doc = parse::from_yaml(GITHUB).expect("should parse github-repos.yaml");
    assert_eq!(doc.title, "GitHub Repos");
    assert_eq!(doc.base_uri.as_deref(), Some("https://api.github.com"));
    assert_eq!(doc.types.len(), 1);

    let resource = doc.resources.get("/repos/{id}").expect("should have /repos/{id}");
    let patch = resource.methods.get("patch").expect("should have PATCH");
    assert_eq!(patch.annotations["id"], "updateRepo");
    assert_eq!(patch.query_parameters.len(), 1);
    assert!(patch.headers.contains_key("X-Request-Id?"));

    match patch.body.get("application/json") {
        Some(TypeDeclaration::Expression(expr)) => assert_eq!(expr, "Class"),
        other => panic!("expected a type expression, got {other:?}"),
    }
}

#[test]
fn parse_nested_resources_and_security() {
    let doc = parse::from_yaml(ISSUES).unwrap();
    let repo = doc.resources.get("/repos/{owner}/{repo}").unwrap();
    assert!(repo.methods.is_empty());
    let issues = repo.resources.get("/issues").unwrap();
    assert_eq!(issues.methods.len(), 2);
    assert_eq!(issues.resources.len(), 1);

    let get = issues.methods.get("get").unwrap();
    let secured_by = get.secured_by.as_ref().unwrap();
    assert_eq!(secured_by.len(), 2);
    assert!(secured_by[0].is_none());
    assert_eq!(
        secured_by[1],
        Some(SecuredByEntry::Name("token".to_string()))
    );
}

#[test]
fn parse_type_declaration_forms() {
    let doc = parse::from_yaml(ISSUES).unwrap();
    match doc.types.get("Issue").unwrap() {
        TypeDeclaration::Declaration(obj) => {
            assert_eq!(
                obj.type_expression,
                Some(TypeExpression::Single("object".to_string()))
            );
            assert_eq!(obj.properties.len(), 3);
        }
        other => panic!("expected declaration object, got {other:?}"),
    }
}

#[test]
fn parse_null_declarations() {
    let yaml = r#"
title: T
resources:
  /things/{id}:
    uriParameters:
      id:
    methods:
      post:
        body:
          application/json: ~
"#;
    let doc = parse::from_yaml(yaml).unwrap();
    let things = &doc.resources["/things/{id}"];
    assert_eq!(things.uri_parameters["id"], TypeDeclaration::Empty);
    assert_eq!(
        things.methods["post"].body["application/json"],
        TypeDeclaration::Empty
    );
}

#[test]
fn parse_json_document() {
    let json = r#"{
        "title": "Ping",
        "resources": {"/ping": {"methods": {"get": {}}}}
    }"#;
    let doc = parse::from_json(json).unwrap();
    assert_eq!(doc.title, "Ping");
    assert!(doc.base_uri.is_none());
    assert!(doc.resources["/ping"].methods.contains_key("get"));
}

#[test]
fn parse_missing_title() {
    let result = parse::from_yaml("resources: {}\n");
    assert!(result.is_err());
}
