use swagdoc_core::parse;
use swagdoc_core::parse::parameter::ParameterLocation;
use swagdoc_core::parse::ref_resolve::expand;
use swagdoc_core::parse::response::ResponseOrRef;
use swagdoc_core::parse::schema::{Items, SchemaOrRef};

const PETSTORE: &str = include_str!("fixtures/petstore.yaml");
const UNTAGGED: &str = include_str!("fixtures/untagged.yaml");

#[test]
fn parse_petstore_yaml() {
    let spec = parse::from_yaml(PETSTORE).expect("should parse petstore");
    assert_eq!(spec.swagger, "2.0");
    assert_eq!(spec.info.title, "Swagger Petstore");
    assert_eq!(spec.base_path.as_deref(), Some("/v1"));
    assert_eq!(spec.paths.len(), 4);
    assert_eq!(spec.definitions.len(), 3);
    assert_eq!(spec.tags.len(), 2);
    assert_eq!(spec.security_definitions.len(), 2);

    let pet_item = spec.paths.get("/pets/{petId}").expect("should have /pets/{petId}");
    assert_eq!(pet_item.parameters.len(), 1);

    let post = spec.paths["/pets"].post.as_ref().expect("should have POST");
    assert_eq!(post.extensions["x-operationName"], "create");
    assert!(post.operation_id.is_none());
}

#[test]
fn parse_untagged_yaml() {
    let spec = parse::from_yaml(UNTAGGED).expect("should parse untagged");
    assert!(spec.tags.is_empty());
    assert_eq!(spec.paths["/widgets"].extensions["x-pathName"], "Widgets");
}

#[test]
fn parse_json() {
    let json = r#"{
        "swagger": "2.0",
        "info": {"title": "Json API", "version": "1"},
        "paths": {
            "/upload": {
                "post": {
                    "summary": "Upload",
                    "parameters": [{"name": "file", "in": "formData", "type": "file"}],
                    "responses": {"204": {"description": "stored"}}
                }
            }
        }
    }"#;
    let spec = parse::from_json(json).expect("should parse json");
    let post = spec.paths["/upload"].post.as_ref().unwrap();
    let swagdoc_core::parse::parameter::ParameterOrRef::Parameter(file) = &post.parameters[0]
    else {
        panic!("expected inline parameter");
    };
    assert_eq!(file.location, ParameterLocation::FormData);
}

#[test]
fn parse_invalid_version() {
    let yaml = r#"
swagger: "1.2"
info:
  title: Test
  version: "1.0"
paths: {}
"#;
    let result = parse::from_yaml(yaml);
    assert!(result.is_err());
}

#[test]
fn expand_inlines_definitions() {
    let spec = parse::from_yaml(PETSTORE).expect("should parse petstore");
    let expanded = expand(&spec).expect("should expand");

    let get = expanded.paths["/pets"].get.as_ref().unwrap();
    let ResponseOrRef::Response(ok) = &get.responses["200"] else {
        panic!("expected inline response");
    };
    let Some(SchemaOrRef::Schema(pets)) = &ok.schema else {
        panic!("expected inline schema");
    };
    assert_eq!(pets.description.as_deref(), Some("A list of pets"));
    let Some(Items::Single(item)) = &pets.items else {
        panic!("expected single items schema");
    };
    let pet = item.as_schema().expect("items should be expanded");
    assert_eq!(pet.title.as_deref(), Some("Pet"));
    assert_eq!(pet.properties.len(), 5);
}

#[test]
fn expand_keeps_circular_reference() {
    let yaml = r##"
swagger: "2.0"
info:
  title: Tree
  version: "1"
paths:
  /nodes:
    get:
      summary: Nodes
      responses:
        "200":
          description: ok
          schema:
            $ref: "#/definitions/Node"
definitions:
  Node:
    title: Node
    properties:
      children:
        type: array
        items:
          $ref: "#/definitions/Node"
"##;
    let spec = parse::from_yaml(yaml).unwrap();
    let expanded = expand(&spec).expect("circular references should not fail");
    let get = expanded.paths["/nodes"].get.as_ref().unwrap();
    let ResponseOrRef::Response(ok) = &get.responses["200"] else {
        panic!("expected inline response");
    };
    let node = ok.schema.as_ref().and_then(SchemaOrRef::as_schema).unwrap();
    let children = node.properties["children"].as_schema().unwrap();
    let Some(Items::Single(item)) = &children.items else {
        panic!("expected items");
    };
    assert!(matches!(item.as_ref(), SchemaOrRef::Ref { ref_path } if ref_path == "#/definitions/Node"));
}
