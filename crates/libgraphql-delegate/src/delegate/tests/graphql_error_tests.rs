use crate::delegate::GraphQLError;
use crate::delegate::PathSegment;
use crate::delegate::ResponsePath;
use crate::delegate::CALLER_PATH_EXTENSION;
use crate::request::RemoteError;
use serde_json::json;

#[test]
fn remote_errors_carry_the_caller_path() {
    let caller_path =
        ResponsePath::root()
            .join_key("user")
            .join_index(2)
            .join_key("reviews");
    let mut remote_error = RemoteError::new("not allowed");
    remote_error.path = Some(vec![json!("reviewsByAuthor"), json!("reviews")]);
    remote_error.extensions.insert("code".to_string(), json!("FORBIDDEN"));

    let error = GraphQLError::from_remote(remote_error, &caller_path);

    assert_eq!(error.message, "not allowed");
    assert_eq!(error.path.as_ref(), Some(&caller_path));
    assert_eq!(error.extension(CALLER_PATH_EXTENSION), Some(&json!(["user", 2, "reviews"])));
    assert_eq!(error.extension("code"), Some(&json!("FORBIDDEN")));
}

#[test]
fn serializes_in_response_error_shape() {
    let error = GraphQLError::at_path(
        "boom",
        ResponsePath::from_segments(vec![
            PathSegment::Key("a".to_string()),
            PathSegment::Index(0),
        ]),
    );

    assert_eq!(
        serde_json::to_value(&error).unwrap(),
        json!({ "message": "boom", "path": ["a", 0] }),
    );
    assert_eq!(error.to_string(), "boom (at `a.0`)");
    assert_eq!(GraphQLError::new("plain").to_string(), "plain");
}

#[test]
fn response_paths_deserialize_from_json_arrays() {
    let path: ResponsePath = serde_json::from_value(json!(["items", 3, "name"])).unwrap();
    assert_eq!(path.segments(), &[
        PathSegment::Key("items".to_string()),
        PathSegment::Index(3),
        PathSegment::Key("name".to_string()),
    ]);
    assert_eq!(path.to_json(), json!(["items", 3, "name"]));
}
