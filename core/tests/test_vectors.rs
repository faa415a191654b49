//! Verify the serializer and parser against JSON test vectors stored in
//! `test-vectors/`.
//!
//! Bodies are written as strings in the vectors to keep them readable; they
//! are compared as bytes here.

use shttp_core::{
    parse_request, parse_response, serialize_request, ErrorKind, HttpRequest,
};

fn headers(value: &serde_json::Value) -> Vec<(String, String)> {
    serde_json::from_value(value.clone()).unwrap()
}

fn error_kind(name: &str) -> ErrorKind {
    match name {
        "MalformedRequest" => ErrorKind::MalformedRequest,
        "MalformedResponse" => ErrorKind::MalformedResponse,
        other => panic!("unknown error kind: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[test]
fn response_test_vectors() {
    let raw = include_str!("../../test-vectors/responses.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input = case["raw"].as_str().unwrap().as_bytes();
        let result = parse_response(input);

        if let Some(expected_error) = case.get("expected_error") {
            let err = result.unwrap_err();
            assert_eq!(
                err.kind(),
                error_kind(expected_error.as_str().unwrap()),
                "{name}: error kind"
            );
            continue;
        }

        let resp = result.unwrap_or_else(|e| panic!("{name}: {e}"));
        let expected = &case["expected"];
        assert_eq!(resp.version, expected["version"].as_str().unwrap(), "{name}: version");
        assert_eq!(resp.status as u64, expected["status"].as_u64().unwrap(), "{name}: status");
        assert_eq!(resp.reason, expected["reason"].as_str().unwrap(), "{name}: reason");
        assert_eq!(resp.headers, headers(&expected["headers"]), "{name}: headers");
        assert_eq!(
            resp.body,
            expected["body"].as_str().unwrap().as_bytes(),
            "{name}: body"
        );
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

fn request_from(value: &serde_json::Value) -> HttpRequest {
    HttpRequest {
        method: value["method"].as_str().unwrap().to_string(),
        path: value["path"].as_str().unwrap().to_string(),
        version: value["version"].as_str().unwrap().to_string(),
        headers: headers(&value["headers"]),
        body: value["body"].as_str().map(|b| b.as_bytes().to_vec()),
    }
}

#[test]
fn request_test_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let request = request_from(&case["request"]);
        let result = serialize_request(&request);

        if let Some(expected_error) = case.get("expected_error") {
            let err = result.unwrap_err();
            assert_eq!(
                err.kind(),
                error_kind(expected_error.as_str().unwrap()),
                "{name}: error kind"
            );
            continue;
        }

        let wire = result.unwrap_or_else(|e| panic!("{name}: {e}"));
        assert_eq!(
            String::from_utf8_lossy(&wire),
            case["expected_wire"].as_str().unwrap(),
            "{name}: wire"
        );

        // The request line and headers come back unchanged.
        let parsed = parse_request(&wire).unwrap();
        assert_eq!(parsed.method, request.method, "{name}: method");
        assert_eq!(parsed.path, request.path, "{name}: path");
        assert_eq!(parsed.version, request.version, "{name}: version");
        assert_eq!(parsed.headers, request.headers, "{name}: headers");
        assert_eq!(parsed.body, request.body, "{name}: body");
    }
}
