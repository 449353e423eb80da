//! Integration tests for queries, updates and result export against the
//! in-process endpoint

mod common;

use common::{MockServer, TEST_QUERY};
use futures::TryStreamExt;
use reqwest::StatusCode;
use sparql_pipe::rdf::xsd;
use sparql_pipe::{
    handle_with, BindingTuple, Literal, NamedNode, QueryBindings, QueryResultHandler, RdfValue,
    SparqlError, Statement, TransactionKind,
};

const EXPECTED_CSV: &str = "a,b,c\r\n\
http://test-entity,http://hasStringLiteral,some string\r\n\
http://test-entity,http://hasEntityRelation,http://test-ref/4eda5172-8fc9-4295-aecf-d6a21d10a55a\r\n\
http://test-entity,http://hasByteLiteral,4\r\n\
http://test-entity,http://hasShortLiteral,5\r\n\
http://test-entity,http://hasLongLiteral,6\r\n\
http://test-entity,http://hasIntLiteral,234\r\n\
http://test-entity,http://hasFloatLiteral,1.26\r\n\
http://test-entity,http://hasDoubleLiteral,1.23E0\r\n\
http://test-entity,http://hasDateLiteral,2020-12-04T10:47:06.127Z\r\n\
http://test-entity,http://hasBooleanLiteral,true\r\n";

fn literal(tuple: &BindingTuple) -> &Literal {
    tuple.get("c").and_then(RdfValue::as_literal).unwrap()
}

fn expect_fixture_results(tuples: &[BindingTuple]) {
    assert_eq!(tuples.len(), 10);
    for tuple in tuples {
        assert_eq!(&tuple.header()[..], ["a", "b", "c"]);
        assert_eq!(tuple.get("a"), Some(&RdfValue::from(NamedNode::new("http://test-entity"))));
    }

    assert_eq!(tuples[0].get("b"), Some(&RdfValue::from(NamedNode::new("http://hasStringLiteral"))));
    assert_eq!(literal(&tuples[0]), &Literal::new_simple_literal("some string"));
    assert_eq!(
        tuples[1].get("c"),
        Some(&RdfValue::from(NamedNode::new(
            "http://test-ref/4eda5172-8fc9-4295-aecf-d6a21d10a55a"
        )))
    );
    assert_eq!(literal(&tuples[2]).as_i64().unwrap(), 4);
    assert_eq!(literal(&tuples[3]).as_i64().unwrap(), 5);
    assert_eq!(literal(&tuples[4]).as_i64().unwrap(), 6);
    assert_eq!(literal(&tuples[5]).as_i64().unwrap(), 234);
    assert_eq!(literal(&tuples[5]).datatype(), xsd::INT);
    assert!((literal(&tuples[6]).as_f64().unwrap() - 1.26).abs() < 1e-9);
    assert!((literal(&tuples[7]).as_f64().unwrap() - 1.23).abs() < 1e-9);
    assert_eq!(
        literal(&tuples[8]).as_date_time().unwrap().timestamp_millis(),
        1607078826127
    );
    assert!(literal(&tuples[9]).as_bool().unwrap());
}

#[tokio::test]
async fn test_query_fixture() {
    let server = MockServer::start().await;
    let client = server.client("test", TransactionKind::Remote);

    let tuples: Vec<BindingTuple> = client
        .query(TEST_QUERY, &QueryBindings::new())
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    expect_fixture_results(&tuples);
    assert_eq!(server.requests(), vec!["POST /test/query".to_string()]);
}

#[tokio::test]
async fn test_small_read_buffer() {
    let server = MockServer::start().await;
    let config = server.config("test").with_read_buffer_size(3);
    let client = sparql_pipe::SparqlClient::new(config);

    let tuples: Vec<BindingTuple> = client
        .query(TEST_QUERY, &QueryBindings::new())
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap();
    expect_fixture_results(&tuples);
}

#[tokio::test]
async fn test_ask() {
    let server = MockServer::start().await;
    let client = server.client("test", TransactionKind::Remote);
    let bindings = QueryBindings::new().bind("a", NamedNode::new("http://test-entity"));
    assert!(client.ask("ASK { ?a ?b ?c }", &bindings).await.unwrap());
}

#[tokio::test]
async fn test_ask_without_boolean_element() {
    let server = MockServer::start().await;
    let client = server.client("test", TransactionKind::Remote);
    let err = client.ask(TEST_QUERY, &QueryBindings::new()).await.unwrap_err();
    assert!(matches!(err, SparqlError::Protocol(_)));
}

#[tokio::test]
async fn test_structured_error() {
    let server = MockServer::start().await;
    let client = server.client("error", TransactionKind::Remote);

    let err = client.query(TEST_QUERY, &QueryBindings::new()).await.err().unwrap();
    match err {
        SparqlError::Query { code, message, status } => {
            assert_eq!(code, "QE0PE2");
            assert!(message.contains("Unknown variable"));
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_plain_error() {
    let server = MockServer::start().await;
    let client = server.client("error-no-json", TransactionKind::Remote);

    let err = client.update("CLEAR ALL").await.unwrap_err();
    assert!(matches!(
        err,
        SparqlError::Http { ref message, status } if message == "bla" && status == StatusCode::INTERNAL_SERVER_ERROR
    ));
}

#[tokio::test]
async fn test_export_csv_matches_reference() {
    let server = MockServer::start().await;
    let client = server.client("test", TransactionKind::Remote);

    let mut sink = Vec::new();
    let rows = client.export_csv(TEST_QUERY, &mut sink).await.unwrap();
    assert_eq!(rows, 10);
    assert_eq!(String::from_utf8(sink).unwrap(), EXPECTED_CSV);
}

#[tokio::test]
async fn test_export_csv_to_file() {
    let server = MockServer::start().await;
    let client = server.client("test", TransactionKind::Remote);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.csv");
    let mut file = tokio::fs::File::create(&path).await.unwrap();
    client.export_csv(TEST_QUERY, &mut file).await.unwrap();
    drop(file);

    assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), EXPECTED_CSV);
}

#[tokio::test]
async fn test_get_string() {
    let server = MockServer::start().await;
    let client = server.client("test", TransactionKind::Remote);
    let url = format!("{}/size", client.config().database_base_path());
    assert_eq!(client.get_string(&url).await.unwrap(), "10");
}

#[derive(Default)]
struct Recording {
    header: Vec<String>,
    solutions: Vec<BindingTuple>,
    ended: bool,
}

impl QueryResultHandler for Recording {
    fn start_query_result(&mut self, header: &[String]) {
        self.header = header.to_vec();
    }

    fn handle_solution(&mut self, tuple: BindingTuple) {
        self.solutions.push(tuple);
    }

    fn end_query_result(&mut self) {
        self.ended = true;
    }
}

#[tokio::test]
async fn test_result_handler() {
    let server = MockServer::start().await;
    let client = server.client("test", TransactionKind::Remote);

    let mut handler = Recording::default();
    let tuples = client.query(TEST_QUERY, &QueryBindings::new()).await.unwrap();
    handle_with(tuples, &mut handler).await.unwrap();

    assert_eq!(handler.header, vec!["a", "b", "c"]);
    assert!(handler.ended);
    expect_fixture_results(&handler.solutions);
}

#[tokio::test]
async fn test_add_remove_clear_round_trip() {
    let server = MockServer::start().await;
    let client = server.client("store", TransactionKind::Local);
    let statements = vec![
        Statement::new(
            NamedNode::new("http://test-entity"),
            NamedNode::new("http://hasStringLiteral"),
            Literal::new_simple_literal("some string"),
        ),
        Statement::new(
            NamedNode::new("http://test-entity"),
            NamedNode::new("http://hasLabel"),
            Literal::new_language_tagged_literal("label", "en"),
        ),
    ];

    client.add(&statements, &[]).await.unwrap();
    let tuples: Vec<BindingTuple> = client
        .query("SELECT ?s ?p ?o WHERE { ?s ?p ?o }", &QueryBindings::new())
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap();
    assert_eq!(tuples.len(), 2);
    assert!(tuples
        .iter()
        .any(|t| t.get("o") == Some(&RdfValue::from(Literal::new_language_tagged_literal("label", "en")))));

    client.remove(&statements[..1], &[]).await.unwrap();
    assert_eq!(server.triple_count(), 1);

    client.clear(&[]).await.unwrap();
    assert_eq!(server.triple_count(), 0);
}
