//! Streaming extraction over real readers.

use pretty_assertions::assert_eq;
use xmlkit::reader::Reader;
use xmlkit::reader::matcher::{Matcher, all, attribute_value, element_name, not};
use xmlkit::{CursorState, Severity};

fn users(count: usize) -> String {
    (1..=count)
        .map(|id| format!("<user id=\"{id}\">User {id}</user>"))
        .collect()
}

#[test]
fn test_items_before_malformed_fragment_are_all_yielded() {
    let xml = format!("<users>{}<user>broken</oops></users>", users(34));
    let reader = Reader::from_xml_string(xml);
    let mut cursor = reader.provide(element_name("user"));

    let mut items = Vec::new();
    let fault = loop {
        match cursor.next() {
            Some(Ok(item)) => items.push(item),
            Some(Err(fault)) => break fault,
            None => panic!("stream ended without a fault"),
        }
    };

    assert_eq!(items.len(), 34);
    assert_eq!(items[0], "<user id=\"1\">User 1</user>");
    assert_eq!(items[33], "<user id=\"34\">User 34</user>");
    assert_eq!(fault.message(), "Detected issues during streaming");
    assert_eq!(fault.issues().highest_severity(), Some(Severity::Fatal));
    assert!(cursor.next().is_none());
    assert_eq!(cursor.state(), CursorState::Failed);
}

#[test]
fn test_well_formed_input_ends_cleanly() {
    let reader = Reader::from_xml_string(format!("<users>{}</users>", users(5)));
    let results: Vec<_> = reader.provide(element_name("user")).collect();
    assert_eq!(results.len(), 5);
    assert!(results.iter().all(Result::is_ok));
}

#[test]
fn test_stopping_early_never_sees_the_fault() {
    let xml = format!("<users>{}<user>broken</oops></users>", users(3));
    let reader = Reader::from_xml_string(xml);
    let first_two: Vec<_> = reader
        .provide(element_name("user"))
        .take(2)
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(first_two.len(), 2);
}

#[test]
fn test_combined_matchers() {
    let reader = Reader::from_xml_string(concat!(
        r#"<users><user state="active">A</user><user state="disabled">B</user>"#,
        r#"<admin state="active">C</admin></users>"#,
    ));
    let matcher = all(vec![
        element_name("user").boxed(),
        not(attribute_value("state", "disabled")).boxed(),
    ]);
    let found: Vec<_> = reader.provide(matcher).collect::<Result<_, _>>().unwrap();
    assert_eq!(found, vec![r#"<user state="active">A</user>"#]);
}

#[test]
fn test_reading_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("users.xml");
    std::fs::write(&path, format!("<users>\n{}\n</users>", users(2))).unwrap();

    let reader = Reader::from_xml_file(&path).unwrap();
    let found: Vec<_> = reader.provide(element_name("user")).collect::<Result<_, _>>().unwrap();
    assert_eq!(found, vec!["<user id=\"1\">User 1</user>", "<user id=\"2\">User 2</user>"]);
}

#[test]
fn test_warnings_are_kept_but_do_not_fault() {
    let reader = Reader::from_xml_string("<?xml version=\"1.1\"?><users><user/></users>");
    let mut cursor = reader.provide(element_name("user"));
    assert_eq!(cursor.next(), Some(Ok("<user/>".to_string())));
    assert_eq!(cursor.next(), None);
    assert_eq!(cursor.state(), CursorState::Exhausted);
    assert_eq!(cursor.issues().highest_severity(), Some(Severity::Warning));
}
