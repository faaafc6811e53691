use super::{frame, registration, Notification};
use crate::sexp::Atom;

fn parse_frame(framed: &str) -> (usize, &str) {
    let rest = framed.strip_prefix('|').expect("frame starts with |");
    let (len, payload) = rest.split_once('|').expect("second delimiter");
    (len.parse().expect("decimal length"), payload)
}

#[test]
fn frame_prefixes_character_length() {
    assert_eq!(frame("hello"), "|5|hello");
    assert_eq!(frame(""), "|0|");
}

#[test]
fn frame_length_counts_characters_not_bytes() {
    let payload = "héllo wörld";
    let framed = frame(payload);
    let (len, rest) = parse_frame(&framed);
    assert_eq!(len, payload.chars().count());
    assert_eq!(rest, payload);
    assert!(payload.len() > len, "payload must be multi-byte for this test");
}

#[test]
fn frame_does_not_escape_pipes_in_payload() {
    let framed = frame("a|b");
    assert_eq!(framed, "|3|a|b");
    let (len, rest) = parse_frame(&framed);
    assert_eq!(len, 3);
    assert_eq!(rest, "a|b");
}

#[test]
fn registration_is_a_plist_with_hyphenated_keys() {
    let msg = registration(
        &Atom::new("MyProject"),
        &Atom::new("enotify_rspec_result_message_handler"),
    );
    assert_eq!(
        msg.encode(),
        "(:register MyProject :handler-fn enotify-rspec-result-message-handler)"
    );
}

#[test]
fn notification_nests_a_plist_under_notification() {
    let note = Notification {
        slot_id: Atom::new("Proj"),
        text: "F".to_string(),
        face: Atom::new("failure").keyword(),
        help: "3 examples, 1 failures.".to_string(),
        mouse_1: Atom::new("enotify_rspec_mouse_1_handler"),
        data: "line one\nline two".to_string(),
    };
    assert_eq!(
        note.to_sexp().encode(),
        "(:id Proj :notification (:text \"F\" :face :failure \
         :help \"3 examples, 1 failures.\" :mouse-1 enotify-rspec-mouse-1-handler) \
         :data \"line one\\nline two\")"
    );
}
