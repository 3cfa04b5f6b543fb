/// End-to-end integration tests for chatlab
///
/// These tests verify complete workflows: loading → querying → exporting
mod common;

use chatlab::filters::parse_filter;
use chatlab::{
    ChatType, CsvOptions, InputFormat, MessageType, OutputFormat, SPEC_VERSION, SaveOptions, load,
    loads, save, saves,
};
use common::{ExportDirBuilder, MessageBuilder, SessionDocBuilder, sample_doc};

fn sample_session() -> chatlab::Session {
    loads(&sample_doc().to_json(), InputFormat::Json, &CsvOptions::default()).unwrap()
}

#[test]
fn test_e2e_load_json_and_query() {
    let dir = ExportDirBuilder::new().with_file("chat.json", &sample_doc().to_json()).build();

    let session =
        load(&dir.path().join("chat.json"), InputFormat::Auto, &CsvOptions::default()).unwrap();
    assert_eq!(session.meta().name, "Test Chat");
    assert_eq!(session.meta().chat_type, ChatType::Group);
    assert_eq!(session.members().len(), 2);

    // Sorted on load regardless of input order
    let ids: Vec<_> = session.messages().iter().map(|m| m.platform_message_id.as_str()).collect();
    assert_eq!(ids, vec!["m1", "m2", "m3"]);

    assert_eq!(session.messages_by_sender("wxid_alice").len(), 2);
    assert_eq!(session.messages_by_type(MessageType::Image).len(), 1);
    assert_eq!(session.message_by_id("m2").unwrap().reply_to.as_deref(), Some("m1"));
}

#[test]
fn test_e2e_json_round_trip_preserves_everything() {
    let session = sample_session();
    assert_eq!(session.meta().avatar.as_deref(), Some("https://example.com/chat.png"));
    assert_eq!(session.meta().description.as_deref(), Some("Weekend plans"));
    let alice = session.member("wxid_alice").unwrap();
    assert_eq!(alice.role.as_deref(), Some("owner"));
    assert_eq!(alice.avatar.as_deref(), Some("https://example.com/alice.png"));
    assert_eq!(alice.remark.as_deref(), Some("organizer"));
    assert_eq!(session.member("wxid_bob").unwrap().role, None);

    for options in [
        SaveOptions::default(),
        SaveOptions { json: chatlab::JsonExportOptions::compact(), ..Default::default() },
        SaveOptions {
            json: chatlab::JsonExportOptions { indent: Some(4), ensure_ascii: true },
            ..Default::default()
        },
    ] {
        let text = saves(&session, OutputFormat::Json, &options).unwrap();
        let decoded = loads(&text, InputFormat::Json, &CsvOptions::default()).unwrap();
        assert_eq!(decoded, session);
    }
}

#[test]
fn test_e2e_jsonl_and_json_agree() {
    let doc = sample_doc();
    let from_json = loads(&doc.to_json(), InputFormat::Auto, &CsvOptions::default()).unwrap();
    let from_jsonl = loads(&doc.to_jsonl(), InputFormat::Auto, &CsvOptions::default()).unwrap();
    assert_eq!(from_json, from_jsonl);
    assert_eq!(from_jsonl.meta().description.as_deref(), Some("Weekend plans"));
    assert_eq!(from_jsonl.member("wxid_alice").unwrap().remark.as_deref(), Some("organizer"));

    // and back out through the JSON Lines exporter
    let text = saves(&from_jsonl, OutputFormat::Jsonl, &SaveOptions::default()).unwrap();
    assert_eq!(loads(&text, InputFormat::Jsonl, &CsvOptions::default()).unwrap(), from_json);
}

#[test]
fn test_e2e_convert_through_every_format() {
    let dir = ExportDirBuilder::new();
    let session = sample_session();

    let jsonl_path = dir.file("out/chat.jsonl");
    save(&session, &jsonl_path, OutputFormat::Jsonl, &SaveOptions::default()).unwrap();
    let from_jsonl = load(&jsonl_path, InputFormat::Auto, &CsvOptions::default()).unwrap();
    assert_eq!(from_jsonl, session);

    let csv_path = dir.file("out/chat.csv");
    save(&session, &csv_path, OutputFormat::Csv, &SaveOptions::default()).unwrap();
    let options = CsvOptions { platform: "wechat".to_string(), ..Default::default() };
    let from_csv = load(&csv_path, InputFormat::Csv, &options).unwrap();

    assert_eq!(from_csv.version().version, SPEC_VERSION);
    assert_eq!(from_csv.message_count(), session.message_count());
    for (a, b) in from_csv.messages().iter().zip(session.messages()) {
        assert_eq!(a.timestamp, b.timestamp);
        assert_eq!(a.sender, b.sender);
        assert_eq!(a.content, b.content);
        assert_eq!(a.msg_type, b.msg_type);
    }
    // CSV has no ids or replies of its own
    assert_eq!(from_csv.messages()[0].platform_message_id, "csv_0");
    assert!(from_csv.messages().iter().all(|m| m.reply_to.is_none()));
}

#[test]
fn test_e2e_statistics() {
    let session = sample_session();
    let stats = session.statistics();

    assert_eq!(stats.total_messages, 3);
    assert_eq!(stats.unique_senders, 2);
    assert_eq!(stats.sender_stats.iter().map(|s| s.count).sum::<usize>(), 3);
    assert_eq!(stats.message_types.get("image"), Some(&1));
    assert_eq!(stats.timeline.values().sum::<usize>(), 3);

    let range = stats.date_range.unwrap();
    assert_eq!(range.start, 1_710_000_000);
    assert_eq!(range.end, 1_710_090_000);
}

#[test]
fn test_e2e_keyword_search() {
    let session = sample_session();

    let found = session.search("天气", false);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].content, "今天天气不错");

    assert_eq!(session.search("HELLO", false).len(), 1);
    assert!(session.search("HELLO", true).is_empty());
}

#[test]
fn test_e2e_threads() {
    let doc = SessionDocBuilder::new()
        .message(MessageBuilder::new("a").timestamp(0))
        .message(MessageBuilder::new("b").timestamp(100))
        .message(MessageBuilder::new("c").timestamp(3000));
    let session = loads(&doc.to_json(), InputFormat::Json, &CsvOptions::default()).unwrap();

    let threads = session.conversation_threads(30.0);
    let shape: Vec<Vec<&str>> = threads
        .iter()
        .map(|t| t.iter().map(|m| m.platform_message_id.as_str()).collect())
        .collect();
    assert_eq!(shape, vec![vec!["a", "b"], vec!["c"]]);
}

#[test]
fn test_e2e_filter_expression() {
    let session = sample_session();

    let filter = parse_filter("sender:wxid_alice type:text").unwrap();
    let matched = session.filter(&filter);
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].platform_message_id, "m3");

    let filter = parse_filter("keyword:hello OR keyword:天气").unwrap();
    assert_eq!(session.filter(&filter).len(), 2);
}

#[test]
fn test_e2e_relaxed_literal_export() {
    let text = "{'chatlab': {'version': '0.0.2', 'exportedAt': 1770985548, 'generator': 'WeFlow'}, \
                'meta': {'name': 'Literal', 'platform': 'wechat', 'type': 'private', 'ownerId': 'me'}, \
                'members': [{'platformId': 'u1', 'accountName': 'User1', 'role': None}], \
                'messages': [{'sender': 'u1', 'accountName': 'User1', 'timestamp': 1770985500, \
                'type': 0, 'content': 'It\\'s fine', 'platformMessageId': 'msg_1', 'pinned': False},],}";
    let session = loads(text, InputFormat::Auto, &CsvOptions::default()).unwrap();

    assert_eq!(session.version().generator, "WeFlow");
    assert_eq!(session.members()[0].role, None);
    assert_eq!(session.messages()[0].content, "It's fine");
}
