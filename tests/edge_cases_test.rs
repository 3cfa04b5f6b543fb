/// Edge case integration tests
///
/// These tests cover damaged input, unusual encodings and other awkward exports
mod common;

use chatlab::{ChatlabError, CsvOptions, InputFormat, load, loads, validate};
use common::{ExportDirBuilder, MessageBuilder, SessionDocBuilder, sample_doc};

#[test]
fn test_edge_case_jsonl_with_corrupt_lines() {
    let doc = sample_doc().to_jsonl();
    let mut lines: Vec<&str> = doc.lines().collect();
    lines.insert(2, r#"{"_type":"member","platformId":"#);
    lines.insert(4, "");
    lines.insert(5, "    ");
    lines.push("garbage that is not json");
    let text = lines.join("\n");

    let session = loads(&text, InputFormat::Jsonl, &CsvOptions::default()).unwrap();
    assert_eq!(session.members().len(), 2);
    assert_eq!(session.message_count(), 3);
}

#[test]
fn test_edge_case_jsonl_without_header() {
    let text = sample_doc().to_jsonl().lines().skip(1).collect::<Vec<_>>().join("\n");
    let err = loads(&text, InputFormat::Jsonl, &CsvOptions::default()).unwrap_err();
    assert!(err.is_format_error());
    assert!(err.to_string().contains("missing header"));
}

#[test]
fn test_edge_case_empty_document_defaults() {
    let session = loads("{}", InputFormat::Json, &CsvOptions::default()).unwrap();
    assert_eq!(session.meta().name, "Unknown");
    assert_eq!(session.meta().platform, "unknown");
    assert_eq!(session.version().generator, "unknown");
    assert_eq!(session.message_count(), 0);

    let stats = session.statistics();
    assert_eq!(stats.total_messages, 0);
    assert!(stats.date_range.is_none());
    assert!(session.conversation_threads(30.0).is_empty());
}

#[test]
fn test_edge_case_lenient_field_types() {
    let text = r#"{"members":[{"platformId":12345,"accountName":null}],
        "messages":[{"sender":12345,"timestamp":"1700000000","type":"1","content":null},
                    {"sender":"x","timestamp":1700000001.9,"type":2.0}]}"#;
    let session = loads(text, InputFormat::Json, &CsvOptions::default()).unwrap();

    assert_eq!(session.members()[0].platform_id, "12345");
    assert_eq!(session.members()[0].account_name, "");
    let first = &session.messages()[0];
    assert_eq!(first.sender, "12345");
    assert_eq!(first.timestamp, 1_700_000_000);
    assert_eq!(first.msg_type, 1);
    assert_eq!(first.content, "");
    assert_eq!(session.messages()[1].timestamp, 1_700_000_001);
    assert_eq!(session.messages()[1].msg_type, 2);
}

#[test]
fn test_edge_case_unknown_type_code_preserved() {
    let doc = SessionDocBuilder::new().message(MessageBuilder::new("m").msg_type(10000));
    let session = loads(&doc.to_json(), InputFormat::Json, &CsvOptions::default()).unwrap();
    assert_eq!(session.messages()[0].msg_type, 10000);
    assert_eq!(session.messages()[0].message_type().label(), "text");
    assert_eq!(session.statistics().message_types.get("text"), Some(&1));
}

#[test]
fn test_edge_case_equal_timestamps_keep_input_order() {
    let doc = SessionDocBuilder::new()
        .message(MessageBuilder::new("late").timestamp(200))
        .message(MessageBuilder::new("first").timestamp(100))
        .message(MessageBuilder::new("second").timestamp(100))
        .message(MessageBuilder::new("third").timestamp(100));
    let session = loads(&doc.to_json(), InputFormat::Json, &CsvOptions::default()).unwrap();
    let ids: Vec<_> = session.messages().iter().map(|m| m.platform_message_id.as_str()).collect();
    assert_eq!(ids, vec!["first", "second", "third", "late"]);
    assert!(session.messages().windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
}

#[test]
fn test_edge_case_csv_localized_headers_and_bad_times() {
    let csv = "\u{feff}时间,发送者,昵称,内容,类型\n\
               2024-03-15 08:30:00,u1,小明,早上好,0\n\
               昨天,u2,小红,收到,0\n\
               2024/03/15 08:31:00,u1,小明改名,[图片],1\n";
    let dir = ExportDirBuilder::new().with_file("chat.csv", csv).build();
    let options = CsvOptions { chat_name: "家庭群".to_string(), ..Default::default() };
    let session = load(&dir.path().join("chat.csv"), InputFormat::Csv, &options).unwrap();

    assert_eq!(session.meta().name, "家庭群");
    assert_eq!(session.message_count(), 3);
    // "昨天" is row 1, so its timestamp is 1 and it sorts first
    assert_eq!(session.messages()[0].content, "收到");
    assert_eq!(session.messages()[0].timestamp, 1);
    assert_eq!(session.member("u1").unwrap().account_name, "小明");
}

#[test]
fn test_edge_case_auto_never_picks_csv() {
    let dir =
        ExportDirBuilder::new().with_file("chat.csv", "time,sender,content\n1,u1,hi\n").build();
    let path = dir.path().join("chat.csv");
    let err = load(&path, InputFormat::Auto, &CsvOptions::default()).unwrap_err();
    assert!(err.is_format_error());
}

#[test]
fn test_edge_case_missing_file_is_io_error() {
    let dir = ExportDirBuilder::new().build();
    for format in [InputFormat::Auto, InputFormat::Json, InputFormat::Jsonl, InputFormat::Csv] {
        let err = load(&dir.path().join("nope.json"), format, &CsvOptions::default()).unwrap_err();
        assert!(matches!(err, ChatlabError::Io(_)), "{format}: {err}");
    }
}

#[test]
fn test_edge_case_invalid_utf8_is_io_error() {
    let dir = ExportDirBuilder::new().build();
    let path = dir.path().join("binary.json");
    std::fs::write(&path, [0xff, 0xfe, 0x00, 0x7b]).unwrap();
    let err = load(&path, InputFormat::Json, &CsvOptions::default()).unwrap_err();
    assert!(matches!(err, ChatlabError::Io(_)));
}

#[test]
fn test_edge_case_validate() {
    assert!(validate(&sample_doc().to_json()));
    assert!(validate(&sample_doc().to_jsonl()));
    assert!(!validate(""));
    assert!(!validate("time,sender,content\n1,u1,hi"));
}
