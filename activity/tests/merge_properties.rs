use std::collections::HashMap;
use std::collections::HashSet;

use console_activity::ActivityLog;
use console_activity::SessionActivity;
use console_protocol::ActivityId;
use console_protocol::ExecutionId;
use console_protocol::ExecutionRecord;
use console_protocol::InputRecord;
use console_protocol::InputState;
use console_protocol::OutputMessageRecord;
use console_protocol::RecordKind;
use console_protocol::RuntimeEvent;
use console_protocol::StreamName;
use console_protocol::StreamRecord;
use proptest::prelude::*;

fn parent(n: u8) -> ExecutionId {
    ExecutionId(format!("p{n}"))
}

fn arb_record() -> impl Strategy<Value = ExecutionRecord> {
    let text = "[a-c]{1,3}";
    prop_oneof![
        (0u8..3, any::<bool>(), text).prop_map(|(p, provisional, code)| {
            ExecutionRecord::Input(InputRecord {
                id: ActivityId::ZERO,
                parent_id: parent(p),
                state: if provisional {
                    InputState::Provisional
                } else {
                    InputState::Executing
                },
                code,
            })
        }),
        (0u8..3, text).prop_map(|(p, text)| {
            ExecutionRecord::OutputStream(StreamRecord {
                id: ActivityId::ZERO,
                parent_id: parent(p),
                text,
            })
        }),
        (0u8..3, text).prop_map(|(p, text)| {
            ExecutionRecord::ErrorStream(StreamRecord {
                id: ActivityId::ZERO,
                parent_id: parent(p),
                text,
            })
        }),
        (0u8..3, text).prop_map(|(p, text)| {
            ExecutionRecord::OutputMessage(OutputMessageRecord {
                id: ActivityId::ZERO,
                parent_id: parent(p),
                text,
                data: None,
            })
        }),
    ]
}

proptest! {
    /// The coalescing invariant: the log never contains two directly
    /// adjacent stdout records of the same execution, nor two adjacent
    /// stderr records of the same execution.
    #[test]
    fn no_adjacent_stream_records_share_a_parent(ops in prop::collection::vec(arb_record(), 0..64)) {
        let mut log = ActivityLog::new();
        for record in ops {
            log.append(record);
        }
        for pair in log.records().windows(2) {
            let same_kind_stream = matches!(
                (pair[0].kind(), pair[1].kind()),
                (RecordKind::OutputStream, RecordKind::OutputStream)
                    | (RecordKind::ErrorStream, RecordKind::ErrorStream)
            );
            if same_kind_stream {
                prop_assert_ne!(pair[0].parent_id(), pair[1].parent_id());
            }
        }
    }

    /// Ids are unique across the log no matter how inserts merged.
    #[test]
    fn record_ids_are_unique(ops in prop::collection::vec(arb_record(), 0..64)) {
        let mut log = ActivityLog::new();
        for record in ops {
            log.append(record);
        }
        let mut seen = HashSet::new();
        for record in log.records() {
            prop_assert!(seen.insert(record.id()));
        }
    }

    /// Coalescing is lossless and order-preserving: for each execution, the
    /// concatenation of its stdout record texts in log order equals the
    /// concatenation of the appended stdout chunks in append order. Same for
    /// stderr.
    #[test]
    fn stream_text_is_preserved_per_execution(ops in prop::collection::vec(arb_record(), 0..64)) {
        let mut expected_out: HashMap<ExecutionId, String> = HashMap::new();
        let mut expected_err: HashMap<ExecutionId, String> = HashMap::new();
        let mut log = ActivityLog::new();
        for record in ops {
            match &record {
                ExecutionRecord::OutputStream(chunk) => expected_out
                    .entry(chunk.parent_id.clone())
                    .or_default()
                    .push_str(&chunk.text),
                ExecutionRecord::ErrorStream(chunk) => expected_err
                    .entry(chunk.parent_id.clone())
                    .or_default()
                    .push_str(&chunk.text),
                _ => {}
            }
            log.append(record);
        }

        let mut actual_out: HashMap<ExecutionId, String> = HashMap::new();
        let mut actual_err: HashMap<ExecutionId, String> = HashMap::new();
        for record in log.records() {
            match record {
                ExecutionRecord::OutputStream(chunk) => actual_out
                    .entry(chunk.parent_id.clone())
                    .or_default()
                    .push_str(&chunk.text),
                ExecutionRecord::ErrorStream(chunk) => actual_err
                    .entry(chunk.parent_id.clone())
                    .or_default()
                    .push_str(&chunk.text),
                _ => {}
            }
        }
        prop_assert_eq!(actual_out, expected_out);
        prop_assert_eq!(actual_err, expected_err);
    }

    /// Discrete records never merge and never reorder: the output messages in
    /// the final log are exactly the output messages appended, in order.
    #[test]
    fn discrete_records_keep_append_order(ops in prop::collection::vec(arb_record(), 0..64)) {
        let mut expected = Vec::new();
        let mut log = ActivityLog::new();
        for (n, record) in ops.into_iter().enumerate() {
            // Tag each message so equal texts cannot mask a reorder.
            if let ExecutionRecord::OutputMessage(mut message) = record {
                message.text = format!("{}#{n}", message.text);
                expected.push(message.text.clone());
                log.append(ExecutionRecord::OutputMessage(message));
            } else {
                log.append(record);
            }
        }

        let actual: Vec<String> = log
            .records()
            .iter()
            .filter_map(|record| match record {
                ExecutionRecord::OutputMessage(message) => Some(message.text.clone()),
                _ => None,
            })
            .collect();
        prop_assert_eq!(actual, expected);
    }

    /// Snapshots are idempotent and equal to the borrowed view.
    #[test]
    fn snapshot_is_stable(ops in prop::collection::vec(arb_record(), 0..32)) {
        let mut log = ActivityLog::new();
        for record in ops {
            log.append(record);
        }
        prop_assert_eq!(log.snapshot(), log.snapshot());
        let snapshot = log.snapshot();
        prop_assert_eq!(snapshot.as_slice(), log.records());
    }

    /// Under the adapter contract (one echo per execution, then runtime
    /// events), at most one provisional input per execution is ever live.
    #[test]
    fn at_most_one_provisional_input_per_execution(
        script in prop::collection::vec((0u8..3, 0u8..5, "[a-c]{1,3}"), 0..48),
    ) {
        let mut session = SessionActivity::new();
        let mut echoed: HashSet<ExecutionId> = HashSet::new();
        let mut confirmed: HashSet<ExecutionId> = HashSet::new();
        for (p, action, text) in script {
            let execution_id = parent(p);
            match action {
                // Submit: echo once per execution.
                0 => {
                    if echoed.insert(execution_id.clone()) {
                        session.echo_input(execution_id, text);
                    }
                }
                // Runtime acknowledgement: once, and only after the echo.
                1 => {
                    if echoed.contains(&execution_id) && confirmed.insert(execution_id.clone()) {
                        session.handle_event(RuntimeEvent::ExecuteInput {
                            execution_id,
                            code: text,
                        });
                    }
                }
                2 => {
                    session.handle_event(RuntimeEvent::Stream {
                        execution_id,
                        stream: StreamName::Stdout,
                        text,
                    });
                }
                3 => {
                    session.handle_event(RuntimeEvent::Stream {
                        execution_id,
                        stream: StreamName::Stderr,
                        text,
                    });
                }
                _ => {
                    session.handle_event(RuntimeEvent::ExecutionFinished { execution_id });
                }
            }
        }

        let mut provisional_per_parent: HashMap<ExecutionId, usize> = HashMap::new();
        for record in session.log().records() {
            if let ExecutionRecord::Input(input) = record {
                if input.state == InputState::Provisional {
                    *provisional_per_parent.entry(input.parent_id.clone()).or_default() += 1;
                }
            }
        }
        for count in provisional_per_parent.values() {
            prop_assert!(*count <= 1);
        }
    }
}
