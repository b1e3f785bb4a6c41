use console_protocol::ActivityId;
use console_protocol::ExecutionId;
use console_protocol::ExecutionRecord;
use console_protocol::InputRecord;
use console_protocol::InputState;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

/// Ordered activity of one console session. Insertion order is display
/// order; the only mutations are appends, in-place stream growth, and
/// wholesale replacement of a provisional input echo. The log is
/// single-writer; readers take [`ActivityLog::snapshot`] clones.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActivityLog {
    /// The oldest records are at the beginning of the vector.
    records: Vec<ExecutionRecord>,
    next_id: u64,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            next_id: 1,
        }
    }

    /// Insert `record`, applying the merge policy. Exactly one of the
    /// following happens, first match wins:
    ///
    /// 1. a non-provisional input replaces the provisional echo of the same
    ///    execution, in place (see [`Self::append_confirmed_input`]);
    /// 2. a stdout chunk is folded into the last record when that record is
    ///    a stdout chunk of the same execution;
    /// 3. same for stderr chunks, independently of stdout;
    /// 4. the record is pushed as a new last entry.
    ///
    /// Returns the id under which the content now lives: the fresh id of an
    /// appended or replacing record, or the existing id of the record a
    /// chunk was folded into. Never fails; malformed records are
    /// unrepresentable in `ExecutionRecord`.
    pub fn append(&mut self, record: ExecutionRecord) -> ActivityId {
        match record {
            ExecutionRecord::Input(input) => {
                if input.state == InputState::Provisional {
                    self.push(ExecutionRecord::Input(input))
                } else {
                    self.append_confirmed_input(input)
                }
            }
            ExecutionRecord::OutputStream(chunk) => {
                if let Some(ExecutionRecord::OutputStream(last)) = self.records.last_mut() {
                    if last.parent_id == chunk.parent_id {
                        let id = last.id;
                        debug!("coalescing stdout chunk into record {id}");
                        last.append_chunk(&chunk.text);
                        return id;
                    }
                }
                self.push(ExecutionRecord::OutputStream(chunk))
            }
            ExecutionRecord::ErrorStream(chunk) => {
                if let Some(ExecutionRecord::ErrorStream(last)) = self.records.last_mut() {
                    if last.parent_id == chunk.parent_id {
                        let id = last.id;
                        debug!("coalescing stderr chunk into record {id}");
                        last.append_chunk(&chunk.text);
                        return id;
                    }
                }
                self.push(ExecutionRecord::ErrorStream(chunk))
            }
            // Discrete records are spelled out so that a new kind forces a
            // decision about its merge behavior here.
            record @ (ExecutionRecord::OutputMessage(_)
            | ExecutionRecord::ErrorMessage(_)
            | ExecutionRecord::OutputHtml(_)
            | ExecutionRecord::OutputPlot(_)
            | ExecutionRecord::Prompt(_)) => self.push(record),
        }
    }

    /// A confirmed input replaces the provisional echo of its execution.
    ///
    /// Scan backward from the end, skipping non-input records, and inspect
    /// only the first input found: if it is provisional and belongs to the
    /// same execution, replace it at its position; otherwise stop scanning
    /// and append. Never look past the first input — an older provisional
    /// echo from a different turn must not be collapsed into this one.
    fn append_confirmed_input(&mut self, incoming: InputRecord) -> ActivityId {
        for idx in (0..self.records.len()).rev() {
            let ExecutionRecord::Input(existing) = &self.records[idx] else {
                continue;
            };
            if existing.state == InputState::Provisional
                && existing.parent_id == incoming.parent_id
            {
                let id = self.next_activity_id();
                let parent = &incoming.parent_id;
                debug!("replacing provisional input of execution {parent} with record {id}");
                self.records[idx] = ExecutionRecord::Input(InputRecord { id, ..incoming });
                return id;
            }
            break;
        }
        self.push(ExecutionRecord::Input(incoming))
    }

    /// Move the lifecycle of the most recent input of `parent` forward to
    /// `state`. Backward transitions are ignored. Returns whether a record
    /// changed.
    pub fn update_input_state(&mut self, parent: &ExecutionId, state: InputState) -> bool {
        for record in self.records.iter_mut().rev() {
            let ExecutionRecord::Input(input) = record else {
                continue;
            };
            if &input.parent_id != parent {
                continue;
            }
            if input.state >= state {
                debug!(
                    "ignoring backward input transition {} -> {state} for execution {parent}",
                    input.state
                );
                return false;
            }
            input.state = state;
            return true;
        }
        false
    }

    /// Clone of the current ordered sequence. Two calls without an
    /// intervening mutation return equal sequences.
    pub fn snapshot(&self) -> Vec<ExecutionRecord> {
        self.records.clone()
    }

    /// Borrowed ordered view of the current records.
    pub fn records(&self) -> &[ExecutionRecord] {
        &self.records
    }

    pub fn get(&self, id: ActivityId) -> Option<&ExecutionRecord> {
        self.records.iter().find(|record| record.id() == id)
    }

    pub(crate) fn get_mut(&mut self, id: ActivityId) -> Option<&mut ExecutionRecord> {
        self.records.iter_mut().find(|record| record.id() == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whole-session clear, the only permitted truncation. Ids are not
    /// reused afterwards.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    fn push(&mut self, record: ExecutionRecord) -> ActivityId {
        let id = self.next_activity_id();
        self.records.push(record.with_id(id));
        id
    }

    fn next_activity_id(&mut self) -> ActivityId {
        let id = ActivityId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        id
    }
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new()
    }
}
