//! The event parser: a left-fold from raw log lines to [`Event`]s.
//!
//! Every line is first classified by shape ([`LineShape`]) and then
//! dispatched, so the short connection-notice lines are an intentional
//! case rather than a caught fault. Parsing threads an explicit
//! [`ParserState`] accumulator; there is no module-global state, and a
//! fresh run over the same input always yields the same sequence.

use smallvec::SmallVec;

use dendro_core::event::{Event, EventKind};
use dendro_core::{EventId, ParseError};

/// Prefix of the short line carrying a client's name.
const NAME_PREFIX: &str = "m_name";
/// Prefix of the short line carrying a client's IP address.
const IP_PREFIX: &str = "m_IPAddress";
/// Second-column literal of the out-of-shape subject-count line.
const NUM_SUBJECTS: &str = "numSubjects";

/// Shape of one raw log line, decided purely by field count and which
/// fields are empty.
#[derive(Debug)]
enum LineShape<'a> {
    /// Empty line.
    Blank,
    /// First field empty: questionnaire accumulation, the subject-count
    /// line, or noise.
    Leading { fields: Vec<&'a str> },
    /// Non-empty first field but fewer than four columns: the
    /// connection-notice fallback shape.
    Short { id: &'a str, token: &'a str },
    /// The generic id / event / keyword / value shape, with any extra
    /// columns kept for payload lines.
    Full {
        id: &'a str,
        name: &'a str,
        keyword: &'a str,
        fields: Vec<&'a str>,
    },
}

fn classify(line: &str) -> LineShape<'_> {
    if line.is_empty() {
        return LineShape::Blank;
    }
    let fields: Vec<&str> = line.split('\t').collect();
    if fields[0].is_empty() {
        return LineShape::Leading { fields };
    }
    if fields.len() < 4 {
        return LineShape::Short {
            id: fields[0],
            token: fields.get(1).copied().unwrap_or(""),
        };
    }
    LineShape::Full {
        id: fields[0],
        name: fields[1],
        keyword: fields[2],
        fields,
    }
}

/// What the parser is currently accumulating from leading-empty lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Accumulation {
    None,
    Questions,
    Answers,
}

/// The fold accumulator: the events built so far plus the open-block
/// bookkeeping.
#[derive(Debug)]
struct ParserState {
    events: Vec<Event>,
    last_id: Option<EventId>,
    accumulating: Accumulation,
}

impl ParserState {
    fn new() -> Self {
        Self {
            events: Vec::new(),
            last_id: None,
            accumulating: Accumulation::None,
        }
    }

    fn open_event(&mut self, line_no: usize) -> Result<&mut Event, ParseError> {
        self.events
            .last_mut()
            .ok_or(ParseError::ContinuationBeforeEvent { line: line_no })
    }
}

/// Parse a fully-buffered log into its ordered event sequence.
///
/// # Examples
///
/// ```
/// use dendro_replay::parse_log;
///
/// let log = "0\tCGEMSClients\ttime\t10:00:00\n";
/// let events = parse_log(log).unwrap();
/// assert_eq!(events.len(), 1);
/// assert_eq!(events[0].field("time"), Some("10:00:00"));
/// ```
pub fn parse_log(input: &str) -> Result<Vec<Event>, ParseError> {
    let mut state = ParserState::new();
    for (idx, raw) in input.lines().enumerate() {
        let line_no = idx + 1;
        match classify(raw) {
            LineShape::Blank => {}
            LineShape::Leading { fields } => leading_line(&mut state, &fields, line_no)?,
            LineShape::Short { id, token } => short_line(&mut state, id, token, line_no)?,
            LineShape::Full {
                id,
                name,
                keyword,
                fields,
            } => full_line(&mut state, id, name, keyword, &fields, line_no)?,
        }
    }
    Ok(state.events)
}

/// First field empty: questionnaire accumulation wins, then the
/// subject-count literal; anything else is noise and skipped.
fn leading_line(state: &mut ParserState, fields: &[&str], line_no: usize) -> Result<(), ParseError> {
    let second = fields.get(1).copied().unwrap_or("");
    match state.accumulating {
        Accumulation::Questions => {
            if let EventKind::QuesterDone { questions, .. } = &mut state.open_event(line_no)?.kind {
                questions.push(second.trim_end().to_string());
            }
            return Ok(());
        }
        Accumulation::Answers => {
            if let EventKind::QuesterDone { answers, .. } = &mut state.open_event(line_no)?.kind {
                answers.push(second.trim_end().to_string());
            }
            return Ok(());
        }
        Accumulation::None => {}
    }
    if second == NUM_SUBJECTS {
        let value = fields.get(2).copied().unwrap_or("").trim_end().to_string();
        let event = state.open_event(line_no)?;
        match &mut event.kind {
            EventKind::Parameters { num_subjects, .. } => *num_subjects = Some(value),
            _ => {
                event.fields.insert(NUM_SUBJECTS.to_string(), value);
            }
        }
    }
    Ok(())
}

/// The connection-notice fallback: a short line whose second field
/// carries an embedded name or address token. Unrecognized short lines
/// are skipped, not fatal.
fn short_line(
    state: &mut ParserState,
    _id: &str,
    token: &str,
    line_no: usize,
) -> Result<(), ParseError> {
    state.accumulating = Accumulation::None;
    let (value, is_name) = if let Some(rest) = token.strip_prefix(NAME_PREFIX) {
        (strip_trailing_delimiter(rest), true)
    } else if let Some(rest) = token.strip_prefix(IP_PREFIX) {
        (strip_trailing_delimiter(rest), false)
    } else {
        return Ok(());
    };
    let event = state.open_event(line_no)?;
    match &mut event.kind {
        EventKind::ClientInfo { name, ip_address } => {
            if is_name {
                *name = Some(value);
            } else {
                *ip_address = Some(value);
            }
        }
        _ => {
            let key = if is_name { NAME_PREFIX } else { IP_PREFIX };
            event.fields.insert(key.to_string(), value);
        }
    }
    Ok(())
}

/// Drop the single trailing delimiter character of an embedded token.
fn strip_trailing_delimiter(token: &str) -> String {
    let mut chars = token.chars();
    chars.next_back();
    chars.as_str().to_string()
}

fn full_line(
    state: &mut ParserState,
    id: &str,
    name: &str,
    keyword: &str,
    fields: &[&str],
    line_no: usize,
) -> Result<(), ParseError> {
    state.accumulating = Accumulation::None;
    let id: u64 = id.parse().map_err(|_| ParseError::BadEventId {
        line: line_no,
        text: id.to_string(),
    })?;
    let id = EventId(id);

    // A strictly greater id opens a new block; anything else continues
    // the currently open one.
    if state.last_id.map_or(true, |last| id > last) {
        let mut event = Event::new(id, name);
        if !keyword.is_empty() {
            event
                .fields
                .insert(keyword.to_string(), generic_value(fields));
        }
        state.events.push(event);
        state.last_id = Some(id);
        return Ok(());
    }

    let event = state.open_event(line_no)?;
    let event_id = event.id;
    match &mut event.kind {
        EventKind::Modify(payload) => match keyword {
            "m_operation" => payload.operations.push(generic_value(fields)),
            "m_DB" => payload.table_names.push(generic_value(fields)),
            "m_recordNrs" => {
                payload.table_count += 1;
                payload.content.push(String::new());
                let mut nrs: SmallVec<[i64; 8]> = SmallVec::new();
                for token in &fields[3..] {
                    let token = token.trim_end();
                    let nr = token.parse().map_err(|_| ParseError::BadRecordNr {
                        event: event_id,
                        text: token.to_string(),
                    })?;
                    nrs.push(nr);
                }
                payload.record_nrs.push(nrs);
            }
            "" => {
                let buffer = payload
                    .content
                    .last_mut()
                    .ok_or(ParseError::ContentBeforeRecordNrs { event: event_id })?;
                buffer.push_str(&fields[3..].join("\t"));
                buffer.push('\n');
            }
            _ => {
                event
                    .fields
                    .insert(keyword.to_string(), generic_value(fields));
            }
        },
        EventKind::Replace { content } | EventKind::Parameters { content, .. } => {
            if keyword.is_empty() {
                content.push_str(&fields[3..].join("\t"));
                content.push('\n');
            } else {
                event
                    .fields
                    .insert(keyword.to_string(), generic_value(fields));
            }
        }
        EventKind::QuesterDone {
            questions, answers, ..
        } => match keyword {
            "m_questions" => {
                questions.clear();
                questions.push(generic_value(fields));
                state.accumulating = Accumulation::Questions;
            }
            "m_answers" => {
                answers.clear();
                answers.push(generic_value(fields));
                state.accumulating = Accumulation::Answers;
            }
            _ => {
                if !keyword.is_empty() {
                    event
                        .fields
                        .insert(keyword.to_string(), generic_value(fields));
                }
            }
        },
        EventKind::ClientInfo { .. } | EventKind::Other => {
            if !keyword.is_empty() {
                event
                    .fields
                    .insert(keyword.to_string(), generic_value(fields));
            }
        }
    }
    Ok(())
}

/// The generic "set field" value: the right-stripped fourth column.
fn generic_value(fields: &[&str]) -> String {
    fields.get(3).copied().unwrap_or("").trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dendro_core::event::{EVENT_CLIENT_INFO, EVENT_DB_MODIFY, EVENT_DB_REPLACE};

    #[test]
    fn blank_lines_are_skipped() {
        let events = parse_log("\n\n0\tCGEMSTime\ttime\t09:00:00\n\n").unwrap();
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn continuation_adds_fields_to_open_event() {
        let log = "0\tCGEMSTime\ttime\t09:00:00\n\
                   0\tCGEMSTime\tsource\t2\n";
        let events = parse_log(log).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].field("time"), Some("09:00:00"));
        assert_eq!(events[0].source(), Some("2"));
    }

    #[test]
    fn greater_id_opens_new_event() {
        let log = "0\tCGEMSTime\ttime\t09:00:00\n\
                   2\tCGEMSTime\ttime\t09:00:05\n";
        let events = parse_log(log).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].id, EventId(0));
        assert_eq!(events[1].id, EventId(2));
    }

    #[test]
    fn client_info_short_lines_set_name_and_address() {
        let log = format!(
            "1\t{EVENT_CLIENT_INFO}\ttime\t09:00:00\n\
             1\tm_name\"zleaf1\"\n\
             1\tm_IPAddress\"10.0.0.7\"\n"
        );
        let events = parse_log(&log).unwrap();
        match &events[0].kind {
            EventKind::ClientInfo { name, ip_address } => {
                assert_eq!(name.as_deref(), Some("\"zleaf1"));
                assert_eq!(ip_address.as_deref(), Some("\"10.0.0.7"));
            }
            other => panic!("wrong kind: {other:?}"),
        }
    }

    #[test]
    fn unrecognized_short_line_is_skipped() {
        let log = "1\tCGEMSTime\ttime\t09:00:00\n1\tgarbage\n";
        let events = parse_log(log).unwrap();
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn replace_payload_accumulates_from_third_column() {
        let log = format!(
            "2\t{EVENT_DB_REPLACE}\ttarget\t0\n\
             2\t{EVENT_DB_REPLACE}\tm_period\t0\n\
             2\t{EVENT_DB_REPLACE}\t\tTABLE\tsubjects\n\
             2\t{EVENT_DB_REPLACE}\t\tname\tscore\n\
             2\t{EVENT_DB_REPLACE}\t\tAlice\t10\n"
        );
        let events = parse_log(&log).unwrap();
        match &events[0].kind {
            EventKind::Replace { content } => {
                assert_eq!(content, "TABLE\tsubjects\nname\tscore\nAlice\t10\n");
            }
            other => panic!("wrong kind: {other:?}"),
        }
        assert_eq!(events[0].target(), Some("0"));
    }

    #[test]
    fn modify_record_nrs_open_payload_slots() {
        let log = format!(
            "5\t{EVENT_DB_MODIFY}\ttime\t09:01:00\n\
             5\t{EVENT_DB_MODIFY}\tm_period\t0\n\
             5\t{EVENT_DB_MODIFY}\tm_operation\tupdate\n\
             5\t{EVENT_DB_MODIFY}\tm_DB\tsubjects\n\
             5\t{EVENT_DB_MODIFY}\tm_recordNrs\t0\t2\n\
             5\t{EVENT_DB_MODIFY}\t\tscore\n\
             5\t{EVENT_DB_MODIFY}\t\t15\n\
             5\t{EVENT_DB_MODIFY}\t\t25\n"
        );
        let events = parse_log(&log).unwrap();
        match &events[0].kind {
            EventKind::Modify(payload) => {
                assert_eq!(payload.table_count, 1);
                assert_eq!(payload.table_names, vec!["subjects".to_string()]);
                assert_eq!(payload.record_nrs[0].as_slice(), &[0, 2]);
                assert_eq!(payload.content[0], "score\n15\n25\n");
            }
            other => panic!("wrong kind: {other:?}"),
        }
    }

    #[test]
    fn modify_content_before_record_nrs_is_fatal() {
        let log = format!(
            "5\t{EVENT_DB_MODIFY}\ttime\t09:01:00\n\
             5\t{EVENT_DB_MODIFY}\t\tscore\n"
        );
        let err = parse_log(&log).unwrap_err();
        assert_eq!(
            err,
            ParseError::ContentBeforeRecordNrs {
                event: EventId(5)
            }
        );
    }

    #[test]
    fn questionnaire_accumulation_ends_on_non_empty_first_field() {
        let log = "7\tCGESMQuesterDone\tsource\t1\n\
                   7\tCGESMQuesterDone\tm_questions\tAge?\n\
                   \tGender?\n\
                   \tIncome?\n\
                   7\tCGESMQuesterDone\tm_answers\t30\n\
                   \tf\n\
                   \t1200\n\
                   8\tCGEMSTime\ttime\t09:05:00\n";
        let events = parse_log(log).unwrap();
        match &events[0].kind {
            EventKind::QuesterDone {
                questions, answers, ..
            } => {
                assert_eq!(questions, &["Age?", "Gender?", "Income?"]);
                assert_eq!(answers, &["30", "f", "1200"]);
            }
            other => panic!("wrong kind: {other:?}"),
        }
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn bare_content_on_non_payload_kinds_is_skipped() {
        // Only replace, parameters, and modify events carry payload
        // text; a bare content line elsewhere is not an error.
        let log = "4\tCGEMSTime\ttime\t09:00:00\n\
                   4\tCGEMSTime\t\tstray\tpayload\n";
        let events = parse_log(log).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].fields.len(), 1);
    }

    #[test]
    fn num_subjects_line_sets_count_on_parameters_event() {
        let log = "3\tCGEMSParameters\ttime\t09:00:30\n\
                   3\tCGEMSParameters\t\tRepetitions\t10\n\
                   \tnumSubjects\t4\n";
        let events = parse_log(log).unwrap();
        match &events[0].kind {
            EventKind::Parameters {
                content,
                num_subjects,
            } => {
                assert_eq!(content, "Repetitions\t10\n");
                assert_eq!(num_subjects.as_deref(), Some("4"));
            }
            other => panic!("wrong kind: {other:?}"),
        }
    }

    #[test]
    fn bad_event_id_is_fatal() {
        let err = parse_log("x\tCGEMSTime\ttime\t09:00:00\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::BadEventId {
                line: 1,
                text: "x".to_string()
            }
        );
    }

    #[test]
    fn reparse_is_deterministic() {
        let log = "0\tCGEMSTime\ttime\t09:00:00\n\
                   1\tCGESMClientInfo\ttime\t09:00:01\n\
                   1\tm_name\"zleaf1\"\n";
        assert_eq!(parse_log(log).unwrap(), parse_log(log).unwrap());
    }
}
