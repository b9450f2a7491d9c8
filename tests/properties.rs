//! Property-based tests for the dispatch engine and symbol table.

use proptest::prelude::*;
use rustyjson::{
    PathSegment, Reducer, Rule, ScalarKind, Symbol, SymbolTable, TokenKind, Tokenizer,
    TraversalObserver,
};
use serde_json::{json, Map, Value};

fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(Value::from),
        "[a-z \"\\\\]{0,8}".prop_map(Value::String),
    ];
    leaf.prop_recursive(6, 48, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,3}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

/// (model, values) per telemetry element
fn telemetry() -> impl Strategy<Value = Vec<(&'static str, Vec<i32>)>> {
    prop::collection::vec(
        (
            prop_oneof![Just("TX"), Just("RX"), Just("T\u{00e9}")],
            prop::collection::vec(-1000..1000i32, 0..5),
        ),
        0..12,
    )
}

fn telemetry_doc(elements: &[(&str, Vec<i32>)]) -> Value {
    let items: Vec<Value> = elements
        .iter()
        .map(|(model, values)| {
            let readings: Vec<Value> = values.iter().map(|v| json!({ "Value": v })).collect();
            json!({ "Model": model, "Telemetry": readings })
        })
        .collect();
    json!({ "Telemetry": items })
}

fn tx_sum() -> Reducer<i64> {
    Reducer::builder(0)
        .rule(
            Rule::new(["{", "Telemetry", "[", "{"], |v, _, path, _| {
                if !v.str_eq("TX") {
                    path.invalidate(2);
                }
            })
            .property("Model")
            .kind(ScalarKind::String),
        )
        .rule(
            Rule::new(
                ["{", "Telemetry", "[", "{", "Telemetry", "[", "{"],
                |v, _, _, sum| *sum += v.as_i64().unwrap_or(0),
            )
            .property("Value")
            .kind(ScalarKind::Number),
        )
        .build()
        .unwrap()
}

/// Records every root-level scalar property as (name, raw value)
fn root_trace() -> Reducer<Vec<(Vec<u8>, Vec<u8>)>> {
    Reducer::new(
        Vec::new(),
        vec![Rule::new(["{"], |v, name, _, trace: &mut Vec<(Vec<u8>, Vec<u8>)>| {
            trace.push((name.to_vec(), v.raw().to_vec()))
        })],
    )
    .unwrap()
}

#[derive(Default)]
struct DepthRecorder {
    mismatches: usize,
    last_stack: usize,
}

impl TraversalObserver for DepthRecorder {
    fn on_token(&mut self, _kind: TokenKind, depth: usize, stack: &[PathSegment]) {
        if depth != stack.len() {
            self.mismatches += 1;
        }
        self.last_stack = stack.len();
    }
}

proptest! {
    /// The aggregate only depends on the elements, not the layout
    #[test]
    fn prop_telemetry_sum(elements in telemetry()) {
        let doc = telemetry_doc(&elements);
        let expected: i64 = elements
            .iter()
            .filter(|(model, _)| *model == "TX")
            .flat_map(|(_, values)| values.iter().map(|v| *v as i64))
            .sum();

        let reducer = tx_sum();
        let compact = serde_json::to_string(&doc).unwrap();
        let pretty = serde_json::to_string_pretty(&doc).unwrap();
        prop_assert_eq!(reducer.process(compact.as_bytes()).unwrap(), expected);
        prop_assert_eq!(reducer.process(pretty.as_bytes()).unwrap(), expected);
    }

    /// Whitespace never changes which properties fire or what they see
    #[test]
    fn prop_formatting_invariance(value in json_value()) {
        let reducer = root_trace();
        let compact = serde_json::to_string(&value).unwrap();
        let pretty = serde_json::to_string_pretty(&value).unwrap();
        prop_assert_eq!(
            reducer.process(compact.as_bytes()).unwrap(),
            reducer.process(pretty.as_bytes()).unwrap()
        );
    }

    /// One firing per root-level scalar property
    #[test]
    fn prop_root_match_count(value in json_value()) {
        let expected = match &value {
            Value::Object(map) => map
                .values()
                .filter(|v| !v.is_object() && !v.is_array())
                .count(),
            _ => 0,
        };
        let text = serde_json::to_string(&value).unwrap();
        prop_assert_eq!(root_trace().process(text.as_bytes()).unwrap().len(), expected);
    }

    /// The path stack always holds exactly the open containers
    #[test]
    fn prop_stack_depth(value in json_value()) {
        let text = serde_json::to_string_pretty(&value).unwrap();
        let reducer = tx_sum();
        let mut recorder = DepthRecorder::default();
        let mut tokens = Tokenizer::new(text.as_bytes());
        reducer.process_observed(&mut tokens, 0, &mut recorder).unwrap();
        prop_assert_eq!(recorder.mismatches, 0);
        prop_assert_eq!(recorder.last_stack, 0);
    }

    /// An anonymous `[` fires once per "v" under an unrecorded name and
    /// never under a recorded one
    #[test]
    fn prop_anonymous_marker_count(
        recorded in any::<bool>(),
        values in prop::collection::vec(-100..100i32, 0..6),
    ) {
        let reducer = Reducer::new(
            0usize,
            vec![
                Rule::new(["{", "items", "[", "{"], |_, _, _, _| {}).property("zz"),
                Rule::new(["{", "[", "{"], |_, _, _, n: &mut usize| *n += 1).property("v"),
            ],
        )
        .unwrap();
        let key = if recorded { "items" } else { "other" };
        let readings: Vec<Value> = values.iter().map(|v| json!({ "v": v })).collect();
        let text = serde_json::to_string(&json!({ key: readings })).unwrap();

        let expected = if recorded { 0 } else { values.len() };
        prop_assert_eq!(reducer.process(text.as_bytes()).unwrap(), expected);
    }

    /// decode(encode(name)) == name for every recorded name
    #[test]
    fn prop_symbol_round_trip(
        names in prop::collection::hash_set(prop::collection::vec(any::<u8>(), 0..12), 0..200),
    ) {
        let mut table = SymbolTable::new();
        for name in &names {
            table.record(name).unwrap();
        }
        prop_assert_eq!(table.len(), names.len());
        for name in &names {
            let symbol = table.encode(name);
            prop_assert!(!symbol.is_reserved());
            prop_assert_eq!(table.decode(symbol), &name[..]);
        }
        prop_assert_eq!(table.encode(b"\xff-never-recorded-\xff"), Symbol::WILDCARD);
    }
}
