#![allow(missing_docs)]

use invar_model::{
    ModelError, ProgramPoint, RepType, TraceColumn, TraceTable, Value, Variable, VariableSet,
    constants_from_frame, variables_from_frame,
};
use polars::prelude::{DataFrame, IntoColumn, NamedFrom, Series};

fn test_df() -> DataFrame {
    DataFrame::new(vec![
        Series::new("x".into(), vec![1i64, 2, 3]).into_column(),
        Series::new("y".into(), vec!["a", "b", "c"]).into_column(),
    ])
    .unwrap()
}

#[test]
fn test_observed_point_validates() {
    let df = test_df();
    let declared = variables_from_frame(&df).unwrap();
    let observed = TraceTable::from_frame(&df).unwrap();
    let latent = VariableSet::new();
    let latent_traces = TraceTable::new(observed.height());

    let point = ProgramPoint::new("data", &declared, &latent, &observed, &latent_traces);
    point.validate().unwrap();
    assert_eq!(point.record_count(), 3);
    assert_eq!(
        point.variables().map(|v| v.name.as_str()).collect::<Vec<_>>(),
        vec!["x", "y"]
    );
}

#[test]
fn test_constants_and_latent_columns_validate() {
    let df = test_df();
    let declared = variables_from_frame(&df).unwrap();
    let observed = TraceTable::from_frame(&df).unwrap();

    let stats = DataFrame::new(vec![
        Series::new("x_count".into(), vec![3i64]).into_column(),
        Series::new("x_mean".into(), vec![2.0f64]).into_column(),
    ])
    .unwrap();
    let mut latent = constants_from_frame(&stats).unwrap();
    latent
        .insert(Variable::new("x_double", RepType::Integer))
        .unwrap();

    let mut latent_traces = TraceTable::new(3);
    latent_traces
        .push_column(TraceColumn::new(
            "x_double",
            RepType::Integer,
            vec![Value::Integer(2), Value::Integer(4), Value::Integer(6)],
        ))
        .unwrap();

    let point = ProgramPoint::new("data", &declared, &latent, &observed, &latent_traces);
    point.validate().unwrap();
    let rendered: Vec<String> = point.variables().map(ToString::to_string).collect();
    assert_eq!(
        rendered,
        vec![
            "var x : int/int",
            "var y : java.lang.String/java.lang.String",
            "const x_count : int/int = 3",
            "const x_mean : double/double = 2.0",
            "var x_double : int/int",
        ]
    );
}

#[test]
fn test_untraced_variable_is_rejected() {
    let df = test_df();
    let mut declared = variables_from_frame(&df).unwrap();
    declared
        .insert(Variable::new("ghost", RepType::Float))
        .unwrap();
    let observed = TraceTable::from_frame(&df).unwrap();
    let latent = VariableSet::new();
    let latent_traces = TraceTable::new(3);

    let point = ProgramPoint::new("data", &declared, &latent, &observed, &latent_traces);
    assert!(matches!(
        point.validate(),
        Err(ModelError::MalformedInput(_))
    ));
}

#[test]
fn test_variables_serialize_in_order() {
    let df = test_df();
    let mut set = variables_from_frame(&df).unwrap();
    set.insert(Variable::constant("x_std", RepType::Float, Value::Missing))
        .unwrap();
    let text = serde_json::to_string(&set).unwrap();
    let pos = |key: &str| text.find(&format!("\"{key}\":")).unwrap();
    assert!(pos("x") < pos("y"));
    assert!(pos("y") < pos("x_std"));

    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["x"]["rep_type"], "integer");
    assert_eq!(json["x_std"]["constant"], serde_json::Value::Null);
}

#[test]
fn test_constant_of_wrong_type_is_rejected() {
    let df = test_df();
    let declared = variables_from_frame(&df).unwrap();
    let observed = TraceTable::from_frame(&df).unwrap();
    let latent_traces = TraceTable::new(3);

    let mut latent = VariableSet::new();
    latent
        .insert(Variable::constant("x_min", RepType::Integer, Value::Float(1.5)))
        .unwrap();
    let point = ProgramPoint::new("data", &declared, &latent, &observed, &latent_traces);
    assert!(matches!(
        point.validate(),
        Err(ModelError::MalformedInput(msg)) if msg.contains("x_min")
    ));

    let mut latent = VariableSet::new();
    latent
        .insert(Variable::constant("x_std", RepType::Float, Value::Missing))
        .unwrap();
    let point = ProgramPoint::new("data", &declared, &latent, &observed, &latent_traces);
    point.validate().unwrap();
}
