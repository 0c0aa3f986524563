use std::env;

use anyhow::{Context, Result};
use comfy_table::Table;
use invar_cli::daikon::{DaikonInvocation, resolve_jar};
use invar_cli::trace::{TraceRequest, run_trace as trace_dataset};
use invar_core::{Expander, ExpanderRegistry, Matcher, MatcherRegistry};
use invar_ingest::CsvOptions;
use invar_output::{Comparability, EmitOptions};
use tracing::info_span;

use crate::cli::{ComparabilityArg, TraceArgs};
use crate::summary::{apply_table_style, header_cell, print_json, print_report};

pub fn run_trace(args: &TraceArgs) -> Result<()> {
    let request = trace_request(args);
    let report = trace_dataset(&request)?;
    if args.json {
        print_json(&report)?;
    } else {
        print_report(&report);
    }

    if args.run_daikon {
        let span = info_span!("daikon");
        let _guard = span.enter();
        let jar = resolve_jar(args.daikon_jar.as_deref(), |key| env::var_os(key))?;
        let decls = report
            .decls
            .canonicalize()
            .with_context(|| format!("resolve {}", report.decls.display()))?;
        let dtrace = report
            .dtrace
            .canonicalize()
            .with_context(|| format!("resolve {}", report.dtrace.display()))?;
        DaikonInvocation::new(jar, decls, dtrace)
            .with_java(&args.java)
            .run(|line| println!("{line}"))?;
    }
    Ok(())
}

fn trace_request(args: &TraceArgs) -> TraceRequest {
    let mut csv = CsvOptions::new();
    if let Some(delimiter) = args.delimiter {
        csv = csv.with_delimiter(delimiter);
    }
    if let Some(rows) = args.infer_schema_length {
        csv = csv.with_infer_schema_length((rows > 0).then_some(rows));
    }
    let comparability = match args.comparability {
        ComparabilityArg::None => Comparability::None,
        ComparabilityArg::Implicit => Comparability::Implicit,
    };
    TraceRequest {
        input: args.input.clone(),
        name: args.name.clone(),
        out_decls: args.out_decls.clone(),
        out_dtrace: args.out_dtrace.clone(),
        csv,
        expand: !args.no_expand,
        emit: EmitOptions::new().with_comparability(comparability),
    }
}

pub fn run_tags() -> Result<()> {
    let matchers = MatcherRegistry::standard();
    let expanders = ExpanderRegistry::standard();
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Tag"),
        header_cell("Kind"),
        header_cell("Name"),
        header_cell("Description"),
    ]);
    apply_table_style(&mut table);
    for (tag, matcher) in matchers.iter() {
        table.add_row(vec![
            tag.to_string(),
            "matcher".to_string(),
            matcher.name().to_string(),
            matcher.description().to_string(),
        ]);
    }
    for (tag, expander) in expanders.iter() {
        table.add_row(vec![
            tag.to_string(),
            "expander".to_string(),
            expander.name().to_string(),
            expander.description().to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}
