use std::collections::BTreeMap;

use ts_api::LOG_KEY;
use ts_core::{TickScriptError, Value};
use ts_runtime::Engine;

use crate::{json_string, map_cli_values_json};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TickReport {
    pub(crate) ticks: usize,
    pub(crate) halted: bool,
    pub(crate) log: Vec<String>,
    pub(crate) values: BTreeMap<String, Value>,
}

/// Ticks `engine` until it halts or `max_ticks` ticks have run.
pub(crate) fn run_ticks(
    engine: &mut Engine,
    max_ticks: usize,
) -> Result<TickReport, TickScriptError> {
    let mut ticks = 0;
    while ticks < max_ticks && !engine.is_halted() {
        engine.run()?;
        ticks += 1;
    }

    let mut values = engine.values().clone();
    let log = match values.remove(LOG_KEY) {
        Some(Value::Array(lines)) => lines
            .into_iter()
            .map(|line| match line {
                Value::String(text) => text,
                other => other.type_name().to_string(),
            })
            .collect(),
        Some(other) => {
            values.insert(LOG_KEY.to_string(), other);
            Vec::new()
        }
        None => Vec::new(),
    };

    Ok(TickReport {
        ticks,
        halted: engine.is_halted(),
        log,
        values,
    })
}

pub(crate) fn emit_report(report: &TickReport) -> Result<(), TickScriptError> {
    let values = serde_json::to_string(&report.values).map_err(map_cli_values_json)?;
    println!("RESULT:OK");
    println!("TICKS:{}", report.ticks);
    println!("HALTED:{}", report.halted);
    for line in &report.log {
        println!("LOG_JSON:{}", json_string(line));
    }
    println!("VALUES_JSON:{}", values);
    Ok(())
}
