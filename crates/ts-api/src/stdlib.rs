use ts_core::{Literal, Value};
use ts_runtime::{
    Args, Command, CommandRegistry, Continuous, ContinuousBehavior, Engine, LabelMarker, OneShot,
    StopHandle,
};

/// Value key that `Log` appends its lines to.
pub const LOG_KEY: &str = "log";

/// Registry with the commands shipped alongside the engine:
/// `Label`, `Goto`, `Gosub`, `Set`, `Log` and `Wait`.
pub fn standard_registry() -> CommandRegistry {
    CommandRegistry::new()
        .with("Label", label)
        .with("Goto", |args| jump(args, Jump::Goto))
        .with("Gosub", |args| jump(args, Jump::Gosub))
        .with("Set", set)
        .with("Log", log)
        .with("Wait", wait)
}

fn label(args: &Args<'_>) -> Result<Box<dyn Command>, ts_core::TickScriptError> {
    args.expect_len(1)?;
    Ok(Box::new(LabelMarker::new(args.string(0)?)))
}

#[derive(Debug, Clone, Copy)]
enum Jump {
    Goto,
    Gosub,
}

fn jump(args: &Args<'_>, kind: Jump) -> Result<Box<dyn Command>, ts_core::TickScriptError> {
    args.expect_len(1)?;
    let target = args.string(0)?.to_string();
    let name = match kind {
        Jump::Goto => "goto",
        Jump::Gosub => "gosub",
    };
    Ok(Box::new(OneShot::new(name, move |engine: &mut Engine| {
        let Some((script_name, index)) = engine.resolve_label(&target) else {
            tracing::warn!(label = %target, "jump target not found, ignoring");
            return;
        };
        match kind {
            Jump::Goto => engine.goto(index, Some(&script_name)),
            Jump::Gosub => engine.gosub(index, Some(&script_name)),
        }
    })))
}

fn set(args: &Args<'_>) -> Result<Box<dyn Command>, ts_core::TickScriptError> {
    args.expect_len(2)?;
    let key = args.string(0)?.to_string();
    let value = Value::from(args.literal(1)?.clone());
    Ok(Box::new(OneShot::new("set", move |engine: &mut Engine| {
        engine.set_value(key.clone(), value.clone());
    })))
}

fn log(args: &Args<'_>) -> Result<Box<dyn Command>, ts_core::TickScriptError> {
    args.expect_len(1)?;
    let line = match args.literal(0)? {
        Literal::String(text) => text.clone(),
        Literal::Number(number) => number.to_string(),
    };
    Ok(Box::new(OneShot::new("log", move |engine: &mut Engine| {
        tracing::info!(script = ?engine.active_script(), "{}", line);
        append_log(engine, &line);
    })))
}

fn append_log(engine: &mut Engine, line: &str) {
    match engine.get_value_mut(LOG_KEY) {
        Some(Value::Array(lines)) => lines.push(Value::from(line)),
        _ => engine.set_value(LOG_KEY, Value::Array(vec![Value::from(line)])),
    }
}

fn wait(args: &Args<'_>) -> Result<Box<dyn Command>, ts_core::TickScriptError> {
    args.expect_len(1)?;
    let ticks = args.number(0)?;
    let ticks = if ticks.is_finite() && ticks > 0.0 {
        ticks.ceil() as usize
    } else {
        0
    };
    Ok(Box::new(Continuous::new(
        "wait",
        WaitTicks {
            ticks,
            remaining: ticks,
        },
    )))
}

/// Finishes after a fixed number of updates.
#[derive(Debug)]
struct WaitTicks {
    ticks: usize,
    remaining: usize,
}

impl ContinuousBehavior for WaitTicks {
    fn start(&mut self, _engine: &mut Engine, stop: &StopHandle) {
        self.remaining = self.ticks;
        if self.remaining == 0 {
            stop.stop();
        }
    }

    fn update(&mut self, _engine: &mut Engine, stop: &StopHandle) {
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            stop.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ts_core::CommandFactoryTable;

    fn logged(engine: &Engine) -> Vec<String> {
        match engine.get_value(LOG_KEY) {
            Some(Value::Array(lines)) => lines
                .iter()
                .filter_map(|line| line.as_string().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }

    fn engine_with(source: &str) -> Engine {
        let registry = standard_registry();
        let commands =
            ts_parser::parse_script(&registry, source, "main.tks").expect("script should parse");
        let mut engine = Engine::new();
        engine.register(commands, None);
        engine
    }

    #[test]
    fn registry_lists_standard_commands() {
        let registry = standard_registry();
        assert_eq!(
            registry.names().collect::<Vec<_>>(),
            vec!["Gosub", "Goto", "Label", "Log", "Set", "Wait"]
        );
        assert!(!registry.contains("Print"));
    }

    #[test]
    fn set_stores_literals_as_values() {
        let mut engine = engine_with(r#"Set("name", "Ada") Set("hp", 12)"#);
        engine.run().expect("tick");
        assert_eq!(engine.get_value("name"), Some(&Value::from("Ada")));
        assert_eq!(engine.get_value("hp"), Some(&Value::Number(12.0)));
    }

    #[test]
    fn log_appends_lines_in_order() {
        let mut engine = engine_with(r#"Log("one") Log(2)"#);
        engine.run().expect("tick");
        assert_eq!(logged(&engine), vec!["one", "2"]);
    }

    #[test]
    fn wait_spans_the_requested_number_of_ticks() {
        let mut engine = engine_with(r#"Log("before") Wait(3) Log("after")"#);
        engine.run().expect("tick 1");
        assert_eq!(logged(&engine), vec!["before"]);
        engine.run().expect("tick 2");
        engine.run().expect("tick 3");
        assert_eq!(logged(&engine), vec!["before"]);
        engine.run().expect("tick 4");
        assert_eq!(logged(&engine), vec!["before", "after"]);
        assert!(engine.is_halted());
    }

    #[test]
    fn zero_wait_finishes_immediately() {
        let mut engine = engine_with(r#"Wait(0) Log("done")"#);
        engine.run().expect("tick");
        assert_eq!(logged(&engine), vec!["done"]);
    }

    #[test]
    fn goto_skips_to_label_and_missing_labels_are_ignored() {
        let mut engine = engine_with(
            r#"
Goto("nowhere")
Goto("end")
Log("skipped")
Label("end")
Log("reached")
"#,
        );
        engine.run().expect("tick");
        assert_eq!(logged(&engine), vec!["reached"]);
    }

    #[test]
    fn gosub_runs_a_labelled_block_in_another_script() {
        let registry = standard_registry();
        let mut engine = Engine::new();
        let main = ts_parser::parse_script(
            &registry,
            r#"Log("start") Gosub("lib/greet") Log("back")"#,
            "main.tks",
        )
        .expect("main parses");
        let lib = ts_parser::parse_script(
            &registry,
            r#"Log("never") Label("greet") Wait(1) Log("hello")"#,
            "lib.tks",
        )
        .expect("lib parses");
        engine.register(main, None);
        engine.register(lib, Some("lib"));

        engine.run().expect("tick 1");
        assert_eq!(logged(&engine), vec!["start"]);
        assert_eq!(engine.call_depth(), 1);

        engine.run().expect("tick 2");
        assert_eq!(logged(&engine), vec!["start", "hello"]);
        assert_eq!(engine.call_depth(), 0);

        engine.run().expect("tick 3");
        assert_eq!(logged(&engine), vec!["start", "hello", "back"]);
        assert!(engine.is_halted());
    }

    #[test]
    fn factories_validate_arguments() {
        let registry = standard_registry();
        let error = ts_parser::parse_script(&registry, "Wait(\"soon\")", "main.tks")
            .err()
            .expect("wait needs a number");
        assert_eq!(error.code, "COMMAND_ARG_TYPE");
        assert_eq!(
            error.message,
            "main.tks:1: Argument 1 of Wait must be a number, got string."
        );

        let error = ts_parser::parse_script(&registry, "Set(\"x\")", "main.tks")
            .err()
            .expect("set needs two arguments");
        assert_eq!(error.code, "COMMAND_ARG_COUNT");
    }
}
