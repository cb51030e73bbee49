use argot_core::*;
use argot_engine::{parse, parse_command, parse_with_registry, parse_with_report};

fn greet_command() -> CommandDescriptor {
    CommandDescriptor::new("greet")
        .with_option(OptionDescriptor::with_value(
            "name",
            &["-n", "--name"],
            ValueType::Str,
        ))
        .with_option(OptionDescriptor::flag("loud", &["-l", "--loud"]))
}

fn cli() -> GlobalDescriptor {
    GlobalDescriptor::new("tool")
        .with_option(OptionDescriptor::flag("debug", &["-d", "--debug"]))
        .with_command(greet_command())
}

#[test]
fn parses_global_and_command_options() {
    let bound = parse(&cli(), ["--debug", "greet", "--name", "bob", "-l"]).unwrap();

    assert_eq!(bound.command.name, "greet");
    assert!(bound.flag("debug"));
    assert!(bound.flag("loud"));
    assert_eq!(bound.single("name").and_then(Value::as_str), Some("bob"));
    // Injected metadata is available for introspection.
    assert_eq!(bound.global.as_ref().map(|g| g.name.as_str()), Some("tool"));
}

#[test]
fn parses_inline_equals_and_clusters() {
    let bound = parse(&cli(), ["greet", "--name=alice", "-dl"]).unwrap();

    assert_eq!(bound.single("name").and_then(Value::as_str), Some("alice"));
    assert!(bound.flag("debug"));
    assert!(bound.flag("loud"));
}

#[test]
fn resolves_groups_and_group_scoped_options() {
    let cli = GlobalDescriptor::new("tool").with_group(
        GroupDescriptor::new("remote")
            .with_option(OptionDescriptor::with_value(
                "team",
                &["--team"],
                ValueType::Str,
            ))
            .with_command(
                CommandDescriptor::new("add").with_option(OptionDescriptor::with_value(
                    "url",
                    &["--url"],
                    ValueType::Str,
                )),
            ),
    );

    let bound = parse(&cli, ["remote", "--team", "infra", "add", "--url", "x"]).unwrap();
    assert_eq!(bound.group.as_ref().map(|g| g.name.as_str()), Some("remote"));
    assert_eq!(bound.command.name, "add");
    assert_eq!(bound.single("team").and_then(Value::as_str), Some("infra"));
    assert_eq!(bound.single("url").and_then(Value::as_str), Some("x"));
}

#[test]
fn whitespace_group_names_denote_nested_sub_groups() {
    let cli = GlobalDescriptor::new("tool")
        .with_group(GroupDescriptor::new("remote"))
        .with_group(
            GroupDescriptor::new("remote origin")
                .with_command(CommandDescriptor::new("show").with_option(
                    OptionDescriptor::flag("verbose", &["-v"]),
                )),
        );

    let bound = parse(&cli, ["remote", "origin", "show", "-v"]).unwrap();
    assert_eq!(
        bound.group.as_ref().map(|g| g.name.as_str()),
        Some("remote origin")
    );
    assert_eq!(bound.command.name, "show");
    assert!(bound.flag("verbose"));
}

#[test]
fn group_default_command_substitutes_at_end_of_input() {
    let cli = GlobalDescriptor::new("tool").with_group(
        GroupDescriptor::new("remote")
            .with_default_command("list")
            .with_command(CommandDescriptor::new("list")),
    );

    let bound = parse(&cli, ["remote"]).unwrap();
    assert_eq!(bound.command.name, "list");
}

#[test]
fn command_abbreviation_resolves_unique_prefixes() {
    let mut cli = GlobalDescriptor::new("tool")
        .with_command(greet_command())
        .with_command(CommandDescriptor::new("fetch"));
    cli.parser.allow_command_abbreviation = true;

    let bound = parse(&cli, ["gre", "--name", "bob"]).unwrap();
    assert_eq!(bound.command.name, "greet");
}

#[test]
fn option_abbreviation_exact_match_wins() {
    let mut cli = GlobalDescriptor::new("tool").with_command(
        CommandDescriptor::new("run")
            .with_option(OptionDescriptor::flag("foo", &["--foo"]))
            .with_option(OptionDescriptor::flag("foobar", &["--foobar"])),
    );
    cli.parser.allow_option_abbreviation = true;

    let bound = parse(&cli, ["run", "--foo"]).unwrap();
    assert!(bound.flag("foo"));
    assert!(!bound.flag("foobar"));

    let bound = parse(&cli, ["run", "--foob"]).unwrap();
    assert!(bound.flag("foobar"));

    let errors = parse(&cli, ["run", "--fo"]).unwrap_err();
    assert!(matches!(
        &errors[0],
        ParseError::AbbreviationAmbiguous { candidates, .. } if candidates.len() == 2
    ));
}

#[test]
fn arity_two_and_variable_arity_capture() {
    let cli = GlobalDescriptor::new("tool").with_command(
        CommandDescriptor::new("run")
            .with_option(
                OptionDescriptor::with_value("pair", &["--pair"], ValueType::Str)
                    .with_arity(Arity::Exactly(2)),
            )
            .with_option(
                OptionDescriptor::with_value("files", &["--files"], ValueType::Str)
                    .with_arity(Arity::Variable),
            )
            .with_option(OptionDescriptor::flag("verbose", &["-v"])),
    );

    let bound = parse(&cli, ["run", "--pair", "a", "b", "--files", "x", "y", "-v"]).unwrap();
    let pair: Vec<&str> = bound
        .option_values("pair")
        .into_iter()
        .filter_map(Value::as_str)
        .collect();
    assert_eq!(pair, vec!["a", "b"]);

    let files: Vec<&str> = bound
        .option_values("files")
        .into_iter()
        .filter_map(Value::as_str)
        .collect();
    assert_eq!(files, vec!["x", "y"]);
    assert!(bound.flag("verbose"));
}

#[test]
fn delimited_pair_strategy_splits_key_value() {
    let mut cli = GlobalDescriptor::new("tool").with_command(
        CommandDescriptor::new("run").with_option(
            OptionDescriptor::with_value("define", &["-D"], ValueType::Str)
                .with_arity(Arity::Exactly(2)),
        ),
    );
    cli.parser.strategies = vec![
        StrategyKind::DelimitedPair('='),
        StrategyKind::Standard,
        StrategyKind::ShortCluster,
    ];

    let bound = parse(&cli, ["run", "-D", "key=val"]).unwrap();
    let values: Vec<&str> = bound
        .option_values("define")
        .into_iter()
        .filter_map(Value::as_str)
        .collect();
    assert_eq!(values, vec!["key", "val"]);
}

#[test]
fn negation_prefix_turns_flags_off() {
    let mut cli = GlobalDescriptor::new("tool").with_command(
        CommandDescriptor::new("run").with_option(OptionDescriptor::flag("cache", &["--cache"])),
    );
    cli.parser.negation_prefix = Some("no-".to_string());

    let bound = parse(&cli, ["run", "--cache", "--no-cache"]).unwrap();
    // Last occurrence wins.
    assert!(!bound.flag("cache"));
    assert_eq!(bound.occurrences_of("cache"), 2);
}

#[test]
fn separator_forces_remaining_tokens_positional() {
    let cli = GlobalDescriptor::new("tool").with_command(
        CommandDescriptor::new("exec")
            .with_option(OptionDescriptor::flag("verbose", &["-v"]))
            .with_arguments(ArgumentsDescriptor::new(&["command"])),
    );

    let bound = parse(&cli, ["exec", "-v", "--", "-v", "--whatever"]).unwrap();
    assert!(bound.flag("verbose"));
    assert_eq!(bound.argument_strings(), vec!["-v", "--whatever"]);
    assert_eq!(bound.occurrences_of("verbose"), 1);
}

#[test]
fn hidden_commands_match_exactly_but_not_by_prefix() {
    let mut cli = GlobalDescriptor::new("tool")
        .with_command(CommandDescriptor::new("internal-sync").hide())
        .with_command(CommandDescriptor::new("install"));
    cli.parser.allow_command_abbreviation = true;

    let bound = parse(&cli, ["internal-sync"]).unwrap();
    assert_eq!(bound.command.name, "internal-sync");

    // "in" abbreviates only the visible command.
    let bound = parse(&cli, ["in"]).unwrap();
    assert_eq!(bound.command.name, "install");
}

#[test]
fn scaled_numeric_syntax_applies_suffixes() {
    let mut cli = GlobalDescriptor::new("tool").with_command(
        CommandDescriptor::new("alloc").with_option(OptionDescriptor::with_value(
            "size",
            &["--size"],
            ValueType::Int(IntWidth::I64),
        )),
    );
    cli.parser.numeric_syntax = NumericSyntax::Scaled { base: 1024 };

    let bound = parse(&cli, ["alloc", "--size", "4k"]).unwrap();
    assert_eq!(bound.single("size").and_then(Value::as_i64), Some(4096));
}

#[test]
fn custom_types_convert_through_the_registry() {
    let registry = ConverterRegistry::new();
    registry.register("endpoint", |raw| {
        if raw.contains(':') {
            Ok(Value::Custom {
                type_name: "endpoint".to_string(),
                repr: raw.to_string(),
            })
        } else {
            Err("missing port".to_string())
        }
    });

    let cli = GlobalDescriptor::new("tool").with_command(
        CommandDescriptor::new("connect").with_option(OptionDescriptor::with_value(
            "addr",
            &["--addr"],
            ValueType::Custom("endpoint".to_string()),
        )),
    );

    let bound = parse_with_registry(&cli, Some(&registry), ["connect", "--addr", "db:5432"]).unwrap();
    assert_eq!(
        bound.single("addr"),
        Some(&Value::Custom {
            type_name: "endpoint".to_string(),
            repr: "db:5432".to_string(),
        })
    );

    let errors =
        parse_with_registry(&cli, Some(&registry), ["connect", "--addr", "nope"]).unwrap_err();
    assert!(matches!(&errors[0], ParseError::ConversionFailure { .. }));
}

#[test]
fn single_command_surface_parses_without_global_resolution() {
    let bound = parse_command(&greet_command(), ["--name", "bob"]).unwrap();
    assert_eq!(bound.command.name, "greet");
    assert_eq!(bound.single("name").and_then(Value::as_str), Some("bob"));
    assert!(bound.global.is_none());
}

#[test]
fn inherited_options_parse_through_any_name_in_the_set() {
    let base = vec![OptionDescriptor::with_value(
        "level",
        &["-L", "--level"],
        ValueType::Int(IntWidth::I64),
    )];
    let command = CommandDescriptor::new("log")
        .with_base_level(base)
        .with_option(
            OptionDescriptor::with_value("level", &["-L", "--level"], ValueType::Int(IntWidth::I16))
                .overriding(),
        );

    // The merged (narrowed) descriptor answers to both names.
    let bound = parse_command(&command, ["-L", "3"]).unwrap();
    assert_eq!(bound.single("level").and_then(Value::as_i64), Some(3));

    // The narrowed width is enforced.
    let errors = parse_command(&command, ["--level", "40000"]).unwrap_err();
    assert!(matches!(&errors[0], ParseError::ConversionFailure { .. }));
}

#[test]
fn report_carries_expansion_and_strategy_diagnostics() {
    let mut cli = cli();
    cli.parser.aliases = vec![AliasDescriptor::new("g", &["greet", "--name", "$1"])];

    let run = parse_with_report(&cli, ["g", "bob"]);
    let bound = run.result.unwrap();
    assert_eq!(bound.single("name").and_then(Value::as_str), Some("bob"));

    assert_eq!(run.report.cli, "tool");
    assert_eq!(run.report.command.as_deref(), Some("greet"));
    assert_eq!(
        run.report.expanded_tokens,
        vec!["greet", "--name", "bob"]
    );
    assert!(run.report.strategies.contains(&"standard".to_string()));
    assert!(run.report.errors.is_empty());

    // Reports serialize for external tooling.
    let json = serde_json::to_string(&run.report).unwrap();
    assert!(json.contains("\"cli\":\"tool\""));
}
