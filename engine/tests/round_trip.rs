use argot_core::*;
use argot_engine::parse;

/// Renders a bound command back into an invocation token stream using each
/// option's canonical name.
fn render_tokens(bound: &BoundCommand) -> Vec<String> {
    let mut tokens = vec![bound.command.name.clone()];

    for occurrence in &bound.parsed {
        let Some(descriptor) = bound.find_scope_option(&occurrence.title) else {
            continue;
        };
        tokens.push(descriptor.canonical_name().to_string());
        for value in &occurrence.values {
            if descriptor.arity != Arity::Nullary {
                tokens.push(value.to_string());
            }
        }
    }

    if !bound.arguments.is_empty() {
        tokens.push("--".to_string());
        tokens.extend(bound.arguments.iter().map(Value::to_string));
    }

    tokens
}

#[test]
fn rendered_invocations_reparse_to_identical_bound_values() {
    let cli = GlobalDescriptor::new("tool").with_command(
        CommandDescriptor::new("build")
            .with_option(OptionDescriptor::flag("release", &["-r", "--release"]))
            .with_option(OptionDescriptor::with_value(
                "jobs",
                &["-j", "--jobs"],
                ValueType::Int(IntWidth::I32),
            ))
            .with_option(
                OptionDescriptor::with_value("feature", &["--feature"], ValueType::Str)
                    .with_arity(Arity::Variable),
            )
            .with_arguments(ArgumentsDescriptor::new(&["targets"])),
    );

    let invocations: Vec<Vec<&str>> = vec![
        vec!["build"],
        vec!["build", "--release"],
        vec!["build", "--jobs", "4", "--release"],
        vec!["build", "--feature", "a", "b", "--jobs", "2"],
        vec!["build", "--release", "--", "lib", "bins"],
    ];

    for tokens in invocations {
        let first = parse(&cli, tokens.clone()).unwrap();
        let rendered = render_tokens(&first);
        let second = parse(&cli, rendered.clone()).unwrap();

        assert_eq!(first.parsed, second.parsed, "invocation {tokens:?} via {rendered:?}");
        assert_eq!(first.arguments, second.arguments, "invocation {tokens:?}");
        assert_eq!(first.command.name, second.command.name);
    }
}

#[test]
fn enum_and_bool_values_round_trip() {
    let cli = GlobalDescriptor::new("tool").with_command(
        CommandDescriptor::new("emit")
            .with_option(OptionDescriptor::with_value(
                "format",
                &["--format"],
                ValueType::Enum(vec!["json".into(), "yaml".into()]),
            ))
            .with_option(OptionDescriptor::with_value(
                "strict",
                &["--strict"],
                ValueType::Bool,
            )),
    );

    let first = parse(&cli, ["emit", "--format", "json", "--strict", "true"]).unwrap();
    let second = parse(&cli, render_tokens(&first)).unwrap();

    assert_eq!(first.parsed, second.parsed);
    assert_eq!(
        second.single("format"),
        Some(&Value::Enum("json".to_string()))
    );
    assert_eq!(second.single("strict"), Some(&Value::Bool(true)));
}
