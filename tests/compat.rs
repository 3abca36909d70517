//! Check that argz agrees with clap on the common subset of syntax.
use argz::{Argz, OptionSpec, ParseResult};
use clap::{Arg, ArgAction, Command};

#[derive(Debug, Default, PartialEq)]
struct Outcome {
    force: bool,
    input: Option<String>,
    output: Option<String>,
}

fn clap_parse(args: &[&str], hyphen_values: bool) -> Option<Outcome> {
    let cmd = Command::new("me")
        .disable_help_flag(true)
        .arg(Arg::new("force").short('f').action(ArgAction::SetTrue))
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .action(ArgAction::Set)
                .allow_hyphen_values(hyphen_values),
        )
        .arg(Arg::new("output").short('o').action(ArgAction::Set));
    let m = cmd.try_get_matches_from(std::iter::once("me").chain(args.iter().copied())).ok()?;
    Some(Outcome {
        force: m.get_flag("force"),
        input: m.get_one::<String>("input").cloned(),
        output: m.get_one::<String>("output").cloned(),
    })
}

fn argz_parse(args: &[&str], hyphen_values: bool) -> Option<Outcome> {
    let mut argz = Argz::new("me", args.iter().copied());
    argz.add_flag('f', "")
        .and_then(|a| {
            a.register(
                OptionSpec::value('i').long("input").reject_hyphen_values(!hyphen_values),
            )
        })
        .and_then(|a| a.register(OptionSpec::value('o').reject_hyphen_values(true)))
        .unwrap();

    let mut out = Outcome::default();
    while let Some(arg) = argz.advance().ok()? {
        match arg {
            ParseResult::Flag('f') => out.force = true,
            ParseResult::Value('i', v) => out.input = Some(v.into_string().ok()?),
            ParseResult::Value('o', v) => out.output = Some(v.into_string().ok()?),
            arg => panic!("unexpected {arg:?}"),
        }
    }
    Some(out)
}

#[track_caller]
fn assert_agree(cases: &[&[&str]], hyphen_values: bool) {
    for args in cases {
        assert_eq!(
            argz_parse(args, hyphen_values),
            clap_parse(args, hyphen_values),
            "mismatch on {args:?}"
        );
    }
}

#[test]
fn agrees_with_clap() {
    // clap refuses hyphen values by default, so argz opts in to the same.
    assert_agree(
        &[
            &[],
            &["-f"],
            &["-i", "in.txt"],
            &["-iin.txt"],
            &["-i=in.txt"],
            &["--input", "in.txt"],
            &["--input=in.txt"],
            &["-fi", "x"],
            &["-fix"],
            &["-fo=x", "-i", "-"],
            &["-o", "out", "-f", "--input", "in"],
            // Failures.
            &["-i"],
            &["--input"],
            &["-i", "-f"],
            &["-x"],
            &["-fx"],
            &["--force"],
            &["--inp", "x"],
            &["--input", "--input"],
            &["in.txt"],
        ],
        false,
    );
}

#[test]
fn agrees_with_clap_on_hyphen_values() {
    assert_agree(
        &[
            &["-i", "-f"],
            &["-i", "-5", "-f"],
            &["--input", "--input"],
            &["-f", "--input", "-o"],
            &["-i"],
        ],
        true,
    );
}
