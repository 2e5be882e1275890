use super::*;

fn session(input: &str) -> String {
    let mut config = Config::default();
    config.set_prompt(false);
    let mut repl = Repl::new(config);

    let mut output: Vec<u8> = vec![];
    repl.run(input.as_bytes(), &mut output).unwrap();
    String::from_utf8(output).unwrap()
}

#[test]
fn test_session_simple() {
    let input = "set a 1 2 3\nlen a\nsum a\nmin a\nmax a\n";
    assert_eq!(session(input), "ok\n\n3\n\n6\n\n1\n\n3\n\n");
}

#[test]
fn test_session_general() {
    let input = "set a 1 2 3\n\
                 set b 10 a 20\n\
                 len b\n\
                 sum b\n\
                 forward b\n\
                 backward a\n\
                 type b\n\
                 del a\n\
                 get b\n";
    let expect = "ok\n\nok\n\n5\n\n36\n\na\n\nb\n\ngeneral\n\nnot permitted\n\n[10 a 20]\n\n";
    assert_eq!(session(input), expect);
}

#[test]
fn test_session_chain() {
    let input = "set a 1\n\
                 set b a\n\
                 set c b\n\
                 forward c\n\
                 backward a\n\
                 del b\n\
                 del c\n\
                 del b\n\
                 del a\n";
    let expect = "ok\n\nok\n\nok\n\na, b\n\nb, c\n\nnot permitted\n\nok\n\nok\n\nok\n\n";
    assert_eq!(session(input), expect);
}

#[test]
fn test_session_snapshot() {
    let input = "set a 1 2\n\
                 snapshot\n\
                 append a 3\n\
                 list snapshots\n\
                 checkout 1\n\
                 get a\n";
    let expect = "ok\n\nsaved as snapshot 1\n\nok\n\n1\n\nok\n\n[1 2]\n\n";
    assert_eq!(session(input), expect);
}

#[test]
fn test_session_duplicate_refs() {
    let input = "set a 5\n\
                 set b a a\n\
                 len b\n\
                 sum b\n\
                 pop b\n\
                 backward a\n\
                 pop b\n\
                 backward a\n";
    let expect = "ok\n\nok\n\n2\n\n10\n\na\n\nb\n\na\n\nnil\n\n";
    assert_eq!(session(input), expect);
}

#[test]
fn test_session_sort() {
    let input = "set a 1\n\
                 push a 2 3\n\
                 get a\n\
                 sort a\n\
                 get a\n\
                 rev a\n\
                 get a\n\
                 uniq a\n\
                 get a\n";
    let expect =
        "ok\n\nok\n\n[3 2 1]\n\nok\n\n[1 2 3]\n\nok\n\n[3 2 1]\n\nok\n\n[3 2 1]\n\n";
    assert_eq!(session(input), expect);
}

#[test]
fn test_session_empty_listings() {
    let input = "list keys\nlist entries\nlist snapshots\nforward\nget\n";
    let expect = "no keys\n\nno entries\n\nno snapshots\n\nno such key\n\nno such key\n\n";
    assert_eq!(session(input), expect);

    let input = "set a 1\nset b a 2\nlist keys\nlist entries\n";
    let expect = "ok\n\nok\n\na\nb\n\na [1]\nb [a 2]\n\n";
    assert_eq!(session(input), expect);
}

#[test]
fn test_session_unknown() {
    let input = "frobnicate\n\nlist\nlist wat\nget zzz\npick a 1\ndrop x\n";
    let expect = "no such command\n\nno such command\n\ninvalid list command\n\n\
                  invalid list command\n\nno such key\n\nno such key\n\n\
                  index out of range\n\n";
    assert_eq!(session(input), expect);
}

#[test]
fn test_session_bye() {
    // bye replies without a trailing blank line and stops the loop.
    let input = "set a 1\nbye\nget a\n";
    assert_eq!(session(input), "ok\n\nbye\n");
}

#[test]
fn test_session_eof() {
    assert_eq!(session(""), "");
    assert_eq!(session("set a 1\n"), "ok\n\n");
}

#[test]
fn test_prompt() {
    let mut repl = Repl::new(Config::default());
    let mut output: Vec<u8> = vec![];
    repl.run("bye\n".as_bytes(), &mut output).unwrap();
    assert_eq!(String::from_utf8(output).unwrap(), "> bye\n");

    let mut repl = Repl::new(Config::default());
    let mut output: Vec<u8> = vec![];
    repl.run("".as_bytes(), &mut output).unwrap();
    assert_eq!(String::from_utf8(output).unwrap(), "> ");

    let mut repl = Repl::new(Config::default());
    let mut output: Vec<u8> = vec![];
    repl.run("get a\n".as_bytes(), &mut output).unwrap();
    assert_eq!(String::from_utf8(output).unwrap(), "> no such key\n\n> ");
}

#[test]
fn test_help() {
    let expect = format!("{}\n", HELP_TEXT.as_str());
    assert_eq!(session("help\n"), expect);
    assert_eq!(session("HELP\n"), expect);
    assert!(HELP_TEXT.contains("BYE"));
    assert!(HELP_TEXT.contains("SNAPSHOT"));
}

#[test]
fn test_session_state_survives_errors() {
    let mut config = Config::default();
    config.set_prompt(false);
    let mut repl = Repl::new(config);

    let input = "set a 1\nset a 2 zzz\nget a\nset b 5\ndel a\nget a\n";
    let mut output: Vec<u8> = vec![];
    repl.run(input.as_bytes(), &mut output).unwrap();
    let expect = "ok\n\nno such key\n\n[1]\n\nok\n\nok\n\nno such key\n\n";
    assert_eq!(String::from_utf8(output).unwrap(), expect);

    repl.as_db().as_state().validate().unwrap();
}
