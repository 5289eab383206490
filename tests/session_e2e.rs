use kinql::{
    Fact, FactStore, Gender, KinEngine, Person, SeedError, Session, SessionConfig, Snapshot,
};

fn p(name: &str) -> Person {
    Person::parse(name).unwrap()
}

fn run(engine: KinEngine, input: &str) -> String {
    let session = Session::new(engine, SessionConfig::quiet()).unwrap();
    let mut out = Vec::new();
    session.run(input.as_bytes(), &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn transcript_answers_one_line_per_input() {
    let input = "\
John is the father of Mary.
Is John the father of Mary?
Mary is the father of John.

Who is the father of Mary?
What now?
hello there
exit
Is John the father of Mary?
";
    let expected = "\
OK! I learned something.
Yes!
That's impossible!
The father of Mary is John.
Invalid question. Please follow the sentence patterns.
Invalid statement. Please follow the sentence patterns.
Byebye:<
";
    assert_eq!(run(KinEngine::in_memory(), input), expected);
}

#[test]
fn session_prints_banner_and_prompts() {
    let session = Session::new(KinEngine::in_memory(), SessionConfig::default()).unwrap();
    let mut out = Vec::new();
    session
        .run("Ann and Bob are siblings.\nquit\n".as_bytes(), &mut out)
        .unwrap();
    let out = String::from_utf8(out).unwrap();

    assert!(out.contains("|Hello there! This is the Family Relationship Chatbot|"));
    assert!(out.contains("just enter 'quit' or 'exit'"));
    assert!(out.ends_with("> OK! I learned something.\n> Byebye:<\n"));
}

#[test]
fn seed_file_feeds_the_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("family.json");
    std::fs::write(
        &path,
        r#"{
  "version": 1,
  "facts": [
    {"kind": "gender", "person": "Tom", "gender": "male"},
    {"kind": "parent", "parent": "Tom", "child": "Ann"},
    {"kind": "parent", "parent": "Ann", "child": "Cy"}
  ]
}"#,
    )
    .unwrap();

    let engine = KinEngine::in_memory();
    assert_eq!(engine.seed(&Snapshot::load(&path).unwrap()).unwrap(), 3);

    let out = run(
        engine,
        "Is Tom a grandfather of Cy?\nWho is the father of Ann?\nCy is the father of Tom.\n",
    );
    assert_eq!(out, "Yes!\nThe father of Ann is Tom.\nThat's impossible!\n");
}

#[test]
fn snapshot_round_trips_through_a_new_engine() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("saved.json");

    let engine = KinEngine::in_memory();
    run(
        engine.clone(),
        "Liz is an aunt of Ann.\nAnn and Bob are siblings.\nEve is a grandmother of Bob.\n",
    );
    engine.snapshot().unwrap().save(&path).unwrap();

    let restored = KinEngine::in_memory();
    restored.seed(&Snapshot::load(&path).unwrap()).unwrap();
    assert_eq!(
        restored.store().len().unwrap(),
        engine.store().len().unwrap()
    );
    assert!(restored.store().is_sibling(&p("bob"), &p("ann")).unwrap());
    assert!(restored.store().has_gender(&p("liz"), Gender::Female).unwrap());
    assert_eq!(
        run(restored, "Who are the grandmothers of Bob?\n"),
        "The grandmothers of Bob are: Eve.\n"
    );
}

#[test]
fn conflicting_seed_is_refused() {
    let engine = KinEngine::in_memory();
    let snapshot = Snapshot::new(vec![
        Fact::gender(&p("tom"), Gender::Male),
        Fact::gender(&p("tom"), Gender::Female),
    ]);
    let err = engine.seed(&snapshot).unwrap_err();
    assert!(matches!(err, SeedError::Conflict { .. }));
    assert!(engine.store().has_gender(&p("tom"), Gender::Male).unwrap());
}

#[test]
fn unicode_names_survive_save_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("unicode.json");

    let engine = KinEngine::in_memory();
    let out = run(
        engine.clone(),
        "ßen is the father of Mary.\nÉLODIE is the mother of Mary.\nİsa is the father of Mary.\n",
    );
    assert_eq!(
        out,
        "OK! I learned something.\n\
         OK! I learned something.\n\
         Invalid statement. Please follow the sentence patterns.\n"
    );

    let snapshot = engine.snapshot().unwrap();
    snapshot.save(&path).unwrap();
    let reloaded = Snapshot::load(&path).unwrap();
    assert_eq!(reloaded, snapshot);

    let restored = KinEngine::in_memory();
    restored.seed(&reloaded).unwrap();
    assert_eq!(
        run(restored, "Who are the parents of Mary?\nIs ßen the father of Mary?\n"),
        "The parents of Mary are: Élodie, ßen.\nYes!\n"
    );
}
