use crate::request::RequestSpec;

#[test]
fn test_params_exact_set() {
    let spec = RequestSpec::new("user")
        .with_selections(["a", "b"])
        .with_limit(5);

    let params = spec.params("SECRET", None);

    assert_eq!(params, vec![
        (String::from("selections"), String::from("a,b")),
        (String::from("key"), String::from("SECRET")),
        (String::from("limit"), String::from("5"))
    ]);
}

#[test]
fn test_absent_modifiers_are_omitted() {
    let spec = RequestSpec::new("key");

    assert_eq!(spec.params("SECRET", None), vec![
        (String::from("key"), String::from("SECRET"))
    ]);
}

#[test]
fn test_id_appended_to_path() {
    assert_eq!(RequestSpec::new("user").path(), "/user");
    assert_eq!(RequestSpec::new("user").with_id(1).path(), "/user/1");
    assert_eq!(RequestSpec::new("faction").maybe_id(None).path(), "/faction");
    assert_eq!(RequestSpec::new("faction").maybe_id(Some(33)).path(), "/faction/33");
}

#[test]
fn test_all_modifiers() {
    let spec = RequestSpec::new("user")
        .with_id(1)
        .with_selections(["log"])
        .with_limit(10)
        .with_sort("ASC")
        .with_stat("strength")
        .with_cat(2)
        .with_log(4810)
        .with_from(1700000000)
        .with_to(1700086400)
        .with_timestamp(1700000000);

    let params = spec.params("SECRET", Some("my-app"));

    assert_eq!(params, vec![
        (String::from("selections"), String::from("log")),
        (String::from("key"), String::from("SECRET")),
        (String::from("limit"), String::from("10")),
        (String::from("sort"), String::from("ASC")),
        (String::from("stat"), String::from("strength")),
        (String::from("cat"), String::from("2")),
        (String::from("log"), String::from("4810")),
        (String::from("from"), String::from("1700000000")),
        (String::from("to"), String::from("1700086400")),
        (String::from("timestamp"), String::from("1700000000")),
        (String::from("comment"), String::from("my-app"))
    ]);
}

#[test]
fn test_cache_key_excludes_api_key() {
    let spec = RequestSpec::new("market")
        .with_id(206)
        .with_selections(["bazaar"]);

    let key = spec.cache_key();

    assert_eq!(key, "/market/206?selections=bazaar");
    assert!(!key.contains("SECRET"));
}
