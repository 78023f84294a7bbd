use reqwest::header::{HeaderMap, HeaderValue, SET_COOKIE};
use td365::http::cookies::CookieJar;

fn headers(values: &[&str]) -> HeaderMap {
    let mut map = HeaderMap::new();
    for value in values {
        map.append(SET_COOKIE, HeaderValue::from_str(value).unwrap());
    }
    map
}

fn jar_in(dir: &tempfile::TempDir) -> CookieJar {
    CookieJar::load(dir.path().join("test.cookies"))
}

#[test]
fn max_age_cookie_is_emitted_until_it_expires() {
    let dir = tempfile::tempdir().unwrap();
    let mut jar = jar_in(&dir);

    jar.update(&headers(&["sid=abc123; Max-Age=3600; Path=/"]));
    assert_eq!(jar.cookie_header().as_deref(), Some("sid=abc123"));

    jar.update(&headers(&["sid=abc123; Max-Age=0"]));
    assert_eq!(jar.cookie_header(), None);
}

#[test]
fn one_combined_cookie_header() {
    let dir = tempfile::tempdir().unwrap();
    let mut jar = jar_in(&dir);
    jar.update(&headers(&["a=1", "b=2; Max-Age=60"]));
    assert_eq!(jar.cookie_header().as_deref(), Some("a=1; b=2"));
}

#[test]
fn same_name_keeps_only_the_latest_value() {
    let dir = tempfile::tempdir().unwrap();
    let mut jar = jar_in(&dir);
    jar.update(&headers(&["sid=first"]));
    jar.update(&headers(&["sid=second; Max-Age=60"]));
    assert_eq!(jar.cookie_header().as_deref(), Some("sid=second"));
    assert_eq!(jar.get("sid").value, "second");
}

#[test]
fn expires_attribute_sets_a_deadline() {
    let dir = tempfile::tempdir().unwrap();
    let mut jar = jar_in(&dir);
    jar.update(&headers(&["sid=x; Expires=Wed, 21-Oct-2099 07:28:00 GMT"]));
    assert!(jar.get("sid").expiry.is_some());

    jar.update(&headers(&["old=y; Expires=Wed, 21 Oct 2015 07:28:00 GMT"]));
    let header = jar.cookie_header().unwrap();
    assert!(header.contains("sid=x"));
    assert!(!header.contains("old=y"));
}

#[test]
fn persists_and_reloads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("host.cookies");

    let mut jar = CookieJar::load(&path);
    jar.update(&headers(&["session=tok", "durable=v; Max-Age=86400"]));
    jar.save().unwrap();

    let mut reloaded = CookieJar::load(&path);
    assert_eq!(reloaded.get("session").value, "tok");
    assert_eq!(reloaded.get("session").expiry, None);
    assert_eq!(reloaded.get("durable").value, "v");
    assert!(reloaded.get("durable").expiry.is_some());
    assert_eq!(reloaded.cookie_header().as_deref(), Some("durable=v; session=tok"));
}

#[test]
fn missing_cookie_is_an_empty_sentinel() {
    let dir = tempfile::tempdir().unwrap();
    let jar = jar_in(&dir);
    let sentinel = jar.get("nope");
    assert!(sentinel.name.is_empty());
    assert!(sentinel.value.is_empty());
}
