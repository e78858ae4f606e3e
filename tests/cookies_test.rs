use lastcampaign::base::error::CookieError;
use lastcampaign::cookies::document::{Document, DocumentCookie};
use lastcampaign::cookies::monster::CookieMonster;
use lastcampaign::cookies::store::{CookieAttributes, CookieStore, DocumentCookieStore};
use url::Url;

#[test]
fn test_parse_and_save() {
    let jar = CookieMonster::new();
    let url = Url::parse("https://example.com/foo").unwrap();
    jar.parse_and_save_cookie(&url, "utm_source=news; Path=/").unwrap();

    let cookies = jar.get_cookies_for_url(&url);
    assert_eq!(cookies.len(), 1);
    assert_eq!(cookies[0].name, "utm_source");
    assert_eq!(cookies[0].value, "news");
    assert_eq!(cookies[0].path, "/");
    assert!(cookies[0].host_only);
}

#[test]
fn test_domain_cookie_visible_on_subdomains() {
    let jar = CookieMonster::new();
    let url = Url::parse("https://a.example.com").unwrap();

    jar.parse_and_save_cookie(&url, "host=val").unwrap();
    jar.parse_and_save_cookie(&url, "domain=val; Domain=example.com").unwrap();

    let here = jar.get_cookies_for_url(&url);
    assert!(here.iter().any(|c| c.name == "host"));
    assert!(here.iter().any(|c| c.name == "domain"));

    let sibling = jar.get_cookies_for_url(&Url::parse("https://b.example.com").unwrap());
    assert_eq!(sibling.len(), 1);
    assert_eq!(sibling[0].name, "domain");
}

#[test]
fn test_path_matching_order() {
    let jar = CookieMonster::new();
    let url = Url::parse("https://example.com/foo/bar").unwrap();

    jar.parse_and_save_cookie(&url, "root=val; Path=/").unwrap();
    jar.parse_and_save_cookie(&url, "foo=val; Path=/foo").unwrap();
    jar.parse_and_save_cookie(&url, "baz=val; Path=/baz").unwrap();

    assert_eq!(jar.cookie_header(&url), "foo=val; root=val");
}

#[test]
fn test_secure_flag() {
    let jar = CookieMonster::new();
    let https_url = Url::parse("https://example.com").unwrap();
    let http_url = Url::parse("http://example.com").unwrap();

    jar.parse_and_save_cookie(&https_url, "sec=saved; Secure").unwrap();
    assert_eq!(jar.get_cookies_for_url(&https_url).len(), 1);
    assert_eq!(jar.get_cookies_for_url(&http_url).len(), 0);

    assert!(jar.parse_and_save_cookie(&http_url, "sec2=x; Secure").is_err());
}

#[test]
fn test_document_rejects_foreign_domain() {
    let jar = CookieMonster::new();
    let page = Document::open(&jar, "https://example.com/").unwrap();
    let err = page
        .set_cookie_line("utm_source=news; Domain=example.org")
        .unwrap_err();
    assert_eq!(err, CookieError::domain_mismatch("example.org", "example.com"));
}

#[test]
fn test_store_reads_its_own_writes() {
    let jar = CookieMonster::new();
    let store = DocumentCookieStore::new(Document::open(&jar, "https://example.com/").unwrap());
    let attrs = CookieAttributes::default();

    store.set("utm_source", "a", &attrs).unwrap();
    assert_eq!(store.get("utm_source"), "a");

    store.expire("utm_source", &attrs).unwrap();
    assert_eq!(store.get("utm_source"), "");

    store.set("utm_source", "b", &attrs).unwrap();
    assert_eq!(store.get("utm_source"), "b");
}

#[test]
fn test_expire_needs_matching_scope() {
    let jar = CookieMonster::new();
    let store = DocumentCookieStore::new(Document::open(&jar, "https://example.com/promo/x").unwrap());
    let promo = CookieAttributes {
        path: "/promo".to_string(),
        ..Default::default()
    };

    store.set("utm_source", "a", &promo).unwrap();
    store.expire("utm_source", &CookieAttributes::default()).unwrap();
    assert_eq!(store.get("utm_source"), "a");

    store.expire("utm_source", &promo).unwrap();
    assert_eq!(store.get("utm_source"), "");
}
