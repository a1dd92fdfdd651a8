//! Lookups in an XML document whose namespace prefixes are never declared.

use rs_dom_chain::{Dom, Node, TextOptions};

const MISSING_SCHEMA: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ObsCollection xmlns:om="http://www.opengis.net/om/2.0">
    <Bulletin gml:id="YES">
        <locRef xlink:href="THIS-and-that"/>
        <locRef xlink:href="12:30"/>
    </Bulletin>
    <Data>
        <JustForOurTest attr1="hello">Im Here</JustForOurTest>
        <JustForOurTest attr1="bye">Im Away</JustForOurTest>
    </Data>
    <specialStuff what="letters">öüóőúéáű ÖÜÓŐÚÉÁŰ äÄß</specialStuff>
    <specialStuff what="chars">AND &amp; QUOTE " APOST ' LESS &lt; MORE &gt; UMLAUT &#228;</specialStuff>
</ObsCollection>
"#;

fn dom() -> Dom {
    match Dom::new(MISSING_SCHEMA) {
        Ok(dom) => dom,
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    }
}

fn first<'a>(dom: &'a Dom, selector: &str) -> Node<'a> {
    match dom.elem([(selector, Some(0))], None) {
        Ok(res) => match res.value {
            Some(node) => node,
            None => panic!("{selector}: nothing found, failed step {:?}", res.failed),
        },
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    }
}

fn text(node: &Node) -> String {
    node.text(&TextOptions::default())
}

#[test]
fn loads_without_schema() {
    let dom = dom();
    assert!(dom.is_xml());
    assert_eq!(dom.xml_encoding(), Some("UTF-8"));
    assert!(!dom.source(false).starts_with("<?xml"));
}

#[test]
fn tag_lookup_ignores_case() {
    let dom = dom();
    let lower = first(&dom, "obscollection");
    let mixed = first(&dom, "ObsCollection");
    assert_eq!(lower.outer_markup(), mixed.outer_markup());
}

#[test]
fn tag_with_attribute() {
    let dom = dom();
    let el = first(&dom, "JustForOurTest[attr1]");
    assert_eq!(text(&el), "Im Here");
    assert_eq!(el.attr("attr1"), "hello");
}

#[test]
fn attribute_name_wildcards() {
    let dom = dom();
    for selector in ["JustForOurTest[attr*]", "justforourtest[*attr1]", "JustForOurTest[at*r1]"] {
        let el = first(&dom, selector);
        assert_eq!(text(&el), "Im Here", "{selector}");
        assert_eq!(el.attr("attr1"), "hello", "{selector}");
    }
}

#[test]
fn attribute_value_with_and_without_wildcards() {
    let dom = dom();
    for selector in [
        "JustForOurTest[attr1=bye]",
        "JustForOurTest[attr*=bye]",
        "JustForOurTest[*ttr1=bye]",
        "JustForOurTest[a*r1=bye]",
    ] {
        let el = first(&dom, selector);
        assert_eq!(text(&el), "Im Away", "{selector}");
        assert_eq!(el.attr("attr1"), "bye", "{selector}");
    }
}

#[test]
fn namespaced_attribute() {
    let dom = dom();
    let el = first(&dom, "Bulletin[gml:id]");
    assert_eq!(el.attr("gml:id"), "YES");

    let el = first(&dom, "Bulletin[gml:id=YES]");
    assert_eq!(el.attr("gml:id"), "YES");
}

#[test]
fn namespaced_attribute_values_with_punctuation() {
    let dom = dom();
    let el = first(&dom, "locRef[xlink:href=THIS-and-that]");
    assert_eq!(el.attr("xlink:href"), "THIS-and-that");

    let el = first(&dom, "locRef[xlink:href=12:30]");
    assert_eq!(el.attr("xlink:href"), "12:30");
}

#[test]
fn namespaced_wildcard_is_an_error() {
    let dom = dom();
    assert!(dom.elem([("Bulletin[gml:*]", Some(0))], None).is_err());
}

#[test]
fn accented_letters_survive() {
    let dom = dom();
    let el = first(&dom, "specialStuff[what=letters]");
    assert_eq!(text(&el), "öüóőúéáű ÖÜÓŐÚÉÁŰ äÄß");
}

#[test]
fn escaped_characters_are_decoded() {
    let dom = dom();
    let el = first(&dom, "specialStuff[what=chars]");
    assert_eq!(text(&el), "AND & QUOTE \" APOST ' LESS < MORE > UMLAUT ä");
}

#[test]
fn latin1_declaration_is_honored_for_bytes() {
    let xml = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><root><name>Jos\xE9</name></root>";
    let dom = match Dom::from_bytes(xml) {
        Ok(dom) => dom,
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    };
    assert_eq!(dom.xml_encoding(), Some("ISO-8859-1"));
    assert_eq!(text(&first(&dom, "name")), "José");
}
