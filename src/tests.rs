use crate::Error;
use crate::html::parse_html;
use crate::selector::{parse_selector, select_all, select_one};
use crate::widgets::parse_initial_values;

#[test]
fn initial_values_split_on_ideographic_comma() {
    assert_eq!(
        parse_initial_values("定休日1、定休日2"),
        vec!["定休日1", "定休日2"]
    );
}

#[test]
fn initial_values_split_on_half_width_comma() {
    assert_eq!(
        parse_initial_values("定休日1,定休日2"),
        vec!["定休日1", "定休日2"]
    );
}

#[test]
fn initial_values_fold_full_width_comma_via_nfkc() {
    // U+FF0C FULLWIDTH COMMA folds to ',' under NFKC.
    assert_eq!(
        parse_initial_values("定休日1，定休日2"),
        vec!["定休日1", "定休日2"]
    );
}

#[test]
fn initial_values_keep_compatibility_characters_in_tokens() {
    // U+FF11 FULLWIDTH DIGIT ONE is compatibility-decomposable but is not
    // a separator; the token must survive untouched so it can match an
    // option value spelled the same way.
    assert_eq!(
        parse_initial_values("定休日１、定休日2"),
        vec!["定休日１", "定休日2"]
    );
}

#[test]
fn initial_values_tolerate_stray_delimiters_and_whitespace() {
    assert_eq!(
        parse_initial_values("、 定休日1 、、 　、定休日2、"),
        vec!["定休日1", "定休日2"]
    );
    assert_eq!(parse_initial_values(""), Vec::<String>::new());
    assert_eq!(parse_initial_values(" 、,、 "), Vec::<String>::new());
}

#[test]
fn selector_parses_compound_steps() {
    let steps = parse_selector(".bottom-nav li.active img").expect("selector should parse");
    assert_eq!(steps.len(), 3);
    assert_eq!(steps[0].classes, vec!["bottom-nav"]);
    assert_eq!(steps[1].tag.as_deref(), Some("li"));
    assert_eq!(steps[1].classes, vec!["active"]);
    assert_eq!(steps[2].tag.as_deref(), Some("img"));
}

#[test]
fn selector_rejects_unsupported_combinators() {
    for selector in ["div > span", "a + b", "a ~ b", "a, b", ""] {
        match parse_selector(selector) {
            Err(Error::UnsupportedSelector(_)) => {}
            other => panic!("expected UnsupportedSelector for {selector:?}, got {other:?}"),
        }
    }
}

#[test]
fn selector_matches_attr_conditions() {
    let dom = parse_html(
        r#"
        <input type="text" name="a">
        <input type="hidden" name="b">
        <input type="text" name="c">
        "#,
    )
    .expect("html should parse");

    let text_inputs = select_all(&dom, "input[type=text]").expect("selector should parse");
    assert_eq!(text_inputs.len(), 2);
    let named = select_all(&dom, r#"input[name="b"]"#).expect("selector should parse");
    assert_eq!(named.len(), 1);
    let any_name = select_all(&dom, "input[name]").expect("selector should parse");
    assert_eq!(any_name.len(), 3);
}

#[test]
fn select_one_reports_missing_selector() {
    let dom = parse_html("<div id=\"only\"></div>").expect("html should parse");
    match select_one(&dom, "#nope") {
        Err(Error::SelectorNotFound(selector)) => assert_eq!(selector, "#nope"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn select_all_returns_document_order() {
    let dom = parse_html(
        r#"
        <ul id="list">
          <li class="item" data-value="1"></li>
          <li><span class="item" data-value="2"></span></li>
          <li class="item" data-value="3"></li>
        </ul>
        "#,
    )
    .expect("html should parse");

    let values: Vec<String> = select_all(&dom, "#list .item")
        .expect("selector should parse")
        .into_iter()
        .filter_map(|node| dom.attr(node, "data-value"))
        .collect();
    assert_eq!(values, vec!["1", "2", "3"]);
}

#[test]
fn parser_skips_comments_doctype_and_script_bodies() {
    let dom = parse_html(
        r#"
        <!DOCTYPE html>
        <!-- header comment -->
        <div id="result">ok</div>
        <script>
          const ignored = "<div id='fake'></div>";
        </script>
        "#,
    )
    .expect("html should parse");

    assert!(dom.element_by_id("result").is_some());
    assert!(dom.element_by_id("fake").is_none());
    let script = select_one(&dom, "script").expect("script element should exist");
    assert_eq!(dom.text_content(script), "");
}

#[test]
fn parser_handles_void_tags_and_boolean_attrs() {
    let dom = parse_html(
        r#"
        <div id="wrap">
          <img src="a.png">
          <input type="checkbox" checked>
          <span>tail</span>
        </div>
        "#,
    )
    .expect("html should parse");

    let wrap = dom.element_by_id("wrap").expect("wrap should exist");
    assert_eq!(dom.descendant_elements(wrap).len(), 3);
    let input = select_one(&dom, "input").expect("input should exist");
    assert_eq!(dom.attr(input, "checked").as_deref(), Some(""));
}

#[test]
fn parser_keeps_slashes_in_bare_attribute_values() {
    let dom = parse_html(r#"<img src=/media/a.jpg>"#).expect("html should parse");
    let img = select_one(&dom, "img").expect("img should exist");
    assert_eq!(dom.attr(img, "src").as_deref(), Some("/media/a.jpg"));

    // '/>' still terminates the value and self-closes the tag.
    let dom = parse_html(r#"<div id="wrap"><img src=/media/b.jpg/></div>"#)
        .expect("html should parse");
    let img = select_one(&dom, "img").expect("img should exist");
    assert_eq!(dom.attr(img, "src").as_deref(), Some("/media/b.jpg"));
    let wrap = dom.element_by_id("wrap").expect("wrap should exist");
    assert_eq!(dom.descendant_elements(wrap).len(), 1);
}

#[test]
fn parser_reports_unclosed_constructs() {
    match parse_html("<!-- never closed") {
        Err(Error::HtmlParse(msg)) => assert!(msg.contains("comment")),
        other => panic!("unexpected result: {other:?}"),
    }
    match parse_html("<script>var x = 1;") {
        Err(Error::HtmlParse(msg)) => assert!(msg.contains("script")),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn class_helpers_toggle_and_preserve_others() {
    let mut dom = parse_html("<div id=\"a\" class=\"one two\"></div>").expect("html should parse");
    let node = dom.element_by_id("a").expect("node should exist");

    assert!(dom.has_class(node, "one"));
    let present = dom.toggle_class(node, "three").expect("toggle should work");
    assert!(present);
    assert!(dom.has_class(node, "three"));
    dom.remove_class(node, "one").expect("remove should work");
    assert!(!dom.has_class(node, "one"));
    assert!(dom.has_class(node, "two"));
}

#[test]
fn text_content_concatenates_in_document_order() {
    let mut dom =
        parse_html("<p id=\"p\">a<b>b</b>c</p>").expect("html should parse");
    let p = dom.element_by_id("p").expect("p should exist");
    assert_eq!(dom.text_content(p), "abc");

    dom.set_text_content(p, "replaced").expect("set should work");
    assert_eq!(dom.text_content(p), "replaced");
    assert_eq!(dom.children(p).len(), 1);
}

#[test]
fn style_properties_round_trip() {
    let mut dom = parse_html("<div id=\"m\" style=\"color: red;\"></div>").expect("html should parse");
    let m = dom.element_by_id("m").expect("m should exist");

    assert_eq!(dom.style_property(m, "color").as_deref(), Some("red"));
    assert_eq!(dom.style_property(m, "display"), None);

    dom.set_style_property(m, "display", "flex")
        .expect("set should work");
    assert_eq!(dom.style_property(m, "display").as_deref(), Some("flex"));
    assert_eq!(dom.style_property(m, "color").as_deref(), Some("red"));

    dom.set_style_property(m, "display", "none")
        .expect("set should work");
    assert_eq!(dom.style_property(m, "display").as_deref(), Some("none"));
}
