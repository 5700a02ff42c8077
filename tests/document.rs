use std::io::Write;
use std::path::PathBuf;

use svgom::{Document, EId, Options, Window, SVG_NS, XLINK_NS};

fn parse(svg: &str) -> Document {
    Document::from_str(svg, Window::new(100, 100), Options::default()).unwrap()
}

fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("svgom-{}-{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn elements() {
    let doc = parse("
    <svg xmlns='http://www.w3.org/2000/svg'>
        <g id='g1'>
            <rect id='r1'/>
            <unknown id='u1'/>
        </g>
        <foo:bar xmlns:foo='http://example.com/foo' id='f1'/>
    </svg>
    ");

    let svg = doc.document_element().unwrap();
    assert_eq!(svg.kind(), Some(EId::Svg));
    assert_eq!(svg.namespace_uri().as_deref(), Some(SVG_NS));

    let rect = doc.get_element_by_id("r1").unwrap();
    assert!(rect.is(EId::Rect));
    assert_eq!(rect.parent_element(), doc.get_element_by_id("g1"));
    assert_eq!(rect.next_sibling_element(), doc.get_element_by_id("u1"));

    let unknown = doc.get_element_by_id("u1").unwrap();
    assert_eq!(unknown.kind(), None);
    assert_eq!(unknown.namespace_uri().as_deref(), Some(SVG_NS));
    assert!(!unknown.capabilities().styleable);

    let foreign = doc.get_element_by_id("f1").unwrap();
    assert_eq!(foreign.kind(), None);
    assert_eq!(foreign.local_name(), "bar");
    assert_eq!(foreign.tag_name().prefix.as_deref(), Some("foo"));
    assert_eq!(foreign.namespace_uri().as_deref(), Some("http://example.com/foo"));

    assert_eq!(doc.descendants().count(), 5);
}

#[test]
fn capabilities() {
    let caps = EId::Svg.capabilities();
    assert!(caps.viewport && caps.fit_to_view_box && caps.styleable);
    assert!(!caps.transformable);

    let caps = EId::Use.capabilities();
    assert!(caps.transformable && caps.uri_reference && !caps.viewport);

    assert!(!EId::Symbol.capabilities().viewport);
    assert!(EId::Symbol.capabilities().fit_to_view_box);
    assert_eq!(EId::Rect.rendering_hint(), svgom::RenderingHint::Shape);
    assert_eq!(EId::Tspan.rendering_hint(), svgom::RenderingHint::Text);
    assert_eq!(EId::Mask.rendering_hint(), svgom::RenderingHint::Masking);
}

#[test]
fn duplicated_ids() {
    let doc = parse("
    <svg xmlns='http://www.w3.org/2000/svg'>
        <rect id='a' width='1'/>
        <rect id='a' width='2'/>
    </svg>
    ");

    let rect = doc.get_element_by_id("a").unwrap();
    assert_eq!(rect.attribute("width").as_deref(), Some("1"));
    assert!(doc.get_element_by_id("b").is_none());
    assert!(doc.get_element_by_id("").is_none());
    assert_eq!(doc.get_node_by_uri("#a"), Some(rect.clone()));
    assert!(doc.get_node_by_uri("#b").is_none());
    assert!(doc.get_node_by_uri("#").is_none());

    let second = rect.next_sibling_element().unwrap();
    second.set_attribute("id", "b");
    assert_eq!(doc.get_element_by_id("b"), Some(second.clone()));

    rect.remove();
    assert!(doc.get_element_by_id("a").is_none());
    assert_eq!(doc.get_element_by_id("b"), Some(second));
}

#[test]
fn create_elements() {
    let doc = parse("<svg xmlns='http://www.w3.org/2000/svg'/>");
    let svg = doc.document_element().unwrap();

    let rect = doc.create_element("rect");
    assert_eq!(rect.kind(), Some(EId::Rect));
    assert!(rect.parent_element().is_none());
    assert!(rect.owner_document().unwrap().ptr_eq(&doc));

    rect.set_attribute("id", "new");
    assert!(doc.get_element_by_id("new").is_none());

    svg.append_child(&rect).unwrap();
    assert_eq!(doc.get_element_by_id("new"), Some(rect.clone()));

    let custom = doc.create_element("customThing");
    assert_eq!(custom.kind(), None);
    assert_eq!(custom.namespace_uri().as_deref(), Some(SVG_NS));

    let no_ns = doc.create_element_ns(None, "rect");
    assert_eq!(no_ns.kind(), None);

    let foreign = doc.create_element_ns(Some("http://example.com"), "foo:bar");
    assert_eq!(foreign.tag_name().prefix.as_deref(), Some("foo"));
    assert_eq!(foreign.local_name(), "bar");

    // Cannot append an ancestor.
    let g = doc.create_element("g");
    rect.append_child(&g).unwrap();
    assert!(matches!(g.append_child(&rect), Err(svgom::Error::InvalidValue(_))));
    assert!(matches!(g.append_child(&g), Err(svgom::Error::InvalidValue(_))));
}

#[test]
fn factory() {
    use svgom::factory;

    assert_eq!(factory::element_kind(Some(SVG_NS), "rect"), Some(EId::Rect));
    assert_eq!(factory::element_kind(Some("HTTP://WWW.W3.ORG/2000/SVG"), "rect"), Some(EId::Rect));
    assert_eq!(factory::element_kind(Some(SVG_NS), "RECT"), None);
    assert_eq!(factory::element_kind(None, "rect"), None);
    assert_eq!(factory::element_kind(Some(XLINK_NS), "rect"), None);

    let doc = parse("<svg xmlns='http://www.w3.org/2000/svg'/>");
    assert!(factory::create(None, "circle", Some(SVG_NS), &doc).is_some());
    assert!(factory::create(None, "circle", None, &doc).is_none());
    assert!(factory::create(None, "blah", Some(SVG_NS), &doc).is_none());
}

#[test]
fn attributes() {
    let doc = parse("
    <svg xmlns='http://www.w3.org/2000/svg' xmlns:xlink='http://www.w3.org/1999/xlink'>
        <use id='u' xlink:href='#r' xml:space='preserve'/>
    </svg>
    ");

    let u = doc.get_element_by_id("u").unwrap();
    assert_eq!(u.attribute("xlink:href").as_deref(), Some("#r"));
    assert_eq!(u.attribute_ns(Some(XLINK_NS), "href").as_deref(), Some("#r"));
    assert_eq!(u.attribute("href"), None);
    assert_eq!(u.href().as_deref(), Some("#r"));
    assert_eq!(u.attribute("xml:space").as_deref(), Some("preserve"));
    assert!(u.has_attribute("id"));
    assert_eq!(u.attributes().len(), 3);

    // Fallback bindings.
    u.set_attribute("dc:title", "Title");
    assert_eq!(
        u.attribute_ns(Some("http://purl.org/dc/elements/1.1/"), "title").as_deref(),
        Some("Title")
    );

    // An unknown prefix is a part of the name.
    u.set_attribute("foo:bar", "1");
    assert_eq!(u.attribute_ns(None, "foo:bar").as_deref(), Some("1"));

    assert_eq!(u.remove_attribute("xlink:href").as_deref(), Some("#r"));
    assert_eq!(u.href(), None);
    assert_eq!(u.remove_attribute("xlink:href"), None);
}

#[test]
fn namespaces() {
    let doc = parse("
    <svg xmlns='http://www.w3.org/2000/svg' xmlns:my='http://example.com/my'/>
    ");

    {
        let ns = doc.namespaces();
        assert_eq!(ns.lookup_namespace("my"), Some("http://example.com/my"));
        assert_eq!(ns.lookup_prefix("http://example.com/my"), Some("my"));
        assert_eq!(ns.lookup_namespace("xlink"), Some(XLINK_NS));
        assert!(ns.has_explicit_binding("my"));
        assert!(!ns.has_explicit_binding("xlink"));
    }

    doc.namespaces_mut().add_namespace("other", "http://example.com/other");
    let svg = doc.document_element().unwrap();
    svg.set_attribute("other:value", "1");
    assert_eq!(svg.attribute_ns(Some("http://example.com/other"), "value").as_deref(), Some("1"));

    assert!(doc.namespaces_mut().remove_namespace("other"));
    assert!(!doc.namespaces_mut().remove_namespace("other"));
}

#[test]
fn text_nodes() {
    let doc = parse("
    <svg xmlns='http://www.w3.org/2000/svg'>
        <g id='g1'>
            <rect/>
        </g>
        <text id='t1'><tspan> Hello</tspan> <tspan>world</tspan></text>
        <title id='title'>A <![CDATA[title]]></title>
    </svg>
    ");

    let g = doc.get_element_by_id("g1").unwrap();
    assert_eq!(g.node().children().count(), 1);

    let text = doc.get_element_by_id("t1").unwrap();
    assert_eq!(text.text(), " Hello world");

    assert_eq!(doc.get_element_by_id("title").unwrap().text(), "A title");
}

#[test]
fn parsing_errors() {
    let window = Window::new(100, 100);

    let res = Document::from_str("<svg", window.clone(), Options::default());
    assert!(matches!(res, Err(svgom::Error::ParsingFailed(_))));

    let res = Document::from_data(&[0xff, 0xfe, 0xfd], window.clone(), Options::default());
    assert!(matches!(res, Err(svgom::Error::NotAnUtf8Str)));

    let res = Document::from_data(&[0x1f, 0x8b, 0x00, 0x01], window.clone(), Options::default());
    assert!(matches!(res, Err(svgom::Error::MalformedGZip)));
}

#[test]
fn depth_limit() {
    let mut svg = String::from("<svg xmlns='http://www.w3.org/2000/svg'>");
    for _ in 0..1100 {
        svg.push_str("<g>");
    }
    for _ in 0..1100 {
        svg.push_str("</g>");
    }
    svg.push_str("</svg>");

    let res = Document::from_str(&svg, Window::new(100, 100), Options::default());
    assert!(matches!(res, Err(svgom::Error::ElementsLimitReached)));
}

#[test]
fn svgz_data() {
    let data = gzip(b"<svg xmlns='http://www.w3.org/2000/svg'><rect id='r1'/></svg>");
    let doc = Document::from_data(&data, Window::new(100, 100), Options::default()).unwrap();
    assert!(doc.get_element_by_id("r1").is_some());
}

#[test]
fn base_url() {
    let doc = parse("<svg xmlns='http://www.w3.org/2000/svg' xml:base='http://example.com/dir/'/>");
    assert_eq!(doc.base_url().unwrap().as_str(), "http://example.com/dir/");
    assert_eq!(doc.resolve_uri("a.svg").unwrap().as_str(), "http://example.com/dir/a.svg");

    let opt = Options {
        base_url: Some(svgom::url::Url::parse("http://example.com/root/doc.svg").unwrap()),
        ..Options::default()
    };
    let doc = Document::from_str(
        "<svg xmlns='http://www.w3.org/2000/svg' xml:base='sub/'/>",
        Window::new(100, 100),
        opt,
    ).unwrap();
    assert_eq!(doc.resolve_uri("a.svg").unwrap().as_str(), "http://example.com/root/sub/a.svg");
}

#[test]
fn working_dir_fallback() {
    let dir = temp_dir("working-dir");
    let window = Window::new(100, 100);
    window.set_working_dir(dir.clone());

    let doc = Document::from_str("<svg xmlns='http://www.w3.org/2000/svg'/>", window, Options::default())
        .unwrap();
    let url = doc.resolve_uri("image.svg").unwrap();
    assert_eq!(url.to_file_path().unwrap(), dir.join("image.svg"));
}

#[test]
fn external_references() {
    let dir = temp_dir("external");
    std::fs::write(dir.join("main.svg"), "
    <svg xmlns='http://www.w3.org/2000/svg' xmlns:xlink='http://www.w3.org/1999/xlink'>
        <rect id='src'/>
        <use id='u1' xlink:href='other.svg#target'/>
        <use id='u2' xlink:href='other.svg'/>
        <use id='u3' xlink:href='missing.svg#target'/>
        <use id='u4' xlink:href='packed.svgz#packed'/>
    </svg>
    ").unwrap();
    std::fs::write(dir.join("other.svg"), "
    <svg xmlns='http://www.w3.org/2000/svg' xmlns:xlink='http://www.w3.org/1999/xlink' id='other'>
        <rect id='target'/>
        <use id='back' xlink:href='main.svg#src'/>
    </svg>
    ").unwrap();
    std::fs::write(
        dir.join("packed.svgz"),
        gzip(b"<svg xmlns='http://www.w3.org/2000/svg'><rect id='packed'/></svg>"),
    ).unwrap();

    let doc = Document::load_file(&dir.join("main.svg"), Window::new(100, 100), Options::default())
        .unwrap();
    assert!(doc.url().is_some());

    let u1 = doc.get_element_by_id("u1").unwrap().as_use().unwrap();
    let target = u1.referenced_element().unwrap();
    assert_eq!(target.id(), "target");

    let other = target.owner_document().unwrap();
    assert!(!other.ptr_eq(&doc));
    assert!(other.window().inner_width() == 100);

    // The loaded document is reused.
    assert_eq!(u1.referenced_element(), Some(target.clone()));

    // Without a fragment, the document element is referenced.
    let u2 = doc.get_element_by_id("u2").unwrap().as_use().unwrap();
    assert_eq!(u2.referenced_element().unwrap().id(), "other");

    // A reference back to the main document doesn't load it again.
    let back = other.get_element_by_id("back").unwrap().as_use().unwrap();
    let src = back.referenced_element().unwrap();
    assert!(src.owner_document().unwrap().ptr_eq(&doc));
    assert_eq!(src, doc.get_element_by_id("src").unwrap());

    let u3 = doc.get_element_by_id("u3").unwrap().as_use().unwrap();
    assert!(u3.referenced_element().is_none());
    assert!(u3.instance_root().is_none());

    let u4 = doc.get_element_by_id("u4").unwrap().as_use().unwrap();
    assert_eq!(u4.referenced_element().unwrap().id(), "packed");

    let root = u1.instance_root().unwrap();
    assert_eq!(root.corresponding_element(), Some(target));
}

#[test]
fn load_svgz_file() {
    let dir = temp_dir("svgz");
    let path = dir.join("image.svgz");
    std::fs::write(&path, gzip(b"<svg xmlns='http://www.w3.org/2000/svg'><circle id='c1'/></svg>"))
        .unwrap();

    let doc = Document::load_file(&path, Window::new(100, 100), Options::default()).unwrap();
    assert!(doc.get_element_by_id("c1").unwrap().is(EId::Circle));
}

#[test]
fn missing_file() {
    let res = Document::load_file(
        std::path::Path::new("/definitely/missing/file.svg"),
        Window::new(100, 100),
        Options::default(),
    );
    assert!(matches!(res, Err(svgom::Error::Io(_))));
}

#[test]
fn write_document() {
    let doc = parse("
    <svg xmlns='http://www.w3.org/2000/svg' xmlns:xlink='http://www.w3.org/1999/xlink'>
        <rect id='r1' width='10'/>
        <use xlink:href='#r1'/>
        <text>Text</text>
    </svg>
    ");

    let rect = doc.get_element_by_id("r1").unwrap();
    rect.set_attribute("height", "20");

    let circle = doc.create_element("circle");
    circle.set_attribute_ns(Some(XLINK_NS), "title", "c");
    doc.document_element().unwrap().append_child(&circle).unwrap();

    let text = doc.to_string(svgom::XmlOptions::default());
    assert!(text.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
    assert!(text.contains("xmlns:xlink=\"http://www.w3.org/1999/xlink\""));
    assert!(text.contains("<rect id=\"r1\" width=\"10\" height=\"20\"/>"));
    assert!(text.contains("<use xlink:href=\"#r1\"/>"));
    assert!(text.contains("<circle xlink:title=\"c\"/>"));
    assert!(text.contains("Text"));

    // Can be parsed back.
    let doc2 = parse(&text);
    assert_eq!(doc2.descendants().count(), 5);
}
